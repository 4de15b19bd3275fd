pub mod client;
pub mod errors;
pub mod format;

pub use client::{DryRunPublisher, HttpPublisher, PublishReceipt, Publisher};
#[cfg(test)]
pub use client::MockPublisher;
pub use errors::PublishError;
pub use format::{POST_BUDGET, PostFormat, format_post};
