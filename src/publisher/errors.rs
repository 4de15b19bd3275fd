use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    /// The platform answered with anything but `201 Created`.
    #[error("publish rejected with {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("publish transport failure: {0}")]
    Transport(String),

    #[error("undecodable publish response: {0}")]
    Decode(String),

    #[error("invalid publish endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}

impl PublishError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
