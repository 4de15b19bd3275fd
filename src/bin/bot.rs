//! Scheduled entry point: find one excerpt, format it, publish it.
//!
//! Exits non-zero when the attempt budget runs out or the publish call fails.

use anyhow::{Context, Result};
use clap::Parser;
use palimpseste::{
    bot::{Runner, publish_excerpt},
    config::Config,
    fetcher::WikiClient,
    publisher::{DryRunPublisher, HttpPublisher, PostFormat, Publisher},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const ENV_LOG_JSON: &str = "PALIMPSESTE_LOG_JSON";

#[derive(Parser, Debug)]
#[command(name = "palimpseste-bot")]
#[command(about = "Publish one public-domain excerpt from Wikisource")]
struct Args {
    /// Format and log the post without publishing it
    #[arg(long)]
    dry_run: bool,

    /// Override the attempt budget
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Language of the site to read `--title` from
    #[arg(long, default_value = "fr")]
    lang: String,

    /// Evaluate this page instead of discovering one
    #[arg(long)]
    title: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(max_attempts) = args.max_attempts {
        config = config.with_max_attempts(max_attempts);
    }

    let sites = config.source_table()?;
    let client = WikiClient::new(config.http_timeout()).context("building wiki client")?;
    let runner = Runner::new(client, sites, config.max_attempts());
    let format = PostFormat::from_config(&config);

    let publisher: Box<dyn Publisher> = if args.dry_run {
        Box::new(DryRunPublisher)
    } else {
        Box::new(HttpPublisher::new(
            config.publish_url(),
            config.bearer_token(),
            config.http_timeout(),
        )?)
    };

    let mut rng = StdRng::from_entropy();
    let result = match &args.title {
        Some(title) => match runner.run_title(&args.lang, title, &mut rng).await {
            Ok(excerpt) => publish_excerpt(publisher.as_ref(), &format, excerpt).await,
            Err(e) => Err(e),
        },
        None => runner.run(publisher.as_ref(), &format, &mut rng).await,
    };

    match result {
        Ok(published) => {
            info!(
                "Published '{}' ({}), receipt {}{}",
                published.excerpt.title,
                published.excerpt.source_url,
                published.receipt.id,
                published
                    .receipt
                    .url
                    .as_deref()
                    .map(|url| format!(" at {url}"))
                    .unwrap_or_default()
            );
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_JSON).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
