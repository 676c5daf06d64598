use amour_shared::config::AwsSettings;
use amour_shared::indexing::{self, DEFAULT_PREFIX};
use amour_shared::rekognition::RekognitionFaceIndex;
use amour_shared::s3::S3ObjectLister;
use amour_shared::types::IndexingSummary;
use anyhow::{bail, Context};
use aws_sdk_rekognition::Client as RekognitionClient;
use aws_sdk_s3::Client as S3Client;
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Add every photo under a bucket prefix to the face collection.
#[derive(Parser, Debug)]
#[command(name = "index-faces", version)]
struct Args {
    /// Key prefix to index
    #[arg(default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Pause between index calls, in milliseconds
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,

    /// Stop after this many seconds and report what was done so far
    #[arg(long)]
    max_duration_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();
    let settings = AwsSettings::from_env().context("Missing required environment variables")?;

    let sdk_config = settings.load_sdk_config().await;
    let lister = S3ObjectLister::new(S3Client::new(&sdk_config));
    let face_index = RekognitionFaceIndex::new(
        RekognitionClient::new(&sdk_config),
        settings.collection_id.clone(),
    );

    let mut summary = IndexingSummary::default();
    let run = indexing::index_prefix(
        &lister,
        &face_index,
        &settings.bucket,
        &args.prefix,
        Duration::from_millis(args.delay_ms),
        &mut summary,
    );

    let timed_out = match args.max_duration_secs {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), run).await {
            Ok(result) => {
                result.context("Failed to list images")?;
                false
            }
            Err(_) => true,
        },
        None => {
            run.await.context("Failed to list images")?;
            false
        }
    };

    indexing::log_summary(&summary);

    if timed_out {
        bail!(
            "Stopped after {}s before all images were processed",
            args.max_duration_secs.unwrap_or_default()
        );
    }
    Ok(())
}
