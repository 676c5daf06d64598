use amour_shared::config::Config;
use amour_shared::rekognition::RekognitionFaceIndex;
use amour_shared::s3::S3ObjectLister;
use amour_shared::AppState;
use aws_sdk_rekognition::Client as RekognitionClient;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{run, service_fn, tracing, Error, Request};
use std::sync::Arc;

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    // Refuse to start without the full configuration
    let config = Config::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    // Initialize AWS clients once at startup
    let sdk_config = config.aws.load_sdk_config().await;
    let lister = S3ObjectLister::new(S3Client::new(&sdk_config));
    let face_index = RekognitionFaceIndex::new(
        RekognitionClient::new(&sdk_config),
        config.aws.collection_id.clone(),
    );

    let state = AppState::new(config, Arc::new(lister), Arc::new(face_index));

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}
