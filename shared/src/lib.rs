pub mod config;
pub mod external_id;
pub mod types;
pub mod response;
pub mod s3;
pub mod rekognition;
pub mod photos;
pub mod face_search;
pub mod image_proxy;
pub mod indexing;

#[cfg(test)]
pub(crate) mod testing;

use config::Config;
use rekognition::FaceIndex;
use s3::ObjectLister;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub lister: Arc<dyn ObjectLister>,
    pub face_index: Arc<dyn FaceIndex>,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: Config,
        lister: Arc<dyn ObjectLister>,
        face_index: Arc<dyn FaceIndex>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            lister,
            face_index,
            http_client: reqwest::Client::new(),
        })
    }
}
