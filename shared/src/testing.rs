//! In-memory stand-ins for the storage and face-index collaborators.

use crate::config::{AwsSettings, Config};
use crate::external_id::ExternalImageId;
use crate::rekognition::{FaceIndex, FaceIndexError, IndexedFaceMatch, SearchParams};
use crate::s3::{ListPage, ObjectLister, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn test_config(cdn_base_url: &str) -> Config {
    Config {
        aws: AwsSettings {
            region: "ap-southeast-1".into(),
            bucket: "amour-fou-bucket".into(),
            collection_id: "wedding-faces".into(),
            credentials: None,
            outbound_timeout: Duration::from_secs(5),
        },
        cdn_base_url: cdn_base_url.trim_end_matches('/').to_string(),
        photo_prefix: "prewed/".into(),
    }
}

/// Serves fixed pages; page `n` hands out token `page-{n+1}` unless it is last.
pub struct PagedLister {
    pages: HashMap<String, Vec<ListPage>>,
    tokens_seen: Mutex<Vec<Option<String>>>,
}

impl PagedLister {
    pub fn new(pages: Vec<Vec<&str>>) -> Self {
        Self::with_prefixes(vec![("", pages)])
    }

    /// Pages per prefix; an empty prefix matches any request.
    pub fn with_prefixes(prefixes: Vec<(&str, Vec<Vec<&str>>)>) -> Self {
        let pages = prefixes
            .into_iter()
            .map(|(prefix, pages)| {
                let count = pages.len();
                let pages = pages
                    .into_iter()
                    .enumerate()
                    .map(|(i, keys)| ListPage {
                        keys: keys.into_iter().map(str::to_string).collect(),
                        next_continuation_token: (i + 1 < count)
                            .then(|| format!("page-{}", i + 1)),
                    })
                    .collect();
                (prefix.to_string(), pages)
            })
            .collect();

        Self {
            pages,
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.tokens_seen.lock().unwrap().len()
    }

    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        self.tokens_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectLister for PagedLister {
    async fn list_page(
        &self,
        _bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage, StorageError> {
        self.tokens_seen
            .lock()
            .unwrap()
            .push(continuation_token.map(str::to_string));

        let pages = self
            .pages
            .get(prefix)
            .or_else(|| self.pages.get(""))
            .cloned()
            .unwrap_or_default();
        let index = match continuation_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(usize::MAX),
        };
        Ok(pages.get(index).cloned().unwrap_or_default())
    }
}

pub struct FailingLister;

#[async_trait]
impl ObjectLister for FailingLister {
    async fn list_page(
        &self,
        _bucket: &str,
        prefix: &str,
        _continuation_token: Option<&str>,
    ) -> Result<ListPage, StorageError> {
        Err(StorageError::List {
            prefix: prefix.to_string(),
            message: "AccessDenied".into(),
        })
    }
}

pub enum IndexBehavior {
    Faces(usize),
    InvalidParameter,
    ServiceFailure,
}

/// Scripted face index. Index results are keyed by storage key; searches
/// return `matches` or fail when `search_fails` is set.
#[derive(Default)]
pub struct FakeFaceIndex {
    pub index_behavior: HashMap<String, IndexBehavior>,
    pub matches: Vec<IndexedFaceMatch>,
    pub search_fails: bool,
    pub indexed: Mutex<Vec<(String, String)>>,
    pub searches: Mutex<Vec<(usize, SearchParams)>>,
}

impl FakeFaceIndex {
    pub fn with_matches(matches: Vec<(&str, f32)>) -> Self {
        Self {
            matches: matches
                .into_iter()
                .map(|(id, similarity)| IndexedFaceMatch {
                    external_image_id: Some(id.to_string()),
                    similarity: Some(similarity),
                })
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl FaceIndex for FakeFaceIndex {
    async fn index_faces(
        &self,
        _bucket: &str,
        key: &str,
        external_id: &ExternalImageId,
    ) -> Result<usize, FaceIndexError> {
        self.indexed
            .lock()
            .unwrap()
            .push((key.to_string(), external_id.to_string()));

        match self.index_behavior.get(key) {
            Some(IndexBehavior::Faces(n)) => Ok(*n),
            Some(IndexBehavior::InvalidParameter) => Err(FaceIndexError::InvalidParameter(
                "Request has invalid parameters".into(),
            )),
            Some(IndexBehavior::ServiceFailure) => {
                Err(FaceIndexError::Service("ThrottlingException".into()))
            }
            None => Ok(0),
        }
    }

    async fn search_faces_by_image(
        &self,
        image: Vec<u8>,
        params: SearchParams,
    ) -> Result<Vec<IndexedFaceMatch>, FaceIndexError> {
        self.searches.lock().unwrap().push((image.len(), params));
        if self.search_fails {
            return Err(FaceIndexError::Service("InternalServerError".into()));
        }
        Ok(self.matches.clone())
    }
}
