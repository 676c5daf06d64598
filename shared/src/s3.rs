use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use std::collections::HashSet;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("S3 list failed for prefix {prefix}: {message}")]
    List { prefix: String, message: String },
}

/// One page of a continuation-token listing.
#[derive(Debug, Default, Clone)]
pub struct ListPage {
    pub keys: Vec<String>,
    pub next_continuation_token: Option<String>,
}

/// Lists object keys, one page per call.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage, StorageError>;
}

pub struct S3ObjectLister {
    client: S3Client,
}

impl S3ObjectLister {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectLister for S3ObjectLister {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage, StorageError> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(continuation_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("S3 list_objects_v2 failed for prefix {}: {}", prefix, e);
                StorageError::List {
                    prefix: prefix.to_string(),
                    message: e.to_string(),
                }
            })?;

        let keys = resp
            .contents()
            .iter()
            .filter_map(|o| o.key())
            .map(str::to_string)
            .collect();

        Ok(ListPage {
            keys,
            next_continuation_token: resp.next_continuation_token().map(str::to_string),
        })
    }
}

/// True when the key ends in a supported image extension (case-insensitive).
pub fn is_image_key(key: &str) -> bool {
    key.rsplit_once('.')
        .map(|(_, ext)| {
            !ext.contains('/')
                && IMAGE_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Collect every image key under `prefix`, following continuation tokens
/// until the listing is exhausted.
pub async fn list_image_keys(
    lister: &dyn ObjectLister,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<String>, StorageError> {
    let mut keys = Vec::new();
    let mut seen = HashSet::new();
    let mut continuation: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = lister
            .list_page(bucket, prefix, continuation.as_deref())
            .await?;
        pages += 1;

        for key in page.keys {
            if is_image_key(&key) && seen.insert(key.clone()) {
                keys.push(key);
            }
        }

        match page.next_continuation_token {
            Some(token) => continuation = Some(token),
            None => break,
        }
    }

    tracing::debug!(
        "Listed {} image(s) under {} in {} page(s)",
        keys.len(),
        prefix,
        pages
    );
    Ok(keys)
}
