use serde::{Deserialize, Serialize};

// ========== PHOTO ==========
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Photo {
    pub src: String,
    pub alt: String,
    pub orientation: Orientation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhotosResponse {
    pub landscape: Vec<Photo>,
    pub portrait: Vec<Photo>,
}

// ========== FACE SEARCH ==========
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FaceMatch {
    pub src: String,
    pub similarity: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub matches: Vec<FaceMatch>,
}

// ========== INDEXING ==========
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Indexed(usize),
    NoFaces,
    Failed(String),
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexingResult {
    pub success: bool,
    pub face_count: usize,
}

impl From<&IndexOutcome> for IndexingResult {
    fn from(outcome: &IndexOutcome) -> Self {
        match outcome {
            IndexOutcome::Indexed(n) => IndexingResult {
                success: true,
                face_count: *n,
            },
            IndexOutcome::NoFaces | IndexOutcome::Failed(_) => IndexingResult {
                success: false,
                face_count: 0,
            },
        }
    }
}

#[derive(Debug, Serialize, Default, Clone, PartialEq, Eq)]
pub struct IndexingSummary {
    pub total_images: usize,
    pub indexed: usize,
    /// Images that failed or had no faces.
    pub failed: usize,
    pub no_faces: usize,
    pub total_faces: usize,
}

impl IndexingSummary {
    pub fn record(&mut self, outcome: &IndexOutcome) {
        if let IndexOutcome::NoFaces = outcome {
            self.no_faces += 1;
        }
        let result = IndexingResult::from(outcome);
        if result.success {
            self.indexed += 1;
            self.total_faces += result.face_count;
        } else {
            self.failed += 1;
        }
    }
}

// ========== ERRORS ==========
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
