use crate::model::outfit::OutfitRecord;
use serde::{Deserialize, Serialize};

/// Plain acknowledgment, e.g. `{"message": "Uploaded successfully!"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryResponse {
    pub outfits: Vec<OutfitRecord>,
}

/// Result of a ranking pass. `best` is the first entry of `outfits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub message: String,
    pub best: Option<OutfitRecord>,
    pub outfits: Vec<OutfitRecord>,
}
