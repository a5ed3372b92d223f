pub mod outfits;

use crate::error::AppError;
use actix_files::Files;
use actix_web::web;
use common::model::outfit::UPLOADS_URL_PREFIX;
use std::path::Path;

/// Largest accepted JSON body.
const JSON_LIMIT: usize = 1024 * 1024;

/// JSON extractor settings: malformed bodies answer with the usual
/// `{"error"}` shape and a 400 instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| AppError::validation(format!("Invalid JSON body: {}", err)).into())
}

/// Serves stored images at `/uploads/{filename}`.
pub fn uploaded_files(dir: &Path) -> Files {
    Files::new(UPLOADS_URL_PREFIX, dir)
}
