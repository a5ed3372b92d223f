//! # Outfit Service Module
//!
//! Every endpoint of the ranking workflow lives here. Each sub-module exposes
//! a `process` handler that delegates to a plain async function, so the
//! workflow can be exercised without going through HTTP.
//!
//! ## Sub-modules:
//! - `upload`: validates a multipart image, stores it, and appends a record.
//! - `gallery`: lists the stored records in their current order.
//! - `generate`: rescores every record for an occasion/style pair and re-ranks.
//! - `reset`: deletes every stored image and the record document.

mod gallery;
mod generate;
mod reset;
mod upload;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The outfit endpoints are mounted at the site root.
const API_PATH: &str = "";

/// Configures and returns the Actix `Scope` for the outfit routes.
///
/// # Registered Routes:
///
/// *   **`POST /upload`**: multipart form with an `image` field.
///     Responds `{"message"}`, or `{"error"}` with 400/500.
/// *   **`GET /gallery`**: responds `{"outfits": [...]}`.
/// *   **`POST /generate`**: JSON `{"occasion", "style"}`.
///     Responds `{"message", "best", "outfits"}`, or `{"error"}` with 400.
/// *   **`POST /reset`**: responds `{"message"}`; never fails.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("/gallery", get().to(gallery::process))
        .route("/generate", post().to(generate::process))
        .route("/reset", post().to(reset::process))
}
