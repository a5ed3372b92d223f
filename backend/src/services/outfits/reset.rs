use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::MessageResponse;
use log::{info, warn};
use std::fs;
use std::io::ErrorKind;

/// HTTP handler for `POST /reset`. Always answers `200 OK`.
pub async fn process(state: web::Data<AppState>) -> HttpResponse {
    reset_outfits(&state).await;
    HttpResponse::Ok().json(MessageResponse::new("All outfits cleared."))
}

/// Deletes every stored image and the record document.
///
/// Nothing here is reported to the caller: missing files are expected after
/// a partial earlier reset, and any other failure is logged and skipped so the
/// remaining cleanup still runs. Returns how many images were removed.
pub async fn reset_outfits(state: &AppState) -> usize {
    let _guard = state.records_lock.write().await;

    let records = state.store.load().unwrap_or_else(|e| {
        warn!("Reset could not read the outfit store, removing it anyway: {}", e);
        Vec::new()
    });

    let mut removed = 0;
    for record in &records {
        let Some(path) = state.uploads.resolve(&record.filename) else {
            warn!("Reset skipped unsafe filename {:?}", record.filename);
            continue;
        };
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Reset could not remove {}: {}", path.display(), e),
        }
    }

    if let Err(e) = state.store.clear() {
        warn!("Reset could not remove the outfit store: {}", e);
    }

    info!("Reset removed {} of {} outfit images", removed, records.len());
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::fallback::FallbackScorer;
    use crate::services::outfits::test_support::state_with;
    use common::model::outfit::OutfitRecord;
    use std::sync::Arc;

    #[actix_web::test]
    async fn removes_files_and_document() {
        let (_dir, state) = state_with(Arc::new(FallbackScorer::new(Some(1))));
        let keep = state.uploads.dir.join("unrelated.png");
        fs::write(&keep, b"x").unwrap();
        let mut records = Vec::new();
        for name in ["1_a.png", "2_b.png"] {
            fs::write(state.uploads.dir.join(name), b"img").unwrap();
            records.push(OutfitRecord::uploaded(name, "t"));
        }
        state.store.save(&records).unwrap();

        assert_eq!(reset_outfits(&state).await, 2);
        assert!(!state.uploads.dir.join("1_a.png").exists());
        assert!(!state.uploads.dir.join("2_b.png").exists());
        assert!(!state.store.path().exists());
        assert!(keep.exists());
    }

    #[actix_web::test]
    async fn missing_files_and_store_are_not_errors() {
        let (_dir, state) = state_with(Arc::new(FallbackScorer::new(Some(1))));
        state
            .store
            .save(&[OutfitRecord::uploaded("1_gone.png", "t")])
            .unwrap();

        assert_eq!(reset_outfits(&state).await, 0);
        assert_eq!(reset_outfits(&state).await, 0);
        assert!(!state.store.path().exists());
    }

    #[actix_web::test]
    async fn corrupt_store_is_still_removed() {
        let (_dir, state) = state_with(Arc::new(FallbackScorer::new(Some(1))));
        fs::write(state.store.path(), "not json").unwrap();

        reset_outfits(&state).await;
        assert!(!state.store.path().exists());
    }

    #[actix_web::test]
    async fn traversal_names_are_never_deleted() {
        let (dir, state) = state_with(Arc::new(FallbackScorer::new(Some(1))));
        let outside = dir.path().join("secret.png");
        fs::write(&outside, b"x").unwrap();
        state
            .store
            .save(&[OutfitRecord::uploaded("../secret.png", "t")])
            .unwrap();

        reset_outfits(&state).await;
        assert!(outside.exists());
    }
}
