//! # Outfit Ranking Service
//!
//! Provides `POST /generate`, which rescores the whole stored collection for
//! one occasion/style pair and re-ranks it.
//!
//! ## Workflow:
//!
//! 1.  **Validation**: `occasion` and `style` must both be present and
//!     non-blank. Validation happens before the store is read.
//!
//! 2.  **Load**: under the store write lock the full collection is loaded.
//!     An empty collection is rejected and nothing is written.
//!
//! 3.  **Scoring**: each record's image is scored with the lowercased pair.
//!     A failing record scores `0.0` and the batch carries on. Scores are
//!     clamped to `[0, 1]` and rounded to four decimals, and the caller's
//!     original spelling of the pair is stored on every record.
//!
//! 4.  **Ranking**: a stable sort by score, highest first, so ties keep the
//!     order they had before this pass.
//!
//! 5.  **Persistence**: the ranked collection replaces the stored document,
//!     and the first entry is reported as the best match.

use crate::error::{AppError, Result};
use crate::scorer::{round4, Scorer};
use crate::state::{AppState, UploadDir};
use actix_web::{web, HttpResponse};
use common::model::outfit::OutfitRecord;
use common::requests::GenerateRequest;
use common::responses::GenerateResponse;
use log::{info, warn};

/// HTTP handler for `POST /generate`.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<GenerateRequest>,
) -> Result<HttpResponse> {
    let (occasion, style) = validate(&payload)?;
    let outfits = generate_ranking(&state, occasion, style).await?;
    Ok(HttpResponse::Ok().json(GenerateResponse {
        message: "Evaluation complete".to_string(),
        best: outfits.first().cloned(),
        outfits,
    }))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn validate(req: &GenerateRequest) -> Result<(&str, &str)> {
    match (non_blank(&req.occasion), non_blank(&req.style)) {
        (Some(occasion), Some(style)) => Ok((occasion, style)),
        _ => Err(AppError::validation("Please select occasion and style")),
    }
}

/// Rescores, re-sorts and persists the stored collection.
pub async fn generate_ranking(
    state: &AppState,
    occasion: &str,
    style: &str,
) -> Result<Vec<OutfitRecord>> {
    let _guard = state.records_lock.write().await;
    let records = state.store.load()?;
    if records.is_empty() {
        return Err(AppError::EmptyCollection);
    }

    let ranked = rank_outfits(
        records,
        state.scorer.as_ref(),
        &state.uploads,
        occasion,
        style,
    )
    .await;
    state.store.save(&ranked)?;

    info!(
        "Ranked {} outfits for {} / {} with the {} scorer",
        ranked.len(),
        occasion,
        style,
        state.scorer.name()
    );
    Ok(ranked)
}

/// Scores every record and returns them ordered best first.
async fn rank_outfits(
    mut records: Vec<OutfitRecord>,
    scorer: &dyn Scorer,
    uploads: &UploadDir,
    occasion: &str,
    style: &str,
) -> Vec<OutfitRecord> {
    let occasion_key = occasion.to_lowercase();
    let style_key = style.to_lowercase();

    for record in records.iter_mut() {
        let score = score_one(record, scorer, uploads, &occasion_key, &style_key).await;
        record.apply_ranking(round4(score), occasion, style);
    }

    // `sort_by` is stable: equal scores keep their previous order.
    records.sort_by(|a, b| b.rank_score().total_cmp(&a.rank_score()));
    records
}

/// One record's score; any failure counts as zero.
async fn score_one(
    record: &OutfitRecord,
    scorer: &dyn Scorer,
    uploads: &UploadDir,
    occasion: &str,
    style: &str,
) -> f64 {
    let Some(path) = uploads.resolve(&record.filename) else {
        warn!("Skipping outfit with unsafe filename {:?}", record.filename);
        return 0.0;
    };
    match scorer.score(&path, occasion, style).await {
        // `+ 0.0` turns a clamped `-0.0` into `0.0` so it ties with failures.
        Ok(score) if score.is_finite() => score.clamp(0.0, 1.0) + 0.0,
        Ok(score) => {
            warn!("Scorer returned {} for {}, using 0", score, record.filename);
            0.0
        }
        Err(e) => {
            warn!("Scoring {} failed, using 0: {}", record.filename, e);
            0.0
        }
    }
}
