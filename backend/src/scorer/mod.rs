//! Outfit scoring.
//!
//! A `Scorer` returns the affinity in `[0, 1]` between one image and an
//! occasion/style pair. Two implementations exist:
//! - `clip`: asks an external vision-language model service;
//! - `fallback`: a size/random heuristic that needs nothing external.
//!
//! `select` picks one of them once at startup. The result is shared through
//! `AppState` as an `Arc<dyn Scorer>`.

pub mod clip;
pub mod fallback;
pub mod prompts;

use crate::config::{ScorerBackend, ScorerConfig};
use crate::error::{AppError, ScorerError};
use async_trait::async_trait;
use clip::{ClipConfig, ClipScorer};
use fallback::FallbackScorer;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Scorer: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Affinity of `image` for the pair. Callers pass lowercase keys.
    async fn score(&self, image: &Path, occasion: &str, style: &str) -> Result<f64, ScorerError>;
}

/// Rounds to four decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Chooses the scorer implementation for this process.
pub async fn select(cfg: &ScorerConfig) -> Result<Arc<dyn Scorer>, AppError> {
    let fallback = || -> Arc<dyn Scorer> { Arc::new(FallbackScorer::new(cfg.seed)) };

    match (cfg.backend, cfg.endpoint.as_deref()) {
        (ScorerBackend::Fallback, _) => {
            info!("Using fallback scorer (configured)");
            Ok(fallback())
        }
        (ScorerBackend::Model, None) => Err(AppError::Config(
            "scorer.backend = \"model\" requires scorer.endpoint".into(),
        )),
        (ScorerBackend::Auto, None) => {
            info!("No scorer endpoint configured, using fallback scorer");
            Ok(fallback())
        }
        (backend, Some(endpoint)) => {
            let clip_cfg = ClipConfig {
                endpoint: endpoint.to_string(),
                model: cfg.model.clone(),
                timeout: Duration::from_secs(cfg.timeout_secs),
            };
            match ClipScorer::connect(clip_cfg).await {
                Ok(scorer) => Ok(Arc::new(scorer)),
                Err(e) if backend == ScorerBackend::Auto => {
                    warn!("Model scorer unavailable ({}), using fallback scorer", e);
                    Ok(fallback())
                }
                Err(e) => Err(AppError::Config(format!("model scorer unavailable: {}", e))),
            }
        }
    }
}
