//! Model-backed scorer.
//!
//! The vision-language model runs in a separate inference service. For each
//! call the image is decoded, normalized to RGB, re-encoded as PNG and sent
//! together with the prompts of the requested occasion/style pair. The
//! service returns one logit per prompt. The score is the largest softmax
//! probability over those logits.
//!
//! Wire format:
//! - `GET  {endpoint}/health` answers 2xx when the model is loaded.
//! - `POST {endpoint}/v1/score` with `{"model", "image", "texts"}`, where
//!   `image` is base64 PNG, answers `{"logits_per_image": [f32, ...]}`.

use super::prompts::prompts_for;
use super::Scorer;
use crate::error::ScorerError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::ImageFormat;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClipConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

pub struct ClipScorer {
    client: Client,
    cfg: ClipConfig,
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    model: &'a str,
    image: String,
    texts: &'a [&'a str],
}

#[derive(Deserialize)]
struct ScoreResponse {
    logits_per_image: Vec<f32>,
}

impl ClipScorer {
    /// Builds the client and checks that the inference service is up.
    pub async fn connect(cfg: ClipConfig) -> Result<Self, ScorerError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| ScorerError::Model(e.to_string()))?;
        let scorer = Self { client, cfg };
        scorer.probe().await?;
        info!(
            "Model scorer ready: {} at {}",
            scorer.cfg.model, scorer.cfg.endpoint
        );
        Ok(scorer)
    }

    async fn probe(&self) -> Result<(), ScorerError> {
        let url = format!("{}/health", self.base_url());
        self.client
            .get(&url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map(|_| ())
            .map_err(|e| ScorerError::Model(format!("health check {} failed: {}", url, e)))
    }

    fn base_url(&self) -> &str {
        self.cfg.endpoint.trim_end_matches('/')
    }
}

/// Reads the image, drops any alpha channel, and re-encodes it as PNG.
fn encode_rgb_png(path: &Path) -> Result<Vec<u8>, ScorerError> {
    let image_err = |reason: String| ScorerError::Image {
        path: path.to_path_buf(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| image_err(e.to_string()))?;
    let rgb = image::load_from_memory(&bytes)
        .map_err(|e| image_err(e.to_string()))?
        .to_rgb8();

    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| image_err(e.to_string()))?;
    Ok(out.into_inner())
}

/// Runs `encode_rgb_png` on the blocking pool so large photos do not stall
/// the worker that serves requests.
async fn encode_off_runtime(path: &Path) -> Result<Vec<u8>, ScorerError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || encode_rgb_png(&path))
        .await
        .map_err(|e| ScorerError::Model(format!("image encoding task failed: {}", e)))?
}

/// Largest softmax probability of `logits`.
fn max_probability(logits: &[f32]) -> Option<f64> {
    if logits.is_empty() || logits.iter().any(|l| !l.is_finite()) {
        return None;
    }
    let max_logit = logits
        .iter()
        .copied()
        .map(f64::from)
        .fold(f64::NEG_INFINITY, f64::max);
    let denom: f64 = logits
        .iter()
        .map(|&l| (f64::from(l) - max_logit).exp())
        .sum();
    // exp(max - max) == 1, so the top probability is 1 / denom.
    Some(1.0 / denom)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl Scorer for ClipScorer {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn score(&self, image: &Path, occasion: &str, style: &str) -> Result<f64, ScorerError> {
        let texts = prompts_for(occasion, style).ok_or_else(|| {
            ScorerError::UnsupportedCombination {
                occasion: occasion.to_string(),
                style: style.to_string(),
            }
        })?;

        let png = encode_off_runtime(image).await?;
        let body = ScoreRequest {
            model: &self.cfg.model,
            image: BASE64.encode(png),
            texts,
        };

        let resp = self
            .client
            .post(format!("{}/v1/score", self.base_url()))
            .json(&body)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ScorerError::Model(e.to_string()))?;

        let parsed: ScoreResponse = resp
            .json()
            .await
            .map_err(|e| ScorerError::Model(e.to_string()))?;

        if parsed.logits_per_image.len() != texts.len() {
            return Err(ScorerError::Model(format!(
                "expected {} logits, got {}",
                texts.len(),
                parsed.logits_per_image.len()
            )));
        }
        let score = max_probability(&parsed.logits_per_image)
            .ok_or_else(|| ScorerError::Model("non-finite logits".to_string()))?;

        debug!(
            "[Model] {} / {} -> {:.4}",
            capitalize(style),
            capitalize(occasion),
            score
        );
        Ok(score)
    }
}
