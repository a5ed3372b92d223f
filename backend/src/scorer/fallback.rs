use super::{round4, Scorer};
use crate::error::ScorerError;
use async_trait::async_trait;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Mutex;

/// Pixel count at which the size term saturates.
const FULL_SIZE_PIXELS: f64 = 1_000_000.0;
/// Size term used when the image dimensions cannot be read.
const UNKNOWN_SIZE_SCORE: f64 = 0.5;

/// Heuristic used when no model service is reachable.
///
/// Blends a size term, `min(1, w*h / 1e6)`, with a uniform random term in
/// `[0, 0.5)`: `min(1, size * 0.5 + rnd)`. The occasion and style are not
/// consulted. With a seed the sequence of scores is reproducible.
pub struct FallbackScorer {
    rng: Mutex<StdRng>,
}

impl FallbackScorer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn size_score(image: &Path) -> f64 {
        match image::image_dimensions(image) {
            Ok((w, h)) => (f64::from(w) * f64::from(h) / FULL_SIZE_PIXELS).min(1.0),
            Err(_) => UNKNOWN_SIZE_SCORE,
        }
    }

    fn random_term(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random::<f64>() * 0.5
    }
}

#[async_trait]
impl Scorer for FallbackScorer {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn score(&self, image: &Path, _occasion: &str, _style: &str) -> Result<f64, ScorerError> {
        let size_score = Self::size_score(image);
        let score = round4((size_score * 0.5 + self.random_term()).min(1.0));
        debug!(
            "[Model fallback] returning score={} for {}",
            score,
            image.display()
        );
        Ok(score)
    }
}
