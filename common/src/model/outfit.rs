use serde::{Deserialize, Serialize};

/// URL prefix under which uploaded images are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// A single uploaded outfit photo together with its latest ranking result.
///
/// Records are created by the upload endpoint without any score fields. Every
/// call to the generate endpoint rescores the whole collection, so `score`,
/// `occasion` and `style` are either present on every record or on none.
///
/// The JSON form omits the score fields while they are unset, which keeps the
/// persisted document identical in shape to what the gallery returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitRecord {
    /// Generated on upload as `<millis>_<sanitized name>`; unique in the store.
    pub filename: String,
    /// Location the image is served from, derived from `filename`.
    pub url: String,
    /// Local creation time, formatted as `dd/mm/YYYY, HH:MM:SS AM`.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl OutfitRecord {
    /// Builds a freshly uploaded record with no ranking attached.
    pub fn uploaded(filename: impl Into<String>, timestamp: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            url: format!("{}/{}", UPLOADS_URL_PREFIX, filename),
            filename,
            timestamp: timestamp.into(),
            score: None,
            occasion: None,
            style: None,
        }
    }

    /// Attaches the result of one ranking pass, replacing any previous one.
    pub fn apply_ranking(&mut self, score: f64, occasion: &str, style: &str) {
        self.score = Some(score);
        self.occasion = Some(occasion.to_string());
        self.style = Some(style.to_string());
    }

    /// Score used for ordering; unscored records rank as zero.
    pub fn rank_score(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploaded_record_derives_url_and_omits_score_fields() {
        let record = OutfitRecord::uploaded("1700000000000_shoe.png", "01/02/2024, 03:04:05 PM");
        assert_eq!(record.url, "/uploads/1700000000000_shoe.png");

        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(!obj.contains_key("score"));
        assert!(!obj.contains_key("occasion"));
        assert!(!obj.contains_key("style"));
    }

    #[test]
    fn apply_ranking_overwrites_previous_result() {
        let mut record = OutfitRecord::uploaded("a.png", "t");
        record.apply_ranking(0.25, "Office", "GenZ");
        record.apply_ranking(0.75, "Beach", "Classic");

        assert_eq!(record.score, Some(0.75));
        assert_eq!(record.occasion.as_deref(), Some("Beach"));
        assert_eq!(record.style.as_deref(), Some("Classic"));
    }

    #[test]
    fn deserializes_documents_written_before_any_ranking() {
        let raw = r#"{"filename":"1_a.png","url":"/uploads/1_a.png","timestamp":"t"}"#;
        let record: OutfitRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.score, None);
        assert_eq!(record.rank_score(), 0.0);
    }
}
