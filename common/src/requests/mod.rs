use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
/// Request payload for the generate endpoint.
/// Both fields are optional on the wire so a missing key surfaces as a
/// validation message instead of a deserialization failure.
pub struct GenerateRequest {
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}
