use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snaplink_shortener::{LinkSummary, SaveOutcome};

#[derive(Debug, Deserialize)]
pub struct SaveLinkRequest {
    pub destination_url: String,
    #[serde(default)]
    pub custom_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveLinkResponse {
    pub short_code: String,
    pub short_url: String,
    pub destination_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SaveLinkResponse {
    pub fn new(outcome: SaveOutcome, destination_url: String, base_url: &str) -> Self {
        Self {
            short_url: outcome.short_code.to_url(base_url),
            short_code: outcome.short_code.to_string(),
            destination_url,
            warning: outcome.warning.map(|w| w.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub record_id: u64,
    pub short_code: String,
    pub short_url: String,
    pub destination_url: String,
    pub view_count: u64,
    pub custom_code_requested: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LinkResponse {
    pub fn new(summary: LinkSummary, base_url: &str) -> Self {
        Self {
            record_id: summary.record_id.get(),
            short_url: summary.short_code.to_url(base_url),
            short_code: summary.short_code.to_string(),
            destination_url: summary.destination_url,
            view_count: summary.view_count,
            custom_code_requested: summary.custom_code_requested,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}
