use serde::{Deserialize, Serialize};
use tinylink_shortener::ShortenParams;

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub shortcode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of the HTML form on the home page.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub shortcode: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl From<CreateUrlRequest> for ShortenParams {
    fn from(value: CreateUrlRequest) -> Self {
        ShortenParams {
            url: value.url.unwrap_or_default(),
            shortcode: value.shortcode,
        }
    }
}

impl From<ShortenForm> for ShortenParams {
    fn from(value: ShortenForm) -> Self {
        ShortenParams {
            url: value.url.unwrap_or_default(),
            shortcode: value.shortcode,
        }
    }
}
