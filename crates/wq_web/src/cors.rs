use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfig {
    /// `*`: any origin, without credentials.
    AnyOrigin,
    Origins(Vec<String>),
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::from_list(DEFAULT_ALLOWED_ORIGINS)
    }
}

impl CorsConfig {
    /// Parses the comma separated `ALLOWED_ORIGINS` value.
    pub fn from_list(raw: &str) -> Self {
        if raw.trim() == "*" {
            return CorsConfig::AnyOrigin;
        }
        CorsConfig::Origins(
            raw.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn layer(&self) -> CorsLayer {
        match self {
            CorsConfig::AnyOrigin => CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
            CorsConfig::Origins(origins) => {
                let origins: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|o| match HeaderValue::from_str(o) {
                        Ok(v) => Some(v),
                        Err(e) => {
                            tracing::warn!("Ignoring invalid CORS origin '{}': {}", o, e);
                            None
                        }
                    })
                    .collect();
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(AllowMethods::mirror_request())
                    .allow_headers(AllowHeaders::mirror_request())
                    .allow_credentials(true)
            }
        }
    }
}
