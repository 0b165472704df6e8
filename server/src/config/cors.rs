use axum::http::HeaderValue;
use std::env;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

/// Every method and header is allowed. Origins are open unless
/// `CORS_ALLOWED_ORIGINS` narrows them.
pub fn create_cors_layer() -> CorsLayer {
    cors_layer(env::var("CORS_ALLOWED_ORIGINS").ok().as_deref())
}

pub fn cors_layer(origins: Option<&str>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

fn allowed_origins(origins: Option<&str>) -> AllowOrigin {
    let origins: Vec<HeaderValue> = origins
        .unwrap_or_default()
        .split(',')
        .filter_map(|origin| {
            let trimmed = origin.trim();
            if trimmed.is_empty() {
                None
            } else {
                match trimmed.parse::<HeaderValue>() {
                    Ok(value) => {
                        tracing::debug!("CORS: Allowing origin: {}", trimmed);
                        Some(value)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                        None
                    }
                }
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::info!("CORS: All origins allowed");
        // Mirrored rather than `*` so credentials stay allowed.
        AllowOrigin::mirror_request()
    } else {
        tracing::info!("CORS: Configured with {} allowed origin(s)", origins.len());
        AllowOrigin::list(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cors_layer() {
        // Should not panic when creating the CORS layer
        let _layer = cors_layer(None);
        let _layer = cors_layer(Some("http://localhost:3000, ,http://localhost:5173"));
    }
}
