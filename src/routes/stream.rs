//! Stream proxy gateway
//!
//! Resolves a channel/VOD id to its stored origin URL, then forwards the
//! request transparently: method and essential headers pass through, the
//! response is streamed back with permissive CORS headers so browser
//! players can consume it cross-origin. No caching, no transcoding, no
//! inspection of the bytes.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::db::models::StreamSourceRow;
use crate::db::repository::{channels, vod};
use crate::error::{parse_id, ApiError};
use crate::models::catalog::ContentKind;
use crate::AppState;

// Re-export reqwest header module to avoid version conflicts
mod reqwest_header {
    pub use reqwest::header::{
        ACCEPT, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_TYPE, RANGE,
    };
}

/// Guess content type from URL
fn guess_content_type(url: &str) -> &'static str {
    let lower = url.to_lowercase();
    if lower.contains(".m3u8") {
        "application/vnd.apple.mpegurl"
    } else if lower.contains(".mp4") {
        "video/mp4"
    } else if lower.contains(".mkv") {
        "video/x-matroska"
    } else if lower.contains(".avi") {
        "video/x-msvideo"
    } else {
        "video/MP2T"
    }
}

/// A stored origin is playable when the row exists, is active and carries a
/// non-empty URL. Anything else is NotFound - and no network call is made.
fn playable_url(source: Option<StreamSourceRow>) -> Result<String, ApiError> {
    match source {
        Some(s) if s.is_active && !s.stream_url.trim().is_empty() => Ok(s.stream_url),
        _ => Err(ApiError::NotFound("Stream não encontrado".to_string())),
    }
}

/// Forward the request to the origin and stream the response back
async fn proxy_origin(
    state: &AppState,
    origin: &str,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    // The stored URL must be a well-formed http(s) URL before we dial out
    let parsed = url::Url::parse(origin)
        .map_err(|e| ApiError::UpstreamProxy(format!("invalid origin URL: {}", e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ApiError::UpstreamProxy(format!(
            "unsupported origin scheme: {}",
            parsed.scheme()
        )));
    }

    // One upstream connection per client request, bounded by the proxy timeout
    let client = Client::builder()
        .timeout(Duration::from_millis(state.config.stream_proxy_timeout_ms))
        .connect_timeout(Duration::from_millis(state.config.stream_proxy_timeout_ms))
        .user_agent(&state.config.user_agent)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| ApiError::UpstreamProxy(format!("failed to build client: {}", e)))?;

    let mut request = client.get(parsed);

    // Forward essential headers (using reqwest's header constants)
    if let Some(accept) = headers.get(header::ACCEPT) {
        if let Ok(accept_str) = accept.to_str() {
            request = request.header(reqwest_header::ACCEPT, accept_str);
        }
    } else {
        request = request.header(reqwest_header::ACCEPT, "*/*");
    }

    // Forward Range header for partial content requests
    if let Some(range) = headers.get(header::RANGE) {
        if let Ok(range_str) = range.to_str() {
            request = request.header(reqwest_header::RANGE, range_str);
        }
    }

    // Execute request; timeout is a distinct failure mode
    let upstream_response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ApiError::UpstreamTimeout
        } else {
            ApiError::UpstreamProxy(e.to_string())
        }
    })?;

    let upstream_status = upstream_response.status();

    // Content type from the origin, or guessed from the URL
    let content_type = upstream_response
        .headers()
        .get(reqwest_header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| guess_content_type(origin).to_string());

    // Build response headers: CORS for browser players, never cached
    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::CONTENT_TYPE,
        content_type
            .parse()
            .unwrap_or_else(|_| "video/MP2T".parse().unwrap()),
    );
    response_headers.insert(header::CACHE_CONTROL, "no-store".parse().unwrap());
    response_headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".parse().unwrap());
    response_headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        "GET, HEAD, OPTIONS".parse().unwrap(),
    );
    response_headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, "*".parse().unwrap());
    response_headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        "Content-Length, Content-Type, Accept-Ranges".parse().unwrap(),
    );

    // Forward optional headers from upstream
    if let Some(content_length) = upstream_response.headers().get(reqwest_header::CONTENT_LENGTH) {
        if let Ok(cl) = content_length.to_str() {
            if let Ok(parsed) = cl.parse() {
                response_headers.insert(header::CONTENT_LENGTH, parsed);
            }
        }
    }

    if let Some(accept_ranges) = upstream_response.headers().get(reqwest_header::ACCEPT_RANGES) {
        if let Ok(ar) = accept_ranges.to_str() {
            if let Ok(parsed) = ar.parse() {
                response_headers.insert(header::ACCEPT_RANGES, parsed);
            }
        }
    }

    // Stream the body back; dropping this stream on client disconnect
    // aborts the upstream connection
    let body = Body::from_stream(upstream_response.bytes_stream());

    let mut response = Response::builder()
        .status(StatusCode::from_u16(upstream_status.as_u16()).unwrap_or(StatusCode::OK));

    for (key, value) in response_headers.iter() {
        response = response.header(key, value);
    }

    response
        .body(body)
        .map_err(|e| ApiError::UpstreamProxy(format!("failed to build response: {}", e)))
}

/// GET /channels/:id/stream - Proxy a live channel stream
pub async fn channel_stream(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let source = channels::get_stream_source(&state.pool, id).await?;
    let origin = playable_url(source)?;

    tracing::debug!(channel_id = id, "proxying channel stream");
    proxy_origin(&state, &origin, &headers).await
}

/// GET /vod/movies/:id/stream - Proxy a movie stream
pub async fn movie_stream(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let source = vod::get_stream_source(&state.pool, ContentKind::Movie, id).await?;
    let origin = playable_url(source)?;

    tracing::debug!(movie_id = id, "proxying movie stream");
    proxy_origin(&state, &origin, &headers).await
}

/// GET /vod/series/:id/stream - Proxy a series stream
pub async fn series_stream(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let source = vod::get_stream_source(&state.pool, ContentKind::Series, id).await?;
    let origin = playable_url(source)?;

    tracing::debug!(series_id = id, "proxying series stream");
    proxy_origin(&state, &origin, &headers).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str, active: bool) -> Option<StreamSourceRow> {
        Some(StreamSourceRow {
            stream_url: url.to_string(),
            is_active: active,
        })
    }

    #[test]
    fn test_missing_row_is_not_found() {
        assert!(matches!(playable_url(None), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_inactive_or_empty_url_is_not_found() {
        assert!(matches!(
            playable_url(source("http://origin/live.m3u8", false)),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            playable_url(source("", true)),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            playable_url(source("   ", true)),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_active_source_resolves() {
        assert_eq!(
            playable_url(source("http://origin/live.m3u8", true)).unwrap(),
            "http://origin/live.m3u8"
        );
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(
            guess_content_type("http://x/playlist.m3u8?token=1"),
            "application/vnd.apple.mpegurl"
        );
        assert_eq!(guess_content_type("http://x/movie.mp4"), "video/mp4");
        assert_eq!(guess_content_type("http://x/live/123"), "video/MP2T");
    }
}
