//! Debug logging of request and response bodies.
//!
//! Enabled with `server.log_bodies`. Bodies are buffered, logged at debug
//! level (truncated) and passed on unchanged.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;

const MAX_LOGGED_BYTES: usize = 4096;

/// Same cap as axum's default body limit for extractors.
const MAX_BUFFERED_BYTES: usize = 2 * 1024 * 1024;

pub async fn log_bodies(request: Request, next: Next) -> Result<Response, Response> {
    let (parts, body) = request.into_parts();
    let target = format!("{} {}", parts.method, parts.uri);
    let bytes = buffer_and_log("request", &target, body).await?;
    let request = Request::from_parts(parts, Body::from(bytes));

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = buffer_and_log("response", &target, body).await?;
    Ok(Response::from_parts(parts, Body::from(bytes)))
}

async fn buffer_and_log(direction: &str, target: &str, body: Body) -> Result<Bytes, Response> {
    let bytes = match to_bytes(body, MAX_BUFFERED_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            let err = err.into_inner();
            if err.is::<LengthLimitError>() {
                tracing::warn!("{direction} body of {target} exceeds {MAX_BUFFERED_BYTES} bytes");
                return Err((StatusCode::PAYLOAD_TOO_LARGE, "body too large").into_response());
            }
            tracing::error!("failed to read {direction} body of {target}: {err}");
            return Err((StatusCode::BAD_REQUEST, "invalid body").into_response());
        }
    };

    if !bytes.is_empty() {
        tracing::debug!(
            direction,
            target,
            body = %truncated(&bytes),
            "http body"
        );
    }
    Ok(bytes)
}

fn truncated(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(MAX_LOGGED_BYTES)];
    let mut text = String::from_utf8_lossy(shown).into_owned();
    if bytes.len() > MAX_LOGGED_BYTES {
        text.push_str(&format!("... ({} bytes)", bytes.len()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_bodies_are_truncated() {
        let body = vec![b'a'; MAX_LOGGED_BYTES + 10];
        let text = truncated(&body);
        assert!(text.ends_with(&format!("... ({} bytes)", MAX_LOGGED_BYTES + 10)));
        assert_eq!(truncated(b"{}"), "{}");
    }

    #[tokio::test]
    async fn oversized_bodies_are_refused() {
        let body = Body::from(vec![b'a'; MAX_BUFFERED_BYTES + 1]);
        let response = buffer_and_log("request", "POST /api/expenses", body)
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let bytes = buffer_and_log("request", "POST /api/expenses", Body::from("{}"))
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"{}");
    }
}
