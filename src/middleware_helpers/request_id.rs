use crate::tracing::RequestId;
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Header name for the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assigns every request an ID (honoring a caller-supplied `x-request-id`),
/// exposes it to handlers via extensions and the task-local scope, and echoes
/// it on the response. The HTTP trace span picks the ID up from the extension.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let incoming = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(RequestId::new);
    let request_id = incoming.unwrap_or_default();

    // Generated IDs are UUIDs and incoming ones survived to_str, so both are valid header values
    let header_value = HeaderValue::from_str(request_id.as_str())
        .expect("request ID contains only valid header characters");

    request
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value.clone());
    request.extensions_mut().insert(request_id.clone());

    let mut response =
        crate::tracing::scope_request_id(request_id, async move { next.run(request).await }).await;

    response
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);

    response
}
