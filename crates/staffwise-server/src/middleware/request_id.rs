//! Per-request correlation ids.
//!
//! A caller-supplied `x-request-id` is reused when it is a short printable
//! value; otherwise a v4 UUID is minted. The id is echoed on the response,
//! attached to a `request` tracing span, and kept in a task-local so error
//! bodies built deeper in the stack can report it.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

const MAX_INCOMING_LEN: usize = 128;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Id of the request being served by the current task.
pub fn current() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

fn incoming_id(request: &Request<Body>) -> Option<String> {
    let raw = request.headers().get(&X_REQUEST_ID)?.to_str().ok()?.trim();
    (!raw.is_empty() && raw.len() <= MAX_INCOMING_LEN).then(|| raw.to_string())
}

pub async fn request_id_middleware(request: Request<Body>, next: Next) -> Response {
    let id = incoming_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());
    let span = tracing::info_span!("request", request_id = %id);

    let mut response = REQUEST_ID
        .scope(id.clone(), next.run(request))
        .instrument(span)
        .await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID.clone(), value);
    }
    response
}
