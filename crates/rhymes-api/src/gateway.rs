//! Offline gateway
//!
//! Every path the API does not claim is mapped onto the static origin and
//! answered by the cache manager. Request bodies are not forwarded.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method as HttpMethod, StatusCode, Uri},
    response::{IntoResponse, Response as HttpResponse},
};
use rhymes_core::{join_url, Method, Request, Response};
use std::sync::Arc;
use tracing::warn;

use crate::rest::AppState;

/// Answer a request through the cache manager
pub async fn proxy(
    State(state): State<Arc<AppState>>,
    method: HttpMethod,
    uri: Uri,
    headers: HeaderMap,
) -> HttpResponse {
    let request = to_request(&state.origin, &method, &uri, &headers);

    match state.manager.handle(&request).await {
        Ok(response) => into_http(response),
        Err(e) => {
            warn!(url = %request.url, error = %e, "Gateway request failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

/// Build the origin request for an incoming one
pub fn to_request(origin: &str, method: &HttpMethod, uri: &Uri, headers: &HeaderMap) -> Request {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let url = join_url(origin, path);

    let request = if is_navigation(headers) {
        Request::navigate(url)
    } else {
        Request::get(url)
    };
    request.with_method(Method::parse(method.as_str()))
}

fn is_navigation(headers: &HeaderMap) -> bool {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase()
    };

    let fetch_mode = header_str("sec-fetch-mode");
    if !fetch_mode.is_empty() {
        return fetch_mode == "navigate";
    }
    header_str(header::ACCEPT.as_str()).contains("text/html")
}

fn into_http(response: Response) -> HttpResponse {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut http = (status, Body::from(response.body)).into_response();

    if let Some(value) = response
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        http.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    http
}
