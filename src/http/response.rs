//! Response relay.
//!
//! Only `Content-Type` and `Content-Length` survive from the provider's
//! headers. The same rule applies to error statuses, so provider internals
//! never reach the caller on any path.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, Response,
    },
};

use crate::upstream::UpstreamResponse;

/// Subset of `upstream` headers forwarded to the caller.
pub fn relayed_headers(upstream: &HeaderMap, body_len: usize) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(2);

    if let Some(content_type) = upstream.get(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, content_type.clone());
    }

    // A length that disagrees with the buffered body would corrupt framing.
    if let Some(content_length) = upstream.get(CONTENT_LENGTH) {
        let matches = content_length
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            == Some(body_len);
        if matches {
            headers.insert(CONTENT_LENGTH, content_length.clone());
        }
    }

    headers
}

/// Convert a buffered provider response into the caller's response.
pub fn relay(upstream: UpstreamResponse) -> Response<Body> {
    let headers = relayed_headers(&upstream.headers, upstream.body.len());

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = headers;
    response
}
