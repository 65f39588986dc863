//! Request scoping and failure logging.
//!
//! Every request runs inside a `catalog_request` span carrying its request id
//! and the catalog ids named by the path, so service and cache logs can be
//! joined to the request that caused them.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, error, info_span, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const API_PREFIX: &str = "/api/v1/menus";
const MAX_REQUEST_ID_LEN: usize = 128;

/// Raw path segments naming catalog entities. Not validated as uuids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTarget {
    pub menu_id: Option<String>,
    pub submenu_id: Option<String>,
    pub dish_id: Option<String>,
}

impl CatalogTarget {
    pub fn from_path(path: &str) -> Self {
        let Some(rest) = path.strip_prefix(API_PREFIX) else {
            return Self::default();
        };
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

        let mut target = Self::default();
        match segments.as_slice() {
            ["tree"] | [] => {}
            [menu, tail @ ..] => {
                target.menu_id = Some((*menu).to_string());
                if let ["submenus", submenu, tail @ ..] = tail {
                    target.submenu_id = Some((*submenu).to_string());
                    if let ["dishes", dish, ..] = tail {
                        target.dish_id = Some((*dish).to_string());
                    }
                }
            }
        }
        target
    }

    fn field(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub target: CatalogTarget,
}

/// Reuse a caller-supplied request id when it is printable and short.
fn incoming_request_id(request: &Request<Body>) -> Option<String> {
    let value = request.headers().get(&REQUEST_ID_HEADER)?.to_str().ok()?;
    let trimmed = value.trim();
    (!trimmed.is_empty() && trimmed.len() <= MAX_REQUEST_ID_LEN).then(|| trimmed.to_string())
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id =
        incoming_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());
    let ctx = RequestContext {
        request_id,
        target: CatalogTarget::from_path(request.uri().path()),
    };
    request.extensions_mut().insert(ctx.clone());

    let span = info_span!(
        "catalog_request",
        request_id = %ctx.request_id,
        menu_id = CatalogTarget::field(&ctx.target.menu_id),
        submenu_id = CatalogTarget::field(&ctx.target.submenu_id),
        dish_id = CatalogTarget::field(&ctx.target.dish_id),
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response.extensions_mut().insert(ctx);
    response
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let ctx = request.extensions().get::<RequestContext>().cloned();
    let start = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (source, chain) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("router", Vec::new()),
    };
    let detail = chain.first().map(String::as_str).unwrap_or("no diagnostic");
    let request_id = ctx.as_ref().map(|ctx| ctx.request_id.as_str()).unwrap_or("");
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        error!(
            target = "carta::http::response",
            status = status.as_u16(),
            %method,
            path,
            elapsed_ms,
            source,
            detail,
            chain = ?chain,
            request_id,
            "Catalog request failed"
        );
    } else {
        warn!(
            target = "carta::http::response",
            status = status.as_u16(),
            %method,
            path,
            elapsed_ms,
            source,
            detail,
            request_id,
            "Catalog request rejected"
        );
    }

    response
}
