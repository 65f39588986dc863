use crate::application::error::ErrorReport;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carta_api_types::ErrorDetail;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
    diagnostic: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            diagnostic: None,
        }
    }

    /// Keep `diagnostic` out of the body but in the logged report.
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, detail)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report_message = match &self.diagnostic {
            Some(diagnostic) => format!("{}: {diagnostic}", self.detail),
            None => self.detail.clone(),
        };
        let body = ErrorDetail {
            detail: self.detail,
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message("infra::http::api", self.status, report_message)
            .attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn renders_detail_body_and_attaches_report() {
        let response = ApiError::not_found("menu not found")
            .with_diagnostic("lookup by id")
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let report = response
            .extensions()
            .get::<ErrorReport>()
            .cloned()
            .expect("report attached");
        assert_eq!(report.messages, vec!["menu not found: lookup by id".to_string()]);

        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body, serde_json::json!({ "detail": "menu not found" }));
    }
}
