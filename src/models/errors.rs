use std::fmt;
use std::fmt::{Display, Formatter};

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::render::pages;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP error {status}")]
    HttpError { status: u16, message: Option<String> },
    #[error("no results")]
    EmptyResult,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::InvalidResponse(err.to_string())
        } else {
            FetchError::NetworkFailure(err.to_string())
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout)
    }

    pub fn user_message(&self) -> String {
        match self {
            FetchError::Timeout => "İstek zaman aşımına uğradı. Lütfen tekrar deneyin.".to_string(),
            FetchError::NetworkFailure(_) => "Bağlantı hatası. Lütfen tekrar deneyin.".to_string(),
            FetchError::HttpError { message: Some(message), .. } => message.clone(),
            FetchError::HttpError { .. } | FetchError::InvalidResponse(_) =>
                "İstek sırasında bir hata oluştu.".to_string(),
            FetchError::EmptyResult => "Gösterilecek başka kitap yok.".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            FetchError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            FetchError::HttpError { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            FetchError::EmptyResult => StatusCode::NOT_FOUND,
            FetchError::NetworkFailure(_) | FetchError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub code: StatusCode,
}

#[derive(Debug, Clone)]
pub struct ProxyError {
    pub message: String,
}

impl Display for ProxyError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({} - {})", self.code.as_str(), self.message)
    }
}

impl ApiError {
    pub fn new<S: AsRef<str>>(message: S, code: StatusCode) -> Self {
        Self {
            message: message.as_ref().to_string(),
            code,
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError::new(err.user_message(), err.status_code())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code, Html(pages::error_page(&self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_prefers_server_message() {
        let err = FetchError::HttpError { status: 400, message: Some("Search query is required".to_string()) };
        assert_eq!(err.user_message(), "Search query is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = FetchError::HttpError { status: 500, message: None };
        assert_eq!(err.user_message(), "İstek sırasında bir hata oluştu.");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn timeout_differs_from_network_failure() {
        let timeout = FetchError::Timeout;
        let network = FetchError::NetworkFailure("connection refused".to_string());

        assert!(timeout.is_timeout());
        assert!(!network.is_timeout());
        assert_ne!(timeout.user_message(), network.user_message());
        assert!(timeout.user_message().contains("tekrar deneyin"));
        assert!(network.user_message().contains("tekrar deneyin"));
    }

    #[tokio::test]
    async fn api_error_renders_an_html_page() {
        let err = ApiError::new("<b>Kitap bulunamadı.</b>", StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "(404 - <b>Kitap bulunamadı.</b>)");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(r#"<p class="message-error">&lt;b&gt;Kitap bulunamadı.&lt;/b&gt;</p>"#));
    }
}
