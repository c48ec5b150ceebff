use axum::Json;
use serde_derive::Serialize;

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::handlers::tests::{app, body_text, get, send};

    #[tokio::test]
    async fn reports_ok() {
        let (app, _) = app().await;

        let (status, response) = send(&app, get("/health", "")).await;
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "libportal");
    }
}
