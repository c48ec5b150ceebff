use axum::http::{StatusCode, Uri};
use log::debug;

use crate::models::errors::ApiError;

pub async fn not_found(uri: Uri) -> ApiError {
    debug!("no route for {}", uri);
    ApiError::new("Sayfa bulunamadı.", StatusCode::NOT_FOUND)
}
