use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use axum::Form;
use log::{info, warn};
use serde_derive::Deserialize;

use crate::app_state::AppState;
use crate::handlers::forwarded_cookie;
use crate::models::errors::FetchError;
use crate::models::member::{LoginRequest, MemberType};
use crate::render::pages;

#[derive(Deserialize, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_form() -> Html<String> {
    Html(pages::login_page(None))
}

fn login_failed(status: StatusCode, message: &str) -> Response {
    (status, Html(pages::login_page(Some(message)))).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let credentials = LoginRequest { username: form.username, password: form.password };
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        return login_failed(StatusCode::BAD_REQUEST, "Kullanıcı adı ve şifre gerekli.");
    }

    let response = match state.catalog.login(&credentials, forwarded_cookie(&headers)).await {
        Ok(response) => response,
        Err(err @ FetchError::HttpError { .. }) => {
            info!("login rejected for {}", credentials.username);
            return login_failed(err.status_code(), &err.user_message());
        }
        Err(err) => {
            warn!("login failed: {}", err);
            return login_failed(err.status_code(), "Bağlantı hatası");
        }
    };

    if !response.body.success {
        let message = response.body.error.unwrap_or_else(|| "Giriş başarısız".to_string());
        return login_failed(StatusCode::UNAUTHORIZED, &message);
    }

    let target = match response.body.member_type {
        Some(MemberType::Staff) => state.config.staff_panel_url.clone(),
        _ => "/".to_string(),
    };
    info!("{} logged in", credentials.username);

    (
        AppendHeaders(response.set_cookies.into_iter().map(|cookie| (SET_COOKIE, cookie))),
        Redirect::to(&target),
    ).into_response()
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let set_cookies = match state.catalog.logout(forwarded_cookie(&headers)).await {
        Ok(set_cookies) => set_cookies,
        Err(err) => {
            warn!("logout error: {}", err);
            Vec::new()
        }
    };

    (
        AppendHeaders(set_cookies.into_iter().map(|cookie| (SET_COOKIE, cookie))),
        Redirect::to("/"),
    ).into_response()
}
