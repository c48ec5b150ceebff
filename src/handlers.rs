use headers::Cookie;
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use log::warn;

use crate::app_state::AppState;
use crate::models::member::Session;
use crate::render::pages::Visitor;
use crate::view_registry::VIEW_COOKIE;

pub mod auth;
pub mod books;
pub mod errors;
pub mod health;
pub mod member;
pub mod proxy;

pub fn forwarded_cookie(headers: &HeaderMap) -> Option<&str> {
    headers.get(COOKIE).and_then(|value| value.to_str().ok())
}

pub fn view_id(cookie: &Option<axum::TypedHeader<Cookie>>) -> Option<&str> {
    cookie.as_ref().and_then(|cookie| cookie.get(VIEW_COOKIE))
}

// An unreachable catalog counts as logged out.
pub async fn current_session(state: &AppState, cookie: Option<&str>) -> Session {
    match state.catalog.session(cookie).await {
        Ok(session) => session,
        Err(err) => {
            warn!("session check failed: {}", err);
            Session::default()
        }
    }
}

pub fn visitor(state: &AppState, session: &Session) -> Visitor {
    Visitor::from_session(session, &state.config.staff_panel_url)
}
