use axum::routing::{any, get, post};
use axum::Router;

use crate::app_state::AppState;
use crate::handlers::{auth, books, errors, health, member, proxy};

fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(books::index))
        .route("/index.html", get(books::index))
        .route("/books", get(books::current))
        .route("/books/more", post(books::load_more).get(books::detail_more))
        .route("/books/:isbn", get(books::detail))
        .route("/fragments/books/more", post(books::load_more_fragment))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/profile", get(member::profile).post(member::update_profile))
        .route("/profilim.html", get(member::profile))
        .route("/profile/password", post(member::change_password))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api", any(proxy::proxy_handler))
        .route("/api/*path", any(proxy::proxy_handler))
        .route("/health", get(health::health_check))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(book_routes())
        .merge(member_routes())
        .merge(api_routes())
        .fallback(errors::not_found)
        .with_state(state)
}
