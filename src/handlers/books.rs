use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, TypedHeader};
use headers::Cookie;
use log::info;
use serde_derive::Deserialize;

use crate::app_state::AppState;
use crate::handlers::{current_session, forwarded_cookie, view_id, visitor};
use crate::models::errors::{ApiError, FetchError};
use crate::pagination::{LoadOutcome, PaginationController};
use crate::render::escape_html;
use crate::render::pages;
use crate::view_registry::ViewRegistry;

#[derive(Deserialize, Debug)]
pub struct SearchParams {
    pub q: Option<String>,
    pub view: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ViewParams {
    pub view: Option<String>,
}

fn first_page_error(err: &FetchError, searching: bool) -> String {
    match (err, searching) {
        (FetchError::Timeout, true) => "Arama zaman aşımına uğradı. Lütfen daha spesifik bir arama yapın.".to_string(),
        (FetchError::Timeout, false) => "Yükleme zaman aşımına uğradı. Lütfen sayfayı yenileyin.".to_string(),
        _ => err.user_message(),
    }
}

fn resolve_view(
    views: &ViewRegistry,
    requested: Option<&str>,
    cookies: &Option<TypedHeader<Cookie>>,
) -> Option<(String, Arc<PaginationController>)> {
    let view_id = requested.filter(|id| !id.is_empty()).or_else(|| view_id(cookies))?;
    views.get(view_id).map(|controller| (view_id.to_string(), controller))
}

fn books_location(view_id: &str) -> String {
    format!("/books?view={}", urlencoding::encode(view_id))
}

// Without a `view` parameter every page load opens its own view.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
) -> Response {
    let cookie = forwarded_cookie(&headers);
    let session = current_session(&state, cookie).await;
    if !session.logged_in {
        return Html(pages::login_page(None)).into_response();
    }

    let requested = params.view.as_deref().filter(|id| !id.is_empty());
    let (view_id, controller) = state.views.get_or_create(requested).await;
    let source = state.catalog.authorized(cookie);
    let query = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let result = match query {
        Some(query) => {
            info!("search \"{}\" in view {}", query, view_id);
            controller.start_search(&source, query).await
        }
        None => controller.load_all(&source).await,
    };

    let (query_state, books) = controller.snapshot_with_books();
    let error = result.err().map(|err| first_page_error(&err, query_state.is_search()));
    let page = pages::books_page(
        &visitor(&state, &session),
        &view_id,
        &query_state,
        &books,
        error.as_deref(),
        state.config.explanation_preview_len,
    );

    ([(SET_COOKIE, ViewRegistry::view_cookie(&view_id))], Html(page)).into_response()
}

pub async fn current(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
    cookies: Option<TypedHeader<Cookie>>,
    headers: HeaderMap,
) -> Response {
    let cookie = forwarded_cookie(&headers);
    let session = current_session(&state, cookie).await;
    if !session.logged_in {
        return Html(pages::login_page(None)).into_response();
    }

    let (view_id, controller) = match resolve_view(&state.views, params.view.as_deref(), &cookies) {
        Some(view) => view,
        None => return Redirect::to("/").into_response(),
    };

    let (query_state, books) = controller.snapshot_with_books();
    Html(pages::books_page(
        &visitor(&state, &session),
        &view_id,
        &query_state,
        &books,
        None,
        state.config.explanation_preview_len,
    )).into_response()
}

pub async fn load_more(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
    headers: HeaderMap,
    form: Option<Form<ViewParams>>,
) -> Response {
    let cookie = forwarded_cookie(&headers);
    let params = form.map(|Form(params)| params).unwrap_or_default();
    let (view_id, controller) = match resolve_view(&state.views, params.view.as_deref(), &cookies) {
        Some(view) => view,
        None => return Redirect::to("/").into_response(),
    };

    match controller.load_more(&state.catalog.authorized(cookie)).await {
        Ok(_) | Err(FetchError::EmptyResult) => Redirect::to(&books_location(&view_id)).into_response(),
        Err(err) => {
            let session = current_session(&state, cookie).await;
            let (query_state, books) = controller.snapshot_with_books();
            let message = format!("Daha fazla kitap yüklenirken bir hata oluştu. {}", err.user_message());
            Html(pages::books_page(
                &visitor(&state, &session),
                &view_id,
                &query_state,
                &books,
                Some(&message),
                state.config.explanation_preview_len,
            )).into_response()
        }
    }
}

// `view` comes from the posted form or the query string.
pub async fn load_more_fragment(
    State(state): State<AppState>,
    Query(query): Query<ViewParams>,
    cookies: Option<TypedHeader<Cookie>>,
    headers: HeaderMap,
    form: Option<Form<ViewParams>>,
) -> Response {
    let cookie = forwarded_cookie(&headers);
    let requested = form.and_then(|Form(params)| params.view).or(query.view);
    let (view_id, controller) = match resolve_view(&state.views, requested.as_deref(), &cookies) {
        Some(view) => view,
        None => return ApiError::new("Oturum bulunamadı, sayfayı yenileyin.", StatusCode::NOT_FOUND).into_response(),
    };

    let preview_len = state.config.explanation_preview_len;
    match controller.load_more(&state.catalog.authorized(cookie)).await {
        Ok(LoadOutcome::Appended { books, state: query_state }) => {
            Html(pages::load_more_fragment(&books, &view_id, &query_state, preview_len)).into_response()
        }
        Ok(outcome) => Html(pages::load_more_fragment(&[], &view_id, outcome.state(), preview_len)).into_response(),
        Err(err) => {
            let fragment = format!(
                r#"<p class="message-error">{}</p>{}"#,
                escape_html(&err.user_message()),
                pages::load_more_fragment(&[], &view_id, &controller.snapshot(), preview_len)
            );
            (err.status_code(), Html(fragment)).into_response()
        }
    }
}

pub async fn detail(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let cookie = forwarded_cookie(&headers);
    let session = current_session(&state, cookie).await;
    if !session.logged_in {
        return Ok(Html(pages::login_page(None)).into_response());
    }

    let book = state.catalog.get_book(&isbn, cookie).await
        .map_err(|err| match err {
            FetchError::HttpError { status: 404, .. } => ApiError::new("Kitap bulunamadı.", StatusCode::NOT_FOUND),
            err => ApiError::from(err),
        })?;

    Ok(Html(pages::book_detail_page(&visitor(&state, &session), &book)).into_response())
}

// `/books/more` shadows `/books/:isbn` for this one ISBN.
pub async fn detail_more(state: State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    detail(state, Path("more".to_string()), headers).await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::config::app_config::AppConfig;
    use crate::handlers::tests::{app, app_with, body_text, get, post_form, send, set_cookie};
    use crate::test_support::{KAR_ISBN, SLOW_LIST_COOKIE, STUDENT_COOKIE};

    fn with_view(view: &str) -> String {
        format!("{}; {}", STUDENT_COOKIE, view)
    }

    #[tokio::test]
    async fn anonymous_visitor_sees_login() {
        let (app, _) = app().await;

        let (status, response) = send(&app, get("/", "")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body_text(response).await.contains("loginForm"));
    }

    #[tokio::test]
    async fn index_lists_first_page_and_sets_view_cookie() {
        let (app, _) = app().await;

        let (status, response) = send(&app, get("/", STUDENT_COOKIE)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(set_cookie(&response, "portal_view").is_some());
        let html = body_text(response).await;
        assert_eq!(html.matches(r#"<article class="book-card""#).count(), 50);
        assert!(html.contains("50 / 120 kitap gösteriliyor"));
        assert!(html.contains("Toplam 120 kitap"));
    }

    #[tokio::test]
    async fn pamuk_search_renders_three_cards_without_load_more() {
        let (app, _) = app().await;

        let (_, response) = send(&app, get("/?q=Pamuk", STUDENT_COOKIE)).await;
        let html = body_text(response).await;

        assert_eq!(html.matches(r#"<article class="book-card""#).count(), 3);
        assert!(html.contains(r#"<div id="loadMoreContainer"></div>"#));
        assert!(html.contains("için 3 sonuç bulundu."));
    }

    #[tokio::test]
    async fn script_in_catalog_data_is_escaped() {
        let (app, _) = app().await;

        let (_, response) = send(&app, get("/?q=script", STUDENT_COOKIE)).await;
        let html = body_text(response).await;

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[tokio::test]
    async fn load_more_walks_the_catalog() {
        let (app, _) = app().await;
        let (_, response) = send(&app, get("/", STUDENT_COOKIE)).await;
        let view = set_cookie(&response, "portal_view").unwrap();

        let (_, response) = send(&app, post_form("/fragments/books/more", &with_view(&view), "")).await;
        let fragment = body_text(response).await;
        assert_eq!(fragment.matches(r#"<article class="book-card""#).count(), 50);
        assert!(fragment.contains("100 / 120"));
        assert!(!fragment.contains("<html"));

        let (status, response) = send(&app, post_form("/books/more", &with_view(&view), "")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        let view_id = view.trim_start_matches("portal_view=");
        assert_eq!(response.headers()["location"], format!("/books?view={}", view_id).as_str());

        let (_, response) = send(&app, get("/books", &with_view(&view))).await;
        let html = body_text(response).await;
        assert_eq!(html.matches(r#"<article class="book-card""#).count(), 120);
        assert!(!html.contains("Daha Fazla Yükle"));

        let (status, response) = send(&app, post_form("/fragments/books/more", &with_view(&view), "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_text(response).await, r#"<div id="loadMoreContainer"></div>"#);
    }

    #[tokio::test]
    async fn load_more_without_view_redirects_home() {
        let (app, _) = app().await;

        let (status, response) = send(&app, post_form("/books/more", STUDENT_COOKIE, "")).await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/");
    }

    #[tokio::test]
    async fn detail_shows_full_explanation() {
        let (app, _) = app().await;

        let (status, response) = send(&app, get(&format!("/books/{}", KAR_ISBN), STUDENT_COOKIE)).await;
        let html = body_text(response).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("şiir ve siyaset üzerine bir roman."));
        assert!(html.contains("book-detail-image"));
    }

    #[tokio::test]
    async fn missing_book_is_404_page() {
        let (app, _) = app().await;

        let (status, response) = send(&app, get("/books/missing", STUDENT_COOKIE)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Kitap bulunamadı."));
    }

    fn cards(html: &str) -> usize {
        html.matches(r#"<article class="book-card""#).count()
    }

    fn rendered_view(html: &str) -> String {
        let marker = r#"<input type="hidden" name="view" value=""#;
        let start = html.find(marker).unwrap() + marker.len();
        html[start..].split('"').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn tabs_page_their_own_lists() {
        let (app, _) = app().await;

        let (_, response) = send(&app, get("/?q=Roman", STUDENT_COOKIE)).await;
        let roman_view = rendered_view(&body_text(response).await);
        let (_, response) = send(&app, get("/", STUDENT_COOKIE)).await;
        let all_view = set_cookie(&response, "portal_view").unwrap();
        assert_ne!(all_view, format!("portal_view={}", roman_view));

        let form = format!("view={}", roman_view);
        let (status, _) = send(&app, post_form("/books/more", &with_view(&all_view), &form)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let uri = format!("/books?view={}", roman_view);
        let (_, response) = send(&app, get(&uri, &with_view(&all_view))).await;
        let html = body_text(response).await;
        assert!(html.contains("&quot;Roman&quot; için 80 sonuç bulundu."));
        assert_eq!(cards(&html), 80);

        let uri = format!("/fragments/books/more?view={}", roman_view);
        let (_, response) = send(&app, post_form(&uri, &with_view(&all_view), "")).await;
        assert_eq!(body_text(response).await, r#"<div id="loadMoreContainer"></div>"#);

        let (_, response) = send(&app, get("/books", &with_view(&all_view))).await;
        let html = body_text(response).await;
        assert!(html.contains("Toplam 120 kitap"));
        assert_eq!(cards(&html), 50);
    }

    #[tokio::test]
    async fn search_form_keeps_the_tab_view() {
        let (app, _) = app().await;

        let (_, response) = send(&app, get("/", STUDENT_COOKIE)).await;
        let view = rendered_view(&body_text(response).await);

        let (_, response) = send(&app, get(&format!("/?q=Pamuk&view={}", view), STUDENT_COOKIE)).await;

        assert_eq!(set_cookie(&response, "portal_view"), Some(format!("portal_view={}", view)));
        assert_eq!(cards(&body_text(response).await), 3);
    }

    #[tokio::test]
    async fn search_timeout_is_not_an_empty_result() {
        let (app, _) = app_with(AppConfig { request_timeout_secs: 1, ..AppConfig::default() }).await;

        let (status, response) = send(&app, get("/?q=yava%C5%9F", STUDENT_COOKIE)).await;
        let html = body_text(response).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Arama zaman aşımına uğradı. Lütfen daha spesifik bir arama yapın."));
        assert!(html.contains("&quot;yavaş&quot; araması zaman aşımına uğradı."));
        assert!(!html.contains("sonuç bulundu"));
    }

    #[tokio::test]
    async fn listing_timeout_asks_for_reload() {
        let (app, _) = app_with(AppConfig { request_timeout_secs: 1, ..AppConfig::default() }).await;

        let (_, response) = send(&app, get("/", SLOW_LIST_COOKIE)).await;
        let html = body_text(response).await;

        assert!(html.contains("Yükleme zaman aşımına uğradı. Lütfen sayfayı yenileyin."));
        assert!(html.contains("Kitaplar yüklenirken zaman aşımı oldu."));
        assert!(!html.contains("Kitaplar gösteriliyor"));
    }

    #[tokio::test]
    async fn isbn_named_more_still_has_a_detail_page() {
        let (app, _) = app().await;

        let (status, response) = send(&app, get("/books/more", STUDENT_COOKIE)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Kitap bulunamadı."));
    }
}
