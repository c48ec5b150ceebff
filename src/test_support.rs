//! Stub catalog API for client and handler tests.

use std::collections::HashMap;
use std::net::TcpListener;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::models::catalog::{BookSummary, Page};
use crate::pagination::controller::tests::{book, catalog_page};

pub const STUDENT_COOKIE: &str = "sessionid=student";
pub const STAFF_COOKIE: &str = "sessionid=staff";
pub const KAR_ISBN: &str = "9789750719387";
/// A student whose catalog listing takes five seconds.
pub const SLOW_LIST_COOKIE: &str = "sessionid=student; slow=1";

pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener).unwrap()
        .serve(router.into_make_service());
    tokio::spawn(server);
    format!("http://{}", addr)
}

/// Starts the stub catalog and returns its API base, e.g. `http://127.0.0.1:4711/api`.
pub async fn spawn_catalog_stub() -> String {
    let router = Router::new()
        .route("/api/books/", get(list_books))
        .route("/api/books/search/", get(search_books))
        .route("/api/books/:isbn/", get(book_detail))
        .route("/api/auth/session/", get(session))
        .route("/api/auth/login/", post(login))
        .route("/api/auth/logout/", post(logout))
        .route("/api/member/profile/", get(profile))
        .route("/api/member/profile/update/", post(update_profile))
        .route("/api/member/borrowings/", get(borrowings));

    format!("{}/api", serve(router).await)
}

fn window(params: &HashMap<String, String>) -> (u32, u32) {
    let limit = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(50);
    let offset = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    (limit, offset)
}

fn member(headers: &HeaderMap) -> Option<&'static str> {
    let cookie = headers.get(COOKIE)?.to_str().ok()?;
    if cookie.contains(STUDENT_COOKIE) {
        Some("student")
    } else if cookie.contains(STAFF_COOKIE) {
        Some("staff")
    } else {
        None
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn kar() -> BookSummary {
    let mut kar = book(KAR_ISBN, "Kar");
    kar.explanation = "Kars'ta geçen, kar altında kalmış bir şehirde şiir ve siyaset üzerine bir roman.".to_string();
    kar.image = Some("https://covers.example/kar.jpg".to_string());
    kar
}

async fn list_books(Query(params): Query<HashMap<String, String>>, headers: HeaderMap) -> Json<Page> {
    let slow = headers.get(COOKIE)
        .and_then(|cookie| cookie.to_str().ok())
        .map_or(false, |cookie| cookie.contains("slow=1"));
    if slow {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
    let (_, offset) = window(&params);
    Json(catalog_page(120, offset))
}

async fn search_books(Query(params): Query<HashMap<String, String>>) -> Response {
    let query = params.get("q").map(|q| q.trim().to_string()).unwrap_or_default();
    let (limit, offset) = window(&params);
    let results = match query.as_str() {
        "" => return error(StatusCode::BAD_REQUEST, "Search query is required"),
        "yavaş" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            vec![]
        }
        "Pamuk" => vec![kar(), book("2", "Masumiyet Müzesi"), book("3", "Kırmızı Saçlı Kadın")],
        "script" => vec![book("4", "<script>alert(1)</script>")],
        "Roman" => return Json(catalog_page(80, offset)).into_response(),
        _ => vec![],
    };
    let total = results.len() as u32;
    let results: Vec<BookSummary> = results.into_iter().skip(offset as usize).take(limit as usize).collect();

    Json(json!({
        "results": results,
        "count": results.len(),
        "total": total,
        "offset": offset,
        "has_more": offset + limit < total,
    })).into_response()
}

async fn book_detail(Path(isbn): Path<String>) -> Response {
    if isbn == KAR_ISBN {
        Json(kar()).into_response()
    } else {
        error(StatusCode::NOT_FOUND, "Book not found")
    }
}

async fn session(headers: HeaderMap) -> Json<Value> {
    match member(&headers) {
        Some("student") => Json(json!({
            "logged_in": true, "user_id": 4, "name": "Ayşe Yılmaz", "type": "student", "username": "ayse"
        })),
        Some(_) => Json(json!({
            "logged_in": true, "user_id": 1, "name": "Mehmet Kaya", "type": "staff", "username": "mehmet"
        })),
        None => Json(json!({ "logged_in": false })),
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let (cookie, member_type, name) = match (username, password) {
        ("ayse", "1234") => (STUDENT_COOKIE, "student", "Ayşe Yılmaz"),
        ("mehmet", "1234") => (STAFF_COOKIE, "staff", "Mehmet Kaya"),
        _ => return error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    };

    (
        [(SET_COOKIE, format!("{}; Path=/; HttpOnly", cookie))],
        Json(json!({ "success": true, "user_id": 4, "name": name, "type": member_type })),
    ).into_response()
}

async fn logout() -> Response {
    (
        [(SET_COOKIE, "sessionid=\"\"; Max-Age=0; Path=/")],
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    ).into_response()
}

async fn profile(headers: HeaderMap) -> Response {
    if member(&headers) != Some("student") {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    Json(json!({
        "user_id": 4, "name": "Ayşe Yılmaz", "email": "ayse@example.com",
        "phone": "5551234567", "username": "ayse", "type": "student"
    })).into_response()
}

async fn update_profile(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if member(&headers) != Some("student") {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if body.get("password").is_some() && body["current_password"].as_str() != Some("1234") {
        return error(StatusCode::BAD_REQUEST, "Current password is incorrect");
    }
    Json(json!({ "success": true, "message": "Profile updated successfully" })).into_response()
}

async fn borrowings(headers: HeaderMap) -> Response {
    if member(&headers) != Some("student") {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    Json(json!({
        "borrowings": [
            {
                "borrow_id": 1,
                "book": { "isbn": KAR_ISBN, "name": "Kar", "author": "Orhan Pamuk", "image": null },
                "borrow_date": "2024-03-01", "last_return_date": "2024-03-15",
                "status": "late",
                "fine": { "amount": "12.50", "status": "unpaid", "date": "2024-03-20", "payment_date": null }
            },
            {
                "borrow_id": 2,
                "book": { "isbn": "2", "name": "Masumiyet Müzesi", "author": "Orhan Pamuk", "image": null },
                "borrow_date": "2024-04-01", "last_return_date": "2024-04-15",
                "status": "active",
                "fine": null
            }
        ],
        "count": 2
    })).into_response()
}
