use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use log::warn;
use serde_derive::Deserialize;

use crate::app_state::AppState;
use crate::handlers::{current_session, forwarded_cookie, visitor};
use crate::models::member::ProfileUpdate;
use crate::render::member::Notice;
use crate::render::pages::{self, ProfileView};

pub const MIN_PASSWORD_CHARS: usize = 4;

#[derive(Deserialize, Debug)]
pub struct ProfileForm {
    pub email: String,
    pub phone: String,
}

#[derive(Deserialize, Debug)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub fn validate_password_change(form: &PasswordForm) -> Result<(), &'static str> {
    if form.new_password != form.confirm_password {
        return Err("Yeni şifreler eşleşmiyor!");
    }
    if form.new_password.chars().count() < MIN_PASSWORD_CHARS {
        return Err("Şifre en az 4 karakter olmalıdır!");
    }
    Ok(())
}

async fn render_profile(
    state: &AppState,
    headers: &HeaderMap,
    profile_notice: Option<Notice>,
    password_notice: Option<Notice>,
) -> Response {
    let cookie = forwarded_cookie(headers);
    let session = current_session(state, cookie).await;
    let visitor = visitor(state, &session);
    if !session.is_student() {
        return Html(pages::login_required_page(&visitor)).into_response();
    }

    let (borrowings, profile) = tokio::join!(
        state.catalog.borrowings(cookie),
        state.catalog.profile(cookie),
    );
    let borrowings = borrowings.map_err(|err| {
        warn!("borrowings unavailable: {}", err);
        "Ödünç alma kayıtları yüklenemedi.".to_string()
    });
    let profile = profile
        .map_err(|err| warn!("profile unavailable: {}", err))
        .ok();

    let view = ProfileView {
        profile: profile.as_ref(),
        borrowings: borrowings.as_ref().map(|b| b.borrowings.as_slice()).map_err(|e| e.clone()),
        profile_notice: profile_notice.as_ref(),
        password_notice: password_notice.as_ref(),
    };
    Html(pages::profile_page(&visitor, &view)).into_response()
}

pub async fn profile(State(state): State<AppState>, headers: HeaderMap) -> Response {
    render_profile(&state, &headers, None, None).await
}

pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ProfileForm>,
) -> Response {
    let update = ProfileUpdate {
        email: Some(form.email.trim().to_string()),
        phone: Some(form.phone.trim().to_string()),
        ..ProfileUpdate::default()
    };

    let notice = match state.catalog.update_profile(&update, forwarded_cookie(&headers)).await {
        Ok(result) if result.success => Notice::success("Bilgileriniz başarıyla güncellendi!"),
        Ok(result) => Notice::error(result.error.unwrap_or_else(|| "Güncelleme başarısız".to_string())),
        Err(err) => Notice::error(err.user_message()),
    };

    render_profile(&state, &headers, Some(notice), None).await
}

pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PasswordForm>,
) -> Response {
    if let Err(message) = validate_password_change(&form) {
        return render_profile(&state, &headers, None, Some(Notice::error(message))).await;
    }

    let update = ProfileUpdate {
        password: Some(form.new_password),
        current_password: Some(form.current_password),
        ..ProfileUpdate::default()
    };

    let notice = match state.catalog.update_profile(&update, forwarded_cookie(&headers)).await {
        Ok(result) if result.success => Notice::success("Şifreniz başarıyla değiştirildi!"),
        Ok(result) => Notice::error(result.error.unwrap_or_else(|| "Şifre değiştirme başarısız".to_string())),
        Err(err) => Notice::error(err.user_message()),
    };

    render_profile(&state, &headers, None, Some(notice)).await
}
