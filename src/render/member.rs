use crate::models::member::{BorrowStatus, Borrowing, Fine, Profile};
use crate::render::dates::format_date;
use crate::render::escape::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success<S: Into<String>>(text: S) -> Self {
        Self { kind: NoticeKind::Success, text: text.into() }
    }

    pub fn error<S: Into<String>>(text: S) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }
}

pub fn render_notice(notice: Option<&Notice>) -> String {
    match notice {
        Some(notice) => {
            let class = match notice.kind {
                NoticeKind::Success => "message-success",
                NoticeKind::Error => "message-error",
            };
            format!(r#"<div class="{}">{}</div>"#, class, escape_html(&notice.text))
        }
        None => String::new(),
    }
}

fn status_class(status: BorrowStatus) -> &'static str {
    match status {
        BorrowStatus::Active => "active",
        BorrowStatus::Late => "late",
        BorrowStatus::Returned => "returned",
        BorrowStatus::Unknown => "unknown",
    }
}

fn status_text(status: BorrowStatus) -> &'static str {
    match status {
        BorrowStatus::Active => "Aktif",
        BorrowStatus::Late => "Geç",
        BorrowStatus::Returned => "İade Edildi",
        BorrowStatus::Unknown => "Bilinmiyor",
    }
}

fn render_fine(fine: &Fine) -> String {
    let (class, status) = if fine.is_paid() {
        (" paid", "Ödendi")
    } else {
        ("", "Ödenmedi")
    };
    let payment = match &fine.payment_date {
        Some(date) => format!("<br><strong>Ödeme Tarihi:</strong> {}", escape_html(&format_date(date))),
        None => String::new(),
    };

    format!(
        r#"<div class="fine-info{class}">
<strong>Ceza:</strong> {amount} TL - {status}<br>
<strong>Ceza Tarihi:</strong> {date}{payment}
</div>
"#,
        class = class,
        amount = escape_html(&fine.amount_text()),
        status = status,
        date = escape_html(&format_date(&fine.date)),
        payment = payment,
    )
}

pub fn render_borrowing(borrowing: &Borrowing) -> String {
    let class = status_class(borrowing.status);
    let fine = borrowing.fine.as_ref().map(render_fine).unwrap_or_default();

    format!(
        r#"<div class="borrowing-card {class}">
<div class="borrowing-header">
<h3>{name}</h3>
<span class="borrowing-status {class}">{status}</span>
</div>
<div class="borrowing-details">
<strong>Yazar:</strong> {author}<br>
<strong>Ödünç Alma Tarihi:</strong> {borrowed}<br>
<strong>Son İade Tarihi:</strong> {due}
</div>
{fine}</div>
"#,
        class = class,
        name = escape_html(&borrowing.book.name),
        status = status_text(borrowing.status),
        author = escape_html(&borrowing.book.author),
        borrowed = escape_html(&format_date(&borrowing.borrow_date)),
        due = escape_html(&format_date(&borrowing.last_return_date)),
        fine = fine,
    )
}

pub fn render_borrowings(borrowings: &[Borrowing]) -> String {
    if borrowings.is_empty() {
        return "<p>Henüz ödünç alma kaydınız bulunmamaktadır.</p>".to_string();
    }
    borrowings.iter().map(render_borrowing).collect()
}

pub fn render_profile_form(profile: &Profile, notice: Option<&Notice>) -> String {
    format!(
        r#"<form id="profileForm" method="post" action="/profile">
<label>Ad Soyad <input id="userName" value="{name}" readonly></label>
<label>Kullanıcı Adı <input id="username" value="{username}" readonly></label>
<label>E-posta <input id="userEmail" name="email" type="email" value="{email}"></label>
<label>Telefon <input id="userPhone" name="phone" value="{phone}"></label>
<button type="submit">Kaydet</button>
</form>
{notice}"#,
        name = escape_html(&profile.name),
        username = escape_html(&profile.username),
        email = escape_html(&profile.email),
        phone = escape_html(&profile.phone),
        notice = render_notice(notice),
    )
}

pub fn render_password_form(notice: Option<&Notice>) -> String {
    format!(
        r#"<form id="passwordForm" method="post" action="/profile/password">
<label>Mevcut Şifre <input name="current_password" type="password" required></label>
<label>Yeni Şifre <input name="new_password" type="password" required></label>
<label>Yeni Şifre (Tekrar) <input name="confirm_password" type="password" required></label>
<button type="submit">Şifreyi Değiştir</button>
</form>
{}"#,
        render_notice(notice)
    )
}

pub fn render_login_form(error: Option<&str>) -> String {
    let error = match error {
        Some(error) => format!(r#"<div id="loginError" class="message-error">{}</div>"#, escape_html(error)),
        None => String::new(),
    };

    format!(
        r#"<form id="loginForm" method="post" action="/login">
<label>Kullanıcı Adı <input id="loginUsername" name="username" required></label>
<label>Şifre <input id="loginPassword" name="password" type="password" required></label>
<button type="submit">Giriş Yap</button>
</form>
{}"#,
        error
    )
}
