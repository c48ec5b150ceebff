use crate::models::catalog::{BookDetail, BookSummary};
use crate::models::member::{Borrowing, MemberType, Profile, Session};
use crate::pagination::QueryState;
use crate::render::books::{render_book_detail, render_books, render_load_more, render_search_info, RenderMode};
use crate::render::escape::escape_html;
use crate::render::member::{render_borrowings, render_login_form, render_password_form, render_profile_form, Notice};

#[derive(Debug, Clone, Default)]
pub struct Visitor {
    pub name: Option<String>,
    pub staff_panel_url: Option<String>,
}

impl Visitor {
    pub fn from_session(session: &Session, staff_panel_url: &str) -> Self {
        if !session.logged_in {
            return Self::default();
        }
        let staff_panel_url = match session.member_type {
            Some(MemberType::Staff) => Some(staff_panel_url.to_string()),
            _ => None,
        };
        Self { name: session.name.clone(), staff_panel_url }
    }

    fn is_logged_in(&self) -> bool {
        self.name.is_some()
    }
}

fn header(visitor: &Visitor) -> String {
    let greeting = match &visitor.name {
        Some(name) => format!("Merhaba, {}", escape_html(name)),
        None => "Merhaba, Ziyaretçi".to_string(),
    };
    let staff = match &visitor.staff_panel_url {
        Some(url) => format!(r#"<a href="{}" data-nav="staff">Personel Paneli</a>"#, escape_html(url)),
        None => String::new(),
    };
    let account = if visitor.is_logged_in() {
        r#"<form method="post" action="/logout"><button id="logoutButton" type="submit">Çıkış Yap</button></form>"#
    } else {
        r#"<a id="loginButton" href="/login">Giriş Yap</a>"#
    };

    format!(
        r#"<header>
<nav><a href="/" data-nav="books">Kitaplar</a><a href="/profile" data-nav="profile">Profilim</a>{}</nav>
<span id="userGreeting">{}</span>{}
</header>"#,
        staff, greeting, account
    )
}

pub fn layout(title: &str, visitor: &Visitor, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="tr">
<head>
<meta charset="utf-8">
<title>{}</title>
</head>
<body>
{}
<main>
{}
</main>
</body>
</html>
"#,
        escape_html(title),
        header(visitor),
        body
    )
}

fn search_form(query: Option<&str>, view_id: &str) -> String {
    let view = escape_html(&urlencoding::encode(view_id));
    let clear = if query.is_some() {
        format!(r#"<a id="clearSearch" href="/?view={}">Temizle</a>"#, view)
    } else {
        String::new()
    };

    format!(
        r#"<form id="searchForm" method="get" action="/">
<input type="hidden" name="view" value="{}">
<input id="searchInput" name="q" value="{}" placeholder="Kitap, yazar, tür veya yayınevi ara">
<button id="searchButton" type="submit">Ara</button>{}
</form>"#,
        escape_html(view_id),
        escape_html(query.unwrap_or_default()),
        clear
    )
}

/// An error is shown above the list, or instead of it when nothing was loaded.
pub fn books_page(
    visitor: &Visitor,
    view_id: &str,
    state: &QueryState,
    books: &[BookSummary],
    error: Option<&str>,
    preview_len: usize,
) -> String {
    let notice = match error {
        Some(error) => format!(r#"<p class="message-error">{}</p>"#, escape_html(error)),
        None => String::new(),
    };
    let grid = if error.is_some() && books.is_empty() {
        String::new()
    } else {
        render_books(books, RenderMode::Replace, preview_len)
    };
    let body = format!(
        r#"{}
{}
{}
<section id="booksGrid">
{}</section>
{}"#,
        search_form(state.query.as_deref(), view_id),
        render_search_info(state),
        notice,
        grid,
        render_load_more(state, view_id)
    );

    layout("Kitaplar", visitor, &body)
}

pub fn load_more_fragment(books: &[BookSummary], view_id: &str, state: &QueryState, preview_len: usize) -> String {
    format!("{}{}", render_books(books, RenderMode::Append, preview_len), render_load_more(state, view_id))
}

pub fn book_detail_page(visitor: &Visitor, book: &BookDetail) -> String {
    let body = format!(
        r#"<p><a href="/books">&larr; Kitaplara dön</a></p>
{}"#,
        render_book_detail(book)
    );
    layout(&book.name, visitor, &body)
}

pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        r#"<section id="loginModal">
<h2>Giriş Yap</h2>
{}
</section>"#,
        render_login_form(error)
    );
    layout("Giriş", &Visitor::default(), &body)
}

pub struct ProfileView<'a> {
    pub profile: Option<&'a Profile>,
    pub borrowings: Result<&'a [Borrowing], String>,
    pub profile_notice: Option<&'a Notice>,
    pub password_notice: Option<&'a Notice>,
}

pub fn profile_page(visitor: &Visitor, view: &ProfileView) -> String {
    let borrowings = match &view.borrowings {
        Ok(borrowings) => render_borrowings(borrowings),
        Err(message) => format!("<p>{}</p>", escape_html(message)),
    };
    let profile = match view.profile {
        Some(profile) => render_profile_form(profile, view.profile_notice),
        None => "<p>Profil bilgileri yüklenemedi.</p>".to_string(),
    };

    let body = format!(
        r#"<section id="profileContent">
<h2>Ödünç Aldıklarım</h2>
<div id="borrowingsList">
{}</div>
<h2>Bilgilerim</h2>
{}
<h2>Şifre Değiştir</h2>
{}
</section>"#,
        borrowings,
        profile,
        render_password_form(view.password_notice)
    );

    layout("Profilim", visitor, &body)
}

pub fn login_required_page(visitor: &Visitor) -> String {
    layout(
        "Profilim",
        visitor,
        r#"<section id="loginRequired"><p>Bu sayfayı görüntülemek için öğrenci hesabıyla <a href="/login">giriş yapın</a>.</p></section>"#,
    )
}

pub fn error_page(message: &str) -> String {
    layout("Hata", &Visitor::default(), &format!(r#"<p class="message-error">{}</p>"#, escape_html(message)))
}
