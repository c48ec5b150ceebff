use crate::models::catalog::{BookDetail, BookSummary};
use crate::pagination::{Phase, QueryState};
use crate::render::dates::format_date;
use crate::render::escape::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Replace,
    Append,
}

pub const NO_BOOKS: &str = "<p>Kitap bulunamadı.</p>";

/// Cuts `text` to `max_chars` characters. The flag tells whether anything was cut.
pub fn truncate_explanation(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (format!("{}...", &text[..byte_index]), true),
        None => (text.to_string(), false),
    }
}

fn availability_badge(available: bool) -> &'static str {
    if available {
        r#"<span class="availability-badge available">Mevcut</span>"#
    } else {
        r#"<span class="availability-badge unavailable">Ödünç Verilmiş</span>"#
    }
}

fn expected_return(book: &BookSummary) -> String {
    match (&book.expected_return_date, book.available) {
        (Some(date), false) => format!(
            r#"<p class="expected-return">Beklenen iade tarihi: {}</p>"#,
            escape_html(&format_date(date))
        ),
        _ => String::new(),
    }
}

fn year_line(book: &BookSummary) -> String {
    match book.year.as_deref().filter(|year| !year.is_empty()) {
        Some(year) => format!("<p><strong>Yıl:</strong> {}</p>", escape_html(year)),
        None => String::new(),
    }
}

pub fn render_book_card(book: &BookSummary, preview_len: usize) -> String {
    let (explanation, truncated) = truncate_explanation(&book.explanation, preview_len);
    let read_more = if truncated {
        format!(
            r#"<a class="show-more-btn" href="/books/{}">Devamını Oku</a>"#,
            urlencoding::encode(&book.isbn)
        )
    } else {
        String::new()
    };

    format!(
        r#"<article class="book-card" data-isbn="{isbn}">
<h3>{name}</h3>
<p><strong>Yazar:</strong> {author}</p>
<p><strong>Yayınevi:</strong> {publisher}</p>
<p><strong>Tür:</strong> {kind}</p>
{year}<p class="book-explanation">{explanation}</p>
{read_more}{badge}{expected_return}
</article>
"#,
        isbn = escape_html(&book.isbn),
        name = escape_html(&book.name),
        author = escape_html(&book.author),
        publisher = escape_html(&book.publisher),
        kind = escape_html(&book.kind),
        year = year_line(book),
        explanation = escape_html(&explanation),
        read_more = read_more,
        badge = availability_badge(book.available),
        expected_return = expected_return(book),
    )
}

pub fn render_books(books: &[BookSummary], mode: RenderMode, preview_len: usize) -> String {
    if books.is_empty() {
        return match mode {
            RenderMode::Replace => NO_BOOKS.to_string(),
            RenderMode::Append => String::new(),
        };
    }

    books.iter()
        .map(|book| render_book_card(book, preview_len))
        .collect()
}

pub fn render_load_more(state: &QueryState, view_id: &str) -> String {
    let inner = if state.loading {
        r#"<p class="load-more-status">Yükleniyor...</p>"#.to_string()
    } else if state.can_load_more() {
        format!(
            r#"<p class="load-more-status">{} / {} kitap gösteriliyor</p>
<form method="post" action="/books/more"><input type="hidden" name="view" value="{}"><button type="submit" class="load-more-btn">Daha Fazla Yükle</button></form>"#,
            state.shown(),
            state.total,
            escape_html(view_id)
        )
    } else {
        String::new()
    };

    format!(r#"<div id="loadMoreContainer">{}</div>"#, inner)
}

pub fn render_search_info(state: &QueryState) -> String {
    let text = match (&state.query, state.phase) {
        (_, Phase::Idle) => String::new(),
        (Some(query), Phase::Loading) => format!("\"{}\" aranıyor...", query),
        (None, Phase::Loading) => "Kitaplar yükleniyor...".to_string(),
        (Some(query), Phase::TimedOut) => format!("\"{}\" araması zaman aşımına uğradı.", query),
        (Some(query), Phase::Failed) => format!("\"{}\" araması tamamlanamadı.", query),
        (None, Phase::TimedOut) => "Kitaplar yüklenirken zaman aşımı oldu.".to_string(),
        (None, Phase::Failed) => "Kitaplar yüklenemedi.".to_string(),
        (Some(query), _) => format!("\"{}\" için {} sonuç bulundu.", query, state.total),
        (None, _) if state.total > 0 => format!("Kitaplar gösteriliyor (Toplam {} kitap).", state.total),
        (None, _) => "Kitaplar gösteriliyor.".to_string(),
    };

    format!(r#"<p id="searchInfo">{}</p>"#, escape_html(&text))
}

pub fn render_book_detail(book: &BookDetail) -> String {
    let image = match book.image.as_deref().filter(|image| !image.is_empty()) {
        Some(image) => format!(
            r#"<img src="{}" alt="{}" class="book-detail-image">"#,
            escape_html(image),
            escape_html(&book.name)
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="book-detail-container">
{image}
<div class="book-detail-info">
<h2>{name}</h2>
<p><strong>Yazar:</strong> {author}</p>
<p><strong>Yayınevi:</strong> {publisher}</p>
<p><strong>Tür:</strong> {kind}</p>
{year}<p><strong>ISBN:</strong> {isbn}</p>
{badge}{expected_return}
<div class="book-full-explanation">
<h3>Açıklama</h3>
<p>{explanation}</p>
</div>
</div>
</div>
"#,
        image = image,
        name = escape_html(&book.name),
        author = escape_html(&book.author),
        publisher = escape_html(&book.publisher),
        kind = escape_html(&book.kind),
        year = year_line(book),
        isbn = escape_html(&book.isbn),
        badge = availability_badge(book.available),
        expected_return = expected_return(book),
        explanation = escape_html(&book.explanation),
    )
}
