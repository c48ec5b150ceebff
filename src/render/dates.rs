use chrono::{DateTime, Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran",
    "Temmuz", "Ağustos", "Eylül", "Ekim", "Kasım", "Aralık",
];

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Long Turkish date, `2024-03-05` -> `5 Mart 2024`. Unparseable input comes back as is.
pub fn format_date(text: &str) -> String {
    match parse_date(text) {
        Some(date) => format!("{} {} {}", date.day(), MONTHS[date.month0() as usize], date.year()),
        None => text.to_string(),
    }
}
