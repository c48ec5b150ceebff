use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BookSummary {
    pub isbn: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub year: Option<String>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub available: bool,
    pub expected_return_date: Option<String>,
}

pub type BookDetail = BookSummary;

// The catalog is not consistent about which counters it sends.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Page {
    #[serde(default)]
    pub results: Vec<BookSummary>,
    pub count: Option<u32>,
    pub total: Option<u32>,
    pub offset: Option<u32>,
    #[serde(default)]
    pub has_more: bool,
}

impl Page {
    /// Total for a first page: `total`, then `count`, then what arrived.
    pub fn reported_total(&self) -> u32 {
        self.total
            .or(self.count)
            .unwrap_or(self.results.len() as u32)
    }

    pub fn is_consistent(&self, offset: u32) -> bool {
        !self.has_more || offset + self.results.len() as u32 <= self.reported_total()
    }
}
