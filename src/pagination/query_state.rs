use serde_derive::Serialize;

/// Records requested per fetch. The catalog caps search windows at this size.
pub const PAGE_SIZE: u32 = 50;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Failed,
    TimedOut,
    Exhausted,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub query: Option<String>,
    pub offset: u32,
    pub total: u32,
    pub has_more: bool,
    pub loading: bool,
    pub phase: Phase,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            query: None,
            offset: 0,
            total: 0,
            has_more: false,
            loading: false,
            phase: Phase::Idle,
        }
    }
}

impl QueryState {
    pub fn loading_first_page(query: Option<String>) -> Self {
        Self {
            query,
            loading: true,
            phase: Phase::Loading,
            ..Self::default()
        }
    }

    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.loading
    }

    pub fn next_offset(&self) -> u32 {
        self.offset + PAGE_SIZE
    }

    /// Records on screen once the current window is applied, as the load-more control counts them.
    pub fn shown(&self) -> u32 {
        self.next_offset().min(self.total)
    }

    pub fn is_search(&self) -> bool {
        self.query.is_some()
    }
}
