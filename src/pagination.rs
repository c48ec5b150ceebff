pub mod book_source;
pub mod controller;
pub mod query_state;

pub use book_source::{BookSource, PageRequest};
pub use controller::{LoadOutcome, PaginationController, SkipReason};
pub use query_state::{Phase, QueryState, PAGE_SIZE};
