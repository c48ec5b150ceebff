use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info, warn};

use crate::models::catalog::{BookSummary, Page};
use crate::models::errors::FetchError;
use crate::pagination::book_source::{BookSource, PageRequest};
use crate::pagination::query_state::{Phase, QueryState, PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InFlight,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Replaced { books: Vec<BookSummary>, state: QueryState },
    Appended { books: Vec<BookSummary>, state: QueryState },
    Skipped { reason: SkipReason, state: QueryState },
}

impl LoadOutcome {
    pub fn state(&self) -> &QueryState {
        match self {
            LoadOutcome::Replaced { state, .. } => state,
            LoadOutcome::Appended { state, .. } => state,
            LoadOutcome::Skipped { state, .. } => state,
        }
    }
}

struct Inner {
    state: QueryState,
    books: Vec<BookSummary>,
}

// The mutex is never held across a fetch; `loading` blocks a second trigger.
pub struct PaginationController {
    inner: Mutex<Inner>,
    timeout: Duration,
}

// Clears `loading` if the fetch future is dropped before its result is applied.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(inner: &'a Mutex<Inner>) -> Self {
        Self { inner, settled: false }
    }

    fn settle(mut self) -> MutexGuard<'a, Inner> {
        self.settled = true;
        lock(self.inner)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = lock(self.inner);
        inner.state.loading = false;
        inner.state.phase = Phase::Failed;
        warn!("fetch abandoned before completion, loading guard released");
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PaginationController {
    pub fn new(timeout: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner { state: QueryState::default(), books: Vec::new() }),
            timeout,
        }
    }

    pub fn snapshot(&self) -> QueryState {
        lock(&self.inner).state.clone()
    }

    pub fn snapshot_with_books(&self) -> (QueryState, Vec<BookSummary>) {
        let inner = lock(&self.inner);
        (inner.state.clone(), inner.books.clone())
    }

    pub async fn start_search(
        &self,
        source: &dyn BookSource,
        query: &str,
    ) -> Result<LoadOutcome, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("blank search query, listing all books");
            return self.load_all(source).await;
        }
        self.load_first_page(source, Some(query.to_string())).await
    }

    pub async fn load_all(&self, source: &dyn BookSource) -> Result<LoadOutcome, FetchError> {
        self.load_first_page(source, None).await
    }

    pub async fn load_more(&self, source: &dyn BookSource) -> Result<LoadOutcome, FetchError> {
        let request = {
            let mut inner = lock(&self.inner);
            if inner.state.loading {
                debug!("load more ignored, a fetch is in flight");
                return Ok(LoadOutcome::Skipped { reason: SkipReason::InFlight, state: inner.state.clone() });
            }
            if !inner.state.has_more {
                debug!("load more ignored, session exhausted");
                return Ok(LoadOutcome::Skipped { reason: SkipReason::Exhausted, state: inner.state.clone() });
            }
            inner.state.loading = true;
            inner.state.phase = Phase::Loading;
            PageRequest {
                query: inner.state.query.clone(),
                offset: inner.state.next_offset(),
                limit: PAGE_SIZE,
            }
        };

        let in_flight = InFlight::new(&self.inner);
        let result = self.fetch(source, &request).await;
        let mut inner = in_flight.settle();
        inner.state.loading = false;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                inner.state.phase = failure_phase(&err);
                return Err(err);
            }
        };

        if page.results.is_empty() {
            warn!("catalog reported more results past offset {} but sent none", inner.state.offset);
            inner.state.has_more = false;
            inner.state.phase = Phase::Exhausted;
            return Err(FetchError::EmptyResult);
        }

        if !page.is_consistent(request.offset) {
            warn!("page at offset {} overruns reported total {}", request.offset, page.reported_total());
        }

        inner.state.offset = request.offset;
        inner.state.total = page.total.unwrap_or(inner.state.total);
        inner.state.has_more = page.has_more;
        inner.state.phase = settled_phase(page.has_more);
        inner.books.extend(page.results.iter().cloned());
        debug!("appended {} books at offset {}, has_more={}", page.results.len(), request.offset, page.has_more);

        Ok(LoadOutcome::Appended { books: page.results, state: inner.state.clone() })
    }

    async fn load_first_page(
        &self,
        source: &dyn BookSource,
        query: Option<String>,
    ) -> Result<LoadOutcome, FetchError> {
        let request = {
            let mut inner = lock(&self.inner);
            if inner.state.loading {
                debug!("new session ignored, a fetch is in flight");
                return Ok(LoadOutcome::Skipped { reason: SkipReason::InFlight, state: inner.state.clone() });
            }
            inner.state = QueryState::loading_first_page(query.clone());
            inner.books.clear();
            PageRequest { query, offset: 0, limit: PAGE_SIZE }
        };

        let in_flight = InFlight::new(&self.inner);
        let result = self.fetch(source, &request).await;
        let mut inner = in_flight.settle();
        inner.state.loading = false;

        match result {
            Ok(page) => {
                if !page.is_consistent(0) {
                    warn!("first page overruns reported total {}", page.reported_total());
                }
                inner.state.offset = 0;
                inner.state.total = page.reported_total();
                inner.state.has_more = page.has_more;
                inner.state.phase = settled_phase(page.has_more);
                inner.books = page.results.clone();
                debug!("loaded {} of {} books, has_more={}", page.results.len(), inner.state.total, page.has_more);

                Ok(LoadOutcome::Replaced { books: page.results, state: inner.state.clone() })
            }
            Err(err) => {
                inner.state.phase = failure_phase(&err);
                Err(err)
            }
        }
    }

    async fn fetch(&self, source: &dyn BookSource, request: &PageRequest) -> Result<Page, FetchError> {
        match tokio::time::timeout(self.timeout, source.fetch_page(request)).await {
            Ok(result) => result,
            Err(_) => {
                info!("page fetch at offset {} timed out after {:?}", request.offset, self.timeout);
                Err(FetchError::Timeout)
            }
        }
    }
}

fn settled_phase(has_more: bool) -> Phase {
    if has_more { Phase::Loaded } else { Phase::Exhausted }
}

fn failure_phase(err: &FetchError) -> Phase {
    if err.is_timeout() { Phase::TimedOut } else { Phase::Failed }
}
