//! Cursor-following scan loop.

use crate::errors::Result;
use crate::store::{Cursor, ScanPage, ScanRequest, WordStore};

#[derive(Debug)]
enum State {
    Start,
    Next(Cursor),
    Done,
}

/// Walks every page of a scan exactly once.
///
/// The first request carries no cursor; each following request carries the
/// cursor of the page before it. The walk ends the first time a page comes
/// back without a cursor. A failed fetch is returned to the caller and ends
/// the walk.
pub struct Paginator<'a, S: WordStore + ?Sized> {
    store: &'a S,
    request: ScanRequest,
    state: State,
    pages: usize,
    items: usize,
}

impl<'a, S: WordStore + ?Sized> Paginator<'a, S> {
    pub fn new(store: &'a S, request: ScanRequest) -> Self {
        Self {
            store,
            request,
            state: State::Start,
            pages: 0,
            items: 0,
        }
    }

    /// Fetch the next page, or `None` once the last page has been returned.
    pub async fn next_page(&mut self) -> Result<Option<ScanPage>> {
        let cursor = match std::mem::replace(&mut self.state, State::Done) {
            State::Done => return Ok(None),
            State::Start => None,
            State::Next(cursor) => Some(cursor),
        };

        let mut page = self.store.scan_page(&self.request, cursor).await?;
        self.pages += 1;
        self.items += page.entries.len();
        tracing::debug!(
            page = self.pages,
            items = page.entries.len(),
            more = page.cursor.is_some(),
            "fetched scan page"
        );

        if let Some(next) = page.cursor.take() {
            self.state = State::Next(next);
        }
        Ok(Some(page))
    }

    /// Pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Entries returned so far.
    pub fn items(&self) -> usize {
        self.items
    }
}
