use crate::error::AppError;
use crate::photo::{Photo, SearchResponse};

pub const FIRST_PAGE: u32 = 1;

/// A fetch the session has asked for. The generation pins the response to the
/// search that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: String,
    pub page: u32,
}

/// A completed fetch, successful or not, tagged with its ticket.
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<SearchResponse, AppError>,
}

/// What applying an outcome did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Replaced,
    Appended,
    Failed,
    Stale,
}

/// State of one search session: the active query, the accumulated photos, the
/// page cursor, and the in-flight bookkeeping.
///
/// The session never performs I/O. `submit` and `next_page` hand out tickets;
/// the caller runs the fetch and feeds the result back through `apply`, so all
/// mutation happens on the caller's thread.
#[derive(Debug)]
pub struct SearchSession {
    query: String,
    page: u32,
    photos: Vec<Photo>,
    total_results: u64,
    loading: bool,
    generation: u64,
    exhausted: bool,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            page: FIRST_PAGE,
            photos: Vec::new(),
            total_results: 0,
            loading: false,
            generation: 0,
            exhausted: false,
        }
    }

    /// Start a fresh search. An empty query is a no-op. Submitting while a
    /// fetch is in flight is allowed: bumping the generation turns the older
    /// fetch into a stale one that `apply` will discard.
    pub fn submit(&mut self, query: &str) -> Option<FetchTicket> {
        if query.is_empty() {
            return None;
        }

        self.query = query.to_owned();
        self.generation += 1;
        self.loading = true;
        self.exhausted = false;
        Some(FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            page: FIRST_PAGE,
        })
    }

    /// Ask for the page after the cursor. Refused while a fetch is in flight,
    /// before the first page has arrived, or once the feed is exhausted.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if self.loading || self.exhausted || self.query.is_empty() || self.photos.is_empty() {
            return None;
        }

        self.loading = true;
        Some(FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            page: self.page + 1,
        })
    }

    /// Fold a completed fetch back into the session.
    ///
    /// Outcomes from a superseded generation are dropped without touching any
    /// state, including the loading flag, which belongs to the newer fetch.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        if outcome.ticket.generation != self.generation {
            log::debug!(
                "Discarding stale response for \"{}\" page {}",
                outcome.ticket.query,
                outcome.ticket.page
            );
            return Applied::Stale;
        }

        self.loading = false;

        match outcome.result {
            Ok(response) => {
                self.exhausted = response.next_page.is_none();
                self.total_results = response.total_results;
                if outcome.ticket.page == FIRST_PAGE {
                    self.photos = response.photos;
                    self.page = FIRST_PAGE;
                    Applied::Replaced
                } else {
                    self.photos.extend(response.photos);
                    self.page = outcome.ticket.page;
                    Applied::Appended
                }
            }
            Err(err) => {
                log::error!(
                    "Search for \"{}\" page {} failed: {}",
                    outcome.ticket.query,
                    outcome.ticket.page,
                    err
                );
                Applied::Failed
            }
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// First page still pending: nothing to show yet.
    pub fn is_initial_loading(&self) -> bool {
        self.loading && self.photos.is_empty()
    }

    /// A further page is pending below existing results.
    pub fn is_paginating(&self) -> bool {
        self.loading && !self.photos.is_empty()
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::PhotoSource;

    fn photo(id: u64) -> Photo {
        Photo {
            id,
            url: format!("https://www.pexels.com/photo/{}/", id),
            photographer: "Someone".to_string(),
            alt: Some(format!("photo {}", id)),
            src: PhotoSource {
                medium: format!("https://images.pexels.com/photos/{}/m.jpg", id),
            },
        }
    }

    fn page_of(ids: &[u64], has_more: bool) -> SearchResponse {
        SearchResponse {
            total_results: 100,
            photos: ids.iter().copied().map(photo).collect(),
            next_page: has_more.then(|| "https://api.pexels.com/v1/search?page=next".to_string()),
            ..SearchResponse::default()
        }
    }

    fn ok(ticket: FetchTicket, ids: &[u64]) -> FetchOutcome {
        FetchOutcome {
            ticket,
            result: Ok(page_of(ids, true)),
        }
    }

    fn failed(ticket: FetchTicket) -> FetchOutcome {
        FetchOutcome {
            ticket,
            result: Err(AppError::Status(500)),
        }
    }

    fn ids(session: &SearchSession) -> Vec<u64> {
        session.photos().iter().map(|p| p.id).collect()
    }

    #[test]
    fn fresh_session_starts_at_page_one_with_no_photos() {
        let session = SearchSession::new();
        assert_eq!(session.page(), FIRST_PAGE);
        assert!(session.photos().is_empty());
        assert!(!session.is_loading());
    }

    #[test]
    fn submit_replaces_results_in_response_order() {
        let mut session = SearchSession::new();
        let ticket = session.submit("cats").unwrap();
        assert_eq!(ticket.page, FIRST_PAGE);
        assert_eq!(ticket.query, "cats");

        assert_eq!(session.apply(ok(ticket, &[1, 2])), Applied::Replaced);
        assert_eq!(ids(&session), vec![1, 2]);
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn empty_query_is_a_no_op() {
        let mut session = SearchSession::new();
        let ticket = session.submit("cats").unwrap();
        session.apply(ok(ticket, &[1, 2]));

        assert!(session.submit("").is_none());
        assert_eq!(ids(&session), vec![1, 2]);
        assert_eq!(session.page(), 1);
        assert!(!session.is_loading());
    }

    #[test]
    fn pagination_appends_without_reordering() {
        let mut session = SearchSession::new();
        let first = session.submit("cats").unwrap();
        session.apply(ok(first, &[1, 2]));

        let second = session.next_page().unwrap();
        assert_eq!(second.page, 2);
        assert_eq!(session.apply(ok(second, &[3, 4])), Applied::Appended);

        assert_eq!(ids(&session), vec![1, 2, 3, 4]);
        assert_eq!(session.page(), 2);
    }

    #[test]
    fn cursor_advances_once_per_successful_page() {
        let mut session = SearchSession::new();
        let ticket = session.submit("dogs").unwrap();
        session.apply(ok(ticket, &[1]));

        for n in 0..3 {
            let ticket = session.next_page().unwrap();
            session.apply(ok(ticket, &[10 + n]));
        }

        assert_eq!(session.page(), 1 + 3);
        assert_eq!(session.photos().len(), 4);
    }

    #[test]
    fn failed_page_leaves_cursor_and_results_untouched() {
        let mut session = SearchSession::new();
        let first = session.submit("cats").unwrap();
        session.apply(ok(first, &[1, 2]));

        let second = session.next_page().unwrap();
        assert_eq!(session.apply(failed(second)), Applied::Failed);

        assert_eq!(ids(&session), vec![1, 2]);
        assert_eq!(session.page(), 1);
        assert!(!session.is_loading());
    }

    #[test]
    fn loading_flag_spans_exactly_the_pending_interval() {
        let mut session = SearchSession::new();
        assert!(!session.is_loading());

        let ticket = session.submit("cats").unwrap();
        assert!(session.is_loading());
        assert!(session.is_initial_loading());
        assert!(!session.is_paginating());

        session.apply(ok(ticket, &[1]));
        assert!(!session.is_loading());

        let ticket = session.next_page().unwrap();
        assert!(session.is_paginating());
        assert!(!session.is_initial_loading());

        session.apply(failed(ticket));
        assert!(!session.is_loading());
    }

    #[test]
    fn pagination_is_refused_while_a_fetch_is_in_flight() {
        let mut session = SearchSession::new();
        let first = session.submit("cats").unwrap();
        session.apply(ok(first, &[1]));

        let in_flight = session.next_page().unwrap();
        assert!(session.next_page().is_none());

        session.apply(ok(in_flight, &[2]));
        assert!(session.next_page().is_some());
    }

    #[test]
    fn stale_response_cannot_clobber_a_newer_search() {
        let mut session = SearchSession::new();
        let slow = session.submit("cats").unwrap();
        let fast = session.submit("dogs").unwrap();

        session.apply(ok(fast, &[7]));
        assert_eq!(ids(&session), vec![7]);

        // The older fetch resolves late; it must change nothing.
        assert_eq!(session.apply(ok(slow, &[1, 2])), Applied::Stale);
        assert_eq!(ids(&session), vec![7]);
        assert_eq!(session.query(), "dogs");
        assert!(!session.is_loading());
    }

    #[test]
    fn stale_response_does_not_clear_the_newer_fetch_loading_flag() {
        let mut session = SearchSession::new();
        let slow = session.submit("cats").unwrap();
        let _pending = session.submit("dogs").unwrap();

        session.apply(ok(slow, &[1]));
        assert!(session.is_loading());
    }

    #[test]
    fn new_search_restarts_pagination() {
        let mut session = SearchSession::new();
        let first = session.submit("cats").unwrap();
        session.apply(ok(first, &[1]));
        let second = session.next_page().unwrap();
        session.apply(ok(second, &[2]));
        assert_eq!(session.page(), 2);

        let fresh = session.submit("dogs").unwrap();
        assert_eq!(fresh.page, FIRST_PAGE);
        session.apply(ok(fresh, &[9]));

        assert_eq!(session.page(), FIRST_PAGE);
        assert_eq!(ids(&session), vec![9]);

        let next = session.next_page().unwrap();
        assert_eq!(next.page, 2);
    }

    #[test]
    fn exhausted_feed_stops_pagination_until_the_next_search() {
        let mut session = SearchSession::new();
        let first = session.submit("cats").unwrap();
        session.apply(FetchOutcome {
            ticket: first,
            result: Ok(page_of(&[1, 2], false)),
        });

        assert!(session.next_page().is_none());

        let fresh = session.submit("cats").unwrap();
        session.apply(ok(fresh, &[1, 2]));
        assert!(session.next_page().is_some());
    }

    #[test]
    fn next_page_before_any_results_is_refused() {
        let mut session = SearchSession::new();
        assert!(session.next_page().is_none());

        let ticket = session.submit("cats").unwrap();
        session.apply(ok(ticket, &[]));
        assert!(session.next_page().is_none());
    }
}
