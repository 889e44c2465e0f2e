//! State owned by the dashboard shell.
//!
//! Each feed keeps its newest request generation. A fetch begins by taking a
//! [`FetchToken`]; its result is applied only if no later fetch of the same
//! feed has begun in the meantime. A slow response for an old date can
//! therefore never replace a newer one.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{Feed, FlightSource};
use crate::flight::Flight;
use crate::session::Session;

/// Ticket for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken {
    feed: Feed,
    date: NaiveDate,
    generation: u64,
}

impl FetchToken {
    /// Feed being fetched.
    #[must_use]
    pub fn feed(&self) -> Feed {
        self.feed
    }

    /// Date being fetched.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Request generation within the feed.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct Dataset {
    flights: Vec<Flight>,
    loading: bool,
    latest: u64,
}

/// Session, selected date and the three datasets.
#[derive(Debug)]
pub struct BoardState {
    session: Session,
    selected_date: NaiveDate,
    arrivals: Dataset,
    departures: Dataset,
    all_flights: Dataset,
}

impl BoardState {
    /// Fresh state for `session` showing `date`. Nothing is loaded yet.
    #[must_use]
    pub fn new(session: Session, date: NaiveDate) -> Self {
        Self {
            session,
            selected_date: date,
            arrivals: Dataset::default(),
            departures: Dataset::default(),
            all_flights: Dataset::default(),
        }
    }

    /// The signed-in user.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Date the tables show.
    #[must_use]
    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Switch to `date` and begin a fetch of every feed for it.
    pub fn select_date(&mut self, date: NaiveDate) -> Vec<FetchToken> {
        self.selected_date = date;
        self.refresh()
    }

    /// Begin a fetch of every feed for the selected date.
    pub fn refresh(&mut self) -> Vec<FetchToken> {
        Feed::ALL.iter().map(|&feed| self.begin(feed)).collect()
    }

    /// Begin a fetch of `feed` for the selected date.
    pub fn begin(&mut self, feed: Feed) -> FetchToken {
        let date = self.selected_date;
        let dataset = self.dataset_mut(feed);
        dataset.latest += 1;
        dataset.loading = true;
        FetchToken {
            feed,
            date,
            generation: dataset.latest,
        }
    }

    /// Apply a finished fetch. Returns `false` and drops `flights` if a newer
    /// fetch of the same feed has begun since `token` was issued.
    pub fn complete(&mut self, token: FetchToken, flights: Vec<Flight>) -> bool {
        let dataset = self.dataset_mut(token.feed);
        if token.generation != dataset.latest {
            debug!(
                feed = %token.feed,
                date = %token.date,
                generation = token.generation,
                latest = dataset.latest,
                "discarding stale fetch"
            );
            return false;
        }
        dataset.flights = flights;
        dataset.loading = false;
        true
    }

    /// Current flights for `feed`.
    #[must_use]
    pub fn flights(&self, feed: Feed) -> &[Flight] {
        &self.dataset(feed).flights
    }

    /// Whether the newest fetch of `feed` is still outstanding.
    #[must_use]
    pub fn is_loading(&self, feed: Feed) -> bool {
        self.dataset(feed).loading
    }

    fn dataset(&self, feed: Feed) -> &Dataset {
        match feed {
            Feed::Arrivals => &self.arrivals,
            Feed::Departures => &self.departures,
            Feed::AllFlights => &self.all_flights,
        }
    }

    fn dataset_mut(&mut self, feed: Feed) -> &mut Dataset {
        match feed {
            Feed::Arrivals => &mut self.arrivals,
            Feed::Departures => &mut self.departures,
            Feed::AllFlights => &mut self.all_flights,
        }
    }
}

/// A finished fetch, ready for [`BoardState::complete`].
pub type Fetched = (FetchToken, Vec<Flight>);

/// Run the fetch for `token` in the background and send the result to `results`.
///
/// Nothing is sent if the receiver has gone away.
pub fn spawn_fetch(
    source: Arc<dyn FlightSource>,
    token: FetchToken,
    results: mpsc::Sender<Fetched>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let flights = source.fetch(token.feed, token.date).await;
        if results.send((token, flights)).await.is_err() {
            debug!(feed = %token.feed, "fetch finished after shutdown");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::fixtures::arrival;
    use crate::session::Role;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn state() -> BoardState {
        BoardState::new(Session::new("user", Role::User), date(19))
    }

    fn one(flight: &str) -> Vec<Flight> {
        vec![arrival(flight, "2026-10-19T10:00:00", "2026-10-19T10:00:00")]
    }

    #[test]
    fn test_complete_applies_latest() {
        let mut state = state();
        let token = state.begin(Feed::Arrivals);
        assert!(state.is_loading(Feed::Arrivals));

        assert!(state.complete(token, one("A1")));
        assert!(!state.is_loading(Feed::Arrivals));
        assert_eq!(state.flights(Feed::Arrivals)[0].flight, "A1");
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = state();
        let old = state.select_date(date(20));
        let new = state.select_date(date(21));

        // The newer request resolves first, then the old one straggles in
        assert!(state.complete(new[0], one("NEW")));
        assert!(!state.complete(old[0], one("OLD")));

        assert_eq!(state.flights(Feed::Arrivals)[0].flight, "NEW");
        assert_eq!(state.selected_date(), date(21));
        assert_eq!(new[0].date(), date(21));
    }

    #[test]
    fn test_stale_completion_keeps_loading_flag() {
        let mut state = state();
        let old = state.begin(Feed::Departures);
        let _new = state.begin(Feed::Departures);

        assert!(!state.complete(old, Vec::new()));
        assert!(state.is_loading(Feed::Departures));
    }

    #[test]
    fn test_feeds_are_independent() {
        let mut state = state();
        let arrivals = state.begin(Feed::Arrivals);
        let _departures = state.begin(Feed::Departures);
        assert!(state.complete(arrivals, one("A1")));
        assert!(state.flights(Feed::Departures).is_empty());
        assert_eq!(arrivals.generation(), 1);
    }

    #[test]
    fn test_refresh_begins_every_feed() {
        let mut state = state();
        let tokens = state.refresh();
        let feeds: Vec<Feed> = tokens.iter().map(FetchToken::feed).collect();
        assert_eq!(feeds, Feed::ALL.to_vec());
        assert!(tokens.iter().all(|t| t.date() == date(19)));
    }

    #[test]
    fn test_failed_fetch_replaces_with_empty() {
        let mut state = state();
        let first = state.begin(Feed::AllFlights);
        state.complete(first, one("A1"));
        let second = state.begin(Feed::AllFlights);
        assert!(state.complete(second, Vec::new()));
        assert!(state.flights(Feed::AllFlights).is_empty());
    }

    struct SlowFirst;

    #[async_trait::async_trait]
    impl FlightSource for SlowFirst {
        async fn fetch(&self, _feed: Feed, date: NaiveDate) -> Vec<Flight> {
            if date == NaiveDate::from_ymd_opt(2026, 10, 20).unwrap() {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
            one(&date.to_string())
        }

        async fn login(&self, username: &str, _password: &str) -> crate::Result<Session> {
            Ok(Session::new(username, Role::User))
        }
    }

    #[tokio::test]
    async fn test_slow_old_fetch_cannot_overwrite() {
        let source: Arc<dyn FlightSource> = Arc::new(SlowFirst);
        let (tx, mut rx) = mpsc::channel(8);
        let mut state = state();

        let old = state.select_date(date(20));
        let new = state.select_date(date(21));
        spawn_fetch(Arc::clone(&source), old[0], tx.clone());
        spawn_fetch(Arc::clone(&source), new[0], tx);

        while let Some((token, flights)) = rx.recv().await {
            state.complete(token, flights);
        }

        assert_eq!(state.flights(Feed::Arrivals)[0].flight, "2026-10-21");
        assert!(!state.is_loading(Feed::Arrivals));
    }

    #[test]
    fn test_session_is_owned() {
        assert_eq!(state().session().username, "user");
    }
}
