use super::remember;
use crate::catalog::Catalog;
use crate::catalog::debounce::spawn_debounced;
use crate::catalog::source::CatalogSource;
use crate::mxm::models::{Artist, SearchCategory, SearchItems, Track};
use crate::storage::{SharedStorage, slot};
use std::time::Duration;
use tokio::sync::mpsc;

/// Search-as-you-type box. Keystrokes are debounced; only the query that
/// settles is searched.
pub struct SearchBox<S> {
    catalog: Catalog<S>,
    storage: Option<SharedStorage>,
    input: mpsc::UnboundedSender<String>,
    settled: mpsc::UnboundedReceiver<String>,
    pub query: String,
    pub artists: Vec<Artist>,
    pub tracks: Vec<Track>,
    pub lyrics: Vec<Track>,
    pub error: Option<String>,
}

impl<S: CatalogSource> SearchBox<S> {
    /// Must be called inside a tokio runtime.
    pub fn new(catalog: Catalog<S>, debounce: Duration, storage: Option<SharedStorage>) -> Self {
        let (settled_tx, settled) = mpsc::unbounded_channel();
        let input = spawn_debounced(debounce, move |query: String| {
            let _ = settled_tx.send(query);
        });
        Self {
            catalog,
            storage,
            input,
            settled,
            query: String::new(),
            artists: Vec::new(),
            tracks: Vec::new(),
            lyrics: Vec::new(),
            error: None,
        }
    }

    /// The text field changed.
    pub fn input(&self, text: &str) {
        let _ = self.input.send(text.to_string());
    }

    /// Wait for the input to settle and run the search for it. Returns the
    /// trimmed query that was applied.
    pub async fn next_results(&mut self) -> Option<&str> {
        let raw = self.settled.recv().await?;
        self.run_query(&raw).await;
        Some(self.query.as_str())
    }

    async fn run_query(&mut self, raw: &str) {
        self.query = raw.trim().to_string();
        self.error = None;
        if self.query.is_empty() {
            self.artists.clear();
            self.tracks.clear();
            self.lyrics.clear();
            return;
        }

        let query = self.query.as_str();
        let (artists, tracks, lyrics) = tokio::join!(
            self.catalog.search(SearchCategory::Artists, query, 1),
            self.catalog.search(SearchCategory::Tracks, query, 1),
            self.catalog.search(SearchCategory::Lyrics, query, 1)
        );

        for result in [artists, tracks, lyrics] {
            match result {
                Ok(page) => match (page.category, page.items) {
                    (SearchCategory::Artists, SearchItems::Artists(a)) => self.artists = a,
                    (SearchCategory::Tracks, SearchItems::Tracks(t)) => self.tracks = t,
                    (SearchCategory::Lyrics, SearchItems::Tracks(t)) => self.lyrics = t,
                    (category, _) => {
                        tracing::warn!("unexpected items for {} search", category.label())
                    }
                },
                Err(e) => self.error = Some(e.to_string()),
            }
        }

        let storage = self.storage.as_ref();
        remember(storage, slot::SEARCH_ARTISTS, &self.artists);
        remember(storage, slot::SEARCH_TRACKS, &self.tracks);
        remember(storage, slot::SEARCH_LYRICS, &self.lyrics);
    }
}
