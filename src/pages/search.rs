use crate::catalog::Catalog;
use crate::catalog::paging::{PageRecord, SearchPaging};
use crate::catalog::source::CatalogSource;
use crate::mxm::models::{Artist, SearchCategory, SearchItems, SearchPage, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsTab {
    #[default]
    All,
    Artists,
    Tracks,
    Lyrics,
}

impl ResultsTab {
    pub fn category(self) -> Option<SearchCategory> {
        match self {
            Self::All => None,
            Self::Artists => Some(SearchCategory::Artists),
            Self::Tracks => Some(SearchCategory::Tracks),
            Self::Lyrics => Some(SearchCategory::Lyrics),
        }
    }
}

/// Full search results, one table per category, each with its own
/// "load more".
pub struct SearchResultsPage<S> {
    catalog: Catalog<S>,
    pub query: String,
    pub tab: ResultsTab,
    pub paging: SearchPaging,
    pub artists: Vec<Artist>,
    pub tracks: Vec<Track>,
    /// Tracks whose lyrics match the query.
    pub lyrics: Vec<Track>,
    pub error: Option<String>,
}

impl<S: CatalogSource> SearchResultsPage<S> {
    pub fn new(catalog: Catalog<S>) -> Self {
        Self {
            catalog,
            query: String::new(),
            tab: ResultsTab::default(),
            paging: SearchPaging::default(),
            artists: Vec::new(),
            tracks: Vec::new(),
            lyrics: Vec::new(),
            error: None,
        }
    }

    /// Show `query` on `tab`. Switching tabs for the same query reuses the
    /// results already loaded; a new query starts over in every category.
    /// A category whose first page never arrived is asked for it again.
    pub async fn show(&mut self, query: &str, tab: ResultsTab) {
        self.tab = tab;
        if query != self.query {
            self.query = query.to_string();
            self.paging.reset();
            self.artists.clear();
            self.tracks.clear();
            self.lyrics.clear();
        }

        let pending = |c: SearchCategory| self.paging.get(c).max_page().is_none();
        let (want_artists, want_tracks, want_lyrics) = (
            pending(SearchCategory::Artists),
            pending(SearchCategory::Tracks),
            pending(SearchCategory::Lyrics),
        );
        if !(want_artists || want_tracks || want_lyrics) {
            return;
        }
        self.error = None;

        let query = self.query.as_str();
        let first_page = |wanted: bool, category: SearchCategory| {
            let catalog = &self.catalog;
            async move {
                if wanted {
                    Some(catalog.search(category, query, 1).await)
                } else {
                    None
                }
            }
        };
        let (artists, tracks, lyrics) = tokio::join!(
            first_page(want_artists, SearchCategory::Artists),
            first_page(want_tracks, SearchCategory::Tracks),
            first_page(want_lyrics, SearchCategory::Lyrics)
        );
        for result in [artists, tracks, lyrics].into_iter().flatten() {
            self.apply(result);
        }
    }

    /// "Load more" for the active tab. A no-op on the All tab and once the
    /// category has no further pages.
    pub async fn load_more(&mut self) {
        let Some(category) = self.tab.category() else {
            return;
        };
        let Some(page) = self.paging.get(category).next_page() else {
            tracing::debug!("no more {} results", category.label());
            return;
        };
        let result = self.catalog.search(category, &self.query, page).await;
        self.apply(result);
    }

    fn apply(&mut self, result: crate::error::Result<SearchPage>) {
        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };
        let accepted = self.paging.get_mut(page.category).record_response(
            page.page,
            page.available,
            self.catalog.page_size(),
        );
        if !accepted {
            return;
        }
        match (page.category, page.items) {
            (SearchCategory::Artists, SearchItems::Artists(a)) => self.artists.extend(a),
            (SearchCategory::Tracks, SearchItems::Tracks(t)) => self.tracks.extend(t),
            (SearchCategory::Lyrics, SearchItems::Tracks(t)) => self.lyrics.extend(t),
            (category, _) => tracing::warn!("unexpected items for {} search", category.label()),
        }
    }

    pub fn record(&self, category: SearchCategory) -> &PageRecord {
        self.paging.get(category)
    }

    pub fn is_visible(&self, category: SearchCategory) -> bool {
        self.tab == ResultsTab::All || self.tab.category() == Some(category)
    }

    pub fn more_available(&self, category: SearchCategory) -> bool {
        self.paging.get(category).can_load_more()
    }

    /// Count shown on a category tab; "-" when nothing is known.
    pub fn tab_count(&self, category: SearchCategory) -> String {
        count_label(self.paging.get(category).available())
    }

    pub fn all_tab_count(&self) -> String {
        count_label(
            SearchCategory::ALL
                .iter()
                .map(|c| self.paging.get(*c).available())
                .sum(),
        )
    }
}

fn count_label(n: u64) -> String {
    if n == 0 { "-".to_string() } else { n.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{FakeSource, artist, track};
    use crate::config::CatalogConfig;

    fn page(available: u64) -> SearchResultsPage<FakeSource> {
        SearchResultsPage::new(Catalog::new(
            FakeSource {
                popular_artists: vec![artist(1, "A")],
                popular_tracks: vec![track(1, 1), track(2, 1)],
                search_available: available,
                ..Default::default()
            },
            &CatalogConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_new_query_searches_every_category() {
        let mut p = page(25);
        p.show("abc", ResultsTab::All).await;

        assert_eq!(p.artists.len(), 1);
        assert_eq!(p.tracks.len(), 2);
        assert_eq!(p.lyrics.len(), 2);
        assert_eq!(p.record(SearchCategory::Tracks).max_page(), Some(3));
        assert_eq!(p.catalog.source().calls().len(), 3);
        assert_eq!(p.tab_count(SearchCategory::Artists), "25");
        assert_eq!(p.all_tab_count(), "75");
    }

    #[tokio::test]
    async fn test_tab_switch_does_not_search_again() {
        let mut p = page(25);
        p.show("abc", ResultsTab::All).await;
        p.show("abc", ResultsTab::Tracks).await;

        assert_eq!(p.tab, ResultsTab::Tracks);
        assert!(p.is_visible(SearchCategory::Tracks));
        assert!(!p.is_visible(SearchCategory::Artists));
        assert_eq!(p.catalog.source().calls().len(), 3);
    }

    #[tokio::test]
    async fn test_load_more_stops_at_max_page() {
        let mut p = page(25);
        p.show("abc", ResultsTab::Tracks).await;

        p.load_more().await;
        p.load_more().await;
        assert_eq!(p.record(SearchCategory::Tracks).page_number(), 3);
        assert!(!p.more_available(SearchCategory::Tracks));

        p.load_more().await;
        assert_eq!(p.catalog.source().count("search:tracks"), 3);
        assert_eq!(p.tracks.len(), 6);
        // Other categories untouched.
        assert_eq!(p.record(SearchCategory::Lyrics).page_number(), 1);
    }

    #[tokio::test]
    async fn test_load_more_on_all_tab_is_noop() {
        let mut p = page(25);
        p.show("abc", ResultsTab::All).await;
        p.load_more().await;
        assert_eq!(p.catalog.source().calls().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_results_show_dash() {
        let mut p = page(0);
        p.show("zzz", ResultsTab::Artists).await;
        assert_eq!(p.tab_count(SearchCategory::Artists), "-");
        assert_eq!(p.all_tab_count(), "-");
        assert_eq!(p.record(SearchCategory::Artists).max_page(), Some(0));
        assert!(!p.more_available(SearchCategory::Artists));
    }

    #[tokio::test]
    async fn test_new_query_resets_paging() {
        let mut p = page(25);
        p.show("abc", ResultsTab::Tracks).await;
        p.load_more().await;
        p.show("xyz", ResultsTab::Tracks).await;
        assert_eq!(p.record(SearchCategory::Tracks).page_number(), 1);
        assert_eq!(p.tracks.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_first_page_is_searched_again() {
        let mut p = page(25);
        p.catalog.source().set_failing(true);
        p.show("abc", ResultsTab::Tracks).await;
        assert!(p.error.is_some());
        assert_eq!(p.record(SearchCategory::Tracks).max_page(), None);
        assert_eq!(p.catalog.source().calls().len(), 3);

        p.catalog.source().set_failing(false);
        p.show("abc", ResultsTab::Tracks).await;
        assert!(p.error.is_none());
        assert_eq!(p.catalog.source().calls().len(), 6);
        assert_eq!(p.tracks.len(), 2);
        assert_eq!(p.record(SearchCategory::Tracks).next_page(), Some(2));

        // Every category has its first page now; showing again is free.
        p.show("abc", ResultsTab::All).await;
        assert_eq!(p.catalog.source().calls().len(), 6);
    }

    #[tokio::test]
    async fn test_failed_load_more_can_be_retried() {
        let mut p = page(25);
        p.show("abc", ResultsTab::Tracks).await;
        p.catalog.source().set_failing(true);
        p.load_more().await;
        assert!(p.error.is_some());
        assert_eq!(p.record(SearchCategory::Tracks).page_number(), 1);

        p.catalog.source().set_failing(false);
        p.load_more().await;
        assert_eq!(p.record(SearchCategory::Tracks).page_number(), 2);
    }
}
