use crate::catalog::Catalog;
use crate::catalog::source::CatalogSource;
use crate::catalog::streams::Subscription;
use crate::mxm::models::{Artist, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LandingTab {
    #[default]
    Tracks,
    Artists,
}

/// Top tracks and artists, one tab each.
pub struct LandingPage<S> {
    catalog: Catalog<S>,
    pub tab: LandingTab,
    pub tracks: Vec<Track>,
    pub artists: Vec<Artist>,
    pub error: Option<String>,
    tracks_sub: Subscription<Vec<Track>>,
    artists_sub: Subscription<Vec<Artist>>,
}

impl<S: CatalogSource> LandingPage<S> {
    pub fn new(catalog: Catalog<S>) -> Self {
        let tracks_sub = catalog.streams().popular_tracks.subscribe();
        let artists_sub = catalog.streams().popular_artists.subscribe();
        Self {
            catalog,
            tab: LandingTab::default(),
            tracks: Vec::new(),
            artists: Vec::new(),
            error: None,
            tracks_sub,
            artists_sub,
        }
    }

    /// Request both listings and apply what comes back.
    pub async fn open(&mut self) {
        // Outcomes arrive on the subscriptions.
        let _ = tokio::join!(
            self.catalog.fetch_popular_tracks(),
            self.catalog.fetch_popular_artists()
        );
        self.apply_pending();
    }

    pub fn select_tab(&mut self, tab: LandingTab) {
        self.tab = tab;
    }

    /// Fold in every update published since the last call.
    pub fn apply_pending(&mut self) {
        for update in self.tracks_sub.drain() {
            match update {
                Ok(tracks) => self.tracks = tracks,
                Err(e) => self.error = Some(e.to_string()),
            }
        }
        for update in self.artists_sub.drain() {
            match update {
                Ok(artists) => self.artists = artists,
                Err(e) => self.error = Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{FakeSource, artist, track};
    use crate::config::CatalogConfig;

    #[tokio::test]
    async fn test_open_fills_both_tabs() {
        let catalog = Catalog::new(
            FakeSource {
                popular_tracks: vec![track(1, 10), track(2, 10)],
                popular_artists: vec![artist(10, "Ten")],
                ..Default::default()
            },
            &CatalogConfig::default(),
        );
        let mut page = LandingPage::new(catalog);
        page.open().await;

        assert_eq!(page.tracks.len(), 2);
        assert_eq!(page.artists.len(), 1);
        assert!(page.error.is_none());

        page.select_tab(LandingTab::Artists);
        assert_eq!(page.tab, LandingTab::Artists);
    }

    #[tokio::test]
    async fn test_fetch_by_another_page_reaches_this_one() {
        let catalog = Catalog::new(
            FakeSource {
                popular_tracks: vec![track(1, 10)],
                ..Default::default()
            },
            &CatalogConfig::default(),
        );
        let mut page = LandingPage::new(catalog.clone());
        catalog.fetch_popular_tracks().await.unwrap();

        page.apply_pending();
        assert_eq!(page.tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_shown() {
        let source = FakeSource::default();
        source.set_failing(true);
        let mut page = LandingPage::new(Catalog::new(source, &CatalogConfig::default()));
        page.open().await;

        assert!(page.tracks.is_empty());
        assert!(page.error.as_deref().unwrap().contains("503"));
    }
}
