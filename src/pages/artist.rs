use super::{recall, remember};
use crate::catalog::Catalog;
use crate::catalog::paging::ArtistTracksPager;
use crate::catalog::source::CatalogSource;
use crate::catalog::streams::{ArtistTracksPage, Subscription};
use crate::mxm::models::{Artist, ArtistId, Track};
use crate::storage::{SharedStorage, slot};

/// Artist details with an incrementally loaded track table.
pub struct ArtistPage<S> {
    catalog: Catalog<S>,
    storage: Option<SharedStorage>,
    artist_id: ArtistId,
    pub artist: Option<Artist>,
    pub tracks: Vec<Track>,
    pub pager: ArtistTracksPager,
    pub error: Option<String>,
    artist_sub: Subscription<Artist>,
    tracks_sub: Subscription<ArtistTracksPage>,
}

impl<S: CatalogSource> ArtistPage<S> {
    /// Starts from the cached artist, or the one persisted last session when
    /// it is the same artist.
    pub fn new(catalog: Catalog<S>, artist_id: ArtistId, storage: Option<SharedStorage>) -> Self {
        let artist = catalog.cached_artist(artist_id).or_else(|| {
            recall::<Option<Artist>>(storage.as_ref(), slot::ARTIST)
                .filter(|a| a.artist_id == artist_id)
        });
        let artist_sub = catalog.streams().artist.subscribe();
        let tracks_sub = catalog.streams().artist_tracks.subscribe();
        let pager = ArtistTracksPager::new(catalog.artist_page_size());

        Self {
            catalog,
            storage,
            artist_id,
            artist,
            tracks: Vec::new(),
            pager,
            error: None,
            artist_sub,
            tracks_sub,
        }
    }

    /// Refresh the artist and load the first page of tracks.
    pub async fn open(&mut self) {
        let artist = self.catalog.fetch_artist(self.artist_id);
        let first_page = self.request_next_page();
        let (artist, first_page) = tokio::join!(artist, first_page);
        if let Err(e) = artist {
            self.error = Some(e.to_string());
        }
        self.finish_page_request(first_page);
    }

    /// "Load more" button. Does nothing once every page has been loaded.
    pub async fn load_more(&mut self) {
        let outcome = self.request_next_page().await;
        self.finish_page_request(outcome);
    }

    async fn request_next_page(&self) -> Option<crate::error::Result<ArtistTracksPage>> {
        let Some(page) = self.pager.next_page() else {
            tracing::debug!("artist {}: no more tracks", self.artist_id);
            return None;
        };
        Some(
            self.catalog
                .fetch_tracks_for_artist(self.artist_id, page, self.pager.page_size())
                .await,
        )
    }

    fn finish_page_request(&mut self, outcome: Option<crate::error::Result<ArtistTracksPage>>) {
        if let Some(Err(e)) = outcome {
            self.error = Some(e.to_string());
        }
        self.apply_pending();
    }

    /// Fold in published updates for this artist. Updates for other artists,
    /// pages fetched with another page size, and pages the pager is not
    /// expecting, are skipped. Failures are taken
    /// from this page's own requests, since a stream failure cannot be tied
    /// to an artist.
    pub fn apply_pending(&mut self) {
        for update in self.artist_sub.drain() {
            if let Ok(artist) = update
                && artist.artist_id == self.artist_id
            {
                remember(self.storage.as_ref(), slot::ARTIST, &Some(&artist));
                self.artist = Some(artist);
            }
        }
        for update in self.tracks_sub.drain() {
            if let Ok(page) = update
                && page.artist_id == self.artist_id
                && page.page_size == self.pager.page_size()
                && self.pager.record_response(page.page, page.available)
            {
                self.tracks.extend(page.tracks);
            }
        }
    }
}
