use super::source::CatalogSource;
use crate::error::{ApiStatus, CatalogError, Result};
use crate::mxm::models::{
    Artist, ArtistId, Lyrics, Page, SearchCategory, SearchItems, SearchPage, Track, TrackId,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory source that records every call.
#[derive(Default)]
pub struct FakeSource {
    pub popular_tracks: Vec<Track>,
    pub popular_artists: Vec<Artist>,
    /// Answers for `artist()`; unknown ids are a 404.
    pub artists: Vec<Artist>,
    /// Returned by `artist()` regardless of the id asked for.
    pub wrong_artist: Option<Artist>,
    /// Full listing, paged by `artist_tracks()`.
    pub artist_tracks: Vec<Track>,
    pub tracks: Vec<Track>,
    pub lyrics: Vec<(TrackId, Lyrics)>,
    pub search_available: u64,
    pub failing: AtomicBool,
    /// Every call made, in order. Public so tests can build the fake with
    /// struct update syntax.
    pub call_log: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn record(&self, call: String) -> Result<()> {
        self.call_log.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Api(ApiStatus::Unavailable));
        }
        Ok(())
    }
}

pub fn artist(id: ArtistId, name: &str) -> Artist {
    Artist {
        artist_id: id,
        artist_name: name.to_string(),
        ..Default::default()
    }
}

pub fn track(id: TrackId, artist_id: ArtistId) -> Track {
    Track {
        track_id: id,
        track_name: format!("Track {id}"),
        artist_id,
        artist_name: format!("Artist {artist_id}"),
        has_lyrics: 1,
        ..Default::default()
    }
}

impl CatalogSource for FakeSource {
    async fn popular_tracks(&self) -> Result<Vec<Track>> {
        self.record("popular_tracks".into())?;
        Ok(self.popular_tracks.clone())
    }

    async fn popular_artists(&self) -> Result<Vec<Artist>> {
        self.record("popular_artists".into())?;
        Ok(self.popular_artists.clone())
    }

    async fn artist(&self, artist_id: ArtistId) -> Result<Artist> {
        self.record(format!("artist:{artist_id}"))?;
        if let Some(a) = &self.wrong_artist {
            return Ok(a.clone());
        }
        self.artists
            .iter()
            .find(|a| a.artist_id == artist_id)
            .cloned()
            .ok_or(CatalogError::Api(ApiStatus::NotFound))
    }

    async fn artist_tracks(
        &self,
        artist_id: ArtistId,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Track>> {
        self.record(format!("artist_tracks:{artist_id}:{page}:{page_size}"))?;
        let start = ((page.max(1) - 1) * page_size) as usize;
        let items = self
            .artist_tracks
            .iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(Page {
            available: self.artist_tracks.len() as u64,
            items,
        })
    }

    async fn track(&self, track_id: TrackId) -> Result<Track> {
        self.record(format!("track:{track_id}"))?;
        self.tracks
            .iter()
            .find(|t| t.track_id == track_id)
            .cloned()
            .ok_or(CatalogError::Api(ApiStatus::NotFound))
    }

    async fn lyrics(&self, track_id: TrackId) -> Result<Lyrics> {
        self.record(format!("lyrics:{track_id}"))?;
        self.lyrics
            .iter()
            .find(|(id, _)| *id == track_id)
            .map(|(_, l)| l.clone())
            .ok_or(CatalogError::Api(ApiStatus::NotFound))
    }

    async fn search(
        &self,
        category: SearchCategory,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage> {
        self.record(format!("search:{}:{query}:{page}:{page_size}", category.label()))?;
        let items = match category {
            SearchCategory::Artists => SearchItems::Artists(self.popular_artists.clone()),
            SearchCategory::Tracks | SearchCategory::Lyrics => {
                SearchItems::Tracks(self.popular_tracks.clone())
            }
        };
        Ok(SearchPage {
            category,
            page,
            available: self.search_available,
            items,
        })
    }
}
