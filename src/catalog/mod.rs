//! Catalog session: the data-access layer shared by every page.
//!
//! A [`Catalog`] owns the entity cache and the result streams for one
//! session. Pages subscribe to the streams they care about and ask the
//! catalog to fetch; whatever completes is cached and published to all
//! current subscribers, in completion order.

pub mod cache;
pub mod debounce;
pub mod paging;
pub mod source;
pub mod streams;

#[cfg(test)]
pub mod testing;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::mxm::models::{Artist, ArtistId, SearchCategory, SearchItems, SearchPage, Track, TrackId};
use cache::EntityCache;
use source::CatalogSource;
use std::sync::{Arc, Mutex, MutexGuard};
use streams::{ArtistTracksPage, Channel, Streams, TrackLyrics};

#[derive(Debug, Default)]
struct SessionState {
    popular_tracks: Vec<Track>,
    popular_artists: Vec<Artist>,
    cache: EntityCache,
}

struct Inner<S> {
    source: S,
    state: Mutex<SessionState>,
    streams: Streams,
    page_size: u32,
    artist_page_size: u32,
}

pub struct Catalog<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: CatalogSource> Catalog<S> {
    pub fn new(source: S, cfg: &CatalogConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                state: Mutex::new(SessionState {
                    cache: EntityCache::new(cfg.track_dedup),
                    ..SessionState::default()
                }),
                streams: Streams::new(cfg.stream_capacity),
                page_size: cfg.page_size,
                artist_page_size: cfg.artist_page_size,
            }),
        }
    }

    pub fn streams(&self) -> &Streams {
        &self.inner.streams
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Page size used for searches.
    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Page size used for an artist's track listing.
    pub fn artist_page_size(&self) -> u32 {
        self.inner.artist_page_size
    }

    // Guards are only held for synchronous updates, never across an await.
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cache_artists(&self, artists: &[Artist]) {
        self.state().cache.cache_artists(artists);
    }

    pub fn cached_artist(&self, artist_id: ArtistId) -> Option<Artist> {
        self.state().cache.artist(artist_id).cloned()
    }

    #[allow(dead_code)]
    pub fn cached_artists(&self) -> Vec<Artist> {
        self.state().cache.artists().to_vec()
    }

    #[allow(dead_code)]
    pub fn cached_tracks_for_artist(&self, artist_id: ArtistId) -> Vec<Track> {
        self.state().cache.tracks_for_artist(artist_id).to_vec()
    }

    /// Publish popular tracks, calling the API only the first time.
    pub async fn fetch_popular_tracks(&self) -> Result<Vec<Track>> {
        let cached = self.state().popular_tracks.clone();
        if !cached.is_empty() {
            tracing::debug!("popular tracks served from cache");
            return settle(&self.inner.streams.popular_tracks, Ok(cached));
        }

        let result = self.inner.source.popular_tracks().await;
        if let Ok(tracks) = &result {
            self.state().popular_tracks = tracks.clone();
        }
        settle(&self.inner.streams.popular_tracks, result)
    }

    /// Publish popular artists, calling the API only the first time. The
    /// artists also go into the entity cache.
    pub async fn fetch_popular_artists(&self) -> Result<Vec<Artist>> {
        let cached = self.state().popular_artists.clone();
        let result = if cached.is_empty() {
            self.inner.source.popular_artists().await
        } else {
            tracing::debug!("popular artists served from cache");
            Ok(cached)
        };

        if let Ok(artists) = &result {
            let mut state = self.state();
            if state.popular_artists.is_empty() {
                state.popular_artists = artists.clone();
            }
            state.cache.cache_artists(artists);
        }
        settle(&self.inner.streams.popular_artists, result)
    }

    /// Fetch one artist. A response for a different id is dropped: it is
    /// neither cached nor published.
    pub async fn fetch_artist(&self, artist_id: ArtistId) -> Result<Artist> {
        let result = self.inner.source.artist(artist_id).await;
        if let Ok(artist) = &result {
            if artist.artist_id != artist_id {
                tracing::warn!(
                    "artist.get for {artist_id} returned {}; dropped",
                    artist.artist_id
                );
                return Err(CatalogError::IdMismatch {
                    requested: artist_id,
                    received: artist.artist_id,
                });
            }
            self.state().cache.cache_artists(std::slice::from_ref(artist));
        }
        settle(&self.inner.streams.artist, result)
    }

    pub async fn fetch_tracks_for_artist(
        &self,
        artist_id: ArtistId,
        page: u32,
        page_size: u32,
    ) -> Result<ArtistTracksPage> {
        let result = self
            .inner
            .source
            .artist_tracks(artist_id, page, page_size)
            .await
            .map(|p| ArtistTracksPage {
                artist_id,
                page,
                page_size,
                available: p.available,
                tracks: p.items,
            });
        if let Ok(p) = &result {
            self.state()
                .cache
                .cache_tracks_for_artist(artist_id, &p.tracks);
        }
        settle(&self.inner.streams.artist_tracks, result)
    }

    pub async fn fetch_track(&self, track_id: TrackId) -> Result<Track> {
        let result = self.inner.source.track(track_id).await;
        if let Ok(track) = &result
            && track.track_id != track_id
        {
            tracing::warn!("track.get for {track_id} returned {}; dropped", track.track_id);
            return Err(CatalogError::IdMismatch {
                requested: track_id,
                received: track.track_id,
            });
        }
        settle(&self.inner.streams.track, result)
    }

    /// Lyrics are fetched fresh every time.
    pub async fn fetch_lyrics(&self, track_id: TrackId) -> Result<TrackLyrics> {
        let result = self
            .inner
            .source
            .lyrics(track_id)
            .await
            .map(|lyrics| TrackLyrics { track_id, lyrics });
        settle(&self.inner.streams.lyrics, result)
    }

    /// One page of search results. Not published on any stream; artist
    /// results are added to the entity cache.
    pub async fn search(
        &self,
        category: SearchCategory,
        query: &str,
        page: u32,
    ) -> Result<SearchPage> {
        let result = self
            .inner
            .source
            .search(category, query, page, self.inner.page_size)
            .await;
        match &result {
            Ok(found) => {
                if found.items.is_empty() {
                    tracing::debug!("no {} results for {query:?} on page {page}", category.label());
                } else {
                    tracing::debug!(
                        "{} {} results for {query:?} on page {page}",
                        found.items.len(),
                        category.label()
                    );
                }
                if let SearchItems::Artists(artists) = &found.items {
                    self.cache_artists(artists);
                }
            }
            Err(e) => tracing::warn!("{} search for {query:?} failed: {e}", category.label()),
        }
        result
    }
}

fn settle<T: Clone>(channel: &Channel<T>, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::warn!("fetch failed: {e}");
    }
    channel.publish(result.clone());
    result
}
