use super::{recall, remember};
use crate::catalog::Catalog;
use crate::catalog::source::CatalogSource;
use crate::catalog::streams::{Subscription, TrackLyrics};
use crate::mxm::models::{Lyrics, Track, TrackId};
use crate::storage::{SharedStorage, slot};

pub struct TrackPage<S> {
    catalog: Catalog<S>,
    storage: Option<SharedStorage>,
    track_id: TrackId,
    pub track: Option<Track>,
    pub lyrics: Option<Lyrics>,
    pub error: Option<String>,
    track_sub: Subscription<Track>,
    lyrics_sub: Subscription<TrackLyrics>,
}

impl<S: CatalogSource> TrackPage<S> {
    pub fn new(catalog: Catalog<S>, track_id: TrackId, storage: Option<SharedStorage>) -> Self {
        let track = recall::<Option<Track>>(storage.as_ref(), slot::TRACK)
            .filter(|t| t.track_id == track_id);
        let track_sub = catalog.streams().track.subscribe();
        let lyrics_sub = catalog.streams().lyrics.subscribe();
        Self {
            catalog,
            storage,
            track_id,
            track,
            lyrics: None,
            error: None,
            track_sub,
            lyrics_sub,
        }
    }

    pub async fn open(&mut self) {
        let (track, lyrics) = tokio::join!(
            self.catalog.fetch_track(self.track_id),
            self.catalog.fetch_lyrics(self.track_id)
        );
        if let Err(e) = track {
            self.error = Some(e.to_string());
        }
        if let Err(e) = lyrics {
            self.error = Some(e.to_string());
        }
        self.apply_pending();
    }

    pub fn apply_pending(&mut self) {
        for update in self.track_sub.drain() {
            if let Ok(track) = update
                && track.track_id == self.track_id
            {
                remember(self.storage.as_ref(), slot::TRACK, &Some(&track));
                self.track = Some(track);
            }
        }
        for update in self.lyrics_sub.drain() {
            if let Ok(found) = update
                && found.track_id == self.track_id
            {
                self.lyrics = Some(found.lyrics);
            }
        }
    }

    pub fn lyrics_lines(&self) -> Vec<&str> {
        self.lyrics.as_ref().map(Lyrics::lines).unwrap_or_default()
    }
}
