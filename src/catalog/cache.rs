use crate::config::TrackDedup;
use crate::mxm::models::{Artist, ArtistId, Track};

#[derive(Debug, Clone)]
pub struct ArtistTracks {
    pub artist_id: ArtistId,
    pub tracks: Vec<Track>,
}

/// Artists and per-artist tracks seen during a session. Entries are never
/// evicted; the first copy stored for a key wins.
#[derive(Debug, Clone, Default)]
pub struct EntityCache {
    artists: Vec<Artist>,
    tracks_by_artist: Vec<ArtistTracks>,
    track_dedup: TrackDedup,
}

impl EntityCache {
    pub fn new(track_dedup: TrackDedup) -> Self {
        Self {
            track_dedup,
            ..Self::default()
        }
    }

    /// Store each artist not already cached under its id.
    pub fn cache_artists(&mut self, artists: &[Artist]) {
        for artist in artists {
            let known = self.artists.iter().any(|a| a.artist_id == artist.artist_id);
            if !known {
                self.artists.push(artist.clone());
            }
        }
    }

    /// Store tracks in the bucket for `artist_id`, creating it on first use.
    pub fn cache_tracks_for_artist(&mut self, artist_id: ArtistId, tracks: &[Track]) {
        let idx = match self
            .tracks_by_artist
            .iter()
            .position(|b| b.artist_id == artist_id)
        {
            Some(i) => i,
            None => {
                self.tracks_by_artist.push(ArtistTracks {
                    artist_id,
                    tracks: Vec::new(),
                });
                self.tracks_by_artist.len() - 1
            }
        };
        let dedup = self.track_dedup;
        let bucket = &mut self.tracks_by_artist[idx].tracks;

        for track in tracks {
            let present = match dedup {
                TrackDedup::ArtistId => bucket.iter().any(|t| t.artist_id == artist_id),
                TrackDedup::TrackId => bucket.iter().any(|t| t.track_id == track.track_id),
            };
            if !present {
                bucket.push(track.clone());
            }
        }
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn artist(&self, artist_id: ArtistId) -> Option<&Artist> {
        self.artists.iter().find(|a| a.artist_id == artist_id)
    }

    pub fn tracks_for_artist(&self, artist_id: ArtistId) -> &[Track] {
        self.tracks_by_artist
            .iter()
            .find(|b| b.artist_id == artist_id)
            .map(|b| b.tracks.as_slice())
            .unwrap_or(&[])
    }

    #[allow(dead_code)]
    pub fn buckets(&self) -> &[ArtistTracks] {
        &self.tracks_by_artist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(id: ArtistId, name: &str) -> Artist {
        Artist {
            artist_id: id,
            artist_name: name.to_string(),
            ..Default::default()
        }
    }

    fn track(id: u64, artist_id: ArtistId) -> Track {
        Track {
            track_id: id,
            track_name: format!("Track {id}"),
            artist_id,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_artist_twice_grows_by_one() {
        let mut cache = EntityCache::default();
        cache.cache_artists(&[artist(1, "First")]);
        cache.cache_artists(&[artist(1, "First")]);
        assert_eq!(cache.artists().len(), 1);

        cache.cache_artists(&[artist(2, "Second"), artist(2, "Second again")]);
        assert_eq!(cache.artists().len(), 2);
    }

    #[test]
    fn test_first_seen_artist_wins() {
        let mut cache = EntityCache::default();
        cache.cache_artists(&[artist(1, "Original")]);
        cache.cache_artists(&[artist(1, "Renamed")]);
        assert_eq!(cache.artist(1).unwrap().artist_name, "Original");
        assert!(cache.artist(9).is_none());
    }

    #[test]
    fn test_artist_id_dedup_keeps_only_first_track() {
        // Every track in an artist bucket has the same artist id, so the
        // legacy key admits one track per bucket.
        let mut cache = EntityCache::new(TrackDedup::ArtistId);
        cache.cache_tracks_for_artist(7, &[track(1, 7), track(2, 7), track(3, 7)]);
        cache.cache_tracks_for_artist(7, &[track(4, 7)]);

        let stored = cache.tracks_for_artist(7);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].track_id, 1);
    }

    #[test]
    fn test_artist_id_dedup_admits_foreign_tracks() {
        // A track owned by another artist never matches the bucket's key.
        let mut cache = EntityCache::new(TrackDedup::ArtistId);
        cache.cache_tracks_for_artist(7, &[track(1, 8), track(2, 8)]);
        assert_eq!(cache.tracks_for_artist(7).len(), 2);
    }

    #[test]
    fn test_track_id_dedup() {
        let mut cache = EntityCache::new(TrackDedup::TrackId);
        cache.cache_tracks_for_artist(7, &[track(1, 7), track(2, 7)]);
        cache.cache_tracks_for_artist(7, &[track(2, 7), track(3, 7)]);

        let ids: Vec<u64> = cache.tracks_for_artist(7).iter().map(|t| t.track_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_buckets_are_created_lazily() {
        let mut cache = EntityCache::default();
        assert!(cache.tracks_for_artist(7).is_empty());
        assert!(cache.buckets().is_empty());

        cache.cache_tracks_for_artist(7, &[]);
        assert_eq!(cache.buckets().len(), 1);
        cache.cache_tracks_for_artist(8, &[track(1, 8)]);
        cache.cache_tracks_for_artist(7, &[track(2, 7)]);
        assert_eq!(cache.buckets().len(), 2);
        assert_eq!(cache.tracks_for_artist(8).len(), 1);
    }
}
