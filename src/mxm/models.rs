use serde::{Deserialize, Serialize};

pub type ArtistId = u64;
pub type TrackId = u64;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Artist {
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_rating: u32,
    pub artist_twitter_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    pub track_id: TrackId,
    pub track_name: String,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub album_id: u64,
    pub album_name: String,
    pub album_coverart_100x100: String,
    /// Length in seconds; the API reports 0 when unknown.
    pub track_length: u32,
    pub track_rating: u32,
    pub has_lyrics: u8,
    pub lyrics_id: u64,
}

impl Track {
    pub fn has_lyrics(&self) -> bool {
        self.has_lyrics != 0
    }

    /// "m:ss", or `None` when the length is unknown.
    pub fn duration_label(&self) -> Option<String> {
        if self.track_length == 0 {
            return None;
        }
        Some(format!("{}:{:02}", self.track_length / 60, self.track_length % 60))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Lyrics {
    pub lyrics_id: u64,
    pub lyrics_body: String,
    pub restricted: u8,
    pub lyrics_copyright: String,
    pub pixel_tracking_url: String,
}

impl Lyrics {
    pub fn is_restricted(&self) -> bool {
        self.restricted != 0
    }

    pub fn lines(&self) -> Vec<&str> {
        self.lyrics_body.split('\n').collect()
    }
}

/// `{ "message": { "header": {...}, "body": ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub message: Message,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub header: Header,
    // Error responses carry `""` or `[]` here, so the body stays untyped until
    // the status code has been checked.
    #[serde(default)]
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Header {
    pub status_code: u16,
    pub available: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistItem {
    pub artist: Artist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    pub track: Track,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistListBody {
    pub artist_list: Vec<ArtistItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackListBody {
    pub track_list: Vec<TrackItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistBody {
    pub artist: Artist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackBody {
    pub track: Track,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LyricsBody {
    pub lyrics: Lyrics,
}

/// One page of a list query together with the total the API reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub available: u64,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchCategory {
    Artists,
    Tracks,
    Lyrics,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 3] = [Self::Artists, Self::Tracks, Self::Lyrics];

    pub fn label(self) -> &'static str {
        match self {
            Self::Artists => "artists",
            Self::Tracks => "tracks",
            Self::Lyrics => "lyrics",
        }
    }
}

/// Results of a category search. Lyrics searches return tracks whose lyrics
/// match the query.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchItems {
    Artists(Vec<Artist>),
    Tracks(Vec<Track>),
}

impl SearchItems {
    pub fn len(&self) -> usize {
        match self {
            Self::Artists(a) => a.len(),
            Self::Tracks(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub category: SearchCategory,
    pub page: u32,
    pub available: u64,
    pub items: SearchItems,
}
