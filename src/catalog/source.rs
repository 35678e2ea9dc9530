use crate::error::Result;
use crate::mxm::api::MxmClient;
use crate::mxm::models::{
    Artist, ArtistId, Lyrics, Page, SearchCategory, SearchPage, Track, TrackId,
};
use std::future::Future;

/// Where a catalog session gets its data from.
pub trait CatalogSource: Send + Sync + 'static {
    fn popular_tracks(&self) -> impl Future<Output = Result<Vec<Track>>> + Send;

    fn popular_artists(&self) -> impl Future<Output = Result<Vec<Artist>>> + Send;

    fn artist(&self, artist_id: ArtistId) -> impl Future<Output = Result<Artist>> + Send;

    fn artist_tracks(
        &self,
        artist_id: ArtistId,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Page<Track>>> + Send;

    fn track(&self, track_id: TrackId) -> impl Future<Output = Result<Track>> + Send;

    fn lyrics(&self, track_id: TrackId) -> impl Future<Output = Result<Lyrics>> + Send;

    fn search(
        &self,
        category: SearchCategory,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<SearchPage>> + Send;
}

impl CatalogSource for MxmClient {
    async fn popular_tracks(&self) -> Result<Vec<Track>> {
        MxmClient::popular_tracks(self).await
    }

    async fn popular_artists(&self) -> Result<Vec<Artist>> {
        MxmClient::popular_artists(self).await
    }

    async fn artist(&self, artist_id: ArtistId) -> Result<Artist> {
        MxmClient::artist(self, artist_id).await
    }

    async fn artist_tracks(
        &self,
        artist_id: ArtistId,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Track>> {
        MxmClient::artist_tracks(self, artist_id, page, page_size).await
    }

    async fn track(&self, track_id: TrackId) -> Result<Track> {
        MxmClient::track(self, track_id).await
    }

    async fn lyrics(&self, track_id: TrackId) -> Result<Lyrics> {
        MxmClient::lyrics(self, track_id).await
    }

    async fn search(
        &self,
        category: SearchCategory,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage> {
        MxmClient::search(self, category, query, page, page_size).await
    }
}
