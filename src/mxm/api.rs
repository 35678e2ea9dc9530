use crate::config::ApiConfig;
use crate::error::{ApiStatus, CatalogError, Result};
use crate::mxm::models::{
    Artist, ArtistBody, ArtistId, ArtistListBody, Envelope, Header, Lyrics, LyricsBody, Page,
    SearchCategory, SearchItems, SearchPage, Track, TrackBody, TrackId, TrackListBody,
};
use anyhow::Context;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::sync::Arc;

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Musixmatch web API client.
#[derive(Debug, Clone)]
pub struct MxmClient {
    inner: Arc<Inner>,
}

impl MxmClient {
    const USER_AGENT: &'static str = "lyrica/0.1.0";

    pub fn new(cfg: &ApiConfig) -> anyhow::Result<Self> {
        if cfg.api_key.is_empty() {
            tracing::warn!(
                "no api key configured; set {} or api.api_key in the config file",
                crate::config::defaults::API_KEY_ENV
            );
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(Self::USER_AGENT)
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: cfg.base_url.clone(),
                api_key: cfg.api_key.clone(),
            }),
        })
    }

    /// Top rated tracks that have lyrics.
    pub async fn popular_tracks(&self) -> Result<Vec<Track>> {
        let (_, body) = self
            .call(
                "track.search",
                &[("f_has_lyrics", "true".into()), ("s_track_rating", "desc".into())],
            )
            .await?;
        decode_track_list(body)
    }

    /// Top rated artists.
    pub async fn popular_artists(&self) -> Result<Vec<Artist>> {
        let (_, body) = self
            .call("artist.search", &[("s_artist_rating", "desc".into())])
            .await?;
        decode_artist_list(body)
    }

    pub async fn artist(&self, artist_id: ArtistId) -> Result<Artist> {
        let (_, body) = self
            .call("artist.get", &[("artist_id", artist_id.to_string())])
            .await?;
        Ok(serde_json::from_value::<ArtistBody>(body)?.artist)
    }

    /// One page of an artist's tracks, best rated first.
    pub async fn artist_tracks(
        &self,
        artist_id: ArtistId,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Track>> {
        let (header, body) = self
            .call(
                "track.search",
                &[
                    ("f_artist_id", artist_id.to_string()),
                    ("f_has_lyrics", "true".into()),
                    ("s_track_rating", "desc".into()),
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                ],
            )
            .await?;
        Ok(Page {
            available: header.available,
            items: decode_track_list(body)?,
        })
    }

    pub async fn track(&self, track_id: TrackId) -> Result<Track> {
        let (_, body) = self
            .call("track.get", &[("track_id", track_id.to_string())])
            .await?;
        Ok(serde_json::from_value::<TrackBody>(body)?.track)
    }

    pub async fn lyrics(&self, track_id: TrackId) -> Result<Lyrics> {
        let (_, body) = self
            .call("track.lyrics.get", &[("track_id", track_id.to_string())])
            .await?;
        Ok(serde_json::from_value::<LyricsBody>(body)?.lyrics)
    }

    pub async fn search(
        &self,
        category: SearchCategory,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage> {
        let (method, params) = search_params(category, query, page, page_size);
        let (header, body) = self.call(method, &params).await?;
        let items = match category {
            SearchCategory::Artists => SearchItems::Artists(decode_artist_list(body)?),
            SearchCategory::Tracks | SearchCategory::Lyrics => {
                SearchItems::Tracks(decode_track_list(body)?)
            }
        };
        Ok(SearchPage {
            category,
            page,
            available: header.available,
            items,
        })
    }

    /// Issue any API method and return the decoded envelope without checking
    /// the status code.
    pub async fn call_raw(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value> {
        let raw = self.get_text(method, params).await?;
        Ok(serde_json::from_str(strip_jsonp(&raw))?)
    }

    async fn call(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<(Header, serde_json::Value)> {
        let raw = self.get_text(method, params).await?;
        unwrap_envelope(&raw).inspect_err(|e| tracing::warn!("{method} failed: {e}"))
    }

    async fn get_text(&self, method: &str, params: &[(&str, String)]) -> Result<String> {
        let url = build_url(&self.inner.base_url, &self.inner.api_key, method, params);
        tracing::debug!("GET {method} {:?}", params);

        let response = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .inspect_err(|e| tracing::warn!("{method} transport error: {e}"))?;

        // The API reports its own status in the envelope, but proxies and
        // outages surface as plain HTTP errors.
        if !response.status().is_success() {
            let code = response.status().as_u16();
            tracing::warn!("{method} http status {code}");
            return Err(CatalogError::Api(
                ApiStatus::from_code(code).unwrap_or(ApiStatus::Other(code)),
            ));
        }

        Ok(response.text().await?)
    }
}

fn search_params(
    category: SearchCategory,
    query: &str,
    page: u32,
    page_size: u32,
) -> (&'static str, Vec<(&'static str, String)>) {
    let mut params = vec![("page", page.to_string()), ("page_size", page_size.to_string())];
    let method = match category {
        SearchCategory::Artists => {
            params.push(("q_artist", query.to_string()));
            "artist.search"
        }
        SearchCategory::Tracks | SearchCategory::Lyrics => {
            let key = if category == SearchCategory::Tracks {
                "q_track"
            } else {
                "q_lyrics"
            };
            params.push((key, query.to_string()));
            params.push(("s_artist_rating", "desc".into()));
            params.push(("s_track_rating", "desc".into()));
            params.push(("f_has_lyrics", "true".into()));
            "track.search"
        }
    };
    (method, params)
}

pub fn build_url(base_url: &str, api_key: &str, method: &str, params: &[(&str, String)]) -> String {
    let mut url = format!(
        "{}/{}?apikey={}&format=json",
        base_url.trim_end_matches('/'),
        method,
        urlencoding::encode(api_key)
    );
    for (k, v) in params {
        url.push_str(&format!("&{}={}", k, urlencoding::encode(v)));
    }
    url
}

/// Strip a `callback({...});` wrapper if the payload has one.
pub fn strip_jsonp(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }
    match (trimmed.find('('), trimmed.rfind(')')) {
        (Some(start), Some(end)) if start < end => trimmed[start + 1..end].trim(),
        _ => trimmed,
    }
}

/// Decode the envelope and fail on any `status_code` other than 200.
pub fn unwrap_envelope(raw: &str) -> Result<(Header, serde_json::Value)> {
    let env: Envelope = serde_json::from_str(strip_jsonp(raw))?;
    let header = env.message.header;
    if let Some(status) = ApiStatus::from_code(header.status_code) {
        return Err(CatalogError::Api(status));
    }
    Ok((header, env.message.body))
}

fn decode_artist_list(body: serde_json::Value) -> Result<Vec<Artist>> {
    let list: ArtistListBody = serde_json::from_value(body)?;
    Ok(list.artist_list.into_iter().map(|item| item.artist).collect())
}

fn decode_track_list(body: serde_json::Value) -> Result<Vec<Track>> {
    let list: TrackListBody = serde_json::from_value(body)?;
    Ok(list.track_list.into_iter().map(|item| item.track).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKS: &str = r#"{"message":{"header":{"status_code":200,"execute_time":0.01,"available":45},
        "body":{"track_list":[
            {"track":{"track_id":1,"track_name":"One","artist_id":7,"artist_name":"Seven"}},
            {"track":{"track_id":2,"track_name":"Two","artist_id":7,"artist_name":"Seven"}}
        ]}}}"#;

    #[test]
    fn test_build_url_encodes_values() {
        let url = build_url(
            "https://api.musixmatch.com/ws/1.1/",
            "k3y",
            "track.search",
            &[("q_track", "hey jude".into()), ("page", "2".into())],
        );
        assert_eq!(
            url,
            "https://api.musixmatch.com/ws/1.1/track.search?apikey=k3y&format=json&q_track=hey%20jude&page=2"
        );
    }

    #[test]
    fn test_search_params_per_category() {
        let (method, params) = search_params(SearchCategory::Artists, "abba", 1, 10);
        assert_eq!(method, "artist.search");
        assert!(params.contains(&("q_artist", "abba".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "f_has_lyrics"));

        let (method, params) = search_params(SearchCategory::Lyrics, "love", 3, 10);
        assert_eq!(method, "track.search");
        assert!(params.contains(&("q_lyrics", "love".to_string())));
        assert!(params.contains(&("page", "3".to_string())));
        assert!(params.contains(&("f_has_lyrics", "true".to_string())));
    }

    #[test]
    fn test_strip_jsonp() {
        assert_eq!(strip_jsonp(r#"callback({"a":1});"#), r#"{"a":1}"#);
        assert_eq!(strip_jsonp("  {\"a\":1}\n"), r#"{"a":1}"#);
        assert_eq!(strip_jsonp("garbage"), "garbage");
    }

    #[test]
    fn test_unwrap_track_list() {
        let (header, body) = unwrap_envelope(TRACKS).unwrap();
        assert_eq!(header.available, 45);
        let tracks = decode_track_list(body).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].track_name, "Two");
    }

    #[test]
    fn test_unwrap_callback_wrapped_envelope() {
        let wrapped = format!("cb({TRACKS});");
        let (header, _) = unwrap_envelope(&wrapped).unwrap();
        assert_eq!(header.status_code, 200);
    }

    #[test]
    fn test_non_200_status_is_failure() {
        let err = unwrap_envelope(r#"{"message":{"header":{"status_code":402},"body":[]}}"#)
            .unwrap_err();
        assert_eq!(err, CatalogError::Api(ApiStatus::UsageLimit));
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        let err = unwrap_envelope("<html>oops</html>").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn test_decode_artist_body() {
        let (_, body) = unwrap_envelope(
            r#"{"message":{"header":{"status_code":200},"body":{"artist":{"artist_id":7,"artist_name":"Seven","artist_rating":88}}}}"#,
        )
        .unwrap();
        let artist = serde_json::from_value::<ArtistBody>(body).unwrap().artist;
        assert_eq!(artist.artist_id, 7);
        assert_eq!(artist.artist_rating, 88);
    }
}
