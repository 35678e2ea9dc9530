//! Page controllers. Each one owns the state a page renders: it subscribes
//! to the catalog streams it needs, asks the catalog to fetch, and folds
//! whatever arrives into plain fields. Failures land in `error` instead of
//! being swallowed.

pub mod artist;
pub mod landing;
pub mod search;
pub mod search_box;
pub mod track;

use crate::storage::SharedStorage;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use artist::ArtistPage;
pub use landing::{LandingPage, LandingTab};
pub use search::{ResultsTab, SearchResultsPage};
pub use search_box::SearchBox;
pub use track::TrackPage;

fn remember<T: Serialize>(storage: Option<&SharedStorage>, key: &str, value: &T) {
    let Some(storage) = storage else { return };
    let guard = storage.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Err(e) = guard.put(key, value) {
        tracing::warn!("{e:#}");
    }
}

fn recall<T: DeserializeOwned + Default>(storage: Option<&SharedStorage>, key: &str) -> T {
    match storage {
        Some(storage) => storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get_or_default(key),
        None => T::default(),
    }
}
