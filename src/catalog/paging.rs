//! "Load more" bookkeeping.
//!
//! Page counters only move when a response for the expected page arrives.
//! A failed or stale fetch leaves the record where it was, so the same page
//! can be requested again.

use crate::mxm::models::SearchCategory;

/// Paging state for one search category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    page_number: u32,
    max_page: Option<u32>,
    available: u64,
    awaiting: u32,
}

impl Default for PageRecord {
    fn default() -> Self {
        Self {
            page_number: 1,
            max_page: None,
            available: 0,
            awaiting: 1,
        }
    }
}

impl PageRecord {
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// `None` until the first response has been recorded.
    pub fn max_page(&self) -> Option<u32> {
        self.max_page
    }

    pub fn available(&self) -> u64 {
        self.available
    }

    pub fn can_load_more(&self) -> bool {
        matches!(self.max_page, Some(max) if self.page_number < max)
    }

    /// The page a "load more" should request, if any remain.
    pub fn next_page(&self) -> Option<u32> {
        self.can_load_more().then_some(self.page_number + 1)
    }

    /// Apply a response for `page`. Returns false and changes nothing when the
    /// page is not the one this record is waiting for.
    ///
    /// `available` is taken only while the stored count is still 0, so a
    /// response reporting 0 does not settle it. `max_page` is derived from
    /// the first accepted response and then held.
    pub fn record_response(&mut self, page: u32, available: u64, page_size: u32) -> bool {
        if page != self.awaiting {
            return false;
        }
        self.page_number = page;
        self.awaiting = page + 1;

        if self.available == 0 {
            self.available = available;
        }
        if self.max_page.is_none() {
            self.max_page = Some(max_page_for(self.available, page_size));
        }
        true
    }
}

/// Number of pages needed to list `available` results.
pub fn max_page_for(available: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(available.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

/// One [`PageRecord`] per search category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaging {
    artists: PageRecord,
    tracks: PageRecord,
    lyrics: PageRecord,
}

impl SearchPaging {
    pub fn get(&self, category: SearchCategory) -> &PageRecord {
        match category {
            SearchCategory::Artists => &self.artists,
            SearchCategory::Tracks => &self.tracks,
            SearchCategory::Lyrics => &self.lyrics,
        }
    }

    pub fn get_mut(&mut self, category: SearchCategory) -> &mut PageRecord {
        match category {
            SearchCategory::Artists => &mut self.artists,
            SearchCategory::Tracks => &mut self.tracks,
            SearchCategory::Lyrics => &mut self.lyrics,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Paging for an artist's track listing.
///
/// Unlike [`PageRecord`] the total is refreshed from every response, and more
/// pages are offered while `page * page_size <= available`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistTracksPager {
    page_size: u32,
    loaded_page: u32,
    available: u64,
    more_available: bool,
}

impl ArtistTracksPager {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            loaded_page: 0,
            available: 0,
            more_available: true,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn loaded_page(&self) -> u32 {
        self.loaded_page
    }

    pub fn available(&self) -> u64 {
        self.available
    }

    pub fn more_available(&self) -> bool {
        self.more_available
    }

    /// The page to fetch next, or `None` once the listing is exhausted.
    pub fn next_page(&self) -> Option<u32> {
        self.more_available.then_some(self.loaded_page + 1)
    }

    /// Apply a response. Responses for any page other than the next one are
    /// ignored.
    pub fn record_response(&mut self, page: u32, available: u64) -> bool {
        if page != self.loaded_page + 1 {
            return false;
        }
        self.loaded_page = page;
        self.available = available;
        self.more_available = u64::from(page) * u64::from(self.page_size) <= available;
        true
    }
}
