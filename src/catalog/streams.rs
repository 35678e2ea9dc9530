//! Multicast result streams.
//!
//! Each [`Channel`] fans a value out to every subscription alive at the time
//! of publishing. Nothing is replayed: a subscription only sees values
//! published after it was created. Dropping a [`Subscription`] unsubscribes.

use crate::error::CatalogError;
use crate::mxm::models::{Artist, ArtistId, Lyrics, Track, TrackId};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// A published fetch outcome.
pub type Notification<T> = Result<T, CatalogError>;

#[derive(Debug)]
pub struct Channel<T> {
    name: &'static str,
    tx: broadcast::Sender<Notification<T>>,
}

impl<T: Clone> Channel<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { name, tx }
    }

    /// Deliver to current subscribers. Returns how many received it.
    pub fn publish(&self, value: Notification<T>) -> usize {
        // Err only means nobody is listening right now.
        self.tx.send(value).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            name: self.name,
            rx: self.tx.subscribe(),
        }
    }

    #[allow(dead_code)]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[derive(Debug)]
pub struct Subscription<T> {
    name: &'static str,
    rx: broadcast::Receiver<Notification<T>>,
}

impl<T: Clone> Subscription<T> {
    /// Wait for the next value. `None` once the channel is gone.
    #[allow(dead_code)]
    pub async fn next(&mut self) -> Option<Notification<T>> {
        loop {
            match self.rx.recv().await {
                Ok(v) => return Some(v),
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("{} subscriber lagged, skipped {n} updates", self.name);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take a value that is already queued without waiting.
    pub fn try_next(&mut self) -> Option<Notification<T>> {
        loop {
            match self.rx.try_recv() {
                Ok(v) => return Some(v),
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!("{} subscriber lagged, skipped {n} updates", self.name);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<Notification<T>> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

/// One page of an artist's tracks, as published on the artist-tracks stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistTracksPage {
    pub artist_id: ArtistId,
    pub page: u32,
    pub page_size: u32,
    /// Total tracks the API reports for the artist.
    pub available: u64,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackLyrics {
    pub track_id: TrackId,
    pub lyrics: Lyrics,
}

/// The channels a catalog session publishes on.
#[derive(Debug)]
pub struct Streams {
    pub popular_tracks: Channel<Vec<Track>>,
    pub popular_artists: Channel<Vec<Artist>>,
    pub artist: Channel<Artist>,
    pub artist_tracks: Channel<ArtistTracksPage>,
    pub track: Channel<Track>,
    pub lyrics: Channel<TrackLyrics>,
}

impl Streams {
    pub fn new(capacity: usize) -> Self {
        Self {
            popular_tracks: Channel::new("popular_tracks", capacity),
            popular_artists: Channel::new("popular_artists", capacity),
            artist: Channel::new("artist", capacity),
            artist_tracks: Channel::new("artist_tracks", capacity),
            track: Channel::new("track", capacity),
            lyrics: Channel::new("lyrics", capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_receives() {
        let ch = Channel::<u32>::new("test", 8);
        let mut a = ch.subscribe();
        let mut b = ch.subscribe();

        assert_eq!(ch.publish(Ok(5)), 2);
        assert_eq!(a.next().await, Some(Ok(5)));
        assert_eq!(b.next().await, Some(Ok(5)));
    }

    #[test]
    fn test_late_subscriber_misses_earlier_values() {
        let ch = Channel::<u32>::new("test", 8);
        assert_eq!(ch.publish(Ok(1)), 0);

        let mut late = ch.subscribe();
        assert!(late.try_next().is_none());
        ch.publish(Ok(2));
        assert_eq!(late.drain(), vec![Ok(2)]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let ch = Channel::<u32>::new("test", 8);
        let sub = ch.subscribe();
        assert_eq!(ch.subscriber_count(), 1);
        drop(sub);
        assert_eq!(ch.subscriber_count(), 0);
        assert_eq!(ch.publish(Ok(1)), 0);
    }

    #[test]
    fn test_failures_are_delivered() {
        let ch = Channel::<u32>::new("test", 8);
        let mut sub = ch.subscribe();
        ch.publish(Err(CatalogError::Transport("offline".into())));
        assert!(matches!(sub.try_next(), Some(Err(CatalogError::Transport(_)))));
    }

    #[test]
    fn test_lagging_subscriber_keeps_newest() {
        let ch = Channel::<u32>::new("test", 2);
        let mut sub = ch.subscribe();
        for i in 0..5 {
            ch.publish(Ok(i));
        }
        assert_eq!(sub.drain(), vec![Ok(3), Ok(4)]);
    }

    #[tokio::test]
    async fn test_next_ends_when_channel_dropped() {
        let ch = Channel::<u32>::new("test", 2);
        let mut sub = ch.subscribe();
        drop(ch);
        assert_eq!(sub.next().await, None);
    }
}
