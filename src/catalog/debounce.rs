use std::time::Duration;
use tokio::sync::mpsc;

/// Spawn a task that forwards the latest value sent on the returned channel
/// to `on_settled` once no newer value has arrived for `delay`. Values
/// superseded within the window are dropped. The task ends when every sender
/// is gone, after flushing a pending value.
pub fn spawn_debounced<T, F>(delay: Duration, mut on_settled: F) -> mpsc::UnboundedSender<T>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<T>();

    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            match pending.take() {
                None => match rx.recv().await {
                    Some(v) => pending = Some(v),
                    None => break,
                },
                Some(current) => {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(v) => pending = Some(v),
                            None => {
                                on_settled(current);
                                break;
                            }
                        },
                        _ = tokio::time::sleep(delay) => on_settled(current),
                    }
                }
            }
        }
    });

    tx
}
