//! Ordered provider attempts where the first one producing a value wins.

use futures::future::BoxFuture;

/// A deferred provider attempt.
pub type Attempt<'a, T> = Box<dyn FnOnce() -> BoxFuture<'a, Option<T>> + Send + 'a>;

/// Runs `attempts` in order and returns the first `Some`.
///
/// Attempts after the winning one are never started.
pub async fn first_success<'a, T>(attempts: Vec<Attempt<'a, T>>) -> Option<T> {
    for attempt in attempts {
        if let Some(value) = attempt().await {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_first_some_wins() {
        let attempts: Vec<Attempt<'_, u32>> = vec![
            Box::new(|| async { None::<u32> }.boxed()),
            Box::new(|| async { Some(2u32) }.boxed()),
            Box::new(|| async { Some(3u32) }.boxed()),
        ];

        assert_eq!(first_success(attempts).await, Some(2));
    }

    #[tokio::test]
    async fn test_later_attempts_not_started() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let attempts: Vec<Attempt<'_, u32>> = vec![
            Box::new(move || {
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Some(1)
                }
                .boxed()
            }),
            Box::new(move || {
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Some(2)
                }
                .boxed()
            }),
        ];

        assert_eq!(first_success(attempts).await, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_empty() {
        let attempts: Vec<Attempt<'_, u32>> = vec![Box::new(|| async { None::<u32> }.boxed())];
        assert_eq!(first_success(attempts).await, None);
    }
}
