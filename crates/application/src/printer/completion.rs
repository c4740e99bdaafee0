use tokio::sync::oneshot;

/// Awaitable side of a single SDK completion callback
pub(crate) struct Completion<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Completion<T> {
    /// Resolves with the callback's value, or `None` if the callback was
    /// dropped without ever being invoked.
    pub(crate) async fn wait(self) -> Option<T> {
        self.rx.await.ok()
    }
}

/// Pairs a fire-once callback with the future that observes it
pub(crate) fn bridge<T: Send + 'static>() -> (impl FnOnce(T) + Send + 'static, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    let complete = move |value: T| {
        // Receiver may already be gone if the caller stopped waiting
        let _ = tx.send(value);
    };
    (complete, Completion { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fired_callback_resolves() {
        let (complete, completion) = bridge::<u32>();
        complete(7);
        assert_eq!(completion.wait().await, Some(7));
    }

    #[tokio::test]
    async fn test_dropped_callback_resolves_none() {
        let (complete, completion) = bridge::<u32>();
        drop(complete);
        assert_eq!(completion.wait().await, None);
    }

    #[tokio::test]
    async fn test_callback_fired_from_another_task() {
        let (complete, completion) = bridge::<&'static str>();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            complete("OK");
        });
        assert_eq!(completion.wait().await, Some("OK"));
    }
}
