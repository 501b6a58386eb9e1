//! Ownership of a spawned connection driver

use tokio::task::{AbortHandle, JoinHandle};

/// Owns the task driving one HTTP/1 connection.
///
/// Dropping the guard aborts the driver, which drops the socket and closes
/// the connection. The guard travels with whatever still needs the
/// connection: the in-flight request, then the response body.
#[derive(Debug)]
pub struct ConnectionGuard {
    driver: AbortHandle,
}

impl ConnectionGuard {
    pub(crate) fn new<T>(driver: &JoinHandle<T>) -> Self {
        Self {
            driver: driver.abort_handle(),
        }
    }

    /// Returns true once the driver has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.driver.is_finished()
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if !self.driver.is_finished() {
            tracing::trace!("closing connection");
            self.driver.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn dropping_the_guard_aborts_the_driver() {
        let driver = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        let guard = ConnectionGuard::new(&driver);
        assert!(!guard.is_finished());

        drop(guard);
        let joined = driver.await.expect_err("driver was aborted");
        assert!(joined.is_cancelled());
    }
}
