use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Runs a request, re-sending it when the send itself fails.
///
/// `retries` is the number of extra attempts after the first one; HTTP error
/// statuses are successful sends and are returned as-is.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await.map_err(anyhow::Error::from) {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt,
                    retries + 1,
                    err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_unreachable_host_is_attempted_once_per_retry() {
        let attempts = Cell::new(0);
        let client = reqwest::Client::new();
        // Nothing listens on port 9 of the loopback interface
        let result = with_retry(
            || {
                attempts.set(attempts.get() + 1);
                client.get("http://127.0.0.1:9/query").send()
            },
            2,
            1,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.get(), 3);
    }
}
