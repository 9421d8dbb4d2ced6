//! Shared utilities for use cases.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// A run was interrupted through its cancellation token.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cancelled")]
pub struct Cancelled;

/// Check if cancellation has been requested.
///
/// Returns `Err(Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), Cancelled> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(Cancelled);
    }
    Ok(())
}

/// Sleep for `delay`, skipping the timer entirely for a zero delay.
pub(crate) async fn pause(delay: std::time::Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_cancelled() {
        assert!(check_cancelled(&None).is_ok());

        let token = CancellationToken::new();
        let some = Some(token.clone());
        assert!(check_cancelled(&some).is_ok());
        token.cancel();
        assert_eq!(check_cancelled(&some), Err(Cancelled));
    }
}
