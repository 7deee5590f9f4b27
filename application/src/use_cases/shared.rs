//! Shared utilities for use cases.

use crate::use_cases::dispatch_loop::DispatchError;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(DispatchError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), DispatchError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(DispatchError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_cancelled() {
        assert!(check_cancelled(&None).is_ok());

        let token = CancellationToken::new();
        assert!(check_cancelled(&Some(token.clone())).is_ok());
        token.cancel();
        assert_eq!(
            check_cancelled(&Some(token)),
            Err(DispatchError::Cancelled)
        );
    }
}
