//! Transaction ids that have already been accepted.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::FunnelError;

/// Append-only set of consumed transaction ids.
#[derive(Debug, Default)]
pub struct ReplayGuard {
    seen: Mutex<HashSet<String>>,
}

impl ReplayGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `txid` exactly once.
    ///
    /// Membership check and insert happen under one lock, so of any number
    /// of concurrent calls with the same id exactly one succeeds.
    pub fn admit(&self, txid: &str) -> Result<(), FunnelError> {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        if seen.insert(txid.to_string()) {
            Ok(())
        } else {
            Err(FunnelError::DuplicateSubmission(txid.to_string()))
        }
    }

    pub fn contains(&self, txid: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(txid)
    }

    /// Number of ids consumed so far.
    pub(crate) fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_second_admit_is_duplicate() {
        let guard = ReplayGuard::new();
        assert_eq!(guard.len(), 0);
        assert!(guard.admit("abc123").is_ok());
        assert!(matches!(
            guard.admit("abc123"),
            Err(FunnelError::DuplicateSubmission(t)) if t == "abc123"
        ));
        assert!(guard.admit("abc124").is_ok());
        assert_eq!(guard.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admit_single_winner() {
        let guard = Arc::new(ReplayGuard::new());
        let handles: Vec<_> = (0..32)
            .map(|_| {
                let guard = Arc::clone(&guard);
                tokio::spawn(async move { guard.admit("same-txid").is_ok() })
            })
            .collect();

        let results = futures_util::future::join_all(handles).await;
        let accepted = results.into_iter().filter(|r| *r.as_ref().unwrap()).count();
        assert_eq!(accepted, 1);
        assert!(guard.contains("same-txid"));
    }
}
