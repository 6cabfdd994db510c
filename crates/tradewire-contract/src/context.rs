//! Per-call context: metadata, cancellation, completion.
//!
//! A `CallContext` is owned exclusively by one call for its duration and
//! never shared across calls. The cancellation token is the only part
//! with shared backing, so the transport layer can flip it from outside
//! the call's own task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::status::CallStatus;

/// Ordered, case-sensitive key/value pairs carried out-of-band from the
/// payload (the header channel).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair, preserving insertion order.
    ///
    /// Duplicate keys are allowed; `get` returns the first match.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value for an exactly matching key (case-sensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when an exactly matching key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove every entry with an exactly matching key.
    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Cooperative cancellation signal for one call.
///
/// Cloning shares the underlying flag; the transport layer holds one
/// clone and the call's pipeline the other.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Irreversible.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Mutable state visible to one call's pipeline.
#[derive(Debug, Default)]
pub struct CallContext {
    metadata: Metadata,
    cancel: CancelToken,
    completion: Option<CallStatus>,
}

impl CallContext {
    /// Context with empty metadata and a fresh cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context carrying the given metadata.
    pub fn with_metadata(metadata: Metadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// Context sharing an externally controlled cancellation token.
    pub fn with_cancel_token(metadata: Metadata, cancel: CancelToken) -> Self {
        Self {
            metadata,
            cancel,
            completion: None,
        }
    }

    /// The call's metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable access for interceptor stages.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// The call's cancellation token.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// True once cancellation has been requested for this call.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Record the terminal status. The first completion wins.
    pub fn complete(&mut self, status: CallStatus) {
        if self.completion.is_none() {
            self.completion = Some(status);
        }
    }

    /// The recorded terminal status, if the call has completed.
    pub fn completion(&self) -> Option<&CallStatus> {
        self.completion.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusCode;

    #[test]
    fn test_metadata_is_case_sensitive() {
        let mut md = Metadata::new();
        md.insert("x-api-key", "secret");
        assert_eq!(md.get("x-api-key"), Some("secret"));
        assert_eq!(md.get("X-API-KEY"), None);
        assert!(!md.contains("X-Api-Key"));
    }

    #[test]
    fn test_metadata_preserves_order_and_first_wins() {
        let mut md = Metadata::new();
        md.insert("a", "1");
        md.insert("b", "2");
        md.insert("a", "3");
        let keys: Vec<_> = md.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
        assert_eq!(md.get("a"), Some("1"));
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let ctx = CallContext::with_cancel_token(Metadata::new(), token.clone());
        assert!(!ctx.is_cancelled());
        token.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_first_completion_wins() {
        let mut ctx = CallContext::new();
        ctx.complete(CallStatus::cancelled());
        ctx.complete(CallStatus::ok());
        assert_eq!(ctx.completion().unwrap().code, StatusCode::Cancelled);
    }
}
