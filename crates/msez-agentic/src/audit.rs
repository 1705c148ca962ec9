//! # Policy Audit Trail — MASS Protocol v0.2 Chapter 17
//!
//! Records every trigger evaluation and action execution for regulatory review.
//!
//! ## Security Invariant
//!
//! Every audit entry is individually digestable via `CanonicalBytes` + `sha256_digest`.
//! The append-only trail uses a circular buffer that trims the oldest 10% when the
//! configured maximum is exceeded. Trimmed entries are NOT lost — they should be
//! persisted to durable storage before trimming in production deployments.
//!
//! ## Spec Reference
//!
//! Implements Definition 17.4 (Policy Audit Trail) from the MASS Protocol v0.2 Ch. 17.

use chrono::{DateTime, Utc};
use msez_core::{sha256_digest, CanonicalBytes, ContentDigest};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AuditEntryType
// ---------------------------------------------------------------------------

/// The type of audit trail event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntryType {
    /// A trigger event was received by the evaluation engine.
    TriggerReceived,
    /// A policy was evaluated against a trigger.
    PolicyEvaluated,
    /// An action was scheduled for execution.
    ActionScheduled,
    /// A scheduled action was executed.
    ActionExecuted,
    /// A scheduled action failed.
    ActionFailed,
    /// A scheduled action was cancelled.
    ActionCancelled,
}

impl AuditEntryType {
    /// Return the string value for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TriggerReceived => "trigger_received",
            Self::PolicyEvaluated => "policy_evaluated",
            Self::ActionScheduled => "action_scheduled",
            Self::ActionExecuted => "action_executed",
            Self::ActionFailed => "action_failed",
            Self::ActionCancelled => "action_cancelled",
        }
    }
}

impl std::fmt::Display for AuditEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditEntry
// ---------------------------------------------------------------------------

/// A single entry in the policy audit trail.
///
/// Each entry captures:
/// - The event type (trigger received, policy evaluated, action scheduled/executed)
/// - An optional asset identifier
/// - An optional metadata payload (JSON)
/// - A UTC timestamp
///
/// Entries are individually digestable via `CanonicalBytes` + `sha256_digest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The type of audit event.
    pub entry_type: AuditEntryType,
    /// UTC timestamp when the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Optional asset identifier associated with this event.
    pub asset_id: Option<String>,
    /// Optional structured metadata payload.
    pub metadata: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Create a new audit entry with the current UTC timestamp.
    pub fn new(
        entry_type: AuditEntryType,
        asset_id: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            entry_type,
            timestamp: Utc::now(),
            asset_id,
            metadata,
        }
    }

    /// Compute the content-addressed digest of this audit entry.
    ///
    /// Uses `CanonicalBytes` → `sha256_digest` to produce a deterministic
    /// digest suitable for tamper-evidence verification.
    ///
    /// Returns `None` if canonicalization fails (e.g., metadata contains floats).
    pub fn digest(&self) -> Option<ContentDigest> {
        let canonical = match CanonicalBytes::new(self) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(entry_type = ?self.entry_type, error = %e, "audit entry canonicalization failed — digest unavailable");
                return None;
            }
        };
        Some(sha256_digest(&canonical))
    }
}

impl PartialEq for AuditEntry {
    fn eq(&self, other: &Self) -> bool {
        self.entry_type == other.entry_type
            && self.asset_id == other.asset_id
            && self.metadata == other.metadata
    }
}

impl Eq for AuditEntry {}

// ---------------------------------------------------------------------------
// AuditTrail
// ---------------------------------------------------------------------------

/// An append-only audit trail with a configurable capacity.
///
/// When the trail exceeds its maximum capacity, the oldest 10% of entries
/// are trimmed. In production, entries should be persisted to durable storage
/// before trimming.
///
/// ## Thread Safety
///
/// This struct is not `Sync`. Use external synchronisation if sharing across
/// threads (e.g., `Arc<Mutex<AuditTrail>>`).
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
    max_entries: usize,
}

impl AuditTrail {
    /// Create a new audit trail with the given maximum capacity.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Append an entry to the audit trail.
    ///
    /// If the trail exceeds the maximum capacity, the oldest 10% of entries
    /// are trimmed.
    pub fn append(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let trim_count = self.max_entries / 10;
            let trim_count = trim_count.max(1);
            self.entries.drain(..trim_count);
        }
    }

    /// Return a reference to all entries in the trail.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Return the number of entries in the trail.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return entries matching a specific asset ID.
    pub fn entries_for_asset(&self, asset_id: &str) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.asset_id.as_deref() == Some(asset_id))
            .collect()
    }

    /// Return entries matching a specific event type.
    pub fn entries_by_type(&self, entry_type: AuditEntryType) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .collect()
    }

    /// Return the last N entries (or all entries if fewer than N exist).
    pub fn last_n(&self, n: usize) -> &[AuditEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Compute digests for all entries in the trail.
    ///
    /// Returns a vector of `(index, digest)` pairs. Entries that fail
    /// canonicalization are silently skipped (this should not happen with
    /// well-formed audit data).
    pub fn compute_digests(&self) -> Vec<(usize, ContentDigest)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.digest().map(|d| (i, d)))
            .collect()
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl std::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrail")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}
