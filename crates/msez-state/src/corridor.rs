//! # Corridor Typestate Machine
//!
//! Implements the corridor lifecycle from spec §40-corridors:
//! `DRAFT → PENDING → ACTIVE` with `HALTED` and `SUSPENDED` branches.
//!
//! Each state is a distinct type. Only valid transitions exist as methods.
//! Invalid transitions are compile errors.
//!
//! ## Transitions
//!
//! ```text
//! DRAFT ─submit()──▶ PENDING ─activate()──▶ ACTIVE
//!                                              │
//!                                     ┌────────┴────────┐
//!                                     │                 │
//!                                  halt()          suspend()
//!                                     │                 │
//!                                     ▼                 ▼
//!                                  HALTED          SUSPENDED
//!                                     │                 │
//!                                deprecate()       resume()
//!                                     │                 │
//!                                     ▼                 ▼
//!                                DEPRECATED          ACTIVE
//! ```
//!
//! ## Audit Reference
//!
//! Finding §2.3: The Python implementation used string states `"PROPOSED"`
//! and `"OPERATIONAL"` that diverged from the spec's `"DRAFT"`, `"PENDING"`,
//! `"ACTIVE"`. This typestate encoding makes divergence structurally impossible.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use msez_core::{ContentDigest, CorridorId, JurisdictionId, Sha256Accumulator};

// ── State Types ──────────────────────────────────────────────────────

/// The initial draft state for a new corridor.
#[derive(Debug, Clone, Copy)]
pub struct Draft;

/// Corridor has been submitted and is pending regulatory approval.
#[derive(Debug, Clone, Copy)]
pub struct Pending;

/// Corridor is active and processing cross-border transactions.
#[derive(Debug, Clone, Copy)]
pub struct Active;

/// Corridor has been halted by a jurisdiction authority.
#[derive(Debug, Clone, Copy)]
pub struct Halted;

/// Corridor is temporarily suspended with an expected resume date.
#[derive(Debug, Clone, Copy)]
pub struct Suspended;

/// Corridor has been permanently deprecated. Terminal state.
#[derive(Debug, Clone, Copy)]
pub struct Deprecated;

/// Marker trait for all valid corridor states. Sealed — only the six
/// states defined in this module implement it.
pub trait CorridorState: private::Sealed + std::fmt::Debug {
    /// The canonical state name as it appears in spec and audit trail.
    fn name() -> &'static str;
    /// Whether this is a terminal state (no further transitions).
    fn is_terminal() -> bool {
        false
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Draft {}
    impl Sealed for super::Pending {}
    impl Sealed for super::Active {}
    impl Sealed for super::Halted {}
    impl Sealed for super::Suspended {}
    impl Sealed for super::Deprecated {}
}

impl CorridorState for Draft {
    fn name() -> &'static str {
        "DRAFT"
    }
}
impl CorridorState for Pending {
    fn name() -> &'static str {
        "PENDING"
    }
}
impl CorridorState for Active {
    fn name() -> &'static str {
        "ACTIVE"
    }
}
impl CorridorState for Halted {
    fn name() -> &'static str {
        "HALTED"
    }
}
impl CorridorState for Suspended {
    fn name() -> &'static str {
        "SUSPENDED"
    }
}
impl CorridorState for Deprecated {
    fn name() -> &'static str {
        "DEPRECATED"
    }
    fn is_terminal() -> bool {
        true
    }
}

// ── Evidence Types ───────────────────────────────────────────────────

/// Evidence required to submit a corridor from Draft to Pending.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionEvidence {
    /// Digest of the bilateral agreement between jurisdictions.
    pub bilateral_agreement_digest: ContentDigest,
    /// Digest of the pack trilogy (lawpack + regpack + licensepack).
    pub pack_trilogy_digest: ContentDigest,
}

/// Evidence required to activate a corridor from Pending to Active.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationEvidence {
    /// Regulatory approval digest from jurisdiction A.
    pub regulatory_approval_a: ContentDigest,
    /// Regulatory approval digest from jurisdiction B.
    pub regulatory_approval_b: ContentDigest,
}

/// Reason for halting a corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct HaltReason {
    /// Human-readable reason for the halt.
    pub reason: String,
    /// The jurisdiction authority that issued the halt.
    pub authority: JurisdictionId,
    /// Digest of the halt evidence.
    pub evidence: ContentDigest,
}

/// Reason for suspending a corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct SuspendReason {
    /// Human-readable reason for the suspension.
    pub reason: String,
    /// Expected resume date, if known.
    pub expected_resume: Option<DateTime<Utc>>,
}

/// Evidence required to resume a suspended corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeEvidence {
    /// Digest of the resolution attestation.
    pub resolution_attestation: ContentDigest,
}

/// Evidence required to deprecate a halted corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct DeprecationEvidence {
    /// Digest of the deprecation decision (e.g., bilateral agreement to sunset).
    pub deprecation_decision_digest: ContentDigest,
    /// Human-readable reason for deprecation.
    pub reason: String,
}

// ── Transition Record ────────────────────────────────────────────────

/// A record of a single state transition in the corridor lifecycle.
///
/// Every transition is logged with the source and target states, a
/// timestamp, and the digest of the evidence that authorized it. This
/// provides a complete audit trail for regulatory review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from_state: DynCorridorState,
    /// State after the transition.
    pub to_state: DynCorridorState,
    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
    /// Digest of the evidence authorizing this transition.
    pub evidence_digest: Option<ContentDigest>,
}

// ── The Corridor ─────────────────────────────────────────────────────

/// A trade corridor between two jurisdictions, parameterized by its
/// current lifecycle state.
///
/// State-specific methods ensure that only valid transitions can be
/// called. For example, `Corridor<Draft>` has `.submit()` but not
/// `.halt()`, while `Corridor<Active>` has `.halt()` and `.suspend()`
/// but not `.submit()`.
///
/// ## Compile-Time Safety
///
/// ```text
/// let draft = Corridor::<Draft>::new(id, jurisdiction_a, jurisdiction_b);
/// // draft.halt(reason); // ERROR: no method named `halt` on `Corridor<Draft>`
/// ```
#[derive(Debug)]
pub struct Corridor<S: CorridorState> {
    /// Unique corridor identifier.
    pub id: CorridorId,
    /// The first jurisdiction in the bilateral corridor.
    pub jurisdiction_a: JurisdictionId,
    /// The second jurisdiction in the bilateral corridor.
    pub jurisdiction_b: JurisdictionId,
    /// When the corridor was created.
    pub created_at: DateTime<Utc>,
    /// When the corridor was last updated.
    pub updated_at: DateTime<Utc>,
    /// Internal state data.
    inner: CorridorInner,
    /// Phantom data for the state type parameter.
    _state: PhantomData<S>,
}

#[derive(Debug, Clone)]
struct CorridorInner {
    pack_trilogy_digest: Option<ContentDigest>,
    halt_reason: Option<HaltReason>,
    suspend_reason: Option<SuspendReason>,
    transition_log: Vec<TransitionRecord>,
}

impl<S: CorridorState> Corridor<S> {
    /// Return the canonical name of the current state.
    pub fn state_name(&self) -> &'static str {
        S::name()
    }

    /// Whether the corridor is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        S::is_terminal()
    }

    /// Access the transition log for audit purposes.
    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.inner.transition_log
    }

    /// Convert internal data to a new state type, consuming self.
    fn transmute_to<T: CorridorState>(self, evidence_digest: Option<ContentDigest>) -> Corridor<T> {
        let mut inner = self.inner;
        inner.transition_log.push(TransitionRecord {
            from_state: DynCorridorState::from_name(S::name())
                .expect("sealed CorridorState trait guarantees valid name"),
            to_state: DynCorridorState::from_name(T::name())
                .expect("sealed CorridorState trait guarantees valid name"),
            timestamp: Utc::now(),
            evidence_digest,
        });
        Corridor {
            id: self.id,
            jurisdiction_a: self.jurisdiction_a,
            jurisdiction_b: self.jurisdiction_b,
            created_at: self.created_at,
            updated_at: Utc::now(),
            inner,
            _state: PhantomData,
        }
    }
}

// ── State-Specific Methods ───────────────────────────────────────────

impl Corridor<Draft> {
    /// Create a new corridor in Draft state.
    pub fn new(
        id: CorridorId,
        jurisdiction_a: JurisdictionId,
        jurisdiction_b: JurisdictionId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            jurisdiction_a,
            jurisdiction_b,
            created_at: now,
            updated_at: now,
            inner: CorridorInner {
                pack_trilogy_digest: None,
                halt_reason: None,
                suspend_reason: None,
                transition_log: Vec::new(),
            },
            _state: PhantomData,
        }
    }

    /// Submit the corridor for regulatory approval.
    ///
    /// Transitions: Draft → Pending.
    ///
    /// Requires bilateral agreement and pack trilogy evidence.
    pub fn submit(mut self, evidence: SubmissionEvidence) -> Corridor<Pending> {
        self.inner.pack_trilogy_digest = Some(evidence.pack_trilogy_digest.clone());
        self.transmute_to(Some(evidence.bilateral_agreement_digest))
    }
}

impl Corridor<Pending> {
    /// Activate the corridor after regulatory approval from both jurisdictions.
    ///
    /// Transitions: Pending → Active.
    ///
    /// Both regulatory approvals are combined into a single evidence digest
    /// via SHA-256(approval_a || approval_b) so that neither approval is
    /// lost from the audit trail.
    pub fn activate(self, evidence: ActivationEvidence) -> Corridor<Active> {
        let mut acc = Sha256Accumulator::new();
        acc.update(evidence.regulatory_approval_a.as_bytes());
        acc.update(evidence.regulatory_approval_b.as_bytes());
        let combined_digest = acc.finalize();
        self.transmute_to(Some(combined_digest))
    }
}

impl Corridor<Active> {
    /// Halt the corridor by jurisdiction authority order.
    ///
    /// Transitions: Active → Halted.
    ///
    /// A halt is an emergency action (e.g., fork detection, safety incident).
    pub fn halt(mut self, reason: HaltReason) -> Corridor<Halted> {
        let evidence = reason.evidence.clone();
        self.inner.halt_reason = Some(reason);
        self.transmute_to(Some(evidence))
    }

    /// Suspend the corridor temporarily with an expected resume date.
    ///
    /// Transitions: Active → Suspended.
    pub fn suspend(mut self, reason: SuspendReason) -> Corridor<Suspended> {
        self.inner.suspend_reason = Some(reason);
        self.transmute_to(None)
    }
}

impl Corridor<Suspended> {
    /// Resume the corridor after the suspension condition is resolved.
    ///
    /// Transitions: Suspended → Active.
    pub fn resume(mut self, evidence: ResumeEvidence) -> Corridor<Active> {
        self.inner.suspend_reason = None;
        self.transmute_to(Some(evidence.resolution_attestation))
    }
}

impl Corridor<Halted> {
    /// Deprecate a halted corridor permanently.
    ///
    /// Transitions: Halted → Deprecated.
    ///
    /// This is a terminal transition. Once deprecated, the corridor cannot
    /// be reactivated. All pending receipts should be migrated before calling.
    pub fn deprecate(self, evidence: DeprecationEvidence) -> Corridor<Deprecated> {
        self.transmute_to(Some(evidence.deprecation_decision_digest))
    }
}

// ── DynCorridor ──────────────────────────────────────────────────────

/// Serializable corridor snapshot for persistence/deserialization use
/// cases where the state is not known at compile time.
///
/// Use the typestate `Corridor<S>` for business logic where the state
/// is known; use `DynCorridorData` for storage and API serialization
/// where the state arrives as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynCorridorData {
    /// Unique corridor identifier.
    pub id: CorridorId,
    /// The first jurisdiction.
    pub jurisdiction_a: JurisdictionId,
    /// The second jurisdiction.
    pub jurisdiction_b: JurisdictionId,
    /// Current state name (spec-aligned: DRAFT, PENDING, ACTIVE, HALTED, SUSPENDED, DEPRECATED).
    pub state: DynCorridorState,
    /// When the corridor was created.
    pub created_at: DateTime<Utc>,
    /// When the corridor was last updated.
    pub updated_at: DateTime<Utc>,
    /// Transition history.
    pub transition_log: Vec<TransitionRecord>,
}

/// Runtime corridor state enum for serialization/deserialization.
///
/// Uses spec-aligned names only. There is no variant for the defective
/// Python v1 names (`PROPOSED`, `OPERATIONAL`) — they are structurally
/// excluded from the type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DynCorridorState {
    /// Initial draft state.
    #[serde(rename = "DRAFT")]
    Draft,
    /// Submitted, pending regulatory approval.
    #[serde(rename = "PENDING")]
    Pending,
    /// Active and processing transactions.
    #[serde(rename = "ACTIVE")]
    Active,
    /// Halted by jurisdiction authority.
    #[serde(rename = "HALTED")]
    Halted,
    /// Temporarily suspended.
    #[serde(rename = "SUSPENDED")]
    Suspended,
    /// Permanently deprecated. Terminal.
    #[serde(rename = "DEPRECATED")]
    Deprecated,
}

impl DynCorridorState {
    /// The canonical string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Halted => "HALTED",
            Self::Suspended => "SUSPENDED",
            Self::Deprecated => "DEPRECATED",
        }
    }

    /// Convert a canonical state name to a `DynCorridorState`.
    ///
    /// Only accepts spec-aligned names (DRAFT, PENDING, ACTIVE, HALTED,
    /// SUSPENDED, DEPRECATED). Returns `None` for any other input,
    /// including the defective Python v1 names (PROPOSED, OPERATIONAL).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DRAFT" => Some(Self::Draft),
            "PENDING" => Some(Self::Pending),
            "ACTIVE" => Some(Self::Active),
            "HALTED" => Some(Self::Halted),
            "SUSPENDED" => Some(Self::Suspended),
            "DEPRECATED" => Some(Self::Deprecated),
            _ => None,
        }
    }

    /// Whether this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deprecated)
    }

    /// Return the set of valid target states from this state.
    pub fn valid_transitions(&self) -> &'static [DynCorridorState] {
        match self {
            Self::Draft => &[Self::Pending],
            Self::Pending => &[Self::Active],
            Self::Active => &[Self::Halted, Self::Suspended],
            Self::Halted => &[Self::Deprecated],
            Self::Suspended => &[Self::Active],
            Self::Deprecated => &[],
        }
    }
}

impl std::fmt::Display for DynCorridorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<S: CorridorState> From<&Corridor<S>> for DynCorridorData {
    fn from(c: &Corridor<S>) -> Self {
        let state = DynCorridorState::from_name(S::name())
            .expect("sealed CorridorState trait guarantees valid name");
        DynCorridorData {
            id: c.id.clone(),
            jurisdiction_a: c.jurisdiction_a.clone(),
            jurisdiction_b: c.jurisdiction_b.clone(),
            state,
            created_at: c.created_at,
            updated_at: c.updated_at,
            transition_log: c.inner.transition_log.clone(),
        }
    }
}
