//! # Compliance Tensor
//!
//! Multi-domain compliance evaluation for an entity within a jurisdiction.
//!
//! The tensor maps each of the 20 [`ComplianceDomain`] variants to a
//! [`ComplianceState`] for a specific entity/jurisdiction pair. It supports
//! both explicit state storage and dynamic evaluation via pluggable
//! [`DomainEvaluator`] implementations.
//!
//! ## Audit Reference
//!
//! Finding §2.4: The Python `tensor.py` had only 8 domains while
//! `composition.py` had 20. This implementation uses the single
//! [`ComplianceDomain`] enum from `msez-core`
//! with all 20 variants, and every `match` is exhaustive.
//!
//! ## Generic Parameter
//!
//! `ComplianceTensor<J>` is generic over `J: JurisdictionConfig`, allowing
//! jurisdiction-specific evaluation rules while sharing the core tensor
//! operations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use msez_core::{ComplianceDomain, JurisdictionId};

use crate::commitment::TensorCommitment;
use crate::evaluation::{
    evaluate_domain_default, AttestationRef, ComplianceState, DomainEvaluator, EvaluationContext,
};

// ---------------------------------------------------------------------------
// JurisdictionConfig Trait
// ---------------------------------------------------------------------------

/// Configuration trait for jurisdiction-specific compliance evaluation.
///
/// Implementations provide the jurisdiction identity and optionally
/// restrict which domains are applicable. The default implementation
/// considers all 20 domains applicable.
///
/// ## Exhaustiveness
///
/// `applicable_domains()` returns a subset of `ComplianceDomain::all()`.
/// The tensor still stores cells for all 20 domains (non-applicable
/// domains are initialized to `NotApplicable`).
pub trait JurisdictionConfig: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// The jurisdiction this configuration applies to.
    fn jurisdiction_id(&self) -> &JurisdictionId;

    /// Which domains are applicable in this jurisdiction.
    ///
    /// Defaults to all 20 domains. Override to restrict evaluation to
    /// a subset (e.g., a trade-only zone might only need AML, KYC,
    /// SANCTIONS, TAX, TRADE).
    fn applicable_domains(&self) -> &[ComplianceDomain] {
        ComplianceDomain::all()
    }
}

/// Default jurisdiction configuration that considers all 20 domains applicable.
#[derive(Debug, Clone)]
pub struct DefaultJurisdiction {
    id: JurisdictionId,
}

impl DefaultJurisdiction {
    /// Create a default jurisdiction configuration.
    pub fn new(id: JurisdictionId) -> Self {
        Self { id }
    }
}

impl JurisdictionConfig for DefaultJurisdiction {
    fn jurisdiction_id(&self) -> &JurisdictionId {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// TensorCell
// ---------------------------------------------------------------------------

/// A single cell in the compliance tensor.
///
/// Each cell stores the compliance state for one domain, along with
/// the evidentiary basis (attestations) and metadata about when and
/// why the state was determined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorCell {
    /// The compliance state for this domain.
    pub state: ComplianceState,
    /// Attestations supporting this state determination.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attestations: Vec<AttestationRef>,
    /// ISO 8601 timestamp when this state was determined.
    pub determined_at: String,
    /// Optional reason code explaining the state determination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TensorCell {
    /// Create a new cell with a state and current timestamp.
    fn new(state: ComplianceState) -> Self {
        Self {
            state,
            attestations: Vec::new(),
            determined_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            reason: None,
        }
    }
}

// ---------------------------------------------------------------------------
// TensorSlice
// ---------------------------------------------------------------------------

/// A dimensional slice of a compliance tensor over selected domains.
///
/// Slices are immutable snapshots used for reporting, comparison, and
/// aggregate compliance assessment.
#[derive(Debug, Clone)]
pub struct TensorSlice {
    /// The domain→state pairs in this slice.
    pub cells: HashMap<ComplianceDomain, ComplianceState>,
}

impl TensorSlice {
    /// Aggregate all states in the slice using the lattice `meet` operation.
    ///
    /// Returns `Compliant` for an empty slice (neutral element of meet).
    pub fn aggregate_state(&self) -> ComplianceState {
        self.cells
            .values()
            .copied()
            .fold(ComplianceState::Compliant, ComplianceState::meet)
    }

    /// Check if all domains in the slice are in a passing state.
    pub fn all_passing(&self) -> bool {
        self.cells.values().all(|s| s.is_passing())
    }

    /// Return domains that are `NonCompliant`.
    pub fn non_compliant_domains(&self) -> Vec<ComplianceDomain> {
        self.cells
            .iter()
            .filter(|(_, &s)| s == ComplianceState::NonCompliant)
            .map(|(&d, _)| d)
            .collect()
    }

    /// Return domains that are `Pending`.
    pub fn pending_domains(&self) -> Vec<ComplianceDomain> {
        self.cells
            .iter()
            .filter(|(_, &s)| s == ComplianceState::Pending)
            .map(|(&d, _)| d)
            .collect()
    }

    /// Number of domains in this slice.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether this slice is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ComplianceTensor
// ---------------------------------------------------------------------------

/// A compliance tensor mapping each domain to a compliance state
/// for a specific entity and jurisdiction.
///
/// Generic over `J: JurisdictionConfig` to support jurisdiction-specific
/// evaluation rules while sharing the core tensor operations.
///
/// ## Dimensions
///
/// 20 [`ComplianceDomain`] variants × jurisdiction-specific rules.
/// Non-applicable domains (per `J::applicable_domains()`) are initialized
/// to `NotApplicable`.
///
/// ## Evaluation
///
/// Two evaluation modes:
/// 1. **Stored**: `get()` returns the explicitly set state.
/// 2. **Dynamic**: `evaluate()` uses registered evaluators or the default
///    evaluation logic (attestation freshness for original 8 domains,
///    `NotApplicable` for extended 12).
///
/// ## Security Invariant
///
/// Every `match` on `ComplianceDomain` in this module is exhaustive.
/// Adding a 21st domain forces a compile error until handled.
pub struct ComplianceTensor<J: JurisdictionConfig> {
    /// The jurisdiction context for this tensor.
    jurisdiction: J,
    /// Compliance state per domain.
    cells: HashMap<ComplianceDomain, TensorCell>,
    /// Optional custom evaluators per domain.
    evaluators: HashMap<ComplianceDomain, Box<dyn DomainEvaluator>>,
}

impl<J: JurisdictionConfig> std::fmt::Debug for ComplianceTensor<J> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceTensor")
            .field("jurisdiction", &self.jurisdiction)
            .field("cell_count", &self.cells.len())
            .finish()
    }
}

impl<J: JurisdictionConfig> ComplianceTensor<J> {
    /// Create a new compliance tensor for a jurisdiction with all 20 domains
    /// initialized based on applicability.
    ///
    /// Applicable domains start as `Pending`; non-applicable domains start
    /// as `NotApplicable`.
    pub fn new(jurisdiction: J) -> Self {
        let applicable: std::collections::HashSet<ComplianceDomain> =
            jurisdiction.applicable_domains().iter().copied().collect();

        let cells = ComplianceDomain::all()
            .iter()
            .map(|&d| {
                let state = if applicable.contains(&d) {
                    ComplianceState::Pending
                } else {
                    ComplianceState::NotApplicable
                };
                (d, TensorCell::new(state))
            })
            .collect();

        Self {
            jurisdiction,
            cells,
            evaluators: HashMap::new(),
        }
    }

    /// Access the jurisdiction configuration.
    pub fn jurisdiction(&self) -> &J {
        &self.jurisdiction
    }

    /// Number of cells in the tensor (always 20 for a complete tensor).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Set the compliance state for a domain, with optional attestations
    /// and reason code.
    pub fn set(
        &mut self,
        domain: ComplianceDomain,
        state: ComplianceState,
        attestations: Vec<AttestationRef>,
        reason: Option<String>,
    ) {
        let cell = self
            .cells
            .entry(domain)
            .or_insert_with(|| TensorCell::new(state));
        cell.state = state;
        cell.attestations = attestations;
        cell.reason = reason;
        cell.determined_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    }

    /// Get the stored compliance state for a domain.
    ///
    /// Returns `Pending` if the domain has no stored cell (should not happen
    /// for a properly initialized tensor).
    pub fn get(&self, domain: ComplianceDomain) -> ComplianceState {
        self.cells
            .get(&domain)
            .map(|c| c.state)
            .unwrap_or(ComplianceState::Pending)
    }

    /// Get the full cell for a domain, if it exists.
    pub fn get_cell(&self, domain: ComplianceDomain) -> Option<&TensorCell> {
        self.cells.get(&domain)
    }

    /// Register a custom evaluator for a domain.
    ///
    /// Custom evaluators override the default evaluation logic when
    /// [`evaluate()`](Self::evaluate) is called.
    pub fn set_evaluator(&mut self, domain: ComplianceDomain, evaluator: Box<dyn DomainEvaluator>) {
        self.evaluators.insert(domain, evaluator);
    }

    /// Evaluate compliance for a single domain.
    ///
    /// If a custom evaluator is registered, delegates to it. Otherwise uses
    /// the default evaluation logic with exhaustive domain matching.
    ///
    /// ## Exhaustive Match (inside evaluate_domain_default)
    ///
    /// The default path uses an exhaustive `match` on all 20
    /// `ComplianceDomain` variants. Adding a 21st domain is a compile error.
    pub fn evaluate(&self, entity_id: &str, domain: ComplianceDomain) -> ComplianceState {
        let ctx = self.build_context(entity_id, domain);

        // Check for custom evaluator first.
        if let Some(evaluator) = self.evaluators.get(&domain) {
            let (state, _) = evaluator.evaluate(&ctx);
            return state;
        }

        // Fall back to default evaluation with exhaustive match.
        let (state, _) = evaluate_domain_default(domain, &ctx);
        state
    }

    /// Evaluate compliance across all 20 domains.
    ///
    /// Returns a complete map from every domain to its evaluated state.
    pub fn evaluate_all(&self, entity_id: &str) -> HashMap<ComplianceDomain, ComplianceState> {
        ComplianceDomain::all()
            .iter()
            .map(|&domain| (domain, self.evaluate(entity_id, domain)))
            .collect()
    }

    /// Compute a cryptographic commitment to the current tensor state.
    ///
    /// Uses the `CanonicalBytes → ContentDigest` pipeline from `msez-core`,
    /// ensuring the commitment is computed with proper canonicalization.
    ///
    /// ## Security Invariant
    ///
    /// This is the exact location where the Python canonicalization split
    /// was most dangerous. The Rust version makes the split impossible
    /// because `sha256_digest()` only accepts `&CanonicalBytes`.
    pub fn commit(&self) -> Result<TensorCommitment, msez_core::MsezError> {
        TensorCommitment::compute(self)
    }

    /// Merge another tensor into this one using the lattice `meet` operation.
    ///
    /// For each domain, the resulting state is `meet(self, other)` —
    /// the more restrictive state wins.
    pub fn merge(&mut self, other: &ComplianceTensor<J>) {
        for &domain in ComplianceDomain::all() {
            let self_state = self.get(domain);
            let other_state = other.get(domain);
            let merged = self_state.meet(other_state);
            if merged != self_state {
                self.set(domain, merged, Vec::new(), Some("merged".into()));
            }
        }
    }

    /// Create a slice of the tensor over selected domains.
    pub fn slice(&self, domains: &[ComplianceDomain]) -> TensorSlice {
        let cells = domains.iter().map(|&d| (d, self.get(d))).collect();
        TensorSlice { cells }
    }

    /// Create a slice over all domains.
    pub fn full_slice(&self) -> TensorSlice {
        self.slice(ComplianceDomain::all())
    }

    /// Build an evaluation context for a domain.
    fn build_context(&self, entity_id: &str, domain: ComplianceDomain) -> EvaluationContext {
        let cell = self.cells.get(&domain);
        EvaluationContext {
            entity_id: entity_id.to_string(),
            current_state: cell.map(|c| c.state),
            attestations: cell.map(|c| c.attestations.clone()).unwrap_or_default(),
            metadata: HashMap::new(),
        }
    }

    /// Return a serializable representation of all cells.
    ///
    /// Cells are sorted by domain name for deterministic serialization.
    pub(crate) fn to_serializable_cells(&self) -> Vec<(String, ComplianceState)> {
        let mut cells: Vec<_> = ComplianceDomain::all()
            .iter()
            .map(|&d| (d.as_str().to_string(), self.get(d)))
            .collect();
        cells.sort_by(|a, b| a.0.cmp(&b.0));
        cells
    }
}

impl<J: JurisdictionConfig> Clone for ComplianceTensor<J> {
    fn clone(&self) -> Self {
        // Clone cells and jurisdiction; evaluators are not cloneable,
        // so the clone starts with no custom evaluators.
        Self {
            jurisdiction: self.jurisdiction.clone(),
            cells: self.cells.clone(),
            evaluators: HashMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
