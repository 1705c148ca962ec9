//! # msez-compliance — Jurisdictional Compliance Bridge
//!
//! Connects the pack trilogy (jurisdictional configuration) to the
//! compliance tensor (evaluation engine). This crate provides:
//!
//! - [`RegpackJurisdiction`]: A `JurisdictionConfig` implementation driven
//!   by regpack metadata, scoping compliance evaluation to the domains
//!   that actually apply in each jurisdiction.
//!
//! - [`SanctionsEvaluator`]: A `DomainEvaluator` for the SANCTIONS domain
//!   that screens entities against the regpack's sanctions snapshot using
//!   fuzzy name matching.
//!
//! ## Architecture
//!
//! ```text
//! msez-pack (data)  -->  msez-compliance (bridge)  -->  msez-tensor (algebra)
//!   Regpack                RegpackJurisdiction             ComplianceTensor<J>
//!   SanctionsChecker       SanctionsEvaluator              DomainEvaluator trait
//! ```

pub mod evaluators;
pub mod jurisdiction;

pub use evaluators::SanctionsEvaluator;
pub use jurisdiction::RegpackJurisdiction;

use std::sync::Arc;

use msez_core::{ComplianceDomain, JurisdictionId};
use msez_pack::regpack::{SanctionsChecker, SanctionsEntry};
use msez_tensor::ComplianceTensor;

/// Build a fully configured compliance tensor for a jurisdiction.
///
/// This is the primary entry point for compliance evaluation. It:
/// 1. Creates a `RegpackJurisdiction` from the provided domain names.
/// 2. Instantiates a `ComplianceTensor` with that jurisdiction.
/// 3. If sanctions entries are provided, registers a `SanctionsEvaluator`.
///
/// The returned tensor is ready for evaluation via `evaluate_all()`.
///
/// # Errors
///
/// Returns `None` if `jurisdiction_id` is empty (invalid `JurisdictionId`).
pub fn build_tensor(
    jurisdiction_id: &str,
    applicable_domains: &[String],
    sanctions_entries: Option<(Vec<SanctionsEntry>, String)>,
) -> Option<ComplianceTensor<RegpackJurisdiction>> {
    let jid = match JurisdictionId::new(jurisdiction_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(jurisdiction_id, error = %e, "invalid jurisdiction ID for tensor build");
            return None;
        }
    };
    let jurisdiction = RegpackJurisdiction::from_domain_names(jid, applicable_domains);

    let mut tensor = ComplianceTensor::new(jurisdiction);

    if let Some((entries, snapshot_id)) = sanctions_entries {
        let checker = Arc::new(SanctionsChecker::new(entries, snapshot_id));
        let evaluator = SanctionsEvaluator::with_default_threshold(checker);
        tensor.set_evaluator(ComplianceDomain::Sanctions, Box::new(evaluator));
    }

    Some(tensor)
}
