//! Licensepack references, lock files, and utility functions.
//!
//! Types for referencing licensepacks in zone compositions and lock files,
//! plus helper functions for zone manifest resolution and compliance evaluation.

use serde::{Deserialize, Serialize};

use msez_core::CanonicalBytes;

use super::pack::Licensepack;
use super::types::LicenseComplianceState;
use crate::error::PackResult;
use crate::parser;

/// Licensepack reference in a zone composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensepackRef {
    /// Jurisdiction identifier.
    pub jurisdiction_id: String,
    /// License domain.
    pub domain: String,
    /// SHA-256 digest.
    pub licensepack_digest_sha256: String,
    /// Snapshot date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of_date: Option<String>,
}

/// Licensepack lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensepackLock {
    /// Lock version.
    pub lock_version: String,
    /// Generation timestamp.
    pub generated_at: String,
    /// Generator tool.
    pub generator: String,
    /// Generator version.
    pub generator_version: String,
    /// Licensepack info.
    pub licensepack: LicensepackLockInfo,
    /// Artifact info.
    pub artifact: LicensepackArtifactInfo,
}

/// Licensepack identification in a lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensepackLockInfo {
    /// Licensepack identifier.
    pub licensepack_id: String,
    /// Jurisdiction identifier.
    pub jurisdiction_id: String,
    /// License domain.
    pub domain: String,
    /// Snapshot date.
    pub as_of_date: String,
    /// Content digest.
    pub digest_sha256: String,
}

/// Artifact metadata in a licensepack lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensepackArtifactInfo {
    /// Artifact type.
    pub artifact_type: String,
    /// Content digest.
    pub digest_sha256: String,
    /// Artifact URI.
    pub uri: String,
    /// Media type.
    pub media_type: String,
    /// Byte length.
    pub byte_length: i64,
}

/// Resolve licensepack references from a zone manifest.
pub fn resolve_licensepack_refs(zone: &serde_json::Value) -> PackResult<Vec<LicensepackRef>> {
    let mut refs = Vec::new();
    if let Some(licensepacks) = zone.get("licensepacks").and_then(|v| v.as_array()) {
        for lp in licensepacks {
            let jid = lp
                .get("jurisdiction_id")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let domain = lp
                .get("domain")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let digest = lp
                .get("licensepack_digest_sha256")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            if jid.is_empty() || domain.is_empty() {
                continue;
            }
            if !digest.is_empty() && parser::is_valid_sha256(&digest) {
                refs.push(LicensepackRef {
                    jurisdiction_id: jid,
                    domain,
                    licensepack_digest_sha256: digest,
                    as_of_date: lp
                        .get("as_of_date")
                        .and_then(|v| v.as_str())
                        .map(|s| s.to_string()),
                });
            }
        }
    }
    Ok(refs)
}

/// Compute canonical JSON bytes for a value using the JCS-compatible pipeline.
pub fn canonical_json_bytes(value: &serde_json::Value) -> PackResult<Vec<u8>> {
    let canonical = CanonicalBytes::from_value(value.clone())?;
    Ok(canonical.into_bytes())
}

/// Evaluate licensing compliance for an activity.
///
/// Used by the compliance tensor to populate the LICENSING domain.
pub fn evaluate_license_compliance(
    license_id: &str,
    activity: &str,
    licensepack: &Licensepack,
    today: &str,
) -> LicenseComplianceState {
    match licensepack.get_license(license_id) {
        Some(license) => license.evaluate_compliance(activity, today),
        None => LicenseComplianceState::NonCompliant,
    }
}
