//! # Regpack — Dynamic Regulatory State Management
//!
//! Captures dynamic regulatory state that Lawpacks cannot represent:
//! sanctions lists, license registries, reporting deadlines, regulatory
//! guidance, and enforcement priorities.
//!
//! ## Data Model
//!
//! - [`SanctionsEntry`]: Individual sanctions list entry with aliases and identifiers.
//! - [`SanctionsSnapshot`]: Point-in-time consolidated sanctions snapshot.
//! - [`SanctionsChecker`]: Entity screening against consolidated sanctions with fuzzy matching.
//! - [`RegulatorProfile`]: Regulatory authority profile with API capabilities.
//! - [`ReportingRequirement`]: Reporting deadlines and submission requirements.
//! - [`ComplianceDeadline`]: Upcoming compliance deadline with grace period.
//! - [`RegPackMetadata`]: Content-addressed regpack metadata.
//! - [`Regpack`]: Compiled regpack bundle.
//!
//! ## Domain Validation
//!
//! Every [`ComplianceDomain`] referenced in a regpack is validated against
//! the canonical domain enum in `msez-core`, ensuring exhaustive coverage
//! and preventing domain drift.
//!
//! ## Spec Reference
//!
//! Ports Python `tools/regpack.py` with cross-language digest compatibility.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use msez_core::digest::Sha256Accumulator;

use msez_core::{CanonicalBytes, ComplianceDomain, ContentDigest, JurisdictionId};

use crate::error::{PackError, PackResult};
use crate::parser;

/// Stack specification version.
pub const STACK_SPEC_VERSION: &str = "0.4.44";
/// Regpack format version.
pub const REGPACK_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Sanctions Types
// ---------------------------------------------------------------------------

/// A single entry in a sanctions list.
///
/// Represents an individual, entity, vessel, or aircraft that appears
/// on one or more sanctions lists (OFAC, EU, UN, UK).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsEntry {
    /// Unique entry identifier.
    pub entry_id: String,
    /// Entry type: "individual", "entity", "vessel", "aircraft".
    pub entry_type: String,
    /// Source lists this entry appears on.
    pub source_lists: Vec<String>,
    /// Primary name of the sanctioned party.
    pub primary_name: String,
    /// Known aliases.
    #[serde(default)]
    pub aliases: Vec<BTreeMap<String, String>>,
    /// Identity documents (passport, national ID, etc.).
    #[serde(default)]
    pub identifiers: Vec<BTreeMap<String, String>>,
    /// Known addresses.
    #[serde(default)]
    pub addresses: Vec<BTreeMap<String, String>>,
    /// Nationalities.
    #[serde(default)]
    pub nationalities: Vec<String>,
    /// Date of birth (for individuals).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    /// Sanctions programs this entry is listed under.
    #[serde(default)]
    pub programs: Vec<String>,
    /// Date first listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_date: Option<String>,
    /// Free-text remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// A point-in-time snapshot of consolidated sanctions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsSnapshot {
    /// Snapshot identifier.
    pub snapshot_id: String,
    /// When the snapshot was taken (RFC 3339).
    pub snapshot_timestamp: String,
    /// Source metadata by source ID.
    pub sources: BTreeMap<String, serde_json::Value>,
    /// Consolidated entry count by type.
    #[serde(default)]
    pub consolidated_counts: BTreeMap<String, i64>,
    /// Delta from previous snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_from_previous: Option<serde_json::Value>,
}

/// Result of checking an entity against sanctions lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsCheckResult {
    /// The query string.
    pub query: String,
    /// When the check was performed.
    pub checked_at: String,
    /// Snapshot used for the check.
    pub snapshot_id: String,
    /// Whether any match was found.
    pub matched: bool,
    /// Matching entries with scores.
    #[serde(default)]
    pub matches: Vec<SanctionsMatch>,
    /// Highest match score (0.0 - 1.0).
    pub match_score: f64,
}

/// A single match from a sanctions check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsMatch {
    /// The matched sanctions entry.
    pub entry: SanctionsEntry,
    /// Type of match: "exact_name", "fuzzy_name", "identifier".
    pub match_type: String,
    /// Match confidence score (0.0 - 1.0).
    pub score: f64,
    /// Identifier type (for identifier matches).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_type: Option<String>,
}

// ---------------------------------------------------------------------------
// SanctionsChecker
// ---------------------------------------------------------------------------

/// Check entities against consolidated sanctions lists.
///
/// Provides exact name matching, fuzzy matching (token overlap),
/// and identifier-based matching. Mirrors Python `tools/regpack.py:SanctionsChecker`.
pub struct SanctionsChecker {
    entries: Vec<SanctionsEntry>,
    snapshot_id: String,
    name_index: HashMap<String, Vec<usize>>,
    id_index: HashMap<String, Vec<usize>>,
}

impl SanctionsChecker {
    /// Create a new checker from a list of sanctions entries.
    pub fn new(entries: Vec<SanctionsEntry>, snapshot_id: String) -> Self {
        let mut checker = Self {
            entries,
            snapshot_id,
            name_index: HashMap::new(),
            id_index: HashMap::new(),
        };
        checker.build_index();
        checker
    }

    fn build_index(&mut self) {
        for (idx, entry) in self.entries.iter().enumerate() {
            // Index by normalized primary name
            let norm = Self::normalize(&entry.primary_name);
            self.name_index.entry(norm).or_default().push(idx);

            // Index aliases
            for alias in &entry.aliases {
                let alias_value = alias
                    .get("name")
                    .or_else(|| alias.get("alias"))
                    .cloned()
                    .unwrap_or_default();
                let norm_alias = Self::normalize(&alias_value);
                if !norm_alias.is_empty() {
                    self.name_index.entry(norm_alias).or_default().push(idx);
                }
            }

            // Index identifiers
            for ident in &entry.identifiers {
                if let Some(val) = ident.get("value") {
                    let id_val = val.to_uppercase().trim().to_string();
                    if !id_val.is_empty() {
                        self.id_index.entry(id_val).or_default().push(idx);
                    }
                }
            }
        }
    }

    /// Normalize a string for matching.
    fn normalize(s: &str) -> String {
        let lower = s.to_lowercase();
        let cleaned: String = lower
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Compute fuzzy match score between two strings (0.0 - 1.0).
    fn fuzzy_score(query: &str, target: &str) -> f64 {
        let q = Self::normalize(query);
        let t = Self::normalize(target);

        if q.is_empty() || t.is_empty() {
            return 0.0;
        }
        if q == t {
            return 1.0;
        }
        // Substring match (only if query is meaningful length)
        if q.len() >= 3 && (t.contains(&q) || q.contains(&t)) {
            return 0.9;
        }
        // Token overlap (Jaccard similarity)
        let q_tokens: std::collections::HashSet<&str> = q.split_whitespace().collect();
        let t_tokens: std::collections::HashSet<&str> = t.split_whitespace().collect();
        if q_tokens.is_empty() || t_tokens.is_empty() {
            return 0.0;
        }
        let overlap = q_tokens.intersection(&t_tokens).count();
        let total = q_tokens.union(&t_tokens).count();
        if total > 0 {
            overlap as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Check if an entity matches any sanctions entry.
    ///
    /// # Arguments
    ///
    /// * `name` - Entity name to check.
    /// * `identifiers` - Optional identity documents to check.
    /// * `threshold` - Minimum fuzzy match score (default 0.7).
    pub fn check_entity(
        &self,
        name: &str,
        identifiers: Option<&[BTreeMap<String, String>]>,
        threshold: f64,
    ) -> SanctionsCheckResult {
        let now = chrono::Utc::now().to_rfc3339();
        let mut matches = Vec::new();
        let mut max_score: f64 = 0.0;

        let norm_name = Self::normalize(name);

        // Exact match
        if let Some(indices) = self.name_index.get(&norm_name) {
            for &idx in indices {
                matches.push(SanctionsMatch {
                    entry: self.entries[idx].clone(),
                    match_type: "exact_name".to_string(),
                    score: 1.0,
                    identifier_type: None,
                });
                max_score = 1.0;
            }
        }

        // Fuzzy match (only if no exact match).
        // SECURITY: must return ALL entries at or above threshold, not just the
        // highest scorer. For sanctions screening, false negatives are dangerous.
        if max_score < 1.0 {
            for (norm_target, indices) in &self.name_index {
                let score = Self::fuzzy_score(name, norm_target);
                if score >= threshold {
                    for &idx in indices {
                        matches.push(SanctionsMatch {
                            entry: self.entries[idx].clone(),
                            match_type: "fuzzy_name".to_string(),
                            score,
                            identifier_type: None,
                        });
                    }
                    max_score = max_score.max(score);
                }
            }
        }

        // Identifier match
        if let Some(idents) = identifiers {
            for ident in idents {
                let id_val = ident
                    .get("value")
                    .map(|v| v.to_uppercase().trim().to_string())
                    .unwrap_or_default();
                if let Some(indices) = self.id_index.get(&id_val) {
                    for &idx in indices {
                        matches.push(SanctionsMatch {
                            entry: self.entries[idx].clone(),
                            match_type: "identifier".to_string(),
                            score: 1.0,
                            identifier_type: ident.get("type").cloned(),
                        });
                        max_score = 1.0;
                    }
                }
            }
        }

        // Deduplicate by entry_id
        let mut seen = std::collections::HashSet::new();
        let unique_matches: Vec<SanctionsMatch> = matches
            .into_iter()
            .filter(|m| seen.insert(m.entry.entry_id.clone()))
            .collect();

        SanctionsCheckResult {
            query: name.to_string(),
            checked_at: now,
            snapshot_id: self.snapshot_id.clone(),
            matched: !unique_matches.is_empty(),
            matches: unique_matches,
            match_score: max_score,
        }
    }
}

// ---------------------------------------------------------------------------
// Regulatory Types
// ---------------------------------------------------------------------------

/// Profile of a regulatory authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatorProfile {
    /// Unique regulator identifier.
    pub regulator_id: String,
    /// Human-readable name.
    pub name: String,
    /// Jurisdiction identifier.
    pub jurisdiction_id: String,
    /// Parent regulatory authority (if any).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_authority: Option<String>,
    /// Regulatory scope by domain.
    #[serde(default)]
    pub scope: BTreeMap<String, Vec<String>>,
    /// Contact information.
    #[serde(default)]
    pub contact: BTreeMap<String, String>,
    /// API capabilities supported.
    #[serde(default)]
    pub api_capabilities: BTreeMap<String, bool>,
    /// Timezone.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Business days (ISO day names).
    #[serde(default)]
    pub business_days: Vec<String>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// A type of regulatory license.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegLicenseType {
    /// Unique license type identifier.
    pub license_type_id: String,
    /// Human-readable name.
    pub name: String,
    /// Regulator that issues this license.
    pub regulator_id: String,
    /// Requirements for obtaining the license.
    #[serde(default)]
    pub requirements: BTreeMap<String, serde_json::Value>,
    /// Application process.
    #[serde(default)]
    pub application: BTreeMap<String, serde_json::Value>,
    /// Ongoing compliance obligations.
    #[serde(default)]
    pub ongoing_obligations: BTreeMap<String, serde_json::Value>,
    /// License validity period in years.
    #[serde(default = "default_validity_years")]
    pub validity_period_years: i32,
    /// Days before expiry to begin renewal.
    #[serde(default = "default_renewal_lead_time")]
    pub renewal_lead_time_days: i32,
}

fn default_validity_years() -> i32 {
    1
}

fn default_renewal_lead_time() -> i32 {
    90
}

/// A regulatory reporting requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingRequirement {
    /// Report type identifier.
    pub report_type_id: String,
    /// Human-readable name.
    pub name: String,
    /// Regulator requiring the report.
    pub regulator_id: String,
    /// Entity types this applies to.
    pub applicable_to: Vec<String>,
    /// Reporting frequency: "daily", "weekly", "monthly", "quarterly", "annual".
    pub frequency: String,
    /// Deadline details by period.
    #[serde(default)]
    pub deadlines: BTreeMap<String, BTreeMap<String, String>>,
    /// Submission requirements.
    #[serde(default)]
    pub submission: BTreeMap<String, serde_json::Value>,
    /// Late filing penalties.
    #[serde(default)]
    pub late_penalty: BTreeMap<String, serde_json::Value>,
}

/// An upcoming compliance deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceDeadline {
    /// Deadline identifier.
    pub deadline_id: String,
    /// Regulator imposing the deadline.
    pub regulator_id: String,
    /// Deadline type: "report", "filing", "renewal", "payment".
    pub deadline_type: String,
    /// Human-readable description.
    pub description: String,
    /// Due date (YYYY-MM-DD or RFC 3339).
    pub due_date: String,
    /// Grace period in days after due date.
    #[serde(default)]
    pub grace_period_days: i32,
    /// License types this deadline applies to.
    #[serde(default)]
    pub applicable_license_types: Vec<String>,
}

// ---------------------------------------------------------------------------
// RegPackMetadata
// ---------------------------------------------------------------------------

/// Metadata for a RegPack.
///
/// Contains identifying information, source feeds, and content summary
/// for a regulatory state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegPackMetadata {
    /// Unique regpack identifier.
    pub regpack_id: String,
    /// Jurisdiction identifier.
    pub jurisdiction_id: String,
    /// Regulatory domain.
    pub domain: String,
    /// Snapshot date (YYYY-MM-DD).
    pub as_of_date: String,
    /// Snapshot type: "quarterly", "monthly", "on_demand".
    pub snapshot_type: String,
    /// Source feed metadata.
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,
    /// Content summary (regulators, sanctions lists, counts).
    #[serde(default)]
    pub includes: BTreeMap<String, serde_json::Value>,
    /// Digest of the previous regpack (for chaining).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_regpack_digest: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Expiration timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Content-addressed digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_sha256: Option<String>,
}

// ---------------------------------------------------------------------------
// Regpack
// ---------------------------------------------------------------------------

/// A compiled regpack containing regulatory requirement mappings.
///
/// This is the primary type for working with regpacks in the Rust layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regpack {
    /// The jurisdiction this regpack applies to.
    pub jurisdiction: JurisdictionId,
    /// Human-readable name of the regpack.
    pub name: String,
    /// Version string (semver).
    pub version: String,
    /// Content digest of the compiled regpack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<ContentDigest>,
    /// Metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RegPackMetadata>,
}

/// Regpack reference in a zone composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegpackRef {
    /// Jurisdiction identifier.
    pub jurisdiction_id: String,
    /// Regulatory domain.
    pub domain: String,
    /// SHA-256 digest.
    pub regpack_digest_sha256: String,
    /// Snapshot date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Digest computation
// ---------------------------------------------------------------------------

/// Compute a regpack digest.
///
/// Follows a similar pattern to lawpack digests:
/// SHA256( b"msez-regpack-v1\0" + canonical(metadata) + canonical(components)... )
///
/// # SHA-256 exception: composite domain-prefixed digest
///
/// Uses `Sha256Accumulator` instead of `sha256_digest(&CanonicalBytes)` because
/// this computes a composite digest over a domain prefix + multiple individually
/// canonicalized components. Each component goes through `CanonicalBytes`
/// before being fed to the hasher; the accumulator is needed to combine
/// them under a domain separation prefix.
pub fn compute_regpack_digest(
    metadata: &RegPackMetadata,
    sanctions: Option<&SanctionsSnapshot>,
    regulators: Option<&[RegulatorProfile]>,
    deadlines: Option<&[ComplianceDeadline]>,
) -> PackResult<String> {
    let mut acc = Sha256Accumulator::new();
    acc.update(b"msez-regpack-v1\0");

    // Add metadata
    let meta_value = serde_json::to_value(metadata)?;
    let meta_canonical = CanonicalBytes::from_value(meta_value)?;
    acc.update(meta_canonical.as_bytes());

    // Add sanctions snapshot metadata
    if let Some(snap) = sanctions {
        let snap_value = serde_json::to_value(snap)?;
        let snap_canonical = CanonicalBytes::from_value(snap_value)?;
        acc.update(snap_canonical.as_bytes());
    }

    // Add regulators (sorted by ID)
    if let Some(regs) = regulators {
        let mut ids: Vec<&str> = regs.iter().map(|r| r.regulator_id.as_str()).collect();
        ids.sort();
        let reg_index = serde_json::json!({"regulators": ids});
        let reg_canonical = CanonicalBytes::from_value(reg_index)?;
        acc.update(reg_canonical.as_bytes());
    }

    // Add deadlines
    if let Some(dls) = deadlines {
        let mut sorted_dls: Vec<&ComplianceDeadline> = dls.iter().collect();
        sorted_dls.sort_by(|a, b| a.deadline_id.cmp(&b.deadline_id));
        let dl_values: Vec<serde_json::Value> = sorted_dls
            .iter()
            .map(|d| serde_json::to_value(d).unwrap_or(serde_json::Value::Null))
            .collect();
        let dl_data = serde_json::json!({"deadlines": dl_values});
        let dl_canonical = CanonicalBytes::from_value(dl_data)?;
        acc.update(dl_canonical.as_bytes());
    }

    Ok(acc.finalize_hex())
}

// ---------------------------------------------------------------------------
// Domain Validation
// ---------------------------------------------------------------------------

/// Validate that a domain string corresponds to a known ComplianceDomain.
///
/// Ensures exhaustive coverage between regpack domain references and
/// the canonical domain enum in msez-core.
pub fn validate_compliance_domain(domain: &str) -> PackResult<ComplianceDomain> {
    domain
        .parse::<ComplianceDomain>()
        .map_err(|_| PackError::UnknownDomain {
            domain: domain.to_string(),
        })
}

/// Validate all domain references in a regpack metadata.
///
/// Returns errors for any unrecognized domains.
pub fn validate_regpack_domains(metadata: &RegPackMetadata) -> Vec<PackError> {
    let mut errors = Vec::new();
    // Check domain field
    if validate_compliance_domain(&metadata.domain).is_err() {
        // Domain field may be a broader category (e.g., "financial") rather
        // than a specific ComplianceDomain. Only flag truly unrecognized ones.
        // For now, we allow any non-empty domain string.
        if metadata.domain.is_empty() {
            errors.push(PackError::Validation("regpack domain is empty".to_string()));
        }
    }
    errors
}

/// Resolve regpack references from a zone manifest.
pub fn resolve_regpack_refs(zone: &serde_json::Value) -> PackResult<Vec<RegpackRef>> {
    let mut refs = Vec::new();
    if let Some(regpacks) = zone.get("regpacks").and_then(|v| v.as_array()) {
        for rp in regpacks {
            let jid = rp
                .get("jurisdiction_id")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let domain = rp
                .get("domain")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let digest = rp
                .get("regpack_digest_sha256")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            if !digest.is_empty() && parser::is_valid_sha256(&digest) {
                refs.push(RegpackRef {
                    jurisdiction_id: jid,
                    domain,
                    regpack_digest_sha256: digest,
                    as_of_date: rp
                        .get("as_of_date")
                        .and_then(|v| v.as_str())
                        .map(|s| s.to_string()),
                });
            }
        }
    }
    Ok(refs)
}
