//! # NADRA Integration Adapter Interface (M-011)
//!
//! Defines the adapter interface for NADRA (National Database and Registration
//! Authority) integration. CNIC verification against NADRA is a legal
//! requirement for KYC in Pakistan's GovOS deployment (P1-005).
//!
//! ## Architecture
//!
//! The `NadraAdapter` trait abstracts over the NADRA verification backend.
//! Production deployments implement it against the live NADRA API; test
//! environments use `MockNadraAdapter`. This separation allows the
//! `IdentityClient` aggregation facade to compose NADRA verification without
//! coupling to a specific transport or API version.
//!
//! ## CNIC Validation
//!
//! Pakistan CNICs are 13-digit numbers (format: `XXXXX-XXXXXXX-X`). The
//! `validate_cnic` helper strips dashes and verifies the digit count before
//! any request reaches the adapter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CNIC status as reported by NADRA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CnicStatus {
    /// CNIC is active and valid.
    Active,
    /// CNIC has expired and must be renewed.
    Expired,
    /// CNIC has been blocked by NADRA (fraud, court order, etc.).
    Blocked,
    /// CNIC number does not exist in NADRA records.
    NotFound,
}

impl fmt::Display for CnicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Expired => write!(f, "Expired"),
            Self::Blocked => write!(f, "Blocked"),
            Self::NotFound => write!(f, "NotFound"),
        }
    }
}

/// Errors from NADRA integration operations.
#[derive(Debug, thiserror::Error)]
pub enum NadraError {
    /// NADRA service is unreachable or returned a 5xx status.
    #[error("NADRA service unavailable: {reason}")]
    ServiceUnavailable {
        /// Human-readable description of the outage or error.
        reason: String,
    },

    /// CNIC format is invalid (not exactly 13 digits after stripping dashes).
    #[error("invalid CNIC: {reason}")]
    InvalidCnic {
        /// Description of the validation failure.
        reason: String,
    },

    /// NADRA accepted the request but verification could not be completed.
    #[error("verification failed: {reason}")]
    VerificationFailed {
        /// Description of the failure (e.g. data mismatch, internal error).
        reason: String,
    },

    /// The NADRA adapter has not been configured for this deployment.
    #[error("NADRA adapter not configured: {reason}")]
    NotConfigured {
        /// Why configuration is missing or incomplete.
        reason: String,
    },

    /// The request to NADRA timed out.
    #[error("NADRA request timed out after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed time in milliseconds before the timeout triggered.
        elapsed_ms: u64,
    },
}

/// CNIC verification request sent to NADRA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NadraVerificationRequest {
    /// CNIC number (13 digits, with or without dashes).
    pub cnic: String,
    /// Full name of the individual for cross-reference.
    pub full_name: String,
    /// Father's name for additional verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    /// Date of birth in ISO 8601 format (YYYY-MM-DD) for additional verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    /// Idempotency key for this request. Callers must generate a unique value
    /// per logical verification attempt to prevent duplicate charges.
    pub request_reference: String,
}

/// CNIC verification response from NADRA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NadraVerificationResponse {
    /// Whether the identity was successfully verified.
    pub verified: bool,
    /// Confidence score from NADRA's matching algorithm (0.0 = no match,
    /// 1.0 = exact match). `None` if NADRA does not return a score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    /// Current status of the CNIC in NADRA records.
    pub cnic_status: CnicStatus,
    /// ISO 8601 timestamp when NADRA performed the verification.
    pub verification_timestamp: String,
    /// Reference identifier linking back to the original request.
    pub reference: String,
}

/// Adapter trait for NADRA identity verification.
///
/// Implementations must be `Send + Sync` so they can be shared across
/// async tasks behind an `Arc`. The trait is object-safe to support
/// runtime adapter selection (mock vs. live).
pub trait NadraAdapter: Send + Sync {
    /// Verify an individual's identity against NADRA records using their
    /// CNIC number, name, and optional biographical details.
    fn verify_identity(
        &self,
        request: &NadraVerificationRequest,
    ) -> Result<NadraVerificationResponse, NadraError>;

    /// Check the current status of a CNIC number without performing a full
    /// identity verification. Useful for pre-flight checks before initiating
    /// costly verification workflows.
    fn check_cnic_status(&self, cnic: &str) -> Result<CnicStatus, NadraError>;

    /// Return the human-readable name of this adapter implementation
    /// (e.g. "MockNadraAdapter", "NadraLiveApiV2").
    fn adapter_name(&self) -> &str;
}

/// Validate that a CNIC string contains exactly 13 digits after stripping
/// dashes. Returns the canonical 13-digit form on success.
pub fn validate_cnic(cnic: &str) -> Result<String, NadraError> {
    let digits: String = cnic.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 13 {
        return Err(NadraError::InvalidCnic {
            reason: format!(
                "CNIC must be exactly 13 digits, got {} digits from input '{}'",
                digits.len(),
                cnic
            ),
        });
    }
    Ok(digits)
}

/// Mock NADRA adapter for testing and development.
///
/// Returns successful verification for any well-formed 13-digit CNIC.
/// Uses a fixed match score of 0.95 and `CnicStatus::Active`.
#[derive(Debug, Clone)]
pub struct MockNadraAdapter;

impl NadraAdapter for MockNadraAdapter {
    fn verify_identity(
        &self,
        request: &NadraVerificationRequest,
    ) -> Result<NadraVerificationResponse, NadraError> {
        let _canonical_cnic = validate_cnic(&request.cnic)?;

        Ok(NadraVerificationResponse {
            verified: true,
            match_score: Some(0.95),
            cnic_status: CnicStatus::Active,
            verification_timestamp: chrono::Utc::now().to_rfc3339(),
            reference: format!("MOCK-{}", request.request_reference),
        })
    }

    fn check_cnic_status(&self, cnic: &str) -> Result<CnicStatus, NadraError> {
        let _canonical = validate_cnic(cnic)?;
        Ok(CnicStatus::Active)
    }

    fn adapter_name(&self) -> &str {
        "MockNadraAdapter"
    }
}
