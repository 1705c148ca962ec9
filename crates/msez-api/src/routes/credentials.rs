//! # Credential Issuance and Verification
//!
//! Endpoints for issuing signed Verifiable Credentials on compliance
//! evaluation results and verifying VCs presented by counterparties.
//!
//! This module is where computation becomes evidence. The compliance
//! tensor produces an evaluation; this module signs it into a W3C
//! Verifiable Credential that can be transported, stored, and
//! independently verified.
//!
//! ## Endpoints
//!
//! - `POST /v1/assets/:id/credentials/compliance` — Evaluate and attest.
//! - `POST /v1/credentials/verify` — Verify a presented VC.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use msez_core::Timestamp;
use msez_vc::{ContextValue, CredentialTypeValue, ProofType, ProofValue, VerifiableCredential};

use crate::compliance::{
    apply_attestations, build_evaluation_result, build_tensor, AttestationInput,
    ComplianceEvalResult,
};
use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for compliance credential issuance.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ComplianceCredentialRequest {
    /// Entity ID for entity-specific evaluation.
    pub entity_id: Option<Uuid>,
    /// Attestation evidence per compliance domain.
    /// Keys are domain names (e.g., "aml", "kyc", "sanctions").
    #[serde(default)]
    pub attestations: HashMap<String, AttestationInput>,
}

/// Response from the compliance credential issuance endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplianceCredentialResponse {
    /// The compliance evaluation result.
    pub evaluation: ComplianceEvalResult,
    /// The signed VC, if the evaluation was passing. Null if not passing.
    pub credential: Option<serde_json::Value>,
    /// Reason the credential was not issued (if evaluation was not passing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response from the credential verification endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerificationResponse {
    /// Whether all proofs verified successfully.
    pub verified: bool,
    /// Number of proofs checked.
    pub proof_count: usize,
    /// Per-proof verification results.
    pub results: Vec<ProofVerificationResult>,
    /// The VC issuer.
    pub issuer: String,
    /// The credential type.
    pub credential_type: String,
}

/// Per-proof verification result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProofVerificationResult {
    /// The DID URL of the verification method used.
    pub verification_method: String,
    /// Whether this proof verified successfully.
    pub valid: bool,
    /// Error message if verification failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the credentials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/assets/:id/credentials/compliance",
            post(issue_compliance_credential),
        )
        .route("/v1/credentials/verify", post(verify_credential))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/assets/:id/credentials/compliance — Evaluate and attest.
///
/// Runs the compliance tensor, and if the result is passing, constructs
/// a signed Verifiable Credential attesting to the evaluation result.
/// The VC can be independently verified by any party with the zone's
/// public key.
///
/// Returns both the evaluation result and the signed credential (if issued).
/// If the evaluation is not passing, the credential field is null and the
/// response explains which domains are blocking.
#[utoipa::path(
    post,
    path = "/v1/assets/{id}/credentials/compliance",
    params(("id" = Uuid, Path, description = "Asset ID")),
    request_body = ComplianceCredentialRequest,
    responses(
        (status = 200, description = "Compliance evaluated and credential issued (if passing)",
            body = ComplianceCredentialResponse),
        (status = 404, description = "Asset not found", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
async fn issue_compliance_credential(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Json<serde_json::Value>,
) -> Result<Json<ComplianceCredentialResponse>, AppError> {
    // Parse the request body manually to give better error messages.
    let req: ComplianceCredentialRequest = serde_json::from_value(body.0)
        .map_err(|e| AppError::BadRequest(format!("invalid request body: {e}")))?;

    // Validate attestation bounds.
    const MAX_ATTESTATIONS: usize = 100;
    if req.attestations.len() > MAX_ATTESTATIONS {
        return Err(AppError::Validation(format!(
            "attestations must not exceed {MAX_ATTESTATIONS} entries"
        )));
    }
    for key in req.attestations.keys() {
        if key.len() > 100 {
            return Err(AppError::Validation(
                "attestation domain name must not exceed 100 characters".to_string(),
            ));
        }
    }

    // ── Act 1: Evaluate ─────────────────────────────────────────
    let asset = state
        .smart_assets
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("asset {id} not found")))?;

    let mut tensor = build_tensor(&asset.jurisdiction_id);
    apply_attestations(&mut tensor, &req.attestations);

    let evaluation = build_evaluation_result(&tensor, &asset, id);

    let slice = tensor.full_slice();
    let aggregate = slice.aggregate_state();

    // ── Act 2: Decide ───────────────────────────────────────────
    if !aggregate.is_passing() {
        let reason = format!(
            "evaluation is not passing (aggregate: {}). Blocking domains: [{}]",
            evaluation.overall_status,
            evaluation.blocking_domains.join(", ")
        );
        return Ok(Json(ComplianceCredentialResponse {
            evaluation,
            credential: None,
            reason: Some(reason),
        }));
    }

    // ── Act 3: Attest ───────────────────────────────────────────
    let now = Timestamp::now();

    // Build the credential subject.
    let subject = serde_json::json!({
        "asset_id": id.to_string(),
        "jurisdiction_id": asset.jurisdiction_id,
        "evaluation_aggregate": evaluation.overall_status,
        "tensor_commitment": evaluation.tensor_commitment,
        "evaluated_at": now.to_string(),
        "domain_count": 20,
        "passing_domains": evaluation.passing_domains,
    });

    let mut vc = VerifiableCredential {
        context: ContextValue::Array(vec![serde_json::Value::String(
            "https://www.w3.org/2018/credentials/v1".into(),
        )]),
        id: Some(format!(
            "urn:msez:vc:compliance:{}:{}",
            id,
            now.as_datetime().format("%Y%m%dT%H%M%SZ")
        )),
        credential_type: CredentialTypeValue::Array(vec![
            "VerifiableCredential".into(),
            "MsezComplianceAttestationCredential".into(),
        ]),
        issuer: state.zone_did.clone(),
        issuance_date: *now.as_datetime(),
        expiration_date: None,
        credential_subject: subject,
        proof: ProofValue::default(),
    };

    // Sign with the zone key.
    vc.sign_ed25519(
        &state.zone_signing_key,
        format!("{}#key-1", state.zone_did),
        ProofType::Ed25519Signature2020,
        Some(now),
    )
    .map_err(|e| AppError::Internal(format!("VC signing failed: {e}")))?;

    let vc_value = serde_json::to_value(&vc)
        .map_err(|e| AppError::Internal(format!("VC serialization failed: {e}")))?;

    Ok(Json(ComplianceCredentialResponse {
        evaluation,
        credential: Some(vc_value),
        reason: None,
    }))
}

/// POST /v1/credentials/verify — Verify a Verifiable Credential.
///
/// Accepts a VC, resolves the verification method against known zone keys,
/// and returns the verification result. Currently resolves only the zone's
/// own key; external DID resolution is a Phase 2 feature.
#[utoipa::path(
    post,
    path = "/v1/credentials/verify",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Verification result", body = VerificationResponse),
    ),
    tag = "credentials"
)]
async fn verify_credential(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<VerificationResponse>, AppError> {
    let vc: VerifiableCredential = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("invalid VC: {e}")))?;

    // Resolve verification methods: for now, only the zone's own key.
    let zone_vk = state.zone_signing_key.verifying_key();
    let zone_did = state.zone_did.clone();

    // Collect detailed per-proof results for the response.
    let results = vc.verify(|verification_method| {
        if verification_method.starts_with(&zone_did) {
            Ok(zone_vk.clone())
        } else {
            Err(format!(
                "unknown verification method: {verification_method}"
            ))
        }
    });
    let proof_count = results.len();

    // Apply the same holistic checks that verify_all() enforces:
    // (a) reject credentials with zero proofs (vacuously-true iterator bug),
    // (b) reject expired credentials regardless of signature validity.
    let proofs_ok = !results.is_empty() && results.iter().all(|r| r.ok);
    let expired = vc
        .expiration_date
        .is_some_and(|exp| exp < chrono::Utc::now());
    let all_ok = proofs_ok && !expired;

    let credential_type = match &vc.credential_type {
        CredentialTypeValue::Single(s) => s.clone(),
        CredentialTypeValue::Array(arr) => arr.join(", "),
    };

    Ok(Json(VerificationResponse {
        verified: all_ok,
        proof_count,
        results: results
            .into_iter()
            .map(|r| ProofVerificationResult {
                verification_method: r.verification_method,
                valid: r.ok,
                error: if r.error.is_empty() {
                    None
                } else {
                    Some(r.error)
                },
            })
            .collect(),
        issuer: vc.issuer.clone(),
        credential_type,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
