//! # Authentication & Authorization Middleware
//!
//! Bearer token middleware with role-based access control (RBAC).
//!
//! ## Token Format
//!
//! **Phase 1** (current): Bearer tokens encode role and entity identity:
//!
//! ```text
//! Bearer {role}:{entity_id}:{secret}   — new format
//! Bearer {secret}                       — legacy format (treated as ZoneAdmin)
//! ```
//!
//! **Phase 2** (future): JWT claims replace the token format. The
//! `CallerIdentity` extractor stays the same — only parsing changes.
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody, ErrorDetail};
use crate::state::SmartAssetRecord;

// ── Role ────────────────────────────────────────────────────────────────────

/// Roles in the SEZ Stack, ordered by privilege level.
///
/// The `Ord` derivation respects variant declaration order:
/// `EntityOperator < Regulator < ZoneAdmin`. This enables `>=` comparison
/// for role-based access checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can read/write own entity's resources.
    EntityOperator,
    /// Can read all resources in the jurisdiction. Can query attestations.
    Regulator,
    /// Full access to all resources and endpoints.
    ZoneAdmin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityOperator => "entity_operator",
            Self::Regulator => "regulator",
            Self::ZoneAdmin => "zone_admin",
        }
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller, extracted from the auth context
/// and available to all route handlers via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The caller's role in the system.
    pub role: Role,
    /// The caller's entity ID (for entity_operator role).
    /// None for zone_admin and regulator (they operate across entities).
    pub entity_id: Option<Uuid>,
    /// The caller's jurisdiction (for scoped access). Populated from
    /// zone context in future phases.
    pub jurisdiction_id: Option<String>,
}

impl CallerIdentity {
    /// Check if the caller has at least the given minimum role.
    ///
    /// Since `Role` derives `Ord` with `EntityOperator < Regulator < ZoneAdmin`,
    /// this is a single comparison.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }

    /// Check if the caller can access the given smart asset.
    ///
    /// - `ZoneAdmin` and `Regulator` can access any asset.
    /// - `EntityOperator` can only access assets they own.
    pub fn can_access_asset(&self, asset: &SmartAssetRecord) -> bool {
        match self.role {
            Role::ZoneAdmin => true,
            Role::Regulator => true,
            Role::EntityOperator => {
                match (&self.entity_id, &asset.owner_entity_id) {
                    (Some(caller), Some(owner)) => caller == owner,
                    _ => false, // no entity binding or no owner = denied
                }
            }
        }
    }
}

/// Axum `FromRequestParts` implementation for `CallerIdentity`.
///
/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present (middleware didn't run or failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Check that the caller has at least the required role.
/// Returns 403 Forbidden if the caller's role is insufficient.
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer tokens.
///
/// Prevents timing side-channels that could reveal token length or prefix.
/// When lengths differ, performs a dummy comparison to avoid leaking length
/// information through timing variance.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        // Dummy comparison to keep timing constant regardless of length match.
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse the bearer token in format `{role}:{entity_id}:{secret}` or `{secret}` (legacy).
///
/// Legacy tokens (without role prefix) are treated as `ZoneAdmin` for backward
/// compatibility with existing deployments.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let parts: Vec<&str> = provided.splitn(3, ':').collect();

    match parts.len() {
        // Legacy format: just the secret. Treated as zone_admin for backward compat.
        1 => {
            if constant_time_token_eq(provided, expected_secret) {
                Ok(CallerIdentity {
                    role: Role::ZoneAdmin,
                    entity_id: None,
                    jurisdiction_id: None,
                })
            } else {
                Err("invalid bearer token".into())
            }
        }
        // New format: role:entity_id:secret (entity_id may be empty)
        3 => {
            let role_str = parts[0];
            let entity_str = parts[1];
            let secret = parts[2];

            if !constant_time_token_eq(secret, expected_secret) {
                return Err("invalid bearer token".into());
            }

            let role = match role_str {
                "zone_admin" => Role::ZoneAdmin,
                "regulator" => Role::Regulator,
                "entity_operator" => Role::EntityOperator,
                other => return Err(format!("unknown role: {other}")),
            };

            let entity_id = if entity_str.is_empty() {
                None
            } else {
                Some(
                    entity_str
                        .parse::<Uuid>()
                        .map_err(|e| format!("invalid entity_id: {e}"))?,
                )
            };

            Ok(CallerIdentity {
                role,
                entity_id,
                jurisdiction_id: None,
            })
        }
        _ => Err("invalid token format — expected {role}:{entity_id}:{secret} or {secret}".into()),
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Extract and validate the Bearer token from the Authorization header.
///
/// Parses the token to extract `CallerIdentity` (role + entity binding) and
/// injects it into request extensions for downstream handlers.
///
/// When `AuthConfig.token` is `None`, all requests are allowed with `ZoneAdmin`
/// identity (auth disabled / development mode).
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected_token = request.extensions().get::<AuthConfig>().cloned();

    match expected_token {
        Some(AuthConfig {
            token: Some(ref expected),
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(header_value) if header_value.starts_with("Bearer ") => {
                    let provided = &header_value[7..];
                    match parse_bearer_token(provided, expected) {
                        Ok(identity) => {
                            request.extensions_mut().insert(identity);
                            next.run(request).await
                        }
                        Err(msg) => {
                            tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                            unauthorized_response(&msg)
                        }
                    }
                }
                Some(_) => {
                    tracing::warn!("authentication failed: non-Bearer authorization scheme");
                    unauthorized_response("authorization header must use Bearer scheme")
                }
                None => {
                    tracing::warn!("authentication failed: missing authorization header");
                    unauthorized_response("missing authorization header")
                }
            }
        }
        _ => {
            // Auth disabled — inject ZoneAdmin identity for full access.
            request.extensions_mut().insert(CallerIdentity {
                role: Role::ZoneAdmin,
                entity_id: None,
                jurisdiction_id: None,
            });
            next.run(request).await
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
