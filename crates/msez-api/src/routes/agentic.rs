//! # Agentic Policy Engine API
//!
//! HTTP surface for the autonomous policy engine. Accepts environmental
//! triggers, evaluates them against registered policies, and dispatches
//! resulting actions to domain operations.
//!
//! This is the nervous system: environmental change enters through
//! `/v1/triggers` and propagates through policy evaluation into corridor
//! transitions, compliance re-evaluations, and audit trail entries.
//!
//! ## Reactive Bridge
//!
//! When the policy engine produces a `Halt` or `Resume` action targeting
//! a corridor, the handler transitions the corridor via the typestate
//! machine (`DynCorridorState::valid_transitions`). All other actions
//! are recorded as "scheduled" — awaiting future executors.

use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use msez_agentic::{PolicyAction, ScheduledAction, Trigger, TriggerType};
use msez_core::{sha256_digest, CanonicalBytes};
use msez_state::{DynCorridorState, TransitionRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to submit an environmental trigger for policy evaluation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TriggerRequest {
    /// Trigger type name (e.g., "sanctions_list_update", "license_status_change").
    pub trigger_type: String,
    /// Asset or corridor ID affected by this trigger.
    pub asset_id: Option<String>,
    /// Jurisdiction scope for policy filtering.
    pub jurisdiction: Option<String>,
    /// Trigger payload — event-specific data.
    pub data: Option<serde_json::Value>,
}

impl Validate for TriggerRequest {
    fn validate(&self) -> Result<(), String> {
        if self.trigger_type.trim().is_empty() {
            return Err("trigger_type must not be empty".to_string());
        }
        if self.trigger_type.len() > 255 {
            return Err("trigger_type must not exceed 255 characters".to_string());
        }
        if let Some(ref j) = self.jurisdiction {
            if j.len() > 255 {
                return Err("jurisdiction must not exceed 255 characters".to_string());
            }
        }
        Ok(())
    }
}

/// Response from trigger evaluation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TriggerResponse {
    /// The trigger type that was evaluated.
    pub trigger_type: String,
    /// Number of actions produced by policy evaluation.
    pub actions_produced: usize,
    /// Per-action execution results.
    pub actions: Vec<ActionResult>,
    /// Number of recent audit entries (snapshot).
    pub audit_entries: usize,
}

/// Execution status of a dispatched policy action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Action was executed successfully (e.g., corridor transitioned).
    Executed,
    /// Action was recorded for future execution by a domain executor.
    Scheduled,
    /// Action was skipped (target not found, invalid transition, etc.).
    Skipped,
    /// Action execution failed with an error.
    Failed,
}

/// Result of dispatching a single action.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActionResult {
    /// Unique action identifier.
    pub action_id: String,
    /// Action type (e.g., "halt", "resume", "update_manifest").
    pub action_type: String,
    /// Execution status.
    pub status: ActionStatus,
    /// Human-readable detail about the action outcome.
    pub detail: Option<String>,
    /// Resource affected by the action (corridor UUID, asset ID, etc.).
    pub affected_resource: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the agentic policy engine router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/triggers", post(submit_trigger))
        .route("/v1/policies", get(list_policies))
        .route("/v1/policies/:id", delete(delete_policy))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/triggers — Submit an environmental trigger for policy evaluation.
///
/// The engine evaluates the trigger against all registered policies,
/// resolves conflicts, and dispatches immediate actions. Actions that
/// cannot be executed immediately are scheduled for later execution.
///
/// ## Reactive Bridge
///
/// When the evaluation produces a `Halt` or `Resume` action targeting
/// a corridor, the handler transitions the corridor via the typestate
/// machine (`DynCorridorState::valid_transitions`). The trigger's audit
/// entry becomes the evidence for the corridor transition.
async fn submit_trigger(
    State(state): State<AppState>,
    body: Result<Json<TriggerRequest>, JsonRejection>,
) -> Result<Json<TriggerResponse>, AppError> {
    let req = extract_validated_json(body)?;

    // Parse the trigger type.
    let trigger_type: TriggerType =
        serde_json::from_value(serde_json::Value::String(req.trigger_type.clone())).map_err(
            |e| AppError::Validation(format!("unknown trigger type: '{}': {e}", req.trigger_type,)),
        )?;

    // Build the trigger.
    let trigger = Trigger::new(trigger_type, req.data.clone().unwrap_or_default());

    // Evaluate against the policy engine.
    let actions = {
        let mut engine = state.policy_engine.lock();

        engine.process_trigger(
            &trigger,
            req.asset_id.as_deref().unwrap_or("*"),
            req.jurisdiction.as_deref(),
        )
    };

    // Dispatch actions (engine lock released so corridor updates don't deadlock).
    let mut action_results = Vec::new();
    for action in &actions {
        let result = dispatch_action(&state, action).await;
        action_results.push(result);
    }

    // Snapshot audit trail size.
    let audit_entries = state.policy_engine.lock().audit_trail.last_n(10).len();

    Ok(Json(TriggerResponse {
        trigger_type: req.trigger_type,
        actions_produced: actions.len(),
        actions: action_results,
        audit_entries,
    }))
}

/// GET /v1/policies — List all registered policies.
async fn list_policies(
    State(state): State<AppState>,
) -> Result<Json<Vec<serde_json::Value>>, AppError> {
    let engine = state.policy_engine.lock();

    let policies: Vec<serde_json::Value> = engine
        .list_policies()
        .iter()
        .map(|p| {
            serde_json::json!({
                "policy_id": p.policy_id,
                "trigger_type": p.trigger_type.as_str(),
                "action": p.action.as_str(),
                "priority": p.priority,
                "description": p.description,
            })
        })
        .collect();

    Ok(Json(policies))
}

/// DELETE /v1/policies/:id — Unregister a policy.
async fn delete_policy(
    State(state): State<AppState>,
    Path(policy_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut engine = state.policy_engine.lock();

    let removed = engine.unregister_policy(&policy_id);
    match removed {
        Some(p) => Ok(Json(serde_json::json!({
            "removed": true,
            "policy_id": p.policy_id,
        }))),
        None => Err(AppError::NotFound(format!(
            "policy '{}' not found",
            policy_id
        ))),
    }
}

// ---------------------------------------------------------------------------
// Reactive dispatch
// ---------------------------------------------------------------------------

/// Dispatch a scheduled action to the appropriate domain operation.
///
/// For this release, only `Halt` and `Resume` are wired to corridor
/// transitions. All other actions are recorded as "scheduled" pending
/// future executors.
async fn dispatch_action(state: &AppState, action: &ScheduledAction) -> ActionResult {
    match action.action {
        PolicyAction::Halt => {
            dispatch_corridor_transition(state, action, DynCorridorState::Halted).await
        }
        PolicyAction::Resume => {
            dispatch_corridor_transition(state, action, DynCorridorState::Active).await
        }
        _ => {
            // Action type has no executor yet. Record as scheduled.
            ActionResult {
                action_id: action.action_id.clone(),
                action_type: action.action.as_str().to_string(),
                status: ActionStatus::Scheduled,
                detail: Some(format!(
                    "action '{}' recorded but no executor wired yet",
                    action.action.as_str()
                )),
                affected_resource: None,
            }
        }
    }
}

/// Attempt to transition a corridor based on a policy action.
///
/// Parses the `asset_id` as a corridor UUID, looks up the corridor,
/// validates the transition via the typestate machine, and applies it.
async fn dispatch_corridor_transition(
    state: &AppState,
    action: &ScheduledAction,
    target: DynCorridorState,
) -> ActionResult {
    // Parse asset_id as corridor UUID.
    let corridor_id = match uuid::Uuid::parse_str(&action.asset_id) {
        Ok(id) => id,
        Err(_) => {
            return ActionResult {
                action_id: action.action_id.clone(),
                action_type: action.action.as_str().to_string(),
                status: ActionStatus::Skipped,
                detail: Some(format!(
                    "asset_id '{}' is not a valid corridor UUID",
                    action.asset_id
                )),
                affected_resource: None,
            };
        }
    };

    // Look up the corridor.
    let corridor = match state.corridors.get(&corridor_id) {
        Some(c) => c,
        None => {
            return ActionResult {
                action_id: action.action_id.clone(),
                action_type: action.action.as_str().to_string(),
                status: ActionStatus::Skipped,
                detail: Some(format!("corridor {} not found", corridor_id)),
                affected_resource: None,
            };
        }
    };

    // Validate via the typestate machine.
    let valid_targets = corridor.state.valid_transitions();
    if !valid_targets.contains(&target) {
        return ActionResult {
            action_id: action.action_id.clone(),
            action_type: action.action.as_str().to_string(),
            status: ActionStatus::Skipped,
            detail: Some(format!(
                "corridor {} cannot transition from {} to {} (valid: [{}])",
                corridor_id,
                corridor.state.as_str(),
                target.as_str(),
                valid_targets
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
            affected_resource: None,
        };
    }

    // Compute evidence digest from the policy action metadata.
    let evidence_digest = {
        let evidence_data = serde_json::json!({
            "policy_id": action.policy_id,
            "action_id": action.action_id,
            "trigger": "agentic_policy_execution",
        });
        CanonicalBytes::new(&evidence_data)
            .ok()
            .map(|c| sha256_digest(&c))
    };

    // Build the transition record.
    let now = Utc::now();
    let record = TransitionRecord {
        from_state: corridor.state,
        to_state: target,
        timestamp: now,
        evidence_digest,
    };

    // Apply the transition.
    let updated = state.corridors.update(&corridor_id, |c| {
        c.state = target;
        c.transition_log.push(record.clone());
        c.updated_at = now;
    });

    match updated {
        Some(_) => ActionResult {
            action_id: action.action_id.clone(),
            action_type: action.action.as_str().to_string(),
            status: ActionStatus::Executed,
            detail: Some(format!(
                "corridor {} transitioned to {}",
                corridor_id,
                target.as_str()
            )),
            affected_resource: Some(corridor_id.to_string()),
        },
        None => ActionResult {
            action_id: action.action_id.clone(),
            action_type: action.action.as_str().to_string(),
            status: ActionStatus::Failed,
            detail: Some(format!(
                "corridor {} disappeared during transition",
                corridor_id
            )),
            affected_resource: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
