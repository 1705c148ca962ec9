//! # Action Scheduler — MASS Protocol v0.2 Chapter 17
//!
//! Schedules and executes compliance actions with configurable delays,
//! retry semantics, and approval gates.
//!
//! ## Design
//!
//! The scheduler receives `ScheduledAction` directives from the evaluation
//! engine and manages their lifecycle:
//!
//! 1. **Pending** — action is waiting for its `execute_at` time or approval gate.
//! 2. **Executing** — action is being executed.
//! 3. **Completed** — action executed successfully.
//! 4. **Failed** — action execution failed (may retry if retries remain).
//! 5. **Cancelled** — action was cancelled before execution.
//!
//! ## Cron Scheduling
//!
//! Recurring evaluations can be scheduled via `CronSchedule`, which supports
//! common patterns (hourly, daily, weekly, monthly, yearly). The scheduler
//! checks whether a cron schedule should fire based on the current timestamp.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::{AuthorizationRequirement, PolicyAction};

// ---------------------------------------------------------------------------
// ActionStatus
// ---------------------------------------------------------------------------

/// The lifecycle status of a scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Waiting for execution time or approval.
    Pending,
    /// Currently being executed.
    Executing,
    /// Executed successfully.
    Completed,
    /// Execution failed.
    Failed,
    /// Cancelled before execution.
    Cancelled,
}

impl ActionStatus {
    /// Return whether this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Executing => f.write_str("executing"),
            Self::Completed => f.write_str("completed"),
            Self::Failed => f.write_str("failed"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

// ---------------------------------------------------------------------------
// ScheduledAction
// ---------------------------------------------------------------------------

/// A scheduled compliance action produced by the evaluation engine.
///
/// Carries the action to execute, the originating policy, authorization
/// requirements, retry semantics, and deadline constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledAction {
    /// Unique identifier for this scheduled action.
    pub action_id: String,
    /// The asset this action applies to.
    pub asset_id: String,
    /// The action to execute.
    pub action: PolicyAction,
    /// The policy that produced this action.
    pub policy_id: String,
    /// Current lifecycle status.
    pub status: ActionStatus,
    /// Authorization requirement that must be met before execution.
    pub authorization_requirement: AuthorizationRequirement,
    /// When the action was scheduled.
    pub scheduled_at: DateTime<Utc>,
    /// When the action should execute (None = as soon as authorized).
    pub execute_at: Option<DateTime<Utc>>,
    /// Deadline by which the action must complete (None = no deadline).
    pub deadline: Option<DateTime<Utc>>,
    /// Number of retry attempts remaining.
    pub retries_remaining: u32,
    /// Maximum number of retries allowed.
    pub max_retries: u32,
    /// Error message from the last failed attempt (if any).
    pub last_error: Option<String>,
}

impl ScheduledAction {
    /// Create a new scheduled action with default settings.
    pub fn new(
        asset_id: String,
        action: PolicyAction,
        policy_id: String,
        authorization_requirement: AuthorizationRequirement,
    ) -> Self {
        let action_id = uuid::Uuid::new_v4().to_string();
        Self {
            action_id,
            asset_id,
            action,
            policy_id,
            status: ActionStatus::Pending,
            authorization_requirement,
            scheduled_at: Utc::now(),
            execute_at: None,
            deadline: None,
            retries_remaining: 3,
            max_retries: 3,
            last_error: None,
        }
    }

    /// Builder: set the execution time.
    pub fn with_execute_at(mut self, execute_at: DateTime<Utc>) -> Self {
        self.execute_at = Some(execute_at);
        self
    }

    /// Builder: set the deadline.
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder: set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self.retries_remaining = max_retries;
        self
    }

    /// Check whether this action is ready to execute at the given time.
    ///
    /// An action is ready if:
    /// - Status is `Pending`
    /// - `execute_at` is None or in the past
    /// - `deadline` is None or in the future
    pub fn is_ready(&self, now: DateTime<Utc>) -> bool {
        if self.status != ActionStatus::Pending {
            return false;
        }
        if let Some(execute_at) = self.execute_at {
            if now < execute_at {
                return false;
            }
        }
        if let Some(deadline) = self.deadline {
            if now > deadline {
                return false;
            }
        }
        true
    }

    /// Check whether this action has exceeded its deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|d| now > d)
    }

    /// Check whether this action can be retried.
    pub fn can_retry(&self) -> bool {
        self.status == ActionStatus::Failed && self.retries_remaining > 0
    }
}

impl PartialEq for ScheduledAction {
    fn eq(&self, other: &Self) -> bool {
        self.action_id == other.action_id
    }
}

impl Eq for ScheduledAction {}

// ---------------------------------------------------------------------------
// SchedulePattern — cron-like recurring schedules
// ---------------------------------------------------------------------------

/// A schedule pattern for recurring policy evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulePattern {
    /// Every hour at minute 0.
    Hourly,
    /// Every day at midnight UTC.
    Daily,
    /// Every Monday at midnight UTC.
    Weekly,
    /// First day of each month at midnight UTC.
    Monthly,
    /// January 1st at midnight UTC.
    Yearly,
}

// ---------------------------------------------------------------------------
// CronSchedule
// ---------------------------------------------------------------------------

/// A cron-like schedule definition for recurring policy evaluations.
///
/// Supports common patterns via `SchedulePattern`. The `should_fire()` method
/// checks whether the schedule should trigger at a given timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronSchedule {
    /// Unique schedule identifier.
    pub schedule_id: String,
    /// Human-readable description.
    pub description: String,
    /// The recurrence pattern.
    pub pattern: SchedulePattern,
    /// Whether this schedule is currently active.
    pub active: bool,
    /// Last time this schedule fired.
    pub last_fired: Option<DateTime<Utc>>,
}

impl CronSchedule {
    /// Create a new cron schedule.
    pub fn new(
        schedule_id: impl Into<String>,
        description: impl Into<String>,
        pattern: SchedulePattern,
    ) -> Self {
        Self {
            schedule_id: schedule_id.into(),
            description: description.into(),
            pattern,
            active: true,
            last_fired: None,
        }
    }

    /// Check whether this schedule should fire at the given timestamp.
    ///
    /// Returns `true` if:
    /// 1. The schedule is active.
    /// 2. The pattern matches the current time.
    /// 3. The schedule hasn't already fired at this time slot.
    pub fn should_fire(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }

        let pattern_matches = match self.pattern {
            SchedulePattern::Hourly => now.minute() == 0,
            SchedulePattern::Daily => now.hour() == 0 && now.minute() == 0,
            SchedulePattern::Weekly => {
                now.weekday() == chrono::Weekday::Mon && now.hour() == 0 && now.minute() == 0
            }
            SchedulePattern::Monthly => now.day() == 1 && now.hour() == 0 && now.minute() == 0,
            SchedulePattern::Yearly => {
                now.month() == 1 && now.day() == 1 && now.hour() == 0 && now.minute() == 0
            }
        };

        if !pattern_matches {
            return false;
        }

        // Don't fire twice for the same time slot.
        match self.last_fired {
            Some(last) => {
                // Truncate to minutes for comparison.
                let now_slot = now.date_naive().and_hms_opt(now.hour(), now.minute(), 0);
                let last_slot = last.date_naive().and_hms_opt(last.hour(), last.minute(), 0);
                now_slot != last_slot
            }
            None => true,
        }
    }

    /// Record that this schedule fired at the given timestamp.
    pub fn mark_fired(&mut self, at: DateTime<Utc>) {
        self.last_fired = Some(at);
    }
}

// ---------------------------------------------------------------------------
// ActionScheduler
// ---------------------------------------------------------------------------

/// The action scheduler for automated compliance responses.
///
/// Manages the lifecycle of scheduled actions: scheduling, execution,
/// retry, cancellation, and deadline enforcement.
#[derive(Debug)]
pub struct ActionScheduler {
    /// All scheduled actions, keyed by action_id.
    actions: Vec<ScheduledAction>,
    /// Cron schedules for recurring evaluations.
    schedules: Vec<CronSchedule>,
}

impl ActionScheduler {
    /// Create a new empty action scheduler.
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            schedules: Vec::new(),
        }
    }

    /// Schedule an action for execution.
    pub fn schedule(&mut self, action: ScheduledAction) -> String {
        let id = action.action_id.clone();
        self.actions.push(action);
        id
    }

    /// Cancel a scheduled action by ID.
    ///
    /// Returns `true` if the action was found and cancelled, `false` if not
    /// found or already in a terminal state.
    pub fn cancel(&mut self, action_id: &str) -> bool {
        if let Some(action) = self.actions.iter_mut().find(|a| a.action_id == action_id) {
            if !action.status.is_terminal() {
                action.status = ActionStatus::Cancelled;
                return true;
            }
        }
        false
    }

    /// Mark an action as executing.
    pub fn mark_executing(&mut self, action_id: &str) -> bool {
        if let Some(action) = self.actions.iter_mut().find(|a| a.action_id == action_id) {
            if action.status == ActionStatus::Pending {
                action.status = ActionStatus::Executing;
                return true;
            }
        }
        false
    }

    /// Mark an action as completed.
    pub fn mark_completed(&mut self, action_id: &str) -> bool {
        if let Some(action) = self.actions.iter_mut().find(|a| a.action_id == action_id) {
            if action.status == ActionStatus::Executing {
                action.status = ActionStatus::Completed;
                return true;
            }
        }
        false
    }

    /// Mark an action as failed with an error message.
    ///
    /// If retries remain, the action is reset to `Pending` for retry.
    pub fn mark_failed(&mut self, action_id: &str, error: String) -> bool {
        if let Some(action) = self.actions.iter_mut().find(|a| a.action_id == action_id) {
            if action.status == ActionStatus::Executing {
                action.last_error = Some(error);
                if action.retries_remaining > 0 {
                    action.retries_remaining -= 1;
                    action.status = ActionStatus::Pending;
                } else {
                    action.status = ActionStatus::Failed;
                }
                return true;
            }
        }
        false
    }

    /// Return all actions ready to execute at the given time.
    pub fn ready_actions(&self, now: DateTime<Utc>) -> Vec<&ScheduledAction> {
        self.actions.iter().filter(|a| a.is_ready(now)).collect()
    }

    /// Return all actions that have exceeded their deadline.
    pub fn expired_actions(&self, now: DateTime<Utc>) -> Vec<&ScheduledAction> {
        self.actions
            .iter()
            .filter(|a| a.is_expired(now) && !a.status.is_terminal())
            .collect()
    }

    /// Get an action by ID.
    pub fn get_action(&self, action_id: &str) -> Option<&ScheduledAction> {
        self.actions.iter().find(|a| a.action_id == action_id)
    }

    /// Return the count of actions in each status.
    pub fn status_counts(&self) -> std::collections::HashMap<ActionStatus, usize> {
        let mut counts = std::collections::HashMap::new();
        for action in &self.actions {
            *counts.entry(action.status).or_insert(0) += 1;
        }
        counts
    }

    /// Return total number of scheduled actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Add a cron schedule for recurring evaluations.
    pub fn add_schedule(&mut self, schedule: CronSchedule) {
        self.schedules.push(schedule);
    }

    /// Check all cron schedules and return those that should fire now.
    pub fn check_schedules(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let mut fired = Vec::new();
        for schedule in &mut self.schedules {
            if schedule.should_fire(now) {
                fired.push(schedule.schedule_id.clone());
                schedule.mark_fired(now);
            }
        }
        fired
    }

    /// Return all registered cron schedules.
    pub fn schedules(&self) -> &[CronSchedule] {
        &self.schedules
    }
}

impl Default for ActionScheduler {
    fn default() -> Self {
        Self::new()
    }
}
