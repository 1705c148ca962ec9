//! # Escrow Operations
//!
//! Manages escrow accounts tied to dispute filings, including conditional
//! release, partial release for split decisions, and timeout-based
//! auto-release with configurable deadlines.
//!
//! ## Security Invariant
//!
//! Escrow status transitions are validated at every operation. Terminal
//! statuses (FullyReleased, Forfeited) reject all further operations.
//! Timeout enforcement is checked on every state-changing operation.
//!
//! ## Spec Reference
//!
//! Implements Definition 26.7 (Escrow Management) from the specification.
//! Escrow types, statuses, and release conditions match the Python
//! `tools/arbitration.py` escrow handling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use msez_core::{ContentDigest, Timestamp};

use crate::dispute::DisputeId;
use crate::error::ArbitrationError;

// ── Identifiers ────────────────────────────────────────────────────────

/// A unique identifier for an escrow account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EscrowId(Uuid);

impl EscrowId {
    /// Create a new random escrow identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EscrowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EscrowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "escrow:{}", self.0)
    }
}

// ── Escrow Types ───────────────────────────────────────────────────────

/// Categories of escrow accounts in arbitration.
///
/// Matches the 4 escrow types in Definition 26.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowType {
    /// Arbitration institution filing fee held in escrow.
    FilingFee,
    /// Security for claimant's obligation to prosecute.
    SecurityDeposit,
    /// Funds held pending appeal period expiration.
    AwardEscrow,
    /// Security if either party appeals.
    AppealBond,
}

impl std::fmt::Display for EscrowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FilingFee => "filing_fee",
            Self::SecurityDeposit => "security_deposit",
            Self::AwardEscrow => "award_escrow",
            Self::AppealBond => "appeal_bond",
        };
        write!(f, "{s}")
    }
}

// ── Escrow Status ──────────────────────────────────────────────────────

/// The status of an escrow account.
///
/// Status machine: `Pending → Funded → [PartiallyReleased | FullyReleased | Forfeited]`
///
/// Terminal states: `FullyReleased`, `Forfeited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowStatus {
    /// Escrow created but not yet funded.
    Pending,
    /// Funds have been deposited and are held.
    Funded,
    /// Some funds have been released; balance remains.
    PartiallyReleased,
    /// All funds have been released. Terminal state.
    FullyReleased,
    /// Funds have been forfeited. Terminal state.
    Forfeited,
}

impl EscrowStatus {
    /// Whether this status is terminal (no further operations allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FullyReleased | Self::Forfeited)
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Funded => "FUNDED",
            Self::PartiallyReleased => "PARTIALLY_RELEASED",
            Self::FullyReleased => "FULLY_RELEASED",
            Self::Forfeited => "FORFEITED",
        }
    }
}

impl std::fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Release Conditions ─────────────────────────────────────────────────

/// Types of conditions that trigger escrow release.
///
/// Matches the 5 release condition types in Definition 26.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleaseConditionType {
    /// Award executed, escrow released to beneficiary.
    RulingEnforced,
    /// No appeal filed within deadline.
    AppealPeriodExpired,
    /// Both parties agree to settlement.
    SettlementAgreed,
    /// Claimant withdraws claim.
    DisputeWithdrawn,
    /// Arbitration institution orders release.
    InstitutionOrder,
}

impl std::fmt::Display for ReleaseConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::RulingEnforced => "ruling_enforced",
            Self::AppealPeriodExpired => "appeal_period_expired",
            Self::SettlementAgreed => "settlement_agreed",
            Self::DisputeWithdrawn => "dispute_withdrawn",
            Self::InstitutionOrder => "institution_order",
        };
        write!(f, "{s}")
    }
}

/// A condition that authorizes escrow release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseCondition {
    /// The type of release condition.
    pub condition_type: ReleaseConditionType,
    /// Digest of the evidence supporting this condition.
    pub evidence_digest: ContentDigest,
    /// When the condition was satisfied.
    pub satisfied_at: Timestamp,
}

// ── Escrow Transaction ─────────────────────────────────────────────────

/// Types of escrow transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Initial funding deposit.
    Deposit,
    /// Full release of remaining funds.
    FullRelease,
    /// Partial release of funds.
    PartialRelease,
    /// Forfeiture of funds.
    Forfeit,
    /// Refund to depositor.
    Refund,
}

/// A recorded escrow transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowTransaction {
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Amount involved in the transaction (string for precision).
    pub amount: String,
    /// Currency code (ISO 4217).
    pub currency: String,
    /// When the transaction occurred.
    pub timestamp: DateTime<Utc>,
    /// Digest of the authorization evidence.
    pub evidence_digest: ContentDigest,
}

// ── Escrow Account ─────────────────────────────────────────────────────

/// An escrow account holding funds during dispute proceedings.
///
/// Created via [`EscrowAccount::create`] tied to a dispute filing.
/// Supports deposit, full/partial release, and forfeiture operations.
/// Includes configurable deadline-based timeout enforcement.
///
/// ## Security Invariant
///
/// All operations check the current status and deadline before proceeding.
/// Terminal statuses reject all further operations. Timeout is checked on
/// every state-changing operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowAccount {
    /// Unique escrow account identifier.
    pub id: EscrowId,
    /// The dispute this escrow is tied to.
    pub dispute_id: DisputeId,
    /// Category of escrow.
    pub escrow_type: EscrowType,
    /// Total amount deposited (string for precision).
    pub deposited_amount: String,
    /// Amount currently held (remaining balance).
    pub held_amount: String,
    /// Currency code (ISO 4217).
    pub currency: String,
    /// Current escrow status.
    pub status: EscrowStatus,
    /// Optional deadline for timeout-based auto-release.
    pub deadline: Option<DateTime<Utc>>,
    /// Transaction history.
    pub transactions: Vec<EscrowTransaction>,
    /// When the escrow was created.
    pub created_at: Timestamp,
}

impl EscrowAccount {
    /// Create a new escrow account tied to a dispute.
    ///
    /// The account starts in [`Pending`](EscrowStatus::Pending) status
    /// and must be funded via [`deposit`](EscrowAccount::deposit).
    pub fn create(
        dispute_id: DisputeId,
        escrow_type: EscrowType,
        currency: String,
        deadline: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: EscrowId::new(),
            dispute_id,
            escrow_type,
            deposited_amount: "0".to_string(),
            held_amount: "0".to_string(),
            currency,
            status: EscrowStatus::Pending,
            deadline,
            transactions: Vec::new(),
            created_at: Timestamp::now(),
        }
    }

    /// Deposit funds into the escrow account.
    ///
    /// Transitions Pending → Funded.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::InvalidEscrowOperation`] if not in Pending
    /// status. Returns [`ArbitrationError::EscrowTimeout`] if the deadline
    /// has passed.
    pub fn deposit(
        &mut self,
        amount: String,
        evidence_digest: ContentDigest,
    ) -> Result<(), ArbitrationError> {
        self.check_timeout()?;
        if self.status != EscrowStatus::Pending {
            return Err(ArbitrationError::InvalidEscrowOperation {
                escrow_id: self.id.to_string(),
                operation: "deposit".to_string(),
                status: self.status.as_str().to_string(),
            });
        }
        self.deposited_amount = amount.clone();
        self.held_amount = amount.clone();
        self.status = EscrowStatus::Funded;
        self.transactions.push(EscrowTransaction {
            transaction_type: TransactionType::Deposit,
            amount,
            currency: self.currency.clone(),
            timestamp: Utc::now(),
            evidence_digest,
        });
        Ok(())
    }

    /// Release all remaining funds from escrow.
    ///
    /// Transitions Funded or PartiallyReleased → FullyReleased.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::InvalidEscrowOperation`] if the escrow
    /// is not in a releasable status.
    pub fn full_release(&mut self, condition: ReleaseCondition) -> Result<(), ArbitrationError> {
        self.check_timeout()?;
        if !matches!(
            self.status,
            EscrowStatus::Funded | EscrowStatus::PartiallyReleased
        ) {
            return Err(ArbitrationError::InvalidEscrowOperation {
                escrow_id: self.id.to_string(),
                operation: "full_release".to_string(),
                status: self.status.as_str().to_string(),
            });
        }
        let released_amount = self.held_amount.clone();
        self.held_amount = "0".to_string();
        self.status = EscrowStatus::FullyReleased;
        self.transactions.push(EscrowTransaction {
            transaction_type: TransactionType::FullRelease,
            amount: released_amount,
            currency: self.currency.clone(),
            timestamp: Utc::now(),
            evidence_digest: condition.evidence_digest,
        });
        Ok(())
    }

    /// Release a partial amount from escrow.
    ///
    /// The escrow transitions to PartiallyReleased if balance remains,
    /// or FullyReleased if the entire balance is released.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::InsufficientEscrowBalance`] if the
    /// requested amount exceeds the held balance.
    /// Returns [`ArbitrationError::InvalidEscrowOperation`] if the escrow
    /// is not in a releasable status.
    pub fn partial_release(
        &mut self,
        amount: String,
        condition: ReleaseCondition,
    ) -> Result<(), ArbitrationError> {
        self.check_timeout()?;
        if !matches!(
            self.status,
            EscrowStatus::Funded | EscrowStatus::PartiallyReleased
        ) {
            return Err(ArbitrationError::InvalidEscrowOperation {
                escrow_id: self.id.to_string(),
                operation: "partial_release".to_string(),
                status: self.status.as_str().to_string(),
            });
        }

        let held = parse_amount(&self.held_amount)?;
        let release = parse_amount(&amount)?;
        // Reject non-positive amounts: a zero release would create a spurious
        // PartiallyReleased state, and a negative release would inflate the balance.
        if release <= 0 {
            return Err(ArbitrationError::InvalidAmount(format!(
                "partial release amount must be positive, got {release}"
            )));
        }
        if release > held {
            return Err(ArbitrationError::InsufficientEscrowBalance {
                escrow_id: self.id.to_string(),
                requested: amount,
                remaining: self.held_amount.clone(),
            });
        }

        let remaining = held - release;
        self.held_amount = format_amount(remaining);
        self.status = if remaining == 0 {
            EscrowStatus::FullyReleased
        } else {
            EscrowStatus::PartiallyReleased
        };

        self.transactions.push(EscrowTransaction {
            transaction_type: TransactionType::PartialRelease,
            amount,
            currency: self.currency.clone(),
            timestamp: Utc::now(),
            evidence_digest: condition.evidence_digest,
        });
        Ok(())
    }

    /// Forfeit the escrow funds.
    ///
    /// Transitions Funded or PartiallyReleased → Forfeited.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::InvalidEscrowOperation`] if not in a
    /// forfeitable status.
    pub fn forfeit(&mut self, evidence_digest: ContentDigest) -> Result<(), ArbitrationError> {
        if !matches!(
            self.status,
            EscrowStatus::Funded | EscrowStatus::PartiallyReleased
        ) {
            return Err(ArbitrationError::InvalidEscrowOperation {
                escrow_id: self.id.to_string(),
                operation: "forfeit".to_string(),
                status: self.status.as_str().to_string(),
            });
        }
        let forfeited_amount = self.held_amount.clone();
        self.held_amount = "0".to_string();
        self.status = EscrowStatus::Forfeited;
        self.transactions.push(EscrowTransaction {
            transaction_type: TransactionType::Forfeit,
            amount: forfeited_amount,
            currency: self.currency.clone(),
            timestamp: Utc::now(),
            evidence_digest,
        });
        Ok(())
    }

    /// Check if the escrow has exceeded its deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::EscrowTimeout`] if the deadline has
    /// passed and the escrow is not in a terminal status.
    pub fn check_timeout(&self) -> Result<(), ArbitrationError> {
        if self.status.is_terminal() {
            return Ok(());
        }
        if let Some(deadline) = self.deadline {
            if Utc::now() > deadline {
                return Err(ArbitrationError::EscrowTimeout {
                    escrow_id: self.id.to_string(),
                    deadline: deadline.to_rfc3339(),
                });
            }
        }
        Ok(())
    }

    /// Check whether the deadline has passed (without returning an error).
    pub fn is_timed_out(&self) -> bool {
        if let Some(deadline) = self.deadline {
            Utc::now() > deadline
        } else {
            false
        }
    }
}

/// Parse an amount string to an i64 (in smallest currency units).
///
/// The escrow system operates in smallest currency units (cents/paise).
/// Invalid amount strings are rejected with [`ArbitrationError::InvalidAmount`]
/// rather than silently defaulting to zero, which could mask data corruption
/// or lead to incorrect settlement calculations.
fn parse_amount(s: &str) -> Result<i64, ArbitrationError> {
    s.parse::<i64>()
        .map_err(|_| ArbitrationError::InvalidAmount(s.to_string()))
}

/// Format an i64 amount back to a string.
fn format_amount(n: i64) -> String {
    n.to_string()
}
