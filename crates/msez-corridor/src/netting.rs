//! # Settlement Netting Engine
//!
//! Compresses bilateral and multilateral obligations into net settlement
//! positions, minimizing the number and total value of settlement legs.
//!
//! ## Design
//!
//! The netting engine operates over a set of [`Obligation`]s between
//! [`Party`] pairs. Each obligation has an amount, currency, and corridor
//! reference. The engine computes:
//!
//! 1. **Gross positions** — total payables and receivables per party per currency.
//! 2. **Net positions** — payables offset against receivables.
//! 3. **Settlement legs** — the minimal set of payments to settle all net positions.
//!
//! ## Determinism
//!
//! All computations use deterministic ordering (sorted party IDs, sorted
//! currencies) to ensure byte-level reproducibility across runs. This is
//! critical for settlement plan verification by multiple independent parties.
//!
//! ## Spec Reference
//!
//! Port of `tools/netting.py` `NettingEngine` class (559 lines).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from netting operations.
#[derive(Error, Debug)]
pub enum NettingError {
    /// No obligations to net.
    #[error("no obligations provided")]
    NoObligations,

    /// Obligation amount is non-positive.
    #[error("obligation amount must be positive: got {amount} for {from_party} -> {to_party}")]
    InvalidAmount {
        /// The from party.
        from_party: String,
        /// The to party.
        to_party: String,
        /// The invalid amount.
        amount: i64,
    },

    /// Duplicate obligation detected.
    #[error("duplicate obligation: {from_party} -> {to_party} for {amount} {currency} (corridor: {corridor_id})")]
    DuplicateObligation {
        /// The from party.
        from_party: String,
        /// The to party.
        to_party: String,
        /// The amount.
        amount: i64,
        /// The currency.
        currency: String,
        /// The corridor ID (or "none").
        corridor_id: String,
    },

    /// Netting is infeasible under the given constraints.
    #[error("netting infeasible: {reason}")]
    Infeasible {
        /// Reason for infeasibility.
        reason: String,
    },

    /// Obligation party identifiers are invalid (empty or self-referencing).
    #[error("invalid obligation parties: {reason}")]
    InvalidParties {
        /// Reason for rejection.
        reason: String,
    },

    /// Currency code is invalid (empty).
    #[error("invalid currency code: must be non-empty")]
    InvalidCurrency,

    /// Arithmetic overflow during settlement computation.
    #[error(
        "arithmetic overflow computing settlement totals — obligation amounts exceed i64 range"
    )]
    ArithmeticOverflow,
}

/// A party in the settlement netting system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Party {
    /// Unique party identifier.
    pub id: String,
    /// Human-readable party name.
    pub name: String,
}

/// A currency in the netting system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 currency code (e.g., "USD", "PKR", "AED").
    pub code: String,
    /// Decimal precision for this currency.
    pub precision: u8,
}

/// An obligation between two parties.
///
/// Represents a directed payment obligation: `from_party` owes
/// `amount` in `currency` to `to_party`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    /// The party that owes.
    pub from_party: String,
    /// The party that is owed.
    pub to_party: String,
    /// Amount in the smallest currency unit (e.g., cents for USD).
    pub amount: i64,
    /// Currency code.
    pub currency: String,
    /// Corridor reference (for audit trail).
    pub corridor_id: Option<String>,
    /// Priority (higher = settled first). Default 0.
    pub priority: i32,
}

/// A computed net position for a party in a specific currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetPosition {
    /// Party identifier.
    pub party_id: String,
    /// Currency code.
    pub currency: String,
    /// Total receivable amount.
    pub receivable: i64,
    /// Total payable amount.
    pub payable: i64,
    /// Net amount (receivable - payable). Positive = net receiver.
    pub net: i64,
}

/// A settlement leg — a single payment in the settlement plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementLeg {
    /// Paying party.
    pub from_party: String,
    /// Receiving party.
    pub to_party: String,
    /// Settlement amount.
    pub amount: i64,
    /// Currency code.
    pub currency: String,
}

/// A complete settlement plan produced by the netting engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// The original obligations that were netted.
    pub obligations: Vec<Obligation>,
    /// Computed net positions per party per currency.
    pub net_positions: Vec<NetPosition>,
    /// Settlement legs (minimal payment set).
    pub settlement_legs: Vec<SettlementLeg>,
    /// Total gross obligation amount (sum of all obligation amounts).
    pub gross_total: i64,
    /// Total net settlement amount (sum of all settlement leg amounts).
    pub net_total: i64,
    /// Netting efficiency as a percentage (0.0 to 100.0).
    pub reduction_percentage: f64,
}

/// The settlement netting engine.
///
/// Computes optimal netting of bilateral obligations into minimal
/// settlement legs. Supports multi-currency, multi-party, multi-corridor
/// obligation sets.
///
/// ## Determinism
///
/// All internal operations use BTreeMap/BTreeSet for deterministic
/// ordering. Party IDs and currency codes are sorted lexicographically.
/// Two runs with the same input produce byte-identical output.
///
/// ## Duplicate Detection
///
/// Obligations are deduplicated by (from_party, to_party, amount, currency,
/// corridor_id) to prevent double-settlement. Adding a duplicate obligation
/// returns [`NettingError::DuplicateObligation`].
#[derive(Debug, Default)]
pub struct NettingEngine {
    obligations: Vec<Obligation>,
    /// Tracks seen obligation keys for O(1) duplicate detection.
    seen: BTreeSet<(String, String, i64, String, String)>,
}

impl NettingEngine {
    /// Create a new empty netting engine.
    pub fn new() -> Self {
        Self {
            obligations: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Add an obligation to the netting set.
    ///
    /// Rejects duplicate obligations (same from_party, to_party, amount,
    /// currency, corridor_id) to prevent double-settlement.
    pub fn add_obligation(&mut self, obligation: Obligation) -> Result<(), NettingError> {
        if obligation.amount <= 0 {
            return Err(NettingError::InvalidAmount {
                from_party: obligation.from_party.clone(),
                to_party: obligation.to_party.clone(),
                amount: obligation.amount,
            });
        }

        // BUG-020: Reject self-obligations (from_party == to_party).
        if obligation.from_party == obligation.to_party {
            return Err(NettingError::InvalidParties {
                reason: format!(
                    "from_party and to_party are identical: \"{}\"",
                    obligation.from_party
                ),
            });
        }

        // BUG-021: Reject empty party IDs.
        if obligation.from_party.trim().is_empty() || obligation.to_party.trim().is_empty() {
            return Err(NettingError::InvalidParties {
                reason: "party identifiers must be non-empty".to_string(),
            });
        }

        // BUG-022: Reject empty currency codes.
        if obligation.currency.trim().is_empty() {
            return Err(NettingError::InvalidCurrency);
        }

        let key = (
            obligation.from_party.clone(),
            obligation.to_party.clone(),
            obligation.amount,
            obligation.currency.clone(),
            obligation.corridor_id.clone().unwrap_or_default(),
        );
        if !self.seen.insert(key) {
            return Err(NettingError::DuplicateObligation {
                from_party: obligation.from_party,
                to_party: obligation.to_party,
                amount: obligation.amount,
                currency: obligation.currency,
                corridor_id: obligation.corridor_id.unwrap_or_else(|| "none".to_string()),
            });
        }

        self.obligations.push(obligation);
        Ok(())
    }

    /// Return the number of obligations.
    pub fn obligation_count(&self) -> usize {
        self.obligations.len()
    }

    /// Compute gross positions: total payables and receivables per party per currency.
    pub fn compute_gross_positions(&self) -> BTreeMap<(String, String), (i64, i64)> {
        let mut positions: BTreeMap<(String, String), (i64, i64)> = BTreeMap::new();

        for ob in &self.obligations {
            // from_party: payable increases
            let from_key = (ob.from_party.clone(), ob.currency.clone());
            let from_entry = positions.entry(from_key).or_insert((0, 0));
            from_entry.1 += ob.amount;

            // to_party: receivable increases
            let to_key = (ob.to_party.clone(), ob.currency.clone());
            let to_entry = positions.entry(to_key).or_insert((0, 0));
            to_entry.0 += ob.amount;
        }

        positions
    }

    /// Compute net positions: receivables offset against payables.
    pub fn compute_net_positions(&self) -> Vec<NetPosition> {
        let gross = self.compute_gross_positions();
        gross
            .into_iter()
            .map(
                |((party_id, currency), (receivable, payable))| NetPosition {
                    party_id,
                    currency,
                    receivable,
                    payable,
                    net: receivable - payable,
                },
            )
            .collect()
    }

    /// Generate settlement legs using greedy matching of payers and receivers.
    ///
    /// For each currency, sorts parties into payers (net < 0) and receivers
    /// (net > 0), then greedily matches them to produce minimal settlement legs.
    ///
    /// ## Determinism
    ///
    /// Payers and receivers are sorted by party ID for deterministic output.
    fn generate_settlement_legs(net_positions: &[NetPosition]) -> Vec<SettlementLeg> {
        let mut currencies: BTreeSet<String> = BTreeSet::new();
        for np in net_positions {
            currencies.insert(np.currency.clone());
        }

        let mut legs = Vec::new();

        for currency in &currencies {
            let mut payers: Vec<(String, i64)> = Vec::new();
            let mut receivers: Vec<(String, i64)> = Vec::new();

            for np in net_positions {
                if np.currency != *currency {
                    continue;
                }
                if np.net < 0 {
                    payers.push((np.party_id.clone(), -np.net));
                } else if np.net > 0 {
                    receivers.push((np.party_id.clone(), np.net));
                }
            }

            // Sort for deterministic ordering.
            payers.sort_by(|a, b| a.0.cmp(&b.0));
            receivers.sort_by(|a, b| a.0.cmp(&b.0));

            let mut pi = 0;
            let mut ri = 0;

            while pi < payers.len() && ri < receivers.len() {
                let settle_amount = payers[pi].1.min(receivers[ri].1);
                if settle_amount > 0 {
                    legs.push(SettlementLeg {
                        from_party: payers[pi].0.clone(),
                        to_party: receivers[ri].0.clone(),
                        amount: settle_amount,
                        currency: currency.clone(),
                    });
                }

                payers[pi].1 -= settle_amount;
                receivers[ri].1 -= settle_amount;

                if payers[pi].1 == 0 {
                    pi += 1;
                }
                if ri < receivers.len() && receivers[ri].1 == 0 {
                    ri += 1;
                }
            }
        }

        legs
    }

    /// Compute the complete settlement plan.
    ///
    /// Validates obligations, computes net positions, generates settlement
    /// legs, and calculates netting efficiency metrics.
    pub fn compute_plan(&self) -> Result<SettlementPlan, NettingError> {
        if self.obligations.is_empty() {
            return Err(NettingError::NoObligations);
        }

        let net_positions = self.compute_net_positions();
        let settlement_legs = Self::generate_settlement_legs(&net_positions);

        // BUG-018 fix: use checked arithmetic to prevent silent i64 overflow.
        let gross_total: i64 = self
            .obligations
            .iter()
            .try_fold(0i64, |acc, o| acc.checked_add(o.amount))
            .ok_or(NettingError::ArithmeticOverflow)?;
        let net_total: i64 = settlement_legs
            .iter()
            .try_fold(0i64, |acc, l| acc.checked_add(l.amount))
            .ok_or(NettingError::ArithmeticOverflow)?;

        let reduction_percentage = if gross_total > 0 {
            (1.0 - (net_total as f64 / gross_total as f64)) * 100.0
        } else {
            0.0
        };

        Ok(SettlementPlan {
            obligations: self.obligations.clone(),
            net_positions,
            settlement_legs,
            gross_total,
            net_total,
            reduction_percentage,
        })
    }

    /// Clear all obligations and start fresh.
    pub fn clear(&mut self) {
        self.obligations.clear();
        self.seen.clear();
    }
}
