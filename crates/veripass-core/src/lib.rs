#![deny(missing_docs)]

//! # veripass-core — Foundational Types for the Veripass Engine
//!
//! This crate defines the types and constants that every other crate in the
//! workspace depends on. It has no internal crate dependencies, only the
//! external ecosystem (`ark-bn254`, `num-bigint`, `serde`, `thiserror`,
//! `uuid`, `chrono`, `hex`).
//!
//! ## Design Principles
//!
//! 1. **One canonical byte-to-field pipeline.** Every value that crosses the
//!    circuit boundary flows through [`bytes`] (31-byte limb packing, word
//!    splitting) or [`field`] (decimal-string bridge). Independent
//!    re-derivations of these transforms are how cross-implementation
//!    divergence starts, so there is exactly one of each.
//!
//! 2. **Constants live in one place.** Tree depths, padding budgets and the
//!    MRZ attribute table in [`constants`] are mirrored by the circuits and
//!    the on-chain verifier; changing one without the others breaks proof
//!    verification silently.
//!
//! 3. **Structured errors.** `thiserror` enums, no `Box<dyn Error>`, no
//!    `unwrap()` outside tests.

pub mod bytes;
pub mod constants;
pub mod error;
pub mod field;
pub mod scope;

pub use error::CoreError;
pub use field::{field_from_dec, field_to_dec, format_root, FieldElement};
