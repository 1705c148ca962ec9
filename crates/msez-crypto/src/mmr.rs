//! # Merkle Mountain Range (MMR)
//!
//! Port of `tools/mmr.py` — an append-only accumulator that supports compact
//! inclusion proofs for receipts without requiring disclosure of the full
//! receipt set.
//!
//! ## Design Goals
//!
//! - **Deterministic** across Rust and Python implementations.
//! - **Inclusion-proof-friendly** for receipt commitments.
//! - **Cross-language compatible** — produces identical roots and proofs as
//!   the Python `tools/mmr.py` for the same input sequence.
//!
//! ## Hashing (Domain Separation)
//!
//! - Leaf: `SHA256(0x00 || leaf_bytes)` where `leaf_bytes` is the 32-byte
//!   `next_root` digest of a corridor state receipt.
//! - Node: `SHA256(0x01 || left_hash || right_hash)`.
//!
//! ## Spec Reference
//!
//! Implements the receipt chain MMR per `spec/40-corridors.md` and the audit
//! document Part IV (receipt chain + MMR).

use sha2::{Digest, Sha256};

use crate::error::CryptoError;

// ---------------------------------------------------------------------------
// Internal helpers (matching tools/mmr.py)
// ---------------------------------------------------------------------------

/// SHA256 helper returning raw 32 bytes.
fn sha256_raw(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as lowercase hex string.
fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode hex string to bytes. Returns error if invalid.
fn from_hex(s: &str) -> Result<Vec<u8>, CryptoError> {
    let s = s.trim().to_lowercase();
    if s.len() % 2 != 0 {
        return Err(CryptoError::Mmr(format!(
            "hex string has odd length: {}",
            s.len()
        )));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|e| CryptoError::Mmr(format!("invalid hex at position {i}: {e}")))
        })
        .collect()
}

/// Validate that a string is 64 lowercase hex chars (32 bytes).
fn is_hex_32(s: &str) -> bool {
    let s = s.trim();
    if s.len() != 64 {
        return false;
    }
    s.chars().all(|c| c.is_ascii_hexdigit())
}

// ---------------------------------------------------------------------------
// Public hashing functions (matching tools/mmr.py API)
// ---------------------------------------------------------------------------

/// Compute the MMR leaf hash from a 32-byte digest encoded as 64 hex chars.
///
/// Domain separation: `SHA256(0x00 || leaf_bytes)`.
///
/// All leaf data entering the MMR must have been produced through the
/// `CanonicalBytes` -> `ContentDigest` pipeline. The `next_root_hex` parameter
/// is the hex encoding of such a `ContentDigest`.
///
/// Matches `tools/mmr.py:mmr_leaf_hash()`.
pub fn mmr_leaf_hash(next_root_hex: &str) -> Result<String, CryptoError> {
    if !is_hex_32(next_root_hex) {
        return Err(CryptoError::Mmr(
            "next_root_hex must be 64 lowercase hex chars".into(),
        ));
    }
    let leaf_bytes = from_hex(next_root_hex.trim())?;
    let mut input = Vec::with_capacity(1 + 32);
    input.push(0x00);
    input.extend_from_slice(&leaf_bytes);
    Ok(to_hex(&sha256_raw(&input)))
}

/// Compute a parent hash from two child hashes (each 64 hex chars).
///
/// Domain separation: `SHA256(0x01 || left || right)`.
///
/// Matches `tools/mmr.py:mmr_node_hash()`.
pub fn mmr_node_hash(left_hex: &str, right_hex: &str) -> Result<String, CryptoError> {
    if !is_hex_32(left_hex) || !is_hex_32(right_hex) {
        return Err(CryptoError::Mmr(
            "left_hex and right_hex must be 64 hex chars".into(),
        ));
    }
    let left = from_hex(left_hex.trim())?;
    let right = from_hex(right_hex.trim())?;
    let mut input = Vec::with_capacity(1 + 32 + 32);
    input.push(0x01);
    input.extend_from_slice(&left);
    input.extend_from_slice(&right);
    Ok(to_hex(&sha256_raw(&input)))
}

// ---------------------------------------------------------------------------
// Peak
// ---------------------------------------------------------------------------

/// A peak in the MMR — a perfect binary tree at a given height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peak {
    /// Height of the peak (0 = single leaf, 1 = two leaves merged, etc.).
    pub height: usize,
    /// SHA256 hash as 64 lowercase hex chars.
    pub hash: String,
}

// ---------------------------------------------------------------------------
// Core MMR algorithms (matching tools/mmr.py)
// ---------------------------------------------------------------------------

/// Build MMR peaks for a list of leaf hashes (left-to-right append order).
///
/// Matches `tools/mmr.py:build_peaks()`.
pub fn build_peaks(leaf_hashes: &[String]) -> Result<Vec<Peak>, CryptoError> {
    let mut peaks: Vec<(usize, String)> = Vec::new();

    for lh in leaf_hashes {
        if !is_hex_32(lh) {
            return Err(CryptoError::Mmr("leaf_hash must be 64 hex chars".into()));
        }
        let mut cur_h: usize = 0;
        let mut cur = lh.trim().to_lowercase();

        // Merge while the top peak has the same height.
        while let Some(top) = peaks.last() {
            if top.0 != cur_h {
                break;
            }
            let (_, left) = peaks
                .pop()
                .ok_or_else(|| CryptoError::Mmr("peaks unexpectedly empty during merge".into()))?;
            cur = mmr_node_hash(&left, &cur)?;
            cur_h += 1;
        }
        peaks.push((cur_h, cur));
    }

    Ok(peaks
        .into_iter()
        .map(|(h, hash)| Peak { height: h, hash })
        .collect())
}

/// Compute the bagged root from peaks.
///
/// The root is computed by folding peaks from right-to-left using node hash:
/// ```text
/// bag = peaks[-1]
/// for peak in reversed(peaks[:-1]):
///     bag = node_hash(peak, bag)
/// ```
///
/// Matches `tools/mmr.py:bag_peaks()`.
pub fn bag_peaks(peaks: &[Peak]) -> Result<String, CryptoError> {
    if peaks.is_empty() {
        return Ok(String::new());
    }
    // Safe: is_empty() check above guarantees last() returns Some.
    let mut bag = peaks
        .last()
        .ok_or_else(|| CryptoError::Mmr("peaks unexpectedly empty after is_empty check".into()))?
        .hash
        .clone();
    for p in peaks[..peaks.len() - 1].iter().rev() {
        bag = mmr_node_hash(&p.hash, &bag)?;
    }
    Ok(bag)
}

/// Result of computing an MMR root from a sequence of receipt next_root digests.
#[derive(Debug, Clone)]
pub struct MmrRootInfo {
    /// Number of leaves in the MMR.
    pub size: usize,
    /// Bagged root hash (64 hex chars).
    pub root: String,
    /// Peak list.
    pub peaks: Vec<Peak>,
}

/// Compute MMR root and peaks from a sequence of receipt `next_root` digests.
///
/// Matches `tools/mmr.py:mmr_root_from_next_roots()`.
pub fn mmr_root_from_next_roots(next_roots_hex: &[String]) -> Result<MmrRootInfo, CryptoError> {
    let leaf_hashes: Result<Vec<String>, _> =
        next_roots_hex.iter().map(|nr| mmr_leaf_hash(nr)).collect();
    let leaf_hashes = leaf_hashes?;
    let peaks = build_peaks(&leaf_hashes)?;
    let root = bag_peaks(&peaks)?;
    Ok(MmrRootInfo {
        size: leaf_hashes.len(),
        root,
        peaks,
    })
}

// ---------------------------------------------------------------------------
// Peak plan and leaf location (for inclusion proofs)
// ---------------------------------------------------------------------------

/// Return a list of peaks as (height, leaf_count) from left-to-right for a
/// given leaf count.
///
/// Matches `tools/mmr.py:_peak_plan()`.
fn peak_plan(size: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut n = size;
    while n > 0 {
        let h = (usize::BITS - 1 - n.leading_zeros()) as usize;
        let cnt = 1usize << h;
        out.push((h, cnt));
        n -= cnt;
    }
    out
}

/// Return (peak_index, peak_start, peak_height) for a leaf at `leaf_index`
/// in an MMR of given size.
///
/// Matches `tools/mmr.py:_find_peak_for_leaf()`.
fn find_peak_for_leaf(
    size: usize,
    leaf_index: usize,
) -> Result<(usize, usize, usize), CryptoError> {
    if leaf_index >= size {
        return Err(CryptoError::Mmr("leaf_index out of range".into()));
    }
    let plan = peak_plan(size);
    let mut start = 0usize;
    for (i, (h, cnt)) in plan.iter().enumerate() {
        if leaf_index >= start && leaf_index < start + cnt {
            return Ok((i, start, *h));
        }
        start += cnt;
    }
    Err(CryptoError::Mmr("unable to locate peak".into()))
}

// ---------------------------------------------------------------------------
// Merkle path for power-of-two subtree
// ---------------------------------------------------------------------------

/// A single step in a Merkle inclusion proof path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    /// Which side the sibling is on.
    pub side: Side,
    /// Sibling hash (64 hex chars).
    pub hash: String,
}

/// Side indicator for a Merkle proof path step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Sibling is to the left of the current node.
    Left,
    /// Sibling is to the right of the current node.
    Right,
}

impl Side {
    /// String representation matching the Python implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute a Merkle root and sibling path for a power-of-two sized leaf list.
///
/// Matches `tools/mmr.py:merkle_path_for_power_of_two()`.
fn merkle_path_for_power_of_two(
    leaf_hashes: &[String],
    leaf_pos: usize,
) -> Result<(String, Vec<PathStep>), CryptoError> {
    let n = leaf_hashes.len();
    if n == 0 {
        return Err(CryptoError::Mmr("leaf_hashes must be non-empty".into()));
    }
    if n & (n - 1) != 0 {
        return Err(CryptoError::Mmr(
            "leaf_hashes length must be power of two".into(),
        ));
    }
    if leaf_pos >= n {
        return Err(CryptoError::Mmr("leaf_pos out of range".into()));
    }

    let mut level: Vec<String> = leaf_hashes
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    for h in &level {
        if !is_hex_32(h) {
            return Err(CryptoError::Mmr("invalid leaf hash".into()));
        }
    }

    let mut pos = leaf_pos;
    let mut path = Vec::new();

    while level.len() > 1 {
        let sibling_pos = pos ^ 1;
        let sibling_hash = level[sibling_pos].clone();
        let side = if sibling_pos < pos {
            Side::Left
        } else {
            Side::Right
        };
        path.push(PathStep {
            side,
            hash: sibling_hash,
        });

        // Build next level.
        let mut next_level = Vec::with_capacity(level.len() / 2);
        let mut i = 0;
        while i < level.len() {
            next_level.push(mmr_node_hash(&level[i], &level[i + 1])?);
            i += 2;
        }
        level = next_level;
        pos /= 2;
    }

    Ok((level[0].clone(), path))
}

// ---------------------------------------------------------------------------
// Inclusion proof
// ---------------------------------------------------------------------------

/// An inclusion proof for a leaf in the MMR.
///
/// Contains all information needed to independently verify that a receipt
/// with a given `next_root` is included in the MMR at the claimed root.
#[derive(Debug, Clone)]
pub struct MmrInclusionProof {
    /// Total number of leaves in the MMR.
    pub size: usize,
    /// Bagged root hash (64 hex chars).
    pub root: String,
    /// Index of the leaf being proved.
    pub leaf_index: usize,
    /// The receipt's `next_root` digest (64 hex chars).
    pub receipt_next_root: String,
    /// The leaf hash: `SHA256(0x00 || next_root_bytes)`.
    pub leaf_hash: String,
    /// Index of the peak containing this leaf.
    pub peak_index: usize,
    /// Height of the peak containing this leaf.
    pub peak_height: usize,
    /// Sibling path from leaf to peak root.
    pub path: Vec<PathStep>,
    /// All peaks in the MMR.
    pub peaks: Vec<Peak>,
    /// Root of the peak subtree computed from the path.
    pub computed_peak_root: String,
}

/// Build an inclusion proof for `leaf_index` in the MMR built from
/// `next_roots_hex`.
///
/// Matches `tools/mmr.py:build_inclusion_proof()`.
pub fn build_inclusion_proof(
    next_roots_hex: &[String],
    leaf_index: usize,
) -> Result<MmrInclusionProof, CryptoError> {
    let size = next_roots_hex.len();
    if size == 0 {
        return Err(CryptoError::Mmr("cannot build proof for empty MMR".into()));
    }
    if leaf_index >= size {
        return Err(CryptoError::Mmr("leaf_index out of range".into()));
    }

    let leaf_hashes: Result<Vec<String>, _> =
        next_roots_hex.iter().map(|nr| mmr_leaf_hash(nr)).collect();
    let leaf_hashes = leaf_hashes?;
    let peaks = build_peaks(&leaf_hashes)?;
    let root = bag_peaks(&peaks)?;

    let (peak_index, peak_start, peak_height) = find_peak_for_leaf(size, leaf_index)?;
    let peak_leaf_count = 1usize << peak_height;
    let local_pos = leaf_index - peak_start;
    let peak_leaves = &leaf_hashes[peak_start..peak_start + peak_leaf_count];

    let (peak_root, path) = merkle_path_for_power_of_two(peak_leaves, local_pos)?;

    Ok(MmrInclusionProof {
        size,
        root,
        leaf_index,
        receipt_next_root: next_roots_hex[leaf_index].trim().to_lowercase(),
        leaf_hash: leaf_hashes[leaf_index].clone(),
        peak_index,
        peak_height,
        path,
        peaks,
        computed_peak_root: peak_root,
    })
}

/// Verify an inclusion proof.
///
/// Returns `true` if the proof is valid, `false` otherwise.
///
/// Matches `tools/mmr.py:verify_inclusion_proof()`.
pub fn verify_inclusion_proof(proof: &MmrInclusionProof) -> bool {
    if proof.size == 0 || proof.leaf_index >= proof.size {
        return false;
    }
    if !is_hex_32(&proof.receipt_next_root) || !is_hex_32(&proof.root) {
        return false;
    }

    // Verify leaf hash.
    let expected_leaf = match mmr_leaf_hash(&proof.receipt_next_root) {
        Ok(h) => h,
        Err(_) => return false,
    };
    if expected_leaf != proof.leaf_hash {
        return false;
    }

    // Validate peaks.
    if proof.peaks.is_empty() {
        return false;
    }
    for p in &proof.peaks {
        if !is_hex_32(&p.hash) {
            return false;
        }
    }

    if proof.peak_index >= proof.peaks.len() {
        return false;
    }
    if proof.peaks[proof.peak_index].height != proof.peak_height {
        return false;
    }

    // Verify peak selection is consistent with MMR size.
    match find_peak_for_leaf(proof.size, proof.leaf_index) {
        Ok((exp_pi, _, exp_h)) => {
            if exp_pi != proof.peak_index || exp_h != proof.peak_height {
                return false;
            }
        }
        Err(_) => return false,
    }

    // Compute peak root from path.
    let mut cur = proof.leaf_hash.clone();
    for step in &proof.path {
        if !is_hex_32(&step.hash) {
            return false;
        }
        cur = match step.side {
            Side::Left => match mmr_node_hash(&step.hash, &cur) {
                Ok(h) => h,
                Err(_) => return false,
            },
            Side::Right => match mmr_node_hash(&cur, &step.hash) {
                Ok(h) => h,
                Err(_) => return false,
            },
        };
    }

    // Substitute computed peak root and recompute bagged root.
    let mut peaks2 = proof.peaks.clone();
    peaks2[proof.peak_index] = Peak {
        height: proof.peak_height,
        hash: cur,
    };

    match bag_peaks(&peaks2) {
        Ok(computed_root) => computed_root == proof.root,
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Incremental append (matching tools/mmr.py:append_peaks)
// ---------------------------------------------------------------------------

/// Incrementally append leaves to an existing MMR peak set.
///
/// This enables verifiers to start from a checkpoint (peaks) and extend the
/// accumulator with new receipts without replaying the entire history.
///
/// Matches `tools/mmr.py:append_peaks()`.
pub fn append_peaks(
    existing_peaks: &[Peak],
    new_leaf_hashes: &[String],
) -> Result<Vec<Peak>, CryptoError> {
    let mut stack: Vec<(usize, String)> = existing_peaks
        .iter()
        .map(|p| (p.height, p.hash.clone()))
        .collect();

    for leaf in new_leaf_hashes {
        let mut cur_h: usize = 0;
        let mut cur = leaf.clone();
        while let Some(top) = stack.last() {
            if top.0 != cur_h {
                break;
            }
            let (_, left) = stack
                .pop()
                .ok_or_else(|| CryptoError::Mmr("stack unexpectedly empty during merge".into()))?;
            cur = mmr_node_hash(&left, &cur)?;
            cur_h += 1;
        }
        stack.push((cur_h, cur));
    }

    Ok(stack
        .into_iter()
        .map(|(h, hash)| Peak { height: h, hash })
        .collect())
}

// ---------------------------------------------------------------------------
// MerkleMountainRange (stateful wrapper)
// ---------------------------------------------------------------------------

/// A stateful Merkle Mountain Range for append-only receipt chain commitment.
///
/// Wraps the functional API above into a struct that maintains internal state
/// across sequential append operations.
#[derive(Debug, Clone)]
pub struct MerkleMountainRange {
    /// All leaf hashes (in append order).
    leaf_hashes: Vec<String>,
    /// Current peak set.
    peaks: Vec<Peak>,
}

impl MerkleMountainRange {
    /// Create an empty MMR.
    pub fn new() -> Self {
        Self {
            leaf_hashes: Vec::new(),
            peaks: Vec::new(),
        }
    }

    /// Append a receipt `next_root` digest (64 hex chars) to the MMR.
    ///
    /// The leaf hash is computed using domain separation:
    /// `SHA256(0x00 || next_root_bytes)`.
    ///
    /// All leaf data entering the MMR must have been produced through the
    /// `CanonicalBytes` -> `ContentDigest` pipeline. The `next_root_hex` is
    /// the hex encoding of such a `ContentDigest`.
    pub fn append(&mut self, next_root_hex: &str) -> Result<(), CryptoError> {
        let leaf_hash = mmr_leaf_hash(next_root_hex)?;
        self.peaks = append_peaks(&self.peaks, std::slice::from_ref(&leaf_hash))?;
        self.leaf_hashes.push(leaf_hash);
        Ok(())
    }

    /// Return the current number of leaves.
    pub fn size(&self) -> usize {
        self.leaf_hashes.len()
    }

    /// Return the current bagged root hash (64 hex chars).
    ///
    /// Returns empty string if the MMR has no leaves.
    pub fn root(&self) -> Result<String, CryptoError> {
        bag_peaks(&self.peaks)
    }

    /// Return a snapshot of the current peaks.
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }
}

impl Default for MerkleMountainRange {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
