//! State Hashing for Verification
//!
//! Deterministic hashing of board state, used to check that two runs
//! (or a run and its replay) ended in the same state.

use sha2::{Sha256, Digest};
use super::point::Point;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for board state.
///
/// Wraps SHA-256. Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for board state.
    pub fn for_board_state() -> Self {
        Self::new(b"SNAKE_BATTLE_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a grid point.
    #[inline]
    pub fn update_point(&mut self, value: Point) {
        self.update_i32(value.x);
        self.update_i32(value.y);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a UUID (16 bytes).
    #[inline]
    pub fn update_uuid(&mut self, uuid: &[u8; 16]) {
        self.hasher.update(uuid);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for board verification.
///
/// Called by `Board::compute_hash()`; the closure adds board-specific data
/// after the round number.
pub fn compute_state_hash<F>(round: u32, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_board_state();
    hasher.update_u32(round);
    add_state(&mut hasher);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::point::pt;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_board_state();
            hasher.update_u32(100);
            hasher.update_point(pt(3, 4));
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_point(pt(1, 2));
            h.update_point(pt(2, 1));
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_point(pt(2, 1));
            h.update_point(pt(1, 2));
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_compute_state_hash() {
        let hash = compute_state_hash(3, |hasher| hasher.update_bool(true));
        let hash2 = compute_state_hash(3, |hasher| hasher.update_bool(true));
        assert_eq!(hash, hash2);

        let hash3 = compute_state_hash(4, |hasher| hasher.update_bool(true));
        assert_ne!(hash, hash3);
    }
}
