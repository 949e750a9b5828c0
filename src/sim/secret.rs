//! Secret input sequence detector (sliding window over key codes)

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::SECRET_SEQUENCE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretDetector {
    target: Vec<u32>,
    /// Last `target.len()` codes, oldest first
    buffer: VecDeque<u32>,
}

impl Default for SecretDetector {
    fn default() -> Self {
        Self::new(SECRET_SEQUENCE.to_vec())
    }
}

impl SecretDetector {
    pub fn new(target: Vec<u32>) -> Self {
        let capacity = target.len();
        Self {
            target,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Push a code. Returns true when the window equals the target exactly;
    /// the window is then cleared.
    pub fn push(&mut self, code: u32) -> bool {
        if self.target.is_empty() {
            return false;
        }

        self.buffer.push_back(code);
        if self.buffer.len() > self.target.len() {
            self.buffer.pop_front();
        }

        let unlocked = self.buffer.len() == self.target.len()
            && self.buffer.iter().eq(self.target.iter());
        if unlocked {
            self.buffer.clear();
        }
        unlocked
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn push_all(d: &mut SecretDetector, codes: &[u32]) -> usize {
        codes.iter().filter(|&&c| d.push(c)).count()
    }

    #[test]
    fn test_exact_sequence_unlocks_once() {
        let mut d = SecretDetector::default();
        let mut results = Vec::new();
        for &code in SECRET_SEQUENCE.iter() {
            results.push(d.push(code));
        }
        assert_eq!(results.iter().filter(|&&u| u).count(), 1);
        assert!(*results.last().expect("non-empty"));
        assert_eq!(d.buffered(), 0);
    }

    #[test]
    fn test_sequence_after_noise_unlocks() {
        let mut d = SecretDetector::default();
        let mut codes = vec![13, 38, 38, 99];
        codes.extend_from_slice(&SECRET_SEQUENCE);
        assert_eq!(push_all(&mut d, &codes), 1);
    }

    #[test]
    fn test_overlapping_prefix_unlocks() {
        // An extra leading ↑ shifts the window but the tail still matches
        let mut d = SecretDetector::default();
        let mut codes = vec![38];
        codes.extend_from_slice(&SECRET_SEQUENCE);
        assert_eq!(push_all(&mut d, &codes), 1);
    }

    #[test]
    fn test_substitution_never_unlocks() {
        for i in 0..SECRET_SEQUENCE.len() {
            let mut codes = SECRET_SEQUENCE.to_vec();
            codes[i] = 0;
            let mut d = SecretDetector::default();
            assert_eq!(push_all(&mut d, &codes), 0, "substituted index {}", i);
        }
    }

    #[test]
    fn test_interleaved_codes_never_unlock() {
        let mut codes = Vec::new();
        for &c in SECRET_SEQUENCE.iter() {
            codes.push(c);
            codes.push(32);
        }
        let mut d = SecretDetector::default();
        assert_eq!(push_all(&mut d, &codes), 0);
    }

    #[test]
    fn test_repeat_needs_full_sequence_again() {
        let mut d = SecretDetector::default();
        assert_eq!(push_all(&mut d, &SECRET_SEQUENCE), 1);
        // Tail of the sequence alone is not enough after the reset
        assert_eq!(push_all(&mut d, &SECRET_SEQUENCE[1..]), 0);
        assert_eq!(push_all(&mut d, &SECRET_SEQUENCE), 1);
    }

    #[test]
    fn test_empty_target_never_unlocks() {
        let mut d = SecretDetector::new(Vec::new());
        assert!(!d.push(38));
    }

    proptest! {
        #[test]
        fn prop_window_never_exceeds_target(codes in proptest::collection::vec(0u32..128, 0..64)) {
            let mut d = SecretDetector::default();
            for c in codes {
                d.push(c);
                prop_assert!(d.buffered() <= SECRET_SEQUENCE.len());
            }
        }

        #[test]
        fn prop_unlocks_iff_window_matches(codes in proptest::collection::vec(
            prop_oneof![Just(37u32), Just(38), Just(39), Just(40), Just(65), Just(66)], 0..40)
        ) {
            let mut d = SecretDetector::default();
            let mut window: Vec<u32> = Vec::new();
            for c in codes {
                window.push(c);
                if window.len() > SECRET_SEQUENCE.len() {
                    window.remove(0);
                }
                let expected = window.as_slice() == SECRET_SEQUENCE.as_slice();
                prop_assert_eq!(d.push(c), expected);
                if expected {
                    window.clear();
                }
            }
        }
    }
}
