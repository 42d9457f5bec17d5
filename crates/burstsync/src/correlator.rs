//! Shift-register syncword correlation
//!
//! The [`SyncCorrelator`] keeps a rolling 64-bit register of the most
//! recently received bits and measures the Hamming distance between
//! that register and the head and tail syncword patterns. A head
//! pattern matches in *forward* polarity when the distance is at or
//! below the error threshold, and in *bit-reversed* polarity when the
//! distance is within the threshold of the pattern length, that is,
//! when nearly every bit disagrees. The tail check applies the same rule,
//! but with the polarity fixed by the head match it confirms.

use crate::syncword::SyncSpec;

/// Rolling correlator for the head and tail syncwords
///
/// The register is updated unconditionally for every received bit.
/// Decision points are gated by an arming counter: no head check is
/// meaningful until at least one full head window of bits has been
/// read since the correlator was last re-armed.
#[derive(Clone, Debug)]
pub(crate) struct SyncCorrelator {
    access: SyncSpec,
    tail: SyncSpec,
    threshold: u32,

    // rolling register of received bits, newest in bit 0
    reg: u64,

    // bits read since construction or the last re-arm
    nread: u64,
}

impl SyncCorrelator {
    pub fn new(access: SyncSpec, tail: SyncSpec, threshold: u32) -> Self {
        Self {
            access,
            tail,
            threshold,
            reg: 0,
            nread: 0,
        }
    }

    /// Shift the next bit into the register
    ///
    /// Only the least-significant bit of `bit` is used.
    #[inline]
    pub fn shift(&mut self, bit: u8) {
        self.reg = (self.reg << 1) | u64::from(bit & 0x1);
        self.nread += 1;
    }

    /// True once the register holds a full head window
    #[inline]
    pub fn armed(&self) -> bool {
        self.nread >= u64::from(self.access.len())
    }

    /// Restart the arming window
    ///
    /// The next head check becomes valid only after another full
    /// head window of bits has been shifted in.
    pub fn rearm(&mut self) {
        self.nread = 0;
    }

    /// Check the register against the head pattern
    ///
    /// Returns `Some(reversed)` on a match, where `reversed` reports
    /// whether the pattern matched in bit-complemented form. Both
    /// threshold bounds are inclusive. Callers must consult
    /// [`armed()`](Self::armed) first; this check is meaningless on
    /// a partially-filled window.
    pub fn check_access(&self) -> Option<bool> {
        let nwrong = self.access.distance(self.reg);
        if nwrong <= self.threshold {
            Some(false)
        } else if nwrong >= self.access.len().saturating_sub(self.threshold) {
            Some(true)
        } else {
            None
        }
    }

    /// Check the register against the tail pattern
    ///
    /// `reversed` is the polarity of the head match that opened the
    /// burst under test; the tail must match with the same polarity.
    /// A zero-length tail always passes.
    pub fn check_tail(&self, reversed: bool) -> bool {
        if self.tail.is_empty() {
            return true;
        }
        let nwrong = self.tail.distance(self.reg);
        if reversed {
            nwrong >= self.tail.len().saturating_sub(self.threshold)
        } else {
            nwrong <= self.threshold
        }
    }

    /// Received bits of the head window, oldest first
    ///
    /// These are the bits as received (possibly corrupted, possibly
    /// complemented), not the canonical pattern.
    pub fn access_window(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.access.len())
            .rev()
            .map(move |i| ((self.reg >> i) & 0x1) as u8)
    }

    /// The head syncword specification
    pub fn access(&self) -> &SyncSpec {
        &self.access
    }

    /// The tail syncword specification
    pub fn tail(&self) -> &SyncSpec {
        &self.tail
    }

    /// Reset to zero initial conditions
    pub fn reset(&mut self) {
        self.reg = 0;
        self.nread = 0;
    }
}
