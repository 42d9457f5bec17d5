//! Streaming burst synchronization
//!
//! The [`BurstSynchronizer`] consumes an unpacked bitstream one bit
//! at a time and carves it into fixed-length bursts delimited by a
//! head syncword and, optionally, confirmed by a tail syncword. It
//! tolerates bit errors up to a configured threshold, recognizes
//! bit-complemented ("reversed") transmissions, and can track several
//! overlapping detections at once, all sharing a single output
//! buffer.
//!
//! Construction goes through the
//! [`BurstSynchronizerBuilder`](crate::BurstSynchronizerBuilder).

use std::collections::VecDeque;

#[cfg(not(test))]
use log::{debug, info};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as info;

use crate::builder::BurstSynchronizerBuilder;
use crate::burst::Burst;
use crate::correlator::SyncCorrelator;

/// Syncword disposition applied to emitted bursts
///
/// Selected once at construction time. Controls what happens to the
/// head and tail syncword regions of a burst when it is emitted.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum SyncMode {
    /// Emit the burst bits unmodified
    #[strum(serialize = "keep")]
    Keep,

    /// Overwrite the syncword regions with the canonical patterns
    ///
    /// Bit errors that were within the match threshold are corrected.
    /// The patterns are written with the burst's wire polarity:
    /// bit-complemented for a reversed burst.
    #[strum(serialize = "fix")]
    Fix,

    /// Strip the syncword regions from the output
    #[strum(serialize = "discard")]
    Discard,
}

/// Detection and overlap policy
///
/// Selected once at construction time. Governs how a new head-syncword
/// detection interacts with bursts that are already being read.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ReadMode {
    /// Lock onto one burst at a time
    ///
    /// While a burst is being read, no further detections are
    /// attempted. After a successful burst the correlator re-arms on
    /// a clean window, so back-to-back bursts are picked up without
    /// re-reading the stream. This is the only mode that permits an
    /// empty access code, which degenerates to framing purely by
    /// burst length.
    #[strum(serialize = "strict")]
    Strict,

    /// Track every detection
    ///
    /// Each detection starts its own candidate burst, even while
    /// others are still being read. Overlapping bursts each emit
    /// independently.
    #[strum(serialize = "permissive")]
    Permissive,

    /// Newest detection wins
    ///
    /// A detection discards every burst in progress and starts over
    /// from the new syncword.
    #[strum(serialize = "reset")]
    Reset,
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", <&'static str>::from(*self))
    }
}

impl std::fmt::Display for ReadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", <&'static str>::from(*self))
    }
}

// One detected-but-unfinished burst
//
// Candidates are kept oldest-first. The shared output buffer always
// holds the oldest candidate's bits; younger candidates locate their
// own start by the difference between the burst length and their
// `bits` count.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    // bits consumed since detection, counting the head window
    bits: u32,

    // head matched in bit-complemented form
    reversed: bool,
}

/// Access-code burst synchronizer
///
/// Feed bits with [`input()`](Self::input) or bind an iterator with
/// [`iter()`](Self::iter). Bits are processed strictly in arrival
/// order; a completed, tail-validated burst is returned as soon as
/// its last bit arrives. Since every burst has the same configured
/// length, bursts complete in detection order and at most one can
/// complete per input bit.
///
/// A burst whose tail syncword check fails is dropped silently; the
/// only trace is the [`bursts_dropped()`](Self::bursts_dropped)
/// counter. This is normal protocol behavior, not an error.
///
/// All state is owned by the instance. The synchronizer never blocks
/// and allocates only when the shared output buffer or the candidate
/// list grows, both of which are bounded by the configured burst
/// length.
#[derive(Clone, Debug)]
pub struct BurstSynchronizer {
    correlator: SyncCorrelator,
    burst_len: u32,
    sync_mode: SyncMode,
    read_mode: ReadMode,

    // detection suppression flag, strict mode only
    locked: bool,

    // in-flight candidates, oldest first
    candidates: VecDeque<Candidate>,

    // bits of the oldest candidate, shared by all candidates
    output: Vec<u8>,

    // lifetime count of emitted bursts
    burst_counter: u64,

    // lifetime count of tail-check failures
    dropped_counter: u64,

    // lifetime count of received bits
    bit_counter: u64,
}

impl BurstSynchronizer {
    /// Process one input bit
    ///
    /// Only the least-significant bit of `bit` is used. Returns the
    /// completed [`Burst`] if this bit finished one.
    pub fn input(&mut self, bit: u8) -> Option<Burst> {
        let bit = bit & 0x1;

        // check for the access code if the detector is not locked out
        // and the correlation window has filled since the last re-arm
        if (!self.locked || self.candidates.is_empty()) && self.correlator.armed() {
            match self.correlator.check_access() {
                Some(reversed) => self.start_candidate(reversed),
                None => self.locked = false,
            }
        }

        self.correlator.shift(bit);

        let mut out = None;
        if !self.candidates.is_empty() {
            self.output.push(bit);
            for candidate in self.candidates.iter_mut() {
                candidate.bits += 1;
            }
            let oldest_bits = self.candidates.front().expect("burst in flight").bits;
            if oldest_bits == self.burst_len {
                out = self.finalize_front();
            }
        }

        self.bit_counter += 1;
        out
    }

    /// Synchronize bursts from a source of bits
    ///
    /// Binds an iterator which consumes `input` and yields each
    /// completed [`Burst`]. The iterator returns `None` once the
    /// input is exhausted; the synchronizer keeps its state, so a
    /// later call continues where this one stopped.
    #[must_use = "iterators are lazy and do nothing unless consumed"]
    pub fn iter<'sync, I, T>(&'sync mut self, input: I) -> SourceIter<'sync, T>
    where
        I: IntoIterator<Item = u8> + IntoIterator<IntoIter = T>,
        T: Iterator<Item = u8>,
    {
        SourceIter {
            source: input.into_iter(),
            synchronizer: self,
        }
    }

    /// Total burst length, in bits, including syncwords
    pub fn burst_len(&self) -> u32 {
        self.burst_len
    }

    /// Syncword disposition
    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    /// Detection and overlap policy
    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    /// Lifetime count of received bits
    pub fn bit_count(&self) -> u64 {
        self.bit_counter
    }

    /// Lifetime count of emitted bursts
    pub fn bursts_emitted(&self) -> u64 {
        self.burst_counter
    }

    /// Lifetime count of bursts dropped by the tail syncword check
    pub fn bursts_dropped(&self) -> u64 {
        self.dropped_counter
    }

    /// Number of candidate bursts currently being read
    pub fn candidates_in_flight(&self) -> usize {
        self.candidates.len()
    }

    /// Is detection locked onto a burst?
    ///
    /// Only meaningful in [`ReadMode::Strict`]; the other modes never
    /// set the lock.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Reset to zero initial conditions
    ///
    /// Discards every candidate in progress and zeroes all lifetime
    /// counters, returning the synchronizer to its state as built.
    pub fn reset(&mut self) {
        self.correlator.reset();
        self.candidates.clear();
        self.output.clear();
        self.locked = false;
        self.burst_counter = 0;
        self.dropped_counter = 0;
        self.bit_counter = 0;
    }

    // Open a new candidate burst for a confirmed head match
    //
    // The register still holds the head window: the new bit has not
    // been shifted in yet, so the last `access.len()` received bits
    // are exactly the bits that matched.
    fn start_candidate(&mut self, reversed: bool) {
        match self.read_mode {
            ReadMode::Reset => {
                if !self.candidates.is_empty() {
                    debug!(
                        "sync: discarding {} unfinished bursts for a new detection",
                        self.candidates.len()
                    );
                }
                self.candidates.clear();
                self.output.clear();
            }
            ReadMode::Strict => {
                self.locked = true;
            }
            ReadMode::Permissive => {}
        }

        if self.candidates.is_empty() {
            // only burst in flight: the output buffer starts with the
            // received head window
            self.output.extend(self.correlator.access_window());
        }
        self.candidates.push_back(Candidate {
            bits: self.correlator.access().len(),
            reversed,
        });

        debug!(
            "sync: head match at bit {}, reversed {}, {} in flight",
            self.bit_counter,
            reversed,
            self.candidates.len()
        );
    }

    // The oldest candidate has its full burst length: validate the
    // tail, emit or drop, and re-key the shared buffer to the next
    // candidate.
    fn finalize_front(&mut self) -> Option<Burst> {
        let front = *self.candidates.front().expect("burst in flight");

        let out = if self.correlator.check_tail(front.reversed) {
            let burst = self.publish(front.reversed);
            if self.rearms_after_emission() {
                self.correlator.rearm();
            }
            Some(burst)
        } else {
            info!(
                "sync: tail check failed at bit {}; dropping burst",
                self.bit_counter
            );
            self.dropped_counter += 1;
            self.locked = false;
            None
        };

        self.candidates.pop_front();
        match self.candidates.front() {
            None => self.output.clear(),
            Some(next) => {
                // keep only the bits from the next-oldest candidate's
                // own start point onward
                let excess = (self.burst_len - next.bits) as usize;
                self.output.drain(..excess);
            }
        }

        out
    }

    // Whether a successful emission restarts the correlation window.
    // Pure function of the read mode and lock state: only a locked
    // strict-mode synchronizer re-arms, so the next head check waits
    // for a full window of fresh bits.
    fn rearms_after_emission(&self) -> bool {
        self.read_mode == ReadMode::Strict && self.locked
    }

    // Build the emitted burst from the shared output buffer
    fn publish(&mut self, reversed: bool) -> Burst {
        let access_len = self.correlator.access().len() as usize;
        let tail_len = self.correlator.tail().len() as usize;

        // correct a reversed burst to normal polarity
        let mut data: Vec<u8> = if reversed {
            self.output.iter().map(|bit| bit ^ 0x1).collect()
        } else {
            self.output.clone()
        };

        match self.sync_mode {
            SyncMode::Keep => {}
            SyncMode::Discard => {
                data.truncate(data.len() - tail_len);
                data.drain(..access_len);
            }
            SyncMode::Fix => {
                let polarity = u8::from(reversed);
                for (slot, bit) in data.iter_mut().zip(self.correlator.access().bits()) {
                    *slot = bit ^ polarity;
                }
                let tail_start = data.len() - tail_len;
                for (slot, bit) in data[tail_start..]
                    .iter_mut()
                    .zip(self.correlator.tail().bits())
                {
                    *slot = bit ^ polarity;
                }
            }
        }

        let burst = Burst::new(
            data,
            reversed,
            self.burst_counter,
            self.bit_counter + 1 - u64::from(self.burst_len),
        );
        info!(
            "sync: burst {} complete at bit index {}",
            burst.pdu_num(),
            burst.bit_index()
        );
        self.burst_counter += 1;
        burst
    }
}

impl TryFrom<&BurstSynchronizerBuilder> for BurstSynchronizer {
    type Error = crate::builder::ConfigError;

    fn try_from(cfg: &BurstSynchronizerBuilder) -> Result<Self, Self::Error> {
        let (access, tail) = cfg.parse_syncwords()?;
        Ok(Self {
            correlator: SyncCorrelator::new(access, tail, cfg.threshold()),
            burst_len: cfg.burst_len(),
            sync_mode: cfg.sync_mode(),
            read_mode: cfg.read_mode(),
            locked: false,
            candidates: VecDeque::new(),
            output: Vec::with_capacity(cfg.burst_len() as usize),
            burst_counter: 0,
            dropped_counter: 0,
            bit_counter: 0,
        })
    }
}

/// Bit source iterator
///
/// Bound to a source of unpacked bits. Calling `next()` consumes bits
/// until the synchronizer completes a [`Burst`], or returns `None`
/// when the source runs dry first.
#[derive(Debug)]
pub struct SourceIter<'sync, I>
where
    I: Iterator<Item = u8>,
{
    source: I,
    synchronizer: &'sync mut BurstSynchronizer,
}

impl<'sync, I> Iterator for SourceIter<'sync, I>
where
    I: Iterator<Item = u8>,
{
    type Item = Burst;

    fn next(&mut self) -> Option<Self::Item> {
        for bit in &mut self.source {
            if let Some(burst) = self.synchronizer.input(bit) {
                return Some(burst);
            }
        }
        None
    }
}
