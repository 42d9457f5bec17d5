//! # burstsync: syncword burst synchronization
//!
//! This crate carves a continuous, unstructured bitstream into
//! discrete fixed-length bursts ("PDUs") by correlating against a
//! programmable syncword. It detects the access code marking the
//! start of a burst, tolerating a configurable number of bit errors
//! and recognizing bit-complemented transmissions. It optionally
//! confirms a tail syncword at the end of the burst, and emits the
//! finished burst with metadata. Several overlapping detections can
//! be in flight at once, sharing one output buffer.
//!
//! The synchronizer is a synchronous, per-bit state machine: it is
//! fed one bit at a time, never blocks, and performs no I/O. Where
//! the bits come from (a demodulator, a file, a socket) and where
//! finished bursts go is up to the caller.
//!
//! ## Example
//!
//! ```
//! use burstsync::{BurstSynchronizerBuilder, SyncMode};
//!
//! // frame 16-bit bursts that start with the access code 0b10110100
//! let mut sync = BurstSynchronizerBuilder::new(16)
//!     .with_access_code("0b10110100")
//!     .with_sync_mode(SyncMode::Discard)
//!     .build()
//!     .expect("valid configuration");
//!
//! // three bits of noise, then one burst: the access code followed
//! // by eight payload bits
//! let mut bits = vec![1u8, 1, 1];
//! bits.extend_from_slice(&[1, 0, 1, 1, 0, 1, 0, 0]);
//! bits.extend_from_slice(&[1, 0, 1, 1, 0, 1, 0, 0]);
//!
//! let bursts: Vec<_> = sync.iter(bits).collect();
//! assert_eq!(bursts.len(), 1);
//! // discard mode strips the access code from the output
//! assert_eq!(bursts[0].data(), &[1, 0, 1, 1, 0, 1, 0, 0]);
//! assert_eq!(bursts[0].bit_index(), 3);
//! assert!(!bursts[0].bit_reversed());
//! ```
//!
//! Bits are *unpacked*: one `u8` per bit, with only the
//! least-significant bit inspected. Emitted bursts use the same
//! convention. The [`SourceIter`] returned by
//! [`iter()`](BurstSynchronizer::iter) consumes as many input bits
//! as needed to produce the next [`Burst`] and returns `None` when
//! the input runs dry; synchronizer state persists across calls, so
//! streaming input in chunks works naturally.
//!
//! ## Read modes
//!
//! How a new syncword detection interacts with a burst already being
//! read is governed by the [`ReadMode`]:
//!
//! * [`Strict`](ReadMode::Strict) locks onto one burst at a time and
//!   re-arms cleanly after each one, the right choice for
//!   back-to-back framed streams. An empty access code is permitted
//!   here and frames purely by burst length.
//! * [`Permissive`](ReadMode::Permissive) starts a new candidate
//!   burst on every detection, even overlapping ones.
//! * [`Reset`](ReadMode::Reset) restarts on every detection,
//!   discarding any burst in progress.
//!
//! The [`SyncMode`] independently controls whether emitted bursts
//! keep their syncword bits, have them stripped, or have them
//! overwritten with the canonical (error-free) patterns.

mod builder;
mod burst;
mod correlator;
mod synchronizer;
mod syncword;

pub use builder::{BurstSynchronizerBuilder, ConfigError};
pub use burst::Burst;
pub use synchronizer::{BurstSynchronizer, ReadMode, SourceIter, SyncMode};
pub use syncword::SyncSpec;
