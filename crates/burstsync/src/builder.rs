//! Builds a burst synchronizer

use thiserror::Error;

use crate::syncword::SyncSpec;
use crate::synchronizer::{BurstSynchronizer, ReadMode, SyncMode};

/// Configuration error
///
/// Raised by [`BurstSynchronizerBuilder::build`] before any bit is
/// processed. The per-bit processing path never raises; a
/// synchronizer that builds successfully runs for its lifetime.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The syncword text is neither a binary nor a hexadecimal literal
    #[error("unable to parse syncword \"{0}\" (must be base 2 or 16)")]
    UnparsableSyncword(String),

    /// The syncword does not fit the 64-bit correlation register
    #[error("syncword is {0} bits long (max of 64 bits)")]
    SyncwordTooLong(usize),

    /// An empty access code only makes sense under a strict lock
    #[error("access code must not be empty outside of strict read mode")]
    EmptyAccessCode,

    /// The burst cannot hold both of its syncwords
    #[error("burst length of {burst_len} is shorter than the syncwords ({syncword_bits} bits)")]
    BurstTooShort { burst_len: u32, syncword_bits: u32 },
}

/// Builds a [`BurstSynchronizer`]
///
/// The only mandatory parameter is the total burst length, in bits.
/// Every other option has a neutral default: no tail syncword, no
/// tolerated bit errors, syncwords kept in the output, and the strict
/// read mode. Note that the default *access code* is empty, which
/// only builds in strict mode; any other read mode requires
/// [`with_access_code()`](Self::with_access_code).
///
/// Configuration is fixed at build time. A built synchronizer cannot
/// be re-tuned; build a new one instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurstSynchronizerBuilder {
    access_code: String,
    tail_sync: String,
    burst_len: u32,
    threshold: u32,
    sync_mode: SyncMode,
    read_mode: ReadMode,
}

impl BurstSynchronizerBuilder {
    /// New builder for bursts of `burst_len` bits
    ///
    /// The burst length counts every bit of the burst, including the
    /// head and tail syncwords.
    pub fn new(burst_len: u32) -> Self {
        Self {
            access_code: String::new(),
            tail_sync: String::new(),
            burst_len,
            threshold: 0,
            sync_mode: SyncMode::Keep,
            read_mode: ReadMode::Strict,
        }
    }

    /// Build a synchronizer
    ///
    /// Parses the syncword texts and checks every configuration
    /// invariant. Once built, the synchronizer is immediately ready
    /// to process bits.
    pub fn build(&self) -> Result<BurstSynchronizer, ConfigError> {
        BurstSynchronizer::try_from(self)
    }

    /// Head syncword marking the start of a burst
    ///
    /// `code` is a binary literal (optionally prefixed `0b`) or a
    /// hexadecimal literal (prefixed `0x`) of at most 64 bits. The
    /// empty string disables head detection, which is only permitted
    /// in [`ReadMode::Strict`].
    pub fn with_access_code(&mut self, code: &str) -> &mut Self {
        self.access_code = code.to_owned();
        self
    }

    /// Tail syncword expected at the end of a burst
    ///
    /// Same text format as the access code. The empty string (the
    /// default) disables tail checking entirely; any burst that
    /// reaches full length is then emitted.
    pub fn with_tail_sync(&mut self, tail: &str) -> &mut Self {
        self.tail_sync = tail.to_owned();
        self
    }

    /// Maximum tolerated bit errors in a syncword match
    ///
    /// Applies to the head and tail checks alike, in both polarities.
    /// When choosing a value, mind the correlation sidelobes of your
    /// syncword: shifted copies of many codes land only a few bit
    /// errors away, and a generous threshold will admit them.
    pub fn with_threshold(&mut self, threshold: u32) -> &mut Self {
        self.threshold = threshold;
        self
    }

    /// Syncword disposition on emission
    pub fn with_sync_mode(&mut self, mode: SyncMode) -> &mut Self {
        self.sync_mode = mode;
        self
    }

    /// Detection and overlap policy
    pub fn with_read_mode(&mut self, mode: ReadMode) -> &mut Self {
        self.read_mode = mode;
        self
    }

    /// Head syncword text
    pub fn access_code(&self) -> &str {
        &self.access_code
    }

    /// Tail syncword text
    pub fn tail_sync(&self) -> &str {
        &self.tail_sync
    }

    /// Total burst length, in bits
    pub fn burst_len(&self) -> u32 {
        self.burst_len
    }

    /// Maximum tolerated bit errors
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Syncword disposition
    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    /// Detection and overlap policy
    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    // Parse both syncword texts and enforce the construction
    // invariants that relate them to the rest of the configuration.
    pub(crate) fn parse_syncwords(&self) -> Result<(SyncSpec, SyncSpec), ConfigError> {
        let access = SyncSpec::parse(&self.access_code)?;
        let tail = SyncSpec::parse(&self.tail_sync)?;

        if access.is_empty() && self.read_mode != ReadMode::Strict {
            return Err(ConfigError::EmptyAccessCode);
        }
        let syncword_bits = access.len() + tail.len();
        if self.burst_len < syncword_bits {
            return Err(ConfigError::BurstTooShort {
                burst_len: self.burst_len,
                syncword_bits,
            });
        }

        Ok((access, tail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_minimal() {
        let uut = BurstSynchronizerBuilder::new(16)
            .with_access_code("0b10110100")
            .build()
            .unwrap();
        assert_eq!(uut.burst_len(), 16);
        assert_eq!(uut.sync_mode(), SyncMode::Keep);
        assert_eq!(uut.read_mode(), ReadMode::Strict);
        assert_eq!(uut.bit_count(), 0);
    }

    #[test]
    fn test_getters_roundtrip() {
        let mut builder = BurstSynchronizerBuilder::new(32);
        builder
            .with_access_code("0xb4")
            .with_tail_sync("0001")
            .with_threshold(1)
            .with_sync_mode(SyncMode::Fix)
            .with_read_mode(ReadMode::Reset);

        assert_eq!(builder.access_code(), "0xb4");
        assert_eq!(builder.tail_sync(), "0001");
        assert_eq!(builder.burst_len(), 32);
        assert_eq!(builder.threshold(), 1);
        assert_eq!(builder.sync_mode(), SyncMode::Fix);
        assert_eq!(builder.read_mode(), ReadMode::Reset);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_empty_access_requires_strict() {
        // strict mode tolerates an empty access code
        assert!(BurstSynchronizerBuilder::new(16).build().is_ok());

        assert_eq!(
            BurstSynchronizerBuilder::new(16)
                .with_read_mode(ReadMode::Permissive)
                .build()
                .unwrap_err(),
            ConfigError::EmptyAccessCode
        );
        assert_eq!(
            BurstSynchronizerBuilder::new(16)
                .with_read_mode(ReadMode::Reset)
                .build()
                .unwrap_err(),
            ConfigError::EmptyAccessCode
        );
    }

    #[test]
    fn test_burst_shorter_than_syncwords() {
        let err = BurstSynchronizerBuilder::new(8)
            .with_access_code("000101001010101")
            .with_tail_sync("0101011100111")
            .with_read_mode(ReadMode::Permissive)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::BurstTooShort {
                burst_len: 8,
                syncword_bits: 28
            }
        );

        // head and tail together may fill the burst exactly
        assert!(BurstSynchronizerBuilder::new(28)
            .with_access_code("000101001010101")
            .with_tail_sync("0101011100111")
            .with_read_mode(ReadMode::Permissive)
            .build()
            .is_ok());
    }

    #[test]
    fn test_unparsable_syncwords() {
        assert!(matches!(
            BurstSynchronizerBuilder::new(8)
                .with_access_code("7")
                .build()
                .unwrap_err(),
            ConfigError::UnparsableSyncword(_)
        ));
        assert!(matches!(
            BurstSynchronizerBuilder::new(8)
                .with_access_code("1010")
                .with_tail_sync("one zero one")
                .build()
                .unwrap_err(),
            ConfigError::UnparsableSyncword(_)
        ));
    }

    #[test]
    fn test_syncword_too_long() {
        let long = "1".repeat(65);
        assert_eq!(
            BurstSynchronizerBuilder::new(128)
                .with_access_code(&long)
                .build()
                .unwrap_err(),
            ConfigError::SyncwordTooLong(65)
        );
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::UnparsableSyncword("7".to_owned());
        assert!(err.to_string().contains("base 2 or 16"));

        let err = ConfigError::BurstTooShort {
            burst_len: 8,
            syncword_bits: 28,
        };
        assert!(err.to_string().contains("shorter than the syncwords"));
    }
}
