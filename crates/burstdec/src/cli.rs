use clap::Parser;

use burstsync::{ReadMode, SyncMode};

/// Standard input filename
pub const STDIN_FILE: &str = "-";

const USAGE_LONG: &str = r#"
This program accepts a stream of unpacked bits (one byte per bit, with only the least-significant bit inspected) and extracts fixed-length bursts delimited by the given access code. Each extracted burst is printed on its own line.

You can pipe in a bit file directly:

    burstdec --access-code 0b10110100 --burst-len 16 < bits.u8

or frame the output of a demodulator that writes unpacked hard decisions to standard output:

    fsk_demod | burstdec -a 0xb4 -l 256 --tail-sync 0x1d \
        --threshold 2 --sync-mode discard

Each output line carries the burst number, the absolute bit index of the burst's first bit, a polarity marker for bit-reversed transmissions, and the burst bits. Use --quiet to print the bare bit strings only.
"#;

const ADVANCED: &str = "Advanced Synchronizer Options";

/// Top-level program arguments
#[derive(Parser, Clone, Debug)]
#[command(version)]
#[command(about, long_about = None)]
#[command(after_long_help = USAGE_LONG)]
#[command(max_term_width = 100)]
pub struct Args {
    /// Verbosity level (-vvv for more)
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print bare burst bits, without metadata or logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Access code marking the start of a burst
    ///
    /// A binary literal like "10110100" or "0b10110100", or a hex
    /// literal like "0xb4", of at most 64 bits. The empty string
    /// disables detection and frames purely by burst length; this
    /// requires --read-mode strict.
    #[arg(short, long)]
    pub access_code: String,

    /// Total burst length in bits, syncwords included
    #[arg(short = 'l', long)]
    pub burst_len: u32,

    /// Tail syncword expected at the end of each burst
    ///
    /// Same format as the access code. Bursts whose tail does not
    /// match are dropped. The empty string disables tail checking.
    #[arg(short, long, default_value = "")]
    pub tail_sync: String,

    /// Input file (or "-" for stdin)
    ///
    /// The input must be unpacked bits: one byte per bit.
    #[arg(long, default_value_t = STDIN_FILE.to_string())]
    pub file: String,

    /// Maximum syncword bit errors
    #[arg(short = 'e', long, default_value_t = 0)]
    #[arg(help_heading = ADVANCED)]
    pub threshold: u32,

    /// Syncword disposition: keep, fix, or discard
    #[arg(long, default_value = "keep")]
    #[arg(help_heading = ADVANCED)]
    pub sync_mode: SyncMode,

    /// Detection policy: strict, permissive, or reset
    #[arg(long, default_value = "strict")]
    #[arg(help_heading = ADVANCED)]
    pub read_mode: ReadMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_modes() {
        let args = Args::try_parse_from([
            "burstdec",
            "--access-code",
            "0xb4",
            "--burst-len",
            "32",
            "--sync-mode",
            "discard",
            "--read-mode",
            "permissive",
        ])
        .unwrap();
        assert_eq!(args.access_code, "0xb4");
        assert_eq!(args.burst_len, 32);
        assert_eq!(args.sync_mode, SyncMode::Discard);
        assert_eq!(args.read_mode, ReadMode::Permissive);
        assert_eq!(args.file, STDIN_FILE);
    }
}
