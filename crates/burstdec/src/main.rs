use std::fs::File;
use std::io::{self, BufReader, Read, Write};

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};

use burstsync::{BurstSynchronizer, BurstSynchronizerBuilder};

mod cli;

use cli::{Args, STDIN_FILE};

fn main() -> anyhow::Result<()> {
    // Parse options and start logging
    let args = Args::parse();
    log_setup(&args);

    // create the synchronizer
    let mut sync = BurstSynchronizerBuilder::new(args.burst_len)
        .with_access_code(&args.access_code)
        .with_tail_sync(&args.tail_sync)
        .with_threshold(args.threshold)
        .with_sync_mode(args.sync_mode)
        .with_read_mode(args.read_mode)
        .build()
        .context("invalid synchronizer configuration")?;

    // file setup: locks stdin in case we need it
    let stdin = io::stdin();
    let inbuf = file_setup(&args, stdin.lock())?;

    run(&mut sync, inbuf, args.quiet)?;

    info!(
        "done: {} bits in, {} bursts out, {} dropped",
        sync.bit_count(),
        sync.bursts_emitted(),
        sync.bursts_dropped()
    );

    Ok(())
}

// Feed every input byte to the synchronizer, printing each burst
fn run<R>(sync: &mut BurstSynchronizer, input: R, quiet: bool) -> anyhow::Result<()>
where
    R: Read,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for byte in input.bytes() {
        let byte = byte.context("error reading input stream")?;
        if let Some(burst) = sync.input(byte) {
            if quiet {
                let line: String = burst.data().iter().map(|b| char::from(b'0' + (b & 0x1))).collect();
                writeln!(out, "{}", line)?;
            } else {
                writeln!(out, "{}", burst)?;
            }
        }
    }

    Ok(())
}

// Open the input file, or fall back to stdin for "-"
fn file_setup(args: &Args, stdin: io::StdinLock<'static>) -> anyhow::Result<Box<dyn Read>> {
    if args.file == STDIN_FILE {
        Ok(Box::new(stdin))
    } else {
        let file = File::open(&args.file)
            .with_context(|| format!("unable to open \"{}\"", args.file))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

fn log_setup(args: &Args) {
    if args.quiet {
        // no logging
        return;
    } else if std::env::var_os("RUST_LOG").is_none() {
        // parameter controls
        let log_filter = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        pretty_env_logger::formatted_builder()
            .filter_module("burstsync", log_filter)
            .filter_module("burstdec", log_filter)
            .init();
    } else {
        // environment controls
        pretty_env_logger::init();
    }
}
