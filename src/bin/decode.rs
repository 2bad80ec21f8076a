//! `decode` — thin CLI wrapper around the FT8/FT4 decoder core.
//!
//! ```text
//! decode [-ft4] [-list | -dev DEV | WAVPATH]
//! ```
//!
//! Exit codes: 0 on success, non-zero on an argument error or unreadable
//! input. Live audio-device capture is an external collaborator (spec
//! §1/§6); this binary supports the non-streaming WAV path only and
//! reports `-list`/`-dev` as a configuration error rather than pretending
//! to support them.

use clap::Parser;

use ft8core::audio::BufferedAudioSource;
use ft8core::clock::SystemWallClock;
use ft8core::orchestrator::{OrchestratorConfig, SlotOrchestrator};
use ft8core::protocol::Protocol;

#[derive(Parser, Debug)]
#[command(name = "decode", about = "Decode FT8/FT4 messages from a WAV recording")]
struct Cli {
    /// Decode FT4 (7.5 s slots) instead of FT8 (15 s slots).
    #[arg(long = "ft4")]
    ft4: bool,

    /// List available audio capture devices (not supported by this build).
    #[arg(long = "list")]
    list: bool,

    /// Capture from a live audio device by name (not supported by this build).
    #[arg(long = "dev", value_name = "DEV")]
    dev: Option<String>,

    /// Path to a 15 s (FT8) or 7.5 s (FT4) mono WAV recording.
    wavpath: Option<String>,
}

fn main() {
    ft8core::tracing_init::init_tracing();

    let cli = Cli::parse();

    if cli.list || cli.dev.is_some() {
        eprintln!("live audio-device capture is not supported by this build; pass a WAV file instead");
        std::process::exit(1);
    }

    let Some(path) = cli.wavpath else {
        eprintln!("usage: decode [-ft4] [-list | -dev DEV | WAVPATH]");
        std::process::exit(2);
    };

    let source = match BufferedAudioSource::from_wav(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("failed to read {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let protocol = if cli.ft4 { Protocol::Ft4 } else { Protocol::Ft8 };
    let config = OrchestratorConfig {
        protocol,
        ..OrchestratorConfig::default()
    };

    let mut orchestrator = SlotOrchestrator::new(config);
    let mut source = source;
    let clock = SystemWallClock;

    match orchestrator.process_slot(&mut source, &clock) {
        Ok(records) => {
            for record in records {
                println!("{record}");
            }
        }
        Err(e) => {
            eprintln!("decode failed: {}", e);
            std::process::exit(1);
        }
    }
}
