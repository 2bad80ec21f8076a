//! Slot orchestrator
//!
//! Drives an [`AudioSource`] one slot at a time, feeds the accumulated
//! audio through the multi-signal decoder, deduplicates results against
//! the current slot and emits the formatted output records described by
//! the external-interfaces section of the specification:
//! `HHMMSS SNR TIME_OFFSET_S FREQ_HZ ~ TEXT`.
//!
//! The early-decode scheme (component 10's "streaming pass") is a
//! performance optimization that the design notes say is
//! correctness-equivalent to a single final pass; this implementation
//! takes that option and runs one full pass per slot, keeping the hot
//! path small and easy to reason about without a cargo build to verify it.

use std::sync::Arc;

use snafu::Snafu;

use crate::audio::{AudioError, AudioSource};
use crate::clock::{slot_phase, WallClock};
use crate::decoder::{decode_ft8_multipass, DecodedMessage, DecoderConfig};
use crate::message::{is_valid_callsign, CallsignHashCache};
use crate::protocol::Protocol;
use crate::dedup::DedupTable;

#[derive(Debug, Snafu)]
pub enum OrchestratorError {
    #[snafu(display("audio error: {source}"))]
    Audio { source: AudioError },
}

/// Configuration for one [`SlotOrchestrator`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub protocol: Protocol,
    pub sample_rate: u32,
    pub decoder: DecoderConfig,
    /// `cleanup(max_age)` threshold applied to the callsign hash table after
    /// every slot (spec default: 10).
    pub hash_max_age: u8,
    /// Maximum number of passes of signal-subtraction re-decoding per slot.
    pub max_passes: usize,
    /// If true, wait for slot-boundary alignment before reading audio
    /// (live-capture mode); if false, decode whatever is read immediately
    /// (WAV / batch mode).
    pub live: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::Ft8,
            sample_rate: 12_000,
            decoder: DecoderConfig::default(),
            hash_max_age: 10,
            max_passes: 3,
            live: false,
        }
    }
}

/// One decoded-and-emitted line, matching the CLI's stdout record format.
#[derive(Debug, Clone)]
pub struct DecodedRecord {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub snr_db: i32,
    pub time_offset_s: f32,
    pub freq_hz: i32,
    pub text: String,
}

impl std::fmt::Display for DecodedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}{:02}{:02} {:3} {:5.1} {:4} ~ {}",
            self.hour, self.minute, self.second, self.snr_db, self.time_offset_s, self.freq_hz, self.text
        )
    }
}

/// Owns the slot-scoped state: the callsign hash table and the per-slot
/// dedup set. Both have single-writer lifetimes coextensive with the
/// orchestrator (spec §3 Ownership).
pub struct SlotOrchestrator {
    config: OrchestratorConfig,
    hash_cache: Arc<CallsignHashCache>,
    dedup: DedupTable,
}

impl SlotOrchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            hash_cache: Arc::new(CallsignHashCache::new()),
            dedup: DedupTable::new(),
        }
    }

    fn slot_period(&self) -> f64 {
        self.config.protocol.slot_period()
    }

    fn slot_samples(&self) -> usize {
        (self.slot_period() * self.config.sample_rate as f64).round() as usize
    }

    /// Block until the wall clock enters the first quarter of a slot, the
    /// way WSJT-X aligns capture to the UTC slot boundary. Audio arriving
    /// during the wait is the live device's problem, not ours: the source
    /// keeps delivering from whatever position it is at when we next read.
    fn wait_for_slot_start(&self, clock: &dyn WallClock) {
        let period = self.slot_period();
        loop {
            let now = clock.now_realtime();
            let phase = slot_phase(now, period);
            if phase < period / 4.0 {
                return;
            }
            let remaining = period - phase;
            std::thread::sleep(std::time::Duration::from_secs_f64(remaining.min(0.25)));
        }
    }

    /// Process exactly one slot: wait for alignment (if `live`), read one
    /// slot's worth of audio, decode it, dedup against this slot's table,
    /// update the callsign hash table, and return the emitted records.
    pub fn process_slot(
        &mut self,
        audio: &mut dyn AudioSource,
        clock: &dyn WallClock,
    ) -> Result<Vec<DecodedRecord>, OrchestratorError> {
        if self.config.live {
            self.wait_for_slot_start(clock);
        }

        let mut signal = vec![0.0f32; self.slot_samples()];
        audio
            .read(&mut signal)
            .map_err(|source| OrchestratorError::Audio { source })?;

        let now = clock.now_realtime();
        let (hour, minute, second) = clock.gmtime(now);

        let mut decoder_config = self.config.decoder.clone();
        decoder_config.hash_cache = Some(Arc::clone(&self.hash_cache));

        let mut messages: Vec<DecodedMessage> = Vec::new();
        let _ = decode_ft8_multipass(&signal, &decoder_config, self.config.max_passes, |msg| {
            messages.push(msg);
            true
        });

        let mut records = Vec::new();
        let mut newly_seen_callsigns = Vec::new();
        for msg in &messages {
            if !self.dedup.insert(msg.hash, msg.payload) {
                continue; // DUPLICATE: same payload already decoded this slot
            }
            collect_callsigns(&msg.message, &mut newly_seen_callsigns);
            records.push(DecodedRecord {
                hour,
                minute,
                second,
                snr_db: msg.snr_db,
                time_offset_s: msg.time_offset,
                freq_hz: msg.frequency.round() as i32,
                text: msg.message.clone(),
            });
        }

        // Refresh the shared hash table (single writer: the orchestrator,
        // between slots) so future hashed-callsign references resolve.
        if !newly_seen_callsigns.is_empty() {
            let mut cache = (*self.hash_cache).clone();
            for call in newly_seen_callsigns {
                cache.insert(&call);
            }
            self.hash_cache = Arc::new(cache);
        }
        Arc::make_mut(&mut self.hash_cache).cleanup(self.config.hash_max_age);

        self.dedup.clear();

        Ok(records)
    }
}

/// Pull plausible standard callsigns out of a decoded message's text so
/// they can be remembered for later hashed-callsign resolution. Tokens
/// that aren't valid callsigns (grid locators, reports, procedural words)
/// are ignored; `is_valid_callsign` is the same check the encoder uses.
fn collect_callsigns(text: &str, out: &mut Vec<String>) {
    const PROCEDURAL: &[&str] = &["CQ", "DE", "QRZ", "RRR", "RR73", "73"];
    for token in text.split_whitespace() {
        let bare = token.trim_start_matches('<').trim_end_matches('>');
        if PROCEDURAL.contains(&bare) {
            continue;
        }
        if is_valid_callsign(bare) {
            out.push(bare.to_string());
        }
    }
}
