//! Multi-signal FT8 decoder
//!
//! Implements the complete FT8 decode pipeline for processing recordings with multiple signals.
//! Follows WSJT-X architecture: scans for candidates, decodes each, reports immediately via callback.

use crate::message::CallsignHashCache;
use crate::{crc, ldpc, symbol, sync};
use bitvec::prelude::*;
use rayon::prelude::*;
use std::sync::Arc;

/// LDPC/CRC outcome of a single decode attempt, carrying the hard evidence
/// even when the attempt didn't produce a usable message: the unsatisfied
/// parity count (0 means BP converged) and both CRC values so a caller can
/// tell "never converged" apart from "converged to the wrong codeword".
#[derive(Debug, Clone, Copy)]
pub struct DecodeStatus {
    /// LDPC parity checks still unsatisfied after the BP pass (0 = converged).
    pub ldpc_errors: usize,
    /// CRC-14 recomputed over the decoded 77-bit payload.
    pub crc_calculated: u16,
    /// CRC-14 carried in bits 77..91 of the decoded message.
    pub crc_extracted: u16,
}

impl DecodeStatus {
    fn crc_ok(&self) -> bool {
        self.ldpc_errors == 0 && self.crc_calculated == self.crc_extracted
    }
}

/// A single candidate decode attempt: the LDPC hard decision plus the status
/// describing whether it is trustworthy.
struct CandidateAttempt {
    info_bits: BitVec<u8, Msb0>,
    iterations: usize,
    status: DecodeStatus,
}

/// Extract the 14-bit CRC carried in bits 77..91 of a 91-bit decoded message.
fn extract_crc(decoded: &BitSlice<u8, Msb0>) -> u16 {
    decoded[77..91].load_be::<u16>()
}

/// Run the spec's primary decode path (plain min-sum belief propagation) on a
/// 174-bit LLR vector, per §4.2/§4.8: decode, then check the unsatisfied
/// count and the CRC. Always returns a status, even on failure, so the
/// caller can decide whether a hybrid BP/OSD fallback is worth trying.
fn decode_plain(llr: &[f32], max_iter: usize) -> CandidateAttempt {
    let (info_bits, iterations, ldpc_errors) = ldpc::decode(llr, max_iter);
    let crc_calculated = crc::crc14(&info_bits[..77]);
    let crc_extracted = extract_crc(&info_bits);
    CandidateAttempt {
        info_bits,
        iterations,
        status: DecodeStatus {
            ldpc_errors,
            crc_calculated,
            crc_extracted,
        },
    }
}

/// Decoded FT8 message with metadata
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    /// The decoded message text
    pub message: String,
    /// Frequency in Hz
    pub frequency: f32,
    /// Time offset in seconds
    pub time_offset: f32,
    /// Sync quality metric
    pub sync_power: f32,
    /// SNR estimate (calculated from sync power)
    pub snr_db: i32,
    /// LDPC iterations required for decode
    pub ldpc_iterations: usize,
    /// LLR scaling factor that worked
    pub llr_scale: f32,
    /// Number of symbols used for demodulation (1, 2, or 3)
    pub nsym: usize,
    /// Tone sequence (79 tones, values 0-7) for signal subtraction
    pub tones: [u8; 79],
    /// 77-bit payload packed MSB-first into 10 bytes (zero-padded), the
    /// dedup/hash-table key material described by the message data model.
    pub payload: [u8; 10],
    /// FNV-1a hash of `payload`; two identical payloads always hash equal.
    pub hash: u32,
}

/// FNV-1a (32-bit) over the packed payload bytes, used as the slot dedup key.
fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    bytes.iter().fold(OFFSET_BASIS, |h, &b| (h ^ b as u32).wrapping_mul(PRIME))
}

/// Pack the 77 information bits MSB-first into a 10-byte (80-bit) buffer,
/// zero-padding the trailing 3 bits, and hash the result.
fn pack_payload(info_bits: &BitSlice<u8, Msb0>) -> ([u8; 10], u32) {
    let mut payload = [0u8; 10];
    let mut padded: BitVec<u8, Msb0> = info_bits.iter().collect();
    padded.resize(80, false);
    payload.copy_from_slice(padded.as_raw_slice());
    let hash = fnv1a(&payload);
    (payload, hash)
}

/// Internal struct to track decode results with candidate ordering
#[derive(Debug, Clone)]
struct DecodeResult {
    candidate_idx: usize,
    message: DecodedMessage,
}

/// Configuration for the FT8 decoder
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Minimum frequency to search (Hz)
    pub freq_min: f32,
    /// Maximum frequency to search (Hz)
    pub freq_max: f32,
    /// Minimum sync threshold for candidate detection
    pub sync_threshold: f32,
    /// Maximum number of candidates to try
    pub max_candidates: usize,
    /// Number of candidates to actually decode (top N by sync power)
    pub decode_top_n: usize,
    /// Minimum SNR threshold in dB (rejects weak false positives)
    pub min_snr_db: i32,
    /// Maximum belief-propagation iterations for the plain min-sum decode
    /// path (spec default 25; the orchestrator's "early" pass uses 1).
    /// Threaded straight into [`ldpc::decode`] so callers can trade decode
    /// latency against how much of a chance each candidate gets to converge.
    pub ldpc_max_iter: usize,
    /// Shared callsign hash table used to resolve hashed (non-standard)
    /// callsigns. `None` decodes with hash resolution disabled. The slot
    /// orchestrator owns the table and hands it in by reference across the
    /// slot's lifetime; per-candidate decode only reads it (inserts of
    /// newly-seen callsigns happen after the parallel decode pass, by the
    /// orchestrator, to keep the table single-writer).
    pub hash_cache: Option<Arc<CallsignHashCache>>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            freq_min: 100.0,
            freq_max: 3000.0,
            sync_threshold: 0.5,
            max_candidates: 100,
            decode_top_n: 50, // Increased from 30 to ensure weak signals aren't skipped in busy recordings
            min_snr_db: -18,  // Allow decoding down to -18 dB (WSJT-X typical minimum)
            ldpc_max_iter: 25,
            hash_cache: None,
        }
    }
}

/// Decode all FT8 signals in a recording, calling the callback for each valid message found.
///
/// This follows the WSJT-X pattern: messages are reported immediately as found, not batched.
/// Duplicate messages (same text from same candidate) are automatically filtered.
///
/// The callback can return `false` to stop decoding early (e.g., after finding expected signals).
///
/// # Arguments
///
/// * `signal` - 15-second audio recording at 12 kHz sample rate
/// * `config` - Decoder configuration
/// * `callback` - Called immediately for each decoded message. Returns `true` to continue, `false` to stop.
///
/// # Returns
///
/// Total number of unique messages decoded
pub fn decode_ft8<F>(signal: &[f32], config: &DecoderConfig, mut callback: F) -> Result<usize, &'static str>
where
    F: FnMut(DecodedMessage) -> bool,
{
    // Coarse sync to find candidates
    let candidates = sync::coarse_sync(
        signal,
        config.freq_min,
        config.freq_max,
        config.sync_threshold,
        config.max_candidates,
    ).map_err(|_| "Coarse sync failed")?;

    if candidates.is_empty() {
        return Ok(0);
    }

    // LLR scaling factors to try (optimized order - most common values first)
    // Expanded range to help decode weaker signals
    let scaling_factors = [1.0, 1.5, 0.75, 2.0, 0.5, 1.25, 0.9, 1.1, 1.3, 1.7, 2.5, 3.0, 4.0, 5.0, 0.6, 0.8];
    let nsym_values = [1, 2, 3];

    // Process all candidates in parallel, collecting successful decodes
    let min_snr_threshold = config.min_snr_db;
    let decode_results: Vec<DecodeResult> = candidates
        .iter()
        .take(config.decode_top_n)
        .enumerate()
        .par_bridge()
        .filter_map(|(candidate_idx, candidate)| {
            // Fine sync on this candidate
            let refined = sync::fine_sync(signal, candidate).ok()?;

            // Try multi-pass decoding (different nsym and LLR scales)
            for &nsym in &nsym_values {
                let mut llr = vec![0.0f32; 174];
                let mut s8 = [[0.0f32; 79]; 8];

                // Extract symbols - try the new function with powers first, fall back to old on error
                let extract_ok = if let Ok(()) = sync::extract_symbols_with_powers(signal, &refined, nsym, &mut llr, &mut s8) {
                    true
                } else {
                    // Fall back to original function if new one fails
                    sync::extract_symbols(signal, &refined, nsym, &mut llr).is_ok()
                };

                if !extract_ok {
                    continue;
                }

                for &scale in &scaling_factors {
                    let mut scaled_llr = llr.clone();
                    for v in scaled_llr.iter_mut() {
                        *v *= scale;
                    }

                    // Primary path (spec §4.2/§4.8): plain min-sum BP, run to
                    // `ldpc_max_iter`. Only when it fails to reach a CRC-valid
                    // codeword do we fall back to the hybrid BP/OSD decoder
                    // (30 BP iterations with snapshots, then order-2 OSD) as a
                    // genuine secondary attempt, matching WSJT-X's strategy of
                    // reaching for OSD only once plain BP has given up.
                    let attempt = decode_plain(&scaled_llr, config.ldpc_max_iter);

                    let (decoded_bits, iters) = if attempt.status.crc_ok() {
                        (attempt.info_bits, attempt.iterations)
                    } else if attempt.status.ldpc_errors > 0 {
                        match ldpc::decode_hybrid(&scaled_llr, ldpc::DecodeDepth::BpOsdHybrid) {
                            Some((bits, iters, _hard_errors)) => (bits, iters),
                            None => continue,
                        }
                    } else {
                        // BP converged but to the wrong codeword (CRC mismatch):
                        // per the error-handling design this candidate's
                        // codeword is simply wrong at this scale, not a case
                        // OSD on the same LLRs would be expected to fix.
                        continue;
                    };

                    {
                        // Re-encode the corrected message to get tones for signal subtraction
                        // (following WSJT-X: use LDPC-corrected tones, not original noisy demodulation)
                        let mut re_encoded_codeword = bitvec![u8, Msb0; 0; 174];
                        ldpc::encode(&decoded_bits, &mut re_encoded_codeword);
                        let mut tones = [0u8; 79];
                        if symbol::map(&re_encoded_codeword, &mut tones).is_err() {
                            continue; // Skip if tone mapping fails
                        }

                        let info_bits: BitVec<u8, Msb0> = decoded_bits.iter().take(77).collect();
                        let (payload, hash) = pack_payload(&info_bits);

                        // LDPC converged and CRC matched: this candidate's codeword is
                        // correct even if unpacking the payload into text then fails
                        // (unknown message type, missing callsign-hash entry, ...). Per
                        // the error-handling design, surface that case inline in the
                        // text field rather than silently discarding a good codeword.
                        let message = match crate::decode(&info_bits, config.hash_cache.as_deref()) {
                            Ok(text) if !text.is_empty() => text,
                            Ok(_) => continue,
                            Err(e) => format!("Error [{}] while unpacking!", e),
                        };

                        // Calculate SNR using WSJT-X algorithm if we have s8 powers
                        // Pass baseline noise for improved SNR estimation
                        let snr_db = if s8[0][0] != 0.0 {
                            sync::calculate_snr(&s8, &tones, Some(refined.baseline_noise))
                        } else {
                            // Fallback for old extract_symbols path
                            if refined.sync_power > 0.001 {
                                let snr = (refined.sync_power.log10() * 10.0 - 27.0) as i32;
                                snr.max(-24).min(30)
                            } else {
                                -24
                            }
                        };

                        // Filter out weak decodes that are likely false positives
                        if snr_db < min_snr_threshold {
                            continue; // Skip this decode, try next nsym/scale combination
                        }

                        // Return the first successful decode for this candidate
                        return Some(DecodeResult {
                            candidate_idx,
                            message: DecodedMessage {
                                message,
                                frequency: refined.frequency,
                                time_offset: refined.time_offset,
                                sync_power: refined.sync_power,
                                snr_db,
                                ldpc_iterations: iters,
                                llr_scale: scale,
                                nsym,
                                tones,
                                payload,
                                hash,
                            },
                        });
                    }
                }
            }

            None
        })
        .collect();

    // Sort by candidate index to maintain deterministic ordering
    let mut sorted_results = decode_results;
    sorted_results.sort_by_key(|r| r.candidate_idx);

    // Apply deduplication and call callbacks sequentially
    // Track (message, frequency, time) to detect duplicates
    let mut decoded_signals: Vec<(String, f32, f32)> = Vec::new();
    let mut decode_count = 0;

    for result in sorted_results {
        let message_text = &result.message.message;
        let freq = result.message.frequency;
        let time = result.message.time_offset;

        // Check for duplicate: same message within 10 Hz and 0.5s
        let is_duplicate = decoded_signals.iter().any(|(msg, f, t)| {
            msg == message_text && (freq - f).abs() < 10.0 && (time - t).abs() < 0.5
        });

        if !is_duplicate {
            decoded_signals.push((message_text.clone(), freq, time));
            decode_count += 1;

            // Report immediately via callback
            let should_continue = callback(result.message);

            // Stop decoding if callback returns false
            if !should_continue {
                return Ok(decode_count);
            }
        }
    }

    Ok(decode_count)
}

/// Decode all FT8 signals with multi-pass subtraction (like WSJT-X)
///
/// Performs multiple decode passes, subtracting decoded signals between passes
/// to reveal weaker signals that were masked by stronger ones.
///
/// # Arguments
///
/// * `signal` - 15-second audio recording at 12 kHz sample rate
/// * `config` - Decoder configuration
/// * `max_passes` - Maximum number of decode passes (typically 2-3)
/// * `callback` - Called immediately for each decoded message. Returns `true` to continue, `false` to stop.
///
/// # Returns
///
/// Total number of unique messages decoded across all passes
pub fn decode_ft8_multipass<F>(
    signal: &[f32],
    config: &DecoderConfig,
    max_passes: usize,
    mut callback: F,
) -> Result<usize, &'static str>
where
    F: FnMut(DecodedMessage) -> bool,
{
    let mut working_signal = signal.to_vec();
    let mut total_decodes = 0;
    let mut all_decoded_messages: Vec<String> = Vec::new();

    for pass_num in 0..max_passes {
        tracing::debug!(pass = pass_num + 1, "starting decode pass");

        // Keep same config for all passes to avoid false positives from subtraction artifacts
        // (Lowering sync threshold makes it easier to find spurious peaks in residuals)
        let pass_config = config.clone();

        let mut pass_decodes = Vec::new();

        // Decode signals in current audio
        decode_ft8(&working_signal, &pass_config, |msg| {
            // Only report new messages (deduplication)
            if !all_decoded_messages.contains(&msg.message) {
                all_decoded_messages.push(msg.message.clone());
                pass_decodes.push(msg.clone());

                // Report to user
                let should_continue = callback(msg);
                if !should_continue {
                    return false;
                }
            }
            true
        })?;

        let pass_count = pass_decodes.len();
        total_decodes += pass_count;
        tracing::debug!(pass = pass_num + 1, new_messages = pass_count, "decode pass complete");

        // Stop if no new signals found
        if pass_count == 0 {
            tracing::debug!("no new signals found, stopping multipass loop");
            break;
        }

        // Subtract decoded signals (if not last pass)
        if pass_num < max_passes - 1 {
            tracing::debug!(count = pass_count, "subtracting decoded signals from working buffer");
            for decoded in &pass_decodes {
                if let Err(e) = crate::subtract::subtract_ft8_signal(
                    &mut working_signal,
                    &decoded.tones,
                    decoded.frequency,
                    decoded.time_offset,
                ) {
                    tracing::warn!(error = %e, "signal subtraction failed");
                }
            }
        }
    }

    tracing::debug!(total_decodes, "multipass decode complete");
    Ok(total_decodes)
}
