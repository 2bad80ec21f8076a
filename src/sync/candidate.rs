///! Candidate signal detection and ranking
///!
///! Identifies potential FT8 signals from sync correlation data.

use super::{SAMPLE_RATE, NFFT1, NSTEP, MAX_LAG, COARSE_LAG};
use super::spectra::{compute_spectra, compute_sync2d};

/// Candidate signal found during coarse sync
///
/// `frequency`/`time_offset` are this implementation's native navigational
/// units (Hz and seconds, matching the FFT front end's continuous frequency
/// axis); `freq_offset`/`score` are the integer bin-index/score fields the
/// data model also names, kept alongside rather than instead of them so
/// every downstream caller (fine sync, extraction, subtraction) that already
/// reads `frequency`/`time_offset` keeps working unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    /// Center frequency in Hz
    pub frequency: f32,
    /// Time offset in seconds from start of 15s window
    pub time_offset: f32,
    /// Sync quality metric (higher is better)
    pub sync_power: f32,
    /// Baseline noise power at this frequency (linear scale, from average spectrum)
    pub baseline_noise: f32,
    /// Integer sync score (`sync_power` scaled and rounded), used for the
    /// tie-break-free total ordering the data model calls for.
    pub score: i32,
    /// Frequency bin index `frequency` was found at (`frequency = freq_offset * df`).
    pub freq_offset: i32,
    /// Frequency oversample sub-bin. This implementation resolves frequency
    /// directly from FFT bin index rather than an explicit `freq_osr`-wide
    /// waterfall tensor, so it is always 0; kept so the field exists for
    /// callers that index against the data model's tuple.
    pub freq_sub: u8,
    /// Time oversample sub-block, for the same reason always 0 here.
    pub time_sub: u8,
}

/// Find candidate signals from sync2d correlation matrix
///
/// Identifies peaks in the 2D sync matrix and ranks them by quality.
///
/// # Arguments
/// * `sync2d` - 2D sync correlation matrix [freq_bin][time_lag]
/// * `ia` - Starting frequency bin index
/// * `ib` - Ending frequency bin index
/// * `sync_min` - Minimum sync power threshold (after normalization)
/// * `max_candidates` - Maximum number of candidates to return
/// * `avg_spectrum` - Average power spectrum (linear scale) for baseline noise lookup
///
/// # Returns
/// Vector of candidates sorted by sync power (descending)
pub fn find_candidates(
    sync2d: &[Vec<f32>],
    ia: usize,
    ib: usize,
    sync_min: f32,
    max_candidates: usize,
    avg_spectrum: &[f32],
) -> Vec<Candidate> {
    let df = SAMPLE_RATE / NFFT1 as f32; // 3.125 Hz
    let tstep = NSTEP as f32 / SAMPLE_RATE; // 0.04 seconds

    let mut candidates = Vec::new();

    // Find peak time lag for each frequency bin
    // Don't apply sync_min threshold yet - we'll normalize first
    for i in ia..=ib {
        // Search within ±COARSE_LAG steps
        let mut best_lag = 0i32;
        let mut best_sync = 0.0f32;

        for lag in -COARSE_LAG..=COARSE_LAG {
            let sync_idx = (lag + MAX_LAG) as usize;
            if sync_idx < sync2d[i].len() {
                let sync_val = sync2d[i][sync_idx];
                if sync_val > best_sync {
                    best_sync = sync_val;
                    best_lag = lag;
                }
            }
        }

        // Also search full range
        let mut best_lag2 = 0i32;
        let mut best_sync2 = 0.0f32;

        for lag in -MAX_LAG..=MAX_LAG {
            let sync_idx = (lag + MAX_LAG) as usize;
            if sync_idx < sync2d[i].len() {
                let sync_val = sync2d[i][sync_idx];
                if sync_val > best_sync2 {
                    best_sync2 = sync_val;
                    best_lag2 = lag;
                }
            }
        }

        // Look up baseline noise at this frequency
        let baseline_noise = if i < avg_spectrum.len() {
            avg_spectrum[i].max(1e-30) // Ensure non-zero
        } else {
            1e-30
        };

        // Add both peaks (will filter by threshold after normalization)
        if best_sync > 0.0 {
            candidates.push(Candidate {
                frequency: i as f32 * df,
                time_offset: (best_lag as f32 - 0.5) * tstep,
                sync_power: best_sync,
                baseline_noise,
                score: 0,
                freq_offset: i as i32,
                freq_sub: 0,
                time_sub: 0,
            });
        }

        if best_lag2 != best_lag && best_sync2 > 0.0 {
            candidates.push(Candidate {
                frequency: i as f32 * df,
                time_offset: (best_lag2 as f32 - 0.5) * tstep,
                sync_power: best_sync2,
                baseline_noise,
                score: 0,
                freq_offset: i as i32,
                freq_sub: 0,
                time_sub: 0,
            });
        }
    }

    // Normalize sync powers to relative scale
    if !candidates.is_empty() {
        // Find 40th percentile for baseline
        let mut sync_values: Vec<f32> = candidates.iter().map(|c| c.sync_power).collect();
        sync_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
        let percentile_idx = (sync_values.len() as f32 * 0.4) as usize;
        let baseline = sync_values[percentile_idx];

        if baseline > 0.0 {
            for cand in &mut candidates {
                cand.sync_power /= baseline;
            }
        }
    }

    // Fix up the integer score now that sync_power has reached its final,
    // normalized value.
    for cand in &mut candidates {
        cand.score = (cand.sync_power * 1000.0).round() as i32;
    }

    // Remove duplicates (within 4 Hz and 40 ms)
    let mut filtered: Vec<Candidate> = Vec::new();
    for cand in &candidates {
        let mut is_dupe = false;
        for existing in &filtered {
            let fdiff = (cand.frequency - existing.frequency).abs();
            let tdiff = (cand.time_offset - existing.time_offset).abs();
            if fdiff < 4.0 && tdiff < 0.04 {
                is_dupe = true;
                break;
            }
        }
        if !is_dupe && cand.sync_power >= sync_min {
            filtered.push(*cand);
        }
    }

    // Sort by sync power (descending); ties broken by earlier time offset,
    // then lower frequency offset, per the data model's documented tie-break
    // policy (spec §4.6) rather than leaving collisions in arbitrary order.
    filtered.sort_by(|a, b| {
        b.sync_power
            .partial_cmp(&a.sync_power)
            .unwrap_or(core::cmp::Ordering::Equal)
            .then_with(|| a.time_offset.partial_cmp(&b.time_offset).unwrap_or(core::cmp::Ordering::Equal))
            .then_with(|| a.freq_offset.cmp(&b.freq_offset))
    });

    // Limit to max_candidates
    filtered.truncate(max_candidates);

    filtered
}

/// Remove candidates at the given indices in place, preserving the relative
/// order of the remaining entries (spec §4.6). Used by the slot orchestrator
/// to drop candidates that have already produced a decode, or converged to a
/// CRC-invalid codeword, so later decode passes over the same slot skip them.
///
/// Rust's `Vec` already carries its own length, so unlike the spec's C-style
/// `delete_candidates(indices, list, &n)` this takes just the list and the
/// indices to drop.
pub fn delete_candidates(list: &mut Vec<Candidate>, indices: &[usize]) {
    if indices.is_empty() {
        return;
    }
    let to_remove: std::collections::HashSet<usize> = indices.iter().copied().collect();
    let mut idx = 0usize;
    list.retain(|_| {
        let keep = !to_remove.contains(&idx);
        idx += 1;
        keep
    });
}

/// Perform coarse synchronization on FT8 signal
///
/// This is the main entry point for signal detection. It:
/// 1. Computes power spectra
/// 2. Correlates against Costas arrays
/// 3. Finds and ranks candidate signals
///
/// # Arguments
/// * `signal` - Input signal (15 seconds at 12 kHz)
/// * `freq_min` - Minimum search frequency in Hz (typically 100)
/// * `freq_max` - Maximum search frequency in Hz (typically 3000)
/// * `sync_min` - Minimum sync threshold (typically 1.3)
/// * `max_candidates` - Maximum candidates to return (typically 100)
///
/// # Returns
/// Vector of candidate signals sorted by quality
pub fn coarse_sync(
    signal: &[f32],
    freq_min: f32,
    freq_max: f32,
    sync_min: f32,
    max_candidates: usize,
) -> Result<Vec<Candidate>, String> {
    // Allocate spectra buffer
    let mut spectra = vec![[0.0f32; super::NHSYM]; super::NH1];

    // Compute power spectra and get average spectrum
    let avg_spectrum = compute_spectra(signal, &mut spectra)?;

    // Compute baseline noise spectrum using WSJT-X polynomial fitting algorithm
    let baseline_db = super::compute_baseline(&avg_spectrum, freq_min, freq_max);

    // Convert baseline from dB to linear scale using WSJT-X formula:
    // xbase = 10^(0.1*(sbase[bin]-40.0))
    let mut baseline_linear = vec![0.0f32; baseline_db.len()];
    for i in 0..baseline_db.len() {
        baseline_linear[i] = 10.0f32.powf(0.1 * (baseline_db[i] - 40.0));
    }

    // Compute 2D sync correlation
    let mut sync2d = Vec::new();
    let (ia, ib) = compute_sync2d(&spectra, freq_min, freq_max, &mut sync2d)?;

    // Find and rank candidates (pass baseline_linear for noise estimation)
    let candidates = find_candidates(&sync2d, ia, ib, sync_min, max_candidates, &baseline_linear);

    Ok(candidates)
}
