//! Successive interference cancellation between multi-pass decode attempts.
//!
//! Once a candidate has been fully decoded, its waveform is re-synthesized from
//! the LDPC-corrected tone sequence and subtracted from the working audio buffer
//! so weaker, previously-masked signals become visible to the next decode pass.

use crate::sync;

const NMAX: usize = 15 * 12000;

/// Subtract the waveform for a decoded signal from `audio` in place.
///
/// `tones` is the 79-tone sequence re-derived from the corrected codeword (not the
/// raw noisy demodulation), `freq_hz` and `time_offset_s` locate it in the recording.
pub fn subtract_ft8_signal(
    audio: &mut [f32],
    tones: &[u8; 79],
    freq_hz: f32,
    time_offset_s: f32,
) -> Result<(), String> {
    if audio.len() != NMAX {
        return Err(format!("audio buffer must be {} samples, got {}", NMAX, audio.len()));
    }

    let mut cref = vec![(0.0f32, 0.0f32); NMAX];
    let nwave = sync::synthesize_ft8_signal(tones, freq_hz, &mut cref)?;
    sync::subtract_ft8_signal(audio, &cref[..nwave], nwave, time_offset_s, freq_hz)?;
    Ok(())
}
