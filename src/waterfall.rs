//! Byte-quantized time-frequency waterfall accumulator.
//!
//! Mirrors `ftx_waterfall_t` from the original C implementation
//! (`examples/original_source/`, `gdyuldin/ft8_lib`): a flat array of
//! quantized magnitude bytes addressed by `(block, time_sub, bin,
//! freq_sub)`, built up one FFT block at a time as audio streams in, with a
//! fixed capacity and an append-only-then-reset lifecycle per slot (spec
//! §3/§4.5).

use crate::protocol::Protocol;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// `clamp(round(2*(dB+120)), 0, 255)` — 2 dB units per count, offset so
/// -120 dB maps to 0.
fn quantize_db(db: f32) -> u8 {
    (2.0 * (db + 120.0)).round().clamp(0.0, 255.0) as u8
}

/// Inverse of [`quantize_db`]: `value/2 - 120` dB.
fn dequantize_db(value: u8) -> f32 {
    value as f32 / 2.0 - 120.0
}

/// Rolling magnitude tensor: `max_blocks` (capacity), `num_blocks` (used),
/// `freq_osr`/`time_osr` (oversample factors), `num_bins` (covered
/// frequency bins) and `block_stride = num_bins * freq_osr * time_osr`
/// together fix the element at `(block b, sub-block t, bin f, sub-bin s)`
/// at flat index `b*block_stride + t*num_bins*freq_osr + f*freq_osr + s`.
pub struct Waterfall {
    protocol: Protocol,
    time_osr: usize,
    freq_osr: usize,
    min_bin: usize,
    num_bins: usize,
    block_size: usize,
    nfft: usize,
    block_stride: usize,
    max_blocks: usize,
    num_blocks: usize,
    mag: Vec<u8>,
    ring: Vec<f32>,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    max_magnitude: f32,
}

impl Waterfall {
    /// Build a waterfall for `protocol` at `sample_rate` Hz, covering
    /// `[f_min, f_max]` Hz, oversampled `time_osr`/`freq_osr` times in each
    /// axis. Derives `block_size`, `nfft`, `min_bin`, `num_bins` and
    /// `max_blocks` exactly as spec §4.5 describes.
    pub fn new(
        protocol: Protocol,
        sample_rate: f32,
        f_min: f32,
        f_max: f32,
        time_osr: usize,
        freq_osr: usize,
    ) -> Self {
        assert!(time_osr >= 1, "time_osr must be at least 1");
        assert!(freq_osr >= 1, "freq_osr must be at least 1");
        assert!(f_max > f_min, "f_max must exceed f_min");

        let symbol_period = protocol.symbol_period() as f32;
        let symbol_period_samples = (sample_rate * symbol_period).round() as usize;
        let block_size = (symbol_period_samples / time_osr).max(1);
        let nfft = block_size * time_osr * freq_osr;

        let min_bin = (f_min * symbol_period).floor() as usize;
        let num_bins = ((f_max * symbol_period).ceil() as usize).saturating_sub(min_bin).max(1);

        // Small margin beyond one slot's worth of blocks, per spec §4.5.
        let margin = 2 * time_osr;
        let max_blocks = (protocol.slot_period() as f32 / symbol_period as f32).ceil() as usize * time_osr + margin;

        let block_stride = num_bins * freq_osr * time_osr;
        let num_super_blocks = max_blocks.div_ceil(time_osr) + 1;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(nfft);

        // Periodic Hann window over the full nfft-length analysis buffer.
        let window: Vec<f32> = (0..nfft)
            .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / nfft as f32).cos())
            .collect();

        Self {
            protocol,
            time_osr,
            freq_osr,
            min_bin,
            num_bins,
            block_size,
            nfft,
            block_stride,
            max_blocks,
            num_blocks: 0,
            mag: vec![0u8; num_super_blocks * block_stride],
            ring: vec![0.0f32; nfft],
            window,
            fft,
            max_magnitude: f32::MIN,
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn max_blocks(&self) -> usize {
        self.max_blocks
    }

    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn time_osr(&self) -> usize {
        self.time_osr
    }

    pub fn freq_osr(&self) -> usize {
        self.freq_osr
    }

    pub fn block_stride(&self) -> usize {
        self.block_stride
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn nfft(&self) -> usize {
        self.nfft
    }

    /// Running peak of the dequantized magnitude seen so far (reset by
    /// [`Self::reset`]).
    pub fn max_magnitude(&self) -> f32 {
        self.max_magnitude
    }

    /// Feed one new block of `block_size` audio samples: shift the
    /// length-`nfft` analysis buffer left by `block_size`, append the new
    /// block at the tail, window, FFT, quantize to dB and store (spec
    /// §4.5). A no-op once the waterfall is at capacity — callers are
    /// expected to `reset` between slots rather than overflow.
    pub fn process(&mut self, block: &[f32]) {
        assert_eq!(block.len(), self.block_size, "block must be block_size samples");

        if self.num_blocks >= self.max_blocks {
            return;
        }

        self.ring.copy_within(self.block_size.., 0);
        self.ring[self.nfft - self.block_size..].copy_from_slice(block);

        let mut buffer: Vec<Complex<f32>> = self
            .ring
            .iter()
            .zip(self.window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let block_idx = self.num_blocks / self.time_osr;
        let time_sub = self.num_blocks % self.time_osr;
        let base = block_idx * self.block_stride + time_sub * self.num_bins * self.freq_osr;

        for f in 0..self.num_bins {
            for s in 0..self.freq_osr {
                let fft_bin = ((self.min_bin + f) * self.freq_osr + s) % self.nfft;
                let c = buffer[fft_bin];
                let power = (c.re * c.re + c.im * c.im).max(1e-12);
                let db = 10.0 * power.log10();
                let q = quantize_db(db);
                self.mag[base + f * self.freq_osr + s] = q;

                let dbq = dequantize_db(q);
                if dbq > self.max_magnitude {
                    self.max_magnitude = dbq;
                }
            }
        }

        self.num_blocks += 1;
    }

    /// Clear accumulated blocks and the analysis ring buffer (spec §4.5).
    pub fn reset(&mut self) {
        self.num_blocks = 0;
        self.ring.iter_mut().for_each(|s| *s = 0.0);
        self.max_magnitude = f32::MIN;
    }

    /// Typed, bounds-checked accessor for `(block, time_sub, bin,
    /// freq_sub)`, per design note §9's requirement that the waterfall not
    /// be read as a raw buffer with hand-rolled index arithmetic. Returns
    /// `None` if the tuple is out of range or hasn't been written yet.
    pub fn get(&self, block: usize, time_sub: usize, bin: usize, freq_sub: usize) -> Option<u8> {
        if time_sub >= self.time_osr || bin >= self.num_bins || freq_sub >= self.freq_osr {
            return None;
        }
        if block * self.time_osr + time_sub >= self.num_blocks {
            return None;
        }
        let idx = block * self.block_stride + time_sub * self.num_bins * self.freq_osr + bin * self.freq_osr + freq_sub;
        self.mag.get(idx).copied()
    }

    /// Convert a stored quantized byte back to dB (`value/2 - 120`).
    pub fn value_to_db(value: u8) -> f32 {
        dequantize_db(value)
    }
}
