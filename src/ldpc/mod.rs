//! LDPC (Low-Density Parity Check) Error Correction for FT8
//!
//! This module implements the LDPC(174,91) encoding and decoding used in FT8.
//!
//! **Encoding**: Takes a 91-bit message (77 information bits + 14 CRC bits) and
//! produces a 174-bit codeword by adding 83 parity bits.
//!
//! **Decoding**: Uses belief propagation (sum-product algorithm) to decode
//! received codewords with soft information (LLRs) back to the original message.
//!
//! The encoding uses a generator matrix to compute parity bits through
//! matrix multiplication in GF(2) (binary field).

mod constants;
mod encode;
mod decode;
mod osd;

use bitvec::prelude::*;
use bitvec::vec::BitVec;

pub use encode::encode;
pub use decode::{decode, decode_with_ap, decode_with_snapshots};
pub use osd::osd_decode;

/// How hard the hybrid decoder should work before giving up on a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeDepth {
    /// Belief propagation only, no OSD fallback.
    BpOnly,
    /// BP first; if it fails to converge, fall back to order-2 OSD against
    /// the LLR snapshots saved during BP (WSJT-X's `maxosd=2` strategy).
    BpOsdHybrid,
}

/// Hybrid BP/OSD decode matching WSJT-X's strategy: run belief propagation for
/// up to 30 iterations, saving LLR snapshots at iterations 1, 2 and 3; if BP
/// never reaches a CRC-valid codeword, retry each snapshot (most recent first)
/// through order-2 ordered-statistics decoding.
pub fn decode_hybrid(llr: &[f32], depth: DecodeDepth) -> Option<(BitVec<u8, Msb0>, usize, usize)> {
    match decode::decode_with_snapshots(llr, 30, &[1, 2, 3]) {
        Ok((bits, iters, nharderrors, _snapshots)) => Some((bits, iters, nharderrors)),
        Err(snapshots) => {
            if depth == DecodeDepth::BpOnly {
                return None;
            }
            for snap in snapshots.iter().rev() {
                if let Some(bits) = osd::osd_decode(snap, 2) {
                    return Some((bits, 30, 0));
                }
            }
            osd::osd_decode(llr, 2).map(|bits| (bits, 30, 0))
        }
    }
}
