//! LDPC decoder using belief propagation (sum-product algorithm)

use bitvec::prelude::*;
use bitvec::vec::BitVec;
use crate::crc::crc14_check;
use super::constants::*;

/// Piecewise linear approximation of atanh used by WSJT-X
///
/// This is NOT the mathematical atanh function! WSJT-X uses a piecewise
/// linear approximation that has been tuned for LDPC decoding performance.
/// The approximation differs by 10-40% from mathematical atanh in typical
/// operating ranges, and caps output at ±7.0 for numerical stability.
///
/// The function uses 5 linear segments:
/// - |x| ≤ 0.664: y = x / 0.83
/// - 0.664 < |x| ≤ 0.9217: y = sign(x) * (|x| - 0.4064) / 0.322
/// - 0.9217 < |x| ≤ 0.9951: y = sign(x) * (|x| - 0.8378) / 0.0524
/// - 0.9951 < |x| ≤ 0.9998: y = sign(x) * (|x| - 0.9914) / 0.0012
/// - |x| > 0.9998: y = sign(x) * 7.0
///
/// Reference: wsjtx/lib/platanh.f90
#[inline]
fn platanh(x: f32) -> f32 {
    let isign = if x < 0.0 { -1.0 } else { 1.0 };
    let z = x.abs();

    if z <= 0.664 {
        x / 0.83
    } else if z <= 0.9217 {
        isign * (z - 0.4064) / 0.322
    } else if z <= 0.9951 {
        isign * (z - 0.8378) / 0.0524
    } else if z <= 0.9998 {
        isign * (z - 0.9914) / 0.0012
    } else {
        isign * 7.0
    }
}

/// Decode a 174-bit codeword using LDPC(174,91) belief propagation
///
/// Takes soft information (Log-Likelihood Ratios) for a received 174-bit codeword
/// and attempts to decode it to the original 91-bit message (77 info + 14 CRC bits).
///
/// # Arguments
/// * `llr` - Log-Likelihood Ratios for each of 174 bits
///   - Positive values indicate confidence the bit is 1
///   - Negative values indicate confidence the bit is 0
///   - Magnitude indicates confidence level
/// * `max_iterations` - Maximum number of decoding iterations (typically 20-50)
///
/// # Returns
/// `(message, iterations, unsatisfied_count)` - the hard-decision 91-bit message,
/// the number of BP iterations run, and the number of parity checks still
/// unsatisfied at that point. `unsatisfied_count == 0` means BP converged (the
/// caller still has to check the CRC); a non-zero count means BP gave up at
/// `max_iterations` without finding a valid codeword. The hard decision is
/// always returned, converged or not, so the caller can inspect it.
///
/// The decoder uses the sum-product algorithm (belief propagation) to iteratively
/// refine bit estimates by passing messages between bit nodes and check nodes.
pub fn decode(llr: &[f32], max_iterations: usize) -> (BitVec<u8, Msb0>, usize, usize) {
    decode_with_ap(llr, None, max_iterations)
}

/// LDPC BP decoder with optional AP (a priori) mask
///
/// If `apmask` is provided, bits marked as `true` in the mask will not participate
/// in BP message passing - they remain fixed at their LLR hint values.
///
/// Always returns the hard decision and the final unsatisfied-parity-check
/// count, even when BP does not converge, so the caller can inspect it (see
/// [`decode`]).
pub fn decode_with_ap(
    llr: &[f32],
    apmask: Option<&[bool]>,
    max_iterations: usize
) -> (BitVec<u8, Msb0>, usize, usize) {
    assert_eq!(llr.len(), N, "LLR slice must be {} bits", N);
    if let Some(mask) = apmask {
        assert_eq!(mask.len(), N, "AP mask must be {} bits", N);
    }

    // Compute initial LLR quality metrics for debugging
    let _llr_mean = llr.iter().map(|x| x.abs()).sum::<f32>() / llr.len() as f32;
    let _llr_max = llr.iter().map(|x| x.abs()).max_by(|a, b| a.partial_cmp(b).unwrap()).unwrap_or(0.0);

    // Message arrays
    let mut toc = vec![vec![0.0f32; MAX_NRW]; M]; // Messages to checks
    let mut tov = vec![vec![0.0f32; NCW]; N];     // Messages to variable nodes
    let mut zn = vec![0.0f32; N];                  // Bit log-likelihood estimates

    // Initialize messages to checks with LLRs
    for j in 0..M {
        for i in 0..NRW[j] {
            let bit_idx = NM[j][i];
            toc[j][i] = llr[bit_idx];
        }
    }

    // Hard decision and unsatisfied-check count from the most recent iteration,
    // returned unconditionally if BP never converges.
    let mut last_cw = BitVec::<u8, Msb0>::repeat(false, N);
    let mut last_ncheck = M;
    let mut last_iter = 0usize;

    // Iterative decoding
    for iter in 0..=max_iterations {
        // Update bit log-likelihood ratios
        // CRITICAL: AP-masked bits don't get updated - they stay fixed!
        for i in 0..N {
            if let Some(mask) = apmask {
                if mask[i] {
                    // AP bit: frozen at hint value (no BP update)
                    zn[i] = llr[i];
                } else {
                    // Normal bit: regular BP update
                    zn[i] = llr[i] + tov[i].iter().sum::<f32>();
                }
            } else {
                // No AP mask: all bits get normal BP update
                zn[i] = llr[i] + tov[i].iter().sum::<f32>();
            }
        }

        // Make hard decisions
        let mut cw = BitVec::<u8, Msb0>::repeat(false, N);
        for i in 0..N {
            cw.set(i, zn[i] > 0.0);
        }

        // Check parity constraints
        let mut ncheck = 0;
        for i in 0..M {
            let mut parity = 0u8;
            for j in 0..NRW[i] {
                let bit_idx = NM[i][j];
                if cw[bit_idx] {
                    parity ^= 1;
                }
            }
            if parity != 0 {
                ncheck += 1;
            }
        }

        last_cw = cw.clone();
        last_ncheck = ncheck;
        last_iter = iter;

        // If all parity checks satisfied, check CRC
        if ncheck == 0 {
            let decoded = &cw[..K];
            if crc14_check(decoded) {
                // Success! Return the decoded message and metrics
                // eprintln!("    BP CONVERGED at iteration {} (CRC valid)", iter);
                return (decoded.to_bitvec(), iter, 0);
            } else {
                // eprintln!("    BP iter {}: All parity OK but CRC FAILED", iter);
            }
        }

        // If we've reached max iterations, give up
        if iter == max_iterations {
            // eprintln!("    BP FAILED: max_iters={}, final ncheck={}/83", max_iterations, ncheck);
            break;
        }

        // Send messages from bits to check nodes
        for j in 0..M {
            for i in 0..NRW[j] {
                let bit_idx = NM[j][i];
                toc[j][i] = zn[bit_idx];

                // Subtract off what the bit had received from this check
                for kk in 0..NCW {
                    if MN[bit_idx][kk] == j {
                        toc[j][i] -= tov[bit_idx][kk];
                        break;
                    }
                }
            }
        }

        // Send messages from check nodes to variable nodes
        // This is the core of the sum-product algorithm
        for j in 0..N {
            for i in 0..NCW {
                let check_idx = MN[j][i];

                // Compute product of tanh(-toc/2) for all bits in check except j
                let mut product = 1.0f32;
                for k in 0..NRW[check_idx] {
                    let bit_k = NM[check_idx][k];
                    if bit_k != j {
                        product *= f32::tanh(-toc[check_idx][k] / 2.0);
                    }
                }

                // Apply platanh (WSJT-X's piecewise linear approximation) to get the message
                tov[j][i] = 2.0 * platanh(-product);
            }
        }
    }

    (last_cw[..K].to_bitvec(), last_iter, last_ncheck)
}

/// Decode with LLR snapshots saved at specified iterations
///
/// This is the hybrid BP/OSD decoder strategy used by WSJT-X.
/// During BP iterations, we save LLR states at specific iterations (typically 1, 2, 3).
/// If BP fails to converge, these snapshots can be used with OSD for multiple attempts.
///
/// # Arguments
/// * `llr` - Log-Likelihood Ratios for each of 174 bits
/// * `max_iterations` - Maximum number of BP iterations (typically 30)
/// * `save_at_iters` - Which iterations to save LLR snapshots (e.g., [1, 2, 3])
///
/// # Returns
/// * `Ok((message, iterations, nharderrors, snapshots))` - Decoded message, BP iteration count, initial hard errors, and saved LLR snapshots
/// * `Err(snapshots)` - If BP failed, returns the saved LLR snapshots for OSD fallback
pub fn decode_with_snapshots(
    llr: &[f32],
    max_iterations: usize,
    save_at_iters: &[usize],
) -> Result<(BitVec<u8, Msb0>, usize, usize, Vec<Vec<f32>>), Vec<Vec<f32>>> {
    if llr.len() != N {
        return Err(Vec::new());
    }

    // Message arrays
    let mut toc = vec![vec![0.0f32; MAX_NRW]; M]; // Messages to checks
    let mut tov = vec![vec![0.0f32; NCW]; N];     // Messages to variable nodes
    let mut zn = vec![0.0f32; N];                  // Bit log-likelihood estimates

    // Storage for LLR snapshots
    let mut snapshots: Vec<Vec<f32>> = Vec::new();

    // Track initial hard errors (nharderrors) from channel LLRs (before BP starts)
    let mut nharderrors = 0usize;

    // Initialize messages to checks with LLRs
    for j in 0..M {
        for i in 0..NRW[j] {
            let bit_idx = NM[j][i];
            toc[j][i] = llr[bit_idx];
        }
    }

    // Iterative decoding
    for iter in 0..=max_iterations {
        // Update bit log-likelihood ratios
        for i in 0..N {
            zn[i] = llr[i] + tov[i].iter().sum::<f32>();
        }

        // Save snapshot at requested iterations (WSJT-X saves at 1, 2, 3)
        if iter > 0 && save_at_iters.contains(&iter) {
            snapshots.push(zn.clone());
        }

        // Make hard decisions
        let mut cw = BitVec::<u8, Msb0>::repeat(false, N);
        for i in 0..N {
            cw.set(i, zn[i] > 0.0);
        }

        // Check parity constraints
        let mut ncheck = 0;
        for i in 0..M {
            let mut parity = 0u8;
            for j in 0..NRW[i] {
                let bit_idx = NM[i][j];
                if cw[bit_idx] {
                    parity ^= 1;
                }
            }
            if parity != 0 {
                ncheck += 1;
            }
        }

        // Save initial hard error count (before BP starts, at iteration 0)
        if iter == 0 {
            nharderrors = ncheck;
        }

        // If all parity checks satisfied, check CRC
        if ncheck == 0 {
            let decoded = &cw[..K];
            if crc14_check(decoded) {
                // Success! Return the decoded message with metrics and any snapshots collected so far
                return Ok((decoded.to_bitvec(), iter, nharderrors, snapshots));
            }
        }

        // If we've reached max iterations, return snapshots for OSD fallback
        if iter == max_iterations {
            return Err(snapshots);
        }

        // Send messages from bits to check nodes
        for j in 0..M {
            for i in 0..NRW[j] {
                let bit_idx = NM[j][i];
                toc[j][i] = zn[bit_idx];

                // Subtract off what the bit had received from this check
                for kk in 0..NCW {
                    if MN[bit_idx][kk] == j {
                        toc[j][i] -= tov[bit_idx][kk];
                        break;
                    }
                }
            }
        }

        // Send messages from check nodes to variable nodes
        // This is the core of the sum-product algorithm
        for j in 0..N {
            for i in 0..NCW {
                let check_idx = MN[j][i];

                // Compute product of tanh(-toc/2) for all bits in check except j
                let mut product = 1.0f32;
                for k in 0..NRW[check_idx] {
                    let bit_k = NM[check_idx][k];
                    if bit_k != j {
                        product *= f32::tanh(-toc[check_idx][k] / 2.0);
                    }
                }

                // Apply platanh (WSJT-X's piecewise linear approximation) to get the message
                tov[j][i] = 2.0 * platanh(-product);
            }
        }
    }

    Err(snapshots)
}
