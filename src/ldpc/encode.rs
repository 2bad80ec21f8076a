//! LDPC encoder for FT8
//!
//! This module implements LDPC(174,91) encoding using a generator matrix.

use bitvec::prelude::*;
use super::constants::*;

/// Encode a 91-bit message using LDPC(174,91)
///
/// Takes a 91-bit message (77 information bits + 14 CRC bits) and produces
/// a 174-bit codeword by computing 83 parity bits using the generator matrix.
///
/// # Arguments
/// * `message` - 91-bit message as BitSlice
/// * `codeword` - Output buffer for 174-bit codeword
///
/// # Example
/// ```
/// use bitvec::prelude::*;
/// use ft8core::ldpc;
///
/// // Create storage with enough bytes for the bit arrays
/// let mut message_storage = [0u8; 12]; // 96 bits for 91-bit message
/// let message = &message_storage.view_bits::<Msb0>()[..91];
/// // ... fill message with 77 info bits + 14 CRC bits ...
///
/// let mut codeword_storage = [0u8; 22]; // 176 bits for 174-bit codeword
/// let codeword = &mut codeword_storage.view_bits_mut::<Msb0>()[..174];
/// ldpc::encode(message, codeword);
/// // codeword now contains 174 bits (91 message + 83 parity)
/// ```
pub fn encode(message: &BitSlice<u8, Msb0>, codeword: &mut BitSlice<u8, Msb0>) {
    assert_eq!(message.len(), K, "Message must be {} bits", K);
    assert_eq!(codeword.len(), N, "Codeword must be {} bits", N);

    // Copy message to first K bits of codeword
    codeword[..K].copy_from_bitslice(message);

    // Compute parity bits using matrix multiplication in GF(2)
    for i in 0..M {
        let mut parity = false;
        for j in 0..K {
            parity ^= message[j] & (get_generator_bit(i, j) != 0);
        }
        codeword.set(K + i, parity);
    }
}
