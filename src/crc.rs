//! CRC-14 Implementation for FT8
//!
//! This module implements the 14-bit CRC used in FT8 message encoding.
//! The CRC polynomial is 0x2757.
//!
//! Reference: https://wsjt.sourceforge.io/FT4_FT8_QEX.pdf page 8
//! "The CRC is calculated on the source-encoded message, zero-extended from 77 to 82 bits."

use crc::{Algorithm, Crc};
use bitvec::prelude::*;

/// FT8 CRC-14 polynomial
const CRC_POLYNOMIAL: u16 = 0x2757;

/// FT8 CRC-14 algorithm configuration
const CRC_FT8: Algorithm<u16> = Algorithm {
    width: 14,
    poly: CRC_POLYNOMIAL,
    init: 0x0,
    refin: false,
    refout: false,
    xorout: 0x0,
    check: 0x0,
    residue: 0x0,
};

/// FT8 CRC instance
const FT8_CRC: Crc<u16> = Crc::<u16>::new(&CRC_FT8);

/// Calculate 14-bit CRC for FT8 messages
///
/// This function computes the CRC-14 for a 77-bit message by:
/// 1. Zero-extending the message from 77 to 82 bits (adding 5 zero bits)
/// 2. Converting to bytes
/// 3. Computing CRC-14 using polynomial 0x2757
///
/// # Arguments
/// * `bits` - Bit slice containing the 77-bit message
///
/// # Returns
/// * `u16` - 14-bit CRC value (only lower 14 bits are valid)
///
/// # Example
/// ```
/// use bitvec::prelude::*;
/// use ft8core::crc::crc14;
///
/// // Example: 77-bit message
/// let bits = bitarr![u8, Msb0; 0; 77];
/// let crc = crc14(&bits);
/// assert!(crc < (1 << 14)); // CRC is 14 bits
/// ```
pub fn crc14(bits: &BitSlice<u8, Msb0>) -> u16 {
    // Convert bits to u128 (we only use lower 77 bits)
    let mut msg: u128 = 0;
    for (i, bit) in bits.iter().take(77).enumerate() {
        if *bit {
            msg |= 1u128 << (76 - i);
        }
    }

    // Zero-extend from 77 to 82 bits by left-shifting by 5
    let padded_msg = msg << 5;

    // Convert to big-endian bytes
    let msg_bytes = padded_msg.to_be_bytes();

    // Only need last 11 bytes (88 bits, but we only use 82)
    let trimmed_bytes = &msg_bytes[msg_bytes.len() - 11..];

    // Calculate CRC
    FT8_CRC.checksum(trimmed_bytes)
}

/// Check if a message with CRC is valid
///
/// # Arguments
/// * `bits` - Bit slice containing 91-bit message (77 message + 14 CRC)
///
/// # Returns
/// * `bool` - true if CRC is valid
/// Generalized CRC-14 over a raw MSB-first byte buffer, taking only the
/// first `n_bits` bits (as `ftx_compute_crc(buf, num_bits)` does in the
/// reference decoder). Pads with 5 zero bits to flush the shift register,
/// matching the fixed 77->82 padding [`crc14`] uses for the 77-bit case.
pub fn crc14_bytes(buf: &[u8], n_bits: usize) -> u16 {
    assert!(n_bits <= 123, "crc14_bytes: n_bits too large for u128 staging");
    let mut msg: u128 = 0;
    for i in 0..n_bits {
        let byte = buf[i / 8];
        let bit = (byte >> (7 - (i % 8))) & 1;
        msg = (msg << 1) | bit as u128;
    }
    let padded = msg << 5;
    let total_bits = n_bits + 5;
    let total_bytes = total_bits.div_ceil(8);
    let msg_bytes = padded.to_be_bytes();
    let trimmed = &msg_bytes[msg_bytes.len() - total_bytes..];
    FT8_CRC.checksum(trimmed)
}

pub fn crc14_check(bits: &BitSlice<u8, Msb0>) -> bool {
    // Calculate CRC for first 77 bits
    let calculated_crc = crc14(&bits[..77]);

    // Extract CRC from bits 77-90
    let mut received_crc: u16 = 0;
    for bit in bits[77..91].iter() {
        received_crc = (received_crc << 1) | (*bit as u16);
    }

    calculated_crc == received_crc
}
