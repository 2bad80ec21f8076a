//! Protocol dimensioning constants
//!
//! FT8 and FT4 share the same 77-bit message, CRC-14 and LDPC(174,91) code;
//! they differ only in their physical layer (tone count, symbol timing and
//! the sync pattern). Centralizing the dimensioning table here keeps those
//! constants from drifting out of sync between call sites, the way
//! `symbol.rs`/`sync/mod.rs` centralize the FT8-only ones today.

/// Which of the two weak-signal modes a waterfall/candidate/message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Ft8,
    Ft4,
}

impl Protocol {
    /// Number of distinct tones per symbol (8-FSK vs 4-GFSK).
    pub const fn tones(self) -> u8 {
        match self {
            Protocol::Ft8 => 8,
            Protocol::Ft4 => 4,
        }
    }

    /// Bits carried by one symbol (log2 of `tones`).
    pub const fn bits_per_symbol(self) -> u8 {
        match self {
            Protocol::Ft8 => 3,
            Protocol::Ft4 => 2,
        }
    }

    /// Total symbols per transmission (`NN`), sync symbols included.
    pub const fn num_symbols(self) -> usize {
        match self {
            Protocol::Ft8 => 79,
            Protocol::Ft4 => 105,
        }
    }

    /// Length of one sync (Costas/Costas-like) array.
    pub const fn sync_length(self) -> usize {
        match self {
            Protocol::Ft8 => 7,
            Protocol::Ft4 => 4,
        }
    }

    /// Symbol index at which each sync block begins.
    pub fn sync_positions(self) -> &'static [usize] {
        match self {
            Protocol::Ft8 => &[0, 36, 72],
            Protocol::Ft4 => &[0, 33, 66, 99],
        }
    }

    /// Seconds occupied by one symbol.
    pub const fn symbol_period(self) -> f64 {
        match self {
            Protocol::Ft8 => 0.160,
            Protocol::Ft4 => 0.048,
        }
    }

    /// Seconds in one transmission slot, UTC-aligned.
    pub const fn slot_period(self) -> f64 {
        match self {
            Protocol::Ft8 => 15.0,
            Protocol::Ft4 => 7.5,
        }
    }

    /// 77 payload bits for both protocols.
    pub const fn info_bits(self) -> usize {
        77
    }

    /// 14-bit CRC for both protocols.
    pub const fn crc_bits(self) -> usize {
        14
    }

    /// 83 LDPC parity bits for both protocols.
    pub const fn parity_bits(self) -> usize {
        83
    }

    /// 174-bit LDPC codeword for both protocols.
    pub const fn codeword_bits(self) -> usize {
        174
    }

    /// Number of non-sync (payload-carrying) symbols.
    pub fn data_symbols(self) -> usize {
        self.num_symbols() - self.sync_positions().len() * self.sync_length()
    }
}
