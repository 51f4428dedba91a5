// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Key sources: anything that can name a minimizer.
//!
//! The table only needs the minimizer's integer value. How that value was
//! derived (rolling hash, lexicographic order, 2-bit packing) is the caller's
//! business. `KeySource` is the single seam between the two.

use std::fmt;

/// Produces the integer key of a minimizer.
pub trait KeySource {
    /// The minimizer's raw numeric value, used directly as a table index.
    fn minimizer_value(&self) -> u64;
}

macro_rules! impl_key_source_for_uint {
    ($($ty:ty),*) => {
        $(
            impl KeySource for $ty {
                #[inline]
                fn minimizer_value(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

impl_key_source_for_uint!(u8, u16, u32, u64, usize);

impl<K: KeySource + ?Sized> KeySource for &K {
    #[inline]
    fn minimizer_value(&self) -> u64 {
        (**self).minimizer_value()
    }
}

impl<K: KeySource + ?Sized> KeySource for Box<K> {
    #[inline]
    fn minimizer_value(&self) -> u64 {
        (**self).minimizer_value()
    }
}

/// Maximum bases a [`Minimizer`] can hold (2 bits each in a `u64`).
pub const MAX_MINIMIZER_LEN: usize = 32;

/// A minimizer packed 2 bits per base into a `u64`.
///
/// Encoding is A=0, C=1, G=2, T=3, first base in the most significant
/// position, which makes the packed value's order lexicographic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Minimizer(u64);

impl Minimizer {
    /// Create from a raw packed value.
    #[inline]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw packed `u64` value.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Pack an ASCII nucleotide string (case-insensitive).
    ///
    /// Returns `None` for non-ACGT bytes or more than [`MAX_MINIMIZER_LEN`]
    /// bases.
    pub fn from_ascii(seq: &[u8]) -> Option<Self> {
        if seq.len() > MAX_MINIMIZER_LEN {
            return None;
        }
        seq.iter()
            .try_fold(0u64, |acc, &base| {
                let code = match base {
                    b'A' | b'a' => 0,
                    b'C' | b'c' => 1,
                    b'G' | b'g' => 2,
                    b'T' | b't' => 3,
                    _ => return None,
                };
                Some((acc << 2) | code)
            })
            .map(Self)
    }
}

impl KeySource for Minimizer {
    #[inline]
    fn minimizer_value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Minimizer {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for Minimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Minimizer(0x{:016x})", self.0)
    }
}

impl fmt::Display for Minimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}
