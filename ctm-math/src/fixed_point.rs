//! Signed-magnitude S31.32 fixed point, the layout of DRM's `drm_color_ctm`.
//!
//! Bit 63 carries the sign, bits 0..=62 the magnitude with 32 fractional
//! bits. This is *not* two's complement: the raw values are kept as `u64`
//! so they only ever get treated as bit patterns.

use crate::matrix::CoefficientMatrix;
use crate::CTM_LEN;

pub const FRACTIONAL_BITS: u32 = 32;
pub const SIGN_BIT: u64 = 1 << 63;
pub const MAGNITUDE_MASK: u64 = !SIGN_BIT;
const SCALE_FACTOR: f64 = (1u64 << FRACTIONAL_BITS) as f64;

/// Encode one coefficient, truncating toward zero.
///
/// Magnitudes of 2^31 and above do not fit; they saturate at the largest
/// 63-bit magnitude rather than spilling into the sign bit.
pub fn encode_coefficient(c: f64) -> u64 {
    if c < 0.0 {
        (((-c) * SCALE_FACTOR) as u64 & MAGNITUDE_MASK) | SIGN_BIT
    } else {
        ((c * SCALE_FACTOR) as u64) & MAGNITUDE_MASK
    }
}

pub fn decode_coefficient(raw: u64) -> f64 {
    let magnitude = (raw & MAGNITUDE_MASK) as f64 / SCALE_FACTOR;
    if raw & SIGN_BIT != 0 {
        -magnitude
    } else {
        magnitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointMatrix {
    /// Raw S31.32 signed-magnitude bit patterns, row-major
    pub data: [u64; CTM_LEN],
}

impl FixedPointMatrix {
    pub fn encode(matrix: &CoefficientMatrix) -> Self {
        let mut data = [0u64; CTM_LEN];
        for (slot, &c) in data.iter_mut().zip(matrix.as_slice()) {
            *slot = encode_coefficient(c);
        }
        Self { data }
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    /// Back to floating point, for checks and diagnostics
    pub fn decode(&self) -> [f64; CTM_LEN] {
        self.data.map(decode_coefficient)
    }

    /// In-memory image of the struct as the host lays it out (72 bytes).
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
