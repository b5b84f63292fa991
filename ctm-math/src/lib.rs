//! # ctm-math
//!
//! Numeric side of the saturation CTM: building the 3×3 matrix, encoding it
//! into the signed-magnitude S31.32 format DRM expects, and packing the
//! 64-bit values into 32-bit elements held in native-word containers.
//!
//! Pipeline: [`SaturationRequest`] → [`CoefficientMatrix`] → [`FixedPointMatrix`] → [`PackedBuffer`].
//!
//! Everything here is pure and allocation-light; nothing talks to a display.

pub mod fixed_point;
pub mod matrix;
pub mod packing;

pub use fixed_point::{decode_coefficient, encode_coefficient, FixedPointMatrix};
pub use matrix::{CoefficientMatrix, SaturationError, SaturationRequest};
pub use packing::{pack, pack_native, Endian, PackedBuffer, WordWidth, PACKED_LEN};

/// Number of coefficients in a 3×3 CTM.
pub const CTM_LEN: usize = 9;
