use std::fmt;

use thiserror::Error;

use crate::CTM_LEN;

/// Token that selects the identity matrix instead of a saturation value.
pub const IDENTITY_KEYWORD: &str = "default";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaturationError {
    #[error("{0} is not a valid Saturation value")]
    InvalidInput(String),
}

/// What the user asked for on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SaturationRequest {
    /// Reset to the identity transform
    Identity,
    /// Diagonal saturation with the given scalar
    Scalar(f64),
}

impl SaturationRequest {
    /// Parse a single command-line token.
    ///
    /// A value that parses to exactly zero is rejected just like garbage:
    /// `0` cannot be told apart from a failed parse and is reported as
    /// [`SaturationError::InvalidInput`].
    pub fn parse(token: &str) -> Result<Self, SaturationError> {
        if token == IDENTITY_KEYWORD {
            return Ok(Self::Identity);
        }

        match token.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value != 0.0 => Ok(Self::Scalar(value)),
            _ => Err(SaturationError::InvalidInput(token.to_string())),
        }
    }
}

/// Row-major 3×3 coefficient matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientMatrix {
    coeffs: [f64; CTM_LEN],
}

impl CoefficientMatrix {
    pub const IDENTITY: Self = Self {
        coeffs: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Build the matrix for a request.
    ///
    /// For `Scalar(v)` this is `diag(v) + s·J` with `s = (1 - v) / 3`, so every
    /// row sums to one and grey stays grey.
    pub fn from_request(request: SaturationRequest) -> Self {
        match request {
            SaturationRequest::Identity => Self::IDENTITY,
            SaturationRequest::Scalar(value) => Self::saturation(value),
        }
    }

    fn saturation(value: f64) -> Self {
        let s = (1.0 - value) / 3.0;
        let d = s + value;
        Self {
            coeffs: [
                d, s, s, //
                s, d, s, //
                s, s, d,
            ],
        }
    }

    pub fn as_slice(&self) -> &[f64; CTM_LEN] {
        &self.coeffs
    }

    pub fn row(&self, index: usize) -> [f64; 3] {
        let base = index * 3;
        [self.coeffs[base], self.coeffs[base + 1], self.coeffs[base + 2]]
    }

    /// Exact comparison, no tolerance
    pub fn is_identity(&self) -> bool {
        self.coeffs == Self::IDENTITY.coeffs
    }
}

impl fmt::Display for CoefficientMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..3 {
            let [a, b, c] = self.row(r);
            writeln!(f, "    {:2.4}:{:2.4}:{:2.4}", a, b, c)?;
        }
        Ok(())
    }
}
