use ctm_math::{
    pack_native, CoefficientMatrix, FixedPointMatrix, PackedBuffer, SaturationError,
    SaturationRequest,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::transport::{ElementFormat, PropertyTransport, TransportError};

/// Output property that carries the color transform matrix
pub const PROP_CTM: &str = "CTM";

/// Which lookup failed when a property is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// The property name is not interned on the server
    Atom,
    /// The name exists but the output does not expose it
    Output,
}

#[derive(Error, Debug)]
pub enum CtmError {
    #[error(transparent)]
    InvalidInput(#[from] SaturationError),
    #[error("Cannot find output {0}.")]
    OutputNotFound(String),
    #[error("Property key '{name}' not found ({kind:?})")]
    PropertyUnavailable {
        name: String,
        kind: PropertyKind,
        code: u8,
    },
    #[error("transport failure {code}: {message}")]
    TransportFailure { code: u8, message: String },
}

impl From<TransportError> for CtmError {
    fn from(err: TransportError) -> Self {
        let code = err.code();
        match err {
            TransportError::OutputNotFound(name) => Self::OutputNotFound(name),
            TransportError::AtomNotFound(name) => Self::PropertyUnavailable {
                name,
                kind: PropertyKind::Atom,
                code,
            },
            TransportError::PropertyNotFound(name) => Self::PropertyUnavailable {
                name,
                kind: PropertyKind::Output,
                code,
            },
            TransportError::Failure { code, message } => Self::TransportFailure { code, message },
        }
    }
}

impl CtmError {
    /// Process exit status for this error. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput(_) | Self::OutputNotFound(_) => 1,
            Self::PropertyUnavailable { code, .. } | Self::TransportFailure { code, .. } => {
                (*code).max(1)
            }
        }
    }
}

/// Everything needed to program one CTM, computed before any I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct CtmPlan {
    pub request: SaturationRequest,
    pub coefficients: CoefficientMatrix,
    pub fixed: FixedPointMatrix,
    pub packed: PackedBuffer,
}

impl CtmPlan {
    pub fn new(request: SaturationRequest) -> Self {
        let coefficients = CoefficientMatrix::from_request(request);
        let fixed = FixedPointMatrix::encode(&coefficients);
        let packed = pack_native(&fixed);
        debug!(
            ?request,
            words = ?packed.words(),
            width = ?packed.width(),
            endian = ?packed.endian(),
            "encoded CTM"
        );
        Self {
            request,
            coefficients,
            fixed,
            packed,
        }
    }

    /// Parse a command-line token and build the plan for it.
    pub fn parse(token: &str) -> Result<Self, CtmError> {
        Ok(Self::new(SaturationRequest::parse(token)?))
    }

    /// Bytes submitted as the `CTM` property payload
    pub fn payload(&self) -> Vec<u8> {
        self.packed.to_wire_bytes()
    }
}

/// Resolve `output_name` and set the `CTM` property on it.
///
/// The payload is submitted in a single request; on any error nothing has
/// been changed on the output.
pub fn apply_ctm<T: PropertyTransport>(
    transport: &mut T,
    output_name: &str,
    plan: &CtmPlan,
) -> Result<(), CtmError> {
    let output = transport.resolve_output(output_name)?;
    debug!(output_name, ?output, "resolved output");

    let payload = plan.payload();
    transport.set_blob_property(output, PROP_CTM, &payload, ElementFormat::Bits32)?;
    info!(
        output_name,
        elements = ElementFormat::Bits32.element_count(payload.len()),
        "applied CTM"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_payload_size() {
        let plan = CtmPlan::new(SaturationRequest::Identity);
        assert_eq!(plan.payload().len(), 72);
        assert_eq!(plan.packed.len(), 18);
        assert!(plan.coefficients.is_identity());
    }

    #[test]
    fn test_plan_parse_zero_is_invalid() {
        let err = CtmPlan::parse("0").unwrap_err();
        assert!(matches!(err, CtmError::InvalidInput(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_transport_error_mapping() {
        let err: CtmError = TransportError::PropertyNotFound("CTM".into()).into();
        assert!(matches!(
            err,
            CtmError::PropertyUnavailable { kind: PropertyKind::Output, .. }
        ));
        assert_eq!(err.exit_code(), 15);

        let err: CtmError = TransportError::AtomNotFound("CTM".into()).into();
        assert_eq!(err.exit_code(), 5);

        let err: CtmError = TransportError::OutputNotFound("HDMI-9".into()).into();
        assert!(matches!(err, CtmError::OutputNotFound(ref n) if n == "HDMI-9"));
        assert_eq!(err.exit_code(), 1);

        let err: CtmError = TransportError::Failure {
            code: 0,
            message: String::new(),
        }
        .into();
        assert_eq!(err.exit_code(), 1);
    }
}
