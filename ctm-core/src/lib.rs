//! # ctm-core
//!
//! The seam between the numeric CTM pipeline and whatever carries it to the
//! display:
//! - [`PropertyTransport`]: resolve an output by name, set a blob property on it
//! - [`CtmPlan`]: the fully encoded payload for one request, built up front
//! - [`apply_ctm`]: submit a plan through a transport, all or nothing
//!
//! Errors are collapsed into [`CtmError`], whose variants map onto process
//! exit codes.

pub mod pipeline;
pub mod transport;

pub use pipeline::{apply_ctm, CtmError, CtmPlan, PropertyKind, PROP_CTM};
pub use transport::{ElementFormat, PropertyTransport, TransportError};
