// Integration test for the whole CTM path
// (parse → matrix → S31.32 → native packing → transport)
use ctm_core::{
    apply_ctm, CtmError, CtmPlan, ElementFormat, PropertyKind, PropertyTransport, TransportError,
    PROP_CTM,
};
use ctm_math::fixed_point::SIGN_BIT;
use ctm_math::{decode_coefficient, SaturationError};

const ONE: u64 = 1 << 32;

/// In-memory stand-in for a display server with a fixed set of outputs.
struct MockServer {
    outputs: Vec<(&'static str, Vec<&'static str>)>,
    resolved: Vec<String>,
    changes: Vec<Change>,
}

struct Change {
    output: usize,
    property: String,
    data: Vec<u8>,
    elements: usize,
    format_bits: u8,
}

impl MockServer {
    fn with_ctm_outputs(names: &[&'static str]) -> Self {
        Self {
            outputs: names.iter().map(|&n| (n, vec![PROP_CTM])).collect(),
            resolved: Vec::new(),
            changes: Vec::new(),
        }
    }
}

impl PropertyTransport for MockServer {
    type Output = usize;

    fn resolve_output(&mut self, name: &str) -> Result<usize, TransportError> {
        self.resolved.push(name.to_string());
        self.outputs
            .iter()
            .position(|(n, _)| *n == name)
            .ok_or_else(|| TransportError::OutputNotFound(name.to_string()))
    }

    fn set_blob_property(
        &mut self,
        output: usize,
        property: &str,
        data: &[u8],
        format: ElementFormat,
    ) -> Result<(), TransportError> {
        if !self.outputs[output].1.contains(&property) {
            return Err(TransportError::PropertyNotFound(property.to_string()));
        }
        self.changes.push(Change {
            output,
            property: property.to_string(),
            data: data.to_vec(),
            elements: format.element_count(data.len()),
            format_bits: format.bits(),
        });
        Ok(())
    }
}

/// Read back the 9 S31.32 entries the way the kernel sees the blob.
fn entries(data: &[u8]) -> Vec<u64> {
    data.chunks_exact(8)
        .map(|c| u64::from_ne_bytes(c.try_into().unwrap()))
        .collect()
}

/// `-c 1.0 -o eDP-1`: not the identity keyword, but s = 0 gives identity values.
#[test]
fn test_unit_saturation_on_edp() {
    let mut server = MockServer::with_ctm_outputs(&["HDMI-1", "eDP-1"]);
    let plan = CtmPlan::parse("1.0").unwrap();
    apply_ctm(&mut server, "eDP-1", &plan).unwrap();

    assert_eq!(server.changes.len(), 1);
    let change = &server.changes[0];
    assert_eq!(change.output, 1);
    assert_eq!(change.property, "CTM");
    assert_eq!(change.format_bits, 32);
    assert_eq!(change.elements, 18);
    assert_eq!(change.data.len(), 72);

    let values = entries(&change.data);
    assert_eq!(values, vec![ONE, 0, 0, 0, ONE, 0, 0, 0, ONE]);
    assert!(values.iter().all(|v| v & SIGN_BIT == 0));
}

/// `-c default -o eDP-1`: exact identity, off-diagonals exactly zero.
#[test]
fn test_default_identity_on_edp() {
    let mut server = MockServer::with_ctm_outputs(&["eDP-1"]);
    let plan = CtmPlan::parse("default").unwrap();
    assert_eq!(plan.coefficients.as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    apply_ctm(&mut server, "eDP-1", &plan).unwrap();

    let values = entries(&server.changes[0].data);
    for (i, v) in values.iter().enumerate() {
        if i % 4 == 0 {
            assert_eq!(*v, ONE);
        } else {
            assert_eq!(*v, 0, "off-diagonal {} not zero", i);
        }
    }
}

/// `-c 0 -o eDP-1`: rejected before any transport call.
#[test]
fn test_zero_saturation_never_reaches_transport() {
    let server = MockServer::with_ctm_outputs(&["eDP-1"]);
    let err = CtmPlan::parse("0").unwrap_err();
    assert!(matches!(
        err,
        CtmError::InvalidInput(SaturationError::InvalidInput(ref t)) if t == "0"
    ));
    assert_eq!(err.exit_code(), 1);
    assert!(server.resolved.is_empty());
    assert!(server.changes.is_empty());
}

/// Unknown output: OutputNotFound, exit 1, no property change issued.
#[test]
fn test_unresolvable_output() {
    let mut server = MockServer::with_ctm_outputs(&["DP-1"]);
    let plan = CtmPlan::parse("1.4").unwrap();
    let err = apply_ctm(&mut server, "eDP-1", &plan).unwrap_err();
    assert!(matches!(err, CtmError::OutputNotFound(ref n) if n == "eDP-1"));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(server.resolved, vec!["eDP-1".to_string()]);
    assert!(server.changes.is_empty());
}

#[test]
fn test_output_without_ctm_property() {
    let mut server = MockServer {
        outputs: vec![("VGA-1", vec![])],
        resolved: Vec::new(),
        changes: Vec::new(),
    };
    let plan = CtmPlan::parse("1.4").unwrap();
    let err = apply_ctm(&mut server, "VGA-1", &plan).unwrap_err();
    assert!(matches!(
        err,
        CtmError::PropertyUnavailable { kind: PropertyKind::Output, .. }
    ));
    assert_eq!(err.exit_code(), 15);
    assert!(server.changes.is_empty());
}

#[test]
fn test_negative_coefficients_carry_sign_bit() {
    // v = 2.0: s = -1/3 off the diagonal, 5/3 on it
    let mut server = MockServer::with_ctm_outputs(&["eDP-1"]);
    let plan = CtmPlan::parse("2.0").unwrap();
    apply_ctm(&mut server, "eDP-1", &plan).unwrap();

    let values = entries(&server.changes[0].data);
    for (i, &v) in values.iter().enumerate() {
        let expected = plan.coefficients.as_slice()[i];
        assert_eq!(v & SIGN_BIT != 0, expected < 0.0, "sign of entry {}", i);
        assert!((decode_coefficient(v) - expected).abs() < 1.0 / ONE as f64);
    }
}
