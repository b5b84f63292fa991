use byteorder::{BigEndian, LittleEndian};
use ctm_math::{pack, pack_native, CoefficientMatrix, FixedPointMatrix, SaturationRequest, WordWidth};

// Prints digests of the CTM payload for a fixed set of saturations so that
// hosts with different word widths or byte orders can be compared by eye.
fn main() {
    let requests = [
        SaturationRequest::Identity,
        SaturationRequest::Scalar(0.5),
        SaturationRequest::Scalar(1.0),
        SaturationRequest::Scalar(1.5),
        SaturationRequest::Scalar(-1.0),
    ];

    let mut fixed = Vec::with_capacity(requests.len() * 72);
    let mut le = Vec::new();
    let mut be = Vec::new();
    let mut native = Vec::new();
    for &req in &requests {
        let m = FixedPointMatrix::encode(&CoefficientMatrix::from_request(req));
        for v in &m.data {
            fixed.extend_from_slice(&v.to_le_bytes());
        }
        le.extend(pack::<LittleEndian>(&m, WordWidth::W64).to_wire_bytes());
        be.extend(pack::<BigEndian>(&m, WordWidth::W64).to_wire_bytes());
        native.extend(pack_native(&m).to_container_bytes());
    }

    println!("S3132_HASH {}", sha256(&fixed));
    println!("WIRE_LE_HASH {}", sha256(&le));
    println!("WIRE_BE_HASH {}", sha256(&be));
    println!("NATIVE_CONTAINER_HASH {}", sha256(&native));
}

fn sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    let out = hasher.finalize();
    hex::encode(out)
}
