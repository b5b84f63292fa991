//! Packing S31.32 values into 32-bit property elements.
//!
//! RandR only takes format-32 arrays, and Xlib hands those over as C `long`,
//! which is 64 bits wide on LP64 hosts. Each 64-bit fixed-point value is
//! therefore split into the two 32-bit chunks it occupies in memory, and each
//! chunk gets its own word. The receiver glues the stream back together as
//! raw memory, so the chunk order follows the host byte order: low half first
//! on little-endian, high half first on big-endian.

use byteorder::{BigEndian, ByteOrder, LittleEndian, NativeEndian};

use crate::fixed_point::FixedPointMatrix;
use crate::CTM_LEN;

/// Two 32-bit elements per fixed-point entry
pub const PACKED_LEN: usize = 2 * CTM_LEN;

/// Width of the container each 32-bit element travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordWidth {
    W32,
    W64,
}

impl WordWidth {
    /// Width of a C `long` on this host.
    pub fn native() -> Self {
        match std::mem::size_of::<std::os::raw::c_long>() {
            4 => Self::W32,
            _ => Self::W64,
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Recover the order a `byteorder` type writes in.
    pub fn of<B: ByteOrder>() -> Self {
        let mut buf = [0u8; 2];
        B::write_u16(&mut buf, 1);
        if buf[0] == 1 {
            Self::Little
        } else {
            Self::Big
        }
    }

    pub fn native() -> Self {
        Self::of::<NativeEndian>()
    }

    fn write_u32(self, buf: &mut [u8], v: u32) {
        match self {
            Self::Little => LittleEndian::write_u32(buf, v),
            Self::Big => BigEndian::write_u32(buf, v),
        }
    }

    fn write_u64(self, buf: &mut [u8], v: u64) {
        match self {
            Self::Little => LittleEndian::write_u64(buf, v),
            Self::Big => BigEndian::write_u64(buf, v),
        }
    }

    fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            Self::Little => LittleEndian::read_u64(buf),
            Self::Big => BigEndian::read_u64(buf),
        }
    }
}

/// 18 32-bit elements ready for a format-32 property, plus the layout they
/// were produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBuffer {
    words: [u32; PACKED_LEN],
    width: WordWidth,
    endian: Endian,
}

/// Split every entry into its two in-memory 32-bit chunks, in order `B`.
pub fn pack<B: ByteOrder>(matrix: &FixedPointMatrix, width: WordWidth) -> PackedBuffer {
    let mut words = [0u32; PACKED_LEN];
    let mut bytes = [0u8; 8];
    for (k, &value) in matrix.data.iter().enumerate() {
        B::write_u64(&mut bytes, value);
        words[2 * k] = B::read_u32(&bytes[..4]);
        words[2 * k + 1] = B::read_u32(&bytes[4..]);
    }
    PackedBuffer {
        words,
        width,
        endian: Endian::of::<B>(),
    }
}

/// Pack for the host this binary runs on.
pub fn pack_native(matrix: &FixedPointMatrix) -> PackedBuffer {
    pack::<NativeEndian>(matrix, WordWidth::native())
}

impl PackedBuffer {
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn width(&self) -> WordWidth {
        self.width
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Format-32 payload: each element as 4 bytes in the buffer's byte order.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.words.len() * 4];
        for (chunk, &w) in out.chunks_exact_mut(4).zip(self.words.iter()) {
            self.endian.write_u32(chunk, w);
        }
        out
    }

    /// Each element zero-extended into its own container word, i.e. the
    /// `long[18]` array handed to Xlib. Shown by the dry run; x11rb itself
    /// takes the wire form.
    pub fn to_container_bytes(&self) -> Vec<u8> {
        let size = self.width.bytes();
        let mut out = vec![0u8; self.words.len() * size];
        for (chunk, &w) in out.chunks_exact_mut(size).zip(self.words.iter()) {
            match self.width {
                WordWidth::W32 => self.endian.write_u32(chunk, w),
                WordWidth::W64 => self.endian.write_u64(chunk, u64::from(w)),
            }
        }
        out
    }

    /// Reassemble the fixed-point entries from consecutive element pairs.
    pub fn unpack(&self) -> FixedPointMatrix {
        let mut data = [0u64; CTM_LEN];
        let mut bytes = [0u8; 8];
        for (slot, pair) in data.iter_mut().zip(self.words.chunks_exact(2)) {
            self.endian.write_u32(&mut bytes[..4], pair[0]);
            self.endian.write_u32(&mut bytes[4..], pair[1]);
            *slot = self.endian.read_u64(&bytes);
        }
        FixedPointMatrix { data }
    }
}
