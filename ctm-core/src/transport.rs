use thiserror::Error;

/// X11 `BadAtom`
pub const BAD_ATOM: u8 = 5;
/// X11 `BadName`
pub const BAD_NAME: u8 = 15;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Cannot find output {0}.")]
    OutputNotFound(String),
    #[error("Property key '{0}' not found.")]
    AtomNotFound(String),
    #[error("Property key '{0}' not found on output")]
    PropertyNotFound(String),
    #[error("request failed with code {code}: {message}")]
    Failure { code: u8, message: String },
}

impl TransportError {
    /// Numeric result code, X11 style
    pub fn code(&self) -> u8 {
        match self {
            Self::OutputNotFound(_) => 1,
            Self::AtomNotFound(_) => BAD_ATOM,
            Self::PropertyNotFound(_) => BAD_NAME,
            Self::Failure { code, .. } => *code,
        }
    }
}

/// Declared width of each element in a property array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementFormat {
    Bits16,
    Bits32,
}

impl ElementFormat {
    pub fn bits(self) -> u8 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
        }
    }

    /// Elements advertised for a payload of `byte_len` bytes.
    pub fn element_count(self, byte_len: usize) -> usize {
        byte_len / usize::from(self.bits() >> 3)
    }
}

/// Something that can attach a typed array property to a named display output.
///
/// `set_blob_property` must advertise `format.element_count(data.len())`
/// elements and must not return before the change has been synchronized
/// with the other side.
pub trait PropertyTransport {
    type Output: Copy + std::fmt::Debug;

    fn resolve_output(&mut self, name: &str) -> Result<Self::Output, TransportError>;

    fn set_blob_property(
        &mut self,
        output: Self::Output,
        property: &str,
        data: &[u8],
        format: ElementFormat,
    ) -> Result<(), TransportError>;
}
