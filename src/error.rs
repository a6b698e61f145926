use std::fmt;

/// Coarse classification of an [`FpeError`], matching the disposition
/// table of the format-preserving encryption core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input (key, tweak, or text) was absent.
    NullArgument,
    /// A length or range constraint was violated.
    InvalidArgument,
    /// The key is not a valid AES key for this operation.
    InvalidKey,
    /// A nonpositive modulus or a product overflow was encountered.
    ArithmeticError,
    /// The block cipher primitive reported failure; indicates a
    /// programming defect rather than caller misuse.
    Fatal,
}

/// Error type returned by every operation in this crate.
#[derive(Debug, Clone)]
pub struct FpeError {
    kind: ErrorKind,
    why: String,
}

impl FpeError {
    pub fn new(kind: ErrorKind, why: impl Into<String>) -> Self {
        FpeError {
            kind,
            why: why.into(),
        }
    }

    pub fn null_argument(why: impl Into<String>) -> Self {
        Self::new(ErrorKind::NullArgument, why)
    }

    pub fn invalid_argument(why: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, why)
    }

    pub fn invalid_key(why: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidKey, why)
    }

    pub fn arithmetic_error(why: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArithmeticError, why)
    }

    pub fn fatal(why: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fatal, why)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for FpeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.why)
    }
}

impl std::error::Error for FpeError {}
