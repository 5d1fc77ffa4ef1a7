//! The codec seam used by the trial engine.
//!
//! The engine never looks inside a code. It only encodes messages, decodes corrupted codewords and
//! inspects the repaired message plus the symbol positions the decoder claims to have fixed.

pub mod gf256;
pub mod reed_solomon;

/// A successful decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Decoded {
    /// The repaired data symbols.
    pub message: Vec<u8>,
    /// Codeword positions the decoder changed.
    pub corrected_positions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("Expected a message of {expected} symbols, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// The decoder gave up on a codeword.
///
/// This is an expected outcome of a trial, not a failure of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DecodeFailure {
    #[error("Nonzero syndromes but the error locator is constant")]
    DegenerateLocator,
    #[error("The error locator implies {errors} errors, at most {capacity} can be corrected")]
    TooManyErrors { errors: usize, capacity: usize },
    #[error("The error locator has {expected} roots but {found} were located")]
    LocatorMismatch { expected: usize, found: usize },
    #[error("The corrected codeword still has nonzero syndromes")]
    VerificationFailed,
}

/// An error correcting code over byte sized symbols.
pub trait Codec {
    /// Number of data symbols in a message.
    fn data_symbols(&self) -> usize;

    /// Number of symbols in a codeword.
    fn total_symbols(&self) -> usize;

    /// Encode a message of [`Self::data_symbols`] symbols.
    fn encode(&self, message: &[u8]) -> Result<Vec<u8>, EncodeError>;

    /// Decode a codeword of [`Self::total_symbols`] symbols.
    ///
    /// # Panics
    ///
    /// Implementations may panic if the codeword has the wrong length.
    fn decode(&self, codeword: &[u8]) -> Result<Decoded, DecodeFailure>;
}
