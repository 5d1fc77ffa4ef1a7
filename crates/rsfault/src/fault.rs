//! Symbol faults modeled after DRAM subarray failures.
//!
//! Each codeword symbol is assumed to live in its own subarray. Multi symbol faults follow the
//! physical grouping of subarrays:
//!
//! | class             | symbols                        | alignment                |
//! |-------------------|--------------------------------|--------------------------|
//! | `single_bit_1sym` | 1, one bit flipped             | any                      |
//! | `8bit_1sym`       | 1, random byte                 | any                      |
//! | `8bit_2sym`       | 2 contiguous, random bytes     | start is even            |
//! | `8bit_4sym`       | 4 contiguous, random bytes     | start is a multiple of 4 |
//! | `out_of_model`    | 5-6 contiguous or 4-8 scattered | any                     |

pub mod distribution;
pub mod generator;
mod random_picker;

use std::collections::HashSet;
use std::fmt;

pub(crate) use random_picker::RandomPicker;

/// The classes of faults the model can inject.
///
/// The declaration order is the sampling order of [`distribution::FaultDistribution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FaultKind {
    SingleBit1Sym,
    EightBit1Sym,
    EightBit2Sym,
    EightBit4Sym,
    OutOfModel,
}

impl FaultKind {
    pub const ALL: [FaultKind; 5] = [
        FaultKind::SingleBit1Sym,
        FaultKind::EightBit1Sym,
        FaultKind::EightBit2Sym,
        FaultKind::EightBit4Sym,
        FaultKind::OutOfModel,
    ];

    /// The name used in reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FaultKind::SingleBit1Sym => "single_bit_1sym",
            FaultKind::EightBit1Sym => "8bit_1sym",
            FaultKind::EightBit2Sym => "8bit_2sym",
            FaultKind::EightBit4Sym => "8bit_4sym",
            FaultKind::OutOfModel => "out_of_model",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            FaultKind::SingleBit1Sym => "1 symbol, 1 bit flipped",
            FaultKind::EightBit1Sym => "1 symbol, random 8-bit pattern",
            FaultKind::EightBit2Sym => "2 contiguous symbols (2-aligned), random patterns",
            FaultKind::EightBit4Sym => "4 contiguous symbols (4-aligned), random patterns",
            FaultKind::OutOfModel => "5-6 contiguous or 4+ scattered symbols",
        }
    }

    /// Position in [`Self::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One corrupted symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolError {
    pub position: usize,
    /// XORed into the symbol. Never 0.
    pub pattern: u8,
}

/// A concrete fault: the class it was drawn from and the symbols it corrupts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fault {
    pub kind: FaultKind,
    pub errors: Vec<SymbolError>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaultError {
    #[error("Got {positions} positions but {patterns} patterns")]
    LengthMismatch { positions: usize, patterns: usize },
    #[error("Fault position {position} is out of range 0..{len}")]
    OutOfRange { position: usize, len: usize },
    #[error("Fault pattern at position {position} is zero")]
    ZeroPattern { position: usize },
    #[error("Position {position} is corrupted more than once")]
    DuplicatePosition { position: usize },
}

/// XOR `patterns` into `codeword` at `positions`.
///
/// The whole fault is validated before any symbol is touched.
pub fn apply_xor(
    codeword: &mut [u8],
    positions: &[usize],
    patterns: &[u8],
) -> Result<(), FaultError> {
    if positions.len() != patterns.len() {
        return Err(FaultError::LengthMismatch {
            positions: positions.len(),
            patterns: patterns.len(),
        });
    }

    let errors = positions
        .iter()
        .zip(patterns)
        .map(|(&position, &pattern)| SymbolError { position, pattern });
    apply_errors(codeword, errors)
}

fn apply_errors<I>(codeword: &mut [u8], errors: I) -> Result<(), FaultError>
where
    I: IntoIterator<Item = SymbolError> + Clone,
{
    let len = codeword.len();
    let mut seen = HashSet::new();
    for SymbolError { position, pattern } in errors.clone() {
        if position >= len {
            return Err(FaultError::OutOfRange { position, len });
        }
        if pattern == 0 {
            return Err(FaultError::ZeroPattern { position });
        }
        if !seen.insert(position) {
            return Err(FaultError::DuplicatePosition { position });
        }
    }

    for SymbolError { position, pattern } in errors {
        codeword[position] ^= pattern;
    }
    Ok(())
}

impl Fault {
    /// Corrupt `codeword` in place.
    pub fn apply(&self, codeword: &mut [u8]) -> Result<(), FaultError> {
        apply_errors(codeword, self.errors.iter().copied())
    }

    /// Corrupted positions in the order they were generated.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.errors.iter().map(|e| e.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_sampling_order() {
        let names: Vec<&str> = FaultKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            ["single_bit_1sym", "8bit_1sym", "8bit_2sym", "8bit_4sym", "out_of_model"]
        );
        for (i, kind) in FaultKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(FaultKind::EightBit2Sym.to_string(), "8bit_2sym");
    }

    #[test]
    fn xor_is_applied() {
        let mut codeword = [0u8, 0xff, 0x0f, 0];
        apply_xor(&mut codeword, &[1, 2], &[0x0f, 0xf0]).unwrap();
        assert_eq!(codeword, [0, 0xf0, 0xff, 0]);
    }

    #[test]
    fn zero_pattern() {
        let mut codeword = [0u8; 4];
        assert_eq!(
            apply_xor(&mut codeword, &[0, 3], &[1, 0]),
            Err(FaultError::ZeroPattern { position: 3 })
        );
        // Nothing is applied when validation fails.
        assert_eq!(codeword, [0; 4]);
    }

    #[test]
    fn mismatched_lengths() {
        let mut codeword = [0u8; 4];
        assert_eq!(
            apply_xor(&mut codeword, &[0, 1], &[1]),
            Err(FaultError::LengthMismatch {
                positions: 2,
                patterns: 1
            })
        );
    }

    #[test]
    fn out_of_range() {
        let mut codeword = [0u8; 4];
        assert_eq!(
            apply_xor(&mut codeword, &[4], &[1]),
            Err(FaultError::OutOfRange {
                position: 4,
                len: 4
            })
        );
    }

    #[test]
    fn duplicate_position() {
        let fault = Fault {
            kind: FaultKind::EightBit2Sym,
            errors: vec![
                SymbolError {
                    position: 2,
                    pattern: 1,
                },
                SymbolError {
                    position: 2,
                    pattern: 2,
                },
            ],
        };
        let mut codeword = [0u8; 4];
        assert_eq!(
            fault.apply(&mut codeword),
            Err(FaultError::DuplicatePosition { position: 2 })
        );
    }

    #[test]
    fn fault_apply() {
        let fault = Fault {
            kind: FaultKind::EightBit2Sym,
            errors: vec![
                SymbolError {
                    position: 2,
                    pattern: 0xaa,
                },
                SymbolError {
                    position: 3,
                    pattern: 0x55,
                },
            ],
        };
        let mut codeword = [0u8; 4];
        fault.apply(&mut codeword).unwrap();
        assert_eq!(codeword, [0, 0, 0xaa, 0x55]);
        assert_eq!(fault.positions().collect::<Vec<_>>(), vec![2, 3]);
    }
}
