//! Code parameters and run configuration.

use std::fmt;
use std::str::FromStr;

use crate::classify::DecodePolicy;
use crate::fault::distribution::FaultDistribution;

/// Dimensions of a symbol code: `n` total symbols of which the first `k` carry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodeConfig {
    n: usize,
    k: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeConfigError {
    #[error("A code needs at least one data symbol")]
    NoDataSymbols,
    #[error("Total symbols ({n}) must exceed data symbols ({k})")]
    NoEccSymbols { n: usize, k: usize },
    #[error("Expected a code as `n,k`, got {0:?}")]
    Unparseable(String),
}

impl CodeConfig {
    /// The codes evaluated when no selection is made.
    pub const DEFAULTS: [CodeConfig; 4] = [
        CodeConfig::new_unchecked(34, 32),
        CodeConfig::new_unchecked(36, 32),
        CodeConfig::new_unchecked(68, 64),
        CodeConfig::new_unchecked(72, 64),
    ];

    pub fn new(n: usize, k: usize) -> Result<Self, CodeConfigError> {
        if k == 0 {
            return Err(CodeConfigError::NoDataSymbols);
        }
        if n <= k {
            return Err(CodeConfigError::NoEccSymbols { n, k });
        }
        Ok(Self { n, k })
    }

    const fn new_unchecked(n: usize, k: usize) -> Self {
        Self { n, k }
    }

    /// Total number of symbols in a codeword.
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of data symbols.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of parity symbols, `n - k`.
    #[must_use]
    pub fn ecc_symbols(&self) -> usize {
        self.n - self.k
    }
}

impl fmt::Display for CodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RS({},{})", self.n, self.k)
    }
}

impl FromStr for CodeConfig {
    type Err = CodeConfigError;

    /// Parse `"n,k"`, for example `"34,32"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || CodeConfigError::Unparseable(s.to_owned());
        let (n, k) = s.split_once(',').ok_or_else(unparseable)?;
        let n = n.trim().parse().map_err(|_| unparseable())?;
        let k = k.trim().parse().map_err(|_| unparseable())?;
        Self::new(n, k)
    }
}

/// Evaluation strategy of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// A fixed number of uniformly placed symbol errors per trial.
    Random,
    /// Every single symbol error pattern exactly once.
    Exhaustive,
    /// Faults drawn from a [`FaultDistribution`].
    #[default]
    FaultModel,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Random => write!(f, "random"),
            Mode::Exhaustive => write!(f, "exhaustive"),
            Mode::FaultModel => write!(f, "fault-model"),
        }
    }
}

/// Everything needed to run trials over a set of codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    /// Trials per code. Ignored in [`Mode::Exhaustive`].
    pub trials: usize,
    /// `None` draws a seed from the operating system.
    pub seed: Option<u64>,
    /// Symbol errors per trial in [`Mode::Random`]. [`Mode::Exhaustive`] only accepts 1.
    pub errors: usize,
    /// Trials sharing one message and codeword. Values below 1 are treated as 1.
    pub reuse_every: usize,
    pub codes: Vec<CodeConfig>,
    pub distribution: FaultDistribution,
    /// Confine primary faults to the data symbols and allow a linked fault in the parity symbols.
    pub correlated: bool,
    pub policy: DecodePolicy,
    /// Run the codes on the rayon thread pool.
    pub parallel: bool,
}

impl RunConfig {
    #[must_use]
    pub fn reuse_every(&self) -> usize {
        self.reuse_every.max(1)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            trials: 10_000,
            seed: None,
            errors: 1,
            reuse_every: 13,
            codes: CodeConfig::DEFAULTS.to_vec(),
            distribution: FaultDistribution::default(),
            correlated: false,
            policy: DecodePolicy::default(),
            parallel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_ecc_symbols() {
        let ecc: Vec<usize> = CodeConfig::DEFAULTS
            .iter()
            .map(CodeConfig::ecc_symbols)
            .collect();
        assert_eq!(ecc, [2, 4, 4, 8]);
    }

    #[test]
    fn invalid_dimensions() {
        assert_eq!(CodeConfig::new(4, 0), Err(CodeConfigError::NoDataSymbols));
        assert_eq!(
            CodeConfig::new(32, 32),
            Err(CodeConfigError::NoEccSymbols { n: 32, k: 32 })
        );
        assert!(CodeConfig::new(33, 32).is_ok());
    }

    #[test]
    fn parse() {
        assert_eq!("72,64".parse(), Ok(CodeConfig::new_unchecked(72, 64)));
        assert_eq!(" 36 , 32 ".parse(), Ok(CodeConfig::new_unchecked(36, 32)));
        assert!(matches!(
            "72".parse::<CodeConfig>(),
            Err(CodeConfigError::Unparseable(_))
        ));
        assert!(matches!(
            "a,b".parse::<CodeConfig>(),
            Err(CodeConfigError::Unparseable(_))
        ));
        assert_eq!(
            "8,8".parse::<CodeConfig>(),
            Err(CodeConfigError::NoEccSymbols { n: 8, k: 8 })
        );
    }

    #[test]
    fn reuse_is_at_least_one() {
        let config = RunConfig {
            reuse_every: 0,
            ..Default::default()
        };
        assert_eq!(config.reuse_every(), 1);
    }
}
