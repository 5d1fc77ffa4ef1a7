//! Weighted choice between the fault classes.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::FaultKind;

/// Relative frequencies of the fault classes, in the order of [`FaultKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaultDistribution {
    weights: [u64; 5],
    total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DistributionError {
    #[error("Expected exactly 5 weights (1bit,1sym,2sym,4sym,other), got {0}")]
    WrongArity(usize),
    #[error("Weight {index} is not an integer: {value:?}")]
    NotAnInteger { index: usize, value: String },
    #[error("Weight {index} is negative: {value}")]
    Negative { index: usize, value: i64 },
    #[error("The weights sum to zero so no fault class can be drawn")]
    Empty,
    #[error("The weights sum past {}", u64::MAX)]
    Overflow,
}

impl FaultDistribution {
    pub const DEFAULT_WEIGHTS: [u64; 5] = [9000, 800, 100, 50, 50];

    pub fn new(weights: [u64; 5]) -> Result<Self, DistributionError> {
        let total = weights
            .iter()
            .try_fold(0u64, |acc, &w| acc.checked_add(w))
            .ok_or(DistributionError::Overflow)?;
        if total == 0 {
            return Err(DistributionError::Empty);
        }
        Ok(Self { weights, total })
    }

    #[must_use]
    pub fn weight(&self, kind: FaultKind) -> u64 {
        self.weights[kind.index()]
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Fraction of draws expected to land on `kind`.
    #[must_use]
    pub fn share(&self, kind: FaultKind) -> f64 {
        self.weight(kind) as f64 / self.total as f64
    }

    /// The class selected by a draw `s` in `1..=total`.
    ///
    /// Classes are walked in [`FaultKind::ALL`] order and the first one whose cumulative weight
    /// reaches `s` wins.
    ///
    /// # Panics
    ///
    /// If `s` is outside `1..=total`.
    #[must_use]
    pub fn kind_for_draw(&self, s: u64) -> FaultKind {
        assert!(
            (1..=self.total).contains(&s),
            "draw {s} is outside 1..={}",
            self.total
        );
        let mut cumulative = 0;
        for kind in FaultKind::ALL {
            cumulative += self.weight(kind);
            if s <= cumulative {
                return kind;
            }
        }
        unreachable!("cumulative weights end at the total")
    }

    /// Draw a fault class. Consumes exactly one value from `rng`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> FaultKind {
        self.kind_for_draw(rng.random_range(1..=self.total))
    }

    /// A human readable overview of the weights.
    #[must_use]
    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }
}

impl Default for FaultDistribution {
    fn default() -> Self {
        let weights = Self::DEFAULT_WEIGHTS;
        Self {
            weights,
            total: weights.iter().sum(),
        }
    }
}

impl TryFrom<&[i64]> for FaultDistribution {
    type Error = DistributionError;

    /// Build from `(1bit, 1sym, 2sym, 4sym, other)`.
    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        let values: &[i64; 5] = values
            .try_into()
            .map_err(|_| DistributionError::WrongArity(values.len()))?;

        let mut weights = [0u64; 5];
        for (index, (&value, weight)) in values.iter().zip(&mut weights).enumerate() {
            *weight = u64::try_from(value).map_err(|_| DistributionError::Negative { index, value })?;
        }
        Self::new(weights)
    }
}

impl FromStr for FaultDistribution {
    type Err = DistributionError;

    /// Parse comma separated weights, for example `"9000,800,100,50,50"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 5 {
            return Err(DistributionError::WrongArity(parts.len()));
        }

        let values = parts
            .iter()
            .enumerate()
            .map(|(index, part)| {
                part.parse::<i64>()
                    .map_err(|_| DistributionError::NotAnInteger {
                        index,
                        value: (*part).to_owned(),
                    })
            })
            .collect::<Result<Vec<i64>, _>>()?;

        Self::try_from(values.as_slice())
    }
}

/// See [`FaultDistribution::summary`].
pub struct Summary<'a>(&'a FaultDistribution);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let distribution = self.0;
        writeln!(f, "Fault Distribution:")?;
        writeln!(f, "  Total: {}", distribution.total())?;
        for kind in FaultKind::ALL {
            writeln!(
                f,
                "  {}: {} ({:.3}%) - {}",
                kind,
                distribution.weight(kind),
                100.0 * distribution.share(kind),
                kind.description()
            )?;
        }
        Ok(())
    }
}
