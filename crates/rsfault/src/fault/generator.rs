//! Turns a sampled [`FaultKind`] into concrete corrupted symbols.
//!
//! Random values are drawn in a fixed order so a seeded run is reproducible:
//!
//! 1. the class, see [`FaultDistribution::sample`],
//! 2. the primary positions (window start, run length or scattered picks),
//! 3. one pattern per primary position, in position order,
//! 4. with correlation enabled, the correlation coin, then the secondary window and its patterns.

use std::ops::Range;

use rand::Rng;

use super::distribution::FaultDistribution;
use super::{Fault, FaultKind, RandomPicker, SymbolError};
use crate::config::CodeConfig;

/// Shape of a contiguous fault, used to mirror it into the parity symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    width: usize,
    alignment: usize,
    /// Mirrored to the first parity symbols instead of a random aligned offset.
    anchored: bool,
}

/// Generates faults for one code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultGenerator {
    config: CodeConfig,
    distribution: FaultDistribution,
    correlated: bool,
}

fn random_bit<R: Rng>(rng: &mut R) -> u8 {
    1u8 << rng.random_range(0..8u32)
}

/// Place `window` at a random aligned offset inside `base..base + len`.
///
/// If the window does not fit it is truncated to the whole segment and nothing is drawn.
fn place<R: Rng>(rng: &mut R, base: usize, len: usize, window: Window) -> Range<usize> {
    if len < window.width {
        return base..base + len;
    }
    let starts = (len - window.width) / window.alignment + 1;
    let start = base + window.alignment * rng.random_range(0..starts);
    start..start + window.width
}

fn with_patterns<R: Rng>(
    rng: &mut R,
    positions: impl IntoIterator<Item = usize>,
) -> Vec<SymbolError> {
    positions
        .into_iter()
        .map(|position| SymbolError {
            position,
            pattern: rng.random_range(1..=u8::MAX),
        })
        .collect()
}

impl FaultGenerator {
    #[must_use]
    pub fn new(config: CodeConfig, distribution: FaultDistribution, correlated: bool) -> Self {
        Self {
            config,
            distribution,
            correlated,
        }
    }

    /// Draw the next fault.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Fault {
        let kind = self.distribution.sample(rng);
        let correlated = self.correlated && kind != FaultKind::SingleBit1Sym;

        // Correlated faults start in the data symbols and may spill into the parity symbols.
        let region = if correlated {
            self.config.k()
        } else {
            self.config.n()
        };

        let (mut errors, window) = match kind {
            FaultKind::SingleBit1Sym => {
                let position = rng.random_range(0..region);
                let pattern = random_bit(rng);
                (vec![SymbolError { position, pattern }], None)
            }
            FaultKind::EightBit1Sym => Self::contiguous(rng, region, 1, 1),
            FaultKind::EightBit2Sym => Self::contiguous(rng, region, 2, 2),
            FaultKind::EightBit4Sym => Self::contiguous(rng, region, 4, 4),
            FaultKind::OutOfModel => {
                if rng.random_bool(0.5) {
                    let width = rng.random_range(5..=6);
                    let (errors, window) = Self::contiguous(rng, region, width, 1);
                    let window = window.map(|window| Window {
                        anchored: true,
                        ..window
                    });
                    (errors, window)
                } else {
                    (Self::scattered(rng, region), None)
                }
            }
        };

        if let (true, Some(window)) = (correlated, window) {
            errors.extend(self.correlated_errors(rng, window));
        }

        Fault { kind, errors }
    }

    fn contiguous<R: Rng>(
        rng: &mut R,
        region: usize,
        width: usize,
        alignment: usize,
    ) -> (Vec<SymbolError>, Option<Window>) {
        let window = Window {
            width,
            alignment,
            anchored: false,
        };
        let positions = place(rng, 0, region, window);
        let window = Window {
            width: positions.len(),
            ..window
        };
        (with_patterns(rng, positions), Some(window))
    }

    /// 4 to 8 distinct positions anywhere in `0..region`.
    fn scattered<R: Rng>(rng: &mut R, region: usize) -> Vec<SymbolError> {
        let count = if region < 4 {
            region
        } else {
            rng.random_range(4..=region.min(8))
        };
        let positions: Vec<usize> = RandomPicker::new(0..region, &mut *rng)
            .take(count)
            .collect();
        with_patterns(rng, positions)
    }

    /// A fault in the parity symbols linked to a primary fault of shape `window`.
    ///
    /// Happens with probability `ecc_symbols / k`. Anchored windows always start at `k` and are
    /// cut to the parity segment.
    fn correlated_errors<R: Rng>(&self, rng: &mut R, window: Window) -> Vec<SymbolError> {
        let k = self.config.k();
        let ecc_symbols = self.config.ecc_symbols();
        let probability = ecc_symbols as f64 / k as f64;
        if rng.random::<f64>() >= probability {
            return Vec::new();
        }

        let positions = if window.anchored {
            k..k + window.width.min(ecc_symbols)
        } else {
            place(rng, k, ecc_symbols, window)
        };
        with_patterns(rng, positions)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn config() -> impl Strategy<Value = CodeConfig> {
        (1usize..=80, 1usize..=16).prop_map(|(k, ecc)| CodeConfig::new(k + ecc, k).unwrap())
    }

    fn distribution() -> impl Strategy<Value = FaultDistribution> {
        prop::array::uniform5(0u64..100)
            .prop_filter("at least one class", |w| w.iter().any(|&x| x > 0))
            .prop_map(|w| FaultDistribution::new(w).unwrap())
    }

    proptest! {
        #[test]
        fn faults_respect_the_model(
            config in config(),
            distribution in distribution(),
            correlated in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let generator = FaultGenerator::new(config, distribution, correlated);
            let mut rng = StdRng::seed_from_u64(seed);
            let (n, k) = (config.n(), config.k());

            for _ in 0..64 {
                let fault = generator.generate(&mut rng);
                prop_assert!(distribution.weight(fault.kind) > 0);
                prop_assert!(!fault.errors.is_empty());

                let mut positions: Vec<usize> = fault.positions().collect();
                prop_assert!(positions.iter().all(|&p| p < n));
                prop_assert!(fault.errors.iter().all(|e| e.pattern != 0));

                let region = if correlated && fault.kind != FaultKind::SingleBit1Sym { k } else { n };
                let primary: Vec<usize> = positions.iter().copied().filter(|&p| p < region).collect();
                match fault.kind {
                    FaultKind::SingleBit1Sym => {
                        prop_assert_eq!(fault.errors.len(), 1);
                        prop_assert_eq!(fault.errors[0].pattern.count_ones(), 1);
                    }
                    FaultKind::EightBit2Sym if region >= 2 => {
                        prop_assert_eq!(primary[0] % 2, 0);
                    }
                    FaultKind::EightBit4Sym if region >= 4 => {
                        prop_assert_eq!(primary[0] % 4, 0);
                    }
                    _ => {}
                }
                if !correlated {
                    prop_assert_eq!(primary.len(), fault.errors.len());
                }
                if correlated {
                    prop_assert!(positions.iter().filter(|&&p| p >= k).count() <= n - k);
                }

                positions.sort_unstable();
                positions.dedup();
                prop_assert_eq!(positions.len(), fault.errors.len());
            }
        }

        #[test]
        fn seeded_generation_is_reproducible(config in config(), seed in any::<u64>()) {
            let generator = FaultGenerator::new(config, FaultDistribution::default(), true);
            let mut a = StdRng::seed_from_u64(seed);
            let mut b = StdRng::seed_from_u64(seed);
            for _ in 0..32 {
                prop_assert_eq!(generator.generate(&mut a), generator.generate(&mut b));
            }
        }
    }
}
