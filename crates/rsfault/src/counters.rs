//! Tallies of trial outcomes.

use crate::classify::DecodeOutcome;
use crate::config::CodeConfig;
use crate::fault::FaultKind;

/// Outcome counts for one code and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TrialCounters {
    pub total: u64,
    pub corrected: u64,
    pub uncorrectable: u64,
    pub silent: u64,
}

impl TrialCounters {
    pub fn add_corrected(&mut self) {
        self.total += 1;
        self.corrected += 1;
    }

    pub fn add_uncorrectable(&mut self) {
        self.total += 1;
        self.uncorrectable += 1;
    }

    pub fn add_silent(&mut self) {
        self.total += 1;
        self.silent += 1;
    }

    pub fn record(&mut self, outcome: DecodeOutcome) {
        match outcome {
            DecodeOutcome::Corrected => self.add_corrected(),
            DecodeOutcome::Uncorrectable => self.add_uncorrectable(),
            DecodeOutcome::Silent { .. } => self.add_silent(),
        }
    }

    #[must_use]
    pub fn corrected_rate(&self) -> f64 {
        self.corrected as f64 / self.total.max(1) as f64
    }

    #[must_use]
    pub fn uncorrectable_rate(&self) -> f64 {
        self.uncorrectable as f64 / self.total.max(1) as f64
    }

    #[must_use]
    pub fn silent_rate(&self) -> f64 {
        self.silent as f64 / self.total.max(1) as f64
    }

    /// Counts and rates, without the code columns.
    fn columns(&self) -> [String; 7] {
        [
            self.total.to_string(),
            self.corrected.to_string(),
            self.uncorrectable.to_string(),
            self.silent.to_string(),
            format!("{:.6}", self.corrected_rate()),
            format!("{:.6}", self.uncorrectable_rate()),
            format!("{:.6}", self.silent_rate()),
        ]
    }

    /// `n, k, nsym, trials, corrected, uncorrected, silent` and the three rates.
    #[must_use]
    pub fn to_row(&self, config: CodeConfig) -> Vec<String> {
        code_columns(config)
            .into_iter()
            .chain(self.columns())
            .collect()
    }
}

fn code_columns(config: CodeConfig) -> [String; 3] {
    [
        config.n().to_string(),
        config.k().to_string(),
        config.ecc_symbols().to_string(),
    ]
}

/// Outcome counts split by the class of the injected fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaultModelCounters {
    /// Every trial of the run.
    pub total: TrialCounters,
    by_kind: [TrialCounters; 5],
}

impl FaultModelCounters {
    pub fn record(&mut self, kind: FaultKind, outcome: DecodeOutcome) {
        self.total.record(outcome);
        self.by_kind[kind.index()].record(outcome);
    }

    #[must_use]
    pub fn get(&self, kind: FaultKind) -> &TrialCounters {
        &self.by_kind[kind.index()]
    }

    /// All classes in [`FaultKind::ALL`] order, including those never drawn.
    pub fn iter(&self) -> impl Iterator<Item = (FaultKind, &TrialCounters)> {
        FaultKind::ALL.into_iter().zip(&self.by_kind)
    }

    /// One row per fault class, with the class name after the code columns.
    #[must_use]
    pub fn to_rows(&self, config: CodeConfig) -> Vec<Vec<String>> {
        self.iter()
            .map(|(kind, counters)| {
                code_columns(config)
                    .into_iter()
                    .chain([kind.name().to_owned()])
                    .chain(counters.columns())
                    .collect()
            })
            .collect()
    }
}
