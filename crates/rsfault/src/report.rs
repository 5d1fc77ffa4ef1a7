//! CSV output of a finished run.

use std::io;

use itertools::Itertools;

use crate::config::CodeConfig;
use crate::counters::{FaultModelCounters, TrialCounters};

pub const AGGREGATE_HEADER: [&str; 10] = [
    "n",
    "k",
    "nsym",
    "trials",
    "corrected",
    "uncorrected",
    "silent",
    "corrected_rate",
    "uncorrected_rate",
    "silent_rate",
];

pub const FAULT_MODEL_HEADER: [&str; 11] = [
    "n",
    "k",
    "nsym",
    "fault_type",
    "trials",
    "corrected",
    "uncorrected",
    "silent",
    "corrected_rate",
    "uncorrected_rate",
    "silent_rate",
];

/// Counters of every evaluated code, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// One row per code. Produced by the random and exhaustive modes.
    Aggregate(Vec<(CodeConfig, TrialCounters)>),
    /// One row per code and fault class.
    PerFaultType(Vec<(CodeConfig, FaultModelCounters)>),
}

impl Report {
    #[must_use]
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Report::Aggregate(_) => &AGGREGATE_HEADER,
            Report::PerFaultType(_) => &FAULT_MODEL_HEADER,
        }
    }

    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        match self {
            Report::Aggregate(results) => results
                .iter()
                .map(|(config, counters)| counters.to_row(*config))
                .collect(),
            Report::PerFaultType(results) => results
                .iter()
                .flat_map(|(config, counters)| counters.to_rows(*config))
                .collect(),
        }
    }

    /// Run-wide counters of each code.
    #[must_use]
    pub fn totals(&self) -> Vec<(CodeConfig, TrialCounters)> {
        match self {
            Report::Aggregate(results) => results.clone(),
            Report::PerFaultType(results) => results
                .iter()
                .map(|(config, counters)| (*config, counters.total))
                .collect(),
        }
    }

    /// Write the header and all rows, comma separated and newline terminated.
    pub fn write_csv<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.header().iter().join(","))?;
        for row in self.rows() {
            writeln!(writer, "{}", row.iter().join(","))?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DecodeOutcome;
    use crate::fault::FaultKind;

    fn csv(report: &Report) -> String {
        let mut out = Vec::new();
        report.write_csv(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn aggregate() {
        let mut counters = TrialCounters::default();
        counters.add_corrected();
        counters.add_uncorrectable();
        let report = Report::Aggregate(vec![
            (CodeConfig::new(34, 32).unwrap(), counters),
            (CodeConfig::new(72, 64).unwrap(), TrialCounters::default()),
        ]);
        assert_eq!(
            csv(&report),
            "n,k,nsym,trials,corrected,uncorrected,silent,corrected_rate,uncorrected_rate,silent_rate\n\
             34,32,2,2,1,1,0,0.500000,0.500000,0.000000\n\
             72,64,8,0,0,0,0,0.000000,0.000000,0.000000\n"
        );
    }

    #[test]
    fn per_fault_type() {
        let mut counters = FaultModelCounters::default();
        counters.record(FaultKind::OutOfModel, DecodeOutcome::Uncorrectable);
        let report = Report::PerFaultType(vec![(CodeConfig::new(36, 32).unwrap(), counters)]);

        let text = csv(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "n,k,nsym,fault_type,trials,corrected,uncorrected,silent,corrected_rate,uncorrected_rate,silent_rate"
        );
        assert_eq!(
            lines[1],
            "36,32,4,single_bit_1sym,0,0,0,0,0.000000,0.000000,0.000000"
        );
        assert_eq!(
            lines[5],
            "36,32,4,out_of_model,1,0,1,0,0.000000,1.000000,0.000000"
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn totals() {
        let mut counters = FaultModelCounters::default();
        counters.record(FaultKind::SingleBit1Sym, DecodeOutcome::Corrected);
        counters.record(FaultKind::EightBit4Sym, DecodeOutcome::Corrected);
        let config = CodeConfig::new(36, 32).unwrap();
        let report = Report::PerFaultType(vec![(config, counters)]);
        let totals = report.totals();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].0, config);
        assert_eq!(totals[0].1.corrected, 2);
    }
}
