use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rsfault::classify::DecodePolicy;
use rsfault::config::{CodeConfig, CodeConfigError, Mode, RunConfig};
use rsfault::fault::distribution::FaultDistribution;
use rsfault::runner::RunError;

/// Evaluate Reed-Solomon codes against DRAM subarray fault patterns.
#[derive(Debug, Parser)]
#[command(name = "rsfault", version)]
pub struct Cli {
    /// random: uniform random symbol errors; exhaustive: every single symbol error; fault-model:
    /// DRAM subarray fault distribution.
    #[arg(long, value_enum, default_value_t = ModeArg::FaultModel)]
    pub mode: ModeArg,
    /// Trials per code. Ignored by exhaustive mode.
    #[arg(long, default_value_t = 10_000)]
    pub trials: usize,
    /// Seed for reproducible runs. A random seed is used and logged when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Symbol errors per trial in random mode. Exhaustive mode only accepts 1.
    #[arg(long, default_value_t = 1)]
    pub errors: usize,
    /// Regenerate the message every N trials.
    #[arg(long, default_value_t = 13)]
    pub reuse_every: usize,
    /// Output CSV path, `-` for stdout.
    #[arg(long, default_value = "-")]
    pub csv_out: PathBuf,
    /// Code to evaluate as `n,k`. Repeat to select several, all supported codes by default.
    #[arg(long = "rs-codes", value_parser = parse_supported_code)]
    pub rs_codes: Vec<CodeConfig>,
    /// Fault class weights as `1bit,1sym,2sym,4sym,other`, for example `9000,800,100,50,50`.
    #[arg(long)]
    pub dist: Option<FaultDistribution>,
    /// Confine multi symbol faults to the data symbols and sometimes mirror them into the parity
    /// symbols.
    #[arg(long)]
    pub correlated: bool,
    /// Count successful decodes with non-contiguous corrections as silent corruption.
    #[arg(long)]
    pub enforce_contiguous: bool,
    /// Evaluate the codes in parallel.
    #[arg(long)]
    pub parallel: bool,
    /// Log more. Repeat for more detail. Overridden by `RUST_LOG`.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Random,
    Exhaustive,
    FaultModel,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Random => Mode::Random,
            ModeArg::Exhaustive => Mode::Exhaustive,
            ModeArg::FaultModel => Mode::FaultModel,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0} is not supported, choose from 34,32 36,32 68,64 72,64")]
    UnsupportedCode(CodeConfig),
    #[error(transparent)]
    Code(#[from] CodeConfigError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn parse_supported_code(s: &str) -> Result<CodeConfig, CliError> {
    let code: CodeConfig = s.parse()?;
    if !CodeConfig::DEFAULTS.contains(&code) {
        return Err(CliError::UnsupportedCode(code));
    }
    Ok(code)
}

impl Cli {
    /// Selected codes in the order of [`CodeConfig::DEFAULTS`], without duplicates.
    fn codes(&self) -> Vec<CodeConfig> {
        if self.rs_codes.is_empty() {
            return CodeConfig::DEFAULTS.to_vec();
        }
        CodeConfig::DEFAULTS
            .into_iter()
            .filter(|code| self.rs_codes.contains(code))
            .collect()
    }

    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            mode: self.mode.into(),
            trials: self.trials,
            seed: self.seed,
            errors: self.errors,
            reuse_every: self.reuse_every,
            codes: self.codes(),
            distribution: self.dist.unwrap_or_default(),
            correlated: self.correlated,
            policy: DecodePolicy {
                enforce_contiguous_locations: self.enforce_contiguous,
            },
            parallel: self.parallel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rsfault").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.csv_out, PathBuf::from("-"));
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.run_config(), RunConfig::default());
    }

    #[test]
    fn all_flags() {
        let cli = parse(&[
            "--mode",
            "random",
            "--trials",
            "50",
            "--seed",
            "7",
            "--errors",
            "2",
            "--reuse-every",
            "0",
            "--csv-out",
            "out.csv",
            "--dist",
            "1,2,3,4,5",
            "--correlated",
            "--enforce-contiguous",
            "--parallel",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.csv_out, PathBuf::from("out.csv"));
        assert_eq!(cli.verbose, 2);

        let config = cli.run_config();
        assert_eq!(config.mode, Mode::Random);
        assert_eq!(config.trials, 50);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.errors, 2);
        assert_eq!(config.reuse_every(), 1);
        assert_eq!(config.distribution.total(), 15);
        assert!(config.correlated);
        assert!(config.policy.enforce_contiguous_locations);
        assert!(config.parallel);
    }

    #[test]
    fn codes_follow_default_order() {
        let cli = parse(&[
            "--rs-codes",
            "72,64",
            "--rs-codes",
            "34,32",
            "--rs-codes",
            "72,64",
        ])
        .unwrap();
        assert_eq!(
            cli.run_config().codes,
            [CodeConfig::new(34, 32).unwrap(), CodeConfig::new(72, 64).unwrap()]
        );
    }

    #[test]
    fn unsupported_code() {
        assert!(parse(&["--rs-codes", "40,32"]).is_err());
        assert!(parse(&["--rs-codes", "34"]).is_err());
        assert!(matches!(
            parse_supported_code("40,32"),
            Err(CliError::UnsupportedCode(_))
        ));
    }

    #[test]
    fn bad_distribution() {
        assert!(parse(&["--dist", "1,2,3"]).is_err());
        assert!(parse(&["--dist", "1,2,x,4,5"]).is_err());
        assert!(parse(&["--dist", "0,0,0,0,0"]).is_err());
    }

    #[test]
    fn bad_mode() {
        assert!(parse(&["--mode", "burst"]).is_err());
        assert_eq!(
            parse(&["--mode", "exhaustive"]).unwrap().run_config().mode,
            Mode::Exhaustive
        );
    }
}
