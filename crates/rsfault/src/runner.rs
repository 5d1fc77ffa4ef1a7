//! Trial loops for the three evaluation modes.
//!
//! Every code of a run gets its own [`StdRng`] seeded with the run seed, so a code produces the
//! same counters whether it runs alone, after other codes, or on another thread.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug_span, info, trace};

use crate::classify::{DecodePolicy, classify};
use crate::config::{CodeConfig, Mode, RunConfig};
use crate::counters::{FaultModelCounters, TrialCounters};
use crate::encoding::reed_solomon::{CodewordTooLong, ReedSolomon};
use crate::encoding::{Codec, EncodeError};
use crate::fault::generator::FaultGenerator;
use crate::fault::{FaultError, RandomPicker, apply_xor};
use crate::report::Report;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Code(#[from] CodewordTooLong),
    #[error("Failed to encode a message")]
    Encode(#[from] EncodeError),
    #[error("Failed to inject a fault")]
    Fault(#[from] FaultError),
    #[error("Exhaustive mode injects exactly one symbol error per trial, got {requested}")]
    ExhaustiveRequiresSingleError { requested: usize },
}

/// A message and its codeword, shared by `every` consecutive trials.
struct Reused {
    message: Vec<u8>,
    codeword: Vec<u8>,
    every: usize,
}

impl Reused {
    fn new(data_symbols: usize, every: usize) -> Self {
        Self {
            message: vec![0; data_symbols],
            codeword: Vec::new(),
            every: every.max(1),
        }
    }

    /// Draw a new message on the first trial and every `every` trials after that.
    fn refresh<C, R>(&mut self, trial: usize, codec: &C, rng: &mut R) -> Result<(), EncodeError>
    where
        C: Codec + ?Sized,
        R: Rng,
    {
        if trial % self.every == 0 {
            rng.fill(self.message.as_mut_slice());
            self.codeword = codec.encode(&self.message)?;
            trace!(trial, "new message");
        }
        Ok(())
    }
}

/// Runs trials against one codec.
pub struct TrialRunner<'a, C: ?Sized> {
    codec: &'a C,
    reuse_every: usize,
    policy: DecodePolicy,
}

impl<'a, C> TrialRunner<'a, C>
where
    C: Codec + ?Sized,
{
    #[must_use]
    pub fn new(codec: &'a C, reuse_every: usize, policy: DecodePolicy) -> Self {
        Self {
            codec,
            reuse_every,
            policy,
        }
    }

    /// `trials` codewords, each with `errors` symbol errors at distinct uniformly drawn positions.
    ///
    /// `errors` is clamped to `1..=n`.
    pub fn random<R: Rng>(
        &self,
        rng: &mut R,
        trials: usize,
        errors: usize,
    ) -> Result<TrialCounters, RunError> {
        let n = self.codec.total_symbols();
        let errors = errors.max(1).min(n);

        let mut reused = Reused::new(self.codec.data_symbols(), self.reuse_every);
        let mut counters = TrialCounters::default();
        let mut corrupted = Vec::with_capacity(n);
        for trial in 0..trials {
            reused.refresh(trial, self.codec, rng)?;

            let positions: Vec<usize> = RandomPicker::new(0..n, &mut *rng).take(errors).collect();
            let patterns: Vec<u8> = positions
                .iter()
                .map(|_| rng.random_range(1..=u8::MAX))
                .collect();

            corrupted.clone_from(&reused.codeword);
            apply_xor(&mut corrupted, &positions, &patterns)?;
            counters.record(classify(self.codec, &corrupted, &reused.message, self.policy));
        }
        Ok(counters)
    }

    /// Every single symbol error against one random message: `n * 255` trials.
    pub fn exhaustive<R: Rng>(&self, rng: &mut R) -> Result<TrialCounters, RunError> {
        let n = self.codec.total_symbols();
        let mut reused = Reused::new(self.codec.data_symbols(), 1);
        reused.refresh(0, self.codec, rng)?;

        let mut counters = TrialCounters::default();
        let mut corrupted = Vec::with_capacity(n);
        for position in 0..n {
            for pattern in 1..=u8::MAX {
                corrupted.clone_from(&reused.codeword);
                apply_xor(&mut corrupted, &[position], &[pattern])?;
                counters.record(classify(self.codec, &corrupted, &reused.message, self.policy));
            }
        }
        Ok(counters)
    }

    /// `trials` codewords, each corrupted by one fault from `generator`.
    pub fn fault_model<R: Rng>(
        &self,
        rng: &mut R,
        trials: usize,
        generator: &FaultGenerator,
    ) -> Result<FaultModelCounters, RunError> {
        let mut reused = Reused::new(self.codec.data_symbols(), self.reuse_every);
        let mut counters = FaultModelCounters::default();
        let mut corrupted = Vec::with_capacity(self.codec.total_symbols());
        for trial in 0..trials {
            reused.refresh(trial, self.codec, rng)?;

            let fault = generator.generate(rng);
            corrupted.clone_from(&reused.codeword);
            fault.apply(&mut corrupted)?;

            let outcome = classify(self.codec, &corrupted, &reused.message, self.policy);
            trace!(trial, kind = %fault.kind, ?outcome);
            counters.record(fault.kind, outcome);
        }
        Ok(counters)
    }
}

/// Run `config.mode` over every code of `config` with a Reed-Solomon codec.
pub fn run(config: &RunConfig) -> Result<Report, RunError> {
    if config.mode == Mode::Exhaustive && config.errors != 1 {
        return Err(RunError::ExhaustiveRequiresSingleError {
            requested: config.errors,
        });
    }

    let seed = config.seed.unwrap_or_else(|| {
        let seed = StdRng::from_os_rng().random();
        info!(seed, "no seed given, using a random one");
        seed
    });

    let report = match config.mode {
        Mode::Random => Report::Aggregate(for_each_code(config, seed, |runner, _, rng| {
            runner.random(rng, config.trials, config.errors)
        })?),
        Mode::Exhaustive => Report::Aggregate(for_each_code(config, seed, |runner, _, rng| {
            runner.exhaustive(rng)
        })?),
        Mode::FaultModel => Report::PerFaultType(for_each_code(config, seed, |runner, code, rng| {
            let generator = FaultGenerator::new(code, config.distribution, config.correlated);
            runner.fault_model(rng, config.trials, &generator)
        })?),
    };

    for (code, counters) in report.totals() {
        info!(
            %code,
            trials = counters.total,
            corrected = counters.corrected,
            uncorrectable = counters.uncorrectable,
            silent = counters.silent,
            "finished"
        );
    }
    Ok(report)
}

/// Evaluate every code with a fresh rng, keeping the order of `config.codes`.
fn for_each_code<T, F>(
    config: &RunConfig,
    seed: u64,
    trials: F,
) -> Result<Vec<(CodeConfig, T)>, RunError>
where
    T: Send,
    F: Fn(&TrialRunner<'_, ReedSolomon>, CodeConfig, &mut StdRng) -> Result<T, RunError> + Sync,
{
    let evaluate = |code: &CodeConfig| -> Result<(CodeConfig, T), RunError> {
        let _span = debug_span!("run", mode = %config.mode, n = code.n(), k = code.k()).entered();
        let codec = ReedSolomon::new(*code)?;
        let runner = TrialRunner::new(&codec, config.reuse_every(), config.policy);
        let mut rng = StdRng::seed_from_u64(seed);
        trials(&runner, *code, &mut rng).map(|counters| (*code, counters))
    };

    if config.parallel {
        config.codes.par_iter().map(evaluate).collect()
    } else {
        config.codes.iter().map(evaluate).collect()
    }
}
