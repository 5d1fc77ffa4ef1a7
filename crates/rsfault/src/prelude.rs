pub use crate::classify::{DecodeOutcome, DecodePolicy, classify, positions_contiguous};
pub use crate::config::{CodeConfig, Mode, RunConfig};
pub use crate::counters::{FaultModelCounters, TrialCounters};
pub use crate::encoding::{Codec, Decoded, DecodeFailure, EncodeError, reed_solomon::ReedSolomon};
pub use crate::fault::{Fault, FaultKind, distribution::FaultDistribution};
pub use crate::report::Report;
pub use crate::runner::{RunError, TrialRunner, run};
