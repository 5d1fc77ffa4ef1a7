//! Interpretation of decode attempts.
//!
//! A decoder reporting success is not proof of correctness. The repaired message is compared with
//! the original and, optionally, the reported correction positions are checked for plausibility.

use itertools::Itertools;

use crate::encoding::Codec;

/// Guardrails applied when interpreting decoder output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecodePolicy {
    /// Distrust successful decodes whose corrected positions are not one contiguous run.
    pub enforce_contiguous_locations: bool,
}

/// The result of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeOutcome {
    /// The decoder restored the original message.
    Corrected,
    /// The decoder detected that it could not repair the codeword.
    Uncorrectable,
    /// The decoder claimed success but the data cannot be trusted.
    Silent {
        /// `true` when flagged by [`DecodePolicy::enforce_contiguous_locations`] rather than by a
        /// message mismatch.
        suspect_locations: bool,
    },
}

/// Check if `positions` form a single run of consecutive indices, in any order.
#[must_use]
pub fn positions_contiguous(positions: &[usize]) -> bool {
    positions
        .iter()
        .sorted_unstable()
        .tuple_windows()
        .all(|(a, b)| b - a == 1)
}

/// Decode `corrupted` and classify the result against `original`.
pub fn classify<C>(
    codec: &C,
    corrupted: &[u8],
    original: &[u8],
    policy: DecodePolicy,
) -> DecodeOutcome
where
    C: Codec + ?Sized,
{
    let Ok(decoded) = codec.decode(corrupted) else {
        return DecodeOutcome::Uncorrectable;
    };

    if policy.enforce_contiguous_locations && !positions_contiguous(&decoded.corrected_positions) {
        return DecodeOutcome::Silent {
            suspect_locations: true,
        };
    }

    if decoded.message == original {
        DecodeOutcome::Corrected
    } else {
        DecodeOutcome::Silent {
            suspect_locations: false,
        }
    }
}
