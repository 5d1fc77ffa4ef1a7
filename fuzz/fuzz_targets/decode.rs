#![no_main]

use std::collections::HashSet;

use libfuzzer_sys::{Corpus, arbitrary::Arbitrary, fuzz_target};

use rsfault::fault::apply_xor;
use rsfault::prelude::*;

#[derive(Debug, Arbitrary)]
pub struct Input {
    pub code: u8,
    pub message: Vec<u8>,
    pub faults: Vec<(usize, u8)>,
    pub enforce_contiguous: bool,
}

fuzz_target!(|input: Input| -> Corpus {
    let config = CodeConfig::DEFAULTS[usize::from(input.code) % CodeConfig::DEFAULTS.len()];
    let mut message = input.message;
    message.resize(config.k(), 0);

    let codec = ReedSolomon::new(config).unwrap();
    let mut codeword = codec.encode(&message).unwrap();

    let mut hit = HashSet::new();
    let (positions, patterns): (Vec<usize>, Vec<u8>) = input.faults.iter().copied().unzip();
    for (&position, &pattern) in positions.iter().zip(&patterns) {
        if position >= config.n() || pattern == 0 || !hit.insert(position) {
            return Corpus::Reject;
        }
    }
    apply_xor(&mut codeword, &positions, &patterns).unwrap();

    let policy = DecodePolicy {
        enforce_contiguous_locations: input.enforce_contiguous,
    };
    let outcome = classify(&codec, &codeword, &message, policy);

    // Within capacity the decoder must repair the codeword and report exactly the fault positions.
    if positions.len() <= codec.capacity() {
        let expected = if policy.enforce_contiguous_locations && !positions_contiguous(&positions) {
            DecodeOutcome::Silent {
                suspect_locations: true,
            }
        } else {
            DecodeOutcome::Corrected
        };
        assert_eq!(outcome, expected);
    }

    Corpus::Keep
});
