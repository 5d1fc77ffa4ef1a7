//! Systematic Reed-Solomon codes over GF(2^8).
//!
//! A codeword is `[message | parity]`. Symbol `i` of an `n` symbol codeword is the coefficient of
//! x^(n - 1 - i), so the first message symbol is the highest degree term. The generator roots are
//! alpha^0 ..= alpha^(n - k - 1).

use tracing::trace;

use super::gf256::{self, alpha_pow};
use super::{Codec, DecodeFailure, Decoded, EncodeError};
use crate::config::CodeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Reed-Solomon codes over GF(256) have at most {max} symbols, got {actual}", max = gf256::ORDER)]
pub struct CodewordTooLong {
    pub actual: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReedSolomon {
    config: CodeConfig,
    /// Generator polynomial, lowest degree first. Monic with degree `n - k`.
    generator: Vec<u8>,
}

impl ReedSolomon {
    pub fn new(config: CodeConfig) -> Result<Self, CodewordTooLong> {
        if config.n() > gf256::ORDER {
            return Err(CodewordTooLong {
                actual: config.n(),
            });
        }

        let generator = (0..config.ecc_symbols())
            .fold(vec![1u8], |g, i| gf256::poly_mul(&g, &[alpha_pow(i), 1]));

        Ok(Self { config, generator })
    }

    #[must_use]
    pub fn config(&self) -> CodeConfig {
        self.config
    }

    /// Maximum number of symbol errors this code can correct.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.config.ecc_symbols() / 2
    }

    /// `S_j = r(alpha^j)` for every generator root.
    fn syndromes(&self, codeword: &[u8]) -> Vec<u8> {
        let n = codeword.len();
        (0..self.config.ecc_symbols())
            .map(|j| {
                codeword.iter().enumerate().fold(0u8, |s, (i, &symbol)| {
                    s ^ gf256::mul(symbol, alpha_pow(j * (n - 1 - i)))
                })
            })
            .collect()
    }

    /// Codeword positions whose locator X = alpha^(n - 1 - position) satisfies sigma(X^-1) = 0.
    fn chien_search(&self, sigma: &[u8]) -> Vec<usize> {
        let n = self.config.n();
        (0..n)
            .filter(|&position| {
                let x_inv = alpha_pow(gf256::ORDER - (n - 1 - position) % gf256::ORDER);
                gf256::poly_eval(sigma, x_inv) == 0
            })
            .collect()
    }
}

/// Find the shortest linear feedback shift register generating the syndromes.
///
/// The result is the error locator sigma(x) = prod(1 - X_j x), lowest degree first, with trailing
/// zero coefficients removed.
fn berlekamp_massey(syndromes: &[u8]) -> Vec<u8> {
    let mut current = vec![1u8];
    let mut previous = vec![1u8];
    let mut length = 0usize;
    let mut shift = 1usize;
    let mut previous_discrepancy = 1u8;

    for r in 0..syndromes.len() {
        let discrepancy = (1..=length.min(current.len() - 1))
            .fold(syndromes[r], |acc, i| acc ^ gf256::mul(current[i], syndromes[r - i]));

        if discrepancy == 0 {
            shift += 1;
            continue;
        }

        let scale = gf256::div(discrepancy, previous_discrepancy);
        let before_update = current.clone();
        if current.len() < previous.len() + shift {
            current.resize(previous.len() + shift, 0);
        }
        for (i, &b) in previous.iter().enumerate() {
            current[i + shift] ^= gf256::mul(scale, b);
        }

        if 2 * length <= r {
            length = r + 1 - length;
            previous = before_update;
            previous_discrepancy = discrepancy;
            shift = 1;
        } else {
            shift += 1;
        }
    }

    while current.len() > 1 && current.last() == Some(&0) {
        current.pop();
    }
    current
}

/// Error magnitudes at `positions` using Forney's formula.
fn forney(syndromes: &[u8], sigma: &[u8], positions: &[usize], n: usize) -> Vec<u8> {
    let ecc_symbols = syndromes.len();

    // Omega(x) = S(x) sigma(x) mod x^ecc_symbols
    let mut omega = vec![0u8; ecc_symbols];
    for (i, coefficient) in omega.iter_mut().enumerate() {
        for (j, &s) in sigma.iter().enumerate().take(i + 1) {
            *coefficient ^= gf256::mul(syndromes[i - j], s);
        }
    }

    // Only odd degree terms survive the formal derivative in characteristic 2.
    let mut sigma_prime = vec![0u8; sigma.len()];
    for i in (1..sigma.len()).step_by(2) {
        sigma_prime[i - 1] = sigma[i];
    }

    positions
        .iter()
        .map(|&position| {
            let exponent = (n - 1 - position) % gf256::ORDER;
            let x = alpha_pow(exponent);
            let x_inv = gf256::inv(x);
            let denominator = gf256::poly_eval(&sigma_prime, x_inv);
            if denominator == 0 {
                0
            } else {
                gf256::mul(x, gf256::div(gf256::poly_eval(&omega, x_inv), denominator))
            }
        })
        .collect()
}

impl Codec for ReedSolomon {
    fn data_symbols(&self) -> usize {
        self.config.k()
    }

    fn total_symbols(&self) -> usize {
        self.config.n()
    }

    fn encode(&self, message: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let k = self.config.k();
        let ecc_symbols = self.config.ecc_symbols();
        if message.len() != k {
            return Err(EncodeError::LengthMismatch {
                expected: k,
                actual: message.len(),
            });
        }

        // Synthetic division of message(x) x^ecc_symbols by the monic generator.
        let mut codeword = vec![0u8; self.config.n()];
        codeword[..k].copy_from_slice(message);
        for i in 0..k {
            let coefficient = codeword[i];
            if coefficient == 0 {
                continue;
            }
            for j in 1..=ecc_symbols {
                codeword[i + j] ^= gf256::mul(self.generator[ecc_symbols - j], coefficient);
            }
        }
        codeword[..k].copy_from_slice(message);

        Ok(codeword)
    }

    fn decode(&self, codeword: &[u8]) -> Result<Decoded, DecodeFailure> {
        let n = self.config.n();
        let k = self.config.k();
        assert_eq!(
            codeword.len(),
            n,
            "expected a codeword of {n} symbols, got {}",
            codeword.len()
        );

        let syndromes = self.syndromes(codeword);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(Decoded {
                message: codeword[..k].to_vec(),
                corrected_positions: Vec::new(),
            });
        }

        let sigma = berlekamp_massey(&syndromes);
        let errors = sigma.len() - 1;
        if errors == 0 {
            return Err(DecodeFailure::DegenerateLocator);
        }
        if errors > self.capacity() {
            return Err(DecodeFailure::TooManyErrors {
                errors,
                capacity: self.capacity(),
            });
        }

        let positions = self.chien_search(&sigma);
        if positions.len() != errors {
            return Err(DecodeFailure::LocatorMismatch {
                expected: errors,
                found: positions.len(),
            });
        }

        let magnitudes = forney(&syndromes, &sigma, &positions, n);
        let mut corrected = codeword.to_vec();
        for (&position, &magnitude) in positions.iter().zip(&magnitudes) {
            corrected[position] ^= magnitude;
        }

        if self.syndromes(&corrected).iter().any(|&s| s != 0) {
            return Err(DecodeFailure::VerificationFailed);
        }

        trace!(?positions, "corrected codeword");
        corrected.truncate(k);
        Ok(Decoded {
            message: corrected,
            corrected_positions: positions,
        })
    }
}
