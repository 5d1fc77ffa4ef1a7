//! Arithmetic in GF(2^8) with the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1.

const PRIMITIVE_POLYNOMIAL: u16 = 0x11d;

/// Number of nonzero elements in the field.
pub const ORDER: usize = 255;

/// Exponent and logarithm tables.
struct Tables {
    /// `exp[i]` is alpha^i. Doubled so sums of two logarithms need no reduction.
    exp: [u8; 2 * ORDER + 2],
    /// `log[x]` is `i` such that alpha^i = x. `log[0]` is meaningless.
    log: [u8; 256],
}

impl Tables {
    const fn build() -> Self {
        let mut exp = [0u8; 2 * ORDER + 2];
        let mut log = [0u8; 256];

        let mut x: u16 = 1;
        let mut i = 0;
        while i < ORDER {
            exp[i] = x as u8;
            exp[i + ORDER] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIMITIVE_POLYNOMIAL;
            }
            i += 1;
        }
        exp[2 * ORDER] = 1;
        exp[2 * ORDER + 1] = exp[1];

        Self { exp, log }
    }
}

static TABLES: Tables = Tables::build();

/// alpha^power for any power.
#[inline]
#[must_use]
pub fn alpha_pow(power: usize) -> u8 {
    TABLES.exp[power % ORDER]
}

#[inline]
#[must_use]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    TABLES.exp[TABLES.log[a as usize] as usize + TABLES.log[b as usize] as usize]
}

/// # Panics
///
/// If `b` is 0.
#[inline]
#[must_use]
pub fn div(a: u8, b: u8) -> u8 {
    assert!(b != 0, "division by zero in GF(256)");
    if a == 0 {
        return 0;
    }
    let log_a = TABLES.log[a as usize] as usize;
    let log_b = TABLES.log[b as usize] as usize;
    TABLES.exp[log_a + ORDER - log_b]
}

/// # Panics
///
/// If `a` is 0.
#[inline]
#[must_use]
pub fn inv(a: u8) -> u8 {
    assert!(a != 0, "inverse of zero in GF(256)");
    TABLES.exp[ORDER - TABLES.log[a as usize] as usize]
}

/// Multiply two polynomials stored lowest degree first.
#[must_use]
pub fn poly_mul(p: &[u8], q: &[u8]) -> Vec<u8> {
    if p.is_empty() || q.is_empty() {
        return Vec::new();
    }
    let mut product = vec![0u8; p.len() + q.len() - 1];
    for (i, &a) in p.iter().enumerate() {
        for (j, &b) in q.iter().enumerate() {
            product[i + j] ^= mul(a, b);
        }
    }
    product
}

/// Evaluate a polynomial stored lowest degree first using Horner's rule.
#[must_use]
pub fn poly_eval(poly: &[u8], x: u8) -> u8 {
    poly.iter().rev().fold(0, |acc, &coefficient| mul(acc, x) ^ coefficient)
}
