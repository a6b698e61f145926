//! Radix, byte-string, and arbitrary-precision integer primitives shared
//! by every Feistel driver.
//!
//! Everything here is purely functional: no operation mutates its inputs,
//! and nothing retains state between calls.

use crate::error::FpeError;
use crate::result::Result;

use num_bigint::{BigInt, BigUint};
use num_traits::{Euclid, One, Signed, ToPrimitive, Zero};

/// Lower bound on a symbol array's length, shared by every driver.
pub const MINLEN: usize = 2;
/// Upper bound on a symbol array's length. Matches FF1's `2**32 - 1`,
/// the widest length any construction here allows.
pub const MAXLEN: usize = (1u64 << 32) as usize - 1;
/// Lower bound on a radix.
pub const MINRADIX: u32 = 2;
/// Upper bound on a radix, inclusive.
pub const MAXRADIX: u32 = 1 << 16;

/// A symbol in `[0, radix)`.
pub type Symbol = u32;

pub fn validate_radix(radix: u32) -> Result<()> {
    if radix < MINRADIX || radix > MAXRADIX {
        return Err(FpeError::invalid_argument(format!(
            "radix must be between {} and {}, got {}",
            MINRADIX, MAXRADIX, radix
        )));
    }
    Ok(())
}

/// Interpret `x` as a big-endian numeral string in base `radix`.
pub fn num(x: &[Symbol], radix: u32) -> Result<BigUint> {
    validate_radix(radix)?;
    if x.is_empty() || x.len() > MAXLEN {
        return Err(FpeError::invalid_argument(format!(
            "symbol array length must be between 1 and {}, got {}",
            MAXLEN,
            x.len()
        )));
    }

    let r = BigUint::from(radix);
    let mut acc = BigUint::zero();
    for &d in x {
        if d >= radix {
            return Err(FpeError::invalid_argument(format!(
                "symbol {} out of range for radix {}",
                d, radix
            )));
        }
        acc = acc * &r + BigUint::from(d);
    }
    Ok(acc)
}

/// Interpret a byte sequence as a nonnegative big-endian integer.
pub fn num_bytes(b: &[u8]) -> Result<BigUint> {
    if b.is_empty() || b.len() > MAXLEN {
        return Err(FpeError::invalid_argument(format!(
            "byte sequence length must be between 1 and {}, got {}",
            MAXLEN,
            b.len()
        )));
    }
    Ok(BigUint::from_bytes_be(b))
}

/// Inverse of [`num`]: produce an `m`-element array with leading zeros.
pub fn str(x: &BigUint, radix: u32, m: usize) -> Result<Vec<Symbol>> {
    validate_radix(radix)?;
    if m == 0 || m > MAXLEN {
        return Err(FpeError::invalid_argument(format!(
            "output length must be between 1 and {}, got {}",
            MAXLEN, m
        )));
    }

    let r = BigUint::from(radix);
    let limit = r.pow(m as u32);
    if x >= &limit {
        return Err(FpeError::invalid_argument(
            "value does not fit in the requested number of digits",
        ));
    }

    let mut digits = vec![0 as Symbol; m];
    let mut acc = x.clone();
    for slot in digits.iter_mut().rev() {
        let rem = &acc % &r;
        acc = &acc / &r;
        *slot = rem.to_u32().expect("remainder below radix fits in u32");
    }
    Ok(digits)
}

/// Reverse the order of a symbol array.
pub fn rev(x: &[Symbol]) -> Vec<Symbol> {
    x.iter().rev().copied().collect()
}

/// Reverse the order of a byte sequence.
pub fn revb(b: &[u8]) -> Vec<u8> {
    b.iter().rev().copied().collect()
}

/// Element-wise byte xor; requires equal, nonempty lengths.
pub fn xor(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    if a.is_empty() || a.len() != b.len() {
        return Err(FpeError::invalid_argument(
            "xor operands must have equal, nonzero length",
        ));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x ^ y).collect())
}

/// Euclidean (nonnegative) remainder of `a mod m`.
pub fn modulo(a: &BigInt, m: &BigInt) -> Result<BigUint> {
    if !m.is_positive() {
        return Err(FpeError::arithmetic_error(
            "modulus must be strictly positive",
        ));
    }
    Ok(a.rem_euclid(m).to_biguint().expect("rem_euclid is nonnegative"))
}

/// Encode a nonnegative integer as exactly `s` big-endian bytes.
pub fn bytestring(x: &BigUint, s: usize) -> Result<Vec<u8>> {
    let limit = BigUint::from(256u32).pow(s as u32);
    if x >= &limit {
        return Err(FpeError::invalid_argument(format!(
            "value does not fit in {} bytes",
            s
        )));
    }
    if s == 0 {
        return Ok(Vec::new());
    }

    let raw = if x.is_zero() {
        Vec::new()
    } else {
        x.to_bytes_be()
    };
    let mut out = vec![0u8; s - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}

pub fn log2(x: f64) -> f64 {
    x.log2()
}

pub fn floor(x: f64) -> f64 {
    x.floor()
}

pub fn ceiling(x: f64) -> f64 {
    x.ceil()
}

/// Join two sequences.
pub fn concatenate<T: Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

/// Product of a per-position radix vector; rejects a zero element.
pub fn product(w: &[u32]) -> Result<BigUint> {
    let mut p = BigUint::one();
    for &wi in w {
        if wi == 0 {
            return Err(FpeError::arithmetic_error(
                "radix vector elements must be positive",
            ));
        }
        p *= BigUint::from(wi);
    }
    Ok(p)
}

/// Prime factors (with multiplicity) of every element of `w`, found via
/// a smallest-prime-factor sieve over `[2, max(w)]`.
pub fn factors(w: &[u32]) -> Result<Vec<u32>> {
    let Some(&max) = w.iter().max() else {
        return Err(FpeError::invalid_argument("radix vector must be nonempty"));
    };
    if max < 2 {
        return Err(FpeError::arithmetic_error(
            "radix vector elements must be at least 2",
        ));
    }

    let max = max as usize;
    let mut spf = vec![0u32; max + 1];
    for i in 2..=max {
        if spf[i] == 0 {
            let mut j = i;
            while j <= max {
                if spf[j] == 0 {
                    spf[j] = i as u32;
                }
                j += i;
            }
        }
    }

    let mut out = Vec::new();
    for &wi in w {
        let mut n = wi;
        while n > 1 {
            let p = spf[n as usize];
            out.push(p);
            n /= p;
        }
    }
    Ok(out)
}

/// Integer square root via Newton's (Babylonian) method.
pub fn sqrt(n: &BigUint) -> BigUint {
    if n.is_zero() {
        return BigUint::zero();
    }
    let two = BigUint::from(2u32);
    let mut x = n.clone();
    let mut y = (&x + BigUint::one()) / &two;
    while y < x {
        x = y;
        y = (&x + n / &x) / &two;
    }
    x
}

/// IFX round count `4 * ceil((bitlen(u-1) + bitlen(v-1)) / min(bitlen(u-1), bitlen(v-1)))`.
pub fn rounds(u: &BigUint, v: &BigUint) -> Result<u32> {
    let one = BigUint::one();
    if u < &one || v < &one {
        return Err(FpeError::arithmetic_error(
            "u and v must each be at least 1",
        ));
    }
    let bu = (u - &one).bits();
    let bv = (v - &one).bits();
    let denom = bu.min(bv);
    if denom == 0 {
        return Err(FpeError::arithmetic_error(
            "bit length of u-1 or v-1 must not be zero",
        ));
    }
    let numer = bu + bv;
    let r = 4 * ((numer + denom - 1) / denom);
    Ok(r as u32)
}

/// `k` zero bytes.
pub fn padding(k: usize) -> Vec<u8> {
    vec![0u8; k]
}

/// Minimal two's-complement big-endian encoding of a signed integer.
pub fn signed_bytes(x: &BigInt) -> Vec<u8> {
    x.to_signed_bytes_be()
}

/// Decode a two's-complement big-endian byte sequence as a signed integer.
pub fn signed_integer(b: &[u8]) -> BigInt {
    BigInt::from_signed_bytes_be(b)
}
