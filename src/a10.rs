//! The A10 parameter pack: a decimal (radix 10) FFX instance driven by
//! the same CBC-MAC round function as [`crate::a2`], but decoding its
//! output as paired 8-byte halves instead of raw bits.

use crate::a2::{build_header, build_q};
use crate::cipher::Cipher;
use crate::error::FpeError;
use crate::ffx::{self, Arithmetic, Method, Params, RoundFunction};
use crate::numeric::{self, Symbol};
use crate::result::Result;

use num_bigint::BigUint;

const RADIX: u32 = 10;
const MINLEN: usize = 4;
const MAXLEN: usize = 36;

fn split(n: usize) -> usize {
    n / 2
}

fn rounds(n: usize) -> u32 {
    match n {
        0..=5 => 24,
        6..=9 => 18,
        _ => 12,
    }
}

/// The A10 context structure: a key and a default tweak, operating over
/// decimal strings of length 4 to 36.
pub struct A10 {
    ffx: ffx::FFX,
}

impl A10 {
    pub fn new(key: &[u8], default_tweak: Option<&[u8]>) -> Result<Self> {
        Ok(A10 {
            ffx: ffx::FFX::new(
                key,
                default_tweak,
                RADIX,
                MINLEN,
                MAXLEN,
                0,
                0,
                Params {
                    method: Method::Two,
                    split,
                    rounds,
                    arithmetic: Arithmetic::Blockwise,
                },
                Box::new(A10RoundFn),
            )?,
        })
    }

    pub fn encrypt(&self, tweak: Option<&[u8]>, pt: &[Symbol]) -> Result<Vec<Symbol>> {
        self.ffx.encrypt(tweak, pt)
    }

    pub fn decrypt(&self, tweak: Option<&[u8]>, ct: &[Symbol]) -> Result<Vec<Symbol>> {
        self.ffx.decrypt(tweak, ct)
    }
}

struct A10RoundFn;

impl RoundFunction for A10RoundFn {
    fn eval(
        &self,
        cipher: &Cipher,
        tweak: &[u8],
        radix: u32,
        n: usize,
        round: u32,
        b: &[Symbol],
        m: usize,
    ) -> Result<Vec<Symbol>> {
        let p = build_header(1, radix, n, split(n), rounds(n), tweak.len());
        let q = build_q(tweak, round, b, radix)?;

        let block = numeric::concatenate(&p, &q);
        let y = cipher
            .prf(&block)
            .map_err(|_| FpeError::fatal("CBC-MAC failed during A10 round"))?;

        let y_hi = BigUint::from_bytes_be(&y[..8]);
        let y_lo = BigUint::from_bytes_be(&y[8..]);
        let ten = BigUint::from(10u32);

        let result = if m <= 9 {
            y_lo % ten.pow(m as u32)
        } else {
            let hi = y_hi % ten.pow((m - 9) as u32);
            let lo = y_lo % ten.pow(9);
            hi * ten.pow(9) + lo
        };
        numeric::str(&result, 10, m)
    }
}

pub fn encrypt(key: &[u8], tweak: Option<&[u8]>, pt: &[Symbol]) -> Result<Vec<Symbol>> {
    A10::new(key, None)?.encrypt(tweak, pt)
}

pub fn decrypt(key: &[u8], tweak: Option<&[u8]>, ct: &[Symbol]) -> Result<Vec<Symbol>> {
    A10::new(key, None)?.decrypt(tweak, ct)
}
