//! The FF3 algorithm (NIST SP 800-38G §4.5, Algorithms 9 and 10).
//!
//! FF3 is an unbalanced Method TWO parameter pack: the first half is one
//! symbol longer than the second when `n` is odd, the tweak is a fixed
//! 8 bytes split into independent `T_L`/`T_R` halves, and the round
//! function keys AES with the byte-reversed raw key material, combining
//! its output with the active half in reversed symbol order.
//!
//! # Example
//! ```rust
//! let ff3 = fpe::ff3::FF3::new(
//!     &[
//!         0xef, 0x43, 0x59, 0xd8, 0xd5, 0x80, 0xaa, 0x4f,
//!         0x7f, 0x03, 0x6d, 0x6f, 0x04, 0xfc, 0x6a, 0x94,
//!     ],
//!     Some(&[0xd8, 0xe7, 0x92, 0x0a, 0xfa, 0x33, 0x0a, 0x73]),
//!     10,
//! ).unwrap();
//!
//! let pt = vec![8, 9, 0, 1, 2, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0, 0, 0];
//! let ct = ff3.encrypt(None, &pt).unwrap();
//! assert_eq!(ct, vec![7, 5, 0, 9, 1, 8, 8, 1, 4, 0, 5, 8, 6, 5, 4, 6, 0, 7]);
//!
//! let back = ff3.decrypt(None, &ct).unwrap();
//! assert_eq!(back, pt);
//! ```

use crate::cipher::Cipher;
use crate::error::FpeError;
use crate::ffx::{self, Arithmetic, Method, Params, RoundFunction};
use crate::numeric::{self, Symbol};
use crate::result::Result;

use num_bigint::BigUint;

/// The FF3 context structure: a key, a default tweak, and a radix, bound
/// together into a reusable engine.
pub struct FF3 {
    ffx: ffx::FFX,
}

impl FF3 {
    /// Create a new FF3 context.
    ///
    /// `key` may be any AES key length; it is byte-reversed once here,
    /// per the algorithm's keying convention. The default tweak, if
    /// supplied, must be exactly 8 bytes (as must any per-call tweak
    /// override). `radix` must be in `[2, 2^16]`.
    pub fn new(key: &[u8], default_tweak: Option<&[u8]>, radix: u32) -> Result<Self> {
        numeric::validate_radix(radix)?;

        let ln_radix = (radix as f64).ln();
        let minlen = (2usize).max((100f64.ln() / ln_radix).ceil() as usize);
        let half = (96.0 * std::f64::consts::LN_2 / ln_radix).floor() as usize;
        let maxlen = minlen.max(2 * half);

        let mut revkey = key.to_vec();
        revkey.reverse();

        Ok(FF3 {
            ffx: ffx::FFX::new(
                &revkey,
                default_tweak,
                radix,
                minlen,
                maxlen,
                8,
                8,
                Params {
                    method: Method::Two,
                    split: |n| n - n / 2,
                    rounds: |_| 8,
                    arithmetic: Arithmetic::ReversedBlockwise,
                },
                Box::new(Ff3RoundFn),
            )?,
        })
    }

    /// Encrypt a symbol array. `tweak` overrides the default tweak for
    /// this call only; either way it must be exactly 8 bytes.
    pub fn encrypt(&self, tweak: Option<&[u8]>, pt: &[Symbol]) -> Result<Vec<Symbol>> {
        self.ffx.encrypt(tweak, pt)
    }

    /// Decrypt a symbol array. `tweak` must match the one used to
    /// encrypt.
    pub fn decrypt(&self, tweak: Option<&[u8]>, ct: &[Symbol]) -> Result<Vec<Symbol>> {
        self.ffx.decrypt(tweak, ct)
    }
}

/// FF3's round function `F_K(n, T, i, B)`, SP 800-38G §4.5 step 4.
struct Ff3RoundFn;

impl RoundFunction for Ff3RoundFn {
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
        let t_l = &tweak[0..4];
        let t_r = &tweak[4..8];
        let w = if round % 2 == 0 { t_r } else { t_l };

        let rev_b = numeric::rev(b);
        let nb = numeric::num(&rev_b, radix)?;
        let nb_bytes = numeric::bytestring(&nb, 12)?;

        let mut p = [0u8; 16];
        p[0..4].copy_from_slice(w);
        p[3] ^= round as u8;
        p[4..16].copy_from_slice(&nb_bytes);

        let rev_p = numeric::revb(&p);
        let s = cipher
            .ciph(&rev_p)
            .map_err(|_| FpeError::fatal("CIPH failed during FF3 round"))?;
        let s = numeric::revb(&s);

        let y = numeric::num_bytes(&s)?;
        let y = y % BigUint::from(radix).pow(m as u32);
        numeric::str(&y, radix, m)
    }
}

pub fn encrypt(key: &[u8], tweak: Option<&[u8]>, pt: &[Symbol], radix: u32) -> Result<Vec<Symbol>> {
    FF3::new(key, None, radix)?.encrypt(tweak, pt)
}

pub fn decrypt(key: &[u8], tweak: Option<&[u8]>, ct: &[Symbol], radix: u32) -> Result<Vec<Symbol>> {
    FF3::new(key, None, radix)?.decrypt(tweak, ct)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_hex(s: &str) -> Vec<u8> {
        let bytes = s.as_bytes();
        (0..bytes.len())
            .step_by(2)
            .map(|i| {
                let hi = (bytes[i] as char).to_digit(16).unwrap();
                let lo = (bytes[i + 1] as char).to_digit(16).unwrap();
                ((hi << 4) | lo) as u8
            })
            .collect()
    }

    #[test]
    fn nist_vector_roundtrips() {
        let key = parse_hex("EF4359D8D580AA4F7F036D6F04FC6A94");
        let tweak = parse_hex("D8E7920AFA330A73");
        let ff3 = FF3::new(&key, Some(&tweak), 10).unwrap();

        let pt = vec![8, 9, 0, 1, 2, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0, 0, 0];
        let ct = ff3.encrypt(None, &pt).unwrap();
        assert_eq!(
            ct,
            vec![7, 5, 0, 9, 1, 8, 8, 1, 4, 0, 5, 8, 6, 5, 4, 6, 0, 7]
        );

        let back = ff3.decrypt(None, &ct).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn odd_length_unbalanced_split_roundtrips() {
        let ff3 = FF3::new(&[0u8; 16], Some(&[0u8; 8]), 10).unwrap();
        let pt = vec![1, 2, 3, 4, 5, 6, 7];
        let ct = ff3.encrypt(None, &pt).unwrap();
        assert_ne!(ct, pt);
        let back = ff3.decrypt(None, &ct).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn rejects_wrong_tweak_length() {
        let ff3 = FF3::new(&[0u8; 16], None, 10).unwrap();
        assert!(ff3.encrypt(Some(&[0u8; 7]), &[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn key_sizes_roundtrip() {
        let tweak = [0u8; 8];
        let pt = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2];
        for key in [vec![0u8; 16], vec![1u8; 24], vec![2u8; 32]] {
            let ff3 = FF3::new(&key, Some(&tweak), 10).unwrap();
            let ct = ff3.encrypt(None, &pt).unwrap();
            let back = ff3.decrypt(None, &ct).unwrap();
            assert_eq!(back, pt);
        }
    }
}
