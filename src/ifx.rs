//! IFX: an experimental Feistel construction over non-uniform, per-
//! position radix vectors. The domain is encoded as a single mixed-
//! radix integer, split by greedy prime factorization into balanced
//! `u`/`v` halves, and driven by a CBC-derived subkey rather than a
//! fixed-width round function.

use crate::cipher::Cipher;
use crate::error::FpeError;
use crate::numeric::{self, Symbol};
use crate::result::Result;

use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

/// An IFX context: a key and a per-position radix vector `W`, together
/// with the derived prime-factor split `(u, v)` and round count.
pub struct IFX {
    cipher: Cipher,
    w: Vec<u32>,
    u: BigUint,
    v: BigUint,
    rounds: u32,
    default_tweak: Vec<u8>,
}

impl IFX {
    /// Create a new IFX context over the radix vector `w` (length at
    /// least 2, each element in `[2, 2^16)`).
    pub fn new(key: &[u8], w: Vec<u32>, default_tweak: Option<&[u8]>) -> Result<Self> {
        if w.len() < 2 {
            return Err(FpeError::invalid_argument(
                "radix vector must have at least 2 positions",
            ));
        }
        for &wi in &w {
            if wi < 2 || wi >= numeric::MAXRADIX {
                return Err(FpeError::invalid_argument(format!(
                    "each radix must be in [2, {}), got {}",
                    numeric::MAXRADIX,
                    wi
                )));
            }
        }

        let product = numeric::product(&w)?;
        if product < BigUint::from(100u32) {
            return Err(FpeError::invalid_argument(
                "product of the radix vector must be at least 100",
            ));
        }

        let mut factors = numeric::factors(&w)?;
        factors.sort_unstable_by(|a, b| b.cmp(a));

        let sqrt_w = numeric::sqrt(&product);
        let mut u = BigUint::from(1u32);
        let mut v = BigUint::from(1u32);
        for g in factors {
            let candidate = &u * g;
            if candidate <= sqrt_w {
                u = candidate;
            } else {
                v *= g;
            }
        }

        let rounds = numeric::rounds(&u, &v)?;
        let cipher = Cipher::new(key)?;

        Ok(IFX {
            cipher,
            w,
            u,
            v,
            rounds,
            default_tweak: default_tweak.map(|t| t.to_vec()).unwrap_or_default(),
        })
    }

    fn resolve_tweak<'a>(&'a self, t: Option<&'a [u8]>) -> &'a [u8] {
        t.unwrap_or(&self.default_tweak)
    }

    /// Mixed-radix big-endian encoding: `y[0]` carries no place-value
    /// factor of its own; every later digit multiplies the accumulator
    /// by its own position's radix before being added in.
    fn encode(&self, x: &[Symbol]) -> Result<BigUint> {
        if x.len() != self.w.len() {
            return Err(FpeError::invalid_argument(
                "symbol array length must match the radix vector",
            ));
        }
        for (i, &xi) in x.iter().enumerate() {
            if xi >= self.w[i] {
                return Err(FpeError::invalid_argument(format!(
                    "symbol {} out of range for position radix {}",
                    xi, self.w[i]
                )));
            }
        }

        let mut acc = BigUint::from(x[0]);
        for i in 1..x.len() {
            acc = acc * BigUint::from(self.w[i]) + BigUint::from(x[i]);
        }
        Ok(acc)
    }

    fn decode(&self, y: &BigUint) -> Result<Vec<Symbol>> {
        let n = self.w.len();
        let mut digits = vec![0 as Symbol; n];
        let mut acc = y.clone();
        for i in (1..n).rev() {
            let wi = BigUint::from(self.w[i]);
            let rem = &acc % &wi;
            acc /= &wi;
            digits[i] = rem.to_u32().expect("remainder below radix fits in u32");
        }
        if acc >= BigUint::from(self.w[0]) {
            return Err(FpeError::arithmetic_error(
                "mixed-radix value does not fit the radix vector",
            ));
        }
        digits[0] = acc.to_u32().expect("leading digit fits in u32");
        Ok(digits)
    }

    /// Minimal two's-complement big-endian bytes of a nonnegative value.
    fn ifx_bytes(x: &BigUint) -> Vec<u8> {
        numeric::signed_bytes(&BigInt::from(x.clone()))
    }

    /// The 16-byte subkey seed `P`, derived once per `(K, T)` pair.
    fn build_seed(&self, t: &[u8]) -> Result<[u8; 16]> {
        let r_bytes = Self::ifx_bytes(&BigUint::from(self.rounds));
        let u_bytes = Self::ifx_bytes(&self.u);
        let v_bytes = Self::ifx_bytes(&self.v);

        let pre_len = t.len() + u_bytes.len() + v_bytes.len() + r_bytes.len();
        let s_bytes = Self::ifx_bytes(&BigUint::from(pre_len as u64));
        let total = pre_len + s_bytes.len();
        let pad = (16 - (total % 16)) % 16;

        let mut o = Vec::with_capacity(total + pad);
        o.extend_from_slice(&r_bytes);
        o.extend_from_slice(&s_bytes);
        o.extend(std::iter::repeat(0u8).take(pad));
        o.extend_from_slice(t);
        o.extend_from_slice(&u_bytes);
        o.extend_from_slice(&v_bytes);

        self.cipher.cbc_last_block(&[0u8; 16], &o)
    }

    /// Round function `F`: `signed-integer(CBC-encrypt(K, IV=P, Q))`.
    fn round_f(&self, seed: &[u8; 16], round: u32, b: &BigUint) -> Result<BigInt> {
        let i_bytes = Self::ifx_bytes(&BigUint::from(round));
        let b_bytes = Self::ifx_bytes(b);

        let total = i_bytes.len() + b_bytes.len();
        let pad = (16 - (total % 16)) % 16;

        let mut q = Vec::with_capacity(total + pad);
        q.extend_from_slice(&i_bytes);
        q.extend(std::iter::repeat(0u8).take(pad));
        q.extend_from_slice(&b_bytes);

        let f_block = self.cipher.cbc_last_block(seed, &q)?;
        Ok(numeric::signed_integer(&f_block))
    }

    /// Encrypt a symbol array, one element per position of `W`.
    pub fn encrypt(&self, tweak: Option<&[u8]>, x: &[Symbol]) -> Result<Vec<Symbol>> {
        let t = self.resolve_tweak(tweak);
        let seed = self.build_seed(t)?;

        let num_x = self.encode(x)?;
        let mut a = &num_x / &self.v;
        let mut b = &num_x % &self.v;

        for i in 0..self.rounds {
            let d = if i % 2 == 0 { &self.u } else { &self.v };
            let f = self.round_f(&seed, i, &b)?;
            let c = numeric::modulo(&(BigInt::from(a) + f), &BigInt::from(d.clone()))?;
            a = b;
            b = c;
        }

        let y = a * &self.v + b;
        self.decode(&y)
    }

    /// Decrypt a symbol array. `tweak` must match the one used to
    /// encrypt.
    pub fn decrypt(&self, tweak: Option<&[u8]>, y: &[Symbol]) -> Result<Vec<Symbol>> {
        let t = self.resolve_tweak(tweak);
        let seed = self.build_seed(t)?;

        let num_y = self.encode(y)?;
        let mut a = &num_y / &self.v;
        let mut b = &num_y % &self.v;

        for i in (0..self.rounds).rev() {
            let d = if i % 2 == 0 { &self.u } else { &self.v };
            let c = b;
            let new_b = a;
            let f = self.round_f(&seed, i, &new_b)?;
            let new_a = numeric::modulo(&(BigInt::from(c) - f), &BigInt::from(d.clone()))?;
            a = new_a;
            b = new_b;
        }

        let x = a * &self.v + b;
        self.decode(&x)
    }
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
    fn empty_tweak_sample_roundtrips() {
        let key = parse_hex("2B7E151628AED2A6ABF7158809CF4F3C");
        let w = vec![10, 26, 26, 26, 10, 10, 10];
        let ifx = IFX::new(&key, w, None).unwrap();

        let pt = vec![0, 1, 2, 3, 4, 5, 6];
        let ct = ifx.encrypt(None, &pt).unwrap();
        assert_eq!(ct, vec![7, 0, 3, 13, 6, 6, 8]);

        let back = ifx.decrypt(None, &ct).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn tweaked_sample_roundtrips() {
        let key = parse_hex("2B7E151628AED2A6ABF7158809CF4F3C");
        let tweak = parse_hex("C0C1C2C3C4C5C6C7C8C9CACBCCCDCECF");
        let w = vec![10, 26, 26, 26, 10, 10, 10];
        let ifx = IFX::new(&key, w, None).unwrap();

        let pt = vec![0, 1, 2, 3, 4, 5, 6];
        let ct = ifx.encrypt(Some(&tweak), &pt).unwrap();
        assert_eq!(ct, vec![4, 3, 2, 15, 5, 8, 4]);

        let back = ifx.decrypt(Some(&tweak), &ct).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn mixed_small_prime_radix_vector_roundtrips() {
        let ifx = IFX::new(&[0u8; 16], vec![2, 3, 5, 7, 2, 3], None).unwrap();
        let pt = vec![1, 2, 3, 5, 0, 2];
        let ct = ifx.encrypt(None, &pt).unwrap();
        let back = ifx.decrypt(None, &ct).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn zero_length_and_long_tweaks_both_work() {
        let ifx = IFX::new(&[1u8; 16], vec![10, 10, 10, 10], None).unwrap();
        let pt = vec![1, 2, 3, 4];

        let ct_empty = ifx.encrypt(Some(&[]), &pt).unwrap();
        assert_eq!(ifx.decrypt(Some(&[]), &ct_empty).unwrap(), pt);

        let long_tweak = vec![0xabu8; 20];
        let ct_long = ifx.encrypt(Some(&long_tweak), &pt).unwrap();
        assert_eq!(ifx.decrypt(Some(&long_tweak), &ct_long).unwrap(), pt);
    }

    #[test]
    fn rejects_radix_vector_too_short() {
        assert!(IFX::new(&[0u8; 16], vec![10], None).is_err());
    }

    #[test]
    fn rejects_symbol_out_of_range() {
        let ifx = IFX::new(&[0u8; 16], vec![10, 10, 10, 10], None).unwrap();
        assert!(ifx.encrypt(None, &[0, 0, 0, 10]).is_err());
    }

    #[test]
    fn u_times_v_equals_product_and_u_is_balanced() {
        let w = vec![10, 26, 26, 26, 10, 10, 10];
        let ifx = IFX::new(&[0u8; 16], w.clone(), None).unwrap();
        let product = numeric::product(&w).unwrap();
        assert_eq!(&ifx.u * &ifx.v, product);
        assert!(ifx.u <= numeric::sqrt(&product));
    }
}
