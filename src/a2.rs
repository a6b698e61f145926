//! The A2 parameter pack: a binary (radix 2) FFX instance driven by a
//! CBC-MAC round function and a fixed, length-keyed round schedule,
//! rather than FF1/FF3's CIPH-based `F`.

use crate::cipher::Cipher;
use crate::error::FpeError;
use crate::ffx::{self, Arithmetic, Method, Params, RoundFunction};
use crate::numeric::{self, Symbol};
use crate::result::Result;

const RADIX: u32 = 2;
const MINLEN: usize = 8;
const MAXLEN: usize = 128;

fn split(n: usize) -> usize {
    n / 2
}

fn rounds(n: usize) -> u32 {
    match n {
        0..=9 => 36,
        10..=13 => 30,
        14..=19 => 24,
        20..=31 => 18,
        _ => 12,
    }
}

/// The A2 context structure: a key and a default tweak, operating over
/// bit strings of length 8 to 128.
pub struct A2 {
    ffx: ffx::FFX,
}

impl A2 {
    pub fn new(key: &[u8], default_tweak: Option<&[u8]>) -> Result<Self> {
        Ok(A2 {
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
                    arithmetic: Arithmetic::Charwise,
                },
                Box::new(A2RoundFn),
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

struct A2RoundFn;

impl RoundFunction for A2RoundFn {
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
        let p = build_header(0, radix, n, split(n), rounds(n), tweak.len());
        let q = build_q(tweak, round, b, radix)?;

        let block = numeric::concatenate(&p, &q);
        let y = cipher
            .prf(&block)
            .map_err(|_| FpeError::fatal("CBC-MAC failed during A2 round"))?;

        let bits: Vec<Symbol> = (0..128)
            .map(|j| ((y[j / 8] >> (7 - j % 8)) & 1) as Symbol)
            .collect();
        Ok(bits[128 - m..].to_vec())
    }
}

/// The shared 16-byte round-function header: `vers`, `method`, an
/// `addition` tag distinguishing the arithmetic strategy, `radix`, `n`,
/// `split(n)`, `rnds(n)`, and the tweak length.
pub(crate) fn build_header(
    addition: u8,
    radix: u32,
    n: usize,
    split_n: usize,
    rnds_n: u32,
    tlen: usize,
) -> Vec<u8> {
    let mut p = vec![0u8; 16];
    p[0] = 1;
    p[1] = 2;
    p[2] = addition;
    p[3] = radix as u8;
    p[4..6].copy_from_slice(&(n as u16).to_be_bytes());
    p[6] = split_n as u8;
    p[7] = rnds_n as u8;
    p[8..16].copy_from_slice(&(tlen as u64).to_be_bytes());
    p
}

pub(crate) fn build_q(tweak: &[u8], round: u32, b: &[Symbol], radix: u32) -> Result<Vec<u8>> {
    let k = tweak.len() + 9;
    let pad = (16 - (k % 16)) % 16;

    let nb = numeric::num(b, radix)?;
    let nb_bytes = numeric::bytestring(&nb, 8)?;

    let mut q = Vec::with_capacity(tweak.len() + pad + 1 + 8);
    q.extend_from_slice(tweak);
    q.extend(std::iter::repeat(0u8).take(pad));
    q.push(round as u8);
    q.extend_from_slice(&nb_bytes);
    Ok(q)
}

pub fn encrypt(key: &[u8], tweak: Option<&[u8]>, pt: &[Symbol]) -> Result<Vec<Symbol>> {
    A2::new(key, None)?.encrypt(tweak, pt)
}

pub fn decrypt(key: &[u8], tweak: Option<&[u8]>, ct: &[Symbol]) -> Result<Vec<Symbol>> {
    A2::new(key, None)?.decrypt(tweak, ct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_minimum_length() {
        let a2 = A2::new(&[0u8; 16], Some(&[1, 2, 3])).unwrap();
        let pt = vec![0, 1, 1, 0, 1, 0, 0, 1];
        let ct = a2.encrypt(None, &pt).unwrap();
        assert_ne!(ct, pt);
        let back = a2.decrypt(None, &ct).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn roundtrips_maximum_length() {
        let a2 = A2::new(&[9u8; 24], None).unwrap();
        let pt: Vec<Symbol> = (0..128).map(|i| (i % 2) as Symbol).collect();
        let ct = a2.encrypt(Some(&[7u8; 5]), &pt).unwrap();
        let back = a2.decrypt(Some(&[7u8; 5]), &ct).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn rejects_out_of_bounds_length() {
        let a2 = A2::new(&[0u8; 16], None).unwrap();
        assert!(a2.encrypt(None, &vec![0; 7]).is_err());
        assert!(a2.encrypt(None, &vec![0; 129]).is_err());
    }
}
