//! The FF1 algorithm (NIST SP 800-38G §6, Algorithms 7 and 8).
//!
//! FF1 supports AES-128/192/256 keys and a tweak of essentially
//! unbounded length (the caller picks `mintwk`/`maxtwk`). It is a Method
//! TWO FFX parameter pack: balanced split, 10 rounds, blockwise
//! arithmetic.
//!
//! # Example
//! ```rust
//! let ff1 = fpe::ff1::FF1::new(
//!     &[
//!         0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6,
//!         0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f, 0x3c,
//!     ],
//!     None, // no default tweak
//!     0, 0, // no minimum/maximum tweak length
//!     10,   // radix
//! ).unwrap();
//!
//! let pt = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
//! let ct = ff1.encrypt(None, &pt).unwrap();
//! assert_eq!(ct, vec![2, 4, 3, 3, 4, 7, 7, 4, 8, 4]);
//!
//! let back = ff1.decrypt(None, &ct).unwrap();
//! assert_eq!(back, pt);
//! ```

use crate::cipher::Cipher;
use crate::error::FpeError;
use crate::ffx::{self, Arithmetic, Method, Params, RoundFunction};
use crate::numeric::{self, Symbol};
use crate::result::Result;

use byteorder::ByteOrder;

/// The FF1 context structure: a key, a default tweak, and a radix, bound
/// together into a reusable engine.
pub struct FF1 {
    ffx: ffx::FFX,
}

impl FF1 {
    /// Create a new FF1 context.
    ///
    /// `key` may be any AES key length. The default tweak is optional;
    /// if supplied it must satisfy `mintwk`/`maxtwk` (both `0` leaves the
    /// tweak length unbounded). `radix` must be in `[2, 2^16]`, subject
    /// to `radix^2 >= 100`.
    pub fn new(
        key: &[u8],
        default_tweak: Option<&[u8]>,
        mintwk: usize,
        maxtwk: usize,
        radix: u32,
    ) -> Result<Self> {
        Ok(FF1 {
            ffx: ffx::FFX::new(
                key,
                default_tweak,
                radix,
                2,
                (1usize << 32) - 1,
                mintwk,
                maxtwk,
                Params {
                    method: Method::Two,
                    split: |n| n / 2,
                    rounds: |_| 10,
                    arithmetic: Arithmetic::Blockwise,
                },
                Box::new(Ff1RoundFn),
            )?,
        })
    }

    /// Encrypt a symbol array. `tweak` overrides the default tweak for
    /// this call only.
    pub fn encrypt(&self, tweak: Option<&[u8]>, pt: &[Symbol]) -> Result<Vec<Symbol>> {
        self.ffx.encrypt(tweak, pt)
    }

    /// Decrypt a symbol array. `tweak` must match the one used to
    /// encrypt.
    pub fn decrypt(&self, tweak: Option<&[u8]>, ct: &[Symbol]) -> Result<Vec<Symbol>> {
        self.ffx.decrypt(tweak, ct)
    }
}

/// FF1's round function `F_K(n, T, i, B)`, SP 800-38G §6.2 step 6.
struct Ff1RoundFn;

impl RoundFunction for Ff1RoundFn {
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
        let t = tweak.len();
        let u = n / 2;
        let v = n - u;

        // b = ceil(ceil(v * log2(radix)) / 8)
        let b_bytes = ((((radix as f64).log2() * (v as f64)).ceil() as usize) + 7) / 8;
        // d = 4 * ceil(b / 4) + 4
        let d = 4 * ((b_bytes + 3) / 4) + 4;
        let blksz = cipher.block_size();

        // P: the fixed 16-byte header.
        let mut p = vec![0u8; 16 + ((tweak.len() + 1 + b_bytes + (blksz - 1)) / blksz) * blksz];
        p[0] = 1;
        p[1] = 2;
        byteorder::BigEndian::write_u32(&mut p[2..6], radix);
        p[2] = 1;
        p[6] = 10;
        p[7] = (u % 256) as u8;
        byteorder::BigEndian::write_u32(&mut p[8..12], n as u32);
        byteorder::BigEndian::write_u32(&mut p[12..16], t as u32);

        // Q: the tweak, zero padding, the round index, and B as a number.
        {
            let q = &mut p[16..];
            q[0..t].copy_from_slice(tweak);
            let q_len = q.len();
            q[q_len - b_bytes - 1] = round as u8;

            let nb = numeric::num(b, radix)?;
            let nb_bytes = numeric::bytestring(&nb, b_bytes)?;
            q[q_len - b_bytes..].copy_from_slice(&nb_bytes);
        }

        let mut r = vec![0u8; ((d + (blksz - 1)) / blksz) * blksz];
        r[..blksz].copy_from_slice(&cipher.prf(&p)?);

        // S = R || CIPH(R^1) || CIPH(R^2) || ... truncated to d bytes.
        for j in 1..r.len() / blksz {
            let (s, dst) = r.split_at_mut(blksz);
            let l = (j - 1) * blksz;

            let w = byteorder::BigEndian::read_u32(&s[blksz - 4..]);
            byteorder::BigEndian::write_u32(&mut s[blksz - 4..], w ^ j as u32);
            let block = cipher
                .ciph(s)
                .map_err(|_| FpeError::fatal("CIPH failed during S extension"))?;
            dst[l..l + blksz].copy_from_slice(&block);
            byteorder::BigEndian::write_u32(&mut s[blksz - 4..], w);
        }

        let y = numeric::num_bytes(&r[..d])?;
        let y = y % num_bigint::BigUint::from(radix).pow(m as u32);
        numeric::str(&y, radix, m)
    }
}

pub fn encrypt(key: &[u8], tweak: Option<&[u8]>, pt: &[Symbol], radix: u32) -> Result<Vec<Symbol>> {
    FF1::new(key, None, 0, 0, radix)?.encrypt(tweak, pt)
}

pub fn decrypt(key: &[u8], tweak: Option<&[u8]>, ct: &[Symbol], radix: u32) -> Result<Vec<Symbol>> {
    FF1::new(key, None, 0, 0, radix)?.decrypt(tweak, ct)
}
