//! The generic FFX Feistel engine (Bellare/Rogaway/Spies): a driver
//! parameterized by split point, round count, round function, and
//! arithmetic strategy, realizing both Method ONE (repartition every
//! round) and Method TWO (swap fixed halves).
//!
//! FF1, FF3, A2, and A10 are all sealed parameter packs built on top of
//! this engine (see their respective modules); `FFX` itself is also a
//! directly usable public driver, per the library surface in spec §6.

use crate::cipher::Cipher;
use crate::error::FpeError;
use crate::numeric::{self, Symbol};
use crate::result::Result;

use num_bigint::BigUint;

/// Which of the two FFX repartitioning strategies to drive.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Repartition the whole string every round.
    One,
    /// Swap fixed halves every round.
    Two,
}

/// How a round's contribution is combined with the unchanged half.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    /// Interpret each half as a base-`radix` numeral; add/subtract modulo
    /// `radix^m`.
    Blockwise,
    /// Position-wise `(a[i] op b[i]) mod radix`.
    Charwise,
    /// Blockwise, but `a` is reversed symbol-for-symbol before the add/
    /// subtract and the result is reversed back before return; the round
    /// output itself is taken in its natural digit order. FF3's parameter
    /// pack.
    ReversedBlockwise,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Encrypt,
    Decrypt,
}

/// A pluggable round function `F_K(n, T, i, B) -> m symbols`, invoked
/// once per round by the engine.
pub trait RoundFunction {
    #[allow(clippy::too_many_arguments)]
    fn eval(
        &self,
        cipher: &Cipher,
        tweak: &[u8],
        radix: u32,
        n: usize,
        round: u32,
        b: &[Symbol],
        m: usize,
    ) -> Result<Vec<Symbol>>;
}

/// The strategy set a concrete driver (FF1, FF3, A2, A10, or a bespoke
/// `FFX` instance) fixes at construction time.
pub struct Params {
    pub method: Method,
    pub split: fn(usize) -> usize,
    pub rounds: fn(usize) -> u32,
    pub arithmetic: Arithmetic,
}

struct SizeLimits {
    min: usize,
    max: usize,
}

/// The generic engine: a keyed cipher, validated size limits, a default
/// tweak, a strategy pack, and a round function.
pub struct FFX {
    cipher: Cipher,
    radix: u32,
    twk: SizeLimits,
    txt: SizeLimits,
    default_tweak: Vec<u8>,
    params: Params,
    round_fn: Box<dyn RoundFunction + Send + Sync>,
}

impl FFX {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        key: &[u8],
        default_tweak: Option<&[u8]>,
        radix: u32,
        minlen: usize,
        maxlen: usize,
        mintwk: usize,
        maxtwk: usize,
        params: Params,
        round_fn: Box<dyn RoundFunction + Send + Sync>,
    ) -> Result<Self> {
        numeric::validate_radix(radix)?;

        if minlen < 2 {
            return Err(FpeError::invalid_argument(
                "minimum text length must be at least 2",
            ));
        }
        if BigUint::from(radix).pow(minlen as u32) < BigUint::from(100u32) {
            return Err(FpeError::invalid_argument(
                "radix**minlen must be at least 100",
            ));
        }
        if minlen > maxlen {
            return Err(FpeError::invalid_argument(
                "minimum text length must not exceed the maximum",
            ));
        }
        if maxtwk > 0 && mintwk > maxtwk {
            return Err(FpeError::invalid_argument(
                "minimum tweak length must not exceed the maximum",
            ));
        }

        let cipher = Cipher::new(key)?;

        let twk = match default_tweak {
            None => Vec::new(),
            Some(t) => {
                if t.len() < mintwk || (maxtwk > 0 && t.len() > maxtwk) {
                    return Err(FpeError::invalid_argument("invalid tweak length"));
                }
                t.to_vec()
            }
        };

        Ok(FFX {
            cipher,
            radix,
            twk: SizeLimits {
                min: mintwk,
                max: maxtwk,
            },
            txt: SizeLimits {
                min: minlen,
                max: maxlen,
            },
            default_tweak: twk,
            params,
            round_fn,
        })
    }

    pub fn radix(&self) -> u32 {
        self.radix
    }

    fn resolve_tweak<'a>(&'a self, t: Option<&'a [u8]>) -> &'a [u8] {
        t.unwrap_or(&self.default_tweak)
    }

    fn validate_tweak_len(&self, n: usize) -> Result<()> {
        if n < self.twk.min || (self.twk.max > 0 && n > self.twk.max) {
            return Err(FpeError::invalid_argument(format!(
                "invalid tweak length: {}",
                n
            )));
        }
        Ok(())
    }

    fn validate_text_len(&self, n: usize) -> Result<()> {
        if n < self.txt.min || n > self.txt.max {
            return Err(FpeError::invalid_argument(format!(
                "invalid text length; expected between {} and {}, got {}",
                self.txt.min, self.txt.max, n
            )));
        }
        Ok(())
    }

    fn validate_round_floor(&self, n: usize, l: usize, r: u32) -> Result<()> {
        let ok = if n == 2 * l || self.params.method == Method::Two {
            r >= 8
        } else {
            (r as u64) * (l as u64) >= 4 * n as u64
        };
        if !ok {
            return Err(FpeError::invalid_argument(
                "round count does not satisfy the anti-attack floor",
            ));
        }
        Ok(())
    }

    pub fn encrypt(&self, tweak: Option<&[u8]>, x: &[Symbol]) -> Result<Vec<Symbol>> {
        self.drive(tweak, x, Direction::Encrypt)
    }

    pub fn decrypt(&self, tweak: Option<&[u8]>, x: &[Symbol]) -> Result<Vec<Symbol>> {
        self.drive(tweak, x, Direction::Decrypt)
    }

    fn drive(&self, tweak: Option<&[u8]>, x: &[Symbol], dir: Direction) -> Result<Vec<Symbol>> {
        let t = self.resolve_tweak(tweak);
        self.validate_tweak_len(t.len())?;

        let n = x.len();
        self.validate_text_len(n)?;
        for &s in x {
            if s >= self.radix {
                return Err(FpeError::invalid_argument(format!(
                    "symbol {} out of range for radix {}",
                    s, self.radix
                )));
            }
        }

        let l = (self.params.split)(n);
        if l == 0 || l >= n {
            return Err(FpeError::invalid_argument(
                "split point must satisfy 1 <= l <= n/2",
            ));
        }
        let r = (self.params.rounds)(n);
        self.validate_round_floor(n, l, r)?;

        match self.params.method {
            Method::One => match dir {
                Direction::Encrypt => self.method_one_encrypt(x, n, l, r, t),
                Direction::Decrypt => self.method_one_decrypt(x, n, l, r, t),
            },
            Method::Two => match dir {
                Direction::Encrypt => self.method_two_encrypt(x, n, l, r, t),
                Direction::Decrypt => self.method_two_decrypt(x, n, l, r, t),
            },
        }
    }

    fn eval_f(&self, t: &[u8], n: usize, round: u32, b: &[Symbol], m: usize) -> Result<Vec<Symbol>> {
        self.round_fn
            .eval(&self.cipher, t, self.radix, n, round, b, m)
    }

    fn method_one_encrypt(
        &self,
        x: &[Symbol],
        n: usize,
        l: usize,
        rounds: u32,
        t: &[u8],
    ) -> Result<Vec<Symbol>> {
        let mut cur = x.to_vec();
        for i in 0..rounds {
            let (a, b) = cur.split_at(l);
            let f = self.eval_f(t, n, i, b, l)?;
            let c = arith_add(self.params.arithmetic, self.radix, a, &f)?;
            cur = numeric::concatenate(b, &c);
        }
        Ok(cur)
    }

    fn method_one_decrypt(
        &self,
        y: &[Symbol],
        n: usize,
        l: usize,
        rounds: u32,
        t: &[u8],
    ) -> Result<Vec<Symbol>> {
        let mut cur = y.to_vec();
        for i in (0..rounds).rev() {
            let (b, c) = cur.split_at(n - l);
            let f = self.eval_f(t, n, i, b, l)?;
            let a = arith_sub(self.params.arithmetic, self.radix, c, &f)?;
            cur = numeric::concatenate(&a, b);
        }
        Ok(cur)
    }

    fn method_two_encrypt(
        &self,
        x: &[Symbol],
        n: usize,
        l: usize,
        rounds: u32,
        t: &[u8],
    ) -> Result<Vec<Symbol>> {
        let mut a = x[..l].to_vec();
        let mut b = x[l..].to_vec();
        for i in 0..rounds {
            let m = f_len(l, n, i);
            let f = self.eval_f(t, n, i, &b, m)?;
            let c = arith_add(self.params.arithmetic, self.radix, &a, &f)?;
            a = b;
            b = c;
        }
        Ok(numeric::concatenate(&a, &b))
    }

    fn method_two_decrypt(
        &self,
        y: &[Symbol],
        n: usize,
        l: usize,
        rounds: u32,
        t: &[u8],
    ) -> Result<Vec<Symbol>> {
        let mut a = y[..l].to_vec();
        let mut b = y[l..].to_vec();
        for i in (0..rounds).rev() {
            let m = f_len(l, n, i);
            let f = self.eval_f(t, n, i, &a, m)?;
            let new_a = arith_sub(self.params.arithmetic, self.radix, &b, &f)?;
            b = a;
            a = new_a;
        }
        Ok(numeric::concatenate(&a, &b))
    }
}

/// Length of the round function's output at round `i`, given the initial
/// split `l` of an `n`-symbol input: Method TWO's two halves swap roles
/// every round, so the length the round function must produce alternates
/// between `l` and `n - l`.
fn f_len(l: usize, n: usize, i: u32) -> usize {
    if i % 2 == 0 {
        l
    } else {
        n - l
    }
}

pub(crate) fn arith_add(
    arithmetic: Arithmetic,
    radix: u32,
    a: &[Symbol],
    delta: &[Symbol],
) -> Result<Vec<Symbol>> {
    if a.len() != delta.len() {
        return Err(FpeError::invalid_argument(
            "arithmetic operands must have equal length",
        ));
    }
    match arithmetic {
        Arithmetic::Blockwise => {
            let m = a.len();
            let na = numeric::num(a, radix)?;
            let nd = numeric::num(delta, radix)?;
            let modulus = BigUint::from(radix).pow(m as u32);
            let sum = (na + nd) % &modulus;
            numeric::str(&sum, radix, m)
        }
        Arithmetic::Charwise => Ok(a
            .iter()
            .zip(delta)
            .map(|(&x, &y)| (x + y) % radix)
            .collect()),
        Arithmetic::ReversedBlockwise => {
            let m = a.len();
            let ra = numeric::rev(a);
            let na = numeric::num(&ra, radix)?;
            let nd = numeric::num(delta, radix)?;
            let modulus = BigUint::from(radix).pow(m as u32);
            let sum = (na + nd) % &modulus;
            Ok(numeric::rev(&numeric::str(&sum, radix, m)?))
        }
    }
}

pub(crate) fn arith_sub(
    arithmetic: Arithmetic,
    radix: u32,
    a: &[Symbol],
    delta: &[Symbol],
) -> Result<Vec<Symbol>> {
    if a.len() != delta.len() {
        return Err(FpeError::invalid_argument(
            "arithmetic operands must have equal length",
        ));
    }
    match arithmetic {
        Arithmetic::Blockwise => {
            let m = a.len();
            let na = numeric::num(a, radix)?;
            let nd = numeric::num(delta, radix)?;
            let modulus = BigUint::from(radix).pow(m as u32);
            // na - nd can be negative; lift to signed arithmetic before
            // reducing back into [0, modulus).
            let na = num_bigint::BigInt::from(na);
            let nd = num_bigint::BigInt::from(nd);
            let modulus_signed = num_bigint::BigInt::from(modulus);
            let diff = numeric::modulo(&(na - nd), &modulus_signed)?;
            numeric::str(&diff, radix, m)
        }
        Arithmetic::Charwise => Ok(a
            .iter()
            .zip(delta)
            .map(|(&x, &y)| (x + radix - y) % radix)
            .collect()),
        Arithmetic::ReversedBlockwise => {
            let m = a.len();
            let ra = numeric::rev(a);
            let na = numeric::num(&ra, radix)?;
            let nd = numeric::num(delta, radix)?;
            let modulus = BigUint::from(radix).pow(m as u32);
            let na = num_bigint::BigInt::from(na);
            let nd = num_bigint::BigInt::from(nd);
            let modulus_signed = num_bigint::BigInt::from(modulus);
            let diff = numeric::modulo(&(na - nd), &modulus_signed)?;
            Ok(numeric::rev(&numeric::str(&diff, radix, m)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ZeroRoundFn;

    impl RoundFunction for ZeroRoundFn {
        fn eval(
            &self,
            _cipher: &Cipher,
            _tweak: &[u8],
            _radix: u32,
            _n: usize,
            _round: u32,
            _b: &[Symbol],
            m: usize,
        ) -> Result<Vec<Symbol>> {
            Ok(vec![0; m])
        }
    }

    fn engine(method: Method, arithmetic: Arithmetic) -> FFX {
        FFX::new(
            &[0u8; 16],
            None,
            10,
            2,
            16,
            0,
            0,
            Params {
                method,
                split: |n| n / 2,
                rounds: |_| 8,
                arithmetic,
            },
            Box::new(ZeroRoundFn),
        )
        .unwrap()
    }

    #[test]
    fn method_two_is_identity_with_zero_round_function() {
        let ffx = engine(Method::Two, Arithmetic::Blockwise);
        let x = vec![1, 2, 3, 4];
        let y = ffx.encrypt(None, &x).unwrap();
        assert_eq!(y, x);
        let back = ffx.decrypt(None, &y).unwrap();
        assert_eq!(back, x);
    }

    #[test]
    fn method_one_roundtrips() {
        let ffx = engine(Method::One, Arithmetic::Charwise);
        let x = vec![5, 6, 7, 8, 9];
        let y = ffx.encrypt(None, &x).unwrap();
        let back = ffx.decrypt(None, &y).unwrap();
        assert_eq!(back, x);
    }

    struct OffsetRoundFn;

    impl RoundFunction for OffsetRoundFn {
        fn eval(
            &self,
            _cipher: &Cipher,
            _tweak: &[u8],
            radix: u32,
            _n: usize,
            round: u32,
            _b: &[Symbol],
            m: usize,
        ) -> Result<Vec<Symbol>> {
            Ok(vec![(round + 1) % radix; m])
        }
    }

    #[test]
    fn method_two_roundtrips_with_nontrivial_round_function() {
        let ffx = FFX::new(
            &[7u8; 16],
            None,
            10,
            2,
            16,
            0,
            0,
            Params {
                method: Method::Two,
                split: |n| n / 2,
                rounds: |_| 8,
                arithmetic: Arithmetic::Blockwise,
            },
            Box::new(OffsetRoundFn),
        )
        .unwrap();

        let x = vec![1, 2, 3, 4, 5, 6];
        let y = ffx.encrypt(None, &x).unwrap();
        assert_ne!(y, x);
        let back = ffx.decrypt(None, &y).unwrap();
        assert_eq!(back, x);
    }

    #[test]
    fn rejects_short_text() {
        let ffx = engine(Method::Two, Arithmetic::Blockwise);
        assert!(ffx.encrypt(None, &[1]).is_err());
    }

    #[test]
    fn rejects_symbol_out_of_range() {
        let ffx = engine(Method::Two, Arithmetic::Blockwise);
        assert!(ffx.encrypt(None, &[1, 2, 3, 10]).is_err());
    }
}
