//! Format-preserving encryption.
//!
//! Provides implementations of the FF1 and FF3 constructions from NIST
//! SP 800-38G, the generic FFX Feistel framework both are built on, the
//! A2/A10 CBC-MAC parameter packs, and IFX, an experimental Feistel
//! construction over non-uniform per-position radix vectors.
//!
//! Format-preserving encryption means plaintext and ciphertext share a
//! domain: every operation here works over arrays of integer symbols in
//! `[0, radix)` rather than strings, leaving the mapping between an
//! application's alphabet and that symbol domain to the caller.
//!
//! # Example
//! ```rust
//! let ff1 = fpe::ff1::FF1::new(
//!     &[
//!         0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6,
//!         0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f, 0x3c,
//!     ],    // the encryption key
//!     None, // no default tweak
//!     0, 0, // no minimum/maximum tweak length
//!     10,   // radix
//! ).unwrap();
//!
//! // the first NIST-specified test vector for FF1
//! let pt = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
//! let ct = ff1.encrypt(None, &pt).unwrap();
//! assert_eq!(ct, vec![2, 4, 3, 3, 4, 7, 7, 4, 8, 4]);
//!
//! let out = ff1.decrypt(None, &ct).unwrap();
//! assert_eq!(out, pt);
//! ```

pub mod a10;
pub mod a2;
pub mod cipher;
pub mod error;
pub mod ff1;
pub mod ff3;
pub mod ffx;
pub mod ifx;
pub mod numeric;
pub mod result;
