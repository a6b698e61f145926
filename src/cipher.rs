//! The `CipherAdapter`: AES-128/192/256 wrapped as the two primitives the
//! Feistel drivers need — single-block ECB encryption (`ciph`) and a
//! CBC-MAC pseudo-random function over a block string (`prf`).
//!
//! Both are built on top of a CBC encryptor keyed with a zero IV: cloning
//! that encryptor before each call resets the chaining register, so a
//! fresh clone gives exactly one independent pass through the cipher
//! regardless of how many blocks came before it on the same `Cipher`.

use crate::error::FpeError;
use crate::result::Result;

use aes::cipher::{BlockEncryptMut, BlockSizeUser, KeyIvInit};

pub const BLOCK_SIZE: usize = 16;

#[derive(Clone)]
enum CbcType {
    Aes128(cbc::Encryptor<aes::Aes128>),
    Aes192(cbc::Encryptor<aes::Aes192>),
    Aes256(cbc::Encryptor<aes::Aes256>),
}

/// An AES key bound to a zero-IV CBC encryptor, reusable across many
/// `ciph`/`prf` calls and safe to invoke concurrently for distinct keys.
/// The raw key material is retained so [`Cipher::cbc_last_block`] can
/// build a fresh encryptor under an arbitrary IV on demand.
#[derive(Clone)]
pub struct Cipher {
    key: Vec<u8>,
    enc: CbcType,
}

macro_rules! construct_cipher {
    ($variant:ident, $key:expr, $iv:expr) => {
        CbcType::$variant(cbc::Encryptor::<aes::$variant>::new(
            $key.into(),
            $iv.into(),
        ))
    };
}

fn build_enc(key: &[u8], iv: &[u8; BLOCK_SIZE]) -> Result<CbcType> {
    Ok(match key.len() {
        16 => construct_cipher!(Aes128, key, iv),
        24 => construct_cipher!(Aes192, key, iv),
        32 => construct_cipher!(Aes256, key, iv),
        n => {
            return Err(FpeError::invalid_key(format!(
                "AES key must be 16, 24, or 32 bytes, got {}",
                n
            )))
        }
    })
}

impl Cipher {
    /// Build a cipher adapter from raw AES key material. Accepts 16, 24,
    /// or 32 bytes (AES-128/192/256); anything else is an invalid key.
    pub fn new(key: &[u8]) -> Result<Cipher> {
        let enc = build_enc(key, &[0u8; BLOCK_SIZE])?;
        Ok(Cipher {
            key: key.to_vec(),
            enc,
        })
    }

    fn encrypt_block(enc: &mut CbcType, src: &[u8], dst: &mut [u8]) {
        match enc {
            CbcType::Aes128(e) => e.encrypt_block_b2b_mut(src.into(), dst.into()),
            CbcType::Aes192(e) => e.encrypt_block_b2b_mut(src.into(), dst.into()),
            CbcType::Aes256(e) => e.encrypt_block_b2b_mut(src.into(), dst.into()),
        }
    }

    /// Single-block AES-ECB encryption. `block` must be exactly 16 bytes.
    pub fn ciph(&self, block: &[u8]) -> Result<[u8; BLOCK_SIZE]> {
        if block.len() != BLOCK_SIZE {
            return Err(FpeError::fatal(format!(
                "ciph requires a single {}-byte block, got {}",
                BLOCK_SIZE,
                block.len()
            )));
        }
        let mut c = self.enc.clone();
        let mut out = [0u8; BLOCK_SIZE];
        Self::encrypt_block(&mut c, block, &mut out);
        Ok(out)
    }

    /// AES-CBC-MAC over a block string, zero IV, returning the final
    /// 16-byte block. `x` must be a positive multiple of the block size.
    pub fn prf(&self, x: &[u8]) -> Result<[u8; BLOCK_SIZE]> {
        if x.is_empty() || x.len() % BLOCK_SIZE != 0 {
            return Err(FpeError::fatal(format!(
                "prf input must be a positive multiple of {} bytes, got {}",
                BLOCK_SIZE,
                x.len()
            )));
        }
        let mut c = self.enc.clone();
        let mut last = [0u8; BLOCK_SIZE];
        let mut block = [0u8; BLOCK_SIZE];
        for chunk in x.chunks(BLOCK_SIZE) {
            block.copy_from_slice(chunk);
            Self::encrypt_block(&mut c, &block, &mut last);
        }
        Ok(last)
    }

    /// CBC encryption under an arbitrary IV, returning the final block.
    /// `x` must be a positive multiple of the block size. Used by IFX,
    /// whose round function is keyed by a previously derived 16-byte
    /// seed rather than a zero IV.
    pub fn cbc_last_block(&self, iv: &[u8; BLOCK_SIZE], x: &[u8]) -> Result<[u8; BLOCK_SIZE]> {
        if x.is_empty() || x.len() % BLOCK_SIZE != 0 {
            return Err(FpeError::fatal(format!(
                "cbc_last_block input must be a positive multiple of {} bytes, got {}",
                BLOCK_SIZE,
                x.len()
            )));
        }
        let mut c = build_enc(&self.key, iv)?;
        let mut last = [0u8; BLOCK_SIZE];
        let mut block = [0u8; BLOCK_SIZE];
        for chunk in x.chunks(BLOCK_SIZE) {
            block.copy_from_slice(chunk);
            Self::encrypt_block(&mut c, &block, &mut last);
        }
        Ok(last)
    }

    pub fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}
