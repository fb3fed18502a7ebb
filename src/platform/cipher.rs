// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password encoding for the platform login protocol.
//!
//! The platform expects the password as a single AES-CBC block:
//!
//! 1. the UTF-8 password is copied into a zero-filled 16-byte buffer
//!    (longer passwords are cut at 16 bytes),
//! 2. that one block is encrypted with the per-request key/IV from the hash
//!    info interface, with no PKCS#7 padding,
//! 3. the ciphertext is base64 encoded (standard alphabet, padded).
//!
//! The scheme is dictated by the platform and must not change.

use aes::{
    cipher::{generic_array::GenericArray, BlockEncryptMut, KeyIvInit},
    Aes128, Aes192, Aes256,
};
use base64ct::{Base64, Encoding};

use super::types::CipherMaterial;

/// AES block size; also the fixed plaintext length of an encoded password.
pub const BLOCK_SIZE: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("key must be 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("iv must be 16 bytes, got {0}")]
    InvalidIvLength(usize),
}

/// Encode `password` with the platform's single-block scheme.
pub fn encode_password(material: &CipherMaterial, password: &str) -> Result<String, CipherError> {
    let ciphertext = encrypt_block(
        material.key.as_bytes(),
        material.iv.as_bytes(),
        pad_block(password),
    )?;
    Ok(Base64::encode_string(&ciphertext))
}

/// Copy `password` into one zero-filled block, truncating at the block boundary.
fn pad_block(password: &str) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    let bytes = password.as_bytes();
    let len = bytes.len().min(BLOCK_SIZE);
    block[..len].copy_from_slice(&bytes[..len]);
    block
}

fn encrypt_block(
    key: &[u8],
    iv: &[u8],
    mut block: [u8; BLOCK_SIZE],
) -> Result<[u8; BLOCK_SIZE], CipherError> {
    if iv.len() != BLOCK_SIZE {
        return Err(CipherError::InvalidIvLength(iv.len()));
    }

    let target = GenericArray::from_mut_slice(&mut block);
    match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
            .encrypt_block_mut(target),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
            .encrypt_block_mut(target),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
            .encrypt_block_mut(target),
        other => return Err(CipherError::InvalidKeyLength(other)),
    }

    Ok(block)
}
