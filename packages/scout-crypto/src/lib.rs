//! Symmetric encryption for stored OAuth tokens.
//!
//! The at-rest format is `hex(nonce(12) || ciphertext || tag(16))` under
//! AES-256-GCM, keyed by a bare SHA-256 of the configured secret. The key
//! derivation has no salt and no stretching; it is kept exactly as-is because
//! every previously stored record was written under it, and changing it would
//! make those records undecryptable. See DESIGN.md before touching this.

use aes_gcm::{
	Aes256Gcm, Key, Nonce,
	aead::{Aead, AeadCore, KeyInit, OsRng},
};
use sha2::{Digest, Sha256};

pub type Result<T, E = Error> = std::result::Result<T, E>;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Encryption failed.")]
	Encrypt,
	#[error("Decryption failed: ciphertext is malformed or the secret is wrong.")]
	Decrypt,
}

/// Encrypts `plaintext` under the secret-derived key with a fresh random
/// nonce, returning `hex(nonce || ciphertext || tag)`.
pub fn encrypt(plaintext: &str, secret: &str) -> Result<String> {
	let cipher = cipher_for(secret);
	let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
	let sealed = cipher.encrypt(&nonce, plaintext.as_bytes()).map_err(|_| Error::Encrypt)?;
	let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());

	out.extend_from_slice(&nonce);
	out.extend_from_slice(&sealed);

	Ok(hex::encode(out))
}

/// Reverses [`encrypt`]. Fails with [`Error::Decrypt`] on malformed hex, a
/// truncated payload, a non-UTF-8 plaintext, or an authentication-tag
/// mismatch (wrong secret or tampered data).
pub fn decrypt(encoded: &str, secret: &str) -> Result<String> {
	let raw = hex::decode(encoded).map_err(|_| Error::Decrypt)?;

	if raw.len() < NONCE_LEN + TAG_LEN {
		return Err(Error::Decrypt);
	}

	let (nonce, sealed) = raw.split_at(NONCE_LEN);
	let cipher = cipher_for(secret);
	let plaintext =
		cipher.decrypt(Nonce::from_slice(nonce), sealed).map_err(|_| Error::Decrypt)?;

	String::from_utf8(plaintext).map_err(|_| Error::Decrypt)
}

fn cipher_for(secret: &str) -> Aes256Gcm {
	let digest = Sha256::digest(secret.as_bytes());

	Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&digest))
}
