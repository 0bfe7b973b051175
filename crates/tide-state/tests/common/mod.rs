//! Shared test doubles for the serialization suites.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tide_secrets::{Decrypter, Encrypter, Error, Result};

/// A fake capability that counts calls and produces a unique ciphertext
/// per call, so equal plaintexts encrypted separately stay
/// distinguishable.
///
/// Ciphertexts look like `cipher-<n>:<plaintext>`; decryption strips the
/// prefix.
#[derive(Default)]
pub struct CountingCrypter {
    encrypts: AtomicUsize,
    bulk_encrypts: AtomicUsize,
    decrypts: AtomicUsize,
    last_bulk_request: Mutex<Vec<String>>,
}

#[allow(dead_code)] // not every suite uses every accessor
impl CountingCrypter {
    pub fn encrypt_calls(&self) -> usize {
        self.encrypts.load(Ordering::SeqCst)
    }

    pub fn bulk_encrypt_calls(&self) -> usize {
        self.bulk_encrypts.load(Ordering::SeqCst)
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypts.load(Ordering::SeqCst)
    }

    pub fn last_bulk_request(&self) -> Vec<String> {
        self.last_bulk_request
            .lock()
            .expect("lock last bulk request")
            .clone()
    }
}

impl Encrypter for CountingCrypter {
    fn encrypt_value(&self, plaintext: &str) -> Result<String> {
        let n = self.encrypts.fetch_add(1, Ordering::SeqCst);
        Ok(format!("cipher-{n}:{plaintext}"))
    }

    fn supports_bulk_encryption(&self) -> bool {
        true
    }

    fn bulk_encrypt(&self, plaintexts: &[String]) -> Result<Vec<String>> {
        let n = self.bulk_encrypts.fetch_add(1, Ordering::SeqCst);
        *self
            .last_bulk_request
            .lock()
            .expect("lock last bulk request") = plaintexts.to_vec();
        Ok(plaintexts
            .iter()
            .enumerate()
            .map(|(i, plaintext)| format!("bulk-{n}-{i}:{plaintext}"))
            .collect())
    }
}

impl Decrypter for CountingCrypter {
    fn decrypt_value(&self, ciphertext: &str) -> Result<String> {
        self.decrypts.fetch_add(1, Ordering::SeqCst);
        ciphertext
            .split_once(':')
            .map(|(_, plaintext)| plaintext.to_string())
            .ok_or_else(|| Error::Decryption {
                reason: format!("unrecognized test ciphertext: {ciphertext}"),
            })
    }
}
