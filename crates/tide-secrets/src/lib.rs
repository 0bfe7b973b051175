//! # Tide Secrets
//!
//! The encryption layer of Tide deployment state serialization:
//!
//! - **Opaque capability contract**: the [`Encrypter`] and [`Decrypter`]
//!   traits, implemented elsewhere by key-management backends
//! - **Identity-keyed caching**: [`CachingSecretsManager`] wraps a
//!   capability pair and guarantees that a given secret's plaintext is
//!   encrypted at most once per distinct plaintext, per identity
//! - **Bulk encryption**: an opt-in window that batches genuine cache
//!   misses into a single bulk call instead of N round trips
//! - **Local crypters**: [`NopCrypter`], [`Base64Crypter`], and a
//!   ChaCha20-Poly1305 [`SymmetricCrypter`] for passphrase-style backends
//!
//! ## Caching contract
//!
//! The cache is keyed by [`SecretIdentity`](tide_property::SecretIdentity),
//! never by plaintext: two secrets holding equal plaintext are encrypted
//! independently, while the same secret re-serialized reuses its
//! ciphertext. Decryption seeds the cache so a later re-encryption of a
//! freshly decrypted value is free.
//!
//! One manager instance serves one serialization session. Its state sits
//! behind a mutex so cross-thread use cannot corrupt memory, but callers
//! are expected to serialize access per instance; no finer-grained
//! internal locking is provided.

pub mod cipher;
pub mod crypter;
pub mod error;
pub mod manager;

// Re-export commonly used types
pub use cipher::{SecretKey, SymmetricCrypter};
pub use crypter::{Base64Crypter, Decrypter, Encrypter, NopCrypter, SecretCiphertext};
pub use error::{Error, Result};
pub use manager::{BulkEncryption, CachingDecrypter, CachingEncrypter, CachingSecretsManager};
