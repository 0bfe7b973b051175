//! Identity-keyed caching over an opaque crypter pair, plus the bulk
//! encryption window.
//!
//! One [`CachingSecretsManager`] serves one serialization session. The
//! [`CachingEncrypter`] and [`CachingDecrypter`] views it hands out share
//! the same cache, so a value decrypted through one view re-encrypts for
//! free through the other. That sharing is load-bearing: splitting the
//! views onto independent caches would break the decrypt-then-re-encrypt
//! optimization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tide_property::SecretIdentity;
use tide_property::sig::{SECRET_SIG, SIG_KEY};
use tracing::{debug, trace};

use crate::crypter::{Decrypter, Encrypter, SecretCiphertext};
use crate::error::{Error, Result};

/// A cached (plaintext, ciphertext) pair for one secret identity.
///
/// Invariant: the ciphertext is a valid encryption of the plaintext under
/// the wrapped capability.
#[derive(Clone)]
struct CacheEntry {
    plaintext: String,
    ciphertext: String,
}

/// Pending work for one open bulk encryption window.
#[derive(Default)]
struct BulkState {
    /// Distinct pending identities in first-seen order.
    order: Vec<SecretIdentity>,
    /// Pending plaintext per identity. A second request for an identity
    /// already queued updates the plaintext in place.
    pending: HashMap<SecretIdentity, String>,
}

/// Shared state behind both crypter views.
#[derive(Default)]
struct ManagerState {
    cache: HashMap<SecretIdentity, CacheEntry>,
    bulk: Option<BulkState>,
}

fn lock(state: &Mutex<ManagerState>) -> MutexGuard<'_, ManagerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wraps an `Encrypter`/`Decrypter` pair with an identity-keyed cache so
/// each secret's plaintext is encrypted at most once per distinct
/// plaintext.
///
/// The cache lives exactly as long as the manager: create one per
/// serialization session and discard it afterwards. Callers sharing one
/// instance across threads must serialize access themselves; the interior
/// mutex only guards memory safety, not ordering.
pub struct CachingSecretsManager {
    state: Arc<Mutex<ManagerState>>,
    encrypter: Arc<dyn Encrypter>,
    decrypter: Arc<dyn Decrypter>,
}

impl CachingSecretsManager {
    /// Creates a manager over the given capability pair with an empty
    /// cache.
    #[must_use]
    pub fn new(encrypter: Arc<dyn Encrypter>, decrypter: Arc<dyn Decrypter>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManagerState::default())),
            encrypter,
            decrypter,
        }
    }

    /// Returns the caching encrypter view.
    #[must_use]
    pub fn encrypter(&self) -> CachingEncrypter {
        CachingEncrypter {
            state: Arc::clone(&self.state),
            underlying: Arc::clone(&self.encrypter),
        }
    }

    /// Returns the caching decrypter view.
    #[must_use]
    pub fn decrypter(&self) -> CachingDecrypter {
        CachingDecrypter {
            state: Arc::clone(&self.state),
            underlying: Arc::clone(&self.decrypter),
        }
    }

    /// Unconditionally records a (plaintext, ciphertext) pair for an
    /// identity.
    ///
    /// The decode path uses this to seed the cache from a freshly
    /// observed pair, making a subsequent re-encryption of the newly
    /// constructed secret free.
    pub fn insert(&self, identity: SecretIdentity, plaintext: &str, ciphertext: &str) {
        insert_entry(&self.state, identity, plaintext, ciphertext);
    }

    /// Opens a bulk encryption window.
    ///
    /// While the window is open, cache misses queue for one batched call
    /// instead of dispatching immediately; cache hits still resolve
    /// instantly. Close the window with [`BulkEncryption::complete`].
    ///
    /// # Errors
    ///
    /// Returns an error if a window is already open on this manager;
    /// windows never nest or interleave.
    pub fn begin_bulk_encryption(&self) -> Result<BulkEncryption> {
        let mut state = lock(&self.state);
        if state.bulk.is_some() {
            return Err(Error::BulkWindowOpen);
        }
        state.bulk = Some(BulkState::default());
        debug!("opened bulk encryption window");
        Ok(BulkEncryption {
            state: Arc::clone(&self.state),
            encrypter: Arc::clone(&self.encrypter),
            completed: false,
        })
    }
}

impl std::fmt::Debug for CachingSecretsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("CachingSecretsManager")
            .field("cached_secrets", &state.cache.len())
            .field("bulk_window_open", &state.bulk.is_some())
            .finish()
    }
}

fn insert_entry(
    state: &Mutex<ManagerState>,
    identity: SecretIdentity,
    plaintext: &str,
    ciphertext: &str,
) {
    lock(state).cache.insert(
        identity,
        CacheEntry {
            plaintext: plaintext.to_string(),
            ciphertext: ciphertext.to_string(),
        },
    );
}

/// The encrypter view of a [`CachingSecretsManager`].
#[derive(Clone)]
pub struct CachingEncrypter {
    state: Arc<Mutex<ManagerState>>,
    underlying: Arc<dyn Encrypter>,
}

impl Encrypter for CachingEncrypter {
    fn encrypt_value(&self, plaintext: &str) -> Result<String> {
        self.underlying.encrypt_value(plaintext)
    }

    fn supports_bulk_encryption(&self) -> bool {
        self.underlying.supports_bulk_encryption()
    }

    fn bulk_encrypt(&self, plaintexts: &[String]) -> Result<Vec<String>> {
        self.underlying.bulk_encrypt(plaintexts)
    }

    fn encrypt_secret(
        &self,
        identity: SecretIdentity,
        plaintext: &str,
    ) -> Result<SecretCiphertext> {
        {
            let mut state = lock(&self.state);
            if let Some(entry) = state.cache.get(&identity) {
                if entry.plaintext == plaintext {
                    trace!(%identity, "secret encryption cache hit");
                    return Ok(SecretCiphertext::Resolved(entry.ciphertext.clone()));
                }
            }

            if let Some(bulk) = state.bulk.as_mut() {
                if !bulk.pending.contains_key(&identity) {
                    bulk.order.push(identity);
                }
                bulk.pending.insert(identity, plaintext.to_string());
                trace!(%identity, "secret queued in bulk encryption window");
                return Ok(SecretCiphertext::Pending(identity));
            }
        }

        // Cache miss, no window: dispatch now. The underlying call may
        // hit the network, so the lock is not held across it.
        let ciphertext = self.underlying.encrypt_value(plaintext)?;
        insert_entry(&self.state, identity, plaintext, &ciphertext);
        trace!(%identity, "secret encrypted and cached");
        Ok(SecretCiphertext::Resolved(ciphertext))
    }
}

/// The decrypter view of a [`CachingSecretsManager`].
#[derive(Clone)]
pub struct CachingDecrypter {
    state: Arc<Mutex<ManagerState>>,
    underlying: Arc<dyn Decrypter>,
}

impl Decrypter for CachingDecrypter {
    fn decrypt_value(&self, ciphertext: &str) -> Result<String> {
        self.underlying.decrypt_value(ciphertext)
    }

    fn bulk_decrypt(&self, ciphertexts: &[String]) -> Result<Vec<String>> {
        self.underlying.bulk_decrypt(ciphertexts)
    }

    fn seed_secret(&self, identity: SecretIdentity, plaintext: &str, ciphertext: &str) {
        insert_entry(&self.state, identity, plaintext, ciphertext);
        trace!(%identity, "cache seeded from decrypted secret");
    }
}

/// An open bulk encryption window.
///
/// Dropping the window without completing it discards all queued work
/// and closes the window; no placeholders are filled.
pub struct BulkEncryption {
    state: Arc<Mutex<ManagerState>>,
    encrypter: Arc<dyn Encrypter>,
    completed: bool,
}

impl BulkEncryption {
    /// Closes the window: issues one bulk encrypt call for the queued
    /// plaintexts, updates the cache, and patches every pending
    /// ciphertext placeholder in `roots` with its real ciphertext.
    ///
    /// All-or-nothing: on any error no placeholders are filled and no
    /// cache entries are created. The window is closed either way, and a
    /// new one may then be opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying encrypter has no bulk support,
    /// if the bulk call itself fails, or if the response length does not
    /// match the request.
    pub fn complete(mut self, roots: &mut [&mut Value]) -> Result<()> {
        self.completed = true;

        // Closing the window up front keeps every exit path consistent.
        let bulk = lock(&self.state).bulk.take().unwrap_or_default();

        if !self.encrypter.supports_bulk_encryption() {
            return Err(Error::BulkUnsupported);
        }
        if bulk.order.is_empty() {
            debug!("bulk encryption window closed with no pending secrets");
            return Ok(());
        }

        let plaintexts: Vec<String> = bulk
            .order
            .iter()
            .filter_map(|identity| bulk.pending.get(identity).cloned())
            .collect();

        let ciphertexts = self.encrypter.bulk_encrypt(&plaintexts)?;
        if ciphertexts.len() != plaintexts.len() {
            return Err(Error::BulkLengthMismatch {
                expected: plaintexts.len(),
                got: ciphertexts.len(),
            });
        }

        let mut results: HashMap<SecretIdentity, String> = HashMap::new();
        {
            let mut state = lock(&self.state);
            for (identity, ciphertext) in bulk.order.iter().zip(&ciphertexts) {
                if let Some(plaintext) = bulk.pending.get(identity) {
                    state.cache.insert(
                        *identity,
                        CacheEntry {
                            plaintext: plaintext.clone(),
                            ciphertext: ciphertext.clone(),
                        },
                    );
                }
                results.insert(*identity, ciphertext.clone());
            }
        }

        for root in roots {
            patch_pending_ciphertexts(root, &results);
        }

        debug!(
            secrets = bulk.order.len(),
            "bulk encryption window completed"
        );
        Ok(())
    }
}

impl Drop for BulkEncryption {
    fn drop(&mut self) {
        if !self.completed {
            lock(&self.state).bulk = None;
            debug!("bulk encryption window abandoned");
        }
    }
}

/// Walks a serialized wire tree, replacing every pending ciphertext
/// placeholder whose identity appears in `results` with the real
/// ciphertext. Multiple placeholders for one identity all get the single
/// batch result.
fn patch_pending_ciphertexts(value: &mut Value, results: &HashMap<SecretIdentity, String>) {
    match value {
        Value::Object(map) => {
            if map.get(SIG_KEY).and_then(Value::as_str) == Some(SECRET_SIG) {
                if let Some(Value::String(slot)) = map.get_mut("ciphertext") {
                    if let Some(identity) = SecretCiphertext::parse_pending(slot) {
                        if let Some(ciphertext) = results.get(&identity) {
                            *slot = ciphertext.clone();
                        }
                    }
                }
            } else {
                for nested in map.values_mut() {
                    patch_pending_ciphertexts(nested, results);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                patch_pending_ciphertexts(item, results);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::crypter::{Base64Crypter, NopCrypter};

    /// A base64 crypter that counts calls into the underlying capability.
    #[derive(Default)]
    struct CountingCrypter {
        encrypts: AtomicUsize,
        bulk_encrypts: AtomicUsize,
        decrypts: AtomicUsize,
    }

    impl Encrypter for CountingCrypter {
        fn encrypt_value(&self, plaintext: &str) -> Result<String> {
            self.encrypts.fetch_add(1, Ordering::SeqCst);
            Base64Crypter.encrypt_value(plaintext)
        }

        fn supports_bulk_encryption(&self) -> bool {
            true
        }

        fn bulk_encrypt(&self, plaintexts: &[String]) -> Result<Vec<String>> {
            self.bulk_encrypts.fetch_add(1, Ordering::SeqCst);
            Base64Crypter.bulk_encrypt(plaintexts)
        }
    }

    impl Decrypter for CountingCrypter {
        fn decrypt_value(&self, ciphertext: &str) -> Result<String> {
            self.decrypts.fetch_add(1, Ordering::SeqCst);
            Base64Crypter.decrypt_value(ciphertext)
        }
    }

    fn manager_with_counter() -> (CachingSecretsManager, Arc<CountingCrypter>) {
        let counter = Arc::new(CountingCrypter::default());
        let manager = CachingSecretsManager::new(
            Arc::clone(&counter) as Arc<dyn Encrypter>,
            Arc::clone(&counter) as Arc<dyn Decrypter>,
        );
        (manager, counter)
    }

    fn resolved(result: Result<SecretCiphertext>) -> String {
        match result.expect("encrypt_secret") {
            SecretCiphertext::Resolved(ciphertext) => ciphertext,
            SecretCiphertext::Pending(identity) => {
                panic!("expected resolved ciphertext, got pending {identity}")
            }
        }
    }

    #[test]
    fn distinct_identities_with_equal_plaintext_encrypt_independently() {
        let (manager, counter) = manager_with_counter();
        let encrypter = manager.encrypter();
        let a = SecretIdentity::new();
        let b = SecretIdentity::new();

        let ct_a = resolved(encrypter.encrypt_secret(a, "foo"));
        let ct_b = resolved(encrypter.encrypt_secret(b, "foo"));

        // Identity-keyed, not plaintext-keyed: two underlying calls.
        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 2);
        // Base64 of equal plaintext is equal, but each got its own call
        // and its own cache slot.
        assert_eq!(ct_a, ct_b);
        assert_eq!(resolved(encrypter.encrypt_secret(a, "foo")), ct_a);
        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unchanged_plaintext_reuses_cached_ciphertext() {
        let (manager, counter) = manager_with_counter();
        let encrypter = manager.encrypter();
        let identity = SecretIdentity::new();

        let first = resolved(encrypter.encrypt_secret(identity, "foo"));
        let second = resolved(encrypter.encrypt_secret(identity, "foo"));

        assert_eq!(first, second);
        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn changed_plaintext_re_encrypts_and_overwrites() {
        let (manager, counter) = manager_with_counter();
        let encrypter = manager.encrypter();
        let identity = SecretIdentity::new();

        let first = resolved(encrypter.encrypt_secret(identity, "foo"));
        let second = resolved(encrypter.encrypt_secret(identity, "bar"));
        assert_ne!(first, second);
        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 2);

        // The new pair replaced the old one.
        let third = resolved(encrypter.encrypt_secret(identity, "bar"));
        assert_eq!(second, third);
        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn insert_makes_re_encryption_free() {
        let (manager, counter) = manager_with_counter();
        let identity = SecretIdentity::new();

        manager.insert(identity, "foo", "ciphertext-from-decode");

        let ciphertext = resolved(manager.encrypter().encrypt_secret(identity, "foo"));
        assert_eq!(ciphertext, "ciphertext-from-decode");
        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn seed_secret_via_decrypter_view_is_visible_to_encrypter_view() {
        let (manager, counter) = manager_with_counter();
        let identity = SecretIdentity::new();

        // Both views share one cache.
        manager.decrypter().seed_secret(identity, "foo", "seeded");

        let ciphertext = resolved(manager.encrypter().encrypt_secret(identity, "foo"));
        assert_eq!(ciphertext, "seeded");
        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn underlying_error_is_not_cached() {
        struct FailingEncrypter;
        impl Encrypter for FailingEncrypter {
            fn encrypt_value(&self, _plaintext: &str) -> Result<String> {
                Err(Error::Encryption {
                    reason: "kms offline".to_string(),
                })
            }
        }

        let manager = CachingSecretsManager::new(
            Arc::new(FailingEncrypter),
            Arc::new(NopCrypter),
        );
        let encrypter = manager.encrypter();
        let identity = SecretIdentity::new();

        assert!(encrypter.encrypt_secret(identity, "foo").is_err());
        // Still a miss afterwards: the failure left no entry behind.
        assert!(encrypter.encrypt_secret(identity, "foo").is_err());
    }

    #[test]
    fn bulk_window_batches_misses_into_one_call() {
        let (manager, counter) = manager_with_counter();
        let encrypter = manager.encrypter();
        let a = SecretIdentity::new();
        let b = SecretIdentity::new();

        let window = manager.begin_bulk_encryption().expect("open window");

        let pending_a = encrypter.encrypt_secret(a, "foo").expect("queue a");
        let pending_b = encrypter.encrypt_secret(b, "foo").expect("queue b");
        assert_eq!(pending_a, SecretCiphertext::Pending(a));
        assert_eq!(pending_b, SecretCiphertext::Pending(b));

        let mut wire = json!({
            "a": {SIG_KEY: SECRET_SIG, "ciphertext": pending_a.into_wire()},
            "b": {SIG_KEY: SECRET_SIG, "ciphertext": pending_b.into_wire()},
        });

        // Nothing dispatched while the window is open.
        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 0);
        assert_eq!(counter.bulk_encrypts.load(Ordering::SeqCst), 0);

        window.complete(&mut [&mut wire]).expect("complete");

        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 0);
        assert_eq!(counter.bulk_encrypts.load(Ordering::SeqCst), 1);

        let expected = Base64Crypter.encrypt_value("foo").expect("base64");
        assert_eq!(wire["a"]["ciphertext"], expected);
        assert_eq!(wire["b"]["ciphertext"], expected);
    }

    #[test]
    fn cache_hits_bypass_an_open_window() {
        let (manager, counter) = manager_with_counter();
        let encrypter = manager.encrypter();
        let identity = SecretIdentity::new();

        let cached = resolved(encrypter.encrypt_secret(identity, "foo"));
        assert_eq!(counter.encrypts.load(Ordering::SeqCst), 1);

        let window = manager.begin_bulk_encryption().expect("open window");
        let hit = resolved(encrypter.encrypt_secret(identity, "foo"));
        assert_eq!(hit, cached);

        window.complete(&mut []).expect("complete");
        // The hit never entered the batch.
        assert_eq!(counter.bulk_encrypts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn second_window_only_batches_new_identities() {
        let (manager, counter) = manager_with_counter();
        let encrypter = manager.encrypter();
        let a = SecretIdentity::new();
        let c = SecretIdentity::new();

        // Batch 1 = {A}.
        let window = manager.begin_bulk_encryption().expect("open window 1");
        let pending_a = encrypter.encrypt_secret(a, "foo").expect("queue a");
        let mut wire_a = json!({SIG_KEY: SECRET_SIG, "ciphertext": pending_a.into_wire()});
        window.complete(&mut [&mut wire_a]).expect("complete 1");
        let ct_a = wire_a["ciphertext"].as_str().expect("ciphertext").to_string();

        // Batch 2 = {A (hit), C (miss)}.
        let window = manager.begin_bulk_encryption().expect("open window 2");
        let hit = resolved(encrypter.encrypt_secret(a, "foo"));
        assert_eq!(hit, ct_a);

        let pending_c = encrypter.encrypt_secret(c, "baz").expect("queue c");
        assert_eq!(pending_c, SecretCiphertext::Pending(c));
        let mut wire_c = json!({SIG_KEY: SECRET_SIG, "ciphertext": pending_c.into_wire()});
        window.complete(&mut [&mut wire_c]).expect("complete 2");

        assert_eq!(counter.bulk_encrypts.load(Ordering::SeqCst), 2);
        assert_eq!(
            wire_c["ciphertext"],
            Base64Crypter.encrypt_value("baz").expect("base64")
        );
    }

    #[test]
    fn duplicate_identity_queues_once_fills_every_placeholder() {
        let (manager, counter) = manager_with_counter();
        let encrypter = manager.encrypter();
        let identity = SecretIdentity::new();

        let window = manager.begin_bulk_encryption().expect("open window");
        let first = encrypter.encrypt_secret(identity, "foo").expect("queue 1");
        let second = encrypter.encrypt_secret(identity, "foo").expect("queue 2");

        let mut wire = json!([
            {SIG_KEY: SECRET_SIG, "ciphertext": first.into_wire()},
            {SIG_KEY: SECRET_SIG, "ciphertext": second.into_wire()},
        ]);
        window.complete(&mut [&mut wire]).expect("complete");

        assert_eq!(counter.bulk_encrypts.load(Ordering::SeqCst), 1);
        let expected = Base64Crypter.encrypt_value("foo").expect("base64");
        assert_eq!(wire[0]["ciphertext"], expected);
        assert_eq!(wire[1]["ciphertext"], expected);
    }

    #[test]
    fn windows_do_not_nest() {
        let (manager, _counter) = manager_with_counter();

        let window = manager.begin_bulk_encryption().expect("open window");
        assert!(matches!(
            manager.begin_bulk_encryption(),
            Err(Error::BulkWindowOpen)
        ));

        window.complete(&mut []).expect("complete");
        // A new window may open after the prior one closed.
        assert!(manager.begin_bulk_encryption().is_ok());
    }

    #[test]
    fn dropped_window_closes_without_filling() {
        let (manager, counter) = manager_with_counter();
        let encrypter = manager.encrypter();
        let identity = SecretIdentity::new();

        {
            let _window = manager.begin_bulk_encryption().expect("open window");
            let _ = encrypter.encrypt_secret(identity, "foo").expect("queue");
        }

        assert_eq!(counter.bulk_encrypts.load(Ordering::SeqCst), 0);
        // Window is closed; the next one opens cleanly.
        assert!(manager.begin_bulk_encryption().is_ok());
    }

    #[test]
    fn completion_against_incapable_backend_fails() {
        let manager =
            CachingSecretsManager::new(Arc::new(NopCrypter), Arc::new(NopCrypter));
        let encrypter = manager.encrypter();
        let identity = SecretIdentity::new();

        let window = manager.begin_bulk_encryption().expect("open window");
        let pending = encrypter.encrypt_secret(identity, "foo").expect("queue");
        let mut wire = json!({SIG_KEY: SECRET_SIG, "ciphertext": pending.into_wire()});

        let result = window.complete(&mut [&mut wire]);
        assert!(matches!(result, Err(Error::BulkUnsupported)));

        // Nothing was filled and nothing was cached.
        let slot = wire["ciphertext"].as_str().expect("slot");
        assert!(slot.starts_with("pending://"));
        assert!(matches!(
            encrypter.encrypt_secret(identity, "foo").expect("retry"),
            SecretCiphertext::Resolved(_)
        ));
    }

    #[test]
    fn failed_bulk_call_fills_nothing_and_caches_nothing() {
        struct FailingBulk;
        impl Encrypter for FailingBulk {
            fn encrypt_value(&self, plaintext: &str) -> Result<String> {
                Base64Crypter.encrypt_value(plaintext)
            }
            fn supports_bulk_encryption(&self) -> bool {
                true
            }
            fn bulk_encrypt(&self, _plaintexts: &[String]) -> Result<Vec<String>> {
                Err(Error::Encryption {
                    reason: "bulk endpoint down".to_string(),
                })
            }
        }

        let manager =
            CachingSecretsManager::new(Arc::new(FailingBulk), Arc::new(NopCrypter));
        let encrypter = manager.encrypter();
        let identity = SecretIdentity::new();

        let window = manager.begin_bulk_encryption().expect("open window");
        let pending = encrypter.encrypt_secret(identity, "foo").expect("queue");
        let mut wire = json!({SIG_KEY: SECRET_SIG, "ciphertext": pending.into_wire()});

        assert!(window.complete(&mut [&mut wire]).is_err());
        let slot = wire["ciphertext"].as_str().expect("slot");
        assert!(slot.starts_with("pending://"));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        struct ShortBulk;
        impl Encrypter for ShortBulk {
            fn encrypt_value(&self, plaintext: &str) -> Result<String> {
                Base64Crypter.encrypt_value(plaintext)
            }
            fn supports_bulk_encryption(&self) -> bool {
                true
            }
            fn bulk_encrypt(&self, _plaintexts: &[String]) -> Result<Vec<String>> {
                Ok(vec![])
            }
        }

        let manager =
            CachingSecretsManager::new(Arc::new(ShortBulk), Arc::new(NopCrypter));
        let encrypter = manager.encrypter();

        let window = manager.begin_bulk_encryption().expect("open window");
        let _ = encrypter
            .encrypt_secret(SecretIdentity::new(), "foo")
            .expect("queue");

        let result = window.complete(&mut []);
        assert!(matches!(result, Err(Error::BulkLengthMismatch { .. })));
    }

    #[test]
    fn debug_reports_cache_size_without_contents() {
        let (manager, _counter) = manager_with_counter();
        manager.insert(SecretIdentity::new(), "plain", "cipher");

        let debug = format!("{manager:?}");
        assert!(debug.contains("cached_secrets: 1"));
        assert!(!debug.contains("plain"));
    }
}
