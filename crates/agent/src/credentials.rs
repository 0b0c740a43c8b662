use aes_gcm::aead::{Aead, Key, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use rand::Rng;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CREDENTIAL_KEY: &str = "userApiKey";

const STORE_FILE: &str = "storage.bin";
const SECRET_KEY_FILE: &str = ".secret_key";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Durable key-value storage for the user's API key, encrypted at rest.
///
/// The store is read on every use; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_location() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "codehelper", "codehelper")
            .ok_or_else(|| anyhow!("Could not determine project directories"))?;
        Ok(Self::at(proj_dirs.data_dir()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The saved key, or `None` when nothing (or only whitespace) is stored.
    pub fn load(&self) -> Result<Option<String>> {
        let mut entries = self.read_entries()?;
        Ok(entries
            .remove(CREDENTIAL_KEY)
            .filter(|value| !value.trim().is_empty()))
    }

    /// Replaces the stored key. A store that can no longer be decrypted is
    /// discarded rather than blocking the write.
    pub fn save(&self, value: &str) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            warn!("Discarding unreadable credential store: {}", e);
            BTreeMap::new()
        });
        entries.insert(CREDENTIAL_KEY.to_string(), value.to_string());
        self.write_entries(&entries)?;
        info!("API key saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(CREDENTIAL_KEY).is_some() {
            self.write_entries(&entries)?;
            info!("API key cleared");
        }
        Ok(())
    }

    fn store_path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let sealed = fs::read(&path)?;
        let plain = open(&self.cipher()?, &sealed)?;
        Ok(serde_json::from_slice(&plain)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec(entries)?;
        let sealed = seal(&self.cipher()?, &json)?;
        write_secure_file(&self.store_path(), &sealed)
    }

    /// Cipher keyed from `.secret_key`, creating the key file on first use.
    fn cipher(&self) -> Result<Aes256Gcm> {
        let path = self.dir.join(SECRET_KEY_FILE);
        let existing = if path.exists() { fs::read(&path)? } else { Vec::new() };

        let key = match <[u8; KEY_LEN]>::try_from(existing.as_slice()) {
            Ok(key) => key,
            Err(_) => {
                fs::create_dir_all(&self.dir)?;
                let mut key = [0u8; KEY_LEN];
                rand::thread_rng().fill(&mut key);
                write_secure_file(&path, &key)?;
                key
            }
        };

        Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)))
    }
}

/// `nonce || ciphertext` with a fresh random nonce.
fn seal(cipher: &Aes256Gcm, plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill(&mut nonce);
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| anyhow!("Encryption failed"))?;

    let mut sealed = nonce.to_vec();
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

fn open(cipher: &Aes256Gcm, sealed: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < NONCE_LEN {
        return Err(anyhow!("Invalid ciphertext"));
    }
    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| anyhow!("Decryption failed"))
}

fn write_secure_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_key() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CredentialStore::at(dir.path());
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn saved_key_round_trips_and_is_not_plaintext() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CredentialStore::at(dir.path().join("nested"));
        store.save("AIzaSyExample").expect("save");

        assert_eq!(store.load().expect("load").as_deref(), Some("AIzaSyExample"));
        let raw = fs::read(store.dir().join(STORE_FILE)).expect("raw store");
        assert!(!String::from_utf8_lossy(&raw).contains("AIzaSyExample"));

        let reopened = CredentialStore::at(dir.path().join("nested"));
        assert_eq!(reopened.load().expect("load").as_deref(), Some("AIzaSyExample"));
    }

    #[test]
    fn blank_value_reads_as_absent() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CredentialStore::at(dir.path());
        store.save("   ").expect("save");
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn clear_removes_the_key() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CredentialStore::at(dir.path());
        store.save("k").expect("save");
        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn corrupted_store_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CredentialStore::at(dir.path());
        store.save("k").expect("save");
        fs::write(dir.path().join(STORE_FILE), b"garbage-bytes-here").expect("corrupt");
        assert!(store.load().is_err());
    }

    #[test]
    fn save_recovers_from_lost_secret_key() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CredentialStore::at(dir.path());
        store.save("old-key").expect("save");
        fs::remove_file(dir.path().join(SECRET_KEY_FILE)).expect("remove key");

        assert!(store.load().is_err());
        store.save("new-key").expect("save after key loss");
        assert_eq!(store.load().expect("load").as_deref(), Some("new-key"));
    }

    #[test]
    fn save_recovers_from_corrupt_store() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CredentialStore::at(dir.path());
        store.save("old-key").expect("save");
        fs::write(dir.path().join(STORE_FILE), b"x").expect("corrupt");
        fs::remove_file(dir.path().join(SECRET_KEY_FILE)).expect("remove key");

        store.save("new-key").expect("save over corrupt store");
        assert_eq!(store.load().expect("load").as_deref(), Some("new-key"));
    }

    #[cfg(unix)]
    #[test]
    fn files_are_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CredentialStore::at(dir.path());
        store.save("k").expect("save");
        for name in [STORE_FILE, SECRET_KEY_FILE] {
            let mode = fs::metadata(dir.path().join(name))
                .expect("metadata")
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600, "{name}");
        }
    }
}
