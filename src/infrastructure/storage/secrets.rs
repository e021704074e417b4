use crate::domain::error::AppError;
use crate::domain::traits::SecretStore;
use keyring::Entry;

pub const KEYCHAIN_SERVICE: &str = "TranslatorHotkey";

/// OS credential vault via keyring: Keychain, Credential Manager, or the
/// Secret Service with the kernel keyutils cache on Linux.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(KEYCHAIN_SERVICE)
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, account: &str) -> Result<Option<String>, AppError> {
        let entry = Entry::new(&self.service, account)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, account: &str, value: &str) -> Result<(), AppError> {
        let entry = Entry::new(&self.service, account)?;
        entry.set_password(value)?;
        Ok(())
    }
}
