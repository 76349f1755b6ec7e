use doorlock_core::{
    Password,
    constants::{
        EXISTS_FLAG_ADDRESS, PASSWORD_ABSENT_FLAG, PASSWORD_BASE_ADDRESS, PASSWORD_PRESENT_FLAG,
        PASSWORD_SIZE,
    },
};
use doorlock_hardware::EepromDevice;
use std::time::Duration;
use tracing::{debug, info};

use crate::StorageResult;

/// Persisted credential state as read back from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialRecord {
    /// The flag byte holds the "present" sentinel.
    pub exists: bool,

    /// Contents of the password slot, meaningful only when `exists`.
    pub password: Password,
}

/// Password slot and exists flag on top of a byte EEPROM.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockEeprom;
/// use doorlock_storage::CredentialStore;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() -> doorlock_storage::StorageResult<()> {
/// let (eeprom, _handle) = MockEeprom::new();
/// let mut store = CredentialStore::new(eeprom, Duration::from_millis(10));
///
/// assert!(!store.exists().await?);
///
/// let password = "12345".parse().unwrap();
/// store.store_password(&password).await?;
/// assert!(store.exists().await?);
/// assert!(store.verify(&password).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CredentialStore<E> {
    eeprom: E,

    /// Pause after each byte write before the device accepts another transfer
    write_cycle: Duration,
}

impl<E: EepromDevice> CredentialStore<E> {
    pub fn new(eeprom: E, write_cycle: Duration) -> Self {
        Self {
            eeprom,
            write_cycle,
        }
    }

    /// Returns `true` if the flag byte holds the present sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag byte cannot be read.
    pub async fn exists(&mut self) -> StorageResult<bool> {
        let flag = self.eeprom.read_byte(EXISTS_FLAG_ADDRESS).await?;
        Ok(flag == PASSWORD_PRESENT_FLAG)
    }

    /// Read the password slot, whether or not the flag is set.
    ///
    /// # Errors
    ///
    /// Returns an error on the first byte that cannot be read.
    pub async fn read_password(&mut self) -> StorageResult<Password> {
        let mut bytes = [0u8; PASSWORD_SIZE];
        for (address, byte) in (PASSWORD_BASE_ADDRESS..).zip(bytes.iter_mut()) {
            *byte = self.eeprom.read_byte(address).await?;
        }
        Ok(Password::from_raw(bytes))
    }

    /// Read the flag and the slot together.
    pub async fn record(&mut self) -> StorageResult<CredentialRecord> {
        let exists = self.exists().await?;
        let password = self.read_password().await?;
        Ok(CredentialRecord { exists, password })
    }

    /// Compare `candidate` with the stored password.
    ///
    /// Returns `false` without reading the slot when no password is flagged
    /// as present: leftover bytes from a cleared password never match.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag or any slot byte cannot be read.
    pub async fn verify(&mut self, candidate: &Password) -> StorageResult<bool> {
        if !self.exists().await? {
            debug!("No stored password to verify against");
            return Ok(false);
        }

        let stored = self.read_password().await?;
        Ok(stored.matches(candidate))
    }

    /// Persist `password` and flag it as present.
    ///
    /// # Errors
    ///
    /// Returns an error on the first failed write. The flag is left absent
    /// unless every digit was written.
    pub async fn store_password(&mut self, password: &Password) -> StorageResult<()> {
        self.write(EXISTS_FLAG_ADDRESS, PASSWORD_ABSENT_FLAG).await?;

        for (address, &byte) in (PASSWORD_BASE_ADDRESS..).zip(password.as_bytes()) {
            self.write(address, byte).await?;
        }

        self.write(EXISTS_FLAG_ADDRESS, PASSWORD_PRESENT_FLAG).await?;
        info!("Password stored");
        Ok(())
    }

    /// Mark the stored password as absent.
    ///
    /// The slot bytes are left untouched.
    pub async fn clear(&mut self) -> StorageResult<()> {
        self.write(EXISTS_FLAG_ADDRESS, PASSWORD_ABSENT_FLAG).await?;
        info!("Password cleared");
        Ok(())
    }

    pub fn into_inner(self) -> E {
        self.eeprom
    }

    async fn write(&mut self, address: u16, value: u8) -> StorageResult<()> {
        self.eeprom.write_byte(address, value).await?;
        if !self.write_cycle.is_zero() {
            tokio::time::sleep(self.write_cycle).await;
        }
        Ok(())
    }
}
