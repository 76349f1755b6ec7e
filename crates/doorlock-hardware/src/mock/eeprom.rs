//! Mock byte-addressable EEPROM with fault injection.
//!
//! Models a 2 KiB part with an 11-bit address space: addresses wrap at the
//! device size. A fresh device reads `0xFF` everywhere.

use doorlock_core::constants::EEPROM_SIZE;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{HardwareError, Result, traits::EepromDevice};

/// Value of an erased cell.
pub const ERASED: u8 = 0xFF;

const ADDRESS_MASK: u16 = (EEPROM_SIZE - 1) as u16;

#[derive(Debug)]
struct EepromState {
    memory: Vec<u8>,
    read_faults: HashSet<u16>,
    write_faults: HashSet<u16>,
    writes: u64,
}

type Shared = Arc<Mutex<EepromState>>;

fn lock(state: &Shared) -> MutexGuard<'_, EepromState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock EEPROM device.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockEeprom;
/// use doorlock_hardware::traits::EepromDevice;
///
/// #[tokio::main]
/// async fn main() -> doorlock_hardware::Result<()> {
///     let (mut eeprom, handle) = MockEeprom::new();
///
///     eeprom.write_byte(0x00F0, 7).await?;
///     assert_eq!(handle.peek(0x00F0), 7);
///
///     handle.fail_reads_at(0x00F0);
///     assert!(eeprom.read_byte(0x00F0).await.is_err());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockEeprom {
    state: Shared,
}

impl MockEeprom {
    /// Create an erased mock EEPROM and its control handle.
    pub fn new() -> (Self, MockEepromHandle) {
        let state = Arc::new(Mutex::new(EepromState {
            memory: vec![ERASED; EEPROM_SIZE],
            read_faults: HashSet::new(),
            write_faults: HashSet::new(),
            writes: 0,
        }));

        (
            Self {
                state: Arc::clone(&state),
            },
            MockEepromHandle { state },
        )
    }
}

impl EepromDevice for MockEeprom {
    async fn read_byte(&mut self, address: u16) -> Result<u8> {
        let address = address & ADDRESS_MASK;
        let state = lock(&self.state);

        if state.read_faults.contains(&address) {
            return Err(HardwareError::bus(address, "read not acknowledged"));
        }
        Ok(state.memory[usize::from(address)])
    }

    async fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        let address = address & ADDRESS_MASK;
        let mut state = lock(&self.state);

        if state.write_faults.contains(&address) {
            return Err(HardwareError::bus(address, "write not acknowledged"));
        }
        state.memory[usize::from(address)] = value;
        state.writes += 1;
        Ok(())
    }
}

/// Handle for inspecting and faulting a mock EEPROM.
#[derive(Debug, Clone)]
pub struct MockEepromHandle {
    state: Shared,
}

impl MockEepromHandle {
    /// Read a cell directly, bypassing faults.
    pub fn peek(&self, address: u16) -> u8 {
        lock(&self.state).memory[usize::from(address & ADDRESS_MASK)]
    }

    /// Write a cell directly, bypassing faults and the write counter.
    pub fn poke(&self, address: u16, value: u8) {
        lock(&self.state).memory[usize::from(address & ADDRESS_MASK)] = value;
    }

    /// Make every read of `address` fail with a bus error.
    pub fn fail_reads_at(&self, address: u16) {
        lock(&self.state).read_faults.insert(address & ADDRESS_MASK);
    }

    /// Make every write of `address` fail with a bus error.
    pub fn fail_writes_at(&self, address: u16) {
        lock(&self.state).write_faults.insert(address & ADDRESS_MASK);
    }

    pub fn clear_faults(&self) {
        let mut state = lock(&self.state);
        state.read_faults.clear();
        state.write_faults.clear();
    }

    /// Number of successful writes through the device.
    pub fn write_count(&self) -> u64 {
        lock(&self.state).writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_device_is_erased() {
        let (mut eeprom, _handle) = MockEeprom::new();
        assert_eq!(eeprom.read_byte(0).await.unwrap(), ERASED);
        assert_eq!(eeprom.read_byte(0x07FF).await.unwrap(), ERASED);
    }

    #[tokio::test]
    async fn test_addresses_wrap_at_device_size() {
        let (mut eeprom, handle) = MockEeprom::new();

        eeprom.write_byte(0x0800 + 0x10, 0x42).await.unwrap();
        assert_eq!(handle.peek(0x10), 0x42);
    }

    #[tokio::test]
    async fn test_write_fault() {
        let (mut eeprom, handle) = MockEeprom::new();
        handle.fail_writes_at(0x00EF);

        let result = eeprom.write_byte(0x00EF, 0xA5).await;
        assert!(matches!(result, Err(HardwareError::Bus { address: 0x00EF, .. })));
        assert_eq!(handle.peek(0x00EF), ERASED);
        assert_eq!(handle.write_count(), 0);

        handle.clear_faults();
        eeprom.write_byte(0x00EF, 0xA5).await.unwrap();
        assert_eq!(handle.write_count(), 1);
    }

    #[tokio::test]
    async fn test_read_fault_leaves_contents() {
        let (mut eeprom, handle) = MockEeprom::new();
        handle.poke(0x00F1, 3);
        handle.fail_reads_at(0x00F1);

        assert!(eeprom.read_byte(0x00F1).await.is_err());
        assert_eq!(handle.peek(0x00F1), 3);
    }
}
