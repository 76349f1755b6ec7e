//! Mock keypad implementation for testing and simulation.

use crate::{
    HardwareError, Result,
    traits::{KeypadDevice, KeypadInput},
};
use tokio::sync::mpsc;

/// Number of key presses that can be queued ahead of the reader.
const INPUT_QUEUE_SIZE: usize = 64;

/// Mock keypad device.
///
/// Key presses are queued through a [`MockKeypadHandle`] and delivered in order
/// by [`KeypadDevice::read_input`].
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockKeypad;
/// use doorlock_hardware::traits::{KeypadDevice, KeypadInput};
///
/// #[tokio::main]
/// async fn main() -> doorlock_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.send_input(KeypadInput::Plus).await?;
///     handle.send_password(&[1, 2, 3, 4, 5]).await?;
///
///     assert_eq!(keypad.read_input().await?, KeypadInput::Plus);
///     assert_eq!(keypad.read_input().await?, KeypadInput::Digit(1));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated input
    input_rx: mpsc::Receiver<KeypadInput>,

    /// Device name
    name: String,
}

impl MockKeypad {
    /// Create a new mock keypad with the default name.
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a new mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (input_tx, input_rx) = mpsc::channel(INPUT_QUEUE_SIZE);

        let keypad = Self {
            input_rx,
            name: name.clone(),
        };

        let handle = MockKeypadHandle { input_tx, name };

        (keypad, handle)
    }
}

impl KeypadDevice for MockKeypad {
    async fn read_input(&mut self) -> Result<KeypadInput> {
        self.input_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected(format!("{} input channel closed", self.name)))
    }
}

/// Handle for feeding key presses to a mock keypad.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated input
    input_tx: mpsc::Sender<KeypadInput>,

    /// Device name
    name: String,
}

impl MockKeypadHandle {
    /// Send an input event to the mock keypad.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped and the channel is closed.
    pub async fn send_input(&self, input: KeypadInput) -> Result<()> {
        self.input_tx
            .send(input)
            .await
            .map_err(|_| HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Send a raw key code, as the pad's scanner would report it.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not on the pad or the channel is closed.
    pub async fn send_code(&self, code: u8) -> Result<()> {
        self.send_input(KeypadInput::from_code(code)?).await
    }

    /// Send a sequence of digit inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if any digit is greater than 9 or the channel is closed.
    pub async fn send_digits(&self, digits: &[u8]) -> Result<()> {
        for &digit in digits {
            let input = KeypadInput::digit(digit)?;
            self.send_input(input).await?;
        }
        Ok(())
    }

    /// Send a complete password followed by Enter.
    ///
    /// # Errors
    ///
    /// Returns an error if any digit is greater than 9 or the channel is closed.
    pub async fn send_password(&self, digits: &[u8]) -> Result<()> {
        self.send_digits(digits).await?;
        self.send_input(KeypadInput::Enter).await
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
