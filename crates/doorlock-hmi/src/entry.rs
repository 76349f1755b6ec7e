//! Password entry on the keypad.

use doorlock_core::{Password, constants::PASSWORD_SIZE};
use doorlock_hardware::{DisplayDevice, KeypadDevice, KeypadInput};
use tracing::trace;

use crate::{HmiError, Screen};

/// Which prompt heads the entry screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Enter,
    Reenter,
}

impl Prompt {
    fn screen(self, entered: usize) -> Screen {
        match self {
            Prompt::Enter => Screen::EnterPassword { entered },
            Prompt::Reenter => Screen::ReenterPassword { entered },
        }
    }
}

/// Read one password from the keypad.
///
/// Exactly [`PASSWORD_SIZE`] digits are taken; any other key is ignored
/// while digits are being collected. Once the slots are full, keys other
/// than Enter (extra digits included) are ignored until Enter is pressed.
/// Each accepted digit is echoed as a mask character.
///
/// # Errors
///
/// Returns an error if the keypad fails.
pub async fn collect_password<K, D>(
    keypad: &mut K,
    display: &mut D,
    prompt: Prompt,
) -> Result<Password, HmiError>
where
    K: KeypadDevice,
    D: DisplayDevice,
{
    let mut digits = [0u8; PASSWORD_SIZE];
    prompt.screen(0).render(display).await;

    let mut entered = 0;
    while entered < PASSWORD_SIZE {
        match keypad.read_input().await? {
            KeypadInput::Digit(d) => {
                digits[entered] = d;
                entered += 1;
                prompt.screen(entered).render(display).await;
            }
            other => trace!(key = ?other, "Ignoring non-digit key"),
        }
    }

    loop {
        match keypad.read_input().await? {
            KeypadInput::Enter => break,
            other => trace!(key = ?other, "Waiting for Enter"),
        }
    }

    Ok(Password::from_raw(digits))
}
