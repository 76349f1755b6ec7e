//! Console stand-ins for the physical peripherals.

use doorlock_core::constants::DISPLAY_COLUMNS;
use doorlock_hardware::{
    AlarmOutput, DisplayDevice, KeypadInput, MotorDriver, MotorState, Result,
    mock::{MockKeypadHandle, display::fit_line},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Turn one line of console input into key presses.
///
/// Digits and the symbol keys map one to one, `#` is Enter, and an empty
/// line is a bare Enter. Whitespace is ignored.
pub fn parse_line(line: &str) -> Vec<KeypadInput> {
    let line = line.trim();
    if line.is_empty() {
        return vec![KeypadInput::Enter];
    }

    line.chars()
        .filter(|c| !c.is_whitespace())
        .filter_map(|c| {
            let key = match c {
                '#' => Ok(KeypadInput::Enter),
                '0'..='9' => KeypadInput::digit(c as u8 - b'0'),
                c if c.is_ascii() => KeypadInput::from_code(c as u8),
                _ => {
                    warn!(key = %c, "Not a keypad key");
                    return None;
                }
            };
            key.inspect_err(|_| warn!(key = %c, "Not a keypad key")).ok()
        })
        .collect()
}

/// Feed stdin lines to the keypad until stdin closes.
pub async fn forward_stdin(keys: MockKeypadHandle) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        for key in parse_line(&line) {
            keys.send_input(key).await?;
        }
    }

    debug!("stdin closed");
    Ok(())
}

/// Display that prints each screen as a framed box.
#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl DisplayDevice for ConsoleDisplay {
    async fn show(&mut self, lines: [&str; 2]) -> Result<()> {
        let border = format!("+{}+", "-".repeat(DISPLAY_COLUMNS));
        let top = fit_line(lines[0])?;
        let bottom = fit_line(lines[1])?;

        println!("{border}\n|{top}|\n|{bottom}|\n{border}");
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        self.show(["", ""]).await
    }
}

/// Motor that logs every command.
#[derive(Debug, Default)]
pub struct ConsoleMotor {
    state: MotorState,
}

impl MotorDriver for ConsoleMotor {
    async fn rotate(&mut self, state: MotorState, duty: u8) -> Result<()> {
        if state != self.state {
            info!(from = %self.state, to = %state, duty, "Motor");
        }
        self.state = state;
        Ok(())
    }
}

/// Alarm output that logs when it switches.
#[derive(Debug, Default)]
pub struct ConsoleAlarm {
    active: bool,
}

impl AlarmOutput for ConsoleAlarm {
    async fn set_active(&mut self, active: bool) -> Result<()> {
        if active != self.active {
            if active {
                warn!("Alarm ON");
            } else {
                info!("Alarm off");
            }
        }
        self.active = active;
        Ok(())
    }
}
