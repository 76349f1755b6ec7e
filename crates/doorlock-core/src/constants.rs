//! Core constants shared by both nodes of the door lock.
//!
//! The device is split into a user-interface node (keypad + display) and an
//! actuator node (door motor + alarm + credential EEPROM). Both firmware images
//! are built from this workspace, so every value the two nodes must agree on is
//! defined exactly once, here.
//!
//! # Storage Layout
//!
//! ```text
//! 0x00EF        0x00F0 .. 0x00F4
//! +------+      +----+----+----+----+----+
//! | FLAG |      | d0 | d1 | d2 | d3 | d4 |
//! +------+      +----+----+----+----+----+
//!  ^ PASSWORD_PRESENT_FLAG when a password is stored
//! ```
//!
//! # Usage
//!
//! ```
//! use doorlock_core::constants::*;
//!
//! assert_eq!(EXISTS_FLAG_ADDRESS + 1, PASSWORD_BASE_ADDRESS);
//! assert_eq!(PASSWORD_SIZE, 5);
//! ```

// ============================================================================
// Credentials
// ============================================================================

/// Number of digits in a password.
///
/// Both nodes size their buffers and wire payloads from this value; the
/// receiver of a password payload knows how many bytes to read from the
/// opcode alone.
pub const PASSWORD_SIZE: usize = 5;

/// Largest value a password digit may take.
pub const MAX_DIGIT: u8 = 9;

// ============================================================================
// Persistent Storage Layout
// ============================================================================

/// First EEPROM address of the password slot.
///
/// `PASSWORD_SIZE` consecutive bytes starting here hold the password.
pub const PASSWORD_BASE_ADDRESS: u16 = 0x00F0;

/// EEPROM address of the "password exists" flag byte.
///
/// Sits immediately before the password slot.
pub const EXISTS_FLAG_ADDRESS: u16 = PASSWORD_BASE_ADDRESS - 1;

/// Flag value meaning "a complete password is stored".
///
/// Any other value at [`EXISTS_FLAG_ADDRESS`] means absent.
pub const PASSWORD_PRESENT_FLAG: u8 = 0xA5;

/// Flag value written when the password is reset.
pub const PASSWORD_ABSENT_FLAG: u8 = 0x00;

/// Size of the byte-addressable EEPROM in bytes (24C16, 11-bit addresses).
pub const EEPROM_SIZE: usize = 2048;

/// Time the EEPROM needs to commit a byte write (milliseconds).
///
/// # Value: 10ms
pub const DEFAULT_WRITE_CYCLE_MS: u64 = 10;

// ============================================================================
// Keypad Codes
// ============================================================================

/// Raw code produced by the Enter key.
pub const KEY_ENTER: u8 = 13;

/// Raw code of the key that selects "open door" in the main menu.
pub const KEY_OPEN_DOOR: u8 = b'+';

/// Raw code of the key that selects "change password" in the main menu.
pub const KEY_CHANGE_PASSWORD: u8 = b'-';

// ============================================================================
// Timing
// ============================================================================

/// Seconds the motor runs forward to unlock the door.
///
/// # Value: 15 seconds
pub const DEFAULT_UNLOCK_SECS: u32 = 15;

/// Seconds the door is held open with the motor stopped.
///
/// # Value: 3 seconds
pub const DEFAULT_HOLD_SECS: u32 = 3;

/// Seconds the motor runs in reverse to re-lock the door.
///
/// # Value: 15 seconds
pub const DEFAULT_LOCK_SECS: u32 = 15;

/// Seconds the alarm output stays active once triggered.
///
/// # Value: 60 seconds
pub const DEFAULT_ALARM_SECS: u32 = 60;

/// Consecutive wrong passwords that trigger the alarm.
///
/// # Value: 3 attempts
pub const DEFAULT_MAX_WRONG_ATTEMPTS: u8 = 3;

/// Motor drive duty used for every motor command (percent).
///
/// # Value: 100%
pub const DEFAULT_MOTOR_DUTY: u8 = 100;

/// Maximum motor drive duty (percent).
pub const MAX_MOTOR_DUTY: u8 = 100;

/// How long the "wrong password" notice stays on screen (milliseconds).
///
/// # Value: 500ms
pub const DEFAULT_WRONG_PASSWORD_NOTICE_MS: u64 = 500;

/// How long the "change password" notice stays on screen (seconds).
///
/// # Value: 1 second
pub const DEFAULT_CHANGE_NOTICE_SECS: u32 = 1;

/// Default time the UI node waits for a status reply (milliseconds).
///
/// # Value: 5000ms
///
/// # Examples
///
/// ```
/// use doorlock_core::constants::DEFAULT_REPLY_TIMEOUT_MS;
/// use std::time::Duration;
///
/// let timeout = Duration::from_millis(DEFAULT_REPLY_TIMEOUT_MS);
/// assert_eq!(timeout.as_secs(), 5);
/// ```
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// Display
// ============================================================================

/// Number of lines on the character display.
pub const DISPLAY_LINES: usize = 2;

/// Number of characters per display line.
pub const DISPLAY_COLUMNS: usize = 16;

/// Prompt shown while the first password is collected.
pub const MSG_ENTER_PASSWORD: &str = "Enter password:";

/// Prompt shown while the confirmation password is collected.
pub const MSG_REENTER_PASSWORD: &str = "Re-enter pass:";

/// Main menu, first line.
pub const MSG_MENU_OPEN_DOOR: &str = "+ : Open Door";

/// Main menu, second line.
pub const MSG_MENU_CHANGE_PASSWORD: &str = "- : Change Pass";

/// Transient warning after a failed verification.
pub const MSG_WRONG_PASSWORD: &str = "Wrong Password!!";

/// Notice shown before the stored password is cleared.
pub const MSG_CHANGE_PASSWORD: &str = "Change the pass";

/// Door progress: unlock phase (two lines).
pub const MSG_DOOR_IS: &str = "Door is";

/// Door progress: unlock phase, second line.
pub const MSG_UNLOCKING: &str = "Unlocking";

/// Door progress: hold phase.
pub const MSG_DOOR_OPEN: &str = "Door is Open";

/// Door progress: lock phase.
pub const MSG_DOOR_LOCKING: &str = "Door is Locking";

/// Alarm indicator.
pub const MSG_ALARM: &str = "!!!! ERROR !!!!";

/// Shown while the link to the actuator node is being re-established.
pub const MSG_LINK_ERROR: &str = "Link error";

/// Character echoed for each accepted password digit.
pub const MASK_CHAR: char = '*';
