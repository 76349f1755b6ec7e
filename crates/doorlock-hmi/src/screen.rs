//! Screens shown on the UI node's two-line display.

use doorlock_core::constants::{
    DISPLAY_LINES, MASK_CHAR, MSG_ALARM, MSG_CHANGE_PASSWORD, MSG_DOOR_IS, MSG_DOOR_LOCKING,
    MSG_DOOR_OPEN, MSG_ENTER_PASSWORD, MSG_LINK_ERROR, MSG_MENU_CHANGE_PASSWORD,
    MSG_MENU_OPEN_DOOR, MSG_REENTER_PASSWORD, MSG_UNLOCKING, MSG_WRONG_PASSWORD,
};
use doorlock_hardware::DisplayDevice;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,

    /// Password prompt with `entered` digits echoed as mask characters.
    EnterPassword { entered: usize },

    /// Confirmation prompt during setup.
    ReenterPassword { entered: usize },

    WrongPassword,
    ChangePassword,
    DoorUnlocking,
    DoorOpen,
    DoorLocking,
    Alarm,
    LinkError,
}

impl Screen {
    /// Text of both display lines.
    ///
    /// ```
    /// use doorlock_hmi::Screen;
    ///
    /// let [top, bottom] = Screen::EnterPassword { entered: 3 }.lines();
    /// assert_eq!(top, "Enter password:");
    /// assert_eq!(bottom, "***");
    /// ```
    pub fn lines(&self) -> [String; DISPLAY_LINES] {
        let (top, bottom) = match *self {
            Screen::Menu => (MSG_MENU_OPEN_DOOR, String::from(MSG_MENU_CHANGE_PASSWORD)),
            Screen::EnterPassword { entered } => (MSG_ENTER_PASSWORD, mask(entered)),
            Screen::ReenterPassword { entered } => (MSG_REENTER_PASSWORD, mask(entered)),
            Screen::WrongPassword => (MSG_WRONG_PASSWORD, String::new()),
            Screen::ChangePassword => (MSG_CHANGE_PASSWORD, String::new()),
            Screen::DoorUnlocking => (MSG_DOOR_IS, String::from(MSG_UNLOCKING)),
            Screen::DoorOpen => (MSG_DOOR_OPEN, String::new()),
            Screen::DoorLocking => (MSG_DOOR_LOCKING, String::new()),
            Screen::Alarm => (MSG_ALARM, String::new()),
            Screen::LinkError => (MSG_LINK_ERROR, String::new()),
        };
        [top.to_string(), bottom]
    }

    /// Draw this screen. A display failure is logged and otherwise ignored.
    pub async fn render<D: DisplayDevice>(&self, display: &mut D) {
        let [top, bottom] = self.lines();
        if let Err(e) = display.show([&top, &bottom]).await {
            warn!(screen = ?self, error = %e, "Display update failed");
        }
    }
}

fn mask(entered: usize) -> String {
    std::iter::repeat_n(MASK_CHAR, entered).collect()
}
