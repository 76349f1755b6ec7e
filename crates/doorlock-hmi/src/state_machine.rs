//! Session state machine of the UI node.
//!
//! The machine only validates and records transitions; the
//! [`Controller`](crate::Controller) decides which transition to take.
//!
//! # Examples
//!
//! ```
//! use doorlock_hmi::{SessionMachine, SessionState};
//!
//! let mut machine = SessionMachine::new();
//! assert_eq!(machine.current_state(), SessionState::AwaitingBoot);
//!
//! machine.transition_to(SessionState::CheckingExistence).unwrap();
//! assert!(machine.transition_to(SessionState::AlarmActive).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use doorlock_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Maximum number of transitions kept in history.
const MAX_HISTORY_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Announce the UI node to the actuator.
    AwaitingBoot,

    /// Ask whether a password is stored.
    CheckingExistence,

    /// Collect and confirm a new password.
    SettingUpPassword,

    /// Wait for the open-door or change-password key.
    MainMenu,

    AuthenticatingForOpen,

    AuthenticatingForChange,

    /// Too many wrong passwords; the alarm is sounding.
    AlarmActive,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::AwaitingBoot => "AwaitingBoot",
            SessionState::CheckingExistence => "CheckingExistence",
            SessionState::SettingUpPassword => "SettingUpPassword",
            SessionState::MainMenu => "MainMenu",
            SessionState::AuthenticatingForOpen => "AuthenticatingForOpen",
            SessionState::AuthenticatingForChange => "AuthenticatingForChange",
            SessionState::AlarmActive => "AlarmActive",
        };
        write!(f, "{name}")
    }
}

impl SessionState {
    /// Check if `target` can follow this state.
    ///
    /// Every state may fall back to `AwaitingBoot` when the link has to be
    /// resynchronised.
    ///
    /// ```
    /// use doorlock_hmi::SessionState;
    ///
    /// assert!(SessionState::MainMenu.can_transition_to(&SessionState::AuthenticatingForOpen));
    /// assert!(!SessionState::MainMenu.can_transition_to(&SessionState::AlarmActive));
    /// assert!(SessionState::AlarmActive.can_transition_to(&SessionState::AwaitingBoot));
    /// ```
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, target),
            (_, AwaitingBoot)
                | (AwaitingBoot, CheckingExistence)
                | (CheckingExistence, MainMenu | SettingUpPassword)
                | (SettingUpPassword, MainMenu)
                | (MainMenu, AuthenticatingForOpen | AuthenticatingForChange)
                | (AuthenticatingForOpen, MainMenu | AlarmActive)
                | (AuthenticatingForChange, SettingUpPassword | AlarmActive)
                | (AlarmActive, MainMenu)
        )
    }

    /// Returns `true` for the two password-check states.
    pub fn is_authenticating(&self) -> bool {
        matches!(
            self,
            SessionState::AuthenticatingForOpen | SessionState::AuthenticatingForChange
        )
    }
}

/// One recorded transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTransition {
    pub from: SessionState,
    pub to: SessionState,
    pub timestamp: Instant,
}

impl SessionTransition {
    pub fn new(from: SessionState, to: SessionState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }
}

/// Current session state plus a bounded transition history.
#[derive(Debug)]
pub struct SessionMachine {
    current_state: SessionState,
    state_entered_at: Instant,
    history: VecDeque<SessionTransition>,
}

impl SessionMachine {
    /// Create a machine in `AwaitingBoot`.
    pub fn new() -> Self {
        Self::starting_at(SessionState::AwaitingBoot)
    }

    /// Create a machine already in `state`, with empty history.
    pub fn starting_at(state: SessionState) -> Self {
        Self {
            current_state: state,
            state_entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> SessionState {
        self.current_state
    }

    pub fn time_in_current_state(&self) -> Duration {
        self.state_entered_at.elapsed()
    }

    /// Recorded transitions, oldest first.
    pub fn history(&self) -> &VecDeque<SessionTransition> {
        &self.history
    }

    /// Up to `count` most recent transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<SessionTransition> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).copied().collect()
    }

    /// Move to `new_state` if the transition is allowed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` and leaves the machine
    /// unchanged if `new_state` cannot follow the current state.
    pub fn transition_to(&mut self, new_state: SessionState) -> Result<SessionTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = SessionTransition::new(self.current_state, new_state);
        self.current_state = new_state;
        self.state_entered_at = transition.timestamp;

        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        Ok(transition)
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use SessionState::*;

    #[rstest]
    #[case(AwaitingBoot, CheckingExistence)]
    #[case(CheckingExistence, MainMenu)]
    #[case(CheckingExistence, SettingUpPassword)]
    #[case(SettingUpPassword, MainMenu)]
    #[case(MainMenu, AuthenticatingForOpen)]
    #[case(MainMenu, AuthenticatingForChange)]
    #[case(AuthenticatingForOpen, MainMenu)]
    #[case(AuthenticatingForOpen, AlarmActive)]
    #[case(AuthenticatingForChange, SettingUpPassword)]
    #[case(AuthenticatingForChange, AlarmActive)]
    #[case(AlarmActive, MainMenu)]
    #[case(MainMenu, AwaitingBoot)]
    #[case(AuthenticatingForChange, AwaitingBoot)]
    fn test_valid_transitions(#[case] from: SessionState, #[case] to: SessionState) {
        assert!(from.can_transition_to(&to));
    }

    #[rstest]
    #[case(AwaitingBoot, MainMenu)]
    #[case(MainMenu, AlarmActive)]
    #[case(MainMenu, SettingUpPassword)]
    #[case(AuthenticatingForOpen, SettingUpPassword)]
    #[case(AuthenticatingForChange, MainMenu)]
    #[case(AlarmActive, AuthenticatingForOpen)]
    #[case(SettingUpPassword, AuthenticatingForOpen)]
    fn test_invalid_transitions(#[case] from: SessionState, #[case] to: SessionState) {
        assert!(!from.can_transition_to(&to));
    }

    #[test]
    fn test_rejected_transition_leaves_state() {
        let mut machine = SessionMachine::starting_at(MainMenu);

        let result = machine.transition_to(AlarmActive);

        assert!(matches!(result, Err(Error::InvalidStateTransition { .. })));
        assert_eq!(machine.current_state(), MainMenu);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_history_records_transitions() {
        let mut machine = SessionMachine::new();
        machine.transition_to(CheckingExistence).unwrap();
        machine.transition_to(SettingUpPassword).unwrap();
        machine.transition_to(MainMenu).unwrap();

        let last = machine.last_transitions(2);
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].to, SettingUpPassword);
        assert_eq!(last[1].from, SettingUpPassword);
        assert_eq!(last[1].to, MainMenu);
    }

    #[test]
    fn test_history_size_limit() {
        let mut machine = SessionMachine::starting_at(MainMenu);
        for _ in 0..MAX_HISTORY_SIZE {
            machine.transition_to(AuthenticatingForOpen).unwrap();
            machine.transition_to(MainMenu).unwrap();
        }

        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
        assert_eq!(machine.last_transitions(500).len(), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_display_and_serde_names() {
        assert_eq!(AuthenticatingForChange.to_string(), "AuthenticatingForChange");
        assert_eq!(
            serde_json::to_string(&AlarmActive).unwrap(),
            "\"alarm_active\""
        );
    }

    #[test]
    fn test_is_authenticating() {
        assert!(AuthenticatingForOpen.is_authenticating());
        assert!(AuthenticatingForChange.is_authenticating());
        assert!(!MainMenu.is_authenticating());
    }
}
