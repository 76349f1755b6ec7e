//! Interaction controller of the UI node.
//!
//! Each [`Controller::step`] performs the work of the current session state
//! and moves to the next one. `OPEN_DOOR` and `TRIGGER_ALARM` get no reply:
//! the controller follows the door and alarm on its own timer, using the
//! same durations as the actuator node.

use doorlock_core::Password;
use doorlock_hardware::{DisplayDevice, KeypadDevice, KeypadInput, TickSource, WaitTimer};
use doorlock_link::{Link, LinkError};
use doorlock_protocol::Message;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::entry::{Prompt, collect_password};
use crate::{HmiConfig, HmiError, Screen, SessionMachine, SessionState, SessionTransition};

/// Runs the session state machine against the keypad, display and link.
#[derive(Debug)]
pub struct Controller<IO, K, D, T> {
    link: Link<IO>,
    keypad: K,
    display: D,
    timer: WaitTimer<T>,
    config: HmiConfig,
    machine: SessionMachine,
    wrong_attempts: u8,

    /// Set after a recoverable link failure; the next handshake first drains
    /// the link.
    resync_pending: bool,
}

impl<IO, K, D, T> Controller<IO, K, D, T>
where
    IO: AsyncRead + AsyncWrite + Unpin,
    K: KeypadDevice,
    D: DisplayDevice,
    T: TickSource,
{
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(
        link: Link<IO>,
        keypad: K,
        display: D,
        ticks: T,
        config: HmiConfig,
    ) -> Result<Self, HmiError> {
        Self::with_machine(link, keypad, display, ticks, config, SessionMachine::new())
    }

    /// Like [`Controller::new`], resuming from an existing session machine.
    pub fn with_machine(
        link: Link<IO>,
        keypad: K,
        display: D,
        ticks: T,
        config: HmiConfig,
        machine: SessionMachine,
    ) -> Result<Self, HmiError> {
        config.validate()?;

        Ok(Self {
            link,
            keypad,
            display,
            timer: WaitTimer::new(ticks),
            config,
            machine,
            wrong_attempts: 0,
            resync_pending: false,
        })
    }

    pub fn state(&self) -> SessionState {
        self.machine.current_state()
    }

    /// Consecutive wrong passwords in the current authentication.
    pub fn wrong_attempts(&self) -> u8 {
        self.wrong_attempts
    }

    pub fn history(&self) -> impl Iterator<Item = &SessionTransition> {
        self.machine.history().iter()
    }

    /// Step until an error stops the controller.
    ///
    /// # Errors
    ///
    /// Returns the first error [`Controller::step`] returns.
    pub async fn run(&mut self) -> Result<(), HmiError> {
        info!("UI controller started");
        loop {
            self.step().await?;
        }
    }

    /// Do the work of the current state and move to the next one.
    ///
    /// Link timeouts and unexpected replies are handled here by returning to
    /// `AwaitingBoot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is closed or the keypad fails.
    pub async fn step(&mut self) -> Result<SessionState, HmiError> {
        let state = self.state();

        let next = match self.handle(state).await {
            Ok(next) => next,
            Err(HmiError::Link(e)) if e.is_recoverable() => {
                warn!(%state, error = %e, "Link failure, resynchronising");
                Screen::LinkError.render(&mut self.display).await;
                self.resync_pending = true;
                SessionState::AwaitingBoot
            }
            Err(e) => return Err(e),
        };

        if next != state {
            self.enter(next)?;
        }
        Ok(next)
    }

    fn enter(&mut self, next: SessionState) -> Result<(), HmiError> {
        let transition = self.machine.transition_to(next)?;

        if transition.from == SessionState::MainMenu && next.is_authenticating() {
            self.wrong_attempts = 0;
        }

        debug!(from = %transition.from, to = %next, "Session transition");
        Ok(())
    }

    async fn handle(&mut self, state: SessionState) -> Result<SessionState, HmiError> {
        match state {
            SessionState::AwaitingBoot => self.boot().await,
            SessionState::CheckingExistence => self.check_existence().await,
            SessionState::SettingUpPassword => self.set_up_password().await,
            SessionState::MainMenu => self.main_menu().await,
            SessionState::AuthenticatingForOpen | SessionState::AuthenticatingForChange => {
                self.authenticate(state).await
            }
            SessionState::AlarmActive => self.alarm().await,
        }
    }

    async fn boot(&mut self) -> Result<SessionState, HmiError> {
        if self.resync_pending {
            // Let a late reply land before draining it
            if let Some(settle) = self.link.reply_timeout() {
                tokio::time::sleep(settle).await;
            }
            let discarded = self.link.discard_pending()?;
            debug!(discarded, "Link drained");
            self.resync_pending = false;
        }

        self.link.send(Message::UiReady).await?;
        info!("UI ready sent");
        Ok(SessionState::CheckingExistence)
    }

    async fn check_existence(&mut self) -> Result<SessionState, HmiError> {
        match self.link.request(Message::CheckExists).await? {
            Message::Exists => Ok(SessionState::MainMenu),
            Message::NotExists => Ok(SessionState::SettingUpPassword),
            other => Err(unexpected(Message::CheckExists, other)),
        }
    }

    async fn set_up_password(&mut self) -> Result<SessionState, HmiError> {
        let candidate = self.read_password(Prompt::Enter).await?;
        let confirmation = self.read_password(Prompt::Reenter).await?;

        let reply = self
            .link
            .request(Message::SetupPassword {
                candidate,
                confirmation,
            })
            .await?;

        if reply == Message::SetupOk {
            info!("New password set");
            Ok(SessionState::MainMenu)
        } else {
            info!(reply = %reply, "Password setup failed, retrying");
            Ok(SessionState::SettingUpPassword)
        }
    }

    async fn main_menu(&mut self) -> Result<SessionState, HmiError> {
        Screen::Menu.render(&mut self.display).await;

        loop {
            match self.keypad.read_input().await? {
                KeypadInput::Plus => return Ok(SessionState::AuthenticatingForOpen),
                KeypadInput::Minus => return Ok(SessionState::AuthenticatingForChange),
                other => debug!(key = ?other, "Ignoring key in menu"),
            }
        }
    }

    async fn authenticate(&mut self, state: SessionState) -> Result<SessionState, HmiError> {
        let candidate = self.read_password(Prompt::Enter).await?;
        let reply = self
            .link
            .request(Message::VerifyPassword { candidate })
            .await?;

        if reply != Message::Match {
            return self.wrong_password(state).await;
        }

        self.wrong_attempts = 0;
        if state == SessionState::AuthenticatingForOpen {
            self.open_door().await?;
            Ok(SessionState::MainMenu)
        } else {
            self.reset_password().await?;
            Ok(SessionState::SettingUpPassword)
        }
    }

    async fn wrong_password(&mut self, state: SessionState) -> Result<SessionState, HmiError> {
        self.wrong_attempts = self.wrong_attempts.saturating_add(1);
        warn!(
            attempt = self.wrong_attempts,
            max = self.config.max_wrong_attempts,
            "Wrong password"
        );

        Screen::WrongPassword.render(&mut self.display).await;
        tokio::time::sleep(self.config.wrong_password_notice()).await;

        if self.wrong_attempts >= self.config.max_wrong_attempts {
            Ok(SessionState::AlarmActive)
        } else {
            Ok(state)
        }
    }

    async fn open_door(&mut self) -> Result<(), HmiError> {
        self.link.send(Message::OpenDoor).await?;
        info!("Door opening");

        let door = self.config.door;
        for (screen, secs) in [
            (Screen::DoorUnlocking, door.unlock_secs),
            (Screen::DoorOpen, door.hold_secs),
            (Screen::DoorLocking, door.lock_secs),
        ] {
            screen.render(&mut self.display).await;
            self.timer.wait_seconds(secs).await?;
        }
        Ok(())
    }

    async fn reset_password(&mut self) -> Result<(), HmiError> {
        Screen::ChangePassword.render(&mut self.display).await;
        self.timer.wait_seconds(self.config.change_notice_secs).await?;

        match self.link.request(Message::ResetPassword).await? {
            Message::ResetDone => {
                info!("Password cleared");
                Ok(())
            }
            other => Err(unexpected(Message::ResetPassword, other)),
        }
    }

    async fn alarm(&mut self) -> Result<SessionState, HmiError> {
        self.link.send(Message::TriggerAlarm).await?;
        warn!(secs = self.config.alarm_secs, "Alarm triggered");

        Screen::Alarm.render(&mut self.display).await;
        self.timer.wait_seconds(self.config.alarm_secs).await?;

        self.wrong_attempts = 0;
        Ok(SessionState::MainMenu)
    }

    async fn read_password(&mut self, prompt: Prompt) -> Result<Password, HmiError> {
        collect_password(&mut self.keypad, &mut self.display, prompt).await
    }
}

fn unexpected(request: Message, reply: Message) -> HmiError {
    LinkError::UnexpectedReply {
        request: request.opcode(),
        reply: reply.opcode(),
    }
    .into()
}
