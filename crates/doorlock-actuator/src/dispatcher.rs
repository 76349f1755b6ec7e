//! Command dispatcher of the actuator node.
//!
//! One command is read, handled to completion, and answered (when its
//! opcode expects an answer) before the next command is read.

use doorlock_core::Password;
use doorlock_hardware::{AlarmOutput, EepromDevice, MotorDriver, TickSource};
use doorlock_link::{Link, LinkError};
use doorlock_protocol::Message;
use doorlock_storage::CredentialStore;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};

use crate::{ActuatorConfig, ActuatorError, Sequencer};

/// Peripherals of the actuator node.
#[derive(Debug)]
pub struct ActuatorDevices<E, M, A, T> {
    pub eeprom: E,
    pub motor: M,
    pub alarm: A,
    pub ticks: T,
}

/// Serves UI commands over the link.
#[derive(Debug)]
pub struct Dispatcher<IO, E, M, A, T> {
    link: Link<IO>,
    store: CredentialStore<E>,
    sequencer: Sequencer<M, A, T>,
}

impl<IO, E, M, A, T> Dispatcher<IO, E, M, A, T>
where
    IO: AsyncRead + AsyncWrite + Unpin,
    E: EepromDevice,
    M: MotorDriver,
    A: AlarmOutput,
    T: TickSource,
{
    pub fn new(link: Link<IO>, store: CredentialStore<E>, sequencer: Sequencer<M, A, T>) -> Self {
        Self {
            link,
            store,
            sequencer,
        }
    }

    /// Build the store and sequencer from raw devices.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn assemble(
        link: Link<IO>,
        devices: ActuatorDevices<E, M, A, T>,
        config: &ActuatorConfig,
    ) -> Result<Self, ActuatorError> {
        config.validate()?;

        let store = CredentialStore::new(devices.eeprom, config.write_cycle());
        let sequencer = Sequencer::new(devices.motor, devices.alarm, devices.ticks, config);
        Ok(Self::new(link, store, sequencer))
    }

    /// Block until the UI node announces itself.
    ///
    /// Anything received before `UI_READY` is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the link closes.
    pub async fn wait_for_ui(&mut self) -> Result<(), ActuatorError> {
        loop {
            match self.link.recv().await? {
                Message::UiReady => {
                    info!("UI node ready");
                    return Ok(());
                }
                other => debug!(opcode = %other.opcode(), "Dropped before handshake"),
            }
        }
    }

    /// Handshake, then serve commands until the link closes.
    ///
    /// # Errors
    ///
    /// Returns the link error that stopped the loop, or a tick source failure.
    pub async fn run(&mut self) -> Result<(), ActuatorError> {
        self.wait_for_ui().await?;

        loop {
            self.serve_one().await?;
        }
    }

    /// Read, handle and answer a single command.
    pub async fn serve_one(&mut self) -> Result<(), ActuatorError> {
        let message = match self.link.recv().await {
            Ok(message) => message,
            Err(LinkError::Protocol(e)) => {
                warn!(error = %e, "Dropped malformed command");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(reply) = self.handle(message).await? {
            self.link.send(reply).await?;
        }
        Ok(())
    }

    /// Execute one command and return the reply to send, if any.
    ///
    /// Storage faults never escape: they are logged and answered with the
    /// failure status of the command.
    ///
    /// # Errors
    ///
    /// Returns an error only if a timed sequence cannot be timed.
    pub async fn handle(&mut self, message: Message) -> Result<Option<Message>, ActuatorError> {
        debug!(opcode = %message.opcode(), "Command received");

        let reply = match message {
            Message::UiReady => {
                debug!("UI node restarted");
                None
            }
            Message::CheckExists => Some(self.check_exists().await),
            Message::SetupPassword {
                candidate,
                confirmation,
            } => Some(self.setup(candidate, confirmation).await),
            Message::VerifyPassword { candidate } => Some(self.verify(candidate).await),
            Message::OpenDoor => {
                self.sequencer.open_door().await?;
                None
            }
            Message::TriggerAlarm => {
                self.sequencer.sound_alarm().await?;
                None
            }
            Message::ResetPassword => {
                if let Err(e) = self.store.clear().await {
                    error!(error = %e, "Failed to clear password");
                }
                Some(Message::ResetDone)
            }
            status => {
                warn!(opcode = %status.opcode(), "Ignoring status opcode sent to actuator");
                None
            }
        };

        Ok(reply)
    }

    pub fn into_parts(self) -> (Link<IO>, CredentialStore<E>, Sequencer<M, A, T>) {
        (self.link, self.store, self.sequencer)
    }

    async fn check_exists(&mut self) -> Message {
        match self.store.exists().await {
            Ok(true) => Message::Exists,
            Ok(false) => Message::NotExists,
            Err(e) => {
                warn!(error = %e, "Flag read failed, reporting no password");
                Message::NotExists
            }
        }
    }

    async fn setup(&mut self, candidate: Password, confirmation: Password) -> Message {
        if !candidate.matches(&confirmation) {
            info!("Setup rejected: entries differ");
            return Message::Mismatch;
        }

        match self.store.store_password(&candidate).await {
            Ok(()) => Message::SetupOk,
            Err(e) => {
                error!(error = %e, "Failed to store password");
                Message::Mismatch
            }
        }
    }

    /// Without a stored password this answers `Mismatch` and never compares
    /// the stale slot left behind by a reset.
    async fn verify(&mut self, candidate: Password) -> Message {
        match self.store.verify(&candidate).await {
            Ok(true) => Message::Match,
            Ok(false) => Message::Mismatch,
            Err(e) => {
                warn!(error = %e, "Password read failed, rejecting");
                Message::Mismatch
            }
        }
    }
}
