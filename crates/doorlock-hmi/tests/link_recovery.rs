//! Controller behaviour when the actuator misbehaves on the link.
//!
//! The actuator side is a bare [`Link`] following a script.

use doorlock_core::{Password, constants::MSG_LINK_ERROR};
use doorlock_hardware::{
    TokioTickSource,
    mock::{MockDisplay, MockDisplayHandle, MockKeypad, MockKeypadHandle},
};
use doorlock_hmi::{Controller, HmiConfig, HmiError, SessionMachine, SessionState};
use doorlock_link::{Link, LinkConfig, LinkError, duplex};
use doorlock_protocol::Message;
use std::time::Duration;
use tokio::io::DuplexStream;

const REPLY_TIMEOUT_MS: u64 = 100;

type Ui = Controller<DuplexStream, MockKeypad, MockDisplay, TokioTickSource>;

fn ui_at(state: SessionState) -> (Ui, Link<DuplexStream>, MockKeypadHandle, MockDisplayHandle) {
    let (ui_link, peer) = duplex(LinkConfig {
        reply_timeout_ms: Some(REPLY_TIMEOUT_MS),
    });
    let (keypad, keys) = MockKeypad::new();
    let (display, screen) = MockDisplay::new();

    let ui = Controller::with_machine(
        ui_link,
        keypad,
        display,
        TokioTickSource::default(),
        HmiConfig::default(),
        SessionMachine::starting_at(state),
    )
    .unwrap();

    (ui, peer, keys, screen)
}

async fn steps(ui: &mut Ui, count: usize) -> Result<SessionState, HmiError> {
    let mut state = ui.state();
    for _ in 0..count {
        state = ui.step().await?;
    }
    Ok(state)
}

#[tokio::test(start_paused = true)]
async fn test_timeout_resynchronises_and_drops_late_reply() {
    let (mut ui, mut peer, _keys, screen) = ui_at(SessionState::AwaitingBoot);

    let actuator = async move {
        assert_eq!(peer.recv().await.unwrap(), Message::UiReady);
        assert_eq!(peer.recv().await.unwrap(), Message::CheckExists);

        // Answer too late: the UI has already given up on this request
        tokio::time::sleep(Duration::from_millis(REPLY_TIMEOUT_MS + 50)).await;
        peer.send(Message::Exists).await.unwrap();

        assert_eq!(peer.recv().await.unwrap(), Message::UiReady);
        assert_eq!(peer.recv().await.unwrap(), Message::CheckExists);
        peer.send(Message::NotExists).await.unwrap();
        peer
    };

    // boot, time out, boot again, check again
    let (state, _peer) = tokio::join!(steps(&mut ui, 4), actuator);

    assert_eq!(state.unwrap(), SessionState::SettingUpPassword);
    assert!(screen.find(MSG_LINK_ERROR).is_some());

    let visited: Vec<_> = ui.history().map(|t| t.to).collect();
    assert_eq!(
        visited,
        vec![
            SessionState::CheckingExistence,
            SessionState::AwaitingBoot,
            SessionState::CheckingExistence,
            SessionState::SettingUpPassword,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_non_status_reply_resynchronises() {
    let (mut ui, mut peer, _keys, _screen) = ui_at(SessionState::CheckingExistence);

    let actuator = async move {
        assert_eq!(peer.recv().await.unwrap(), Message::CheckExists);
        peer.send(Message::OpenDoor).await.unwrap();
        peer
    };

    let (state, _peer) = tokio::join!(steps(&mut ui, 1), actuator);
    assert_eq!(state.unwrap(), SessionState::AwaitingBoot);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_status_reply_resynchronises() {
    let (mut ui, mut peer, _keys, _screen) = ui_at(SessionState::CheckingExistence);

    let actuator = async move {
        assert_eq!(peer.recv().await.unwrap(), Message::CheckExists);
        peer.send(Message::SetupOk).await.unwrap();
        peer
    };

    let (state, _peer) = tokio::join!(steps(&mut ui, 1), actuator);
    assert_eq!(state.unwrap(), SessionState::AwaitingBoot);
}

#[tokio::test(start_paused = true)]
async fn test_closed_link_stops_controller() {
    let (mut ui, peer, _keys, _screen) = ui_at(SessionState::CheckingExistence);
    drop(peer);

    let result = ui.step().await;

    assert!(matches!(
        result,
        Err(HmiError::Link(LinkError::Disconnected))
    ));
    assert_eq!(ui.state(), SessionState::CheckingExistence);
}

#[tokio::test(start_paused = true)]
async fn test_verify_sends_collected_digits() {
    let (mut ui, mut peer, keys, _screen) = ui_at(SessionState::AuthenticatingForOpen);
    keys.send_password(&[3, 1, 4, 1, 5]).await.unwrap();

    let actuator = async move {
        let request = peer.recv().await.unwrap();
        peer.send(Message::Mismatch).await.unwrap();
        request
    };

    let (state, request) = tokio::join!(steps(&mut ui, 1), actuator);

    assert_eq!(state.unwrap(), SessionState::AuthenticatingForOpen);
    assert_eq!(
        request,
        Message::VerifyPassword {
            candidate: Password::from_digits(&[3, 1, 4, 1, 5]).unwrap()
        }
    );
    assert_eq!(ui.wrong_attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_open_door_is_not_acknowledged() {
    let (mut ui, mut peer, keys, screen) = ui_at(SessionState::AuthenticatingForOpen);
    keys.send_password(&[2, 7, 1, 8, 2]).await.unwrap();

    let actuator = async move {
        assert!(matches!(
            peer.recv().await.unwrap(),
            Message::VerifyPassword { .. }
        ));
        peer.send(Message::Match).await.unwrap();
        assert_eq!(peer.recv().await.unwrap(), Message::OpenDoor);
        peer
    };

    let started = tokio::time::Instant::now();
    let (state, _peer) = tokio::join!(steps(&mut ui, 1), actuator);

    assert_eq!(state.unwrap(), SessionState::MainMenu);
    assert_eq!(started.elapsed().as_secs(), 33);
    assert!(screen.find("Door is Locking").is_some());
}
