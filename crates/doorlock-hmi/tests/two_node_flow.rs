//! End-to-end sessions: UI controller and actuator dispatcher talking over an
//! in-memory link, driven by scripted key presses on a paused clock.

mod common;

use common::Rig;
use doorlock_core::{
    DoorTimings,
    constants::{
        EXISTS_FLAG_ADDRESS, MSG_ALARM, MSG_CHANGE_PASSWORD, MSG_DOOR_LOCKING, MSG_DOOR_OPEN,
        MSG_UNLOCKING, MSG_WRONG_PASSWORD, PASSWORD_BASE_ADDRESS, PASSWORD_PRESENT_FLAG,
    },
};
use doorlock_hardware::{HardwareError, KeypadInput, MotorState};
use doorlock_hmi::{HmiError, SessionState};

const DOOR_SEQUENCE: [MotorState; 4] = [
    MotorState::Forward,
    MotorState::Stopped,
    MotorState::Reverse,
    MotorState::Stopped,
];

fn stored_digits(rig: &common::Finished) -> Vec<u8> {
    (0..5).map(|i| rig.eeprom.peek(PASSWORD_BASE_ADDRESS + i)).collect()
}

#[tokio::test(start_paused = true)]
async fn test_first_boot_setup_then_open_door() {
    let rig = Rig::new();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_input(KeypadInput::Plus).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();

    let done = rig.run().await;

    assert!(matches!(
        done.ui_result,
        Err(HmiError::Hardware(HardwareError::Disconnected { .. }))
    ));
    assert_eq!(
        done.visited,
        vec![
            SessionState::CheckingExistence,
            SessionState::SettingUpPassword,
            SessionState::MainMenu,
            SessionState::AuthenticatingForOpen,
            SessionState::MainMenu,
        ]
    );
    assert_eq!(done.eeprom.peek(EXISTS_FLAG_ADDRESS), PASSWORD_PRESENT_FLAG);
    assert_eq!(stored_digits(&done), vec![1, 2, 3, 4, 5]);
    assert_eq!(done.motor.states(), DOOR_SEQUENCE);
    assert_eq!(done.alarm.activations(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_door_screens_follow_the_motor() {
    let rig = Rig::new();
    rig.keys.send_password(&[5, 5, 5, 5, 5]).await.unwrap();
    rig.keys.send_password(&[5, 5, 5, 5, 5]).await.unwrap();
    rig.keys.send_input(KeypadInput::Plus).await.unwrap();
    rig.keys.send_password(&[5, 5, 5, 5, 5]).await.unwrap();

    let done = rig.run().await;

    let unlocking = done.display.find(MSG_UNLOCKING).unwrap();
    let open = done.display.find(MSG_DOOR_OPEN).unwrap();
    let locking = done.display.find(MSG_DOOR_LOCKING).unwrap();
    assert_eq!(open.at.duration_since(unlocking.at).as_secs(), 15);
    assert_eq!(locking.at.duration_since(open.at).as_secs(), 3);

    let motor = done.motor.events();
    assert_eq!(motor[0].at, unlocking.at);
    assert_eq!(motor[2].at, locking.at);
}

#[tokio::test(start_paused = true)]
async fn test_existing_password_skips_setup() {
    let rig = Rig::new();
    rig.eeprom.poke(EXISTS_FLAG_ADDRESS, PASSWORD_PRESENT_FLAG);
    for (i, digit) in [2, 4, 6, 8, 0].into_iter().enumerate() {
        rig.eeprom.poke(PASSWORD_BASE_ADDRESS + i as u16, digit);
    }
    rig.keys.send_input(KeypadInput::Plus).await.unwrap();
    rig.keys.send_password(&[2, 4, 6, 8, 0]).await.unwrap();

    let done = rig.run().await;

    assert_eq!(done.entered(SessionState::SettingUpPassword), 0);
    assert_eq!(done.motor.states(), DOOR_SEQUENCE);
}

#[tokio::test(start_paused = true)]
async fn test_setup_retried_until_entries_agree() {
    let rig = Rig::new();
    rig.keys.send_password(&[1, 1, 1, 1, 1]).await.unwrap();
    rig.keys.send_password(&[1, 1, 1, 1, 2]).await.unwrap();
    rig.keys.send_password(&[3, 3, 3, 3, 3]).await.unwrap();
    rig.keys.send_password(&[4, 3, 3, 3, 3]).await.unwrap();
    rig.keys.send_password(&[7, 7, 7, 7, 7]).await.unwrap();
    rig.keys.send_password(&[7, 7, 7, 7, 7]).await.unwrap();

    let done = rig.run().await;

    assert_eq!(done.ui_state, SessionState::MainMenu);
    assert_eq!(done.entered(SessionState::SettingUpPassword), 1);
    assert_eq!(stored_digits(&done), vec![7, 7, 7, 7, 7]);
}

#[tokio::test(start_paused = true)]
async fn test_three_wrong_passwords_sound_alarm_once() {
    let rig = Rig::new();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_input(KeypadInput::Plus).await.unwrap();
    for _ in 0..3 {
        rig.keys.send_password(&[0, 0, 0, 0, 0]).await.unwrap();
    }

    let done = rig.run().await;

    assert_eq!(done.alarm.activations(), 1);
    assert!(!done.alarm.is_active());
    assert_eq!(done.entered(SessionState::AlarmActive), 1);
    assert_eq!(done.ui_state, SessionState::MainMenu);
    assert_eq!(done.wrong_attempts, 0);
    assert_eq!(done.display.count_containing(MSG_WRONG_PASSWORD), 3);
    assert!(done.display.find(MSG_ALARM).is_some());
    assert!(done.motor.events().is_empty());

    let alarm = done.alarm.events();
    assert_eq!(alarm[1].at.duration_since(alarm[0].at).as_secs(), 60);
}

#[tokio::test(start_paused = true)]
async fn test_two_wrong_then_right_opens_without_alarm() {
    let rig = Rig::new();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_input(KeypadInput::Plus).await.unwrap();
    rig.keys.send_password(&[5, 4, 3, 2, 1]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 6]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();

    let done = rig.run().await;

    assert_eq!(done.alarm.activations(), 0);
    assert_eq!(done.entered(SessionState::AlarmActive), 0);
    assert_eq!(done.display.count_containing(MSG_WRONG_PASSWORD), 2);
    assert_eq!(done.motor.states(), DOOR_SEQUENCE);
    assert_eq!(done.wrong_attempts, 0);
}

#[tokio::test(start_paused = true)]
async fn test_attempt_counter_restarts_with_each_menu_choice() {
    let rig = Rig::with_door(DoorTimings {
        unlock_secs: 1,
        hold_secs: 1,
        lock_secs: 1,
    });
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    // Two misses, then the door opens
    rig.keys.send_input(KeypadInput::Plus).await.unwrap();
    rig.keys.send_password(&[9, 9, 9, 9, 9]).await.unwrap();
    rig.keys.send_password(&[9, 9, 9, 9, 9]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    // Two more misses in a new session must not reach the threshold
    rig.keys.send_input(KeypadInput::Plus).await.unwrap();
    rig.keys.send_password(&[9, 9, 9, 9, 9]).await.unwrap();
    rig.keys.send_password(&[9, 9, 9, 9, 9]).await.unwrap();

    let done = rig.run().await;

    assert_eq!(done.alarm.activations(), 0);
    assert_eq!(done.ui_state, SessionState::AuthenticatingForOpen);
    assert_eq!(done.wrong_attempts, 2);
}

#[tokio::test(start_paused = true)]
async fn test_change_password() {
    let rig = Rig::with_door(DoorTimings {
        unlock_secs: 2,
        hold_secs: 1,
        lock_secs: 2,
    });
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_input(KeypadInput::Minus).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_password(&[6, 7, 8, 9, 0]).await.unwrap();
    rig.keys.send_password(&[6, 7, 8, 9, 0]).await.unwrap();
    rig.keys.send_input(KeypadInput::Plus).await.unwrap();
    rig.keys.send_password(&[6, 7, 8, 9, 0]).await.unwrap();

    let done = rig.run().await;

    assert_eq!(
        done.visited,
        vec![
            SessionState::CheckingExistence,
            SessionState::SettingUpPassword,
            SessionState::MainMenu,
            SessionState::AuthenticatingForChange,
            SessionState::SettingUpPassword,
            SessionState::MainMenu,
            SessionState::AuthenticatingForOpen,
            SessionState::MainMenu,
        ]
    );
    assert!(done.display.find(MSG_CHANGE_PASSWORD).is_some());
    assert_eq!(stored_digits(&done), vec![6, 7, 8, 9, 0]);
    assert_eq!(done.motor.states(), DOOR_SEQUENCE);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_password_for_change_keeps_old_one() {
    let rig = Rig::new();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_input(KeypadInput::Minus).await.unwrap();
    rig.keys.send_password(&[5, 4, 3, 2, 1]).await.unwrap();

    let done = rig.run().await;

    assert_eq!(done.ui_state, SessionState::AuthenticatingForChange);
    assert_eq!(done.wrong_attempts, 1);
    assert_eq!(done.eeprom.peek(EXISTS_FLAG_ADDRESS), PASSWORD_PRESENT_FLAG);
    assert_eq!(stored_digits(&done), vec![1, 2, 3, 4, 5]);
}
