//! Two-node rig: a UI controller and an actuator dispatcher joined by an
//! in-memory link, each on mock peripherals.

#![allow(dead_code)]

use doorlock_actuator::{ActuatorConfig, ActuatorDevices, Dispatcher};
use doorlock_core::DoorTimings;
use doorlock_hardware::{
    TokioTickSource,
    mock::{
        MockAlarm, MockAlarmHandle, MockDisplay, MockDisplayHandle, MockEeprom,
        MockEepromHandle, MockKeypad, MockKeypadHandle, MockMotor, MockMotorHandle,
    },
};
use doorlock_hmi::{Controller, HmiConfig, HmiError, SessionState};
use doorlock_link::{LinkConfig, duplex};
use tokio::io::DuplexStream;

pub type UiNode = Controller<DuplexStream, MockKeypad, MockDisplay, TokioTickSource>;
pub type ActuatorNode = Dispatcher<DuplexStream, MockEeprom, MockMotor, MockAlarm, TokioTickSource>;

pub struct Rig {
    pub ui: UiNode,
    pub actuator: ActuatorNode,
    pub keys: MockKeypadHandle,
    pub display: MockDisplayHandle,
    pub eeprom: MockEepromHandle,
    pub motor: MockMotorHandle,
    pub alarm: MockAlarmHandle,
}

/// What is left once both nodes have stopped.
pub struct Finished {
    pub ui_result: Result<(), HmiError>,
    pub ui_state: SessionState,
    pub wrong_attempts: u8,

    /// Every state the UI entered, in order.
    pub visited: Vec<SessionState>,

    pub display: MockDisplayHandle,
    pub eeprom: MockEepromHandle,
    pub motor: MockMotorHandle,
    pub alarm: MockAlarmHandle,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_door(DoorTimings::default())
    }

    pub fn with_door(door: DoorTimings) -> Self {
        let (ui_link, actuator_link) = duplex(LinkConfig::default());

        let (keypad, keys) = MockKeypad::new();
        let (display, display_handle) = MockDisplay::new();
        let hmi_config = HmiConfig {
            door,
            ..Default::default()
        };
        let ui = Controller::new(
            ui_link,
            keypad,
            display,
            TokioTickSource::default(),
            hmi_config,
        )
        .unwrap();

        let (eeprom, eeprom_handle) = MockEeprom::new();
        let (motor, motor_handle) = MockMotor::new();
        let (alarm, alarm_handle) = MockAlarm::new();
        let actuator_config = ActuatorConfig {
            door,
            ..Default::default()
        };
        let actuator = Dispatcher::assemble(
            actuator_link,
            ActuatorDevices {
                eeprom,
                motor,
                alarm,
                ticks: TokioTickSource::default(),
            },
            &actuator_config,
        )
        .unwrap();

        Self {
            ui,
            actuator,
            keys,
            display: display_handle,
            eeprom: eeprom_handle,
            motor: motor_handle,
            alarm: alarm_handle,
        }
    }

    /// Run both nodes until the UI has used up every queued key.
    ///
    /// The UI stops when its keypad runs dry; dropping it closes the link,
    /// which lets the actuator finish its last sequence and stop too.
    pub async fn run(self) -> Finished {
        let Rig {
            mut ui,
            mut actuator,
            keys,
            display,
            eeprom,
            motor,
            alarm,
        } = self;
        drop(keys);

        let ui_side = async move {
            let ui_result = ui.run().await;
            (
                ui_result,
                ui.state(),
                ui.wrong_attempts(),
                ui.history().map(|t| t.to).collect::<Vec<_>>(),
            )
        };

        let ((ui_result, ui_state, wrong_attempts, visited), _) =
            tokio::join!(ui_side, actuator.run());

        Finished {
            ui_result,
            ui_state,
            wrong_attempts,
            visited,
            display,
            eeprom,
            motor,
            alarm,
        }
    }
}

impl Finished {
    /// Number of times the UI entered `state`.
    pub fn entered(&self, state: SessionState) -> usize {
        self.visited.iter().filter(|&&s| s == state).count()
    }
}
