//! Raspberry Pi GPIO backend
//!
//! Switches are wired between the pin and ground with the internal pull-up, so
//! a pressed switch reads low. Solenoid drivers are active high and start low.

use std::sync::{Arc, Mutex};

use rppal::gpio::{Gpio, InputPin, OutputPin};

use super::{Hardware, Solenoid, SolenoidId, Switch, SwitchBank, SwitchId};
use crate::error::{Error, Result};
use crate::settings::PinMap;

pub struct GpioSwitch {
    pin: InputPin,
}

impl Switch for GpioSwitch {
    fn is_pressed(&self) -> bool {
        self.pin.is_low()
    }
}

pub struct GpioSolenoid {
    pin: Mutex<OutputPin>,
}

impl Solenoid for GpioSolenoid {
    fn on(&self) {
        if let Ok(mut pin) = self.pin.lock() {
            pin.set_high();
        }
    }

    fn off(&self) {
        if let Ok(mut pin) = self.pin.lock() {
            pin.set_low();
        }
    }
}

/// Claim every configured pin
pub fn open(pins: &PinMap) -> Result<Hardware> {
    let gpio = Gpio::new().map_err(|e| Error::hardware(e.to_string()))?;

    let input = |id: SwitchId, pin: u8| -> Result<(SwitchId, Box<dyn Switch>)> {
        let pin = gpio
            .get(pin)
            .map_err(|e| Error::hardware(format!("{id} on pin {pin}: {e}")))?
            .into_input_pullup();
        Ok((id, Box::new(GpioSwitch { pin })))
    };
    let output = |id: SolenoidId, pin: u8| -> Result<(SolenoidId, Arc<dyn Solenoid>)> {
        let pin = gpio
            .get(pin)
            .map_err(|e| Error::hardware(format!("{id} on pin {pin}: {e}")))?
            .into_output_low();
        Ok((id, Arc::new(GpioSolenoid { pin: Mutex::new(pin) })))
    };

    let mut switches = vec![
        input(SwitchId::StrikePlate, pins.strike_plate)?,
        input(SwitchId::Bumper(1), pins.bumper1)?,
        input(SwitchId::Bumper(2), pins.bumper2)?,
    ];
    for (i, pin) in pins.drop_targets.iter().enumerate() {
        switches.push(input(SwitchId::DropTarget(i), *pin)?);
    }
    switches.push(input(SwitchId::Goal, pins.goal)?);
    switches.push(input(SwitchId::Drain, pins.drain)?);
    switches.push(input(SwitchId::Service, pins.service)?);

    let solenoids = vec![
        output(SolenoidId::Gate(1), pins.gate1)?,
        output(SolenoidId::Gate(2), pins.gate2)?,
        output(SolenoidId::BankReset, pins.bank_reset)?,
    ];

    Ok(Hardware::from_parts(SwitchBank::new(switches), solenoids, true))
}
