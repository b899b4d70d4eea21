//! # quad-control
//! A `#![no_std]` cascaded flight controller for quadrotors.
//!
//! # Control stages
//! [`Controller`] runs the full cascade once per tick: altitude, lateral position,
//! roll/pitch, yaw and body-rate control, followed by quad-X motor mixing.
//! The individual stages live in [`control`](copter::control) and can be used on their own.
//!
//! # Configuration
//! [`GainConfig`] holds every gain, physical constant and limit of the controller.
//! It can be loaded from any [`Params`](config::Params) source,
//! such as the simulator's text format ([`ParamText`](config::ParamText)).
//!
//! # Flight loop
//! [`Copter`] wires a [`Controller`] to a clock, a state estimator ([`Sensors`]),
//! a [`TrajectorySource`] and an [`Actuator`].

#![no_std]

#[cfg(test)]
extern crate std;

pub mod attitude;
pub use attitude::Orientation;

pub mod config;
pub use config::GainConfig;

pub mod copter;
pub use copter::{
    control::{Controller, ControllerState},
    Copter,
};

mod error;
pub use error::Error;

pub mod hal;
pub use hal::{Actuator, Sensors};

pub mod state;
pub use state::{MotorCommand, TrajectoryPoint, VehicleState};

pub mod trajectory;
pub use trajectory::TrajectorySource;
