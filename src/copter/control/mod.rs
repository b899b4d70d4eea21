//! Control stages of the cascaded controller.
//!
//! Each stage can be used on its own, [`Controller`] chains them together.

use crate::{GainConfig, MotorCommand, Orientation, TrajectoryPoint, TrajectorySource, VehicleState};

mod altitude;
pub use altitude::AltitudeController;

mod attitude;
pub use attitude::AttitudeController;

mod body_rate;
pub use body_rate::BodyRateController;

mod lateral_pos;
pub use lateral_pos::LateralPositionController;

pub mod motor;
pub use motor::{MotorControl, QuadMotorControl};

mod yaw;
pub use yaw::YawController;

/// State carried by a [`Controller`] from one tick to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerState {
    /// Time integral of the altitude error in meter*seconds.
    pub integrated_altitude_error: f32,
}

/// Cascaded quadrotor controller.
///
/// Every call to [`update`](Controller::update) runs the same fixed sequence:
/// altitude, lateral position, roll/pitch, yaw, body-rate and finally motor mixing.
#[derive(Clone, Debug)]
pub struct Controller {
    config: GainConfig,
    state: ControllerState,
    pub altitude: AltitudeController,
    pub lateral: LateralPositionController,
    pub attitude: AttitudeController,
    pub yaw: YawController,
    pub body_rate: BodyRateController,
    pub motors: QuadMotorControl,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(GainConfig::default())
    }
}

impl From<GainConfig> for Controller {
    fn from(config: GainConfig) -> Self {
        Self::new(config)
    }
}

impl Controller {
    /// Create a new controller with a zero altitude integral.
    pub fn new(config: GainConfig) -> Self {
        Self {
            altitude: AltitudeController::from(&config),
            lateral: LateralPositionController::from(&config),
            attitude: AttitudeController::from(&config),
            yaw: YawController::from(&config),
            body_rate: BodyRateController::from(&config),
            motors: QuadMotorControl::from(&config),
            state: ControllerState::default(),
            config,
        }
    }

    pub fn config(&self) -> &GainConfig {
        &self.config
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Clear the altitude integral.
    pub fn reset(&mut self) {
        self.state = ControllerState::default();
    }

    /// Run one tick tracking the point of `trajectory` at `sim_time` (in seconds).
    pub fn run_control<T, A>(
        &mut self,
        dt: f32,
        sim_time: f32,
        trajectory: &mut T,
        state: &VehicleState<A>,
    ) -> MotorCommand
    where
        T: TrajectorySource + ?Sized,
        A: Orientation,
    {
        let point = trajectory.point(sim_time);
        self.update(dt, &point, state)
    }

    /// Run one tick tracking `point`, `dt` seconds after the previous tick.
    pub fn update<A: Orientation>(
        &mut self,
        dt: f32,
        point: &TrajectoryPoint,
        state: &VehicleState<A>,
    ) -> MotorCommand {
        let collective_thrust_cmd = self.altitude.altitude_control(
            &mut self.state,
            point.position.z,
            point.velocity.z,
            state.position.z,
            state.velocity.z,
            &state.attitude,
            point.acceleration.z,
            dt,
        );

        // Reserve some thrust for attitude control
        let min_thrust = self.config.min_motor_thrust;
        let max_thrust = self.config.max_motor_thrust;
        let thrust_margin = 0.1 * (max_thrust - min_thrust);
        let collective_thrust_cmd = collective_thrust_cmd
            .max((min_thrust + thrust_margin) * 4.)
            .min((max_thrust - thrust_margin) * 4.);

        let acceleration_cmd = self.lateral.lateral_position_control(
            point.position,
            point.velocity,
            state.position,
            state.velocity,
            point.acceleration,
        );

        let mut body_rate_cmd =
            self.attitude
                .roll_pitch_control(acceleration_cmd, &state.attitude, collective_thrust_cmd);
        body_rate_cmd.z = self.yaw.yaw_control(point.yaw(), state.attitude.yaw());

        let moment_cmd = self
            .body_rate
            .body_rate_control(body_rate_cmd, state.body_rate);

        let motor_cmd = self.motors.motor_commands(collective_thrust_cmd, moment_cmd);

        log::trace!(
            "thrust: {} rates: {:?} moment: {:?} motors: {:?}",
            collective_thrust_cmd,
            body_rate_cmd,
            moment_cmd,
            motor_cmd.thrusts()
        );

        motor_cmd
    }
}
