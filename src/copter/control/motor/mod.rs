use crate::MotorCommand;
use nalgebra::Vector3;

mod quad;
pub use quad::QuadMotorControl;

/// Mixing of a collective thrust and body moment into individual rotor thrusts.
pub trait MotorControl {
    /// Convert a collective thrust (in Newtons) and a moment (in Newton*meters) into motor thrusts.
    fn motor_commands(&self, collective_thrust: f32, moment_cmd: Vector3<f32>) -> MotorCommand;
}
