use super::MotorControl;
use crate::{GainConfig, MotorCommand};
use core::f32::consts::SQRT_2;
use nalgebra::Vector3;

/// Motor mixing for a quad in X configuration.
///
/// Front-left and rear-right spin clockwise, front-right and rear-left counter-clockwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadMotorControl {
    /// Distance from the center to each rotor [m].
    pub length: f32,

    /// Drag/thrust ratio [m]
    pub kappa: f32,

    /// Thrust limits of a single motor [N]
    pub min_thrust: f32,
    pub max_thrust: f32,
}

impl Default for QuadMotorControl {
    fn default() -> Self {
        Self::from(&GainConfig::default())
    }
}

impl From<&GainConfig> for QuadMotorControl {
    fn from(config: &GainConfig) -> Self {
        Self {
            length: config.arm_length,
            kappa: config.kappa,
            min_thrust: config.min_motor_thrust,
            max_thrust: config.max_motor_thrust,
        }
    }
}

impl QuadMotorControl {
    fn constrain(&self, thrust: f32) -> f32 {
        thrust.max(self.min_thrust).min(self.max_thrust)
    }
}

impl MotorControl for QuadMotorControl {
    fn motor_commands(&self, collective_thrust: f32, moment_cmd: Vector3<f32>) -> MotorCommand {
        // 1. Perpendicular distance from each rotor to the roll and pitch axes
        let l = self.length / SQRT_2;

        // 2. Thrust differences needed for each moment [N]
        let p = moment_cmd.x / l;
        let q = moment_cmd.y / l;
        let r = -moment_cmd.z / self.kappa;
        let c = collective_thrust;

        // 3. Output the commanded thrust on each rotor [N]
        MotorCommand::new([
            self.constrain((p + q + r + c) / 4.),
            self.constrain((-p + q - r + c) / 4.),
            self.constrain((p - q - r + c) / 4.),
            self.constrain((-p - q + r + c) / 4.),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::{MotorControl, QuadMotorControl};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn motors() -> QuadMotorControl {
        QuadMotorControl {
            length: 0.17,
            kappa: 0.016,
            min_thrust: 0.1,
            max_thrust: 4.5,
        }
    }

    #[test]
    fn collective_thrust_is_shared_equally() {
        let cmd = motors().motor_commands(4.9, Vector3::zeros());

        for thrust in cmd.thrusts() {
            assert_relative_eq!(thrust, 1.225, epsilon = 1e-6);
        }
        assert_relative_eq!(cmd.total(), 4.9, epsilon = 1e-5);
    }

    #[test]
    fn roll_moment_speeds_up_left_rotors() {
        let cmd = motors().motor_commands(8., Vector3::new(0.05, 0., 0.));

        assert!(cmd.front_left() > cmd.front_right());
        assert!(cmd.rear_left() > cmd.rear_right());
        assert_relative_eq!(cmd.front_left(), cmd.rear_left());
        assert_relative_eq!(cmd.total(), 8., epsilon = 1e-5);
    }

    #[test]
    fn yaw_moment_slows_clockwise_rotors() {
        let cmd = motors().motor_commands(8., Vector3::new(0., 0., 0.01));

        // r = -Mz / kappa, so front-left and rear-right lose thrust
        assert!(cmd.front_left() < cmd.front_right());
        assert!(cmd.rear_right() < cmd.rear_left());
        assert_relative_eq!(cmd.front_left(), cmd.rear_right());
    }

    #[test]
    fn thrusts_stay_within_limits() {
        let motors = motors();

        for (thrust, moment) in [
            (1000., Vector3::new(5., -5., 1.)),
            (-1000., Vector3::zeros()),
            (4., Vector3::new(100., 0., -100.)),
            (f32::NAN, Vector3::zeros()),
            (4., Vector3::new(f32::INFINITY, f32::NAN, 0.)),
        ] {
            let cmd = motors.motor_commands(thrust, moment);
            for t in cmd.thrusts() {
                assert!(t >= motors.min_thrust && t <= motors.max_thrust, "{}", t);
            }
        }
    }
}
