use super::ControllerState;
use crate::{GainConfig, Orientation};
use pid_controller::{P, PD};

/// Vertical (altitude) controller in the NED frame.
///
/// PID control on altitude, with the integral kept in [`ControllerState`].
/// The integral is accumulated on every call and is never limited or reset,
/// so it keeps winding up while the thrust output is saturated.
#[derive(Clone, Debug)]
pub struct AltitudeController {
    /// Position (`kpPosZ`) and velocity (`kpVelZ`) gains
    pub pd: PD<f32>,
    /// Integral gain (`KiPosZ`)
    pub ki: f32,
    pub mass: f32,
    pub gravity: f32,
    pub max_descent_rate: f32,
    pub max_ascent_rate: f32,
    /// Collective thrust limits in Newtons
    pub min_thrust: f32,
    pub max_thrust: f32,
}

impl Default for AltitudeController {
    fn default() -> Self {
        Self::from(&GainConfig::default())
    }
}

impl From<&GainConfig> for AltitudeController {
    fn from(config: &GainConfig) -> Self {
        Self {
            pd: PD {
                p: P { kp: config.kp_pos_z },
                kd: config.kp_vel_z,
            },
            ki: config.ki_pos_z,
            mass: config.mass,
            gravity: config.gravity,
            max_descent_rate: config.max_descent_rate,
            max_ascent_rate: config.max_ascent_rate,
            min_thrust: 4. * config.min_motor_thrust,
            max_thrust: 4. * config.max_motor_thrust,
        }
    }
}

impl AltitudeController {
    /// Calculate the collective thrust command in Newtons.
    ///
    /// Positions, velocities and the feed-forward acceleration are NED (positive down),
    /// `dt` is the time since the last call in seconds.
    /// The thrust is scaled by the current tilt of the vehicle, which grows without bound near 90 degrees.
    pub fn altitude_control(
        &self,
        state: &mut ControllerState,
        altitude_cmd: f32,
        vertical_velocity_cmd: f32,
        altitude: f32,
        vertical_velocity: f32,
        attitude: &impl Orientation,
        acceleration_ff: f32,
        dt: f32,
    ) -> f32 {
        // 1. Limit the commanded vertical rate
        let vertical_velocity_cmd = vertical_velocity_cmd
            .max(-self.max_descent_rate)
            .min(self.max_ascent_rate);

        // 2. Integrate the altitude error
        state.integrated_altitude_error += (altitude_cmd - altitude) * dt;

        // 3. Commanded vertical acceleration from the PID and feed-forward terms
        let u_1 = self.pd.control(
            altitude_cmd,
            vertical_velocity_cmd,
            altitude,
            vertical_velocity,
        ) + self.ki * state.integrated_altitude_error
            + acceleration_ff;

        // 4. Thrust points up (negative z), so add gravity and divide by the vertical component of the body z-axis
        let acceleration = (self.gravity - u_1) / attitude.thrust_alignment();

        (self.mass * acceleration)
            .max(self.min_thrust)
            .min(self.max_thrust)
    }
}

#[cfg(test)]
mod tests {
    use super::AltitudeController;
    use crate::copter::control::ControllerState;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;
    use pid_controller::{P, PD};

    fn controller() -> AltitudeController {
        AltitudeController {
            pd: PD {
                p: P { kp: 4. },
                kd: 2.,
            },
            ki: 1.,
            mass: 0.5,
            gravity: 9.81,
            max_descent_rate: 1.,
            max_ascent_rate: 2.,
            min_thrust: 0.4,
            max_thrust: 40.,
        }
    }

    #[test]
    fn hover_thrust_without_error() {
        let mut state = ControllerState::default();
        let thrust = controller().altitude_control(
            &mut state,
            -1.,
            0.,
            -1.,
            0.,
            &UnitQuaternion::<f32>::identity(),
            0.,
            0.01,
        );

        assert_relative_eq!(thrust, 0.5 * 9.81);
        assert_eq!(state.integrated_altitude_error, 0.);
    }

    #[test]
    fn gains_act_on_matching_errors() {
        // Position error of -1 m with kp = 4 and velocity error of -0.5 m/s with kd = 2
        let thrust = controller().altitude_control(
            &mut ControllerState::default(),
            -1.,
            0.,
            0.,
            0.5,
            &UnitQuaternion::<f32>::identity(),
            0.,
            0.,
        );

        assert_relative_eq!(thrust, 0.5 * (9.81 + 5.), epsilon = 1e-5);
    }

    #[test]
    fn climb_needs_more_thrust() {
        let mut state = ControllerState::default();
        // Desired altitude is above (more negative in NED) the current one
        let thrust = controller().altitude_control(
            &mut state,
            -2.,
            0.,
            -1.,
            0.,
            &UnitQuaternion::<f32>::identity(),
            0.,
            0.1,
        );

        assert!(thrust > 0.5 * 9.81);
        assert_relative_eq!(state.integrated_altitude_error, -0.1);
    }

    #[test]
    fn tilt_increases_thrust() {
        let controller = controller();
        let level = controller.altitude_control(
            &mut ControllerState::default(),
            0.,
            0.,
            0.,
            0.,
            &UnitQuaternion::<f32>::identity(),
            0.,
            0.01,
        );
        let tilted = controller.altitude_control(
            &mut ControllerState::default(),
            0.,
            0.,
            0.,
            0.,
            &UnitQuaternion::<f32>::from_euler_angles(0.5, 0., 0.),
            0.,
            0.01,
        );

        assert_relative_eq!(tilted, level / 0.5f32.cos(), epsilon = 1e-5);
    }

    #[test]
    fn velocity_cmd_is_limited() {
        let controller = controller();
        let attitude = UnitQuaternion::<f32>::identity();

        // The command is limited to [-max_descent_rate, max_ascent_rate]
        let limited = controller.altitude_control(
            &mut ControllerState::default(),
            0.,
            10.,
            0.,
            0.,
            &attitude,
            0.,
            0.01,
        );
        let at_limit = controller.altitude_control(
            &mut ControllerState::default(),
            0.,
            2.,
            0.,
            0.,
            &attitude,
            0.,
            0.01,
        );

        assert_relative_eq!(limited, at_limit);
    }

    #[test]
    fn thrust_is_limited() {
        let thrust = controller().altitude_control(
            &mut ControllerState::default(),
            -1000.,
            0.,
            0.,
            0.,
            &UnitQuaternion::<f32>::identity(),
            0.,
            0.01,
        );
        assert_eq!(thrust, 40.);

        let thrust = controller().altitude_control(
            &mut ControllerState::default(),
            1000.,
            0.,
            0.,
            0.,
            &UnitQuaternion::<f32>::identity(),
            0.,
            0.01,
        );
        assert_eq!(thrust, 0.4);
    }

    #[test]
    fn integral_winds_up_under_constant_error() {
        let controller = controller();
        let mut state = ControllerState::default();
        let attitude = UnitQuaternion::<f32>::identity();

        let mut last = 0.;
        for _ in 0..10 {
            let thrust =
                controller.altitude_control(&mut state, -0.1, 0., 0., 0., &attitude, 0., 0.1);
            // Target is above the vehicle so the integral keeps adding thrust
            assert!(thrust > last);
            last = thrust;
        }
        assert_relative_eq!(state.integrated_altitude_error, -0.1, epsilon = 1e-6);
    }
}
