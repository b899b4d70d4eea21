use crate::{GainConfig, Orientation};
use nalgebra::{Vector2, Vector3};
use pid_controller::P;

/// Roll/pitch controller.
///
/// Turns a desired horizontal acceleration into the tilt of the thrust vector needed to produce it,
/// then into roll and pitch rates that move the vehicle towards that tilt.
#[derive(Clone, Copy, Debug)]
pub struct AttitudeController {
    /// Bank gain (`kpBank`)
    pub p: P<f32>,
    pub mass: f32,
    /// Limit on each commanded tilt component
    pub max_tilt: f32,
}

impl Default for AttitudeController {
    fn default() -> Self {
        Self::from(&GainConfig::default())
    }
}

impl From<&GainConfig> for AttitudeController {
    fn from(config: &GainConfig) -> Self {
        Self {
            p: P { kp: config.kp_bank },
            mass: config.mass,
            max_tilt: config.max_tilt_angle,
        }
    }
}

impl AttitudeController {
    /// Calculate the roll-rate and pitch-rate commands in the body frame in radians/second.
    ///
    /// `acceleration_cmd` is the desired NED acceleration (only x and y are used)
    /// and `thrust_cmd` the collective thrust in Newtons.
    /// Without positive thrust the vehicle can't tilt towards anything, so the output is zero.
    /// The z (yaw-rate) component of the output is always zero.
    pub fn roll_pitch_control(
        &self,
        acceleration_cmd: Vector3<f32>,
        attitude: &impl Orientation,
        thrust_cmd: f32,
    ) -> Vector3<f32> {
        // Also catches NaN
        if !(thrust_cmd > 0.) {
            log::trace!("Non-positive thrust {}, holding attitude", thrust_cmd);
            return Vector3::zeros();
        }

        // Collective acceleration, negative as thrust points up the body z-axis
        let c = -thrust_cmd / self.mass;

        let tilt_cmd = (Vector2::new(acceleration_cmd.x, acceleration_cmd.y) / c)
            .map(|n| n.max(-self.max_tilt).min(self.max_tilt));

        let tilt_rate_cmd = self.p.control(tilt_cmd, attitude.tilt());
        let rate_cmd = attitude.tilt_rate_to_body_rate(tilt_rate_cmd);

        Vector3::new(rate_cmd.x, rate_cmd.y, 0.)
    }
}

#[cfg(test)]
mod tests {
    use super::AttitudeController;
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};
    use pid_controller::P;

    fn controller() -> AttitudeController {
        AttitudeController {
            p: P { kp: 10. },
            mass: 0.5,
            max_tilt: 0.7,
        }
    }

    #[test]
    fn level_without_acceleration() {
        let rates = controller().roll_pitch_control(
            Vector3::zeros(),
            &UnitQuaternion::<f32>::identity(),
            4.9,
        );
        assert_relative_eq!(rates, Vector3::zeros());
    }

    #[test]
    fn accelerate_north_pitches_forward() {
        let rates = controller().roll_pitch_control(
            Vector3::new(1., 0., 0.),
            &UnitQuaternion::<f32>::identity(),
            5.,
        );

        // c = -10 m/s^2, so the body z-axis should lean to x = -0.1
        // which is a nose down (negative) pitch rate.
        assert_relative_eq!(rates, Vector3::new(0., -1., 0.), epsilon = 1e-6);
    }

    #[test]
    fn accelerate_east_rolls_right() {
        let rates = controller().roll_pitch_control(
            Vector3::new(0., 1., 0.),
            &UnitQuaternion::<f32>::identity(),
            5.,
        );
        assert_relative_eq!(rates, Vector3::new(1., 0., 0.), epsilon = 1e-6);
    }

    #[test]
    fn tilt_is_limited() {
        let rates = controller().roll_pitch_control(
            Vector3::new(0., 1000., 0.),
            &UnitQuaternion::<f32>::identity(),
            5.,
        );
        assert_relative_eq!(rates, Vector3::new(7., 0., 0.), epsilon = 1e-5);
    }

    #[test]
    fn no_thrust_no_rates() {
        let controller = controller();
        let attitude = UnitQuaternion::<f32>::from_euler_angles(0.3, -0.2, 0.1);

        for thrust in [0., -3., f32::NAN] {
            let rates = controller.roll_pitch_control(Vector3::new(3., -2., 0.), &attitude, thrust);
            assert_eq!(rates, Vector3::zeros());
        }
    }

    #[test]
    fn hold_existing_tilt() {
        let attitude = UnitQuaternion::<f32>::from_euler_angles(0.2, 0., 0.);
        let controller = AttitudeController {
            max_tilt: 1.,
            ..controller()
        };

        // The acceleration that the current tilt produces with this thrust
        let thrust = 5.;
        let c = -thrust / controller.mass;
        let tilt = attitude.to_rotation_matrix();
        let accel = Vector3::new(tilt[(0, 2)] * c, tilt[(1, 2)] * c, 0.);

        let rates = controller.roll_pitch_control(accel, &attitude, thrust);
        assert_relative_eq!(rates, Vector3::zeros(), epsilon = 1e-5);
    }
}
