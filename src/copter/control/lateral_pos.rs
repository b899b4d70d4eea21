use crate::GainConfig;
use nalgebra::Vector3;
use pid_controller::{P, PD};

/// Lateral position controller.
///
/// Tracks the horizontal position and velocity with PD control on top of a feed-forward acceleration.
/// There is no integral term, so a constant horizontal disturbance leaves a steady-state offset.
#[derive(Clone, Debug)]
pub struct LateralPositionController {
    /// Position (`kpPosXY`) and velocity (`kpVelXY`) gains
    pub pd: PD<f32>,
    pub max_speed: f32,
    pub max_acceleration: f32,
}

impl Default for LateralPositionController {
    fn default() -> Self {
        Self::from(&GainConfig::default())
    }
}

impl From<&GainConfig> for LateralPositionController {
    fn from(config: &GainConfig) -> Self {
        Self {
            pd: PD {
                p: P { kp: config.kp_pos_xy },
                kd: config.kp_vel_xy,
            },
            max_speed: config.max_speed_xy,
            max_acceleration: config.max_accel_xy,
        }
    }
}

impl LateralPositionController {
    /// Calculate the desired horizontal acceleration in the NED frame in meters/second^2.
    ///
    /// Vertical components of the commands are ignored and the output's z component is always zero.
    pub fn lateral_position_control(
        &self,
        mut position_cmd: Vector3<f32>,
        mut velocity_cmd: Vector3<f32>,
        position: Vector3<f32>,
        velocity: Vector3<f32>,
        mut acceleration_ff: Vector3<f32>,
    ) -> Vector3<f32> {
        position_cmd.z = position.z;
        velocity_cmd.z = 0.;
        acceleration_ff.z = 0.;

        // Limit the commanded velocity before it reaches the derivative term
        let velocity_cmd = constrain(velocity_cmd, self.max_speed);

        let acceleration_cmd =
            self.pd.control(position_cmd, velocity_cmd, position, velocity) + acceleration_ff;

        let mut acceleration_cmd = constrain(acceleration_cmd, self.max_acceleration);
        acceleration_cmd.z = 0.;
        acceleration_cmd
    }
}

/// Constrain each component to `[-limit, limit]`.
fn constrain(v: Vector3<f32>, limit: f32) -> Vector3<f32> {
    v.map(|n| n.max(-limit).min(limit))
}
