use crate::GainConfig;
use core::f32::consts::{PI, TAU};
use num_traits::Float;
use pid_controller::{error, P};

/// Heading controller.
///
/// Commands are accepted in any range of radians and always turn the short way around.
#[derive(Clone, Copy, Debug)]
pub struct YawController {
    /// Yaw gain (`kpYaw`)
    pub p: P<f32>,
}

impl Default for YawController {
    fn default() -> Self {
        Self::from(&GainConfig::default())
    }
}

impl From<&GainConfig> for YawController {
    fn from(config: &GainConfig) -> Self {
        Self {
            p: P { kp: config.kp_yaw },
        }
    }
}

impl YawController {
    /// Yaw-rate command in radians/second turning from `yaw` towards `yaw_cmd`.
    pub fn yaw_control(&self, yaw_cmd: f32, yaw: f32) -> f32 {
        // Whole turns in the command carry no information
        let yaw_cmd = yaw_cmd - TAU * Float::floor(yaw_cmd / TAU);

        let mut yaw_error = error(yaw_cmd, yaw);
        if yaw_error > PI {
            yaw_error -= TAU;
        } else if yaw_error < -PI {
            yaw_error += TAU;
        }

        self.p.control_with_error(yaw_error)
    }
}
