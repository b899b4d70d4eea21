use crate::GainConfig;
use nalgebra::Vector3;

/// Proportional body-rate controller with a diagonal inertia.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyRateController {
    /// Gains for p, q and r (`kpPQR`)
    pub kp: Vector3<f32>,
    /// Diagonal of the inertia tensor in kg*m^2
    pub moment_of_inertia: Vector3<f32>,
}

impl Default for BodyRateController {
    fn default() -> Self {
        Self::from(&GainConfig::default())
    }
}

impl From<&GainConfig> for BodyRateController {
    fn from(config: &GainConfig) -> Self {
        Self {
            kp: config.kp_pqr,
            moment_of_inertia: config.moment_of_inertia(),
        }
    }
}

impl BodyRateController {
    /// Generate the roll, pitch, yaw moment commands in the body frame in Newtons*meters
    pub fn body_rate_control(
        &self,
        body_rate_cmd: Vector3<f32>,
        body_rate: Vector3<f32>,
    ) -> Vector3<f32> {
        let angular_acceleration = self.kp.component_mul(&(body_rate_cmd - body_rate));
        self.moment_of_inertia.component_mul(&angular_acceleration)
    }
}
