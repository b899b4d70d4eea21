//! Controller gains, physical constants and limits.

use core::fmt;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub mod params;
pub use params::{ParamError, ParamText, Params, Value};

use crate::Error;

/// Standard gravity in meters/second^2.
pub const GRAVITY: f32 = 9.81;

/// Gains, physical constants and limits of the cascaded controller.
///
/// Defaults match the values used for parameters missing from a configuration:
/// every gain is zero and every limit is effectively unlimited.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainConfig {
    /// Lateral position gain.
    #[serde(rename = "kpPosXY")]
    pub kp_pos_xy: f32,
    /// Vertical position gain.
    #[serde(rename = "kpPosZ")]
    pub kp_pos_z: f32,
    /// Vertical position integral gain.
    #[serde(rename = "KiPosZ", alias = "kiPosZ")]
    pub ki_pos_z: f32,
    /// Lateral velocity gain.
    #[serde(rename = "kpVelXY")]
    pub kp_vel_xy: f32,
    /// Vertical velocity gain.
    #[serde(rename = "kpVelZ")]
    pub kp_vel_z: f32,
    /// Roll/pitch (bank) gain.
    #[serde(rename = "kpBank")]
    pub kp_bank: f32,
    #[serde(rename = "kpYaw")]
    pub kp_yaw: f32,
    /// Body rate gains for p, q and r.
    #[serde(rename = "kpPQR")]
    pub kp_pqr: Vector3<f32>,

    /// Vehicle mass in kilograms.
    #[serde(rename = "Mass", alias = "mass")]
    pub mass: f32,
    /// Moments of inertia about the body axes in kg*m^2.
    #[serde(rename = "Ixx")]
    pub ixx: f32,
    #[serde(rename = "Iyy")]
    pub iyy: f32,
    #[serde(rename = "Izz")]
    pub izz: f32,
    /// Distance from the center of the vehicle to each rotor in meters.
    #[serde(rename = "L", alias = "armLength")]
    pub arm_length: f32,
    /// Rotor drag/thrust ratio in meters.
    pub kappa: f32,
    pub gravity: f32,

    /// Lowest thrust a single motor may be commanded (in Newtons).
    #[serde(rename = "minMotorThrust")]
    pub min_motor_thrust: f32,
    /// Highest thrust a single motor may be commanded (in Newtons).
    #[serde(rename = "maxMotorThrust")]
    pub max_motor_thrust: f32,
    /// Fastest commanded descent in meters/second, positive.
    #[serde(rename = "maxDescentRate")]
    pub max_descent_rate: f32,
    /// Fastest commanded ascent in meters/second, positive.
    #[serde(rename = "maxAscentRate")]
    pub max_ascent_rate: f32,
    /// Per-axis limit on the commanded lateral velocity in meters/second.
    #[serde(rename = "maxSpeedXY")]
    pub max_speed_xy: f32,
    /// Per-axis limit on the commanded lateral acceleration in meters/second^2.
    #[serde(rename = "maxHorizAccel", alias = "maxAccelXY")]
    pub max_accel_xy: f32,
    /// Limit on the commanded tilt, as a component of the body z-axis in the world frame.
    #[serde(rename = "maxTiltAngle")]
    pub max_tilt_angle: f32,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            kp_pos_xy: 0.,
            kp_pos_z: 0.,
            ki_pos_z: 0.,
            kp_vel_xy: 0.,
            kp_vel_z: 0.,
            kp_bank: 0.,
            kp_yaw: 0.,
            kp_pqr: Vector3::zeros(),
            mass: 1.,
            ixx: 0.001,
            iyy: 0.001,
            izz: 0.002,
            arm_length: 0.1,
            kappa: 0.01,
            gravity: GRAVITY,
            min_motor_thrust: 0.,
            max_motor_thrust: 100.,
            max_descent_rate: 100.,
            max_ascent_rate: 100.,
            max_speed_xy: 100.,
            max_accel_xy: 100.,
            max_tilt_angle: 100.,
        }
    }
}

/// A parameter of [`GainConfig`] addressable by key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    KpPosXY,
    KpPosZ,
    KiPosZ,
    KpVelXY,
    KpVelZ,
    KpBank,
    KpYaw,
    KpPQR,
    Mass,
    Ixx,
    Iyy,
    Izz,
    ArmLength,
    Kappa,
    MinMotorThrust,
    MaxMotorThrust,
    MaxDescentRate,
    MaxAscentRate,
    MaxSpeedXY,
    MaxAccelXY,
    MaxTiltAngle,
}

/// Every accepted parameter name.
/// Aliases come before the canonical name so the canonical one wins when both are set.
pub const KEYS: [(&str, Key); 24] = [
    ("kpPosXY", Key::KpPosXY),
    ("kpPosZ", Key::KpPosZ),
    ("KiPosZ", Key::KiPosZ),
    ("kpVelXY", Key::KpVelXY),
    ("kpVelZ", Key::KpVelZ),
    ("kpBank", Key::KpBank),
    ("kpYaw", Key::KpYaw),
    ("kpPQR", Key::KpPQR),
    ("mass", Key::Mass),
    ("Mass", Key::Mass),
    ("Ixx", Key::Ixx),
    ("Iyy", Key::Iyy),
    ("Izz", Key::Izz),
    ("armLength", Key::ArmLength),
    ("L", Key::ArmLength),
    ("kappa", Key::Kappa),
    ("minMotorThrust", Key::MinMotorThrust),
    ("maxMotorThrust", Key::MaxMotorThrust),
    ("maxDescentRate", Key::MaxDescentRate),
    ("maxAscentRate", Key::MaxAscentRate),
    ("maxSpeedXY", Key::MaxSpeedXY),
    ("maxAccelXY", Key::MaxAccelXY),
    ("maxHorizAccel", Key::MaxAccelXY),
    ("maxTiltAngle", Key::MaxTiltAngle),
];

impl Key {
    /// Look up a key by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        KEYS.iter()
            .find(|(key_name, _)| key_name.eq_ignore_ascii_case(name))
            .map(|(_, key)| *key)
    }
}

impl GainConfig {
    /// Load the configuration stored under `name` (e.g. `"QuadControlParams"`) from `params`.
    ///
    /// Missing parameters keep their [default](GainConfig::default) value.
    pub fn load<P>(params: &P, name: &str) -> Result<Self, Error>
    where
        P: Params + ?Sized,
    {
        let mut config = Self::default();
        let mut found = 0;

        for (key_name, key) in KEYS {
            if let Some(value) = params.get(name, key_name)? {
                log::trace!("{}.{} = {:?}", name, key_name, value);
                config.set_key(key, value)?;
                found += 1;
            }
        }

        if let Err(error) = config.validate() {
            log::warn!("Invalid configuration {}: {}", name, error);
            return Err(error.into());
        }

        log::debug!("Loaded configuration {} ({} parameters set)", name, found);
        Ok(config)
    }

    /// Set the parameter named `key`.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ParamError> {
        let key = Key::from_name(key).ok_or(ParamError::UnknownKey)?;
        self.set_key(key, value)
    }

    pub fn set_key(&mut self, key: Key, value: Value) -> Result<(), ParamError> {
        match self.scalar_mut(key) {
            Some(field) => *field = value.scalar()?,
            None => self.kp_pqr = value.vector()?,
        }
        Ok(())
    }

    fn scalar_mut(&mut self, key: Key) -> Option<&mut f32> {
        let field = match key {
            Key::KpPosXY => &mut self.kp_pos_xy,
            Key::KpPosZ => &mut self.kp_pos_z,
            Key::KiPosZ => &mut self.ki_pos_z,
            Key::KpVelXY => &mut self.kp_vel_xy,
            Key::KpVelZ => &mut self.kp_vel_z,
            Key::KpBank => &mut self.kp_bank,
            Key::KpYaw => &mut self.kp_yaw,
            Key::KpPQR => return None,
            Key::Mass => &mut self.mass,
            Key::Ixx => &mut self.ixx,
            Key::Iyy => &mut self.iyy,
            Key::Izz => &mut self.izz,
            Key::ArmLength => &mut self.arm_length,
            Key::Kappa => &mut self.kappa,
            Key::MinMotorThrust => &mut self.min_motor_thrust,
            Key::MaxMotorThrust => &mut self.max_motor_thrust,
            Key::MaxDescentRate => &mut self.max_descent_rate,
            Key::MaxAscentRate => &mut self.max_ascent_rate,
            Key::MaxSpeedXY => &mut self.max_speed_xy,
            Key::MaxAccelXY => &mut self.max_accel_xy,
            Key::MaxTiltAngle => &mut self.max_tilt_angle,
        };
        Some(field)
    }

    /// Check the physical constants and limits make sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("kpPosXY", self.kp_pos_xy),
            ("kpPosZ", self.kp_pos_z),
            ("KiPosZ", self.ki_pos_z),
            ("kpVelXY", self.kp_vel_xy),
            ("kpVelZ", self.kp_vel_z),
            ("kpBank", self.kp_bank),
            ("kpYaw", self.kp_yaw),
            ("kpPQR.x", self.kp_pqr.x),
            ("kpPQR.y", self.kp_pqr.y),
            ("kpPQR.z", self.kp_pqr.z),
            ("Mass", self.mass),
            ("Ixx", self.ixx),
            ("Iyy", self.iyy),
            ("Izz", self.izz),
            ("L", self.arm_length),
            ("kappa", self.kappa),
            ("gravity", self.gravity),
            ("minMotorThrust", self.min_motor_thrust),
            ("maxMotorThrust", self.max_motor_thrust),
            ("maxDescentRate", self.max_descent_rate),
            ("maxAscentRate", self.max_ascent_rate),
            ("maxSpeedXY", self.max_speed_xy),
            ("maxHorizAccel", self.max_accel_xy),
            ("maxTiltAngle", self.max_tilt_angle),
        ];
        if let Some(&(name, _)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NotFinite(name));
        }

        if self.mass <= 0. {
            return Err(ConfigError::Mass);
        }
        if self.arm_length <= 0. {
            return Err(ConfigError::ArmLength);
        }
        if self.kappa == 0. {
            return Err(ConfigError::Kappa);
        }
        if self.min_motor_thrust > self.max_motor_thrust {
            return Err(ConfigError::MotorThrust);
        }

        Ok(())
    }

    /// Diagonal of the inertia tensor in kg*m^2.
    pub fn moment_of_inertia(&self) -> Vector3<f32> {
        Vector3::new(self.ixx, self.iyy, self.izz)
    }

    /// Collective thrust needed to hover level, in Newtons.
    pub fn hover_thrust(&self) -> f32 {
        self.mass * self.gravity
    }
}

/// An invalid [`GainConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A parameter is NaN or infinite.
    NotFinite(&'static str),
    Mass,
    ArmLength,
    Kappa,
    MotorThrust,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFinite(name) => write!(f, "{} is not a finite number", name),
            Self::Mass => f.write_str("Mass must be positive"),
            Self::ArmLength => f.write_str("Arm length must be positive"),
            Self::Kappa => f.write_str("kappa must not be zero"),
            Self::MotorThrust => f.write_str("minMotorThrust is above maxMotorThrust"),
        }
    }
}
