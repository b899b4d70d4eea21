use crate::Orientation;
use nalgebra::{UnitQuaternion, Vector3};

/// The estimated state of the vehicle in the NED frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleState<A = UnitQuaternion<f32>> {
    /// Position in meters.
    pub position: Vector3<f32>,
    /// Velocity in meters/second.
    pub velocity: Vector3<f32>,
    /// Orientation of the body relative to the world frame.
    pub attitude: A,
    /// Body frame angular rates (p, q, r) in radians/second.
    pub body_rate: Vector3<f32>,
}

impl<A: Orientation> VehicleState<A> {
    pub fn new(
        position: Vector3<f32>,
        velocity: Vector3<f32>,
        attitude: A,
        body_rate: Vector3<f32>,
    ) -> Self {
        Self {
            position,
            velocity,
            attitude,
            body_rate,
        }
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new(
            Vector3::zeros(),
            Vector3::zeros(),
            UnitQuaternion::identity(),
            Vector3::zeros(),
        )
    }
}

/// A point along the reference trajectory in the NED frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryPoint {
    /// Time of this point in seconds.
    pub time: f32,
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    /// Feed-forward acceleration in meters/second^2.
    pub acceleration: Vector3<f32>,
    /// Desired attitude, only the heading is tracked.
    pub attitude: UnitQuaternion<f32>,
}

impl TrajectoryPoint {
    /// A point holding `position` at `time` with no motion and zero heading.
    pub fn new(time: f32, position: Vector3<f32>) -> Self {
        Self {
            time,
            position,
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vector3<f32>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vector3<f32>) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.attitude = UnitQuaternion::from_euler_angles(0., 0., yaw);
        self
    }

    /// The desired heading in radians.
    pub fn yaw(&self) -> f32 {
        self.attitude.yaw()
    }
}

impl Default for TrajectoryPoint {
    fn default() -> Self {
        Self::new(0., Vector3::zeros())
    }
}

/// Thrust commands (in Newtons) for each rotor of a quad in X configuration.
///
/// Only the motor mixer creates these, so every thrust is within the configured motor limits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotorCommand {
    thrusts: [f32; 4],
}

impl MotorCommand {
    pub(crate) const fn new(thrusts: [f32; 4]) -> Self {
        Self { thrusts }
    }

    /// Thrusts ordered front-left, front-right, rear-left, rear-right.
    pub const fn thrusts(&self) -> [f32; 4] {
        self.thrusts
    }

    /// Front-left, clockwise.
    pub const fn front_left(&self) -> f32 {
        self.thrusts[0]
    }

    /// Front-right, counter-clockwise.
    pub const fn front_right(&self) -> f32 {
        self.thrusts[1]
    }

    /// Rear-left, counter-clockwise.
    pub const fn rear_left(&self) -> f32 {
        self.thrusts[2]
    }

    /// Rear-right, clockwise.
    pub const fn rear_right(&self) -> f32 {
        self.thrusts[3]
    }

    /// Sum of all rotor thrusts.
    pub fn total(&self) -> f32 {
        self.thrusts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::TrajectoryPoint;
    use approx::assert_relative_eq;
    use core::f32::consts::FRAC_PI_2;
    use nalgebra::Vector3;

    #[test]
    fn trajectory_point_yaw() {
        let point = TrajectoryPoint::new(1., Vector3::new(0., 0., -1.)).with_yaw(FRAC_PI_2);

        assert_relative_eq!(point.yaw(), FRAC_PI_2, epsilon = 1e-6);
        assert_eq!(point.velocity, Vector3::zeros());
    }
}
