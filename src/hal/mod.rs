use crate::{MotorCommand, VehicleState};
use nalgebra::Vector3;

/// State estimate of the vehicle in the NED frame.
pub trait Sensors<Attitude> {
    fn attitude(&mut self) -> Attitude;

    /// Body frame angular rates in radians/second.
    fn gyro(&mut self) -> Vector3<f32>;

    fn velocity(&mut self) -> Vector3<f32>;

    fn position(&mut self) -> Vector3<f32>;

    /// Read the full state.
    fn state(&mut self) -> VehicleState<Attitude> {
        VehicleState {
            position: self.position(),
            velocity: self.velocity(),
            attitude: self.attitude(),
            body_rate: self.gyro(),
        }
    }
}

/// Sink for the commanded rotor thrusts.
pub trait Actuator {
    fn output(&mut self, command: MotorCommand);
}

impl<T: Actuator + ?Sized> Actuator for &mut T {
    fn output(&mut self, command: MotorCommand) {
        (**self).output(command)
    }
}

/// Sensors that report a fixed, known state.
impl<A: Clone> Sensors<A> for VehicleState<A> {
    fn attitude(&mut self) -> A {
        self.attitude.clone()
    }

    fn gyro(&mut self) -> Vector3<f32> {
        self.body_rate
    }

    fn velocity(&mut self) -> Vector3<f32> {
        self.velocity
    }

    fn position(&mut self) -> Vector3<f32> {
        self.position
    }

    fn state(&mut self) -> VehicleState<A> {
        self.clone()
    }
}
