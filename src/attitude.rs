use nalgebra::{Matrix2, Rotation3, UnitQuaternion, Vector2};

/// An orientation of the vehicle that can be viewed as a body to world (NED) rotation matrix.
///
/// The controller only ever reads a handful of matrix entries,
/// each exposed here under the name of what it means for the vehicle.
pub trait Orientation {
    /// The rotation matrix from the body frame to the world frame.
    fn rotation(&self) -> Rotation3<f32>;

    /// Heading in radians.
    fn yaw(&self) -> f32 {
        self.rotation().euler_angles().2
    }

    /// World frame x and y components of the body z-axis (`R13`, `R23`).
    fn tilt(&self) -> Vector2<f32> {
        let rot = self.rotation();
        Vector2::new(rot[(0, 2)], rot[(1, 2)])
    }

    /// Projection of the body z-axis onto world down (`R33`).
    ///
    /// This is `1` when level and approaches `0` as the vehicle tilts towards 90 degrees.
    fn thrust_alignment(&self) -> f32 {
        self.rotation()[(2, 2)]
    }

    /// Map a world frame rate of change of [`tilt`](Orientation::tilt)
    /// into roll and pitch body rates in radians/second.
    ///
    /// The result is divided by [`thrust_alignment`](Orientation::thrust_alignment) unguarded.
    fn tilt_rate_to_body_rate(&self, tilt_rate: Vector2<f32>) -> Vector2<f32> {
        let rot = self.rotation();
        let rot_mat = Matrix2::new(
            rot[(1, 0)],
            -rot[(0, 0)],
            rot[(1, 1)],
            -rot[(0, 1)],
        ) / rot[(2, 2)];

        rot_mat * tilt_rate
    }
}

impl Orientation for UnitQuaternion<f32> {
    fn rotation(&self) -> Rotation3<f32> {
        self.to_rotation_matrix()
    }

    fn yaw(&self) -> f32 {
        self.euler_angles().2
    }
}

impl Orientation for Rotation3<f32> {
    fn rotation(&self) -> Rotation3<f32> {
        *self
    }
}

impl<O: Orientation + ?Sized> Orientation for &O {
    fn rotation(&self) -> Rotation3<f32> {
        (**self).rotation()
    }

    fn yaw(&self) -> f32 {
        (**self).yaw()
    }
}
