use crate::TrajectoryPoint;

/// A reference trajectory sampled by simulation time (in seconds).
pub trait TrajectorySource {
    /// The point to track at `time`.
    fn point(&mut self, time: f32) -> TrajectoryPoint;
}

/// Hold a single point forever.
impl TrajectorySource for TrajectoryPoint {
    fn point(&mut self, _time: f32) -> TrajectoryPoint {
        *self
    }
}

impl<F> TrajectorySource for F
where
    F: FnMut(f32) -> TrajectoryPoint,
{
    fn point(&mut self, time: f32) -> TrajectoryPoint {
        self(time)
    }
}

/// A time-ordered list of points.
///
/// Each lookup returns the latest point that is not in the future.
/// Before the first point the first point is returned, after the last point the last point is held.
/// Points are not interpolated.
#[derive(Clone, Debug)]
pub struct Waypoints<'a> {
    points: &'a [TrajectoryPoint],
    idx: usize,
}

impl<'a> Waypoints<'a> {
    /// Create a new source from `points` sorted by time.
    pub fn new(points: &'a [TrajectoryPoint]) -> Self {
        Self { points, idx: 0 }
    }
}

impl TrajectorySource for Waypoints<'_> {
    fn point(&mut self, time: f32) -> TrajectoryPoint {
        if self.points.is_empty() {
            return TrajectoryPoint::default();
        }

        if self.points[self.idx].time > time {
            // Time went backwards, search again from the start
            self.idx = self
                .points
                .partition_point(|point| point.time <= time)
                .saturating_sub(1);
        }

        while self.idx + 1 < self.points.len() && self.points[self.idx + 1].time <= time {
            self.idx += 1;
        }

        self.points[self.idx]
    }
}
