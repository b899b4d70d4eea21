pub mod control;
pub use control::{Controller, MotorControl, QuadMotorControl};

use crate::{Actuator, Error, MotorCommand, Orientation, Sensors, TrajectorySource};
use core::marker::PhantomData;
use embedded_time::{duration::Microseconds, Clock};
use nalgebra::UnitQuaternion;

/// Flight loop of a quadcopter.
///
/// Each [`tick`](Copter::tick) reads the state from the sensors,
/// runs the controller against the trajectory and outputs the motor command.
pub struct Copter<C, S, T, A, O = UnitQuaternion<f32>> {
    pub controller: Controller,
    pub sensors: S,
    pub trajectory: T,
    pub actuator: A,
    clock: C,
    loop_period: f32,
    last_us: Option<u32>,
    elapsed_us: u64,
    _attitude: PhantomData<O>,
}

impl<C, S, T, A, O> Copter<C, S, T, A, O>
where
    C: Clock<T = u32>,
    S: Sensors<O>,
    T: TrajectorySource,
    A: Actuator,
    O: Orientation,
{
    /// Create a new flight loop that expects to be ticked every `loop_period` seconds.
    pub fn new(
        controller: Controller,
        clock: C,
        sensors: S,
        trajectory: T,
        actuator: A,
        loop_period: f32,
    ) -> Self {
        Self {
            controller,
            sensors,
            trajectory,
            actuator,
            clock,
            loop_period,
            last_us: None,
            elapsed_us: 0,
            _attitude: PhantomData,
        }
    }

    /// Seconds since the first tick, or `None` before it.
    pub fn sim_time(&self) -> Option<f32> {
        self.last_us
            .map(|_| self.elapsed_us as f32 / 1_000_000.)
    }

    /// Run one tick of the flight loop and return the command sent to the actuator.
    ///
    /// The first tick uses the nominal loop period as its time step.
    /// If the clock steps backwards the tick has no time step and the simulation time holds.
    /// Wrapping of the `u32` clock is followed as long as ticks are less than half its range apart.
    pub fn tick(&mut self) -> Result<MotorCommand, Error> {
        let now_us = self.micros_since_epoch()?.0;

        let dt = match self.last_us {
            Some(last_us) => {
                let step_us = now_us.wrapping_sub(last_us);
                if step_us > u32::MAX / 2 {
                    log::warn!(
                        "Clock went backwards by {}us, holding the last tick",
                        last_us.wrapping_sub(now_us)
                    );
                    0.
                } else {
                    self.elapsed_us += u64::from(step_us);
                    micros_to_secs(step_us)
                }
            }
            None => {
                log::debug!("First tick at {}us", now_us);
                self.loop_period
            }
        };
        self.last_us = Some(now_us);

        let sim_time = self.elapsed_us as f32 / 1_000_000.;
        let state = self.sensors.state();
        let motor_cmd = self
            .controller
            .run_control(dt, sim_time, &mut self.trajectory, &state);
        self.actuator.output(motor_cmd);

        Ok(motor_cmd)
    }

    fn micros_since_epoch(&mut self) -> Result<Microseconds<u32>, Error> {
        let instant = self.clock.try_now()?;
        Microseconds::try_from(instant.duration_since_epoch()).map_err(Into::into)
    }
}

fn micros_to_secs(micros: u32) -> f32 {
    micros as f32 / 1_000_000.
}
