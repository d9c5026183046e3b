//! Headless fixed-step runner and result recording.

use crate::engine::Snapshot;
use crate::error::{SimError, SimResult};
use crate::simulator::Simulator;
use cs_core::angle::{FrameInput, MAX_RPM};
use cs_core::numeric::Real;
use tracing::{debug, info};

/// One knot of a speed schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RpmPoint {
    /// Time (seconds)
    pub time: Real,
    pub rpm: Real,
}

/// Commanded speed as a function of time.
#[derive(Clone, Debug, PartialEq)]
pub enum RpmSchedule {
    Constant(Real),
    /// Linear interpolation between knots, held flat outside them.
    Piecewise(Vec<RpmPoint>),
}

impl Default for RpmSchedule {
    fn default() -> Self {
        RpmSchedule::Constant(3000.0)
    }
}

impl RpmSchedule {
    /// Validated piecewise-linear schedule.
    ///
    /// # Errors
    /// Returns error when empty, non-finite, or when knot times do not
    /// strictly increase.
    pub fn piecewise(points: Vec<RpmPoint>) -> SimResult<Self> {
        if points.is_empty() {
            return Err(SimError::InvalidArg {
                what: "rpm schedule needs at least one point",
            });
        }
        if points
            .iter()
            .any(|p| !p.time.is_finite() || !p.rpm.is_finite())
        {
            return Err(SimError::InvalidArg {
                what: "rpm schedule values must be finite",
            });
        }
        if points.windows(2).any(|w| w[1].time <= w[0].time) {
            return Err(SimError::InvalidArg {
                what: "rpm schedule times must strictly increase",
            });
        }
        Ok(RpmSchedule::Piecewise(points))
    }

    /// Speed at time `t`, held to `[0, MAX_RPM]`.
    pub fn rpm_at(&self, t: Real) -> Real {
        let rpm = match self {
            RpmSchedule::Constant(rpm) => *rpm,
            RpmSchedule::Piecewise(points) => interpolate(points, t),
        };
        rpm.max(0.0).min(MAX_RPM)
    }
}

fn interpolate(points: &[RpmPoint], t: Real) -> Real {
    let Some(first) = points.first() else {
        return 0.0;
    };
    if t <= first.time {
        return first.rpm;
    }
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        if t <= b.time {
            let s = (t - a.time) / (b.time - a.time);
            return a.rpm + s * (b.rpm - a.rpm);
        }
    }
    points.last().map_or(first.rpm, |p| p.rpm)
}

/// Options for headless runs.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Frame time step (seconds)
    pub dt: Real,
    /// Final time (seconds)
    pub t_end: Real,
    /// Maximum number of frames (safety limit)
    pub max_frames: usize,
    /// Record every N-th frame (decimation)
    pub record_every: usize,
    pub rpm: RpmSchedule,
    pub paused: bool,
    /// Scrub angle applied every frame while paused (rad)
    pub manual_angle: Option<Real>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            t_end: 1.0,
            max_frames: 100_000,
            record_every: 1,
            rpm: RpmSchedule::default(),
            paused: false,
            manual_angle: None,
        }
    }
}

impl RunOptions {
    fn validate(&self) -> SimResult<()> {
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.t_end >= 0.0) || !self.t_end.is_finite() {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_frames == 0 {
            return Err(SimError::InvalidArg {
                what: "max_frames must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }

    fn input_at(&self, t: Real, dt: Real) -> FrameInput {
        FrameInput {
            rpm: self.rpm.rpm_at(t),
            paused: self.paused,
            manual_angle: self.manual_angle,
            dt,
        }
    }
}

/// Recorded frames of one run.
#[derive(Clone, Debug)]
pub struct RunRecord {
    /// Time points (seconds)
    pub t: Vec<Real>,
    pub frames: Vec<Snapshot>,
}

impl RunRecord {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<(Real, &Snapshot)> {
        self.t.last().copied().zip(self.frames.last())
    }

    fn push(&mut self, t: Real, frame: Snapshot) -> SimResult<()> {
        if let Some(what) = frame.non_finite_field() {
            return Err(SimError::NonPhysical { what });
        }
        self.t.push(t);
        self.frames.push(frame);
        Ok(())
    }
}

/// Drive the active engine at a fixed frame step.
///
/// A zero-length frame at `t = 0` is recorded first so the run starts from
/// the initial state; the final frame is always recorded.
pub fn run_frames(sim: &mut Simulator, opts: &RunOptions) -> SimResult<RunRecord> {
    opts.validate()?;
    info!(
        engine = %sim.kind(),
        dt = opts.dt,
        t_end = opts.t_end,
        "starting run"
    );

    let mut record = RunRecord {
        t: Vec::new(),
        frames: Vec::new(),
    };
    let mut t = 0.0;
    let mut last = sim.advance(&opts.input_at(t, 0.0));
    record.push(t, last.clone())?;

    let mut step = 0;
    while t < opts.t_end && step < opts.max_frames {
        last = sim.advance(&opts.input_at(t, opts.dt));
        t += opts.dt;
        step += 1;

        if step % opts.record_every == 0 {
            record.push(t, last.clone())?;
        }
    }

    // Always record final frame
    if step % opts.record_every != 0 {
        record.push(t, last)?;
    }

    if step == opts.max_frames && t < opts.t_end {
        debug!(frames = step, "run stopped at frame limit");
    }
    info!(frames = step, recorded = record.len(), "run finished");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_options_defaults() {
        let opts = RunOptions::default();
        assert_eq!(opts.max_frames, 100_000);
        assert_eq!(opts.record_every, 1);
        assert_eq!(opts.rpm, RpmSchedule::Constant(3000.0));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn schedule_interpolates_and_holds() {
        let schedule = RpmSchedule::piecewise(vec![
            RpmPoint {
                time: 0.0,
                rpm: 1000.0,
            },
            RpmPoint {
                time: 1.0,
                rpm: 3000.0,
            },
        ])
        .unwrap();
        assert_eq!(schedule.rpm_at(-1.0), 1000.0);
        assert!((schedule.rpm_at(0.25) - 1500.0).abs() < 1e-9);
        assert_eq!(schedule.rpm_at(5.0), 3000.0);
    }

    #[test]
    fn schedule_never_negative() {
        assert_eq!(RpmSchedule::Constant(-10.0).rpm_at(0.0), 0.0);
    }

    #[test]
    fn schedule_caps_at_max_rpm() {
        assert_eq!(RpmSchedule::Constant(60_000.0).rpm_at(0.0), MAX_RPM);
        let ramp = RpmSchedule::piecewise(vec![
            RpmPoint {
                time: 0.0,
                rpm: 0.0,
            },
            RpmPoint {
                time: 1.0,
                rpm: 20_000.0,
            },
        ])
        .unwrap();
        assert!((ramp.rpm_at(0.25) - 5000.0).abs() < 1e-9);
        assert_eq!(ramp.rpm_at(0.75), MAX_RPM);
    }

    #[test]
    fn schedule_rejects_unordered_times() {
        let err = RpmSchedule::piecewise(vec![
            RpmPoint {
                time: 1.0,
                rpm: 0.0,
            },
            RpmPoint {
                time: 1.0,
                rpm: 10.0,
            },
        ]);
        assert!(err.is_err());
        assert!(RpmSchedule::piecewise(Vec::new()).is_err());
    }
}
