//! Integration tests for steppers, switching and the headless runner.

use cs_core::angle::FrameInput;
use cs_cycle::StrokePhase;
use cs_sim::{
    EngineConfig, EngineKind, FIRING_ORDER, RpmPoint, RpmSchedule, RunOptions, SimError,
    Simulator, Snapshot, run_frames,
};
use std::f64::consts::PI;

fn sim(kind: EngineKind) -> Simulator {
    Simulator::new(kind, EngineConfig::default())
}

#[test]
fn zero_rpm_for_one_second_holds_angle() {
    let mut s = sim(EngineKind::Piston);
    let snap = s.advance(&FrameInput::running(0.0, 1.0));
    assert_eq!(snap.angle(), 0.0);
}

#[test]
fn one_frame_at_6000_rpm_is_one_revolution() {
    for kind in EngineKind::ALL {
        let mut s = sim(kind);
        s.advance(&FrameInput::running(6000.0, 0.01));
        assert!(
            (s.engine().raw_angle() - 2.0 * PI).abs() < 1e-9,
            "{kind}"
        );
    }
}

#[test]
fn paused_manual_angle_is_absolute_for_every_engine() {
    for kind in EngineKind::ALL {
        let mut s = sim(kind);
        for _ in 0..7 {
            s.advance(&FrameInput::running(2500.0, 0.033));
        }
        let snap = s.advance(&FrameInput::paused(2500.0, Some(1.5), 0.033));
        assert_eq!(snap.angle(), 1.5, "{kind}");
    }
}

#[test]
fn piston_at_pi_is_compression() {
    let mut s = sim(EngineKind::Piston);
    let snap = s.advance(&FrameInput::paused(0.0, Some(PI), 0.016));
    assert_eq!(snap.phase(), Some(StrokePhase::Compression));
}

#[test]
fn firing_indicator_tracks_each_fire_point() {
    let mut s = sim(EngineKind::V8);
    for slot in FIRING_ORDER {
        let fire_deg = (360.0 + slot.delay_deg) % 720.0;
        let snap = s.advance(&FrameInput::paused(0.0, Some((fire_deg + 10.0).to_radians()), 0.016));
        let Snapshot::V8(v8) = snap else {
            panic!("expected a V8 snapshot");
        };
        assert_eq!(v8.firing, Some(slot.id));
        // The firing cylinder is in its power stroke
        let cyl = v8.cylinder(slot.id).unwrap();
        assert_eq!(cyl.state.phase, StrokePhase::Power);
    }
}

#[test]
fn run_rejects_invalid_options() {
    let mut s = sim(EngineKind::Rotary);
    let cases = [
        RunOptions {
            dt: 0.0,
            ..RunOptions::default()
        },
        RunOptions {
            t_end: -1.0,
            ..RunOptions::default()
        },
        RunOptions {
            max_frames: 0,
            ..RunOptions::default()
        },
        RunOptions {
            record_every: 0,
            ..RunOptions::default()
        },
    ];
    for opts in cases {
        let err = run_frames(&mut s, &opts);
        assert!(matches!(err, Err(SimError::InvalidArg { .. })));
    }
}

#[test]
fn run_decimates_and_records_final_frame() {
    let mut s = sim(EngineKind::Piston);
    let opts = RunOptions {
        dt: 0.25,
        t_end: 1.0,
        record_every: 3,
        ..RunOptions::default()
    };
    let record = run_frames(&mut s, &opts).unwrap();
    assert_eq!(record.t, vec![0.0, 0.75, 1.0]);
    assert_eq!(record.len(), 3);
    let (t_last, _) = record.last().unwrap();
    assert_eq!(t_last, 1.0);
}

#[test]
fn run_stops_at_frame_limit() {
    let mut s = sim(EngineKind::Electric);
    let opts = RunOptions {
        dt: 0.25,
        t_end: 10.0,
        max_frames: 2,
        ..RunOptions::default()
    };
    let record = run_frames(&mut s, &opts).unwrap();
    assert_eq!(record.t, vec![0.0, 0.25, 0.5]);
}

#[test]
fn run_at_standstill_never_moves() {
    let mut s = sim(EngineKind::V8);
    let opts = RunOptions {
        dt: 0.5,
        t_end: 2.0,
        rpm: RpmSchedule::Constant(0.0),
        ..RunOptions::default()
    };
    let record = run_frames(&mut s, &opts).unwrap();
    assert!(record.frames.iter().all(|f| f.angle() == 0.0));
}

#[test]
fn paused_run_holds_manual_angle() {
    let mut s = sim(EngineKind::Rotary);
    let opts = RunOptions {
        dt: 0.1,
        t_end: 0.5,
        paused: true,
        manual_angle: Some(1.5),
        ..RunOptions::default()
    };
    let record = run_frames(&mut s, &opts).unwrap();
    assert!(!record.is_empty());
    assert!(record.frames.iter().all(|f| f.angle() == 1.5));
}

#[test]
fn motor_heats_over_a_run() {
    let mut s = sim(EngineKind::Electric);
    let opts = RunOptions {
        dt: 0.5,
        t_end: 60.0,
        rpm: RpmSchedule::Constant(1500.0),
        ..RunOptions::default()
    };
    let record = run_frames(&mut s, &opts).unwrap();
    let first = record.frames.first().unwrap().temperature_k();
    let (_, last) = record.last().unwrap();
    assert!(last.temperature_k() > first + 1.0);
}

#[test]
fn overspeed_is_capped_before_the_intake_model() {
    let mut s = sim(EngineKind::Piston);
    let opts = RunOptions {
        dt: 0.01,
        t_end: 0.05,
        rpm: RpmSchedule::Constant(60_000.0),
        paused: true,
        manual_angle: Some(0.5),
        ..RunOptions::default()
    };
    let record = run_frames(&mut s, &opts).unwrap();
    for frame in &record.frames {
        let Snapshot::Piston(p) = frame else {
            panic!("expected a piston snapshot");
        };
        assert_eq!(p.state.phase, StrokePhase::Intake);
        assert!(p.state.pressure_bar > 0.9, "{}", p.state.pressure_bar);
    }

    let direct = s.advance(&FrameInput::paused(60_000.0, Some(0.5), 0.01));
    assert_eq!(&direct, record.frames.last().unwrap());
}

#[test]
fn long_frames_keep_the_stator_above_ambient() {
    let mut s = sim(EngineKind::Electric);
    let opts = RunOptions {
        dt: 200.0,
        t_end: 2000.0,
        rpm: RpmSchedule::Constant(10_000.0),
        ..RunOptions::default()
    };
    let record = run_frames(&mut s, &opts).unwrap();
    let temps: Vec<f64> = record
        .frames
        .iter()
        .map(|f| f.temperature_k() - 273.15)
        .collect();
    assert_eq!(temps.len(), 11);
    for pair in temps.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-9, "{temps:?}");
    }
    let hottest = temps.iter().copied().fold(f64::MIN, f64::max);
    assert!(temps[0] >= 25.0 - 1e-9 && hottest < 40.0, "{temps:?}");
}

#[test]
fn ramped_schedule_speeds_up_the_crank() {
    let mut s = sim(EngineKind::Piston);
    let rpm = RpmSchedule::piecewise(vec![
        RpmPoint {
            time: 0.0,
            rpm: 0.0,
        },
        RpmPoint {
            time: 1.0,
            rpm: 600.0,
        },
    ])
    .unwrap();
    let opts = RunOptions {
        dt: 0.125,
        t_end: 1.0,
        rpm,
        ..RunOptions::default()
    };
    run_frames(&mut s, &opts).unwrap();
    // Left Riemann sum of 600·t rpm over 8 frames: 262.5 rpm·s
    let expected = 262.5 * 2.0 * PI / 60.0;
    assert!((s.engine().raw_angle() - expected).abs() < 1e-9);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn kind() -> impl Strategy<Value = EngineKind> {
        prop_oneof![
            Just(EngineKind::Piston),
            Just(EngineKind::Rotary),
            Just(EngineKind::Electric),
            Just(EngineKind::V8),
        ]
    }

    proptest! {
        #[test]
        fn every_engine_is_total(
            kind in kind(),
            rpms in proptest::collection::vec(0.0_f64..=10_000.0, 1..20),
            dt in 0.0_f64..0.1,
        ) {
            let mut s = sim(kind);
            for rpm in rpms {
                let snap = s.advance(&FrameInput::running(rpm, dt));
                prop_assert_eq!(snap.non_finite_field(), None);
            }
        }
    }
}
