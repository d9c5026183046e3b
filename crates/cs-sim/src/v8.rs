//! Crossplane V8 derived from one master crank angle.
//!
//! Each cylinder is the single-cylinder Otto model evaluated at
//! `master − delay`, where the delay is the cylinder's slot in the firing
//! order. There is exactly one angle accumulator.

use crate::stepper::Stepper;
use cs_core::angle::{AngleIntegrator, CycleWindow, FrameInput};
use cs_core::numeric::Real;
use cs_cycle::{CycleModel, OttoModel, OttoState};
use serde::Serialize;
use std::fmt;

/// Half-width of the firing indicator window (degrees).
pub const FIRING_WINDOW_DEG: Real = 30.0;

/// Degrees in one four-stroke cycle.
const CYCLE_DEG: Real = 720.0;

/// Cylinder bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Bank {
    Left,
    Right,
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bank::Left => f.write_str("L"),
            Bank::Right => f.write_str("R"),
        }
    }
}

/// One entry of the firing-order table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderSlot {
    /// Cylinder number (1-8)
    pub id: u8,
    pub bank: Bank,
    /// Crank degrees after cylinder 1
    pub delay_deg: Real,
}

const fn slot(id: u8, bank: Bank, delay_deg: Real) -> CylinderSlot {
    CylinderSlot {
        id,
        bank,
        delay_deg,
    }
}

/// Crossplane firing order 1-8-4-3-6-5-7-2, 90° apart.
pub const FIRING_ORDER: [CylinderSlot; 8] = [
    slot(1, Bank::Left, 0.0),
    slot(8, Bank::Right, 90.0),
    slot(4, Bank::Right, 180.0),
    slot(3, Bank::Left, 270.0),
    slot(6, Bank::Right, 360.0),
    slot(5, Bank::Left, 450.0),
    slot(7, Bank::Left, 540.0),
    slot(2, Bank::Right, 630.0),
];

/// Crank angle of the compression TDC of a cylinder (degrees, `[0, 720)`).
pub fn fire_point_deg(slot: &CylinderSlot) -> Real {
    (360.0 + slot.delay_deg) % CYCLE_DEG
}

/// Cylinder whose fire point lies within the firing window of `master_deg`.
///
/// Fire points are 90° apart, so at most one cylinder matches.
pub fn firing_cylinder(master_deg: Real) -> Option<u8> {
    let master = master_deg.rem_euclid(CYCLE_DEG);
    FIRING_ORDER.iter().find_map(|slot| {
        let d = (master - fire_point_deg(slot)).abs();
        let circular = d.min(CYCLE_DEG - d);
        (circular < FIRING_WINDOW_DEG).then_some(slot.id)
    })
}

/// One cylinder of a V8 frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CylinderSnapshot {
    pub id: u8,
    pub bank: Bank,
    pub delay_deg: Real,
    /// Local cycle angle `master − delay`, normalized (rad)
    pub angle: Real,
    #[serde(flatten)]
    pub state: OttoState,
}

/// Whole-engine V8 frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct V8Snapshot {
    /// Master crank angle in `[0, 4π)`
    pub angle: Real,
    /// Cylinders in firing order, cylinder 1 first
    pub cylinders: [CylinderSnapshot; 8],
    pub firing: Option<u8>,
    /// Sum of the eight cylinder torques (N·m)
    pub net_torque_nm: Real,
}

impl V8Snapshot {
    pub fn cylinder(&self, id: u8) -> Option<&CylinderSnapshot> {
        self.cylinders.iter().find(|c| c.id == id)
    }

    /// Cylinder 1, whose phase and temperature head the snapshot.
    pub fn lead(&self) -> &CylinderSnapshot {
        &self.cylinders[0]
    }
}

/// Derive one V8 frame from a master cycle angle.
pub fn derive_cylinders(model: &OttoModel, master: Real, rpm: Real) -> V8Snapshot {
    let window = CycleWindow::FourStroke;
    let cylinders = FIRING_ORDER.map(|slot| {
        let angle = window.normalize(master - slot.delay_deg.to_radians());
        CylinderSnapshot {
            id: slot.id,
            bank: slot.bank,
            delay_deg: slot.delay_deg,
            angle,
            state: model.evaluate(angle, rpm),
        }
    });
    let net_torque_nm = cylinders.iter().map(|c| c.state.torque_nm).sum();

    V8Snapshot {
        angle: master,
        firing: firing_cylinder(master.to_degrees()),
        cylinders,
        net_torque_nm,
    }
}

/// V8 stepper: one master accumulator, eight derived cylinders.
#[derive(Clone, Debug)]
pub struct V8Stepper {
    model: OttoModel,
    angle: AngleIntegrator,
}

impl V8Stepper {
    pub fn new(model: OttoModel) -> Self {
        Self {
            model,
            angle: AngleIntegrator::new(),
        }
    }

    pub fn model(&self) -> &OttoModel {
        &self.model
    }
}

impl Stepper for V8Stepper {
    type Snapshot = V8Snapshot;

    fn advance(&mut self, input: &FrameInput) -> V8Snapshot {
        let raw = self.angle.advance(input);
        let master = CycleWindow::FourStroke.normalize(raw);
        derive_cylinders(&self.model, master, input.rpm)
    }

    fn reset(&mut self) {
        self.angle.reset();
    }

    fn raw_angle(&self) -> Real {
        self.angle.raw()
    }
}
