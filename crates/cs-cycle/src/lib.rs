//! cs-cycle: stateless engine and motor physics.
//!
//! Provides:
//! - Stroke phase classification over a cycle window
//! - Slider-crank kinematics and cylinder volume
//! - Single-zone Otto cycle with Wiebe heat release and crank torque
//! - Wankel rotary face model
//! - PMSM field-oriented control with a lumped stator thermal model
//!
//! Every model is a pure function of angle, speed and immutable
//! configuration. The only carried quantity, the motor stator temperature,
//! is passed in and returned explicitly.
//!
//! # Example
//!
//! ```
//! use cs_cycle::{CycleModel, EngineSpec, OttoModel, StrokePhase};
//!
//! let model = OttoModel::new(EngineSpec::default());
//! let state = model.evaluate(std::f64::consts::PI, 3000.0);
//! assert_eq!(state.phase, StrokePhase::Compression);
//! ```

pub mod combustion;
pub mod common;
pub mod error;
pub mod foc;
pub mod gas;
pub mod kinematics;
pub mod motor;
pub mod otto;
pub mod phase;
pub mod spec;
pub mod torque;
pub mod traits;
pub mod volumetric;
pub mod wankel;

// Re-exports
pub use combustion::Wiebe;
pub use error::{CycleError, CycleResult};
pub use foc::{AlphaBeta, DirectQuadrature, PhaseCurrents};
pub use gas::GasProperties;
pub use kinematics::SliderCrank;
pub use motor::{MotorModel, MotorSpec, MotorState, StatorThermal};
pub use otto::{OttoModel, OttoState};
pub use phase::{PhasePosition, StrokePhase, classify, locate};
pub use spec::{CylinderGeometry, EngineSpec, FuelCharge, VisualLinkage};
pub use traits::CycleModel;
pub use volumetric::{OttoMetrics, volumetric_efficiency};
pub use wankel::{WankelModel, WankelSpec, WankelState};
