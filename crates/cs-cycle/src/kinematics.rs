//! Slider-crank kinematics.
//!
//! The physical linkage (metres) feeds the cylinder volume. A second linkage
//! in scene units produces the rendered piston height; both share the same
//! formula but never share constants.

use crate::common::sqrt_clamped;
use crate::spec::{EngineSpec, VisualLinkage};
use cs_core::numeric::Real;

/// Crank throw and rod length of a slider-crank mechanism.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderCrank {
    pub crank_radius: Real,
    pub rod_length: Real,
}

impl SliderCrank {
    pub fn new(crank_radius: Real, rod_length: Real) -> Self {
        Self {
            crank_radius,
            rod_length,
        }
    }

    /// Physical linkage of an engine spec (metres).
    pub fn physical(spec: &EngineSpec) -> Self {
        Self::new(spec.crank_radius(), spec.geometry.rod_length.value)
    }

    /// Rendered linkage (scene units).
    pub fn visual(linkage: &VisualLinkage) -> Self {
        Self::new(linkage.crank_radius, linkage.rod_length)
    }

    /// `λ = r / l`
    pub fn ratio(&self) -> Real {
        self.crank_radius / self.rod_length
    }

    /// Piston travel from top dead centre:
    /// `s = r(1 − cosθ) + l(1 − sqrt(1 − λ²sin²θ))`.
    pub fn displacement(&self, theta: Real) -> Real {
        let r = self.crank_radius;
        let l = self.rod_length;
        let lambda = self.ratio();
        let sin_t = theta.sin();
        r * (1.0 - theta.cos()) + l * (1.0 - sqrt_clamped(1.0 - lambda * lambda * sin_t * sin_t))
    }

    /// Wrist-pin height above the crank centre:
    /// `y = r·cosθ + sqrt(l² − r²sin²θ)`.
    pub fn pin_height(&self, theta: Real) -> Real {
        let r = self.crank_radius;
        let l = self.rod_length;
        let sin_t = theta.sin();
        r * theta.cos() + sqrt_clamped(l * l - r * r * sin_t * sin_t)
    }

    /// Connecting-rod obliquity `(sinβ, cosβ)` with `sinβ = λ·sinθ`.
    pub fn obliquity(&self, theta: Real) -> (Real, Real) {
        let sin_beta = self.ratio() * theta.sin();
        (sin_beta, sqrt_clamped(1.0 - sin_beta * sin_beta))
    }
}

/// Instantaneous cylinder volume `V_clearance + A_piston·s(θ)` (m³).
pub fn cylinder_volume(spec: &EngineSpec, theta: Real) -> Real {
    let s = SliderCrank::physical(spec).displacement(theta);
    spec.clearance_volume() + spec.piston_area() * s
}

/// Rendered piston height for the given crank angle.
pub fn visual_piston_y(spec: &EngineSpec, theta: Real) -> Real {
    SliderCrank::visual(&spec.visual).pin_height(theta)
}

/// Mean piston speed `2·stroke·rpm / 60` (m/s).
pub fn mean_piston_speed(spec: &EngineSpec, rpm: Real) -> Real {
    2.0 * spec.geometry.stroke.value * rpm / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn tdc_and_bdc() {
        let crank = SliderCrank::new(0.043, 0.145);
        assert!(crank.displacement(0.0).abs() < 1e-15);
        assert!((crank.displacement(PI) - 0.086).abs() < 1e-12);
        assert!((crank.displacement(2.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn volume_spans_clearance_to_total() {
        let spec = EngineSpec::default();
        let v_tdc = cylinder_volume(&spec, 0.0);
        let v_bdc = cylinder_volume(&spec, PI);
        assert!((v_tdc - spec.clearance_volume()).abs() < 1e-15);
        // Bore-stroke swept volume (499.56 cc) sits next to the nominal 499.5 cc
        assert!((v_bdc - spec.clearance_volume() - 499.56e-6).abs() < 1e-7);
    }

    #[test]
    fn visual_piston_extremes() {
        let spec = EngineSpec::default();
        // r = 1, l = 3: top at 4, bottom at 2
        assert!((visual_piston_y(&spec, 0.0) - 4.0).abs() < 1e-12);
        assert!((visual_piston_y(&spec, PI) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn radicand_clamped_at_mechanical_limit() {
        // Degenerate linkage where r == l puts the radicand at exactly 0 at 90°
        let crank = SliderCrank::new(1.0, 1.0);
        let y = crank.pin_height(PI / 2.0);
        assert!(y.is_finite());
        assert!(crank.displacement(PI / 2.0).is_finite());
    }

    #[test]
    fn mean_piston_speed_scales_with_rpm() {
        let spec = EngineSpec::default();
        assert_eq!(mean_piston_speed(&spec, 0.0), 0.0);
        assert!((mean_piston_speed(&spec, 6000.0) - 17.2).abs() < 1e-9);
    }

    #[test]
    fn obliquity_is_a_unit_vector() {
        let crank = SliderCrank::new(0.043, 0.145);
        let (s, c) = crank.obliquity(1.0);
        assert!((s * s + c * c - 1.0).abs() < 1e-12);
    }
}
