//! Clarke and Park reference-frame transforms.
//!
//! Amplitude-invariant convention: a balanced three-phase set of peak `I`
//! maps to a stationary vector of magnitude `I`.

use cs_core::numeric::Real;
use nalgebra::{Matrix2x3, Matrix3x2, Rotation2, Vector2, Vector3};

const SQRT3_2: Real = 0.866_025_403_784_438_6;

/// Stationary-frame current vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AlphaBeta {
    pub alpha: Real,
    pub beta: Real,
}

/// Rotor-frame current vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DirectQuadrature {
    pub d: Real,
    pub q: Real,
}

/// Three phase quantities.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseCurrents {
    pub u: Real,
    pub v: Real,
    pub w: Real,
}

impl PhaseCurrents {
    pub fn as_array(&self) -> [Real; 3] {
        [self.u, self.v, self.w]
    }
}

fn inverse_clarke_matrix() -> Matrix3x2<Real> {
    Matrix3x2::new(1.0, 0.0, -0.5, SQRT3_2, -0.5, -SQRT3_2)
}

fn clarke_matrix() -> Matrix2x3<Real> {
    let two_thirds = 2.0 / 3.0;
    Matrix2x3::new(1.0, -0.5, -0.5, 0.0, SQRT3_2, -SQRT3_2) * two_thirds
}

/// `(d, q)` rotated by the electrical angle into `(α, β)`.
pub fn inverse_park(dq: DirectQuadrature, theta_e: Real) -> AlphaBeta {
    let v = Rotation2::new(theta_e) * Vector2::new(dq.d, dq.q);
    AlphaBeta {
        alpha: v.x,
        beta: v.y,
    }
}

/// `(α, β)` rotated back into the rotor frame.
pub fn park(ab: AlphaBeta, theta_e: Real) -> DirectQuadrature {
    let v = Rotation2::new(-theta_e) * Vector2::new(ab.alpha, ab.beta);
    DirectQuadrature { d: v.x, q: v.y }
}

/// `(α, β)` onto the three phase axes.
pub fn inverse_clarke(ab: AlphaBeta) -> PhaseCurrents {
    let v: Vector3<Real> = inverse_clarke_matrix() * Vector2::new(ab.alpha, ab.beta);
    PhaseCurrents {
        u: v.x,
        v: v.y,
        w: v.z,
    }
}

/// Three phase quantities onto the stationary frame.
pub fn clarke(phases: PhaseCurrents) -> AlphaBeta {
    let v = clarke_matrix() * Vector3::new(phases.u, phases.v, phases.w);
    AlphaBeta {
        alpha: v.x,
        beta: v.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn inverse_park_matches_closed_form() {
        let dq = DirectQuadrature { d: -20.0, q: 150.0 };
        let theta: Real = 0.7;
        let ab = inverse_park(dq, theta);
        let alpha = dq.d * theta.cos() - dq.q * theta.sin();
        let beta = dq.d * theta.sin() + dq.q * theta.cos();
        assert!((ab.alpha - alpha).abs() < 1e-9);
        assert!((ab.beta - beta).abs() < 1e-9);
    }

    #[test]
    fn inverse_clarke_is_balanced() {
        let phases = inverse_clarke(AlphaBeta {
            alpha: 3.0,
            beta: -4.0,
        });
        assert!((phases.u + phases.v + phases.w).abs() < 1e-12);
        assert_eq!(phases.u, 3.0);
        assert!((phases.v - (-1.5 - 4.0 * SQRT3_2)).abs() < 1e-12);
    }

    #[test]
    fn park_undoes_inverse_park() {
        let dq = DirectQuadrature { d: 12.0, q: -7.5 };
        let back = park(inverse_park(dq, 2.4), 2.4);
        assert!((back.d - dq.d).abs() < 1e-9);
        assert!((back.q - dq.q).abs() < 1e-9);
    }

    #[test]
    fn clarke_undoes_inverse_clarke() {
        let ab = AlphaBeta {
            alpha: -1.25,
            beta: 8.0,
        };
        let back = clarke(inverse_clarke(ab));
        assert!((back.alpha - ab.alpha).abs() < 1e-12);
        assert!((back.beta - ab.beta).abs() < 1e-12);
    }

    #[test]
    fn q_axis_current_leads_by_quarter_turn() {
        let ab = inverse_park(DirectQuadrature { d: 0.0, q: 1.0 }, 0.0);
        assert!(ab.alpha.abs() < 1e-12);
        assert!((ab.beta - 1.0).abs() < 1e-12);
        let ab = inverse_park(DirectQuadrature { d: 0.0, q: 1.0 }, PI / 2.0);
        assert!((ab.alpha + 1.0).abs() < 1e-12);
    }
}
