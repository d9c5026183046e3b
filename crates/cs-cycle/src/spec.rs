//! Immutable piston-engine configuration.

use crate::common::{check_fraction, check_positive};
use crate::error::{CycleError, CycleResult};
use cs_core::units::{Area, Length, Mass, SpecificEnergy, Volume, cc, j_per_kg, kg, mm};
use std::f64::consts::PI;

/// Cylinder bore/stroke/rod geometry.
#[derive(Clone, Debug)]
pub struct CylinderGeometry {
    pub bore: Length,
    pub stroke: Length,
    /// Connecting rod length, centre to centre
    pub rod_length: Length,
    pub compression_ratio: f64,
    /// Swept volume of one cylinder
    pub displacement: Volume,
}

/// Fuel charge parameters.
#[derive(Clone, Debug)]
pub struct FuelCharge {
    pub air_fuel_ratio: f64,
    /// Lower heating value of the fuel
    pub heating_value: SpecificEnergy,
    pub combustion_efficiency: f64,
}

/// Crank/rod proportions of the rendered piston, in scene units.
///
/// Only drives the visual piston height; never enters the thermodynamics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualLinkage {
    pub crank_radius: f64,
    pub rod_length: f64,
}

impl Default for VisualLinkage {
    fn default() -> Self {
        Self {
            crank_radius: 1.0,
            rod_length: 3.0,
        }
    }
}

/// Session-constant specification of one cylinder of a piston engine.
///
/// Defaults describe one cylinder of a modern 2.0 L inline-four.
#[derive(Clone, Debug)]
pub struct EngineSpec {
    pub geometry: CylinderGeometry,
    pub fuel: FuelCharge,
    /// Piston plus the reciprocating share of the rod
    pub reciprocating_mass: Mass,
    pub visual: VisualLinkage,
}

impl Default for EngineSpec {
    fn default() -> Self {
        Self {
            geometry: CylinderGeometry {
                bore: mm(86.0),
                stroke: mm(86.0),
                rod_length: mm(145.0),
                compression_ratio: 10.5,
                displacement: cc(499.5),
            },
            fuel: FuelCharge {
                air_fuel_ratio: 14.7,
                heating_value: j_per_kg(44e6),
                combustion_efficiency: 0.90,
            },
            reciprocating_mass: kg(0.4),
            visual: VisualLinkage::default(),
        }
    }
}

impl EngineSpec {
    /// Create a validated engine specification.
    ///
    /// # Errors
    /// Returns error if any parameter is non-physical or the rod cannot
    /// reach around the crank throw.
    pub fn new(
        geometry: CylinderGeometry,
        fuel: FuelCharge,
        reciprocating_mass: Mass,
        visual: VisualLinkage,
    ) -> CycleResult<Self> {
        check_positive(geometry.bore.value, "bore must be positive")?;
        check_positive(geometry.stroke.value, "stroke must be positive")?;
        check_positive(geometry.rod_length.value, "rod length must be positive")?;
        check_positive(geometry.displacement.value, "displacement must be positive")?;
        if !(geometry.compression_ratio > 1.0) {
            return Err(CycleError::InvalidArg {
                what: "compression ratio must exceed 1",
            });
        }
        if geometry.rod_length.value <= 0.5 * geometry.stroke.value {
            return Err(CycleError::NonPhysical {
                what: "rod length must exceed crank radius",
            });
        }
        check_positive(fuel.air_fuel_ratio, "air-fuel ratio must be positive")?;
        check_positive(fuel.heating_value.value, "fuel heating value must be positive")?;
        check_fraction(
            fuel.combustion_efficiency,
            "combustion efficiency must be in (0,1]",
        )?;
        if !(reciprocating_mass.value >= 0.0) {
            return Err(CycleError::InvalidArg {
                what: "reciprocating mass cannot be negative",
            });
        }
        check_positive(visual.crank_radius, "visual crank radius must be positive")?;
        if visual.rod_length <= visual.crank_radius {
            return Err(CycleError::NonPhysical {
                what: "visual rod must exceed visual crank radius",
            });
        }

        Ok(Self {
            geometry,
            fuel,
            reciprocating_mass,
            visual,
        })
    }

    /// Crank throw `r = stroke / 2` (m).
    pub fn crank_radius(&self) -> f64 {
        0.5 * self.geometry.stroke.value
    }

    /// Slider-crank ratio `λ = r / l`.
    pub fn rod_ratio(&self) -> f64 {
        self.crank_radius() / self.geometry.rod_length.value
    }

    /// Piston crown area (m²).
    pub fn piston_area(&self) -> f64 {
        let radius = 0.5 * self.geometry.bore.value;
        PI * radius * radius
    }

    /// Piston crown area as a typed quantity.
    pub fn piston_area_quantity(&self) -> Area {
        Area::new::<uom::si::area::square_meter>(self.piston_area())
    }

    /// Swept volume (m³).
    pub fn displacement(&self) -> f64 {
        self.geometry.displacement.value
    }

    /// Clearance volume `V_disp / (CR - 1)` (m³).
    pub fn clearance_volume(&self) -> f64 {
        self.displacement() / (self.geometry.compression_ratio - 1.0)
    }

    /// Volume at bottom dead centre, the start of compression (m³).
    pub fn total_volume(&self) -> f64 {
        self.clearance_volume() + self.displacement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_parts() -> (CylinderGeometry, FuelCharge) {
        let spec = EngineSpec::default();
        (spec.geometry, spec.fuel)
    }

    #[test]
    fn default_spec_is_valid() {
        let (geometry, fuel) = default_parts();
        let spec = EngineSpec::new(geometry, fuel, kg(0.4), VisualLinkage::default());
        assert!(spec.is_ok());
    }

    #[test]
    fn derived_geometry() {
        let spec = EngineSpec::default();
        assert!((spec.crank_radius() - 0.043).abs() < 1e-12);
        assert!((spec.rod_ratio() - 0.043 / 0.145).abs() < 1e-12);
        // 499.5 / 9.5 ≈ 52.58 cc
        assert!((spec.clearance_volume() * 1e6 - 52.578_947).abs() < 1e-5);
        assert!((spec.total_volume() * 1e6 - 552.078_947).abs() < 1e-5);
        assert!((spec.piston_area_quantity().value - spec.piston_area()).abs() < 1e-15);
    }

    #[test]
    fn rejects_compression_ratio_of_one() {
        let (mut geometry, fuel) = default_parts();
        geometry.compression_ratio = 1.0;
        let err = EngineSpec::new(geometry, fuel, kg(0.4), VisualLinkage::default());
        assert!(err.is_err());
    }

    #[test]
    fn rejects_short_rod() {
        let (mut geometry, fuel) = default_parts();
        geometry.rod_length = mm(40.0);
        let err = EngineSpec::new(geometry, fuel, kg(0.4), VisualLinkage::default());
        assert!(matches!(err, Err(CycleError::NonPhysical { .. })));
    }

    #[test]
    fn rejects_efficiency_above_one() {
        let (geometry, mut fuel) = default_parts();
        fuel.combustion_efficiency = 1.2;
        assert!(EngineSpec::new(geometry, fuel, kg(0.4), VisualLinkage::default()).is_err());
    }

    #[test]
    fn rejects_inverted_visual_linkage() {
        let (geometry, fuel) = default_parts();
        let visual = VisualLinkage {
            crank_radius: 2.0,
            rod_length: 1.0,
        };
        assert!(EngineSpec::new(geometry, fuel, kg(0.4), visual).is_err());
    }
}
