// cs-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, AvailableEnergy as UomAvailableEnergy, ElectricCurrent as UomElectricCurrent,
    ElectricPotential as UomElectricPotential, ElectricalResistance as UomElectricalResistance,
    Inductance as UomInductance, Length as UomLength, MagneticFlux as UomMagneticFlux,
    Mass as UomMass, MassDensity as UomMassDensity, Pressure as UomPressure,
    SpecificHeatCapacity as UomSpecificHeatCapacity,
    TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature, Volume as UomVolume,
};

// Configuration quantities (SI, f64); the per-frame math reads `.value`
pub type Area = UomArea;
pub type Current = UomElectricCurrent;
pub type Density = UomMassDensity;
pub type Inductance = UomInductance;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type MagneticFlux = UomMagneticFlux;
pub type Pressure = UomPressure;
pub type Resistance = UomElectricalResistance;
pub type SpecificEnergy = UomAvailableEnergy;
pub type SpecificHeat = UomSpecificHeatCapacity;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;
pub type Voltage = UomElectricPotential;
pub type Volume = UomVolume;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

/// Temperature rise, as opposed to an absolute temperature.
#[inline]
pub fn dk(v: f64) -> TempInterval {
    use uom::si::temperature_interval::kelvin;
    TempInterval::new::<kelvin>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn cc(v: f64) -> Volume {
    use uom::si::volume::cubic_centimeter;
    Volume::new::<cubic_centimeter>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn j_per_kg(v: f64) -> SpecificEnergy {
    use uom::si::available_energy::joule_per_kilogram;
    SpecificEnergy::new::<joule_per_kilogram>(v)
}

#[inline]
pub fn j_per_kg_k(v: f64) -> SpecificHeat {
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
    SpecificHeat::new::<joule_per_kilogram_kelvin>(v)
}

#[inline]
pub fn ohm(v: f64) -> Resistance {
    use uom::si::electrical_resistance::ohm;
    Resistance::new::<ohm>(v)
}

#[inline]
pub fn henry(v: f64) -> Inductance {
    use uom::si::inductance::henry;
    Inductance::new::<henry>(v)
}

#[inline]
pub fn weber(v: f64) -> MagneticFlux {
    use uom::si::magnetic_flux::weber;
    MagneticFlux::new::<weber>(v)
}

#[inline]
pub fn amp(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn volt(v: f64) -> Voltage {
    use uom::si::electric_potential::volt;
    Voltage::new::<volt>(v)
}

pub mod constants {
    /// Standard atmospheric pressure (Pa)
    pub const P_ATM_PA: f64 = 101_325.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_si() {
        assert!((mm(86.0).value - 0.086).abs() < 1e-12);
        assert!((cc(499.5).value - 499.5e-6).abs() < 1e-15);
        assert!((pa(constants::P_ATM_PA).value - 101_325.0).abs() < 1e-9);
        assert!((degc(25.0).value - 298.15).abs() < 1e-9);
        assert!((k(300.0).value - 300.0).abs() < 1e-12);
        assert!((henry(150e-6).value - 1.5e-4).abs() < 1e-15);
        assert!((j_per_kg(44e6).value - 44e6).abs() < 1e-3);
    }

    #[test]
    fn interval_differs_from_absolute() {
        // 10 K rise vs 10 °C absolute
        assert!((dk(10.0).value - 10.0).abs() < 1e-12);
        assert!((degc(10.0).value - 283.15).abs() < 1e-9);
    }
}
