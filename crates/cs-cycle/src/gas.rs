//! Working-gas properties and polytropic relations.

use cs_core::units::{
    Density, Pressure, SpecificHeat, Temperature, constants::P_ATM_PA, j_per_kg_k, k,
    kg_per_m3, pa,
};

/// Lumped air properties shared by every combustion model.
#[derive(Clone, Debug)]
pub struct GasProperties {
    /// Polytropic index, slightly below 1.4 to absorb real-gas and wall losses.
    pub gamma: f64,
    /// Specific gas constant
    pub gas_constant: SpecificHeat,
    /// Heat capacity at constant volume
    pub cv: SpecificHeat,
    /// Ambient density used for trapped-mass estimates
    pub density_stp: Density,
    pub p_atm: Pressure,
    pub t_ambient: Temperature,
}

impl Default for GasProperties {
    fn default() -> Self {
        Self {
            gamma: 1.35,
            gas_constant: j_per_kg_k(287.0),
            cv: j_per_kg_k(718.0),
            density_stp: kg_per_m3(1.225),
            p_atm: pa(P_ATM_PA),
            t_ambient: k(300.0),
        }
    }
}

impl GasProperties {
    /// Pressure after polytropic compression by `volume_ratio = V_start / V`.
    pub fn polytropic_pressure(&self, p_start: f64, volume_ratio: f64) -> f64 {
        p_start * volume_ratio.powf(self.gamma)
    }

    /// Temperature after polytropic compression by `volume_ratio = V_start / V`.
    pub fn polytropic_temperature(&self, t_start: f64, volume_ratio: f64) -> f64 {
        t_start * volume_ratio.powf(self.gamma - 1.0)
    }

    /// Ideal-gas pressure `P = m·R·T / V` (SI).
    pub fn ideal_gas_pressure(&self, mass_kg: f64, temperature_k: f64, volume_m3: f64) -> f64 {
        mass_kg * self.gas_constant.value * temperature_k / volume_m3
    }
}
