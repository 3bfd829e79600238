//! Sensor readings
//!
//! A SensorReading is one snapshot of the evaporation line. Field order is
//! the order the generator was trained on and must never change.

use serde::{Deserialize, Serialize};

/// Number of measurements in a reading
pub const SENSOR_WIDTH: usize = 23;

/// Divisor applied to readings before inference, and multiplier applied to
/// model output afterwards
pub const DEFAULT_SCALE: f64 = 100.0;

/// Measurement names in training order
pub const SENSOR_FIELDS: [&str; SENSOR_WIDTH] = [
    "part",
    "extract_tank_level",
    "ffte_discharge_density",
    "ffte_discharge_solids",
    "ffte_feed_flow_rate_pv",
    "ffte_feed_solids_pv",
    "ffte_heat_temperature_1",
    "ffte_heat_temperature_2",
    "ffte_heat_temperature_3",
    "ffte_production_solids_pv",
    "ffte_steam_pressure_pv",
    "tfe_input_flow_pv",
    "tfe_level",
    "tfe_motor_current",
    "tfe_motor_speed",
    "tfe_out_flow_pv",
    "tfe_production_solids_pv",
    "tfe_production_solids_density",
    "tfe_steam_pressure_pv",
    "tfe_steam_temperature",
    "tfe_tank_level",
    "tfe_temperature",
    "tfe_vacuum_pressure_pv",
];

/// One inbound reading. Every field is required and unknown fields are
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorReading {
    pub part: f64,
    pub extract_tank_level: f64,
    pub ffte_discharge_density: f64,
    pub ffte_discharge_solids: f64,
    pub ffte_feed_flow_rate_pv: f64,
    pub ffte_feed_solids_pv: f64,
    pub ffte_heat_temperature_1: f64,
    pub ffte_heat_temperature_2: f64,
    pub ffte_heat_temperature_3: f64,
    pub ffte_production_solids_pv: f64,
    pub ffte_steam_pressure_pv: f64,
    pub tfe_input_flow_pv: f64,
    pub tfe_level: f64,
    pub tfe_motor_current: f64,
    pub tfe_motor_speed: f64,
    pub tfe_out_flow_pv: f64,
    pub tfe_production_solids_pv: f64,
    pub tfe_production_solids_density: f64,
    pub tfe_steam_pressure_pv: f64,
    pub tfe_steam_temperature: f64,
    pub tfe_tank_level: f64,
    pub tfe_temperature: f64,
    pub tfe_vacuum_pressure_pv: f64,
}

impl SensorReading {
    /// Build a reading from values in `SENSOR_FIELDS` order
    pub fn from_values(values: [f64; SENSOR_WIDTH]) -> Self {
        let [
            part,
            extract_tank_level,
            ffte_discharge_density,
            ffte_discharge_solids,
            ffte_feed_flow_rate_pv,
            ffte_feed_solids_pv,
            ffte_heat_temperature_1,
            ffte_heat_temperature_2,
            ffte_heat_temperature_3,
            ffte_production_solids_pv,
            ffte_steam_pressure_pv,
            tfe_input_flow_pv,
            tfe_level,
            tfe_motor_current,
            tfe_motor_speed,
            tfe_out_flow_pv,
            tfe_production_solids_pv,
            tfe_production_solids_density,
            tfe_steam_pressure_pv,
            tfe_steam_temperature,
            tfe_tank_level,
            tfe_temperature,
            tfe_vacuum_pressure_pv,
        ] = values;

        Self {
            part,
            extract_tank_level,
            ffte_discharge_density,
            ffte_discharge_solids,
            ffte_feed_flow_rate_pv,
            ffte_feed_solids_pv,
            ffte_heat_temperature_1,
            ffte_heat_temperature_2,
            ffte_heat_temperature_3,
            ffte_production_solids_pv,
            ffte_steam_pressure_pv,
            tfe_input_flow_pv,
            tfe_level,
            tfe_motor_current,
            tfe_motor_speed,
            tfe_out_flow_pv,
            tfe_production_solids_pv,
            tfe_production_solids_density,
            tfe_steam_pressure_pv,
            tfe_steam_temperature,
            tfe_tank_level,
            tfe_temperature,
            tfe_vacuum_pressure_pv,
        }
    }

    /// Values in `SENSOR_FIELDS` order
    pub fn values(&self) -> [f64; SENSOR_WIDTH] {
        [
            self.part,
            self.extract_tank_level,
            self.ffte_discharge_density,
            self.ffte_discharge_solids,
            self.ffte_feed_flow_rate_pv,
            self.ffte_feed_solids_pv,
            self.ffte_heat_temperature_1,
            self.ffte_heat_temperature_2,
            self.ffte_heat_temperature_3,
            self.ffte_production_solids_pv,
            self.ffte_steam_pressure_pv,
            self.tfe_input_flow_pv,
            self.tfe_level,
            self.tfe_motor_current,
            self.tfe_motor_speed,
            self.tfe_out_flow_pv,
            self.tfe_production_solids_pv,
            self.tfe_production_solids_density,
            self.tfe_steam_pressure_pv,
            self.tfe_steam_temperature,
            self.tfe_tank_level,
            self.tfe_temperature,
            self.tfe_vacuum_pressure_pv,
        ]
    }

    /// Feature vector for the generator: every value divided by `scale`
    pub fn normalized(&self, scale: f64) -> Vec<f32> {
        self.values()
            .iter()
            .map(|value| (value / scale) as f32)
            .collect()
    }

    /// Named values in training order
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        SENSOR_FIELDS.into_iter().zip(self.values())
    }
}
