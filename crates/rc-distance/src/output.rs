//! Raw metres and seconds into the three matrix channels.

use rc_core::OutputType;

use crate::config::OutputConfig;

/// One processed matrix cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellValues {
    pub cost:     f64,
    pub distance: f64,
    pub time:     f64,
}

impl CellValues {
    /// All three channels `+inf`, for unreachable pairs.
    pub const UNREACHABLE: CellValues = CellValues {
        cost:     f64::INFINITY,
        distance: f64::INFINITY,
        time:     f64::INFINITY,
    };
}

impl OutputConfig {
    /// Convert raw `distance_m` and `time_s` into the configured units, then
    /// derive the cost from the converted values.
    ///
    /// ```
    /// use rc_core::{DistanceUnit, OutputType, TimeUnit};
    /// use rc_distance::OutputConfig;
    ///
    /// let out = OutputConfig {
    ///     output_type:     OutputType::Summed,
    ///     distance_unit:   DistanceUnit::Kilometres,
    ///     time_unit:       TimeUnit::Hours,
    ///     time_weight:     2.0,
    ///     distance_weight: 1.0,
    /// };
    /// let v = out.process(1_000.0, 3_600.0);
    /// assert_eq!((v.distance, v.time, v.cost), (1.0, 1.0, 3.0));
    /// ```
    pub fn process(&self, distance_m: f64, time_s: f64) -> CellValues {
        let distance = self.distance_unit.from_metres(distance_m);
        let time = self.time_unit.from_seconds(time_s);
        let cost = match self.output_type {
            OutputType::Distance => distance,
            OutputType::Time     => time,
            OutputType::Summed   => self.time_weight * time + self.distance_weight * distance,
        };
        CellValues { cost, distance, time }
    }
}
