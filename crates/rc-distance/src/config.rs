//! Distance-method configuration.
//!
//! Configurations are plain values: `Clone` is a full deep copy and equality
//! and hashing cover every field.  Floating-point fields compare by bit
//! pattern (with `-0.0` folded into `0.0`) so `Eq` and `Hash` agree and a
//! configuration can sit inside a cache key.

use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use rc_core::{DistanceUnit, OutputType, TimeUnit};

use crate::{DistanceError, DistanceResult};

#[inline]
fn bits(v: f64) -> u64 {
    (v + 0.0).to_bits()
}

// ── Great circle ──────────────────────────────────────────────────────────────

/// Straight-line distance at a constant speed.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreatCircleConfig {
    /// Travel speed in metres per second.  Default: 60 km/h.
    pub speed_mps: f64,

    /// Applied to the straight-line distance to approximate road detours.
    /// Default: 1.0.
    pub distance_multiplier: f64,
}

impl Default for GreatCircleConfig {
    fn default() -> Self {
        Self { speed_mps: 60.0 / 3.6, distance_multiplier: 1.0 }
    }
}

impl PartialEq for GreatCircleConfig {
    fn eq(&self, other: &Self) -> bool {
        bits(self.speed_mps) == bits(other.speed_mps)
            && bits(self.distance_multiplier) == bits(other.distance_multiplier)
    }
}

impl Eq for GreatCircleConfig {}

impl Hash for GreatCircleConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(bits(self.speed_mps));
        state.write_u64(bits(self.distance_multiplier));
    }
}

// ── Road network ──────────────────────────────────────────────────────────────

/// Travel time and distance from a road-network graph.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadNetworkConfig {
    /// Directory the graph is loaded from.
    pub graph_dir: PathBuf,

    /// Applied to every travel time the graph reports.  Default: 1.0.
    pub time_multiplier: f64,
}

impl Default for RoadNetworkConfig {
    fn default() -> Self {
        Self { graph_dir: PathBuf::new(), time_multiplier: 1.0 }
    }
}

impl PartialEq for RoadNetworkConfig {
    fn eq(&self, other: &Self) -> bool {
        self.graph_dir == other.graph_dir
            && bits(self.time_multiplier) == bits(other.time_multiplier)
    }
}

impl Eq for RoadNetworkConfig {}

impl Hash for RoadNetworkConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.graph_dir.hash(state);
        state.write_u64(bits(self.time_multiplier));
    }
}

// ── Method ────────────────────────────────────────────────────────────────────

/// How raw distance and time are obtained.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMethod {
    GreatCircle(GreatCircleConfig),
    RoadNetwork(RoadNetworkConfig),
}

impl DistanceMethod {
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMethod::GreatCircle(_) => "great-circle",
            DistanceMethod::RoadNetwork(_) => "road-network",
        }
    }
}

impl Default for DistanceMethod {
    fn default() -> Self {
        DistanceMethod::GreatCircle(GreatCircleConfig::default())
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Units of the distance and time channels and how the cost channel is formed.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputConfig {
    pub output_type:     OutputType,
    pub distance_unit:   DistanceUnit,
    pub time_unit:       TimeUnit,
    /// Weight of time in [`OutputType::Summed`] cost.
    pub time_weight:     f64,
    /// Weight of distance in [`OutputType::Summed`] cost.
    pub distance_weight: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_type:     OutputType::default(),
            distance_unit:   DistanceUnit::default(),
            time_unit:       TimeUnit::default(),
            time_weight:     1.0,
            distance_weight: 0.0,
        }
    }
}

impl PartialEq for OutputConfig {
    fn eq(&self, other: &Self) -> bool {
        self.output_type == other.output_type
            && self.distance_unit == other.distance_unit
            && self.time_unit == other.time_unit
            && bits(self.time_weight) == bits(other.time_weight)
            && bits(self.distance_weight) == bits(other.distance_weight)
    }
}

impl Eq for OutputConfig {}

impl Hash for OutputConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.output_type.hash(state);
        self.distance_unit.hash(state);
        self.time_unit.hash(state);
        state.write_u64(bits(self.time_weight));
        state.write_u64(bits(self.distance_weight));
    }
}

// ── DistanceConfiguration ─────────────────────────────────────────────────────

/// Everything that determines the contents of a cost matrix apart from the
/// points themselves.
///
/// ```
/// use rc_distance::{DistanceConfiguration, DistanceMethod, GreatCircleConfig};
///
/// let cfg = DistanceConfiguration {
///     method: DistanceMethod::GreatCircle(GreatCircleConfig { speed_mps: 20.0, distance_multiplier: 1.2 }),
///     ..Default::default()
/// };
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg, cfg.clone());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceConfiguration {
    pub method: DistanceMethod,
    pub output: OutputConfig,
}

impl DistanceConfiguration {
    /// Great circle with default speed and multiplier.
    pub fn great_circle() -> Self {
        Self::default()
    }

    /// Road network over `graph_dir` with a unit time multiplier.
    pub fn road_network(graph_dir: impl Into<PathBuf>) -> Self {
        Self {
            method: DistanceMethod::RoadNetwork(RoadNetworkConfig {
                graph_dir: graph_dir.into(),
                ..Default::default()
            }),
            output: OutputConfig::default(),
        }
    }

    /// Reject settings no computation could honour.
    ///
    /// # Errors
    ///
    /// [`DistanceError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> DistanceResult<()> {
        let bad = |msg: String| Err(DistanceError::InvalidConfig(msg));

        match &self.method {
            DistanceMethod::GreatCircle(gc) => {
                if !(gc.speed_mps.is_finite() && gc.speed_mps > 0.0) {
                    return bad(format!("speed must be positive and finite, got {}", gc.speed_mps));
                }
                if !(gc.distance_multiplier.is_finite() && gc.distance_multiplier >= 0.0) {
                    return bad(format!(
                        "distance multiplier must be non-negative and finite, got {}",
                        gc.distance_multiplier
                    ));
                }
            }
            DistanceMethod::RoadNetwork(rn) => {
                if rn.graph_dir.as_os_str().is_empty() {
                    return bad("road network graph directory is not set".to_owned());
                }
                if !(rn.time_multiplier.is_finite() && rn.time_multiplier >= 0.0) {
                    return bad(format!(
                        "time multiplier must be non-negative and finite, got {}",
                        rn.time_multiplier
                    ));
                }
            }
        }

        let out = &self.output;
        if !out.time_weight.is_finite() || !out.distance_weight.is_finite() {
            return bad(format!(
                "output weights must be finite, got time={} distance={}",
                out.time_weight, out.distance_weight
            ));
        }
        Ok(())
    }
}
