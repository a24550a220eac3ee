//! Output unit enums shared by every distance method.
//!
//! Raw computations always produce metres and seconds; these enums convert
//! them into whatever the caller asked for.

/// Unit for the distance channel of a cost matrix.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceUnit {
    Metres,
    #[default]
    Kilometres,
    Miles,
}

/// Miles per kilometre.
pub const MILES_PER_KM: f64 = 0.621371;

impl DistanceUnit {
    /// Convert a distance in metres into this unit.
    #[inline]
    pub fn from_metres(self, metres: f64) -> f64 {
        match self {
            DistanceUnit::Metres     => metres,
            DistanceUnit::Kilometres => metres / 1000.0,
            DistanceUnit::Miles      => (metres / 1000.0) * MILES_PER_KM,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Metres     => "metres",
            DistanceUnit::Kilometres => "kilometres",
            DistanceUnit::Miles      => "miles",
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit for the time channel of a cost matrix.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    #[default]
    Hours,
}

impl TimeUnit {
    /// Convert a duration in seconds into this unit.
    #[inline]
    pub fn from_seconds(self, seconds: f64) -> f64 {
        match self {
            TimeUnit::Milliseconds => seconds * 1000.0,
            TimeUnit::Seconds      => seconds,
            TimeUnit::Minutes      => seconds * (1.0 / 60.0),
            TimeUnit::Hours        => seconds * (1.0 / 3600.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds      => "seconds",
            TimeUnit::Minutes      => "minutes",
            TimeUnit::Hours        => "hours",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the combined "cost" channel of a matrix holds.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputType {
    /// Cost = converted distance.
    Distance,
    /// Cost = converted time.
    #[default]
    Time,
    /// Cost = `time_weight * time + distance_weight * distance`.
    Summed,
}

impl OutputType {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::Distance => "distance",
            OutputType::Time     => "time",
            OutputType::Summed   => "summed",
        }
    }
}

impl std::fmt::Display for OutputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
