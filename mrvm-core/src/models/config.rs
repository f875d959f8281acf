use std::time::Duration;

/// Parameters handed to a solver alongside the program.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SolveParams {
    /// The wall-clock budget for a solve (unbounded if omitted)
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde::option"))]
    pub time_limit: Option<Duration>,
    /// What to do when the time limit is hit: accept the best assignment found
    /// so far, or fail.
    pub accept_suboptimal: bool,
}

/// Settings for the numeric scaling of value-bearing quantities.
///
/// If the largest value any bidder could possibly have exceeds
/// `max_value - safety_gap`, every value in the program is divided by a
/// common factor so that it no longer does.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScalingSettings {
    /// The largest magnitude the solver handles safely
    pub max_value: f64,
    /// Head room kept below `max_value`
    pub safety_gap: f64,
}

impl Default for ScalingSettings {
    fn default() -> Self {
        Self {
            max_value: 1e6,
            safety_gap: 1e3,
        }
    }
}

impl ScalingSettings {
    /// The largest value allowed in the program
    pub fn ceiling(&self) -> f64 {
        self.max_value - self.safety_gap
    }
}

/// Everything that configures the construction and solution of a winner
/// determination program.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ModelSettings {
    /// Numeric scaling of values
    pub scaling: ScalingSettings,
    /// Solver parameters
    pub params: SolveParams,
    /// The objective penalty per assigned license, breaking ties in favor of
    /// not handing out licenses nobody values.
    pub epsilon: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            scaling: ScalingSettings::default(),
            params: SolveParams::default(),
            epsilon: 1e-5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_settings() {
        let raw = r#"{
            "params": { "time_limit": "1m 30s", "accept_suboptimal": true },
            "epsilon": 0.001
        }"#;

        let settings = serde_json::from_str::<ModelSettings>(raw).unwrap();
        assert_eq!(settings.params.time_limit, Some(Duration::from_secs(90)));
        assert!(settings.params.accept_suboptimal);
        assert_eq!(settings.scaling, ScalingSettings::default());
        assert_eq!(settings.epsilon, 0.001);
    }

    #[test]
    fn test_default_params() {
        let params = serde_json::from_str::<SolveParams>("{}").unwrap();
        assert_eq!(params, SolveParams::default());
        assert_eq!(params.time_limit, None);
    }
}
