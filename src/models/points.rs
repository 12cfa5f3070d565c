//! Points (rewards) configuration.

use serde::{Deserialize, Serialize};

/// Configuration key holding the pesos-per-point rate.
pub const CREDITS_COST: &str = "CREDITS_COST";

/// A single key/value configuration entry.
///
/// For [`CREDITS_COST`] the value is the number of pesos one point is worth,
/// stored as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsConfig {
    /// Configuration key.
    pub id: String,
    /// Configured value.
    pub value: String,
}

impl PointsConfig {
    /// Creates a [`CREDITS_COST`] entry with the given value.
    #[inline]
    #[must_use]
    pub fn credits_cost<V: Into<String>>(value: V) -> Self {
        Self {
            id: CREDITS_COST.to_owned(),
            value: value.into(),
        }
    }

    /// Parses the rate; `None` unless it is a finite number greater than zero.
    #[inline]
    #[must_use]
    pub fn pesos_per_point(&self) -> Option<f64> {
        self.value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    /// Converts an amount in pesos to whole points, rounding down.
    #[must_use]
    pub fn pesos_to_points(&self, pesos: f64) -> Option<f64> {
        self.pesos_per_point().map(|rate| (pesos / rate).floor())
    }

    /// Converts a number of points to pesos.
    #[must_use]
    pub fn points_to_pesos(&self, points: f64) -> Option<f64> {
        self.pesos_per_point().map(|rate| points * rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_rounds_points_down() {
        let config = PointsConfig::credits_cost("100");
        assert_eq!(config.pesos_to_points(250.0), Some(2.0));
        assert_eq!(config.pesos_to_points(99.0), Some(0.0));
        assert_eq!(config.points_to_pesos(3.0), Some(300.0));
    }

    #[test]
    fn invalid_rate_disables_conversion() {
        assert!(PointsConfig::credits_cost("0").pesos_per_point().is_none());
        assert!(PointsConfig::credits_cost("abc").pesos_per_point().is_none());
        assert!(PointsConfig::credits_cost("-5").pesos_to_points(10.0).is_none());
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&PointsConfig::credits_cost("50")).unwrap();
        assert_eq!(json, r#"{"id":"CREDITS_COST","value":"50"}"#);
    }
}
