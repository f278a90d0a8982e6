use serde::{Deserialize, Serialize};

/// Shown for values that are missing or not finite.
pub const PLACEHOLDER: &str = "—";

/// Text formatting attached to each text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    /// Whole number, halves rounded up.
    Integer,
    /// Whole degrees, halves rounded up; not wrapped.
    Degrees,
    /// Four decimals, for latitude and longitude.
    Coordinate,
}

impl NumberFormat {
    pub fn format(self, value: f64) -> String {
        if !value.is_finite() {
            return PLACEHOLDER.to_string();
        }
        match self {
            NumberFormat::Integer | NumberFormat::Degrees => {
                format!("{}", (value + 0.5).floor() as i64)
            }
            NumberFormat::Coordinate => format!("{value:.4}"),
        }
    }
}
