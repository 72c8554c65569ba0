//! Register readings - the individual named values scraped from a device.

/// The value of a single register.
///
/// Most registers carry numeric measurements (power, temperature, energy),
/// but some carry state strings such as `run_state`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RegisterValue {
    /// A numeric measurement.
    Number(f64),
    /// A textual state value.
    Text(String),
}

impl RegisterValue {
    /// Return the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RegisterValue::Number(n) => Some(*n),
            RegisterValue::Text(_) => None,
        }
    }

    /// Return the text value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RegisterValue::Number(_) => None,
            RegisterValue::Text(s) => Some(s),
        }
    }
}

impl From<f64> for RegisterValue {
    fn from(value: f64) -> Self {
        RegisterValue::Number(value)
    }
}

impl From<i64> for RegisterValue {
    fn from(value: i64) -> Self {
        RegisterValue::Number(value as f64)
    }
}

impl From<&str> for RegisterValue {
    fn from(value: &str) -> Self {
        RegisterValue::Text(value.to_string())
    }
}

impl From<String> for RegisterValue {
    fn from(value: String) -> Self {
        RegisterValue::Text(value)
    }
}

/// One named telemetry reading with its device metadata.
///
/// The register name is the key of the map this reading lives in; the
/// reading itself carries the value plus the unit and modbus address
/// supplied by the device-protocol layer. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterReading {
    /// The scraped value.
    pub value: RegisterValue,

    /// Unit of measurement (e.g. "W", "kWh", "°C"). May be empty.
    pub unit: String,

    /// Device register address the value was read from.
    pub address: u16,
}

impl RegisterReading {
    /// Create a new reading.
    pub fn new(value: impl Into<RegisterValue>, unit: impl Into<String>, address: u16) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
            address,
        }
    }

    /// Create a numeric reading.
    pub fn numeric(value: f64, unit: impl Into<String>, address: u16) -> Self {
        Self::new(value, unit, address)
    }

    /// Create a text reading.
    pub fn text(value: impl Into<String>, unit: impl Into<String>, address: u16) -> Self {
        Self::new(value.into(), unit, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_value_accessors() {
        let value = RegisterValue::Number(42.5);
        assert_eq!(value.as_f64(), Some(42.5));
        assert_eq!(value.as_str(), None);
    }

    #[test]
    fn text_value_accessors() {
        let value = RegisterValue::from("ON");
        assert_eq!(value.as_f64(), None);
        assert_eq!(value.as_str(), Some("ON"));
    }

    #[test]
    fn reading_constructors() {
        let power = RegisterReading::numeric(100.0, "W", 1);
        assert_eq!(power.value.as_f64(), Some(100.0));
        assert_eq!(power.unit, "W");
        assert_eq!(power.address, 1);

        let state = RegisterReading::text("Standby", "", 5038);
        assert_eq!(state.value.as_str(), Some("Standby"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn value_serializes_untagged() {
        let number = serde_json::to_string(&RegisterValue::Number(5.0)).unwrap();
        assert_eq!(number, "5.0");

        let text = serde_json::to_string(&RegisterValue::from("ON")).unwrap();
        assert_eq!(text, "\"ON\"");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn reading_roundtrip() {
        let reading = RegisterReading::numeric(230.1, "V", 5018);
        let json = serde_json::to_string(&reading).unwrap();
        let parsed: RegisterReading = serde_json::from_str(&json).unwrap();
        assert_eq!(reading, parsed);
    }
}
