//! Cassette data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call on a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number, assigned by the recorder.
    pub seq: u64,
    /// Port name, e.g. `"aws"`.
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// Arguments, for humans reading the cassette; replay ignores them.
    pub input: serde_json::Value,
    /// `{"ok": value}` or `{"err": "message"}`.
    pub output: serde_json::Value,
}

/// A named, ordered list of interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Version of the tool that recorded it.
    pub tool_version: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Parses a cassette from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid cassette.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_round_trip() {
        let cassette = Cassette {
            name: "regions".into(),
            recorded_at: Utc::now(),
            tool_version: "0.1.0".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "aws".into(),
                method: "list_regions".into(),
                input: json!({"profile": "dev"}),
                output: json!({"ok": ["us-east-1"]}),
            }],
        };
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        assert_eq!(Cassette::from_yaml(&yaml).expect("deserialize"), cassette);
    }
}
