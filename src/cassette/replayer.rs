//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use super::format::{Cassette, Interaction};

/// Hands out a cassette's interactions per `(port, method)` queue.
///
/// Calls to different methods may interleave freely; calls to the same
/// method are answered in recording order.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Indexes a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Reads and indexes the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette {}: {e}", path.display()))?;
        let cassette = Cassette::from_yaml(&text)
            .map_err(|e| format!("Failed to parse cassette {}: {e}", path.display()))?;
        Ok(Self::new(&cassette))
    }

    /// Pops the next interaction recorded for `port`/`method`.
    ///
    /// # Panics
    ///
    /// Panics when nothing (more) was recorded for the pair. A replay that
    /// diverges from its recording is a broken fixture, not a runtime error.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette has no interactions recorded for {port}::{method}. \
                 Available: [{}]",
                available.join(", ")
            );
        };
        queue.pop_front().unwrap_or_else(|| {
            panic!("Cassette exhausted: every {port}::{method} interaction was already replayed")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: "aws".into(), method: method.into(), input: json!({}), output }
    }

    fn replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            tool_version: "0.1.0".into(),
            interactions,
        })
    }

    #[test]
    fn serves_each_method_in_recording_order() {
        let mut r = replayer(vec![
            interaction(0, "list_function_names", json!({"ok": {"items": ["a"]}})),
            interaction(1, "list_regions", json!({"ok": ["us-east-1"]})),
            interaction(2, "list_function_names", json!({"ok": {"items": ["b"]}})),
        ]);
        assert_eq!(r.next_interaction("aws", "list_regions").seq, 1);
        assert_eq!(r.next_interaction("aws", "list_function_names").seq, 0);
        assert_eq!(r.next_interaction("aws", "list_function_names").seq, 2);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn panics_when_exhausted() {
        let mut r = replayer(vec![interaction(0, "list_regions", json!({"ok": []}))]);
        let _ = r.next_interaction("aws", "list_regions");
        let _ = r.next_interaction("aws", "list_regions");
    }

    #[test]
    #[should_panic(expected = "no interactions recorded for aws::list_bucket_names")]
    fn panics_on_unrecorded_method() {
        let mut r = replayer(vec![]);
        let _ = r.next_interaction("aws", "list_bucket_names");
    }
}
