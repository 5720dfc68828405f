//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Serves a cassette's interactions in recorded order, independently per
/// port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Takes the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns a description of what was requested and what the cassette
    /// still holds when no interaction is left for the pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, String> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };
        if let Some(interaction) = self.queues.get_mut(&key).and_then(VecDeque::pop_front) {
            return Ok(interaction);
        }

        let mut remaining: Vec<String> = self
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(k, queue)| format!("{}::{} ({})", k.port, k.method, queue.len()))
            .collect();
        remaining.sort();
        Err(format!(
            "cassette exhausted for {port}::{method}; remaining: [{}]",
            remaining.join(", ")
        ))
    }

    /// Interactions not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            version: "0.1.0".into(),
            interactions,
        }
    }

    fn interaction(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: "fetcher".into(), method: method.into(), input: json!({}), output }
    }

    #[test]
    fn replays_each_method_in_its_own_order() {
        let cassette = make_cassette(vec![
            interaction(0, "fetch_page", json!({"ok": {"status": 200, "body": "a"}})),
            interaction(1, "check_exists", json!({"ok": 404})),
            interaction(2, "fetch_page", json!({"ok": {"status": 200, "body": "b"}})),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("fetcher", "check_exists").unwrap().seq, 1);
        assert_eq!(replayer.next_interaction("fetcher", "fetch_page").unwrap().seq, 0);
        assert_eq!(replayer.remaining(), 1);
        assert_eq!(replayer.next_interaction("fetcher", "fetch_page").unwrap().seq, 2);
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn exhausted_pair_reports_what_is_left() {
        let cassette = make_cassette(vec![
            interaction(0, "check_exists", json!({"ok": 200})),
            interaction(1, "fetch_page", json!({"ok": {"status": 200, "body": ""}})),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);
        replayer.next_interaction("fetcher", "check_exists").unwrap();
        let err = replayer.next_interaction("fetcher", "check_exists").unwrap_err();

        assert!(err.contains("cassette exhausted for fetcher::check_exists"));
        assert!(err.contains("fetcher::fetch_page (1)"));
    }

    #[test]
    fn unknown_method_is_an_error() {
        let mut replayer = CassetteReplayer::new(&make_cassette(vec![]));
        assert!(replayer.next_interaction("fetcher", "fetch_page").is_err());
    }
}
