use serde::{Deserialize, Serialize};

/// What happens to a document's entity data when the document is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRetention {
    /// Entity vectors and co-occurrence weights are append-only history; `remove`
    /// leaves them in place.
    #[default]
    Permanent,
    /// `remove` takes back the document's entity vector and its co-occurrence
    /// increments. Entity keys stay, possibly with zero weights.
    Retract,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub entity_retention: EntityRetention,
    /// Result count used by callers that do not pass an explicit k.
    pub default_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { entity_retention: EntityRetention::Permanent, default_k: default_k() }
    }
}

fn default_k() -> usize { 10 }

impl EngineConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
