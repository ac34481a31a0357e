use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mention candidate produced by a source adapter, before it is stored.
///
/// `symbol` is the raw ticker as matched by the adapter; the store normalizes
/// it. `metadata` is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMention {
    pub symbol: String,
    pub source: String,
    pub content: String,
    pub url: Option<String>,
    pub external_id: Option<String>,
    pub metadata: Option<Value>,
}
