//! Serialization codecs for cached values.
//!
//! The store never looks inside a cache file; it hands bytes to a `Codec`.

use memo_core::error::{MemoError, MemoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Turns values into bytes and back
pub trait Codec {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    fn encode<T: Serialize>(&self, value: &T) -> MemoResult<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> MemoResult<T>;
}

/// JSON codec backed by serde_json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact JSON
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented JSON, easier to inspect by hand
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        if self.pretty {
            "json-pretty"
        } else {
            "json"
        }
    }

    fn encode<T: Serialize>(&self, value: &T) -> MemoResult<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        bytes.map_err(MemoError::encode)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> MemoResult<T> {
        serde_json::from_slice(bytes).map_err(MemoError::decode)
    }
}
