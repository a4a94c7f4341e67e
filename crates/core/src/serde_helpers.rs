//! Serde helpers shared by request DTOs.

use serde::{Deserialize, Deserializer};

/// Deserialize a present field into `Some(value)`, including an explicit
/// JSON `null` (which becomes `Some(None)` for an `Option<Option<T>>`).
///
/// Pair with `#[serde(default)]` so a missing field stays `None`:
///
/// ```ignore
/// #[serde(default, deserialize_with = "deserialize_some")]
/// pub description: Option<Option<String>>,
/// ```
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
