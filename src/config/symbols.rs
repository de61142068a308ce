//! Deserialize the `symbols` object while keeping the file's key order

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::models::SymbolConfig;

#[derive(Deserialize)]
struct SymbolItems {
    #[serde(default)]
    triggers: Vec<String>,
    #[serde(default)]
    indicators: Vec<String>,
}

struct SymbolsVisitor;

impl<'de> Visitor<'de> for SymbolsVisitor {
    type Value = Vec<SymbolConfig>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping symbol names to triggers and indicators")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut symbols = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, items)) = map.next_entry::<String, SymbolItems>()? {
            symbols.push(
                SymbolConfig::new(name)
                    .with_triggers(items.triggers)
                    .with_indicators(items.indicators),
            );
        }
        Ok(symbols)
    }
}

pub(super) fn in_file_order<'de, D>(deserializer: D) -> Result<Vec<SymbolConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_map(SymbolsVisitor)
}
