use serde::{Deserialize, Serialize};

/// A tracked symbol with the trigger conditions and indicators to query for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolConfig {
    /// Remote identifier, e.g. `BTC:USD:daily`
    pub symbol: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub indicators: Vec<String>,
}

impl SymbolConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            triggers: Vec::new(),
            indicators: Vec::new(),
        }
    }

    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers = triggers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indicators = indicators.into_iter().map(Into::into).collect();
        self
    }
}
