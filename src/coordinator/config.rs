use serde::{Deserialize, Serialize};

/// Default number of history records kept per machine.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Coordinator settings.
///
/// Deserializable with every field optional, so hosts can embed it in their
/// own configuration files.
///
/// # Example
///
/// ```rust
/// use statecoord::CoordinatorConfig;
///
/// let config = CoordinatorConfig::from_json(r#"{ "debug": true }"#).unwrap();
/// assert!(config.debug);
/// assert_eq!(config.history_limit, statecoord::coordinator::DEFAULT_HISTORY_LIMIT);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Trace every operation at debug level.
    pub debug: bool,

    /// History records kept per machine; zero disables history.
    pub history_limit: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debug: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = CoordinatorConfig::from_json("{}").unwrap();
        assert_eq!(config, CoordinatorConfig::default());
        assert!(!config.debug);
    }

    #[test]
    fn setters_override_defaults() {
        let config = CoordinatorConfig::default()
            .with_debug(true)
            .with_history_limit(0);
        assert!(config.debug);
        assert_eq!(config.history_limit, 0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(CoordinatorConfig::from_json(r#"{ "history_limit": "many" }"#).is_err());
    }
}
