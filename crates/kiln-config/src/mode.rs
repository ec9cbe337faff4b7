use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Build environment the pipeline is composed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Interactive builds served by the dev server
    Development,
    /// Optimized, cache-friendly output
    Production,
    /// Production pipeline with the testing environment injected
    Testing,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Development, Mode::Production, Mode::Testing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
            Mode::Testing => "testing",
        }
    }

    /// Production and testing share the optimized pipeline.
    pub fn is_optimized(&self) -> bool {
        matches!(self, Mode::Production | Mode::Testing)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Mode::Development),
            "production" => Ok(Mode::Production),
            "testing" => Ok(Mode::Testing),
            other => Err(ConfigError::UnknownMode {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "staging".parse::<Mode>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMode { ref value } if value == "staging"));
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("Production".parse::<Mode>().is_err());
    }

    #[test]
    fn optimized_modes() {
        assert!(!Mode::Development.is_optimized());
        assert!(Mode::Production.is_optimized());
        assert!(Mode::Testing.is_optimized());
    }
}
