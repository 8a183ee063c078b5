//! Optimization hint forwarded with a schema

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Access pattern the NoSQL design should favour.
///
/// The validator does not interpret it; it travels with the schema to the
/// record store, the queue and the design generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationType {
    ReadHeavy,
    WriteHeavy,
    #[default]
    Balanced,
}

impl OptimizationType {
    pub const ALL: [OptimizationType; 3] = [
        OptimizationType::ReadHeavy,
        OptimizationType::WriteHeavy,
        OptimizationType::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationType::ReadHeavy => "read_heavy",
            OptimizationType::WriteHeavy => "write_heavy",
            OptimizationType::Balanced => "balanced",
        }
    }
}

impl FromStr for OptimizationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read_heavy" => Ok(OptimizationType::ReadHeavy),
            "write_heavy" => Ok(OptimizationType::WriteHeavy),
            "balanced" => Ok(OptimizationType::Balanced),
            _ => Err(format!(
                "Unknown optimization type: '{}'. Valid values: read_heavy, write_heavy, balanced.",
                s
            )),
        }
    }
}

impl std::fmt::Display for OptimizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for opt in OptimizationType::ALL {
            assert_eq!(opt.as_str().parse::<OptimizationType>(), Ok(opt));
        }
        assert_eq!("READ_HEAVY".parse(), Ok(OptimizationType::ReadHeavy));
    }

    #[test]
    fn test_unknown_type() {
        let err = "fast".parse::<OptimizationType>().unwrap_err();
        assert!(err.contains("fast"));
        assert!(err.contains("write_heavy"));
    }

    #[test]
    fn test_default_is_balanced() {
        assert_eq!(OptimizationType::default(), OptimizationType::Balanced);
        assert_eq!(
            serde_json::to_string(&OptimizationType::WriteHeavy).unwrap(),
            "\"write_heavy\""
        );
    }
}
