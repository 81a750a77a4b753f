use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The five profiling dimensions. Each has exactly one slot in `CareerProfile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Skills,
    Personality,
    Passions,
    Goals,
    Values,
}

impl ProfileKind {
    /// Canonical order used for fragments and reports.
    pub const ALL: [ProfileKind; 5] = [
        ProfileKind::Skills,
        ProfileKind::Personality,
        ProfileKind::Passions,
        ProfileKind::Goals,
        ProfileKind::Values,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileKind::Skills => "skills",
            ProfileKind::Personality => "personality",
            ProfileKind::Passions => "passions",
            ProfileKind::Goals => "goals",
            ProfileKind::Values => "values",
        }
    }

    /// Empty container of the right shape, substituted when a branch fails.
    pub fn default_payload(self) -> Value {
        match self {
            ProfileKind::Goals => json!({ "goals": GoalLifestyle::default() }),
            kind => {
                let mut container = Map::new();
                container.insert(kind.as_str().to_string(), Value::Array(Vec::new()));
                Value::Object(container)
            }
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analyzer's partial result. Built once by the orchestrator, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFragment {
    pub kind: ProfileKind,
    /// Raw analyzer output (untrusted shape), or the kind's default payload on failure.
    pub payload: Value,
    pub succeeded: bool,
    pub failure_reason: Option<String>,
    pub duration_ms: u64,
}

impl ProfileFragment {
    pub fn success(kind: ProfileKind, payload: Value, duration_ms: u64) -> Self {
        Self {
            kind,
            payload,
            succeeded: true,
            failure_reason: None,
            duration_ms,
        }
    }

    pub fn defaulted(kind: ProfileKind, reason: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind,
            payload: kind.default_payload(),
            succeeded: false,
            failure_reason: Some(reason.into()),
            duration_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    /// beginner | intermediate | advanced | expert
    pub level: String,
    pub years_of_experience: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTrait {
    pub name: String,
    /// 0 – 100
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passion {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalLifestyle {
    pub timeframe: String,
    pub income_preference: String,
    pub location_preference: String,
    pub working_style: String,
}

impl Default for GoalLifestyle {
    fn default() -> Self {
        Self {
            timeframe: "1-2 years".to_string(),
            income_preference: "moderate".to_string(),
            location_preference: "flexible".to_string(),
            working_style: "hybrid".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreValue {
    pub name: String,
    /// 0 – 100 when the analyzer supplied one.
    pub score: Option<f64>,
}

/// Canonical aggregate of all five analyzers. Every key is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerProfile {
    pub skills: Vec<Skill>,
    pub personality: Vec<PersonalityTrait>,
    pub passions: Vec<Passion>,
    pub goals: GoalLifestyle,
    pub values: Vec<CoreValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ProfileKind::Personality).unwrap();
        assert_eq!(json, r#""personality""#);
    }

    #[test]
    fn test_default_payloads_have_correct_shape() {
        for kind in ProfileKind::ALL {
            let payload = kind.default_payload();
            let inner = &payload[kind.as_str()];
            match kind {
                ProfileKind::Goals => {
                    assert_eq!(inner["timeframe"], "1-2 years");
                    assert_eq!(inner["workingStyle"], "hybrid");
                }
                _ => assert_eq!(inner.as_array().map(Vec::len), Some(0), "{kind}"),
            }
        }
    }

    #[test]
    fn test_defaulted_fragment_records_reason() {
        let fragment = ProfileFragment::defaulted(ProfileKind::Values, "timed out", 12);
        assert!(!fragment.succeeded);
        assert_eq!(fragment.failure_reason.as_deref(), Some("timed out"));
        assert_eq!(fragment.payload, ProfileKind::Values.default_payload());
    }

    #[test]
    fn test_profile_serializes_exactly_five_keys() {
        let value = serde_json::to_value(CareerProfile::default()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
        for kind in ProfileKind::ALL {
            assert!(value.get(kind.as_str()).is_some(), "missing {kind}");
        }
    }

    #[test]
    fn test_skill_uses_camel_case_names() {
        let skill = Skill {
            name: "Rust".to_string(),
            level: "advanced".to_string(),
            years_of_experience: Some(3.0),
        };
        let value = serde_json::to_value(skill).unwrap();
        assert_eq!(value["yearsOfExperience"], 3.0);
    }
}
