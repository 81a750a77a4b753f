//! Profile Aggregator — merges fragments into the canonical `CareerProfile`.
//!
//! Pure and infallible. For each kind the first succeeded fragment wins; a
//! missing or failed kind falls back to its default container. Payload fields
//! are read through ordered alias lists, so any upstream naming that matches an
//! alias is accepted and anything else degrades to the default.

use serde_json::{Map, Value};
use tracing::debug;

use crate::fields::{as_number, percent_score, pick_array, pick_number, pick_object, pick_string};
use crate::profile::models::{
    CareerProfile, CoreValue, GoalLifestyle, Passion, PersonalityTrait, ProfileFragment,
    ProfileKind, Skill,
};

const SKILLS_CONTAINER: &[&str] = &["skills", "skill_list", "technical_skills", "skillSet"];
const SKILL_NAME: &[&str] = &["name", "skill", "title"];
const SKILL_LEVEL: &[&str] = &["level", "proficiency", "proficiencyLevel"];
const SKILL_YEARS: &[&str] = &[
    "yearsOfExperience",
    "years_experience",
    "years_of_experience",
    "years",
];
const SKILL_LEVELS: [&str; 4] = ["beginner", "intermediate", "advanced", "expert"];
const DEFAULT_SKILL_LEVEL: &str = "intermediate";

const PERSONALITY_CONTAINER: &[&str] = &["personality", "traits", "personality_traits", "big_five"];
const TRAIT_NAME: &[&str] = &["name", "trait", "dimension"];
const TRAIT_SCORE: &[&str] = &["score", "value", "strength"];

const PASSIONS_CONTAINER: &[&str] = &["passions", "interests", "core_passions", "passion_clusters"];
const PASSION_NAME: &[&str] = &["name", "passion", "interest", "title"];
const PASSION_DESCRIPTION: &[&str] = &["description", "details", "evidence", "summary"];

const GOALS_CONTAINER: &[&str] = &["goals", "goal_lifestyle", "goalLifestyle", "lifestyle"];
const GOAL_TIMEFRAME: &[&str] = &["timeframe", "time_frame", "timeline", "transition_timeframe"];
const GOAL_INCOME: &[&str] = &["incomePreference", "income_preference", "income_target", "income"];
const GOAL_LOCATION: &[&str] = &["locationPreference", "location_preference", "location"];
const GOAL_STYLE: &[&str] = &["workingStyle", "working_style", "work_style", "workStyle"];

const VALUES_CONTAINER: &[&str] = &["values", "core_values", "core_work_values", "work_values"];
const VALUE_NAME: &[&str] = &["name", "value", "title"];
const VALUE_SCORE: &[&str] = &["score", "importance", "weight", "strength"];

/// Builds the canonical profile. Always returns all five sections.
pub fn aggregate(fragments: &[ProfileFragment]) -> CareerProfile {
    let defaults = CareerProfile::default();

    CareerProfile {
        skills: payload_for(fragments, ProfileKind::Skills)
            .map(read_skills)
            .unwrap_or(defaults.skills),
        personality: payload_for(fragments, ProfileKind::Personality)
            .map(read_personality)
            .unwrap_or(defaults.personality),
        passions: payload_for(fragments, ProfileKind::Passions)
            .map(read_passions)
            .unwrap_or(defaults.passions),
        goals: payload_for(fragments, ProfileKind::Goals)
            .map(read_goals)
            .unwrap_or(defaults.goals),
        values: payload_for(fragments, ProfileKind::Values)
            .map(read_values)
            .unwrap_or(defaults.values),
    }
}

fn payload_for(fragments: &[ProfileFragment], kind: ProfileKind) -> Option<&Value> {
    let found = fragments
        .iter()
        .find(|f| f.kind == kind && f.succeeded)
        .map(|f| &f.payload);
    if found.is_none() {
        debug!(%kind, "no succeeded fragment; using default section");
    }
    found
}

/// Locates the list inside a payload: a bare array, or an array under one of `container`.
fn list_in<'a>(payload: &'a Value, container: &[&str]) -> &'a [Value] {
    match payload {
        Value::Array(items) => items,
        Value::Object(map) => pick_array(map, container).map(Vec::as_slice).unwrap_or(&[]),
        _ => &[],
    }
}

/// A list item is either a bare string (the name) or an object.
fn item_name(item: &Value, aliases: &[&str]) -> Option<String> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => pick_string(map, aliases),
        _ => None,
    }
}

fn read_skills(payload: &Value) -> Vec<Skill> {
    list_in(payload, SKILLS_CONTAINER)
        .iter()
        .filter_map(|item| {
            let name = item_name(item, SKILL_NAME)?;
            let fields = item.as_object();
            let level = fields
                .and_then(|m| pick_string(m, SKILL_LEVEL))
                .map(|l| l.to_lowercase())
                .filter(|l| SKILL_LEVELS.contains(&l.as_str()))
                .unwrap_or_else(|| DEFAULT_SKILL_LEVEL.to_string());
            let years_of_experience = fields
                .and_then(|m| pick_number(m, SKILL_YEARS))
                .filter(|y| *y >= 0.0);
            Some(Skill {
                name,
                level,
                years_of_experience,
            })
        })
        .collect()
}

fn read_personality(payload: &Value) -> Vec<PersonalityTrait> {
    let list = list_in(payload, PERSONALITY_CONTAINER);
    if !list.is_empty() {
        return list
            .iter()
            .filter_map(|item| {
                let map = item.as_object()?;
                Some(PersonalityTrait {
                    name: pick_string(map, TRAIT_NAME)?,
                    score: percent_score(pick_number(map, TRAIT_SCORE)?),
                })
            })
            .collect();
    }

    // Map form: {"openness": 0.75, ...} or {"openness": {"score": 70, ...}, ...}
    payload
        .as_object()
        .and_then(|map| pick_object(map, PERSONALITY_CONTAINER))
        .map(read_trait_map)
        .unwrap_or_default()
}

fn read_trait_map(map: &Map<String, Value>) -> Vec<PersonalityTrait> {
    map.iter()
        .filter_map(|(name, value)| {
            let raw = match value {
                Value::Object(inner) => pick_number(inner, TRAIT_SCORE)?,
                other => as_number(other)?,
            };
            Some(PersonalityTrait {
                name: name.clone(),
                score: percent_score(raw),
            })
        })
        .collect()
}

fn read_passions(payload: &Value) -> Vec<Passion> {
    list_in(payload, PASSIONS_CONTAINER)
        .iter()
        .filter_map(|item| {
            let name = item_name(item, PASSION_NAME)?;
            let description = item
                .as_object()
                .and_then(|m| pick_string(m, PASSION_DESCRIPTION))
                .unwrap_or_default();
            Some(Passion { name, description })
        })
        .collect()
}

fn read_goals(payload: &Value) -> GoalLifestyle {
    let defaults = GoalLifestyle::default();
    let Some(outer) = payload.as_object() else {
        return defaults;
    };
    // Either {"goals": {...}} or the goal fields at top level.
    let fields = pick_object(outer, GOALS_CONTAINER).unwrap_or(outer);

    GoalLifestyle {
        timeframe: pick_string(fields, GOAL_TIMEFRAME).unwrap_or(defaults.timeframe),
        income_preference: pick_string(fields, GOAL_INCOME).unwrap_or(defaults.income_preference),
        location_preference: pick_string(fields, GOAL_LOCATION)
            .unwrap_or(defaults.location_preference),
        working_style: pick_string(fields, GOAL_STYLE).unwrap_or(defaults.working_style),
    }
}

fn read_values(payload: &Value) -> Vec<CoreValue> {
    list_in(payload, VALUES_CONTAINER)
        .iter()
        .filter_map(|item| {
            let name = item_name(item, VALUE_NAME)?;
            let score = item
                .as_object()
                .and_then(|m| pick_number(m, VALUE_SCORE))
                .map(percent_score);
            Some(CoreValue { name, score })
        })
        .collect()
}
