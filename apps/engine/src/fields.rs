//! Alias-based field access for untrusted JSON.
//!
//! Analyzer and generator backends name semantically equal fields differently
//! (`whyGoodFit` vs `matchExplanation`, `work_style` vs `workingStyle`). Every
//! reader takes an ordered alias list; the first alias present with a usable
//! value wins.

use serde_json::{Map, Value};

/// First alias holding a non-blank string. Numbers and booleans are stringified.
pub fn pick_string(object: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| match object.get(*alias)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// First alias holding something readable as a finite number.
pub fn pick_number(object: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .find_map(|alias| object.get(*alias).and_then(as_number))
}

/// First alias holding an array.
pub fn pick_array<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Vec<Value>> {
    aliases
        .iter()
        .find_map(|alias| object.get(*alias).and_then(Value::as_array))
}

/// First alias holding an object.
pub fn pick_object<'a>(
    object: &'a Map<String, Value>,
    aliases: &[&str],
) -> Option<&'a Map<String, Value>> {
    aliases
        .iter()
        .find_map(|alias| object.get(*alias).and_then(Value::as_object))
}

/// Reads a finite number from a JSON number or a numeric string such as `"85"` or `"85%"`.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Clamps a score into [0, 100]. Strictly fractional inputs in (0, 1) are read as proportions.
pub fn percent_score(raw: f64) -> f64 {
    let scaled = if raw > 0.0 && raw < 1.0 { raw * 100.0 } else { raw };
    scaled.clamp(0.0, 100.0)
}

/// Lowercase kebab-case slug, e.g. `"AI Product Strategist"` → `"ai-product-strategist"`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
