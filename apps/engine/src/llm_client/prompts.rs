// Shared prompt fragments.
// Each capability that calls the LLM keeps its own prompts.rs alongside it.

/// Fills `{name}` placeholders in one pass.
///
/// Substituted values are never rescanned, so user text containing `{transcript}`
/// or similar stays literal. Braces that name no variable (JSON schemas) are kept.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Appended to every analysis prompt so extracted data stays tied to what the user said.
pub const EVIDENCE_INSTRUCTION: &str = "\
    CRITICAL: Only extract what the transcript or resume supports. \
    Do NOT invent employers, credentials or preferences the user never mentioned. \
    If the input says nothing about a field, use the neutral default shown in the schema.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template_fills_known_keys() {
        let out = render_template("Hi {name}, schema {\"a\": 1}", &[("name", "Ada")]);
        assert_eq!(out, "Hi Ada, schema {\"a\": 1}");
    }

    #[test]
    fn test_render_template_does_not_rescan_values() {
        let out = render_template(
            "R: {resume} T: {transcript}",
            &[("resume", "see {transcript}"), ("transcript", "hello")],
        );
        assert_eq!(out, "R: see {transcript} T: hello");
    }

    #[test]
    fn test_render_template_keeps_unknown_and_unclosed_braces() {
        assert_eq!(render_template("{other} {name", &[("name", "x")]), "{other} {name");
    }
}
