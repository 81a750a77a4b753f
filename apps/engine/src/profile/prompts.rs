// Prompts for the five profiling extractors.
// Placeholders: {transcript}, {resume}, {schema}, {evidence_instruction}

pub const ANALYSIS_SYSTEM: &str = "You are a career analyst. You read interview transcripts \
    and extract structured profile data. You respond with a single JSON object and nothing else.";

pub const SKILLS_PROMPT: &str = r#"Extract the user's skills from the interview transcript and resume.

Transcript:
{transcript}

Resume (if provided):
{resume}

Cover technical skills, soft skills, domain knowledge and credentials. Infer proficiency from
years mentioned, projects completed and depth of knowledge shown.

{evidence_instruction}

Return JSON with this structure:
{schema}"#;

pub const PERSONALITY_PROMPT: &str = r#"Infer the user's personality traits from the interview transcript.

Transcript:
{transcript}

Consider analytical vs creative thinking, introverted vs extroverted communication,
detail vs big-picture focus, independent vs collaborative style, risk appetite and empathy.
Score each trait from 0 to 100. Include 5-7 traits.

{evidence_instruction}

Return JSON with this structure:
{schema}"#;

pub const PASSIONS_PROMPT: &str = r#"Identify what energizes the user: interests, causes and activities.

Transcript:
{transcript}

Group related interests into named clusters with a one-sentence description each.

{evidence_instruction}

Return JSON with this structure:
{schema}"#;

pub const GOALS_PROMPT: &str = r#"Extract the user's career goals and lifestyle preferences.

Transcript:
{transcript}

Timeframe: how soon they want to transition. Income preference: entry-level, moderate,
high-earning or maximize. Location preference: remote, hybrid, on-site, flexible or a city.
Working style: startup, corporate, freelance, agency, nonprofit or hybrid.
Goal statements often appear near the end of an interview; read all of it.

{evidence_instruction}

Return JSON with this structure:
{schema}"#;

pub const VALUES_PROMPT: &str = r#"Identify the user's core work values.

Transcript:
{transcript}

Score how strongly each value shows up, from 0 to 100. Include 4-6 values.

{evidence_instruction}

Return JSON with this structure:
{schema}"#;

pub const SKILLS_SCHEMA: &str = r#"{"skills": [{"name": "skill", "level": "beginner|intermediate|advanced|expert", "yearsOfExperience": 1.5}]}"#;
pub const PERSONALITY_SCHEMA: &str = r#"{"personality": [{"name": "analytical", "score": 75}]}"#;
pub const PASSIONS_SCHEMA: &str = r#"{"passions": [{"name": "cluster name", "description": "one sentence"}]}"#;
pub const GOALS_SCHEMA: &str = r#"{"goals": {"timeframe": "1-2 years", "incomePreference": "moderate", "locationPreference": "flexible", "workingStyle": "hybrid"}}"#;
pub const VALUES_SCHEMA: &str = r#"{"values": [{"name": "autonomy", "score": 80}]}"#;
