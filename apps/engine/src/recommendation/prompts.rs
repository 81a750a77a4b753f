// Prompts for career recommendation generation.
// Placeholders: {min}, {max}, {profile}, {transcript_section}

pub const GENERATION_SYSTEM: &str = r#"You are an expert career advisor who generates personalized career recommendations.
Every career you propose must be justified by the user's own skills, personality, passions, goals and values.
Score fit honestly on a 0-100 scale: a realistic list has a few excellent fits, several good ones and some
stretch options. Respond with a single JSON object and nothing else."#;

pub const GENERATION_PROMPT: &str = r#"Generate between {min} and {max} personalized career recommendations for this user.

Career profile (JSON):
{profile}
{transcript_section}
Weigh skill overlap (40%), personality alignment (25%), values match (20%) and passion relevance (15%).
Propose real, specific roles. Do not pick from a fixed list.

For each career provide:
- careerId: unique kebab-case id, e.g. "ai-product-strategist"
- name: the career title
- industry
- fitScore: integer 0-100, higher is a better fit
- summary: 1-2 sentences about the role
- salaryRange: realistic US median range
- growthOutlook: percentage and short description
- estimatedTransitionTime: based on the user's current skills
- rationale: 2-3 sentences tying this career to specific parts of the profile

Return JSON with this structure:
{
  "recommendations": [
    {
      "careerId": "string",
      "name": "string",
      "industry": "string",
      "fitScore": 0,
      "summary": "string",
      "salaryRange": "string",
      "growthOutlook": "string",
      "estimatedTransitionTime": "string",
      "rationale": "string"
    }
  ]
}"#;

pub const TRANSCRIPT_SECTION: &str = r#"
Interview transcript excerpt:
{transcript}
"#;
