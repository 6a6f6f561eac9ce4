// Skill extraction prompt templates.

pub const SKILL_EXTRACTION_PROMPT: &str = r#"You are a skill extraction engine.
From the following resume/profile text, output a JSON array (no prose) of 10-25 normalized skills.
Normalize common variants (e.g., "MS Excel" => "Excel", "PostgreSQL" => "SQL").
Use short canonical names: one skill per item, no sentences, no proficiency levels.
Return ONLY valid JSON.

TEXT:
{text}
"#;
