// Roadmap prompt templates.

pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Create a **6-week, practical roadmap** for becoming a {occupation}.
User's current skills: {skills}
Skill gaps to address: {gaps}

Constraints:
- Keep it under ~300 words.
- Weekly phases (Week 1..6) with 3-5 bullet tasks each.
- Prioritize free/low-cost resources (MOOCs, YouTube, docs).
- Address the skill gaps in order; they are listed most important first.
- Include one small portfolio project idea and suggested job-search activities.
- Return clean Markdown (no front matter).
"#;
