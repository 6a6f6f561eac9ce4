// Follow-up guidance for a chosen occupation: where to learn each gap skill,
// where to look for jobs, and an LLM-written learning roadmap.

pub mod prompts;
pub mod resources;
pub mod roadmap;
