//! Roadmap Generator: a six-week learning plan toward one occupation.

use tracing::info;

use crate::errors::AppError;
use crate::guidance::prompts::ROADMAP_PROMPT_TEMPLATE;
use crate::llm_client::prompts::ADVISOR_SYSTEM;
use crate::llm_client::LlmClient;
use crate::skills::SkillSet;

/// Renders the roadmap prompt. Empty lists are spelled out so the model
/// does not have to guess.
pub fn build_roadmap_prompt(skills: &SkillSet, occupation: &str, gaps: &[String]) -> String {
    let skills = if skills.is_empty() {
        "none listed".to_string()
    } else {
        skills.iter().collect::<Vec<_>>().join(", ")
    };
    let gaps = if gaps.is_empty() {
        "none (focus on portfolio depth and interview readiness)".to_string()
    } else {
        gaps.join(", ")
    };

    ROADMAP_PROMPT_TEMPLATE
        .replace("{occupation}", occupation)
        .replace("{skills}", &skills)
        .replace("{gaps}", &gaps)
}

/// Asks the LLM for a Markdown roadmap.
pub async fn generate_roadmap(
    llm: &LlmClient,
    skills: &SkillSet,
    occupation: &str,
    gaps: &[String],
) -> Result<String, AppError> {
    let prompt = build_roadmap_prompt(skills, occupation, gaps);
    let roadmap = llm
        .complete(&prompt, ADVISOR_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Roadmap generation failed: {e}")))?;
    info!(occupation, gaps = gaps.len(), "Roadmap generated");
    Ok(roadmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_role_skills_and_gaps() {
        let skills: SkillSet = ["SQL", "Python"].into_iter().collect();
        let prompt = build_roadmap_prompt(
            &skills,
            "Data Scientist",
            &["Statistics".to_string(), "Machine Learning".to_string()],
        );
        assert!(prompt.contains("becoming a Data Scientist"));
        assert!(prompt.contains("current skills: Python, SQL"));
        assert!(prompt.contains("gaps to address: Statistics, Machine Learning"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_prompt_handles_empty_lists() {
        let prompt = build_roadmap_prompt(&SkillSet::new(), "QA Engineer", &[]);
        assert!(prompt.contains("current skills: none listed"));
        assert!(prompt.contains("gaps to address: none"));
    }
}
