//! Search links for learning a gap skill and for finding jobs in an occupation.
//!
//! These are plain search URLs; nothing is fetched.

use reqwest::Url;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub label: String,
    pub url: String,
}

const GOOGLE_SEARCH: &str = "https://www.google.com/search";
const YOUTUBE_SEARCH: &str = "https://www.youtube.com/results";
const INDEED_SEARCH: &str = "https://www.indeed.com/jobs";
const LINKEDIN_SEARCH: &str = "https://www.linkedin.com/jobs/search/";
/// Indeed's "remote" attribute filter.
const INDEED_REMOTE_FILTER: &str = "0kf:attr(DSQF7);";

/// Course and tutorial searches for one missing skill.
pub fn links_for_gap(skill: &str) -> Vec<ResourceLink> {
    let skill = skill.trim();
    [
        ("Google", GOOGLE_SEARCH, vec![("q", format!("{skill} course beginner"))]),
        ("Coursera", GOOGLE_SEARCH, vec![("q", format!("site:coursera.org {skill}"))]),
        ("edX", GOOGLE_SEARCH, vec![("q", format!("site:edx.org {skill}"))]),
        ("YouTube", YOUTUBE_SEARCH, vec![("search_query", format!("{skill} tutorial"))]),
    ]
    .into_iter()
    .filter_map(|(label, base, params)| link(label, base, &params))
    .collect()
}

/// Job board searches for one occupation.
pub fn job_links(occupation: &str) -> Vec<ResourceLink> {
    let role = occupation.trim();
    [
        ("Google Jobs", GOOGLE_SEARCH, vec![("q", format!("{role} remote jobs"))]),
        (
            "Indeed",
            INDEED_SEARCH,
            vec![("q", role.to_string()), ("sc", INDEED_REMOTE_FILTER.to_string())],
        ),
        ("LinkedIn", LINKEDIN_SEARCH, vec![("keywords", role.to_string())]),
    ]
    .into_iter()
    .filter_map(|(label, base, params)| link(label, base, &params))
    .collect()
}

fn link(label: &str, base: &str, params: &[(&str, String)]) -> Option<ResourceLink> {
    let url = Url::parse_with_params(base, params.iter().map(|(k, v)| (*k, v.as_str()))).ok()?;
    Some(ResourceLink {
        label: label.to_string(),
        url: url.into(),
    })
}
