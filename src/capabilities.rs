// src/capabilities.rs
//! Groups raw skill names into capability areas for display. Used when the
//! API returns a profile without precomputed capabilities.

use std::collections::HashSet;

use crate::types::{CandidateProfile, Capabilities};

/// Capability groups in display order, with the keywords that place a skill
/// in each. A skill lands in the first group that matches.
pub const CAPABILITY_MAP: &[(&str, &[&str])] = &[
    (
        "Frontend",
        &[
            "Angular", "React", "Next.js", "Vue", "Vue.js", "Svelte", "TypeScript",
            "JavaScript", "HTML", "CSS", "Tailwind", "SASS", "Redux", "GraphQL Client",
            "React Native", "Flutter", "Ionic", "Electron",
        ],
    ),
    (
        "Backend",
        &[
            "Node.js", "NestJS", ".NET", "C#", "Java", "Spring", "Spring Boot", "Python",
            "Django", "FastAPI", "Flask", "Ruby", "Rails", "Ruby on Rails", "Go", "Golang",
            "Rust", "PHP", "Laravel", "Express", "Koa", "GraphQL",
        ],
    ),
    (
        "Infrastructure",
        &[
            "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch", "DynamoDB", "AWS",
            "Azure", "GCP", "Google Cloud", "Docker", "Kubernetes", "K8s", "Terraform",
            "Ansible", "Jenkins", "GitHub Actions", "CI/CD", "Linux", "Nginx", "Apache",
            "Vercel", "Netlify", "Heroku",
        ],
    ),
    (
        "Practices",
        &[
            "System Design", "APIs", "REST", "REST APIs", "Microservices", "Payments",
            "Stripe", "Security", "OAuth", "Authentication", "Testing", "TDD", "Agile",
            "Scrum", "DevOps", "Architecture", "Performance", "Optimization", "Monitoring",
            "Observability",
        ],
    ),
    (
        "Data & AI",
        &[
            "Machine Learning", "ML", "AI", "Data Science", "TensorFlow", "PyTorch", "Pandas",
            "NumPy", "Data Engineering", "ETL", "Apache Spark", "Kafka", "Data Analysis",
            "SQL", "BigQuery", "Snowflake", "dbt",
        ],
    ),
    (
        "Mobile",
        &[
            "iOS", "Swift", "SwiftUI", "Android", "Kotlin", "React Native", "Flutter",
            "Mobile Development", "Objective-C", "Xamarin",
        ],
    ),
];

/// Skills shown per group in compact listings.
pub const INLINE_SKILL_LIMIT: usize = 3;

pub fn capability_order() -> Vec<&'static str> {
    CAPABILITY_MAP.iter().map(|(group, _)| *group).collect()
}

fn matches(skill: &str, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    skill == keyword || skill.contains(&keyword) || keyword.contains(skill)
}

/// Assigns each skill to at most one capability group.
pub fn derive_capabilities<S: AsRef<str>>(skills: &[S]) -> Capabilities {
    let mut capabilities = Capabilities::new();
    let mut assigned: HashSet<String> = HashSet::new();

    for (group, keywords) in CAPABILITY_MAP {
        let mut matching = Vec::new();

        for skill in skills {
            let skill = skill.as_ref().trim();
            if skill.is_empty() {
                continue;
            }
            let lowered = skill.to_lowercase();
            if assigned.contains(&lowered) {
                continue;
            }

            if keywords.iter().any(|k| matches(&lowered, k)) {
                matching.push(skill.to_string());
                assigned.insert(lowered);
            }
        }

        if !matching.is_empty() {
            capabilities.insert(group.to_string(), matching);
        }
    }

    capabilities
}

pub fn has_capabilities(capabilities: Option<&Capabilities>) -> bool {
    capabilities.is_some_and(|c| c.values().any(|skills| !skills.is_empty()))
}

/// Server-provided capabilities when present, otherwise derived from the
/// profile's skills.
pub fn profile_capabilities(profile: &CandidateProfile) -> Capabilities {
    match &profile.capabilities {
        Some(capabilities) if has_capabilities(Some(capabilities)) => capabilities.clone(),
        _ => {
            let names: Vec<&str> = profile.skills.iter().map(|s| s.skill_name.as_str()).collect();
            derive_capabilities(&names)
        }
    }
}

/// Non-empty groups in display order; groups outside the map follow
/// alphabetically. `limit` caps the skills listed per group.
pub fn ordered_groups(capabilities: &Capabilities, limit: Option<usize>) -> Vec<(String, Vec<String>)> {
    let order = capability_order();
    let mut groups: Vec<(String, Vec<String>)> = capabilities
        .iter()
        .filter(|(_, skills)| !skills.is_empty())
        .map(|(group, skills)| {
            let shown = match limit {
                Some(limit) => skills.iter().take(limit).cloned().collect(),
                None => skills.clone(),
            };
            (group.clone(), shown)
        })
        .collect();

    groups.sort_by_key(|(group, _)| {
        order
            .iter()
            .position(|known| known == group)
            .unwrap_or(order.len())
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_skill_lands_in_one_group() {
        let capabilities = derive_capabilities(&["React Native", "Rust", "PostgreSQL", "Kafka"]);

        assert_eq!(capabilities["Frontend"], vec!["React Native"]);
        assert!(!capabilities.contains_key("Mobile"));
        assert_eq!(capabilities["Backend"], vec!["Rust"]);
        assert_eq!(capabilities["Infrastructure"], vec!["PostgreSQL"]);
        assert_eq!(capabilities["Data & AI"], vec!["Kafka"]);
    }

    #[test]
    fn test_matching_is_case_insensitive_and_substring() {
        let capabilities = derive_capabilities(&["typescript", "AWS Lambda", "Spring"]);
        assert_eq!(capabilities["Frontend"], vec!["typescript"]);
        assert_eq!(capabilities["Infrastructure"], vec!["AWS Lambda"]);
        assert_eq!(capabilities["Backend"], vec!["Spring"]);
    }

    #[test]
    fn test_empty_and_duplicate_skills() {
        let capabilities = derive_capabilities(&["", "  ", "Docker", "docker"]);
        assert_eq!(capabilities.len(), 1);
        assert_eq!(capabilities["Infrastructure"], vec!["Docker"]);

        let none: [&str; 0] = [];
        assert!(derive_capabilities(&none).is_empty());
        assert!(!has_capabilities(Some(&derive_capabilities(&none))));
        assert!(!has_capabilities(None));
    }

    #[test]
    fn test_skill_names_are_trimmed() {
        let capabilities = derive_capabilities(&[" Rust ", "Rust"]);
        assert_eq!(capabilities["Backend"], vec!["Rust"]);
    }

    #[test]
    fn test_ordered_groups_follow_display_order() {
        let capabilities = derive_capabilities(&[
            "Swift", "Kubernetes", "React", "Vue", "Svelte", "CSS", "Go",
        ]);
        let groups = ordered_groups(&capabilities, Some(INLINE_SKILL_LIMIT));

        let names: Vec<&str> = groups.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, vec!["Frontend", "Backend", "Infrastructure", "Mobile"]);
        assert_eq!(groups[0].1, vec!["React", "Vue", "Svelte"]);
    }

    #[test]
    fn test_capability_order() {
        assert_eq!(
            capability_order(),
            vec!["Frontend", "Backend", "Infrastructure", "Practices", "Data & AI", "Mobile"]
        );
    }
}
