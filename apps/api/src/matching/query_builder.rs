//! Query Builder — composes the natural-language search query that gets
//! embedded and matched against stored job chunks.

use crate::matching::resume_structurer::StructuredResume;

/// Builds one search sentence from the structured resume plus the
/// user-supplied search parameters. Deterministic, no I/O; empty fields are
/// omitted rather than rendered as placeholders.
pub fn build_query(resume: &StructuredResume, target_role: &str, target_country: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    match (target_role.trim(), target_country.trim()) {
        ("", "") => {}
        (role, "") => parts.push(format!("Searching for {role} roles.")),
        ("", country) => parts.push(format!("Searching for roles in {country}.")),
        (role, country) => parts.push(format!("Searching for {role} roles in {country}.")),
    }

    if !resume.recap.trim().is_empty() {
        parts.push(format!("Candidate profile: {}.", resume.recap.trim().trim_end_matches('.')));
    }
    if !resume.work_experience.trim().is_empty() {
        parts.push(format!("Experience: {}.", resume.work_experience.trim()));
    }
    push_list(&mut parts, "Responsibilities and achievements", &resume.responsibilities);
    push_list(&mut parts, "Skills", &resume.skills);
    push_list(&mut parts, "Certifications", &resume.certifications);
    push_list(&mut parts, "Projects", &resume.projects);

    parts.join(" ")
}

fn push_list(parts: &mut Vec<String>, label: &str, items: &[String]) {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !items.is_empty() {
        parts.push(format!("{label}: {}.", items.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resume() -> StructuredResume {
        StructuredResume {
            job_to_search_for: "Software Engineer".to_string(),
            work_experience: "5 years".to_string(),
            responsibilities: vec!["Led platform migration".to_string()],
            skills: vec!["Python".to_string(), "React".to_string()],
            certifications: vec![],
            projects: vec!["CI platform".to_string()],
            recap: "Backend engineer with a platform focus".to_string(),
        }
    }

    #[test]
    fn test_composes_all_present_fields() {
        let query = build_query(&sample_resume(), "Software Engineer", "usa");
        assert!(query.starts_with("Searching for Software Engineer roles in usa."));
        assert!(query.contains("Candidate profile: Backend engineer with a platform focus."));
        assert!(query.contains("Experience: 5 years."));
        assert!(query.contains("Skills: Python, React."));
        assert!(query.contains("Projects: CI platform."));
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let query = build_query(&sample_resume(), "Software Engineer", "usa");
        assert!(!query.contains("Certifications"));
    }

    #[test]
    fn test_fully_empty_resume_still_produces_role_sentence() {
        let query = build_query(&StructuredResume::default(), "Data Analyst", "germany");
        assert_eq!(query, "Searching for Data Analyst roles in germany.");
    }

    #[test]
    fn test_blank_role_and_country_yield_no_search_sentence() {
        let query = build_query(&sample_resume(), "", "  ");
        assert!(!query.contains("Searching for"));
        assert!(query.contains("Skills: Python, React."));
    }

    #[test]
    fn test_deterministic() {
        let resume = sample_resume();
        assert_eq!(
            build_query(&resume, "SRE", "canada"),
            build_query(&resume, "SRE", "canada")
        );
    }
}
