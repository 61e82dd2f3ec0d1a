//! Optimization roadmap: prioritised next steps derived from the dashboard scores.

use serde::{Deserialize, Serialize};

use crate::analysis::aggregate::DashboardScores;
use crate::analysis::client::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub priority: Priority,
    pub action: String,
    pub description: String,
    pub estimated_impact: String,
    pub time_required: String,
}

impl RoadmapItem {
    fn new(
        priority: Priority,
        action: &str,
        description: String,
        estimated_impact: &str,
        time_required: &str,
    ) -> Self {
        Self {
            priority,
            action: action.to_string(),
            description,
            estimated_impact: estimated_impact.to_string(),
            time_required: time_required.to_string(),
        }
    }
}

/// Builds the roadmap, most urgent first.
pub fn build_roadmap(scores: &DashboardScores, result: &AnalysisResult) -> Vec<RoadmapItem> {
    let mut roadmap = Vec::new();
    let missing = &result.match_stats.missing_keywords;

    if scores.match_score < 50.0 {
        roadmap.push(RoadmapItem::new(
            Priority::Critical,
            "Add Job-Specific Keywords",
            "Your résumé lacks essential keywords from the job description".to_string(),
            "+20-30% match score",
            "1-2 hours",
        ));
    }

    if missing.len() > 3 {
        let examples: Vec<&str> = missing.iter().take(5).map(String::as_str).collect();
        roadmap.push(RoadmapItem::new(
            Priority::High,
            "Optimize Skills Section",
            format!("Add missing keywords naturally, e.g. {}", examples.join(", ")),
            "+10-15% match score",
            "30-60 minutes",
        ));
    }

    if scores.ats_score < 70.0 {
        roadmap.push(RoadmapItem::new(
            Priority::High,
            "Improve ATS Compatibility",
            "Format the résumé for reliable ATS parsing: standard headings, plain bullets, no tables"
                .to_string(),
            "Better ATS pass-through rate",
            "45 minutes",
        ));
    }

    if result.signals.quantification.quantified_achievements == 0 {
        roadmap.push(RoadmapItem::new(
            Priority::Medium,
            "Quantify Achievements",
            "Attach numbers to outcomes: percentages, revenue, time saved, team size".to_string(),
            "Stronger impact statements",
            "30 minutes",
        ));
    }

    if !result.signals.tone.weak_phrases_found.is_empty() {
        roadmap.push(RoadmapItem::new(
            Priority::Low,
            "Strengthen Action Verbs",
            format!(
                "Replace duty-style phrasing: {}",
                result.signals.tone.weak_phrases_found.join(", ")
            ),
            "More confident tone",
            "20 minutes",
        ));
    }

    roadmap.sort_by_key(|item| item.priority);
    roadmap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::{aggregate, ScoreWeights};
    use crate::analysis::client::{AiAssessment, AnalysisMode};
    use crate::extraction::build_resume_document;
    use crate::matching::{analyze_content, derive_job_description, match_documents, IndustryCatalog};
    use chrono::Utc;
    use uuid::Uuid;

    fn analysis(resume_text: &str, job_text: &str) -> AnalysisResult {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.resolve(None);
        let resume = build_resume_document(resume_text);
        let stats = match_documents(resume_text, job_text, profile);
        let signals = analyze_content(&resume);
        AnalysisResult {
            id: Uuid::new_v4(),
            mode: AnalysisMode::HeuristicOnly,
            degraded_reason: None,
            ai: AiAssessment::heuristic_placeholder(&stats, &signals),
            job: derive_job_description(job_text, profile),
            match_stats: stats,
            signals,
            keyword_suggestions: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_poor_match_gets_critical_first() {
        let result = analysis(
            "Responsible for cooking meals.",
            "Rust engineer with Kubernetes, Terraform, PostgreSQL and gRPC experience",
        );
        let scores = aggregate(&result.match_stats, &result, &ScoreWeights::default());
        let roadmap = build_roadmap(&scores, &result);

        assert_eq!(roadmap[0].priority, Priority::Critical);
        assert_eq!(roadmap[0].action, "Add Job-Specific Keywords");
        assert!(roadmap.iter().any(|i| i.action == "Optimize Skills Section"));
        // Heuristic-only ATS never reaches 70.
        assert!(roadmap.iter().any(|i| i.action == "Improve ATS Compatibility"));
        assert!(roadmap.iter().any(|i| i.action == "Strengthen Action Verbs"));
    }

    #[test]
    fn test_roadmap_sorted_by_priority() {
        let result = analysis("Worked on things", "Python developer, Django, Docker, Redis, Celery");
        let scores = aggregate(&result.match_stats, &result, &ScoreWeights::default());
        let roadmap = build_roadmap(&scores, &result);
        assert!(roadmap.windows(2).all(|w| w[0].priority <= w[1].priority));
    }
}
