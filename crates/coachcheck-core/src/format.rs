use crate::types::{CheckStatus, ValidationResult};

fn status_word(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Warning => "WARN",
        CheckStatus::Fail => "FAIL",
    }
}

/// Format a validation result as human-readable markdown.
pub fn format_validation_readable(result: &ValidationResult) -> String {
    let mut output = String::new();

    output.push_str("# Session Validation\n\n");
    output.push_str(&result.message);
    output.push_str("\n\n");

    output.push_str(&format!(
        "**Summary:** {} passed | {} warnings | {} failed | confidence {:.2}\n\n",
        result.summary.passed,
        result.summary.warnings,
        result.summary.failed,
        result.summary.confidence
    ));

    for principle in &result.principles {
        output.push_str(&format!(
            "## [{}] {} (confidence {:.2})\n\n",
            status_word(principle.status),
            principle.name,
            principle.confidence
        ));

        for finding in &principle.findings {
            output.push_str(&format!(
                "- [{}] {} (score {:.2})\n",
                status_word(finding.status),
                finding.question,
                finding.score
            ));
            for evidence in &finding.evidence {
                output.push_str(&format!("  > {}\n", evidence));
            }
        }

        if !principle.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in &principle.suggestions {
                output.push_str(&format!("• {}\n", suggestion));
            }
        }

        if !principle.supporting_passages.is_empty() {
            output.push_str("\nSupporting passages:\n");
            for hit in &principle.supporting_passages {
                match (&hit.chapter, hit.page) {
                    (Some(chapter), Some(page)) => output.push_str(&format!(
                        "• {} ({}, p.{}, {:.2})\n",
                        hit.text, chapter, page, hit.score
                    )),
                    _ => output.push_str(&format!("• {} ({:.2})\n", hit.text, hit.score)),
                }
            }
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CheckEvidence, PrincipleResult, SearchHit, ValidationSummary,
    };

    #[test]
    fn renders_all_sections() {
        let result = ValidationResult {
            message: "1 principle(s) need attention.".to_string(),
            summary: ValidationSummary {
                passed: 0,
                warnings: 0,
                failed: 1,
                confidence: 0.12,
            },
            principles: vec![PrincipleResult {
                name: "Feedback".to_string(),
                status: CheckStatus::Fail,
                confidence: 0.12,
                findings: vec![CheckEvidence {
                    question: "Is verbal feedback given?".to_string(),
                    score: 0.12,
                    status: CheckStatus::Fail,
                    evidence: vec!["well done everyone".to_string()],
                }],
                suggestions: vec!["Missing: Is verbal feedback given?".to_string()],
                supporting_passages: vec![SearchHit {
                    text: "Feedback should be specific".to_string(),
                    chapter: Some("Ch 3".to_string()),
                    page: Some(41),
                    score: 0.8,
                }],
            }],
        };

        let text = format_validation_readable(&result);
        for needle in [
            "# Session Validation",
            "1 principle(s) need attention.",
            "**Summary:** 0 passed | 0 warnings | 1 failed | confidence 0.12",
            "## [FAIL] Feedback",
            "> well done everyone",
            "• Missing: Is verbal feedback given?",
            "• Feedback should be specific (Ch 3, p.41, 0.80)",
        ] {
            assert!(text.contains(needle), "missing {needle:?}");
        }
    }
}
