use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cli::ReportType;
use crate::model::{ValidationResult, ValidationStatus, ValidationSummary};
use crate::util::now_utc_string;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub report_type: String,
    pub generated_at: String,
    pub summary: ValidationSummary,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_results: Option<BTreeMap<String, ValidationResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_analysis: Option<DetailedAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<ExecutiveSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub performance_bottlenecks: Vec<String>,
    pub security_findings: Vec<String>,
    pub consistency_issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub business_impact: String,
    pub risk_level: String,
    pub action_required: bool,
}

pub fn generate_report(
    results: &BTreeMap<String, ValidationResult>,
    report_type: ReportType,
) -> Report {
    let summary = ValidationSummary::from_results(results);
    let failed = failed_names(results);

    let mut report = Report {
        report_type: report_type.as_str().to_string(),
        generated_at: now_utc_string(),
        summary,
        recommendations: recommendations(&failed),
        detailed_results: None,
        detailed_analysis: None,
        executive_summary: None,
    };

    match report_type {
        ReportType::Summary => {}
        ReportType::Detailed => {
            report.detailed_results = Some(results.clone());
            report.detailed_analysis = Some(detailed_analysis(&failed));
        }
        ReportType::Executive => {
            report.executive_summary = Some(executive_summary(&failed));
        }
    }

    report
}

fn failed_names(results: &BTreeMap<String, ValidationResult>) -> Vec<String> {
    results
        .iter()
        .filter(|(_, result)| result.status != ValidationStatus::Passed)
        .map(|(name, _)| name.clone())
        .collect()
}

fn recommendations(failed: &[String]) -> Vec<String> {
    if failed.is_empty() {
        return Vec::new();
    }

    vec![
        format!("Address {} failed validations", failed.len()),
        "Review and fix validation failures before deployment".to_string(),
    ]
}

fn detailed_analysis(failed: &[String]) -> DetailedAnalysis {
    let findings_in = |domain: &str| -> Vec<String> {
        failed
            .iter()
            .filter(|name| name.as_str() == domain)
            .map(|name| format!("{name} validation did not pass"))
            .collect()
    };

    DetailedAnalysis {
        performance_bottlenecks: findings_in("performance"),
        security_findings: findings_in("security"),
        consistency_issues: findings_in("data_consistency"),
    }
}

fn executive_summary(failed: &[String]) -> ExecutiveSummary {
    let (business_impact, risk_level) = match failed.len() {
        0 => ("LOW - all validations passed".to_string(), "LOW"),
        1..=2 => (
            format!("MEDIUM - {} validations failing: {}", failed.len(), failed.join(", ")),
            "MEDIUM",
        ),
        _ => (
            format!("HIGH - {} validations failing: {}", failed.len(), failed.join(", ")),
            "HIGH",
        ),
    };

    ExecutiveSummary {
        business_impact,
        risk_level: risk_level.to_string(),
        action_required: !failed.is_empty(),
    }
}
