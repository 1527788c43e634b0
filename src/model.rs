use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Passed,
    Failed,
    Skipped,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl ValidationResult {
    pub fn new(status: ValidationStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            details: None,
            metrics: None,
            duration_ms: 0,
        }
    }

    pub fn passed(message: impl Into<String>) -> Self {
        Self::new(ValidationStatus::Passed, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ValidationStatus::Failed, message)
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self::new(ValidationStatus::Skipped, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ValidationStatus::Error, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_metrics(mut self, metrics: BTreeMap<String, f64>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_validations: usize,
    pub passed_validations: usize,
    pub failed_validations: usize,
    pub success_rate: f64,
    pub overall_status: String,
}

impl ValidationSummary {
    // Skipped and errored validators count into the failed bucket so that
    // passed + failed == total always holds.
    pub fn from_results(results: &BTreeMap<String, ValidationResult>) -> Self {
        let total = results.len();
        let passed = results
            .values()
            .filter(|result| result.status == ValidationStatus::Passed)
            .count();

        let success_rate = if total > 0 {
            passed as f64 / total as f64
        } else {
            0.0
        };

        let overall_status = if total > 0 && passed == total {
            "passed"
        } else {
            "failed"
        };

        Self {
            total_validations: total,
            passed_validations: passed,
            failed_validations: total - passed,
            success_rate,
            overall_status: overall_status.to_string(),
        }
    }

    pub fn empty() -> Self {
        Self::from_results(&BTreeMap::new())
    }

    pub fn is_passed(&self) -> bool {
        self.overall_status == "passed"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub timestamp: String,
    pub validations: BTreeMap<String, ValidationResult>,
    pub summary: ValidationSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    pub fn from_validations(
        timestamp: String,
        validations: BTreeMap<String, ValidationResult>,
    ) -> Self {
        let summary = ValidationSummary::from_results(&validations);
        Self {
            timestamp,
            validations,
            summary,
            error: None,
        }
    }

    pub fn empty(timestamp: String) -> Self {
        Self::from_validations(timestamp, BTreeMap::new())
    }

    pub fn aborted(timestamp: String, error: impl Into<String>) -> Self {
        Self {
            timestamp,
            validations: BTreeMap::new(),
            summary: ValidationSummary::empty(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetrics {
    pub timestamp: String,
    pub execution_time: f64,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub coverage: f64,
    pub security_score: f64,
    pub performance_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineAlert {
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{RunResult, ValidationResult, ValidationStatus, ValidationSummary};

    fn results_with(statuses: &[(&str, ValidationStatus)]) -> BTreeMap<String, ValidationResult> {
        statuses
            .iter()
            .map(|(name, status)| {
                (
                    name.to_string(),
                    ValidationResult::new(*status, format!("{name} result")),
                )
            })
            .collect()
    }

    #[test]
    fn summary_counts_satisfy_passed_plus_failed_equals_total() {
        let results = results_with(&[
            ("end_to_end", ValidationStatus::Passed),
            ("data_flow", ValidationStatus::Failed),
            ("security", ValidationStatus::Skipped),
            ("performance", ValidationStatus::Error),
        ]);

        let summary = ValidationSummary::from_results(&results);
        assert_eq!(summary.total_validations, 4);
        assert_eq!(summary.passed_validations, 1);
        assert_eq!(summary.failed_validations, 3);
        assert_eq!(
            summary.passed_validations + summary.failed_validations,
            summary.total_validations
        );
        assert_eq!(summary.overall_status, "failed");
    }

    #[test]
    fn summary_success_rate_is_zero_for_empty_results() {
        let summary = ValidationSummary::empty();
        assert_eq!(summary.total_validations, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.overall_status, "failed");
    }

    #[test]
    fn summary_passes_only_when_every_validation_passed() {
        let results = results_with(&[
            ("end_to_end", ValidationStatus::Passed),
            ("data_flow", ValidationStatus::Passed),
        ]);

        let summary = ValidationSummary::from_results(&results);
        assert_eq!(summary.success_rate, 1.0);
        assert!(summary.is_passed());
    }

    #[test]
    fn status_serializes_lowercase() {
        let raw = serde_json::to_string(&ValidationStatus::Error).expect("serialize status");
        assert_eq!(raw, "\"error\"");
    }

    #[test]
    fn aborted_run_result_carries_error_and_no_validations() {
        let result = RunResult::aborted("2025-01-01T00:00:00Z".to_string(), "dataset unreadable");
        assert!(result.validations.is_empty());
        assert_eq!(result.error.as_deref(), Some("dataset unreadable"));
        assert_eq!(result.summary.total_validations, 0);
    }
}
