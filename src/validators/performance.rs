use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::model::ValidationResult;

use super::Validator;

pub struct PerformanceValidator;

impl Validator for PerformanceValidator {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn category(&self) -> &'static str {
        "performance_scenarios"
    }

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult> {
        if scenarios.is_empty() {
            return Ok(ValidationResult::skipped(
                "no performance scenarios provided",
            ));
        }

        let mut operations = Vec::new();
        for (group_name, group) in scenarios {
            collect_operations(group_name, group, &mut operations);
        }

        if operations.is_empty() {
            return Ok(ValidationResult::skipped(
                "no operations with response time budgets found",
            ));
        }

        let mut reports = Vec::new();
        let mut failures = 0_usize;

        for (path, spec) in &operations {
            let max_response_time = spec
                .get("max_response_time")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            let iterations = spec.get("iterations").and_then(Value::as_u64).unwrap_or(1);

            let well_formed = max_response_time > 0.0 && iterations >= 1;
            if !well_formed {
                failures += 1;
            }

            reports.push(json!({
                "operation": path,
                "status": if well_formed { "passed" } else { "failed" },
                "max_response_time": max_response_time,
                "iterations": iterations,
            }));
        }

        let mut metrics = BTreeMap::new();
        metrics.insert("operations_checked".to_string(), operations.len() as f64);
        metrics.insert("operations_failed".to_string(), failures as f64);

        let result = if failures == 0 {
            ValidationResult::passed(format!(
                "{} operations within declared budgets",
                operations.len()
            ))
        } else {
            ValidationResult::failed(format!(
                "{failures} of {} operations have unusable budgets",
                operations.len()
            ))
        };

        Ok(result
            .with_details(json!({ "operations": reports }))
            .with_metrics(metrics))
    }
}

// Operation specs can be nested arbitrarily under groups and tables; a leaf
// is recognized by its max_response_time budget.
fn collect_operations(path: &str, value: &Value, out: &mut Vec<(String, Map<String, Value>)>) {
    let Some(entries) = value.as_object() else {
        return;
    };

    if entries.contains_key("max_response_time") {
        out.push((path.to_string(), entries.clone()));
        return;
    }

    for (name, nested) in entries {
        collect_operations(&format!("{path}.{name}"), nested, out);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::model::ValidationStatus;
    use crate::validators::Validator;

    use super::PerformanceValidator;

    #[test]
    fn nested_operation_budgets_are_discovered_and_pass() {
        let scenarios = json!({
            "response_time_scenarios": {
                "contract_operations": {
                    "create_contract": {"max_response_time": 2.0, "iterations": 10}
                }
            }
        });

        let result = PerformanceValidator
            .validate(scenarios.as_object().expect("object"))
            .expect("validate");
        assert_eq!(result.status, ValidationStatus::Passed);

        let metrics = result.metrics.expect("metrics");
        assert_eq!(metrics["operations_checked"], 1.0);
    }

    #[test]
    fn zero_response_time_budget_fails() {
        let scenarios = json!({
            "response_time_scenarios": {
                "broken_operation": {"max_response_time": 0.0, "iterations": 5}
            }
        });

        let result = PerformanceValidator
            .validate(scenarios.as_object().expect("object"))
            .expect("validate");
        assert_eq!(result.status, ValidationStatus::Failed);
    }

    #[test]
    fn scenarios_without_budgets_are_skipped() {
        let scenarios = json!({
            "throughput_scenarios": {"note": "not yet specified"}
        });

        let result = PerformanceValidator
            .validate(scenarios.as_object().expect("object"))
            .expect("validate");
        assert_eq!(result.status, ValidationStatus::Skipped);
    }
}
