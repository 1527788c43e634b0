use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::model::ValidationResult;

use super::Validator;

pub struct ErrorHandlingValidator;

impl Validator for ErrorHandlingValidator {
    fn name(&self) -> &'static str {
        "error_handling"
    }

    fn category(&self) -> &'static str {
        "error_handling_scenarios"
    }

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult> {
        if scenarios.is_empty() {
            return Ok(ValidationResult::skipped(
                "no error handling scenarios provided",
            ));
        }

        let mut reports = Vec::new();
        let mut failures = 0_usize;

        for (group_name, group) in scenarios {
            for (scenario_name, scenario) in flatten_scenarios(group) {
                let report = validate_scenario(group_name, &scenario_name, &scenario);
                if report["status"] != "passed" {
                    failures += 1;
                }
                reports.push(report);
            }
        }

        let result = if failures == 0 {
            ValidationResult::passed(format!("{} error scenarios handled", reports.len()))
        } else {
            ValidationResult::failed(format!(
                "{failures} of {} error scenarios failed",
                reports.len()
            ))
        };

        Ok(result.with_details(json!({ "scenarios": reports })))
    }
}

// Categories nest either one or two levels deep; a leaf is recognized by
// carrying an "input" payload.
fn flatten_scenarios(group: &Value) -> Vec<(String, Value)> {
    let Some(entries) = group.as_object() else {
        return Vec::new();
    };

    if entries.contains_key("input") {
        return vec![("scenario".to_string(), group.clone())];
    }

    entries
        .iter()
        .map(|(name, scenario)| (name.clone(), scenario.clone()))
        .collect()
}

// A scenario passes when it declares a concrete expected error for its bad
// input: a named error and a 4xx/5xx status.
fn validate_scenario(group_name: &str, scenario_name: &str, scenario: &Value) -> Value {
    let expected_error = scenario
        .get("expected_error")
        .and_then(Value::as_str)
        .unwrap_or("");
    let expected_status = scenario
        .get("expected_status")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let handled = !expected_error.is_empty() && expected_status >= 400;

    json!({
        "group": group_name,
        "scenario": scenario_name,
        "status": if handled { "passed" } else { "failed" },
        "expected_error": expected_error,
        "expected_status": expected_status,
    })
}
