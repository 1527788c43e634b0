use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::model::ValidationResult;

use super::Validator;

const KNOWN_OUTCOMES: &[&str] = &["authenticated", "rejected"];

pub struct SecurityValidator;

impl Validator for SecurityValidator {
    fn name(&self) -> &'static str {
        "security"
    }

    fn category(&self) -> &'static str {
        "security_scenarios"
    }

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult> {
        if scenarios.is_empty() {
            return Ok(ValidationResult::skipped("no security scenarios provided"));
        }

        let Some(auth_scenarios) = scenarios
            .get("authentication_scenarios")
            .and_then(Value::as_object)
        else {
            return Ok(ValidationResult::skipped(
                "no authentication scenarios in security data",
            ));
        };

        let mut reports = Vec::new();
        let mut failures = 0_usize;

        for (scenario_name, scenario) in auth_scenarios {
            let username = scenario
                .get("username")
                .and_then(Value::as_str)
                .unwrap_or("");
            let has_password = scenario
                .get("password")
                .and_then(Value::as_str)
                .is_some_and(|password| !password.is_empty());
            let expected_result = scenario
                .get("expected_result")
                .and_then(Value::as_str)
                .unwrap_or("");

            let well_formed =
                !username.is_empty() && has_password && KNOWN_OUTCOMES.contains(&expected_result);
            if !well_formed {
                failures += 1;
            }

            reports.push(json!({
                "scenario": scenario_name,
                "status": if well_formed { "passed" } else { "failed" },
                "expected_result": expected_result,
            }));
        }

        let result = if failures == 0 {
            ValidationResult::passed(format!(
                "{} authentication scenarios validated",
                reports.len()
            ))
        } else {
            ValidationResult::failed(format!(
                "{failures} of {} authentication scenarios failed",
                reports.len()
            ))
        };

        Ok(result.with_details(json!({ "scenarios": reports })))
    }
}
