use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::model::ValidationResult;

use super::Validator;

const INTEGRATION_KINDS: &[&str] = &["database_integration", "agent_integration", "api_integration"];

pub struct IntegrationValidator;

impl Validator for IntegrationValidator {
    fn name(&self) -> &'static str {
        "integration"
    }

    fn category(&self) -> &'static str {
        "integration_scenarios"
    }

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult> {
        if scenarios.is_empty() {
            return Ok(ValidationResult::skipped(
                "no integration scenarios provided",
            ));
        }

        let mut reports = Vec::new();
        let mut failures = 0_usize;

        for kind in INTEGRATION_KINDS {
            let Some(tables) = scenarios.get(*kind).and_then(Value::as_object) else {
                continue;
            };

            let mut operations_checked = 0_usize;
            let mut malformed = Vec::new();

            for (table_name, table) in tables {
                let Some(operations) = table.as_object() else {
                    malformed.push(table_name.clone());
                    continue;
                };

                for (operation_name, operation) in operations {
                    operations_checked += 1;
                    if !operation_is_well_formed(operation) {
                        malformed.push(format!("{table_name}.{operation_name}"));
                    }
                }
            }

            if !malformed.is_empty() {
                failures += 1;
            }

            reports.push(json!({
                "integration": kind,
                "status": if malformed.is_empty() { "passed" } else { "failed" },
                "operations_checked": operations_checked,
                "malformed_operations": malformed,
            }));
        }

        if reports.is_empty() {
            return Ok(ValidationResult::skipped(
                "no recognized integration kinds in scenarios",
            ));
        }

        let result = if failures == 0 {
            ValidationResult::passed(format!("{} integrations validated", reports.len()))
        } else {
            ValidationResult::failed(format!(
                "{failures} of {} integrations failed",
                reports.len()
            ))
        };

        Ok(result.with_details(json!({ "integrations": reports })))
    }
}

// Every integration operation must declare its request payload and the
// result it expects from the collaborator.
fn operation_is_well_formed(operation: &Value) -> bool {
    let Some(operation) = operation.as_object() else {
        return false;
    };

    operation.get("data").is_some_and(Value::is_object)
        && operation.get("expected_result").is_some_and(Value::is_object)
}
