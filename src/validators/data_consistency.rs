use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::model::ValidationResult;

use super::Validator;

pub struct DataConsistencyValidator;

impl Validator for DataConsistencyValidator {
    fn name(&self) -> &'static str {
        "data_consistency"
    }

    fn category(&self) -> &'static str {
        "data_consistency_scenarios"
    }

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult> {
        if scenarios.is_empty() {
            return Ok(ValidationResult::skipped(
                "no data consistency scenarios provided",
            ));
        }

        let mut reports = Vec::new();
        let mut failures = 0_usize;

        for (group_name, group) in scenarios {
            let Some(cases) = group.as_object() else {
                continue;
            };

            for (case_name, case) in cases {
                let report = validate_case(group_name, case_name, case);
                if report["status"] != "passed" {
                    failures += 1;
                }
                reports.push(report);
            }
        }

        if reports.is_empty() {
            return Ok(ValidationResult::skipped(
                "no consistency cases in scenarios",
            ));
        }

        let result = if failures == 0 {
            ValidationResult::passed(format!("{} consistency cases hold", reports.len()))
        } else {
            ValidationResult::failed(format!(
                "{failures} of {} consistency cases failed",
                reports.len()
            ))
        };

        Ok(result.with_details(json!({ "cases": reports })))
    }
}

// Referential rule: every invoice must point at the contract it was issued
// under.
fn validate_case(group_name: &str, case_name: &str, case: &Value) -> Value {
    let contract_id = case
        .get("contract")
        .and_then(|contract| contract.get("contract_id"))
        .and_then(Value::as_str)
        .unwrap_or("");
    let invoices = case
        .get("invoices")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let expected_consistency = case
        .get("expected_consistency")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let orphaned: Vec<String> = invoices
        .iter()
        .filter(|invoice| {
            invoice
                .get("contract_id")
                .and_then(Value::as_str)
                .is_none_or(|id| id != contract_id)
        })
        .map(|invoice| {
            invoice
                .get("invoice_id")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string()
        })
        .collect();

    let consistent = !contract_id.is_empty() && orphaned.is_empty();
    let status = if consistent == expected_consistency {
        "passed"
    } else {
        "failed"
    };

    json!({
        "group": group_name,
        "case": case_name,
        "status": status,
        "consistent": consistent,
        "orphaned_invoices": orphaned,
    })
}
