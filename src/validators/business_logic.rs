use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::model::ValidationResult;

use super::Validator;

const TOTAL_TOLERANCE: f64 = 0.01;

pub struct BusinessLogicValidator;

impl Validator for BusinessLogicValidator {
    fn name(&self) -> &'static str {
        "business_logic"
    }

    fn category(&self) -> &'static str {
        "business_logic_scenarios"
    }

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult> {
        if scenarios.is_empty() {
            return Ok(ValidationResult::skipped(
                "no business logic scenarios provided",
            ));
        }

        let mut reports = Vec::new();
        let mut failures = 0_usize;

        for (rule_set_name, rule_set) in scenarios {
            let Some(rules) = rule_set.as_object() else {
                failures += 1;
                reports.push(json!({
                    "rule_set": rule_set_name,
                    "status": "failed",
                    "message": "rule set is not an object",
                }));
                continue;
            };

            let mut checks = Vec::new();

            if let Some(cases) = rules.get("amount_validation").and_then(Value::as_array) {
                for case in cases {
                    checks.push(("amount_validation", check_amount_rule(case)));
                }
            }

            if let Some(calculation) = rules.get("invoice_calculation") {
                checks.push(("invoice_calculation", check_invoice_calculation(calculation)));
            }

            if let Some(transitions) = rules.get("status_transitions").and_then(Value::as_array) {
                for transition in transitions {
                    checks.push(("status_transitions", check_status_transition(transition)));
                }
            }

            let failed: Vec<&str> = checks
                .iter()
                .filter(|(_, ok)| !ok)
                .map(|(rule, _)| *rule)
                .collect();

            if !failed.is_empty() {
                failures += 1;
            }

            reports.push(json!({
                "rule_set": rule_set_name,
                "status": if failed.is_empty() { "passed" } else { "failed" },
                "checks_run": checks.len(),
                "failed_rules": failed,
            }));
        }

        let result = if failures == 0 {
            ValidationResult::passed(format!("{} business rule sets passed", reports.len()))
        } else {
            ValidationResult::failed(format!(
                "{failures} of {} business rule sets failed",
                reports.len()
            ))
        };

        Ok(result.with_details(json!({ "rule_sets": reports })))
    }
}

// Contract amounts must be strictly positive; each case states whether it
// expects the rule to accept or reject.
fn check_amount_rule(case: &Value) -> bool {
    let amount = case.get("amount").and_then(Value::as_f64).unwrap_or(0.0);
    let expected_valid = case
        .get("expected_valid")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    (amount > 0.0) == expected_valid
}

fn check_invoice_calculation(calculation: &Value) -> bool {
    let line_items = calculation
        .get("line_items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let expected_total = calculation
        .get("expected_total")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    let calculated_total: f64 = line_items
        .iter()
        .filter_map(|item| item.get("total").and_then(Value::as_f64))
        .sum();

    (calculated_total - expected_total).abs() < TOTAL_TOLERANCE
}

fn check_status_transition(transition: &Value) -> bool {
    let from = transition
        .get("from_status")
        .and_then(Value::as_str)
        .unwrap_or("");
    let to = transition
        .get("to_status")
        .and_then(Value::as_str)
        .unwrap_or("");
    let expected_valid = transition
        .get("expected_valid")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    transition_is_valid(from, to) == expected_valid
}

fn transition_is_valid(from: &str, to: &str) -> bool {
    let allowed: &[&str] = match from {
        "draft" => &["under_review", "cancelled"],
        "under_review" => &["approved", "rejected", "draft"],
        "approved" => &["active", "cancelled"],
        "active" => &["completed", "cancelled"],
        "rejected" => &["draft"],
        _ => &[],
    };

    allowed.contains(&to)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::model::ValidationStatus;
    use crate::validators::Validator;

    use super::{BusinessLogicValidator, transition_is_valid};

    #[test]
    fn transition_table_matches_contract_lifecycle() {
        assert!(transition_is_valid("draft", "under_review"));
        assert!(transition_is_valid("under_review", "rejected"));
        assert!(transition_is_valid("approved", "active"));
        assert!(transition_is_valid("active", "completed"));
        assert!(transition_is_valid("rejected", "draft"));

        assert!(!transition_is_valid("completed", "draft"));
        assert!(!transition_is_valid("cancelled", "active"));
        assert!(!transition_is_valid("draft", "active"));
    }

    #[test]
    fn line_item_totals_must_match_within_a_cent() {
        let scenarios = json!({
            "invoice_rules": {
                "invoice_calculation": {
                    "line_items": [{"total": 600.0}, {"total": 400.0}],
                    "expected_total": 1000.0
                }
            }
        });

        let result = BusinessLogicValidator
            .validate(scenarios.as_object().expect("object"))
            .expect("validate");
        assert_eq!(result.status, ValidationStatus::Passed);
    }

    #[test]
    fn mismatched_invoice_total_fails() {
        let scenarios = json!({
            "invoice_rules": {
                "invoice_calculation": {
                    "line_items": [{"total": 600.0}],
                    "expected_total": 1000.0
                }
            }
        });

        let result = BusinessLogicValidator
            .validate(scenarios.as_object().expect("object"))
            .expect("validate");
        assert_eq!(result.status, ValidationStatus::Failed);
    }

    #[test]
    fn negative_amount_expected_invalid_passes_the_rule() {
        let scenarios = json!({
            "amount_rules": {
                "amount_validation": [
                    {"amount": 1000.0, "expected_valid": true},
                    {"amount": -50.0, "expected_valid": false}
                ]
            }
        });

        let result = BusinessLogicValidator
            .validate(scenarios.as_object().expect("object"))
            .expect("validate");
        assert_eq!(result.status, ValidationStatus::Passed);
    }

    #[test]
    fn rejected_transition_marked_expected_valid_fails() {
        let scenarios = json!({
            "transition_rules": {
                "status_transitions": [
                    {"from_status": "completed", "to_status": "draft", "expected_valid": true}
                ]
            }
        });

        let result = BusinessLogicValidator
            .validate(scenarios.as_object().expect("object"))
            .expect("validate");
        assert_eq!(result.status, ValidationStatus::Failed);

        let details = result.details.expect("details");
        assert_eq!(
            details["rule_sets"][0]["failed_rules"][0],
            "status_transitions"
        );
    }
}
