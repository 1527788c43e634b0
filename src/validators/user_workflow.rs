use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::model::ValidationResult;

use super::Validator;

pub struct UserWorkflowValidator;

impl Validator for UserWorkflowValidator {
    fn name(&self) -> &'static str {
        "user_workflow"
    }

    fn category(&self) -> &'static str {
        "user_workflow_scenarios"
    }

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult> {
        if scenarios.is_empty() {
            return Ok(ValidationResult::skipped(
                "no user workflow scenarios provided",
            ));
        }

        let mut reports = Vec::new();
        let mut failures = 0_usize;

        for (group_name, group) in scenarios {
            let Some(workflows) = group.as_object() else {
                failures += 1;
                reports.push(json!({
                    "group": group_name,
                    "status": "failed",
                    "message": "workflow group is not an object",
                }));
                continue;
            };

            for (workflow_name, workflow) in workflows {
                let report = validate_workflow(group_name, workflow_name, workflow);
                if report["status"] != "passed" {
                    failures += 1;
                }
                reports.push(report);
            }
        }

        let result = if failures == 0 {
            ValidationResult::passed(format!("{} user workflows validated", reports.len()))
        } else {
            ValidationResult::failed(format!(
                "{failures} of {} user workflows failed",
                reports.len()
            ))
        };

        Ok(result.with_details(json!({ "workflows": reports })))
    }
}

fn validate_workflow(group_name: &str, workflow_name: &str, workflow: &Value) -> Value {
    let user_role = workflow
        .get("user_role")
        .and_then(Value::as_str)
        .unwrap_or("user");
    let expected_success = workflow
        .get("expected_success")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let steps = workflow
        .get("workflow_steps")
        .or_else(|| workflow.get("steps"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let denied: Vec<String> = steps
        .iter()
        .filter_map(Value::as_str)
        .filter(|step| !step_allowed_for_role(step, user_role))
        .map(ToOwned::to_owned)
        .collect();

    let workflow_success = denied.is_empty();
    let status = if workflow_success == expected_success {
        "passed"
    } else {
        "failed"
    };

    json!({
        "group": group_name,
        "workflow": workflow_name,
        "user_role": user_role,
        "status": status,
        "denied_steps": denied,
        "expected_success": expected_success,
    })
}

// A step like "approve_contract" is gated on its leading verb.
fn step_allowed_for_role(step: &str, role: &str) -> bool {
    let permissions: &[&str] = match role {
        "admin" => &["create", "read", "update", "delete", "approve"],
        "user" => &["create", "read", "update"],
        _ => &["read"],
    };

    let verb = step.split('_').next().unwrap_or(step);
    permissions.contains(&verb)
}
