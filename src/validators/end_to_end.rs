use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::factory::{is_valid_email, parse_date, sanitize_string};
use crate::model::ValidationResult;

use super::Validator;

const CONTRACT_REQUIRED_FIELDS: &[&str] = &["contract_id", "title", "vendor", "amount"];
const INVOICE_REQUIRED_FIELDS: &[&str] = &["invoice_id", "contract_id", "amount"];
const DOCUMENT_REQUIRED_FIELDS: &[&str] = &["document_id", "filename", "file_size"];
const USER_REQUIRED_FIELDS: &[&str] = &["username", "email", "role"];

pub struct EndToEndValidator;

impl Validator for EndToEndValidator {
    fn name(&self) -> &'static str {
        "end_to_end"
    }

    fn category(&self) -> &'static str {
        "end_to_end_workflow"
    }

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult> {
        if scenarios.is_empty() {
            return Ok(ValidationResult::skipped("no end-to-end workflows provided"));
        }

        let mut step_reports = Vec::new();
        let mut failed_steps = 0_usize;

        for (workflow_name, workflow) in scenarios {
            let steps = workflow
                .get("steps")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            for (index, step) in steps.iter().enumerate() {
                let report = validate_step(workflow_name, step, index);
                if report["status"] != "passed" {
                    failed_steps += 1;
                }
                step_reports.push(report);
            }
        }

        let total_steps = step_reports.len();
        let mut metrics = BTreeMap::new();
        metrics.insert("steps_total".to_string(), total_steps as f64);
        metrics.insert("steps_failed".to_string(), failed_steps as f64);

        let result = if failed_steps == 0 {
            ValidationResult::passed(format!(
                "all {total_steps} workflow steps completed successfully"
            ))
        } else {
            ValidationResult::failed(format!(
                "{failed_steps} of {total_steps} workflow steps failed"
            ))
        };

        Ok(result
            .with_details(json!({ "validation_steps": step_reports }))
            .with_metrics(metrics))
    }
}

fn validate_step(workflow_name: &str, step: &Value, index: usize) -> Value {
    let step_name = step
        .get("step")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| format!("step_{index}"));

    let data = step.get("data").and_then(Value::as_object);

    let required: &[&str] = match step_name.as_str() {
        "create_contract" => CONTRACT_REQUIRED_FIELDS,
        "create_invoice" => INVOICE_REQUIRED_FIELDS,
        "upload_document" => DOCUMENT_REQUIRED_FIELDS,
        "create_user" => USER_REQUIRED_FIELDS,
        _ => &[],
    };

    if let Some(missing) = first_missing_field(data, required) {
        return json!({
            "workflow": workflow_name,
            "step": step_name,
            "status": "failed",
            "message": format!("missing required field: {missing}"),
        });
    }

    if let Some(problem) = field_quality_problem(&step_name, data) {
        return json!({
            "workflow": workflow_name,
            "step": step_name,
            "status": "failed",
            "message": problem,
        });
    }

    json!({
        "workflow": workflow_name,
        "step": step_name,
        "status": "passed",
        "message": format!("step {step_name} completed successfully"),
    })
}

fn field_quality_problem(step_name: &str, data: Option<&Map<String, Value>>) -> Option<String> {
    let data = data?;

    for (field, value) in data {
        if let Some(text) = value.as_str()
            && sanitize_string(text).is_empty()
        {
            return Some(format!("field {field} is blank after sanitization"));
        }
    }

    if step_name == "create_user"
        && let Some(email) = data.get("email").and_then(Value::as_str)
        && !is_valid_email(email)
    {
        return Some(format!("invalid email address: {email}"));
    }

    let start = match data.get("start_date").and_then(Value::as_str) {
        Some(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => return Some(format!("unparseable start_date: {raw}")),
        },
        None => None,
    };
    let end = match data.get("end_date").and_then(Value::as_str) {
        Some(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => return Some(format!("unparseable end_date: {raw}")),
        },
        None => None,
    };
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Some("start_date is after end_date".to_string());
    }

    None
}

fn first_missing_field<'a>(
    data: Option<&Map<String, Value>>,
    required: &'a [&'a str],
) -> Option<&'a str> {
    if required.is_empty() {
        return None;
    }

    match data {
        Some(data) => required.iter().find(|field| !data.contains_key(**field)).copied(),
        None => required.first().copied(),
    }
}
