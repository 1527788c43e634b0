use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::model::ValidationResult;

use super::{Validator, scenario_object};

pub struct DataFlowValidator;

impl Validator for DataFlowValidator {
    fn name(&self) -> &'static str {
        "data_flow"
    }

    fn category(&self) -> &'static str {
        "data_flow_scenarios"
    }

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult> {
        if scenarios.is_empty() {
            return Ok(ValidationResult::skipped("no data flow scenarios provided"));
        }

        let mut reports = Vec::new();
        let mut failures = 0_usize;

        for (scenario_name, scenario) in scenarios {
            let input_valid = stage_is_populated(scenario, "input");
            let processing_complete = stage_is_populated(scenario, "processing");
            let output_valid = stage_is_populated(scenario, "output");
            let data_integrity = input_valid && output_valid;

            let overall_success =
                input_valid && processing_complete && output_valid && data_integrity;
            if !overall_success {
                failures += 1;
            }

            reports.push(json!({
                "scenario": scenario_name,
                "input_valid": input_valid,
                "processing_complete": processing_complete,
                "output_valid": output_valid,
                "data_integrity": data_integrity,
                "overall_success": overall_success,
            }));
        }

        let result = if failures == 0 {
            ValidationResult::passed(format!(
                "data flowed through all {} scenarios intact",
                reports.len()
            ))
        } else {
            ValidationResult::failed(format!(
                "{failures} of {} data flow scenarios failed",
                reports.len()
            ))
        };

        Ok(result.with_details(json!({ "scenarios": reports })))
    }
}

fn stage_is_populated(scenario: &Value, stage: &str) -> bool {
    scenario
        .get(stage)
        .and_then(scenario_object)
        .is_some_and(|data| !data.is_empty())
}
