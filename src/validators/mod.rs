pub mod business_logic;
pub mod data_consistency;
pub mod data_flow;
pub mod end_to_end;
pub mod error_handling;
pub mod integration;
pub mod performance;
pub mod security;
pub mod user_workflow;

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::model::ValidationResult;

pub trait Validator {
    fn name(&self) -> &'static str;

    // Scenario-category key this validator consumes from the dataset.
    fn category(&self) -> &'static str;

    fn validate(&self, scenarios: &Map<String, Value>) -> Result<ValidationResult>;
}

pub fn registry() -> BTreeMap<&'static str, Box<dyn Validator>> {
    let validators: Vec<Box<dyn Validator>> = vec![
        Box::new(end_to_end::EndToEndValidator),
        Box::new(data_flow::DataFlowValidator),
        Box::new(business_logic::BusinessLogicValidator),
        Box::new(integration::IntegrationValidator),
        Box::new(user_workflow::UserWorkflowValidator),
        Box::new(error_handling::ErrorHandlingValidator),
        Box::new(performance::PerformanceValidator),
        Box::new(security::SecurityValidator),
        Box::new(data_consistency::DataConsistencyValidator),
    ];

    validators
        .into_iter()
        .map(|validator| (validator.name(), validator))
        .collect()
}

pub(crate) fn scenario_object<'a>(value: &'a Value) -> Option<&'a Map<String, Value>> {
    value.as_object()
}

#[cfg(test)]
mod tests {
    use crate::config::VALIDATION_TYPES;

    use super::registry;

    #[test]
    fn registry_covers_every_documented_validation_type() {
        let registry = registry();
        assert_eq!(registry.len(), VALIDATION_TYPES.len());
        for name in VALIDATION_TYPES {
            assert!(registry.contains_key(name), "missing validator for {name}");
        }
    }

    #[test]
    fn registry_categories_are_distinct() {
        let registry = registry();
        let mut categories: Vec<&str> = registry.values().map(|v| v.category()).collect();
        categories.sort_unstable();
        categories.dedup();
        assert_eq!(categories.len(), registry.len());
    }
}
