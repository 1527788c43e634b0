use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::cli::ValidateArgs;
use crate::config::{AutomationSettings, ValidationConfig};
use crate::dataset::{Dataset, DatasetStore, FileDatasetStore, mock_dataset};
use crate::model::{RunResult, ValidationResult};
use crate::report::generate_report;
use crate::util::{now_utc_string, report_path_for, write_json_pretty};
use crate::validators::{Validator, registry};

pub struct ValidationRunner {
    config: ValidationConfig,
    store: Option<Box<dyn DatasetStore>>,
    validators: BTreeMap<&'static str, Box<dyn Validator>>,
}

impl ValidationRunner {
    pub fn new(config: ValidationConfig) -> Self {
        let store = config
            .dataset
            .directory
            .clone()
            .map(|dir| Box::new(FileDatasetStore::new(dir)) as Box<dyn DatasetStore>);
        Self::with_store(config, store)
    }

    pub fn with_store(config: ValidationConfig, store: Option<Box<dyn DatasetStore>>) -> Self {
        Self {
            config,
            store,
            validators: registry(),
        }
    }

    pub fn run(&self) -> RunResult {
        let timestamp = now_utc_string();

        let dataset = match self.load_dataset() {
            Ok(Some(dataset)) => dataset,
            Ok(None) => {
                warn!("no validation dataset available; producing empty result set");
                return RunResult::empty(timestamp);
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "dataset loading aborted the run");
                return RunResult::aborted(timestamp, format!("{err:#}"));
            }
        };

        let mut validations = BTreeMap::new();

        for validation_type in self.config.validations.keys() {
            if !self.config.is_enabled(validation_type) {
                continue;
            }

            let Some(validator) = self.validators.get(validation_type.as_str()) else {
                info!(
                    validation_type,
                    "enabled validation has no registered validator; recording a skip"
                );
                validations.insert(
                    validation_type.clone(),
                    ValidationResult::skipped(format!(
                        "no validator registered for {validation_type}"
                    )),
                );
                continue;
            };

            // Absent scenario-categories still reach the validator as an
            // empty mapping.
            let scenarios = dataset
                .get(validator.category())
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            info!(
                validation_type,
                category = validator.category(),
                scenarios = scenarios.len(),
                "running validation"
            );

            let start = Instant::now();
            let mut result = match validator.validate(&scenarios) {
                Ok(result) => result,
                Err(err) => {
                    error!(
                        validation_type,
                        error = %format!("{err:#}"),
                        "validator failed; continuing with remaining validations"
                    );
                    ValidationResult::error(format!("{err:#}"))
                }
            };
            result.duration_ms = start.elapsed().as_millis() as u64;

            validations.insert(validation_type.clone(), result);
        }

        let run = RunResult::from_validations(timestamp, validations);

        if self.config.automation.enabled {
            configure_automation(&self.config.automation);
        }

        info!(
            total = run.summary.total_validations,
            passed = run.summary.passed_validations,
            failed = run.summary.failed_validations,
            overall = %run.summary.overall_status,
            "functionality validations completed"
        );

        run
    }

    fn load_dataset(&self) -> Result<Option<Dataset>> {
        if let Some(store) = &self.store
            && let Some(dataset) = store.get_validation_dataset(&self.config.dataset.name)?
        {
            return Ok(Some(dataset));
        }

        if self.config.dataset.fallback_to_mock {
            info!(
                name = %self.config.dataset.name,
                "dataset not found in store; synthesizing mock validation data"
            );
            return Ok(Some(mock_dataset()));
        }

        Ok(None)
    }
}

fn configure_automation(settings: &AutomationSettings) {
    info!(
        schedule = %settings.schedule,
        time = %settings.time,
        notifications = settings.notifications.len(),
        "validation automation configured"
    );
}

pub fn save_results<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    write_json_pretty(path, value)?;
    info!(path = %path.display(), "results saved");
    Ok(())
}

pub fn run(args: ValidateArgs) -> Result<ExitCode> {
    if let Some(validation_type) = &args.validation_type {
        warn!(
            validation_type,
            "single-validation filtering is not implemented; running all enabled validations"
        );
    }

    let config = ValidationConfig::load(args.config.as_deref());
    let runner = ValidationRunner::new(config);

    let results = runner.run();
    let report = generate_report(&results.validations, args.report_type);

    save_results(&results, &args.output)?;
    save_results(&report, &report_path_for(&args.output))?;

    print_summary(&results)?;

    if results.summary.is_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn print_summary(results: &RunResult) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    let summary = &results.summary;

    writeln!(output)?;
    writeln!(output, "Functionality Validation Summary:")?;
    writeln!(output, "Total Validations: {}", summary.total_validations)?;
    writeln!(output, "Passed: {}", summary.passed_validations)?;
    writeln!(output, "Failed: {}", summary.failed_validations)?;
    writeln!(output, "Success Rate: {:.2}%", summary.success_rate * 100.0)?;

    if let Some(error) = &results.error {
        writeln!(output, "Run error: {error}")?;
    }

    writeln!(output)?;
    if summary.is_passed() {
        writeln!(output, "All functionality validations completed successfully")?;
    } else {
        writeln!(output, "VALIDATION FAILURES DETECTED - REVIEW REQUIRED")?;
    }
    output.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow, bail};
    use serde_json::{Map, Value, json};

    use crate::config::{VALIDATION_TYPES, ValidationConfig};
    use crate::dataset::{Dataset, DatasetStore, MemoryDatasetStore, mock_dataset};
    use crate::model::{ValidationResult, ValidationStatus};
    use crate::validators::Validator;

    use super::ValidationRunner;

    struct FailingStore;

    impl DatasetStore for FailingStore {
        fn get_validation_dataset(&self, _name: &str) -> Result<Option<Dataset>> {
            bail!("dataset store is unreachable")
        }
    }

    struct ExplodingValidator;

    impl Validator for ExplodingValidator {
        fn name(&self) -> &'static str {
            "data_flow"
        }

        fn category(&self) -> &'static str {
            "data_flow_scenarios"
        }

        fn validate(&self, _scenarios: &Map<String, Value>) -> Result<ValidationResult> {
            Err(anyhow!("simulated validator crash"))
        }
    }

    fn config_with(enabled: &[&str]) -> ValidationConfig {
        let mut config = ValidationConfig::default_config();
        for value in config.validations.values_mut() {
            *value = false;
        }
        for name in enabled {
            config.validations.insert(name.to_string(), true);
        }
        config
    }

    fn runner_with_mock_store(config: ValidationConfig) -> ValidationRunner {
        let mut store = MemoryDatasetStore::new();
        store.create_validation_dataset(&config.dataset.name, mock_dataset());
        ValidationRunner::with_store(config, Some(Box::new(store)))
    }

    #[test]
    fn full_mock_run_passes_all_nine_validations() {
        let runner = runner_with_mock_store(ValidationConfig::default_config());
        let results = runner.run();

        assert_eq!(results.summary.total_validations, VALIDATION_TYPES.len());
        assert!(results.summary.is_passed(), "results: {results:?}");
        assert!(results.error.is_none());
    }

    #[test]
    fn disabled_validation_types_never_appear_in_results() {
        let runner = runner_with_mock_store(config_with(&["end_to_end", "security"]));
        let results = runner.run();

        assert_eq!(results.summary.total_validations, 2);
        assert!(results.validations.contains_key("end_to_end"));
        assert!(results.validations.contains_key("security"));
        assert!(!results.validations.contains_key("data_flow"));
    }

    #[test]
    fn all_types_disabled_yields_empty_failed_run() {
        let runner = runner_with_mock_store(config_with(&[]));
        let results = runner.run();

        assert!(results.validations.is_empty());
        assert_eq!(results.summary.total_validations, 0);
        assert_eq!(results.summary.success_rate, 0.0);
        assert_eq!(results.summary.overall_status, "failed");
    }

    #[test]
    fn missing_scenario_category_still_dispatches_with_empty_mapping() {
        let mut dataset = mock_dataset();
        dataset.remove("security_scenarios");

        let mut store = MemoryDatasetStore::new();
        store.create_validation_dataset("comprehensive", dataset);

        let runner =
            ValidationRunner::with_store(config_with(&["security"]), Some(Box::new(store)));
        let results = runner.run();

        let security = results.validations.get("security").expect("security result");
        assert_eq!(security.status, ValidationStatus::Skipped);
    }

    #[test]
    fn one_erroring_validator_does_not_stop_the_others() {
        let config = config_with(&["data_flow", "end_to_end", "security"]);
        let mut store = MemoryDatasetStore::new();
        store.create_validation_dataset("comprehensive", mock_dataset());

        let mut runner = ValidationRunner::with_store(config, Some(Box::new(store)));
        runner
            .validators
            .insert("data_flow", Box::new(ExplodingValidator));

        let results = runner.run();
        assert_eq!(results.summary.total_validations, 3);

        let data_flow = results.validations.get("data_flow").expect("data_flow result");
        assert_eq!(data_flow.status, ValidationStatus::Error);
        assert!(
            data_flow
                .message
                .as_deref()
                .is_some_and(|message| message.contains("simulated validator crash"))
        );

        let end_to_end = results.validations.get("end_to_end").expect("end_to_end result");
        assert_eq!(end_to_end.status, ValidationStatus::Passed);
        assert_eq!(results.summary.overall_status, "failed");
    }

    #[test]
    fn enabled_type_without_registered_validator_records_a_skip() {
        let mut config = config_with(&[]);
        config.validations.insert("chaos".to_string(), true);

        let runner = runner_with_mock_store(config);
        let results = runner.run();

        let chaos = results.validations.get("chaos").expect("chaos result");
        assert_eq!(chaos.status, ValidationStatus::Skipped);
    }

    #[test]
    fn store_error_aborts_the_run_with_empty_validations() {
        let runner = ValidationRunner::with_store(
            ValidationConfig::default_config(),
            Some(Box::new(FailingStore)),
        );
        let results = runner.run();

        assert!(results.validations.is_empty());
        let error = results.error.expect("top-level error");
        assert!(error.contains("dataset store is unreachable"));
    }

    #[test]
    fn missing_dataset_with_fallback_disabled_produces_empty_run() {
        let mut config = ValidationConfig::default_config();
        config.dataset.fallback_to_mock = false;

        let runner =
            ValidationRunner::with_store(config, Some(Box::new(MemoryDatasetStore::new())));
        let results = runner.run();

        assert!(results.validations.is_empty());
        assert!(results.error.is_none());
    }

    #[test]
    fn missing_store_falls_back_to_synthesized_mock_data() {
        let runner = ValidationRunner::with_store(ValidationConfig::default_config(), None);
        let results = runner.run();

        assert_eq!(results.summary.total_validations, VALIDATION_TYPES.len());
        assert!(results.validations.contains_key("end_to_end"));
    }

    #[test]
    fn run_result_round_trips_through_json_file() {
        let runner = runner_with_mock_store(ValidationConfig::default_config());
        let results = runner.run();

        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("results.json");
        super::save_results(&results, &path).expect("save results");

        let raw = std::fs::read(&path).expect("read results");
        let reloaded: Value = serde_json::from_slice(&raw).expect("parse results");
        let original = serde_json::to_value(&results).expect("serialize results");
        assert_eq!(reloaded, original);
        assert_eq!(
            reloaded["summary"]["total_validations"],
            json!(VALIDATION_TYPES.len())
        );
    }
}
