use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::info;

use crate::factory::{ContractRecord, DocumentRecord, InvoiceRecord, UserRecord};

pub type Dataset = BTreeMap<String, Value>;

pub trait DatasetStore {
    fn get_validation_dataset(&self, name: &str) -> Result<Option<Dataset>>;
}

pub struct FileDatasetStore {
    directory: PathBuf,
}

impl FileDatasetStore {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }
}

impl DatasetStore for FileDatasetStore {
    fn get_validation_dataset(&self, name: &str) -> Result<Option<Dataset>> {
        let path = self.directory.join(format!("{name}.json"));
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read(&path)
            .with_context(|| format!("failed to read dataset: {}", path.display()))?;
        let dataset: Dataset = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse dataset: {}", path.display()))?;

        info!(path = %path.display(), categories = dataset.len(), "loaded validation dataset");
        Ok(Some(dataset))
    }
}

#[derive(Default)]
pub struct MemoryDatasetStore {
    datasets: BTreeMap<String, Dataset>,
}

#[allow(dead_code)]
impl MemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_validation_dataset(&mut self, name: &str, dataset: Dataset) {
        info!(name, categories = dataset.len(), "validation dataset created");
        self.datasets.insert(name.to_string(), dataset);
    }

    pub fn list_validation_datasets(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }

    pub fn delete_validation_dataset(&mut self, name: &str) -> bool {
        let removed = self.datasets.remove(name).is_some();
        if removed {
            info!(name, "validation dataset deleted");
        }
        removed
    }
}

impl DatasetStore for MemoryDatasetStore {
    fn get_validation_dataset(&self, name: &str) -> Result<Option<Dataset>> {
        Ok(self.datasets.get(name).cloned())
    }
}

pub fn mock_dataset() -> Dataset {
    let contract = ContractRecord::sample();
    let invoice = InvoiceRecord::sample();
    let document = DocumentRecord::sample();
    let admin = UserRecord::sample();

    let mut dataset = Dataset::new();

    dataset.insert(
        "end_to_end_workflow".to_string(),
        json!({
            "contract_management_workflow": {
                "steps": [
                    {
                        "step": "create_user",
                        "data": {
                            "username": admin.username,
                            "email": admin.email,
                            "role": admin.role
                        },
                        "expected_result": {"status": "created"}
                    },
                    {
                        "step": "create_contract",
                        "data": {
                            "contract_id": contract.contract_id,
                            "title": contract.title,
                            "vendor": contract.vendor,
                            "amount": contract.amount,
                            "currency": contract.currency,
                            "start_date": "2025-01-01",
                            "end_date": "2025-12-31"
                        },
                        "expected_result": {"status": "created"}
                    },
                    {
                        "step": "create_invoice",
                        "data": {
                            "invoice_id": invoice.invoice_id,
                            "contract_id": invoice.contract_id,
                            "amount": invoice.amount
                        },
                        "expected_result": {"status": "created"}
                    },
                    {
                        "step": "upload_document",
                        "data": {
                            "document_id": document.document_id,
                            "filename": document.filename,
                            "file_size": document.file_size
                        },
                        "expected_result": {"status": "uploaded"}
                    }
                ]
            }
        }),
    );

    dataset.insert(
        "data_flow_scenarios".to_string(),
        json!({
            "contract_data_flow": {
                "input": {"raw_data": {"title": "Test Contract", "amount": "1000.00"}},
                "processing": {"validation": true, "transformation": true},
                "output": {"contract_id": "CF-001", "status": "active"}
            }
        }),
    );

    dataset.insert(
        "business_logic_scenarios".to_string(),
        json!({
            "contract_validation_rules": {
                "amount_validation": [
                    {"amount": 1000.0, "expected_valid": true},
                    {"amount": -50.0, "expected_valid": false}
                ],
                "invoice_calculation": {
                    "line_items": [{"total": 600.0}, {"total": 400.0}],
                    "expected_total": 1000.0
                },
                "status_transitions": [
                    {"from_status": "draft", "to_status": "under_review", "expected_valid": true},
                    {"from_status": "completed", "to_status": "draft", "expected_valid": false}
                ]
            }
        }),
    );

    dataset.insert(
        "integration_scenarios".to_string(),
        json!({
            "database_integration": {
                "contract_operations": {
                    "create": {
                        "data": {"contract_id": "INT-CONTRACT-001"},
                        "expected_result": {"id": 1}
                    }
                }
            }
        }),
    );

    dataset.insert(
        "user_workflow_scenarios".to_string(),
        json!({
            "admin_workflows": {
                "contract_management": {
                    "user_role": admin.role,
                    "workflow_steps": ["create_contract", "approve_contract"],
                    "expected_success": true
                }
            },
            "viewer_workflows": {
                "contract_editing": {
                    "user_role": "viewer",
                    "workflow_steps": ["update_contract"],
                    "expected_success": false
                }
            }
        }),
    );

    dataset.insert(
        "error_handling_scenarios".to_string(),
        json!({
            "validation_errors": {
                "missing_required_fields": {
                    "input": {"title": "Test"},
                    "expected_error": "validation_error",
                    "expected_status": 422
                }
            }
        }),
    );

    dataset.insert(
        "performance_scenarios".to_string(),
        json!({
            "response_time_scenarios": {
                "contract_operations": {
                    "create_contract": {"max_response_time": 2.0, "iterations": 10}
                }
            }
        }),
    );

    dataset.insert(
        "security_scenarios".to_string(),
        json!({
            "authentication_scenarios": {
                "valid_credentials": {
                    "username": admin.username,
                    "password": "password",
                    "expected_result": "authenticated"
                }
            }
        }),
    );

    dataset.insert(
        "data_consistency_scenarios".to_string(),
        json!({
            "referential_integrity": {
                "contract_invoice_relationship": {
                    "contract": {"contract_id": "CONS-CONTRACT-001"},
                    "invoices": [
                        {"invoice_id": "CONS-INV-001", "contract_id": "CONS-CONTRACT-001"}
                    ],
                    "expected_consistency": true
                }
            }
        }),
    );

    dataset
}
