use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ContractRecord {
    pub contract_id: String,
    pub title: String,
    pub vendor: String,
    pub amount: f64,
    pub currency: String,
}

impl ContractRecord {
    pub fn sample() -> Self {
        Self {
            contract_id: "MOCK-CONTRACT-001".to_string(),
            title: "Mock Test Contract".to_string(),
            vendor: "Mock Vendor".to_string(),
            amount: 10_000.0,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRecord {
    pub invoice_id: String,
    pub contract_id: String,
    pub amount: f64,
}

impl InvoiceRecord {
    pub fn sample() -> Self {
        Self {
            invoice_id: "MOCK-INV-001".to_string(),
            contract_id: "MOCK-CONTRACT-001".to_string(),
            amount: 2_500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub document_id: String,
    pub filename: String,
    pub file_size: u64,
}

impl DocumentRecord {
    pub fn sample() -> Self {
        Self {
            document_id: "MOCK-DOC-001".to_string(),
            filename: "contract_signed.pdf".to_string(),
            file_size: 48_128,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub role: String,
}

impl UserRecord {
    pub fn sample() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
        }
    }
}

pub fn sanitize_string(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| !ch.is_control())
        .collect()
}

pub fn is_valid_email(value: &str) -> bool {
    static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email pattern is a valid regex")
    });
    pattern.is_match(value)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::{
        ContractRecord, InvoiceRecord, UserRecord, is_valid_email, parse_date, sanitize_string,
    };

    #[test]
    fn sanitize_string_trims_and_strips_control_characters() {
        assert_eq!(sanitize_string("  Mock\tVendor\n "), "MockVendor");
        assert_eq!(sanitize_string("plain"), "plain");
        assert_eq!(sanitize_string(""), "");
    }

    #[test]
    fn email_validation_accepts_well_formed_addresses() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
    }

    #[test]
    fn email_validation_rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
    }

    #[test]
    fn parse_date_handles_iso_dates_and_rejects_garbage() {
        let date = parse_date("2025-03-14").expect("valid date");
        assert_eq!(date.to_string(), "2025-03-14");
        assert!(parse_date(" 2025-03-14 ").is_some());
        assert!(parse_date("14/03/2025").is_none());
        assert!(parse_date("2025-13-40").is_none());
    }

    #[test]
    fn sample_records_are_internally_consistent() {
        let contract = ContractRecord::sample();
        let invoice = InvoiceRecord::sample();
        assert_eq!(invoice.contract_id, contract.contract_id);
        assert!(contract.amount > 0.0);

        let user = UserRecord::sample();
        assert!(is_valid_email(&user.email));
    }
}
