//! Fixture file format and employee resolution

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use txnview_core::{Employee, Transaction};

use crate::error::{FixtureError, FixtureResult};

/// Transaction as stored on disk; the employee is a reference by id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub amount: Decimal,
    pub employee_id: String,
    pub merchant: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    employees: Vec<Employee>,
    #[serde(default)]
    transactions: Vec<TransactionRecord>,
}

/// Employees and fully resolved transactions, in file order
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub employees: Vec<Employee>,
    pub transactions: Vec<Transaction>,
}

impl Dataset {
    /// Read and resolve a fixture file
    pub async fn load(path: &Path) -> FixtureResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|source| FixtureError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_json(&content)?;
        log::info!(
            target: "txnview::fixtures",
            "Loaded {} employees and {} transactions from {}",
            dataset.employees.len(),
            dataset.transactions.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_json(content: &str) -> FixtureResult<Self> {
        let file: FixtureFile = serde_json::from_str(content)?;
        Self::resolve(file.employees, file.transactions)
    }

    /// Attach each record's employee, rejecting dangling references and
    /// duplicate ids
    pub fn resolve(employees: Vec<Employee>, records: Vec<TransactionRecord>) -> FixtureResult<Self> {
        let mut by_id: HashMap<&str, &Employee> = HashMap::with_capacity(employees.len());
        for employee in &employees {
            if employee.id.is_empty() {
                return Err(FixtureError::ReservedEmployeeId);
            }
            if by_id.insert(employee.id.as_str(), employee).is_some() {
                return Err(FixtureError::DuplicateId {
                    kind: "employee",
                    id: employee.id.clone(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(records.len());
        let mut transactions = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id.clone()) {
                return Err(FixtureError::DuplicateId {
                    kind: "transaction",
                    id: record.id,
                });
            }

            let employee = match by_id.get(record.employee_id.as_str()) {
                Some(employee) => (*employee).clone(),
                None => {
                    return Err(FixtureError::UnknownEmployee {
                        transaction_id: record.id,
                        employee_id: record.employee_id,
                    })
                }
            };

            transactions.push(Transaction {
                id: record.id,
                amount: record.amount,
                employee,
                merchant: record.merchant,
                date: record.date,
                approved: record.approved,
            });
        }

        Ok(Self { employees, transactions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "employees": [
            { "id": "e1", "firstName": "Ann", "lastName": "Lee" },
            { "id": "e2", "firstName": "Bo", "lastName": "Ng" }
        ],
        "transactions": [
            { "id": "t1", "amount": 12.5, "employeeId": "e2", "merchant": "Uber", "date": "2024-02-01", "approved": true },
            { "id": "t2", "amount": "830.00", "employeeId": "e1", "merchant": "Delta", "date": "2024-02-03" }
        ]
    }"#;

    #[test]
    fn test_resolves_employee_references() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(dataset.employees.len(), 2);

        let first = &dataset.transactions[0];
        assert_eq!(first.employee, Employee::new("e2", "Bo", "Ng"));
        assert_eq!(first.amount, Decimal::new(125, 1));
        assert!(first.approved);

        let second = &dataset.transactions[1];
        assert_eq!(second.employee.id, "e1");
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
        assert!(!second.approved);
    }

    #[test]
    fn test_unknown_employee_rejected() {
        let json = r#"{
            "employees": [{ "id": "e1", "firstName": "Ann", "lastName": "Lee" }],
            "transactions": [{ "id": "t1", "amount": 1, "employeeId": "nobody", "merchant": "X", "date": "2024-01-01" }]
        }"#;
        match Dataset::from_json(json) {
            Err(FixtureError::UnknownEmployee { transaction_id, employee_id }) => {
                assert_eq!(transaction_id, "t1");
                assert_eq!(employee_id, "nobody");
            }
            other => panic!("expected UnknownEmployee, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let employees = vec![Employee::new("e1", "Ann", "Lee"), Employee::new("e1", "Ann", "Again")];
        assert!(matches!(
            Dataset::resolve(employees, vec![]),
            Err(FixtureError::DuplicateId { kind: "employee", .. })
        ));

        let json = r#"{
            "employees": [{ "id": "e1", "firstName": "Ann", "lastName": "Lee" }],
            "transactions": [
                { "id": "t1", "amount": 1, "employeeId": "e1", "merchant": "X", "date": "2024-01-01" },
                { "id": "t1", "amount": 2, "employeeId": "e1", "merchant": "Y", "date": "2024-01-02" }
            ]
        }"#;
        assert!(matches!(
            Dataset::from_json(json),
            Err(FixtureError::DuplicateId { kind: "transaction", .. })
        ));
    }

    #[test]
    fn test_sentinel_id_reserved() {
        let employees = vec![Employee::empty()];
        assert!(matches!(Dataset::resolve(employees, vec![]), Err(FixtureError::ReservedEmployeeId)));
    }

    #[test]
    fn test_bundled_fixture_resolves() {
        let dataset = Dataset::from_json(include_str!("../../../fixtures/data.json")).unwrap();
        assert!(!dataset.employees.is_empty());
        assert!(dataset.transactions.len() > 5);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Dataset::from_json("{ not json"), Err(FixtureError::InvalidJson(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::load(file.path()).await.unwrap();
        assert_eq!(dataset.transactions.len(), 2);

        let missing = Dataset::load(Path::new("/nonexistent/txnview/data.json")).await;
        assert!(matches!(missing, Err(FixtureError::IoError { .. })));
    }
}
