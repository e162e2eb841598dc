//! Core data models shared by the feeds and the view

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Employee entry from the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique employee identifier (empty for the "all employees" sentinel)
    pub id: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl Employee {
    /// Create an employee
    pub fn new(id: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// The "no filter" sentinel shown first in the selector
    pub fn empty() -> Self {
        Self::new("", "All", "Employees")
    }

    /// Check if this is the "no filter" sentinel
    pub fn is_empty_sentinel(&self) -> bool {
        self.id.is_empty()
    }

    /// Selector label: "{first_name} {last_name}"
    pub fn label(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: String,
    /// Signed amount
    pub amount: Decimal,
    /// Employee who made the transaction
    pub employee: Employee,
    /// Merchant name
    pub merchant: String,
    /// Transaction date
    pub date: NaiveDate,
    /// Approval flag
    pub approved: bool,
}

/// Opaque continuation token understood only by the paginated feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of the paginated feed
///
/// `next_page_cursor == None` marks the terminal page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub next_page_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, next_page_cursor: Option<Cursor>) -> Self {
        Self { data, next_page_cursor }
    }

    /// Check if more pages can be fetched after this one
    pub fn has_more(&self) -> bool {
        self.next_page_cursor.is_some()
    }
}

impl<T: Clone> Page<T> {
    /// Concatenate `next` after `self`, taking `next`'s cursor
    pub fn extended_with(&self, next: Page<T>) -> Page<T> {
        let mut data = Vec::with_capacity(self.data.len() + next.data.len());
        data.extend(self.data.iter().cloned());
        data.extend(next.data);
        Page {
            data,
            next_page_cursor: next.next_page_cursor,
        }
    }
}
