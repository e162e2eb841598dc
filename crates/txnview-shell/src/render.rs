//! Text rendering of the view

use std::fmt::Write;
use txnview_config::DisplayConfig;
use txnview_core::surface::{self, SELECTOR_LABEL, SELECTOR_LOADING_LABEL, VIEW_MORE_LABEL};
use txnview_core::{SelectorView, Transaction, ViewMode, ViewMore, ViewState};
use txnview_utils::{format_amount, format_number};

use crate::command::ALL_KEYWORD;

const MERCHANT_WIDTH: usize = 24;
const AMOUNT_WIDTH: usize = 14;

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    display: DisplayConfig,
}

impl Renderer {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    /// Full view: selector header, transaction list, view-more control
    pub fn screen(&self, state: &ViewState) -> String {
        let mut out = self.selector_header(&surface::selector(state));
        out.push('\n');
        out.push_str(&self.transactions(state.mode, state.displayed()));
        if let Some(control) = self.view_more(surface::view_more(state)) {
            out.push('\n');
            out.push_str(&control);
        }
        out
    }

    pub fn selector_header(&self, view: &SelectorView) -> String {
        if view.is_loading {
            format!("{}: {}...", SELECTOR_LABEL, SELECTOR_LOADING_LABEL)
        } else if view.options.is_empty() {
            format!("{}: (no employees loaded)", SELECTOR_LABEL)
        } else {
            format!("{}: {} options (`employees` to list)", SELECTOR_LABEL, view.options.len())
        }
    }

    /// Selector options, one per line, value first
    pub fn selector_options(&self, view: &SelectorView) -> String {
        let mut out = self.selector_header(view);
        for option in &view.options {
            let value = if option.value.is_empty() { ALL_KEYWORD } else { option.value.as_str() };
            let _ = write!(out, "\n  {:<12} {}", value, option.label);
        }
        out
    }

    pub fn transactions(&self, mode: ViewMode, displayed: Option<&[Transaction]>) -> String {
        let Some(transactions) = displayed else {
            return "Loading...".to_string();
        };

        let scope = match mode {
            ViewMode::TransactionsByEmployee => "by employee",
            _ => "all employees",
        };
        let mut out = format!(
            "Transactions ({}): {}",
            scope,
            format_number(transactions.len(), &self.display.thousands_separator)
        );
        if transactions.is_empty() {
            out.push_str("\n  No transactions");
        }
        for transaction in transactions {
            out.push_str("\n  ");
            out.push_str(&self.transaction_line(transaction));
        }
        out
    }

    pub fn transaction_line(&self, transaction: &Transaction) -> String {
        let amount = format_amount(
            transaction.amount,
            &self.display.currency_symbol,
            self.display.decimal_places,
            &self.display.thousands_separator,
        );
        let mut line = format!(
            "{}  {:<mw$}  {:>aw$}  {}",
            self.date(transaction),
            truncate(&transaction.merchant, MERCHANT_WIDTH),
            amount,
            transaction.employee.label(),
            mw = MERCHANT_WIDTH,
            aw = AMOUNT_WIDTH,
        );
        if self.display.show_approval {
            line.push_str(if transaction.approved { "  [approved]" } else { "  [pending]" });
        }
        line
    }

    pub fn view_more(&self, control: ViewMore) -> Option<String> {
        match control {
            ViewMore::Hidden => None,
            ViewMore::Enabled => Some(format!("[{}] (`more`)", VIEW_MORE_LABEL)),
            ViewMore::Disabled => Some(format!("[{}] (loading)", VIEW_MORE_LABEL)),
        }
    }

    fn date(&self, transaction: &Transaction) -> String {
        let mut out = String::new();
        // chrono reports a bad format string as a fmt error
        if write!(out, "{}", transaction.date.format(&self.display.date_format)).is_err() {
            return transaction.date.to_string();
        }
        out
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use txnview_core::{Employee, SelectorOption};

    fn transaction(approved: bool) -> Transaction {
        Transaction {
            id: "t1".to_string(),
            amount: Decimal::new(123450, 2),
            employee: Employee::new("e1", "Ann", "Lee"),
            merchant: "Blue Bottle Coffee".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 9).unwrap(),
            approved,
        }
    }

    #[test]
    fn test_transaction_line() {
        let line = Renderer::default().transaction_line(&transaction(true));
        assert!(line.starts_with("2024-02-09  Blue Bottle Coffee"));
        assert!(line.contains("$1,234.50"));
        assert!(line.contains("Ann Lee"));
        assert!(line.ends_with("[approved]"));
    }

    #[test]
    fn test_display_settings_applied() {
        let renderer = Renderer::new(DisplayConfig {
            currency_symbol: "€".to_string(),
            decimal_places: 0,
            thousands_separator: ".".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            show_approval: false,
        });
        let line = renderer.transaction_line(&transaction(false));
        assert!(line.starts_with("09/02/2024"));
        assert!(line.contains("€1.235"));
        assert!(!line.contains("pending"));
    }

    #[test]
    fn test_bad_date_format_falls_back() {
        let renderer = Renderer::new(DisplayConfig {
            date_format: "%Q".to_string(),
            ..DisplayConfig::default()
        });
        assert!(renderer.transaction_line(&transaction(false)).starts_with("2024-02-09"));
    }

    #[test]
    fn test_transactions_null_renders_loading() {
        let renderer = Renderer::default();
        assert_eq!(renderer.transactions(ViewMode::AllTransactions, None), "Loading...");

        let empty = renderer.transactions(ViewMode::TransactionsByEmployee, Some(&[][..]));
        assert!(empty.contains("by employee"));
        assert!(empty.contains("No transactions"));
    }

    #[test]
    fn test_transaction_count_grouped() {
        let many = vec![transaction(false); 1234];
        let rendered = Renderer::default().transactions(ViewMode::AllTransactions, Some(many.as_slice()));
        assert!(rendered.starts_with("Transactions (all employees): 1,234\n"));
    }

    #[test]
    fn test_selector_rendering() {
        let renderer = Renderer::default();
        let loading = SelectorView { options: vec![], is_loading: true };
        assert_eq!(renderer.selector_header(&loading), "Filter by employee: Loading employees...");

        let view = SelectorView {
            options: vec![
                SelectorOption { value: "".to_string(), label: "All Employees".to_string() },
                SelectorOption { value: "e1".to_string(), label: "Ann Lee".to_string() },
            ],
            is_loading: false,
        };
        let listed = renderer.selector_options(&view);
        assert!(listed.contains("all          All Employees"));
        assert!(listed.contains("e1           Ann Lee"));
    }

    #[test]
    fn test_view_more_control() {
        let renderer = Renderer::default();
        assert_eq!(renderer.view_more(ViewMore::Hidden), None);
        assert_eq!(renderer.view_more(ViewMore::Enabled), Some("[View More] (`more`)".to_string()));
        assert_eq!(renderer.view_more(ViewMore::Disabled), Some("[View More] (loading)".to_string()));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long merchant name", 10), "a very ...");
    }
}
