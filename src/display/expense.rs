//! Expense display formatting

use super::{separator, truncate};
use crate::models::{FixedExpense, Money, VariableExpense};
use crate::services::GenerationReport;

pub fn format_fixed_expense_list(expenses: &[FixedExpense], currency: &str) -> String {
    if expenses.is_empty() {
        return "No fixed expenses.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<30}  {:<8}  {:>12}  {:<10}  {:<10}  {}\n",
        "ID", "Description", "Every", "Amount", "Start", "End", "Category"
    ));
    output.push_str(&separator(100));
    output.push('\n');

    for e in expenses {
        output.push_str(&format!(
            "{:<12}  {:<30}  {:<8}  {:>12}  {:<10}  {:<10}  {}\n",
            e.id.to_string(),
            truncate(&e.description, 30),
            e.recurrence.to_string(),
            e.amount.format_with_symbol(currency),
            e.start_date.to_string(),
            e.end_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            e.category.as_deref().unwrap_or("")
        ));
    }

    output
}

/// Format dated expenses; generated records are marked with `*`
pub fn format_variable_expense_list(
    expenses: &[VariableExpense],
    currency: &str,
    generated_prefix: &str,
) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<12}  {:<10}  {:<34}  {:<16}  {:>12}\n",
        "ID", "Date", "Description", "Category", "Amount"
    ));
    output.push_str(&separator(94));
    output.push('\n');

    for e in expenses {
        let marker = if e.is_generated(generated_prefix) { "*" } else { " " };
        output.push_str(&format!(
            "{} {:<12}  {:<10}  {:<34}  {:<16}  {:>12}\n",
            marker,
            e.id.to_string(),
            e.date.to_string(),
            truncate(&e.description, 34),
            truncate(&e.category, 16),
            e.amount.format_with_symbol(currency)
        ));
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&separator(94));
    output.push('\n');
    output.push_str(&format!(
        "  {:<76}  {:>12}\n",
        "TOTAL",
        total.format_with_symbol(currency)
    ));

    output
}

/// Summarize a generator run
pub fn format_generation_report(report: &GenerationReport, currency: &str, dry_run: bool) -> String {
    let mut output = String::new();
    let verb = if dry_run { "Would create" } else { "Created" };

    output.push_str(&format!(
        "Recurring expenses as of {}: {} template(s) evaluated\n",
        report.as_of, report.evaluated
    ));

    for expense in &report.created {
        output.push_str(&format!(
            "  + {} {} ({})\n",
            expense.description,
            expense.amount.format_with_symbol(currency),
            expense.category
        ));
    }

    output.push_str(&format!("{} {} expense(s)", verb, report.created_count()));
    if !report.skipped_duplicates.is_empty() {
        output.push_str(&format!(
            ", {} already recorded this month",
            report.skipped_duplicates.len()
        ));
    }
    output.push('\n');

    if report.has_failures() {
        output.push_str(&format!("{} failure(s):\n", report.failures.len()));
        for failure in &report.failures {
            output.push_str(&format!(
                "  ! {} ({}): {}\n",
                failure.description, failure.fixed_expense_id, failure.error
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedExpenseId, PropertyId, Recurrence};
    use crate::services::GenerationFailure;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_list_open_ended() {
        let expense = FixedExpense::new(
            PropertyId::new(),
            "Affitto",
            Money::from_units(800),
            Recurrence::Monthly,
            date(2024, 1, 1),
        );
        let output = format_fixed_expense_list(&[expense], "€");
        assert!(output.contains("Monthly"));
        assert!(output.contains("€800.00"));
        assert!(output.contains("  -  "));
    }

    #[test]
    fn test_variable_list_marks_generated() {
        let generated = VariableExpense::new(
            PropertyId::new(),
            date(2024, 8, 1),
            "[Auto] Affitto",
            Money::from_units(800),
            "Monthly fixed",
        );
        let manual = VariableExpense::new(
            PropertyId::new(),
            date(2024, 8, 3),
            "Pulizie",
            Money::from_units(150),
            "Pulizie",
        );

        let output = format_variable_expense_list(&[generated, manual], "€", "[Auto]");
        let lines: Vec<_> = output.lines().collect();
        assert!(lines[2].starts_with('*'));
        assert!(lines[3].starts_with(' '));
        assert!(output.contains("€950.00"));
    }

    #[test]
    fn test_generation_report_summary() {
        let report = GenerationReport {
            as_of: date(2024, 8, 1),
            evaluated: 3,
            created: vec![VariableExpense::new(
                PropertyId::new(),
                date(2024, 8, 1),
                "[Auto] Affitto",
                Money::from_units(800),
                "Monthly fixed",
            )],
            skipped_duplicates: vec![FixedExpenseId::new()],
            failures: vec![GenerationFailure {
                fixed_expense_id: FixedExpenseId::new(),
                description: "Internet".into(),
                error: "disk full".into(),
            }],
        };

        let output = format_generation_report(&report, "€", true);
        assert!(output.contains("3 template(s) evaluated"));
        assert!(output.contains("Would create 1 expense(s), 1 already recorded this month"));
        assert!(output.contains("1 failure(s)"));
        assert!(output.contains("disk full"));
    }
}
