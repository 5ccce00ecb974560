//! Profit & Loss report
//!
//! Revenue, fixed and variable costs, and margin for one property over a
//! calendar month or year. Revenue counts a booking in the period its stay
//! starts. "Fixed" costs are the records materialized from fixed expense
//! templates; everything else is variable.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::error::{StayError, StayResult};
use crate::models::{Money, Property, PropertyId, ReportPeriod, UnitId};
use crate::storage::Storage;

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLine {
    pub category: String,
    pub amount: Money,
    pub count: usize,
    /// Share of total expenses
    pub percentage: f64,
}

/// Revenue for one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitRevenue {
    pub unit_id: UnitId,
    pub unit_name: String,
    pub bookings: usize,
    pub nights: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitLossReport {
    pub property_id: PropertyId,
    pub property_name: String,
    pub period: ReportPeriod,
    pub revenue: Money,
    pub fixed_expenses: Money,
    pub variable_expenses: Money,
    pub margin: Money,
    pub margin_percentage: f64,
    pub units: Vec<UnitRevenue>,
    pub categories: Vec<CategoryLine>,
}

impl ProfitLossReport {
    /// Build the report; `generated_prefix` tells generated records apart
    pub fn generate(
        storage: &Storage,
        property: &Property,
        period: ReportPeriod,
        generated_prefix: &str,
    ) -> StayResult<Self> {
        let period = period.checked().ok_or_else(|| {
            StayError::Validation(format!(
                "Period {} is outside the supported date range",
                period
            ))
        })?;

        let mut units = storage.units.filter(|u| u.property_id == property.id)?;
        units.sort_by(|a, b| a.name.cmp(&b.name));

        let mut unit_lines = Vec::with_capacity(units.len());
        for unit in &units {
            let bookings: Vec<_> = storage
                .bookings
                .get_by_unit(unit.id)?
                .into_iter()
                .filter(|b| period.contains(b.start_date))
                .collect();
            unit_lines.push(UnitRevenue {
                unit_id: unit.id,
                unit_name: unit.name.clone(),
                bookings: bookings.len(),
                nights: bookings.iter().map(|b| b.nights()).sum(),
                revenue: bookings.iter().map(|b| b.price).sum(),
            });
        }
        let revenue: Money = unit_lines.iter().map(|u| u.revenue).sum();

        let expenses = storage
            .variable_expenses
            .filter(|e| e.property_id == property.id && period.contains(e.date))?;

        let mut fixed_expenses = Money::zero();
        let mut variable_expenses = Money::zero();
        let mut by_category: BTreeMap<String, (Money, usize)> = BTreeMap::new();

        for expense in &expenses {
            if expense.is_generated(generated_prefix) {
                fixed_expenses += expense.amount;
            } else {
                variable_expenses += expense.amount;
            }

            let category = if expense.category.trim().is_empty() {
                "Uncategorized".to_string()
            } else {
                expense.category.clone()
            };
            let entry = by_category.entry(category).or_insert((Money::zero(), 0));
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        let total_expenses = fixed_expenses + variable_expenses;
        let mut categories: Vec<CategoryLine> = by_category
            .into_iter()
            .map(|(category, (amount, count))| CategoryLine {
                category,
                amount,
                count,
                percentage: amount.percent_of(total_expenses),
            })
            .collect();
        categories.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));

        let margin = revenue - total_expenses;

        Ok(Self {
            property_id: property.id,
            property_name: property.name.clone(),
            period,
            revenue,
            fixed_expenses,
            variable_expenses,
            margin,
            margin_percentage: margin.percent_of(revenue),
            units: unit_lines,
            categories,
        })
    }

    pub fn total_expenses(&self) -> Money {
        self.fixed_expenses + self.variable_expenses
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency);
        let mut output = String::new();

        output.push_str(&format!(
            "Profit & Loss: {} ({})\n",
            self.property_name, self.period
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<30} {:>15}\n", "Revenue", money(self.revenue)));
        output.push_str(&format!(
            "{:<30} {:>15}\n",
            "Fixed expenses",
            money(self.fixed_expenses)
        ));
        output.push_str(&format!(
            "{:<30} {:>15}\n",
            "Variable expenses",
            money(self.variable_expenses)
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>15} {:>8.1}%\n",
            "Margin",
            money(self.margin),
            self.margin_percentage
        ));

        if self.units.iter().any(|u| u.bookings > 0) {
            output.push_str(&format!(
                "\n{:<30} {:>8} {:>6} {:>15}\n",
                "Unit", "Stays", "Nights", "Revenue"
            ));
            for unit in self.units.iter().filter(|u| u.bookings > 0) {
                output.push_str(&format!(
                    "{:<30} {:>8} {:>6} {:>15}\n",
                    unit.unit_name,
                    unit.bookings,
                    unit.nights,
                    money(unit.revenue)
                ));
            }
        }

        if !self.categories.is_empty() {
            output.push_str(&format!(
                "\n{:<30} {:>15} {:>6} {:>6}\n",
                "Category", "Amount", "Count", "%"
            ));
            for line in &self.categories {
                output.push_str(&format!(
                    "{:<30} {:>15} {:>6} {:>5.1}%\n",
                    line.category,
                    money(line.amount),
                    line.count,
                    line.percentage
                ));
            }
        }

        output
    }

    /// Export the report as CSV: summary rows, then one row per category
    pub fn export_csv<W: Write>(&self, writer: W) -> StayResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let period = self.period.to_string();

        csv.write_record(["Property", "Period", "Line", "Amount", "Count", "Percentage"])?;

        let summary = [
            ("Revenue", self.revenue, None),
            ("Fixed expenses", self.fixed_expenses, None),
            ("Variable expenses", self.variable_expenses, None),
            ("Margin", self.margin, Some(self.margin_percentage)),
        ];
        for (line, amount, pct) in summary {
            let amount = amount.to_string();
            let pct = pct.map(|p| format!("{:.2}", p)).unwrap_or_default();
            csv.write_record([
                self.property_name.as_str(),
                period.as_str(),
                line,
                amount.as_str(),
                "",
                pct.as_str(),
            ])?;
        }

        for line in &self.categories {
            csv.write_record([
                self.property_name.clone(),
                period.clone(),
                format!("Category: {}", line.category),
                line.amount.to_string(),
                line.count.to_string(),
                format!("{:.2}", line.percentage),
            ])?;
        }

        csv.flush()
            .map_err(|e| StayError::Export(format!("Failed to write CSV: {}", e)))?;
        Ok(())
    }
}
