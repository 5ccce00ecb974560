//! Expense service
//!
//! Fixed expense templates, variable expenses, and the entry point the
//! scheduler uses to materialize due recurring expenses.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{StayError, StayResult};
use crate::models::{
    FixedExpense, FixedExpenseId, Money, PropertyId, Recurrence, ReportPeriod, UnitId,
    VariableExpense, VariableExpenseId,
};
use crate::storage::{MemoryStore, Storage};

use super::recurring::{GenerationReport, GeneratorOptions, RecurringExpenseGenerator};

/// Input for a new fixed expense template
#[derive(Debug, Clone)]
pub struct NewFixedExpense {
    pub property_id: PropertyId,
    pub unit_id: Option<UnitId>,
    pub description: String,
    pub amount: Money,
    pub recurrence: Recurrence,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
}

/// Partial update for a fixed expense
#[derive(Debug, Clone, Default)]
pub struct FixedExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<Money>,
    /// `Some(None)` clears the end date
    pub end_date: Option<Option<NaiveDate>>,
    pub category: Option<Option<String>>,
}

/// Input for a new variable expense
#[derive(Debug, Clone)]
pub struct NewVariableExpense {
    pub property_id: PropertyId,
    pub unit_id: Option<UnitId>,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub category: String,
}

pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The property must exist, and a unit, if given, must belong to it
    fn ensure_scope(&self, property_id: PropertyId, unit_id: Option<UnitId>) -> StayResult<()> {
        if self.storage.properties.get(property_id)?.is_none() {
            return Err(StayError::property_not_found(property_id.to_string()));
        }
        if let Some(unit_id) = unit_id {
            let unit = self
                .storage
                .units
                .get(unit_id)?
                .ok_or_else(|| StayError::unit_not_found(unit_id.to_string()))?;
            if unit.property_id != property_id {
                return Err(StayError::Validation(format!(
                    "Unit '{}' does not belong to this property",
                    unit.name
                )));
            }
        }
        Ok(())
    }

    // Fixed expenses

    pub fn create_fixed(&self, new: NewFixedExpense) -> StayResult<FixedExpense> {
        self.ensure_scope(new.property_id, new.unit_id)?;

        let mut expense = FixedExpense::new(
            new.property_id,
            new.description.trim(),
            new.amount,
            new.recurrence,
            new.start_date,
        );
        expense.unit_id = new.unit_id;
        expense.end_date = new.end_date;
        expense.category = new.category.filter(|c| !c.trim().is_empty());
        expense
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;

        self.storage.fixed_expenses.upsert(expense.clone())?;
        self.storage.fixed_expenses.save()?;
        self.storage.log_create(
            EntityType::FixedExpense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        tracing::info!(fixed_expense = %expense.id, "fixed expense created");
        Ok(expense)
    }

    /// Fixed expenses, optionally for one property, by start date
    pub fn list_fixed(&self, property_id: Option<PropertyId>) -> StayResult<Vec<FixedExpense>> {
        let mut expenses = self
            .storage
            .fixed_expenses
            .filter(|e| property_id.map_or(true, |p| e.property_id == p))?;
        expenses.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.description.cmp(&b.description))
        });
        Ok(expenses)
    }

    pub fn find_fixed(&self, identifier: &str) -> StayResult<Option<FixedExpense>> {
        self.storage.fixed_expenses.find_by_id_str(identifier)
    }

    pub fn require_fixed(&self, identifier: &str) -> StayResult<FixedExpense> {
        self.find_fixed(identifier)?
            .ok_or_else(|| StayError::fixed_expense_not_found(identifier))
    }

    pub fn update_fixed(
        &self,
        id: FixedExpenseId,
        changes: FixedExpenseUpdate,
    ) -> StayResult<FixedExpense> {
        let before = self
            .storage
            .fixed_expenses
            .get(id)?
            .ok_or_else(|| StayError::fixed_expense_not_found(id.to_string()))?;
        let mut expense = before.clone();

        if let Some(description) = changes.description {
            expense.description = description.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }
        if let Some(end_date) = changes.end_date {
            expense.end_date = end_date;
        }
        if let Some(category) = changes.category {
            expense.category = category.filter(|c| !c.trim().is_empty());
        }

        expense
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;
        expense.updated_at = Utc::now();

        self.storage.fixed_expenses.upsert(expense.clone())?;
        self.storage.fixed_expenses.save()?;
        self.storage.log_update(
            EntityType::FixedExpense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &before,
            &expense,
        )?;

        Ok(expense)
    }

    /// Stop a template from recurring after `end_date`
    pub fn end_fixed(&self, id: FixedExpenseId, end_date: NaiveDate) -> StayResult<FixedExpense> {
        self.update_fixed(
            id,
            FixedExpenseUpdate {
                end_date: Some(Some(end_date)),
                ..FixedExpenseUpdate::default()
            },
        )
    }

    /// Delete a template; records already generated from it are kept
    pub fn delete_fixed(&self, id: FixedExpenseId) -> StayResult<FixedExpense> {
        let expense = self
            .storage
            .fixed_expenses
            .delete(id)?
            .ok_or_else(|| StayError::fixed_expense_not_found(id.to_string()))?;
        self.storage.fixed_expenses.save()?;
        self.storage.log_delete(
            EntityType::FixedExpense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;
        Ok(expense)
    }

    // Variable expenses

    pub fn create_variable(&self, new: NewVariableExpense) -> StayResult<VariableExpense> {
        self.ensure_scope(new.property_id, new.unit_id)?;

        let mut expense = VariableExpense::new(
            new.property_id,
            new.date,
            new.description.trim(),
            new.amount,
            new.category.trim(),
        );
        expense.unit_id = new.unit_id;
        expense
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;

        self.storage.variable_expenses.upsert(expense.clone())?;
        self.storage.variable_expenses.save()?;
        self.storage.log_create(
            EntityType::VariableExpense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        Ok(expense)
    }

    /// Variable expenses, optionally narrowed to a property and a period,
    /// newest first
    pub fn list_variable(
        &self,
        property_id: Option<PropertyId>,
        period: Option<ReportPeriod>,
    ) -> StayResult<Vec<VariableExpense>> {
        let mut expenses = self.storage.variable_expenses.filter(|e| {
            property_id.map_or(true, |p| e.property_id == p)
                && period.map_or(true, |p| p.contains(e.date))
        })?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(expenses)
    }

    pub fn find_variable(&self, identifier: &str) -> StayResult<Option<VariableExpense>> {
        self.storage.variable_expenses.find_by_id_str(identifier)
    }

    pub fn delete_variable(&self, id: VariableExpenseId) -> StayResult<VariableExpense> {
        let expense = self
            .storage
            .variable_expenses
            .delete(id)?
            .ok_or_else(|| StayError::variable_expense_not_found(id.to_string()))?;
        self.storage.variable_expenses.save()?;
        self.storage.log_delete(
            EntityType::VariableExpense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;
        Ok(expense)
    }

    /// Run the recurring expense generator for `as_of`
    ///
    /// With `dry_run` the generator works on an in-memory copy and nothing
    /// is written to disk or the audit log.
    pub fn generate(
        &self,
        as_of: NaiveDate,
        settings: &Settings,
        dry_run: bool,
    ) -> StayResult<GenerationReport> {
        let options = GeneratorOptions::from(settings);
        if dry_run {
            let snapshot = MemoryStore::from_storage(self.storage)?;
            RecurringExpenseGenerator::new(&snapshot, options).run(as_of)
        } else {
            RecurringExpenseGenerator::new(self.storage, options).run(as_of)
        }
    }
}
