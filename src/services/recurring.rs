//! Recurring expense generator
//!
//! Turns fixed expense templates into dated variable expenses. Each template
//! is evaluated on its own for one `as_of` date:
//!
//! 1. It must be active (no end date, or an end date on or after `as_of`).
//! 2. Its occurrence for the period is the start date advanced by the whole
//!    months (monthly) or years (annual) elapsed, clamped to month end.
//! 3. It is due when that occurrence falls in `as_of`'s month (and year, for
//!    annual templates) on or before `as_of`'s day.
//! 4. A due template is skipped if a record with the same property, unit and
//!    generated description already exists in `as_of`'s calendar month.
//!
//! A failure on one template is logged with its id and never stops the run.

use chrono::{Datelike, NaiveDate};

use crate::config::Settings;
use crate::error::{StayError, StayResult};
use crate::models::period::{add_months_clamped, months_between, same_month};
use crate::models::{
    generated_description, DateWindow, FixedExpense, FixedExpenseId, Recurrence, VariableExpense,
    DEFAULT_GENERATED_PREFIX,
};
use crate::storage::ExpenseStore;

/// Labels stamped on generated records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub prefix: String,
    pub monthly_category: String,
    pub annual_category: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for GeneratorOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            prefix: settings.generated_prefix.clone(),
            monthly_category: settings.category_for(Recurrence::Monthly).to_string(),
            annual_category: settings.category_for(Recurrence::Annual).to_string(),
        }
    }
}

impl GeneratorOptions {
    fn category_for(&self, expense: &FixedExpense) -> String {
        match &expense.category {
            Some(category) if !category.trim().is_empty() => category.clone(),
            _ => match expense.recurrence {
                Recurrence::Monthly => self.monthly_category.clone(),
                Recurrence::Annual => self.annual_category.clone(),
            },
        }
    }

    fn description_for(&self, expense: &FixedExpense) -> String {
        let prefix = if self.prefix.is_empty() {
            DEFAULT_GENERATED_PREFIX
        } else {
            &self.prefix
        };
        generated_description(prefix, &expense.description)
    }
}

// TODO: confirm with operators whether templates starting after `as_of` should be skipped
/// The occurrence of `expense` that is due on `as_of`, if any
///
/// The month offset may be negative, so a template whose start date lies in
/// a later month still projects back into the month of `as_of`.
pub fn due_occurrence(expense: &FixedExpense, as_of: NaiveDate) -> Option<NaiveDate> {
    if !expense.is_active(as_of) {
        return None;
    }

    let start = expense.start_date;
    match expense.recurrence {
        Recurrence::Monthly => {
            let next = add_months_clamped(start, months_between(start, as_of))?;
            (same_month(next, as_of) && next.day() <= as_of.day()).then_some(next)
        }
        Recurrence::Annual => {
            let next = add_months_clamped(start, 12 * (as_of.year() - start.year()))?;
            (same_month(next, as_of) && next.day() <= as_of.day()).then_some(next)
        }
    }
}

/// A template that could not be processed
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFailure {
    pub fixed_expense_id: FixedExpenseId,
    pub description: String,
    pub error: String,
}

/// Outcome of one generator run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub as_of: NaiveDate,
    /// Active templates considered
    pub evaluated: usize,
    pub created: Vec<VariableExpense>,
    /// Due templates already materialized this month
    pub skipped_duplicates: Vec<FixedExpenseId>,
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            evaluated: 0,
            created: Vec::new(),
            skipped_duplicates: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

enum Outcome {
    NotDue,
    Duplicate,
    Created(VariableExpense),
}

pub struct RecurringExpenseGenerator<'a, S: ExpenseStore + ?Sized> {
    store: &'a S,
    options: GeneratorOptions,
}

impl<'a, S: ExpenseStore + ?Sized> RecurringExpenseGenerator<'a, S> {
    pub fn new(store: &'a S, options: GeneratorOptions) -> Self {
        Self { store, options }
    }

    /// Create the expenses due on `as_of` and return how many were created
    pub fn generate_due_expenses(&self, as_of: NaiveDate) -> StayResult<usize> {
        Ok(self.run(as_of)?.created_count())
    }

    /// Evaluate every active template for `as_of`
    ///
    /// Only a failure to list the templates aborts the run.
    pub fn run(&self, as_of: NaiveDate) -> StayResult<GenerationReport> {
        let window = DateWindow::month_of(as_of).ok_or_else(|| {
            StayError::Validation(format!("Cannot compute month window for {}", as_of))
        })?;
        let templates = self.store.active_fixed_expenses(as_of)?;

        tracing::info!(%as_of, active = templates.len(), "generating recurring expenses");

        let mut report = GenerationReport::new(as_of);
        report.evaluated = templates.len();

        for template in &templates {
            match self.process(template, as_of, window) {
                Ok(Outcome::Created(expense)) => {
                    tracing::info!(
                        fixed_expense = %template.id,
                        expense = %expense.id,
                        amount = %expense.amount,
                        "generated {}",
                        expense.description
                    );
                    report.created.push(expense);
                }
                Ok(Outcome::Duplicate) => {
                    tracing::debug!(fixed_expense = %template.id, "already generated this month");
                    report.skipped_duplicates.push(template.id);
                }
                Ok(Outcome::NotDue) => {}
                Err(e) => {
                    tracing::error!(
                        fixed_expense = %template.id,
                        error = %e,
                        "failed to generate recurring expense"
                    );
                    report.failures.push(GenerationFailure {
                        fixed_expense_id: template.id,
                        description: template.description.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            %as_of,
            created = report.created_count(),
            skipped = report.skipped_duplicates.len(),
            failed = report.failures.len(),
            "recurring expense generation finished"
        );

        Ok(report)
    }

    fn process(
        &self,
        template: &FixedExpense,
        as_of: NaiveDate,
        window: DateWindow,
    ) -> StayResult<Outcome> {
        if due_occurrence(template, as_of).is_none() {
            return Ok(Outcome::NotDue);
        }

        let description = self.options.description_for(template);
        let existing = self.store.find_generated_expense(
            template.property_id,
            template.unit_id,
            &description,
            window,
        )?;
        if existing.is_some() {
            return Ok(Outcome::Duplicate);
        }

        let mut expense = VariableExpense::new(
            template.property_id,
            as_of,
            description,
            template.amount,
            self.options.category_for(template),
        );
        expense.unit_id = template.unit_id;
        expense.source_fixed_expense = Some(template.id);
        expense
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;

        Ok(Outcome::Created(self.store.create_variable_expense(expense)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PropertyId, UnitId};
    use crate::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(description: &str, amount: i64, recurrence: Recurrence, start: NaiveDate) -> FixedExpense {
        FixedExpense::new(PropertyId::new(), description, Money::from_units(amount), recurrence, start)
    }

    fn generator(store: &MemoryStore) -> RecurringExpenseGenerator<'_, MemoryStore> {
        RecurringExpenseGenerator::new(store, GeneratorOptions::default())
    }

    /// Fails to create any expense whose description contains `poison`
    struct FailingStore {
        inner: MemoryStore,
        poison: &'static str,
    }

    impl ExpenseStore for FailingStore {
        fn active_fixed_expenses(&self, as_of: NaiveDate) -> StayResult<Vec<FixedExpense>> {
            self.inner.active_fixed_expenses(as_of)
        }

        fn find_generated_expense(
            &self,
            property_id: PropertyId,
            unit_id: Option<UnitId>,
            description: &str,
            window: DateWindow,
        ) -> StayResult<Option<VariableExpense>> {
            self.inner.find_generated_expense(property_id, unit_id, description, window)
        }

        fn create_variable_expense(&self, expense: VariableExpense) -> StayResult<VariableExpense> {
            if expense.description.contains(self.poison) {
                return Err(StayError::Storage("disk full".into()));
            }
            self.inner.create_variable_expense(expense)
        }
    }

    #[test]
    fn test_monthly_due_then_not_duplicated_same_month() {
        let store = MemoryStore::new();
        store
            .add_fixed_expense(template("Affitto", 1500, Recurrence::Monthly, date(2024, 1, 1)))
            .unwrap();

        assert_eq!(generator(&store).generate_due_expenses(date(2024, 8, 1)).unwrap(), 1);

        let report = generator(&store).run(date(2024, 8, 15)).unwrap();
        assert_eq!(report.created_count(), 0);
        assert_eq!(report.skipped_duplicates.len(), 1);
        assert_eq!(store.variable_expenses().unwrap().len(), 1);
    }

    #[test]
    fn test_generated_record_shape() {
        let store = MemoryStore::new();
        let mut fixed = template("Manutenzione giardino", 100, Recurrence::Monthly, date(2024, 1, 1));
        fixed.unit_id = Some(UnitId::new());
        store.add_fixed_expense(fixed.clone()).unwrap();

        let report = generator(&store).run(date(2024, 8, 1)).unwrap();
        let created = &report.created[0];

        assert_eq!(created.description, "[Auto] Manutenzione giardino");
        assert_eq!(created.date, date(2024, 8, 1));
        assert_eq!(created.amount, Money::from_units(100));
        assert_eq!(created.category, "Monthly fixed");
        assert_eq!(created.property_id, fixed.property_id);
        assert_eq!(created.unit_id, fixed.unit_id);
        assert_eq!(created.source_fixed_expense, Some(fixed.id));
    }

    #[test]
    fn test_template_category_wins_over_default() {
        let store = MemoryStore::new();
        let mut fixed = template("Condominio", 800, Recurrence::Monthly, date(2024, 1, 1));
        fixed.category = Some("Utenze".into());
        store.add_fixed_expense(fixed).unwrap();

        let report = generator(&store).run(date(2024, 3, 1)).unwrap();
        assert_eq!(report.created[0].category, "Utenze");
    }

    #[test]
    fn test_annual_generates_once_on_anniversary() {
        let store = MemoryStore::new();
        store
            .add_fixed_expense(template("Assicurazione", 1200, Recurrence::Annual, date(2024, 1, 1)))
            .unwrap();

        let report = generator(&store).run(date(2025, 1, 1)).unwrap();
        assert_eq!(report.created_count(), 1);
        let created = &report.created[0];
        assert_eq!(created.date, date(2025, 1, 1));
        assert_eq!(created.amount, Money::from_units(1200));
        assert_eq!(created.category, "Annual fixed");

        assert_eq!(store.variable_expenses().unwrap().len(), 1);
    }

    #[test]
    fn test_annual_not_due_in_other_months() {
        let fixed = template("Tasse comunali", 950, Recurrence::Annual, date(2024, 1, 1));
        assert_eq!(due_occurrence(&fixed, date(2025, 2, 1)), None);
        assert_eq!(due_occurrence(&fixed, date(2025, 12, 31)), None);
        assert_eq!(due_occurrence(&fixed, date(2025, 1, 20)), Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_second_immediate_run_generates_nothing() {
        let store = MemoryStore::new();
        store
            .add_fixed_expense(template("Affitto", 1500, Recurrence::Monthly, date(2024, 1, 1)))
            .unwrap();
        store
            .add_fixed_expense(template("Condominio", 800, Recurrence::Monthly, date(2024, 1, 1)))
            .unwrap();
        store
            .add_fixed_expense(template("Assicurazione", 1200, Recurrence::Annual, date(2024, 1, 1)))
            .unwrap();

        let as_of = date(2025, 1, 1);
        assert_eq!(generator(&store).generate_due_expenses(as_of).unwrap(), 3);
        assert_eq!(generator(&store).generate_due_expenses(as_of).unwrap(), 0);
        assert_eq!(store.variable_expenses().unwrap().len(), 3);
    }

    #[test]
    fn test_ended_template_never_generates() {
        let store = MemoryStore::new();
        let mut fixed = template("Vecchio contratto", 300, Recurrence::Monthly, date(2024, 1, 1));
        fixed.end_date = Some(date(2024, 7, 31));
        store.add_fixed_expense(fixed.clone()).unwrap();

        assert_eq!(due_occurrence(&fixed, date(2024, 8, 1)), None);
        assert_eq!(generator(&store).generate_due_expenses(date(2024, 8, 1)).unwrap(), 0);
    }

    #[test]
    fn test_end_date_on_as_of_still_generates() {
        let mut fixed = template("Affitto", 1500, Recurrence::Monthly, date(2024, 1, 1));
        fixed.end_date = Some(date(2024, 8, 1));
        assert_eq!(due_occurrence(&fixed, date(2024, 8, 1)), Some(date(2024, 8, 1)));
    }

    #[test]
    fn test_not_due_before_day_of_month() {
        let fixed = template("Pulizie", 200, Recurrence::Monthly, date(2024, 1, 15));
        assert_eq!(due_occurrence(&fixed, date(2024, 8, 14)), None);
        assert_eq!(due_occurrence(&fixed, date(2024, 8, 15)), Some(date(2024, 8, 15)));
    }

    #[test]
    fn test_month_end_start_is_clamped() {
        let fixed = template("Affitto", 1500, Recurrence::Monthly, date(2024, 1, 31));
        assert_eq!(due_occurrence(&fixed, date(2024, 2, 29)), Some(date(2024, 2, 29)));
        assert_eq!(due_occurrence(&fixed, date(2024, 4, 29)), None);
        assert_eq!(due_occurrence(&fixed, date(2024, 4, 30)), Some(date(2024, 4, 30)));
    }

    #[test]
    fn test_future_start_projects_into_current_month() {
        let fixed = template("Nuovo contratto", 500, Recurrence::Monthly, date(2024, 9, 1));
        assert_eq!(due_occurrence(&fixed, date(2024, 8, 31)), Some(date(2024, 8, 1)));

        let late = template("Nuovo contratto", 500, Recurrence::Monthly, date(2024, 9, 20));
        assert_eq!(due_occurrence(&late, date(2024, 8, 10)), None);
    }

    #[test]
    fn test_failure_on_one_template_does_not_stop_batch() {
        let store = FailingStore {
            inner: MemoryStore::new(),
            poison: "Assicurazione",
        };
        let failing = template("Assicurazione", 1200, Recurrence::Annual, date(2024, 1, 1));
        store.inner.add_fixed_expense(failing.clone()).unwrap();
        store
            .inner
            .add_fixed_expense(template("Affitto", 1500, Recurrence::Monthly, date(2024, 1, 1)))
            .unwrap();

        let generator = RecurringExpenseGenerator::new(&store, GeneratorOptions::default());
        let report = generator.run(date(2025, 1, 1)).unwrap();

        assert_eq!(report.created_count(), 1);
        assert_eq!(report.created[0].description, "[Auto] Affitto");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].fixed_expense_id, failing.id);
        assert!(report.has_failures());
        assert_eq!(generator.generate_due_expenses(date(2025, 1, 1)).unwrap(), 0);
    }

    #[test]
    fn test_custom_prefix() {
        let store = MemoryStore::new();
        store
            .add_fixed_expense(template("Affitto", 1500, Recurrence::Monthly, date(2024, 1, 1)))
            .unwrap();
        let options = GeneratorOptions {
            prefix: "[Ricorrente]".into(),
            ..GeneratorOptions::default()
        };

        let report = RecurringExpenseGenerator::new(&store, options)
            .run(date(2024, 5, 1))
            .unwrap();
        assert_eq!(report.created[0].description, "[Ricorrente] Affitto");
    }
}
