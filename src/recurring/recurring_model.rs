use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::recurring_errors::RecurringError;
use crate::schema::recurring_transactions;
use crate::transactions::{Transaction, TransactionType};

/// How often a recurring definition fires.
///
/// `day_of_week` uses 0 = Monday .. 6 = Sunday. Month-relative rules keep
/// their nominal day and clamp to shorter months at calculation time; the
/// rule itself stays on the nominal day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly { day_of_week: u8 },
    Monthly { day_of_month: u32 },
    Yearly { month_of_year: u32, day_of_month: u32 },
}

impl Frequency {
    pub fn validate(&self) -> Result<(), RecurringError> {
        match *self {
            Frequency::Daily => Ok(()),
            Frequency::Weekly { day_of_week } if day_of_week <= 6 => Ok(()),
            Frequency::Weekly { day_of_week } => Err(RecurringError::InvalidFrequency(format!(
                "day_of_week must be 0..=6, got {}",
                day_of_week
            ))),
            Frequency::Monthly { day_of_month } if (1..=31).contains(&day_of_month) => Ok(()),
            Frequency::Monthly { day_of_month } => Err(RecurringError::InvalidFrequency(format!(
                "day_of_month must be 1..=31, got {}",
                day_of_month
            ))),
            Frequency::Yearly {
                month_of_year,
                day_of_month,
            } => {
                if !(1..=12).contains(&month_of_year) {
                    return Err(RecurringError::InvalidFrequency(format!(
                        "month_of_year must be 1..=12, got {}",
                        month_of_year
                    )));
                }
                if !(1..=31).contains(&day_of_month) {
                    return Err(RecurringError::InvalidFrequency(format!(
                        "day_of_month must be 1..=31, got {}",
                        day_of_month
                    )));
                }
                Ok(())
            }
        }
    }

    /// Splits the rule into the flat columns it is persisted as.
    pub fn to_columns(&self) -> (&'static str, Option<i32>, Option<i32>, Option<i32>) {
        match *self {
            Frequency::Daily => ("DAILY", None, None, None),
            Frequency::Weekly { day_of_week } => ("WEEKLY", Some(i32::from(day_of_week)), None, None),
            Frequency::Monthly { day_of_month } => ("MONTHLY", None, Some(day_of_month as i32), None),
            Frequency::Yearly {
                month_of_year,
                day_of_month,
            } => (
                "YEARLY",
                None,
                Some(day_of_month as i32),
                Some(month_of_year as i32),
            ),
        }
    }

    /// Rebuilds the rule from its persisted columns, revalidating at the
    /// database boundary.
    pub fn from_columns(
        frequency: &str,
        day_of_week: Option<i32>,
        day_of_month: Option<i32>,
        month_of_year: Option<i32>,
    ) -> Result<Self, RecurringError> {
        let missing =
            |field: &str| RecurringError::InvalidFrequency(format!("{} is required", field));

        let rule = match frequency {
            "DAILY" => Frequency::Daily,
            "WEEKLY" => Frequency::Weekly {
                day_of_week: u8::try_from(day_of_week.ok_or_else(|| missing("day_of_week"))?)
                    .map_err(|_| missing("day_of_week"))?,
            },
            "MONTHLY" => Frequency::Monthly {
                day_of_month: u32::try_from(day_of_month.ok_or_else(|| missing("day_of_month"))?)
                    .map_err(|_| missing("day_of_month"))?,
            },
            "YEARLY" => Frequency::Yearly {
                month_of_year: u32::try_from(
                    month_of_year.ok_or_else(|| missing("month_of_year"))?,
                )
                .map_err(|_| missing("month_of_year"))?,
                day_of_month: u32::try_from(day_of_month.ok_or_else(|| missing("day_of_month"))?)
                    .map_err(|_| missing("day_of_month"))?,
            },
            other => {
                return Err(RecurringError::InvalidFrequency(format!(
                    "Unknown frequency: {}",
                    other
                )))
            }
        };

        rule.validate()?;
        Ok(rule)
    }
}

/// A stored recurring-transaction template with its schedule cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDefinition {
    pub id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub currency: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// The next date this definition is due; the scheduler's claim target.
    pub next_run_date: NaiveDate,
    pub last_run_date: Option<NaiveDate>,
    pub is_active: bool,
    /// When false, due occurrences only advance the schedule and are left
    /// for the user to confirm manually.
    pub auto_create: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input for creating a recurring definition. The schedule cursor starts at
/// `start_date`; the currency comes from the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringDefinition {
    pub id: Option<String>,
    pub account_id: String,
    pub category_id: Option<String>,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub auto_create: bool,
}

impl NewRecurringDefinition {
    pub fn validate(&self) -> Result<(), RecurringError> {
        if self.account_id.trim().is_empty() {
            return Err(RecurringError::InvalidData(
                "Account id cannot be empty".to_string(),
            ));
        }
        if self.amount <= 0 {
            return Err(RecurringError::InvalidData(format!(
                "Amount must be positive, got {}",
                self.amount
            )));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(RecurringError::InvalidData(format!(
                    "End date {} precedes start date {}",
                    end, self.start_date
                )));
            }
        }
        self.frequency.validate()
    }
}

/// One projected future occurrence, for previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringOccurrence {
    pub date: NaiveDate,
    pub amount: i64,
    pub transaction_type: TransactionType,
}

/// Outcome of one scheduler pass.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDueReport {
    /// Transactions created during this pass, in processing order.
    pub materialized: Vec<Transaction>,
    /// Ids of definitions whose occurrence failed; their schedules were not
    /// advanced.
    pub skipped: Vec<String>,
}

/// Database row for the `recurring_transactions` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable)]
#[diesel(table_name = recurring_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecurringDB {
    pub id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub transaction_type: String,
    pub amount: i64,
    pub currency: String,
    pub frequency: String,
    pub day_of_week: Option<i32>,
    pub day_of_month: Option<i32>,
    pub month_of_year: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_run_date: NaiveDate,
    pub last_run_date: Option<NaiveDate>,
    pub is_active: bool,
    pub auto_create: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<RecurringDB> for RecurringDefinition {
    type Error = RecurringError;

    fn try_from(db: RecurringDB) -> Result<Self, RecurringError> {
        let frequency = Frequency::from_columns(
            &db.frequency,
            db.day_of_week,
            db.day_of_month,
            db.month_of_year,
        )?;
        let transaction_type = TransactionType::from_str(&db.transaction_type)
            .map_err(|e| RecurringError::InvalidData(e.to_string()))?;

        Ok(RecurringDefinition {
            id: db.id,
            account_id: db.account_id,
            category_id: db.category_id,
            transaction_type,
            amount: db.amount,
            currency: db.currency,
            frequency,
            start_date: db.start_date,
            end_date: db.end_date,
            next_run_date: db.next_run_date,
            last_run_date: db.last_run_date,
            is_active: db.is_active,
            auto_create: db.auto_create,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl RecurringDB {
    /// Builds a fresh row; the schedule cursor starts at `start_date`.
    pub fn from_new(new_def: &NewRecurringDefinition, currency: &str) -> Self {
        let (frequency, day_of_week, day_of_month, month_of_year) = new_def.frequency.to_columns();
        let now = chrono::Utc::now().naive_utc();

        RecurringDB {
            id: new_def
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            account_id: new_def.account_id.clone(),
            category_id: new_def.category_id.clone(),
            transaction_type: new_def.transaction_type.as_str().to_string(),
            amount: new_def.amount,
            currency: currency.to_string(),
            frequency: frequency.to_string(),
            day_of_week,
            day_of_month,
            month_of_year,
            start_date: new_def.start_date,
            end_date: new_def.end_date,
            next_run_date: new_def.start_date,
            last_run_date: None,
            is_active: true,
            auto_create: new_def.auto_create,
            created_at: now,
            updated_at: now,
        }
    }
}
