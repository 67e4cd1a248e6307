use chrono::NaiveDate;

use super::recurring_errors::RecurringError;
use super::recurring_model::{Frequency, NewRecurringDefinition};
use crate::transactions::TransactionType;

#[test]
fn frequency_bounds_are_enforced() {
    assert!(Frequency::Daily.validate().is_ok());
    assert!(Frequency::Weekly { day_of_week: 6 }.validate().is_ok());
    assert!(Frequency::Weekly { day_of_week: 7 }.validate().is_err());
    assert!(Frequency::Monthly { day_of_month: 31 }.validate().is_ok());
    assert!(Frequency::Monthly { day_of_month: 0 }.validate().is_err());
    assert!(Frequency::Monthly { day_of_month: 32 }.validate().is_err());
    assert!(Frequency::Yearly {
        month_of_year: 12,
        day_of_month: 31
    }
    .validate()
    .is_ok());
    assert!(Frequency::Yearly {
        month_of_year: 13,
        day_of_month: 1
    }
    .validate()
    .is_err());
}

#[test]
fn frequency_round_trips_through_columns() {
    let rules = [
        Frequency::Daily,
        Frequency::Weekly { day_of_week: 0 },
        Frequency::Monthly { day_of_month: 31 },
        Frequency::Yearly {
            month_of_year: 2,
            day_of_month: 29,
        },
    ];

    for rule in rules {
        let (freq, dow, dom, moy) = rule.to_columns();
        assert_eq!(Frequency::from_columns(freq, dow, dom, moy).unwrap(), rule);
    }
}

#[test]
fn from_columns_rejects_missing_parameters() {
    assert!(matches!(
        Frequency::from_columns("WEEKLY", None, None, None),
        Err(RecurringError::InvalidFrequency(_))
    ));
    assert!(matches!(
        Frequency::from_columns("SOMETIMES", None, None, None),
        Err(RecurringError::InvalidFrequency(_))
    ));
}

#[test]
fn new_definition_validation() {
    let base = NewRecurringDefinition {
        id: None,
        account_id: "acc-1".to_string(),
        category_id: None,
        transaction_type: TransactionType::Expense,
        amount: 120_000,
        frequency: Frequency::Monthly { day_of_month: 31 },
        start_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        end_date: None,
        auto_create: true,
    };
    assert!(base.validate().is_ok());

    let mut bad_amount = base.clone();
    bad_amount.amount = 0;
    assert!(bad_amount.validate().is_err());

    let mut bad_range = base.clone();
    bad_range.end_date = Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    assert!(bad_range.validate().is_err());
}
