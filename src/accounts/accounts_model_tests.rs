use super::accounts_model::*;

fn sample_new_account() -> NewAccount {
    NewAccount {
        id: None,
        owner_id: "user-1".to_string(),
        name: "Checking".to_string(),
        account_type: AccountType::Bank,
        currency: "USD".to_string(),
        initial_balance: 10_000,
        tracks_debt: None,
        included_in_net_worth: true,
    }
}

#[test]
fn new_account_validates() {
    assert!(sample_new_account().validate().is_ok());

    let mut blank_name = sample_new_account();
    blank_name.name = "  ".to_string();
    assert!(blank_name.validate().is_err());

    let mut blank_currency = sample_new_account();
    blank_currency.currency = String::new();
    assert!(blank_currency.validate().is_err());
}

#[test]
fn fresh_account_starts_at_initial_balance() {
    let db: AccountDB = sample_new_account().into();
    assert_eq!(db.initial_balance, 10_000);
    assert_eq!(db.current_balance, 10_000);
    assert!(db.is_active);
}

#[test]
fn debt_capability_defaults_from_type() {
    let mut card = sample_new_account();
    card.account_type = AccountType::CreditCard;
    let db: AccountDB = card.into();
    assert!(db.tracks_debt);

    let mut cash = sample_new_account();
    cash.account_type = AccountType::Cash;
    cash.tracks_debt = Some(true); // explicit override wins
    let db: AccountDB = cash.into();
    assert!(db.tracks_debt);
}

#[test]
fn account_type_round_trips_through_strings() {
    for t in [
        AccountType::Bank,
        AccountType::Investment,
        AccountType::Cash,
        AccountType::EWallet,
        AccountType::CreditCard,
        AccountType::Loan,
        AccountType::Other,
    ] {
        assert_eq!(AccountType::from_str(t.as_str()).unwrap(), t);
    }
    assert!(AccountType::from_str("PIGGY_BANK").is_err());
}
