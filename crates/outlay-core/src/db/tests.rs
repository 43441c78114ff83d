//! Database tests

use chrono::NaiveDate;

use super::*;
use crate::error::Error;
use crate::models::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Database with one user and the default categories
fn setup() -> (Database, i64, i64) {
    let db = Database::in_memory().unwrap();
    db.seed_default_categories().unwrap();
    let user = db.create_user("Alice").unwrap();
    let food = db
        .list_categories()
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Food")
        .unwrap();
    (db, user.id, food.id)
}

fn add(db: &Database, user_id: i64, category_id: i64, amount: f64, day: NaiveDate) -> i64 {
    db.insert_expense(&NewExpense {
        user_id,
        category_id,
        amount,
        date: day,
        description: None,
    })
    .unwrap()
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert!(db.list_users().unwrap().is_empty());
    assert!(db.list_categories().unwrap().is_empty());
}

#[test]
fn test_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let result: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('expenses') WHERE name IN ('id', 'user_id', 'category_id', 'amount', 'date', 'description', 'created_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(result, 7, "expenses table should have 7 expected columns");
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::in_memory().unwrap();
    db.create_user("Bob").unwrap();

    let reopened = Database::new(db.path()).unwrap();
    assert_eq!(reopened.list_users().unwrap().len(), 1);
}

#[test]
fn test_seed_default_categories_is_idempotent() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.seed_default_categories().unwrap(), DEFAULT_CATEGORIES.len());
    assert_eq!(db.seed_default_categories().unwrap(), 0);
    assert_eq!(db.list_categories().unwrap().len(), DEFAULT_CATEGORIES.len());
}

#[test]
fn test_user_crud() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("  Carol ").unwrap();
    assert_eq!(user.name, "Carol");

    let fetched = db.get_user(user.id).unwrap().unwrap();
    assert_eq!(fetched.name, "Carol");
    assert!(db.get_user(9999).unwrap().is_none());
}

#[test]
fn test_duplicate_names_conflict() {
    let db = Database::in_memory().unwrap();
    db.create_user("Dave").unwrap();
    assert!(matches!(db.create_user("Dave"), Err(Error::Conflict(_))));

    db.create_category("Travel").unwrap();
    assert!(matches!(db.create_category("Travel"), Err(Error::Conflict(_))));
}

#[test]
fn test_empty_names_rejected() {
    let db = Database::in_memory().unwrap();
    assert!(matches!(db.create_user("   "), Err(Error::InvalidData(_))));
    assert!(matches!(db.create_category(""), Err(Error::InvalidData(_))));
}

#[test]
fn test_expense_crud() {
    let (db, user_id, food_id) = setup();

    let id = db
        .insert_expense(&NewExpense {
            user_id,
            category_id: food_id,
            amount: 12.5,
            date: date(2024, 1, 15),
            description: Some("Lunch".to_string()),
        })
        .unwrap();

    let expense = db.get_expense(id).unwrap().unwrap();
    assert_eq!(expense.amount, 12.5);
    assert_eq!(expense.date, date(2024, 1, 15));
    assert_eq!(expense.user_name.as_deref(), Some("Alice"));
    assert_eq!(expense.category_name.as_deref(), Some("Food"));
    assert_eq!(expense.description.as_deref(), Some("Lunch"));

    let updated = db
        .update_expense(
            id,
            &ExpenseUpdate {
                amount: Some(20.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.amount, 20.0);
    assert_eq!(updated.description.as_deref(), Some("Lunch"));

    db.delete_expense(id).unwrap();
    assert!(db.get_expense(id).unwrap().is_none());
}

#[test]
fn test_blank_description_clears() {
    let (db, user_id, food_id) = setup();

    let id = db
        .insert_expense(&NewExpense {
            user_id,
            category_id: food_id,
            amount: 8.0,
            date: date(2024, 1, 15),
            description: Some("Coffee".to_string()),
        })
        .unwrap();

    let updated = db
        .update_expense(
            id,
            &ExpenseUpdate {
                description: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description, None);

    let renamed = db
        .update_expense(
            id,
            &ExpenseUpdate {
                description: Some(" Espresso ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.description.as_deref(), Some("Espresso"));
    assert_eq!(renamed.amount, 8.0);
}

#[test]
fn test_missing_expense_not_found() {
    let (db, _, _) = setup();

    assert!(matches!(db.delete_expense(404), Err(Error::NotFound(_))));
    let update = ExpenseUpdate {
        amount: Some(1.0),
        ..Default::default()
    };
    assert!(matches!(
        db.update_expense(404, &update),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        db.update_expense(404, &ExpenseUpdate::default()),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_unknown_references_are_invalid_data() {
    let (db, user_id, food_id) = setup();

    let bad_user = NewExpense {
        user_id: 9999,
        category_id: food_id,
        amount: 5.0,
        date: date(2024, 1, 1),
        description: None,
    };
    assert!(matches!(
        db.insert_expense(&bad_user),
        Err(Error::InvalidData(_))
    ));

    let bad_category = NewExpense {
        user_id,
        category_id: 9999,
        ..bad_user
    };
    assert!(matches!(
        db.insert_expense(&bad_category),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_non_positive_amount_rejected_by_schema() {
    let (db, user_id, food_id) = setup();
    let expense = NewExpense {
        user_id,
        category_id: food_id,
        amount: 0.0,
        date: date(2024, 1, 1),
        description: None,
    };
    assert!(matches!(
        db.insert_expense(&expense),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_list_expenses_filters_and_sorting() {
    let (db, alice, food) = setup();
    let bob = db.create_user("Bob").unwrap().id;
    let bills = db.create_category("Rent").unwrap().id;

    let a = add(&db, alice, food, 10.0, date(2024, 1, 1));
    let b = add(&db, alice, bills, 50.0, date(2024, 1, 10));
    let c = add(&db, alice, food, 30.0, date(2024, 2, 1));
    add(&db, bob, food, 99.0, date(2024, 1, 5));

    // Default: newest first
    let all = db
        .list_expenses(&ExpenseFilter::new().user_id(Some(alice)))
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![c, b, a]);

    let by_amount = db
        .list_expenses(
            &ExpenseFilter::new()
                .user_id(Some(alice))
                .sort(SortField::Amount, SortOrder::Asc),
        )
        .unwrap();
    let amounts: Vec<f64> = by_amount.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![10.0, 30.0, 50.0]);

    let january = db
        .list_expenses(
            &ExpenseFilter::new()
                .user_id(Some(alice))
                .date_range(Some(date(2024, 1, 1)), Some(date(2024, 1, 31))),
        )
        .unwrap();
    assert_eq!(january.len(), 2);

    let food_only = db
        .list_expenses(&ExpenseFilter::new().category_id(Some(food)))
        .unwrap();
    assert_eq!(food_only.len(), 3);

    let limited = db
        .list_expenses(&ExpenseFilter::new().limit(Some(1)))
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, c);
}

#[test]
fn test_fetch_records_for_user_is_scoped() {
    let (db, alice, food) = setup();
    let bob = db.create_user("Bob").unwrap().id;

    add(&db, alice, food, 10.0, date(2024, 1, 2));
    add(&db, alice, food, 15.0, date(2024, 1, 1));
    add(&db, bob, food, 99.0, date(2024, 1, 1));

    let records = db.fetch_records_for_user(alice).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.user_id == alice));
    assert_eq!(records[0].date, date(2024, 1, 1));

    assert!(db.fetch_records_for_user(4242).unwrap().is_empty());
}

#[test]
fn test_fetch_records_reports_corrupt_date() {
    let (db, alice, food) = setup();
    let id = add(&db, alice, food, 10.0, date(2024, 1, 2));

    let conn = db.conn().unwrap();
    conn.execute(
        "UPDATE expenses SET date = 'garbage' WHERE id = ?",
        rusqlite::params![id],
    )
    .unwrap();

    match db.fetch_records_for_user(alice) {
        Err(Error::MalformedRecord { id: bad, .. }) => assert_eq!(bad, id),
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
}
