use api_types::{
    expense::{Expense, ExpenseItem},
    family::FamilyNew,
    user::UserProfileNew,
};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, repository::{ExpenseRepository, UserRepository}};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn register(engine: &Engine, identity: &str) -> i32 {
    engine
        .users()
        .register(
            identity,
            &UserProfileNew {
                display_name: identity.to_string(),
                email: None,
            },
        )
        .await
        .unwrap()
        .user_id
}

fn march(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

fn item(amount: i64, date: DateTime<Utc>) -> ExpenseItem {
    ExpenseItem {
        expense_item_id: None,
        expense_id: None,
        user_id: None,
        expense_amount_minor: amount,
        expense_category_id: Some(2),
        expense_type_id: None,
        credit_card_id: None,
        expense_description: None,
        expense_date: date,
    }
}

fn expense(user_id: i32, amount: i64, date: DateTime<Utc>, items: Vec<ExpenseItem>) -> Expense {
    Expense {
        expense_id: None,
        user_id: Some(user_id),
        expense_amount_minor: amount,
        expense_category_id: Some(2),
        expense_type_id: Some(1),
        credit_card_id: None,
        expense_description: Some("Groceries".to_string()),
        expense_date: date,
        expense_items: items,
    }
}

#[tokio::test]
async fn add_reconciles_header_with_items() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let mut dto = expense(user, 0, march(5), vec![item(10, march(5)), item(15, march(5))]);
    engine.expenses().add_expense(&mut dto).await.unwrap();

    let id = dto.expense_id.expect("generated id written back");
    assert_eq!(dto.expense_amount_minor, 25);
    assert!(dto.expense_items.iter().all(|i| i.expense_item_id.is_some()));

    let stored = engine
        .expenses()
        .get_expense_by_id(id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.expense_amount_minor, 25);
    assert_eq!(stored.expense_items.len(), 2);
    assert!(stored.expense_items.iter().all(|i| i.expense_id == Some(id)));
}

#[tokio::test]
async fn add_without_items_keeps_submitted_amount() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let mut dto = expense(user, 1250, march(5), Vec::new());
    engine.expenses().add_expense(&mut dto).await.unwrap();

    let stored = engine
        .expenses()
        .get_expense_by_id(dto.expense_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.expense_amount_minor, 1250);
    assert!(stored.expense_items.is_empty());
}

#[tokio::test]
async fn missing_expense_is_absent_not_error() {
    let (engine, _db) = engine_with_db().await;
    assert!(engine.expenses().get_expense_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn update_replaces_items_and_detaches_unlisted() {
    let (engine, db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let mut dto = expense(user, 0, march(5), vec![item(10, march(5)), item(15, march(5))]);
    engine.expenses().add_expense(&mut dto).await.unwrap();
    let id = dto.expense_id.unwrap();
    let dropped = dto.expense_items[1].expense_item_id.unwrap();

    dto.expense_items.truncate(1);
    dto.expense_items[0].expense_amount_minor = 40;
    dto.expense_items.push(item(2, march(6)));
    engine.expenses().update_expense(&mut dto).await.unwrap();
    assert_eq!(dto.expense_amount_minor, 42);

    let stored = engine
        .expenses()
        .get_expense_by_id(id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.expense_amount_minor, 42);
    assert_eq!(stored.expense_items.len(), 2);
    assert!(
        stored
            .expense_items
            .iter()
            .all(|i| i.expense_item_id != Some(dropped))
    );

    // The detached item survives without a parent.
    let orphan: Option<engine::expense_items::Model> = {
        use sea_orm::EntityTrait;
        engine::expense_items::Entity::find_by_id(dropped)
            .one(&db)
            .await
            .unwrap()
    };
    assert_eq!(orphan.unwrap().expense_id, None);
}

#[tokio::test]
async fn update_of_missing_expense_is_key_not_found() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let mut dto = expense(user, 100, march(5), Vec::new());
    dto.expense_id = Some(999);
    let err = engine.expenses().update_expense(&mut dto).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn update_listing_an_item_twice_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let mut dto = expense(user, 0, march(5), vec![item(10, march(5)), item(15, march(5))]);
    engine.expenses().add_expense(&mut dto).await.unwrap();
    let id = dto.expense_id.unwrap();

    let mut repeated = dto.clone();
    repeated.expense_items = vec![dto.expense_items[0].clone(), dto.expense_items[0].clone()];
    let err = engine
        .expenses()
        .update_expense(&mut repeated)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let stored = engine
        .expenses()
        .get_expense_by_id(id)
        .await
        .unwrap()
        .unwrap();
    let sum: i64 = stored
        .expense_items
        .iter()
        .map(|i| i.expense_amount_minor)
        .sum();
    assert_eq!(stored.expense_items.len(), 2);
    assert_eq!(stored.expense_amount_minor, sum);
}

#[tokio::test]
async fn items_are_owned_by_the_expense_owner() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;

    let mut foreign = item(10, march(5));
    foreign.user_id = Some(bob);
    let mut dto = expense(alice, 0, march(5), vec![foreign]);
    engine.expenses().add_expense(&mut dto).await.unwrap();

    assert_eq!(dto.expense_items[0].user_id, Some(alice));
}

#[tokio::test]
async fn unknown_references_are_key_not_found() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let mut dto = expense(user, 500, march(5), Vec::new());
    dto.expense_category_id = Some(999);
    let err = engine.expenses().add_expense(&mut dto).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let mut dto = expense(user, 0, march(5), vec![item(10, march(5))]);
    dto.expense_items[0].credit_card_id = Some(999);
    let err = engine.expenses().add_expense(&mut dto).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let mut dto = expense(user, 500, march(5), Vec::new());
    engine.expenses().add_expense(&mut dto).await.unwrap();
    dto.expense_type_id = Some(999);
    let err = engine.expenses().update_expense(&mut dto).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let stored = engine
        .expenses()
        .get_expenses_by_user_id(user, 3, 2024)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].expense_type_id, Some(1));
}

#[tokio::test]
async fn delete_is_idempotent_and_keeps_items() {
    let (engine, db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let mut dto = expense(user, 0, march(5), vec![item(10, march(5))]);
    engine.expenses().add_expense(&mut dto).await.unwrap();
    let id = dto.expense_id.unwrap();
    let item_id = dto.expense_items[0].expense_item_id.unwrap();

    engine.expenses().delete_expense(id).await.unwrap();
    engine.expenses().delete_expense(id).await.unwrap();
    engine.expenses().delete_expense(12345).await.unwrap();

    assert!(engine.expenses().get_expense_by_id(id).await.unwrap().is_none());
    let item = {
        use sea_orm::EntityTrait;
        engine::expense_items::Entity::find_by_id(item_id)
            .one(&db)
            .await
            .unwrap()
            .expect("item kept after parent delete")
    };
    assert_eq!(item.expense_id, None);
}

#[tokio::test]
async fn user_month_filter_is_half_open() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    for date in [
        Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap(),
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
    ] {
        let mut dto = expense(user, 1, date, Vec::new());
        engine.expenses().add_expense(&mut dto).await.unwrap();
    }

    let march = engine
        .expenses()
        .get_expenses_by_user_id(user, 3, 2024)
        .await
        .unwrap();
    assert_eq!(march.len(), 2);
    assert!(march.iter().all(|e| e.expense_date.month() == 3));
}

#[tokio::test]
async fn zero_month_and_year_mean_current_period() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let mut dto = expense(user, 300, Utc::now(), Vec::new());
    engine.expenses().add_expense(&mut dto).await.unwrap();

    let now = Utc::now();
    let explicit = engine
        .expenses()
        .get_expenses_by_user_id(user, now.month(), now.year())
        .await
        .unwrap();
    let sentinel = engine
        .expenses()
        .get_expenses_by_user_id(user, 0, 0)
        .await
        .unwrap();
    assert_eq!(explicit, sentinel);
    assert_eq!(sentinel.len(), 1);
}

#[tokio::test]
async fn invalid_month_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .expenses()
        .get_expenses_by_user_id(1, 13, 2024)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPeriod(_)));
}

#[tokio::test]
async fn family_view_is_union_of_members() {
    let (engine, db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;
    let carol = register(&engine, "carol").await;

    let family = engine
        .users()
        .create_family(
            alice,
            &FamilyNew {
                family_name: "Rossi".to_string(),
            },
        )
        .await
        .unwrap();
    UserRepository::new(db.clone())
        .set_family(bob, Some(family.family_id))
        .await
        .unwrap();

    for (user, amount) in [(alice, 100), (bob, 200), (carol, 400)] {
        let mut dto = expense(user, amount, march(10), Vec::new());
        engine.expenses().add_expense(&mut dto).await.unwrap();
    }

    let family_view = engine
        .expenses()
        .get_expenses_by_family_id(family.family_id, 3, 2024)
        .await
        .unwrap();
    let mut expected = engine
        .expenses()
        .get_expenses_by_user_id(alice, 3, 2024)
        .await
        .unwrap();
    expected.extend(
        engine
            .expenses()
            .get_expenses_by_user_id(bob, 3, 2024)
            .await
            .unwrap(),
    );
    assert_eq!(family_view, expected);

    let single_query = ExpenseRepository::new(db)
        .get_by_family(family.family_id, 3, 2024)
        .await
        .unwrap();
    assert_eq!(single_query.len(), family_view.len());
}

#[tokio::test]
async fn family_without_expenses_yields_empty() {
    let (engine, _db) = engine_with_db().await;

    let unknown = engine
        .expenses()
        .get_expenses_by_family_id(7, 3, 2024)
        .await
        .unwrap();
    assert!(unknown.is_empty());

    let alice = register(&engine, "alice").await;
    let family = engine
        .users()
        .create_family(
            alice,
            &FamilyNew {
                family_name: "Rossi".to_string(),
            },
        )
        .await
        .unwrap();
    let empty = engine
        .expenses()
        .get_expenses_by_family_id(family.family_id, 3, 2024)
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn reference_data_is_seeded() {
    let (engine, _db) = engine_with_db().await;

    let types = engine.expenses().get_all_expense_types().await.unwrap();
    let categories = engine.expenses().get_all_expense_categories().await.unwrap();
    assert!(!types.is_empty());
    assert!(!categories.is_empty());
    assert!(
        categories
            .iter()
            .any(|c| c.expense_category_name == "Groceries")
    );
    assert!(engine.expenses().get_all_credit_cards().await.unwrap().is_empty());
}
