use api_types::{
    budget::UserBudget, credit_card::CreditCard, email::EmailCopyNew, family::FamilyNew,
    income::UserIncome, user::UserProfileNew,
};
use chrono::{Datelike, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, repository::UserRepository};
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

fn income(amount: i64, day: u32) -> UserIncome {
    UserIncome {
        income_id: None,
        user_id: None,
        income_amount_minor: amount,
        income_source: Some("Salary".to_string()),
        income_description: None,
        income_date: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn credit_card_lifecycle() {
    let (engine, _db) = engine_with_db().await;

    let mut card = CreditCard {
        credit_card_id: None,
        credit_card_name: " Visa ".to_string(),
        card_last_four_digit: "1234".to_string(),
    };
    engine.credit_cards().add(&mut card).await.unwrap();
    assert!(card.credit_card_id.is_some());
    assert_eq!(card.credit_card_name, "Visa");

    card.card_last_four_digit = "12a4".to_string();
    let err = engine.credit_cards().update(&mut card).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    card.card_last_four_digit = "9876".to_string();
    engine.credit_cards().update(&mut card).await.unwrap();
    assert_eq!(
        engine.credit_cards().get_all().await.unwrap(),
        vec![card.clone()]
    );

    let id = card.credit_card_id.unwrap();
    engine.credit_cards().delete(id).await.unwrap();
    engine.credit_cards().delete(id).await.unwrap();
    assert!(engine.credit_cards().get_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn incomes_by_user_and_family() {
    let (engine, db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;
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
    UserRepository::new(db)
        .set_family(bob, Some(family.family_id))
        .await
        .unwrap();

    let mut first = income(300_000, 1);
    engine.incomes().add(alice, &mut first).await.unwrap();
    assert_eq!(first.user_id, Some(alice));
    let mut second = income(150_000, 15);
    engine.incomes().add(bob, &mut second).await.unwrap();
    let mut april = income(1, 1);
    april.income_date = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
    engine.incomes().add(bob, &mut april).await.unwrap();

    assert_eq!(
        engine.incomes().get_by_user(alice, 3, 2024).await.unwrap(),
        vec![first.clone()]
    );
    assert_eq!(
        engine
            .incomes()
            .get_by_family(family.family_id, 3, 2024)
            .await
            .unwrap(),
        vec![first.clone(), second]
    );

    first.income_amount_minor = 310_000;
    engine.incomes().update(alice, &mut first).await.unwrap();
    let id = first.income_id.unwrap();
    assert_eq!(
        engine
            .incomes()
            .get_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .income_amount_minor,
        310_000
    );

    engine.incomes().delete(id).await.unwrap();
    assert!(engine.incomes().get_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn update_of_missing_income_is_key_not_found() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let mut missing = income(1, 1);
    missing.income_id = Some(77);
    let err = engine.incomes().update(alice, &mut missing).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn budgets_resolve_current_period_on_write() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let mut budget = UserBudget {
        budget_id: None,
        user_id: None,
        expense_category_id: Some(1),
        budget_amount_minor: 50_000,
        month: 0,
        year: 0,
    };
    engine.budgets().add(alice, &mut budget).await.unwrap();

    let now = Utc::now();
    assert_eq!(budget.month, now.month());
    assert_eq!(budget.year, now.year());
    assert_eq!(
        engine.budgets().get_by_user(alice, 0, 0).await.unwrap(),
        vec![budget.clone()]
    );
    assert!(
        engine
            .budgets()
            .get_by_user(alice, 1, 1999)
            .await
            .unwrap()
            .is_empty()
    );

    budget.budget_amount_minor = 60_000;
    budget.month = 13;
    let err = engine.budgets().update(alice, &mut budget).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidPeriod(_)));

    budget.month = 2;
    budget.year = 2025;
    engine.budgets().update(alice, &mut budget).await.unwrap();
    let id = budget.budget_id.unwrap();
    let stored = engine.budgets().get_by_id(id).await.unwrap().unwrap();
    assert_eq!((stored.month, stored.year), (2, 2025));
    assert_eq!(stored.budget_amount_minor, 60_000);

    engine.budgets().delete(id).await.unwrap();
    assert!(engine.budgets().get_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn budget_with_unknown_category_is_key_not_found() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let mut budget = UserBudget {
        budget_id: None,
        user_id: None,
        expense_category_id: Some(999),
        budget_amount_minor: 10_000,
        month: 4,
        year: 2024,
    };
    let err = engine.budgets().add(alice, &mut budget).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.budgets().get_by_user(alice, 4, 2024).await.unwrap().is_empty());
}

#[tokio::test]
async fn email_copies_are_listed_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    for subject in ["first", "second"] {
        engine
            .email_copies()
            .add(
                alice,
                &EmailCopyNew {
                    recipient: "bob@example.com".to_string(),
                    subject: subject.to_string(),
                    body: "Hello".to_string(),
                },
            )
            .await
            .unwrap();
    }

    let copies = engine.email_copies().get_by_user(alice).await.unwrap();
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0].subject, "second");

    let err = engine
        .email_copies()
        .add(
            alice,
            &EmailCopyNew {
                recipient: "not-an-address".to_string(),
                subject: "x".to_string(),
                body: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}
