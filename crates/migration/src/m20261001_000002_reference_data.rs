//! Seeds the read-only reference tables.
//!
//! The API never writes `expense_types` or `expense_categories`; their rows
//! are owned by migrations.

use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum ExpenseTypes {
    Table,
    Name,
}

#[derive(Iden)]
enum ExpenseCategories {
    Table,
    Name,
}

const EXPENSE_TYPES: [&str; 4] = ["Fixed", "Variable", "Periodic", "One-off"];

const EXPENSE_CATEGORIES: [&str; 10] = [
    "Groceries",
    "Housing",
    "Utilities",
    "Transport",
    "Health",
    "Education",
    "Entertainment",
    "Dining",
    "Clothing",
    "Other",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let mut types = Query::insert()
            .into_table(ExpenseTypes::Table)
            .columns([ExpenseTypes::Name])
            .to_owned();
        for name in EXPENSE_TYPES {
            types.values_panic([name.into()]);
        }
        db.execute(backend.build(&types)).await?;

        let mut categories = Query::insert()
            .into_table(ExpenseCategories::Table)
            .columns([ExpenseCategories::Name])
            .to_owned();
        for name in EXPENSE_CATEGORIES {
            categories.values_panic([name.into()]);
        }
        db.execute(backend.build(&categories)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let types = Query::delete()
            .from_table(ExpenseTypes::Table)
            .and_where(Expr::col(ExpenseTypes::Name).is_in(EXPENSE_TYPES))
            .to_owned();
        db.execute(backend.build(&types)).await?;

        let categories = Query::delete()
            .from_table(ExpenseCategories::Table)
            .and_where(Expr::col(ExpenseCategories::Name).is_in(EXPENSE_CATEGORIES))
            .to_owned();
        db.execute(backend.build(&categories)).await?;

        Ok(())
    }
}
