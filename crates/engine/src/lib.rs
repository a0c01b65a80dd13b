//! Business layer of the expense tracker.
//!
//! [`Engine`] is the facade the transport talks to. It owns one service per
//! record family; services map stored entities to `api_types` DTOs and
//! delegate persistence to the [`repository`] layer.

use sea_orm::DatabaseConnection;

pub use error::EngineError;
pub use expense_items::ExpenseItem;
pub use expenses::Expense;
pub use period::Period;
pub use services::{
    CreditCardService, EmailCopyService, ExpenseService, FamilyMemberRequestService,
    UserBudgetService, UserIncomeService, UserService,
};

pub mod credit_cards;
pub mod email_copies;
pub mod expense_categories;
pub mod expense_items;
pub mod expense_types;
pub mod expenses;
pub mod families;
pub mod family_member_requests;
pub mod repository;
pub mod user_budgets;
pub mod user_incomes;
pub mod users;

mod access;
mod error;
mod period;
mod services;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;

#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
    expenses: ExpenseService,
    users: UserService,
    credit_cards: CreditCardService,
    incomes: UserIncomeService,
    budgets: UserBudgetService,
    family_requests: FamilyMemberRequestService,
    email_copies: EmailCopyService,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn expenses(&self) -> &ExpenseService {
        &self.expenses
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn credit_cards(&self) -> &CreditCardService {
        &self.credit_cards
    }

    pub fn incomes(&self) -> &UserIncomeService {
        &self.incomes
    }

    pub fn budgets(&self) -> &UserBudgetService {
        &self.budgets
    }

    pub fn family_requests(&self) -> &FamilyMemberRequestService {
        &self.family_requests
    }

    pub fn email_copies(&self) -> &EmailCopyService {
        &self.email_copies
    }

    /// Checks the store is reachable.
    pub async fn ping(&self) -> ResultEngine<()> {
        Ok(self.database.ping().await?)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let database = self.database;
        Ok(Engine {
            expenses: ExpenseService::new(database.clone()),
            users: UserService::new(database.clone()),
            credit_cards: CreditCardService::new(database.clone()),
            incomes: UserIncomeService::new(database.clone()),
            budgets: UserBudgetService::new(database.clone()),
            family_requests: FamilyMemberRequestService::new(database.clone()),
            email_copies: EmailCopyService::new(database.clone()),
            database,
        })
    }
}
