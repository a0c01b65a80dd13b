use sea_orm::{ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, prelude::*};

use crate::{EngineError, Period, ResultEngine, expense_categories, user_budgets};

use super::ensure_exists;

#[derive(Clone, Debug)]
pub struct UserBudgetRepository {
    database: DatabaseConnection,
}

impl UserBudgetRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub async fn get_by_id(&self, budget_id: i32) -> ResultEngine<Option<user_budgets::Model>> {
        Ok(user_budgets::Entity::find_by_id(budget_id)
            .one(&self.database)
            .await?)
    }

    /// Budgets of `user_id` for the month (`0` = current).
    pub async fn get_by_user(
        &self,
        user_id: i32,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<user_budgets::Model>> {
        let period = Period::resolve(month, year)?;

        Ok(user_budgets::Entity::find()
            .filter(user_budgets::Column::UserId.eq(user_id))
            .filter(user_budgets::Column::Month.eq(period.month as i32))
            .filter(user_budgets::Column::Year.eq(period.year))
            .order_by_asc(user_budgets::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub async fn add(&self, budget: user_budgets::ActiveModel) -> ResultEngine<user_budgets::Model> {
        let mut budget = budget;
        budget.id = ActiveValue::NotSet;
        self.check_category(&budget).await?;
        Ok(budget.insert(&self.database).await?)
    }

    /// Full replace of an existing budget.
    pub async fn update(
        &self,
        budget_id: i32,
        budget: user_budgets::ActiveModel,
    ) -> ResultEngine<user_budgets::Model> {
        if self.get_by_id(budget_id).await?.is_none() {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        let mut budget = budget;
        budget.id = ActiveValue::Unchanged(budget_id);
        self.check_category(&budget).await?;
        Ok(budget.update(&self.database).await?)
    }

    async fn check_category(&self, budget: &user_budgets::ActiveModel) -> ResultEngine<()> {
        let category_id = match &budget.expense_category_id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => *id,
            ActiveValue::NotSet => None,
        };
        ensure_exists::<expense_categories::Entity, _>(&self.database, category_id, "expense category")
            .await
    }

    /// A missing id is a no-op.
    pub async fn delete(&self, budget_id: i32) -> ResultEngine<()> {
        user_budgets::Entity::delete_by_id(budget_id)
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
