use api_types::budget::UserBudget;
use sea_orm::{ActiveValue, DatabaseConnection};

use crate::{
    EngineError, Period, ResultEngine, repository::UserBudgetRepository, user_budgets,
};

#[derive(Clone, Debug)]
pub struct UserBudgetService {
    budgets: UserBudgetRepository,
}

impl UserBudgetService {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            budgets: UserBudgetRepository::new(database),
        }
    }

    pub async fn get_by_id(&self, budget_id: i32) -> ResultEngine<Option<UserBudget>> {
        self.budgets
            .get_by_id(budget_id)
            .await?
            .map(budget_to_dto)
            .transpose()
    }

    pub async fn get_by_user(
        &self,
        user_id: i32,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<UserBudget>> {
        self.budgets
            .get_by_user(user_id, month, year)
            .await?
            .into_iter()
            .map(budget_to_dto)
            .collect()
    }

    /// Stores a new budget owned by `user_id`. A `0` month or year is stored
    /// as the current one.
    pub async fn add(&self, user_id: i32, budget: &mut UserBudget) -> ResultEngine<()> {
        let active = budget_to_active(user_id, budget)?;
        let stored = self.budgets.add(active).await?;
        tracing::info!(budget_id = stored.id, user_id, "budget added");
        *budget = budget_to_dto(stored)?;
        Ok(())
    }

    pub async fn update(&self, user_id: i32, budget: &mut UserBudget) -> ResultEngine<()> {
        let budget_id = budget
            .budget_id
            .ok_or_else(|| EngineError::KeyNotFound("budget id missing".to_string()))?;

        let active = budget_to_active(user_id, budget)?;
        let stored = self.budgets.update(budget_id, active).await?;
        *budget = budget_to_dto(stored)?;
        Ok(())
    }

    pub async fn delete(&self, budget_id: i32) -> ResultEngine<()> {
        self.budgets.delete(budget_id).await
    }
}

fn budget_to_active(user_id: i32, budget: &UserBudget) -> ResultEngine<user_budgets::ActiveModel> {
    let period = Period::resolve(budget.month, budget.year)?;
    let month = i32::try_from(period.month)
        .map_err(|_| EngineError::InvalidPeriod(format!("month {} out of range", period.month)))?;

    Ok(user_budgets::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        expense_category_id: ActiveValue::Set(budget.expense_category_id),
        amount_minor: ActiveValue::Set(budget.budget_amount_minor),
        month: ActiveValue::Set(month),
        year: ActiveValue::Set(period.year),
    })
}

fn budget_to_dto(model: user_budgets::Model) -> ResultEngine<UserBudget> {
    let month = u32::try_from(model.month).map_err(|_| {
        EngineError::InvalidPeriod(format!("stored month {} out of range", model.month))
    })?;

    Ok(UserBudget {
        budget_id: Some(model.id),
        user_id: Some(model.user_id),
        expense_category_id: model.expense_category_id,
        budget_amount_minor: model.amount_minor,
        month,
        year: model.year,
    })
}
