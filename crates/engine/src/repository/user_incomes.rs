use sea_orm::{ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, prelude::*};

use crate::{EngineError, Period, ResultEngine, user_incomes};

#[derive(Clone, Debug)]
pub struct UserIncomeRepository {
    database: DatabaseConnection,
}

impl UserIncomeRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub async fn get_by_id(&self, income_id: i32) -> ResultEngine<Option<user_incomes::Model>> {
        Ok(user_incomes::Entity::find_by_id(income_id)
            .one(&self.database)
            .await?)
    }

    /// Incomes of `user_id` dated within the calendar month (`0` = current).
    pub async fn get_by_user(
        &self,
        user_id: i32,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<user_incomes::Model>> {
        let (start, end) = Period::resolve(month, year)?.bounds()?;

        Ok(user_incomes::Entity::find()
            .filter(user_incomes::Column::UserId.eq(user_id))
            .filter(user_incomes::Column::IncomeDate.gte(start))
            .filter(user_incomes::Column::IncomeDate.lt(end))
            .order_by_asc(user_incomes::Column::IncomeDate)
            .order_by_asc(user_incomes::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub async fn add(&self, income: user_incomes::ActiveModel) -> ResultEngine<user_incomes::Model> {
        let mut income = income;
        income.id = ActiveValue::NotSet;
        Ok(income.insert(&self.database).await?)
    }

    /// Full replace of an existing income.
    pub async fn update(
        &self,
        income_id: i32,
        income: user_incomes::ActiveModel,
    ) -> ResultEngine<user_incomes::Model> {
        if self.get_by_id(income_id).await?.is_none() {
            return Err(EngineError::KeyNotFound("income not exists".to_string()));
        }
        let mut income = income;
        income.id = ActiveValue::Unchanged(income_id);
        Ok(income.update(&self.database).await?)
    }

    /// A missing id is a no-op.
    pub async fn delete(&self, income_id: i32) -> ResultEngine<()> {
        user_incomes::Entity::delete_by_id(income_id)
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
