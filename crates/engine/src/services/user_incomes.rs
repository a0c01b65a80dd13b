use api_types::income::UserIncome;
use sea_orm::{ActiveValue, DatabaseConnection};

use crate::{
    EngineError, Period, ResultEngine,
    repository::{UserIncomeRepository, UserRepository},
    user_incomes,
    util::normalize_optional_text,
};

#[derive(Clone, Debug)]
pub struct UserIncomeService {
    incomes: UserIncomeRepository,
    users: UserRepository,
}

impl UserIncomeService {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            incomes: UserIncomeRepository::new(database.clone()),
            users: UserRepository::new(database),
        }
    }

    pub async fn get_by_id(&self, income_id: i32) -> ResultEngine<Option<UserIncome>> {
        Ok(self.incomes.get_by_id(income_id).await?.map(income_to_dto))
    }

    pub async fn get_by_user(
        &self,
        user_id: i32,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<UserIncome>> {
        Ok(self
            .incomes
            .get_by_user(user_id, month, year)
            .await?
            .into_iter()
            .map(income_to_dto)
            .collect())
    }

    /// Incomes of every family member, queried member by member.
    pub async fn get_by_family(
        &self,
        family_id: i32,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<UserIncome>> {
        let period = Period::resolve(month, year)?;
        let members = self.users.get_users_by_family_id(family_id).await?;

        let mut result = Vec::new();
        for member in members {
            let incomes = self
                .incomes
                .get_by_user(member.id, period.month, period.year)
                .await?;
            result.extend(incomes.into_iter().map(income_to_dto));
        }
        Ok(result)
    }

    /// Stores a new income owned by `user_id`; the stored record is written
    /// back into `income`.
    pub async fn add(&self, user_id: i32, income: &mut UserIncome) -> ResultEngine<()> {
        let stored = self.incomes.add(income_to_active(user_id, income)).await?;
        tracing::info!(income_id = stored.id, user_id, "income added");
        *income = income_to_dto(stored);
        Ok(())
    }

    /// Full replace of the income identified by `income.income_id`.
    pub async fn update(&self, user_id: i32, income: &mut UserIncome) -> ResultEngine<()> {
        let income_id = income
            .income_id
            .ok_or_else(|| EngineError::KeyNotFound("income id missing".to_string()))?;

        let stored = self
            .incomes
            .update(income_id, income_to_active(user_id, income))
            .await?;
        *income = income_to_dto(stored);
        Ok(())
    }

    pub async fn delete(&self, income_id: i32) -> ResultEngine<()> {
        self.incomes.delete(income_id).await
    }
}

fn income_to_active(user_id: i32, income: &UserIncome) -> user_incomes::ActiveModel {
    user_incomes::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        amount_minor: ActiveValue::Set(income.income_amount_minor),
        source: ActiveValue::Set(normalize_optional_text(income.income_source.as_deref())),
        description: ActiveValue::Set(normalize_optional_text(
            income.income_description.as_deref(),
        )),
        income_date: ActiveValue::Set(income.income_date),
    }
}

fn income_to_dto(model: user_incomes::Model) -> UserIncome {
    UserIncome {
        income_id: Some(model.id),
        user_id: Some(model.user_id),
        income_amount_minor: model.amount_minor,
        income_source: model.source,
        income_description: model.description,
        income_date: model.income_date,
    }
}
