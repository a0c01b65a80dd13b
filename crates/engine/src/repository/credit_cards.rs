use sea_orm::{ActiveValue, DatabaseConnection, QueryOrder, prelude::*};

use crate::{EngineError, ResultEngine, credit_cards};

#[derive(Clone, Debug)]
pub struct CreditCardRepository {
    database: DatabaseConnection,
}

impl CreditCardRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub async fn get_all(&self) -> ResultEngine<Vec<credit_cards::Model>> {
        Ok(credit_cards::Entity::find()
            .order_by_asc(credit_cards::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub async fn get_by_id(&self, credit_card_id: i32) -> ResultEngine<Option<credit_cards::Model>> {
        Ok(credit_cards::Entity::find_by_id(credit_card_id)
            .one(&self.database)
            .await?)
    }

    pub async fn add(&self, name: &str, last_four_digits: &str) -> ResultEngine<credit_cards::Model> {
        let active = credit_cards::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name.to_string()),
            last_four_digits: ActiveValue::Set(last_four_digits.to_string()),
        };
        Ok(active.insert(&self.database).await?)
    }

    pub async fn update(
        &self,
        credit_card_id: i32,
        name: &str,
        last_four_digits: &str,
    ) -> ResultEngine<credit_cards::Model> {
        let model = self
            .get_by_id(credit_card_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("credit card not exists".to_string()))?;

        let mut active: credit_cards::ActiveModel = model.into();
        active.name = ActiveValue::Set(name.to_string());
        active.last_four_digits = ActiveValue::Set(last_four_digits.to_string());
        Ok(active.update(&self.database).await?)
    }

    /// A missing id is a no-op. Expenses charged to the card keep existing
    /// with the card reference cleared.
    pub async fn delete(&self, credit_card_id: i32) -> ResultEngine<()> {
        credit_cards::Entity::delete_by_id(credit_card_id)
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
