use sea_orm::{ActiveValue, DatabaseConnection, prelude::*};

use crate::{EngineError, ResultEngine, families, users};

use super::with_tx;

#[derive(Clone, Debug)]
pub struct FamilyRepository {
    database: DatabaseConnection,
}

impl FamilyRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub async fn get_by_id(&self, family_id: i32) -> ResultEngine<Option<families::Model>> {
        Ok(families::Entity::find_by_id(family_id)
            .one(&self.database)
            .await?)
    }

    pub async fn add(&self, name: &str) -> ResultEngine<families::Model> {
        let active = families::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name.to_string()),
        };
        Ok(active.insert(&self.database).await?)
    }

    /// Creates a family and moves `founder_id` into it atomically.
    pub async fn add_with_founder(
        &self,
        name: &str,
        founder_id: i32,
    ) -> ResultEngine<families::Model> {
        with_tx!(self, |db_tx| {
            let founder = users::Entity::find_by_id(founder_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let family = families::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name.to_string()),
            }
            .insert(&db_tx)
            .await?;

            let mut founder: users::ActiveModel = founder.into();
            founder.family_id = ActiveValue::Set(Some(family.id));
            founder.update(&db_tx).await?;

            Ok(family)
        })
    }
}
