use sea_orm::{
    ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, prelude::*,
};

use crate::{EngineError, ResultEngine, families, users};

use super::ensure_exists;

#[derive(Clone, Debug)]
pub struct UserRepository {
    database: DatabaseConnection,
}

impl UserRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub async fn get_by_id(&self, user_id: i32) -> ResultEngine<Option<users::Model>> {
        Ok(users::Entity::find_by_id(user_id).one(&self.database).await?)
    }

    /// Looks a profile up by the identity provider's subject.
    pub async fn get_by_identity(&self, identity_id: &str) -> ResultEngine<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::IdentityId.eq(identity_id))
            .one(&self.database)
            .await?)
    }

    /// Members of a family, ordered by id. Unknown families yield no members.
    pub async fn get_users_by_family_id(&self, family_id: i32) -> ResultEngine<Vec<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::FamilyId.eq(family_id))
            .order_by_asc(users::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub(crate) async fn get_user_ids_by_family_id(&self, family_id: i32) -> ResultEngine<Vec<i32>> {
        Ok(users::Entity::find()
            .select_only()
            .column(users::Column::Id)
            .filter(users::Column::FamilyId.eq(family_id))
            .into_tuple::<i32>()
            .all(&self.database)
            .await?)
    }

    pub async fn add(
        &self,
        identity_id: &str,
        display_name: &str,
        email: Option<String>,
    ) -> ResultEngine<users::Model> {
        let active = users::ActiveModel {
            id: ActiveValue::NotSet,
            identity_id: ActiveValue::Set(identity_id.to_string()),
            display_name: ActiveValue::Set(display_name.to_string()),
            email: ActiveValue::Set(email),
            family_id: ActiveValue::Set(None),
        };
        Ok(active.insert(&self.database).await?)
    }

    /// Replaces display name and e-mail of an existing profile.
    pub async fn update(
        &self,
        user_id: i32,
        display_name: &str,
        email: Option<String>,
    ) -> ResultEngine<users::Model> {
        let model = self
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

        let mut active: users::ActiveModel = model.into();
        active.display_name = ActiveValue::Set(display_name.to_string());
        active.email = ActiveValue::Set(email);
        Ok(active.update(&self.database).await?)
    }

    /// Moves a user into `family_id`, or out of any family with `None`.
    ///
    /// Administrative entry point. The HTTP API only places a founder into
    /// the family it creates (`POST /api/families`); further members are
    /// added through this call.
    pub async fn set_family(
        &self,
        user_id: i32,
        family_id: Option<i32>,
    ) -> ResultEngine<users::Model> {
        ensure_exists::<families::Entity, _>(&self.database, family_id, "family").await?;
        let model = self
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

        let mut active: users::ActiveModel = model.into();
        active.family_id = ActiveValue::Set(family_id);
        Ok(active.update(&self.database).await?)
    }
}
