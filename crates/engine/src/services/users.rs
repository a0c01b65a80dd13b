use api_types::{
    family::{Family, FamilyNew},
    user::{UserProfile, UserProfileNew, UserProfileUpdate},
};
use sea_orm::DatabaseConnection;

use crate::{
    EngineError, ResultEngine, families,
    repository::{FamilyRepository, UserRepository},
    users,
    util::{normalize_email, normalize_required_name},
};

#[derive(Clone, Debug)]
pub struct UserService {
    users: UserRepository,
    families: FamilyRepository,
}

impl UserService {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(database.clone()),
            families: FamilyRepository::new(database),
        }
    }

    pub async fn get_by_id(&self, user_id: i32) -> ResultEngine<Option<UserProfile>> {
        Ok(self.users.get_by_id(user_id).await?.map(profile_to_dto))
    }

    /// Profile registered for the token subject, if any.
    pub async fn get_by_identity(&self, identity_id: &str) -> ResultEngine<Option<UserProfile>> {
        Ok(self
            .users
            .get_by_identity(identity_id)
            .await?
            .map(profile_to_dto))
    }

    pub async fn get_family_members(&self, family_id: i32) -> ResultEngine<Vec<UserProfile>> {
        Ok(self
            .users
            .get_users_by_family_id(family_id)
            .await?
            .into_iter()
            .map(profile_to_dto)
            .collect())
    }

    /// Registers the profile of a new identity.
    pub async fn register(
        &self,
        identity_id: &str,
        profile: &UserProfileNew,
    ) -> ResultEngine<UserProfile> {
        if self.users.get_by_identity(identity_id).await?.is_some() {
            return Err(EngineError::ExistingKey("user profile".to_string()));
        }
        let display_name = normalize_required_name(&profile.display_name, "display")?;
        let email = optional_email(profile.email.as_deref())?;

        let stored = self.users.add(identity_id, &display_name, email).await?;
        tracing::info!(user_id = stored.id, "user profile registered");
        Ok(profile_to_dto(stored))
    }

    pub async fn update(
        &self,
        user_id: i32,
        profile: &UserProfileUpdate,
    ) -> ResultEngine<UserProfile> {
        let display_name = normalize_required_name(&profile.display_name, "display")?;
        let email = optional_email(profile.email.as_deref())?;

        let stored = self.users.update(user_id, &display_name, email).await?;
        Ok(profile_to_dto(stored))
    }

    pub async fn get_family(&self, family_id: i32) -> ResultEngine<Option<Family>> {
        Ok(self.families.get_by_id(family_id).await?.map(family_to_dto))
    }

    /// Creates a family and makes `user_id` its first member.
    ///
    /// A user already in a family must leave it first.
    pub async fn create_family(&self, user_id: i32, family: &FamilyNew) -> ResultEngine<Family> {
        let name = normalize_required_name(&family.family_name, "family")?;
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        if user.family_id.is_some() {
            return Err(EngineError::ExistingKey("family membership".to_string()));
        }

        let stored = self.families.add_with_founder(&name, user_id).await?;
        tracing::info!(family_id = stored.id, user_id, "family created");
        Ok(family_to_dto(stored))
    }
}

fn optional_email(value: Option<&str>) -> ResultEngine<Option<String>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(email) => normalize_email(email).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn profile_to_dto(model: users::Model) -> UserProfile {
    UserProfile {
        user_id: model.id,
        display_name: model.display_name,
        email: model.email,
        family_id: model.family_id,
    }
}

fn family_to_dto(model: families::Model) -> Family {
    Family {
        family_id: model.id,
        family_name: model.name,
    }
}
