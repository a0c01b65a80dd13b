//! Visibility rules shared by every per-user record.
//!
//! A record is readable by its owner and by members of the owner's family.
//! Only the owner may modify or delete it. Records a caller cannot read look
//! missing to that caller.

use api_types::user::UserProfile;

use crate::{Engine, EngineError, ResultEngine};

impl Engine {
    /// Whether `viewer` may read a record owned by `owner_id`.
    pub async fn can_view(&self, viewer: &UserProfile, owner_id: Option<i32>) -> ResultEngine<bool> {
        let Some(owner_id) = owner_id else {
            return Ok(false);
        };
        if owner_id == viewer.user_id {
            return Ok(true);
        }
        let Some(family_id) = viewer.family_id else {
            return Ok(false);
        };

        let owner = self.users.get_by_id(owner_id).await?;
        Ok(owner.is_some_and(|owner| owner.family_id == Some(family_id)))
    }

    /// Fails with [`EngineError::Forbidden`] unless `viewer` owns the record.
    pub fn require_owner(viewer: &UserProfile, owner_id: Option<i32>) -> ResultEngine<()> {
        if owner_id == Some(viewer.user_id) {
            return Ok(());
        }
        Err(EngineError::Forbidden(
            "only the owner may modify this record".to_string(),
        ))
    }

    /// Checks that `viewer` may modify a record owned by `owner_id`.
    ///
    /// Records hidden from `viewer` fail with [`EngineError::KeyNotFound`],
    /// as if they did not exist. Visible records owned by someone else fail
    /// with [`EngineError::Forbidden`].
    pub async fn require_modifiable(
        &self,
        viewer: &UserProfile,
        owner_id: Option<i32>,
        record: &str,
    ) -> ResultEngine<()> {
        if !self.can_view(viewer, owner_id).await? {
            return Err(EngineError::KeyNotFound(format!("{record} not exists")));
        }
        Self::require_owner(viewer, owner_id)
    }

    /// Fails with [`EngineError::Forbidden`] unless `viewer` belongs to
    /// `family_id`.
    pub fn require_family_member(viewer: &UserProfile, family_id: i32) -> ResultEngine<()> {
        if viewer.family_id == Some(family_id) {
            return Ok(());
        }
        Err(EngineError::Forbidden(
            "caller does not belong to this family".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(user_id: i32, family_id: Option<i32>) -> UserProfile {
        UserProfile {
            user_id,
            display_name: "Ada".to_string(),
            email: None,
            family_id,
        }
    }

    #[test]
    fn only_owner_may_modify() {
        let viewer = profile(1, Some(7));
        assert!(Engine::require_owner(&viewer, Some(1)).is_ok());
        assert!(matches!(
            Engine::require_owner(&viewer, Some(2)),
            Err(EngineError::Forbidden(_))
        ));
        assert!(Engine::require_owner(&viewer, None).is_err());
    }

    #[test]
    fn family_membership_is_checked() {
        assert!(Engine::require_family_member(&profile(1, Some(7)), 7).is_ok());
        assert!(Engine::require_family_member(&profile(1, None), 7).is_err());
    }
}
