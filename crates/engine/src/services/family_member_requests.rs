use api_types::family::{FamilyMemberRequest, FamilyMemberRequestList, FamilyMemberRequestNew};
use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection};

use crate::{
    EngineError, ResultEngine, family_member_requests,
    repository::{FamilyMemberRequestRepository, UserRepository},
    util::{normalize_email, normalize_optional_text},
};

/// Invitations into a family.
///
/// Requests are created, listed and withdrawn. Acceptance happens outside
/// this service, so a request never changes state once stored.
#[derive(Clone, Debug)]
pub struct FamilyMemberRequestService {
    requests: FamilyMemberRequestRepository,
    users: UserRepository,
}

impl FamilyMemberRequestService {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            requests: FamilyMemberRequestRepository::new(database.clone()),
            users: UserRepository::new(database),
        }
    }

    /// Invites `member_email` into the requester's family.
    pub async fn create(
        &self,
        requester_id: i32,
        request: &FamilyMemberRequestNew,
    ) -> ResultEngine<FamilyMemberRequest> {
        let requester = self
            .users
            .get_by_id(requester_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        let family_id = requester.family_id.ok_or_else(|| {
            EngineError::Forbidden("requester does not belong to a family".to_string())
        })?;
        let member_email = normalize_email(&request.member_email)?;

        let stored = self
            .requests
            .add(family_member_requests::ActiveModel {
                id: ActiveValue::NotSet,
                family_id: ActiveValue::Set(family_id),
                requested_by_user_id: ActiveValue::Set(requester_id),
                member_email: ActiveValue::Set(member_email),
                message: ActiveValue::Set(normalize_optional_text(request.message.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            })
            .await?;
        tracing::info!(
            request_id = stored.id,
            family_id,
            requester_id,
            "family member request created"
        );
        Ok(request_to_dto(stored))
    }

    pub async fn get_by_id(&self, request_id: i32) -> ResultEngine<Option<FamilyMemberRequest>> {
        Ok(self.requests.get_by_id(request_id).await?.map(request_to_dto))
    }

    pub async fn get_by_family(&self, family_id: i32) -> ResultEngine<Vec<FamilyMemberRequest>> {
        Ok(self
            .requests
            .get_by_family(family_id)
            .await?
            .into_iter()
            .map(request_to_dto)
            .collect())
    }

    pub async fn get_sent_by(&self, user_id: i32) -> ResultEngine<Vec<FamilyMemberRequest>> {
        Ok(self
            .requests
            .get_by_requester(user_id)
            .await?
            .into_iter()
            .map(request_to_dto)
            .collect())
    }

    /// Requests sent by the user and those targeting their family.
    pub async fn list_for(
        &self,
        user_id: i32,
        family_id: Option<i32>,
    ) -> ResultEngine<FamilyMemberRequestList> {
        let sent = self.get_sent_by(user_id).await?;
        let family = match family_id {
            Some(family_id) => self.get_by_family(family_id).await?,
            None => Vec::new(),
        };
        Ok(FamilyMemberRequestList { sent, family })
    }

    /// Withdraws a request. Only its sender may do so; a missing id is a
    /// no-op.
    pub async fn withdraw(&self, user_id: i32, request_id: i32) -> ResultEngine<()> {
        let Some(request) = self.requests.get_by_id(request_id).await? else {
            return Ok(());
        };
        if request.requested_by_user_id != user_id {
            return Err(EngineError::Forbidden(
                "only the sender may withdraw a request".to_string(),
            ));
        }
        self.requests.delete(request_id).await
    }
}

fn request_to_dto(model: family_member_requests::Model) -> FamilyMemberRequest {
    FamilyMemberRequest {
        request_id: model.id,
        family_id: model.family_id,
        requested_by_user_id: model.requested_by_user_id,
        member_email: model.member_email,
        message: model.message,
        created_at: model.created_at,
    }
}
