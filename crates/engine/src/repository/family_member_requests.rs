use sea_orm::{ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, prelude::*};

use crate::{ResultEngine, family_member_requests};

#[derive(Clone, Debug)]
pub struct FamilyMemberRequestRepository {
    database: DatabaseConnection,
}

impl FamilyMemberRequestRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub async fn get_by_id(
        &self,
        request_id: i32,
    ) -> ResultEngine<Option<family_member_requests::Model>> {
        Ok(family_member_requests::Entity::find_by_id(request_id)
            .one(&self.database)
            .await?)
    }

    pub async fn get_by_family(
        &self,
        family_id: i32,
    ) -> ResultEngine<Vec<family_member_requests::Model>> {
        Ok(family_member_requests::Entity::find()
            .filter(family_member_requests::Column::FamilyId.eq(family_id))
            .order_by_desc(family_member_requests::Column::CreatedAt)
            .order_by_desc(family_member_requests::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub async fn get_by_requester(
        &self,
        user_id: i32,
    ) -> ResultEngine<Vec<family_member_requests::Model>> {
        Ok(family_member_requests::Entity::find()
            .filter(family_member_requests::Column::RequestedByUserId.eq(user_id))
            .order_by_desc(family_member_requests::Column::CreatedAt)
            .order_by_desc(family_member_requests::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub async fn add(
        &self,
        request: family_member_requests::ActiveModel,
    ) -> ResultEngine<family_member_requests::Model> {
        let mut request = request;
        request.id = ActiveValue::NotSet;
        Ok(request.insert(&self.database).await?)
    }

    /// A missing id is a no-op.
    pub async fn delete(&self, request_id: i32) -> ResultEngine<()> {
        family_member_requests::Entity::delete_by_id(request_id)
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
