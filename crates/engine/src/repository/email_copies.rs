use sea_orm::{ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, prelude::*};

use crate::{ResultEngine, email_copies};

#[derive(Clone, Debug)]
pub struct EmailCopyRepository {
    database: DatabaseConnection,
}

impl EmailCopyRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub async fn get_by_user(&self, user_id: i32) -> ResultEngine<Vec<email_copies::Model>> {
        Ok(email_copies::Entity::find()
            .filter(email_copies::Column::UserId.eq(user_id))
            .order_by_desc(email_copies::Column::CreatedAt)
            .order_by_desc(email_copies::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub async fn add(
        &self,
        copy: email_copies::ActiveModel,
    ) -> ResultEngine<email_copies::Model> {
        let mut copy = copy;
        copy.id = ActiveValue::NotSet;
        Ok(copy.insert(&self.database).await?)
    }
}
