use api_types::email::{EmailCopy, EmailCopyNew};
use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection};

use crate::{
    ResultEngine, email_copies,
    repository::EmailCopyRepository,
    util::{normalize_email, normalize_required_name},
};

#[derive(Clone, Debug)]
pub struct EmailCopyService {
    copies: EmailCopyRepository,
}

impl EmailCopyService {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            copies: EmailCopyRepository::new(database),
        }
    }

    /// Records a copy of an e-mail sent on behalf of `user_id`.
    pub async fn add(&self, user_id: i32, copy: &EmailCopyNew) -> ResultEngine<EmailCopy> {
        let recipient = normalize_email(&copy.recipient)?;
        let subject = normalize_required_name(&copy.subject, "subject")?;

        let stored = self
            .copies
            .add(email_copies::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(Some(user_id)),
                recipient: ActiveValue::Set(recipient),
                subject: ActiveValue::Set(subject),
                body: ActiveValue::Set(copy.body.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            })
            .await?;
        tracing::debug!(email_copy_id = stored.id, user_id, "e-mail copy recorded");
        Ok(copy_to_dto(stored))
    }

    pub async fn get_by_user(&self, user_id: i32) -> ResultEngine<Vec<EmailCopy>> {
        Ok(self
            .copies
            .get_by_user(user_id)
            .await?
            .into_iter()
            .map(copy_to_dto)
            .collect())
    }
}

fn copy_to_dto(model: email_copies::Model) -> EmailCopy {
    EmailCopy {
        email_copy_id: model.id,
        user_id: model.user_id,
        recipient: model.recipient,
        subject: model.subject,
        body: model.body,
        created_at: model.created_at,
    }
}
