//! Repository layer.
//!
//! One repository per entity family. Each translates typed filter parameters
//! into store queries and persists mutations. Reads never fail on absence:
//! a missing record is `None` or an empty `Vec`.

use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};

use crate::{EngineError, ResultEngine};

mod credit_cards;
mod email_copies;
mod expenses;
mod families;
mod family_member_requests;
mod user_budgets;
mod user_incomes;
mod users;

pub use credit_cards::CreditCardRepository;
pub use email_copies::EmailCopyRepository;
pub use expenses::ExpenseRepository;
pub use families::FamilyRepository;
pub use family_member_requests::FamilyMemberRequestRepository;
pub use user_budgets::UserBudgetRepository;
pub use user_incomes::UserIncomeRepository;
pub use users::UserRepository;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$self.database).await?;
        let result: $crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Fails with [`EngineError::KeyNotFound`] when `id` is set but no `E` row
/// carries it. Unset references always pass.
pub(crate) async fn ensure_exists<E, C>(db: &C, id: Option<i32>, label: &str) -> ResultEngine<()>
where
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    C: ConnectionTrait,
{
    let Some(id) = id else {
        return Ok(());
    };
    if E::find_by_id(id).one(db).await?.is_none() {
        return Err(EngineError::KeyNotFound(format!("{label} {id} not exists")));
    }
    Ok(())
}
