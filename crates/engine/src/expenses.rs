//! Expense headers.
//!
//! An [`Expense`] is a header optionally broken down into [`ExpenseItem`]s.
//! When items are present the header amount equals their sum. The service
//! layer reconciles it on write; the store does not enforce it.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::expense_items::{self, ExpenseItem};

/// An expense header together with its line items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    /// `None` until the store assigns one.
    pub id: Option<i32>,
    pub user_id: Option<i32>,
    pub amount_minor: i64,
    pub expense_category_id: Option<i32>,
    pub expense_type_id: Option<i32>,
    pub credit_card_id: Option<i32>,
    pub description: Option<String>,
    pub expense_date: DateTime<Utc>,
    pub items: Vec<ExpenseItem>,
}

impl Expense {
    pub(crate) fn from_models(model: Model, items: Vec<expense_items::Model>) -> Self {
        Self {
            id: Some(model.id),
            user_id: model.user_id,
            amount_minor: model.amount_minor,
            expense_category_id: model.expense_category_id,
            expense_type_id: model.expense_type_id,
            credit_card_id: model.credit_card_id,
            description: model.description,
            expense_date: model.expense_date,
            items: items.into_iter().map(ExpenseItem::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub amount_minor: i64,
    pub expense_category_id: Option<i32>,
    pub expense_type_id: Option<i32>,
    pub credit_card_id: Option<i32>,
    pub description: Option<String>,
    pub expense_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
    #[sea_orm(has_many = "super::expense_items::Entity")]
    Items,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::expense_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: value.id.map_or(ActiveValue::NotSet, ActiveValue::Unchanged),
            user_id: ActiveValue::Set(value.user_id),
            amount_minor: ActiveValue::Set(value.amount_minor),
            expense_category_id: ActiveValue::Set(value.expense_category_id),
            expense_type_id: ActiveValue::Set(value.expense_type_id),
            credit_card_id: ActiveValue::Set(value.credit_card_id),
            description: ActiveValue::Set(value.description.clone()),
            expense_date: ActiveValue::Set(value.expense_date),
        }
    }
}
