//! Expense line items.
//!
//! Items share the header's attribute shape. `expense_id` is nullable: when a
//! header is deleted the store clears the reference and keeps the item.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseItem {
    pub id: Option<i32>,
    pub expense_id: Option<i32>,
    pub user_id: Option<i32>,
    pub amount_minor: i64,
    pub expense_category_id: Option<i32>,
    pub expense_type_id: Option<i32>,
    pub credit_card_id: Option<i32>,
    pub description: Option<String>,
    pub expense_date: DateTime<Utc>,
}

impl From<Model> for ExpenseItem {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            expense_id: model.expense_id,
            user_id: model.user_id,
            amount_minor: model.amount_minor,
            expense_category_id: model.expense_category_id,
            expense_type_id: model.expense_type_id,
            credit_card_id: model.credit_card_id,
            description: model.description,
            expense_date: model.expense_date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub expense_id: Option<i32>,
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
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Expense,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ExpenseItem> for ActiveModel {
    fn from(value: &ExpenseItem) -> Self {
        Self {
            id: value.id.map_or(ActiveValue::NotSet, ActiveValue::Unchanged),
            expense_id: ActiveValue::Set(value.expense_id),
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
