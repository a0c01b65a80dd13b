use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseConnection, LoaderTrait, QueryFilter, QueryOrder, prelude::*,
    sea_query::Expr,
};

use crate::{
    EngineError, Expense, Period, ResultEngine, credit_cards, expense_categories, expense_items,
    expense_types, expenses, users,
};

use super::{UserRepository, ensure_exists, with_tx};

#[derive(Clone, Debug)]
pub struct ExpenseRepository {
    database: DatabaseConnection,
}

impl ExpenseRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Fetches one expense with its items.
    pub async fn get_by_id(&self, expense_id: i32) -> ResultEngine<Option<Expense>> {
        let Some(model) = expenses::Entity::find_by_id(expense_id)
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };

        let items = model
            .find_related(expense_items::Entity)
            .order_by_asc(expense_items::Column::Id)
            .all(&self.database)
            .await?;

        Ok(Some(Expense::from_models(model, items)))
    }

    /// Expenses owned by `user_id` dated within the calendar month.
    ///
    /// `month`/`year` set to `0` resolve to the current UTC month/year.
    pub async fn get_by_user(
        &self,
        user_id: i32,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<Expense>> {
        let (start, end) = Period::resolve(month, year)?.bounds()?;

        let models = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .filter(expenses::Column::ExpenseDate.gte(start))
            .filter(expenses::Column::ExpenseDate.lt(end))
            .order_by_asc(expenses::Column::ExpenseDate)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;

        self.with_items(models).await
    }

    /// Expenses owned by any member of `family_id` within the calendar month,
    /// in a single set-filtered query.
    pub async fn get_by_family(
        &self,
        family_id: i32,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<Expense>> {
        let (start, end) = Period::resolve(month, year)?.bounds()?;

        let user_ids = UserRepository::new(self.database.clone())
            .get_user_ids_by_family_id(family_id)
            .await?;
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = expenses::Entity::find()
            .filter(expenses::Column::UserId.is_in(user_ids))
            .filter(expenses::Column::ExpenseDate.gte(start))
            .filter(expenses::Column::ExpenseDate.lt(end))
            .order_by_asc(expenses::Column::ExpenseDate)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;

        self.with_items(models).await
    }

    async fn with_items(&self, models: Vec<expenses::Model>) -> ResultEngine<Vec<Expense>> {
        let items = models
            .load_many(expense_items::Entity, &self.database)
            .await?;

        Ok(models
            .into_iter()
            .zip(items)
            .map(|(model, mut items)| {
                items.sort_by_key(|item| item.id);
                Expense::from_models(model, items)
            })
            .collect())
    }

    /// Inserts the header and its items in one transaction.
    ///
    /// Returns the stored expense carrying the store-assigned identifiers.
    pub async fn add(&self, expense: &Expense) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            check_references(&db_tx, expense).await?;

            let mut header: expenses::ActiveModel = expense.into();
            header.id = ActiveValue::NotSet;
            let header = header.insert(&db_tx).await?;

            let mut items = Vec::with_capacity(expense.items.len());
            for item in &expense.items {
                let mut active: expense_items::ActiveModel = item.into();
                active.id = ActiveValue::NotSet;
                active.expense_id = ActiveValue::Set(Some(header.id));
                items.push(active.insert(&db_tx).await?);
            }

            Ok(Expense::from_models(header, items))
        })
    }

    /// Replaces the stored header and its items with `expense`.
    ///
    /// Listed items with an id are updated, items without one are inserted,
    /// and previously attached items missing from the list are detached
    /// (their parent reference is cleared).
    pub async fn update(&self, expense: &Expense) -> ResultEngine<Expense> {
        let expense_id = expense
            .id
            .ok_or_else(|| EngineError::KeyNotFound("expense id missing".to_string()))?;

        with_tx!(self, |db_tx| {
            if expenses::Entity::find_by_id(expense_id)
                .one(&db_tx)
                .await?
                .is_none()
            {
                return Err(EngineError::KeyNotFound("expense not exists".to_string()));
            }
            check_references(&db_tx, expense).await?;

            let header = expenses::ActiveModel::from(expense).update(&db_tx).await?;

            let kept: Vec<i32> = expense.items.iter().filter_map(|item| item.id).collect();
            let mut detach = expense_items::Entity::update_many()
                .col_expr(
                    expense_items::Column::ExpenseId,
                    Expr::value(Option::<i32>::None),
                )
                .filter(expense_items::Column::ExpenseId.eq(expense_id));
            if !kept.is_empty() {
                detach = detach.filter(expense_items::Column::Id.is_not_in(kept));
            }
            detach.exec(&db_tx).await?;

            let mut items = Vec::with_capacity(expense.items.len());
            for item in &expense.items {
                let mut active: expense_items::ActiveModel = item.into();
                active.expense_id = ActiveValue::Set(Some(expense_id));
                let stored = match item.id {
                    Some(item_id) => {
                        let attached = expense_items::Entity::find_by_id(item_id)
                            .one(&db_tx)
                            .await?
                            .is_some_and(|model| model.expense_id == Some(expense_id));
                        if !attached {
                            return Err(EngineError::KeyNotFound(format!(
                                "expense item {item_id} not exists for expense {expense_id}"
                            )));
                        }
                        active.update(&db_tx).await?
                    }
                    None => active.insert(&db_tx).await?,
                };
                items.push(stored);
            }

            Ok(Expense::from_models(header, items))
        })
    }

    /// Deletes the header. A missing id is a no-op.
    ///
    /// Items are not removed here: the store clears their parent reference.
    pub async fn delete(&self, expense_id: i32) -> ResultEngine<()> {
        let result = expenses::Entity::delete_by_id(expense_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            tracing::debug!(expense_id, "delete of missing expense ignored");
        }
        Ok(())
    }

    pub async fn get_all_expense_types(&self) -> ResultEngine<Vec<expense_types::Model>> {
        Ok(expense_types::Entity::find()
            .order_by_asc(expense_types::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub async fn get_all_expense_categories(
        &self,
    ) -> ResultEngine<Vec<expense_categories::Model>> {
        Ok(expense_categories::Entity::find()
            .order_by_asc(expense_categories::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub async fn get_all_credit_cards(&self) -> ResultEngine<Vec<credit_cards::Model>> {
        Ok(credit_cards::Entity::find()
            .order_by_asc(credit_cards::Column::Id)
            .all(&self.database)
            .await?)
    }
}

/// Every owner, category, type and credit card the header or its items point
/// at must exist.
async fn check_references<C: ConnectionTrait>(db: &C, expense: &Expense) -> ResultEngine<()> {
    ensure_exists::<users::Entity, _>(db, expense.user_id, "user").await?;
    ensure_exists::<expense_categories::Entity, _>(db, expense.expense_category_id, "expense category")
        .await?;
    ensure_exists::<expense_types::Entity, _>(db, expense.expense_type_id, "expense type").await?;
    ensure_exists::<credit_cards::Entity, _>(db, expense.credit_card_id, "credit card").await?;

    for item in &expense.items {
        ensure_exists::<users::Entity, _>(db, item.user_id, "user").await?;
        ensure_exists::<expense_categories::Entity, _>(db, item.expense_category_id, "expense category")
            .await?;
        ensure_exists::<expense_types::Entity, _>(db, item.expense_type_id, "expense type").await?;
        ensure_exists::<credit_cards::Entity, _>(db, item.credit_card_id, "credit card").await?;
    }
    Ok(())
}
