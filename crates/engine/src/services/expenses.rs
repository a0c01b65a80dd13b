use std::collections::HashSet;

use api_types::expense as dto;
use sea_orm::DatabaseConnection;

use crate::{
    EngineError, Expense, ExpenseItem, Period, ResultEngine,
    repository::{ExpenseRepository, UserRepository},
    util::{checked_sum, normalize_optional_text},
};

use super::credit_cards::credit_card_to_dto;

#[derive(Clone, Debug)]
pub struct ExpenseService {
    expenses: ExpenseRepository,
    users: UserRepository,
}

impl ExpenseService {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            expenses: ExpenseRepository::new(database.clone()),
            users: UserRepository::new(database),
        }
    }

    pub async fn get_expense_by_id(&self, expense_id: i32) -> ResultEngine<Option<dto::Expense>> {
        Ok(self
            .expenses
            .get_by_id(expense_id)
            .await?
            .map(expense_to_dto))
    }

    pub async fn get_expenses_by_user_id(
        &self,
        user_id: i32,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<dto::Expense>> {
        Ok(self
            .expenses
            .get_by_user(user_id, month, year)
            .await?
            .into_iter()
            .map(expense_to_dto)
            .collect())
    }

    /// Expenses of every member of the family, one repository call per
    /// member, concatenated in member id order.
    ///
    /// The period is resolved once so every member is queried for the same
    /// month even across a month boundary.
    pub async fn get_expenses_by_family_id(
        &self,
        family_id: i32,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<dto::Expense>> {
        let period = Period::resolve(month, year)?;
        let members = self.users.get_users_by_family_id(family_id).await?;

        let mut result = Vec::new();
        for member in members {
            let expenses = self
                .expenses
                .get_by_user(member.id, period.month, period.year)
                .await?;
            result.extend(expenses.into_iter().map(expense_to_dto));
        }

        tracing::debug!(family_id, count = result.len(), "family expenses loaded");
        Ok(result)
    }

    /// Stores a new expense.
    ///
    /// The generated identifiers and the reconciled amount are written back
    /// into `expense`.
    pub async fn add_expense(&self, expense: &mut dto::Expense) -> ResultEngine<()> {
        let mut domain = expense_from_dto(expense)?;
        domain.id = None;
        for item in &mut domain.items {
            item.id = None;
        }

        let stored = self.expenses.add(&domain).await?;
        tracing::info!(
            expense_id = stored.id,
            items = stored.items.len(),
            "expense added"
        );
        *expense = expense_to_dto(stored);
        Ok(())
    }

    /// Replaces a stored expense with `expense`. No field is merged.
    pub async fn update_expense(&self, expense: &mut dto::Expense) -> ResultEngine<()> {
        let domain = expense_from_dto(expense)?;
        let stored = self.expenses.update(&domain).await?;
        tracing::info!(expense_id = stored.id, "expense updated");
        *expense = expense_to_dto(stored);
        Ok(())
    }

    pub async fn delete_expense(&self, expense_id: i32) -> ResultEngine<()> {
        self.expenses.delete(expense_id).await
    }

    pub async fn get_all_expense_types(&self) -> ResultEngine<Vec<dto::ExpenseType>> {
        Ok(self
            .expenses
            .get_all_expense_types()
            .await?
            .into_iter()
            .map(|model| dto::ExpenseType {
                expense_type_id: model.id,
                expense_type_name: model.name,
            })
            .collect())
    }

    pub async fn get_all_expense_categories(&self) -> ResultEngine<Vec<dto::ExpenseCategory>> {
        Ok(self
            .expenses
            .get_all_expense_categories()
            .await?
            .into_iter()
            .map(|model| dto::ExpenseCategory {
                expense_category_id: model.id,
                expense_category_name: model.name,
            })
            .collect())
    }

    pub async fn get_all_credit_cards(
        &self,
    ) -> ResultEngine<Vec<api_types::credit_card::CreditCard>> {
        Ok(self
            .expenses
            .get_all_credit_cards()
            .await?
            .into_iter()
            .map(credit_card_to_dto)
            .collect())
    }
}

/// Header amount to store: the items' sum when any item exists, else the
/// submitted header amount.
fn reconciled_amount(header_amount: i64, items: &[ExpenseItem]) -> ResultEngine<i64> {
    if items.is_empty() {
        return Ok(header_amount);
    }
    checked_sum(items.iter().map(|item| item.amount_minor))
}

pub(crate) fn expense_from_dto(value: &dto::Expense) -> ResultEngine<Expense> {
    let mut listed = HashSet::new();
    for item_id in value.expense_items.iter().filter_map(|item| item.expense_item_id) {
        if !listed.insert(item_id) {
            return Err(EngineError::ExistingKey(format!(
                "expense item {item_id} listed more than once"
            )));
        }
    }

    // Items always belong to the header's owner.
    let items: Vec<ExpenseItem> = value
        .expense_items
        .iter()
        .map(|item| ExpenseItem {
            id: item.expense_item_id,
            expense_id: value.expense_id,
            user_id: value.user_id,
            amount_minor: item.expense_amount_minor,
            expense_category_id: item.expense_category_id,
            expense_type_id: item.expense_type_id,
            credit_card_id: item.credit_card_id,
            description: normalize_optional_text(item.expense_description.as_deref()),
            expense_date: item.expense_date,
        })
        .collect();

    Ok(Expense {
        id: value.expense_id,
        user_id: value.user_id,
        amount_minor: reconciled_amount(value.expense_amount_minor, &items)?,
        expense_category_id: value.expense_category_id,
        expense_type_id: value.expense_type_id,
        credit_card_id: value.credit_card_id,
        description: normalize_optional_text(value.expense_description.as_deref()),
        expense_date: value.expense_date,
        items,
    })
}

pub(crate) fn expense_to_dto(value: Expense) -> dto::Expense {
    dto::Expense {
        expense_id: value.id,
        user_id: value.user_id,
        expense_amount_minor: value.amount_minor,
        expense_category_id: value.expense_category_id,
        expense_type_id: value.expense_type_id,
        credit_card_id: value.credit_card_id,
        expense_description: value.description,
        expense_date: value.expense_date,
        expense_items: value.items.into_iter().map(item_to_dto).collect(),
    }
}

fn item_to_dto(value: ExpenseItem) -> dto::ExpenseItem {
    dto::ExpenseItem {
        expense_item_id: value.id,
        expense_id: value.expense_id,
        user_id: value.user_id,
        expense_amount_minor: value.amount_minor,
        expense_category_id: value.expense_category_id,
        expense_type_id: value.expense_type_id,
        credit_card_id: value.credit_card_id,
        expense_description: value.description,
        expense_date: value.expense_date,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn item(amount: i64) -> dto::ExpenseItem {
        dto::ExpenseItem {
            expense_item_id: None,
            expense_id: None,
            user_id: None,
            expense_amount_minor: amount,
            expense_category_id: Some(2),
            expense_type_id: None,
            credit_card_id: None,
            expense_description: None,
            expense_date: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
        }
    }

    fn header(amount: i64, items: Vec<dto::ExpenseItem>) -> dto::Expense {
        dto::Expense {
            expense_id: None,
            user_id: Some(1),
            expense_amount_minor: amount,
            expense_category_id: Some(2),
            expense_type_id: None,
            credit_card_id: None,
            expense_description: Some("  Groceries  ".to_string()),
            expense_date: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
            expense_items: items,
        }
    }

    #[test]
    fn items_override_header_amount() {
        let expense = expense_from_dto(&header(999, vec![item(10), item(15)])).unwrap();
        assert_eq!(expense.amount_minor, 25);
        assert_eq!(expense.description.as_deref(), Some("Groceries"));
    }

    #[test]
    fn header_amount_kept_without_items() {
        let expense = expense_from_dto(&header(1250, Vec::new())).unwrap();
        assert_eq!(expense.amount_minor, 1250);
    }

    #[test]
    fn items_belong_to_header_owner() {
        let mut foreign = item(15);
        foreign.user_id = Some(99);
        let expense = expense_from_dto(&header(0, vec![item(10), foreign])).unwrap();
        assert_eq!(expense.items[0].user_id, Some(1));
        assert_eq!(expense.items[1].user_id, Some(1));
    }

    #[test]
    fn repeated_item_ids_are_rejected() {
        let mut first = item(10);
        first.expense_item_id = Some(4);
        let err = expense_from_dto(&header(0, vec![first.clone(), first])).unwrap_err();
        assert!(matches!(err, EngineError::ExistingKey(_)));
    }

    #[test]
    fn overflowing_items_are_rejected() {
        let err = expense_from_dto(&header(0, vec![item(i64::MAX), item(1)])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}
