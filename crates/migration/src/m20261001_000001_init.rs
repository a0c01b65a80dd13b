//! Initial schema migration.
//!
//! Creates the complete schema of the expense tracker:
//!
//! - `families`: groups of users sharing expense visibility
//! - `users`: profiles linked to an identity-provider subject
//! - `expense_types`, `expense_categories`: read-only reference data
//! - `credit_cards`: cards expenses can be charged to
//! - `expenses`: expense headers owned by a user
//! - `expense_items`: line items of an expense header
//! - `user_incomes`, `user_budgets`: per-user period records
//! - `family_member_requests`: invitations into a family
//! - `email_copies`: copies of outgoing e-mails
//!
//! Deleting an expense clears `expense_items.expense_id` instead of removing
//! the items (`ON DELETE SET NULL`).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Families {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    IdentityId,
    DisplayName,
    Email,
    FamilyId,
}

#[derive(Iden)]
enum ExpenseTypes {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum ExpenseCategories {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum CreditCards {
    Table,
    Id,
    Name,
    LastFourDigits,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    UserId,
    AmountMinor,
    ExpenseCategoryId,
    ExpenseTypeId,
    CreditCardId,
    Description,
    ExpenseDate,
}

#[derive(Iden)]
enum ExpenseItems {
    Table,
    Id,
    ExpenseId,
    UserId,
    AmountMinor,
    ExpenseCategoryId,
    ExpenseTypeId,
    CreditCardId,
    Description,
    ExpenseDate,
}

#[derive(Iden)]
enum UserIncomes {
    Table,
    Id,
    UserId,
    AmountMinor,
    Source,
    Description,
    IncomeDate,
}

#[derive(Iden)]
enum UserBudgets {
    Table,
    Id,
    UserId,
    ExpenseCategoryId,
    AmountMinor,
    Month,
    Year,
}

#[derive(Iden)]
enum FamilyMemberRequests {
    Table,
    Id,
    FamilyId,
    RequestedByUserId,
    MemberEmail,
    Message,
    CreatedAt,
}

#[derive(Iden)]
enum EmailCopies {
    Table,
    Id,
    UserId,
    Recipient,
    Subject,
    Body,
    CreatedAt,
}

fn id_column<T: Iden + 'static>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Families and users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Families::Table)
                    .if_not_exists()
                    .col(id_column(Families::Id))
                    .col(ColumnDef::new(Families::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_column(Users::Id))
                    .col(ColumnDef::new(Users::IdentityId).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string())
                    .col(ColumnDef::new(Users::FamilyId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users-family_id")
                            .from(Users::Table, Users::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-identity_id-unique")
                    .table(Users::Table)
                    .col(Users::IdentityId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-family_id")
                    .table(Users::Table)
                    .col(Users::FamilyId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Reference data
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenseTypes::Table)
                    .if_not_exists()
                    .col(id_column(ExpenseTypes::Id))
                    .col(ColumnDef::new(ExpenseTypes::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseCategories::Table)
                    .if_not_exists()
                    .col(id_column(ExpenseCategories::Id))
                    .col(ColumnDef::new(ExpenseCategories::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditCards::Table)
                    .if_not_exists()
                    .col(id_column(CreditCards::Id))
                    .col(ColumnDef::new(CreditCards::Name).string().not_null())
                    .col(
                        ColumnDef::new(CreditCards::LastFourDigits)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Expenses and items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(id_column(Expenses::Id))
                    .col(ColumnDef::new(Expenses::UserId).integer())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::ExpenseCategoryId).integer())
                    .col(ColumnDef::new(Expenses::ExpenseTypeId).integer())
                    .col(ColumnDef::new(Expenses::CreditCardId).integer())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(
                        ColumnDef::new(Expenses::ExpenseDate)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-user_id")
                            .from(Expenses::Table, Expenses::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-expense_category_id")
                            .from(Expenses::Table, Expenses::ExpenseCategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-expense_type_id")
                            .from(Expenses::Table, Expenses::ExpenseTypeId)
                            .to(ExpenseTypes::Table, ExpenseTypes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-credit_card_id")
                            .from(Expenses::Table, Expenses::CreditCardId)
                            .to(CreditCards::Table, CreditCards::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-user_id-expense_date")
                    .table(Expenses::Table)
                    .col(Expenses::UserId)
                    .col(Expenses::ExpenseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseItems::Table)
                    .if_not_exists()
                    .col(id_column(ExpenseItems::Id))
                    .col(ColumnDef::new(ExpenseItems::ExpenseId).integer())
                    .col(ColumnDef::new(ExpenseItems::UserId).integer())
                    .col(
                        ColumnDef::new(ExpenseItems::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenseItems::ExpenseCategoryId).integer())
                    .col(ColumnDef::new(ExpenseItems::ExpenseTypeId).integer())
                    .col(ColumnDef::new(ExpenseItems::CreditCardId).integer())
                    .col(ColumnDef::new(ExpenseItems::Description).string())
                    .col(
                        ColumnDef::new(ExpenseItems::ExpenseDate)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_items-expense_id")
                            .from(ExpenseItems::Table, ExpenseItems::ExpenseId)
                            .to(Expenses::Table, Expenses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_items-user_id")
                            .from(ExpenseItems::Table, ExpenseItems::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_items-credit_card_id")
                            .from(ExpenseItems::Table, ExpenseItems::CreditCardId)
                            .to(CreditCards::Table, CreditCards::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_items-expense_id")
                    .table(ExpenseItems::Table)
                    .col(ExpenseItems::ExpenseId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Incomes and budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(UserIncomes::Table)
                    .if_not_exists()
                    .col(id_column(UserIncomes::Id))
                    .col(ColumnDef::new(UserIncomes::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(UserIncomes::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserIncomes::Source).string())
                    .col(ColumnDef::new(UserIncomes::Description).string())
                    .col(
                        ColumnDef::new(UserIncomes::IncomeDate)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_incomes-user_id")
                            .from(UserIncomes::Table, UserIncomes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserBudgets::Table)
                    .if_not_exists()
                    .col(id_column(UserBudgets::Id))
                    .col(ColumnDef::new(UserBudgets::UserId).integer().not_null())
                    .col(ColumnDef::new(UserBudgets::ExpenseCategoryId).integer())
                    .col(
                        ColumnDef::new(UserBudgets::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserBudgets::Month).integer().not_null())
                    .col(ColumnDef::new(UserBudgets::Year).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_budgets-user_id")
                            .from(UserBudgets::Table, UserBudgets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_budgets-expense_category_id")
                            .from(UserBudgets::Table, UserBudgets::ExpenseCategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user_budgets-user_id-year-month")
                    .table(UserBudgets::Table)
                    .col(UserBudgets::UserId)
                    .col(UserBudgets::Year)
                    .col(UserBudgets::Month)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Family member requests and e-mail copies
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FamilyMemberRequests::Table)
                    .if_not_exists()
                    .col(id_column(FamilyMemberRequests::Id))
                    .col(
                        ColumnDef::new(FamilyMemberRequests::FamilyId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FamilyMemberRequests::RequestedByUserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FamilyMemberRequests::MemberEmail)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FamilyMemberRequests::Message).string())
                    .col(
                        ColumnDef::new(FamilyMemberRequests::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-family_member_requests-family_id")
                            .from(FamilyMemberRequests::Table, FamilyMemberRequests::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-family_member_requests-requested_by_user_id")
                            .from(
                                FamilyMemberRequests::Table,
                                FamilyMemberRequests::RequestedByUserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmailCopies::Table)
                    .if_not_exists()
                    .col(id_column(EmailCopies::Id))
                    .col(ColumnDef::new(EmailCopies::UserId).integer())
                    .col(ColumnDef::new(EmailCopies::Recipient).string().not_null())
                    .col(ColumnDef::new(EmailCopies::Subject).string().not_null())
                    .col(ColumnDef::new(EmailCopies::Body).text().not_null())
                    .col(
                        ColumnDef::new(EmailCopies::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-email_copies-user_id")
                            .from(EmailCopies::Table, EmailCopies::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmailCopies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FamilyMemberRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserBudgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserIncomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Families::Table).to_owned())
            .await?;
        Ok(())
    }
}
