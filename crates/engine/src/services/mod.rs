//! Service layer.
//!
//! Services sit between the transport and the repositories: they map
//! entities to `api_types` DTOs with explicit functions, enforce the
//! business rules and delegate persistence.

mod credit_cards;
mod email_copies;
mod expenses;
mod family_member_requests;
mod user_budgets;
mod user_incomes;
mod users;

pub use credit_cards::CreditCardService;
pub use email_copies::EmailCopyService;
pub use expenses::ExpenseService;
pub use family_member_requests::FamilyMemberRequestService;
pub use user_budgets::UserBudgetService;
pub use user_incomes::UserIncomeService;
pub use users::UserService;
