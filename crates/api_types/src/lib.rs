use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query parameters selecting a calendar month.
///
/// Missing values, or `0`, mean "the current UTC month/year" and are resolved
/// server-side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PeriodQuery {
    /// Returns `(month, year)` with the `0` sentinel for missing values.
    pub fn or_sentinel(self) -> (u32, i32) {
        (self.month.unwrap_or(0), self.year.unwrap_or(0))
    }
}

pub mod expense {
    use super::*;

    /// Expense header.
    ///
    /// When `expense_items` is not empty, `expense_amount_minor` is derived
    /// from the items on write and the submitted value is ignored.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Expense {
        /// Assigned by the store on create.
        #[serde(default)]
        pub expense_id: Option<i32>,
        #[serde(default)]
        pub user_id: Option<i32>,
        pub expense_amount_minor: i64,
        pub expense_category_id: Option<i32>,
        pub expense_type_id: Option<i32>,
        pub credit_card_id: Option<i32>,
        pub expense_description: Option<String>,
        pub expense_date: DateTime<Utc>,
        #[serde(default)]
        pub expense_items: Vec<ExpenseItem>,
    }

    /// Line item of an [`Expense`].
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseItem {
        #[serde(default)]
        pub expense_item_id: Option<i32>,
        /// Parent expense. `None` once the parent has been deleted.
        #[serde(default)]
        pub expense_id: Option<i32>,
        #[serde(default)]
        pub user_id: Option<i32>,
        pub expense_amount_minor: i64,
        pub expense_category_id: Option<i32>,
        pub expense_type_id: Option<i32>,
        pub credit_card_id: Option<i32>,
        pub expense_description: Option<String>,
        pub expense_date: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseType {
        pub expense_type_id: i32,
        pub expense_type_name: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseCategory {
        pub expense_category_id: i32,
        pub expense_category_name: String,
    }
}

pub mod credit_card {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CreditCard {
        #[serde(default)]
        pub credit_card_id: Option<i32>,
        pub credit_card_name: String,
        pub card_last_four_digit: String,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserProfile {
        pub user_id: i32,
        pub display_name: String,
        pub email: Option<String>,
        pub family_id: Option<i32>,
    }

    /// Request body for registering the caller's profile.
    ///
    /// The identity itself comes from the bearer token, never from the body.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UserProfileNew {
        pub display_name: String,
        pub email: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UserProfileUpdate {
        pub display_name: String,
        pub email: Option<String>,
    }
}

pub mod family {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Family {
        pub family_id: i32,
        pub family_name: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct FamilyNew {
        pub family_name: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FamilyMemberRequest {
        pub request_id: i32,
        pub family_id: i32,
        pub requested_by_user_id: i32,
        pub member_email: String,
        pub message: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Request body for inviting someone into the caller's family.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct FamilyMemberRequestNew {
        pub member_email: String,
        pub message: Option<String>,
    }

    /// Requests related to the caller.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct FamilyMemberRequestList {
        /// Requests sent by the caller.
        pub sent: Vec<FamilyMemberRequest>,
        /// Requests targeting the caller's family.
        pub family: Vec<FamilyMemberRequest>,
    }
}

pub mod income {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserIncome {
        #[serde(default)]
        pub income_id: Option<i32>,
        #[serde(default)]
        pub user_id: Option<i32>,
        pub income_amount_minor: i64,
        pub income_source: Option<String>,
        pub income_description: Option<String>,
        pub income_date: DateTime<Utc>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserBudget {
        #[serde(default)]
        pub budget_id: Option<i32>,
        #[serde(default)]
        pub user_id: Option<i32>,
        pub expense_category_id: Option<i32>,
        pub budget_amount_minor: i64,
        /// `0` or missing means the current month.
        #[serde(default)]
        pub month: u32,
        /// `0` or missing means the current year.
        #[serde(default)]
        pub year: i32,
    }
}

pub mod email {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EmailCopy {
        pub email_copy_id: i32,
        pub user_id: Option<i32>,
        pub recipient: String,
        pub subject: String,
        pub body: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct EmailCopyNew {
        pub recipient: String,
        pub subject: String,
        pub body: String,
    }
}
