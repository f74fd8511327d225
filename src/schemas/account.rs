use serde::{Deserialize, Serialize};

use crate::core::time::{format_date, format_primitive};
use crate::db::models::Account;
use crate::schemas::payload::lenient_i32;

/// Profile fields for registration and for a full profile update. Clients
/// send the password as `password` on registration and `Password` on update,
/// so both keys are accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileRequest {
    #[serde(default, rename = "FName")]
    pub(crate) f_name: Option<String>,
    #[serde(default, rename = "MName")]
    pub(crate) m_name: Option<String>,
    #[serde(default, rename = "LName")]
    pub(crate) l_name: Option<String>,
    #[serde(default, rename = "Email")]
    pub(crate) email: Option<String>,
    #[serde(default, rename = "Phone")]
    pub(crate) phone: Option<String>,
    #[serde(default, alias = "Password")]
    pub(crate) password: Option<String>,
    #[serde(default, rename = "DOB")]
    pub(crate) dob: Option<String>,
    #[serde(default, rename = "Age", deserialize_with = "lenient_i32")]
    pub(crate) age: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default, rename = "Email")]
    pub(crate) email: Option<String>,
    #[serde(default, alias = "Password")]
    pub(crate) password: Option<String>,
}

/// Client view of an account. Never carries the password hash.
#[derive(Debug, Serialize)]
pub(crate) struct AccountResponse {
    pub(crate) id: i32,
    #[serde(rename = "FName")]
    pub(crate) f_name: String,
    #[serde(rename = "MName")]
    pub(crate) m_name: Option<String>,
    #[serde(rename = "LName")]
    pub(crate) l_name: String,
    #[serde(rename = "Email")]
    pub(crate) email: String,
    #[serde(rename = "Phone")]
    pub(crate) phone: Option<String>,
    #[serde(rename = "DOB", skip_serializing_if = "Option::is_none")]
    pub(crate) dob: Option<String>,
    #[serde(rename = "Age", skip_serializing_if = "Option::is_none")]
    pub(crate) age: Option<i32>,
    #[serde(rename = "CreatedAt")]
    pub(crate) created_at: String,
}

impl AccountResponse {
    pub(crate) fn from_db(account: Account) -> Self {
        Self {
            id: account.id,
            f_name: account.f_name,
            m_name: account.m_name,
            l_name: account.l_name,
            email: account.email,
            phone: account.phone,
            dob: account.dob.map(format_date),
            age: account.age,
            created_at: format_primitive(account.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    #[serde(flatten)]
    pub(crate) account: AccountResponse,
    pub(crate) token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::{date, datetime};

    fn student() -> Account {
        Account {
            id: 5,
            f_name: "Ann".to_string(),
            m_name: None,
            l_name: "Lee".to_string(),
            email: "ann@example.com".to_string(),
            phone: Some("9876543210".to_string()),
            dob: Some(date!(2004 - 05 - 06)),
            age: Some(20),
            hashed_password: "$argon2id$secret".to_string(),
            created_at: datetime!(2025-01-02 03:04:05),
        }
    }

    #[test]
    fn login_body_flattens_account_and_hides_hash() {
        let body = LoginResponse {
            account: AccountResponse::from_db(student()),
            token: "tok".to_string(),
        };
        let value = serde_json::to_value(body).unwrap();

        assert_eq!(value["id"], 5);
        assert_eq!(value["DOB"], "2004-05-06");
        assert_eq!(value["CreatedAt"], "2025-01-02T03:04:05Z");
        assert_eq!(value["token"], "tok");
        assert!(value.get("hashed_password").is_none());
        assert!(!value.to_string().contains("argon2"));
    }

    #[test]
    fn staff_accounts_omit_student_fields() {
        let mut account = student();
        account.dob = None;
        account.age = None;
        let value = serde_json::to_value(AccountResponse::from_db(account)).unwrap();
        assert!(value.get("DOB").is_none());
        assert!(value.get("Age").is_none());
    }

    #[test]
    fn profile_accepts_either_password_key() {
        let upper: ProfileRequest = serde_json::from_value(json!({ "Password": "a" })).unwrap();
        let lower: ProfileRequest = serde_json::from_value(json!({ "password": "b" })).unwrap();
        assert_eq!(upper.password.as_deref(), Some("a"));
        assert_eq!(lower.password.as_deref(), Some("b"));
    }
}
