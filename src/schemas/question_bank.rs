use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::time::format_primitive;
use crate::db::models::QuestionBank;

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionBankWrite {
    #[serde(default, rename = "Title")]
    pub(crate) title: Option<String>,
    #[serde(default, rename = "Questions")]
    pub(crate) questions: Option<Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionBankResponse {
    #[serde(rename = "Q_ID")]
    pub(crate) q_id: i32,
    #[serde(rename = "Title")]
    pub(crate) title: String,
    #[serde(rename = "Questions")]
    pub(crate) questions: String,
    #[serde(rename = "CreatedAt")]
    pub(crate) created_at: String,
}

impl QuestionBankResponse {
    pub(crate) fn from_db(bank: QuestionBank) -> Self {
        Self {
            q_id: bank.q_id,
            title: bank.title,
            questions: bank.questions,
            created_at: format_primitive(bank.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionBankDeleted {
    #[serde(rename = "Q_ID")]
    pub(crate) q_id: i32,
}
