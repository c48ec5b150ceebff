use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    Student,
    Staff,
    #[serde(other)]
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Session {
    #[serde(default)]
    pub logged_in: bool,
    pub user_id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub member_type: Option<MemberType>,
    pub username: Option<String>,
}

impl Session {
    pub fn is_student(&self) -> bool {
        self.logged_in && self.member_type == Some(MemberType::Student)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginResult {
    #[serde(default)]
    pub success: bool,
    pub user_id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub member_type: Option<MemberType>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Profile {
    pub user_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "type")]
    pub member_type: Option<MemberType>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateResult {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Active,
    Late,
    Returned,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BorrowedBook {
    pub isbn: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Fine {
    pub amount: serde_json::Value,
    pub status: String,
    pub date: String,
    pub payment_date: Option<String>,
}

impl Fine {
    pub fn is_paid(&self) -> bool {
        self.status == "paid"
    }

    /// The catalog sends decimals either as numbers or as strings.
    pub fn amount_text(&self) -> String {
        match &self.amount {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Borrowing {
    pub borrow_id: i64,
    pub book: BorrowedBook,
    pub borrow_date: String,
    pub last_return_date: String,
    pub status: BorrowStatus,
    pub fine: Option<Fine>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Borrowings {
    #[serde(default)]
    pub borrowings: Vec<Borrowing>,
    pub count: Option<u32>,
}
