//! Bank accounts and their ledger

use chrono::NaiveDate;
use uuid::Uuid;

use super::Entity;
use super::Row;
use super::TableRow;
use super::Value;
use super::status::text_enum;
use super::types::Money;
use crate::error::FieldError;

/// A business bank account.
#[derive(Debug, Clone, PartialEq)]
pub struct BankAccount {
    pub id: Uuid,
    pub bank_name: String,
    pub account_number: String,
    pub opening_balance: Option<Money>,
    pub is_primary: bool,
}

impl TableRow for BankAccount {
    fn row_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.into(),
            "bank_name" => self.bank_name.as_str().into(),
            "account_number" => self.account_number.as_str().into(),
            "opening_balance" => self.opening_balance.into(),
            "is_primary" => self.is_primary.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for BankAccount {
    const TABLE: &'static str = "bank_accounts";
    const FIELDS: &'static [&'static str] =
        &["id", "bank_name", "account_number", "opening_balance", "is_primary"];

    fn from_row(row: &Row) -> Result<Self, FieldError> {
        Ok(Self {
            id: row.require_uuid("id")?,
            bank_name: row.require_string("bank_name")?,
            account_number: row.get_text("account_number")?.unwrap_or_default(),
            opening_balance: row.get_money("opening_balance")?,
            is_primary: row.get_bool("is_primary")?.unwrap_or(false),
        })
    }
}

text_enum! {
    /// Direction of a ledger entry.
    pub enum TransactionKind {
        Deposit => "deposit",
        Withdrawal => "withdrawal",
    }
}

/// One ledger entry against a bank account.
///
/// `amount` is stored unsigned; the direction comes from `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct BankTransaction {
    pub id: Uuid,
    pub bank_account_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Option<Money>,
    pub description: String,
    pub category: Option<String>,
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

impl TableRow for BankTransaction {
    fn row_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.into(),
            "bank_account_id" => self.bank_account_id.into(),
            "type" => self.kind.into(),
            "amount" => self.amount.into(),
            "description" => self.description.as_str().into(),
            "category" => self.category.clone().into(),
            "client_id" => self.client_id.into(),
            "project_id" => self.project_id.into(),
            "date" => self.date.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for BankTransaction {
    const TABLE: &'static str = "bank_transactions";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "bank_account_id",
        "type",
        "amount",
        "description",
        "category",
        "client_id",
        "project_id",
        "date",
    ];

    fn from_row(row: &Row) -> Result<Self, FieldError> {
        Ok(Self {
            id: row.require_uuid("id")?,
            bank_account_id: row.require_uuid("bank_account_id")?,
            kind: row.require_parsed("type")?,
            amount: row.get_money("amount")?,
            description: row.get_text("description")?.unwrap_or_default(),
            category: row.get_text("category")?,
            client_id: row.get_uuid("client_id")?,
            project_id: row.get_uuid("project_id")?,
            date: row.get_date("date")?,
        })
    }
}
