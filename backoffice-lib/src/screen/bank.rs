//! Bank ledger screen

use crate::calc::BankSummary;
use crate::error::ValidationError;
use crate::error::Validator;
use crate::model::BankAccount;
use crate::model::BankTransaction;
use crate::model::Row;
use crate::model::TransactionKind;
use crate::query::OrderBy;
use crate::table::Cell;
use crate::table::ColumnDescriptor;

use super::controller::FormMode;
use super::controller::Screen;
use super::controller::ScreenController;

/// Deposits and withdrawals across the company's bank accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct BankScreen;

pub type BankController = ScreenController<BankScreen>;

impl Screen for BankScreen {
    type Row = BankTransaction;

    fn noun(&self) -> &'static str {
        "Transaction"
    }

    fn plural(&self) -> &'static str {
        "transactions"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["description", "category"]
    }

    fn default_order(&self) -> Option<OrderBy> {
        Some(OrderBy::desc("date"))
    }

    fn columns(&self) -> Vec<ColumnDescriptor<BankTransaction>> {
        vec![
            ColumnDescriptor::new("date", "Date").sortable(),
            ColumnDescriptor::new("description", "Description").sortable().filterable(),
            ColumnDescriptor::new("category", "Category").sortable().filterable(),
            ColumnDescriptor::new("type", "Type")
                .filterable()
                .render(|v, _| Cell::badge(v.to_string())),
            ColumnDescriptor::new("amount", "Amount")
                .sortable()
                .render(|_, t: &BankTransaction| {
                    let amount = t.amount.unwrap_or_default().abs();
                    match t.kind {
                        TransactionKind::Deposit => Cell::text(format!("+${amount}")),
                        TransactionKind::Withdrawal => Cell::text(format!("-${amount}")),
                    }
                })
                .export_with(|_, t: &BankTransaction| crate::calc::signed_amount(t).to_string()),
            ColumnDescriptor::actions(|_| Cell::text("Edit")),
        ]
    }

    fn validate(&self, form: &Row, _mode: FormMode) -> std::result::Result<(), ValidationError> {
        Validator::new()
            .required_fields(form, &["bank_account_id", "type", "description", "category"])
            .check(
                "type",
                form.get_parsed::<TransactionKind>("type").is_ok(),
                "type must be deposit or withdrawal",
            )
            .check("amount", form.get_decimal("amount").is_ok(), "amount must be a number")
            .finish()
    }

    /// Stores the amount as an absolute value; the kind carries the sign.
    fn prepare(&self, mut form: Row, _mode: FormMode) -> Row {
        if let Ok(Some(amount)) = form.get_money("amount") {
            form.insert("amount", amount.abs());
        }
        form
    }
}

impl BankController {
    /// Balances over `accounts` and the displayed transactions.
    pub async fn summary(&self, accounts: &[BankAccount]) -> BankSummary {
        BankSummary::compute(accounts, &self.rows().await)
    }
}
