//! Bank balance rollups

use crate::model::BankAccount;
use crate::model::BankTransaction;
use crate::model::TransactionKind;
use crate::model::types::Money;

/// Amount of a transaction with its direction applied.
///
/// Stored amounts are unsigned; deposits add and withdrawals subtract.
pub fn signed_amount(tx: &BankTransaction) -> Money {
    let amount = tx.amount.unwrap_or_default().abs();
    match tx.kind {
        TransactionKind::Deposit => amount,
        TransactionKind::Withdrawal => -amount,
    }
}

/// Opening balance plus this account's deposits minus its withdrawals.
///
/// Transactions of other accounts are ignored.
pub fn account_balance(account: &BankAccount, transactions: &[BankTransaction]) -> Money {
    let opening = account.opening_balance.unwrap_or_default();
    transactions
        .iter()
        .filter(|tx| tx.bank_account_id == account.id)
        .map(signed_amount)
        .fold(opening, |balance, amount| balance + amount)
}

/// Sum of every account's balance.
pub fn total_balance(accounts: &[BankAccount], transactions: &[BankTransaction]) -> Money {
    accounts
        .iter()
        .map(|account| account_balance(account, transactions))
        .sum()
}

fn total_of(transactions: &[BankTransaction], kind: TransactionKind) -> Money {
    transactions
        .iter()
        .filter(|tx| tx.kind == kind)
        .map(|tx| tx.amount.unwrap_or_default().abs())
        .sum()
}

/// Sum of deposit amounts.
pub fn total_deposits(transactions: &[BankTransaction]) -> Money {
    total_of(transactions, TransactionKind::Deposit)
}

/// Sum of withdrawal amounts, as a positive number.
pub fn total_withdrawals(transactions: &[BankTransaction]) -> Money {
    total_of(transactions, TransactionKind::Withdrawal)
}

pub fn transaction_count(transactions: &[BankTransaction], kind: TransactionKind) -> usize {
    transactions.iter().filter(|tx| tx.kind == kind).count()
}

/// Figures shown above the bank ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BankSummary {
    pub total_balance: Money,
    pub total_deposits: Money,
    pub total_withdrawals: Money,
    pub deposit_count: usize,
    pub withdrawal_count: usize,
}

impl BankSummary {
    pub fn compute(accounts: &[BankAccount], transactions: &[BankTransaction]) -> Self {
        Self {
            total_balance: total_balance(accounts, transactions),
            total_deposits: total_deposits(transactions),
            total_withdrawals: total_withdrawals(transactions),
            deposit_count: transaction_count(transactions, TransactionKind::Deposit),
            withdrawal_count: transaction_count(transactions, TransactionKind::Withdrawal),
        }
    }
}
