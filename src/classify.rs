//! Maps a two-posting double-entry record onto one canonical transaction.
//!
//! | legs                                   | outcome                         |
//! |----------------------------------------|---------------------------------|
//! | Equity/Income + Assets/Liabilities     | Income, or ModifyBalance for an opening balance account |
//! | Expenses + Assets/Liabilities          | Expense                         |
//! | Assets/Liabilities + Assets/Liabilities| Transfer                        |
//! | anything else                          | unsupported                     |
//!
//! Leg order in the source does not matter. The classifier is a pure
//! function of the entry, the account lookup and the opening balance
//! predicate, so classifying the same entry twice yields the same row.
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::account::{Account, AccountClass, AccountLookup};
use crate::amount::{format_amount, parse_amount};
use crate::column::{join_tags, Column};
use crate::datatable::RowData;
use crate::error::{ConverterError, Result};
use crate::transaction::{Entry, Posting, TransactionType};

pub const DEFAULT_OPENING_BALANCE_ACCOUNT: &str = "Equity:Opening-Balances";

/// Decides whether an equity account seeds initial balances.
pub trait OpeningBalancePredicate {
    fn is_opening_balance(&self, account: &Account) -> bool;
}

impl<F> OpeningBalancePredicate for F
where
    F: Fn(&Account) -> bool,
{
    fn is_opening_balance(&self, account: &Account) -> bool {
        self(account)
    }
}

/// Matches equity accounts by exact name.
#[derive(Clone, Debug, PartialEq)]
pub struct OpeningBalanceAccounts(Vec<String>);

impl OpeningBalanceAccounts {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self(names.iter().map(|n| n.as_ref().to_string()).collect())
    }
}

impl Default for OpeningBalanceAccounts {
    fn default() -> Self {
        Self::new(&[DEFAULT_OPENING_BALANCE_ACCOUNT])
    }
}

impl OpeningBalancePredicate for OpeningBalanceAccounts {
    fn is_opening_balance(&self, account: &Account) -> bool {
        account.class == AccountClass::Equity && self.0.iter().any(|n| *n == account.name)
    }
}

struct Leg<'e> {
    account: &'e Account,
    posting: &'e Posting,
    amount: Decimal,
}

impl<'e> Leg<'e> {
    fn class(&self) -> AccountClass {
        self.account.class
    }
}

/// Parses `YYYY-MM-DD` or `YYYY/MM/DD`.
pub fn parse_entry_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y/%m/%d"))
        .ok()
}

fn resolve_legs<'e, L>(entry: &'e Entry, accounts: &'e L) -> Result<(Leg<'e>, Leg<'e>)>
where
    L: AccountLookup + ?Sized,
{
    let (first, second) = match entry.postings.as_slice() {
        [first, second] => (first, second),
        postings if postings.len() <= 1 => {
            tracing::error!(
                postings = postings.len(),
                "cannot parse transaction, too few postings"
            );
            return Err(ConverterError::MissingAccountData);
        }
        postings => {
            tracing::error!(
                postings = postings.len(),
                "cannot parse split transaction"
            );
            return Err(ConverterError::NotSupportedSplitTransactions);
        }
    };

    let (account1, account2) = match (accounts.account(&first.account), accounts.account(&second.account)) {
        (Some(account1), Some(account2)) => (account1, account2),
        _ => return Err(ConverterError::MissingAccountData),
    };

    let mut amounts = [Decimal::ZERO; 2];
    for (idx, posting) in [first, second].into_iter().enumerate() {
        amounts[idx] = parse_amount(&posting.amount).map_err(|_| {
            tracing::error!(amount = %posting.amount, posting = idx, "cannot parse amount");
            ConverterError::AmountInvalid {
                posting: Some(idx),
                amount: posting.amount.clone(),
            }
        })?;
    }

    Ok((
        Leg {
            account: account1,
            posting: first,
            amount: amounts[0],
        },
        Leg {
            account: account2,
            posting: second,
            amount: amounts[1],
        },
    ))
}

/// Classifies `entry` and returns its row items.
pub fn classify_entry<L, P>(entry: &Entry, accounts: &L, opening_balance: &P) -> Result<RowData>
where
    L: AccountLookup + ?Sized,
    P: OpeningBalancePredicate + ?Sized,
{
    if entry.date.is_empty() {
        return Err(ConverterError::MissingTransactionTime);
    }
    let date = parse_entry_date(&entry.date).ok_or(ConverterError::TransactionTimeInvalid)?;

    let (leg1, leg2) = resolve_legs(entry, accounts)?;

    let mut data = RowData::new();
    data.insert(
        Column::TransactionTime,
        date.format("%Y-%m-%d 00:00:00").to_string(),
    );

    if leg1.class().is_inflow_source() && leg2.class().is_balance_sheet()
        || leg2.class().is_inflow_source() && leg1.class().is_balance_sheet()
    {
        let (from, to) = if leg1.class().is_inflow_source() {
            (&leg1, &leg2)
        } else {
            (&leg2, &leg1)
        };

        let ty = if opening_balance.is_opening_balance(from.account) {
            TransactionType::ModifyBalance
        } else {
            TransactionType::Income
        };

        data.insert(Column::TransactionType, ty.to_string());
        data.insert(Column::SubCategory, from.account.name.clone());
        data.insert(Column::AccountName, to.account.name.clone());
        data.insert(Column::AccountCurrency, to.posting.commodity.clone());
        data.insert(Column::Amount, format_amount(to.amount));
    } else if leg1.class() == AccountClass::Expenses && leg2.class().is_balance_sheet()
        || leg2.class() == AccountClass::Expenses && leg1.class().is_balance_sheet()
    {
        let (from, to) = if leg1.class().is_balance_sheet() {
            (&leg1, &leg2)
        } else {
            (&leg2, &leg1)
        };

        data.insert(Column::TransactionType, TransactionType::Expense.to_string());
        data.insert(Column::SubCategory, to.account.name.clone());
        data.insert(Column::AccountName, from.account.name.clone());
        data.insert(Column::AccountCurrency, from.posting.commodity.clone());
        data.insert(Column::Amount, format_amount(-from.amount));
    } else if leg1.class().is_balance_sheet() && leg2.class().is_balance_sheet() {
        let (from, to) = match (leg1.amount.is_sign_negative(), leg2.amount.is_sign_negative()) {
            (true, false) if !leg1.amount.is_zero() => (&leg1, &leg2),
            (false, true) if !leg2.amount.is_zero() => (&leg2, &leg1),
            _ => {
                tracing::error!(
                    amount1 = %leg1.amount,
                    amount2 = %leg2.amount,
                    "cannot parse transfer transaction, unexpected account amounts"
                );
                return Err(ConverterError::AmbiguousTransferDirection);
            }
        };

        data.insert(Column::TransactionType, TransactionType::Transfer.to_string());
        data.insert(Column::SubCategory, String::new());
        data.insert(Column::AccountName, from.account.name.clone());
        data.insert(Column::AccountCurrency, from.posting.commodity.clone());
        data.insert(Column::Amount, format_amount(-from.amount));
        data.insert(Column::RelatedAccountName, to.account.name.clone());
        data.insert(Column::RelatedAccountCurrency, to.posting.commodity.clone());
        data.insert(Column::RelatedAmount, format_amount(to.amount));
    } else {
        tracing::error!(
            class1 = %leg1.class(),
            class2 = %leg2.class(),
            "cannot parse transaction, unexpected account classes"
        );
        return Err(ConverterError::NotSupportedTransactionType);
    }

    data.insert(Column::Tags, join_tags(&entry.tags));
    data.insert(Column::Description, entry.narration.clone());

    Ok(data)
}
