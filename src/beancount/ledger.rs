use crate::{
    account::{AccountClass, AccountRoots, AccountStore},
    amount::parse_amount,
    beancount::statement::{Directive, ParsedTransaction},
    error::{ConverterError, Result},
    transaction::{Entry, Posting},
};

use std::collections::HashMap;

/// Everything a beancount file contributes to an import: its accounts and
/// its transactions, in file order.
#[derive(Debug, Default)]
pub struct BeancountData {
    roots: AccountRoots,
    accounts: AccountStore,
    options: HashMap<String, String>,
    active_tags: Vec<String>,
    transactions: Vec<Entry>,
}

impl BeancountData {
    pub fn new() -> BeancountData {
        Default::default()
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn transactions(&self) -> &Vec<Entry> {
        &self.transactions
    }

    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }

    pub fn into_parts(self) -> (AccountStore, Vec<Entry>) {
        (self.accounts, self.transactions)
    }

    pub fn set_option(&mut self, key: &str, val: &str) {
        let renamed = match key {
            "name_assets" => Some(AccountClass::Assets),
            "name_liabilities" => Some(AccountClass::Liabilities),
            "name_equity" => Some(AccountClass::Equity),
            "name_income" => Some(AccountClass::Income),
            "name_expenses" => Some(AccountClass::Expenses),
            _ => None,
        };
        if let Some(class) = renamed {
            self.roots.rename(class, val);
        }

        self.options.insert(key.to_string(), val.to_string());
    }

    pub fn process_directive(&mut self, directive: Directive) -> Result<()> {
        match directive {
            Directive::Option(key, val) => self.set_option(&key, &val),
            Directive::Include(_) => return Err(ConverterError::BeancountFileNotSupportInclude),
            Directive::PushTag(tag) => self.active_tags.push(tag.to_string()),
            Directive::PopTag(tag) => {
                if let Some(pos) = self.active_tags.iter().rposition(|t| t == tag) {
                    self.active_tags.remove(pos);
                }
            }
            Directive::Open(account) => {
                if !self.accounts.open(account, &self.roots) {
                    tracing::warn!(account, "opened account has no known root");
                }
            }
            Directive::Transaction(txn) => self.transaction(txn),
            Directive::Skipped => {}
        }
        Ok(())
    }

    fn transaction(&mut self, txn: ParsedTransaction<'_>) {
        let mut postings: Vec<Posting> = txn
            .postings
            .iter()
            .map(|posting| {
                self.accounts.open(posting.account, &self.roots);
                match &posting.amount {
                    Some(amount) => Posting::new(posting.account, amount.nominal, amount.currency),
                    None => Posting::new(posting.account, "", ""),
                }
            })
            .collect();
        infer_elided_amount(&mut postings);

        let mut tags: Vec<String> = txn.tags.iter().map(|t| t.to_string()).collect();
        for tag in &self.active_tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }

        self.transactions.push(Entry {
            date: txn.date.to_string(),
            payee: txn.payee,
            narration: txn.narration,
            tags,
            postings,
        });
    }
}

/// Fills the one elided leg of a two-posting entry with the balancing
/// amount. Anything else is left as written.
fn infer_elided_amount(postings: &mut [Posting]) {
    let (elided, other) = match postings {
        [first, second] if first.is_elided() && !second.is_elided() => (first, second),
        [first, second] if second.is_elided() && !first.is_elided() => (second, first),
        _ => return,
    };

    if let Ok(amount) = parse_amount(&other.amount) {
        elided.amount = (-amount).to_string();
        elided.commodity = other.commodity.clone();
    }
}
