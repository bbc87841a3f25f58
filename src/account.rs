use indexmap::IndexMap;

use std::collections::HashMap;
use std::fmt;

/// The five top-level account classes of a double-entry source.
///
/// Only used while classifying entries, consumers never see it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccountClass {
    Assets,
    Liabilities,
    Equity,
    Income,
    Expenses,
}

impl AccountClass {
    pub fn is_balance_sheet(&self) -> bool {
        matches!(self, AccountClass::Assets | AccountClass::Liabilities)
    }

    /// Equity and income legs are both sources of money coming in.
    pub fn is_inflow_source(&self) -> bool {
        matches!(self, AccountClass::Equity | AccountClass::Income)
    }
}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountClass::Assets => write!(f, "Assets"),
            AccountClass::Liabilities => write!(f, "Liabilities"),
            AccountClass::Equity => write!(f, "Equity"),
            AccountClass::Income => write!(f, "Income"),
            AccountClass::Expenses => write!(f, "Expenses"),
        }
    }
}

/// Root segment names mapped to account classes, e.g. `Assets` in
/// `Assets:Bank:Jago`. Ledgers may rename them.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountRoots {
    assets: String,
    liabilities: String,
    equity: String,
    income: String,
    expenses: String,
}

impl Default for AccountRoots {
    fn default() -> Self {
        Self {
            assets: AccountClass::Assets.to_string(),
            liabilities: AccountClass::Liabilities.to_string(),
            equity: AccountClass::Equity.to_string(),
            income: AccountClass::Income.to_string(),
            expenses: AccountClass::Expenses.to_string(),
        }
    }
}

impl AccountRoots {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn rename(&mut self, class: AccountClass, root: &str) {
        let slot = match class {
            AccountClass::Assets => &mut self.assets,
            AccountClass::Liabilities => &mut self.liabilities,
            AccountClass::Equity => &mut self.equity,
            AccountClass::Income => &mut self.income,
            AccountClass::Expenses => &mut self.expenses,
        };
        *slot = root.to_string();
    }

    pub fn root_of(&self, class: AccountClass) -> &str {
        match class {
            AccountClass::Assets => &self.assets,
            AccountClass::Liabilities => &self.liabilities,
            AccountClass::Equity => &self.equity,
            AccountClass::Income => &self.income,
            AccountClass::Expenses => &self.expenses,
        }
    }

    /// Class of a full account name, `None` when its root is unknown or it
    /// has no sub-account segment.
    pub fn classify(&self, name: &str) -> Option<AccountClass> {
        let (root, rest) = name.split_once(':')?;
        if rest.is_empty() {
            return None;
        }

        [
            AccountClass::Assets,
            AccountClass::Liabilities,
            AccountClass::Equity,
            AccountClass::Income,
            AccountClass::Expenses,
        ]
        .into_iter()
        .find(|&class| self.root_of(class) == root)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub name: String,
    pub class: AccountClass,
}

impl Account {
    pub fn new(name: &str, class: AccountClass) -> Self {
        Self {
            name: name.to_string(),
            class,
        }
    }
}

/// Read-only account resolution used by the classifier.
pub trait AccountLookup {
    fn account(&self, name: &str) -> Option<&Account>;
}

impl AccountLookup for HashMap<String, Account> {
    fn account(&self, name: &str) -> Option<&Account> {
        self.get(name)
    }
}

/// Accounts known to a ledger, in the order they were first seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountStore {
    accounts: IndexMap<String, Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers `name` if `roots` can classify it. Returns whether the
    /// account is known afterwards.
    pub fn open(&mut self, name: &str, roots: &AccountRoots) -> bool {
        if self.accounts.contains_key(name) {
            return true;
        }

        match roots.classify(name) {
            Some(class) => {
                self.accounts
                    .insert(name.to_string(), Account::new(name, class));
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}

impl AccountLookup for AccountStore {
    fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }
}
