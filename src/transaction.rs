use std::fmt;
use std::str::FromStr;

/// The only transaction taxonomy consumers see.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionType {
    ModifyBalance = 1,
    Income = 2,
    Expense = 3,
    Transfer = 4,
}

impl TransactionType {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TransactionType::ModifyBalance),
            2 => Some(TransactionType::Income),
            3 => Some(TransactionType::Expense),
            4 => Some(TransactionType::Transfer),
            _ => None,
        }
    }
}

/// Stringified integer code, as written into the transaction type column.
impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(TransactionType::from_code)
            .ok_or(format!("input `{}' is not a valid transaction type", s))
    }
}

/// One leg of a double-entry record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Posting {
    pub account: String,
    /// Signed amount as written in the source, empty when elided.
    pub amount: String,
    pub commodity: String,
}

impl Posting {
    pub fn new(account: &str, amount: &str, commodity: &str) -> Self {
        Self {
            account: account.to_string(),
            amount: amount.to_string(),
            commodity: commodity.to_string(),
        }
    }

    pub fn is_elided(&self) -> bool {
        self.amount.is_empty()
    }
}

/// One raw unit parsed from a double-entry source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entry {
    /// Date as written in the source, empty when missing.
    pub date: String,
    pub payee: Option<String>,
    pub narration: String,
    pub tags: Vec<String>,
    pub postings: Vec<Posting>,
}

#[cfg(test)]
mod tests {
    use crate::transaction::TransactionType;

    #[test]
    fn type_codes_round_trip() {
        for ty in [
            TransactionType::ModifyBalance,
            TransactionType::Income,
            TransactionType::Expense,
            TransactionType::Transfer,
        ] {
            assert_eq!(ty.to_string().parse::<TransactionType>(), Ok(ty));
        }
        assert_eq!(TransactionType::Expense.to_string(), "3");
        assert!("0".parse::<TransactionType>().is_err());
        assert!("Expense".parse::<TransactionType>().is_err());
    }
}
