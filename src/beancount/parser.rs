use crate::beancount::ledger::BeancountData;
use crate::beancount::statement::Directive;
use crate::error::{ConverterError, Result};
use pest::Parser;

use std::convert::TryFrom;

#[derive(Parser)]
#[grammar = "beancount/beancount.pest"]
pub struct BeancountParser;

/// Parses a whole beancount ledger held in memory.
///
/// Every structural problem is reported here, before any row is produced.
pub fn parse(input: &str) -> Result<BeancountData> {
    if input.trim().is_empty() {
        return Err(ConverterError::NotFoundTransactionData);
    }

    let mut ledger = BeancountParser::parse(Rule::ledger, input)
        .map_err(|err| ConverterError::InvalidBeancountFile(err.to_string()))?;
    let root = ledger
        .next()
        .ok_or(ConverterError::InvalidBeancountFile("empty ledger".to_string()))?;

    let mut data = BeancountData::new();

    for statement in root.into_inner() {
        if statement.as_rule() == Rule::EOI {
            break;
        }

        let directive = Directive::try_from(statement)
            .map_err(|err| ConverterError::InvalidBeancountFile(err.to_string()))?;
        data.process_directive(directive)?;
    }

    tracing::debug!(
        accounts = data.accounts().len(),
        transactions = data.transactions().len(),
        "parsed beancount ledger"
    );

    Ok(data)
}

#[cfg(test)]
mod tests {
    use crate::account::{AccountClass, AccountLookup};
    use crate::beancount::parser::parse;
    use crate::error::ConverterError;
    use crate::transaction::Posting;

    use anyhow::Result;
    use indoc::indoc;

    #[test]
    fn parse_ledger() -> Result<()> {
        let data = parse(indoc! { r#"
            ;; personal ledger
            option "title" "Personal"
            plugin "beancount.plugins.auto_accounts"

            * Accounts
            2024-01-01 open Assets:Checking USD
            2024-01-01 open Expenses:Food
            2024-01-01 commodity USD
              name: "US Dollar"

            * Transactions
            2024-09-01 * "Cafe" "Lunch" #food
              Expenses:Food      12.34 USD
              Assets:Checking   -12.34 USD

            2024-09-30 balance Assets:Checking  87.66 USD
            2024-12-31 close Expenses:Food
        "# })?;

        assert_eq!(data.accounts().len(), 2);
        assert_eq!(data.transactions().len(), 1);

        let entry = &data.transactions()[0];
        assert_eq!(entry.date, "2024-09-01");
        assert_eq!(entry.payee.as_deref(), Some("Cafe"));
        assert_eq!(entry.narration, "Lunch");
        assert_eq!(entry.tags, vec!["food"]);
        assert_eq!(
            entry.postings,
            vec![
                Posting::new("Expenses:Food", "12.34", "USD"),
                Posting::new("Assets:Checking", "-12.34", "USD"),
            ]
        );
        Ok(())
    }

    #[test]
    fn file_without_trailing_newline() -> Result<()> {
        let data = parse("2024-09-01 * \"x\"\n  Assets:A -1 USD\n  Assets:B 1 USD ; end")?;
        assert_eq!(data.transactions()[0].postings.len(), 2);
        Ok(())
    }

    #[test]
    fn accounts_from_postings_are_registered() -> Result<()> {
        let data = parse(indoc! { "
            2024-09-01 * \"Bus\"
              Expenses:Transport  2 EUR
              Cash:Wallet        -2 EUR
        " })?;
        assert_eq!(
            data.accounts().account("Expenses:Transport").map(|a| a.class),
            Some(AccountClass::Expenses)
        );
        assert!(data.accounts().account("Cash:Wallet").is_none());
        Ok(())
    }

    #[test]
    fn renamed_account_roots() -> Result<()> {
        let data = parse(indoc! { r#"
            option "name_assets" "Aktiva"
            option "name_expenses" "Aufwand"
            2024-09-01 * "Brot"
              Aufwand:Essen   3 EUR
              Aktiva:Kasse   -3 EUR
        "# })?;
        assert_eq!(
            data.accounts().account("Aktiva:Kasse").map(|a| a.class),
            Some(AccountClass::Assets)
        );
        assert_eq!(
            data.accounts().account("Aufwand:Essen").map(|a| a.class),
            Some(AccountClass::Expenses)
        );
        Ok(())
    }

    #[test]
    fn structural_errors() {
        assert_eq!(parse("").unwrap_err(), ConverterError::NotFoundTransactionData);
        assert_eq!(
            parse("  \n\t\n").unwrap_err(),
            ConverterError::NotFoundTransactionData
        );
        assert!(matches!(
            parse("this is not a ledger\n").unwrap_err(),
            ConverterError::InvalidBeancountFile(_)
        ));
        assert!(matches!(
            parse("  Assets:Cash 1 USD\n").unwrap_err(),
            ConverterError::InvalidBeancountFile(_)
        ));
        assert_eq!(
            parse("include \"other.beancount\"\n").unwrap_err(),
            ConverterError::BeancountFileNotSupportInclude
        );
    }
}
