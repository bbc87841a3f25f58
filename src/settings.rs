//! Converter settings. Read from an optional TOML file and overridden by
//! `PERCOLATOR_*` environment variables, e.g.
//!
//! ```toml
//! opening_balance_accounts = ["Equity:Opening-Balances", "Equity:Eroeffnung"]
//! beancount_default_error_policy = "abort"
//! dsv_default_error_policy = "mark_invalid"
//! ```
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::classify::{OpeningBalanceAccounts, DEFAULT_OPENING_BALANCE_ACCOUNT};
use crate::datatable::RowErrorPolicy;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConverterSettings {
    pub opening_balance_accounts: Vec<String>,
    pub beancount_default_error_policy: RowErrorPolicy,
    pub dsv_default_error_policy: RowErrorPolicy,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            opening_balance_accounts: vec![DEFAULT_OPENING_BALANCE_ACCOUNT.to_string()],
            beancount_default_error_policy: RowErrorPolicy::Abort,
            dsv_default_error_policy: RowErrorPolicy::MarkInvalid,
        }
    }
}

impl ConverterSettings {
    /// Loads `path` (any extension `config` understands, may be absent) and
    /// applies environment overrides on top.
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("PERCOLATOR")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("opening_balance_accounts"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn opening_balance_predicate(&self) -> OpeningBalanceAccounts {
        OpeningBalanceAccounts::new(&self.opening_balance_accounts)
    }
}

#[cfg(test)]
mod tests {
    use crate::account::{Account, AccountClass};
    use crate::classify::OpeningBalancePredicate;
    use crate::datatable::RowErrorPolicy;
    use crate::settings::ConverterSettings;

    use anyhow::Result;
    use indoc::indoc;

    #[test]
    fn defaults_when_empty() -> Result<()> {
        let settings = ConverterSettings::from_toml("")?;
        assert_eq!(settings, ConverterSettings::default());
        Ok(())
    }

    #[test]
    fn from_toml() -> Result<()> {
        let settings = ConverterSettings::from_toml(indoc! { r#"
            opening_balance_accounts = ["Equity:Eroeffnung"]
            beancount_default_error_policy = "mark_invalid"
        "# })?;

        assert_eq!(settings.opening_balance_accounts, vec!["Equity:Eroeffnung"]);
        assert_eq!(
            settings.beancount_default_error_policy,
            RowErrorPolicy::MarkInvalid
        );
        assert_eq!(settings.dsv_default_error_policy, RowErrorPolicy::MarkInvalid);

        let predicate = settings.opening_balance_predicate();
        assert!(predicate.is_opening_balance(&Account::new("Equity:Eroeffnung", AccountClass::Equity)));
        assert!(!predicate.is_opening_balance(&Account::new(
            "Equity:Opening-Balances",
            AccountClass::Equity
        )));
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let settings = ConverterSettings::new("does-not-exist/percolator")?;
        assert_eq!(
            settings.opening_balance_accounts,
            ConverterSettings::default().opening_balance_accounts
        );
        Ok(())
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(ConverterSettings::from_toml(r#"dsv_default_error_policy = "ignore""#).is_err());
    }
}
