use crate::beancount::parser::Rule;
use pest::iterators::Pair;

use anyhow::{anyhow, Result};

use std::convert::TryFrom;

/// First inner token of `token`, as a string slice.
pub fn inner_str(token: Pair<'_, Rule>) -> Result<&str> {
    let token_str = token.as_str();
    token
        .into_inner()
        .next()
        .map(|inner| inner.as_str())
        .ok_or(anyhow!(format!("unexpected token: {}", token_str)))
}

/// Contents of a quoted string token with `\"` and `\\` escapes resolved.
pub fn unquote(token: Pair<'_, Rule>) -> Result<String> {
    let raw = inner_str(token)?;
    let mut unescaped = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => unescaped.push('\n'),
                Some('t') => unescaped.push('\t'),
                Some(other) => unescaped.push(other),
                None => unescaped.push('\\'),
            },
            _ => unescaped.push(c),
        }
    }
    Ok(unescaped)
}

#[derive(Debug, PartialEq)]
pub struct ParsedAmount<'s> {
    pub(crate) nominal: &'s str,
    pub(crate) currency: &'s str,
}

impl<'a> ParsedAmount<'a> {
    pub fn parse(token: Pair<'a, Rule>) -> Result<ParsedAmount<'a>> {
        if token.as_rule() != Rule::amount {
            return Err(anyhow!(format!(
                "unexpected token for amount: '{}'",
                token.as_str()
            )));
        }

        let mut amount = token.into_inner();
        Ok(Self {
            nominal: amount
                .next()
                .ok_or(anyhow!(format!("invalid nominal: '{}'", amount.as_str())))?
                .as_str(),
            currency: amount
                .next()
                .ok_or(anyhow!(format!("invalid currency: '{}'", amount.as_str())))?
                .as_str(),
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct ParsedPosting<'s> {
    pub(crate) account: &'s str,
    pub(crate) amount: Option<ParsedAmount<'s>>,
}

impl<'p> ParsedPosting<'p> {
    pub fn parse(token: Pair<'p, Rule>) -> Result<ParsedPosting<'p>> {
        let mut account = None;
        let mut amount = None;

        for pair in token.into_inner() {
            match pair.as_rule() {
                Rule::account => account = Some(pair.as_str()),
                Rule::amount => amount = Some(ParsedAmount::parse(pair)?),
                // flags and price annotations
                _ => {}
            }
        }

        Ok(ParsedPosting {
            account: account.ok_or(anyhow!("invalid next token, expected account"))?,
            amount,
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct ParsedTransaction<'s> {
    pub(crate) date: &'s str,
    pub(crate) payee: Option<String>,
    pub(crate) narration: String,
    pub(crate) tags: Vec<&'s str>,
    pub(crate) postings: Vec<ParsedPosting<'s>>,
}

impl<'t> ParsedTransaction<'t> {
    pub fn parse(token: Pair<'t, Rule>) -> Result<ParsedTransaction<'t>> {
        let mut pairs = token.into_inner();
        let date = pairs
            .next()
            .ok_or(anyhow!("invalid next token, expected date str"))?
            .as_str();
        let _flag = pairs
            .next()
            .ok_or(anyhow!("invalid next token, transaction flag expected"))?;

        // one string is the narration, two are payee then narration
        let mut strings = pairs
            .next()
            .ok_or(anyhow!("invalid next token, expected payee/narration"))?
            .into_inner()
            .map(unquote)
            .collect::<Result<Vec<String>>>()?;
        let narration = strings.pop().unwrap_or_default();
        let payee = strings.pop();

        let tags = pairs
            .next()
            .ok_or(anyhow!("invalid next token, expected tags and links"))?
            .into_inner()
            .filter(|label| label.as_rule() == Rule::tag)
            .map(inner_str)
            .collect::<Result<Vec<&str>>>()?;

        let postings = pairs
            .next()
            .ok_or(anyhow!("invalid next token, expected postings"))?
            .into_inner()
            .map(ParsedPosting::parse)
            .collect::<Result<Vec<ParsedPosting>>>()?;

        Ok(ParsedTransaction {
            date,
            payee,
            narration,
            tags,
            postings,
        })
    }
}

#[derive(Debug, PartialEq)]
pub enum Directive<'s> {
    Option(String, String),
    Include(String),
    PushTag(&'s str),
    PopTag(&'s str),
    Open(&'s str),
    Transaction(ParsedTransaction<'s>),
    /// Directives that carry nothing this engine imports.
    Skipped,
}

impl<'s> TryFrom<Pair<'s, Rule>> for Directive<'s> {
    type Error = anyhow::Error;

    fn try_from(pair: Pair<'s, Rule>) -> Result<Self, Self::Error> {
        let rule = pair.as_rule();
        if rule == Rule::transaction {
            return Ok(Self::Transaction(ParsedTransaction::parse(pair)?));
        }

        let mut pairs = pair.into_inner();
        let directive = match rule {
            Rule::option => {
                let key = unquote(
                    pairs
                        .next()
                        .ok_or(anyhow!("invalid next token, expected option key"))?,
                )?;
                let val = unquote(
                    pairs
                        .next()
                        .ok_or(anyhow!("invalid next token, expected option value"))?,
                )?;
                Self::Option(key, val)
            }
            Rule::include => Self::Include(unquote(
                pairs
                    .next()
                    .ok_or(anyhow!("invalid next token, expected include path"))?,
            )?),
            Rule::pushtag => Self::PushTag(inner_str(
                pairs
                    .next()
                    .ok_or(anyhow!("invalid next token, expected tag"))?,
            )?),
            Rule::poptag => Self::PopTag(inner_str(
                pairs
                    .next()
                    .ok_or(anyhow!("invalid next token, expected tag"))?,
            )?),
            Rule::open => {
                let _date = pairs
                    .next()
                    .ok_or(anyhow!("invalid next token, expected date str"))?;
                Self::Open(
                    pairs
                        .next()
                        .ok_or(anyhow!("invalid next token, expected account"))?
                        .as_str(),
                )
            }
            Rule::plugin | Rule::close | Rule::other_directive => Self::Skipped,
            _ => return Err(anyhow!(format!("unexpected token: {:?}", rule))),
        };

        Ok(directive)
    }
}
