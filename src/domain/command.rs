//! Text command grammar.
//!
//! Matching is case-insensitive and tolerant of extra words around the
//! keywords: "please add expense ₦1,200.50 for groceries" is an expense of
//! 1200.5 labelled "groceries".

use super::entities::TransactionKind;
use super::errors::ParseError;
use super::money::Money;
use regex::Regex;
use std::sync::LazyLock;

static ADD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\badd\s+(expense|income)s?").expect("valid regex"));
static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsummary\b").expect("valid regex"));
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d[\d,]*(?:\.\d+)?").expect("valid regex"));
static LABEL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:for|on|from)\s+").expect("valid regex"));

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddIncome { amount: Money, label: Option<String> },
    AddExpense { amount: Money, label: Option<String> },
    ShowSummary,
    Unrecognized,
}

impl Command {
    /// Kind, amount and label for commands that record a transaction.
    pub fn as_transaction(&self) -> Option<(TransactionKind, Money, Option<&str>)> {
        match self {
            Command::AddIncome { amount, label } => {
                Some((TransactionKind::Income, *amount, label.as_deref()))
            }
            Command::AddExpense { amount, label } => {
                Some((TransactionKind::Expense, *amount, label.as_deref()))
            }
            Command::ShowSummary | Command::Unrecognized => None,
        }
    }
}

/// Classify a line of free text.
///
/// `Unrecognized` is a valid outcome, not an error. Errors are reserved for
/// add commands whose amount is missing, not positive, or finer than 0.01.
pub fn parse_command(text: &str) -> Result<Command, ParseError> {
    let text = text.trim();

    if let Some(caps) = ADD_RE.captures(text) {
        let kind = match caps.get(1).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
            Some("income") => TransactionKind::Income,
            _ => TransactionKind::Expense,
        };
        let rest = caps.get(0).map(|m| &text[m.end()..]).unwrap_or_default();
        let (amount, label) = parse_amount_and_label(kind, rest)?;
        return Ok(match kind {
            TransactionKind::Income => Command::AddIncome { amount, label },
            TransactionKind::Expense => Command::AddExpense { amount, label },
        });
    }

    if SUMMARY_RE.is_match(text) {
        return Ok(Command::ShowSummary);
    }

    Ok(Command::Unrecognized)
}

/// A number counts only when it starts a word: "covid-19" and "abc123" are
/// part of the label, "₦50" and "-20" are amounts.
fn starts_word(rest: &str, at: usize) -> bool {
    rest[..at]
        .chars()
        .next_back()
        .is_none_or(|c| !(c.is_alphanumeric() || c == '-' || c == '_'))
}

fn parse_amount_and_label(
    kind: TransactionKind,
    rest: &str,
) -> Result<(Money, Option<String>), ParseError> {
    let m = AMOUNT_RE
        .find_iter(rest)
        .find(|m| starts_word(rest, m.start()))
        .ok_or(ParseError::MissingAmount { kind })?;
    let raw = m.as_str();
    let amount = Money::parse(raw)
        .ok()
        .filter(Money::is_positive)
        .ok_or_else(|| ParseError::InvalidAmount {
            kind,
            raw: raw.to_string(),
        })?;

    // Label follows the amount; "add expense for rent 500" puts it before.
    let tail = clean_label(&rest[m.end()..]);
    let label = if tail.is_empty() {
        clean_label(&rest[..m.start()])
    } else {
        tail
    };
    let label = (!label.is_empty()).then_some(label);

    Ok((amount, label))
}

fn clean_label(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
    LABEL_PREFIX_RE.replace(trimmed, "").trim().to_string()
}
