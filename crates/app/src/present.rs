//! Display formatting for amounts and dates (Indian locale).

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

const RUPEE: char = '₹';

/// `₹1,23,456.79`: two fraction digits, lakh/crore grouping.
pub fn format_currency(amount: Decimal) -> String {
    let (negative, whole, cents) = split_cents(amount);
    format!("{}{RUPEE}{}.{cents:02}", sign(negative), group_indian(whole))
}

/// Like [`format_currency`] but drops trailing zero fraction digits:
/// `₹1,770`, `₹1,770.5`, `₹1,770.25`.
pub fn format_revenue(amount: Decimal) -> String {
    let (negative, whole, cents) = split_cents(amount);
    let fraction = match cents {
        0 => String::new(),
        c if c % 10 == 0 => format!(".{}", c / 10),
        c => format!(".{c:02}"),
    };
    format!("{}{RUPEE}{}{fraction}", sign(negative), group_indian(whole))
}

/// `19 Oct 2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

fn sign(negative: bool) -> &'static str {
    if negative { "-" } else { "" }
}

fn split_cents(amount: Decimal) -> (bool, u128, u128) {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let mantissa = rounded.mantissa().unsigned_abs();
    (negative, mantissa / 100, mantissa % 100)
}

/// Last three digits, then groups of two.
fn group_indian(whole: u128) -> String {
    let digits = whole.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
