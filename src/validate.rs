// 2.0 validate.rs: validation engine. pure functions from raw form text to
// typed, sanitized values. every violated rule is reported, not just the first.
// no state, no I/O.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::BoardConfig;
use crate::types::{format_amount, Premium, Unit};

/** 2.1: typed output of a successful validation pass */
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub amount: u64,
    pub premium: Premium,
    pub note: String,
}

// 2.2: one violated rule. messages are user-facing and prefixed with the field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("amount: enter digits only (e.g. 100000 or 100,000)")]
    AmountNotNumeric,

    #[error("amount: must be positive")]
    AmountNotPositive,

    #[error("amount: minimum is {}", format_amount(*min, *unit))]
    AmountBelowMinimum { min: u64, unit: Unit },

    #[error("amount: maximum is {}", format_amount(*max, *unit))]
    AmountAboveMaximum { max: u64, unit: Unit },

    #[error("unit: unknown unit: {0}")]
    UnknownUnit(Unit),

    #[error("premium: enter a number (e.g. 5 or -3.5)")]
    PremiumNotNumeric,

    #[error("premium: must be at least {0}%")]
    PremiumBelowMinimum(Decimal),

    #[error("premium: must be at most {0}%")]
    PremiumAboveMaximum(Decimal),

    #[error("note: must be {max} characters or fewer (currently {len})")]
    NoteTooLong { max: usize, len: usize },
}

// Every violated rule from one validation pass, reported together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render_errors(.errors))]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

fn render_errors(errors: &[FieldError]) -> String {
    let lines: Vec<String> = errors.iter().map(|e| format!("• {e}")).collect();
    format!("check your input:\n{}", lines.join("\n"))
}

// 2.3: full validation pass. amount, premium, and note are checked
// independently so the caller gets every violation in one response.
pub fn validate_trade_input(
    raw_amount: &str,
    raw_premium: &str,
    raw_note: &str,
    unit: Unit,
    config: &BoardConfig,
) -> Result<ValidatedInput, ValidationFailure> {
    let mut errors = Vec::new();

    let amount = match parse_amount(raw_amount) {
        Some(value) => match config.limits_for(unit) {
            None => {
                errors.push(FieldError::UnknownUnit(unit));
                None
            }
            Some(limits) => {
                if value <= 0 {
                    errors.push(FieldError::AmountNotPositive);
                    None
                } else if (value as u128) < limits.min as u128 {
                    errors.push(FieldError::AmountBelowMinimum { min: limits.min, unit });
                    None
                } else if value as u128 > limits.max as u128 {
                    errors.push(FieldError::AmountAboveMaximum { max: limits.max, unit });
                    None
                } else {
                    Some(value as u64)
                }
            }
        },
        None => {
            errors.push(FieldError::AmountNotNumeric);
            None
        }
    };

    let premium = match parse_premium(raw_premium) {
        // Decimal has no non-finite values, so a finite-ness check is implied by parsing.
        // range-checked as parsed; only an accepted value is rounded for storage,
        // so "100.004" is out of range rather than rounded back in.
        Some(value) => {
            if value < config.premium_min {
                errors.push(FieldError::PremiumBelowMinimum(config.premium_min));
                None
            } else if value > config.premium_max {
                errors.push(FieldError::PremiumAboveMaximum(config.premium_max));
                None
            } else {
                Some(Premium::new(value))
            }
        }
        None => {
            errors.push(FieldError::PremiumNotNumeric);
            None
        }
    };

    let note = sanitize_note(raw_note);
    let note_len = note.chars().count();
    if note_len > config.note_max_chars {
        errors.push(FieldError::NoteTooLong {
            max: config.note_max_chars,
            len: note_len,
        });
    }

    if !errors.is_empty() {
        return Err(ValidationFailure { errors });
    }

    Ok(ValidatedInput {
        // both are Some here: a None would have pushed an error above
        amount: amount.unwrap_or_default(),
        premium: premium.unwrap_or_else(|| Premium::new(Decimal::ZERO)),
        note,
    })
}

// strip thousands separators and whitespace, then parse base 10.
// i128 so absurdly large inputs fail the bound check, not the parse.
fn parse_amount(raw: &str) -> Option<i128> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<i128>().ok()
}

// strip a trailing percent sign and whitespace. accepts plain and scientific forms.
fn parse_premium(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .ok()
        .or_else(|| Decimal::from_scientific(&cleaned).ok())
}

// 2.4: note sanitization. neutralizes anything that could trigger a mass
// notification or break out of the display formatting:
//   - @everyone / @here get a zero-width space after the @
//   - raw mention tokens <@id> / <@!id> / <@&id> / <#id> become inert `@id` literals
//   - triple backticks are escaped
//   - runs of 3+ newlines collapse to 2
// idempotent: sanitizing already-sanitized text is a no-op.
pub fn sanitize_note(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let text = trimmed
        .replace("@everyone", "@\u{200b}everyone")
        .replace("@here", "@\u{200b}here");
    let text = neutralize_mention_tokens(&text);
    let text = text.replace("```", "\\`\\`\\`");
    collapse_newlines(&text)
}

// rewrites <@123>, <@!123>, <@&123>, <#123> to `@123` / `@!123` / `@&123` / `#123`
fn neutralize_mention_tokens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match mention_token(candidate) {
            Some((token_len, inner)) => {
                out.push('`');
                out.push_str(inner);
                out.push('`');
                rest = &candidate[token_len..];
            }
            None => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// returns (token length, inner text without angle brackets) when `s` starts
// with a well-formed mention token
fn mention_token(s: &str) -> Option<(usize, &str)> {
    let body = s.strip_prefix('<')?;
    let sigil_len = if body.starts_with("@!") || body.starts_with("@&") {
        2
    } else if body.starts_with('@') || body.starts_with('#') {
        1
    } else {
        return None;
    };
    let digit_count = body[sigil_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digit_count == 0 {
        return None;
    }
    let inner_len = sigil_len + digit_count;
    if body.as_bytes().get(inner_len) == Some(&b'>') {
        Some((inner_len + 2, &body[..inner_len]))
    } else {
        None
    }
}

fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for c in text.chars() {
        if c == '\n' {
            run += 1;
            if run <= 2 {
                out.push('\n');
            }
        } else {
            run = 0;
            out.push(c);
        }
    }
    out
}
