//! Typing of bare tokens found inside lists

use crate::language::Value;

/// Decide what a bare (unquoted) list element means. Keywords become
/// booleans or `None`, digit strings become integers, and decimal forms
/// become floats. Dotted pairs such as `1.1` are interface and version
/// names far more often than they are numbers, so they stay strings, as do
/// digit strings too large for an `i64`.
pub fn classify_scalar(token: &str) -> Value {
    match token {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "none" => return Value::None,
        _ => {}
    }

    if !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_digit())
    {
        return match token.parse::<i64>() {
            Ok(number) => Value::Int(number),
            Err(_) => Value::Str(token.to_string()),
        };
    }

    if is_dotted_pair(token) {
        return Value::Str(token.to_string());
    }

    let re = crate::compile!(r"(?i)^-?(\d+\.?e\d+|\d+\.\d*|\.\d+)$");
    if re.is_match(token) {
        if let Ok(number) = token.parse::<f64>() {
            // out of range exponents overflow to infinity
            if number.is_finite() {
                return Value::Float(number);
            }
        }
    }

    Value::Str(token.to_string())
}

// digits, one dot, digits
fn is_dotted_pair(token: &str) -> bool {
    match token.split_once('.') {
        Some((left, right)) => {
            !left.is_empty()
                && !right.is_empty()
                && left
                    .bytes()
                    .all(|b| b.is_ascii_digit())
                && right
                    .bytes()
                    .all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}
