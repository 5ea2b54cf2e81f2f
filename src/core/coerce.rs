//! Purpose: Coerce textual property values into JSON scalars.
//! Exports: `coerce_scalar`.
//! Role: Bridge between the driver's all-string property bag and typed JSON bodies.
//! Invariants: Coercion never fails; ambiguous text stays a string.
//! Invariants: `"true"`/`"false"` are matched case-sensitively.

use serde_json::{Number, Value};

/// Convert the textual form of a property value into the scalar it denotes.
///
/// Property bags only carry text; this step is what lets boolean and numeric
/// fields round-trip correctly through a JSON encoder. Anything that is not
/// exactly a boolean literal or plain integer/decimal syntax is kept verbatim
/// as a string. There is no implicit JSON parsing of the leaf.
pub fn coerce_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if is_integer_syntax(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Number(Number::from(n));
        }
        // Out of i64 range; fall through to the decimal route.
    }

    if is_decimal_syntax(raw) {
        if let Ok(n) = raw.parse::<f64>() {
            if let Some(number) = Number::from_f64(n) {
                return Value::Number(number);
            }
        }
    }

    Value::String(raw.to_string())
}

/// `-?digits`, full match.
fn is_integer_syntax(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `-?digits.digits` or plain `-?digits`, full match. No exponents.
fn is_decimal_syntax(raw: &str) -> bool {
    let body = raw.strip_prefix('-').unwrap_or(raw);
    match body.split_once('.') {
        Some((whole, frac)) => {
            !whole.is_empty()
                && !frac.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => is_integer_syntax(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::coerce_scalar;
    use serde_json::{Value, json};

    #[test]
    fn booleans_are_case_sensitive() {
        assert_eq!(coerce_scalar("true"), Value::Bool(true));
        assert_eq!(coerce_scalar("false"), Value::Bool(false));
        assert_eq!(coerce_scalar("True"), json!("True"));
        assert_eq!(coerce_scalar("FALSE"), json!("FALSE"));
    }

    #[test]
    fn integers_and_decimals_become_numbers() {
        assert_eq!(coerce_scalar("3"), json!(3));
        assert_eq!(coerce_scalar("-42"), json!(-42));
        assert_eq!(coerce_scalar("0"), json!(0));
        assert_eq!(coerce_scalar("2.5"), json!(2.5));
        assert_eq!(coerce_scalar("-0.125"), json!(-0.125));
    }

    #[test]
    fn everything_else_stays_a_string() {
        for raw in ["abc", "", "1.2.3", "1e5", "0x10", ".5", "3.", "-", "12 "] {
            assert_eq!(coerce_scalar(raw), Value::String(raw.to_string()), "raw: {raw:?}");
        }
    }

    #[test]
    fn huge_integers_fall_back_to_f64() {
        let out = coerce_scalar("99999999999999999999999999");
        assert!(out.is_number(), "got {out:?}");
    }
}
