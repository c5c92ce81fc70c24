//! Canonical literal notation used to derive content-addressed document ids.
//!
//! Ids are the SHA-256 of every identity field rendered in repr notation
//! (`None`, `'text'`, `b'bytes'`, `{'k': v}`, `[0.1, 0.2]`). The notation must
//! not change or previously stored ids stop matching.

use std::fmt::{LowerExp, Write};

use serde_json::{Map, Value};
use unicode_general_category::{get_general_category, GeneralCategory};

/// Render a quoted string literal, preferring single quotes.
pub fn str_literal(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if is_printable(c) => out.push(c),
            c => {
                let code = c as u32;
                let _ = if code <= 0xff {
                    write!(out, "\\x{:02x}", code)
                } else if code <= 0xffff {
                    write!(out, "\\u{:04x}", code)
                } else {
                    write!(out, "\\U{:08x}", code)
                };
            }
        }
    }
    out.push(quote);
    out
}

/// Render a byte-string literal (`b'...'`).
pub fn bytes_literal(data: &[u8]) -> String {
    let quote = if data.contains(&b'\'') && !data.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };

    let mut out = String::with_capacity(data.len() + 3);
    out.push('b');
    out.push(quote as char);
    for &b in data {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if b == quote => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7e => out.push(b as char),
            b => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }
    out.push(quote as char);
    out
}

/// Render a float the way `repr(float)` does.
///
/// Shortest round-trip digits; fixed notation with a mandatory fractional
/// part when the decimal exponent is in `[-4, 16)`, scientific otherwise.
pub fn float_literal<F: LowerExp + Copy + Into<f64>>(value: F) -> String {
    let as_f64: f64 = value.into();
    if as_f64.is_nan() {
        return "nan".to_string();
    }
    if as_f64.is_infinite() {
        return if as_f64 > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{:e}", value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exponent) {
        if exponent >= 0 {
            let int_len = exponent as usize + 1;
            let (int_part, frac_part) = if digits.len() > int_len {
                (digits[..int_len].to_string(), digits[int_len..].to_string())
            } else {
                (format!("{:0<width$}", digits, width = int_len), String::new())
            };
            let frac_part = if frac_part.is_empty() {
                "0".to_string()
            } else {
                frac_part
            };
            format!("{}{}.{}", sign, int_part, frac_part)
        } else {
            let zeros = "0".repeat((-exponent - 1) as usize);
            format!("{}0.{}{}", sign, zeros, digits)
        }
    } else {
        let (first, rest) = digits.split_at(1);
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{}{}e{}{:02}", sign, first, exp_sign, exponent.abs())
        } else {
            format!("{}{}.{}e{}{:02}", sign, first, rest, exp_sign, exponent.abs())
        }
    }
}

/// Render a list of floats (`[0.1, 0.2]`).
pub fn float_list_literal<F: LowerExp + Copy + Into<f64>>(values: &[F]) -> String {
    let items: Vec<String> = values.iter().map(|v| float_literal(*v)).collect();
    format!("[{}]", items.join(", "))
}

/// Render a list of integers (`[0, 2, 4]`).
pub fn int_list_literal(values: &[usize]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

/// Render a JSON value as the equivalent literal.
pub fn value_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                float_literal(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => str_literal(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(value_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => map_literal(map),
    }
}

/// Render a mapping literal, keeping insertion order.
pub fn map_literal(map: &Map<String, Value>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("{}: {}", str_literal(k), value_literal(v)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

// Everything but the space is escaped in the other (C*) and separator (Z*)
// categories.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}
