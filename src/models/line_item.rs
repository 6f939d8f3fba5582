use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

/// One row of the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub description: String,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub unit_price: f64,
    /// Fields the generator sent that the editor doesn't know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: 1.0,
            unit_price: 0.0,
            extra: Map::new(),
        }
    }
}

impl LineItem {
    /// Recomputed on every call, never stored.
    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Parses user input the way a browser number field does: leading whitespace
/// is skipped and the longest decimal prefix wins. Anything without a numeric
/// prefix, or that is not finite, becomes `0`.
pub fn coerce_number(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let is_digit = |i: usize| i < len && bytes[i].is_ascii_digit();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return 0.0;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    // "1." and ".5" are valid prefixes; normalize them before parsing.
    let literal = s[..end].replace(".e", "e").replace(".E", "E");
    let literal = literal.strip_suffix('.').unwrap_or(&literal);
    let literal = match literal.find('.') {
        Some(0) => format!("0{literal}"),
        Some(1) if literal.starts_with(['+', '-']) => format!("{}0{}", &literal[..1], &literal[1..]),
        _ => literal.to_string(),
    };

    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => 0.0,
    }
}

/// Accepts numbers, numeric strings and `null` for an item amount.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => Ok(coerce_number(&s)),
        Value::Null => Ok(0.0),
        other => Err(de::Error::custom(format!("expected a number, got {other}"))),
    }
}
