//! Display formatting for prices.

use carsync_types::Quantity;

/// Round to whole units and group thousands with commas.
///
/// `101200.0` → `"101,200"`, `-1234.5` → `"-1,235"`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a stored price; non-numeric values are rendered verbatim.
pub fn format_price(price: Option<&Quantity>) -> String {
    match price {
        None => String::new(),
        Some(q) => match q.as_f64() {
            Some(v) => format_currency(v),
            None => q.to_string(),
        },
    }
}
