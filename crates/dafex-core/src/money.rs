//! Currency display formatting.

use num_format::{Locale, ToFormattedString};

/// Formats an amount as Brazilian currency: `R$ 1.234,56`.
///
/// Amounts are rounded to cents. Negative values carry a leading minus:
/// `-R$ 1,00`.
#[must_use]
pub fn format_brl(valor: f64) -> String {
    let negative = valor < 0.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cents = (valor.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_formatted_string(&Locale::pt);
    let frac = cents % 100;
    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {whole},{frac:02}")
}
