//! pt-BR currency formatting
//!
//! Amounts are shown as `R$ 1.234,56`: `.` groups thousands and `,` separates
//! the cents.

/// Format `value` with `symbol` in pt-BR notation
pub fn format_currency(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{} {}", symbol, value);
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    let whole = group_thousands(cents / 100);
    let prefix = if symbol.is_empty() {
        String::new()
    } else {
        format!("{} ", symbol)
    };

    format!("{}{}{},{:02}", sign, prefix, whole, cents % 100)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reais() {
        assert_eq!(format_currency(1234.56, "R$"), "R$ 1.234,56");
        assert_eq!(format_currency(150.75, "R$"), "R$ 150,75");
        assert_eq!(format_currency(0.0, "R$"), "R$ 0,00");
        assert_eq!(format_currency(1_000_000.0, "R$"), "R$ 1.000.000,00");
        assert_eq!(format_currency(0.005, "R$"), "R$ 0,01");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_currency(-10.5, "R$"), "-R$ 10,50");
        assert_eq!(format_currency(-0.001, "R$"), "R$ 0,00");
    }

    #[test]
    fn test_custom_symbol() {
        assert_eq!(format_currency(999.9, "US$"), "US$ 999,90");
        assert_eq!(format_currency(12.0, ""), "12,00");
    }
}
