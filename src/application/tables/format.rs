//! Display formatting for currency amounts and percentages.

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_grouped(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    match fixed.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group_thousands(int_part), frac),
        None => group_thousands(&fixed),
    }
}

/// `$1,234.56`, with losses in parentheses: `($1,234.56)`
pub fn format_currency(value: f64) -> String {
    if value >= 0.0 {
        format!("${}", format_grouped(value, 2))
    } else {
        format!("(${})", format_grouped(value, 2))
    }
}

/// Fraction as a percentage with one decimal, negatives in parentheses: `(12.3%)`
pub fn format_percent(value: f64) -> String {
    let pct = format!("{}%", format_grouped(value * 100.0, 1));
    if value < 0.0 { format!("({})", pct) } else { pct }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-1234567.891), "($1,234,567.89)");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.123), "12.3%");
        assert_eq!(format_percent(-0.0456), "(4.6%)");
        assert_eq!(format_percent(12.5), "1,250.0%");
    }
}
