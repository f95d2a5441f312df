use std::fmt;

/// Money is represented as integer cents to keep ledger arithmetic exact.
/// 1 currency unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a two-decimal currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a decimal string into cents.
/// Accepts whole units ("7"), two decimals ("7.25"), or one decimal ("7.5").
/// Anything past two decimal places is truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let cents = match digits.split_once('.') {
        None => {
            let units: i64 = digits.parse().map_err(|_| ParseCentsError::InvalidFormat)?;
            units * 100
        }
        Some((units_str, decimal_str)) => {
            if decimal_str.contains('.') {
                return Err(ParseCentsError::InvalidFormat);
            }
            let units: i64 = if units_str.is_empty() {
                0
            } else {
                units_str
                    .parse()
                    .map_err(|_| ParseCentsError::InvalidFormat)?
            };
            let decimal: i64 = match decimal_str.len() {
                0 => 0,
                1 => {
                    decimal_str
                        .parse::<i64>()
                        .map_err(|_| ParseCentsError::InvalidFormat)?
                        * 10
                }
                _ => {
                    // Truncate by characters, not bytes, so multi-byte
                    // input fails as invalid instead of panicking.
                    let truncated: String = decimal_str.chars().take(2).collect();
                    truncated
                        .parse()
                        .map_err(|_| ParseCentsError::InvalidFormat)?
                }
            };
            units * 100 + decimal
        }
    };

    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("-7"), Ok(-700));
        assert_eq!(parse_cents("100.999"), Ok(10099)); // Truncates
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("12.34.56").is_err());
        assert!(parse_cents("").is_err());
    }

    #[test]
    fn test_parse_cents_multibyte_decimal_is_invalid() {
        // Must reject, not panic on a non-ASCII decimal part.
        assert!(parse_cents("1.€5").is_err());
        assert!(parse_cents("1.5€").is_err());
        assert!(parse_cents("1.€€€").is_err());
    }
}
