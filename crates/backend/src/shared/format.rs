/// Formats a number with thousands separators (commas)
///
/// # Examples
/// ```
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// assert_eq!(format_number(0), "0");
/// ```
pub fn format_number(n: usize) -> String {
    group_digits(&n.to_string())
}

/// Formats a money amount as `$1,234.56`, negatives as `-$1,234.56`.
///
/// ```
/// use backend::shared::format::format_money;
/// assert_eq!(format_money(2297200.8603), "$2,297,200.86");
/// assert_eq!(format_money(-12.5), "-$12.50");
/// ```
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_digits(int_part), frac_part)
}

/// Card text for a value that is absent on an empty view.
pub fn format_optional_money(value: Option<f64>) -> String {
    value.map(format_money).unwrap_or_else(not_available)
}

/// `12.34%`, or `N/A`.
pub fn format_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v))
        .unwrap_or_else(not_available)
}

fn not_available() -> String {
    "N/A".to_string()
}

fn group_digits(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
