// Parse an amount. Reads a string, returns f64 if it is a finite, nonnegative number.
pub fn parse_amount(text: &str) -> Option<f64> {
    match text.trim().parse::<f64>() {
        Ok(val) if val.is_finite() && val >= 0.0 => Some(val),
        _ => None,
    }
}

// Displays an amount so that it reads back through parse_amount unchanged.
// Whole numbers drop the fraction: 12.0 -> "12", 4.5 -> "4.5".
pub fn display_amount(amount: f64) -> String {
    amount.to_string()
}
