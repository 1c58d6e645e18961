use chrono::{DateTime, NaiveDateTime};

/// Currency suffix for order prices
const CURRENCY: &str = "RUB";

const DISPLAY_FORMAT: &str = "%b %d, %Y %H:%M";

/// Format a price with two decimals and the currency suffix
pub fn format_price(price: f64) -> String {
    format!("{:.2} {}", price, CURRENCY)
}

/// Format a timestamp from the server to a more readable form.
/// Accepts RFC 3339 and zone-less ISO timestamps; anything else is returned as-is.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, pattern) {
            return dt.format(DISPLAY_FORMAT).to_string();
        }
    }
    date.to_string()
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(12.5), "12.50 RUB");
        assert_eq!(format_price(0.0), "0.00 RUB");
        assert_eq!(format_price(1999.999), "2000.00 RUB");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-05-01T10:00:00Z"), "May 01, 2024 10:00");
        assert_eq!(format_date("2024-05-01T10:00:00.123456"), "May 01, 2024 10:00");
        assert_eq!(format_date("2024-05-01 08:30:00"), "May 01, 2024 08:30");
        assert_eq!(format_date("yesterday"), "yesterday");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Привет мир", 9), "Привет...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }
}
