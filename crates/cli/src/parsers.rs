use std::{fmt::Display, str::FromStr};

fn parse_bounded_number<T>(s: &str, min: T, max: Option<T>) -> Result<T, String>
where
    T: Copy + PartialOrd + Display + FromStr,
    <T as FromStr>::Err: Display,
{
    let value = s
        .trim()
        .parse::<T>()
        .map_err(|err| format!("invalid number '{s}': {err}"))?;
    if value < min {
        return Err(format!("value must be at least {min}"));
    }
    if let Some(max_bound) = max
        && value > max_bound
    {
        return Err(format!("value must be at most {max_bound}"));
    }
    Ok(value)
}

/// Parse a positive `usize` (>= 1) from CLI input.
///
/// # Errors
/// Returns an error if the input string is not a valid number or is less than 1.
pub fn parse_positive_usize(s: &str) -> Result<usize, String> {
    parse_bounded_number(s, 1, None)
}

/// Parse a positive `u64` (>= 1) from CLI input.
///
/// # Errors
/// Returns an error if the input string is not a valid number or is less than 1.
pub fn parse_positive_u64(s: &str) -> Result<u64, String> {
    parse_bounded_number(s, 1, None)
}

/// Parse a zoom factor, accepting `1.2`, `120%` or `120`.
///
/// # Errors
/// Returns an error for non-numeric input or a factor outside `[0.6, 2.0]`.
pub fn parse_zoom(s: &str) -> Result<f64, String> {
    let s = s.trim();
    let (number, percent) = match s.strip_suffix('%') {
        Some(n) => (n.trim(), true),
        None => (s, false),
    };
    let value: f64 = number
        .parse()
        .map_err(|err| format!("invalid zoom '{s}': {err}"))?;
    let factor = if percent || value > 10.0 { value / 100.0 } else { value };
    if !(0.6..=2.0).contains(&factor) {
        return Err(format!("zoom must be between 60% and 200%, got {s}"));
    }
    Ok(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_numbers() {
        assert_eq!(parse_positive_usize("4"), Ok(4));
        assert!(parse_positive_usize("0").is_err());
        assert!(parse_positive_u64("-3").is_err());
        assert_eq!(parse_positive_u64(" 2 "), Ok(2));
    }

    #[test]
    fn test_zoom_forms() {
        assert_eq!(parse_zoom("1.2"), Ok(1.2));
        assert_eq!(parse_zoom("150%"), Ok(1.5));
        assert_eq!(parse_zoom("80"), Ok(0.8));
        assert!(parse_zoom("3").is_err());
        assert!(parse_zoom("grande").is_err());
    }
}
