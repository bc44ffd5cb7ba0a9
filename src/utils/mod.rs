/// Thousands-grouped rendering for volume figures.
pub fn group_digits(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

/// Rate values print as integers when whole, otherwise with two decimals.
pub fn format_rate(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        group_digits(value as i64)
    } else {
        format!("{value:.2}")
    }
}

pub fn format_opt_volume(value: Option<i64>) -> String {
    match value {
        Some(v) => group_digits(v),
        None => "-".to_string(),
    }
}

pub fn format_opt_rate(value: Option<f64>) -> String {
    match value {
        Some(v) => format_rate(v),
        None => "-".to_string(),
    }
}

pub fn format_opt_text(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => "-".to_string(),
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn parse_f64(value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid decimal number '{}'", value.trim()))
}

pub fn parse_i64(value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid integer '{}'", value.trim()))
}
