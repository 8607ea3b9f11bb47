use std::time::{Duration, Instant};
use tracing::info;

/// A simple wall-clock timer for logging elapsed time.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.start.elapsed()
        );
    }
}

/// Format a large integer with thousands separators.
pub fn fmt_number(n: i64) -> String {
    let s = n.abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Format a monetary value as whole pounds: 1234.56 → "£1,235".
pub fn fmt_gbp(v: f64) -> String {
    if !v.is_finite() {
        return "—".to_string();
    }
    let rounded = v.round() as i64;
    if rounded < 0 {
        format!("-£{}", fmt_number(-rounded))
    } else {
        format!("£{}", fmt_number(rounded))
    }
}

/// "£1,235" or an em dash for an undefined amount.
pub fn fmt_opt_gbp(v: Option<f64>) -> String {
    v.map(fmt_gbp).unwrap_or_else(|| "—".to_string())
}

/// "12.34%" or an em dash for an undefined ratio.
pub fn fmt_opt_pct(v: Option<f64>) -> String {
    match v {
        Some(x) => format!("{:.2}%", x * 100.0),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(1_234_567), "1,234,567");
        assert_eq!(fmt_number(0), "0");
        assert_eq!(fmt_number(-42_000), "-42,000");
        assert_eq!(fmt_number(999), "999");
    }

    #[test]
    fn test_fmt_gbp() {
        assert_eq!(fmt_gbp(1234.56), "£1,235");
        assert_eq!(fmt_gbp(-300.0), "-£300");
        assert_eq!(fmt_gbp(f64::NAN), "—");
        assert_eq!(fmt_opt_gbp(None), "—");
    }

    #[test]
    fn test_fmt_opt_pct() {
        assert_eq!(fmt_opt_pct(Some(0.0375)), "3.75%");
        assert_eq!(fmt_opt_pct(None), "—");
    }
}
