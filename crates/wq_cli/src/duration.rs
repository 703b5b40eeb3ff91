use std::str::FromStr;
use std::time::Duration;

/// Duration flag value such as `20s`, `2m`, `1h15m30s`. A bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut total = 0u64;
        let mut digits = String::new();
        let mut seen_number = false;

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            if digits.is_empty() {
                return Err(format!("Unit '{}' must follow a number", c));
            }
            let secs = take_number(&mut digits)?
                .checked_mul(unit)
                .ok_or_else(overflow)?;
            total = total.checked_add(secs).ok_or_else(overflow)?;
            seen_number = true;
        }

        if !digits.is_empty() {
            total = total
                .checked_add(take_number(&mut digits)?)
                .ok_or_else(overflow)?;
            seen_number = true;
        }

        if !seen_number {
            return Err("Duration must include a number".to_string());
        }
        if total == 0 {
            return Err("Duration must be greater than zero".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

fn overflow() -> String {
    "Duration is too large".to_string()
}

fn take_number(digits: &mut String) -> Result<u64, String> {
    let n = digits
        .parse::<u64>()
        .map_err(|_| format!("Invalid number in duration: {}", digits))?;
    digits.clear();
    Ok(n)
}
