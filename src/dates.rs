//! Human date input and relative date formatting for scheduling commands.

use chrono::{Datelike, Duration, NaiveDate};

/// Parse human-readable date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday", "next friday", "this sat"
/// - "end of week", "end of month", "weekend"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD"
pub fn parse_date_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => return Some(start_end_of_week(today).1),
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            return NaiveDate::from_ymd_opt(year, month, 1).map(|d| d - Duration::days(1));
        }
        "this weekend" | "weekend" => {
            let days_until_saturday = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
            return Some(today + Duration::days(i64::from(days_until_saturday)));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(unit) = rest.chars().last() {
            let amount = &rest[..rest.len() - unit.len_utf8()];
            if let Ok(n) = amount.trim().parse::<i64>() {
                match unit {
                    'd' => return Some(today + Duration::days(n)),
                    'w' => return Some(today + Duration::weeks(n)),
                    // Approximate: 30 days per month
                    'm' => return Some(today + Duration::days(n * 30)),
                    _ => {}
                }
            }
        }
    }

    let (next_week, day) = if let Some(day) = s.strip_prefix("next ") {
        (true, day)
    } else {
        (false, s.strip_prefix("this ").unwrap_or(&s))
    };
    if let Some(target) = weekday_index(day) {
        let current = today.weekday().num_days_from_monday();
        let ahead = (target + 7 - current) % 7;
        let ahead = if next_week { ahead + 7 } else { ahead };
        return Some(today + Duration::days(i64::from(ahead)));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn weekday_index(name: &str) -> Option<u32> {
    let days = [
        ("monday", "mon"),
        ("tuesday", "tue"),
        ("wednesday", "wed"),
        ("thursday", "thu"),
        ("friday", "fri"),
        ("saturday", "sat"),
        ("sunday", "sun"),
    ];
    days.iter()
        .position(|(long, short)| name == *long || name == *short)
        .map(|i| i as u32)
}

/// Start and end of the ISO week (Monday to Sunday) containing `today`.
pub fn start_end_of_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = i64::from(today.weekday().num_days_from_monday());
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_relative(date: Option<NaiveDate>, today: NaiveDate) -> String {
    match date {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}
