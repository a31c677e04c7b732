use chrono::DateTime;
use ratatui::prelude::*;

/// Formats a backend timestamp (RFC 3339 string) as local "DD/MM/YYYY HH:MM".
///
/// # Arguments
/// * `ts` - The raw timestamp as sent by the API, if any.
///
/// # Returns
/// The formatted string, the raw input when it does not parse, or "-".
pub fn format_timestamp(ts: Option<&str>) -> String {
    match ts {
        Some(raw) if !raw.is_empty() => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => dt
                .with_timezone(&chrono::Local)
                .format("%d/%m/%Y %H:%M")
                .to_string(),
            Err(_) => raw.to_string(),
        },
        _ => "-".to_string(),
    }
}

/// Shortens a VIN for narrow columns: the first `show` characters plus "...".
pub fn format_vin(vin: Option<&str>, show: usize) -> String {
    match vin {
        Some(v) if v.chars().count() > show => {
            let head: String = v.chars().take(show).collect();
            format!("{head}...")
        }
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// One decimal place, or "-" when there is no value.
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "-".to_string(),
    }
}

/// Calculates a centered rectangle of a given percentage size within another Rect.
/// Used for the edit and input modals.
///
/// # Arguments
/// * `percent_x` - Horizontal percentage of the parent the rect should occupy.
/// * `percent_y` - Vertical percentage of the parent the rect should occupy.
/// * `r` - The parent Rect (usually the full frame area).
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
