//! # Perigee/Apogee Table Rendering
//!
//! This module turns a computed [`YearResult`] into terminal output. It never calls back
//! into the search, so everything here works on plain data.
//!
//! Two outputs are supported:
//! - **Table**: four columns (perigee date, perigee distance, apogee date, apogee distance)
//!   drawn with `comfy-table`'s UTF-8 full grid, optionally coloured
//! - **JSON**: the `YearResult` serialized with `serde_json` for scripting

use crate::{config::DisplayConfig, RefinedExtremum, YearResult};
use chrono::NaiveDateTime;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color, Table};

const HEADERS: [&str; 4] = [
    "Perigee Date",
    "Perigee Distance",
    "Apogee Date",
    "Apogee Distance",
];

/// Heading line printed above the table.
pub fn render_heading(year: i32) -> String {
    format!("🌙 Lunar Distance for {} 🚀", year)
}

/// Format an event instant with a chrono strftime pattern (e.g. "%b %d %H:%M").
pub fn format_event_date(timestamp: NaiveDateTime, pattern: &str) -> String {
    timestamp.format(pattern).to_string()
}

/// Round to the nearest kilometer and group thousands: `356512.4` → `"356,512 km"`.
pub fn format_distance_km(distance_km: f64) -> String {
    let rounded = distance_km.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{} km", grouped)
    } else {
        format!("{} km", grouped)
    }
}

/// Render both event lists side by side.
///
/// Rows pair the i-th perigee with the i-th apogee; when one list is longer, the
/// other side of the extra rows is left empty.
pub fn render_table(result: &YearResult, display: &DisplayConfig) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    table.set_header(
        HEADERS
            .iter()
            .map(|h| paint(Cell::new(h).add_attribute(Attribute::Bold), Color::Blue, display))
            .collect::<Vec<_>>(),
    );

    for row in 0..result.row_count() {
        let mut cells = Vec::with_capacity(4);
        cells.extend(event_cells(
            result.perigees.get(row),
            Color::Green,
            Color::Cyan,
            display,
        ));
        cells.extend(event_cells(
            result.apogees.get(row),
            Color::Magenta,
            Color::Yellow,
            display,
        ));
        table.add_row(cells);
    }

    table.to_string()
}

/// Pretty-printed JSON of the whole result.
pub fn render_json(result: &YearResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

fn event_cells(
    event: Option<&RefinedExtremum>,
    date_color: Color,
    distance_color: Color,
    display: &DisplayConfig,
) -> [Cell; 2] {
    match event {
        Some(e) => [
            paint(
                Cell::new(format_event_date(e.timestamp, &display.date_format)),
                date_color,
                display,
            ),
            paint(
                Cell::new(format_distance_km(e.distance_km)),
                distance_color,
                display,
            )
            .set_alignment(CellAlignment::Right),
        ],
        None => [Cell::new(""), Cell::new("")],
    }
}

fn paint(cell: Cell, color: Color, display: &DisplayConfig) -> Cell {
    if display.color {
        cell.fg(color)
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtremumKind;
    use chrono::NaiveDate;

    fn event(month: u32, day: u32, distance_km: f64, kind: ExtremumKind) -> RefinedExtremum {
        RefinedExtremum {
            timestamp: NaiveDate::from_ymd_opt(2024, month, day)
                .unwrap()
                .and_hms_opt(8, 5, 0)
                .unwrap(),
            distance_km,
            kind,
        }
    }

    fn plain() -> DisplayConfig {
        DisplayConfig {
            color: false,
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn distance_rounds_and_groups_thousands() {
        assert_eq!(format_distance_km(356_512.4), "356,512 km");
        assert_eq!(format_distance_km(406_699.5), "406,700 km");
        assert_eq!(format_distance_km(999.0), "999 km");
        assert_eq!(format_distance_km(1_000.0), "1,000 km");
        assert_eq!(format_distance_km(0.2), "0 km");
        assert_eq!(format_distance_km(-1_234_567.0), "-1,234,567 km");
    }

    #[test]
    fn dates_use_configured_pattern() {
        let e = event(1, 13, 362_000.0, ExtremumKind::Perigee);
        assert_eq!(format_event_date(e.timestamp, "%b %d %H:%M"), "Jan 13 08:05");
        assert_eq!(format_event_date(e.timestamp, "%Y-%m-%d"), "2024-01-13");
    }

    #[test]
    fn shorter_side_is_padded() {
        let result = YearResult {
            year: 2024,
            perigees: vec![
                event(1, 13, 362_267.0, ExtremumKind::Perigee),
                event(2, 10, 358_088.0, ExtremumKind::Perigee),
            ],
            apogees: vec![event(1, 1, 404_909.0, ExtremumKind::Apogee)],
        };
        let table = render_table(&result, &plain());

        assert!(table.contains("Perigee Date"));
        assert!(table.contains("Apogee Distance"));
        assert!(table.contains("Jan 13 08:05"));
        assert!(table.contains("358,088 km"));
        assert!(table.contains("404,909 km"));

        let data_lines: Vec<&str> = table
            .lines()
            .filter(|l| l.contains(" km"))
            .collect();
        assert_eq!(data_lines.len(), 2);
        assert!(!data_lines[1].contains("Jan 01"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let result = YearResult {
            year: 2024,
            perigees: vec![event(1, 13, 362_267.0, ExtremumKind::Perigee)],
            apogees: vec![],
        };
        assert!(!render_table(&result, &plain()).contains('\u{1b}'));
    }

    #[test]
    fn json_carries_kind_and_year() {
        let result = YearResult {
            year: 2024,
            perigees: vec![event(1, 13, 362_267.0, ExtremumKind::Perigee)],
            apogees: vec![],
        };
        let json = render_json(&result).unwrap();
        assert!(json.contains("\"year\": 2024"));
        assert!(json.contains("\"kind\": \"perigee\""));
        let parsed: YearResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn heading_names_year() {
        assert!(render_heading(1999).contains("Lunar Distance for 1999"));
    }
}
