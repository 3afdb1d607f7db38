//! Plain-text rendering of a month grid.

use blog_core::{CalendarCell, CalendarGrid};
use chrono::{Datelike, NaiveDate};

const WEEKDAY_HEADER: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CELL_WIDTH: usize = 5;

/// Renders `grid` as a Sunday-first table followed by the posts of each day.
///
/// Days with posts carry a `*` after the number; `today` is prefixed with
/// `>` when it falls inside the grid's month.
pub fn render_calendar(grid: &CalendarGrid, today: NaiveDate) -> String {
    let month = grid.month();
    let today = (today.year() == month.year() && today.month() == month.month())
        .then_some(today.day());

    let mut lines = vec![format!(
        "« {}    {}    {} »",
        grid.previous_month(),
        grid.month_label(),
        grid.next_month()
    )];

    let header: String = WEEKDAY_HEADER
        .iter()
        .map(|name| format!("{name:>width$} ", width = CELL_WIDTH - 1))
        .collect();
    lines.push(header.trim_end().to_string());

    for week in grid.weeks() {
        let row: String = week.iter().map(|cell| render_cell(cell, today)).collect();
        lines.push(row.trim_end().to_string());
    }

    if grid.post_count() > 0 {
        lines.push(String::new());
        for (day, posts) in grid.day_buckets() {
            lines.extend(
                posts
                    .iter()
                    .map(|post| format!("{day:>3}  {}  [{}]", post.title, post.id)),
            );
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_cell(cell: &CalendarCell<'_>, today: Option<u32>) -> String {
    match cell {
        CalendarCell::Blank => " ".repeat(CELL_WIDTH),
        CalendarCell::Day { day, posts } => {
            let marker = if posts.is_empty() { ' ' } else { '*' };
            if today == Some(*day) {
                format!(">{day:>width$}{marker} ", width = CELL_WIDTH - 3)
            } else {
                format!("{day:>width$}{marker} ", width = CELL_WIDTH - 2)
            }
        }
    }
}
