//! Month calendar view over posts.
//!
//! # Responsibility
//! - Resolve the requested month (`CalendarRequest`) into a `MonthRef`.
//! - Build a week-aligned `CalendarGrid` with posts bucketed by day.
//!
//! # Invariants
//! - Building is pure: no clock reads once a month is supplied.
//! - Weeks start on Sunday; every rendered week has exactly 7 cells.

mod grid;
mod month;

pub use grid::{build, CalendarCell, CalendarGrid, DAYS_PER_WEEK};
pub use month::{days_in_month, is_leap_year, CalendarError, CalendarRequest, MonthRef};
