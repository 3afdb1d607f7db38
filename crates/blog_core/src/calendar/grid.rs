//! Week-aligned month grid with posts bucketed by day of month.

use super::month::{CalendarError, MonthRef};
use crate::model::post::Post;
use chrono::Datelike;
use log::warn;
use serde::Serialize;

pub const DAYS_PER_WEEK: usize = 7;

/// One rendered cell of the month table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell<'a> {
    /// Padding before day 1 or after the last day.
    Blank,
    Day { day: u32, posts: &'a [Post] },
}

/// Month view ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    month: MonthRef,
    month_label: String,
    days_in_month: u32,
    start_weekday_offset: u32,
    /// Index `d - 1` holds the posts of day `d`; length is `days_in_month`.
    day_buckets: Vec<Vec<Post>>,
    previous_month: MonthRef,
    next_month: MonthRef,
}

/// Builds the grid for `year`/`month`.
///
/// `posts` should already be restricted to the month and sorted by
/// `created_at` ascending; order is preserved inside each day. Posts created
/// outside the month are dropped with a warning.
///
/// # Errors
/// - [`CalendarError::InvalidMonth`] when `month` is outside `1..=12`.
/// - [`CalendarError::YearOutOfRange`] for years the date library cannot
///   represent.
pub fn build(
    year: i32,
    month: u32,
    posts: impl IntoIterator<Item = Post>,
) -> Result<CalendarGrid, CalendarError> {
    Ok(CalendarGrid::for_month(MonthRef::new(year, month)?, posts))
}

impl CalendarGrid {
    /// Same as [`build`] for an already validated month.
    pub fn for_month(month: MonthRef, posts: impl IntoIterator<Item = Post>) -> Self {
        let days_in_month = month.days_in_month();
        let mut day_buckets: Vec<Vec<Post>> = vec![Vec::new(); days_in_month as usize];

        for post in posts {
            if !month.contains(post.created_at) {
                warn!(
                    "event=calendar_bucket module=calendar status=skipped reason=outside_month month={} post_id={}",
                    month, post.id
                );
                continue;
            }
            let day = post.created_at.day();
            match day_buckets.get_mut(day as usize - 1) {
                Some(bucket) => bucket.push(post),
                None => warn!(
                    "event=calendar_bucket module=calendar status=skipped reason=out_of_range_day month={} day={} post_id={}",
                    month, day, post.id
                ),
            }
        }

        Self {
            month,
            month_label: month.label(),
            days_in_month,
            start_weekday_offset: month.start_weekday_offset(),
            day_buckets,
            previous_month: month.previous(),
            next_month: month.next(),
        }
    }

    pub fn month(&self) -> MonthRef {
        self.month
    }

    pub fn month_label(&self) -> &str {
        &self.month_label
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    /// Leading blank cells, `0 = month starts on Sunday`.
    pub fn start_weekday_offset(&self) -> u32 {
        self.start_weekday_offset
    }

    pub fn previous_month(&self) -> MonthRef {
        self.previous_month
    }

    pub fn next_month(&self) -> MonthRef {
        self.next_month
    }

    /// Posts of `day`; empty for days without posts or outside the month.
    pub fn posts_on(&self, day: u32) -> &[Post] {
        day.checked_sub(1)
            .and_then(|index| self.day_buckets.get(index as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty buckets as `(day, posts)`, in day order.
    pub fn day_buckets(&self) -> impl Iterator<Item = (u32, &[Post])> + '_ {
        self.day_buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(index, bucket)| (index as u32 + 1, bucket.as_slice()))
    }

    pub fn post_count(&self) -> usize {
        self.day_buckets.iter().map(Vec::len).sum()
    }

    /// Blank cells after the last day, completing the final week.
    pub fn trailing_blanks(&self) -> u32 {
        let used = (self.start_weekday_offset + self.days_in_month) as usize;
        ((DAYS_PER_WEEK - used % DAYS_PER_WEEK) % DAYS_PER_WEEK) as u32
    }

    /// Total rendered cells; always a multiple of 7.
    pub fn cell_count(&self) -> usize {
        (self.start_weekday_offset + self.days_in_month + self.trailing_blanks()) as usize
    }

    /// Cells in reading order: leading blanks, one per day, trailing blanks.
    pub fn cells(&self) -> Vec<CalendarCell<'_>> {
        let mut cells = Vec::with_capacity(self.cell_count());
        cells.extend((0..self.start_weekday_offset).map(|_| CalendarCell::Blank));
        cells.extend(
            self.day_buckets
                .iter()
                .zip(1..)
                .map(|(bucket, day)| CalendarCell::Day {
                    day,
                    posts: bucket.as_slice(),
                }),
        );
        cells.extend((0..self.trailing_blanks()).map(|_| CalendarCell::Blank));
        cells
    }

    /// Cells grouped into Sunday-first weeks of 7.
    pub fn weeks(&self) -> Vec<Vec<CalendarCell<'_>>> {
        self.cells()
            .chunks(DAYS_PER_WEEK)
            .map(<[CalendarCell<'_>]>::to_vec)
            .collect()
    }
}
