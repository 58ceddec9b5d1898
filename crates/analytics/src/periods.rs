use chrono::{Datelike, Days, Months, NaiveDate};
use core_types::Frequency;

/// Generates the period boundaries that fall inside `[start, end]` at `freq`.
///
/// Boundaries are anchored to the calendar rather than to `start`: weekly
/// boundaries are Sundays, `MonthEnd` boundaries are the last day of each month
/// and `MonthStart` boundaries the first. An inverted range yields no boundaries.
pub fn period_boundaries(start: NaiveDate, end: NaiveDate, freq: Frequency) -> Vec<NaiveDate> {
    let mut boundaries = Vec::new();
    if start > end {
        return boundaries;
    }

    let mut current = first_boundary(start, freq);
    while let Some(boundary) = current {
        if boundary > end {
            break;
        }
        boundaries.push(boundary);
        current = next_boundary(boundary, freq);
    }
    boundaries
}

/// Splits `[start, end]` into consecutive half-open periods `[b[i], b[i + 1])`.
///
/// `k` boundaries produce `k - 1` periods; fewer than two boundaries produce none.
pub fn period_windows(start: NaiveDate, end: NaiveDate, freq: Frequency) -> Vec<(NaiveDate, NaiveDate)> {
    period_boundaries(start, end, freq)
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

fn first_boundary(start: NaiveDate, freq: Frequency) -> Option<NaiveDate> {
    match freq {
        Frequency::Daily => Some(start),
        Frequency::Weekly => {
            let until_sunday = (7 - start.weekday().num_days_from_sunday()) % 7;
            start.checked_add_days(Days::new(u64::from(until_sunday)))
        }
        Frequency::MonthEnd => month_end(start),
        Frequency::MonthStart => {
            if start.day() == 1 {
                Some(start)
            } else {
                start.with_day(1)?.checked_add_months(Months::new(1))
            }
        }
    }
}

fn next_boundary(boundary: NaiveDate, freq: Frequency) -> Option<NaiveDate> {
    match freq {
        Frequency::Daily => boundary.succ_opt(),
        Frequency::Weekly => boundary.checked_add_days(Days::new(7)),
        Frequency::MonthEnd => month_end(boundary.succ_opt()?),
        Frequency::MonthStart => boundary.checked_add_months(Months::new(1)),
    }
}

fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}
