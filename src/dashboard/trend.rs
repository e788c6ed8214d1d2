//! Monthly trend bucketing for the dashboard.
//!
//! Buckets the expense collection into the trailing six calendar months and
//! sums the amounts per month for the trend chart.

use time::{Date, Month};

use crate::expense::Expense;

/// How many trailing calendar months the trend chart covers.
pub(super) const TREND_MONTHS: usize = 6;

/// A calendar-month bucket with its accumulated total.
#[derive(Debug, PartialEq)]
pub(super) struct MonthBucket {
    /// The first day of the bucket's month.
    pub month: Date,
    /// Human-readable label, e.g. "Feb 2024".
    pub label: String,
    /// Sum of the amounts of expenses dated within the month.
    pub total: f64,
}

/// Bucket `expenses` into the six calendar months ending at `today`'s month.
///
/// Buckets are returned oldest first, each starting at zero. Expenses dated
/// outside the window are dropped without comment; the trend chart only
/// ever shows the trailing window.
pub(super) fn monthly_trend(expenses: &[Expense], today: Date) -> Vec<MonthBucket> {
    let mut buckets = Vec::with_capacity(TREND_MONTHS);
    let mut month = months_before(start_of_month(today), TREND_MONTHS - 1);

    for _ in 0..TREND_MONTHS {
        buckets.push(MonthBucket {
            month,
            label: month_label(month),
            total: 0.0,
        });
        month = next_month(month);
    }

    for expense in expenses {
        let expense_month = start_of_month(expense.date);

        if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.month == expense_month) {
            bucket.total += expense.amount;
        }
    }

    buckets
}

fn start_of_month(date: Date) -> Date {
    date.replace_day(1).expect("day 1 is valid in every month")
}

fn months_before(month_start: Date, months: usize) -> Date {
    let mut month = month_start;

    for _ in 0..months {
        month = previous_month(month);
    }

    month
}

fn previous_month(month_start: Date) -> Date {
    let (year, month) = match month_start.month() {
        Month::January => (month_start.year() - 1, Month::December),
        other => (month_start.year(), other.previous()),
    };

    Date::from_calendar_date(year, month, 1).expect("day 1 is valid in every month")
}

fn next_month(month_start: Date) -> Date {
    let (year, month) = match month_start.month() {
        Month::December => (month_start.year() + 1, Month::January),
        other => (month_start.year(), other.next()),
    };

    Date::from_calendar_date(year, month, 1).expect("day 1 is valid in every month")
}

fn month_label(month_start: Date) -> String {
    format!("{} {}", month_abbrev(month_start.month()), month_start.year())
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod trend_tests {
    use time::macros::date;

    use super::{TREND_MONTHS, monthly_trend};
    use crate::{category::Category, expense::test_utils::create_test_expense};

    #[test]
    fn always_emits_six_buckets_oldest_first() {
        let buckets = monthly_trend(&[], date!(2024 - 06 - 15));

        assert_eq!(buckets.len(), TREND_MONTHS);
        let got_months: Vec<_> = buckets.iter().map(|bucket| bucket.month).collect();
        assert_eq!(
            got_months,
            vec![
                date!(2024 - 01 - 01),
                date!(2024 - 02 - 01),
                date!(2024 - 03 - 01),
                date!(2024 - 04 - 01),
                date!(2024 - 05 - 01),
                date!(2024 - 06 - 01),
            ]
        );
    }

    #[test]
    fn sums_expense_into_its_month_bucket() {
        let expenses = vec![create_test_expense(
            1,
            "Course fee",
            30.0,
            Category::Education,
            date!(2024 - 02 - 20),
        )];

        let buckets = monthly_trend(&expenses, date!(2024 - 06 - 15));

        let feb = buckets
            .iter()
            .find(|bucket| bucket.label == "Feb 2024")
            .expect("want a Feb 2024 bucket");
        assert_eq!(feb.total, 30.0);

        for bucket in &buckets {
            if bucket.label != "Feb 2024" {
                assert_eq!(bucket.total, 0.0, "bucket {} should be empty", bucket.label);
            }
        }
    }

    #[test]
    fn accumulates_multiple_expenses_in_the_same_month() {
        let expenses = vec![
            create_test_expense(1, "Breakfast", 10.0, Category::Food, date!(2024 - 05 - 01)),
            create_test_expense(2, "Dinner", 25.0, Category::Food, date!(2024 - 05 - 31)),
        ];

        let buckets = monthly_trend(&expenses, date!(2024 - 06 - 15));

        let may = buckets
            .iter()
            .find(|bucket| bucket.label == "May 2024")
            .expect("want a May 2024 bucket");
        assert_eq!(may.total, 35.0);
    }

    #[test]
    fn drops_expenses_outside_the_window() {
        let expenses = vec![
            create_test_expense(1, "Too old", 100.0, Category::Other, date!(2023 - 12 - 31)),
            create_test_expense(2, "Too new", 100.0, Category::Other, date!(2024 - 07 - 01)),
        ];

        let buckets = monthly_trend(&expenses, date!(2024 - 06 - 15));

        assert!(
            buckets.iter().all(|bucket| bucket.total == 0.0),
            "out-of-window expenses must not be counted: {buckets:?}"
        );
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let expenses = vec![
            create_test_expense(1, "Oldest day", 1.0, Category::Other, date!(2024 - 01 - 01)),
            create_test_expense(2, "Newest day", 2.0, Category::Other, date!(2024 - 06 - 30)),
        ];

        let buckets = monthly_trend(&expenses, date!(2024 - 06 - 15));

        assert_eq!(buckets[0].total, 1.0);
        assert_eq!(buckets[5].total, 2.0);
    }

    #[test]
    fn window_crosses_year_boundaries() {
        let buckets = monthly_trend(&[], date!(2024 - 02 - 10));

        let got_labels: Vec<_> = buckets.iter().map(|bucket| bucket.label.as_str()).collect();
        assert_eq!(
            got_labels,
            vec![
                "Sep 2023",
                "Oct 2023",
                "Nov 2023",
                "Dec 2023",
                "Jan 2024",
                "Feb 2024",
            ]
        );
    }
}
