//! Sums of expense amounts for the dashboard charts and table footer.

use std::collections::BTreeMap;

use time::Date;

use crate::filter::ExpenseRow;

/// Round `amount` to whole cents.
///
/// Amounts too large to scale by 100 have no fractional cents and are returned as is.
pub(super) fn round_to_cents(amount: f64) -> f64 {
    let cents = amount * 100.0;

    if cents.is_finite() {
        cents.round() / 100.0
    } else {
        amount
    }
}

/// Total spent per category name, ordered by name.
///
/// Only categories with at least one expense appear. Uncategorised expenses are skipped.
pub(super) fn category_totals(expenses: &[ExpenseRow]) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for expense in expenses {
        if let Some(category_name) = &expense.category_name {
            *totals.entry(category_name).or_insert(0.0) += expense.amount;
        }
    }

    totals
        .into_iter()
        .map(|(name, total)| (name.to_owned(), round_to_cents(total)))
        .collect()
}

/// Total spent per day, oldest day first.
pub(super) fn day_totals(expenses: &[ExpenseRow]) -> Vec<(Date, f64)> {
    let mut totals: BTreeMap<Date, f64> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.date).or_insert(0.0) += expense.amount;
    }

    totals
        .into_iter()
        .map(|(date, total)| (date, round_to_cents(total)))
        .collect()
}

/// Total spent across `expenses`.
pub(super) fn grand_total(expenses: &[ExpenseRow]) -> f64 {
    round_to_cents(expenses.iter().map(|expense| expense.amount).sum())
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::filter::ExpenseRow;

    use super::{category_totals, day_totals, grand_total, round_to_cents};

    fn row(amount: f64, date: Date, category_name: Option<&str>) -> ExpenseRow {
        ExpenseRow {
            id: 0,
            description: String::new(),
            amount,
            date,
            category_name: category_name.map(str::to_owned),
        }
    }

    #[test]
    fn empty_input_gives_empty_groups_and_zero_total() {
        assert!(category_totals(&[]).is_empty());
        assert!(day_totals(&[]).is_empty());
        assert_eq!(grand_total(&[]), 0.0);
    }

    #[test]
    fn category_totals_are_sorted_by_name_and_skip_uncategorised() {
        let day = date!(2024 - 01 - 01);
        let expenses = [
            row(10.0, day, Some("Rent")),
            row(2.5, day, Some("Food")),
            row(4.0, day, None),
            row(3.25, day, Some("Food")),
        ];

        assert_eq!(
            category_totals(&expenses),
            [("Food".to_owned(), 5.75), ("Rent".to_owned(), 10.0)]
        );
    }

    #[test]
    fn day_totals_are_oldest_first() {
        let expenses = [
            row(1.0, date!(2024 - 01 - 03), None),
            row(2.0, date!(2024 - 01 - 01), Some("Food")),
            row(3.0, date!(2024 - 01 - 03), Some("Rent")),
        ];

        assert_eq!(
            day_totals(&expenses),
            [(date!(2024 - 01 - 01), 2.0), (date!(2024 - 01 - 03), 4.0)]
        );
    }

    #[test]
    fn totals_are_rounded_to_cents() {
        let day = date!(2024 - 01 - 01);
        let expenses = [row(0.1, day, Some("Food")), row(0.2, day, Some("Food"))];

        assert_eq!(grand_total(&expenses), 0.3);
        assert_eq!(category_totals(&expenses), [("Food".to_owned(), 0.3)]);
        assert_eq!(round_to_cents(2.675_1), 2.68);
    }

    #[test]
    fn huge_amounts_stay_finite() {
        let expenses = [row(1e307, date!(2024 - 01 - 01), Some("Yacht"))];

        assert_eq!(round_to_cents(1e307), 1e307);
        assert_eq!(grand_total(&expenses), 1e307);
        assert_eq!(category_totals(&expenses), [("Yacht".to_owned(), 1e307)]);
    }
}
