//! Form fields and input parsing shared by the add and edit expense endpoints.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::Category,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The raw fields of the add and edit expense forms.
///
/// Every field is optional so that the edit endpoint can keep stored values
/// for fields the user left blank.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// Trim `value` and treat empty strings as missing.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse an expense amount.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] unless `raw` is a finite number greater than zero.
pub fn parse_amount(raw: &str) -> Result<f64, Error> {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(Error::InvalidAmount(raw.to_owned())),
    }
}

/// Parse a date written exactly as YYYY-MM-DD.
///
/// Returns `None` for anything else, including impossible dates such as 2024-02-30.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();

    let has_expected_shape = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, byte)| match i {
                4 | 7 => *byte == b'-',
                _ => byte.is_ascii_digit(),
            });

    if !has_expected_shape {
        return None;
    }

    Date::parse(raw, time::macros::format_description!("[year]-[month]-[day]")).ok()
}

pub(crate) struct ExpenseFieldValues<'a> {
    pub description: &'a str,
    pub amount: Option<f64>,
    pub category: Option<&'a str>,
    /// When false the select offers "No category" so an uncategorised expense can stay that way.
    pub category_required: bool,
    pub date: Date,
}

/// The inputs of the expense form, without the surrounding `form` element.
pub(crate) fn expense_form_fields(values: &ExpenseFieldValues<'_>, categories: &[Category]) -> Markup {
    // Full precision, so saving an unchanged form stores the same amount.
    let amount = values.amount.map(|amount| amount.to_string());

    html! {
        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="What did you spend money on?"
                required
                value=(values.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name="amount"
                id="amount"
                type="number"
                step="any"
                min="0.01"
                placeholder="0.00"
                required
                value=[amount.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select
                name="category"
                id="category"
                required[values.category_required]
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @if !values.category_required {
                    option value="" selected[values.category.is_none()] { "No category" }
                } @else if values.category.is_none() {
                    option value="" disabled selected { "Select a category" }
                }

                @for category in categories {
                    @let name = category.name.as_ref();
                    option value=(name) selected[values.category == Some(name)] { (name) }
                }
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                required
                value=(values.date)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::{non_empty, parse_amount, parse_date};

    #[test]
    fn parse_amount_accepts_positive_numbers() {
        assert_eq!(parse_amount(" 12.50 "), Ok(12.5));
        assert_eq!(parse_amount("0.01"), Ok(0.01));
    }

    #[test]
    fn parse_amount_rejects_zero_negative_and_garbage() {
        for raw in ["0", "-3", "abc", "", "inf", "NaN"] {
            assert_eq!(
                parse_amount(raw),
                Err(Error::InvalidAmount(raw.to_owned())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(parse_date("2024-02-29"), Some(date!(2024 - 02 - 29)));
        assert_eq!(parse_date(" 2024-12-01 "), Some(date!(2024 - 12 - 01)));
    }

    #[test]
    fn parse_date_rejects_other_shapes() {
        for raw in [
            "2024-2-29",
            "24-02-29",
            "2024/02/29",
            "2023-02-29",
            "2024-13-01",
            "+2024-01-01",
            "",
            "yesterday",
        ] {
            assert_eq!(parse_date(raw), None, "{raw:?} should be rejected");
        }
    }

    #[test]
    fn non_empty_trims_and_drops_blanks() {
        assert_eq!(non_empty(Some("  x ")), Some("x"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }
}
