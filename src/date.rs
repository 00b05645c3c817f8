//! Normalizes the two date layouts found in expense data into [Date]s.
//!
//! Expense dates arrive either as `DD-MM-YYYY`, the layout shown in tables, or
//! as `YYYY-MM-DD`, the layout emitted by HTML date inputs. Both are parsed into
//! a [Date] so that range filters and chart axes compare calendar dates rather
//! than strings.

use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

/// The layout used when displaying dates in tables and chart labels.
const DISPLAY_FORMAT: &[BorrowedFormatItem] = format_description!("[day]-[month]-[year]");

/// The layout used by HTML date inputs.
const INPUT_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The reasons a date string could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    /// The text did not split into exactly three `-` separated parts.
    #[error("\"{0}\" is not in the DD-MM-YYYY or YYYY-MM-DD format")]
    WrongShape(String),

    /// One of the parts was not a number.
    #[error("\"{0}\" contains a part that is not a number")]
    InvalidNumber(String),

    /// The parts were numbers but do not describe a calendar date, e.g. 31-02-2024.
    #[error("\"{0}\" is not a valid calendar date")]
    InvalidDate(String),
}

/// Parse `text` written as either `DD-MM-YYYY` or `YYYY-MM-DD`.
///
/// The text is treated as day-month-year when it has three parts and the first
/// part is two characters long. Everything else is read as year-month-day.
///
/// # Errors
/// Returns a [DateParseError] if the text does not describe a calendar date.
pub fn parse_date(text: &str) -> Result<Date, DateParseError> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed.split('-').collect();

    let [first, second, third] = parts.as_slice() else {
        return Err(DateParseError::WrongShape(text.to_owned()));
    };

    let (year, month, day) = if first.len() == 2 {
        (*third, *second, *first)
    } else {
        (*first, *second, *third)
    };

    let invalid_number = |_| DateParseError::InvalidNumber(text.to_owned());
    let year: i32 = year.parse().map_err(invalid_number)?;
    let month: u8 = month.parse().map_err(invalid_number)?;
    let day: u8 = day.parse().map_err(invalid_number)?;

    let month =
        Month::try_from(month).map_err(|_| DateParseError::InvalidDate(text.to_owned()))?;

    Date::from_calendar_date(year, month, day)
        .map_err(|_| DateParseError::InvalidDate(text.to_owned()))
}

/// Render `date` as `DD-MM-YYYY`.
pub fn format_display_date(date: Date) -> String {
    date.format(DISPLAY_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Render `date` as `YYYY-MM-DD`, the value format of `<input type="date">`.
pub fn format_input_date(date: Date) -> String {
    date.format(INPUT_FORMAT).unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{DateParseError, format_display_date, format_input_date, parse_date};

    #[test]
    fn parses_day_month_year() {
        assert_eq!(parse_date("15-03-2024"), Ok(date!(2024 - 03 - 15)));
    }

    #[test]
    fn parses_year_month_day() {
        assert_eq!(parse_date("2024-03-15"), Ok(date!(2024 - 03 - 15)));
    }

    #[test]
    fn both_layouts_normalize_to_the_same_date() {
        assert_eq!(parse_date("15-03-2024"), parse_date("2024-03-15"));
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        assert_eq!(parse_date(" 01-01-2024\n"), Ok(date!(2024 - 01 - 01)));
    }

    #[test]
    fn rejects_wrong_number_of_parts() {
        assert_eq!(
            parse_date("15/03/2024"),
            Err(DateParseError::WrongShape("15/03/2024".to_owned()))
        );
        assert_eq!(
            parse_date(""),
            Err(DateParseError::WrongShape(String::new()))
        );
    }

    #[test]
    fn rejects_non_numeric_parts() {
        assert_eq!(
            parse_date("aa-03-2024"),
            Err(DateParseError::InvalidNumber("aa-03-2024".to_owned()))
        );
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(
            parse_date("31-02-2024"),
            Err(DateParseError::InvalidDate("31-02-2024".to_owned()))
        );
        assert_eq!(
            parse_date("2024-13-01"),
            Err(DateParseError::InvalidDate("2024-13-01".to_owned()))
        );
    }

    #[test]
    fn single_digit_day_is_read_as_year_first() {
        // "5-03-2024" has a one character first part, so 2024 is taken as the day.
        assert!(parse_date("5-03-2024").is_err());
    }

    #[test]
    fn formats_for_display_and_input() {
        assert_eq!(format_display_date(date!(2024 - 02 - 05)), "05-02-2024");
        assert_eq!(format_input_date(date!(2024 - 02 - 05)), "2024-02-05");
    }
}
