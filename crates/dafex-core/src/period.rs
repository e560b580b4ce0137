//! Period field helpers.
//!
//! Date widgets produce ISO values (`YYYY-MM-DD` and `YYYY-MM`); the extract
//! service takes calendar dates in dotted Brazilian form (`DD.MM.YYYY`) and
//! months unchanged.

use chrono::{Local, NaiveDate};

use crate::CoreError;

/// Reformats an ISO calendar date (`2026-01-05`) as `05.01.2026`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDate`] when `iso` is not a valid
/// `YYYY-MM-DD` date.
pub fn iso_to_dotted_date(iso: &str) -> Result<String, CoreError> {
    let date = NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidDate(iso.to_owned()))?;
    Ok(date.format("%d.%m.%Y").to_string())
}

/// Validates a `YYYY-MM` month value. The value itself is passed through to
/// the service unchanged.
///
/// # Errors
///
/// Returns [`CoreError::InvalidMonth`] when `month` is not a valid month.
pub fn validate_month(month: &str) -> Result<(), CoreError> {
    let month = month.trim();
    if month.len() != 7 {
        return Err(CoreError::InvalidMonth(month.to_owned()));
    }
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidMonth(month.to_owned()))?;
    Ok(())
}

/// Human period description shown in results and history: `"{a} até {b}"`.
#[must_use]
pub fn period_label(inicio: &str, fim: &str) -> String {
    format!("{inicio} até {fim}")
}

/// Current local date/time in the long pt-BR form used by history entries.
#[must_use]
pub fn now_display() -> String {
    Local::now().format("%d/%m/%Y %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_is_reformatted_with_dots() {
        assert_eq!(iso_to_dotted_date("2026-01-05").unwrap(), "05.01.2026");
        assert_eq!(iso_to_dotted_date("2024-12-31").unwrap(), "31.12.2024");
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(iso_to_dotted_date("2026-13-01").is_err());
        assert!(iso_to_dotted_date("05.01.2026").is_err());
        assert!(iso_to_dotted_date("").is_err());
    }

    #[test]
    fn valid_months_pass_through() {
        assert!(validate_month("2024-09").is_ok());
        assert!(validate_month("2025-12").is_ok());
    }

    #[test]
    fn malformed_months_are_rejected() {
        assert!(validate_month("2024-13").is_err());
        assert!(validate_month("2024-9").is_err());
        assert!(validate_month("setembro").is_err());
    }

    #[test]
    fn period_label_joins_with_ate() {
        assert_eq!(
            period_label("01.01.2026", "10.01.2026"),
            "01.01.2026 até 10.01.2026"
        );
    }

    #[test]
    fn now_display_has_expected_shape() {
        let now = now_display();
        // DD/MM/YYYY HH:MM:SS
        assert_eq!(now.len(), 19);
        assert_eq!(&now[2..3], "/");
        assert_eq!(&now[5..6], "/");
        assert_eq!(&now[10..11], " ");
    }
}
