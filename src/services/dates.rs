use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::BookingDate;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateError {
    #[error("❌ A data informada não está no formato correto. Por favor, use o formato \"Mês Dia\" (ex: Janeiro 15).")]
    InvalidFormat,
    #[error("❌ Mês inválido. Por favor, informe o mês por extenso (ex: Janeiro).")]
    InvalidMonth,
    #[error("❌ Escolha uma data válida de segunda a sexta-feira, no futuro.")]
    InvalidDate,
}

/// Parses a "<month-name> <day>" expression against the configured month
/// list and resolves it within the current year. Accepted dates are always
/// strictly future weekdays; a month/day already behind us this year is
/// rejected rather than rolled into the next year.
///
/// The returned key is the trimmed literal input. Stored bookings are
/// grouped under this exact string, casing included.
pub fn validate(
    input: &str,
    months: &[String],
    today: NaiveDate,
) -> Result<BookingDate, DateError> {
    let text = input.trim();

    let (month_token, day_token) = text.split_once(' ').ok_or(DateError::InvalidFormat)?;
    if month_token.is_empty() || !month_token.chars().all(char::is_alphabetic) {
        return Err(DateError::InvalidFormat);
    }
    if day_token.is_empty()
        || day_token.len() > 2
        || !day_token.chars().all(|c| c.is_ascii_digit())
    {
        return Err(DateError::InvalidFormat);
    }

    let needle = month_token.to_lowercase();
    let month_index = months
        .iter()
        .position(|m| m.to_lowercase() == needle)
        .ok_or(DateError::InvalidMonth)?;

    let day_number: u32 = day_token.parse().map_err(|_| DateError::InvalidFormat)?;

    let day = NaiveDate::from_ymd_opt(today.year(), month_index as u32 + 1, day_number)
        .ok_or(DateError::InvalidDate)?;

    if day <= today {
        return Err(DateError::InvalidDate);
    }
    if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        return Err(DateError::InvalidDate);
    }

    Ok(BookingDate {
        key: text.to_string(),
        day,
    })
}
