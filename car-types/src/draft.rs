//! Raw form input and its normalization into [`CarFields`].

use crate::{Car, CarFields, ValidationError};

/// The text a user typed into the car form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarDraft {
    /// Make input.
    pub make: String,
    /// Model input.
    pub model: String,
    /// Year input (digits are kept, everything else dropped).
    pub year: String,
    /// Horsepower input (digits are kept, everything else dropped).
    pub horsepower: String,
    /// Price input (digits and `.` are kept).
    pub price: String,
}

impl CarDraft {
    /// Prefill a draft from an existing record (edit mode).
    ///
    /// Absent or zero quantities start as empty inputs.
    pub fn from_car(car: &Car) -> Self {
        let text = |q: &Option<crate::Quantity>| match q {
            Some(q) if q.as_f64() != Some(0.0) => q.to_string(),
            _ => String::new(),
        };
        Self {
            make: car.make.clone(),
            model: car.model.clone(),
            year: text(&car.year),
            horsepower: text(&car.horsepower),
            price: text(&car.price),
        }
    }

    /// Validate and normalize into writeable fields.
    ///
    /// Checks run in form order: make/model, year, price, horsepower.
    pub fn normalize(&self) -> Result<CarFields, ValidationError> {
        let make = self.make.trim();
        let model = self.model.trim();
        if make.is_empty() || model.is_empty() {
            return Err(ValidationError::MissingMakeOrModel);
        }

        let year = parse_whole(&self.year)
            .filter(|&y| y > 0)
            .ok_or(ValidationError::InvalidYear)?;

        let price = parse_decimal(&self.price)
            .filter(|&p| p > 0.0)
            .ok_or(ValidationError::InvalidPrice)?;

        let horsepower = parse_whole(&self.horsepower).ok_or(ValidationError::InvalidHorsepower)?;

        Ok(CarFields {
            make: make.to_string(),
            model: model.to_string(),
            year,
            horsepower,
            price,
        })
    }
}

/// Keep only ASCII digits; empty input is 0. `None` on overflow.
fn parse_whole(input: &str) -> Option<u64> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse().ok()
}

/// Keep ASCII digits and `.`; empty input is 0. `None` when the result is
/// not a number (e.g. `1.2.3`).
fn parse_decimal(input: &str) -> Option<f64> {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if kept.is_empty() {
        return Some(0.0);
    }
    kept.parse::<f64>().ok().filter(|v| v.is_finite())
}
