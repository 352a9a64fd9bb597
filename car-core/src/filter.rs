//! Local incremental search over a [`Dataset`].
//!
//! Matching is a case-insensitive substring test across make, model, year,
//! horsepower and price. The function is pure: the same dataset and query
//! always produce the same result, regardless of what ran before.

use carsync_types::{Car, Dataset, Quantity};

/// Filter `dataset` down to the cars matching `query`, keeping order.
///
/// A query that is empty after trimming returns `dataset` itself (the same
/// shared allocation, see [`Dataset::ptr_eq`]).
pub fn filter(dataset: &Dataset, query: &str) -> Dataset {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return dataset.clone();
    }

    dataset
        .iter()
        .filter(|car| matches(car, &needle))
        .cloned()
        .collect()
}

/// Whether `car` matches an already lower-cased, trimmed needle.
pub fn matches(car: &Car, needle: &str) -> bool {
    car.make.to_lowercase().contains(needle)
        || car.model.to_lowercase().contains(needle)
        || quantity_text(&car.year).contains(needle)
        || quantity_text(&car.horsepower).contains(needle)
        || quantity_text(&car.price).contains(needle)
}

/// Text a quantity matches as. A numeric zero counts as empty, like an
/// absent field.
fn quantity_text(q: &Option<Quantity>) -> String {
    match q {
        Some(Quantity::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(q) => q.to_string(),
        None => String::new(),
    }
}
