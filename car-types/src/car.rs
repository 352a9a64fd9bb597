//! Car records and the dataset that holds them.
//!
//! Records coming back from the store are decoded leniently: missing text
//! becomes empty text, missing quantities become `None`, and quantities the
//! store kept as strings are preserved verbatim. Outbound fields are always
//! normalized (see [`CarFields`]).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::CarId;

/// Largest integer an f64 represents exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A numeric quantity (year, horsepower, price) as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// A JSON number.
    Number(serde_json::Number),
    /// A number the store kept as a string.
    Text(String),
}

impl Quantity {
    /// Numeric value, if there is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        if value.fract() == 0.0 && value >= 0.0 && value < MAX_EXACT_INTEGER {
            return Self::Number((value as u64).into());
        }
        match serde_json::Number::from_f64(value) {
            Some(n) => Self::Number(n),
            None => Self::Text(value.to_string()),
        }
    }
}

impl fmt::Display for Quantity {
    /// Integers render without a fractional part, even when the store
    /// encoded them as floats (`101200.0` → `101200`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.is_f64() => match n.as_f64() {
                Some(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INTEGER => {
                    write!(f, "{}", v as i64)
                }
                _ => write!(f, "{n}"),
            },
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A car record owned by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// Store-assigned identifier.
    pub id: CarId,
    /// Manufacturer.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub make: String,
    /// Model name.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub model: String,
    /// Model year.
    #[serde(default)]
    pub year: Option<Quantity>,
    /// Engine output.
    #[serde(default)]
    pub horsepower: Option<Quantity>,
    /// Price in whole currency units.
    #[serde(default)]
    pub price: Option<Quantity>,
}

impl Car {
    /// Build the full record for `id` from normalized fields.
    pub fn from_fields(id: CarId, fields: &CarFields) -> Self {
        Self {
            id,
            make: fields.make.clone(),
            model: fields.model.clone(),
            year: Some(Quantity::from(fields.year)),
            horsepower: Some(Quantity::from(fields.horsepower)),
            price: Some(Quantity::from(fields.price)),
        }
    }

    /// Price as a number, 0 when missing or non-numeric.
    pub fn price_value(&self) -> f64 {
        quantity_value(self.price.as_ref())
    }

    /// Horsepower as a number, 0 when missing or non-numeric.
    pub fn horsepower_value(&self) -> f64 {
        quantity_value(self.horsepower.as_ref())
    }

    /// "Make Model" display title.
    pub fn title(&self) -> String {
        format!("{} {}", self.make, self.model).trim().to_string()
    }
}

fn quantity_value(q: Option<&Quantity>) -> f64 {
    q.and_then(Quantity::as_f64).unwrap_or(0.0)
}

/// Accept any scalar for a text field; `null` and absent become empty.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Validated, normalized fields for a create or full update.
///
/// Produced by [`crate::CarDraft::normalize`]; never constructed from raw
/// user input directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarFields {
    /// Trimmed, non-empty make.
    pub make: String,
    /// Trimmed, non-empty model.
    pub model: String,
    /// Positive model year.
    pub year: u64,
    /// Horsepower, may be zero.
    pub horsepower: u64,
    /// Positive price.
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
}

fn serialize_price<S>(price: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Quantity::from(*price).serialize(serializer)
}

/// An ordered, immutable sequence of cars as returned by one fetch.
///
/// Cloning is cheap (shared). Two datasets compare equal by value;
/// [`Dataset::ptr_eq`] tells whether they are the same fetch result.
#[derive(Clone)]
pub struct Dataset(Arc<[Car]>);

impl Dataset {
    /// Create a dataset from owned cars.
    pub fn new(cars: Vec<Car>) -> Self {
        Self(Arc::from(cars))
    }

    /// The empty dataset.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Borrow the cars as a slice.
    pub fn as_slice(&self) -> &[Car] {
        &self.0
    }

    /// True when both handles share the same allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Dataset {
    type Target = [Car];

    fn deref(&self) -> &[Car] {
        &self.0
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl From<Vec<Car>> for Dataset {
    fn from(cars: Vec<Car>) -> Self {
        Self::new(cars)
    }
}

impl FromIterator<Car> for Dataset {
    fn from_iter<I: IntoIterator<Item = Car>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Car;
    type IntoIter = std::slice::Iter<'a, Car>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_complete_record() {
        let car: Car = serde_json::from_value(json!({
            "id": 1, "make": "Porsche", "model": "911",
            "year": 2022, "horsepower": 379, "price": 101200
        }))
        .unwrap();

        assert_eq!(car.id, CarId::Number(1));
        assert_eq!(car.make, "Porsche");
        assert_eq!(car.year.as_ref().unwrap().to_string(), "2022");
        assert_eq!(car.price_value(), 101200.0);
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let car: Car = serde_json::from_value(json!({ "id": "x", "make": null })).unwrap();

        assert_eq!(car.make, "");
        assert_eq!(car.model, "");
        assert!(car.year.is_none());
        assert!(car.horsepower.is_none());
        assert_eq!(car.price_value(), 0.0);
    }

    #[test]
    fn string_quantities_are_kept_verbatim() {
        let car: Car =
            serde_json::from_value(json!({ "id": 2, "year": "1999", "price": "n/a" })).unwrap();

        assert_eq!(car.year.as_ref().unwrap().to_string(), "1999");
        assert_eq!(car.year.unwrap().as_f64(), Some(1999.0));
        assert_eq!(car.price.unwrap().as_f64(), None);
    }

    #[test]
    fn whole_floats_display_as_integers() {
        let q: Quantity = serde_json::from_str("101200.0").unwrap();
        assert_eq!(q.to_string(), "101200");

        let q: Quantity = serde_json::from_str("99.5").unwrap();
        assert_eq!(q.to_string(), "99.5");
    }

    #[test]
    fn fields_serialize_whole_price_as_integer() {
        let fields = CarFields {
            make: "Audi".into(),
            model: "R8".into(),
            year: 2020,
            horsepower: 0,
            price: 150000.0,
        };
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            value,
            json!({"make": "Audi", "model": "R8", "year": 2020, "horsepower": 0, "price": 150000})
        );

        let fractional = CarFields { price: 19.99, ..fields };
        assert_eq!(serde_json::to_value(&fractional).unwrap()["price"], json!(19.99));
    }

    #[test]
    fn record_from_fields_carries_id() {
        let fields = CarFields {
            make: "BMW".into(),
            model: "M3".into(),
            year: 2021,
            horsepower: 473,
            price: 70000.0,
        };
        let value = serde_json::to_value(Car::from_fields(CarId::Number(5), &fields)).unwrap();
        assert_eq!(value["id"], json!(5));
        assert_eq!(value["horsepower"], json!(473));
    }

    #[test]
    fn dataset_equality_is_by_value_identity_is_by_pointer() {
        let car: Car = serde_json::from_value(json!({ "id": 1, "make": "Kia" })).unwrap();
        let a = Dataset::new(vec![car.clone()]);
        let b = Dataset::new(vec![car]);
        let c = a.clone();

        assert_eq!(a, b);
        assert!(!Dataset::ptr_eq(&a, &b));
        assert!(Dataset::ptr_eq(&a, &c));
        assert_eq!(a.len(), 1);
        assert!(Dataset::default().is_empty());
    }

    #[test]
    fn title_joins_make_and_model() {
        let car: Car = serde_json::from_value(json!({ "id": 1, "make": "Ford" })).unwrap();
        assert_eq!(car.title(), "Ford");
    }
}
