//! Collection statistics for the summary screen.
//!
//! Missing or non-numeric quantities count as 0. Extremes pick the first
//! car in dataset order that attains them.

use carsync_types::Car;

/// Aggregates over a whole dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionStats {
    /// Number of cars.
    pub count: usize,
    /// Sum of all prices.
    pub total_value: f64,
    /// Mean price (0 when empty).
    pub average_price: f64,
    /// Highest horsepower (0 when empty).
    pub max_horsepower: f64,
    /// Lowest price (0 when empty).
    pub min_price: f64,
    /// Highest price (0 when empty).
    pub max_price: f64,
    /// Car with the highest horsepower.
    pub most_powerful: Option<Car>,
    /// Car with the highest price.
    pub most_expensive: Option<Car>,
    /// Car with the lowest price.
    pub best_value: Option<Car>,
}

impl CollectionStats {
    /// Compute statistics over `cars`.
    pub fn from_cars(cars: &[Car]) -> Self {
        if cars.is_empty() {
            return Self::default();
        }

        let total_value: f64 = cars.iter().map(Car::price_value).sum();
        let most_powerful = first_extreme(cars, Car::horsepower_value, |a, b| a > b);
        let most_expensive = first_extreme(cars, Car::price_value, |a, b| a > b);
        let best_value = first_extreme(cars, Car::price_value, |a, b| a < b);

        Self {
            count: cars.len(),
            total_value,
            average_price: total_value / cars.len() as f64,
            max_horsepower: most_powerful.horsepower_value(),
            min_price: best_value.price_value(),
            max_price: most_expensive.price_value(),
            most_powerful: Some(most_powerful.clone()),
            most_expensive: Some(most_expensive.clone()),
            best_value: Some(best_value.clone()),
        }
    }
}

/// First car whose key strictly beats every earlier one under `better`.
fn first_extreme<'a>(
    cars: &'a [Car],
    key: impl Fn(&Car) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> &'a Car {
    let mut best = &cars[0];
    let mut best_key = key(best);
    for car in &cars[1..] {
        let k = key(car);
        if better(k, best_key) {
            best = car;
            best_key = k;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cars(values: serde_json::Value) -> Vec<Car> {
        serde_json::from_value(values).unwrap()
    }

    #[test]
    fn empty_collection() {
        let stats = CollectionStats::from_cars(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average_price, 0.0);
        assert_eq!(stats.min_price, 0.0);
        assert!(stats.most_powerful.is_none());
        assert!(stats.best_value.is_none());
    }

    #[test]
    fn aggregates() {
        let data = cars(json!([
            {"id": 1, "make": "Porsche", "model": "911", "horsepower": 379, "price": 101200},
            {"id": 2, "make": "Ferrari", "model": "F8", "horsepower": 710, "price": 276550},
            {"id": 3, "make": "Mazda", "model": "MX-5", "horsepower": 181, "price": 28000}
        ]));
        let stats = CollectionStats::from_cars(&data);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_value, 405750.0);
        assert_eq!(stats.average_price, 135250.0);
        assert_eq!(stats.max_horsepower, 710.0);
        assert_eq!(stats.min_price, 28000.0);
        assert_eq!(stats.max_price, 276550.0);
        assert_eq!(stats.most_powerful.unwrap().model, "F8");
        assert_eq!(stats.most_expensive.unwrap().make, "Ferrari");
        assert_eq!(stats.best_value.unwrap().make, "Mazda");
    }

    #[test]
    fn ties_pick_first_in_order() {
        let data = cars(json!([
            {"id": 1, "make": "A", "horsepower": 300, "price": 50000},
            {"id": 2, "make": "B", "horsepower": 300, "price": 50000}
        ]));
        let stats = CollectionStats::from_cars(&data);

        assert_eq!(stats.most_powerful.unwrap().make, "A");
        assert_eq!(stats.most_expensive.unwrap().make, "A");
        assert_eq!(stats.best_value.unwrap().make, "A");
    }

    #[test]
    fn missing_quantities_count_as_zero() {
        let data = cars(json!([
            {"id": 1, "make": "NoPrice"},
            {"id": 2, "make": "Priced", "price": "1500", "horsepower": "n/a"}
        ]));
        let stats = CollectionStats::from_cars(&data);

        assert_eq!(stats.total_value, 1500.0);
        assert_eq!(stats.min_price, 0.0);
        assert_eq!(stats.best_value.unwrap().make, "NoPrice");
        assert_eq!(stats.max_horsepower, 0.0);
    }
}
