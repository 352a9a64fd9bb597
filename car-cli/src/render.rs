//! Plain-text rendering of list snapshots and statistics.

use carsync_core::{format_currency, format_price, CollectionStats, ListSnapshot};
use carsync_types::{Car, Quantity};
use std::fmt::Write;

/// One list row: `#1  Porsche 911  2022 | 379 hp | $101,200`.
pub fn row(car: &Car) -> String {
    let mut details = Vec::new();
    if let Some(year) = &car.year {
        details.push(year.to_string());
    }
    if let Some(hp) = car.horsepower.as_ref().filter(|q| !is_zero(q)) {
        details.push(format!("{hp} hp"));
    }
    if car.price.is_some() {
        details.push(format!("${}", format_price(car.price.as_ref())));
    }

    let title = match car.title() {
        t if t.is_empty() => "(untitled)".to_string(),
        t => t,
    };
    if details.is_empty() {
        format!("#{}  {}", car.id, title)
    } else {
        format!("#{}  {}  {}", car.id, title, details.join(" | "))
    }
}

fn is_zero(q: &Quantity) -> bool {
    q.as_f64() == Some(0.0)
}

/// The whole list screen as text.
pub fn snapshot(s: &ListSnapshot) -> String {
    let mut out = String::new();
    if s.loading {
        let _ = writeln!(out, "Loading...");
    }
    if let Some(error) = &s.error {
        let _ = writeln!(out, "! {error}");
    }
    if let Some(found) = s.found_line() {
        let _ = writeln!(out, "{found}");
    }
    for car in s.visible.iter() {
        let _ = writeln!(out, "{}", row(car));
    }
    if !s.loading && s.error.is_none() {
        if let Some(hint) = s.empty_hint() {
            let _ = writeln!(out, "{hint}");
        }
    }
    out
}

/// The statistics screen as text.
pub fn stats(stats: &CollectionStats) -> String {
    if stats.count == 0 {
        return "No cars yet. Add your first car to get started\n".to_string();
    }

    let money = |v: f64| format!("${}", format_currency(v));
    let mut out = String::new();
    let _ = writeln!(out, "Cars:            {}", stats.count);
    let _ = writeln!(out, "Total value:     {}", money(stats.total_value));
    let _ = writeln!(out, "Average price:   {}", money(stats.average_price));
    let _ = writeln!(out, "Max horsepower:  {}", stats.max_horsepower);
    let _ = writeln!(
        out,
        "Price range:     {} - {}",
        money(stats.min_price),
        money(stats.max_price)
    );
    if let Some(car) = &stats.most_powerful {
        let _ = writeln!(out, "Most powerful:   {} ({} hp)", car.title(), car.horsepower_value());
    }
    if let Some(car) = &stats.most_expensive {
        let _ = writeln!(out, "Most expensive:  {} ({})", car.title(), money(car.price_value()));
    }
    if let Some(car) = &stats.best_value {
        let _ = writeln!(out, "Best value:      {} ({})", car.title(), money(car.price_value()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use carsync_types::{CarFields, CarId, Dataset};

    fn porsche() -> Car {
        Car::from_fields(
            CarId::from(1u64),
            &CarFields {
                make: "Porsche".into(),
                model: "911".into(),
                year: 2022,
                horsepower: 379,
                price: 101200.0,
            },
        )
    }

    #[test]
    fn row_format() {
        assert_eq!(row(&porsche()), "#1  Porsche 911  2022 | 379 hp | $101,200");
    }

    #[test]
    fn row_with_missing_fields() {
        let car = Car {
            id: CarId::from(7u64),
            make: String::new(),
            model: String::new(),
            year: None,
            horsepower: Some(Quantity::from(0u64)),
            price: None,
        };
        assert_eq!(row(&car), "#7  (untitled)");
    }

    #[test]
    fn search_snapshot() {
        let s = ListSnapshot {
            query: "911".into(),
            visible: Dataset::new(vec![porsche()]),
            total: 3,
            settled: true,
            ..ListSnapshot::default()
        };
        assert_eq!(
            snapshot(&s),
            "Found 1 car\n#1  Porsche 911  2022 | 379 hp | $101,200\n"
        );
    }

    #[test]
    fn error_snapshot_has_no_hint() {
        let s = ListSnapshot {
            error: Some("Failed to load cars: HTTP 500".into()),
            ..ListSnapshot::default()
        };
        assert_eq!(snapshot(&s), "! Failed to load cars: HTTP 500\n");
    }

    #[test]
    fn empty_collection_hint() {
        assert_eq!(
            snapshot(&ListSnapshot::default()),
            "Add your first car to get started\n"
        );
    }

    #[test]
    fn stats_text() {
        let text = stats(&CollectionStats::from_cars(&[porsche()]));
        assert!(text.contains("Cars:            1"));
        assert!(text.contains("Total value:     $101,200"));
        assert!(text.contains("Most powerful:   Porsche 911 (379 hp)"));
        assert!(text.contains("Best value:      Porsche 911 ($101,200)"));
    }

    #[test]
    fn empty_stats_text() {
        assert!(stats(&CollectionStats::default()).starts_with("No cars yet"));
    }
}
