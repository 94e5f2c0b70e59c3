//! FoodBridge Engine - Demo Entry Point
//!
//! Seeds a small in-memory pool, executes one matching run, and prints the
//! resulting allocations. The real deployment embeds the library behind the
//! platform's web layer.

use chrono::Utc;
use rust_decimal::Decimal;

use foodbridge_engine::{Donation, GeoPoint, Item, MatchRunner, MemoryStore, Request};

fn main() {
    println!("===========================================");
    println!("  FoodBridge - Matching Engine Demo");
    println!("===========================================");
    println!();

    let store = MemoryStore::new();

    let bakery = GeoPoint::new(52.5200, 13.4050);
    let depot = GeoPoint::new(52.5065, 13.3320);
    let shelter = GeoPoint::new(52.5290, 13.4010);

    let seed = [
        store.put_donation(
            Donation::new(
                "don-bakery-row",
                vec![
                    Item::new("bread", Decimal::from(10), "kg").with_category("bakery"),
                    Item::new("rolls", Decimal::from(4), "kg").with_category("bakery"),
                ],
            )
            .with_donor("Bakery Row")
            .with_location(bakery),
        ),
        store.put_donation(
            Donation::new(
                "don-wholesale",
                vec![Item::new("rice", Decimal::from(25), "kg")],
            )
            .with_donor("City Wholesale")
            .with_location(depot),
        ),
        store.put_request(
            Request::new(
                "req-shelter",
                vec![
                    Item::new("bread", Decimal::from(6), "kg"),
                    Item::new("rice", Decimal::from(8), "kg"),
                ],
            )
            .with_ngo("Northside Shelter")
            .with_location(shelter)
            .with_priority(5),
        ),
    ];
    if let Some(err) = seed.into_iter().find_map(Result::err) {
        eprintln!("seeding failed: {err}");
        std::process::exit(1);
    }

    let runner = MatchRunner::new();
    match runner.run(&store, Utc::now()) {
        Ok(result) => {
            println!("Run {} produced {} allocation(s):", result.run_id, result.summary.allocations);
            for a in &result.allocations {
                println!(
                    "  {} -> {}  {:>7} {} of {:<10} ({:.1} km, score {:.3})",
                    a.donation_id, a.request_id, a.quantity, a.unit, a.item_label, a.distance_km, a.score
                );
            }
            println!();
            println!("Totals by item:");
            for (label, total) in &result.totals_by_item {
                println!("  {label:<12} {total} kg");
            }
            if !result.diagnostics.is_empty() {
                println!();
                println!("Diagnostics: {:?}", result.diagnostics);
            }
        }
        Err(err) => {
            eprintln!("matching run failed: {err}");
            std::process::exit(1);
        }
    }
}
