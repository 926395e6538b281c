//! Sample records for an empty store.
//!
//! Record `i` takes its case type, location and suspect from the fixed
//! lists below by cyclic index. The timestamp and resolved flag are random.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SeedConfig;
use crate::record::Record;

/// Seeded timestamps fall within this many days before now.
pub const SPAN_DAYS: i64 = 365;

/// Probability that a seeded record is resolved.
pub const RESOLVED_PROBABILITY: f64 = 0.4;

const CASE_TYPES: &[&str] = &[
    "Armed Robbery",
    "Burglary",
    "Assault",
    "Fraud",
    "Drug Trafficking",
    "Vandalism",
    "Theft",
    "Embezzlement",
    "Forgery",
    "Money Laundering",
    "Cyber Crime",
    "Identity Theft",
    "Credit Card Fraud",
    "Insurance Fraud",
    "Tax Evasion",
    "Bribery",
    "Extortion",
    "Kidnapping",
    "Arson",
    "Homicide",
    "Car Theft",
    "Shoplifting",
    "Pickpocketing",
    "Counterfeiting",
    "Smuggling",
    "Racketeering",
    "Perjury",
    "Obstruction of Justice",
    "Escape",
    "Contempt",
];

const LOCATIONS: &[&str] = &[
    "Downtown",
    "Suburbs",
    "Shopping Mall",
    "Bank",
    "Gas Station",
    "Convenience Store",
    "Office Building",
    "Residential Area",
    "Park",
    "Highway",
    "Airport",
    "Train Station",
    "Hotel",
    "Restaurant",
    "Bar",
    "University",
    "Hospital",
    "Church",
    "Library",
    "Museum",
    "Theater",
    "Stadium",
    "Warehouse",
    "Factory",
    "Construction Site",
    "Beach",
];

const SUSPECTS: &[&str] = &[
    "John Doe",
    "Jane Smith",
    "Mike Johnson",
    "Sarah Wilson",
    "David Brown",
    "Lisa Davis",
    "Tom Miller",
    "Amy Garcia",
    "Chris Rodriguez",
    "Emma Martinez",
    "Alex Thompson",
    "Jordan Lee",
    "Casey White",
    "Taylor Anderson",
    "Riley Taylor",
    "Morgan Jackson",
    "Quinn Martin",
    "Parker Lee",
    "Blake Hall",
    "Avery Young",
];

/// Generate `config.count` sample records relative to `now`.
///
/// With `config.rng_seed` unset the output differs on every call.
#[must_use]
pub fn sample_records(config: &SeedConfig, now: DateTime<Utc>) -> Vec<Record> {
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let span_ms = Duration::days(SPAN_DAYS).num_milliseconds();

    (0..config.count)
        .map(|i| {
            let mut record = Record::new();
            record.set_title(format!(
                "{} - {}",
                CASE_TYPES[i % CASE_TYPES.len()],
                LOCATIONS[i % LOCATIONS.len()]
            ));
            record.set_suspect(SUSPECTS[i % SUSPECTS.len()]);
            record.set_occurred_at(now - Duration::milliseconds(rng.random_range(0..span_ms)));
            record.set_resolved(rng.random_bool(RESOLVED_PROBABILITY));
            record
        })
        .collect()
}
