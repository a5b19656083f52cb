//! # Demo Subcommand
//!
//! Runs one accepted and one rejected payload through each top-level
//! catalog schema and prints the record or the error messages.

use std::io::Write;

use anyhow::{anyhow, bail};
use serde_json::{json, Value};

use crate::catalog::Catalog;

/// One demonstration: a payload that must pass and one that must fail.
#[derive(Debug, Clone)]
pub struct DemoCase {
    pub schema: &'static str,
    pub title: &'static str,
    pub valid: Value,
    pub invalid: Value,
}

fn crew(id: &str, name: &str, rank: &str, age: &str, specialization: &str, years: &str) -> Value {
    // Ages and experience arrive as strings and are coerced.
    json!({
        "member_id": id,
        "name": name,
        "rank": rank,
        "age": age,
        "specialization": specialization,
        "years_experience": years,
        "is_active": true,
    })
}

pub fn cases() -> Vec<DemoCase> {
    let sarah = crew("CM_001", "Sarah Connor", "commander", "40", "Mission Command", "15");
    let john = crew("CM_002", "John Smith", "lieutenant", "39", "Navigation", "2");
    let alice = crew("CM_003", "Alice Johnson", "officer", "67", "Engineering", "34");
    let mission = |crew: Vec<Value>| {
        json!({
            "mission_id": "M2024_MARS",
            "mission_name": "Mars Colony Establishment",
            "destination": "Mars",
            "launch_date": "2024-03-16T10:00:00",
            "duration_days": 900,
            "budget_millions": 2500.0,
            "crew": crew,
        })
    };

    vec![
        DemoCase {
            schema: "space_station",
            title: "Space Station Data Validation",
            valid: json!({
                "station_id": "ISS001",
                "name": "International Space Station",
                "crew_size": 6,
                "power_level": 85.5,
                "oxygen_level": 92.3,
                "last_maintenance": "2024-01-15T08:30:00",
            }),
            invalid: json!({
                "station_id": "ISS002",
                "name": "Broken Station",
                "crew_size": 99,
                "power_level": 50.0,
                "oxygen_level": 80.0,
                "last_maintenance": "2024-01-15T08:30:00",
            }),
        },
        DemoCase {
            schema: "alien_contact",
            title: "Alien Contact Log Validation",
            valid: json!({
                "contact_id": "AC_2024_001",
                "timestamp": "2024-03-15T22:45:00",
                "location": "Area 51, Nevada",
                "contact_type": "radio",
                "signal_strength": 8.5,
                "duration_minutes": 45,
                "witness_count": 5,
                "message_received": "Greetings from Zeta Reticuli",
            }),
            invalid: json!({
                "contact_id": "AC_2024_002",
                "timestamp": "2024-03-16T10:00:00",
                "location": "Roswell, New Mexico",
                "contact_type": "telepathic",
                "signal_strength": 5.0,
                "duration_minutes": 30,
                "witness_count": 1,
            }),
        },
        DemoCase {
            schema: "space_mission",
            title: "Space Mission Crew Validation",
            valid: mission(vec![sarah, john.clone(), alice.clone()]),
            invalid: mission(vec![john, alice]),
        },
    ]
}

/// Run every demo case, writing a report per case to `out`.
///
/// Fails if a case does not behave as labelled.
pub fn run_demo(catalog: &Catalog, out: &mut impl Write) -> anyhow::Result<()> {
    let rule = "=".repeat(40);
    for case in cases() {
        let schema = catalog
            .get(case.schema)
            .ok_or_else(|| anyhow!("demo schema '{}' missing from catalog", case.schema))?;

        writeln!(out, "{}", case.title)?;
        writeln!(out, "{rule}")?;

        let record = match schema.validate(&case.valid) {
            Ok(record) => record,
            Err(errors) => bail!("demo payload for {} was rejected: {errors}", case.schema),
        };
        writeln!(out, "Valid {} created:", case.schema)?;
        for (name, value) in record.iter() {
            writeln!(out, "  {name}: {value}")?;
        }
        writeln!(out)?;

        let Err(errors) = schema.validate(&case.invalid) else {
            bail!("invalid demo payload for {} was accepted", case.schema);
        };
        writeln!(out, "Expected validation error:")?;
        for error in &errors {
            writeln!(out, "  {}", error.message())?;
        }
        writeln!(out)?;
    }
    Ok(())
}
