//! # Schema Catalog
//!
//! The built-in schemas the CLI validates against: a space station
//! telemetry record, an alien contact report with four cross-field rules,
//! and a space mission whose crew is a collection of nested crew member
//! records.

use std::sync::Arc;

use recval_schema::{FieldSpec, InvariantRule, Schema, SchemaError};

pub const CONTACT_TYPES: [&str; 4] = ["radio", "visual", "physical", "telepathic"];
pub const RANKS: [&str; 5] = ["cadet", "officer", "lieutenant", "captain", "commander"];

/// Every catalog schema, built once and looked up by name.
#[derive(Debug, Clone)]
pub struct Catalog {
    schemas: Vec<Arc<Schema>>,
}

impl Catalog {
    /// Build every catalog schema.
    pub fn load() -> Result<Self, SchemaError> {
        let crew_member = Arc::new(crew_member()?);
        let schemas = vec![
            Arc::new(space_station()?),
            Arc::new(alien_contact()?),
            Arc::clone(&crew_member),
            Arc::new(space_mission(crew_member)?),
        ];
        Ok(Self { schemas })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.iter().find(|s| s.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.schemas.iter().map(|s| s.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.iter()
    }
}

pub fn space_station() -> Result<Schema, SchemaError> {
    Schema::builder("space_station")
        .describe("Space station telemetry snapshot")
        .field(FieldSpec::string("station_id").min_length(3).max_length(10))
        .field(FieldSpec::string("name").min_length(1).max_length(50))
        .field(FieldSpec::integer("crew_size").minimum(1).maximum(20))
        .field(FieldSpec::float("power_level").minimum(0.0).maximum(100.0))
        .field(FieldSpec::float("oxygen_level").minimum(0.0).maximum(100.0))
        .field(FieldSpec::timestamp("last_maintenance"))
        .field(FieldSpec::boolean("is_operational").default(true))
        .field(FieldSpec::string("notes").optional().max_length(200))
        .build()
}

pub fn alien_contact() -> Result<Schema, SchemaError> {
    Schema::builder("alien_contact")
        .describe("Alien contact report")
        .field(FieldSpec::string("contact_id").min_length(5).max_length(15))
        .field(FieldSpec::timestamp("timestamp"))
        .field(FieldSpec::string("location").min_length(3).max_length(100))
        .field(FieldSpec::enumeration("contact_type", CONTACT_TYPES))
        .field(FieldSpec::float("signal_strength").minimum(0.0).maximum(10.0))
        .field(FieldSpec::integer("duration_minutes").minimum(1).maximum(1440))
        .field(FieldSpec::integer("witness_count").minimum(1).maximum(100))
        .field(FieldSpec::string("message_received").optional().max_length(500))
        .field(FieldSpec::boolean("is_verified").default(false))
        .invariant(
            InvariantRule::ensure("contact_id_prefix", "Contact ID must start with 'AC'", |r| {
                r.get_str("contact_id").is_some_and(|id| id.starts_with("AC"))
            })
            .at_field("contact_id"),
        )
        .invariant(InvariantRule::ensure(
            "physical_contact_verified",
            "Physical contact reports must be verified",
            |r| {
                r.get_symbol("contact_type") != Some("physical")
                    || r.get_bool("is_verified") == Some(true)
            },
        ))
        .invariant(InvariantRule::ensure(
            "telepathic_witnesses",
            "Telepathic contact requires at least 3 witnesses",
            |r| {
                r.get_symbol("contact_type") != Some("telepathic")
                    || r.get_i64("witness_count").is_some_and(|n| n >= 3)
            },
        ))
        .invariant(InvariantRule::ensure(
            "strong_signal_message",
            "Strong signals (> 7.0) should include received messages",
            |r| {
                r.get_f64("signal_strength").map_or(true, |s| s <= 7.0)
                    || r.contains("message_received")
            },
        ))
        .build()
}

pub fn crew_member() -> Result<Schema, SchemaError> {
    Schema::builder("crew_member")
        .describe("Mission crew member")
        .field(FieldSpec::string("member_id").min_length(3).max_length(10))
        .field(FieldSpec::string("name").min_length(2).max_length(50))
        .field(FieldSpec::enumeration("rank", RANKS))
        .field(FieldSpec::integer("age").minimum(18).maximum(80))
        .field(FieldSpec::string("specialization").min_length(3).max_length(30))
        .field(FieldSpec::integer("years_experience").minimum(0).maximum(50))
        .field(FieldSpec::boolean("is_active").default(true))
        .build()
}

/// Missions longer than this many days need an experienced crew.
pub const LONG_MISSION_DAYS: i64 = 365;
/// Years of experience that count a crew member as experienced.
pub const EXPERIENCED_YEARS: i64 = 5;

pub fn space_mission(crew_member: Arc<Schema>) -> Result<Schema, SchemaError> {
    Schema::builder("space_mission")
        .describe("Crewed space mission plan")
        .field(FieldSpec::string("mission_id").min_length(5).max_length(15))
        .field(FieldSpec::string("mission_name").min_length(3).max_length(100))
        .field(FieldSpec::string("destination").min_length(3).max_length(50))
        .field(FieldSpec::timestamp("launch_date"))
        .field(FieldSpec::integer("duration_days").minimum(1).maximum(3650))
        .field(
            FieldSpec::list("crew", FieldSpec::record("crew_member", crew_member))
                .min_items(1)
                .max_items(12),
        )
        .field(FieldSpec::string("mission_status").default("planned"))
        .field(FieldSpec::float("budget_millions").minimum(1.0).maximum(10000.0))
        .invariant(
            InvariantRule::ensure("mission_id_prefix", "mission_id must start with \"M\"", |r| {
                r.get_str("mission_id").is_some_and(|id| id.starts_with('M'))
            })
            .at_field("mission_id"),
        )
        .invariant(
            InvariantRule::ensure(
                "command_present",
                "Must have at least one Commander or Captain",
                |r| {
                    r.records("crew")
                        .any(|m| matches!(m.get_symbol("rank"), Some("captain" | "commander")))
                },
            )
            .at_field("crew"),
        )
        .invariant(
            InvariantRule::ensure(
                "long_mission_experience",
                "Long missions need 50% experienced crew",
                has_experienced_crew,
            )
            .at_field("crew"),
        )
        .invariant(
            InvariantRule::ensure("crew_active", "All crew members must be active.", |r| {
                r.records("crew").all(|m| m.get_bool("is_active") == Some(true))
            })
            .at_field("crew"),
        )
        .build()
}

fn has_experienced_crew(mission: &recval_core::ValidatedRecord) -> bool {
    if mission.get_i64("duration_days").map_or(true, |d| d <= LONG_MISSION_DAYS) {
        return true;
    }
    let total = mission.records("crew").count();
    let experienced = mission
        .records("crew")
        .filter(|m| m.get_i64("years_experience").is_some_and(|y| y >= EXPERIENCED_YEARS))
        .count();
    experienced * 2 >= total
}

#[cfg(test)]
mod tests {
    use super::*;
    use recval_core::ErrorKind;
    use serde_json::{json, Value};

    fn crew(id: &str, rank: &str, years: i64, active: bool) -> Value {
        json!({
            "member_id": id,
            "name": "Crew Member",
            "rank": rank,
            "age": 40,
            "specialization": "Navigation",
            "years_experience": years,
            "is_active": active,
        })
    }

    fn mission(duration: i64, members: Vec<Value>) -> Value {
        json!({
            "mission_id": "M2024_MARS",
            "mission_name": "Mars Colony Establishment",
            "destination": "Mars",
            "launch_date": "2024-03-16T10:00:00",
            "duration_days": duration,
            "budget_millions": 2500.0,
            "crew": members,
        })
    }

    fn rules_broken(schema: &Schema, payload: &Value) -> Vec<String> {
        match schema.validate(payload) {
            Ok(_) => Vec::new(),
            Err(errors) => errors.iter().filter_map(|e| e.rule().map(String::from)).collect(),
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::load().unwrap();
        assert_eq!(
            catalog.names(),
            vec!["space_station", "alien_contact", "crew_member", "space_mission"]
        );
        assert!(catalog.get("space_mission").is_some());
        assert!(catalog.get("starship").is_none());
    }

    #[test]
    fn test_station_defaults() {
        let record = space_station()
            .unwrap()
            .validate(&json!({
                "station_id": "ISS001",
                "name": "International Space Station",
                "crew_size": 6,
                "power_level": 85.5,
                "oxygen_level": 92.3,
                "last_maintenance": "2024-01-15T08:30:00",
            }))
            .unwrap();
        assert_eq!(record.get_bool("is_operational"), Some(true));
        assert!(!record.contains("notes"));
    }

    #[test]
    fn test_contact_rules() {
        let schema = alien_contact().unwrap();
        let base = json!({
            "contact_id": "AC_2024_002",
            "timestamp": "2024-03-16T10:00:00",
            "location": "Roswell, New Mexico",
            "contact_type": "telepathic",
            "signal_strength": 5.0,
            "duration_minutes": 30,
            "witness_count": 1,
        });
        assert_eq!(rules_broken(&schema, &base), vec!["telepathic_witnesses"]);

        let mut physical = base.clone();
        physical["contact_type"] = json!("physical");
        physical["signal_strength"] = json!(8.5);
        physical["contact_id"] = json!("XX_2024_002");
        assert_eq!(
            rules_broken(&schema, &physical),
            vec!["contact_id_prefix", "physical_contact_verified", "strong_signal_message"]
        );
    }

    #[test]
    fn test_mission_rules() {
        let schema = space_mission(Arc::new(crew_member().unwrap())).unwrap();

        let ok = mission(
            900,
            vec![
                crew("CM_001", "commander", 15, true),
                crew("CM_002", "lieutenant", 2, true),
                crew("CM_003", "officer", 34, true),
            ],
        );
        let record = schema.validate(&ok).unwrap();
        assert_eq!(record.get_str("mission_status"), Some("planned"));

        let inexperienced = mission(
            900,
            vec![
                crew("CM_001", "captain", 1, true),
                crew("CM_002", "officer", 9, true),
                crew("CM_003", "cadet", 0, true),
            ],
        );
        assert_eq!(rules_broken(&schema, &inexperienced), vec!["long_mission_experience"]);
        // Short missions skip the experience rule.
        let mut short = inexperienced.clone();
        short["duration_days"] = json!(30);
        assert!(schema.validate(&short).is_ok());

        let inactive = mission(30, vec![crew("CM_001", "captain", 10, false)]);
        assert_eq!(rules_broken(&schema, &inactive), vec!["crew_active"]);
    }

    #[test]
    fn test_mission_empty_crew_is_field_error() {
        let schema = space_mission(Arc::new(crew_member().unwrap())).unwrap();
        let errors = schema.validate(&mission(30, Vec::new())).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].kind(), ErrorKind::Constraint);
        assert_eq!(errors.errors()[0].path().to_string(), "crew");
    }
}
