use serde_json::json;

use crate::period::{
    Assignment, Bucket, CommitmentType, Objective, Period, Person, SecondaryUnit,
};
use crate::version::VersionId;

fn period_with_parents() -> Period {
    let mut period = Period::new("2024q1", VersionId::from("v3"))
        .with_parents(vec![VersionId::from("v2"), VersionId::from("v1")]);
    period.display_name = "2024 Q1".to_owned();
    period.unit = "person weeks".to_owned();
    period.unit_abbrev = "pw".to_owned();
    period.notes_url = "https://example.com/notes".to_owned();
    period.max_committed_percentage = 50.0;
    period.secondary_units = vec![SecondaryUnit {
        name: "person years".to_owned(),
        conversion_factor: 7.0 / 365.0,
    }];
    period.people = vec![Person {
        id: "alice".to_owned(),
        display_name: "Alice".to_owned(),
        location: "LON".to_owned(),
        availability: 5.0,
    }];
    period.buckets = vec![Bucket {
        display_name: "First bucket".to_owned(),
        allocation_percentage: 100.0,
        objectives: vec![Objective {
            name: "Ship it".to_owned(),
            resource_estimate: 4.0,
            commitment_type: Some(CommitmentType::Committed),
            assignments: vec![Assignment {
                person_id: "alice".to_owned(),
                commitment: 3.0,
            }],
            ..Objective::default()
        }],
        ..Bucket::default()
    }];
    period
}

#[test]
fn root_and_primary_parent() {
    let root = Period::new("p", VersionId::from("v1"));
    assert!(root.is_root());
    assert_eq!(root.primary_parent(), None);

    let child = period_with_parents();
    assert!(!child.is_root());
    assert_eq!(child.primary_parent(), Some(&VersionId::from("v2")));
}

#[test]
fn wire_field_names() {
    let value = serde_json::to_value(period_with_parents()).unwrap();

    assert_eq!(value["id"], json!("2024q1"));
    assert_eq!(value["displayName"], json!("2024 Q1"));
    assert_eq!(value["unitAbbrev"], json!("pw"));
    assert_eq!(value["notesURL"], json!("https://example.com/notes"));
    assert_eq!(value["maxCommittedPercentage"], json!(50.0));
    assert_eq!(value["version"], json!("v3"));
    assert_eq!(value["parentVersion"], json!(["v2", "v1"]));
    assert_eq!(value["secondaryUnits"][0]["name"], json!("person years"));

    let objective = &value["buckets"][0]["objectives"][0];
    assert_eq!(objective["commitmentType"], json!("Committed"));
    assert_eq!(objective["assignments"][0]["personId"], json!("alice"));
    assert!(objective.get("blockID").is_none());
    assert_eq!(value["buckets"][0]["allocationType"], json!("percentage"));
}

#[test]
fn missing_fields_default() {
    let period: Period = serde_json::from_value(json!({
        "id": "p1",
        "displayName": "Sparse",
        "version": "v1",
    }))
    .unwrap();

    assert_eq!(period.id, "p1");
    assert!(period.buckets.is_empty());
    assert!(period.people.is_empty());
    assert!(period.is_root());
    assert_eq!(period.max_committed_percentage, 0.0);
}

#[test]
fn json_round_trip_preserves_nested_values() {
    let period = period_with_parents();
    let text = serde_json::to_string(&period).unwrap();
    let back: Period = serde_json::from_str(&text).unwrap();
    assert_eq!(back, period);
}

#[test]
fn resources_allocated_sums_assignments() {
    let objective = Objective {
        assignments: vec![
            Assignment {
                person_id: "a".to_owned(),
                commitment: 1.5,
            },
            Assignment {
                person_id: "b".to_owned(),
                commitment: 2.5,
            },
        ],
        ..Objective::default()
    };
    assert_eq!(objective.resources_allocated(), 4.0);
}
