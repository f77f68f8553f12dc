//! Sample data for exercising stores and merges.

use planner_primitives::period::{
    AllocationType, Assignment, Bucket, CommitmentType, DisplayOptions, Objective, ObjectiveGroup,
    ObjectiveTag, Period, Person, SecondaryUnit,
};
use planner_primitives::version::VersionId;

fn objective(name: &str, estimate: f64, commitment: CommitmentType) -> Objective {
    Objective {
        name: name.to_owned(),
        resource_estimate: estimate,
        commitment_type: Some(commitment),
        ..Objective::default()
    }
}

fn assignment(person_id: &str, commitment: f64) -> Assignment {
    Assignment {
        person_id: person_id.to_owned(),
        commitment,
    }
}

fn project(name: &str) -> ObjectiveGroup {
    ObjectiveGroup {
        group_type: "Project".to_owned(),
        group_name: name.to_owned(),
    }
}

fn person(id: &str, display_name: &str, location: &str, availability: f64) -> Person {
    Person {
        id: id.to_owned(),
        display_name: display_name.to_owned(),
        location: location.to_owned(),
        availability,
    }
}

/// A root revision of a realistic period, with a fresh random version.
#[must_use]
pub fn sample_period(id: &str) -> Period {
    let first = Bucket {
        display_name: "First bucket".to_owned(),
        allocation_percentage: 40.0,
        objectives: vec![
            Objective {
                assignments: vec![assignment("alice", 5.0), assignment("bob", 5.0)],
                groups: vec![project("Project 1")],
                ..objective("First objective", 10.0, CommitmentType::Committed)
            },
            Objective {
                notes: "Some notes".to_owned(),
                assignments: vec![assignment("bob", 2.0)],
                groups: vec![project("Project 2")],
                tags: vec![
                    ObjectiveTag {
                        name: "tag1".to_owned(),
                    },
                    ObjectiveTag {
                        name: "tag2".to_owned(),
                    },
                ],
                ..objective("Second objective", 15.0, CommitmentType::Aspirational)
            },
            Objective {
                block_id: "block1".to_owned(),
                ..objective("Block objective 1", 1.0, CommitmentType::Aspirational)
            },
            Objective {
                block_id: "block1".to_owned(),
                ..objective("Block objective 2", 2.0, CommitmentType::Aspirational)
            },
        ],
        ..Bucket::default()
    };

    let second = Bucket {
        display_name: "Second bucket".to_owned(),
        allocation_percentage: 40.0,
        objectives: vec![Objective {
            notes: "**Markdown** notes".to_owned(),
            display_options: DisplayOptions {
                enable_markdown: true,
            },
            assignments: vec![assignment("charlie", 4.0), assignment("dave", 3.0)],
            ..objective("Third objective", 8.0, CommitmentType::Committed)
        }],
        ..Bucket::default()
    };

    let third = Bucket {
        display_name: "Fixed bucket".to_owned(),
        allocation_type: AllocationType::Absolute,
        allocation_absolute: 6.0,
        objectives: vec![Objective {
            assignments: vec![assignment("alice", 1.0)],
            ..objective("Keep the lights on", 6.0, CommitmentType::Committed)
        }],
        ..Bucket::default()
    };

    Period {
        id: id.to_owned(),
        display_name: id.to_owned(),
        unit: "person weeks".to_owned(),
        unit_abbrev: "pw".to_owned(),
        notes_url: "https://example.com/notes".to_owned(),
        max_committed_percentage: 50.0,
        buckets: vec![first, second, third],
        people: vec![
            person("alice", "Alice Atkins", "LON", 6.0),
            person("bob", "Bob Brown", "NYC", 7.0),
            person("charlie", "Charlie Chaplin", "SFO", 5.0),
            person("dave", "Dave Davies", "LON", 3.0),
        ],
        secondary_units: vec![SecondaryUnit {
            name: "person years".to_owned(),
            conversion_factor: 7.0 / 365.0,
        }],
        version: VersionId::new_random(),
        parent_versions: Vec::new(),
    }
}
