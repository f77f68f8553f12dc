use std::collections::HashSet;

use claims::{assert_err, assert_ok};

use crate::version::VersionId;

#[test]
fn random_ids_are_unique() {
    let ids: HashSet<VersionId> = (0..64).map(|_| VersionId::new_random()).collect();
    assert_eq!(ids.len(), 64);
}

#[test]
fn random_ids_parse_as_uuid_strings() {
    let id = VersionId::new_random();
    assert_eq!(id.as_str().len(), 36);
    assert!(!id.is_empty());
}

#[test]
fn parse_rejects_empty() {
    let _ignored = assert_err!("".parse::<VersionId>());
    let id = assert_ok!("v1".parse::<VersionId>());
    assert_eq!(id.as_str(), "v1");
}

#[test]
fn display_and_conversions() {
    let id = VersionId::from("abc");
    assert_eq!(id.to_string(), "abc");
    assert_eq!(format!("[{id:>5}]"), "[  abc]");
    assert_eq!(String::from(id), "abc");
    assert!(VersionId::default().is_empty());
}

#[test]
fn serializes_as_plain_string() {
    let id = VersionId::from("v42");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"v42\"");
    let back: VersionId = serde_json::from_str("\"v42\"").unwrap();
    assert_eq!(back, id);
}
