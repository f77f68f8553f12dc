//! Behavioural checks shared by every [`PeriodStore`] implementation.
//!
//! [`run`] expects an empty store and panics on the first deviation.

#![allow(
    clippy::missing_assert_message,
    reason = "Failures are reported with the offending value"
)]

use claims::{assert_err, assert_matches, assert_ok};
use planner_primitives::period::{Period, PeriodListItem};
use planner_primitives::team::Team;
use planner_primitives::version::VersionId;

use crate::db::PeriodStore;
use crate::errors::StoreError;

const TEAM_ID: &str = "myteam";
const PERIOD_ID: &str = "pd1";

fn v(id: &str) -> VersionId {
    VersionId::from(id)
}

pub fn run<S: PeriodStore + ?Sized>(store: &S) {
    check_teams(store);
    let fast_forwarded = check_periods(store);
    check_merging(store, &fast_forwarded);
}

fn check_teams<S: PeriodStore + ?Sized>(store: &S) {
    let teams = assert_ok!(store.all_teams());
    assert!(teams.is_empty(), "expected no teams, found {}", teams.len());

    assert_ok!(store.create_team(Team::new(TEAM_ID, "My team")));
    assert_matches!(
        store.create_team(Team::new(TEAM_ID, "Duplicate team")),
        Err(StoreError::TeamAlreadyExists(_))
    );

    let teams = assert_ok!(store.all_teams());
    assert_eq!(teams, vec![Team::new(TEAM_ID, "My team")]);

    let team = assert_ok!(store.team(TEAM_ID));
    assert_eq!(team.display_name, "My team");
    assert_matches!(
        store.team("doesnotexist"),
        Err(StoreError::TeamNotFound(_))
    );

    assert_matches!(
        store.update_team(Team::new("doesnotexist", "Nobody")),
        Err(StoreError::TeamNotFound(_))
    );
    assert_ok!(store.update_team(Team::new(TEAM_ID, "My renamed team")));
    assert_eq!(
        assert_ok!(store.team(TEAM_ID)).display_name,
        "My renamed team"
    );
}

/// Returns the revision produced by the fast-forward update.
fn check_periods<S: PeriodStore + ?Sized>(store: &S) -> Period {
    let list = assert_ok!(store.all_periods(TEAM_ID));
    assert!(
        list.periods.is_empty(),
        "expected no periods, found {}",
        list.periods.len()
    );

    assert_matches!(
        store.all_periods("doesnotexist"),
        Err(StoreError::TeamNotFound(_))
    );
    assert_matches!(
        store.upsert_period_latest_version("doesnotexist", Period::default()),
        Err(StoreError::TeamNotFound(_))
    );
    assert_matches!(
        store.period_latest_version("doesnotexist", PERIOD_ID),
        Err(StoreError::TeamNotFound(_))
    );
    assert_matches!(
        store.period_latest_version(TEAM_ID, "doesnotexist"),
        Err(StoreError::PeriodNotFound(_))
    );

    let mut period = Period::new(PERIOD_ID, VersionId::default());
    period.display_name = "My test period".to_owned();
    assert_matches!(
        store.upsert_period_latest_version(TEAM_ID, period.clone()),
        Err(StoreError::MissingVersion)
    );

    period.version = v("v1");
    let saved = assert_ok!(store.upsert_period_latest_version(TEAM_ID, period.clone()));
    assert_eq!(saved, period);
    assert_eq!(
        assert_ok!(store.period_latest_version(TEAM_ID, PERIOD_ID)),
        period
    );

    let mut updated = Period::new(PERIOD_ID, v("v2"));
    updated.display_name = "My updated test period".to_owned();
    assert_matches!(
        store.upsert_period_latest_version(TEAM_ID, updated.clone()),
        Err(StoreError::InvalidParentCount(0))
    );

    updated.parent_versions = vec![v("v17")];
    assert_matches!(
        store.upsert_period_latest_version(TEAM_ID, updated.clone()),
        Err(StoreError::UnknownParent(ref parent)) if *parent == v("v17")
    );

    updated.parent_versions = vec![v("v1")];
    let fast_forwarded = assert_ok!(store.upsert_period_latest_version(TEAM_ID, updated));
    assert_eq!(fast_forwarded.display_name, "My updated test period");
    assert_eq!(fast_forwarded.parent_versions, vec![v("v1")]);
    assert_ne!(fast_forwarded.version, v("v1"));
    assert_ne!(fast_forwarded.version, v("v2"));
    assert_eq!(
        assert_ok!(store.period_latest_version(TEAM_ID, PERIOD_ID)),
        fast_forwarded
    );

    let resubmitted = fast_forwarded
        .clone()
        .with_parents(vec![fast_forwarded.version.clone()]);
    assert_matches!(
        store.upsert_period_latest_version(TEAM_ID, resubmitted),
        Err(StoreError::DuplicateVersion(_))
    );

    let two_parents = Period::new(PERIOD_ID, v("v5"))
        .with_parents(vec![v("v1"), fast_forwarded.version.clone()]);
    assert_matches!(
        store.upsert_period_latest_version(TEAM_ID, two_parents),
        Err(StoreError::InvalidParentCount(2))
    );

    assert_matches!(
        store.upsert_period_latest_version(
            TEAM_ID,
            Period::new("mynew", v("v1")).with_parents(vec![v("foo")])
        ),
        Err(StoreError::UnexpectedParents(_))
    );

    let original = assert_ok!(store.period_version(TEAM_ID, PERIOD_ID, &v("v1")));
    assert_eq!(original.display_name, "My test period");
    assert_matches!(
        store.period_version(TEAM_ID, PERIOD_ID, &v("v2")),
        Err(StoreError::VersionNotFound { .. })
    );

    let list = assert_ok!(store.all_periods(TEAM_ID));
    assert_eq!(
        list.periods,
        vec![PeriodListItem {
            name: "My updated test period".to_owned(),
            id: PERIOD_ID.to_owned(),
        }]
    );

    fast_forwarded
}

fn check_merging<S: PeriodStore + ?Sized>(store: &S, fast_forwarded: &Period) {
    // Derived from v1 while the rename was saved; touches an unrelated field.
    let mut unrelated = Period::new(PERIOD_ID, v("v3")).with_parents(vec![v("v1")]);
    unrelated.display_name = "My updated test period".to_owned();
    unrelated.unit = "Updated unit".to_owned();

    let merged = assert_ok!(store.upsert_period_latest_version(TEAM_ID, unrelated));
    assert_eq!(merged.display_name, "My updated test period");
    assert_eq!(merged.unit, "Updated unit");
    assert_eq!(
        merged.parent_versions,
        vec![v("v1"), fast_forwarded.version.clone()]
    );
    assert_ne!(merged.version, v("v3"));
    assert_eq!(
        assert_ok!(store.period_latest_version(TEAM_ID, PERIOD_ID)),
        merged
    );

    let mut conflicting = Period::new(PERIOD_ID, v("v4")).with_parents(vec![v("v1")]);
    conflicting.display_name = "My conflicting display name".to_owned();

    let err = assert_err!(store.upsert_period_latest_version(TEAM_ID, conflicting));
    assert_matches!(&err, StoreError::ConcurrentModification { .. });
    assert!(
        err.to_string().contains("DisplayName: conflicting updates"),
        "unexpected error message: {err}"
    );

    assert_eq!(
        assert_ok!(store.period_latest_version(TEAM_ID, PERIOD_ID)),
        merged
    );
}
