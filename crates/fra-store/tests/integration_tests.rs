//! Integration tests for fra-store
//!
//! These run the same repository contract against the SQLite and in-memory
//! implementations.

use fra_domain::traits::{ClaimFilter, ClaimRepository, RepositoryError};
use fra_domain::{
    Action, Applicant, Area, AreaType, AreaUnit, Authority, ClaimId, ClaimRecord, ClaimType,
    Jurisdiction, LandDetails, LatLng, MapData, Role, Shape, Status,
};
use fra_store::{MemoryStore, SqliteStore};

fn applicant(district: &str, gram_panchayat: &str) -> Applicant {
    Applicant {
        name: "Phulwati Bai".to_string(),
        contact: "9425000000".to_string(),
        identity_number: "AAD-1234".to_string(),
        village: "Amarpur".to_string(),
        gram_panchayat: gram_panchayat.to_string(),
        tehsil: "Bajag".to_string(),
        district: district.to_string(),
        state: "Madhya Pradesh".to_string(),
    }
}

fn new_claim(district: &str, claim_type: ClaimType) -> ClaimRecord {
    ClaimRecord::new(
        ClaimId::new(),
        applicant(district, "Amarpur"),
        claim_type,
        LandDetails {
            declared_area: 2.5,
            unit: AreaUnit::Acres,
            description: "Paddy field near the nala".to_string(),
            compartment_number: Some("RF-212".to_string()),
        },
        1_700_000_000,
    )
}

fn gram_sabha() -> Authority {
    Authority::new(
        "gs-amarpur",
        Role::GramSabha,
        Jurisdiction::GramPanchayat {
            district: "Dindori".to_string(),
            gram_panchayat: "Amarpur".to_string(),
        },
    )
}

fn boundary() -> MapData {
    let areas = vec![
        Area::compute(
            "plot".to_string(),
            Shape::Rectangle {
                south_west: LatLng::new(22.94, 81.07),
                north_east: LatLng::new(22.941, 81.072),
            },
            AreaType::Claimed,
            32,
        ),
        Area::compute(
            "pond".to_string(),
            Shape::Circle {
                center: LatLng::new(22.9405, 81.071),
                radius_m: 15.0,
            },
            AreaType::Pond,
            32,
        ),
    ];
    MapData::new(areas, 1, 1_700_000_100).unwrap()
}

fn check_insert_and_load<R: ClaimRepository>(store: &R) {
    let claim = new_claim("Dindori", ClaimType::Individual);
    assert_eq!(store.insert(&claim).unwrap(), 1);

    let loaded = store.load(claim.id).unwrap().expect("claim should exist");
    assert_eq!(loaded.revision(), 1);
    assert_eq!(loaded.status(), Status::Submitted);
    assert_eq!(loaded.applicant, claim.applicant);
    assert_eq!(loaded.land, claim.land);
    assert_eq!(loaded.claim_type, claim.claim_type);
    assert!(loaded.history().is_empty());

    assert!(store.load(ClaimId::new()).unwrap().is_none());
}

fn check_duplicate_insert<R: ClaimRepository>(store: &R) {
    let claim = new_claim("Dindori", ClaimType::Individual);
    store.insert(&claim).unwrap();
    assert_eq!(store.insert(&claim), Err(RepositoryError::AlreadyExists(claim.id)));
}

fn check_save_round_trip<R: ClaimRepository>(store: &R) {
    let claim = new_claim("Dindori", ClaimType::Individual);
    store.insert(&claim).unwrap();

    let mut loaded = store.load(claim.id).unwrap().unwrap();
    loaded = loaded.apply(Action::Verify, &gram_sabha(), "patta papers seen", 10).unwrap();
    loaded.set_map_data(boundary());
    assert_eq!(store.save(&loaded).unwrap(), 2);

    let reloaded = store.load(claim.id).unwrap().unwrap();
    assert_eq!(reloaded.revision(), 2);
    assert_eq!(reloaded.status(), Status::VerifiedByGramSabha);
    assert_eq!(reloaded.history(), loaded.history());

    let map = reloaded.map_data().expect("boundary should persist");
    assert_eq!(map.areas().len(), 2);
    assert_eq!(map.areas()[1].area_type, AreaType::Pond);
    let recomputed: f64 = map.areas().iter().map(|a| a.area_value).sum();
    assert!((map.total_area() - recomputed).abs() < 1e-6);
    assert!((map.total_area() - boundary().total_area()).abs() < 1e-6);
}

fn check_stale_save_is_rejected<R: ClaimRepository>(store: &R) {
    let claim = new_claim("Dindori", ClaimType::Individual);
    store.insert(&claim).unwrap();

    let first = store.load(claim.id).unwrap().unwrap();
    let second = store.load(claim.id).unwrap().unwrap();

    let verified = first.apply(Action::Verify, &gram_sabha(), "", 10).unwrap();
    store.save(&verified).unwrap();

    let also_verified = second.apply(Action::Verify, &gram_sabha(), "", 11).unwrap();
    assert_eq!(
        store.save(&also_verified),
        Err(RepositoryError::ConcurrentModification {
            id: claim.id,
            expected: 1,
            actual: 2,
        })
    );

    // The winning write is intact
    let stored = store.load(claim.id).unwrap().unwrap();
    assert_eq!(stored.history().len(), 1);
    assert_eq!(stored.history()[0].timestamp, 10);
}

fn check_save_unknown_claim<R: ClaimRepository>(store: &R) {
    let claim = new_claim("Dindori", ClaimType::Individual);
    assert_eq!(store.save(&claim), Err(RepositoryError::NotFound(claim.id)));
}

fn check_list_filters<R: ClaimRepository>(store: &R) {
    for district in ["Dindori", "Dindori", "Mandla"] {
        store.insert(&new_claim(district, ClaimType::Individual)).unwrap();
    }
    store.insert(&new_claim("Mandla", ClaimType::Community)).unwrap();

    let dindori = store
        .list(&ClaimFilter {
            district: Some("dindori".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(dindori.len(), 2);

    let community = store
        .list(&ClaimFilter {
            claim_type: Some(ClaimType::Community),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(community.len(), 1);
    assert_eq!(community[0].applicant.district, "Mandla");

    let limited = store
        .list(&ClaimFilter {
            limit: Some(3),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(limited.len(), 3);

    let none = store
        .list(&ClaimFilter {
            statuses: vec![Status::TitleGranted],
            ..Default::default()
        })
        .unwrap();
    assert!(none.is_empty());
}

macro_rules! repository_contract {
    ($module:ident, $make:expr) => {
        mod $module {
            use super::*;

            #[test]
            fn insert_and_load() {
                check_insert_and_load(&$make);
            }

            #[test]
            fn duplicate_insert() {
                check_duplicate_insert(&$make);
            }

            #[test]
            fn save_round_trip() {
                check_save_round_trip(&$make);
            }

            #[test]
            fn stale_save_is_rejected() {
                check_stale_save_is_rejected(&$make);
            }

            #[test]
            fn save_unknown_claim() {
                check_save_unknown_claim(&$make);
            }

            #[test]
            fn list_filters() {
                check_list_filters(&$make);
            }
        }
    };
}

repository_contract!(sqlite, SqliteStore::new(":memory:").unwrap());
repository_contract!(memory, MemoryStore::new());

#[test]
fn test_sqlite_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claims.db");

    let claim = new_claim("Dindori", ClaimType::Community);
    {
        let store = SqliteStore::new(&path).unwrap();
        store.insert(&claim).unwrap();
        let mut loaded = store.load(claim.id).unwrap().unwrap();
        loaded = loaded.apply(Action::Verify, &gram_sabha(), "", 5).unwrap();
        loaded.set_map_data(boundary());
        store.save(&loaded).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let reloaded = store.load(claim.id).unwrap().unwrap();
    assert_eq!(reloaded.status(), Status::VerifiedByGramSabha);
    assert_eq!(reloaded.map_data().unwrap().revision(), 1);
    assert_eq!(reloaded.land.compartment_number.as_deref(), Some("RF-212"));
}

#[test]
fn test_sqlite_shared_between_threads() {
    let store = std::sync::Arc::new(SqliteStore::new(":memory:").unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || {
                store
                    .insert(&new_claim("Dindori", ClaimType::Individual))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.list(&ClaimFilter::default()).unwrap().len(), 4);
}
