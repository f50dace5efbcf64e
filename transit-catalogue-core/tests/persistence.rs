mod common;

use approx::assert_relative_eq;
use transit_catalogue_core::prelude::*;

use common::sample_database;

#[test]
fn reserializing_restored_state_is_byte_identical() {
    let database = sample_database();
    for mode in [SnapshotMode::CatalogueOnly, SnapshotMode::WithGraph] {
        let bytes = database.to_snapshot(mode).unwrap();
        let restored = TransitDatabase::from_snapshot(&bytes).unwrap();
        assert_eq!(restored.to_snapshot(mode).unwrap(), bytes, "{mode:?}");
    }
}

#[test]
fn catalogue_content_is_restored() {
    let database = sample_database();
    let bytes = database.to_snapshot(SnapshotMode::CatalogueOnly).unwrap();
    let restored = TransitDatabase::from_snapshot(&bytes).unwrap();

    let before = database.catalogue();
    let after = restored.catalogue();
    assert_eq!(after.stops(), before.stops());
    assert_eq!(
        after.get_sorted_stop_names(),
        before.get_sorted_stop_names()
    );
    for bus in before.buses() {
        let copy = after.get_bus_info(&bus.name).unwrap();
        assert_eq!(copy.is_roundtrip, bus.is_roundtrip);
        assert_eq!(copy.stops, bus.stops);
        assert_eq!(copy.unique_stop_count, bus.unique_stop_count);
        assert_eq!(copy.route_length, bus.route_length);
        assert_relative_eq!(copy.curvature, bus.curvature, epsilon = 1e-12);
    }
    for from in before.get_sorted_stop_names() {
        for to in before.get_sorted_stop_names() {
            assert_eq!(after.get_distance(from, to), before.get_distance(from, to));
        }
    }
    assert_eq!(restored.render_settings(), database.render_settings());
    assert_eq!(restored.router().settings(), database.router().settings());
}

#[test]
fn route_answers_match_after_restore() {
    let database = sample_database();
    let names: Vec<String> = database
        .catalogue()
        .get_sorted_stop_names()
        .into_iter()
        .map(str::to_owned)
        .collect();

    for mode in [SnapshotMode::CatalogueOnly, SnapshotMode::WithGraph] {
        let restored =
            TransitDatabase::from_snapshot(&database.to_snapshot(mode).unwrap()).unwrap();
        let mut id = 0;
        for from in &names {
            for to in &names {
                id += 1;
                let request = StatRequest::Route {
                    id,
                    from: from.clone(),
                    to: to.clone(),
                };
                assert_eq!(
                    restored.answer(&request).unwrap(),
                    database.answer(&request).unwrap(),
                    "{from} -> {to} ({mode:?})"
                );
            }
        }
    }
}

#[test]
fn map_is_identical_after_restore() {
    let database = sample_database();
    let restored =
        TransitDatabase::from_snapshot(&database.to_snapshot(SnapshotMode::WithGraph).unwrap())
            .unwrap();
    let request = StatRequest::Map { id: 1 };
    assert_eq!(
        restored.answer(&request).unwrap(),
        database.answer(&request).unwrap()
    );
}

#[test]
fn snapshot_file_round_trip() {
    let database = sample_database();
    let bytes = database.to_snapshot(SnapshotMode::WithGraph).unwrap();
    let path = std::env::temp_dir().join(format!(
        "transit-catalogue-it-{}.db",
        std::process::id()
    ));
    save_snapshot(&path, &bytes).unwrap();
    let loaded = load_snapshot(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, bytes);
}

#[test]
fn garbage_is_rejected() {
    let result = TransitDatabase::from_snapshot(&[0xff, 0xff, 0xff, 0xff, 0x0f]);
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[test]
fn truncated_snapshot_is_rejected() {
    let bytes = sample_database()
        .to_snapshot(SnapshotMode::WithGraph)
        .unwrap();
    let result = TransitDatabase::from_snapshot(&bytes[..bytes.len() / 2]);
    assert!(result.is_err());
}
