//! Session: locking, background apply and profile exchange

use pretty_assertions::assert_eq;
use regtune_catalog::{Catalog, PresetTable, Profile};
use regtune_core::{Error, ReconciliationEngine, Session};
use regtune_store::RegValue;
use regtune_test_utils::{FakeStore, ItemBuilder, RecordingRunner};

const KEY: &str = r"HKCU\Software\Regtune";

fn session(store: FakeStore) -> Session<FakeStore, RecordingRunner> {
    let catalog = Catalog::from_items(vec![
        ItemBuilder::new("Show extensions")
            .category("Explorer")
            .check(KEY, "HideFileExt", "0")
            .apply_dword(KEY, "HideFileExt", "0")
            .restore_delete(KEY, "HideFileExt")
            .build(),
        ItemBuilder::new("Fast startup")
            .check(KEY, "Hiberboot", "0")
            .apply_dword(KEY, "Hiberboot", "0")
            .restore_delete(KEY, "Hiberboot")
            .build(),
    ]);
    let engine = ReconciliationEngine::new(store, RecordingRunner::new());
    Session::load(engine, catalog, PresetTable::with_builtins())
}

#[tokio::test]
async fn apply_in_background_reports_summary() {
    let session = session(FakeStore::new());
    session.toggle("Show extensions", true).unwrap();

    let report = session.apply_in_background().await.unwrap();

    assert_eq!(report.success_count, 2);
    assert!(report.needs_restart);
    assert_eq!(
        session.engine().store().value(KEY, "HideFileExt"),
        Some(RegValue::Dword(0))
    );
    assert!(session.check_item("Show extensions").unwrap());
}

#[tokio::test]
async fn background_apply_then_refresh_agree() {
    let session = session(FakeStore::new());
    session.apply_preset("AllSelect").unwrap();
    session.apply_in_background().await.unwrap();

    assert_eq!(session.refresh().unwrap(), 2);
    assert!(session.pending_changes().unwrap().is_empty());
}

#[test]
fn load_derives_selection() {
    let store = FakeStore::new().with_value(KEY, "Hiberboot", RegValue::Dword(0));
    let session = session(store);
    let profile = session.export_profile().unwrap();
    assert_eq!(profile.get("Fast startup"), Some(true));
    assert_eq!(profile.get("Show extensions"), Some(false));
}

#[test]
fn import_then_pending_changes() {
    let session = session(FakeStore::new());
    let profile = Profile::from_json(r#"{"Fast startup": true, "Gone": true}"#).unwrap();

    assert_eq!(session.import_profile(&profile).unwrap(), 1);
    let pending = session.pending_changes().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].title, "Fast startup");
}

#[test]
fn profile_round_trip_is_noop() {
    let session = session(FakeStore::new());
    session.toggle("Fast startup", true).unwrap();
    let before = session.export_profile().unwrap();
    session.import_profile(&before).unwrap();
    assert_eq!(session.export_profile().unwrap(), before);
}

#[test]
fn search_uses_and_semantics() {
    let session = session(FakeStore::new());
    assert_eq!(session.search("hiberboot").unwrap(), vec!["Fast startup"]);
    assert_eq!(session.search("explorer hidefileext").unwrap(), vec!["Show extensions"]);
    assert!(session.search("explorer hiberboot").unwrap().is_empty());
    assert_eq!(session.search("  ").unwrap().len(), 2);
}

#[test]
fn toggle_unknown_title() {
    let session = session(FakeStore::new());
    assert!(matches!(
        session.toggle("Nope", true),
        Err(Error::Catalog(_))
    ));
}

#[test]
fn restart_runs_through_runner() {
    let session = session(FakeStore::new());
    session.restart_subsystem().unwrap();
    assert_eq!(session.engine().runner().lines().len(), 1);
}
