//! End-to-end reconciliation across store, catalog and engine
//!
//! These scenarios wire real definition files, the in-memory registry
//! backend with user-context redirection, and the session, the same way
//! the CLI does.

use pretty_assertions::assert_eq;
use regtune_catalog::{Catalog, DefinitionLoader, DefinitionSource, ItemClass, PresetTable};
use regtune_core::{ReconciliationEngine, Session, Settings};
use regtune_store::{Hive, MemoryBackend, RegValue, RegistryBackend, RegistryStore};
use regtune_test_utils::{FakeStore, ItemBuilder, RecordingRunner};
use std::fs;

const SID: &str = "S-1-5-21-1004336348-1177238915-682003330-1001";

const DEFINITIONS: &str = r#"
[[configuration]]
category = "Explorer"

[[configuration.item]]
name = "Show file extensions"

[[configuration.item.check]]
key = 'HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced'
value = "HideFileExt"
data = "0"

[[configuration.item.optimize]]
key = 'HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced'
value = "HideFileExt"
data = "0"

[[configuration.item.restore]]
action = "delete"
key = 'HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced'
value = "HideFileExt"

[[configuration]]
category = "System"

[[configuration.item]]
name = "Verbose status"

[[configuration.item.check]]
key = 'HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System'
value = "VerboseStatus"
data = "1"

[[configuration.item.optimize]]
key = 'HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System'
value = "VerboseStatus"
data = "1"

[[configuration.item.optimize]]
action = "shell"
data = "gpupdate /force"

[[configuration.item.restore]]
key = 'HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System'
value = "VerboseStatus"
data = "0"
"#;

const ADVANCED: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced";

fn user_backend() -> MemoryBackend {
    MemoryBackend::new()
        .with_subkey(Hive::Users, ".DEFAULT")
        .with_subkey(Hive::Users, "S-1-5-18")
        .with_subkey(Hive::Users, &format!("{SID}_Classes"))
        .with_subkey(Hive::Users, SID)
}

#[test]
fn check_then_refresh_selects_matching_item() {
    let store = FakeStore::new().with_value(r"HKLM\SOFTWARE\Regtune", "Flag", RegValue::Dword(1));
    let mut catalog = Catalog::from_items(vec![
        ItemBuilder::new("X")
            .category("System")
            .check(r"HKLM\SOFTWARE\Regtune", "Flag", "1")
            .build(),
    ]);
    let engine = ReconciliationEngine::new(store, RecordingRunner::new());

    assert!(engine.check_item(&catalog.items()[0]));
    assert_eq!(engine.refresh(&mut catalog), 1);
    assert!(catalog.get("X").unwrap().is_selected());
}

#[tokio::test]
async fn loaded_definitions_apply_to_logged_in_user() {
    let dir = tempfile::tempdir().unwrap();
    let defs = dir.path().join("normal.toml");
    fs::write(&defs, DEFINITIONS).unwrap();

    let catalog =
        DefinitionLoader::new().load_all(&[DefinitionSource::new(&defs, ItemClass::Normal)]);
    assert_eq!(catalog.len(), 2);

    let engine =
        ReconciliationEngine::new(RegistryStore::new(user_backend()), RecordingRunner::new());
    let session = Session::load(engine, catalog, PresetTable::with_builtins());
    assert_eq!(session.refresh().unwrap(), 0);

    assert_eq!(session.apply_preset("AllSelect").unwrap(), Some(2));
    let report = session.apply_in_background().await.unwrap();
    assert_eq!(report.success_count, 2);
    assert!(report.needs_restart);

    let backend = session.engine().store().backend();
    assert_eq!(
        backend
            .get_value(Hive::Users, &format!(r"{SID}\{ADVANCED}"), "HideFileExt")
            .unwrap(),
        Some(RegValue::Dword(0))
    );
    // the process's own current-user hive stays untouched
    assert_eq!(
        backend.get_value(Hive::CurrentUser, ADVANCED, "HideFileExt").unwrap(),
        None
    );
    assert_eq!(session.engine().runner().lines(), vec!["gpupdate /force"]);
    assert_eq!(session.refresh().unwrap(), 2);
}

#[test]
fn clear_and_apply_restores_defaults() {
    let backend = user_backend()
        .with_value(Hive::Users, &format!(r"{SID}\{ADVANCED}"), "HideFileExt", RegValue::Dword(0))
        .with_value(
            Hive::LocalMachine,
            r"SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System",
            "VerboseStatus",
            RegValue::Dword(1),
        );

    let catalog = DefinitionLoader::new()
        .load_bytes(
            DEFINITIONS.as_bytes(),
            regtune_store::Format::Toml,
            ItemClass::Normal,
            "inline",
        )
        .map(Catalog::from_items)
        .unwrap();

    let engine = ReconciliationEngine::new(RegistryStore::new(backend), RecordingRunner::new());
    let session = Session::load(engine, catalog, PresetTable::with_builtins());
    assert_eq!(session.export_profile().unwrap().iter().filter(|(_, on)| *on).count(), 2);

    session.apply_preset("AllNotSelect").unwrap();
    assert_eq!(session.pending_changes().unwrap().len(), 2);
    let report = session.apply().unwrap();
    assert_eq!(report.success_count, 2);

    let backend = session.engine().store().backend();
    assert_eq!(
        backend
            .get_value(Hive::Users, &format!(r"{SID}\{ADVANCED}"), "HideFileExt")
            .unwrap(),
        None
    );
    assert_eq!(
        backend
            .get_value(
                Hive::LocalMachine,
                r"SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System",
                "VerboseStatus"
            )
            .unwrap(),
        Some(RegValue::Dword(0))
    );
    assert_eq!(session.refresh().unwrap(), 0);
}

#[test]
fn sandbox_survives_a_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = dir.path().join("sandbox.json");

    let catalog = Catalog::from_items(vec![
        ItemBuilder::new("Flag")
            .check(r"HKLM\SOFTWARE\Regtune", "Flag", "1")
            .apply_dword(r"HKLM\SOFTWARE\Regtune", "Flag", "1")
            .selected(true)
            .build(),
    ]);
    let engine = ReconciliationEngine::new(
        RegistryStore::new(MemoryBackend::load(&sandbox).unwrap()),
        RecordingRunner::new(),
    );
    engine.apply(&catalog);
    engine.store().backend().save(&sandbox).unwrap();

    let reopened = ReconciliationEngine::new(
        RegistryStore::new(MemoryBackend::load(&sandbox).unwrap()),
        RecordingRunner::new(),
    );
    assert!(reopened.check_item(&catalog.items()[0]));
}

#[test]
fn settings_drive_sources_and_presets() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("normal.toml"), DEFINITIONS).unwrap();
    let settings_path = dir.path().join("regtune.toml");
    fs::write(
        &settings_path,
        r#"
[definitions]
normal = ["normal.toml"]
legacy = []
script = []

[presets.boot]
label = "Boot diagnostics"
titles = ["Verbose status"]
"#,
    )
    .unwrap();

    let settings = Settings::discover(Some(&settings_path)).unwrap();
    let catalog = DefinitionLoader::new().load_all(&settings.definition_sources());
    let engine = ReconciliationEngine::new(
        RegistryStore::new(user_backend()).with_user_context(settings.user_context().unwrap()),
        RecordingRunner::new(),
    )
    .with_options(settings.engine_options());
    let session = Session::load(engine, catalog, settings.preset_table());

    assert_eq!(session.apply_preset("boot").unwrap(), Some(1));
    let report = session.apply().unwrap();
    assert_eq!(report.success_count, 2);
    // the unselected explorer item was restored successfully
    assert!(report.needs_restart);
}
