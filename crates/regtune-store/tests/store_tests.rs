//! Behavior of RegistryStore over the in-memory backend

use pretty_assertions::assert_eq;
use regtune_store::{
    Hive, KeyPath, KeyValueStore, MemoryBackend, RegValue, RegistryBackend, RegistryStore,
    RootHandle, UserContext, ValueKind,
};
use rstest::rstest;

const USER_SID: &str = "S-1-5-21-3623811015-3361044348-30300820-1013";

fn logged_in_store() -> RegistryStore<MemoryBackend> {
    let backend = MemoryBackend::new()
        .with_subkey(Hive::Users, ".DEFAULT")
        .with_subkey(Hive::Users, "S-1-5-18")
        .with_subkey(Hive::Users, &format!("{}_Classes", USER_SID))
        .with_subkey(Hive::Users, USER_SID);
    RegistryStore::new(backend)
}

#[rstest]
#[case("HKCR", Hive::ClassesRoot)]
#[case("HKEY_LOCAL_MACHINE", Hive::LocalMachine)]
#[case("hku", Hive::Users)]
#[case("HKEY_CURRENT_CONFIG", Hive::CurrentConfig)]
fn test_plain_roots_are_not_redirected(#[case] name: &str, #[case] hive: Hive) {
    let store = logged_in_store();
    assert_eq!(store.open_root(name), Some(RootHandle::new(hive)));
}

#[rstest]
#[case("HKCU")]
#[case("HKEY_CURRENT_USER")]
#[case(" \\hkcu ")]
fn test_current_user_targets_logged_in_user(#[case] name: &str) {
    let store = logged_in_store();
    let root = store.open_root(name).unwrap();
    assert_eq!(root, RootHandle::redirected(Hive::Users, USER_SID));
}

#[test]
fn test_custom_user_context_is_honored() {
    let backend = MemoryBackend::new()
        .with_subkey(Hive::Users, USER_SID)
        .with_subkey(Hive::Users, "S-1-12-1-42");
    let ctx = UserContext::new(r"^S-1-12-1-", "_Classes").unwrap();
    let store = RegistryStore::new(backend).with_user_context(ctx);

    let root = store.open_root("HKCU").unwrap();
    assert_eq!(root.prefix(), Some("S-1-12-1-42"));
}

#[test]
fn test_write_then_read_through_resolved_path() {
    let store = logged_in_store();
    let path = KeyPath::parse(r"HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Serialize");
    let root = store.open_root(path.root()).unwrap();

    let value = RegValue::coerce(ValueKind::Dword, "0");
    store
        .write(&root, path.sub_path(), "StartupDelayInMSec", &value)
        .unwrap();

    assert_eq!(
        store.read(&root, path.sub_path(), "startupdelayinmsec").unwrap(),
        Some(RegValue::Dword(0))
    );
    assert!(store.matches(&root, path.sub_path(), "StartupDelayInMSec", " 0 "));

    let raw = store
        .backend()
        .get_value(
            Hive::Users,
            &format!(r"{}\Software\Microsoft\Windows\CurrentVersion\Explorer\Serialize", USER_SID),
            "StartupDelayInMSec",
        )
        .unwrap();
    assert_eq!(raw, Some(RegValue::Dword(0)));
}

#[test]
fn test_delete_then_matches_false() {
    let store = logged_in_store();
    let root = store.open_root("HKLM").unwrap();
    store
        .write(&root, r"SYSTEM\Test", "Flag", &RegValue::String("on".into()))
        .unwrap();
    assert!(store.matches(&root, r"SYSTEM\Test", "Flag", "ON"));

    store.delete(&root, r"SYSTEM\Test", "Flag").unwrap();
    assert!(!store.matches(&root, r"SYSTEM\Test", "Flag", "on"));
    store.delete(&root, r"SYSTEM\Test", "Flag").unwrap();
}
