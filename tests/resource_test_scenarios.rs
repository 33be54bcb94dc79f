//! test: convergence verdicts, including location scoping.

mod common;

use certsync::resource::{self, Location, Presence, StoreAddress};
use common::MemoryCertStore;

#[test]
fn empty_store_with_desired_present_is_out_of_sync() {
    let dir = common::temp_home();
    let cert_path = dir.path().join("cert.cer");
    let thumb = common::write_test_cert(&cert_path, "sync.test");

    let store = MemoryCertStore::new();
    let desired = common::desired(thumb, &cert_path, common::machine_my(), Presence::Present);

    assert!(!resource::test(&store, &desired).unwrap());
}

#[test]
fn present_entry_with_desired_absent_is_out_of_sync() {
    let dir = common::temp_home();
    let cert_path = dir.path().join("cert.cer");
    let thumb = common::write_test_cert(&cert_path, "sync.test");

    let store = MemoryCertStore::new();
    let address = common::machine_my();
    store.seed(&address, thumb.clone());

    let desired = common::desired(thumb, &cert_path, address, Presence::Absent);
    assert!(!resource::test(&store, &desired).unwrap());
}

#[test]
fn matching_presence_is_in_sync() {
    let dir = common::temp_home();
    let cert_path = dir.path().join("cert.cer");
    let thumb = common::write_test_cert(&cert_path, "sync.test");

    let store = MemoryCertStore::new();
    let address = common::machine_my();
    store.seed(&address, thumb.clone());

    let desired = common::desired(thumb, &cert_path, address, Presence::Present);
    assert!(resource::test(&store, &desired).unwrap());
}

#[test]
fn location_scoping_is_part_of_the_match() {
    // Same thumbprint installed machine-wide does not satisfy a
    // CurrentUser request.
    let dir = common::temp_home();
    let cert_path = dir.path().join("cert.cer");
    let thumb = common::write_test_cert(&cert_path, "scoped.test");

    let store = MemoryCertStore::new();
    store.seed(&common::machine_my(), thumb.clone());

    let user_my = StoreAddress::new(Location::CurrentUser, "My").unwrap();
    let desired = common::desired(thumb, &cert_path, user_my, Presence::Present);
    assert!(!resource::test(&store, &desired).unwrap());
}

#[test]
fn store_name_scoping_is_part_of_the_match() {
    let dir = common::temp_home();
    let cert_path = dir.path().join("cert.cer");
    let thumb = common::write_test_cert(&cert_path, "scoped.test");

    let store = MemoryCertStore::new();
    store.seed(&common::machine_my(), thumb.clone());

    let machine_root = StoreAddress::new(Location::LocalMachine, "Root").unwrap();
    let desired = common::desired(thumb, &cert_path, machine_root, Presence::Present);
    assert!(!resource::test(&store, &desired).unwrap());
}
