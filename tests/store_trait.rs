//! MockCertStore records import/remove calls made through the trait.

mod common;

use std::path::Path;
use std::sync::Mutex;

use certsync::cert::CertificateRecord;
use certsync::platform::CertStore;
use certsync::resource::{self, Presence, StoreAddress};
use certsync::thumbprint::Thumbprint;

struct MockCertStore {
    imported: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
}

impl MockCertStore {
    fn new() -> Self {
        Self {
            imported: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
        }
    }

    fn imported(&self) -> Vec<String> {
        self.imported.lock().unwrap().clone()
    }

    fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

impl CertStore for MockCertStore {
    fn find(
        &self,
        _thumbprint: &Thumbprint,
        _address: &StoreAddress,
    ) -> certsync::error::Result<Option<CertificateRecord>> {
        Ok(None)
    }

    fn import(&self, address: &StoreAddress, source: &Path) -> certsync::error::Result<()> {
        self.imported
            .lock()
            .unwrap()
            .push(format!("{}:{}", address.store_path(), source.display()));
        Ok(())
    }

    fn remove(
        &self,
        thumbprint: &Thumbprint,
        address: &StoreAddress,
    ) -> certsync::error::Result<()> {
        self.removed
            .lock()
            .unwrap()
            .push(format!("{}:{}", address.store_path(), thumbprint));
        Ok(())
    }
}

#[test]
fn apply_present_routes_to_import() {
    let dir = common::temp_home();
    let cert_path = dir.path().join("mock.cer");
    let thumb = common::write_test_cert(&cert_path, "mock.test");

    let store = MockCertStore::new();
    let desired = common::desired(thumb, &cert_path, common::machine_my(), Presence::Present);
    resource::apply(&store, &desired).unwrap();

    let imported = store.imported();
    assert_eq!(imported.len(), 1);
    assert!(imported[0].starts_with("LocalMachine\\My:"));
    assert!(imported[0].contains("mock.cer"));
    assert!(store.removed().is_empty());
}

#[test]
fn apply_absent_routes_to_remove() {
    let store = MockCertStore::new();
    let thumb = Thumbprint::parse(&"ef".repeat(20)).unwrap();
    let desired = common::desired(
        thumb.clone(),
        "mock.cer",
        common::machine_my(),
        Presence::Absent,
    );
    resource::apply(&store, &desired).unwrap();

    let removed = store.removed();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0], format!("LocalMachine\\My:{thumb}"));
    assert!(store.imported().is_empty());
}
