//! Session: the catalog and engine as seen by a presentation layer
//!
//! The session owns the catalog behind a mutex and admits one operation
//! at a time. An operation that finds the catalog busy fails fast with
//! [`Error::ReconcileInProgress`] instead of queueing.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use regtune_catalog::{Catalog, Item, PresetTable, Profile, export_profile, import_profile};
use regtune_store::KeyValueStore;

use crate::engine::{ApplyReport, PendingChange, ReconciliationEngine};
use crate::runner::CommandRunner;
use crate::{Error, Result};

pub struct Session<S, R> {
    engine: Arc<ReconciliationEngine<S, R>>,
    catalog: Arc<Mutex<Catalog>>,
    presets: PresetTable,
}

impl<S, R> Session<S, R>
where
    S: KeyValueStore + 'static,
    R: CommandRunner + 'static,
{
    /// Wrap a catalog without probing the store.
    pub fn new(engine: ReconciliationEngine<S, R>, catalog: Catalog, presets: PresetTable) -> Self {
        Self {
            engine: Arc::new(engine),
            catalog: Arc::new(Mutex::new(catalog)),
            presets,
        }
    }

    /// Wrap a freshly loaded catalog and derive every selection from the
    /// live store.
    pub fn load(
        engine: ReconciliationEngine<S, R>,
        mut catalog: Catalog,
        presets: PresetTable,
    ) -> Self {
        engine.refresh(&mut catalog);
        Self::new(engine, catalog, presets)
    }

    pub fn engine(&self) -> &ReconciliationEngine<S, R> {
        &self.engine
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Run `f` against the catalog.
    pub fn with_catalog<T>(&self, f: impl FnOnce(&Catalog) -> T) -> Result<T> {
        let catalog = lock(&self.catalog)?;
        Ok(f(&catalog))
    }

    /// Live check status of one item.
    pub fn check_item(&self, title: &str) -> Result<bool> {
        let catalog = lock(&self.catalog)?;
        let item = find(&catalog, title)?;
        Ok(self.engine.check_item(item))
    }

    /// User toggle. Locked items refuse.
    pub fn toggle(&self, title: &str, selected: bool) -> Result<()> {
        let mut catalog = lock(&self.catalog)?;
        catalog.set_selected(title, selected)?;
        Ok(())
    }

    pub fn refresh(&self) -> Result<usize> {
        let mut catalog = lock(&self.catalog)?;
        Ok(self.engine.refresh(&mut catalog))
    }

    pub fn apply(&self) -> Result<ApplyReport> {
        let catalog = lock(&self.catalog)?;
        Ok(self.engine.apply(&catalog))
    }

    /// Apply on a blocking worker so an async caller stays responsive.
    pub async fn apply_in_background(&self) -> Result<ApplyReport> {
        let engine = Arc::clone(&self.engine);
        let shared = Arc::clone(&self.catalog);

        tokio::task::spawn_blocking(move || {
            let catalog = lock(&shared)?;
            Ok(engine.apply(&catalog))
        })
        .await
        .map_err(|e| Error::WorkerJoin(e.to_string()))?
    }

    /// Returns `None` for an unknown key, leaving selections unchanged.
    pub fn apply_preset(&self, key: &str) -> Result<Option<usize>> {
        let mut catalog = lock(&self.catalog)?;
        Ok(self.engine.apply_preset(&self.presets, key, &mut catalog))
    }

    pub fn export_profile(&self) -> Result<Profile> {
        let catalog = lock(&self.catalog)?;
        Ok(export_profile(&catalog))
    }

    pub fn import_profile(&self, profile: &Profile) -> Result<usize> {
        let mut catalog = lock(&self.catalog)?;
        Ok(import_profile(&mut catalog, profile))
    }

    /// Titles of the items matching every keyword, in catalog order.
    pub fn search(&self, query: &str) -> Result<Vec<String>> {
        let catalog = lock(&self.catalog)?;
        Ok(catalog
            .search(query)
            .into_iter()
            .map(|item| item.title().to_string())
            .collect())
    }

    pub fn pending_changes(&self) -> Result<Vec<PendingChange>> {
        let catalog = lock(&self.catalog)?;
        Ok(self.engine.pending_changes(&catalog))
    }

    pub fn restart_subsystem(&self) -> Result<()> {
        self.engine.restart_subsystem()
    }
}

fn lock(catalog: &Mutex<Catalog>) -> Result<MutexGuard<'_, Catalog>> {
    match catalog.try_lock() {
        Ok(guard) => Ok(guard),
        // Selections stay valid after a panicked holder.
        Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => Err(Error::ReconcileInProgress),
    }
}

fn find<'a>(catalog: &'a Catalog, title: &str) -> Result<&'a Item> {
    catalog.get(title).ok_or_else(|| {
        regtune_catalog::Error::ItemNotFound {
            title: title.to_string(),
        }
        .into()
    })
}
