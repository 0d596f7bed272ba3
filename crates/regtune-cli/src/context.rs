//! Wiring: settings, store backend, runner and session

use std::path::{Path, PathBuf};

use regtune_catalog::DefinitionLoader;
use regtune_core::{CommandRunner, ReconciliationEngine, Session, Settings, ShellRunner};
use regtune_store::{Hive, MemoryBackend, RegValue, RegistryBackend, RegistryStore};

#[cfg(windows)]
use regtune_store::WindowsBackend;

use crate::error::{CliError, Result};

/// Registry backend chosen at startup
pub enum Backend {
    /// In-memory registry persisted to a JSON file
    Sandbox { memory: MemoryBackend, path: PathBuf },
    #[cfg(windows)]
    Native(WindowsBackend),
}

impl Backend {
    pub fn open(sandbox: Option<&Path>) -> Result<Self> {
        if let Some(path) = sandbox {
            tracing::debug!(path = %path.display(), "Using sandbox backend");
            return Ok(Self::Sandbox {
                memory: MemoryBackend::load(path)?,
                path: path.to_path_buf(),
            });
        }
        Self::native()
    }

    #[cfg(windows)]
    fn native() -> Result<Self> {
        Ok(Self::Native(WindowsBackend::new()))
    }

    #[cfg(not(windows))]
    fn native() -> Result<Self> {
        Err(CliError::user(
            "No native registry on this platform. Pass --sandbox <file> to work on a JSON sandbox.",
        ))
    }

    pub fn is_sandbox(&self) -> bool {
        matches!(self, Self::Sandbox { .. })
    }

    /// Write the sandbox back to disk. A no-op for the native registry.
    pub fn persist(&self) -> Result<()> {
        if let Self::Sandbox { memory, path } = self {
            memory.save(path)?;
        }
        Ok(())
    }

    fn inner(&self) -> &dyn RegistryBackend {
        match self {
            Self::Sandbox { memory, .. } => memory,
            #[cfg(windows)]
            Self::Native(native) => native,
        }
    }
}

impl RegistryBackend for Backend {
    fn subkey_names(&self, hive: Hive, path: &str) -> regtune_store::Result<Vec<String>> {
        self.inner().subkey_names(hive, path)
    }

    fn get_value(
        &self,
        hive: Hive,
        path: &str,
        name: &str,
    ) -> regtune_store::Result<Option<RegValue>> {
        self.inner().get_value(hive, path, name)
    }

    fn set_value(
        &self,
        hive: Hive,
        path: &str,
        name: &str,
        value: &RegValue,
    ) -> regtune_store::Result<()> {
        self.inner().set_value(hive, path, name, value)
    }

    fn delete_value(&self, hive: Hive, path: &str, name: &str) -> regtune_store::Result<()> {
        self.inner().delete_value(hive, path, name)
    }
}

/// Shell runner that only logs inside a sandbox
pub enum Runner {
    Shell(ShellRunner),
    Sandbox,
}

impl CommandRunner for Runner {
    fn run(&self, line: &str) -> regtune_core::Result<()> {
        match self {
            Self::Shell(shell) => shell.run(line),
            Self::Sandbox => {
                tracing::info!(line, "Sandbox: shell command not executed");
                Ok(())
            }
        }
    }
}

pub type CliSession = Session<RegistryStore<Backend>, Runner>;

/// Everything a command needs
pub struct Context {
    pub settings: Settings,
    pub session: CliSession,
}

impl Context {
    pub fn open(config: Option<&Path>, sandbox: Option<&Path>) -> Result<Self> {
        let settings = Settings::discover(config)?;
        let backend = Backend::open(sandbox)?;
        let runner = if backend.is_sandbox() {
            Runner::Sandbox
        } else {
            Runner::Shell(ShellRunner::new())
        };

        let store = RegistryStore::new(backend).with_user_context(settings.user_context()?);
        let engine =
            ReconciliationEngine::new(store, runner).with_options(settings.engine_options());

        let catalog = DefinitionLoader::new().load_all(&settings.definition_sources());
        tracing::debug!(items = catalog.len(), "Catalog loaded");

        let session = Session::load(engine, catalog, settings.preset_table());
        Ok(Self { settings, session })
    }

    pub fn persist(&self) -> Result<()> {
        self.session.engine().store().backend().persist()
    }
}
