use crate::model::Catalog;
use anyhow::Context;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge le catalogue depuis un support.
    fn load(&self) -> anyhow::Result<Catalog>;
    /// Sauvegarde de manière atomique.
    fn save(&self, catalog: &Catalog) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self { path: path.as_ref().to_path_buf() })
    }

    /// Comme `load`, mais un fichier absent donne un catalogue vide.
    pub fn load_or_default(&self) -> anyhow::Result<Catalog> {
        match fs::metadata(&self.path) {
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Catalog::default()),
            _ => self.load(),
        }
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Catalog> {
        let data = fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let catalog: Catalog = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(catalog)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
