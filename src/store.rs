use crate::error::Result;
use crate::garden::Garden;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a garden is kept between runs
pub trait GardenStore {
    fn load(&self) -> Result<Garden>;
    fn save(&self, garden: &Garden) -> Result<()>;
}

/// Garden stored as a TOML file
pub struct FileStore {
    path: PathBuf,
    starting_points: u32,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, starting_points: u32) -> Self {
        Self {
            path: path.into(),
            starting_points,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GardenStore for FileStore {
    fn load(&self) -> Result<Garden> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no garden file yet, starting fresh");
            return Ok(Garden::with_points(self.starting_points));
        }
        let content = fs::read_to_string(&self.path)?;
        let mut garden: Garden = toml::from_str(&content)?;
        garden.sync_next_id();
        Ok(garden)
    }

    fn save(&self, garden: &Garden) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(garden)?)?;
        tracing::debug!(path = %self.path.display(), plants = garden.plants.len(), "garden saved");
        Ok(())
    }
}

/// In-process store, mostly for tests
#[derive(Default)]
pub struct MemoryStore {
    garden: RefCell<Option<Garden>>,
    starting_points: u32,
}

impl MemoryStore {
    pub fn new(starting_points: u32) -> Self {
        Self {
            garden: RefCell::new(None),
            starting_points,
        }
    }
}

impl GardenStore for MemoryStore {
    fn load(&self) -> Result<Garden> {
        Ok(self
            .garden
            .borrow()
            .clone()
            .unwrap_or_else(|| Garden::with_points(self.starting_points)))
    }

    fn save(&self, garden: &Garden) -> Result<()> {
        *self.garden.borrow_mut() = Some(garden.clone());
        Ok(())
    }
}
