use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::Context;

/// Favorite service ids, kept on the device only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    ids: BTreeSet<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove `service_id`; returns whether it is now a favorite.
    pub fn toggle(&mut self, service_id: &str) -> bool {
        if self.ids.remove(service_id) {
            false
        } else {
            self.ids.insert(service_id.to_string());
            true
        }
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.ids.contains(service_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Missing file means no favorites yet.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read favorites from {}", path.display()))?;
        let ids: BTreeSet<String> =
            serde_json::from_str(&raw).context("favorites file is not a JSON list of ids")?;
        Ok(Self { ids })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string(&self.ids)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write favorites to {}", path.display()))?;
        Ok(())
    }
}
