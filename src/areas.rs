/// Warning area registry from warning_areas.toml
///
/// Maps each warning area code to its indicator category. Category
/// membership lives here rather than in the record stream, so a record is
/// only scoreable once its area has been looked up.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{FwiiError, Result};
use crate::model::Category;

// ============================================================================
// TOML Configuration Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct AreaFile {
    #[serde(default)]
    area: Vec<WarningArea>,
}

/// Single warning area
#[derive(Debug, Clone, Deserialize)]
pub struct WarningArea {
    pub code: String,
    pub name: String,
    pub county: Option<String>,
    /// Tidal/estuary areas score as coastal
    pub is_tidal: bool,
}

impl WarningArea {
    pub fn category(&self) -> Category {
        Category::from_coastal(self.is_tidal)
    }
}

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct AreaRegistry {
    areas: HashMap<String, WarningArea>,
}

impl AreaRegistry {
    /// Builds a registry; a later duplicate code replaces an earlier one.
    pub fn from_areas(areas: Vec<WarningArea>) -> Self {
        let mut map = HashMap::new();
        for area in areas {
            if map.contains_key(&area.code) {
                log::warn!("duplicate warning area code {} in registry", area.code);
            }
            map.insert(area.code.clone(), area);
        }
        AreaRegistry { areas: map }
    }

    /// Load the registry from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FwiiError::io(path, e))?;
        let file: AreaFile = toml::from_str(&content).map_err(|source| FwiiError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;

        let registry = Self::from_areas(file.area);
        log::info!(
            "loaded {} warning areas ({} coastal) from {}",
            registry.len(),
            registry.areas.values().filter(|a| a.is_tidal).count(),
            path.display()
        );
        Ok(registry)
    }

    pub fn get(&self, code: &str) -> Option<&WarningArea> {
        self.areas.get(code)
    }

    /// `None` when the code is not registered.
    pub fn is_coastal(&self, code: &str) -> Option<bool> {
        self.areas.get(code).map(|a| a.is_tidal)
    }

    /// Registered area codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.areas.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
