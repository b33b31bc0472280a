//! Sound catalog
//!
//! Maps logical sound names ("musket_fire", "church_bell") to dense
//! integer ids, each id owning a small round-robin group of interchangeable
//! asset variants plus a danger flag. The catalog is built once at load
//! time and read-only afterwards; ids stay stable for its whole lifetime.

use crate::backend::{AssetHandle, AudioBackend};
use crate::config::Config;
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Maximum number of variants in one round-robin group
pub const MAX_VARIANTS: usize = 16;

/// Identifier of a logical sound
///
/// Ids are dense indices minted by the catalog in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(u32);

impl SoundId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One logical sound: its variant group and metadata
#[derive(Debug, Clone)]
struct SoundEntry {
    name: String,
    variants: Vec<AssetHandle>,
    danger: bool,
}

/// Immutable-after-load lookup from sound id to variant group
#[derive(Debug, Default)]
pub struct SoundCatalog {
    sounds: Vec<SoundEntry>,
    by_name: HashMap<String, SoundId>,
}

impl SoundCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sound and return its id
    ///
    /// An empty variant group is allowed: the sound resolves but triggers
    /// on it play nothing, which is how absent optional assets behave.
    ///
    /// # Errors
    /// - `DuplicateName` if the name is already registered
    /// - `GroupTooLarge` if more than [`MAX_VARIANTS`] variants are given
    pub fn insert(
        &mut self,
        name: &str,
        variants: Vec<AssetHandle>,
        danger: bool,
    ) -> Result<SoundId, CatalogError> {
        if self.by_name.contains_key(name) {
            return Err(CatalogError::DuplicateName(name.to_string()));
        }
        if variants.len() > MAX_VARIANTS {
            return Err(CatalogError::GroupTooLarge {
                name: name.to_string(),
                count: variants.len(),
                limit: MAX_VARIANTS,
            });
        }

        let id = SoundId(self.sounds.len() as u32);
        self.sounds.push(SoundEntry {
            name: name.to_string(),
            variants,
            danger,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Look up a sound id by name
    ///
    /// A miss is a normal outcome, not an error: content routinely refers
    /// to sounds that were never shipped, and such triggers simply do
    /// nothing.
    pub fn resolve(&self, name: &str) -> Option<SoundId> {
        self.by_name.get(name).copied()
    }

    /// Whether the id refers to a registered sound
    pub fn contains(&self, id: SoundId) -> bool {
        id.index() < self.sounds.len()
    }

    /// Number of registered sounds
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Whether the catalog has no sounds
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Number of variants in a sound's group (0 for unknown ids)
    pub fn variant_count(&self, id: SoundId) -> usize {
        self.sounds.get(id.index()).map_or(0, |s| s.variants.len())
    }

    /// Whether the sound triggers the danger alert side effect
    pub fn is_dangerous(&self, id: SoundId) -> bool {
        self.sounds.get(id.index()).map_or(false, |s| s.danger)
    }

    /// Asset handle of one variant in a sound's group
    pub fn variant(&self, id: SoundId, index: usize) -> Option<AssetHandle> {
        self.sounds
            .get(id.index())
            .and_then(|s| s.variants.get(index))
            .copied()
    }

    /// Name of a sound (debug/tooling use)
    pub fn name(&self, id: SoundId) -> Option<&str> {
        self.sounds.get(id.index()).map(|s| s.name.as_str())
    }

    /// Build a catalog from a bank definition, loading variant files
    /// through the backend
    ///
    /// Missing or undecodable variant files are logged and skipped rather
    /// than failing the whole bank; the affected sound keeps whatever
    /// variants did load.
    ///
    /// # Errors
    /// - `DuplicateName` / `GroupTooLarge` for malformed definitions
    pub fn load_bank<B: AudioBackend>(
        backend: &mut B,
        def: &SoundBankDef,
        base_dir: &Path,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        for sound in &def.sounds {
            let mut variants = Vec::with_capacity(sound.files.len());
            for file in &sound.files {
                let path = base_dir.join(file);
                let data = match std::fs::read(&path) {
                    Ok(data) => data,
                    Err(e) => {
                        log::warn!("sound '{}': cannot read {}: {e}", sound.name, path.display());
                        continue;
                    }
                };
                match backend.load_asset(&data) {
                    Ok(handle) => variants.push(handle),
                    Err(e) => {
                        log::warn!("sound '{}': cannot load {}: {e}", sound.name, path.display());
                    }
                }
            }
            catalog.insert(&sound.name, variants, sound.danger)?;
        }

        log::info!("loaded sound bank: {} sounds", catalog.len());
        Ok(catalog)
    }
}

/// On-disk definition of a sound bank (RON or TOML)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundBankDef {
    /// Sound definitions in id order
    pub sounds: Vec<SoundDef>,
}

impl Config for SoundBankDef {}

/// Definition of one logical sound in a bank file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDef {
    /// Logical sound name, unique within the bank
    pub name: String,
    /// Variant files, relative to the bank's base directory
    pub files: Vec<PathBuf>,
    /// Whether playing this sound raises the danger alert
    #[serde(default)]
    pub danger: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;

    fn sample_catalog() -> (SoundCatalog, Vec<AssetHandle>) {
        let mut backend = MockBackend::new();
        let assets = backend.load_n(4);
        let mut catalog = SoundCatalog::new();
        catalog
            .insert("musket_fire", vec![assets[0], assets[1], assets[2]], true)
            .unwrap();
        catalog.insert("church_bell", vec![assets[3]], false).unwrap();
        (catalog, assets)
    }

    #[test]
    fn test_resolve_known_name() {
        let (catalog, _) = sample_catalog();
        let id = catalog.resolve("musket_fire").unwrap();
        assert_eq!(catalog.variant_count(id), 3);
        assert!(catalog.is_dangerous(id));
        assert_eq!(catalog.name(id), Some("musket_fire"));
    }

    #[test]
    fn test_resolve_miss_is_none() {
        let (catalog, _) = sample_catalog();
        assert!(catalog.resolve("cavalry_charge").is_none());
    }

    #[test]
    fn test_ids_are_dense_and_stable() {
        let (catalog, _) = sample_catalog();
        let musket = catalog.resolve("musket_fire").unwrap();
        let bell = catalog.resolve("church_bell").unwrap();
        assert_ne!(musket, bell);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_variant_access() {
        let (catalog, assets) = sample_catalog();
        let id = catalog.resolve("musket_fire").unwrap();
        assert_eq!(catalog.variant(id, 0), Some(assets[0]));
        assert_eq!(catalog.variant(id, 2), Some(assets[2]));
        assert_eq!(catalog.variant(id, 3), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (mut catalog, assets) = sample_catalog();
        let result = catalog.insert("musket_fire", vec![assets[0]], false);
        assert!(matches!(result, Err(CatalogError::DuplicateName(_))));
    }

    #[test]
    fn test_group_size_limit() {
        let mut backend = MockBackend::new();
        let assets = backend.load_n(MAX_VARIANTS + 1);
        let mut catalog = SoundCatalog::new();
        let result = catalog.insert("too_many", assets, false);
        assert!(matches!(result, Err(CatalogError::GroupTooLarge { .. })));
    }

    #[test]
    fn test_empty_group_is_allowed() {
        let mut catalog = SoundCatalog::new();
        let id = catalog.insert("placeholder", Vec::new(), false).unwrap();
        assert_eq!(catalog.variant_count(id), 0);
        assert!(catalog.contains(id));
    }

    #[test]
    fn test_bank_def_roundtrip() {
        let def = SoundBankDef {
            sounds: vec![SoundDef {
                name: "musket_fire".into(),
                files: vec![PathBuf::from("musket1.wav"), PathBuf::from("musket2.wav")],
                danger: true,
            }],
        };
        let text = ron::to_string(&def).unwrap();
        let parsed: SoundBankDef = ron::from_str(&text).unwrap();
        assert_eq!(parsed.sounds.len(), 1);
        assert!(parsed.sounds[0].danger);
    }

    #[test]
    fn test_load_bank_skips_missing_files() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut backend = MockBackend::new();
        let def = SoundBankDef {
            sounds: vec![SoundDef {
                name: "ghost".into(),
                files: vec![PathBuf::from("does_not_exist.wav")],
                danger: false,
            }],
        };
        let catalog = SoundCatalog::load_bank(&mut backend, &def, Path::new("/nonexistent")).unwrap();
        let id = catalog.resolve("ghost").unwrap();
        assert_eq!(catalog.variant_count(id), 0);
    }
}
