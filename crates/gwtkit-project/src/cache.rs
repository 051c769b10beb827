use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use gwtkit_module::{parse_descriptor, ModuleDescriptor, ParseError};

/// Content fingerprint standing in for an editor's modification counter.
pub fn fingerprint(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: u64,
    descriptor: ModuleDescriptor,
}

/// Parse cache for module descriptors, keyed by path + content fingerprint.
///
/// A hit requires the fingerprint to match, so serving a stale descriptor
/// after a content change is impossible; explicit invalidation exists for
/// callers that track versions themselves.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DescriptorCache {
    pub fn get_or_parse(
        &mut self,
        path: &Path,
        text: &str,
    ) -> Result<&ModuleDescriptor, ParseError> {
        let fingerprint = fingerprint(text);

        let hit = self
            .entries
            .get(path)
            .is_some_and(|entry| entry.fingerprint == fingerprint);
        if !hit {
            let descriptor = parse_descriptor(text)?;
            self.entries.insert(
                path.to_path_buf(),
                CacheEntry {
                    fingerprint,
                    descriptor,
                },
            );
        }

        Ok(&self.entries[path].descriptor)
    }

    pub fn invalidate_file(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
