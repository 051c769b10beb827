//! Workspace discovery for GWT projects.
//!
//! This crate turns a workspace folder into a [`ModulesIndex`]:
//! every `*.gwt.xml` under the workspace's source roots, with derived
//! qualified names, scope-aware lookup, and containment queries. A
//! fingerprint-keyed cache keeps reloads cheap without ever serving stale
//! descriptors.

use std::path::{Path, PathBuf};

use gwtkit_core::QualifiedName;
use gwtkit_module::{
    resolve_public_roots, resolve_source_roots, GwtModule, ModuleLookup, ModuleRootsProvider,
};
use thiserror::Error;

mod cache;
mod scan;

pub use cache::{fingerprint, DescriptorCache};
pub use scan::scan_workspace;

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Replaces default source-root discovery (`<root>/src`, else the root
    /// itself) when non-empty. Relative entries are joined to the root.
    pub source_roots: Vec<PathBuf>,

    /// Additional source roots appended to the discovered or declared set.
    pub extra_source_roots: Vec<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no source roots found under {root}")]
    UnknownWorkspace { root: PathBuf },
}

/// Where a by-name lookup is allowed to find modules.
#[derive(Debug, Clone)]
pub enum SearchScope {
    /// The whole project.
    Project,
    /// Only descriptors under one of these directories
    /// (module-with-dependencies scope).
    UnderRoots(Vec<PathBuf>),
}

impl SearchScope {
    fn admits(&self, module: &GwtModule) -> bool {
        match self {
            SearchScope::Project => true,
            SearchScope::UnderRoots(roots) => {
                roots.iter().any(|root| module.file.starts_with(root))
            }
        }
    }
}

/// Deterministic, deduplicated view of every module in a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulesIndex {
    source_roots: Vec<PathBuf>,
    modules: Vec<GwtModule>,
}

impl ModulesIndex {
    pub(crate) fn new(source_roots: Vec<PathBuf>, mut modules: Vec<GwtModule>) -> Self {
        modules.sort_by(|a, b| {
            a.qualified_name
                .cmp(&b.qualified_name)
                .then_with(|| a.file.cmp(&b.file))
        });
        // Qualified names are unique per scope; on collision the
        // lexicographically smaller path wins, deterministically.
        modules.dedup_by(|a, b| a.qualified_name == b.qualified_name);
        Self {
            source_roots,
            modules,
        }
    }

    pub fn modules(&self) -> &[GwtModule] {
        &self.modules
    }

    pub fn source_roots(&self) -> &[PathBuf] {
        &self.source_roots
    }

    pub fn find_by_qualified_name(
        &self,
        name: &QualifiedName,
        scope: &SearchScope,
    ) -> Option<&GwtModule> {
        self.modules
            .iter()
            .find(|m| m.qualified_name == *name && scope.admits(m))
    }

    /// Modules whose resolved source roots contain `path`.
    pub fn modules_containing_source(
        &self,
        path: &Path,
        provider: &dyn ModuleRootsProvider,
    ) -> Vec<&GwtModule> {
        self.modules
            .iter()
            .filter(|m| {
                resolve_source_roots(m, provider)
                    .iter()
                    .any(|root| path.starts_with(root))
            })
            .collect()
    }

    /// Modules whose resolved public roots contain `path`.
    pub fn modules_containing_public(
        &self,
        path: &Path,
        provider: &dyn ModuleRootsProvider,
    ) -> Vec<&GwtModule> {
        self.modules
            .iter()
            .filter(|m| {
                resolve_public_roots(m, provider)
                    .iter()
                    .any(|root| path.starts_with(root))
            })
            .collect()
    }
}

impl ModuleLookup for ModulesIndex {
    fn module_by_name(&self, name: &QualifiedName) -> Option<&GwtModule> {
        self.find_by_qualified_name(name, &SearchScope::Project)
    }
}

/// A loaded workspace: the index plus the cache that keeps reloads cheap.
///
/// Cache entries are keyed by content fingerprint, so an edited descriptor is
/// reparsed on the next [`Workspace::reload`]; a root-model change
/// ([`Workspace::set_options`]) drops the cache wholesale. Callers never
/// observe descriptors that predate either kind of change.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    options: ScanOptions,
    cache: DescriptorCache,
    index: ModulesIndex,
}

impl Workspace {
    pub fn load(root: impl AsRef<Path>, options: ScanOptions) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        let mut cache = DescriptorCache::default();
        let index = scan::scan_workspace_with_cache(&root, &options, &mut cache)?;
        Ok(Self {
            root,
            options,
            cache,
            index,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &ModulesIndex {
        &self.index
    }

    /// Re-scan the workspace; unchanged descriptors are served from cache.
    pub fn reload(&mut self) -> Result<(), ProjectError> {
        self.index = scan::scan_workspace_with_cache(&self.root, &self.options, &mut self.cache)?;
        Ok(())
    }

    /// Drop any cached state for `path` (content-version change) and re-scan.
    pub fn invalidate_file(&mut self, path: &Path) -> Result<(), ProjectError> {
        self.cache.invalidate_file(path);
        self.reload()
    }

    /// Replace the scan options (root-model change); the cache is cleared.
    pub fn set_options(&mut self, options: ScanOptions) -> Result<(), ProjectError> {
        self.options = options;
        self.cache.clear();
        self.reload()
    }
}
