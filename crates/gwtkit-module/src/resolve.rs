//! Derived views over module descriptors: names, roots, inheritance.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use gwtkit_core::{well_known, QualifiedName};

use crate::{DescriptorError, ModuleDescriptor};

/// A descriptor bound to its file and derived qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GwtModule {
    pub qualified_name: QualifiedName,
    pub file: PathBuf,
    pub descriptor: ModuleDescriptor,
}

impl GwtModule {
    pub fn short_name(&self) -> &str {
        self.qualified_name.short_name()
    }
}

/// Derive a module's qualified name from its file path.
///
/// The name is the path relative to the first source root containing the
/// file, with separators replaced by dots and the `.gwt.xml` suffix removed.
pub fn qualified_name_for(
    file: &Path,
    source_roots: &[PathBuf],
) -> Result<QualifiedName, DescriptorError> {
    for root in source_roots {
        let Ok(relative) = file.strip_prefix(root) else {
            continue;
        };
        let mut segments: Vec<&str> = Vec::new();
        for component in relative.components() {
            let std::path::Component::Normal(part) = component else {
                segments.clear();
                break;
            };
            let Some(part) = part.to_str() else {
                segments.clear();
                break;
            };
            segments.push(part);
        }
        let Some(last) = segments.last_mut() else {
            continue;
        };
        let Some(stem) = last.strip_suffix(well_known::GWT_XML_SUFFIX) else {
            continue;
        };
        *last = stem;
        return Ok(QualifiedName::new(segments.join(".")));
    }

    Err(DescriptorError::NotUnderSourceRoot {
        path: file.to_path_buf(),
    })
}

/// Supplies the candidate base directories a module's relative paths resolve
/// against.
///
/// The module root is the package directory holding the descriptor; when the
/// owning package maps to several directories under the dependency scope,
/// providers return all of them, in a stable order.
pub trait ModuleRootsProvider {
    fn module_roots(&self, module: &GwtModule) -> Vec<PathBuf>;
}

/// The minimal provider: only the descriptor's own directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptorDirRoots;

impl ModuleRootsProvider for DescriptorDirRoots {
    fn module_roots(&self, module: &GwtModule) -> Vec<PathBuf> {
        module.file.parent().map(Path::to_path_buf).into_iter().collect()
    }
}

/// Resolve the module's source roots.
///
/// With no declared source paths, a single `client` child directory under
/// each module root is probed. Otherwise every declared path is resolved
/// against every module root, in declaration order. Paths that do not exist
/// are silently skipped, and duplicates are kept: several module roots may
/// legitimately contribute the same directory.
pub fn resolve_source_roots(
    module: &GwtModule,
    provider: &dyn ModuleRootsProvider,
) -> Vec<PathBuf> {
    resolve_roots(
        module,
        provider,
        &module.descriptor.source_paths,
        well_known::DEFAULT_SOURCE_PATH,
    )
}

/// Resolve the module's public (static resource) roots; same rules as
/// [`resolve_source_roots`] with a `public` default.
pub fn resolve_public_roots(
    module: &GwtModule,
    provider: &dyn ModuleRootsProvider,
) -> Vec<PathBuf> {
    resolve_roots(
        module,
        provider,
        &module.descriptor.public_paths,
        well_known::DEFAULT_PUBLIC_PATH,
    )
}

fn resolve_roots(
    module: &GwtModule,
    provider: &dyn ModuleRootsProvider,
    declared: &[String],
    default: &str,
) -> Vec<PathBuf> {
    let module_roots = provider.module_roots(module);
    let mut out = Vec::new();

    if declared.is_empty() {
        for root in &module_roots {
            let candidate = root.join(default);
            if candidate.is_dir() {
                out.push(candidate);
            }
        }
        return out;
    }

    for path in declared {
        let mut found = false;
        for root in &module_roots {
            let candidate = root.join(path);
            if candidate.is_dir() {
                out.push(candidate);
                found = true;
            }
        }
        if !found {
            tracing::debug!(
                target = "gwtkit.module",
                module = %module.qualified_name,
                path,
                "declared path resolves to no existing directory"
            );
        }
    }

    out
}

/// The transitive inheritance closure of `module`, excluding `module`
/// itself, in breadth-first encounter order. References that do not resolve
/// in scope are dropped, and cycles are tolerated.
pub fn inherited_closure<'a>(
    module: &GwtModule,
    lookup: &'a dyn ModuleLookup,
) -> Vec<&'a GwtModule> {
    let mut seen: HashSet<QualifiedName> = HashSet::new();
    let mut out: Vec<&'a GwtModule> = Vec::new();
    let mut queue: VecDeque<&GwtModule> = VecDeque::new();
    seen.insert(module.qualified_name.clone());
    queue.push_back(module);

    while let Some(current) = queue.pop_front() {
        for name in &current.descriptor.inherits {
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(inherited) = lookup.module_by_name(name) {
                out.push(inherited);
                queue.push_back(inherited);
            }
        }
    }

    out
}

/// Lookup of modules by qualified name within some search scope.
pub trait ModuleLookup {
    fn module_by_name(&self, name: &QualifiedName) -> Option<&GwtModule>;
}

/// Resolve the single level of `<inherits>` references.
///
/// Entries that do not resolve in scope are dropped: GWT modules routinely
/// inherit libraries that are not part of the current project.
pub fn resolve_inherits<'a>(
    module: &GwtModule,
    lookup: &'a dyn ModuleLookup,
) -> Vec<&'a GwtModule> {
    module
        .descriptor
        .inherits
        .iter()
        .filter_map(|name| lookup.module_by_name(name))
        .collect()
}

/// Whether `candidate` names `module` itself or any transitively inherited
/// module.
///
/// Inheritance graphs are author-controlled and may be cyclic; the visited
/// set makes the walk terminate, and an exhausted graph answers `false`.
pub fn is_inherited_or_self(
    lookup: &dyn ModuleLookup,
    module: &GwtModule,
    candidate: &QualifiedName,
) -> bool {
    if module.qualified_name == *candidate {
        return true;
    }

    let mut seen: HashSet<QualifiedName> = HashSet::new();
    let mut queue: VecDeque<&GwtModule> = VecDeque::new();
    seen.insert(module.qualified_name.clone());
    queue.push_back(module);

    while let Some(current) = queue.pop_front() {
        for name in &current.descriptor.inherits {
            if name == candidate {
                return true;
            }
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(inherited) = lookup.module_by_name(name) {
                queue.push_back(inherited);
            }
        }
    }

    false
}
