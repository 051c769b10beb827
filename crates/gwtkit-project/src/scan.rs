use std::path::{Path, PathBuf};

use gwtkit_core::well_known;
use gwtkit_module::{qualified_name_for, GwtModule};

use crate::{DescriptorCache, ModulesIndex, ProjectError, ScanOptions};

/// Scan `root` for GWT modules without reusing any cached state.
pub fn scan_workspace(root: &Path, options: &ScanOptions) -> Result<ModulesIndex, ProjectError> {
    scan_workspace_with_cache(root, options, &mut DescriptorCache::default())
}

pub(crate) fn scan_workspace_with_cache(
    root: &Path,
    options: &ScanOptions,
    cache: &mut DescriptorCache,
) -> Result<ModulesIndex, ProjectError> {
    let source_roots = source_roots(root, options)?;

    let mut modules = Vec::new();
    for source_root in &source_roots {
        for entry in walkdir::WalkDir::new(source_root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_descriptor_path(path) {
                continue;
            }
            let Some(module) = load_module(path, &source_roots, cache) else {
                continue;
            };
            modules.push(module);
        }
    }

    Ok(ModulesIndex::new(source_roots, modules))
}

fn source_roots(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>, ProjectError> {
    let mut roots = Vec::new();

    if options.source_roots.is_empty() {
        // Default discovery: `src/` when present, otherwise the workspace
        // root itself holds the package tree.
        let src = root.join("src");
        if src.is_dir() {
            roots.push(src);
        } else if root.is_dir() {
            roots.push(root.to_path_buf());
        }
    } else {
        for declared in &options.source_roots {
            let resolved = if declared.is_absolute() {
                declared.clone()
            } else {
                root.join(declared)
            };
            if resolved.is_dir() {
                roots.push(resolved);
            }
        }
    }

    for extra in &options.extra_source_roots {
        let resolved = if extra.is_absolute() {
            extra.clone()
        } else {
            root.join(extra)
        };
        if resolved.is_dir() && !roots.contains(&resolved) {
            roots.push(resolved);
        }
    }

    if roots.is_empty() {
        return Err(ProjectError::UnknownWorkspace {
            root: root.to_path_buf(),
        });
    }

    Ok(roots)
}

fn is_descriptor_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(well_known::GWT_XML_SUFFIX))
}

// Best-effort: descriptors may disappear or be mid-edit during a scan, so
// unreadable or unparsable files are skipped, not fatal.
fn load_module(
    path: &Path,
    source_roots: &[PathBuf],
    cache: &mut DescriptorCache,
) -> Option<GwtModule> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(
                    target = "gwtkit.project",
                    path = %path.display(),
                    error = %err,
                    "failed to read module descriptor during scan"
                );
            }
            return None;
        }
    };

    let descriptor = match cache.get_or_parse(path, &text) {
        Ok(descriptor) => descriptor.clone(),
        Err(err) => {
            tracing::debug!(
                target = "gwtkit.project",
                path = %path.display(),
                error = %err,
                "skipping unparsable module descriptor"
            );
            return None;
        }
    };

    let qualified_name = match qualified_name_for(path, source_roots) {
        Ok(name) => name,
        Err(err) => {
            // Cannot happen for files found under a scanned root, but a
            // symlinked walk may surface paths the prefix check rejects.
            tracing::debug!(
                target = "gwtkit.project",
                path = %path.display(),
                error = %err,
                "descriptor not attributable to a source root"
            );
            return None;
        }
    };

    Some(GwtModule {
        qualified_name,
        file: path.to_path_buf(),
        descriptor,
    })
}
