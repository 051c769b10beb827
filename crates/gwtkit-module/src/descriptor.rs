use std::path::{Path, PathBuf};

use gwtkit_core::QualifiedName;
use thiserror::Error;

/// A `<servlet path="..." class="..."/>` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Servlet {
    pub url_pattern: String,
    pub class_name: QualifiedName,
}

/// Parsed contents of one `*.gwt.xml` module descriptor.
///
/// Paths are stored exactly as declared; the `"client"`/`"public"` defaults
/// are applied at resolution time, not here, so an empty list remains
/// distinguishable from an explicit declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub entry_points: Vec<QualifiedName>,
    pub source_paths: Vec<String>,
    pub public_paths: Vec<String>,
    pub inherits: Vec<QualifiedName>,
    pub servlets: Vec<Servlet>,
    pub stylesheets: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{found}>, expected <module>")]
    NotAModule { found: String },
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// The descriptor file is not under any recognized source root. Unlike an
    /// unresolved module reference this is an invariant violation on the
    /// caller's side, so it is a hard error rather than an empty result.
    #[error("descriptor {path} is not under any recognized source root")]
    NotUnderSourceRoot { path: PathBuf },
}

/// Parse descriptor XML.
///
/// Unknown elements (and known elements missing their defining attribute)
/// are skipped: module files carry plenty of configuration this model does
/// not cover, and GWT itself is lenient here.
pub fn parse_descriptor(text: &str) -> Result<ModuleDescriptor, ParseError> {
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "module" {
        return Err(ParseError::NotAModule {
            found: root.tag_name().name().to_string(),
        });
    }

    let mut descriptor = ModuleDescriptor::default();

    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "entry-point" => {
                if let Some(class) = child.attribute("class") {
                    descriptor.entry_points.push(QualifiedName::new(class));
                }
            }
            "source" => {
                if let Some(path) = child.attribute("path") {
                    push_unique(&mut descriptor.source_paths, path);
                }
            }
            "public" => {
                if let Some(path) = child.attribute("path") {
                    push_unique(&mut descriptor.public_paths, path);
                }
            }
            "inherits" => {
                if let Some(name) = child.attribute("name") {
                    descriptor.inherits.push(QualifiedName::new(name));
                }
            }
            "servlet" => {
                if let (Some(path), Some(class)) =
                    (child.attribute("path"), child.attribute("class"))
                {
                    descriptor.servlets.push(Servlet {
                        url_pattern: path.to_string(),
                        class_name: QualifiedName::new(class),
                    });
                }
            }
            "stylesheet" => {
                if let Some(src) = child.attribute("src") {
                    descriptor.stylesheets.push(src.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(descriptor)
}

/// Read and parse a descriptor file.
pub fn read_descriptor(path: &Path) -> Result<ModuleDescriptor, DescriptorError> {
    let text = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_descriptor(&text).map_err(|source| DescriptorError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// Declared path lists have set semantics but keep declaration order.
fn push_unique(paths: &mut Vec<String>, path: &str) {
    if !paths.iter().any(|p| p == path) {
        paths.push(path.to_string());
    }
}
