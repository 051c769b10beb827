//! GWT module descriptors and the module model resolver.
//!
//! A `*.gwt.xml` file is parsed into an immutable [`ModuleDescriptor`];
//! derived views (qualified names, source/public roots, inheritance) are
//! computed on demand by the functions in [`resolve`].

mod descriptor;
pub mod resolve;

pub use descriptor::{
    parse_descriptor, read_descriptor, DescriptorError, ModuleDescriptor, ParseError, Servlet,
};
pub use resolve::{
    inherited_closure, is_inherited_or_self, qualified_name_for, resolve_inherits,
    resolve_public_roots, resolve_source_roots, DescriptorDirRoots, GwtModule, ModuleLookup,
    ModuleRootsProvider,
};
