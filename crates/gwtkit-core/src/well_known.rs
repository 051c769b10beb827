//! The single table of well-known GWT and JDK class names.
//!
//! Every checker and resolver consumes these constants; nothing else in the
//! workspace is allowed to spell these strings inline.

/// Marker interface extended by every synchronous RPC service interface.
pub const REMOTE_SERVICE: &str = "com.google.gwt.user.client.rpc.RemoteService";

/// Callback interface carried as the trailing parameter of async RPC methods.
pub const ASYNC_CALLBACK: &str = "com.google.gwt.user.client.rpc.AsyncCallback";

/// Pre-1.4 serializability marker interface.
pub const IS_SERIALIZABLE: &str = "com.google.gwt.user.client.rpc.IsSerializable";

/// Server-side base class of RPC service implementations.
pub const REMOTE_SERVICE_SERVLET: &str =
    "com.google.gwt.user.server.rpc.RemoteServiceServlet";

pub const JAVA_IO_SERIALIZABLE: &str = "java.io.Serializable";
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
pub const JAVA_LANG_STRING: &str = "java.lang.String";
pub const JAVA_LANG_VOID: &str = "java.lang.Void";

/// Name suffix pairing an async interface with its synchronous counterpart.
pub const ASYNC_SUFFIX: &str = "Async";

/// File suffix of GWT module descriptors.
pub const GWT_XML_SUFFIX: &str = ".gwt.xml";

/// Implicit source path when a descriptor declares none.
pub const DEFAULT_SOURCE_PATH: &str = "client";

/// Implicit public path when a descriptor declares none.
pub const DEFAULT_PUBLIC_PATH: &str = "public";

/// JDK value types that are always RPC-serializable.
pub const STANDARD_SERIALIZABLE: &[&str] = &[
    JAVA_LANG_STRING,
    "java.util.Date",
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Double",
    "java.lang.Float",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Short",
];

/// Collection types the RPC subsystem special-cases: serializable when their
/// element types are provably serializable (via generics or legacy doc hints).
pub const COLLECTION_CLASSES: &[&str] = &[
    "java.util.Collection",
    "java.util.List",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.Vector",
    "java.util.Stack",
    "java.util.Set",
    "java.util.HashSet",
    "java.util.SortedSet",
    "java.util.TreeSet",
    "java.util.Map",
    "java.util.HashMap",
    "java.util.SortedMap",
    "java.util.TreeMap",
];

pub fn is_standard_serializable(name: &str) -> bool {
    STANDARD_SERIALIZABLE.contains(&name)
}

pub fn is_collection_class(name: &str) -> bool {
    COLLECTION_CLASSES.contains(&name)
}
