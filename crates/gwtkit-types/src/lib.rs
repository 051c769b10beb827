//! Immutable Java type, class, and method snapshots.
//!
//! Snapshots are produced by an external front-end (a parser, an index, a
//! test fixture) and passed by value into the resolution and matching logic;
//! no snapshot holds a handle back into whatever produced it.

use std::collections::HashSet;
use std::fmt;

use gwtkit_core::{well_known, QualifiedName};
use serde::{Deserialize, Serialize};

mod index;
mod snapshot;

pub use index::{is_assignable_to, supertype_closure, ClassIndex, SnapshotIndex};
pub use snapshot::{ClassKind, ClassSnapshot, MethodSnapshot, Param};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Double => "double",
            PrimitiveType::Float => "float",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Short => "short",
        }
    }

    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Double => "java.lang.Double",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Short => "java.lang.Short",
        }
    }

    pub fn from_boxed_name(name: &str) -> Option<Self> {
        let ty = match name {
            "java.lang.Boolean" => PrimitiveType::Boolean,
            "java.lang.Byte" => PrimitiveType::Byte,
            "java.lang.Character" => PrimitiveType::Char,
            "java.lang.Double" => PrimitiveType::Double,
            "java.lang.Float" => PrimitiveType::Float,
            "java.lang.Integer" => PrimitiveType::Int,
            "java.lang.Long" => PrimitiveType::Long,
            "java.lang.Short" => PrimitiveType::Short,
            _ => return None,
        };
        Some(ty)
    }
}

/// A declared Java type as it appears in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JavaType {
    Primitive(PrimitiveType),
    Void,
    Named {
        name: QualifiedName,
        args: Vec<JavaType>,
    },
    Array(Box<JavaType>),
    TypeVar(String),
    Wildcard,
}

impl JavaType {
    pub fn named(name: impl Into<String>) -> Self {
        JavaType::Named {
            name: QualifiedName::new(name),
            args: Vec::new(),
        }
    }

    pub fn parameterized(name: impl Into<String>, args: Vec<JavaType>) -> Self {
        JavaType::Named {
            name: QualifiedName::new(name),
            args,
        }
    }

    pub fn array(component: JavaType) -> Self {
        JavaType::Array(Box::new(component))
    }

    pub fn class_name(&self) -> Option<&QualifiedName> {
        match self {
            JavaType::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn type_args(&self) -> &[JavaType] {
        match self {
            JavaType::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// The reference-type view of this type: primitives box, `void` becomes
    /// `java.lang.Void`, everything else is unchanged.
    pub fn boxed(&self) -> JavaType {
        match self {
            JavaType::Primitive(p) => JavaType::named(p.boxed_name()),
            JavaType::Void => JavaType::named(well_known::JAVA_LANG_VOID),
            other => other.clone(),
        }
    }

    /// Inverse of [`JavaType::boxed`] where a primitive counterpart exists.
    pub fn unboxed(&self) -> JavaType {
        if let JavaType::Named { name, args } = self {
            if args.is_empty() {
                if name.as_str() == well_known::JAVA_LANG_VOID {
                    return JavaType::Void;
                }
                if let Some(p) = PrimitiveType::from_boxed_name(name.as_str()) {
                    return JavaType::Primitive(p);
                }
            }
        }
        self.clone()
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Primitive(p) => f.write_str(p.name()),
            JavaType::Void => f.write_str("void"),
            JavaType::Named { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            JavaType::Array(component) => write!(f, "{component}[]"),
            JavaType::TypeVar(name) => f.write_str(name),
            JavaType::Wildcard => f.write_str("?"),
        }
    }
}

/// A declared type parameter with an optional upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    #[serde(default)]
    pub bound: Option<JavaType>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: None,
        }
    }

    pub fn bounded(name: impl Into<String>, bound: JavaType) -> Self {
        Self {
            name: name.into(),
            bound: Some(bound),
        }
    }
}

/// The generic-stripped form of a type, used for structural signature
/// comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Erasure {
    Primitive(PrimitiveType),
    Void,
    Class(QualifiedName),
    Array(Box<Erasure>),
}

impl Erasure {
    pub fn class(name: &str) -> Self {
        Erasure::Class(QualifiedName::new(name))
    }

    pub fn is_class_named(&self, name: &str) -> bool {
        matches!(self, Erasure::Class(n) if n.as_str() == name)
    }
}

impl fmt::Display for Erasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Erasure::Primitive(p) => f.write_str(p.name()),
            Erasure::Void => f.write_str("void"),
            Erasure::Class(name) => write!(f, "{name}"),
            Erasure::Array(component) => write!(f, "{component}[]"),
        }
    }
}

/// Erase `ty` against a stack of type-parameter scopes.
///
/// Scopes are searched front to back, so pass the innermost scope (method
/// type parameters) first. A type variable erases to the erasure of its first
/// declared bound, or `java.lang.Object` when unbounded or undeclared.
pub fn erase(ty: &JavaType, scopes: &[&[TypeParam]]) -> Erasure {
    erase_guarded(ty, scopes, &mut HashSet::new())
}

fn erase_guarded<'a>(
    ty: &'a JavaType,
    scopes: &[&'a [TypeParam]],
    in_progress: &mut HashSet<&'a str>,
) -> Erasure {
    match ty {
        JavaType::Primitive(p) => Erasure::Primitive(*p),
        JavaType::Void => Erasure::Void,
        JavaType::Named { name, .. } => Erasure::Class(name.clone()),
        JavaType::Array(component) => {
            Erasure::Array(Box::new(erase_guarded(component, scopes, in_progress)))
        }
        JavaType::Wildcard => Erasure::class(well_known::JAVA_LANG_OBJECT),
        JavaType::TypeVar(var) => {
            // Malformed snapshots may declare mutually-bounded variables;
            // the in-progress set keeps the walk finite.
            if !in_progress.insert(var.as_str()) {
                return Erasure::class(well_known::JAVA_LANG_OBJECT);
            }
            let bound = scopes
                .iter()
                .find_map(|scope| scope.iter().find(|tp| tp.name == *var))
                .and_then(|tp| tp.bound.as_ref());
            let erased = match bound {
                Some(bound) => erase_guarded(bound, scopes, in_progress),
                None => Erasure::class(well_known::JAVA_LANG_OBJECT),
            };
            in_progress.remove(var.as_str());
            erased
        }
    }
}
