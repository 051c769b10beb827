use gwtkit_core::QualifiedName;
use serde::{Deserialize, Serialize};

use crate::{erase, Erasure, JavaType, TypeParam};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

/// A formal method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: JavaType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: JavaType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A method as declared on a class snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSnapshot {
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub params: Vec<Param>,
    pub return_type: JavaType,
    #[serde(default)]
    pub throws: Vec<QualifiedName>,
    /// Legacy pre-generics element-type hints (`@gwt.typeArgs`-style javadoc),
    /// consumed by the serializability checker and dropped on regeneration.
    #[serde(default)]
    pub type_args_doc: Vec<JavaType>,
}

impl MethodSnapshot {
    pub fn new(name: impl Into<String>, params: Vec<Param>, return_type: JavaType) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params,
            return_type,
            throws: Vec::new(),
            type_args_doc: Vec::new(),
        }
    }

    pub fn with_throws(mut self, throws: Vec<QualifiedName>) -> Self {
        self.throws = throws;
        self
    }

    /// Erased parameter types, with the declaring class's type parameters in
    /// scope behind the method's own.
    pub fn erased_params(&self, declaring: &ClassSnapshot) -> Vec<Erasure> {
        let scopes = [self.type_params.as_slice(), declaring.type_params.as_slice()];
        self.params
            .iter()
            .map(|p| erase(&p.ty, &scopes))
            .collect()
    }

    pub fn erased_return(&self, declaring: &ClassSnapshot) -> Erasure {
        let scopes = [self.type_params.as_slice(), declaring.type_params.as_slice()];
        erase(&self.return_type, &scopes)
    }

    /// Erase an arbitrary type in this method's scope.
    pub fn erase_in_scope(&self, ty: &JavaType, declaring: &ClassSnapshot) -> Erasure {
        let scopes = [self.type_params.as_slice(), declaring.type_params.as_slice()];
        erase(ty, &scopes)
    }
}

/// An immutable view of one Java class or interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSnapshot {
    pub name: QualifiedName,
    pub kind: ClassKind,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    /// Declared supertypes: `extends` and `implements` clauses, in order.
    #[serde(default)]
    pub supertypes: Vec<JavaType>,
    #[serde(default)]
    pub methods: Vec<MethodSnapshot>,
}

impl ClassSnapshot {
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: QualifiedName::new(name),
            kind: ClassKind::Interface,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: QualifiedName::new(name),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extending(mut self, supertype: JavaType) -> Self {
        self.supertypes.push(supertype);
        self
    }

    pub fn with_methods(mut self, methods: Vec<MethodSnapshot>) -> Self {
        self.methods = methods;
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Methods sharing `name`, in declaration order.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodSnapshot> {
        self.methods.iter().filter(move |m| m.name == name)
    }
}
