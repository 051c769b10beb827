//! The RPC serializability predicate.
//!
//! Serializability rules changed across GWT releases: `java.io.Serializable`
//! became a valid marker in 1.4 and parameterized collections became
//! checkable in 1.5. The checker is scoped to one detected version and is a
//! pure predicate over the class index.

use gwtkit_core::{well_known, GwtVersion, QualifiedName};
use gwtkit_types::{is_assignable_to, ClassIndex, JavaType};

pub struct SerializabilityChecker<'a> {
    version: GwtVersion,
    index: &'a dyn ClassIndex,
    check_interfaces: bool,
}

impl<'a> SerializabilityChecker<'a> {
    pub fn new(version: GwtVersion, index: &'a dyn ClassIndex) -> Self {
        Self {
            version,
            index,
            check_interfaces: true,
        }
    }

    /// Treat any interface type as serializable (callers that cannot see all
    /// implementations statically opt into this).
    pub fn lenient_interfaces(mut self) -> Self {
        self.check_interfaces = false;
        self
    }

    pub fn version(&self) -> GwtVersion {
        self.version
    }

    /// Whether `ty` may cross the RPC boundary.
    ///
    /// `hints` carries legacy `@gwt.typeArgs`-style element types for the
    /// outermost collection; nested types are checked without hints. Rule
    /// order is significant: the allowlist and marker checks must decide
    /// before the pessimistic unknown-type fallthrough.
    pub fn is_serializable(&self, ty: &JavaType, hints: &[JavaType]) -> bool {
        match ty {
            JavaType::Primitive(_) => true,
            JavaType::Void => false,
            JavaType::Array(component) => self.is_serializable(component, hints),
            // A bare type parameter cannot be refuted statically.
            JavaType::TypeVar(_) | JavaType::Wildcard => true,
            JavaType::Named { name, args } => self.is_named_serializable(name, args, hints),
        }
    }

    fn is_named_serializable(
        &self,
        name: &QualifiedName,
        args: &[JavaType],
        hints: &[JavaType],
    ) -> bool {
        if well_known::is_standard_serializable(name.as_str()) {
            return true;
        }

        // Collections are decided here: either provably-serializable element
        // types (generics) or explicit legacy hints, otherwise rejected.
        if well_known::is_collection_class(name.as_str()) {
            if self.version.supports_generics()
                && !args.is_empty()
                && args.iter().all(|arg| self.is_serializable(arg, &[]))
            {
                return true;
            }
            if !hints.is_empty() && hints.iter().all(|hint| self.is_serializable(hint, &[])) {
                return true;
            }
            return false;
        }

        if is_assignable_to(
            self.index,
            name,
            &QualifiedName::new(well_known::IS_SERIALIZABLE),
        ) {
            return true;
        }
        if self.version.supports_java_io_serializable()
            && is_assignable_to(
                self.index,
                name,
                &QualifiedName::new(well_known::JAVA_IO_SERIALIZABLE),
            )
        {
            return true;
        }

        if !self.check_interfaces {
            if let Some(class) = self.index.class(name) {
                if class.is_interface() {
                    return true;
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwtkit_types::{ClassSnapshot, PrimitiveType, SnapshotIndex};

    const VERSIONS: [GwtVersion; 4] = [
        GwtVersion::V1_0,
        GwtVersion::V1_4,
        GwtVersion::V1_5,
        GwtVersion::V1_6,
    ];

    fn index() -> SnapshotIndex {
        [
            ClassSnapshot::interface(well_known::IS_SERIALIZABLE),
            ClassSnapshot::class("com.example.Dto")
                .extending(JavaType::named(well_known::IS_SERIALIZABLE)),
            ClassSnapshot::class("com.example.JavaIoDto")
                .extending(JavaType::named(well_known::JAVA_IO_SERIALIZABLE)),
            ClassSnapshot::class("com.example.SubDto")
                .extending(JavaType::named("com.example.Dto")),
            ClassSnapshot::class("com.example.Plain"),
            ClassSnapshot::interface("com.example.Shape"),
        ]
        .into_iter()
        .collect()
    }

    fn string() -> JavaType {
        JavaType::named(well_known::JAVA_LANG_STRING)
    }

    #[test]
    fn primitives_and_their_arrays_are_always_serializable() {
        let index = index();
        let checker = SerializabilityChecker::new(GwtVersion::V1_0, &index);
        let int = JavaType::Primitive(PrimitiveType::Int);
        assert!(checker.is_serializable(&int, &[]));
        assert!(checker.is_serializable(&JavaType::array(int), &[]));
    }

    #[test]
    fn array_serializability_follows_the_component() {
        let index = index();
        let checker = SerializabilityChecker::new(GwtVersion::V1_5, &index);
        assert!(checker.is_serializable(&JavaType::array(string()), &[]));
        assert!(!checker.is_serializable(
            &JavaType::array(JavaType::named("com.example.Plain")),
            &[]
        ));
    }

    #[test]
    fn jdk_value_allowlist_applies() {
        let index = index();
        let checker = SerializabilityChecker::new(GwtVersion::V1_0, &index);
        assert!(checker.is_serializable(&string(), &[]));
        assert!(checker.is_serializable(&JavaType::named("java.util.Date"), &[]));
        assert!(checker.is_serializable(&JavaType::named("java.lang.Integer"), &[]));
    }

    #[test]
    fn marker_interfaces_apply_transitively() {
        let index = index();
        let checker = SerializabilityChecker::new(GwtVersion::V1_0, &index);
        assert!(checker.is_serializable(&JavaType::named("com.example.Dto"), &[]));
        assert!(checker.is_serializable(&JavaType::named("com.example.SubDto"), &[]));
        assert!(!checker.is_serializable(&JavaType::named("com.example.Plain"), &[]));
    }

    #[test]
    fn java_io_serializable_is_gated_on_version() {
        let index = index();
        let ty = JavaType::named("com.example.JavaIoDto");

        let old = SerializabilityChecker::new(GwtVersion::V1_0, &index);
        assert!(!old.is_serializable(&ty, &[]));

        let new = SerializabilityChecker::new(GwtVersion::V1_4, &index);
        assert!(new.is_serializable(&ty, &[]));
    }

    #[test]
    fn parameterized_collections_need_generics_support() {
        let index = index();
        let list = JavaType::parameterized("java.util.List", vec![string()]);

        let pre_generics = SerializabilityChecker::new(GwtVersion::V1_4, &index);
        assert!(!pre_generics.is_serializable(&list, &[]));

        let with_generics = SerializabilityChecker::new(GwtVersion::V1_5, &index);
        assert!(with_generics.is_serializable(&list, &[]));

        let bad_element = JavaType::parameterized(
            "java.util.List",
            vec![JavaType::named("com.example.Plain")],
        );
        assert!(!with_generics.is_serializable(&bad_element, &[]));
    }

    #[test]
    fn legacy_hints_cover_raw_collections() {
        let index = index();
        let raw_list = JavaType::named("java.util.List");

        let checker = SerializabilityChecker::new(GwtVersion::V1_4, &index);
        assert!(!checker.is_serializable(&raw_list, &[]));
        assert!(checker.is_serializable(&raw_list, &[string()]));
        assert!(!checker.is_serializable(&raw_list, &[JavaType::named("com.example.Plain")]));
    }

    #[test]
    fn hints_do_not_leak_into_nested_types() {
        let index = index();
        let checker = SerializabilityChecker::new(GwtVersion::V1_5, &index);
        // List<List> — the inner raw list gets no hints and fails.
        let nested = JavaType::parameterized(
            "java.util.List",
            vec![JavaType::named("java.util.List")],
        );
        assert!(!checker.is_serializable(&nested, &[string()]));
    }

    #[test]
    fn type_parameters_are_optimistically_serializable() {
        let index = index();
        let checker = SerializabilityChecker::new(GwtVersion::V1_5, &index);
        assert!(checker.is_serializable(&JavaType::TypeVar("T".into()), &[]));
    }

    #[test]
    fn unknown_interfaces_depend_on_the_interface_check_toggle() {
        let index = index();
        let shape = JavaType::named("com.example.Shape");

        let strict = SerializabilityChecker::new(GwtVersion::V1_5, &index);
        assert!(!strict.is_serializable(&shape, &[]));

        let lenient = SerializabilityChecker::new(GwtVersion::V1_5, &index).lenient_interfaces();
        assert!(lenient.is_serializable(&shape, &[]));
        // Leniency never extends to concrete classes.
        assert!(!lenient.is_serializable(&JavaType::named("com.example.Plain"), &[]));
    }

    #[test]
    fn serializability_is_monotone_across_versions() {
        let index = index();
        let samples = [
            JavaType::Primitive(PrimitiveType::Long),
            string(),
            JavaType::named("com.example.Dto"),
            JavaType::named("com.example.JavaIoDto"),
            JavaType::named("com.example.Plain"),
            JavaType::parameterized("java.util.List", vec![string()]),
            JavaType::named("java.util.List"),
            JavaType::array(JavaType::named("com.example.JavaIoDto")),
        ];

        for ty in &samples {
            for pair in VERSIONS.windows(2) {
                let older = SerializabilityChecker::new(pair[0], &index);
                let newer = SerializabilityChecker::new(pair[1], &index);
                assert!(
                    !older.is_serializable(ty, &[]) || newer.is_serializable(ty, &[]),
                    "{ty} serializable under {} but not {}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }
}
