use gwtkit_core::{well_known, GwtVersion};
use gwtkit_types::{ClassKind, ClassSnapshot, JavaType, MethodSnapshot, Param};

use crate::matcher::async_name_for;

/// Name given to the generated trailing callback parameter.
pub const GENERATED_CALLBACK_PARAM: &str = "async";

/// Derive the async form of a sync method.
///
/// The callback parameter is parameterized by the boxed sync return type
/// when the target version supports generics, raw otherwise. The `throws`
/// clause is dropped (async RPC methods must not declare checked
/// exceptions), as are pre-generics element-type doc hints.
pub fn async_counterpart_of(
    method: &MethodSnapshot,
    version: GwtVersion,
) -> MethodSnapshot {
    let callback_ty = if version.supports_generics() {
        JavaType::parameterized(
            well_known::ASYNC_CALLBACK,
            vec![method.return_type.boxed()],
        )
    } else {
        JavaType::named(well_known::ASYNC_CALLBACK)
    };

    let mut params = method.params.clone();
    params.push(Param::new(GENERATED_CALLBACK_PARAM, callback_ty));

    MethodSnapshot {
        name: method.name.clone(),
        type_params: method.type_params.clone(),
        params,
        return_type: JavaType::Void,
        throws: Vec::new(),
        type_args_doc: Vec::new(),
    }
}

/// Regenerate the whole async interface from its sync source.
///
/// This is the bulk "copy all" operation: whatever methods the async
/// interface previously declared are replaced wholesale.
pub fn regenerate_async(sync: &ClassSnapshot, version: GwtVersion) -> ClassSnapshot {
    ClassSnapshot {
        name: async_name_for(&sync.name),
        kind: ClassKind::Interface,
        type_params: sync.type_params.clone(),
        supertypes: Vec::new(),
        methods: sync
            .methods
            .iter()
            .map(|m| async_counterpart_of(m, version))
            .collect(),
    }
}

/// Derive the sync form of an async method: the trailing callback parameter
/// is dropped and its sole type argument, unboxed, becomes the return type
/// (`java.lang.Void` denotes `void`). When no callback parameter is present
/// or its argument cannot be inferred, the return type defaults to
/// `java.lang.Object`.
pub fn sync_counterpart_of(
    method: &MethodSnapshot,
    declaring: &ClassSnapshot,
) -> MethodSnapshot {
    let mut params = method.params.clone();
    let mut return_type = JavaType::named(well_known::JAVA_LANG_OBJECT);

    let has_callback = params.last().is_some_and(|last| {
        method
            .erase_in_scope(&last.ty, declaring)
            .is_class_named(well_known::ASYNC_CALLBACK)
    });

    if has_callback {
        if let Some(callback) = params.pop() {
            return_type = match callback.ty.type_args() {
                [JavaType::Wildcard] => JavaType::named(well_known::JAVA_LANG_OBJECT),
                [arg] => arg.unboxed(),
                _ => JavaType::named(well_known::JAVA_LANG_OBJECT),
            };
        }
    }

    MethodSnapshot {
        name: method.name.clone(),
        type_params: method.type_params.clone(),
        params,
        return_type,
        throws: Vec::new(),
        type_args_doc: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{find_method_in_async, find_method_in_sync};
    use gwtkit_core::QualifiedName;
    use gwtkit_types::PrimitiveType;
    use pretty_assertions::assert_eq;

    fn string() -> JavaType {
        JavaType::named(well_known::JAVA_LANG_STRING)
    }

    fn sync_service(methods: Vec<MethodSnapshot>) -> ClassSnapshot {
        ClassSnapshot::interface("com.example.OrderService").with_methods(methods)
    }

    #[test]
    fn generated_async_methods_round_trip_to_sync() {
        // copyMethodToAsync then findMethodInSync must recover the original.
        let sync = sync_service(vec![
            MethodSnapshot::new(
                "place",
                vec![
                    Param::new("id", string()),
                    Param::new("quantity", JavaType::Primitive(PrimitiveType::Int)),
                ],
                JavaType::named("com.example.Receipt"),
            ),
            MethodSnapshot::new("count", vec![], JavaType::Primitive(PrimitiveType::Int)),
            MethodSnapshot::new("ping", vec![], JavaType::Void),
        ]);

        let generated = regenerate_async(&sync, GwtVersion::V1_5);
        assert_eq!(generated.name.as_str(), "com.example.OrderServiceAsync");
        assert_eq!(generated.methods.len(), sync.methods.len());

        for (sync_method, async_method) in sync.methods.iter().zip(&generated.methods) {
            let recovered = find_method_in_sync(async_method, &generated, &sync)
                .expect("generated method must resolve back");
            assert_eq!(recovered, sync_method);

            let forward = find_method_in_async(sync_method, &sync, &generated)
                .expect("sync method must resolve forward");
            assert_eq!(forward, async_method);
        }
    }

    #[test]
    fn callback_parameter_is_parameterized_only_with_generics() {
        let method = MethodSnapshot::new("fetch", vec![], string());

        let generic = async_counterpart_of(&method, GwtVersion::V1_5);
        let callback = &generic.params.last().unwrap().ty;
        assert_eq!(callback.type_args(), &[string()]);

        let raw = async_counterpart_of(&method, GwtVersion::V1_4);
        assert!(raw.params.last().unwrap().ty.type_args().is_empty());
    }

    #[test]
    fn generated_callback_param_is_named_async() {
        let method = MethodSnapshot::new("fetch", vec![], string());
        let generated = async_counterpart_of(&method, GwtVersion::V1_5);
        assert_eq!(generated.params.last().unwrap().name, GENERATED_CALLBACK_PARAM);
    }

    #[test]
    fn throws_clauses_are_stripped() {
        let method = MethodSnapshot::new("fetch", vec![], string())
            .with_throws(vec![QualifiedName::new("java.io.IOException")]);
        let generated = async_counterpart_of(&method, GwtVersion::V1_5);
        assert!(generated.throws.is_empty());
    }

    #[test]
    fn primitive_and_void_returns_box_into_the_callback() {
        let count = MethodSnapshot::new("count", vec![], JavaType::Primitive(PrimitiveType::Int));
        let generated = async_counterpart_of(&count, GwtVersion::V1_5);
        assert_eq!(
            generated.params.last().unwrap().ty.type_args(),
            &[JavaType::named("java.lang.Integer")]
        );

        let ping = MethodSnapshot::new("ping", vec![], JavaType::Void);
        let generated = async_counterpart_of(&ping, GwtVersion::V1_5);
        assert_eq!(
            generated.params.last().unwrap().ty.type_args(),
            &[JavaType::named(well_known::JAVA_LANG_VOID)]
        );
    }

    #[test]
    fn sync_counterpart_unboxes_the_callback_argument() {
        let async_class = ClassSnapshot::interface("com.example.OrderServiceAsync")
            .with_methods(vec![MethodSnapshot::new(
                "count",
                vec![Param::new(
                    "callback",
                    JavaType::parameterized(
                        well_known::ASYNC_CALLBACK,
                        vec![JavaType::named("java.lang.Integer")],
                    ),
                )],
                JavaType::Void,
            )]);

        let sync = sync_counterpart_of(&async_class.methods[0], &async_class);
        assert_eq!(sync.return_type, JavaType::Primitive(PrimitiveType::Int));
        assert!(sync.params.is_empty());
    }

    #[test]
    fn boxed_void_callback_becomes_a_void_return() {
        let async_class = ClassSnapshot::interface("com.example.A").with_methods(vec![
            MethodSnapshot::new(
                "ping",
                vec![Param::new(
                    "callback",
                    JavaType::parameterized(
                        well_known::ASYNC_CALLBACK,
                        vec![JavaType::named(well_known::JAVA_LANG_VOID)],
                    ),
                )],
                JavaType::Void,
            ),
        ]);
        let sync = sync_counterpart_of(&async_class.methods[0], &async_class);
        assert_eq!(sync.return_type, JavaType::Void);
    }

    #[test]
    fn missing_or_raw_callback_defaults_to_object() {
        let async_class = ClassSnapshot::interface("com.example.A").with_methods(vec![
            MethodSnapshot::new("orphan", vec![Param::new("name", string())], JavaType::Void),
            MethodSnapshot::new(
                "raw",
                vec![Param::new("cb", JavaType::named(well_known::ASYNC_CALLBACK))],
                JavaType::Void,
            ),
        ]);

        let orphan = sync_counterpart_of(&async_class.methods[0], &async_class);
        assert_eq!(orphan.return_type, JavaType::named(well_known::JAVA_LANG_OBJECT));
        // The non-callback parameter survives.
        assert_eq!(orphan.params.len(), 1);

        let raw = sync_counterpart_of(&async_class.methods[1], &async_class);
        assert_eq!(raw.return_type, JavaType::named(well_known::JAVA_LANG_OBJECT));
        assert!(raw.params.is_empty());
    }

    #[test]
    fn regeneration_replaces_existing_methods() {
        let sync = sync_service(vec![MethodSnapshot::new("only", vec![], JavaType::Void)]);
        let generated = regenerate_async(&sync, GwtVersion::V1_6);
        // Whatever the previous async interface declared is irrelevant; the
        // output carries exactly the sync methods' counterparts.
        assert_eq!(generated.methods.len(), 1);
        assert_eq!(generated.methods[0].name, "only");
    }
}
