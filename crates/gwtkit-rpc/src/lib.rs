//! Static reconciliation of GWT RPC service interface pairs.
//!
//! A synchronous `RemoteService` interface and its `<Name>Async` counterpart
//! are matched method-by-method on erased signatures. Absence of a
//! counterpart is a normal state (the two interfaces are routinely out of
//! sync while being edited), so every lookup returns an `Option` and the
//! pair-level reconciliation reports diagnostics instead of failing.

use gwtkit_core::{well_known, QualifiedName};
use gwtkit_types::{is_assignable_to, ClassIndex, ClassSnapshot};

mod generate;
mod matcher;
pub mod serial;

pub use generate::{
    async_counterpart_of, regenerate_async, sync_counterpart_of, GENERATED_CALLBACK_PARAM,
};
pub use matcher::{
    async_name_for, find_method_in_async, find_method_in_sync, reconcile_service_pair,
    sync_name_for, MethodPair, ServicePairReport,
};
pub use serial::SerializabilityChecker;

/// Whether `name` denotes a synchronous RPC service interface: an interface
/// that transitively extends the `RemoteService` marker.
pub fn is_remote_service_interface(index: &dyn ClassIndex, name: &QualifiedName) -> bool {
    if name.as_str() == well_known::REMOTE_SERVICE {
        return false;
    }
    let Some(class) = index.class(name) else {
        return false;
    };
    class.is_interface()
        && is_assignable_to(index, name, &QualifiedName::new(well_known::REMOTE_SERVICE))
}

/// Whether `name` denotes a server-side RPC implementation: a concrete class
/// transitively extending `RemoteServiceServlet`.
pub fn is_remote_service_impl(index: &dyn ClassIndex, name: &QualifiedName) -> bool {
    if name.as_str() == well_known::REMOTE_SERVICE_SERVLET {
        return false;
    }
    let Some(class) = index.class(name) else {
        return false;
    };
    !class.is_interface()
        && is_assignable_to(
            index,
            name,
            &QualifiedName::new(well_known::REMOTE_SERVICE_SERVLET),
        )
}

/// Find the async counterpart class of a sync service in `index`.
pub fn find_async_class<'a>(
    index: &'a dyn ClassIndex,
    sync: &ClassSnapshot,
) -> Option<&'a ClassSnapshot> {
    index.class(&async_name_for(&sync.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwtkit_types::{JavaType, SnapshotIndex};

    fn index() -> SnapshotIndex {
        [
            ClassSnapshot::interface(well_known::REMOTE_SERVICE),
            ClassSnapshot::interface("com.example.BaseService")
                .extending(JavaType::named(well_known::REMOTE_SERVICE)),
            ClassSnapshot::interface("com.example.MailService")
                .extending(JavaType::named("com.example.BaseService")),
            ClassSnapshot::class(well_known::REMOTE_SERVICE_SERVLET),
            ClassSnapshot::class("com.example.MailServiceImpl")
                .extending(JavaType::named(well_known::REMOTE_SERVICE_SERVLET))
                .extending(JavaType::named("com.example.MailService")),
            ClassSnapshot::interface("com.example.NotAService"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn service_interfaces_are_detected_transitively() {
        let index = index();
        assert!(is_remote_service_interface(
            &index,
            &QualifiedName::new("com.example.MailService")
        ));
        assert!(!is_remote_service_interface(
            &index,
            &QualifiedName::new("com.example.NotAService")
        ));
        // The marker itself is not a service.
        assert!(!is_remote_service_interface(
            &index,
            &QualifiedName::new(well_known::REMOTE_SERVICE)
        ));
    }

    #[test]
    fn implementations_must_be_concrete_classes() {
        let index = index();
        assert!(is_remote_service_impl(
            &index,
            &QualifiedName::new("com.example.MailServiceImpl")
        ));
        // An interface extending the servlet hierarchy does not count.
        assert!(!is_remote_service_impl(
            &index,
            &QualifiedName::new("com.example.MailService")
        ));
        assert!(!is_remote_service_impl(
            &index,
            &QualifiedName::new(well_known::REMOTE_SERVICE_SERVLET)
        ));
    }

    #[test]
    fn absent_classes_are_not_services() {
        let index = index();
        assert!(!is_remote_service_interface(
            &index,
            &QualifiedName::new("com.example.Missing")
        ));
        assert!(!is_remote_service_impl(
            &index,
            &QualifiedName::new("com.example.Missing")
        ));
    }
}
