use gwtkit_core::{well_known, Diagnostic, QualifiedName};
use gwtkit_types::{ClassSnapshot, Erasure, MethodSnapshot};

/// `com.example.MailService` -> `com.example.MailServiceAsync`.
pub fn async_name_for(sync: &QualifiedName) -> QualifiedName {
    sync.with_suffix(well_known::ASYNC_SUFFIX)
}

/// Inverse of [`async_name_for`]; `None` when the name lacks the suffix.
pub fn sync_name_for(async_name: &QualifiedName) -> Option<QualifiedName> {
    async_name
        .as_str()
        .strip_suffix(well_known::ASYNC_SUFFIX)
        .filter(|stripped| !stripped.is_empty() && !stripped.ends_with('.'))
        .map(QualifiedName::new)
}

/// The erased type the callback of a matching async method must carry:
/// the sync return type boxed (`void` becomes `java.lang.Void`).
fn callback_result_erasure(sync_method: &MethodSnapshot, sync_class: &ClassSnapshot) -> Erasure {
    sync_method.erase_in_scope(&sync_method.return_type.boxed(), sync_class)
}

/// Find the async counterpart of `sync_method` in `async_class`.
///
/// Candidates are same-named methods scanned in declaration order; the first
/// structural match wins, which is the defined policy for name-only
/// overloads. A match requires a `void` return, the sync parameters plus one,
/// pairwise-equal erased leading parameters, a trailing `AsyncCallback`, and
/// — unless the callback is used raw — a callback type argument erasing to
/// the boxed sync return type.
pub fn find_method_in_async<'a>(
    sync_method: &'a MethodSnapshot,
    sync_class: &ClassSnapshot,
    async_class: &'a ClassSnapshot,
) -> Option<&'a MethodSnapshot> {
    let sync_params = sync_method.erased_params(sync_class);
    let expected_result = callback_result_erasure(sync_method, sync_class);

    async_class.methods_named(&sync_method.name).find(|candidate| {
        async_shape_matches(candidate, async_class, &sync_params, Some(&expected_result))
    })
}

/// Find the sync counterpart of `async_method` in `sync_class`: the
/// structural inverse of [`find_method_in_async`].
pub fn find_method_in_sync<'a>(
    async_method: &'a MethodSnapshot,
    async_class: &ClassSnapshot,
    sync_class: &'a ClassSnapshot,
) -> Option<&'a MethodSnapshot> {
    if async_method.erased_return(async_class) != Erasure::Void {
        return None;
    }
    let erased = async_method.erased_params(async_class);
    let (callback, leading) = erased.split_last()?;
    if !callback.is_class_named(well_known::ASYNC_CALLBACK) {
        return None;
    }

    // A raw callback waives the return-type correspondence check.
    let callback_param = &async_method.params[async_method.params.len() - 1];
    let expected_result = match callback_param.ty.type_args() {
        [] => None,
        [arg] => Some(async_method.erase_in_scope(arg, async_class)),
        _ => return None,
    };

    sync_class.methods_named(&async_method.name).find(|candidate| {
        let candidate_params = candidate.erased_params(sync_class);
        if candidate_params != leading {
            return false;
        }
        match &expected_result {
            None => true,
            Some(expected) => callback_result_erasure(candidate, sync_class) == *expected,
        }
    })
}

fn async_shape_matches(
    candidate: &MethodSnapshot,
    async_class: &ClassSnapshot,
    sync_params: &[Erasure],
    expected_result: Option<&Erasure>,
) -> bool {
    if candidate.erased_return(async_class) != Erasure::Void {
        return false;
    }
    if candidate.params.len() != sync_params.len() + 1 {
        return false;
    }

    let erased = candidate.erased_params(async_class);
    if erased[..sync_params.len()] != *sync_params {
        return false;
    }
    let callback = &erased[sync_params.len()];
    if !callback.is_class_named(well_known::ASYNC_CALLBACK) {
        return false;
    }

    let callback_param = &candidate.params[sync_params.len()];
    match (callback_param.ty.type_args(), expected_result) {
        // Raw callback usage is tolerated regardless of the sync return.
        ([], _) => true,
        ([arg], Some(expected)) => candidate.erase_in_scope(arg, async_class) == *expected,
        ([_], None) => true,
        _ => false,
    }
}

/// One matched sync/async method pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodPair<'a> {
    pub sync_method: &'a MethodSnapshot,
    pub async_method: &'a MethodSnapshot,
}

/// The reconciliation of a whole service pair.
#[derive(Debug, Default)]
pub struct ServicePairReport<'a> {
    pub pairs: Vec<MethodPair<'a>>,
    /// Sync methods with no structural counterpart.
    pub sync_only: Vec<&'a MethodSnapshot>,
    /// Async methods with no structural counterpart.
    pub async_only: Vec<&'a MethodSnapshot>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ServicePairReport<'_> {
    pub fn is_consistent(&self) -> bool {
        self.sync_only.is_empty() && self.async_only.is_empty()
    }
}

/// Reconcile every method of `sync_class` against `async_class` and back.
///
/// Divergence never halts processing; each mismatch yields one warning.
pub fn reconcile_service_pair<'a>(
    sync_class: &'a ClassSnapshot,
    async_class: &'a ClassSnapshot,
) -> ServicePairReport<'a> {
    let mut report = ServicePairReport::default();

    for sync_method in &sync_class.methods {
        match find_method_in_async(sync_method, sync_class, async_class) {
            Some(async_method) => report.pairs.push(MethodPair {
                sync_method,
                async_method,
            }),
            None => {
                report.sync_only.push(sync_method);
                report.diagnostics.push(Diagnostic::warning(
                    "rpc.missing-async-method",
                    format!(
                        "{} has no matching method in {}",
                        sync_method.name, async_class.name
                    ),
                ));
            }
        }
    }

    for async_method in &async_class.methods {
        if find_method_in_sync(async_method, async_class, sync_class).is_none() {
            report.async_only.push(async_method);
            report.diagnostics.push(Diagnostic::warning(
                "rpc.missing-sync-method",
                format!(
                    "{} has no matching method in {}",
                    async_method.name, sync_class.name
                ),
            ));
        }
    }

    report
}
