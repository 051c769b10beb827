use gwtkit_core::Diagnostic;
use gwtkit_types::ClassSnapshot;

use crate::PropertiesFile;

/// Derive a Java method name from a property key.
///
/// Characters that cannot appear in an identifier become `_`, and a key
/// starting with a digit (or empty) is prefixed with `_`. The mapping is
/// stable: the same key always yields the same name.
pub fn method_name_for_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_alphanumeric() || c == '_' || c == '$' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    let starts_ok = out
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$');
    if !starts_ok {
        out.insert(0, '_');
    }
    out
}

/// Derive method names for a whole key set, disambiguating collisions with a
/// numeric suffix in encounter order.
pub fn method_names_for_keys<'a>(
    keys: impl IntoIterator<Item = &'a str>,
) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for key in keys {
        let base = method_name_for_key(key);
        let mut name = base.clone();
        let mut n = 2;
        while out.iter().any(|(_, existing)| *existing == name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        out.push((key.to_string(), name));
    }
    out
}

/// The two-way diff between an i18n interface and its properties file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct I18nReport {
    /// Interface methods with no backing property key.
    pub missing_keys: Vec<String>,
    /// Property keys no interface method consumes.
    pub unused_keys: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl I18nReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_keys.is_empty() && self.unused_keys.is_empty()
    }
}

/// Reconcile `interface` (a `Constants`/`Messages`-style interface whose
/// method names are property keys) against `props`.
pub fn reconcile(interface: &ClassSnapshot, props: &PropertiesFile) -> I18nReport {
    let mut report = I18nReport::default();

    for method in &interface.methods {
        if props.get(&method.name).is_none() {
            report.missing_keys.push(method.name.clone());
            report.diagnostics.push(Diagnostic::warning(
                "i18n.missing-key",
                format!(
                    "{}.{} has no matching property key",
                    interface.name, method.name
                ),
            ));
        }
    }

    for entry in &props.entries {
        let consumed = interface.methods.iter().any(|m| m.name == entry.key);
        if !consumed && !report.unused_keys.contains(&entry.key) {
            report.unused_keys.push(entry.key.clone());
            report.diagnostics.push(Diagnostic::warning(
                "i18n.unused-key",
                format!("property key `{}` has no matching method", entry.key),
            ));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use gwtkit_types::{JavaType, MethodSnapshot};

    #[test]
    fn keys_mangle_to_identifiers() {
        assert_eq!(method_name_for_key("greeting"), "greeting");
        assert_eq!(method_name_for_key("error.not-found"), "error_not_found");
        assert_eq!(method_name_for_key("42answer"), "_42answer");
        assert_eq!(method_name_for_key(""), "_");
    }

    #[test]
    fn colliding_keys_get_numeric_suffixes() {
        let names = method_names_for_keys(["a.b", "a-b", "a_b"]);
        assert_eq!(
            names,
            vec![
                ("a.b".to_string(), "a_b".to_string()),
                ("a-b".to_string(), "a_b_2".to_string()),
                ("a_b".to_string(), "a_b_3".to_string()),
            ]
        );
    }

    fn messages_interface(names: &[&str]) -> ClassSnapshot {
        ClassSnapshot::interface("com.example.client.Messages").with_methods(
            names
                .iter()
                .map(|n| {
                    MethodSnapshot::new(*n, vec![], JavaType::named("java.lang.String"))
                })
                .collect(),
        )
    }

    #[test]
    fn reconcile_reports_both_directions() {
        let interface = messages_interface(&["greeting", "farewell"]);
        let props = parse("greeting=Hello\nextra=Surplus\n");

        let report = reconcile(&interface, &props);
        assert_eq!(report.missing_keys, vec!["farewell"]);
        assert_eq!(report.unused_keys, vec!["extra"]);
        assert_eq!(report.diagnostics.len(), 2);
        assert!(!report.is_consistent());
    }

    #[test]
    fn consistent_pairs_produce_no_diagnostics() {
        let interface = messages_interface(&["greeting"]);
        let props = parse("greeting=Hello\n");
        assert!(reconcile(&interface, &props).is_consistent());
    }

    #[test]
    fn duplicate_unused_keys_are_reported_once() {
        let interface = messages_interface(&[]);
        let props = parse("dup=1\ndup=2\n");
        let report = reconcile(&interface, &props);
        assert_eq!(report.unused_keys, vec!["dup"]);
    }
}
