//! GWT SDK installation discovery and version classification.

use std::path::{Path, PathBuf};

use gwtkit_core::GwtVersion;
use thiserror::Error;

/// Platform-suffixed spellings the dev jar has carried across releases.
const DEV_JAR_CANDIDATES: [&str; 4] = [
    "gwt-dev.jar",
    "gwt-dev-linux.jar",
    "gwt-dev-mac.jar",
    "gwt-dev-windows.jar",
];

const ABOUT_CANDIDATES: [&str; 2] = ["about.txt", "about.html"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkInstallation {
    root: PathBuf,
    user_jar: PathBuf,
    dev_jar: Option<PathBuf>,
    about_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("could not discover a GWT SDK (no explicit home and GWT_HOME is unset)")]
    NotFound,

    #[error("GWT SDK root `{root}` does not contain gwt-user.jar")]
    MissingUserJar { root: PathBuf },
}

impl SdkInstallation {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn user_jar(&self) -> &Path {
        &self.user_jar
    }

    pub fn dev_jar(&self) -> Option<&Path> {
        self.dev_jar.as_deref()
    }

    /// Validate `root` as an SDK directory. `gwt-user.jar` is required; the
    /// dev jar and about file are recorded when present.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, SdkError> {
        let root = root.as_ref().to_path_buf();
        let user_jar = root.join("gwt-user.jar");
        if !user_jar.is_file() {
            return Err(SdkError::MissingUserJar { root });
        }

        let dev_jar = DEV_JAR_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.is_file());
        let about_file = ABOUT_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.is_file());

        Ok(Self {
            root,
            user_jar,
            dev_jar,
            about_file,
        })
    }

    /// Discover an installation: an explicit home wins, then `GWT_HOME`.
    pub fn discover(home: Option<&Path>) -> Result<Self, SdkError> {
        if let Some(home) = home {
            return Self::from_root(home);
        }
        match std::env::var_os("GWT_HOME") {
            Some(home) => Self::from_root(PathBuf::from(home)),
            None => Err(SdkError::NotFound),
        }
    }

    /// Classify the SDK's feature level from its about metadata.
    ///
    /// Any read or classification failure degrades to the latest known
    /// version rather than failing the caller.
    pub fn detect_version(&self) -> GwtVersion {
        let Some(about_file) = &self.about_file else {
            tracing::debug!(
                target = "gwtkit.sdk",
                root = %self.root.display(),
                "no about file; assuming latest GWT version"
            );
            return GwtVersion::latest();
        };

        let text = match std::fs::read_to_string(about_file) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(
                    target = "gwtkit.sdk",
                    about_file = %about_file.display(),
                    error = %err,
                    "failed to read about file; assuming latest GWT version"
                );
                return GwtVersion::latest();
            }
        };

        match classify_version(&text) {
            Some(version) => version,
            None => {
                tracing::debug!(
                    target = "gwtkit.sdk",
                    about_file = %about_file.display(),
                    "unrecognized version string; assuming latest GWT version"
                );
                GwtVersion::latest()
            }
        }
    }
}

/// Extract and bucket a `major.minor` release number from about-file text
/// (e.g. "Google Web Toolkit 1.5.3").
fn classify_version(text: &str) -> Option<GwtVersion> {
    let (major, minor) = extract_release(text)?;
    let version = match (major, minor) {
        (0, _) => GwtVersion::V1_0,
        (1, 0..=3) => GwtVersion::V1_0,
        (1, 4) => GwtVersion::V1_4,
        (1, 5) => GwtVersion::V1_5,
        _ => GwtVersion::latest(),
    };
    Some(version)
}

fn extract_release(text: &str) -> Option<(u32, u32)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'.' {
                let minor_start = i + 1;
                let mut j = minor_start;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
                if j > minor_start {
                    let major = text[start..i].parse().ok()?;
                    let minor = text[minor_start..j].parse().ok()?;
                    return Some((major, minor));
                }
            }
            // Lone number without a dot; keep scanning.
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdk_dir(about: Option<&str>) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("gwt-user.jar"), b"jar").unwrap();
        std::fs::write(tmp.path().join("gwt-dev-linux.jar"), b"jar").unwrap();
        if let Some(about) = about {
            std::fs::write(tmp.path().join("about.txt"), about).unwrap();
        }
        tmp
    }

    #[test]
    fn from_root_requires_the_user_jar() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SdkInstallation::from_root(tmp.path()).unwrap_err();
        assert!(matches!(err, SdkError::MissingUserJar { .. }));
    }

    #[test]
    fn from_root_records_platform_dev_jar() {
        let tmp = sdk_dir(None);
        let sdk = SdkInstallation::from_root(tmp.path()).unwrap();
        assert!(sdk.dev_jar().is_some());
    }

    #[test]
    fn versions_classify_from_about_text() {
        for (about, expected) in [
            ("Google Web Toolkit 1.0.21", GwtVersion::V1_0),
            ("Google Web Toolkit 1.3.3", GwtVersion::V1_0),
            ("Google Web Toolkit 1.4.62", GwtVersion::V1_4),
            ("Google Web Toolkit 1.5.3", GwtVersion::V1_5),
            ("Google Web Toolkit 1.6.4", GwtVersion::V1_6),
            ("Google Web Toolkit 2.0.0", GwtVersion::V1_6),
        ] {
            let tmp = sdk_dir(Some(about));
            let sdk = SdkInstallation::from_root(tmp.path()).unwrap();
            assert_eq!(sdk.detect_version(), expected, "about = {about:?}");
        }
    }

    #[test]
    fn classification_failures_fall_back_to_latest() {
        let garbled = sdk_dir(Some("no version here"));
        let sdk = SdkInstallation::from_root(garbled.path()).unwrap();
        assert_eq!(sdk.detect_version(), GwtVersion::latest());

        let missing = sdk_dir(None);
        let sdk = SdkInstallation::from_root(missing.path()).unwrap();
        assert_eq!(sdk.detect_version(), GwtVersion::latest());
    }

    #[test]
    fn explicit_home_wins_over_environment() {
        let tmp = sdk_dir(None);
        let sdk = SdkInstallation::discover(Some(tmp.path())).unwrap();
        assert_eq!(sdk.root(), tmp.path());
    }
}
