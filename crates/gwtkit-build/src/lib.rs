//! External GWT compiler invocation surface.
//!
//! The compiler itself is an opaque subprocess; this crate owns the
//! version-dependent argument list, the persisted incremental-build validity
//! record, and the runner that spawns the process and streams its output
//! into a diagnostics sink.

use std::path::{Path, PathBuf};

use gwtkit_core::{Diagnostic, GwtVersion, OutputStyle, QualifiedName};
use thiserror::Error;

mod command;
mod validity;

pub use command::{CommandOutput, CommandRunner, DefaultCommandRunner};
pub use validity::{read_validity, write_validity, ValidityRecord, STYLE_ID_SHIFT};

/// Main class of the external compiler; renamed with the 1.6 war layout.
fn compiler_main_class(version: GwtVersion) -> &'static str {
    if version >= GwtVersion::V1_6 {
        "com.google.gwt.dev.Compiler"
    } else {
        "com.google.gwt.dev.GWTCompiler"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Trace,
    Debug,
    Spam,
    All,
}

impl LogLevel {
    pub fn as_flag(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Spam => "SPAM",
            LogLevel::All => "ALL",
        }
    }
}

/// One module compilation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileParameters {
    pub module: QualifiedName,
    pub log_level: LogLevel,
    pub style: OutputStyle,
    pub output_dir: PathBuf,
    pub gen_dir: Option<PathBuf>,
}

/// The compiler argument list for `params`, in the order the external
/// compiler expects: log level, output directory (flag spelling is
/// version-dependent), generated-source directory, style, module name.
pub fn compiler_args(params: &CompileParameters, version: GwtVersion) -> Vec<String> {
    let mut args = vec![
        "-logLevel".to_string(),
        params.log_level.as_flag().to_string(),
        version.war_output_flag().to_string(),
        params.output_dir.display().to_string(),
    ];
    if let Some(gen_dir) = &params.gen_dir {
        args.push("-gen".to_string());
        args.push(gen_dir.display().to_string());
    }
    args.push("-style".to_string());
    args.push(params.style.as_flag().to_string());
    args.push(params.module.as_str().to_string());
    args
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to spawn the GWT compiler: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },
}

/// Receives user-visible build findings.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// A fully-described compiler invocation.
#[derive(Debug, Clone)]
pub struct CompilerInvocation {
    pub java: PathBuf,
    /// Classpath entries: the SDK jars plus the module's source roots.
    pub classpath: Vec<PathBuf>,
    pub params: CompileParameters,
    pub version: GwtVersion,
}

#[derive(Debug)]
pub struct CompileOutcome {
    pub success: bool,
    pub output: CommandOutput,
}

impl CompilerInvocation {
    /// The java argument vector, without spawning anything.
    pub fn command_args(&self) -> Vec<String> {
        let classpath = std::env::join_paths(&self.classpath)
            .map(|joined| joined.to_string_lossy().into_owned())
            .unwrap_or_else(|_| {
                // Entries containing the separator cannot be joined; fall
                // back to a lossy join rather than refusing to build a
                // command line.
                self.classpath
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(":")
            });

        let mut args = vec!["-cp".to_string(), classpath];
        args.push(compiler_main_class(self.version).to_string());
        args.extend(compiler_args(&self.params, self.version));
        args
    }

    /// Spawn the compiler and block until exit.
    ///
    /// A non-zero exit reports an ERROR diagnostic and yields
    /// `success: false`; partial output on disk is left in place. Only a
    /// spawn failure is an `Err`, and it is reported through the sink too.
    pub fn run(
        &self,
        runner: &dyn CommandRunner,
        cwd: &Path,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<CompileOutcome, BuildError> {
        let args = self.command_args();
        tracing::debug!(
            target = "gwtkit.build",
            module = %self.params.module,
            java = %self.java.display(),
            "invoking GWT compiler"
        );

        let output = match runner.run(cwd, &self.java, &args) {
            Ok(output) => output,
            Err(source) => {
                sink.report(Diagnostic::error(
                    "build.compiler-spawn",
                    format!("failed to spawn the GWT compiler: {source}"),
                ));
                return Err(BuildError::Spawn { source });
            }
        };

        let success = output.exit_code == Some(0);
        if !success {
            sink.report(Diagnostic::error(
                "build.compiler-failed",
                format!(
                    "GWT compiler for {} exited with {}: {}",
                    self.params.module,
                    output
                        .exit_code
                        .map(|code| code.to_string())
                        .unwrap_or_else(|| "signal".to_string()),
                    output.combined().trim_end()
                ),
            ));
        }

        Ok(CompileOutcome { success, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CompileParameters {
        CompileParameters {
            module: QualifiedName::new("com.example.My"),
            log_level: LogLevel::Info,
            style: OutputStyle::Pretty,
            output_dir: PathBuf::from("www"),
            gen_dir: Some(PathBuf::from("gen")),
        }
    }

    #[test]
    fn argument_order_matches_the_compiler_surface() {
        let args = compiler_args(&params(), GwtVersion::V1_6);
        assert_eq!(
            args,
            vec![
                "-logLevel", "INFO", "-war", "www", "-gen", "gen", "-style", "PRETTY",
                "com.example.My",
            ]
        );
    }

    #[test]
    fn pre_war_versions_use_the_out_flag() {
        let args = compiler_args(&params(), GwtVersion::V1_5);
        assert!(args.contains(&"-out".to_string()));
        assert!(!args.contains(&"-war".to_string()));
    }

    #[test]
    fn gen_dir_is_optional() {
        let mut p = params();
        p.gen_dir = None;
        let args = compiler_args(&p, GwtVersion::V1_6);
        assert!(!args.contains(&"-gen".to_string()));
    }

    #[test]
    fn main_class_follows_the_version() {
        let invocation = CompilerInvocation {
            java: PathBuf::from("java"),
            classpath: vec![PathBuf::from("gwt-user.jar")],
            params: params(),
            version: GwtVersion::V1_5,
        };
        let args = invocation.command_args();
        assert!(args.contains(&"com.google.gwt.dev.GWTCompiler".to_string()));

        let invocation = CompilerInvocation {
            version: GwtVersion::V1_6,
            ..invocation
        };
        let args = invocation.command_args();
        assert!(args.contains(&"com.google.gwt.dev.Compiler".to_string()));
    }

    #[derive(Debug)]
    struct FakeRunner {
        exit_code: Option<i32>,
        stderr: &'static str,
    }

    impl CommandRunner for FakeRunner {
        fn run(
            &self,
            _cwd: &Path,
            _program: &Path,
            _args: &[String],
        ) -> std::io::Result<CommandOutput> {
            Ok(CommandOutput {
                exit_code: self.exit_code,
                stdout: String::new(),
                stderr: self.stderr.to_string(),
            })
        }
    }

    #[test]
    fn nonzero_exit_reports_an_error_diagnostic() {
        let invocation = CompilerInvocation {
            java: PathBuf::from("java"),
            classpath: vec![],
            params: params(),
            version: GwtVersion::V1_6,
        };
        let runner = FakeRunner {
            exit_code: Some(1),
            stderr: "[ERROR] unable to find module",
        };

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let outcome = invocation
            .run(&runner, Path::new("."), &mut diagnostics)
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "build.compiler-failed");
        assert!(diagnostics[0].message.contains("unable to find module"));
    }

    #[test]
    fn zero_exit_is_silent_success() {
        let invocation = CompilerInvocation {
            java: PathBuf::from("java"),
            classpath: vec![],
            params: params(),
            version: GwtVersion::V1_6,
        };
        let runner = FakeRunner {
            exit_code: Some(0),
            stderr: "",
        };

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let outcome = invocation
            .run(&runner, Path::new("."), &mut diagnostics)
            .unwrap();

        assert!(outcome.success);
        assert!(diagnostics.is_empty());
    }
}
