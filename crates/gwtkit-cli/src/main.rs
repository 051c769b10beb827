use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use gwtkit_build::{compiler_args, CompileParameters, LogLevel};
use gwtkit_core::{Diagnostic, GwtVersion, OutputStyle, QualifiedName};
use gwtkit_i18n::reconcile;
use gwtkit_module::{resolve_source_roots, DescriptorDirRoots};
use gwtkit_project::{ScanOptions, Workspace};
use gwtkit_rpc::{
    find_async_class, is_remote_service_interface, reconcile_service_pair,
};
use gwtkit_sdk::SdkInstallation;
use gwtkit_types::{ClassIndex, ClassSnapshot, SnapshotIndex};

#[derive(Parser)]
#[command(name = "gwtkit", version, about = "GWT project tooling (modules, RPC, i18n, build)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List GWT modules discovered in a workspace
    Modules(ModulesArgs),
    /// Reconcile a sync RPC service against its async counterpart
    RpcCheck(RpcCheckArgs),
    /// Print the external compiler argument list for a module
    CompileArgs(CompileArgsArgs),
    /// Reconcile an i18n interface against its properties file
    I18nCheck(I18nCheckArgs),
    /// Detect a GWT SDK installation and its version
    Sdk(SdkArgs),
}

#[derive(Args)]
struct ModulesArgs {
    /// Path to a workspace directory
    path: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RpcCheckArgs {
    /// JSON file with an array of class snapshots
    snapshots: PathBuf,
    /// Qualified name of the synchronous service interface
    #[arg(long)]
    service: String,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CompileArgsArgs {
    /// Qualified module name
    module: String,
    /// Output directory
    #[arg(long, default_value = "www")]
    out: PathBuf,
    /// Generated-source directory
    #[arg(long)]
    gen: Option<PathBuf>,
    /// Output style: OBF, PRETTY, or DETAILED
    #[arg(long, default_value = "OBF")]
    style: String,
    /// Compiler log level
    #[arg(long, default_value = "INFO")]
    log_level: String,
    /// GWT SDK home (defaults to GWT_HOME; latest version assumed if unset)
    #[arg(long)]
    sdk: Option<PathBuf>,
}

#[derive(Args)]
struct I18nCheckArgs {
    /// The .properties file
    properties: PathBuf,
    /// JSON file with an array of class snapshots
    #[arg(long)]
    snapshots: PathBuf,
    /// Qualified name of the Constants/Messages interface
    #[arg(long)]
    interface: String,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SdkArgs {
    /// SDK home (defaults to GWT_HOME)
    #[arg(long)]
    home: Option<PathBuf>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Modules(args) => modules(args),
        Command::RpcCheck(args) => rpc_check(args),
        Command::CompileArgs(args) => compile_args_cmd(args),
        Command::I18nCheck(args) => i18n_check(args),
        Command::Sdk(args) => sdk(args),
    }
}

#[derive(Serialize)]
struct ModuleReport {
    qualified_name: String,
    file: PathBuf,
    entry_points: Vec<String>,
    source_roots: Vec<PathBuf>,
}

fn modules(args: ModulesArgs) -> Result<()> {
    let workspace = Workspace::load(&args.path, ScanOptions::default())
        .with_context(|| format!("failed to load workspace at {}", args.path.display()))?;

    let reports: Vec<ModuleReport> = workspace
        .index()
        .modules()
        .iter()
        .map(|module| ModuleReport {
            qualified_name: module.qualified_name.as_str().to_string(),
            file: module.file.clone(),
            entry_points: module
                .descriptor
                .entry_points
                .iter()
                .map(|e| e.as_str().to_string())
                .collect(),
            source_roots: resolve_source_roots(module, &DescriptorDirRoots),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}  ({})", report.qualified_name, report.file.display());
            for entry in &report.entry_points {
                println!("  entry-point {entry}");
            }
        }
        println!("{} module(s)", reports.len());
    }
    Ok(())
}

fn load_snapshots(path: &PathBuf) -> Result<SnapshotIndex> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let classes: Vec<ClassSnapshot> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse class snapshots in {}", path.display()))?;
    Ok(classes.into_iter().collect())
}

#[derive(Serialize)]
struct RpcReport {
    service: String,
    async_interface: Option<String>,
    matched_methods: usize,
    consistent: bool,
    diagnostics: Vec<Diagnostic>,
}

fn rpc_check(args: RpcCheckArgs) -> Result<()> {
    let index = load_snapshots(&args.snapshots)?;
    let service = QualifiedName::new(args.service.as_str());

    if !is_remote_service_interface(&index, &service) {
        bail!("{service} is not a RemoteService interface in the given snapshots");
    }
    let sync_class = index
        .class(&service)
        .context("service class disappeared from index")?;

    let report = match find_async_class(&index, sync_class) {
        Some(async_class) => {
            let pair = reconcile_service_pair(sync_class, async_class);
            RpcReport {
                service: service.as_str().to_string(),
                async_interface: Some(async_class.name.as_str().to_string()),
                matched_methods: pair.pairs.len(),
                consistent: pair.is_consistent(),
                diagnostics: pair.diagnostics,
            }
        }
        None => RpcReport {
            service: service.as_str().to_string(),
            async_interface: None,
            matched_methods: 0,
            consistent: false,
            diagnostics: vec![Diagnostic::warning(
                "rpc.missing-async-interface",
                format!("no {}Async interface in the given snapshots", service),
            )],
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &report.async_interface {
            Some(name) => println!(
                "{} <-> {}: {} matched method(s)",
                report.service, name, report.matched_methods
            ),
            None => println!("{}: async interface missing", report.service),
        }
        for diagnostic in &report.diagnostics {
            println!("  [{:?}] {}", diagnostic.severity, diagnostic.message);
        }
    }

    if !report.consistent {
        std::process::exit(1);
    }
    Ok(())
}

fn compile_args_cmd(args: CompileArgsArgs) -> Result<()> {
    let version = match &args.sdk {
        Some(home) => SdkInstallation::from_root(home)?.detect_version(),
        None => match SdkInstallation::discover(None) {
            Ok(sdk) => sdk.detect_version(),
            Err(_) => GwtVersion::latest(),
        },
    };

    let params = CompileParameters {
        module: QualifiedName::new(args.module.as_str()),
        log_level: parse_log_level(&args.log_level)?,
        style: parse_style(&args.style)?,
        output_dir: args.out,
        gen_dir: args.gen,
    };

    println!("{}", compiler_args(&params, version).join(" "));
    Ok(())
}

#[derive(Serialize)]
struct I18nJsonReport {
    interface: String,
    missing_keys: Vec<String>,
    unused_keys: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

fn i18n_check(args: I18nCheckArgs) -> Result<()> {
    let index = load_snapshots(&args.snapshots)?;
    let interface_name = QualifiedName::new(args.interface.as_str());
    let interface = index
        .class(&interface_name)
        .with_context(|| format!("{interface_name} not found in the given snapshots"))?;

    let text = std::fs::read_to_string(&args.properties)
        .with_context(|| format!("failed to read {}", args.properties.display()))?;
    let props = gwtkit_i18n::parse(&text);

    let report = reconcile(interface, &props);
    let consistent = report.is_consistent();

    if args.json {
        let out = I18nJsonReport {
            interface: interface_name.as_str().to_string(),
            missing_keys: report.missing_keys,
            unused_keys: report.unused_keys,
            diagnostics: report.diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for diagnostic in &report.diagnostics {
            println!("[{:?}] {}", diagnostic.severity, diagnostic.message);
        }
        if consistent {
            println!("{interface_name} is consistent with {}", args.properties.display());
        }
    }

    if !consistent {
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Serialize)]
struct SdkReport {
    root: PathBuf,
    version: String,
    dev_jar: Option<PathBuf>,
}

fn sdk(args: SdkArgs) -> Result<()> {
    let sdk = SdkInstallation::discover(args.home.as_deref())?;
    let report = SdkReport {
        root: sdk.root().to_path_buf(),
        version: sdk.detect_version().to_string(),
        dev_jar: sdk.dev_jar().map(Into::into),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("GWT {} at {}", report.version, report.root.display());
    }
    Ok(())
}

fn parse_style(text: &str) -> Result<OutputStyle> {
    let style = match text.to_ascii_uppercase().as_str() {
        "OBF" | "OBFUSCATED" => OutputStyle::Obfuscated,
        "PRETTY" => OutputStyle::Pretty,
        "DETAILED" => OutputStyle::Detailed,
        other => bail!("unknown output style `{other}` (expected OBF, PRETTY, or DETAILED)"),
    };
    Ok(style)
}

fn parse_log_level(text: &str) -> Result<LogLevel> {
    let level = match text.to_ascii_uppercase().as_str() {
        "ERROR" => LogLevel::Error,
        "WARN" => LogLevel::Warn,
        "INFO" => LogLevel::Info,
        "TRACE" => LogLevel::Trace,
        "DEBUG" => LogLevel::Debug,
        "SPAM" => LogLevel::Spam,
        "ALL" => LogLevel::All,
        other => bail!("unknown log level `{other}`"),
    };
    Ok(level)
}
