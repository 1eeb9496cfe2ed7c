use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use argtree_core::{App, AppManifest, CommandId, Node, Scope, SwitchAction, validate_app};
use argtree_engine::{Engine, ParseContext, Slots, Value, render_help};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "argtree")]
#[command(about = "Validate argtree manifests and resolve arguments against them")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log parser decisions to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check a manifest for schema errors.
    Validate(ValidateArgs),
    /// Resolve an argument vector and print the result as JSON.
    Resolve(ResolveArgs),
    /// Print the help page for the app or a command/group path.
    Help(HelpArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Manifest file (.yaml, .yml or .json).
    manifest: PathBuf,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Manifest file (.yaml, .yml or .json).
    manifest: PathBuf,
    /// Arguments to resolve, without the program name.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Manifest file (.yaml, .yml or .json).
    manifest: PathBuf,
    /// Group and command names leading to the node to describe.
    path: Vec<String>,
}

/// What `resolve` prints for a successful run.
#[derive(Debug, Default, Serialize)]
struct Resolution {
    #[serde(skip)]
    resolved: bool,
    command: String,
    path: Vec<String>,
    switches: Vec<String>,
    slots: BTreeMap<String, Value>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Resolve(args) => run_resolve(args),
        Command::Help(args) => run_help(args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_manifest(path: &Path) -> Result<AppManifest, String> {
    AppManifest::load(path).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

fn load_app(path: &Path) -> Result<App, String> {
    load_manifest(path)?
        .into_app()
        .map_err(|err| format!("Invalid manifest '{}': {err}", path.display()))
}

fn run_validate(args: ValidateArgs) -> Result<i32, String> {
    let app = load_manifest(&args.manifest)?.build();
    let problems = validate_app(&app);

    let mut fatal = 0;
    for problem in &problems {
        if problem.is_warning() {
            println!("warning: {problem}");
        } else {
            println!("error: {problem}");
            fatal += 1;
        }
    }
    if fatal > 0 {
        return Err(format!(
            "'{}' has {fatal} schema error(s).",
            args.manifest.display()
        ));
    }

    println!(
        "Validated '{}': {} command(s), {} warning(s).",
        args.manifest.display(),
        app.command_entries().count(),
        problems.len()
    );
    Ok(0)
}

fn run_resolve(args: ResolveArgs) -> Result<i32, String> {
    let app = load_app(&args.manifest)?;
    let argv: Vec<String> = std::iter::once(app.name.clone()).chain(args.args).collect();
    debug!(?argv, "resolving");

    let mut engine = Engine::new(&app);
    for (id, _) in app.command_entries() {
        let app = &app;
        engine.on_command(id, move |slots: &Slots, out: &mut Resolution| {
            out.resolved = true;
            out.command = app.command(id).name.clone();
            out.path = command_path(app, id);
            out.slots = named_slots(app, id, slots);
            0
        });
    }
    for (id, switch) in app.switch_entries() {
        if switch.action != SwitchAction::Custom {
            continue;
        }
        let flag = switch.flag.clone();
        engine.on_switch(id, move |_: &ParseContext<'_>, out: &mut Resolution| {
            out.switches.push(flag.clone());
            0
        });
    }

    let mut resolution = Resolution::default();
    let code = engine.run(&argv, &mut resolution);
    if resolution.resolved {
        let raw = serde_json::to_string_pretty(&resolution)
            .map_err(|err| format!("Failed to serialize resolution: {err}"))?;
        println!("{raw}");
    }
    Ok(code)
}

fn run_help(args: HelpArgs) -> Result<i32, String> {
    let app = load_app(&args.manifest)?;
    let path: Vec<&str> = args.path.iter().map(String::as_str).collect();

    let node = if path.is_empty() {
        None
    } else {
        let node = app
            .resolve_path(&path)
            .ok_or_else(|| format!("No command or group at '{}'.", path.join(" ")))?;
        Some(node)
    };
    let node = node.filter(|node| !matches!(node, Node::Command(id) if Some(*id) == app.main()));

    let breadcrumb = std::iter::once(app.name.as_str())
        .chain(path.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    print!("{}", render_help(&app, node, &breadcrumb));
    Ok(0)
}

/// Names of the groups and command leading to `target`, found by walking
/// down from the root. Empty for the main command.
fn command_path(app: &App, target: CommandId) -> Vec<String> {
    fn walk(app: &App, scope: Scope, target: CommandId, trail: &mut Vec<String>) -> bool {
        if let Some(&id) = app.scope_commands(scope).iter().find(|&&id| id == target) {
            trail.push(app.command(id).name.clone());
            return true;
        }
        for &group in app.scope_groups(scope) {
            trail.push(app.group(group).name.clone());
            if walk(app, Scope::Group(group), target, trail) {
                return true;
            }
            trail.pop();
        }
        false
    }

    let mut trail = Vec::new();
    walk(app, Scope::Root, target, &mut trail);
    trail
}

fn named_slots(app: &App, id: CommandId, slots: &Slots) -> BTreeMap<String, Value> {
    let command = app.command(id);
    slots
        .iter()
        .filter_map(|(slot, value)| {
            command
                .slot_owner(slot)
                .map(|name| (name.to_string(), value.clone()))
        })
        .collect()
}
