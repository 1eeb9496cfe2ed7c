//! Plain-text help and version output.
//!
//! Help is context sensitive: inside a command it lists that command's
//! positionals, arguments and options; inside a group it lists the group's
//! children; at the top it shows the app header, the main command's fields
//! and the top-level commands. Global options close every page.

use std::fmt::Write;

use argtree_core::{App, Argument, Command, Node, Positional, Scope};

use crate::session::ParseContext;

/// Column at which descriptions wrap.
pub const HELP_WIDTH: usize = 100;

const INDENT: &str = "    ";

/// The node help should describe for the current parse position.
///
/// `None` means the application itself; the main command is described as
/// part of the application page.
pub fn help_node(ctx: &ParseContext<'_>) -> Option<Node> {
    match (ctx.command(), ctx.group()) {
        (Some(command), _) if Some(command) != ctx.app().main() => Some(Node::Command(command)),
        (_, Some(group)) => Some(Node::Group(group)),
        _ => None,
    }
}

/// Renders the help page for `node`, or for the app when `node` is `None`.
///
/// `breadcrumb` is the program name followed by the path to `node`, as it
/// should appear in usage lines.
///
/// # Examples
///
/// ```
/// use argtree_core::{App, Command, Node, Positional, Scope, ValueType};
/// use argtree_engine::render_help;
///
/// let mut app = App::new("tool", "1.0.0").with_builtin_switches();
/// let build = app.add_command(
///     Scope::Root,
///     Command::new("build")
///         .with_description("Build a target.")
///         .with_positional(Positional::required("target", ValueType::String)),
/// );
///
/// let page = render_help(&app, Some(Node::Command(build)), "tool build");
/// assert!(page.starts_with("Usage: tool build [-h|--help]\n\nBuild a target.\n"));
/// assert!(page.contains("    target [TEXT]"));
/// assert!(page.contains("-h, --help"));
/// ```
pub fn render_help(app: &App, node: Option<Node>, breadcrumb: &str) -> String {
    let mut out = String::new();
    match node {
        Some(Node::Command(id)) => {
            let command = app.command(id);
            usage(&mut out, breadcrumb, &command.usage);
            paragraph(&mut out, &command.description);
            command_sections(&mut out, command);
        }
        Some(Node::Group(id)) => {
            let group = app.group(id);
            let _ = writeln!(out, "Usage: {breadcrumb} [COMMAND]\n");
            paragraph(&mut out, &group.description);
            children(&mut out, app, Scope::Group(id));
        }
        None => {
            let _ = writeln!(out, "{}\n", render_version(app));
            paragraph(&mut out, &app.description);
            usage(&mut out, breadcrumb, &app.usage);
            if let Some(main) = app.main() {
                command_sections(&mut out, app.command(main));
            }
            children(&mut out, app, Scope::Root);
        }
    }
    section(
        &mut out,
        "Global Option",
        app.switches()
            .iter()
            .map(|s| (flag_label(s.alias, &s.flag), s.description.as_str()))
            .collect(),
    );
    out
}

/// The `name version` line.
pub fn render_version(app: &App) -> String {
    format!("{} {}", app.name, app.version)
}

fn usage(out: &mut String, breadcrumb: &str, lines: &[String]) {
    let _ = match lines {
        [] => writeln!(out, "Usage: {breadcrumb} [-h|--help]\n"),
        [line] => writeln!(out, "Usage: {breadcrumb} {line}\n"),
        lines => {
            let _ = writeln!(out, "Usage:");
            for line in lines {
                let _ = writeln!(out, "{INDENT}{breadcrumb} {line}");
            }
            writeln!(out)
        }
    };
}

fn paragraph(out: &mut String, text: &str) {
    if !text.is_empty() {
        let _ = writeln!(out, "{}\n", wrap(text, 0, 0));
    }
}

fn command_sections(out: &mut String, command: &Command) {
    section(
        out,
        "Positional",
        command
            .positionals()
            .iter()
            .map(|p| (positional_label(p), p.description.as_str()))
            .collect(),
    );
    section(
        out,
        "Argument",
        command
            .arguments()
            .iter()
            .map(|a| (argument_label(a), a.description.as_str()))
            .collect(),
    );
    section(
        out,
        "Option",
        command
            .options()
            .iter()
            .map(|o| (flag_label(o.alias, &o.flag), o.description.as_str()))
            .collect(),
    );
}

fn children(out: &mut String, app: &App, scope: Scope) {
    let commands = app.scope_commands(scope).iter().map(|&id| {
        let command = app.command(id);
        (word_label(command.alias, &command.name), command.description.as_str())
    });
    let groups = app.scope_groups(scope).iter().map(|&id| {
        let group = app.group(id);
        (word_label(group.alias, &group.name), group.description.as_str())
    });
    section(out, "Command", commands.chain(groups).collect());
}

fn positional_label(positional: &Positional) -> String {
    format!("{} [{}]", positional.name, positional.value_type.label())
}

fn argument_label(argument: &Argument) -> String {
    format!(
        "{} [{}]",
        flag_label(argument.alias, &argument.flag),
        argument.value_type.label()
    )
}

fn flag_label(alias: Option<char>, flag: &str) -> String {
    match alias {
        Some(alias) => format!("-{alias}, --{flag}"),
        None => format!("--{flag}"),
    }
}

fn word_label(alias: Option<char>, name: &str) -> String {
    match alias {
        Some(alias) => format!("{alias}| {name}"),
        None => name.to_string(),
    }
}

/// Writes a titled two-column section, aligning descriptions to the widest
/// label. Nothing is written for an empty section.
fn section(out: &mut String, title: &str, rows: Vec<(String, &str)>) {
    if rows.is_empty() {
        return;
    }
    let plural = if rows.len() == 1 { "" } else { "s" };
    let _ = writeln!(out, "{title}{plural}:");

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let column = INDENT.len() + width + 2;
    for (label, description) in &rows {
        let line = format!("{INDENT}{label:<width$}  {}", wrap(description, column, column));
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out.push('\n');
}

/// Word-wraps `text` at [`HELP_WIDTH`], starting at column `start` and
/// indenting continuation lines by `indent`.
fn wrap(text: &str, start: usize, indent: usize) -> String {
    let mut out = String::new();
    let mut col = start;
    let mut first = true;
    for word in text.split_whitespace() {
        if !first && col + 1 + word.len() > HELP_WIDTH {
            out.push('\n');
            out.push_str(&" ".repeat(indent));
            col = indent;
        } else if !first {
            out.push(' ');
            col += 1;
        }
        out.push_str(word);
        col += word.len();
        first = false;
    }
    out
}
