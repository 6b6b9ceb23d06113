mod commands;
mod examples;
mod output;
mod scanner;
mod style;

use std::process::ExitCode;

use anyhow::Result;
use clap::builder::styling::{AnsiColor, Styles};
use clap::{Command, CommandFactory, FromArgMatches, Parser, Subcommand};

use commands::{
    inspect::{InspectArgs, handle_inspect},
    tags::{TagsArgs, handle_tags},
    validate::{ValidateArgs, handle_validate},
};
use output::{Display, Output, OutputFormat};
use style::Status;

const HELP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Cyan.on_default().bold())
    .usage(AnsiColor::BrightBlue.on_default().bold())
    .literal(AnsiColor::Magenta.on_default())
    .placeholder(AnsiColor::BrightBlack.on_default())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::Yellow.on_default())
    .error(AnsiColor::Red.on_default().bold());

const ENVIRONMENT_HELP: &str = "Environment Variables:
  TAGFORM_TAG_PREFIX  Tag prefix used when --prefix is not given
  RUST_LOG            Log filter, e.g. tagform=debug";

/// Inspect and validate forms declared with @tag annotations.
#[derive(Parser)]
#[command(name = "tagform", version, styles = HELP_STYLES, after_long_help = ENVIRONMENT_HELP)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t, global = true)]
    output: OutputFormat,

    /// Only print errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Print progress and debug logs of the tagform library
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Tag prefix, e.g. "form:" for @form:label
    #[arg(long, env = "TAGFORM_TAG_PREFIX", global = true)]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn display(&self) -> Display {
        Display {
            format: self.output,
            quiet: self.quiet,
            verbose: self.verbose,
            plain: self.no_color,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tags found in a doc block
    Tags(TagsArgs),

    /// Show the fields of the forms found at a path
    Inspect(InspectArgs),

    /// Apply submitted values to a form and validate them
    Validate(ValidateArgs),
}

/// The clap command with every subcommand's examples in its long help.
fn cli_command() -> Command {
    examples::command_examples()
        .iter()
        .fold(Cli::command(), |command, example| {
            command.mut_subcommand(example.name, |subcommand| {
                subcommand.after_long_help(examples::render(example.groups))
            })
        })
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_module("tagform", log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(command: Commands, prefix: Option<&str>, output: &Output) -> Result<()> {
    match command {
        Commands::Tags(args) => handle_tags(args, prefix, output),
        Commands::Inspect(args) => handle_inspect(args, prefix, output),
        Commands::Validate(args) => handle_validate(args, prefix, output),
    }
}

fn main() -> ExitCode {
    let matches = cli_command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let output = Output::new(cli.display());
    match run(cli.command, cli.prefix.as_deref(), &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.status(Status::Failed, &format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli_command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "tagform",
            "validate",
            "form.toml",
            "-d",
            "name=Ada",
            "--output",
            "json",
            "--prefix",
            "form:",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.prefix.as_deref(), Some("form:"));
        assert!(cli.display().plain);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.data, vec![("name".to_string(), "Ada".to_string())]);
    }

    #[test]
    fn subcommand_help_lists_examples() {
        let mut command = cli_command();
        for example in examples::command_examples() {
            let subcommand = command.find_subcommand_mut(example.name).unwrap();
            let help = subcommand.render_long_help().to_string();
            assert!(help.contains("Examples:"), "{}", example.name);
            assert!(help.contains(example.groups[0].commands[0]), "{}", example.name);
        }
    }
}
