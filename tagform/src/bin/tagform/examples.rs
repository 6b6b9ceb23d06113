//! Usage examples appended to each subcommand's `--help`.

use std::fmt::Write;

use crate::commands::{inspect, tags, validate};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "tags",
            groups: tags::EXAMPLES,
        },
        CommandExample {
            name: "inspect",
            groups: inspect::EXAMPLES,
        },
        CommandExample {
            name: "validate",
            groups: validate::EXAMPLES,
        },
    ]
}

pub fn render(groups: &[ExampleGroup]) -> String {
    let mut help = String::from("Examples:\n");
    for group in groups {
        let _ = writeln!(help, "\n  {}:", group.title);
        for command in group.commands {
            let _ = writeln!(help, "    $ {command}");
        }
    }
    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_render_under_their_titles() {
        let help = render(tags::EXAMPLES);
        assert!(help.starts_with("Examples:\n"));
        assert!(help.contains("  Prefixed Tags:\n    $ tagform tags doc.txt --prefix form:"));
    }
}
