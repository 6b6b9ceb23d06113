//! Printing command reports in the selected output format.

use anyhow::Result;
use clap::ValueEnum;
use comfy_table::{Attribute, Cell, Table, presets};
use serde::Serialize;

use crate::style::{self, Status};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// One line per report
    Compact,
}

/// Output settings taken from the global flags.
#[derive(Clone, Copy, Debug, Default)]
pub struct Display {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    /// No colors, ASCII table borders.
    pub plain: bool,
}

/// A command result printable in every [`OutputFormat`].
pub trait Report: Serialize {
    fn columns(&self) -> &'static [&'static str];

    fn rows(&self) -> Vec<Vec<String>>;

    fn compact(&self) -> String;

    fn table(&self, plain: bool) -> Table {
        let mut table = Table::new();
        table.load_preset(if plain { presets::ASCII_FULL } else { presets::UTF8_FULL_CONDENSED });

        let header: Vec<Cell> = self
            .columns()
            .iter()
            .map(|column| {
                let cell = Cell::new(column).add_attribute(Attribute::Bold);
                if plain { cell } else { cell.fg(style::TABLE_HEADER) }
            })
            .collect();
        table.set_header(header);

        for row in self.rows() {
            table.add_row(row.into_iter().map(Cell::new).collect::<Vec<_>>());
        }
        table
    }
}

pub struct Output {
    display: Display,
}

impl Output {
    pub fn new(display: Display) -> Self {
        Self { display }
    }

    pub fn is_json(&self) -> bool {
        self.display.format == OutputFormat::Json
    }

    pub fn report<R: Report>(&self, report: &R) -> Result<()> {
        if self.display.quiet {
            return Ok(());
        }
        match self.display.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
            OutputFormat::Table => println!("{}", report.table(self.display.plain)),
            OutputFormat::Compact => println!("{}", report.compact()),
        }
        Ok(())
    }

    /// Prints `message` behind the status mark, if the flags allow it.
    pub fn status(&self, status: Status, message: &str) {
        if !self.shows(status) {
            return;
        }
        let line = style::paint(&format!("{} {message}", status.mark()), status.color(), self.display.plain);
        if status.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    fn shows(&self, status: Status) -> bool {
        match status {
            Status::Failed => true,
            _ if self.display.quiet => false,
            Status::Warning => true,
            Status::Detail => self.display.verbose,
            Status::Valid | Status::Note => !self.is_json(),
        }
    }

    pub fn heading(&self, text: &str) {
        if self.display.quiet || self.is_json() {
            return;
        }
        println!();
        println!("{}", style::paint_bold(text, style::HEADING, self.display.plain));
    }

    /// `Key: value` line above a table.
    pub fn property(&self, key: &str, value: &str) {
        if self.display.quiet || self.is_json() {
            return;
        }
        println!("{}: {value}", style::paint_bold(key, style::PROPERTY, self.display.plain));
    }
}
