use crate::Result;
use crate::providers::Dependency;
use clap::ValueEnum;
use core::fmt::{self, Write};
use owo_colors::OwoColorize;
use std::io::{IsTerminal, stdout};

const SEPARATOR_WIDTH: usize = 60;
const INDEX_WIDTH: usize = 3;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    #[default]
    Auto,
}

/// Write a human-readable listing of the dependents of `package`.
pub fn generate<W: Write>(package: &str, dependencies: &[Dependency], color: ColorMode, writer: &mut W) -> Result<()> {
    ConsoleReporter::new(writer, color).generate_report(package, dependencies)
}

struct ConsoleReporter<'a, W: Write> {
    writer: &'a mut W,
    colors: ColorScheme,
}

impl<'a, W: Write> ConsoleReporter<'a, W> {
    fn new(writer: &'a mut W, color_mode: ColorMode) -> Self {
        Self {
            writer,
            colors: ColorScheme::new(color_mode),
        }
    }

    fn generate_report(&mut self, package: &str, dependencies: &[Dependency]) -> Result<()> {
        self.write_header(package)?;

        if dependencies.is_empty() {
            self.colors
                .write_styled_text(self.writer, "No reverse dependencies found.", TextStyle::Warning)?;
            writeln!(self.writer)?;
            writeln!(self.writer)?;
            return Ok(());
        }

        self.colors.write_styled_text(self.writer, "Found ", TextStyle::Bold)?;
        self.colors
            .write_styled_text(self.writer, &dependencies.len().to_string(), TextStyle::Count)?;
        self.colors.write_styled_text(self.writer, " dependent packages:", TextStyle::Bold)?;
        writeln!(self.writer)?;
        writeln!(self.writer)?;

        for (index, dependency) in dependencies.iter().enumerate() {
            self.write_dependency(index + 1, dependency)?;
        }

        writeln!(self.writer)?;
        self.colors
            .write_styled_line(self.writer, "─", SEPARATOR_WIDTH, TextStyle::Dimmed)?;
        writeln!(self.writer)?;
        self.colors
            .write_styled_text(self.writer, &format!("Total: {} packages", dependencies.len()), TextStyle::Dimmed)?;
        writeln!(self.writer)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_header(&mut self, package: &str) -> Result<()> {
        writeln!(self.writer)?;
        self.colors
            .write_styled_text(self.writer, "📦 Packages that depend on ", TextStyle::Heading)?;
        self.colors.write_styled_text(self.writer, package, TextStyle::Warning)?;
        self.colors.write_styled_text(self.writer, ":", TextStyle::Heading)?;
        writeln!(self.writer)?;
        self.colors
            .write_styled_line(self.writer, "─", SEPARATOR_WIDTH, TextStyle::Dimmed)?;
        writeln!(self.writer)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_dependency(&mut self, position: usize, dependency: &Dependency) -> Result<()> {
        self.colors
            .write_styled_text(self.writer, &format!("{position:>INDEX_WIDTH$}. "), TextStyle::Dimmed)?;
        self.colors.write_styled_text(self.writer, &dependency.name, TextStyle::Name)?;
        self.colors
            .write_styled_text(self.writer, &format!("@{}", dependency.version), TextStyle::Dimmed)?;

        if let Some(downloads) = dependency.downloads.filter(|d| *d > 0) {
            self.colors
                .write_styled_text(self.writer, &format!(" ({} downloads)", format_number(downloads)), TextStyle::Count)?;
        }
        writeln!(self.writer)?;

        if let Some(repository) = &dependency.repository {
            self.colors
                .write_styled_text(self.writer, &format!("     📂 {repository}"), TextStyle::Dimmed)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum TextStyle {
    Bold,
    Dimmed,
    Heading,
    Name,
    Count,
    Warning,
}

struct ColorScheme {
    enabled: bool,
}

impl ColorScheme {
    fn new(color_mode: ColorMode) -> Self {
        let enabled = matches!(color_mode, ColorMode::Always) || (matches!(color_mode, ColorMode::Auto) && stdout().is_terminal());
        Self { enabled }
    }

    fn write_styled_text<W: Write>(&self, writer: &mut W, text: &str, style: TextStyle) -> fmt::Result {
        if !self.enabled {
            return write!(writer, "{text}");
        }
        match style {
            TextStyle::Bold => write!(writer, "{}", text.bold()),
            TextStyle::Dimmed => write!(writer, "{}", text.dimmed()),
            TextStyle::Heading => write!(writer, "{}", text.bold().blue()),
            TextStyle::Name => write!(writer, "{}", text.cyan()),
            TextStyle::Count => write!(writer, "{}", text.green()),
            TextStyle::Warning => write!(writer, "{}", text.yellow()),
        }
    }

    fn write_styled_line<W: Write>(&self, writer: &mut W, ch: &str, width: usize, style: TextStyle) -> fmt::Result {
        self.write_styled_text(writer, &ch.repeat(width), style)
    }
}

/// Render `value` with comma thousands separators.
fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}
