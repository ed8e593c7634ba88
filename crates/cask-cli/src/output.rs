//! Output formatting and reporting
//!
//! Outlines, stage tables and `check` reports. Everything here writes to
//! stdout; diagnostics go through `tracing` to stderr.

use std::time::Duration;

use cask_core::tree::{Argument, Instruction, Stage};
use cask_core::{Document, ParseResult, print_instruction};
use colored::*;

use crate::commands::check::FileOutcome;

const SUMMARY_WIDTH: usize = 72;

/// Totals of a check run
#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    pub files_checked: usize,
    pub passed: usize,
    pub mismatched: usize,
    pub rejected: usize,
    pub warnings: usize,
    pub elapsed: Duration,
}

impl CheckSummary {
    pub fn from_outcomes(outcomes: &[FileOutcome], elapsed: Duration) -> Self {
        let mut summary = Self {
            files_checked: outcomes.len(),
            elapsed,
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                FileOutcome::Passed { warnings, .. } => {
                    summary.passed += 1;
                    summary.warnings += warnings.len();
                }
                FileOutcome::Mismatch { result, .. } => {
                    summary.mismatched += 1;
                    summary.warnings += result.warnings.len();
                }
                FileOutcome::Rejected { .. } => summary.rejected += 1,
            }
        }
        summary
    }

    pub fn failed(&self) -> usize {
        self.mismatched + self.rejected
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Print per-file results followed by the summary
pub fn print_check_report(outcomes: &[FileOutcome], summary: &CheckSummary) {
    for outcome in outcomes {
        let path = outcome.path().display();
        match outcome {
            FileOutcome::Passed { warnings, .. } => {
                println!("{} {path}", "ok".green());
                for warning in warnings {
                    println!("   {} {warning}", "warning:".yellow());
                }
            }
            FileOutcome::Mismatch { result, .. } => {
                println!("{} {path}", "FAIL".red().bold());
                for issue in result.issues() {
                    println!("   {issue}");
                }
                if let Some(diff) = &result.diff {
                    print_diff(diff);
                }
            }
            FileOutcome::Rejected { message, .. } => {
                println!("{} {path}: {message}", "ERROR".red().bold());
            }
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Files checked: {}", summary.files_checked);
    println!("  Passed: {}", summary.passed.to_string().green());
    if summary.mismatched > 0 {
        println!(
            "  Round-trip mismatches: {}",
            summary.mismatched.to_string().red()
        );
    }
    if summary.rejected > 0 {
        println!("  Parse errors: {}", summary.rejected.to_string().red());
    }
    if summary.warnings > 0 {
        println!("  Warnings: {}", summary.warnings.to_string().yellow());
    }
    println!("  Time: {:.2?}", summary.elapsed);
}

fn print_diff(diff: &str) {
    for line in diff.lines() {
        let styled = if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else if line.starts_with("@@") {
            line.cyan()
        } else {
            line.normal()
        };
        println!("   {styled}");
    }
}

/// Stage and instruction outline of a parsed file
pub fn outline(result: &ParseResult) -> String {
    let document = result.document();
    let mut lines = Vec::new();

    if let Some(syntax) = &result.directives.syntax {
        lines.push(format!("syntax {syntax}"));
    }
    if result.directives.escape.is_some() {
        lines.push(format!("escape {}", result.escape));
    }

    for arg in document.global_args() {
        let instruction = Instruction::Arg(arg.clone());
        lines.push(format!("global {}", summarize(&instruction, result.escape)));
    }

    for (index, stage) in document.stages().iter().enumerate() {
        let name = stage.name().unwrap_or_else(|| "-".to_string());
        lines.push(format!("stage {index} {name}: {}", image_reference(stage)));
        for instruction in &stage.instructions {
            lines.push(format!("  {}", summarize(instruction, result.escape)));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// First logical line of an instruction, continuations folded
fn summarize(instruction: &Instruction, escape: char) -> String {
    let printed = print_instruction(instruction);
    let prefix = instruction.prefix().to_string();
    let body = printed.strip_prefix(prefix.as_str()).unwrap_or(&printed);

    let mut parts = Vec::new();
    let mut more = false;
    for line in body.lines() {
        let trimmed = line.trim_end();
        match trimmed.strip_suffix(escape) {
            Some(continued) => parts.push(continued.trim().to_string()),
            None => {
                parts.push(trimmed.trim().to_string());
                more = body.lines().count() > parts.len();
                break;
            }
        }
    }

    let mut summary = parts
        .iter()
        .filter(|part| !part.is_empty() && !part.starts_with('#'))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    if summary.chars().count() > SUMMARY_WIDTH {
        summary = summary.chars().take(SUMMARY_WIDTH - 3).collect::<String>() + "...";
    } else if more {
        summary.push_str(" ...");
    }
    summary
}

fn image_reference(stage: &Stage) -> String {
    let from = &stage.from;
    let mut reference = from.image.value();
    if let Some(tag) = &from.tag {
        reference.push(':');
        reference.push_str(&tag.value());
    }
    if let Some(digest) = &from.digest {
        reference.push('@');
        reference.push_str(&digest.value());
    }
    reference
}

/// Print the stage table of a document
pub fn print_stages(document: &Document) {
    let headers = ["#", "NAME", "IMAGE", "TAG", "DIGEST", "PLATFORM"];
    let optional = |argument: Option<&Argument>| {
        argument
            .map(Argument::value)
            .unwrap_or_else(|| "-".to_string())
    };

    let rows: Vec<[String; 6]> = document
        .stages()
        .iter()
        .enumerate()
        .map(|(index, stage)| {
            [
                index.to_string(),
                stage.name().unwrap_or_else(|| "-".to_string()),
                stage.from.image.value(),
                optional(stage.from.tag.as_ref()),
                optional(stage.from.digest.as_ref()),
                optional(stage.from.platform()),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = headers
        .iter()
        .zip(widths)
        .map(|(header, width)| format!("{header:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header.trim_end().bold());

    for row in &rows {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line.trim_end());
    }
}
