//! Command-line interface for inspecting outline documents.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::citation::citation_text;
use crate::config::TEXT_WRAP_WIDTH;
use crate::element::{project_all, Element};
use crate::error::{EditorError, Result};
use crate::model::{load_outline_file, DefaultFactory, Diagnostic, ProvisionTree, Severity};
use crate::reducer::EditorState;
use crate::rules;

/// lexedit - Inspect structured legislative documents.
#[derive(Parser)]
#[command(name = "lexedit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every provision and print the findings.
    Validate {
        /// Outline file (YAML or JSON)
        file: PathBuf,
    },

    /// List the actions offered for one provision.
    Actions {
        /// Outline file (YAML or JSON)
        file: PathBuf,

        /// Position of the provision in reading order, as printed by `validate` (1-based)
        #[arg(short, long)]
        element: usize,
    },

    /// Print the read-model projection as JSON.
    Render {
        /// Outline file (YAML or JSON)
        file: PathBuf,
    },

    /// Print the quoted citation of one provision.
    Cite {
        /// Outline file (YAML or JSON)
        file: PathBuf,

        /// Position of the provision in reading order (1-based)
        #[arg(short, long)]
        element: usize,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => validate_command(&file),
        Commands::Actions { file, element } => actions_command(&file, element),
        Commands::Render { file } => render_command(&file),
        Commands::Cite { file, element } => cite_command(&file, element),
    }
}

fn load(file: &Path) -> Result<ProvisionTree> {
    let (state, _) = EditorState::load(load_outline_file(file, &DefaultFactory)?);
    Ok(state.tree().clone())
}

/// Projected element at a 1-based reading-order position.
fn element_at(tree: &ProvisionTree, position: usize) -> Result<Element> {
    let elements = project_all(tree);
    let count = elements.len();
    position
        .checked_sub(1)
        .and_then(|index| elements.into_iter().nth(index))
        .ok_or_else(|| {
            EditorError::InvalidDocument(format!(
                "element {position} is out of range (document has {count} provisions)"
            ))
        })
}

fn validate_command(file: &Path) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    spinner.set_message("Validating...");

    let tree = match load(file) {
        Ok(tree) => tree,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };
    spinner.finish_and_clear();

    let elements = project_all(&tree);
    let mut failing = 0;
    for (index, element) in elements.iter().enumerate() {
        print_element(index + 1, element);
        if element.diagnostics.iter().any(Diagnostic::is_error) {
            failing += 1;
        }
    }

    println!();
    if failing > 0 {
        return Err(EditorError::ValidationFailed(failing));
    }
    println!(
        "{} {} provisions checked",
        style("OK").green().bold(),
        elements.len()
    );
    Ok(())
}

fn print_element(position: usize, element: &Element) {
    let indent = "  ".repeat(element.depth);
    let head = format!("{indent}[{position}] ");
    let body = if element.label.is_empty() {
        element.text.clone()
    } else {
        format!("{} {}", element.label, element.text)
    };
    let subsequent = " ".repeat(head.chars().count());
    let options = textwrap::Options::new(TEXT_WRAP_WIDTH)
        .initial_indent(&head)
        .subsequent_indent(&subsequent);
    println!("{}", textwrap::fill(&body, options));

    for diagnostic in &element.diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => style("error").red().bold(),
            Severity::Warning => style("warning").yellow().bold(),
        };
        println!("{subsequent}{severity}: {}", diagnostic.message);
    }
}

fn actions_command(file: &Path, position: usize) -> Result<()> {
    let tree = load(file)?;
    let element = element_at(&tree, position)?;

    println!(
        "{} {}",
        style(&element.label).bold(),
        style(element.kind).cyan()
    );
    for action in rules::possible_actions(&tree, element.id) {
        println!("  {action}");
    }

    let describe = |action: Option<rules::Action>| {
        action.map_or_else(|| style("-".to_string()).dim(), |action| style(action.description()).green())
    };
    println!();
    println!("  Tab: {}", describe(rules::tab_action(&tree, element.id)));
    println!("  Shift+Tab: {}", describe(rules::shift_tab_action(&tree, element.id)));
    Ok(())
}

fn render_command(file: &Path) -> Result<()> {
    let tree = load(file)?;
    println!("{}", serde_json::to_string_pretty(&project_all(&tree))?);
    Ok(())
}

fn cite_command(file: &Path, position: usize) -> Result<()> {
    let tree = load(file)?;
    let element = element_at(&tree, position)?;
    println!("{}", citation_text(&tree, element.id)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::parse_from(["lexedit", "validate", "lei.yaml"]);
        let Commands::Validate { file } = cli.command else {
            unreachable!("parsed the validate subcommand");
        };
        assert_eq!(file, PathBuf::from("lei.yaml"));
    }

    #[test]
    fn test_cli_parse_actions_with_element() {
        let cli = Cli::parse_from(["lexedit", "actions", "lei.yaml", "--element", "3"]);
        let Commands::Actions { file, element } = cli.command else {
            unreachable!("parsed the actions subcommand");
        };
        assert_eq!(file, PathBuf::from("lei.yaml"));
        assert_eq!(element, 3);
    }

    #[test]
    fn test_cli_requires_element_for_actions() {
        assert!(Cli::try_parse_from(["lexedit", "actions", "lei.yaml"]).is_err());
    }
}
