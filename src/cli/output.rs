//! Output formatting for `locate` and `config`
//!
//! JSON and YAML are meant for scripts; the human format is a short summary.

use anyhow::{Context, Result};

use crate::artifacts::ArtifactSelection;
use crate::config::WorkflowConfig;
use crate::recipe::PatchOutcome;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_selection(&self, selection: &ArtifactSelection) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(selection)
                .context("Failed to serialize artifact selection to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(selection)
                .context("Failed to serialize artifact selection to YAML"),
            OutputFormat::Human => Ok(format!(
                "\u{2713} Newest Artifacts\n{}\n\n\
                 \u{251C}\u{2500} Public:   {}\n\
                 \u{2514}\u{2500} Private:  {}\n",
                RULE,
                selection.public.display(),
                selection.private.display()
            )),
        }
    }

    pub fn format_config(&self, config: &WorkflowConfig) -> Result<String> {
        let config_map = config.to_display_map();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config_map)
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&config_map).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => {
                let mut output = String::new();
                output.push_str("bitbar-workflow Configuration\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                for (key, value) in &config_map {
                    output.push_str(&format!("  {:<16}{}\n", format!("{}:", key), value));
                }
                Ok(output)
            }
        }
    }
}

/// One-line summary printed after `patch`
pub fn describe_patch(outcome: &PatchOutcome, written_to: &std::path::Path) -> String {
    format!("\u{2713} {} in {}", outcome, written_to.display())
}
