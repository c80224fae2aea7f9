//! Reading and writing recipe documents

use super::types::{describe, Recipe, Step};
use crate::error::{Result, WorkflowError};
use serde_yaml::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::debug;

/// Parses a YAML recipe.
///
/// The document must be a sequence of mappings, each with a string `action`.
/// Every other field of a step is kept as written.
pub fn parse_recipe(text: &str) -> Result<Recipe> {
    let document: Value = serde_yaml::from_str(text)
        .map_err(|e| WorkflowError::InvalidRecipeFormat(e.to_string()))?;

    let items = match document {
        Value::Sequence(items) => items,
        other => {
            return Err(WorkflowError::InvalidRecipeFormat(format!(
                "expected a list of steps, found {}",
                describe(&other)
            )))
        }
    };

    let mut steps = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let fields = match item {
            Value::Mapping(fields) => fields,
            other => {
                return Err(WorkflowError::InvalidRecipeFormat(format!(
                    "step {} is {}, expected a mapping",
                    index,
                    describe(&other)
                )))
            }
        };
        let step = Step::try_from(fields).map_err(|reason| {
            WorkflowError::InvalidRecipeFormat(format!("step {} has {}", index, reason))
        })?;
        steps.push(step);
    }

    Ok(Recipe::new(steps))
}

/// Serializes a recipe to block-style YAML
pub fn serialize_recipe(recipe: &Recipe) -> Result<String> {
    serde_yaml::to_string(recipe).map_err(|e| WorkflowError::Serialize(e.to_string()))
}

pub fn load_recipe(path: &Path) -> Result<Recipe> {
    if !path.is_file() {
        return Err(WorkflowError::MissingArtifactFile(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| WorkflowError::io(path, e))?;
    debug!(recipe = %path.display(), bytes = text.len(), "Recipe found");
    parse_recipe(&text)
}

/// Writes the recipe over `path`
pub fn write_recipe(recipe: &Recipe, path: &Path) -> Result<()> {
    let text = serialize_recipe(recipe)?;
    fs::write(path, text).map_err(|e| WorkflowError::io(path, e))?;
    debug!(recipe = %path.display(), "Recipe written");
    Ok(())
}

/// A patched recipe in a temporary file, removed on drop unless kept
#[derive(Debug)]
pub struct TempRecipe {
    path: TempPath,
}

impl TempRecipe {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists the file and returns its path
    pub fn keep(self) -> Result<PathBuf> {
        self.path
            .keep()
            .map_err(|e| WorkflowError::io(e.path.to_path_buf(), e.error))
    }

    /// Deletes the file, reporting failures instead of ignoring them on drop
    pub fn remove(self) -> Result<()> {
        let path = self.path.to_path_buf();
        self.path.close().map_err(|e| WorkflowError::io(path, e))
    }
}

/// Writes the recipe to a new temporary `.yml` file
pub fn write_temp_recipe(recipe: &Recipe) -> Result<TempRecipe> {
    let text = serialize_recipe(recipe)?;
    let tmp_dir = std::env::temp_dir();

    let mut file = tempfile::Builder::new()
        .prefix("recipe-")
        .suffix(".yml")
        .tempfile_in(&tmp_dir)
        .map_err(|e| WorkflowError::io(&tmp_dir, e))?;
    file.write_all(text.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| WorkflowError::io(file.path(), e))?;

    let path = file.into_temp_path();
    debug!(recipe = %path.display(), "Temporary recipe written");
    Ok(TempRecipe { path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
- action: user_login
  arguments:
    username: ci-bot
- action: project_create
  arguments:
    project_name: mozilla-docker
    retries: 3
  description: create project
- action: run_test
- action: close_project
"#;

    #[test]
    fn test_parse_sample_recipe() {
        let recipe = parse_recipe(SAMPLE).unwrap();

        assert_eq!(
            recipe.actions(),
            vec!["user_login", "project_create", "run_test", "close_project"]
        );
        assert_eq!(recipe.steps()[0].argument("username"), Some("ci-bot"));
        assert!(recipe.steps()[2].arguments().is_none());
        assert_eq!(
            recipe.steps()[1].field("description"),
            Some(&Value::from("create project"))
        );
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let recipe = parse_recipe(SAMPLE).unwrap();
        let text = serialize_recipe(&recipe).unwrap();
        let reparsed = parse_recipe(&text).unwrap();

        assert_eq!(reparsed, recipe);
        assert_eq!(
            reparsed.steps()[1].arguments().unwrap().get("retries"),
            Some(&Value::from(3))
        );
    }

    #[test]
    fn test_round_trip_keeps_unusual_step_shapes() {
        let text = "\
- action: wait
  arguments:
  - 30
  - seconds
- action: start
  arguments: null
- action: login
  note: !secret abc
";
        let recipe = parse_recipe(text).unwrap();

        assert_eq!(recipe.actions(), vec!["wait", "start", "login"]);
        assert!(recipe.steps()[0].arguments().unwrap().is_sequence());
        assert_eq!(recipe.steps()[0].argument("30"), None);
        assert_eq!(recipe.steps()[1].arguments(), Some(&Value::Null));

        let written = serialize_recipe(&recipe).unwrap();
        let reparsed = parse_recipe(&written).unwrap();
        assert_eq!(reparsed, recipe);

        let original: Value = serde_yaml::from_str(text).unwrap();
        let rewritten: Value = serde_yaml::from_str(&written).unwrap();
        assert_eq!(rewritten, original);
        assert!(written.contains("arguments: null"));
        assert!(written.contains("!secret"));
    }

    #[test]
    fn test_serialize_block_style() {
        let step = Step::new("upload_file").with_argument("test_filename", "/x/test.zip");
        let recipe = Recipe::from(vec![step]);
        let text = serialize_recipe(&recipe).unwrap();

        assert!(text.contains("- action: upload_file"));
        assert!(text.contains("  arguments:\n    test_filename: /x/test.zip"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_rejects_non_sequence_document() {
        let err = parse_recipe("action: upload_file\n").unwrap_err();
        match err {
            WorkflowError::InvalidRecipeFormat(msg) => assert!(msg.contains("a mapping")),
            other => panic!("Expected InvalidRecipeFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_document() {
        let err = parse_recipe("").unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidRecipeFormat(_)));
    }

    #[test]
    fn test_rejects_step_without_action() {
        let err = parse_recipe("- action: start\n- arguments: {}\n").unwrap_err();
        match err {
            WorkflowError::InvalidRecipeFormat(msg) => assert!(msg.contains("step 1")),
            other => panic!("Expected InvalidRecipeFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_scalar_step() {
        let err = parse_recipe("- start\n").unwrap_err();
        match err {
            WorkflowError::InvalidRecipeFormat(msg) => assert!(msg.contains("a string")),
            other => panic!("Expected InvalidRecipeFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_string_action() {
        let err = parse_recipe("- action: 7\n").unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidRecipeFormat(_)));
    }

    #[test]
    fn test_load_missing_recipe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yml");

        match load_recipe(&path).unwrap_err() {
            WorkflowError::MissingArtifactFile(p) => assert_eq!(p, path),
            other => panic!("Expected MissingArtifactFile, got {:?}", other),
        }
    }

    #[test]
    fn test_write_then_load_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipe.yml");
        let recipe = parse_recipe(SAMPLE).unwrap();

        write_recipe(&recipe, &path).unwrap();

        assert_eq!(load_recipe(&path).unwrap(), recipe);
    }

    #[test]
    fn test_temp_recipe_removed_on_drop() {
        let recipe = parse_recipe(SAMPLE).unwrap();
        let temp = write_temp_recipe(&recipe).unwrap();
        let path = temp.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("yml"));
        assert_eq!(load_recipe(&path).unwrap(), recipe);

        drop(temp);
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_recipe_keep_and_remove() {
        let recipe = parse_recipe(SAMPLE).unwrap();

        let kept = write_temp_recipe(&recipe).unwrap().keep().unwrap();
        assert!(kept.exists());
        fs::remove_file(&kept).unwrap();

        let temp = write_temp_recipe(&recipe).unwrap();
        let path = temp.path().to_path_buf();
        temp.remove().unwrap();
        assert!(!path.exists());
    }
}
