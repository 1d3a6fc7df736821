//! Feature files: scenarios declared in YAML

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};

/// A feature with its scenarios, parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Feature title
    pub feature: String,

    #[serde(default)]
    pub description: String,

    /// Tags inherited by every scenario
    #[serde(default)]
    pub tags: Vec<String>,

    pub scenarios: Vec<ScenarioSpec>,

    /// File the feature was loaded from
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

/// One scenario: ordered step phrases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub steps: Vec<String>,
}

impl ScenarioSpec {
    /// Whether the scenario passes a tag filter. An empty filter matches
    /// everything; feature tags count as scenario tags.
    pub fn matches_tags(&self, feature: &FeatureSpec, filter: &[String]) -> bool {
        filter.is_empty()
            || filter
                .iter()
                .any(|tag| self.tags.contains(tag) || feature.tags.contains(tag))
    }
}

impl FeatureSpec {
    /// Parse a feature from a YAML string
    pub fn from_yaml(yaml: &str) -> HarnessResult<Self> {
        let feature: Self = serde_yaml::from_str(yaml)?;
        if feature.scenarios.iter().any(|s| s.steps.is_empty()) {
            return Err(HarnessError::FeatureParse(format!(
                "feature '{}' has a scenario without steps",
                feature.feature
            )));
        }
        Ok(feature)
    }

    /// Parse a feature from a YAML file
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut feature = Self::from_yaml(&content)
            .map_err(|e| HarnessError::FeatureParse(format!("{}: {}", path.display(), e)))?;
        feature.path = Some(path.to_path_buf());
        Ok(feature)
    }

    /// Load all features below a directory, ordered by path
    pub fn load_all(dir: &Path) -> HarnessResult<Vec<Self>> {
        if !dir.is_dir() {
            return Err(HarnessError::FeatureParse(format!(
                "features directory not found: {}",
                dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        paths.iter().map(|p| Self::from_file(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGN_UP: &str = r#"
feature: Sign up
description: New users create and activate an account
tags: [accounts]
scenarios:
  - name: Successful sign-up
    tags: [smoke]
    steps:
      - Given Tanya has created an account
      - When Tanya activates her account
      - Then Tanya should be authenticated
  - name: Try to sign in without activating account
    steps:
      - Given Bob has created an account
      - When Bob tries to sign in
"#;

    #[test]
    fn test_parse_feature() {
        let feature = FeatureSpec::from_yaml(SIGN_UP).unwrap();
        assert_eq!(feature.feature, "Sign up");
        assert_eq!(feature.scenarios.len(), 2);
        assert_eq!(feature.scenarios[0].steps[1], "When Tanya activates her account");
        assert!(feature.path.is_none());
    }

    #[test]
    fn test_scenario_without_steps_is_rejected() {
        let yaml = "feature: Empty\nscenarios:\n  - name: nothing\n    steps: []\n";
        assert!(matches!(
            FeatureSpec::from_yaml(yaml),
            Err(HarnessError::FeatureParse(_))
        ));
    }

    #[test]
    fn test_tag_filter() {
        let feature = FeatureSpec::from_yaml(SIGN_UP).unwrap();
        let smoke = vec!["smoke".to_string()];
        let accounts = vec!["accounts".to_string()];

        assert!(feature.scenarios[0].matches_tags(&feature, &[]));
        assert!(feature.scenarios[0].matches_tags(&feature, &smoke));
        assert!(!feature.scenarios[1].matches_tags(&feature, &smoke));
        assert!(feature.scenarios[1].matches_tags(&feature, &accounts));
    }

    #[test]
    fn test_load_all_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/a.yml"), SIGN_UP).unwrap();
        std::fs::write(
            dir.path().join("b.yaml"),
            SIGN_UP.replace("Sign up", "Sign up again"),
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let features = FeatureSpec::load_all(dir.path()).unwrap();

        let names: Vec<_> = features.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, ["Sign up again", "Sign up"]);
        assert!(features[1].path.as_ref().unwrap().ends_with("nested/a.yml"));
    }

    #[test]
    fn test_load_all_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.yaml"), "feature: [").unwrap();

        let err = FeatureSpec::load_all(dir.path()).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }
}
