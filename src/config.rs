use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_practice_questions")]
    pub practice_questions: u32,
    #[serde(default = "default_timed_seconds")]
    pub timed_seconds: u32,
    #[serde(default = "default_endless_question_seconds")]
    pub endless_question_seconds: u32,
    #[serde(default = "default_boss_question_seconds")]
    pub boss_question_seconds: u32,
    #[serde(default = "default_max_lives")]
    pub max_lives: u32,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_practice_questions() -> u32 {
    10
}
fn default_timed_seconds() -> u32 {
    60
}
fn default_endless_question_seconds() -> u32 {
    10
}
fn default_boss_question_seconds() -> u32 {
    15
}
fn default_max_lives() -> u32 {
    3
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("numquest")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            practice_questions: default_practice_questions(),
            timed_seconds: default_timed_seconds(),
            endless_question_seconds: default_endless_question_seconds(),
            boss_question_seconds: default_boss_question_seconds(),
            max_lives: default_max_lives(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("numquest")
            .join("config.toml")
    }

    /// Clamp hand-edited values back into playable ranges.
    pub fn validate(&mut self) {
        self.practice_questions = self.practice_questions.clamp(1, 50);
        self.timed_seconds = self.timed_seconds.clamp(10, 600);
        self.endless_question_seconds = self.endless_question_seconds.clamp(3, 60);
        self.boss_question_seconds = self.boss_question_seconds.clamp(3, 60);
        self.max_lives = self.max_lives.clamp(1, 9);
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.practice_questions, 10);
        assert_eq!(config.timed_seconds, 60);
        assert_eq!(config.endless_question_seconds, 10);
        assert_eq!(config.boss_question_seconds, 15);
        assert_eq!(config.max_lives, 3);
        assert!(config.data_dir.contains("numquest"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
practice_questions = 20
max_lives = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.practice_questions, 20);
        assert_eq!(config.max_lives, 5);
        assert_eq!(config.timed_seconds, 60);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.practice_questions, deserialized.practice_questions);
        assert_eq!(config.data_dir, deserialized.data_dir);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.practice_questions = 0;
        config.timed_seconds = 5000;
        config.max_lives = 0;
        config.data_dir = "  ".to_string();
        config.validate();

        assert_eq!(config.practice_questions, 1);
        assert_eq!(config.timed_seconds, 600);
        assert_eq!(config.max_lives, 1);
        assert!(config.data_dir.contains("numquest"));
    }
}
