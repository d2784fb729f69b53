use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial store contents, imported with `--seed <file.json>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,

    /// Team names, in menu order
    #[serde(default)]
    pub teams: Vec<String>,

    #[serde(default)]
    pub schedule: Vec<SeedMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default = "default_allowed")]
    pub allowed: bool,
}

fn default_allowed() -> bool {
    true
}

/// A fixture; teams are referenced by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedMatch {
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub team1: String,
    pub team2: String,
}

impl SeedData {
    pub fn load_from_file(path: &Path) -> crate::error::Result<Self> {
        let display = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| crate::error::BotError::SeedLoad {
                path: display.clone(),
                source: e,
            })?;

        serde_json::from_str(&content).map_err(|e| crate::error::BotError::SeedParse {
            path: display,
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_with_defaults() {
        let json = r#"{
            "users": [{"id": 42, "name": "Анна"}],
            "teams": ["Каравелла", "Северянка"],
            "schedule": [
                {"date": "2024-03-01", "time": "19:00", "team1": "Каравелла", "team2": "Северянка"}
            ]
        }"#;

        let seed: SeedData = serde_json::from_str(json).unwrap();
        assert_eq!(seed.users.len(), 1);
        assert!(seed.users[0].allowed);
        assert_eq!(seed.users[0].nickname, "");
        assert_eq!(seed.teams, vec!["Каравелла", "Северянка"]);
        assert!(seed.schedule[0].result.is_none());
    }

    #[test]
    fn test_missing_seed_file() {
        let err = SeedData::load_from_file(Path::new("/nonexistent/seed.json")).unwrap_err();
        assert!(matches!(err, crate::error::BotError::SeedLoad { .. }));
    }
}
