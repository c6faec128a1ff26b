//! Team colour schemes.
//!
//! Team names are only grouping keys for the layout engine; colours are looked
//! up here by the renderer. Defaults can be extended or overridden from a JSON
//! file mapping team name to `{ bg, border, text, progressBg }`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Name of the scheme used for teams without one of their own.
pub const FALLBACK_TEAM: &str = "Migración";

/// Colours for one team, as `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamColor {
    pub bg: String,
    pub border: String,
    pub text: String,
    pub progress_bg: String,
}

impl TeamColor {
    fn new(bg: &str, border: &str, text: &str, progress_bg: &str) -> Self {
        TeamColor {
            bg: bg.to_string(),
            border: border.to_string(),
            text: text.to_string(),
            progress_bg: progress_bg.to_string(),
        }
    }
}

/// Team name to colour scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamColors(BTreeMap<String, TeamColor>);

impl Default for TeamColors {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert(
            FALLBACK_TEAM.to_string(),
            TeamColor::new("#E5F6FD", "#0EA5E9", "#0369A1", "#BAE6FD"),
        );
        map.insert(
            "Entidad".to_string(),
            TeamColor::new("#F0FDF4", "#22C55E", "#166534", "#BBF7D0"),
        );
        map.insert(
            "Datos".to_string(),
            TeamColor::new("#FEF3F2", "#F43F5E", "#BE123C", "#FECDD3"),
        );
        map.insert(
            "Gestores".to_string(),
            TeamColor::new("#F5F3FF", "#8B5CF6", "#5B21B6", "#DDD6FE"),
        );
        TeamColors(map)
    }
}

impl TeamColors {
    /// Defaults overlaid with the schemes in `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let mut colors = TeamColors::default();
        if !path.exists() {
            return Ok(colors);
        }
        let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let overrides: TeamColors = serde_json::from_str(&text).map_err(|source| SourceError::Colors {
            path: path.to_path_buf(),
            source,
        })?;
        colors.0.extend(overrides.0);
        Ok(colors)
    }

    /// Scheme for `team`, falling back to the default team's scheme.
    pub fn get(&self, team: &str) -> TeamColor {
        self.0
            .get(team)
            .or_else(|| self.0.get(FALLBACK_TEAM))
            .cloned()
            .unwrap_or_else(|| TeamColor::new("#E5F6FD", "#0EA5E9", "#0369A1", "#BAE6FD"))
    }

    /// Whether `team` has a scheme of its own.
    pub fn contains(&self, team: &str) -> bool {
        self.0.contains_key(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unknown_team_uses_fallback_scheme() {
        let colors = TeamColors::default();
        assert_eq!(colors.get("Soporte"), colors.get(FALLBACK_TEAM));
        assert_eq!(colors.get("Gestores").border, "#8B5CF6");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let colors = TeamColors::load(&dir.path().join("colors.json")).unwrap();
        assert_eq!(colors, TeamColors::default());
    }

    #[test]
    fn test_file_overrides_and_extends() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r##"{{
                "Soporte": {{"bg": "#111111", "border": "#222222", "text": "#333333", "progressBg": "#444444"}},
                "Gestores": {{"bg": "#000000", "border": "#FFFFFF", "text": "#000000", "progressBg": "#888888"}}
            }}"##
        )
        .unwrap();
        let colors = TeamColors::load(f.path()).unwrap();
        assert!(colors.contains("Soporte"));
        assert_eq!(colors.get("Soporte").progress_bg, "#444444");
        assert_eq!(colors.get("Gestores").border, "#FFFFFF");
        assert!(colors.contains("Entidad"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{ not json").unwrap();
        assert!(matches!(TeamColors::load(f.path()), Err(SourceError::Colors { .. })));
    }
}
