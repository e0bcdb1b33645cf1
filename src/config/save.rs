use std::path::Path;

use anyhow::{Context, Result};

use super::types::SheetConfig;

/// Write export settings as pretty JSON, as produced by `splitsheet init`.
/// Zones are never part of a sheet config.
pub fn save_config(config: &SheetConfig, path: &Path) -> Result<()> {
    let mut content = serde_json::to_string_pretty(config)
        .with_context(|| "failed to serialize sheet config")?;
    content.push('\n');

    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadedConfig;

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.splitsheet");
        let config = SheetConfig {
            name: "hero".to_string(),
            background: Some("#00ff00".to_string()),
            ..SheetConfig::default()
        };

        save_config(&config, &path).unwrap();
        let loaded = LoadedConfig::load(&path).unwrap();

        assert_eq!(loaded.config, config);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(!text.contains("\"zones\""));
    }
}
