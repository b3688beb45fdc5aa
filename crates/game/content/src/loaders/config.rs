//! Motion tuning loader.

use std::path::Path;

use area_core::MotionConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for motion tuning from TOML files.
///
/// Missing keys fall back to [`MotionConfig::default`].
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<MotionConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MotionConfig> {
        let config: MotionConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse motion config TOML: {}", e))?;

        if config.gravity <= 0.0 {
            anyhow::bail!("gravity must be positive, got {}", config.gravity);
        }
        if u32::from(config.wiggle_tolerance) * 2 > MotionConfig::TILE_SIZE as u32 {
            anyhow::bail!(
                "wiggle_tolerance {} exceeds half a tile",
                config.wiggle_tolerance
            );
        }

        tracing::debug!(?config, "loaded motion config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("gravity = 0.25\n").expect("valid toml");
        assert_eq!(config.gravity, 0.25);
        assert_eq!(
            config.wiggle_tolerance,
            MotionConfig::DEFAULT_WIGGLE_TOLERANCE
        );
    }

    #[test]
    fn rejects_nonsense_tuning() {
        assert!(ConfigLoader::parse("gravity = 0.0\n").is_err());
        assert!(ConfigLoader::parse("wiggle_tolerance = 12\n").is_err());
        assert!(ConfigLoader::parse("gravity = \"heavy\"\n").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("motion.toml");
        std::fs::write(&path, "ledge_jump_speed = 1.5\nledge_jump_vz = 3.0\n").expect("write");

        let config = ConfigLoader::load(&path).expect("load config");
        assert_eq!(config.ledge_jump_speed, 1.5);
        assert_eq!(config.ledge_jump_vz, 3.0);
        assert!(ConfigLoader::load(&dir.path().join("missing.toml")).is_err());
    }
}
