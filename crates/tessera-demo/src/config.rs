use std::path::PathBuf;
use std::str::FromStr;

/// Demo settings, read from `TESSERA_*` environment variables.
///
/// | variable                 | default            |
/// |--------------------------|--------------------|
/// | `TESSERA_ROTATION_SPEED` | `1.0`              |
/// | `TESSERA_ATLAS_SIZE`     | `4` (4×4 checker)  |
/// | `TESSERA_TILE`           | unset (full quad)  |
/// | `TESSERA_ATLAS_PATH`     | unset (checker)    |
/// | `TESSERA_FIXED_STEP`     | `false`            |
///
/// Values that fail to parse are logged and replaced by the default.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,

    pub rotation_speed: f32,
    /// Atlas grid is `atlas_size × atlas_size`; also the checkerboard size.
    pub atlas_size: u32,
    pub initial_tile: Option<u32>,
    pub atlas_path: Option<PathBuf>,
    /// Advance the spin a fixed step per frame instead of by elapsed time.
    pub fixed_step: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            width: 800.0,
            height: 600.0,
            rotation_speed: 1.0,
            atlas_size: 4,
            initial_tile: None,
            atlas_path: None,
            fixed_step: false,
        }
    }
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let atlas_size = match parsed(&lookup, "TESSERA_ATLAS_SIZE") {
            Some(0) => {
                log::warn!("TESSERA_ATLAS_SIZE must be at least 1; using {}", defaults.atlas_size);
                defaults.atlas_size
            }
            Some(n) => n,
            None => defaults.atlas_size,
        };

        Self {
            rotation_speed: parsed(&lookup, "TESSERA_ROTATION_SPEED")
                .unwrap_or(defaults.rotation_speed),
            atlas_size,
            initial_tile: parsed(&lookup, "TESSERA_TILE"),
            atlas_path: lookup("TESSERA_ATLAS_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            fixed_step: lookup("TESSERA_FIXED_STEP")
                .map(|v| parse_flag("TESSERA_FIXED_STEP", &v))
                .unwrap_or(defaults.fixed_step),
            ..defaults
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("ignoring {key}={raw:?}: {e}");
            None
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" | "" => false,
        _ => {
            log::warn!("ignoring {key}={raw:?}: expected a boolean");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> DemoConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DemoConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]), DemoConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let c = config(&[
            ("TESSERA_ROTATION_SPEED", "2.5"),
            ("TESSERA_ATLAS_SIZE", "16"),
            ("TESSERA_TILE", "33"),
            ("TESSERA_ATLAS_PATH", "assets/font.png"),
            ("TESSERA_FIXED_STEP", "yes"),
        ]);
        assert_eq!(c.rotation_speed, 2.5);
        assert_eq!(c.atlas_size, 16);
        assert_eq!(c.initial_tile, Some(33));
        assert_eq!(c.atlas_path, Some(PathBuf::from("assets/font.png")));
        assert!(c.fixed_step);
    }

    #[test]
    fn bad_values_fall_back() {
        let c = config(&[
            ("TESSERA_ROTATION_SPEED", "fast"),
            ("TESSERA_ATLAS_SIZE", "0"),
            ("TESSERA_TILE", "-1"),
            ("TESSERA_ATLAS_PATH", "  "),
            ("TESSERA_FIXED_STEP", "maybe"),
        ]);
        assert_eq!(c, DemoConfig::default());
    }
}
