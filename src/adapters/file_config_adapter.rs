//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }

    fn get_section(&self, section: &str) -> Vec<(String, String)> {
        // The backing map does not preserve file order; sort by key so the
        // result is deterministic.
        let Some(map) = self.config.get_map_ref().get(&section.to_lowercase()) else {
            return Vec::new();
        };
        let mut pairs: Vec<(String, String)> = map
            .iter()
            .filter_map(|(key, value)| value.clone().map(|v| (key.clone(), v)))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[telegram]
bot_token = 123:abc
chat_id = 42

[session]
close = 15:30
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("telegram", "bot_token"),
            Some("123:abc".to_string())
        );
        assert_eq!(
            adapter.get_string("session", "close"),
            Some("15:30".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[engine]\nper_tick_cap = 3\n").unwrap();
        assert_eq!(adapter.get_string("engine", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[engine]\nper_tick_cap = 3\n").unwrap();
        assert_eq!(adapter.get_int("engine", "per_tick_cap", 0), 3);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[engine]\n").unwrap();
        assert_eq!(adapter.get_int("engine", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[engine]\nper_tick_cap = lots\n").unwrap();
        assert_eq!(adapter.get_int("engine", "per_tick_cap", 42), 42);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter = FileConfigAdapter::from_string("[engine]\nstop_atr_mult = 1.5\n").unwrap();
        assert_eq!(adapter.get_double("engine", "stop_atr_mult", 0.0), 1.5);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[engine]\nstop_atr_mult = not_a_number\n").unwrap();
        assert_eq!(adapter.get_double("engine", "stop_atr_mult", 9.9), 9.9);
    }

    #[test]
    fn get_bool_parses_common_forms() {
        let adapter =
            FileConfigAdapter::from_string("[engine]\na = true\nb = yes\nc = 0\n").unwrap();
        assert!(adapter.get_bool("engine", "a", false));
        assert!(adapter.get_bool("engine", "b", false));
        assert!(!adapter.get_bool("engine", "c", true));
        assert!(adapter.get_bool("engine", "missing", true));
    }

    #[test]
    fn get_section_returns_sorted_pairs() {
        let adapter = FileConfigAdapter::from_string(
            "[watchlist]\ntcs = TCS.NS\nreliance = RELIANCE.NS\nsbin = SBIN.NS\n",
        )
        .unwrap();
        let pairs = adapter.get_section("watchlist");
        assert_eq!(
            pairs,
            vec![
                ("reliance".to_string(), "RELIANCE.NS".to_string()),
                ("sbin".to_string(), "SBIN.NS".to_string()),
                ("tcs".to_string(), "TCS.NS".to_string()),
            ]
        );
    }

    #[test]
    fn get_section_empty_for_missing() {
        let adapter = FileConfigAdapter::from_string("[engine]\n").unwrap();
        assert!(adapter.get_section("watchlist").is_empty());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[telegram]\nchat_id = 42\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("telegram", "chat_id"),
            Some("42".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
