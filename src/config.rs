use crate::week::WeekStart;
use color_eyre::eyre::{Result, WrapErr};
use directories::BaseDirs;
use serde::Deserialize;
use std::{fs, path::PathBuf};

const APP_DIR: &str = "mindful_diary";

#[derive(Debug, Clone)]
pub struct Config {
    /// Which weekday opens the week strip. Labels follow the same setting.
    pub week_start: WeekStart,
    /// chrono format for full dates (e.g. the title above the week strip).
    pub date_format: String,
    /// Ring the terminal bell when the mindfulness message changes.
    pub haptics: bool,
    /// Synthesizer command line, e.g. `espeak` or `say -v Samantha`. Speech is off when unset.
    pub speech_command: Option<String>,
    /// Speak every new motivational message without waiting for `s`.
    pub speak_messages: bool,
    pub log_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    week_start: Option<WeekStart>,
    date_format: Option<String>,
    haptics: Option<bool>,
    speech_command: Option<String>,
    speak_messages: Option<bool>,
    log_dir: Option<PathBuf>,
}

impl Config {
    /// Loads the first config file found and fills in defaults.
    /// A broken file is reported back alongside the defaults so it can be logged
    /// once logging is up.
    pub fn load() -> (Self, Option<color_eyre::Report>) {
        match Self::read_file_config() {
            Ok(file_config) => (Self::from_file(file_config), None),
            Err(e) => (Self::from_file(FileConfig::default()), Some(e)),
        }
    }

    fn from_file(file_config: FileConfig) -> Self {
        Self {
            week_start: file_config.week_start.unwrap_or_default(),
            date_format: file_config
                .date_format
                .unwrap_or_else(|| "%A, %B %-d, %Y".to_string()),
            haptics: file_config.haptics.unwrap_or(true),
            speech_command: file_config.speech_command,
            speak_messages: file_config.speak_messages.unwrap_or(false),
            log_dir: file_config.log_dir.unwrap_or_else(Self::default_log_dir),
        }
    }

    /// Default log directory: `{data_dir}/mindful_diary/logs`
    fn default_log_dir() -> PathBuf {
        match BaseDirs::new() {
            Some(base) => base.data_dir().join(APP_DIR).join("logs"),
            None => PathBuf::from("./logs"),
        }
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            v.push(b.home_dir().join(".config").join(APP_DIR).join("config.toml"));
            v.push(b.config_dir().join(APP_DIR).join("config.toml"));
        }
        v
    }

    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            let s = fs::read_to_string(&path)
                .wrap_err_with(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).wrap_err_with(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }
}
