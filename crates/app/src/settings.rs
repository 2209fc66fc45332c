use chrono::{Local, NaiveDate};
use csv2ofx_core::date::{self, DatePolicy};
use csv2ofx_export::{CsvProfile, HeaderBinding, StatementConfig, TxnTemplate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::Cli;

pub const DEFAULT_SETTINGS_FILE: &str = "settings/settings.json";
pub const DEFAULT_TEMPLATE_FILE: &str = "settings/template.ofx";
pub const DEFAULT_OUTPUT_FILE: &str = "sample-data/result.ofx";
pub const DEFAULT_ENCODING: &str = "utf8";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("Failed to read settings file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed settings file {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unsupported output encoding: {0}")]
    UnsupportedEncoding(String),
}

/// On-disk settings document. camelCase keys, matching settings.json.
/// Every field is optional; missing ones fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub csv_date_format: String,
    pub csv_separator: String,
    pub csv_file: PathBuf,
    pub csv_headers: Vec<String>,
    pub date_error_policy: DatePolicy,
    pub template: TemplateBinding,
    pub tx_template: TxnTemplate,
    pub report_date: Option<String>,
}

/// The top-level binding values carried by the settings document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateBinding {
    pub bank_id: String,
    pub account_id: String,
    pub curr_date: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            csv_date_format: "M/D/YY".to_string(),
            csv_separator: ";".to_string(),
            csv_file: PathBuf::from("sample-data/sample.csv"),
            csv_headers: vec![
                "MEMO".to_string(),
                "DTPOSTED".to_string(),
                "HOUR".to_string(),
                "TRNAMT".to_string(),
                "BALAMT".to_string(),
                "CARDTYPE".to_string(),
            ],
            date_error_policy: DatePolicy::Lenient,
            template: TemplateBinding::default(),
            tx_template: default_tx_template(),
            report_date: None,
        }
    }
}

impl Default for TemplateBinding {
    fn default() -> Self {
        TemplateBinding {
            bank_id: "655".to_string(),
            account_id: "065526480972".to_string(),
            curr_date: String::new(),
        }
    }
}

fn default_tx_template() -> TxnTemplate {
    let mut template = Map::new();
    template.insert("TRNTYPE".to_string(), Value::String(String::new()));
    template.insert("DTPOSTED".to_string(), Value::String("{date}".to_string()));
    template.insert("TRNAMT".to_string(), Value::String(String::new()));
    template.insert("FITID".to_string(), Value::String("{date}{id}".to_string()));
    template.insert("MEMO".to_string(), Value::String(String::new()));
    TxnTemplate(template)
}

/// Fully-resolved run configuration: built-in defaults, then the settings
/// file, then command-line overrides, per field.
#[derive(Debug)]
pub struct Effective {
    pub csv_file: PathBuf,
    pub output_file: PathBuf,
    pub template_file: PathBuf,
    pub encoding: String,
    pub statement: StatementConfig,
}

pub fn resolve(cli: &Cli) -> Result<Effective, SettingsError> {
    let (settings_path, explicit) = match &cli.settings {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    let settings = load_settings(&settings_path, explicit)?;

    let encoding = cli
        .encoding
        .clone()
        .unwrap_or_else(|| DEFAULT_ENCODING.to_string());
    if !crate::encoding::is_supported(&encoding) {
        return Err(SettingsError::UnsupportedEncoding(encoding));
    }

    Ok(Effective {
        csv_file: cli.csv.clone().unwrap_or_else(|| settings.csv_file.clone()),
        output_file: cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
        template_file: cli
            .template
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_FILE)),
        encoding,
        statement: StatementConfig {
            profile: CsvProfile {
                separator: settings.csv_separator.clone(),
                columns: settings.csv_headers.clone(),
            },
            date_format: settings.csv_date_format.clone(),
            date_policy: settings.date_error_policy,
            txn_template: settings.tx_template.clone(),
            binding: HeaderBinding {
                bank_id: settings.template.bank_id.clone(),
                account_id: settings.template.account_id.clone(),
                curr_date: binding_date(&settings),
            },
        },
    })
}

/// Read the settings layer. A file missing from the *default* path means
/// the tool runs on defaults; a path the user named must exist, and
/// malformed content is always fatal.
fn load_settings(path: &Path, explicit: bool) -> Result<Settings, SettingsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return if explicit {
                Err(SettingsError::NotFound(path.to_path_buf()))
            } else {
                Ok(Settings::default())
            };
        }
        Err(source) => {
            return Err(SettingsError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut settings: Settings =
        serde_json::from_str(&content).map_err(|source| SettingsError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    if settings.report_date.is_none() {
        settings.report_date = Some(Local::now().date_naive().format("%Y-%m-%d").to_string());
    }
    Ok(settings)
}

/// The canonical YYYYMMDD binding date: `template.currDate` wins when set,
/// then the (possibly synthesized) report date, then today.
fn binding_date(settings: &Settings) -> String {
    let configured = if !settings.template.curr_date.trim().is_empty() {
        Some(settings.template.curr_date.as_str())
    } else {
        settings.report_date.as_deref()
    };
    let parsed: Option<NaiveDate> = configured.and_then(date::parse_binding_date);
    date::to_ofx_date(parsed.unwrap_or_else(|| Local::now().date_naive()))
}
