use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use pronostic_db::store::{ColumnNames, DEFAULT_RETENTION_DAYS, LoadOptions};

use crate::analysis::generator::GenerationPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: PathBuf,
    pub delimiter: char,
    pub retention_days: u32,
    pub columns: ColumnNames,
    pub top_balls: usize,
    pub top_stars: usize,
    pub history_rows: usize,
    pub policy: GenerationPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: PathBuf::from("assets/euromillions_202002.csv"),
            delimiter: ';',
            retention_days: DEFAULT_RETENTION_DAYS,
            columns: ColumnNames::default(),
            top_balls: 10,
            top_stars: 5,
            history_rows: 20,
            policy: GenerationPolicy::default(),
        }
    }
}

impl Settings {
    /// Lit un fichier JSON ; les champs absents prennent leur valeur par défaut.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("JSON invalide dans {}", path.display()))?;
        log::info!("Configuration chargée depuis {}", path.display());
        Ok(settings)
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        if !self.delimiter.is_ascii() {
            bail!("Séparateur '{}' invalide : un caractère ASCII est attendu", self.delimiter);
        }
        Ok(LoadOptions {
            delimiter: self.delimiter as u8,
            retention_days: self.retention_days,
            columns: self.columns.clone(),
        })
    }
}
