use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DrawError, DrawRecord, validate_draw};

pub const DEFAULT_RETENTION_DAYS: u32 = 730;

/// Formats acceptés pour la date de tirage, jour en premier.
/// `%y` passe avant `%Y`, sinon "17/02/26" serait lu comme l'an 26.
const DATE_FORMATS: [&str; 6] = [
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%Y%m%d",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Impossible d'ouvrir {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Fichier CSV illisible")]
    Csv(#[from] csv::Error),
    #[error("Colonne obligatoire absente : '{0}'")]
    MissingColumn(String),
}

/// Noms des colonnes du fichier FDJ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub balls: [String; 5],
    pub stars: [String; 2],
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "date_de_tirage".to_string(),
            balls: std::array::from_fn(|i| format!("boule_{}", i + 1)),
            stars: std::array::from_fn(|i| format!("etoile_{}", i + 1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub retention_days: u32,
    pub columns: ColumnNames,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            retention_days: DEFAULT_RETENTION_DAYS,
            columns: ColumnNames::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub kept: usize,
    pub bad_date: usize,
    pub out_of_window: usize,
    pub invalid_numbers: usize,
}

#[derive(Debug, Error)]
enum RowError {
    #[error("champ '{0}' absent")]
    MissingField(String),
    #[error("valeur '{value}' invalide pour '{column}'")]
    NotANumber { column: String, value: String },
    #[error(transparent)]
    Draw(#[from] DrawError),
}

/// Positions des colonnes utiles dans l'en-tête.
struct ColumnLayout<'a> {
    names: &'a ColumnNames,
    date: usize,
    balls: [usize; 5],
    stars: [usize; 2],
}

impl<'a> ColumnLayout<'a> {
    fn resolve(headers: &csv::StringRecord, names: &'a ColumnNames) -> Result<Self, LoadError> {
        let find = |name: &str| -> Result<usize, LoadError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        let date = find(&names.date)?;
        let mut balls = [0usize; 5];
        for (slot, name) in balls.iter_mut().zip(&names.balls) {
            *slot = find(name)?;
        }
        let mut stars = [0usize; 2];
        for (slot, name) in stars.iter_mut().zip(&names.stars) {
            *slot = find(name)?;
        }

        Ok(Self {
            names,
            date,
            balls,
            stars,
        })
    }

    fn number(&self, record: &csv::StringRecord, idx: usize, column: &str) -> Result<u8, RowError> {
        let raw = record
            .get(idx)
            .ok_or_else(|| RowError::MissingField(column.to_string()))?;
        raw.trim().parse::<u8>().map_err(|_| RowError::NotANumber {
            column: column.to_string(),
            value: raw.to_string(),
        })
    }

    fn numbers(&self, record: &csv::StringRecord) -> Result<([u8; 5], [u8; 2]), RowError> {
        let mut balls = [0u8; 5];
        for (i, slot) in balls.iter_mut().enumerate() {
            *slot = self.number(record, self.balls[i], &self.names.balls[i])?;
        }
        let mut stars = [0u8; 2];
        for (i, slot) in stars.iter_mut().enumerate() {
            *slot = self.number(record, self.stars[i], &self.names.stars[i])?;
        }
        validate_draw(&balls, &stars)?;
        Ok((balls, stars))
    }
}

pub fn parse_draw_date(raw: &str) -> Option<NaiveDate> {
    // Une heure éventuelle ("01/02/2025 20:15", "2025-02-01T20:15:00") est ignorée.
    let date = raw.trim().split([' ', 'T']).next()?;
    if date.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
}

/// Tirages retenus pour l'analyse, dans l'ordre du fichier source.
#[derive(Debug, Clone, Default)]
pub struct DrawRecordStore {
    records: Vec<DrawRecord>,
    report: LoadReport,
}

impl DrawRecordStore {
    /// Construit un store à partir de tirages déjà filtrés.
    pub fn from_records(records: Vec<DrawRecord>) -> Self {
        let report = LoadReport {
            rows_read: records.len(),
            kept: records.len(),
            ..LoadReport::default()
        };
        Self { records, report }
    }

    pub fn load(path: &Path, options: &LoadOptions, now: NaiveDateTime) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Chargement de {:?}", path);
        Self::from_reader(file, options, now)
    }

    /// Lit le CSV, ignore les lignes sans date valide ou aux numéros invalides,
    /// puis ne garde que les tirages datés d'au moins `now - retention_days`.
    pub fn from_reader<R: Read>(
        reader: R,
        options: &LoadOptions,
        now: NaiveDateTime,
    ) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let layout = ColumnLayout::resolve(&headers, &options.columns)?;

        // Pas de borne basse si la fenêtre dépasse le calendrier.
        let cutoff = now.checked_sub_signed(TimeDelta::days(i64::from(options.retention_days)));

        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for (i, row) in reader.records().enumerate() {
            let row = row?;
            let line = i + 2;
            report.rows_read += 1;

            let Some(date) = row.get(layout.date).and_then(parse_draw_date) else {
                log::debug!("Ligne {}: date illisible, ignorée", line);
                report.bad_date += 1;
                continue;
            };

            if cutoff.is_some_and(|cutoff| date.and_time(NaiveTime::MIN) < cutoff) {
                report.out_of_window += 1;
                continue;
            }

            match layout.numbers(&row) {
                Ok((balls, stars)) => records.push(DrawRecord { date, balls, stars }),
                Err(e) => {
                    log::warn!("Ligne {} ignorée : {}", line, e);
                    report.invalid_numbers += 1;
                }
            }
        }

        report.kept = records.len();
        log::info!(
            "{} tirages retenus sur {} lignes ({} dates illisibles, {} hors fenêtre, {} invalides)",
            report.kept,
            report.rows_read,
            report.bad_date,
            report.out_of_window,
            report.invalid_numbers
        );

        Ok(Self { records, report })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Tirages du plus récent au plus ancien ; à date égale, l'ordre du fichier est conservé.
    pub fn sorted_by_date_desc(&self) -> Vec<&DrawRecord> {
        let mut sorted: Vec<&DrawRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn most_recent(&self) -> Option<&DrawRecord> {
        self.records
            .iter()
            .reduce(|best, r| if r.date > best.date { r } else { best })
    }
}
