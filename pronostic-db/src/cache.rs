use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::store::{DrawRecordStore, LoadError, LoadOptions};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    options: LoadOptions,
    day: NaiveDate,
}

/// Mémorise les chargements par (fichier, options, jour de `now`).
/// Les échecs ne sont jamais mis en cache.
#[derive(Debug, Default)]
pub struct StoreCache {
    entries: HashMap<CacheKey, Rc<DrawRecordStore>>,
}

impl StoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &mut self,
        path: &Path,
        options: &LoadOptions,
        now: NaiveDateTime,
    ) -> Result<Rc<DrawRecordStore>, LoadError> {
        let key = CacheKey {
            path: path.to_path_buf(),
            options: options.clone(),
            day: now.date(),
        };

        if let Some(store) = self.entries.get(&key) {
            log::debug!("Tirages de {:?} servis depuis le cache", path);
            return Ok(Rc::clone(store));
        }

        let store = Rc::new(DrawRecordStore::load(path, options, now)?);
        self.entries.insert(key, Rc::clone(&store));
        Ok(store)
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_V1: &str = "date_de_tirage;boule_1;boule_2;boule_3;boule_4;boule_5;etoile_1;etoile_2\n\
                          01/12/2025;1;2;3;4;5;1;2\n";
    const CSV_V2: &str = "date_de_tirage;boule_1;boule_2;boule_3;boule_4;boule_5;etoile_1;etoile_2\n\
                          01/12/2025;1;2;3;4;5;1;2\n\
                          05/12/2025;6;7;8;9;10;3;4\n";

    fn temp_csv(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pronostic-{}-{}.csv", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_same_day_hits_cache() {
        let path = temp_csv("same-day", CSV_V1);
        let options = LoadOptions::default();
        let mut cache = StoreCache::new();

        let first = cache.get_or_load(&path, &options, at(2026, 1, 1, 9)).unwrap();
        std::fs::write(&path, CSV_V2).unwrap();
        let second = cache.get_or_load(&path, &options, at(2026, 1, 1, 18)).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
        assert_eq!(cache.len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalidate_reloads() {
        let path = temp_csv("invalidate", CSV_V1);
        let options = LoadOptions::default();
        let mut cache = StoreCache::new();

        let first = cache.get_or_load(&path, &options, at(2026, 1, 1, 9)).unwrap();
        std::fs::write(&path, CSV_V2).unwrap();
        cache.invalidate();
        assert!(cache.is_empty());
        let second = cache.get_or_load(&path, &options, at(2026, 1, 1, 9)).unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_new_day_or_window_reloads() {
        let path = temp_csv("new-day", CSV_V1);
        let options = LoadOptions::default();
        let mut cache = StoreCache::new();

        let first = cache.get_or_load(&path, &options, at(2026, 1, 1, 9)).unwrap();
        let next_day = cache.get_or_load(&path, &options, at(2026, 1, 2, 9)).unwrap();
        assert!(!Rc::ptr_eq(&first, &next_day));

        let narrow = LoadOptions {
            retention_days: 10,
            ..LoadOptions::default()
        };
        let narrowed = cache.get_or_load(&path, &narrow, at(2026, 1, 2, 9)).unwrap();
        assert!(narrowed.is_empty());
        assert_eq!(cache.len(), 3);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = StoreCache::new();
        let missing = Path::new("does/not/exist.csv");
        assert!(cache.get_or_load(missing, &LoadOptions::default(), at(2026, 1, 1, 9)).is_err());
        assert!(cache.is_empty());
    }
}
