pub mod generator;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use pronostic_db::models::NumberKind;
use pronostic_db::store::DrawRecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberCount {
    pub number: u8,
    pub count: u32,
}

/// Fréquences d'apparition d'un type de numéro sur l'ensemble des tirages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyRanking {
    /// Ordre de première apparition.
    seen: Vec<NumberCount>,
    /// Du plus au moins fréquent, ex aequo dans l'ordre de première apparition.
    ordered: Vec<NumberCount>,
}

impl FrequencyRanking {
    pub fn count(&self, number: u8) -> u32 {
        self.seen
            .iter()
            .find(|c| c.number == number)
            .map_or(0, |c| c.count)
    }

    pub fn distinct(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.seen.iter().map(|c| c.count).sum()
    }

    pub fn ordered(&self) -> &[NumberCount] {
        &self.ordered
    }

    pub fn top(&self, n: usize) -> Vec<u8> {
        self.ordered.iter().take(n).map(|c| c.number).collect()
    }

    pub fn bottom(&self, n: usize) -> Vec<u8> {
        let start = self.ordered.len().saturating_sub(n);
        self.ordered[start..].iter().map(|c| c.number).collect()
    }

    pub fn by_number(&self) -> Vec<NumberCount> {
        let mut sorted = self.seen.clone();
        sorted.sort_by_key(|c| c.number);
        sorted
    }
}

/// Compte les numéros emplacement par emplacement (toutes les premières boules,
/// puis toutes les deuxièmes, etc.), ce qui fixe l'ordre des ex aequo.
pub fn rank(store: &DrawRecordStore, kind: NumberKind) -> FrequencyRanking {
    let mut seen: Vec<NumberCount> = Vec::new();
    let mut index: HashMap<u8, usize> = HashMap::new();

    for slot in 0..kind.per_draw() {
        for record in store.records() {
            let number = kind.of(record)[slot];
            match index.entry(number) {
                Entry::Occupied(e) => seen[*e.get()].count += 1,
                Entry::Vacant(e) => {
                    e.insert(seen.len());
                    seen.push(NumberCount { number, count: 1 });
                }
            }
        }
    }

    let mut ordered = seen.clone();
    ordered.sort_by(|a, b| b.count.cmp(&a.count));

    FrequencyRanking { seen, ordered }
}
