use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use pronostic_db::models::{DrawRecord, GeneratedGrid, NumberKind};
use pronostic_db::store::DrawRecordStore;

use crate::analysis::generator::{GenerationError, GenerationPolicy, Strategy, generate};
use crate::analysis::{FrequencyRanking, rank};

/// Tirages chargés, classements calculés une fois, et générateur aléatoire propre à la session.
pub struct Session {
    store: Rc<DrawRecordStore>,
    balls: FrequencyRanking,
    stars: FrequencyRanking,
    policy: GenerationPolicy,
    rng: StdRng,
}

impl Session {
    pub fn new(store: Rc<DrawRecordStore>, policy: GenerationPolicy, seed: Option<u64>) -> Self {
        let rng: StdRng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let (balls, stars) = rank_both(&store);
        Self {
            store,
            balls,
            stars,
            policy,
            rng,
        }
    }

    /// Remplace les tirages et recalcule les classements. Le générateur aléatoire
    /// poursuit sa séquence : un rechargement ne rejoue pas les mêmes grilles.
    pub fn reload(&mut self, store: Rc<DrawRecordStore>) {
        let (balls, stars) = rank_both(&store);
        self.store = store;
        self.balls = balls;
        self.stars = stars;
    }

    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn ranking(&self, kind: NumberKind) -> &FrequencyRanking {
        match kind {
            NumberKind::Balls => &self.balls,
            NumberKind::Stars => &self.stars,
        }
    }

    pub fn top(&self, kind: NumberKind, n: usize) -> Vec<u8> {
        self.ranking(kind).top(n)
    }

    pub fn history(&self) -> Vec<&DrawRecord> {
        self.store.sorted_by_date_desc()
    }

    pub fn generate(&mut self, strategy: Strategy) -> Result<GeneratedGrid, GenerationError> {
        generate(
            strategy,
            &self.policy,
            &self.balls,
            &self.stars,
            &self.store,
            &mut self.rng,
        )
    }
}

fn rank_both(store: &DrawRecordStore) -> (FrequencyRanking, FrequencyRanking) {
    let balls = rank(store, NumberKind::Balls);
    let stars = rank(store, NumberKind::Stars);
    log::info!(
        "{} boules et {} étoiles distinctes sur {} tirages",
        balls.distinct(),
        stars.distinct(),
        store.len()
    );
    (balls, stars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::draw;
    use chrono::NaiveDate;

    fn store() -> Rc<DrawRecordStore> {
        let mut records = Vec::new();
        for i in 0..10u8 {
            let base = i * 5;
            records.push(draw(
                (2025, 3, 1 + u32::from(i)),
                [base + 1, base + 2, base + 3, base + 4, base + 5],
                [(i % 6) * 2 + 1, (i % 6) * 2 + 2],
            ));
        }
        Rc::new(DrawRecordStore::from_records(records))
    }

    #[test]
    fn test_session_exposes_rankings_and_history() {
        let session = Session::new(store(), GenerationPolicy::default(), Some(1));
        assert_eq!(session.record_count(), 10);
        assert!(!session.is_empty());
        assert_eq!(session.ranking(NumberKind::Balls).distinct(), 50);
        assert_eq!(session.ranking(NumberKind::Stars).total(), 20);
        assert_eq!(session.top(NumberKind::Stars, 3).len(), 3);

        let history = session.history();
        assert_eq!(history[0].balls, [46, 47, 48, 49, 50]);
        assert_eq!(history[9].balls, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_seeded_sessions_reproduce_grids() {
        let mut a = Session::new(store(), GenerationPolicy::default(), Some(20260217));
        let mut b = Session::new(store(), GenerationPolicy::default(), Some(20260217));
        for strategy in Strategy::ALL.into_iter().cycle().take(9) {
            assert_eq!(a.generate(strategy), b.generate(strategy));
        }
    }

    #[test]
    fn test_failure_does_not_poison_session() {
        // Une seule étoile candidate avant exclusion : le pool Mixte est trop petit.
        let policy = GenerationPolicy {
            mixed_stars: 1,
            ..GenerationPolicy::default()
        };
        let mut session = Session::new(store(), policy, Some(5));
        assert!(matches!(
            session.generate(Strategy::Mixed),
            Err(GenerationError::InsufficientPool { .. })
        ));
        assert!(session.generate(Strategy::Frequent).is_ok());
        assert_eq!(session.ranking(NumberKind::Balls).total(), 50);
    }

    #[test]
    fn test_empty_session() {
        let mut session = Session::new(Rc::new(DrawRecordStore::default()), GenerationPolicy::default(), None);
        assert!(session.is_empty());
        assert!(session.top(NumberKind::Balls, 10).is_empty());
        assert!(matches!(
            session.generate(Strategy::Rare),
            Err(GenerationError::InsufficientData { balls: 0, stars: 0, .. })
        ));
    }

    #[test]
    fn test_reload_keeps_rng_sequence() {
        let mut reloaded = Session::new(store(), GenerationPolicy::default(), Some(42));
        let mut continuous = Session::new(store(), GenerationPolicy::default(), Some(42));

        let first = reloaded.generate(Strategy::Frequent);
        assert_eq!(first, continuous.generate(Strategy::Frequent));

        reloaded.reload(store());
        assert_eq!(reloaded.generate(Strategy::Frequent), continuous.generate(Strategy::Frequent));
    }

    #[test]
    fn test_reload_recomputes_rankings() {
        let mut session = Session::new(store(), GenerationPolicy::default(), Some(3));
        let single = DrawRecordStore::from_records(vec![draw((2025, 4, 1), [1, 2, 3, 4, 5], [1, 2])]);
        session.reload(Rc::new(single));
        assert_eq!(session.record_count(), 1);
        assert_eq!(session.ranking(NumberKind::Balls).distinct(), 5);
        assert_eq!(session.history()[0].date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }
}
