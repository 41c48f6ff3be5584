use std::fmt;

use clap::ValueEnum;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pronostic_db::models::{GeneratedGrid, NumberKind};
use pronostic_db::store::DrawRecordStore;

use super::FrequencyRanking;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Les numéros les plus sortis
    #[default]
    Frequent,
    /// Les numéros les moins sortis
    Rare,
    /// Les plus sortis, sans ceux du dernier tirage
    Mixed,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Frequent, Strategy::Rare, Strategy::Mixed];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Frequent => "Fréquence",
            Strategy::Rare => "Retard",
            Strategy::Mixed => "Mixte",
        }
    }

    pub fn from_name(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "frequence" | "fréquence" | "frequent" | "freq" => Some(Strategy::Frequent),
            "retard" | "rare" => Some(Strategy::Rare),
            "mixte" | "mixed" | "mix" => Some(Strategy::Mixed),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seuils et tailles de pools des stratégies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationPolicy {
    pub min_distinct_balls: usize,
    pub min_distinct_stars: usize,
    /// Taille des pools des stratégies Fréquence et Retard.
    pub extreme_balls: usize,
    pub extreme_stars: usize,
    /// Taille des pools de la stratégie Mixte, avant exclusion du dernier tirage.
    pub mixed_balls: usize,
    pub mixed_stars: usize,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            min_distinct_balls: 20,
            min_distinct_stars: 5,
            extreme_balls: 20,
            extreme_stars: 5,
            mixed_balls: 25,
            mixed_stars: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(
        "Pas assez de données pour générer des numéros : {balls} boules et {stars} étoiles distinctes observées (minimum {min_balls} et {min_stars})"
    )]
    InsufficientData {
        balls: usize,
        stars: usize,
        min_balls: usize,
        min_stars: usize,
    },
    #[error(
        "Pas assez de numéros candidats pour la stratégie {strategy} : {balls} boules et {stars} étoiles"
    )]
    InsufficientPool {
        strategy: Strategy,
        balls: usize,
        stars: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePools {
    pub balls: Vec<u8>,
    pub stars: Vec<u8>,
}

/// Numéros parmi lesquels la stratégie tire sa grille, dans l'ordre du classement.
pub fn candidate_pools(
    strategy: Strategy,
    policy: &GenerationPolicy,
    ball_ranking: &FrequencyRanking,
    star_ranking: &FrequencyRanking,
    store: &DrawRecordStore,
) -> Result<CandidatePools, GenerationError> {
    let insufficient_data = || GenerationError::InsufficientData {
        balls: ball_ranking.distinct(),
        stars: star_ranking.distinct(),
        min_balls: policy.min_distinct_balls,
        min_stars: policy.min_distinct_stars,
    };

    if ball_ranking.distinct() < policy.min_distinct_balls
        || star_ranking.distinct() < policy.min_distinct_stars
    {
        return Err(insufficient_data());
    }

    let pools = match strategy {
        Strategy::Frequent => CandidatePools {
            balls: ball_ranking.top(policy.extreme_balls),
            stars: star_ranking.top(policy.extreme_stars),
        },
        Strategy::Rare => CandidatePools {
            balls: ball_ranking.bottom(policy.extreme_balls),
            stars: star_ranking.bottom(policy.extreme_stars),
        },
        Strategy::Mixed => {
            let recent = store.most_recent().ok_or_else(insufficient_data)?;
            CandidatePools {
                balls: without(ball_ranking.top(policy.mixed_balls), &recent.balls),
                stars: without(star_ranking.top(policy.mixed_stars), &recent.stars),
            }
        }
    };

    if pools.balls.len() < NumberKind::Balls.per_draw()
        || pools.stars.len() < NumberKind::Stars.per_draw()
    {
        return Err(GenerationError::InsufficientPool {
            strategy,
            balls: pools.balls.len(),
            stars: pools.stars.len(),
        });
    }

    Ok(pools)
}

fn without(mut pool: Vec<u8>, excluded: &[u8]) -> Vec<u8> {
    pool.retain(|n| !excluded.contains(n));
    pool
}

pub fn generate<R: Rng + ?Sized>(
    strategy: Strategy,
    policy: &GenerationPolicy,
    ball_ranking: &FrequencyRanking,
    star_ranking: &FrequencyRanking,
    store: &DrawRecordStore,
    rng: &mut R,
) -> Result<GeneratedGrid, GenerationError> {
    let pools = candidate_pools(strategy, policy, ball_ranking, star_ranking, store)?;
    log::debug!(
        "Stratégie {} : boules {:?}, étoiles {:?}",
        strategy,
        pools.balls,
        pools.stars
    );

    Ok(GeneratedGrid {
        balls: pick(&pools.balls, rng),
        stars: pick(&pools.stars, rng),
    })
}

/// Tirage uniforme sans remise, trié. `pool` contient au moins N numéros distincts.
fn pick<const N: usize, R: Rng + ?Sized>(pool: &[u8], rng: &mut R) -> [u8; N] {
    let mut picked = [0u8; N];
    for (slot, &n) in picked.iter_mut().zip(pool.choose_multiple(rng, N)) {
        *slot = n;
    }
    picked.sort();
    picked
}
