use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// Un tirage historique, déjà validé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub date: NaiveDate,
    pub balls: [u8; 5],
    pub stars: [u8; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Balls,
    Stars,
}

impl NumberKind {
    pub fn max(&self) -> u8 {
        match self {
            NumberKind::Balls => 50,
            NumberKind::Stars => 12,
        }
    }

    /// Numéros tirés par tirage : 5 boules, 2 étoiles.
    pub fn per_draw(&self) -> usize {
        match self {
            NumberKind::Balls => 5,
            NumberKind::Stars => 2,
        }
    }

    pub fn of<'a>(&self, draw: &'a DrawRecord) -> &'a [u8] {
        match self {
            NumberKind::Balls => &draw.balls,
            NumberKind::Stars => &draw.stars,
        }
    }

    pub fn contains(&self, number: u8) -> bool {
        (1..=self.max()).contains(&number)
    }

    fn check(&self, numbers: &[u8]) -> Result<(), DrawError> {
        let mut seen = 0u64;
        for &n in numbers {
            if !self.contains(n) {
                return Err(match self {
                    NumberKind::Balls => DrawError::BallOutOfRange(n),
                    NumberKind::Stars => DrawError::StarOutOfRange(n),
                });
            }
            let bit = 1u64 << n;
            if seen & bit != 0 {
                return Err(match self {
                    NumberKind::Balls => DrawError::DuplicateBall(n),
                    NumberKind::Stars => DrawError::DuplicateStar(n),
                });
            }
            seen |= bit;
        }
        Ok(())
    }

    pub fn label(&self) -> &'static str {
        match self {
            NumberKind::Balls => "Boules",
            NumberKind::Stars => "Étoiles",
        }
    }
}

/// Grille proposée : 5 boules et 2 étoiles, triées par ordre croissant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedGrid {
    pub balls: [u8; 5],
    pub stars: [u8; 2],
}

impl fmt::Display for GeneratedGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  +  {}",
            format_numbers(&self.balls),
            format_numbers(&self.stars)
        )
    }
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("Boule {0} hors limites (1-50)")]
    BallOutOfRange(u8),
    #[error("Étoile {0} hors limites (1-12)")]
    StarOutOfRange(u8),
    #[error("Boule en double : {0}")]
    DuplicateBall(u8),
    #[error("Étoile en double : {0}")]
    DuplicateStar(u8),
}

/// Premier numéro fautif, boules avant étoiles, dans l'ordre des colonnes.
pub fn validate_draw(balls: &[u8; 5], stars: &[u8; 2]) -> Result<(), DrawError> {
    NumberKind::Balls.check(balls)?;
    NumberKind::Stars.check(stars)
}
