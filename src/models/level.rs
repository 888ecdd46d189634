//! Level: progression tiers derived from lifetime goals.
//!
//! The ladder partitions the non-negative integers: the first tier starts at
//! 0 and each following tier starts right after the previous one ends.
//! A user's level is computed on read, never stored.

use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// One progression tier with its inclusive goal range and reward.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub level: u32,
    pub name: String,
    pub min_goals: u32,
    pub max_goals: u32,
    pub reward: String,
}

impl Level {
    pub fn new(level: u32, name: &str, min_goals: u32, max_goals: u32, reward: &str) -> Self {
        Self {
            level,
            name: name.to_string(),
            min_goals,
            max_goals,
            reward: reward.to_string(),
        }
    }
}

/// The production ten-tier ladder.
pub fn default_ladder() -> Vec<Level> {
    vec![
        Level::new(1, "Estreante da Várzea", 0, 9, "Nenhum prêmio ainda"),
        Level::new(2, "Matador da Pelada", 10, 19, "Sorteio de brinde exclusivo"),
        Level::new(3, "Craque da Vila", 20, 49, "Cupom de boost + 24h"),
        Level::new(4, "Artilheiro do Bairro", 50, 99, "Sorteio R$50 em boost"),
        Level::new(5, "Ídolo Local", 100, 199, "Sorteio de camisa oficial"),
        Level::new(6, "Astro Estadual", 200, 399, "Sorteio de ticket VIP"),
        Level::new(7, "Maestro Nacional", 400, 699, "Gift Card R$100"),
        Level::new(8, "Bola de Ouro Regional", 700, 999, "Sorteio de prêmio exclusivo"),
        Level::new(9, "Lenda do Futebol", 1000, 1499, "Sorteio mensal de camisa"),
        Level::new(10, "Imortal das Quatro Linhas", 1500, 999_999, "Sorteio anual de viagem"),
    ]
}

/// Validate a replacement ladder: non-empty, ranges contiguous from 0 with
/// no gaps or overlaps, each range non-empty. Rejected edits leave the
/// stored ladder untouched.
pub fn validate_ladder(ladder: &[Level]) -> Result<(), GameError> {
    let first = ladder.first().ok_or(GameError::EmptyLadder)?;
    if first.min_goals != 0 {
        return Err(GameError::LadderNotContiguous { level: first.level });
    }
    let mut expected_min = 0u32;
    for tier in ladder {
        if tier.min_goals != expected_min || tier.max_goals < tier.min_goals {
            return Err(GameError::LadderNotContiguous { level: tier.level });
        }
        expected_min = tier.max_goals + 1;
    }
    Ok(())
}

/// The tier `total_goals` falls in. Goals past the last tier's cap stay on
/// the last tier.
pub fn level_for_goals(ladder: &[Level], total_goals: u32) -> Option<&Level> {
    ladder
        .iter()
        .find(|l| total_goals >= l.min_goals && total_goals <= l.max_goals)
        .or_else(|| ladder.last())
}
