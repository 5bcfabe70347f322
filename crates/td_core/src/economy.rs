//! Gold balance and the price list.
//!
//! The economy is a plain unsigned balance with atomic spend semantics:
//! a purchase either debits the full amount or leaves the balance
//! untouched. All prices live here rather than on the entities so the
//! simulation has a single place to quote and charge them.

use serde::{Deserialize, Serialize};

use crate::tower::{TowerKind, MAX_TOWER_LEVEL};

/// Gold cost of placing a tower of the given kind.
#[must_use]
pub const fn tower_cost(kind: TowerKind) -> u32 {
    match kind {
        TowerKind::Basic => 100,
        TowerKind::Sniper => 200,
        TowerKind::Splash => 175,
        TowerKind::Slow => 125,
    }
}

/// Cost to upgrade a tower from `level` to `level + 1`.
///
/// Returns `None` at max level.
#[must_use]
pub fn tower_upgrade_cost(kind: TowerKind, level: u8) -> Option<u32> {
    if level >= MAX_TOWER_LEVEL {
        return None;
    }
    let base = tower_cost(kind) as f32;
    Some((base * 0.75 * f32::from(level)).floor() as u32)
}

/// Refund for selling a tower at the given level: 60% of everything
/// invested in it (placement plus upgrades paid so far).
#[must_use]
pub fn tower_sell_value(kind: TowerKind, level: u8) -> u32 {
    let mut invested = tower_cost(kind);
    for step in 1..level {
        invested += tower_upgrade_cost(kind, step).unwrap_or(0);
    }
    (invested as f32 * 0.6).floor() as u32
}

/// Cost of the next ballista fire-rate upgrade, `None` at max level.
#[must_use]
pub fn fire_rate_upgrade_cost(level: u8) -> Option<u32> {
    use crate::player::MAX_FIRE_RATE_LEVEL;
    if level >= MAX_FIRE_RATE_LEVEL {
        return None;
    }
    Some(50 + u32::from(level - 1) * 25)
}

/// Cost of the next ballista damage upgrade, `None` at max level.
#[must_use]
pub fn damage_upgrade_cost(level: u8) -> Option<u32> {
    const COSTS: [u32; 4] = [75, 125, 200, 300];
    COSTS.get(usize::from(level) - 1).copied()
}

/// The player's gold balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Economy {
    balance: u32,
}

impl Economy {
    /// Open an account with a starting balance.
    #[must_use]
    pub const fn new(starting_gold: u32) -> Self {
        Self {
            balance: starting_gold,
        }
    }

    /// Current balance.
    #[must_use]
    pub const fn balance(&self) -> u32 {
        self.balance
    }

    /// Whether the balance covers `amount`.
    #[must_use]
    pub const fn can_afford(&self, amount: u32) -> bool {
        self.balance >= amount
    }

    /// Debit `amount` if affordable. Returns `false` and leaves the
    /// balance untouched otherwise.
    pub fn spend(&mut self, amount: u32) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.balance -= amount;
        true
    }

    /// Credit `amount` (kill rewards, sell refunds).
    pub fn deposit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }
}
