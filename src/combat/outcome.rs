use serde::{Deserialize, Serialize};

use crate::combat::casualty::CasualtyBall;
use crate::combat::resolver::StateTable;

/// Aggregated result of a resolved battle. `loss` includes `stalemate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleOdds {
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
    /// Share of `loss` where both sides survive but neither can score a hit.
    pub stalemate: f64,
    pub expected_attacker_loss: f64,
    pub expected_defender_loss: f64,
}

impl BattleOdds {
    /// `(win, tie, loss, expected attacker loss, expected defender loss)`.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64) {
        (
            self.win,
            self.tie,
            self.loss,
            self.expected_attacker_loss,
            self.expected_defender_loss,
        )
    }

    pub fn total(&self) -> f64 {
        self.win + self.tie + self.loss
    }
}

/// Sum terminal-state probabilities into outcome chances and probability-weighted value lost.
pub fn aggregate(table: &StateTable, attack_ball: &CasualtyBall, defense_ball: &CasualtyBall) -> BattleOdds {
    let attacker_units = attack_ball.units();
    let defender_units = defense_ball.units();
    let attacker_value = f64::from(attack_ball.value());
    let defender_value = f64::from(defense_ball.value());

    let mut odds = BattleOdds::default();
    for (state, p) in table.iter() {
        let attacker_dead =
            state.attacker_casualties + state.anti_air_casualties >= attacker_units;
        let defender_dead = state.defender_casualties >= defender_units;

        let (attacker_left, defender_left) = match (attacker_dead, defender_dead) {
            (true, true) => {
                odds.tie += p;
                (0.0, 0.0)
            }
            (true, false) => {
                odds.loss += p;
                let defenders = defense_ball.remaining_force(state.defender_casualties, 0);
                (0.0, f64::from(defenders.value()))
            }
            (false, true) => {
                odds.win += p;
                let attackers = attack_ball
                    .remaining_force(state.attacker_casualties, state.anti_air_casualties);
                (f64::from(attackers.value()), 0.0)
            }
            (false, false) => {
                odds.loss += p;
                odds.stalemate += p;
                let attackers = attack_ball
                    .remaining_force(state.attacker_casualties, state.anti_air_casualties);
                let defenders = defense_ball.remaining_force(state.defender_casualties, 0);
                (f64::from(attackers.value()), f64::from(defenders.value()))
            }
        };

        odds.expected_attacker_loss += p * (attacker_value - attacker_left);
        odds.expected_defender_loss += p * (defender_value - defender_left);
    }
    odds
}
