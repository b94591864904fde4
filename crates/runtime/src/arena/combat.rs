//! Bite hit detection.
//!
//! Runs after every agent has moved. Each biting agent hits at most one
//! victim per swing: the first eligible agent in registration order whose
//! body intersects the bite volume and who stands in front of the attacker.

use game_core::{Agent, GameConfig, is_in_front};

/// Index of the agent `attacker` connects with, if any.
pub fn find_victim(attacker: usize, agents: &[Agent], active: &[bool], config: &GameConfig) -> Option<usize> {
    let biter = agents.get(attacker)?;
    if !active.get(attacker).copied().unwrap_or(false) || !biter.is_biting() || biter.is_dying() {
        return None;
    }
    let bite = biter.bite(&config.agent);
    let forward = biter.forward();

    agents
        .iter()
        .zip(active)
        .enumerate()
        .filter(|(index, (_, active))| *index != attacker && **active)
        .find(|(_, (victim, _))| {
            victim.is_interactive()
                && bite.intersects(&victim.body_box(&config.agent))
                && is_in_front(biter.position, forward, victim.position, config.combat.facing_dot)
        })
        .map(|(index, _)| index)
}

/// Mutable references to two distinct agents.
pub fn pair_mut(agents: &mut [Agent], a: usize, b: usize) -> Option<(&mut Agent, &mut Agent)> {
    if a == b || a >= agents.len() || b >= agents.len() {
        return None;
    }
    if a < b {
        let (left, right) = agents.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = agents.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}
