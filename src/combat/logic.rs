use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use tracing::{debug, info, warn};

use super::types::*;
use crate::boss::{
    apply_boss_mechanic, get_boss, random_boss, suppresses_turn, BossDefinition,
    BossMechanicKind, FINAL_BOSS,
};
use crate::bonuses::{
    apply_element_fusions, apply_equipment_to_unit, element_fusions, position_factor,
    total_gold, BonusEffect,
};
use crate::core::constants::*;
use crate::core::error::{GameError, GameResult};
use crate::core::game_state::GameState;
use crate::ranks::{advance_rank, boss_target_damage, is_boss_fight, target_damage};
use crate::synergy::{
    compute_synergies_with, healer_bonus, ActiveSynergy, SynergyDefinition, SYNERGY_DEFINITIONS,
};
use crate::units::{draw_combat_pool, refill_combat_pool, reroll_units, UnitId, UnitInstance};

/// Everything besides the squad that shapes a turn's damage.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub synergy_definitions: &'a [SynergyDefinition],
    pub synergy_levels: &'a BTreeMap<String, u32>,
    pub effects: &'a [BonusEffect],
    pub boss: Option<&'a BossMechanicKind>,
    pub bonus_sold: bool,
    pub remaining_rerolls: u32,
}

/// Output of the damage pipeline for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnDamage {
    pub damage: u64,
    pub synergies: Vec<ActiveSynergy>,
    pub contributions: Vec<UnitContribution>,
    pub suppressed: bool,
}

/// Runs the per-unit pipeline and combines the squad.
///
/// Each unit goes through synergies, the healer bonus, equipment, the boss
/// mechanic and finally the position bonus, in that order. The turn deals
/// `Σ damage × Σ multiplier` over the squad, not the sum of per-unit products.
pub fn compute_turn_damage(squad: &[UnitInstance], ctx: &TurnContext) -> TurnDamage {
    let squad = apply_element_fusions(squad, &element_fusions(ctx.effects));
    let synergies = compute_synergies_with(ctx.synergy_definitions, &squad, ctx.synergy_levels);
    let healers = healer_bonus(&squad);

    let mut contributions = Vec::with_capacity(squad.len());
    for (slot, unit) in squad.iter().enumerate() {
        let mut damage = unit.base_damage;
        let mut multiplier = unit.base_multiplier;

        for synergy in synergies.iter().filter(|s| s.applies_to(unit)) {
            damage += synergy.damage;
            multiplier += synergy.multiplier;
        }
        damage += healers;
        apply_equipment_to_unit(
            ctx.effects,
            unit,
            ctx.remaining_rerolls,
            &mut damage,
            &mut multiplier,
        );
        if let Some(mechanic) = ctx.boss {
            (damage, multiplier) =
                apply_boss_mechanic(mechanic, ctx.bonus_sold, damage, multiplier, unit);
        }
        multiplier *= position_factor(ctx.effects, slot);

        contributions.push(UnitContribution {
            unit_id: unit.id,
            name: unit.name.clone(),
            damage,
            multiplier,
        });
    }

    let suppressed = ctx
        .boss
        .is_some_and(|mechanic| suppresses_turn(mechanic, ctx.bonus_sold));
    let total_damage: u64 = contributions.iter().map(|c| c.damage).sum();
    let total_multiplier: u64 = contributions.iter().map(|c| c.multiplier).sum();
    let damage = if suppressed {
        0
    } else {
        total_damage * total_multiplier
    };

    TurnDamage {
        damage,
        synergies,
        contributions,
        suppressed,
    }
}

/// The boss for the current rank: the final boss at the top, otherwise the
/// remembered pick for this rank or a fresh random one.
pub fn select_boss(state: &mut GameState, rng: &mut impl Rng) -> &'static BossDefinition {
    let boss = if state.rank.is_final() {
        &FINAL_BOSS
    } else {
        match state.displayed_boss.as_deref().and_then(get_boss) {
            Some(boss) if boss.name != FINAL_BOSS.name => boss,
            _ => random_boss(rng),
        }
    };
    state.displayed_boss = Some(boss.name.to_string());
    boss
}

/// Idle → Active. Sets the target, picks the boss if any, and draws a fresh
/// combat pool. `boss_override` forces a boss or normal fight.
pub fn start_combat(
    state: &mut GameState,
    boss_override: Option<bool>,
    rng: &mut impl Rng,
) -> GameResult<CombatState> {
    if state.combat.is_active {
        return Err(GameError::CombatAlreadyActive);
    }
    if state.game_completed {
        return Err(GameError::GameCompleted);
    }

    let boss_fight = boss_override.unwrap_or_else(|| is_boss_fight(state.rank));
    let (target, boss) = if boss_fight {
        let def = select_boss(state, rng);
        let encounter = BossEncounter {
            name: def.name.to_string(),
            mechanic: def.mechanic,
        };
        (boss_target_damage(def, state.rank), Some(encounter))
    } else {
        (target_damage(state.rank), None)
    };

    let used = BTreeSet::new();
    let pool = draw_combat_pool(&state.roster, &used, state.config.combat_pool_size, rng);

    state.combat = CombatState {
        target_damage: target,
        total_damage: 0,
        round: 0,
        max_rounds: state.config.max_rounds,
        is_active: true,
        boss,
        bonus_sold_this_combat: false,
        combat_pool: pool,
        used_unit_ids: used,
        outcome: None,
    };

    info!(
        rank = %state.rank,
        target = target,
        boss = state.combat.boss_name().unwrap_or("-"),
        "Combat started"
    );
    Ok(state.combat.clone())
}

/// Filters a requested selection down to usable ids: in the combat pool,
/// not yet used, no repeats, at most `max_selected`.
pub fn select_squad_ids(combat: &CombatState, requested: &[UnitId], max_selected: usize) -> Vec<UnitId> {
    let mut chosen: Vec<UnitId> = Vec::new();
    for id in requested {
        if chosen.contains(id) {
            continue;
        }
        if !combat.combat_pool.contains(id) || combat.used_unit_ids.contains(id) {
            warn!(unit = %id, "Skipping unit not available this turn");
            continue;
        }
        chosen.push(*id);
    }
    if chosen.len() > max_selected {
        warn!(
            requested = chosen.len(),
            max = max_selected,
            "Too many units selected, keeping the first ones"
        );
        chosen.truncate(max_selected);
    }
    chosen
}

/// Active → Active, Victory or Defeat. Resolves one turn with the selected
/// units. An empty selection is a valid zero-damage turn.
pub fn resolve_turn(
    state: &mut GameState,
    selected: &[UnitId],
    rng: &mut impl Rng,
) -> GameResult<TurnReport> {
    if !state.combat.is_active {
        return Err(GameError::CombatNotActive);
    }

    let squad_ids = select_squad_ids(&state.combat, selected, state.config.max_selected);
    let squad = state.roster.resolve(&squad_ids);
    let effects = state.equipment_effects();
    let boss = state.combat.boss_mechanic().copied();
    let ctx = TurnContext {
        synergy_definitions: SYNERGY_DEFINITIONS,
        synergy_levels: &state.synergy_levels,
        effects: &effects,
        boss: boss.as_ref(),
        bonus_sold: state.combat.bonus_sold_this_combat,
        remaining_rerolls: state.remaining_rerolls(),
    };
    let turn = compute_turn_damage(&squad, &ctx);

    let combat = &mut state.combat;
    combat.total_damage += turn.damage;
    combat.round += 1;
    combat.used_unit_ids.extend(squad.iter().map(|u| u.id));
    let used = &combat.used_unit_ids;
    combat.combat_pool.retain(|id| !used.contains(id));

    // Counts once per turn however many times the formation could apply.
    if turn
        .synergies
        .iter()
        .any(|s| s.name == TRIGGER_MELEE_FORMATION)
    {
        state.bonuses.fire_trigger(TRIGGER_MELEE_FORMATION);
    }

    debug!(
        round = state.combat.round,
        units = squad.len(),
        turn_damage = turn.damage,
        total = state.combat.total_damage,
        target = state.combat.target_damage,
        suppressed = turn.suppressed,
        "Turn resolved"
    );

    let mut report = TurnReport {
        round: state.combat.round,
        turn_damage: turn.damage,
        total_damage: state.combat.total_damage,
        target_damage: state.combat.target_damage,
        synergies_active: turn.synergies,
        bonuses_active: effects,
        contributions: turn.contributions,
        suppressed: turn.suppressed,
        combat_over: false,
        victory: None,
        rewards: None,
    };

    if state.combat.total_damage >= state.combat.target_damage {
        report.rewards = Some(resolve_victory(state));
        report.combat_over = true;
        report.victory = Some(true);
    } else if state.combat.round >= state.combat.max_rounds {
        resolve_defeat(state);
        report.combat_over = true;
        report.victory = Some(false);
    } else {
        let combat = &mut state.combat;
        refill_combat_pool(
            &mut combat.combat_pool,
            &state.roster,
            &combat.used_unit_ids,
            state.config.combat_pool_size,
            rng,
        );
    }

    Ok(report)
}

/// Active → Victory. Applies rewards in a fixed order:
///
/// 1. base gold (higher for a boss) is added;
/// 2. the wealth bonus is computed on the new balance and added;
/// 3. end-of-combat counters are bumped;
/// 4. equipment gold is aggregated, seeing the bumped counters, and added;
/// 5. the rank advances (the final boss completes the game).
pub fn resolve_victory(state: &mut GameState) -> VictoryRewards {
    let base_gold = if state.combat.is_boss_fight() {
        BOSS_VICTORY_GOLD
    } else {
        NORMAL_VICTORY_GOLD
    };
    state.gold += base_gold;

    let wealth_bonus = (state.gold / WEALTH_BONUS_STEP) * WEALTH_BONUS_PER_STEP;
    state.gold += wealth_bonus;

    state.bonuses.fire_trigger(TRIGGER_END_OF_COMBAT);
    let equipment_gold = total_gold(&state.equipment_effects());
    state.gold += equipment_gold;

    let previous_rank = state.rank;
    let defeated_final_boss = state.rank.is_final() && state.combat.is_boss_fight();
    let step = advance_rank(state.rank);
    state.enter_rank(step.to);
    if defeated_final_boss {
        state.game_completed = true;
    }
    state.combats_won += 1;

    let rewards = VictoryRewards {
        base_gold,
        wealth_bonus,
        equipment_gold,
        previous_rank,
        new_rank: state.rank,
        game_completed: state.game_completed,
    };
    info!(
        gold = rewards.total_gold(),
        from = %previous_rank,
        to = %state.rank,
        "Combat won"
    );
    finish_combat(state, CombatOutcome::Victory);
    rewards
}

/// Active → Defeat. No reward, no penalty, rank unchanged.
pub fn resolve_defeat(state: &mut GameState) {
    state.combats_lost += 1;
    info!(
        total = state.combat.total_damage,
        target = state.combat.target_damage,
        rank = %state.rank,
        "Combat lost"
    );
    finish_combat(state, CombatOutcome::Defeat);
}

fn finish_combat(state: &mut GameState, outcome: CombatOutcome) {
    let combat = &mut state.combat;
    combat.is_active = false;
    combat.outcome = Some(outcome);
    combat.combat_pool.clear();
    combat.used_unit_ids.clear();
    state.shop = None;
    state.shop_refresh_count = 0;
}

/// Swaps the given pool units for random unused squad units. Costs one
/// reroll per call. Blocked while a sealing boss is unsold.
pub fn reroll(
    state: &mut GameState,
    ids: &[UnitId],
    rng: &mut impl Rng,
) -> GameResult<Vec<UnitId>> {
    if !state.combat.is_active {
        return Err(GameError::CombatNotActive);
    }
    if state.combat.is_sealed() {
        let name = state.combat.boss_name().unwrap_or_default().to_string();
        return Err(GameError::BlockedByBoss(name));
    }
    if state.remaining_rerolls() == 0 {
        return Err(GameError::NoRerollsLeft);
    }

    let rerollable: Vec<UnitId> = ids
        .iter()
        .copied()
        .filter(|id| state.combat.combat_pool.contains(id))
        .collect();
    if rerollable.is_empty() {
        return Ok(Vec::new());
    }

    let combat = &mut state.combat;
    let replacements = reroll_units(
        &mut combat.combat_pool,
        &rerollable,
        &state.roster,
        &mut combat.used_unit_ids,
        rng,
    );
    state.rerolls_used += 1;
    debug!(
        rerolled = rerollable.len(),
        replaced = replacements.len(),
        remaining = state.remaining_rerolls(),
        "Rerolled units"
    );
    Ok(replacements)
}
