//! Attack target acquisition.
//!
//! Hostile bots keep a target while it stays in sight and close to where it
//! was acquired. Friendly bots pick the closest enemy from scratch on every
//! tick so they never chase far from their post.
use tracing::debug;

use crate::colldet::{CollisionFilter, update_virtual_position};
use crate::config::SimConfig;
use crate::env::{DroidSpec, PathRequest};
use crate::geometry::{Gps, Point};
use crate::state::{AttackTarget, Bot, BotHandle, BotRegistry};

use super::TickContext;

/// A living target candidate, in the searching bot's level frame.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    target: AttackTarget,
    pos: Point,
}

/// The alive bot behind `handle`, refreshing a stale handle by id.
pub fn resolve_target(bots: &BotRegistry, handle: BotHandle) -> Option<&Bot> {
    let bot = match bots.resolve(handle) {
        Some(bot) => bot,
        None => bots.revalidate(handle).and_then(|fresh| bots.resolve(fresh))?,
    };
    (bot.is_alive() && bots.is_alive(bot.id)).then_some(bot)
}

/// Where `bot`'s current target stands, in `bot`'s level frame.
pub fn target_position(ctx: &TickContext<'_>, bot: &Bot) -> Option<Point> {
    match bot.target {
        AttackTarget::None => None,
        AttackTarget::Player => ctx.player_in(bot.pos.z).map(Gps::point),
        AttackTarget::Bot(handle) => {
            let target = resolve_target(&*ctx.bots, handle)?;
            update_virtual_position(&*ctx.ship, target.pos, bot.pos.z).map(Gps::point)
        }
    }
}

pub fn acquire_target_for_hostile(ctx: &TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) {
    refresh_handle(&*ctx.bots, bot);
    if retains_target(ctx, bot, spec) {
        return;
    }
    let found = closest_reachable(ctx, bot, spec);
    set_target(bot, found);
}

pub fn acquire_target_for_friendly(ctx: &TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) {
    let found = closest_reachable(ctx, bot, spec);
    set_target(bot, found);
    bot.target_last_pos = None;
}

fn refresh_handle(bots: &BotRegistry, bot: &mut Bot) {
    if let AttackTarget::Bot(handle) = bot.target
        && bots.resolve(handle).is_none()
        && let Some(fresh) = bots.revalidate(handle)
    {
        bot.target = AttackTarget::Bot(fresh);
    }
}

fn retains_target(ctx: &TickContext<'_>, bot: &Bot, spec: &DroidSpec) -> bool {
    let (Some(pos), Some(last)) = (target_position(ctx, bot), bot.target_last_pos) else {
        return false;
    };
    let reach = 2.0 * spec.aggression_distance;
    if bot.pos.point().sq_distance(pos) > reach * reach {
        return false;
    }
    if pos.sq_distance(last) >= SimConfig::TARGET_FOLLOW_SLACK_SQ {
        return false;
    }
    if bot.target == AttackTarget::Player && !ctx.player.visible_to(spec.sensor) {
        return false;
    }
    sees(ctx, bot, spec, pos)
}

fn set_target(bot: &mut Bot, found: Option<Candidate>) {
    let target = found.map_or(AttackTarget::None, |c| c.target);
    if target != bot.target {
        debug!(bot = %bot.id, ?target, "target changed");
    }
    bot.target = target;
    bot.target_last_pos = found.map(|c| c.pos);
}

/// Every opponent on the bot's level, the player first.
fn candidates(ctx: &TickContext<'_>, bot: &Bot, spec: &DroidSpec) -> Vec<Candidate> {
    let z = bot.pos.z;
    let factions = ctx.oracles.factions;
    let mut found = Vec::new();

    if !factions.is_friendly(bot.faction, ctx.player.faction)
        && ctx.player.visible_to(spec.sensor)
        && let Some(pos) = ctx.player_in(z)
    {
        found.push(Candidate {
            target: AttackTarget::Player,
            pos: pos.point(),
        });
    }

    found.extend(
        ctx.bots
            .bots_on_level(z)
            .filter(|other| other.id != bot.id && other.is_alive())
            .filter(|other| !factions.is_friendly(bot.faction, other.faction))
            .map(|other| Candidate {
                target: AttackTarget::Bot(ctx.bots.handle(other.id)),
                pos: other.pos.point(),
            }),
    );
    found
}

/// The nearest candidate within aggression range that is both visible and
/// reachable.
fn closest_reachable(ctx: &TickContext<'_>, bot: &Bot, spec: &DroidSpec) -> Option<Candidate> {
    let me = bot.pos.point();
    let range2 = spec.aggression_distance * spec.aggression_distance;
    let mut best: Option<(f32, Candidate)> = None;

    for candidate in candidates(ctx, bot, spec) {
        let d2 = me.sq_distance(candidate.pos);
        if d2 > range2 || best.is_some_and(|(best_d2, _)| d2 >= best_d2) {
            continue;
        }
        if !sees(ctx, bot, spec, candidate.pos) || !reachable(ctx, bot, spec, candidate.pos) {
            continue;
        }
        best = Some((d2, candidate));
    }
    best.map(|(_, candidate)| candidate)
}

fn sees(ctx: &TickContext<'_>, bot: &Bot, spec: &DroidSpec, to: Point) -> bool {
    spec.sensor.sees_through_walls()
        || !ctx.map().direct_line_blocked(
            bot.pos.point(),
            to,
            bot.pos.z,
            Some(&CollisionFilter::VISIBLE),
        )
}

/// Ranged bots need a clear flight line; melee bots a short walkable path.
fn reachable(ctx: &TickContext<'_>, bot: &Bot, spec: &DroidSpec, to: Point) -> bool {
    let map = ctx.map();
    if !spec.weapon.melee {
        return !map.direct_line_blocked(
            bot.pos.point(),
            to,
            bot.pos.z,
            Some(&CollisionFilter::FLYABLE),
        );
    }
    let walkable = CollisionFilter::WALKABLE;
    let mut request = PathRequest::new(bot.pos, to, &walkable);
    request.max_points = SimConfig::MAX_INTERMEDIATE_POINTS + 1;
    ctx.oracles.pathfinder.find_path(&map, &request).is_ok()
}
