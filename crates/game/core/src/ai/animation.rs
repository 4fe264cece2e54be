//! Animation phase bookkeeping.
//!
//! Phases are image indices; a cycle plays from `first` to `last` at its
//! speed factor. Stand and death cycles are offset by one image.
use crate::env::AnimationSet;
use crate::state::{AnimationKind, Bot};

/// Slower than this on both axes, a walking bot switches to standing.
const STAND_SPEED: f32 = 0.1;

/// Advances the bot's animation phase by one frame of `dt` seconds.
pub fn animate(bot: &mut Bot, set: &AnimationSet, dt: f32) {
    let anim = &mut bot.animation;
    match anim.kind {
        AnimationKind::Walk => {
            anim.phase += dt * set.walk.speed;
            if anim.phase >= set.walk.last {
                anim.phase = 0.0;
            }
            if bot.speed.x.abs() < STAND_SPEED && bot.speed.y.abs() < STAND_SPEED {
                anim.kind = AnimationKind::Stand;
                anim.phase = set.stand.first - 1.0;
            }
        }
        AnimationKind::Attack => {
            anim.phase += dt * set.attack.speed;
            if anim.phase >= set.attack.last {
                anim.kind = AnimationKind::Walk;
                anim.phase = 0.0;
            }
        }
        AnimationKind::GetHit => {
            anim.phase += dt * set.gethit.speed;
            if anim.phase >= set.gethit.last {
                anim.kind = AnimationKind::Walk;
                anim.phase = 0.0;
            }
        }
        AnimationKind::Death => {
            anim.phase += dt * set.death.speed;
            if anim.phase >= set.death.last - 1.0 {
                anim.phase = set.death.last - 1.0;
            }
        }
        AnimationKind::Stand => {
            anim.phase += dt * set.stand.speed;
            if anim.phase >= set.stand.last - 1.0 {
                anim.phase = set.stand.first - 1.0;
            }
        }
    }
}

/// Plays the get-hit cycle, if the droid type has one.
pub fn start_gethit(bot: &mut Bot, set: &AnimationSet) {
    if set.gethit.frames() > 0.0 {
        bot.animation.kind = AnimationKind::GetHit;
        bot.animation.phase = set.gethit.first + 0.1;
    }
}

/// Plays the attack cycle, if the droid type has more than one attack image.
pub fn start_attack(bot: &mut Bot, set: &AnimationSet) -> bool {
    if set.attack.frames() > 1.0 {
        bot.animation.kind = AnimationKind::Attack;
        bot.animation.phase = set.attack.first + 0.1;
        return true;
    }
    false
}

pub fn start_death(bot: &mut Bot, set: &AnimationSet) {
    bot.animation.kind = AnimationKind::Death;
    bot.animation.phase = set.death.first - 1.0 + 0.1;
}
