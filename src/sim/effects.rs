//! Cosmetic effects: particle bursts and floating texts
//!
//! Driven entirely by the events of the current step. Nothing here feeds
//! back into gameplay.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::state::{DamageText, GameState, Particle, TextValue, next_id};
use crate::consts::*;

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Highlighted text and level-up burst
pub const GOLD: [f32; 4] = [0.98, 0.75, 0.14, 1.0];
/// Blade hit sparks
pub const AMBER: [f32; 4] = [0.96, 0.62, 0.04, 1.0];
/// Death burst
pub const RED: [f32; 4] = [0.94, 0.27, 0.27, 1.0];

const HIT_PARTICLES: usize = 5;
const DEATH_PARTICLES: usize = 10;
const LEVEL_UP_PARTICLES: usize = 30;

/// Emit a burst of short-lived particles at `pos`, evicting the oldest ones
/// once the budget is reached
pub fn burst<R: Rng + ?Sized>(
    particles: &mut VecDeque<Particle>,
    limit: usize,
    ids: &mut u32,
    pos: Vec2,
    color: [f32; 4],
    count: usize,
    rng: &mut R,
) {
    if limit == 0 {
        return;
    }
    for _ in 0..count {
        if particles.len() >= limit {
            particles.pop_front();
        }
        let vel = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 300.0;
        particles.push_back(Particle {
            id: next_id(ids),
            pos,
            vel,
            radius: rng.random_range(2.0..6.0),
            color,
            life: 0.5 + rng.random::<f32>() * 0.5,
        });
    }
}

/// Float a text above `pos` with a little horizontal jitter
pub fn float_text<R: Rng + ?Sized>(
    texts: &mut VecDeque<DamageText>,
    limit: usize,
    pos: Vec2,
    value: TextValue,
    color: [f32; 4],
    rng: &mut R,
) {
    if limit == 0 {
        return;
    }
    if texts.len() >= limit {
        texts.pop_front();
    }
    texts.push_back(DamageText {
        pos: pos + Vec2::new(rng.random_range(-20.0..20.0), -30.0),
        value,
        color,
        life: DAMAGE_TEXT_LIFE,
    });
}

/// Turn this step's events into particles and texts
pub fn spawn_from_events<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let GameState {
        player,
        particles,
        damage_texts,
        events,
        particle_limit,
        text_limit,
        next_id,
        ..
    } = state;
    let (plimit, tlimit) = (*particle_limit, *text_limit);

    for event in events.iter() {
        match *event {
            GameEvent::BladeHit {
                pos,
                damage,
                highlighted,
            } => {
                burst(particles, plimit, next_id, pos, AMBER, HIT_PARTICLES, rng);
                let color = if highlighted { GOLD } else { WHITE };
                let value = TextValue::Number(damage.floor() as u32);
                float_text(damage_texts, tlimit, pos, value, color, rng);
            }
            GameEvent::Blocked { pos } => {
                float_text(damage_texts, tlimit, pos, TextValue::Label("BLOCK"), WHITE, rng);
            }
            GameEvent::EnemyKilled { pos, .. } => {
                burst(particles, plimit, next_id, pos, RED, DEATH_PARTICLES, rng);
            }
            GameEvent::EnemyStunned { pos } => {
                float_text(damage_texts, tlimit, pos, TextValue::Label("STUN"), GOLD, rng);
            }
            GameEvent::PickupCollected { kind, .. } => {
                let at = player.pos - Vec2::new(0.0, 50.0);
                float_text(damage_texts, tlimit, at, TextValue::Label(kind.label()), GOLD, rng);
            }
            GameEvent::LevelUp { pos, .. } => {
                let at = pos - Vec2::new(0.0, 80.0);
                float_text(damage_texts, tlimit, at, TextValue::Label("LEVEL UP!"), GOLD, rng);
                burst(particles, plimit, next_id, pos, GOLD, LEVEL_UP_PARTICLES, rng);
            }
            _ => {}
        }
    }
}

/// Move and age particles and texts; drop the expired ones
pub fn age_effects(state: &mut GameState, dt: f32) {
    state.particles.retain_mut(|p| {
        p.pos += p.vel * dt;
        p.life -= dt;
        p.life > 0.0
    });
    state.damage_texts.retain_mut(|t| {
        t.pos.y -= DAMAGE_TEXT_RISE * dt;
        t.life -= dt;
        t.life > 0.0
    });
}
