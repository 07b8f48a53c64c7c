//! Scene assembly
//!
//! Turns a read-only view of the game state into screen-space triangles plus
//! text labels. Pure CPU work, so it is tested without a GPU.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::sim::combat::{blade_angle, blade_positions};
use crate::sim::{EnemyKind, GameState, PickupKind, TextValue};

/// Entities farther than this outside the frame are skipped
pub const CULL_MARGIN: f32 = 100.0;
const GRID_SIZE: f32 = 100.0;
const HP_BAR_WIDTH: f32 = 40.0;
const HP_BAR_HEIGHT: f32 = 6.0;

/// Floating text to be drawn by the 2D overlay
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Screen position in pixels
    pub pos: Vec2,
    pub text: TextValue,
    pub color: [f32; 4],
    pub alpha: f32,
}

/// One frame's geometry
#[derive(Debug, Default)]
pub struct DrawList {
    pub vertices: Vec<Vertex>,
    pub labels: Vec<Label>,
    pub enemies_drawn: usize,
    pub enemies_culled: usize,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.labels.clear();
        self.enemies_drawn = 0;
        self.enemies_culled = 0;
    }
}

fn on_screen(screen: Vec2, viewport: Vec2, margin: f32) -> bool {
    screen.x >= -margin
        && screen.y >= -margin
        && screen.x <= viewport.x + margin
        && screen.y <= viewport.y + margin
}

fn enemy_color(kind: EnemyKind) -> [f32; 4] {
    match kind {
        EnemyKind::Normal => colors::ENEMY_NORMAL,
        EnemyKind::Fast => colors::ENEMY_FAST,
        EnemyKind::Tank => colors::ENEMY_TANK,
    }
}

/// Rebuild `list` for the current state; `viewport` is in pixels
pub fn build_scene(state: &GameState, viewport: Vec2, segments: u32, list: &mut DrawList) {
    list.clear();
    let cam = state.camera;
    let out = &mut list.vertices;

    // Floor grid scrolls with the camera
    let ox = (-cam.x).rem_euclid(GRID_SIZE);
    let oy = (-cam.y).rem_euclid(GRID_SIZE);
    let mut x = ox;
    while x < viewport.x {
        shapes::line(out, Vec2::new(x, 0.0), Vec2::new(x, viewport.y), 2.0, colors::GRID);
        x += GRID_SIZE;
    }
    let mut y = oy;
    while y < viewport.y {
        shapes::line(out, Vec2::new(0.0, y), Vec2::new(viewport.x, y), 2.0, colors::GRID);
        y += GRID_SIZE;
    }

    for gem in &state.gems {
        let pos = gem.pos - cam;
        if on_screen(pos, viewport, CULL_MARGIN) {
            shapes::circle(out, pos, gem.radius, gem.color, segments.min(12));
        }
    }

    let bob = (state.elapsed * 5.0).sin() * 5.0;
    for pickup in &state.pickups {
        let pos = pickup.pos - cam + Vec2::new(0.0, bob);
        if !on_screen(pos, viewport, CULL_MARGIN) {
            continue;
        }
        let fill = match pickup.kind {
            PickupKind::Heal => colors::PICKUP_HEAL,
            PickupKind::BladeUp | PickupKind::PowerUp => colors::PICKUP_BUFF,
        };
        let half = Vec2::splat(15.0);
        shapes::rect(out, pos - half, pos + half, fill);
        shapes::rect_outline(out, pos - half, pos + half, 2.0, colors::OUTLINE);
    }

    for enemy in &state.enemies {
        let pos = enemy.pos - cam;
        if !on_screen(pos, viewport, CULL_MARGIN) {
            list.enemies_culled += 1;
            continue;
        }
        list.enemies_drawn += 1;

        if enemy.is_stunned() {
            shapes::circle(out, pos, enemy.radius + 5.0, colors::STUN_HALO, segments);
        }
        shapes::circle(out, pos, enemy.radius, enemy_color(enemy.kind), segments);

        let pct = (enemy.hp / enemy.max_hp).clamp(0.0, 1.0);
        let bar_min = pos + Vec2::new(-HP_BAR_WIDTH / 2.0, -enemy.radius - 15.0);
        shapes::rect(
            out,
            bar_min,
            bar_min + Vec2::new(HP_BAR_WIDTH, HP_BAR_HEIGHT),
            colors::HP_BACK,
        );
        let fill = if pct < 0.3 { colors::HP_LOW } else { colors::HP_OK };
        shapes::rect(
            out,
            bar_min,
            bar_min + Vec2::new(HP_BAR_WIDTH * pct, HP_BAR_HEIGHT),
            fill,
        );
    }

    let player = &state.player;
    let player_pos = player.pos - cam;

    if state.roar.active {
        let r = state.roar.radius;
        let color = with_alpha(colors::ROAR, state.roar.alpha);
        shapes::ring(out, player_pos, (r - 5.0).max(0.0), r + 5.0, color, segments * 2);
    }

    shapes::circle(out, player_pos, player.radius * 1.4, colors::PLAYER_GLOW, segments);
    shapes::circle(out, player_pos, player.radius, colors::PLAYER, segments);

    let (blades, count) = blade_positions(player, state.blade_angle);
    let self_spin = state.elapsed * 20.0;
    for (i, blade) in blades[..count].iter().enumerate() {
        let facing = blade_angle(state.blade_angle, i as u32, count as u32) + self_spin;
        shapes::blade(
            out,
            *blade - cam,
            facing,
            player.blade_size,
            colors::BLADE,
            colors::BLADE_CORE,
        );
    }

    for p in &state.particles {
        let pos = p.pos - cam;
        if on_screen(pos, viewport, CULL_MARGIN) {
            shapes::circle(out, pos, p.radius, with_alpha(p.color, p.life), 6);
        }
    }

    for text in &state.damage_texts {
        let pos = text.pos - cam;
        if on_screen(pos, viewport, CULL_MARGIN) {
            list.labels.push(Label {
                pos,
                text: text.value,
                color: text.color,
                alpha: text.life.clamp(0.0, 1.0),
            });
        }
    }
}
