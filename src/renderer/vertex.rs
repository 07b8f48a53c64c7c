//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position (pixels, later NDC) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Scale a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.12, 0.16, 0.22, 1.0];
    pub const GRID: [f32; 4] = [0.22, 0.25, 0.32, 1.0];
    pub const PLAYER: [f32; 4] = [0.97, 0.44, 0.44, 1.0];
    pub const PLAYER_GLOW: [f32; 4] = [0.98, 0.75, 0.14, 0.25];
    pub const BLADE: [f32; 4] = [0.96, 0.62, 0.04, 1.0];
    pub const BLADE_CORE: [f32; 4] = [1.0, 0.89, 0.89, 1.0];
    pub const ENEMY_NORMAL: [f32; 4] = [0.35, 0.38, 0.45, 1.0];
    pub const ENEMY_FAST: [f32; 4] = [0.86, 0.15, 0.15, 1.0];
    pub const ENEMY_TANK: [f32; 4] = [0.49, 0.23, 0.93, 1.0];
    pub const STUN_HALO: [f32; 4] = [0.99, 0.83, 0.30, 0.8];
    pub const HP_BACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const HP_OK: [f32; 4] = [0.06, 0.73, 0.51, 1.0];
    pub const HP_LOW: [f32; 4] = [0.94, 0.27, 0.27, 1.0];
    pub const PICKUP_HEAL: [f32; 4] = [0.06, 0.73, 0.51, 1.0];
    pub const PICKUP_BUFF: [f32; 4] = [0.96, 0.62, 0.04, 1.0];
    pub const OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const ROAR: [f32; 4] = [0.98, 0.75, 0.14, 1.0];
}
