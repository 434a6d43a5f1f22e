//! terradig demo
//!
//! First-person fly camera over a deformable heightfield. Left click digs at
//! the point under the crosshair, R flattens the ground again. A boulder sits
//! on the field to show that non-deformable bodies block digs.
//!
//! Controls: RMB drag to look, WASD to move, Q/E down/up.

use macroquad::prelude::*;
use macroquad::models::{Mesh, Vertex};
use terradig::game::{Collidable, DeformableBody, Digger, Events, InteractionConfig, StaticBody, Transform};
use terradig::math::{self as tmath, Ray};
use terradig::surface::{CollisionMesh, DeformerConfig, HeightfieldSurface, SurfaceMesh};

const DEFORMER_CONFIG_PATH: &str = "assets/config/deformer.ron";
const INTERACTION_CONFIG_PATH: &str = "assets/config/interaction.ron";

/// Cells per edge of one GPU batch (keeps indices well under macroquad's per-draw limit)
const TILE_CELLS: usize = 16;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("terradig v{}", terradig::VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Free-fly camera state
struct FlyCamera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    last_mouse: (f32, f32),
}

impl FlyCamera {
    fn forward(&self) -> Vec3 {
        vec3(
            self.pitch.cos() * self.yaw.sin(),
            -self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
        .normalize()
    }

    fn right(&self) -> Vec3 {
        vec3(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    fn update(&mut self, delta: f32) {
        let mouse_pos = mouse_position();
        let fly_speed = 4.0;

        // Mouse look (RMB drag)
        if is_mouse_button_down(MouseButton::Right) {
            let dx = mouse_pos.0 - self.last_mouse.0;
            let dy = mouse_pos.1 - self.last_mouse.1;
            self.yaw -= dx * 0.005;
            self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
        }
        self.last_mouse = mouse_pos;

        let forward = self.forward();
        let right = self.right();
        let mut move_delta = Vec3::ZERO;

        if is_key_down(KeyCode::W) {
            move_delta += forward;
        }
        if is_key_down(KeyCode::S) {
            move_delta -= forward;
        }
        if is_key_down(KeyCode::D) {
            move_delta -= right;
        }
        if is_key_down(KeyCode::A) {
            move_delta += right;
        }
        if is_key_down(KeyCode::E) {
            move_delta.y += 1.0;
        }
        if is_key_down(KeyCode::Q) {
            move_delta.y -= 1.0;
        }

        self.position += move_delta * fly_speed * delta;
    }

    fn camera(&self) -> Camera3D {
        Camera3D {
            position: self.position,
            target: self.position + self.forward(),
            up: vec3(0.0, 1.0, 0.0),
            ..Default::default()
        }
    }

    /// Ray through the crosshair, in terradig's math types
    fn ray(&self) -> Ray {
        Ray::new(from_gl(self.position), from_gl(self.forward()))
    }
}

fn from_gl(v: Vec3) -> tmath::Vec3 {
    tmath::Vec3::new(v.x, v.y, v.z)
}

fn to_gl(v: tmath::Vec3) -> Vec3 {
    vec3(v.x, v.y, v.z)
}

/// Load a RON config, falling back to defaults when it is missing or invalid
fn load_deformer_config() -> DeformerConfig {
    match DeformerConfig::load(DEFORMER_CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}: {}, using defaults", DEFORMER_CONFIG_PATH, e);
            DeformerConfig::default()
        }
    }
}

fn load_interaction_config() -> InteractionConfig {
    match InteractionConfig::load(INTERACTION_CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}: {}, using defaults", INTERACTION_CONFIG_PATH, e);
            InteractionConfig::default()
        }
    }
}

/// Axis-aligned box centered on the local origin, resting on y = 0
fn box_collision(half: f32, height: f32) -> CollisionMesh {
    let v = |x: f32, y: f32, z: f32| tmath::Vec3::new(x * half, y * height, z * half);
    let vertices = vec![
        v(-1.0, 0.0, -1.0), v(1.0, 0.0, -1.0), v(1.0, 0.0, 1.0), v(-1.0, 0.0, 1.0),
        v(-1.0, 1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, 1.0, 1.0), v(-1.0, 1.0, 1.0),
    ];
    let triangles = vec![
        [0, 2, 1], [0, 3, 2], // bottom
        [4, 5, 6], [4, 6, 7], // top
        [0, 1, 5], [0, 5, 4], // -z
        [2, 3, 7], [2, 7, 6], // +z
        [1, 2, 6], [1, 6, 5], // +x
        [3, 0, 4], [3, 4, 7], // -x
    ];
    CollisionMesh::new(vertices, triangles)
}

/// Earth color, darker the deeper the dig, lit by the vertex normal
fn shade(normal: tmath::Vec3, height: f32) -> Color {
    let light = tmath::Vec3::new(0.4, 1.0, 0.3).normalize();
    let lambert = 0.35 + 0.65 * normal.dot(light).max(0.0);
    let depth = (-height).clamp(0.0, 2.0) / 2.0;
    let base = (0.55 - 0.25 * depth, 0.42 - 0.2 * depth, 0.25 - 0.1 * depth);
    Color::new(base.0 * lambert, base.1 * lambert, base.2 * lambert, 1.0)
}

/// Split the surface into tiles small enough for u16 indices and one draw call
fn build_gpu_meshes(mesh: &SurfaceMesh, grid_size: usize, transform: &Transform) -> Vec<Mesh> {
    let stride = grid_size + 1;
    let mut tiles = Vec::new();

    for z0 in (0..grid_size).step_by(TILE_CELLS) {
        for x0 in (0..grid_size).step_by(TILE_CELLS) {
            let x1 = (x0 + TILE_CELLS).min(grid_size);
            let z1 = (z0 + TILE_CELLS).min(grid_size);
            let tile_stride = (x1 - x0 + 1) as u16;

            let mut vertices = Vec::with_capacity((x1 - x0 + 1) * (z1 - z0 + 1));
            for z in z0..=z1 {
                for x in x0..=x1 {
                    let i = z * stride + x;
                    let p = to_gl(transform.transform_point(mesh.vertices[i]));
                    let uv = mesh.uvs[i];
                    let color = shade(mesh.normals[i], mesh.vertices[i].y);
                    vertices.push(Vertex::new(p.x, p.y, p.z, uv.x, uv.y, color));
                }
            }

            let mut indices = Vec::with_capacity((x1 - x0) * (z1 - z0) * 6);
            for z in 0..(z1 - z0) as u16 {
                for x in 0..(x1 - x0) as u16 {
                    let top_left = z * tile_stride + x;
                    let top_right = top_left + 1;
                    let bottom_left = top_left + tile_stride;
                    let bottom_right = bottom_left + 1;
                    indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                    indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
                }
            }

            tiles.push(Mesh {
                vertices,
                indices,
                texture: None,
            });
        }
    }
    tiles
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    {
        crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);
        env_logger::init();
    }

    let deformer_config = load_deformer_config();
    let surface = match HeightfieldSurface::new(deformer_config) {
        Ok(surface) => surface,
        Err(e) => {
            log::error!("failed to create surface: {}", e);
            return;
        }
    };
    let grid_size = surface.config().grid_size;
    let extent = surface.extent();

    let mut terrain = DeformableBody::new(Transform::IDENTITY, surface);
    let boulder_half = (extent * 0.05).max(0.25);
    let mut boulder = StaticBody::new(
        Transform::from_position(tmath::Vec3::new(extent * 0.7, 0.0, extent * 0.3)),
        box_collision(boulder_half, boulder_half * 2.0),
    );

    let mut digger = Digger::new(load_interaction_config());
    let mut events = Events::new();
    let mut energy_spent: u64 = 0;

    let mut fly = FlyCamera {
        position: vec3(extent * 0.5, 2.0, -1.0),
        yaw: 0.0,
        pitch: 0.5,
        last_mouse: mouse_position(),
    };

    let mut gpu_meshes = build_gpu_meshes(terrain.surface.mesh(), grid_size, &terrain.transform);
    let mut uploaded_revision = terrain.surface.revision();

    log::info!("terradig ready: {} cell grid, extent {}", grid_size, extent);

    loop {
        let delta = get_frame_time();
        fly.update(delta);
        digger.update(delta);

        if is_key_pressed(KeyCode::R) {
            terrain.surface.reset();
        }

        if is_mouse_button_down(MouseButton::Left) {
            let ray = fly.ray();
            let mut bodies: [&mut dyn Collidable; 2] = [&mut terrain, &mut boulder];
            digger.try_dig(&ray, &mut bodies, &mut events);
        }

        for event in events.deformed.drain() {
            energy_spent += u64::from(event.energy_cost);
            log::info!(
                "dug at ({:.2}, {:.2}, {:.2}), {} cells",
                event.world_point.x,
                event.world_point.y,
                event.world_point.z,
                event.cells_affected
            );
        }

        if terrain.surface.revision() != uploaded_revision {
            gpu_meshes = build_gpu_meshes(terrain.surface.mesh(), grid_size, &terrain.transform);
            uploaded_revision = terrain.surface.revision();
        }

        clear_background(Color::from_rgba(120, 160, 200, 255));

        set_camera(&fly.camera());
        for mesh in &gpu_meshes {
            draw_mesh(mesh);
        }
        let boulder_center = to_gl(boulder.transform.position) + vec3(0.0, boulder_half, 0.0);
        let boulder_size = vec3(boulder_half * 2.0, boulder_half * 2.0, boulder_half * 2.0);
        draw_cube(boulder_center, boulder_size, None, GRAY);
        draw_cube_wires(boulder_center, boulder_size, DARKGRAY);

        set_default_camera();
        let (cx, cy) = (screen_width() / 2.0, screen_height() / 2.0);
        draw_line(cx - 8.0, cy, cx + 8.0, cy, 2.0, WHITE);
        draw_line(cx, cy - 8.0, cx, cy + 8.0, 2.0, WHITE);
        draw_text(
            &format!(
                "revision {}  energy spent {}  cooldown {:.2}s",
                terrain.surface.revision(),
                energy_spent,
                digger.cooldown_remaining()
            ),
            12.0,
            24.0,
            22.0,
            WHITE,
        );

        next_frame().await;
    }
}
