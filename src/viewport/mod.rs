//! Model viewport
//!
//! Owns the camera, lights, contact shadow and orbit state, animates the
//! model root, renders the assembly into the framebuffer and turns pointer
//! input into assembly events.

pub mod animation;
pub mod environment;
pub mod shadow;

pub use animation::{idle_pose, IdlePose};
pub use environment::{EnvironmentLight, EnvironmentPreset};
pub use shadow::{ContactShadow, ContactShadowSettings};

use crate::assembly::{hit_test, Assembly, Hit, PointerInput, PointerRouter, SceneMesh};
use crate::model::GeometryLibrary;
use crate::rasterizer::{
    render_mesh, Camera, Framebuffer, Light, RasterSettings, ShadingMode, Vec3,
};
use crate::store::{MaterialId, SceneStore};
use crate::ui::{MouseState, Rect};
use macroquad::prelude::{draw_texture_ex, vec2, DrawTextureParams, FilterMode, Texture2D, WHITE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { position: [0.0, 0.0, 4.0], fov: 50.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotConfig {
    pub position: [f32; 3],
    pub intensity: f32,
    /// Half-angle of the cone in radians
    pub angle: f32,
    pub penumbra: f32,
}

impl Default for SpotConfig {
    fn default() -> Self {
        Self { position: [10.0, 15.0, 10.0], intensity: 0.5, angle: 0.1, penumbra: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Framebuffer height in pixels; width follows the window aspect
    pub render_height: usize,
    pub camera: CameraConfig,
    pub ambient: f32,
    pub spot: SpotConfig,
    pub environment: EnvironmentPreset,
    pub shadow: ContactShadowSettings,
    /// Multiplier on the default drag-to-rotate speed
    pub orbit_speed: f32,
    /// none, flat or gouraud
    pub shading: ShadingMode,
    /// Skip faces pointing away from the camera
    pub backface_cull: bool,
    pub dithering: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            render_height: 360,
            camera: CameraConfig::default(),
            ambient: 0.7,
            spot: SpotConfig::default(),
            environment: EnvironmentPreset::City,
            shadow: ContactShadowSettings::default(),
            orbit_speed: 1.0,
            shading: ShadingMode::Gouraud,
            backface_cull: false,
            dithering: false,
        }
    }
}

/// Azimuth-only orbit around a fixed target. Polar angle stays at the
/// horizon; no zoom, no pan.
#[derive(Debug, Clone)]
pub struct Orbit {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    speed: f32,
    last_drag: Option<(f32, f32)>,
}

impl Orbit {
    /// Start from a camera position looking at `target`
    pub fn from_position(position: Vec3, target: Vec3, speed: f32) -> Self {
        let offset = position - target;
        let distance = offset.len().max(0.01);
        // Camera looks along -offset
        let yaw = (-offset.x).atan2(-offset.z);
        Self { target, distance, yaw, speed, last_drag: None }
    }

    /// Rotate by horizontal drag. A full window height of drag is one turn.
    pub fn drag(&mut self, mouse: &MouseState, window_height: f32) -> bool {
        if !mouse.left_down {
            self.last_drag = None;
            return false;
        }
        let Some((last_x, _)) = self.last_drag.replace((mouse.x, mouse.y)) else {
            return false;
        };
        let dx = mouse.x - last_x;
        if dx == 0.0 {
            return false;
        }
        self.yaw -= std::f32::consts::TAU * dx / window_height.max(1.0) * self.speed;
        true
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.orbit(self.target, self.distance, self.yaw, 0.0);
    }
}

pub struct Viewport {
    pub camera: Camera,
    pub orbit: Orbit,
    settings: RasterSettings,
    environment: EnvironmentLight,
    shadow: ContactShadow,
    router: PointerRouter,
    /// World-space geometry from the last `update`
    mesh: SceneMesh,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Self {
        let spot = &config.spot;
        let lights = vec![
            Light::spot(Vec3::from(spot.position), Vec3::ZERO, spot.angle, spot.penumbra, spot.intensity),
            config.environment.fill_light(),
        ];
        let settings = RasterSettings {
            shading: config.shading,
            backface_cull: config.backface_cull,
            lights,
            ambient: config.ambient,
            dithering: config.dithering,
        };

        let orbit = Orbit::from_position(Vec3::from(config.camera.position), Vec3::ZERO, config.orbit_speed);
        let mut camera = Camera::new(config.camera.fov);
        orbit.apply(&mut camera);

        log::info!(
            "Viewport: fov {:.0}, environment {}, {} lights",
            config.camera.fov,
            config.environment,
            settings.lights.len()
        );

        Self {
            camera,
            orbit,
            settings,
            environment: config.environment.light(),
            shadow: ContactShadow::new(config.shadow.clone()),
            router: PointerRouter::new(),
            mesh: SceneMesh::default(),
        }
    }

    pub fn mesh(&self) -> &SceneMesh {
        &self.mesh
    }

    pub fn hovered(&self) -> Option<&MaterialId> {
        self.router.hovered()
    }

    /// Pose the model for time `t` and rebuild world geometry with the
    /// current store colors
    pub fn update(&mut self, t: f32, assembly: &Assembly, store: &SceneStore, library: &GeometryLibrary) {
        self.orbit.apply(&mut self.camera);
        let root = idle_pose(t).matrix();
        self.mesh = assembly.build_mesh(&root, store.state(), library);
        self.shadow.update(&self.mesh);
    }

    /// Render background, shadow and model. Returns triangles drawn.
    pub fn render(&self, fb: &mut Framebuffer) -> usize {
        fb.clear_gradient(self.environment.background_top, self.environment.background_bottom);
        self.shadow.render(fb, &self.camera);
        render_mesh(fb, &self.mesh.vertices, &self.mesh.faces, &self.camera, &self.settings)
    }

    /// Parts under a framebuffer position, nearest first
    pub fn pick(&self, fb_width: usize, fb_height: usize, x: f32, y: f32) -> Vec<Hit> {
        hit_test(&self.mesh, &self.camera, fb_width, fb_height, x, y)
    }

    /// Route pointer input to the assembly. Returns true when hover changed.
    pub fn handle_pointer(&mut self, input: &PointerInput, fb_width: usize, fb_height: usize, store: &mut SceneStore) -> bool {
        let hits = match input.position {
            Some((x, y)) => self.pick(fb_width, fb_height, x, y),
            None => Vec::new(),
        };
        self.router.handle(&hits, input, store)
    }
}

/// Framebuffer size for a window, keeping the window's aspect
pub fn framebuffer_size(window_width: f32, window_height: f32, render_height: usize) -> (usize, usize) {
    let height = render_height.max(1);
    let aspect = if window_height > 0.0 { window_width / window_height } else { 1.0 };
    let width = ((height as f32 * aspect).round() as usize).max(1);
    (width, height)
}

/// Window position to framebuffer position for a framebuffer stretched over `rect`
pub fn window_to_framebuffer(rect: &Rect, fb: &Framebuffer, x: f32, y: f32) -> Option<(f32, f32)> {
    if !rect.contains(x, y) || rect.w <= 0.0 || rect.h <= 0.0 {
        return None;
    }
    Some((
        (x - rect.x) / rect.w * fb.width as f32,
        (y - rect.y) / rect.h * fb.height as f32,
    ))
}

/// Upload the framebuffer and draw it over `rect`
pub fn draw_framebuffer(fb: &Framebuffer, rect: &Rect) {
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Linear);

    draw_texture_ex(
        &texture,
        rect.x,
        rect.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(rect.w, rect.h)),
            ..Default::default()
        },
    );
}
