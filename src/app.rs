//! Application state
//!
//! Ties the store, the 3D viewport and the picker panel together. Each
//! frame runs in three steps: `handle_input` (UI first, then the scene gets
//! whatever the UI didn't claim), `update` (animate and render into the
//! framebuffer) and `draw` (blit and overlay).

use crate::assembly::{Assembly, PartTable, PointerInput};
use crate::config::ConfiguratorConfig;
use crate::cursor::{CursorImage, CursorSink};
use crate::model::GeometryLibrary;
use crate::picker::PickerPanel;
use crate::rasterizer::Framebuffer;
use crate::store::{SceneChange, SceneStore, Subscription};
use crate::ui::{MouseState, Rect, UiContext};
use crate::viewport::{draw_framebuffer, framebuffer_size, window_to_framebuffer, Viewport};

pub struct ConfiguratorApp<C: CursorSink> {
    pub store: SceneStore,
    library: GeometryLibrary,
    assembly: Assembly,
    pub viewport: Viewport,
    panel: PickerPanel,
    ui: UiContext,
    cursor: C,
    fb: Framebuffer,
    render_height: usize,
    /// Store changes since the last frame
    changes: Subscription,
}

impl<C: CursorSink> ConfiguratorApp<C> {
    pub fn new(config: &ConfiguratorConfig, table: &PartTable, library: GeometryLibrary, mut cursor: C) -> Self {
        let mut store = config.palette.store();
        let changes = store.subscribe();
        let assembly = Assembly::new(table, &library);
        let viewport = Viewport::new(&config.viewport);
        let render_height = config.viewport.render_height.max(1);

        cursor.set_cursor(&CursorImage::default_cursor());

        Self {
            store,
            library,
            assembly,
            viewport,
            panel: PickerPanel::new(),
            ui: UiContext::new(),
            cursor,
            fb: Framebuffer::new(render_height, render_height),
            render_height,
            changes,
        }
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Route one frame of mouse input. `screen` is the window area the
    /// viewport fills.
    pub fn handle_input(&mut self, mouse: MouseState, screen: &Rect) {
        let (fb_w, fb_h) = framebuffer_size(screen.w, screen.h, self.render_height);
        if (fb_w, fb_h) != (self.fb.width, self.fb.height) {
            self.fb.resize(fb_w, fb_h);
        }

        self.ui.begin_frame(mouse);
        self.panel.update(&mut self.ui, screen, &mut self.store);

        let input = if self.ui.captured {
            self.viewport.orbit.drag(&MouseState { left_down: false, ..mouse }, screen.h);
            PointerInput::default()
        } else {
            self.viewport.orbit.drag(&mouse, screen.h);
            PointerInput {
                position: window_to_framebuffer(screen, &self.fb, mouse.x, mouse.y),
                pressed: mouse.left_pressed,
                released: mouse.left_released,
            }
        };
        let hover_changed = self.viewport.handle_pointer(&input, self.fb.width, self.fb.height, &mut self.store);

        // The cursor swatch follows edits to whatever is hovered
        let hovered = self.viewport.hovered().cloned();
        let swatch_changed = self.store.drain(&self.changes).iter().any(|change| match change {
            SceneChange::ColorChanged { id, .. } => hovered.as_ref() == Some(id),
            SceneChange::SelectionChanged { .. } => false,
        });
        if hover_changed || swatch_changed {
            let image = CursorImage::for_hover(hovered.as_ref(), self.store.state());
            self.cursor.set_cursor(&image);
        }
    }

    /// Animate to `t` seconds and render the scene into the framebuffer
    pub fn update(&mut self, t: f32) -> usize {
        self.viewport.update(t, &self.assembly, &self.store, &self.library);
        self.viewport.render(&mut self.fb)
    }

    /// Blit the scene and draw the panel over it
    pub fn draw(&self, screen: &Rect) {
        draw_framebuffer(&self.fb, screen);
        self.panel.draw(&self.ui, screen, self.store.state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{triangle_glb, ModelAsset};
    use crate::picker::PickerView;
    use crate::store::{HexColor, MaterialId, SceneAction, RECOLORABLE};

    #[derive(Default)]
    struct RecordingSink(Vec<CursorImage>);

    impl CursorSink for RecordingSink {
        fn set_cursor(&mut self, image: &CursorImage) {
            self.0.push(image.clone());
        }
    }

    const SCREEN: Rect = Rect::new(0.0, 0.0, 640.0, 360.0);

    fn app_with(table: &PartTable, library: GeometryLibrary) -> ConfiguratorApp<RecordingSink> {
        let mut config = ConfiguratorConfig::default();
        config.viewport.render_height = 180;
        let mut app = ConfiguratorApp::new(&config, table, library, RecordingSink::default());
        app.handle_input(MouseState::default(), &SCREEN);
        app.update(0.0);
        app
    }

    fn app() -> ConfiguratorApp<RecordingSink> {
        app_with(&PartTable::embedded().unwrap(), GeometryLibrary::procedural())
    }

    /// The horn as a loaded model provides it: node "Torus004" whose
    /// primitive uses material "Claxon"
    fn horn_app() -> ConfiguratorApp<RecordingSink> {
        let library = GeometryLibrary::new(ModelAsset::from_glb(&triangle_glb()).unwrap());
        let table =
            PartTable::parse(r#"PartTable(nodes: [Mesh((geometry: "Torus004", material: Intrinsic("Torus004")))])"#)
                .unwrap();
        app_with(&table, library)
    }

    /// Window position whose nearest part uses `material`, clear of the panel
    fn point_on(app: &ConfiguratorApp<RecordingSink>, material: &str) -> Option<(f32, f32)> {
        let (w, h) = (app.fb.width, app.fb.height);
        let mesh = app.viewport.mesh();
        let camera = &app.viewport.camera;
        let panel = PickerPanel::rect(&SCREEN);
        mesh.faces.iter().zip(&mesh.owners).find_map(|(face, &owner)| {
            if mesh.materials[owner] != material {
                return None;
            }
            let a = camera.world_to_screen(mesh.vertices[face.v0].pos, w, h)?;
            let b = camera.world_to_screen(mesh.vertices[face.v1].pos, w, h)?;
            let c = camera.world_to_screen(mesh.vertices[face.v2].pos, w, h)?;
            let (x, y) = ((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0);
            let (sx, sy) = (x * SCREEN.w / w as f32, y * SCREEN.h / h as f32);
            if panel.contains(sx, sy) {
                return None;
            }
            let hits = app.viewport.pick(w, h, x, y);
            (hits.first()?.material == material).then_some((sx, sy))
        })
    }

    /// First recolorable material in view, with a point on it
    fn visible_recolorable(app: &ConfiguratorApp<RecordingSink>) -> (MaterialId, (f32, f32)) {
        RECOLORABLE
            .iter()
            .find_map(|name| point_on(app, name).map(|p| (MaterialId::from(*name), p)))
            .expect("a recolorable part in view")
    }

    fn empty_point(app: &ConfiguratorApp<RecordingSink>) -> (f32, f32) {
        let (w, h) = (app.fb.width, app.fb.height);
        assert!(app.viewport.pick(w, h, 1.0, h as f32 - 1.0).is_empty());
        (1.0 * SCREEN.w / w as f32, SCREEN.h - 1.0)
    }

    fn click(app: &mut ConfiguratorApp<RecordingSink>, (x, y): (f32, f32)) {
        app.handle_input(MouseState { x, y, left_down: true, left_pressed: true, ..MouseState::default() }, &SCREEN);
        app.handle_input(MouseState { x, y, left_released: true, ..MouseState::default() }, &SCREEN);
    }

    #[test]
    fn test_starts_with_default_cursor_and_no_selection() {
        let app = app();
        assert_eq!(app.cursor().0, vec![CursorImage::default_cursor()]);
        assert_eq!(app.store.selected(), None);
        assert_eq!((app.framebuffer().width, app.framebuffer().height), (320, 180));
    }

    #[test]
    fn test_recolor_part_end_to_end() {
        let mut app = horn_app();
        let part = MaterialId::from("Claxon");
        let on_part = point_on(&app, "Claxon").expect("horn in view");

        // Hover shows the current white swatch
        app.handle_input(MouseState { x: on_part.0, y: on_part.1, ..MouseState::default() }, &SCREEN);
        let last = app.cursor().0.last().unwrap();
        assert_eq!(last.hovered, Some((part.clone(), Some(HexColor::from("#ffffff")))));

        // Clicking selects it and opens the picker
        click(&mut app, on_part);
        assert_eq!(app.store.selected(), Some(&part));
        let view = PickerView::from_state(app.store.state()).unwrap();
        assert_eq!(view.label(), "Claxon");
        assert!(view.editable());

        // Picker edit lands in the store and the hovered cursor follows
        app.store.dispatch(SceneAction::SetSelectedColor(HexColor::from("#ff0000")));
        app.handle_input(MouseState { x: on_part.0, y: on_part.1, ..MouseState::default() }, &SCREEN);
        let last = app.cursor().0.last().unwrap();
        assert_eq!(last.hovered, Some((part.clone(), Some(HexColor::from("#ff0000")))));

        // Next frame draws the part red
        app.update(0.0);
        let mesh = app.viewport.mesh();
        let red = mesh
            .faces
            .iter()
            .zip(&mesh.owners)
            .filter(|(_, &owner)| mesh.materials[owner] == part)
            .all(|(face, _)| {
                let c = mesh.vertices[face.v0].color;
                c.r == 255 && c.g == 0 && c.b == 0
            });
        assert!(red);

        // Clicking empty space clears the selection; the color stays
        let empty = empty_point(&app);
        click(&mut app, empty);
        assert_eq!(app.store.selected(), None);
        assert_eq!(app.store.color(&part), Some(&HexColor::from("#ff0000")));
        assert_eq!(app.cursor().0.last(), Some(&CursorImage::default_cursor()));
    }

    #[test]
    fn test_drag_on_empty_space_orbits_and_keeps_selection() {
        let mut app = app();
        let (selected, on_part) = visible_recolorable(&app);
        click(&mut app, on_part);
        let yaw = app.viewport.orbit.yaw;

        let (x, y) = empty_point(&app);
        app.handle_input(MouseState { x, y, left_down: true, left_pressed: true, ..MouseState::default() }, &SCREEN);
        app.handle_input(MouseState { x: x + 40.0, y, left_down: true, ..MouseState::default() }, &SCREEN);
        app.handle_input(MouseState { x: x + 40.0, y, left_released: true, ..MouseState::default() }, &SCREEN);

        assert!(app.viewport.orbit.yaw != yaw);
        assert_eq!(app.store.selected(), Some(&selected));
    }

    #[test]
    fn test_panel_blocks_scene_clicks() {
        let mut app = app();
        let (selected, on_part) = visible_recolorable(&app);
        click(&mut app, on_part);

        // A press inside the open panel never reaches the scene
        let panel = PickerPanel::rect(&SCREEN);
        let (x, y) = (panel.x + 4.0, panel.y + 4.0);
        app.handle_input(MouseState { x, y, left_down: true, left_pressed: true, ..MouseState::default() }, &SCREEN);
        app.handle_input(MouseState { x, y, left_released: true, ..MouseState::default() }, &SCREEN);
        assert_eq!(app.store.selected(), Some(&selected));
    }
}
