//! Application shell: window, event loop and public viewer API.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::asset::{load_obj, AssetError};
use crate::gfx::{
    camera::{camera_controller::CameraController, fly_camera::FlyCamera},
    rendering::RenderEngine,
    scene::{object::RenderObject, Scene, Transform},
};

/// Interactive model viewer application.
///
/// Models are staged with [`load_model`](NeepsApp::load_model) before
/// [`run`](NeepsApp::run) enters the event loop; GPU upload happens once the
/// window and device exist.
pub struct NeepsApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    camera: FlyCamera,
    controller: CameraController,
    /// Per-frame transform overrides, consumed by the next rendered frame.
    transform_overrides: HashMap<String, Transform>,
    /// 0 disables the soft frame cap.
    target_fps: u32,
    last_frame: Option<Instant>,
}

impl NeepsApp {
    /// Create a new viewer with an empty scene and a default fly camera.
    pub fn new() -> Self {
        let _ = env_logger::try_init();

        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                scene: Scene::new(),
                camera: FlyCamera::default(),
                controller: CameraController::new(),
                transform_overrides: HashMap::new(),
                target_fps: 0,
                last_frame: None,
            },
        }
    }

    /// Parses a geometry file and stages it in the scene under `name`.
    pub fn load_model(&mut self, name: &str, path: impl AsRef<Path>) -> Result<(), AssetError> {
        self.load_model_with(name, path, Transform::new())
    }

    /// Like [`load_model`](NeepsApp::load_model) with an initial transform.
    pub fn load_model_with(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
        transform: Transform,
    ) -> Result<(), AssetError> {
        let mesh = load_obj(path.as_ref())?;
        info!(
            "loaded '{}': {} vertices, {} triangles",
            name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        let mut object = RenderObject::new(name, mesh, transform);
        if let Some(engine) = self.app_state.render_engine.as_ref() {
            object.init_gpu_resources(
                engine.device(),
                engine.queue(),
                engine.object_layouts(),
                engine.fallback_texture(),
            );
        }
        self.app_state.scene.add(object);
        Ok(())
    }

    /// Registers a transient transform override for the next rendered frame.
    ///
    /// Unknown names are reported when the frame is drawn; the base transform
    /// is restored on the frame after.
    pub fn render_model(&mut self, name: &str, transform: Transform) {
        self.app_state
            .transform_overrides
            .insert(name.to_string(), transform);
    }

    /// Removes a model and releases its GPU resources. Absent names log a
    /// warning and change nothing.
    pub fn remove_model(&mut self, name: &str) {
        self.app_state.scene.remove(name);
    }

    /// Caps the frame rate by sleeping out the remaining frame budget.
    /// Passing 0 removes the cap.
    pub fn set_target_fps(&mut self, fps: u32) {
        self.app_state.target_fps = fps;
    }

    pub fn scene(&self) -> &Scene {
        &self.app_state.scene
    }

    pub fn camera_mut(&mut self) -> &mut FlyCamera {
        &mut self.app_state.camera
    }

    /// Run the application (consumes self and blocks until the window closes).
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl Default for NeepsApp {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// One frame: apply input, upload uniforms, draw, then pace.
    fn redraw(&mut self) {
        let frame_start = Instant::now();
        let dt = self
            .last_frame
            .map(|last| (frame_start - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(frame_start);

        self.controller.update_camera(&mut self.camera, dt);

        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        render_engine.update(self.camera.uniform());

        // Model matrices are written outside the render pass; the buffer
        // wrapper drops writes whose bytes are unchanged.
        {
            let queue = render_engine.queue();
            for (name, transform) in
                resolve_frame_transforms(&self.scene, &mut self.transform_overrides)
            {
                if let Some(object) = self.scene.get_mut(&name) {
                    object.update_model_matrix(queue, transform.model_matrix());
                }
            }
        }

        render_engine.render_frame(&self.scene);

        if self.target_fps > 0 {
            let frame_budget = Duration::from_secs_f64(1.0 / self.target_fps as f64);
            let elapsed = frame_start.elapsed();
            if elapsed < frame_budget {
                std::thread::sleep(frame_budget - elapsed);
            }
        }
    }
}

/// Resolves the transform each object draws with this frame.
///
/// An override replaces the set fields of the stored transform for this frame
/// only; the stored transform is left untouched. Overrides naming nothing in
/// the scene are reported and discarded. The map is empty afterwards.
fn resolve_frame_transforms(
    scene: &Scene,
    overrides: &mut HashMap<String, Transform>,
) -> Vec<(String, Transform)> {
    let resolved = scene
        .iter()
        .map(|(name, object)| {
            let transform = match overrides.remove(name.as_str()) {
                Some(overriding) => object.transform.overridden_by(&overriding),
                None => object.transform,
            };
            (name.clone(), transform)
        })
        .collect();

    for (name, _) in overrides.drain() {
        warn!("render_model: no object named '{name}' in scene");
    }

    resolved
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("neeps")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();
            self.camera.set_aspect(width, height);

            let window_clone = window_handle.clone();
            let render_engine = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.scene.init_gpu_resources(
                render_engine.device(),
                render_engine.queue(),
                render_engine.object_layouts(),
                render_engine.fallback_texture(),
            );

            self.render_engine = Some(render_engine);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        state,
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                self.controller.process_keyboard(key_code, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.controller
                    .process_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.controller.process_scroll(delta);
            }
            WindowEvent::Focused(true) => {
                self.controller.reset_cursor();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.set_aspect(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MeshData;

    fn test_object(name: &str, transform: Transform) -> RenderObject {
        let mesh = MeshData {
            vertices: Vec::new(),
            indices: Vec::new(),
            has_texcoords: false,
            material: None,
        };
        RenderObject::new(name, mesh, transform)
    }

    #[test]
    fn override_applies_for_one_frame_without_touching_stored_transform() {
        let mut scene = Scene::new();
        scene.add(test_object("cube", Transform::new().with_scale(2.0)));

        let mut overrides = HashMap::new();
        overrides.insert(
            "cube".to_string(),
            Transform::new().with_position(1.0, 0.0, 0.0),
        );

        let resolved = resolve_frame_transforms(&scene, &mut overrides);
        assert_eq!(resolved.len(), 1);
        let (_, transform) = &resolved[0];
        // Merged: overridden position, stored scale.
        assert_eq!(
            *transform,
            Transform::new().with_position(1.0, 0.0, 0.0).with_scale(2.0)
        );
        assert!(overrides.is_empty());

        // The stored transform is unchanged for the frame after.
        assert_eq!(
            scene.get("cube").unwrap().transform,
            Transform::new().with_scale(2.0)
        );
    }

    #[test]
    fn unknown_override_name_is_discarded_and_draws_nothing_extra() {
        let mut scene = Scene::new();
        scene.add(test_object("cube", Transform::new()));

        let mut overrides = HashMap::new();
        overrides.insert("ghost".to_string(), Transform::new().with_scale(3.0));

        let resolved = resolve_frame_transforms(&scene, &mut overrides);
        assert_eq!(resolved.len(), 1);
        assert!(resolved.iter().all(|(name, _)| name != "ghost"));
        assert!(overrides.is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn objects_without_overrides_keep_their_stored_transform() {
        let mut scene = Scene::new();
        scene.add(test_object("floor", Transform::new().with_position(0.0, -1.0, 0.0)));

        let mut overrides = HashMap::new();
        let resolved = resolve_frame_transforms(&scene, &mut overrides);
        assert_eq!(
            resolved[0].1,
            Transform::new().with_position(0.0, -1.0, 0.0)
        );
    }
}
