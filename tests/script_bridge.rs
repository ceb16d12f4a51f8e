use std::fs;
use std::path::PathBuf;

use starling_engine::audio::AudioManager;
use starling_engine::config::WindowConfig;
use starling_engine::entity::{Behavior, DrawCtx, Entity, PeerView, Services, Transform2D, UpdateCtx};
use starling_engine::input::Input;
use starling_engine::renderer::Renderer;
use starling_engine::scene::Scene;
use starling_engine::script::ScriptBridge;
use starling_engine::time::FrameClock;
use starling_engine::window::WindowCtl;

struct Host {
    renderer: Renderer,
    input: Input,
    clock: FrameClock,
    audio: AudioManager,
    window: WindowCtl,
}

impl Host {
    fn new() -> Self {
        let config = WindowConfig::default();
        Self {
            renderer: Renderer::new(&config),
            input: Input::new(),
            clock: FrameClock::new(),
            audio: AudioManager::new(),
            window: WindowCtl::new(&config),
        }
    }

    fn services(&mut self) -> Services<'_> {
        Services {
            gfx: &mut self.renderer,
            input: &mut self.input,
            clock: &self.clock,
            audio: &mut self.audio,
            window: &mut self.window,
        }
    }
}

fn script_file(dir: &tempfile::TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).expect("script written");
    path
}

fn run_update(host: &mut Host, bridge: &mut ScriptBridge, dt: f32) {
    let mut transform = None;
    let mut transform2d = None;
    let mut ctx = UpdateCtx {
        dt,
        gfx: &mut host.renderer,
        input: &mut host.input,
        clock: &host.clock,
        audio: &mut host.audio,
        window: &mut host.window,
        transform: &mut transform,
        transform2d: &mut transform2d,
    };
    bridge.update(&mut ctx);
}

fn run_draw(host: &mut Host, bridge: &mut ScriptBridge) {
    let mut ctx = DrawCtx {
        gfx: &mut host.renderer,
        input: &mut host.input,
        clock: &host.clock,
        audio: &mut host.audio,
        window: &mut host.window,
        transform: None,
        transform2d: None,
        peers: PeerView::empty(),
    };
    bridge.draw(&mut ctx);
}

const UPDATE_ONLY: &str = r#"
fn update(api, dt) {
    if dt > 0.0 {
        api.set_target_fps(90);
    }
    api.draw_rectangle(0.0, 0.0, 10.0, 10.0, [255, 0, 0, 255]);
}
"#;

#[test]
fn update_entry_receives_the_delta_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_file(&dir, "update_only.rhai", UPDATE_ONLY);
    let mut host = Host::new();
    let mut bridge = ScriptBridge::new(&path);
    assert!(bridge.loaded());
    assert!(bridge.has_update_entry());
    assert!(!bridge.has_render_entry());

    run_update(&mut host, &mut bridge, 0.016);
    assert_eq!(host.window.target_fps, 90, "dt > 0 reached the script");
}

#[test]
fn draw_falls_back_to_update_with_zero_dt_exactly_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_file(&dir, "update_only.rhai", UPDATE_ONLY);
    let mut host = Host::new();
    let mut bridge = ScriptBridge::new(&path);

    host.renderer.begin_frame().expect("frame opens");
    run_draw(&mut host, &mut bridge);
    // One rectangle (6 vertices): the update entry ran exactly once.
    assert_eq!(host.renderer.queued_vertices(), 6);
    // And it ran with dt == 0.0: the fps branch must not have fired.
    assert_eq!(host.window.target_fps, 0);

    run_draw(&mut host, &mut bridge);
    assert_eq!(host.renderer.queued_vertices(), 12);
    host.renderer.end_frame(None).expect("frame closes");
}

#[test]
fn render_entry_wins_over_the_fallback() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_file(
        &dir,
        "both.rhai",
        r#"
fn update(api, dt) {
    api.set_target_fps(75);
}

fn render(api) {
    api.draw_circle(5.0, 5.0, 2.0, BLUE);
}
"#,
    );
    let mut host = Host::new();
    let mut bridge = ScriptBridge::new(&path);
    assert!(bridge.has_render_entry());

    host.renderer.begin_frame().expect("frame opens");
    run_draw(&mut host, &mut bridge);
    // A circle fan, not the rectangle: render ran, update did not.
    assert!(host.renderer.queued_vertices() > 0);
    assert_eq!(host.window.target_fps, 0);
    host.renderer.end_frame(None).expect("frame closes");
}

#[test]
fn scripts_without_entry_points_are_silent_noops() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_file(&dir, "plain.rhai", "let greeting = \"hello\";\n");
    let mut host = Host::new();
    let mut bridge = ScriptBridge::new(&path);
    assert!(bridge.loaded());

    run_update(&mut host, &mut bridge, 0.016);
    host.renderer.begin_frame().expect("frame opens");
    run_draw(&mut host, &mut bridge);
    assert_eq!(host.renderer.queued_vertices(), 0);
    host.renderer.end_frame(None).expect("frame closes");
    assert!(bridge.last_error().is_none());
}

#[test]
fn missing_script_file_leaves_the_bridge_inert() {
    let mut host = Host::new();
    let mut bridge = ScriptBridge::new("definitely/not/here.rhai");
    assert!(!bridge.loaded());
    assert!(bridge.last_error().is_some());

    // No panics, no effects.
    run_update(&mut host, &mut bridge, 0.016);
    run_draw(&mut host, &mut bridge);
    assert_eq!(host.window.target_fps, 0);
}

#[test]
fn compile_errors_leave_the_bridge_inert() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_file(&dir, "broken.rhai", "fn update(api, dt) {\n");
    let mut host = Host::new();
    let mut bridge = ScriptBridge::new(&path);
    assert!(!bridge.loaded());
    run_update(&mut host, &mut bridge, 0.016);
    run_draw(&mut host, &mut bridge);
}

#[test]
fn runtime_errors_are_swallowed_and_recorded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_file(
        &dir,
        "faulty.rhai",
        r#"
fn update(api, dt) {
    api.set_target_fps(30);
    this_function_does_not_exist();
}
"#,
    );
    let mut host = Host::new();
    let mut bridge = ScriptBridge::new(&path);
    assert!(bridge.loaded());

    run_update(&mut host, &mut bridge, 0.016);
    // The call failed mid-way but the failure stayed inside the bridge.
    assert_eq!(host.window.target_fps, 30);
    assert!(bridge.last_error().is_some());
}

#[test]
fn marshaling_errors_surface_to_the_script_not_the_host() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_file(
        &dir,
        "bad_args.rhai",
        r#"
fn update(api, dt) {
    api.draw_rectangle(0.0, 0.0, 10.0, 10.0, ["not", "a", "color"]);
}
"#,
    );
    let mut host = Host::new();
    let mut bridge = ScriptBridge::new(&path);

    host.renderer.begin_frame().expect("frame opens");
    run_update(&mut host, &mut bridge, 0.016);
    assert!(bridge.last_error().is_some(), "type error reported to the script side");
    assert_eq!(host.renderer.queued_vertices(), 0, "nothing was drawn");
    host.renderer.end_frame(None).expect("frame closes");
}

#[test]
fn bridge_runs_through_the_scene_passes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_file(&dir, "update_only.rhai", UPDATE_ONLY);
    let mut host = Host::new();
    let mut scene = Scene::new();
    let mut entity = Entity::new().with_transform2d(Transform2D::default());
    entity.attach(ScriptBridge::new(&path));
    scene.add_entity(entity);

    scene.update_all(0.02, &mut host.services());
    assert_eq!(host.window.target_fps, 90);

    host.renderer.begin_frame().expect("frame opens");
    let camera = starling_engine::camera::Camera2D::default();
    host.renderer.begin_mode_2d(&camera).expect("2d scope opens");
    scene.render_2d(&mut host.services());
    host.renderer.end_mode_2d().expect("scope closes");
    assert_eq!(host.renderer.queued_vertices(), 6);
    host.renderer.end_frame(None).expect("frame closes");
}
