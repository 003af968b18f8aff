use std::collections::BTreeSet;

use glam::{Vec2, Vec3};

use common::{shipped_shader, space, RecordingBackend, ScriptedPlatform};
use gefe_engine::core::{DriverPhase, EngineConfig, EngineError, FrameDriver, SceneCtx};
use gefe_engine::input::{ButtonState, InputEvent, InputState, MouseButton};
use gefe_engine::render::{ClearColor, CommandList, FrameStatus, RenderCmd};
use gefe_engine::scene::{
    LevelEditorScene, Scene, SceneConfig, SceneId, TRANSITION_SECONDS,
};

mod common;

fn config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.scenes.shader_path = shipped_shader().into();
    config
}

fn draws(cmds: &[RenderCmd]) -> Vec<u32> {
    cmds.iter()
        .filter_map(|c| match c {
            RenderCmd::DrawIndexed { index_count } => Some(*index_count),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Default, PartialEq)]
struct Handles {
    programs: BTreeSet<u64>,
    buffers: BTreeSet<u64>,
}

fn referenced(cmds: &[RenderCmd]) -> Handles {
    let mut h = Handles::default();
    for cmd in cmds {
        match *cmd {
            RenderCmd::UseProgram(id) | RenderCmd::UploadMat4 { program: id, .. } => {
                h.programs.insert(id.raw());
            }
            RenderCmd::BindVertexBuffer(id) | RenderCmd::BindIndexBuffer(id) => {
                h.buffers.insert(id.raw());
            }
            _ => {}
        }
    }
    h
}

#[test]
fn first_frame_clears_without_update() {
    let platform = ScriptedPlatform::new(10);
    let log = platform.log.clone();
    let mut driver = FrameDriver::new(platform, config());

    driver.init().unwrap();
    assert_eq!(driver.active_scene(), Some(SceneId::LevelEditor));
    assert_eq!(driver.delta_time(), None);

    driver.frame().unwrap();
    assert!(log.borrow().last_frame().is_empty());
    assert_eq!(log.borrow().clears, vec![ClearColor::WHITE]);

    let dt = driver.delta_time().unwrap();
    assert!(dt >= 0.0);

    driver.frame().unwrap();
    assert_eq!(draws(log.borrow().last_frame()), vec![6]);
    assert!(driver.fps() > 0.0);
}

#[test]
fn update_records_the_full_draw_sequence() {
    let platform = ScriptedPlatform::new(10);
    let log = platform.log.clone();
    let mut driver = FrameDriver::new(platform, config());
    driver.init().unwrap();
    driver.frame().unwrap();
    driver.frame().unwrap();

    let log = log.borrow();
    let kinds: Vec<&str> = log
        .last_frame()
        .iter()
        .map(|c| match c {
            RenderCmd::UseProgram(_) => "use",
            RenderCmd::UploadMat4 { .. } => "upload",
            RenderCmd::BindVertexBuffer(_) => "vbo",
            RenderCmd::BindIndexBuffer(_) => "ibo",
            RenderCmd::DrawIndexed { .. } => "draw",
            RenderCmd::UnbindBuffers => "unbind",
            RenderCmd::DetachProgram => "detach",
        })
        .collect();
    assert_eq!(
        kinds,
        ["use", "upload", "upload", "vbo", "ibo", "draw", "unbind", "detach"]
    );

    let offsets: Vec<u32> = log
        .last_frame()
        .iter()
        .filter_map(|c| match c {
            RenderCmd::UploadMat4 { offset, .. } => Some(*offset),
            _ => None,
        })
        .collect();
    assert_eq!(offsets, [0, 64]);
}

#[test]
fn scene_switch_releases_every_previous_handle() {
    let platform = ScriptedPlatform::new(10);
    let log = platform.log.clone();
    let mut driver = FrameDriver::new(platform, config());
    driver.init().unwrap();
    driver.frame().unwrap();
    driver.frame().unwrap();

    let old = referenced(log.borrow().last_frame());
    let old_stages: BTreeSet<_> = log.borrow().stages.keys().copied().collect();
    assert_eq!(old.programs.len(), 1);
    assert_eq!(old.buffers.len(), 2);

    driver.change_scene(1).unwrap();
    assert_eq!(driver.active_scene(), Some(SceneId::Level));

    {
        let log = log.borrow();
        assert!(old.buffers.iter().all(|id| !log.buffers.keys().any(|b| b.raw() == *id)));
        assert!(old.programs.iter().all(|id| !log.programs.keys().any(|p| p.raw() == *id)));
        assert!(old_stages.iter().all(|id| !log.stages.contains_key(id)));
        // New scene: one program, two stages, two buffers.
        assert_eq!(log.live_count(), 5);
    }

    driver.frame().unwrap();
    let new = referenced(log.borrow().last_frame());
    assert!(new.programs.is_disjoint(&old.programs));
    assert!(new.buffers.is_disjoint(&old.buffers));
    assert_eq!(draws(log.borrow().last_frame()), vec![3]);
}

#[test]
fn unknown_scene_is_fatal_and_keeps_current_scene() {
    let mut driver = FrameDriver::new(ScriptedPlatform::new(10), config());
    driver.init().unwrap();

    assert!(matches!(driver.change_scene(7), Err(EngineError::UnknownScene(7))));
    assert_eq!(driver.active_scene(), Some(SceneId::LevelEditor));
}

#[test]
fn change_scene_requires_a_context() {
    let mut driver = FrameDriver::new(ScriptedPlatform::new(10), config());
    assert!(matches!(
        driver.change_scene(0),
        Err(EngineError::InvalidState { actual: DriverPhase::Uninitialized, .. })
    ));
}

#[test]
fn failing_scene_init_leaves_no_scene_and_keeps_clearing() {
    let platform = ScriptedPlatform::new(3);
    let log = platform.log.clone();
    let mut config = config();
    config.scenes.shader_path = "assets/shaders/nope.glsl".into();

    let mut driver = FrameDriver::new(platform, config);
    driver.run().unwrap();

    assert_eq!(driver.active_scene(), None);
    let log = log.borrow();
    assert_eq!(log.clears.len(), 3);
    assert!(log.frames.iter().all(Vec::is_empty));
    assert_eq!(log.live_count(), 0);
}

#[test]
fn run_tears_down_after_close() {
    let platform = ScriptedPlatform::new(4);
    let log = platform.log.clone();
    let mut driver = FrameDriver::new(platform, config());

    driver.run().unwrap();

    assert_eq!(driver.phase(), DriverPhase::Terminated);
    assert!(driver.platform().torn_down);
    assert_eq!(driver.platform().polls, 4);
    assert!(driver.backend().is_none());

    let log = log.borrow();
    assert_eq!(log.frames.len(), 4);
    assert_eq!(log.live_count(), 0);
}

#[test]
fn run_tears_down_when_context_fails() {
    let mut platform = ScriptedPlatform::new(4);
    platform.fail_context = true;
    let mut driver = FrameDriver::new(platform, config());

    assert!(matches!(driver.run(), Err(EngineError::ContextInit(_))));
    assert!(driver.platform().torn_down);
    assert_eq!(driver.platform().polls, 0);
    assert_eq!(driver.phase(), DriverPhase::Terminated);
}

#[test]
fn lifecycle_is_enforced() {
    let mut driver = FrameDriver::new(ScriptedPlatform::new(4), config());
    assert!(matches!(driver.render(), Err(EngineError::InvalidState { .. })));
    assert!(matches!(driver.frame(), Err(EngineError::InvalidState { .. })));

    driver.init().unwrap();
    assert!(matches!(
        driver.init(),
        Err(EngineError::InvalidState { expected: DriverPhase::Uninitialized, .. })
    ));
}

#[test]
fn scene_switch_request_applies_after_present() {
    let platform = ScriptedPlatform::new(10).at_frame(1, vec![space(ButtonState::Pressed)]);
    let log = platform.log.clone();
    let mut config = config();
    config.default_scene = SceneId::Level;
    config.clear_color = ClearColor::BLACK;

    let mut driver = FrameDriver::new(platform, config);
    driver.init().unwrap();
    driver.frame().unwrap();
    driver.frame().unwrap();

    // The frame that requested the switch was still drawn by the level.
    assert_eq!(draws(log.borrow().last_frame()), vec![3]);
    assert_eq!(driver.active_scene(), Some(SceneId::LevelEditor));
    assert_eq!(driver.clear_color(), ClearColor::WHITE);

    driver.frame().unwrap();
    assert_eq!(draws(log.borrow().last_frame()), vec![6]);
}

#[test]
fn skipped_frame_presents_nothing_but_still_switches() {
    let platform = ScriptedPlatform::new(10)
        .at_frame(1, vec![space(ButtonState::Pressed)])
        .with_frame_statuses([FrameStatus::Ready, FrameStatus::Skipped]);
    let log = platform.log.clone();
    let mut config = config();
    config.default_scene = SceneId::Level;

    let mut driver = FrameDriver::new(platform, config);
    driver.init().unwrap();
    driver.frame().unwrap();
    driver.frame().unwrap();

    assert_eq!(log.borrow().frames.len(), 1);
    assert_eq!(driver.active_scene(), Some(SceneId::LevelEditor));

    driver.frame().unwrap();
    assert_eq!(log.borrow().frames.len(), 2);
    assert_eq!(draws(log.borrow().last_frame()), vec![6]);
}

#[test]
fn lost_surface_ends_the_run_and_tears_down() {
    let platform = ScriptedPlatform::new(10)
        .with_frame_statuses([FrameStatus::Ready, FrameStatus::Ready, FrameStatus::Lost]);
    let log = platform.log.clone();
    let mut driver = FrameDriver::new(platform, config());

    assert!(matches!(driver.run(), Err(EngineError::SurfaceLost)));
    assert_eq!(driver.phase(), DriverPhase::Terminated);
    assert!(driver.platform().torn_down);
    assert_eq!(driver.platform().polls, 3);

    let log = log.borrow();
    assert_eq!(log.frames.len(), 2);
    assert_eq!(log.live_count(), 0);
}

#[test]
fn resize_reaches_the_backend() {
    let platform = ScriptedPlatform::new(3).resize_at(1, (1024, 768));
    let log = platform.log.clone();
    let mut driver = FrameDriver::new(platform, config());

    driver.run().unwrap();
    assert_eq!(log.borrow().resizes, vec![(1024, 768)]);
}

#[test]
fn render_continues_after_manual_frames() {
    let platform = ScriptedPlatform::new(3);
    let log = platform.log.clone();
    let mut driver = FrameDriver::new(platform, config());

    driver.init().unwrap();
    driver.frame().unwrap();
    assert_eq!(driver.phase(), DriverPhase::Running);

    driver.render().unwrap();
    assert_eq!(log.borrow().frames.len(), 3);
    assert_eq!(driver.platform().polls, 3);
}

fn editor() -> (LevelEditorScene, RecordingBackend) {
    let (mut backend, _log) = RecordingBackend::new();
    let mut scene = LevelEditorScene::new(SceneConfig {
        shader_path: shipped_shader().into(),
        ..SceneConfig::default()
    });
    scene.init(&mut backend).unwrap();
    (scene, backend)
}

#[test]
fn editor_fades_then_requests_level() {
    let (mut scene, _backend) = editor();
    let mut input = InputState::default();
    let mut clear = ClearColor::WHITE;
    let mut cmds = CommandList::new();
    let mut request = None;

    input.apply_event(space(ButtonState::Pressed));
    scene.update(0.016, &mut SceneCtx::new(&input, &mut clear, &mut cmds, &mut request));
    input.end_frame();
    assert!(scene.is_transitioning());
    assert_eq!(clear, ClearColor::WHITE);

    let step = 0.25;
    let mut elapsed = 0.0;
    while request.is_none() {
        let before = clear;
        scene.update(step, &mut SceneCtx::new(&input, &mut clear, &mut cmds, &mut request));
        elapsed += step;
        assert!(clear.r <= before.r && clear.r >= 0.0);
        assert!(elapsed <= TRANSITION_SECONDS + step, "transition never finished");
    }

    assert_eq!(request, Some(SceneId::Level));
    assert!(!scene.is_transitioning());
    assert!(clear.r < 1.0);
}

#[test]
fn dragging_pans_the_editor_camera() {
    let (mut scene, _backend) = editor();
    let mut input = InputState::default();
    let mut clear = ClearColor::WHITE;
    let mut cmds = CommandList::new();
    let mut request = None;

    input.apply_event(InputEvent::CursorMoved { x: 100.0, y: 100.0 });
    input.apply_event(InputEvent::MouseButton {
        button: MouseButton::Left,
        state: ButtonState::Pressed,
    });
    input.apply_event(InputEvent::CursorMoved { x: 90.0, y: 120.0 });

    let eye = scene.camera().unwrap().eye();
    scene.update(0.016, &mut SceneCtx::new(&input, &mut clear, &mut cmds, &mut request));

    let moved = scene.camera().unwrap().eye() - eye;
    assert_eq!(moved, Vec3::new(10.0, 20.0, 0.0));
    assert_eq!(scene.camera().unwrap().position, Vec2::new(10.0, 20.0));
}

#[test]
fn dragging_follows_the_cursor_at_any_window_size() {
    let (mut scene, _backend) = editor();
    let mut input = InputState::default();
    let mut clear = ClearColor::WHITE;
    let mut cmds = CommandList::new();
    let mut request = None;

    // Half the default 1280 x 672 view: one cursor unit spans two world units.
    input.apply_event(InputEvent::Resized { width: 640.0, height: 336.0 });
    input.apply_event(InputEvent::CursorMoved { x: 100.0, y: 100.0 });
    input.apply_event(InputEvent::MouseButton {
        button: MouseButton::Left,
        state: ButtonState::Pressed,
    });
    input.apply_event(InputEvent::CursorMoved { x: 90.0, y: 120.0 });

    scene.update(0.016, &mut SceneCtx::new(&input, &mut clear, &mut cmds, &mut request));
    assert_eq!(scene.camera().unwrap().position, Vec2::new(20.0, 40.0));
}
