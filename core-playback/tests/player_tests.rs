//! Scenario tests for the `VideoPlayer` state machine against a scripted engine.

mod common;

use bridge_traits::{EngineCallback, InfoKind, PlayState, PlayerView, SurfaceHandle, ViewId};
use common::{as_dyn, fake_engine, unavailable_engine, EngineCommand, SharedEngine, TestView};
use core_playback::{PlaybackError, PositionCache, VideoPlayer};
use core_runtime::events::{CoreEvent, EventBus, EventStream, PlayerEvent};
use mockall::mock;
use std::rc::Rc;

mock! {
    pub View {}

    impl PlayerView for View {
        fn id(&self) -> ViewId;
        fn is_alive(&self) -> bool;
        fn surface(&self) -> Option<SurfaceHandle>;
        fn measured_size(&self) -> bridge_traits::Size;
        fn parent_size(&self) -> Option<bridge_traits::Size>;
        fn on_video_size_changed(&self, width: i32, height: i32);
        fn show_notice(&self, message: &str);
        fn hide_controls(&self);
        fn show_controls(&self);
        fn on_scrub(&self, distance_x: f32);
    }
}

fn new_player() -> (VideoPlayer, SharedEngine, EventBus) {
    let (factory, engine) = fake_engine();
    let events = EventBus::new(64);
    let cache = PositionCache::with_capacity(20).unwrap();
    (VideoPlayer::new(factory, cache, events.clone()), engine, events)
}

fn states(stream: &mut EventStream) -> Vec<PlayState> {
    stream
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            CoreEvent::Player(PlayerEvent::PlayStateChanged { state }) => Some(state),
            _ => None,
        })
        .collect()
}

/// Play `url` on `view` and deliver the engine's `Prepared` callback.
fn play_prepared(player: &mut VideoPlayer, engine: &SharedEngine, view: &Rc<dyn PlayerView>, url: &str) {
    player.play_url(view, url).unwrap();
    engine.borrow().post(EngineCallback::Prepared);
    assert_eq!(player.dispatch_pending(), 1);
}

#[test]
fn test_pause_then_start_resumes_from_cached_position() {
    let (mut player, engine, _events) = new_player();
    let view = TestView::new(1);
    let view = as_dyn(&view);

    player.play_url(&view, "a.mp4").unwrap();
    assert_eq!(player.current_state(), PlayState::Preparing);

    engine.borrow().post(EngineCallback::Prepared);
    player.dispatch_pending();
    assert_eq!(player.current_state(), PlayState::Playing);

    engine.borrow_mut().position_ms = 12_000;
    player.pause();
    assert_eq!(player.current_state(), PlayState::Paused);
    assert_eq!(player.position_cache().peek("a.mp4"), Some(12_000));
    assert_eq!(player.last_known_position(), 12_000);

    engine.borrow_mut().position_ms = 0;
    player.start();
    assert_eq!(player.current_state(), PlayState::Playing);
    assert_eq!(
        engine.borrow().last_command(),
        Some(&EngineCommand::SeekTo(12_000))
    );
}

#[test]
fn test_play_url_issues_engine_commands_in_order() {
    let (mut player, engine, _events) = new_player();
    let view = TestView::new(9);

    player.play_url(&as_dyn(&view), "a.mp4").unwrap();

    assert_eq!(
        engine.borrow().commands,
        vec![
            EngineCommand::Reset,
            EngineCommand::SetSource("a.mp4".into()),
            EngineCommand::PrepareAsync,
            EngineCommand::SetSurface(None),
            EngineCommand::SetSurface(Some(SurfaceHandle(9))),
        ]
    );
    assert_eq!(player.playing_url(), "a.mp4");
    assert_eq!(player.bound_view_id(), Some(view.id));
}

#[test]
fn test_switching_source_stops_playing_engine() {
    let (mut player, engine, _events) = new_player();
    let view = as_dyn(&TestView::new(1));

    play_prepared(&mut player, &engine, &view, "a.mp4");
    engine.borrow_mut().commands.clear();

    player.play_url(&view, "b.mp4").unwrap();
    let commands = engine.borrow().commands.clone();
    assert_eq!(commands[0], EngineCommand::Stop);
    assert_eq!(commands[1], EngineCommand::Reset);
    assert_eq!(player.current_state(), PlayState::Preparing);
}

#[test]
fn test_completion_evicts_resume_position() {
    let (mut player, engine, _events) = new_player();
    let view = as_dyn(&TestView::new(1));

    play_prepared(&mut player, &engine, &view, "a.mp4");
    engine.borrow_mut().position_ms = 3_000;
    player.pause();
    player.start();
    assert!(player.position_cache().contains("a.mp4"));

    engine.borrow().post(EngineCallback::Completion);
    player.dispatch_pending();

    assert_eq!(player.current_state(), PlayState::Completed);
    assert_eq!(player.position_cache().peek("a.mp4"), None);
}

#[test]
fn test_completion_ignored_while_preparing() {
    let (mut player, engine, _events) = new_player();
    let view = as_dyn(&TestView::new(1));

    player.play_url(&view, "a.mp4").unwrap();
    engine.borrow().post(EngineCallback::Completion);
    player.dispatch_pending();

    assert_eq!(player.current_state(), PlayState::Preparing);
}

#[test]
fn test_second_completion_is_ignored() {
    let (mut player, engine, events) = new_player();
    let view = as_dyn(&TestView::new(1));
    play_prepared(&mut player, &engine, &view, "a.mp4");

    let mut stream = EventStream::new(events.subscribe());
    player.on_completion();
    player.on_completion();

    assert_eq!(states(&mut stream), vec![PlayState::Completed]);
}

#[test]
fn test_duration_and_position_zero_until_prepared() {
    let (mut player, engine, _events) = new_player();
    let view = as_dyn(&TestView::new(1));
    {
        let mut engine = engine.borrow_mut();
        engine.duration_ms = 60_000;
        engine.position_ms = 5_000;
    }

    assert_eq!(player.duration(), 0);
    assert_eq!(player.current_position(), 0);

    player.play_url(&view, "a.mp4").unwrap();
    assert_eq!(player.duration(), 0);
    assert_eq!(player.current_position(), 0);

    engine.borrow().post(EngineCallback::Prepared);
    player.dispatch_pending();
    assert_eq!(player.duration(), 60_000);
    assert_eq!(player.current_position(), 5_000);
}

#[test]
fn test_every_transition_is_notified() {
    let (mut player, engine, events) = new_player();
    let mut stream = EventStream::new(events.subscribe());
    let view = as_dyn(&TestView::new(1));

    play_prepared(&mut player, &engine, &view, "a.mp4");
    player.pause();

    assert_eq!(
        states(&mut stream),
        vec![
            PlayState::Idle,
            PlayState::Preparing,
            PlayState::Prepared,
            PlayState::Playing,
            PlayState::Paused,
        ]
    );
}

#[test]
fn test_error_shows_single_notice_and_play_recovers() {
    let (mut player, engine, _events) = new_player();
    let view_id = ViewId::new();

    let mut mock_view = MockView::new();
    mock_view.expect_id().return_const(view_id);
    mock_view.expect_is_alive().return_const(true);
    mock_view
        .expect_surface()
        .return_const(Some(SurfaceHandle(3)));
    mock_view
        .expect_show_notice()
        .withf(|message: &str| message == "1 -1")
        .times(1)
        .return_const(());
    let view: Rc<dyn PlayerView> = Rc::new(mock_view);

    play_prepared(&mut player, &engine, &view, "a.mp4");

    engine.borrow().post(EngineCallback::Error { what: 1, extra: -1 });
    player.dispatch_pending();
    assert_eq!(player.current_state(), PlayState::Error);

    // The engine is kept: a new play request starts a fresh cycle.
    player.play_url(&view, "a.mp4").unwrap();
    assert_eq!(player.current_state(), PlayState::Preparing);
    assert_eq!(engine.borrow().created, 1);
}

#[test]
fn test_error_reports_handled_and_emits_event() {
    let (mut player, engine, events) = new_player();
    let view = as_dyn(&TestView::new(1));
    play_prepared(&mut player, &engine, &view, "a.mp4");

    let mut stream = EventStream::new(events.subscribe());
    assert!(player.on_error(100, -1004));

    let emitted = stream.drain();
    assert!(emitted.contains(&CoreEvent::Player(PlayerEvent::ErrorReported {
        what: 100,
        extra: -1004
    })));
}

#[test]
fn test_error_without_live_view_shows_nothing() {
    let (mut player, engine, _events) = new_player();
    let view = TestView::new(1);
    play_prepared(&mut player, &engine, &as_dyn(&view), "a.mp4");

    view.alive.set(false);
    player.on_error(1, -1);

    assert!(view.notices.borrow().is_empty());
    assert_eq!(player.current_state(), PlayState::Error);
}

#[test]
fn test_rejected_source_leaves_session_unchanged() {
    let (mut player, engine, _events) = new_player();
    let first = TestView::new(1);
    let second = TestView::new(2);
    play_prepared(&mut player, &engine, &as_dyn(&first), "a.mp4");

    engine.borrow_mut().reject_source = true;
    let err = player.play_url(&as_dyn(&second), "b.mp4").unwrap_err();

    assert!(matches!(err, PlaybackError::SourceRejected { .. }));
    assert!(err.is_setup_failure());
    assert_eq!(player.current_state(), PlayState::Playing);
    assert_eq!(player.playing_url(), "a.mp4");
    assert_eq!(player.bound_view_id(), Some(first.id));
}

#[test]
fn test_failed_prepare_request_leaves_session_unchanged() {
    let (mut player, engine, _events) = new_player();
    let view = TestView::new(1);
    engine.borrow_mut().fail_prepare = true;

    let err = player.play_url(&as_dyn(&view), "a.mp4").unwrap_err();

    assert!(matches!(err, PlaybackError::PrepareFailed { .. }));
    assert_eq!(player.current_state(), PlayState::Idle);
    assert_eq!(player.playing_url(), "");
    assert_eq!(player.bound_view_id(), None);
}

#[test]
fn test_reset_failure_is_tolerated() {
    let (mut player, engine, _events) = new_player();
    engine.borrow_mut().fail_reset = true;

    player.play_url(&as_dyn(&TestView::new(1)), "a.mp4").unwrap();
    assert_eq!(player.current_state(), PlayState::Preparing);
}

#[test]
fn test_empty_url_is_rejected() {
    let (mut player, _engine, _events) = new_player();
    let err = player.play_url(&as_dyn(&TestView::new(1)), "").unwrap_err();
    assert!(matches!(err, PlaybackError::EmptySource));
}

#[test]
fn test_transport_without_engine_is_noop() {
    let (mut player, engine, events) = new_player();
    let mut stream = EventStream::new(events.subscribe());

    player.start();
    player.pause();
    player.stop();
    player.seek_to(1_000);

    assert_eq!(player.current_state(), PlayState::None);
    assert!(!player.is_playing());
    assert!(!player.is_active());
    assert_eq!(engine.borrow().created, 0);
    assert!(stream.drain().is_empty());
}

#[test]
fn test_lazy_engine_creation() {
    let (mut player, engine, _events) = new_player();
    assert!(!player.has_engine());

    player.ensure_engine().unwrap();
    player.ensure_engine().unwrap();

    assert_eq!(player.current_state(), PlayState::Idle);
    assert_eq!(engine.borrow().created, 1);
}

#[test]
fn test_engine_creation_notifies_idle_once() {
    let (mut player, _engine, events) = new_player();
    let mut stream = EventStream::new(events.subscribe());

    player.ensure_engine().unwrap();
    player.ensure_engine().unwrap();

    assert_eq!(states(&mut stream), vec![PlayState::Idle]);
}

#[test]
fn test_unavailable_engine_is_reported() {
    let events = EventBus::default();
    let cache = PositionCache::with_capacity(4).unwrap();
    let mut player = VideoPlayer::new(unavailable_engine(), cache, events);

    let err = player
        .play_url(&as_dyn(&TestView::new(1)), "a.mp4")
        .unwrap_err();

    assert!(matches!(err, PlaybackError::EngineUnavailable(_)));
    assert_eq!(player.current_state(), PlayState::None);
}

#[test]
fn test_buffering_while_playing_and_paused() {
    let (mut player, engine, _events) = new_player();
    let view = as_dyn(&TestView::new(1));
    play_prepared(&mut player, &engine, &view, "a.mp4");

    player.on_info(InfoKind::BufferingStart, 0);
    assert_eq!(player.current_state(), PlayState::BufferingPlaying);

    player.pause();
    assert_eq!(player.current_state(), PlayState::BufferingPaused);

    player.start();
    assert_eq!(player.current_state(), PlayState::BufferingPlaying);

    player.on_info(InfoKind::BufferingEnd, 0);
    assert_eq!(player.current_state(), PlayState::Playing);

    player.pause();
    player.on_info(InfoKind::BufferingStart, 0);
    assert_eq!(player.current_state(), PlayState::BufferingPaused);
    player.on_info(InfoKind::BufferingEnd, 0);
    assert_eq!(player.current_state(), PlayState::Paused);
}

#[test]
fn test_info_always_notifies() {
    let (mut player, engine, events) = new_player();
    let view = as_dyn(&TestView::new(1));
    play_prepared(&mut player, &engine, &view, "a.mp4");

    let mut stream = EventStream::new(events.subscribe());
    player.on_info(InfoKind::Other(801), 0);
    player.on_info(InfoKind::VideoRenderingStart, 0);

    assert_eq!(states(&mut stream), vec![PlayState::Playing, PlayState::Playing]);
}

#[test]
fn test_first_frame_rearms_completion() {
    let (mut player, engine, _events) = new_player();
    let view = as_dyn(&TestView::new(1));

    player.play_url(&view, "a.mp4").unwrap();
    engine.borrow().post(EngineCallback::Info {
        kind: InfoKind::VideoRenderingStart,
        extra: 0,
    });
    engine.borrow().post(EngineCallback::Completion);
    assert_eq!(player.dispatch_pending(), 2);

    assert_eq!(player.current_state(), PlayState::Completed);
}

#[test]
fn test_seek_complete_restarts_paused_engine() {
    let (mut player, engine, _events) = new_player();
    let view = as_dyn(&TestView::new(1));
    play_prepared(&mut player, &engine, &view, "a.mp4");
    player.pause();

    player.seek_to(40_000);
    engine.borrow().post(EngineCallback::SeekComplete);
    player.dispatch_pending();

    assert_eq!(engine.borrow().last_command(), Some(&EngineCommand::Start));
    assert_eq!(player.last_known_position(), 40_000);
}

#[test]
fn test_video_size_forwarded_to_live_view() {
    let (mut player, engine, events) = new_player();
    let view = TestView::new(1);
    play_prepared(&mut player, &engine, &as_dyn(&view), "a.mp4");

    let mut stream = EventStream::new(events.subscribe());
    engine
        .borrow()
        .post(EngineCallback::VideoSizeChanged { width: 1920, height: 1080 });
    player.dispatch_pending();

    assert_eq!(*view.video_sizes.borrow(), vec![(1920, 1080)]);
    assert_eq!(player.video_size(), Some(bridge_traits::Size::new(1920, 1080)));
    assert_eq!(
        stream.drain(),
        vec![CoreEvent::Player(PlayerEvent::VideoSizeChanged {
            width: 1920,
            height: 1080
        })]
    );
}

#[test]
fn test_unbind_keeps_playing_headless() {
    let (mut player, engine, _events) = new_player();
    let view = TestView::new(1);
    play_prepared(&mut player, &engine, &as_dyn(&view), "a.mp4");

    assert!(!player.unbind_view(ViewId::new()));
    assert!(player.unbind_view(view.id));

    assert_eq!(player.current_state(), PlayState::Playing);
    assert!(player.is_playing());
    assert_eq!(
        engine.borrow().last_command(),
        Some(&EngineCommand::SetSurface(None))
    );
    assert!(player.bound_view().is_none());
}

#[test]
fn test_dropped_view_is_not_kept_alive() {
    let (mut player, engine, _events) = new_player();
    let view = TestView::new(1);
    play_prepared(&mut player, &engine, &as_dyn(&view), "a.mp4");

    drop(view);
    assert!(player.bound_view().is_none());

    // Callbacks touching the view become no-ops.
    player.on_video_size_changed(640, 360);
    assert!(player.on_error(1, -1));
}

#[test]
fn test_refresh_surface_rebinds_without_prepare() {
    let (mut player, engine, _events) = new_player();
    let view = TestView::new(1);
    play_prepared(&mut player, &engine, &as_dyn(&view), "a.mp4");
    engine.borrow_mut().commands.clear();

    view.surface.set(Some(SurfaceHandle(42)));
    assert!(player.refresh_surface(view.id));

    assert_eq!(
        engine.borrow().commands,
        vec![EngineCommand::SetSurface(Some(SurfaceHandle(42)))]
    );
    assert_eq!(player.current_state(), PlayState::Playing);
}

#[test]
fn test_stop_keeps_resume_position() {
    let (mut player, engine, _events) = new_player();
    let view = as_dyn(&TestView::new(1));
    play_prepared(&mut player, &engine, &view, "a.mp4");

    engine.borrow_mut().position_ms = 8_500;
    player.stop();

    assert_eq!(player.current_state(), PlayState::Idle);
    assert_eq!(player.position_cache().peek("a.mp4"), Some(8_500));
    assert!(!player.is_playing());
}

#[test]
fn test_video_size_cleared_by_new_source() {
    let (mut player, engine, _events) = new_player();
    let view = as_dyn(&TestView::new(1));
    play_prepared(&mut player, &engine, &view, "a.mp4");

    player.on_video_size_changed(0, 0);
    assert_eq!(player.video_size(), None);

    player.on_video_size_changed(1280, 720);
    player.play_url(&view, "b.mp4").unwrap();
    assert_eq!(player.video_size(), None);
}
