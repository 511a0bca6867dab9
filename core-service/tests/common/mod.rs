//! Test doubles for the binder: a scripted media engine, a recording view and
//! a recording layout animator.

use bridge_traits::{
    AnimationTicket, EngineCallback, EngineCallbackSink, LayoutAnimator, MediaEngine,
    MediaEngineFactory, PlayerView, Rect, Result, Size, SurfaceHandle, ViewId,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    SetSource(String),
    PrepareAsync,
    Start,
    Pause,
    Stop,
    Reset,
    SeekTo(u32),
    SetSurface(Option<SurfaceHandle>),
}

#[derive(Default)]
pub struct EngineState {
    pub commands: Vec<EngineCommand>,
    pub playing: bool,
    pub position_ms: u32,
    pub created: usize,
    pub sink: Option<EngineCallbackSink>,
}

impl EngineState {
    pub fn last_command(&self) -> Option<&EngineCommand> {
        self.commands.last()
    }

    pub fn post(&self, callback: EngineCallback) {
        let sink = self.sink.as_ref().expect("engine not created yet");
        assert!(sink.post(callback));
    }
}

pub type SharedEngine = Rc<RefCell<EngineState>>;

pub struct FakeEngine {
    shared: SharedEngine,
}

impl FakeEngine {
    fn record(&self, command: EngineCommand) {
        self.shared.borrow_mut().commands.push(command);
    }
}

impl MediaEngine for FakeEngine {
    fn set_source(&mut self, url: &str) -> Result<()> {
        self.record(EngineCommand::SetSource(url.to_string()));
        Ok(())
    }

    fn prepare_async(&mut self) -> Result<()> {
        self.record(EngineCommand::PrepareAsync);
        Ok(())
    }

    fn start(&mut self) {
        self.record(EngineCommand::Start);
        self.shared.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.record(EngineCommand::Pause);
        self.shared.borrow_mut().playing = false;
    }

    fn stop(&mut self) -> Result<()> {
        self.record(EngineCommand::Stop);
        self.shared.borrow_mut().playing = false;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.record(EngineCommand::Reset);
        self.shared.borrow_mut().playing = false;
        Ok(())
    }

    fn seek_to(&mut self, position_ms: u32) {
        self.record(EngineCommand::SeekTo(position_ms));
        self.shared.borrow_mut().position_ms = position_ms;
    }

    fn set_surface(&mut self, surface: Option<SurfaceHandle>) {
        self.record(EngineCommand::SetSurface(surface));
    }

    fn is_playing(&self) -> bool {
        self.shared.borrow().playing
    }

    fn duration(&self) -> u32 {
        60_000
    }

    fn current_position(&self) -> u32 {
        self.shared.borrow().position_ms
    }
}

struct FakeEngineFactory {
    shared: SharedEngine,
}

impl MediaEngineFactory for FakeEngineFactory {
    fn create(&self, callbacks: EngineCallbackSink) -> Result<Box<dyn MediaEngine>> {
        let mut shared = self.shared.borrow_mut();
        shared.created += 1;
        shared.sink = Some(callbacks);
        Ok(Box::new(FakeEngine {
            shared: self.shared.clone(),
        }))
    }
}

pub fn fake_engine() -> (Box<dyn MediaEngineFactory>, SharedEngine) {
    let shared = SharedEngine::default();
    let factory = FakeEngineFactory {
        shared: shared.clone(),
    };
    (Box::new(factory), shared)
}

/// View that records what the binder asks of it.
pub struct TestView {
    pub id: ViewId,
    pub surface: Cell<Option<SurfaceHandle>>,
    pub measured: Cell<Size>,
    pub parent: Cell<Option<Size>>,
    pub notices: RefCell<Vec<String>>,
    pub controls_visible: Cell<bool>,
    pub scrubs: RefCell<Vec<f32>>,
}

impl TestView {
    pub fn new(surface: u64) -> Rc<Self> {
        Rc::new(Self {
            id: ViewId::new(),
            surface: Cell::new(Some(SurfaceHandle(surface))),
            measured: Cell::new(Size::new(1080, 608)),
            parent: Cell::new(None),
            notices: RefCell::new(Vec::new()),
            controls_visible: Cell::new(true),
            scrubs: RefCell::new(Vec::new()),
        })
    }
}

impl PlayerView for TestView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn is_alive(&self) -> bool {
        true
    }

    fn surface(&self) -> Option<SurfaceHandle> {
        self.surface.get()
    }

    fn measured_size(&self) -> Size {
        self.measured.get()
    }

    fn parent_size(&self) -> Option<Size> {
        self.parent.get()
    }

    fn on_video_size_changed(&self, _width: i32, _height: i32) {}

    fn show_notice(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }

    fn hide_controls(&self) {
        self.controls_visible.set(false);
    }

    fn show_controls(&self) {
        self.controls_visible.set(true);
    }

    fn on_scrub(&self, distance_x: f32) {
        self.scrubs.borrow_mut().push(distance_x);
    }
}

pub fn as_dyn(view: &Rc<TestView>) -> Rc<dyn PlayerView> {
    view.clone()
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorCall {
    ApplyBounds(ViewId, Rect),
    AnimateTo(ViewId, Rect, AnimationTicket),
    RestoreMatchParent(ViewId),
}

/// Layout animator that records calls; completion is driven by the test.
#[derive(Default)]
pub struct RecordingAnimator {
    pub calls: RefCell<Vec<AnimatorCall>>,
}

impl RecordingAnimator {
    pub fn live_bounds(&self) -> Vec<Rect> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                AnimatorCall::ApplyBounds(_, bounds) => Some(*bounds),
                _ => None,
            })
            .collect()
    }
}

impl LayoutAnimator for RecordingAnimator {
    fn apply_bounds(&self, view: ViewId, bounds: Rect) {
        self.calls
            .borrow_mut()
            .push(AnimatorCall::ApplyBounds(view, bounds));
    }

    fn animate_to(&self, view: ViewId, target: Rect, ticket: AnimationTicket) {
        self.calls
            .borrow_mut()
            .push(AnimatorCall::AnimateTo(view, target, ticket));
    }

    fn restore_match_parent(&self, view: ViewId) {
        self.calls
            .borrow_mut()
            .push(AnimatorCall::RestoreMatchParent(view));
    }
}
