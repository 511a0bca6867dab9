//! Shared test doubles: a scripted media engine and a recording view.

#![allow(dead_code)]

use bridge_traits::{
    BridgeError, EngineCallback, EngineCallbackSink, MediaEngine, MediaEngineFactory,
    PlayerView, Result, Size, SurfaceHandle, ViewId,
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
    pub duration_ms: u32,
    pub reject_source: bool,
    pub fail_prepare: bool,
    pub fail_reset: bool,
    pub created: usize,
    pub sink: Option<EngineCallbackSink>,
}

impl EngineState {
    pub fn last_command(&self) -> Option<&EngineCommand> {
        self.commands.last()
    }

    /// Post a callback the way a real engine would, from "another thread".
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
        if self.shared.borrow().reject_source {
            return Err(BridgeError::SourceRejected(url.to_string()));
        }
        Ok(())
    }

    fn prepare_async(&mut self) -> Result<()> {
        self.record(EngineCommand::PrepareAsync);
        if self.shared.borrow().fail_prepare {
            return Err(BridgeError::OperationFailed("prepare".into()));
        }
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
        let mut shared = self.shared.borrow_mut();
        shared.playing = false;
        if shared.fail_reset {
            return Err(BridgeError::IllegalState { operation: "reset" });
        }
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
        self.shared.borrow().duration_ms
    }

    fn current_position(&self) -> u32 {
        self.shared.borrow().position_ms
    }
}

pub struct FakeEngineFactory {
    shared: SharedEngine,
    available: bool,
}

impl MediaEngineFactory for FakeEngineFactory {
    fn create(&self, callbacks: EngineCallbackSink) -> Result<Box<dyn MediaEngine>> {
        if !self.available {
            return Err(BridgeError::NotAvailable("no decoder".into()));
        }
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
        available: true,
    };
    (Box::new(factory), shared)
}

pub fn unavailable_engine() -> Box<dyn MediaEngineFactory> {
    Box::new(FakeEngineFactory {
        shared: SharedEngine::default(),
        available: false,
    })
}

/// View that records everything the session asks of it.
pub struct TestView {
    pub id: ViewId,
    pub alive: Cell<bool>,
    pub surface: Cell<Option<SurfaceHandle>>,
    pub measured: Cell<Size>,
    pub parent: Cell<Option<Size>>,
    pub notices: RefCell<Vec<String>>,
    pub video_sizes: RefCell<Vec<(i32, i32)>>,
    pub controls_visible: Cell<bool>,
    pub scrubs: RefCell<Vec<f32>>,
}

impl TestView {
    pub fn new(surface: u64) -> Rc<Self> {
        Rc::new(Self {
            id: ViewId::new(),
            alive: Cell::new(true),
            surface: Cell::new(Some(SurfaceHandle(surface))),
            measured: Cell::new(Size::new(1080, 608)),
            parent: Cell::new(None),
            notices: RefCell::new(Vec::new()),
            video_sizes: RefCell::new(Vec::new()),
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
        self.alive.get()
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

    fn on_video_size_changed(&self, width: i32, height: i32) {
        self.video_sizes.borrow_mut().push((width, height));
    }

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
