//! Browser host (WASM only)
//!
//! Mounts each game as a `.game-container` appended to the terminal output:
//! canvas, info line and optional control buttons. Listeners and timers are
//! owned by the active mount and released when the game ends or is stopped.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, KeyboardEvent,
    MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, TouchEvent, Window,
};

use super::{
    Capabilities, ControlButton, InputEvent, Key, Mount, Schedule, Session, SharedTerminal,
    Terminal,
};
use crate::commands::Arcade;
use crate::config::GamesConfig;
use crate::error::{GameError, Result};
use crate::games::{Game, GameKind};
use crate::notice::escape_html;
use crate::persistence;
use crate::renderer::CanvasSurface;

/// Terminal output region
pub const OUTPUT_ID: &str = "output";
/// Terminal line input
pub const INPUT_ID: &str = "terminal-input";

const REFOCUS_DELAY_MS: i32 = 100;

const MOBILE_AGENTS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Terminal arcade loaded");
}

/// Handle the terminal glue holds on to
#[wasm_bindgen]
pub struct WebArcade {
    arcade: Arcade,
}

#[wasm_bindgen]
impl WebArcade {
    #[wasm_bindgen(constructor)]
    pub fn new() -> std::result::Result<WebArcade, JsValue> {
        let terminal: SharedTerminal = Rc::new(RefCell::new(DomTerminal));
        let host = WebHost::new(terminal.clone()).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let arcade = Arcade::new(
            Box::new(host),
            terminal,
            persistence::open_default(),
            GamesConfig::load(),
        );
        Ok(WebArcade { arcade })
    }

    /// Run a command line; false when it is not a game command
    pub fn run(&mut self, command: &str) -> bool {
        self.arcade.run(command)
    }

    /// Stop whatever game is active
    pub fn stop(&mut self) {
        self.arcade.stop();
    }
}

/// Prints into the terminal output region
#[derive(Debug, Clone, Copy, Default)]
pub struct DomTerminal;

impl Terminal for DomTerminal {
    fn print(&mut self, html: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(output) = document.get_element_by_id(OUTPUT_ID) else {
            log::warn!("#{} missing, dropping output line", OUTPUT_ID);
            return;
        };
        let Ok(line) = document.create_element("div") else {
            return;
        };
        line.set_class_name("output-line output-response");
        line.set_inner_html(html);
        if output.append_child(&line).is_ok() {
            output.set_scroll_top(output.scroll_height());
        }
    }
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn detect_capabilities(window: &Window) -> Capabilities {
    let navigator = window.navigator();
    let agent = navigator.user_agent().unwrap_or_default().to_lowercase();
    let mobile_agent = MOBILE_AGENTS.iter().any(|m| agent.contains(m));
    let touch_events = js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    Capabilities {
        touch_controls: mobile_agent || touch_events || navigator.max_touch_points() > 0,
    }
}

fn terminal_input(document: &Document) -> Option<HtmlElement> {
    document
        .get_element_by_id(INPUT_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn create(document: &Document, tag: &str) -> Result<Element> {
    document
        .create_element(tag)
        .map_err(|_| GameError::ElementUnavailable(format!("<{}>", tag)))
}

fn append(parent: &Element, child: &Element) -> Result<()> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|_| GameError::ElementUnavailable("game container".to_string()))
}

fn controls_class(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Breakout => "breakout-mobile-controls",
        GameKind::Snake => "snake-mobile-controls",
        GameKind::Slots => "slots-controls",
    }
}

/// Canvas-relative position of a client point
fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    (
        client_x as f32 - rect.left() as f32,
        client_y as f32 - rect.top() as f32,
    )
}

fn info_html(status: &[(&'static str, String)]) -> String {
    status
        .iter()
        .map(|(label, value)| format!("{}: <span>{}</span>", label, escape_html(value)))
        .collect::<Vec<_>>()
        .join(" | ")
}

type Shared = Rc<RefCell<HostState>>;

#[derive(Default)]
struct HostState {
    generation: u64,
    active: Option<Active>,
}

impl HostState {
    /// The live mount started as `generation`, if it is still the current one
    fn current(&mut self, generation: u64) -> Option<&mut Active> {
        self.active
            .as_mut()
            .filter(|a| a.generation == generation && a.session.is_alive())
    }

    fn finish_if_ended(&mut self) {
        if self.active.as_ref().is_some_and(|a| !a.session.is_alive()) {
            if let Some(active) = self.active.take() {
                active.teardown();
            }
        }
    }
}

/// Event listener kept so it can be removed again
struct Listener {
    target: EventTarget,
    name: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, name: &'static str, closure: Closure<dyn FnMut(Event)>) -> Self {
        if target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Failed to listen for {}", name);
        }
        Self {
            target: target.clone(),
            name,
            closure,
        }
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.name, self.closure.as_ref().unchecked_ref());
    }
}

struct Interval {
    id: i32,
    closure: Closure<dyn FnMut()>,
}

/// Everything owned by the mounted game
struct Active {
    generation: u64,
    window: Window,
    document: Document,
    session: Session<CanvasSurface>,
    installed: Schedule,
    interval: Option<Interval>,
    frame: Option<i32>,
    info: Element,
    buttons: Vec<Element>,
    listeners: Vec<Listener>,
    /// Interval closures replaced while one of them may still be running
    retired: Vec<Closure<dyn FnMut()>>,
}

impl Active {
    fn install(&mut self, shared: &Shared, schedule: Schedule) {
        self.cancel_timers();
        self.installed = schedule;
        match schedule {
            Schedule::Interval(ms) => {
                let shared = shared.clone();
                let generation = self.generation;
                let closure = Closure::<dyn FnMut()>::new(move || on_tick(&shared, generation));
                match self.window.set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    ms as i32,
                ) {
                    Ok(id) => self.interval = Some(Interval { id, closure }),
                    Err(_) => log::warn!("Failed to start {} ms timer", ms),
                }
            }
            Schedule::Frames => self.frame = request_frame(&self.window, shared, self.generation),
            Schedule::Idle => {}
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(interval) = self.interval.take() {
            self.window.clear_interval_with_handle(interval.id);
            self.retired.push(interval.closure);
        }
        if let Some(id) = self.frame.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }

    /// Sync the info line and button labels with the game
    fn refresh(&self) {
        self.info.set_inner_html(&info_html(&self.session.status()));
        for (button, control) in self.buttons.iter().zip(self.session.controls()) {
            button.set_text_content(Some(control.label));
        }
    }

    fn teardown(mut self) {
        self.cancel_timers();
        for listener in &self.listeners {
            listener.detach();
        }
        self.session.stop();
        for button in &self.buttons {
            let _ = button.set_attribute("disabled", "");
        }
        log::info!("Unmounted {}", self.session.kind());

        // Closures are released with the refocus, after any running callback returned
        let listeners = std::mem::take(&mut self.listeners);
        let retired = std::mem::take(&mut self.retired);
        let document = self.document.clone();
        let refocus = Closure::once_into_js(move || {
            drop(listeners);
            drop(retired);
            if let Some(input) = terminal_input(&document) {
                let _ = input.focus();
            }
        });
        if self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                refocus.unchecked_ref(),
                REFOCUS_DELAY_MS,
            )
            .is_err()
        {
            log::warn!("Failed to schedule terminal refocus");
        }
    }
}

fn request_frame(window: &Window, shared: &Shared, generation: u64) -> Option<i32> {
    let shared = shared.clone();
    let closure = Closure::once_into_js(move |_time: f64| on_frame(&shared, generation));
    window.request_animation_frame(closure.unchecked_ref()).ok()
}

fn on_tick(shared: &Shared, generation: u64) {
    let mut state = shared.borrow_mut();
    let Some(active) = state.current(generation) else {
        return;
    };
    let schedule = active.session.fire(now_ms());
    if schedule != active.installed {
        active.install(shared, schedule);
    }
    active.refresh();
    state.finish_if_ended();
}

fn on_frame(shared: &Shared, generation: u64) {
    let mut state = shared.borrow_mut();
    let Some(active) = state.current(generation) else {
        return;
    };
    active.frame = None;
    match active.session.fire(now_ms()) {
        Schedule::Frames => {
            active.installed = Schedule::Frames;
            active.frame = request_frame(&active.window, shared, generation);
        }
        other if other != active.installed => active.install(shared, other),
        _ => {}
    }
    active.refresh();
    state.finish_if_ended();
}

/// Feed one event to the current game; returns whether it was consumed
fn deliver(shared: &Shared, generation: u64, event: InputEvent) -> bool {
    let mut state = shared.borrow_mut();
    let Some(active) = state.current(generation) else {
        return false;
    };
    let consumed = active.session.dispatch(&event, now_ms());
    let schedule = active.session.schedule();
    if schedule != active.installed {
        active.install(shared, schedule);
    }
    active.refresh();
    state.finish_if_ended();
    consumed
}

/// [`Mount`] that renders into the page
pub struct WebHost {
    window: Window,
    document: Document,
    terminal: SharedTerminal,
    capabilities: Capabilities,
    shared: Shared,
}

impl WebHost {
    pub fn new(terminal: SharedTerminal) -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| GameError::ElementUnavailable("window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| GameError::ElementUnavailable("document".to_string()))?;
        let capabilities = detect_capabilities(&window);
        log::info!("Touch controls: {}", capabilities.touch_controls);
        Ok(Self {
            window,
            document,
            terminal,
            capabilities,
            shared: Rc::new(RefCell::new(HostState::default())),
        })
    }

    fn build_controls(
        &self,
        kind: GameKind,
        controls: &[ControlButton],
        generation: u64,
        listeners: &mut Vec<Listener>,
    ) -> Result<(Element, Vec<Element>)> {
        let container = create(&self.document, "div")?;
        container.set_class_name(controls_class(kind));

        let mut buttons = Vec::with_capacity(controls.len());
        for control in controls {
            let button = create(&self.document, "button")?;
            button.set_class_name(&format!("{}-btn", kind));
            let _ = button.set_attribute("aria-label", control.aria_label);
            button.set_text_content(Some(control.label));
            append(&container, &button)?;

            let action = control.action;
            if control.hold {
                for name in ["touchstart", "mousedown"] {
                    let shared = self.shared.clone();
                    let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                        event.prevent_default();
                        deliver(&shared, generation, InputEvent::ControlPressed(action));
                    });
                    listeners.push(Listener::attach(&button, name, closure));
                }
                for name in ["touchend", "mouseup", "mouseleave"] {
                    let shared = self.shared.clone();
                    let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                        deliver(&shared, generation, InputEvent::ControlReleased(action));
                    });
                    listeners.push(Listener::attach(&button, name, closure));
                }
            } else {
                let shared = self.shared.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                    deliver(&shared, generation, InputEvent::ControlPressed(action));
                });
                listeners.push(Listener::attach(&button, "click", closure));
            }
            buttons.push(button);
        }
        Ok((container, buttons))
    }

    fn listen(&self, canvas: &HtmlCanvasElement, generation: u64, listeners: &mut Vec<Listener>) {
        for name in ["keydown", "keyup"] {
            let shared = self.shared.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = Key::parse(&key_event.key());
                let input = if name == "keydown" {
                    InputEvent::KeyDown(key)
                } else {
                    InputEvent::KeyUp(key)
                };
                if deliver(&shared, generation, input) {
                    event.prevent_default();
                }
            });
            listeners.push(Listener::attach(&self.document, name, closure));
        }

        for name in ["mousemove", "click"] {
            let shared = self.shared.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (x, y) = canvas_point(&target, mouse.client_x(), mouse.client_y());
                let input = if name == "mousemove" {
                    InputEvent::PointerMove { x, y }
                } else {
                    InputEvent::PointerDown { x, y }
                };
                deliver(&shared, generation, input);
            });
            listeners.push(Listener::attach(canvas, name, closure));
        }

        for name in ["touchstart", "touchmove", "touchend"] {
            let shared = self.shared.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let Some(touch_event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                // Lifted fingers are only in changedTouches
                let touch = if name == "touchend" {
                    touch_event.changed_touches().get(0)
                } else {
                    touch_event.touches().get(0)
                };
                let Some(touch) = touch else {
                    return;
                };
                let (x, y) = canvas_point(&target, touch.client_x(), touch.client_y());
                let input = match name {
                    "touchstart" => InputEvent::TouchStart { x, y },
                    "touchmove" => InputEvent::TouchMove { x, y },
                    _ => InputEvent::TouchEnd { x, y },
                };
                if deliver(&shared, generation, input) {
                    event.prevent_default();
                }
            });
            listeners.push(Listener::attach(canvas, name, closure));
        }
    }
}

impl Mount for WebHost {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn mount(&mut self, game: Box<dyn Game>) -> Result<()> {
        self.unmount();

        let output = self
            .document
            .get_element_by_id(OUTPUT_ID)
            .ok_or_else(|| GameError::ElementUnavailable(format!("#{}", OUTPUT_ID)))?;
        let kind = game.kind();
        let (width, height) = game.surface_size();
        let generation = {
            let mut state = self.shared.borrow_mut();
            state.generation += 1;
            state.generation
        };

        let container = create(&self.document, "div")?;
        container.set_class_name("game-container");

        let canvas = create(&self.document, "canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| GameError::SurfaceUnavailable("canvas element".to_string()))?;
        canvas.set_class_name(&format!("{}-canvas", kind));
        append(&container, &canvas)?;

        let info = create(&self.document, "div")?;
        info.set_class_name("game-info");
        info.set_id(&format!("{}-info", kind));
        append(&container, &info)?;

        let mut listeners = Vec::new();
        let controls = game.controls();
        let buttons = if controls.is_empty() {
            Vec::new()
        } else {
            let (element, buttons) = self.build_controls(kind, &controls, generation, &mut listeners)?;
            append(&container, &element)?;
            buttons
        };

        let surface = CanvasSurface::new(canvas.clone(), width, height)?;
        append(&output, &container)?;
        self.listen(&canvas, generation, &mut listeners);

        if self.capabilities.touch_controls {
            if let Some(input) = terminal_input(&self.document) {
                let _ = input.blur();
            }
        }
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        container.scroll_into_view_with_scroll_into_view_options(&options);

        let session = Session::new(game, surface, self.terminal.clone());
        let mut active = Active {
            generation,
            window: self.window.clone(),
            document: self.document.clone(),
            session,
            installed: Schedule::Idle,
            interval: None,
            frame: None,
            info,
            buttons,
            listeners,
            retired: Vec::new(),
        };
        let schedule = active.session.start(now_ms());
        active.install(&self.shared, schedule);
        active.refresh();

        let mut state = self.shared.borrow_mut();
        state.active = Some(active);
        state.finish_if_ended();
        log::info!("Mounted {} ({}x{})", kind, width, height);
        Ok(())
    }

    fn unmount(&mut self) {
        let active = self.shared.borrow_mut().active.take();
        if let Some(active) = active {
            active.teardown();
        }
    }
}
