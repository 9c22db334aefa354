use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlCanvasElement, HtmlElement, MediaStream};

use super::dom::{self, Elements};
use super::frames::FrameLoop;
use super::media as device;
use super::render::{self, Surface};
use crate::animation::{AnimationSlot, HeartAnimation};
use crate::config::GreetingConfig;
use crate::error::{GreetingError, GreetingResult};
use crate::media::{Music, PhotoPath, SoundCue, UserPhoto, MUSIC_VOLUME};
use crate::particles::{BlowBurst, ConfettiField, DustField, Simulation};
use crate::scene::{Scene, Visibility};
use crate::sequencer::{self, Cue, Reveal, Step};
use crate::state::AppState;

const CAMERA_DENIED: &str = "Camera access denied. Please upload a photo instead.";

fn report(result: GreetingResult<()>) {
    if let Err(err) = result {
        log::warn!("{err}");
    }
}

/// Fresh seed per page load for the particle and sparkle RNGs.
fn entropy_seed() -> u64 {
    let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (noise << 32) ^ js_sys::Date::now() as u64
}

fn pixel_ratio() -> f64 {
    dom::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

pub struct App {
    config: GreetingConfig,
    el: Elements,
    state: RefCell<AppState<FrameLoop>>,
    stream: RefCell<Option<MediaStream>>,
    dust: RefCell<AnimationSlot<FrameLoop>>,
    confetti: RefCell<AnimationSlot<FrameLoop>>,
    burst: RefCell<AnimationSlot<FrameLoop>>,
    /// Last known window size in CSS pixels; window-sized canvases refit
    /// on their next frame when it changes.
    window_size: Cell<(f64, f64)>,
}

impl App {
    pub fn start(config: GreetingConfig, el: Elements) -> GreetingResult<Rc<Self>> {
        let window = dom::window()?;
        let size = render::window_size(&window)?;
        let app = Rc::new(Self {
            config,
            el,
            state: RefCell::new(AppState::new()),
            stream: RefCell::new(None),
            dust: RefCell::new(AnimationSlot::new()),
            confetti: RefCell::new(AnimationSlot::new()),
            burst: RefCell::new(AnimationSlot::new()),
            window_size: Cell::new(size),
        });

        for scene in Scene::ALL {
            app.settle(scene)?;
        }
        report(app.start_dust());
        app.bind(&window);
        app.run_script(Scene::Boot, sequencer::boot_script(&app.config));
        log::info!("greeting started at {}x{}", size.0, size.1);
        Ok(app)
    }

    fn bind(self: &Rc<Self>, window: &web_sys::Window) {
        let el = &self.el;

        let app = Rc::clone(self);
        EventListener::new(&el.camera_btn, "click", move |_| app.on_camera()).forget();

        let input = el.file_input.clone();
        EventListener::new(&el.upload_btn, "click", move |_| input.click()).forget();

        let app = Rc::clone(self);
        EventListener::new(&el.file_input, "change", move |_| app.on_file_chosen()).forget();

        let app = Rc::clone(self);
        EventListener::new(&el.continue_journey, "click", move |_| {
            app.transition(Scene::Journey)
        })
        .forget();

        let app = Rc::clone(self);
        EventListener::new(&el.continue_to_heart, "click", move |_| {
            app.transition(Scene::Message)
        })
        .forget();

        let app = Rc::clone(self);
        EventListener::new(&el.continue_to_wish, "click", move |_| {
            app.transition(Scene::HeartEquation)
        })
        .forget();

        let app = Rc::clone(self);
        EventListener::new(&el.blow_btn, "click", move |_| app.on_blow()).forget();

        if let Some(toggle) = &el.sound_toggle {
            let app = Rc::clone(self);
            EventListener::new(toggle, "click", move |_| app.on_sound_toggle()).forget();
        }

        let app = Rc::clone(self);
        let win = window.clone();
        EventListener::new(window, "resize", move |_| {
            match render::window_size(&win) {
                Ok(size) => app.window_size.set(size),
                Err(err) => log::warn!("{err}"),
            }
            let heart = Rc::clone(&app);
            app.state.borrow_mut().on_resize(move || heart.heart_loop());
        })
        .forget();
    }

    // Scenes

    /// Applies the scene's resting visibility without animation.
    fn settle(&self, scene: Scene) -> GreetingResult<()> {
        let el = self.el.scene(scene);
        match self.state.borrow().scenes().visibility(scene) {
            Visibility::Shown => {
                dom::add_class(el, "active")?;
                dom::set_style(el, "display", "flex")?;
                dom::set_style(el, "opacity", "1")
            }
            Visibility::Hidden => {
                dom::remove_class(el, "active")?;
                dom::set_style(el, "display", "none")?;
                dom::set_style(el, "opacity", "0")
            }
        }
    }

    fn transition(self: &Rc<Self>, from: Scene) {
        let Some(t) = self.state.borrow_mut().advance(from) else {
            return;
        };
        log::debug!("transition #{} {} -> {}", t.epoch, t.from, t.to);
        let fade = self.config.timings.crossfade();

        let incoming = self.el.scene(t.to);
        report(dom::add_class(incoming, "active"));
        report(dom::set_style(incoming, "display", "flex"));
        let app = Rc::clone(self);
        Timeout::new(fade.fade_in_delay_ms, move || {
            if app.state.borrow_mut().on_fade_in(t.to) {
                report(dom::set_style(app.el.scene(t.to), "opacity", "1"));
            }
        })
        .forget();

        report(dom::set_style(self.el.scene(t.from), "opacity", "0"));
        let app = Rc::clone(self);
        Timeout::new(fade.fade_out_ms, move || {
            if !app.state.borrow().scenes().is_active(t.from) {
                report(app.settle(t.from));
            }
        })
        .forget();

        self.enter(t.to);
    }

    fn enter(self: &Rc<Self>, scene: Scene) {
        match scene {
            Scene::Boot => {}
            Scene::Journey => {
                if self.state.borrow().sound().is_enabled() {
                    if let Some(music) = &self.el.bg_music {
                        device::resume_music(music, MUSIC_VOLUME);
                    }
                }
            }
            Scene::Message => self.run_script(Scene::Message, sequencer::message_script(&self.config)),
            Scene::HeartEquation => {
                let app = Rc::clone(self);
                Timeout::new(self.config.timings.heart_start_delay_ms, move || {
                    let heart = Rc::clone(&app);
                    if app.state.borrow_mut().start_heart(move || heart.heart_loop()) {
                        app.reveal_explanations();
                    }
                })
                .forget();
            }
            Scene::Candles => {}
            Scene::Finale => {
                let src = self.state.borrow().finale_photo().to_owned();
                self.el.queen_photo.set_src(&src);
                report(self.start_confetti());
            }
        }
    }

    // Scripts

    fn run_script(self: &Rc<Self>, scene: Scene, steps: Vec<Step>) {
        log::debug!(
            "{scene} script: {} steps over {} ms",
            steps.len(),
            sequencer::duration_ms(&steps)
        );
        let app = Rc::clone(self);
        spawn_local(async move {
            let mut body = None;
            for step in steps {
                if let Err(err) = app.apply(scene, step.cue, &mut body) {
                    log::warn!("{scene} script: {err}");
                }
                if step.wait_ms > 0 {
                    TimeoutFuture::new(step.wait_ms).await;
                }
            }
        });
    }

    fn apply(&self, scene: Scene, cue: Cue, body: &mut Option<HtmlElement>) -> GreetingResult<()> {
        let (log_view, line_class) = match scene {
            Scene::Boot => (&self.el.boot_log, "log-line"),
            _ => (&self.el.message_log, "message-line"),
        };
        match cue {
            Cue::Line { text, tag } => {
                let class = format!("{line_class} {}", tag.class());
                dom::append_line(&self.el.document, log_view, &class, &text)?;
            }
            Cue::OpenBody => {
                *body = Some(dom::append_line(&self.el.document, log_view, "message-text", "")?);
            }
            Cue::Type(prefix) => {
                if let Some(body) = body {
                    body.set_text_content(Some(&prefix));
                }
            }
            Cue::SealBody => {
                if let Some(body) = body {
                    dom::add_class(body, "complete")?;
                }
            }
            Cue::Finish => match scene {
                Scene::Boot => dom::reveal(&self.el.auth_section)?,
                _ => {
                    self.state.borrow_mut().mark_ready(scene);
                    dom::reveal(&self.el.continue_to_heart)?;
                }
            },
        }
        Ok(())
    }

    fn reveal_explanations(&self) {
        let timings = &self.config.timings;
        let lines = &self.el.explanation_lines;
        let timeline = sequencer::explanation_timeline(
            lines.len(),
            timings.explanation_step_ms,
            timings.overlay_extra_ms,
        );
        for (at, reveal) in timeline {
            let target = match reveal {
                Reveal::ExplanationLine(i) => lines.get(i).cloned(),
                Reveal::Overlay => self.el.emotional_overlay.clone(),
            };
            let Some(target) = target else {
                continue;
            };
            Timeout::new(at, move || report(dom::add_class(&target, "visible"))).forget();
        }
    }

    // Authentication

    fn set_scanning(&self, on: bool) {
        if let Some(scan) = &self.el.scan_line {
            report(if on {
                dom::add_class(scan, "active")
            } else {
                dom::remove_class(scan, "active")
            });
        }
    }

    fn on_camera(self: &Rc<Self>) {
        if let Err(err) = self.state.borrow_mut().auth_mut().begin(PhotoPath::Camera) {
            log::info!("{err}");
            return;
        }
        let app = Rc::clone(self);
        spawn_local(async move {
            let stream = match device::open_camera().await {
                Ok(stream) => stream,
                Err(err) => {
                    log::error!("{err}");
                    // an upload may have taken over while the prompt was open
                    if app.state.borrow_mut().auth_mut().abandon(PhotoPath::Camera) {
                        gloo::dialogs::alert(CAMERA_DENIED);
                    }
                    return;
                }
            };
            if !app.state.borrow_mut().auth_mut().acquired(PhotoPath::Camera) {
                log::info!("camera answered after another path took over");
                device::release(&stream);
                return;
            }
            device::attach(&app.el.camera, &stream);
            *app.stream.borrow_mut() = Some(stream);
            report(dom::add_class(&app.el.camera, "active"));
            report(dom::remove_class(&app.el.uploaded_photo, "active"));
            app.set_scanning(true);

            TimeoutFuture::new(app.config.timings.scan_ms).await;
            app.complete_auth().await;
        });
    }

    fn on_file_chosen(self: &Rc<Self>) {
        let Some(file) = self.el.file_input.files().and_then(|files| files.get(0)) else {
            return;
        };
        if let Err(err) = self.state.borrow_mut().auth_mut().begin(PhotoPath::Upload) {
            log::info!("{err}");
            return;
        }
        let app = Rc::clone(self);
        spawn_local(async move {
            let data_url = match device::read_upload(file).await {
                Ok(url) => url,
                Err(err) => {
                    log::error!("upload unreadable: {err}");
                    app.state.borrow_mut().auth_mut().abandon(PhotoPath::Upload);
                    return;
                }
            };
            if !app.state.borrow_mut().auth_mut().acquired(PhotoPath::Upload) {
                return;
            }
            app.el.uploaded_photo.set_src(&data_url);
            app.state
                .borrow_mut()
                .store_photo(UserPhoto::new(data_url, PhotoPath::Upload));
            report(dom::add_class(&app.el.uploaded_photo, "active"));
            report(dom::remove_class(&app.el.camera, "active"));
            app.set_scanning(true);

            TimeoutFuture::new(app.config.timings.scan_ms).await;
            app.complete_auth().await;
        });
    }

    async fn complete_auth(self: Rc<Self>) {
        let Some(path) = self.state.borrow_mut().auth_mut().complete() else {
            return;
        };
        log::info!("authenticated via {path:?}");
        self.set_scanning(false);
        report(dom::reveal(&self.el.auth_result));
        self.play_cue(SoundCue::AuthSuccess);

        TimeoutFuture::new(self.config.timings.auth_hold_ms).await;

        let stream = self.stream.borrow_mut().take();
        if let Some(stream) = stream {
            let wanted = self.state.borrow().needs_snapshot();
            if let (true, Some(canvas)) = (wanted, self.el.photo_canvas.as_ref()) {
                match device::snapshot(&self.el.camera, canvas) {
                    Ok(url) => self
                        .state
                        .borrow_mut()
                        .store_photo(UserPhoto::new(url, PhotoPath::Camera)),
                    Err(err) => log::warn!("snapshot failed: {err}"),
                }
            }
            device::release(&stream);
            device::detach(&self.el.camera);
        }

        self.state.borrow_mut().mark_ready(Scene::Boot);
        self.transition(Scene::Boot);
    }

    // Sound

    fn play_cue(&self, cue: SoundCue) {
        let volume = self.state.borrow().cue(cue);
        if let (Some(volume), Some(audio)) = (volume, self.el.sound(cue)) {
            device::play(audio, volume);
        }
    }

    fn on_sound_toggle(&self) {
        let music = self.state.borrow_mut().toggle_sound();
        let (icon, enabled) = {
            let state = self.state.borrow();
            (state.sound().icon(), state.sound().is_enabled())
        };
        if let Some(toggle) = &self.el.sound_toggle {
            toggle.set_text_content(Some(icon));
            report(
                toggle
                    .class_list()
                    .toggle_with_force("muted", !enabled)
                    .map(drop)
                    .map_err(dom::js),
            );
        }
        let Some(bg_music) = &self.el.bg_music else {
            return;
        };
        match music {
            Music::Play => device::resume_music(bg_music, MUSIC_VOLUME),
            Music::Pause => device::pause_music(bg_music),
        }
    }

    // Candles

    fn on_blow(self: &Rc<Self>) {
        if !self.state.borrow_mut().blow() {
            return;
        }
        self.el.blow_btn.set_disabled(true);
        self.play_cue(SoundCue::Blow);

        let timings = &self.config.timings;
        for (i, at) in sequencer::stagger(self.el.flames.len(), timings.flame_stagger_ms) {
            let flame = self.el.flames[i].clone();
            Timeout::new(at, move || report(dom::add_class(&flame, "out"))).forget();
        }

        match self.burst_loop() {
            Ok(burst) => self.burst.borrow_mut().start(move || burst),
            Err(err) => log::warn!("blow burst skipped: {err}"),
        }

        let app = Rc::clone(self);
        Timeout::new(timings.finale_delay_ms, move || {
            app.play_cue(SoundCue::Celebration);
            app.transition(Scene::Candles);
        })
        .forget();
    }

    // Loops

    fn heart_loop(&self) -> FrameLoop {
        let surface = self.el.heart_canvas.as_ref().and_then(|canvas| {
            Surface::fit_layout(canvas, pixel_ratio())
                .map_err(|err| log::error!("heart canvas unavailable: {err}"))
                .ok()
        });
        let mut heart = HeartAnimation::new(self.config.heart_variant, entropy_seed());
        let display = self.el.h_display.clone();
        FrameLoop::start(move |_| {
            let Some(surface) = surface.as_ref() else {
                return;
            };
            let Some(frame) = heart.frame(&surface.view) else {
                return;
            };
            report(render::draw_heart(&surface.ctx, &surface.view, &frame));
            if let Some(display) = &display {
                display.set_text_content(Some(&format!("{:.2}", frame.h)));
            }
        })
    }

    /// Loop over a window-sized canvas that follows resizes.
    fn ambient<S, D>(self: &Rc<Self>, canvas: HtmlCanvasElement, mut field: S, draw: D) -> GreetingResult<FrameLoop>
    where
        S: Simulation + 'static,
        D: Fn(&Surface, &[S::Body]) -> GreetingResult<()> + 'static,
    {
        let mut surface = Surface::fit_window(&canvas, &dom::window()?)?;
        let weak = Rc::downgrade(self);
        Ok(FrameLoop::start(move |_| {
            let Some(app) = weak.upgrade() else {
                return;
            };
            let (width, height) = app.window_size.get();
            if (width, height) != (surface.view.width, surface.view.height) {
                surface.refit_window(&canvas, width, height);
                field.resize(width, height);
            }
            field.step();
            report(draw(&surface, field.bodies()));
        }))
    }

    fn start_dust(self: &Rc<Self>) -> GreetingResult<()> {
        let (width, height) = self.window_size.get();
        let field = DustField::new(self.config.particles.dust, width, height, entropy_seed());
        let canvas = self.el.particles.clone().ok_or_else(|| GreetingError::missing("particles"))?;
        let dust = self.ambient(canvas, field, render::draw_dust)?;
        self.dust.borrow_mut().start(move || dust);
        Ok(())
    }

    fn start_confetti(self: &Rc<Self>) -> GreetingResult<()> {
        let (width, height) = self.window_size.get();
        let field = ConfettiField::new(self.config.particles.confetti, width, height, entropy_seed());
        let canvas = self.el.confetti.clone().ok_or_else(|| GreetingError::missing("confetti"))?;
        let confetti = self.ambient(canvas, field, render::draw_confetti)?;
        self.confetti.borrow_mut().start(move || confetti);
        log::info!("confetti started");
        Ok(())
    }

    /// One-second burst that removes itself once every ember has faded.
    fn burst_loop(self: &Rc<Self>) -> GreetingResult<FrameLoop> {
        let canvas = self
            .el
            .blow_particles
            .as_ref()
            .ok_or_else(|| GreetingError::missing("blow-particles"))?;
        let surface = Surface::fit_layout(canvas, pixel_ratio())?;
        let mut burst = BlowBurst::new(
            self.config.particles.burst,
            surface.view.width,
            surface.view.height,
            entropy_seed(),
        );
        let weak = Rc::downgrade(self);
        Ok(FrameLoop::start(move |_| {
            burst.step();
            report(render::draw_burst(&surface, burst.origin(), burst.bodies()));
            if burst.is_spent() {
                if let Some(app) = weak.upgrade() {
                    app.burst.borrow_mut().stop();
                    log::debug!("blow burst finished");
                }
            }
        }))
    }
}
