//! Application state record.
//!
//! Everything the scenes share lives here and is changed only through these
//! methods: the active scene, the stored photo, the sound toggle, the
//! acquisition phase and the heart loop handle. `H` is the loop handle type;
//! dropping it cancels the loop.

use crate::animation::AnimationSlot;
use crate::media::{
    AuthPhase, Authenticator, Music, PhotoPath, SoundBoard, SoundCue, UserPhoto, FALLBACK_PHOTO,
};
use crate::scene::{Scene, SceneController, Transition};

#[derive(Debug)]
pub struct AppState<H> {
    scenes: SceneController,
    photo: Option<UserPhoto>,
    sound: SoundBoard,
    auth: Authenticator,
    heart: AnimationSlot<H>,
    candles_blown: bool,
}

impl<H> Default for AppState<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> AppState<H> {
    pub fn new() -> Self {
        Self {
            scenes: SceneController::new(),
            photo: None,
            sound: SoundBoard::default(),
            auth: Authenticator::new(),
            heart: AnimationSlot::new(),
            candles_blown: false,
        }
    }

    pub fn scenes(&self) -> &SceneController {
        &self.scenes
    }

    pub fn current(&self) -> Scene {
        self.scenes.current()
    }

    pub fn mark_ready(&mut self, scene: Scene) -> bool {
        self.scenes.mark_ready(scene)
    }

    /// Called when `scene` starts fading in. Returns false for a scene that
    /// was already left, which must stay invisible.
    pub fn on_fade_in(&mut self, scene: Scene) -> bool {
        if !self.scenes.is_active(scene) {
            return false;
        }
        if scene.unlocks_on_fade_in() {
            self.scenes.mark_ready(scene);
        }
        true
    }

    /// Leaves `from`, tearing down its animation first.
    pub fn advance(&mut self, from: Scene) -> Option<Transition> {
        if !(self.scenes.is_active(from) && self.scenes.is_ready()) {
            return self.scenes.advance(from);
        }
        if from == Scene::HeartEquation && self.heart.stop() {
            log::debug!("heart loop stopped on exit");
        }
        self.scenes.advance(from)
    }

    /// Starts the heart loop if the equation scene is still showing.
    pub fn start_heart(&mut self, spawn: impl FnOnce() -> H) -> bool {
        if !self.scenes.is_active(Scene::HeartEquation) {
            log::debug!("heart start skipped, {} is active", self.current());
            return false;
        }
        self.heart.start(spawn);
        log::info!("heart loop started");
        true
    }

    pub fn stop_heart(&mut self) -> bool {
        self.heart.stop()
    }

    pub fn heart(&self) -> &AnimationSlot<H> {
        &self.heart
    }

    /// Restarts a live heart loop so it picks up the new surface size.
    pub fn on_resize(&mut self, spawn: impl FnOnce() -> H) -> bool {
        if !(self.scenes.is_active(Scene::HeartEquation) && self.heart.is_live()) {
            return false;
        }
        self.heart.stop();
        self.heart.start(spawn);
        log::debug!("heart loop restarted after resize");
        true
    }

    pub fn auth_mut(&mut self) -> &mut Authenticator {
        &mut self.auth
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    pub fn store_photo(&mut self, photo: UserPhoto) {
        self.photo = Some(photo);
    }

    pub fn photo(&self) -> Option<&UserPhoto> {
        self.photo.as_ref()
    }

    /// Whether the live camera frame has to be captured before the stream
    /// is released. An uploaded photo always wins.
    pub fn needs_snapshot(&self) -> bool {
        self.photo.is_none() && self.auth.phase() == AuthPhase::Authenticated(PhotoPath::Camera)
    }

    /// Image source for the finale.
    pub fn finale_photo(&self) -> &str {
        self.photo
            .as_ref()
            .map(UserPhoto::data_url)
            .unwrap_or(FALLBACK_PHOTO)
    }

    /// The one-time blow action. Unlocks the automatic move to the finale.
    pub fn blow(&mut self) -> bool {
        if self.candles_blown || !self.scenes.is_active(Scene::Candles) {
            return false;
        }
        self.candles_blown = true;
        self.scenes.mark_ready(Scene::Candles)
    }

    pub fn toggle_sound(&mut self) -> Music {
        let scene = self.current();
        self.sound.toggle(scene)
    }

    pub fn sound(&self) -> &SoundBoard {
        &self.sound
    }

    pub fn cue(&self, cue: SoundCue) -> Option<f64> {
        self.sound.cue(cue)
    }
}
