//! Photo acquisition and sound state.
//!
//! The browser side (camera stream, file reader, audio elements) lives in
//! the web layer; this module keeps the rules: one acquisition path at a
//! time, a single stored photo with a placeholder fallback, and sound muted
//! until the visitor turns it on.

use crate::error::{GreetingError, GreetingResult};
use crate::scene::Scene;

/// Pink tile with a crown, shown in the finale when no photo was taken.
pub const FALLBACK_PHOTO: &str = "data:image/svg+xml,\
%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%20viewBox%3D%220%200%20200%20200%22%3E\
%3Crect%20fill%3D%22%23FF1493%22%20width%3D%22200%22%20height%3D%22200%22%2F%3E\
%3Ctext%20x%3D%22100%22%20y%3D%22110%22%20text-anchor%3D%22middle%22%20fill%3D%22white%22%20font-size%3D%2280%22%3E\
%F0%9F%91%B8%3C%2Ftext%3E%3C%2Fsvg%3E";

/// Side used for camera snapshots when the stream reports no size.
pub const SNAPSHOT_FALLBACK_SIDE: u32 = 280;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoPath {
    Camera,
    Upload,
}

/// Image captured from the camera or read from a chosen file, as a data URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserPhoto {
    data_url: String,
    source: PhotoPath,
}

impl UserPhoto {
    pub fn new(data_url: impl Into<String>, source: PhotoPath) -> Self {
        Self {
            data_url: data_url.into(),
            source,
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn source(&self) -> PhotoPath {
        self.source
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    Idle,
    /// Waiting on the camera permission prompt or the file reader.
    Acquiring(PhotoPath),
    /// Input arrived; the fake face scan is running.
    Scanning(PhotoPath),
    Authenticated(PhotoPath),
}

/// Keeps the two acquisition paths mutually exclusive.
#[derive(Debug)]
pub struct Authenticator {
    phase: AuthPhase,
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl Authenticator {
    pub fn new() -> Self {
        Self {
            phase: AuthPhase::Idle,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// Starts acquiring on `path`. An upload takes over a camera that is
    /// still waiting on its permission prompt; the late stream is then
    /// refused by [`Authenticator::acquired`].
    pub fn begin(&mut self, path: PhotoPath) -> GreetingResult<()> {
        match (self.phase, path) {
            (AuthPhase::Idle, _) | (AuthPhase::Acquiring(PhotoPath::Camera), PhotoPath::Upload) => {
                self.phase = AuthPhase::Acquiring(path);
                Ok(())
            }
            (
                AuthPhase::Acquiring(running)
                | AuthPhase::Scanning(running)
                | AuthPhase::Authenticated(running),
                _,
            ) => Err(GreetingError::AcquisitionBusy(running)),
        }
    }

    /// Input arrived on `path`; returns `false` if that path is not the one
    /// being acquired.
    pub fn acquired(&mut self, path: PhotoPath) -> bool {
        if self.phase != AuthPhase::Acquiring(path) {
            return false;
        }
        self.phase = AuthPhase::Scanning(path);
        true
    }

    /// The path gave up (denied permission, empty file pick); the visitor
    /// may try again with either path. Returns `false` if another path had
    /// already taken over.
    pub fn abandon(&mut self, path: PhotoPath) -> bool {
        if self.phase != AuthPhase::Acquiring(path) {
            return false;
        }
        self.phase = AuthPhase::Idle;
        true
    }

    /// Scan finished. Returns the path that authenticated.
    pub fn complete(&mut self) -> Option<PhotoPath> {
        match self.phase {
            AuthPhase::Scanning(path) => {
                self.phase = AuthPhase::Authenticated(path);
                Some(path)
            }
            _ => None,
        }
    }
}

/// One-shot effects; each rewinds before playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    AuthSuccess,
    Blow,
    Celebration,
}

impl SoundCue {
    pub fn volume(self) -> f64 {
        match self {
            SoundCue::AuthSuccess => 0.3,
            SoundCue::Blow | SoundCue::Celebration => 0.5,
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            SoundCue::AuthSuccess | SoundCue::Celebration => "celebration-sound",
            SoundCue::Blow => "blow-sound",
        }
    }
}

pub const MUSIC_VOLUME: f64 = 0.3;

/// What the web layer should do with the background track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Music {
    Play,
    Pause,
}

#[derive(Debug, Default)]
pub struct SoundBoard {
    enabled: bool,
}

impl SoundBoard {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn icon(&self) -> &'static str {
        if self.enabled {
            "🔊"
        } else {
            "🔇"
        }
    }

    /// Flips the toggle. Music only resumes once the boot scene is over.
    pub fn toggle(&mut self, scene: Scene) -> Music {
        self.enabled = !self.enabled;
        log::info!("sound {}", if self.enabled { "on" } else { "off" });
        if self.enabled && scene != Scene::Boot {
            Music::Play
        } else {
            Music::Pause
        }
    }

    /// Volume to play `cue` at, or `None` while muted.
    pub fn cue(&self, cue: SoundCue) -> Option<f64> {
        self.enabled.then(|| cue.volume())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_mutually_exclusive() {
        let mut auth = Authenticator::new();
        auth.begin(PhotoPath::Upload).unwrap();
        let err = auth.begin(PhotoPath::Camera).unwrap_err();
        assert!(matches!(err, GreetingError::AcquisitionBusy(PhotoPath::Upload)));
        assert!(!auth.acquired(PhotoPath::Camera));

        let mut auth = Authenticator::new();
        auth.begin(PhotoPath::Camera).unwrap();
        assert!(auth.acquired(PhotoPath::Camera));
        let err = auth.begin(PhotoPath::Upload).unwrap_err();
        assert!(matches!(err, GreetingError::AcquisitionBusy(PhotoPath::Camera)));
    }

    #[test]
    fn upload_takes_over_an_unanswered_camera_prompt() {
        let mut auth = Authenticator::new();
        auth.begin(PhotoPath::Camera).unwrap();
        auth.begin(PhotoPath::Upload).unwrap();
        assert_eq!(auth.phase(), AuthPhase::Acquiring(PhotoPath::Upload));

        // the prompt answering late changes nothing
        assert!(!auth.acquired(PhotoPath::Camera));
        assert!(!auth.abandon(PhotoPath::Camera));
        assert!(auth.acquired(PhotoPath::Upload));
        assert_eq!(auth.complete(), Some(PhotoPath::Upload));
    }

    #[test]
    fn denied_camera_allows_upload() {
        let mut auth = Authenticator::new();
        auth.begin(PhotoPath::Camera).unwrap();
        assert!(auth.abandon(PhotoPath::Camera));
        assert_eq!(auth.phase(), AuthPhase::Idle);
        auth.begin(PhotoPath::Upload).unwrap();
        assert!(auth.acquired(PhotoPath::Upload));
        assert_eq!(auth.complete(), Some(PhotoPath::Upload));
        assert_eq!(auth.complete(), None);
    }

    #[test]
    fn complete_needs_a_scan() {
        let mut auth = Authenticator::new();
        assert_eq!(auth.complete(), None);
        auth.begin(PhotoPath::Upload).unwrap();
        assert_eq!(auth.complete(), None);
    }

    #[test]
    fn sound_starts_muted() {
        let board = SoundBoard::default();
        assert!(!board.is_enabled());
        assert_eq!(board.icon(), "🔇");
        assert_eq!(board.cue(SoundCue::Blow), None);
    }

    #[test]
    fn music_waits_for_the_journey() {
        let mut board = SoundBoard::default();
        assert_eq!(board.toggle(Scene::Boot), Music::Pause);
        assert!(board.is_enabled());
        assert_eq!(board.toggle(Scene::Journey), Music::Pause);
        assert_eq!(board.toggle(Scene::Journey), Music::Play);
        assert_eq!(board.cue(SoundCue::AuthSuccess), Some(0.3));
        assert_eq!(board.cue(SoundCue::Celebration), Some(0.5));
    }

    #[test]
    fn fallback_photo_is_an_svg_data_url() {
        assert!(FALLBACK_PHOTO.starts_with("data:image/svg+xml,%3Csvg"));
        assert!(FALLBACK_PHOTO.ends_with("%3C%2Fsvg%3E"));
        assert!(!FALLBACK_PHOTO.contains(' '));
    }
}
