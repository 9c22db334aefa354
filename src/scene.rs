//! Scene sequencing.
//!
//! Exactly one [`Scene`] is active. A scene can only be left forward, and
//! only once its affordance has been unlocked with
//! [`SceneController::mark_ready`]; this is what keeps a double click from
//! skipping a scene or leaving two scenes active.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scene {
    Boot,
    Journey,
    Message,
    HeartEquation,
    Candles,
    Finale,
}

/// What moves a scene on to the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// A timer fires after the scene's own sequence completes.
    Automatic,
    /// The visitor presses the scene's continue button.
    UserAction,
    /// The last scene stays up for the rest of the page lifetime.
    Terminal,
}

impl Scene {
    pub const ALL: [Scene; 6] = [
        Scene::Boot,
        Scene::Journey,
        Scene::Message,
        Scene::HeartEquation,
        Scene::Candles,
        Scene::Finale,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn advance(self) -> Advance {
        match self {
            Scene::Boot | Scene::Candles => Advance::Automatic,
            Scene::Journey | Scene::Message | Scene::HeartEquation => Advance::UserAction,
            Scene::Finale => Advance::Terminal,
        }
    }

    /// Button-driven scenes whose button is usable as soon as the scene
    /// starts fading in. The message unlocks when its script finishes.
    pub fn unlocks_on_fade_in(self) -> bool {
        matches!(self, Scene::Journey | Scene::HeartEquation)
    }

    /// DOM id of the section holding this scene.
    pub fn element_id(self) -> String {
        format!("scene-{}", self.index())
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scene::Boot => "boot",
            Scene::Journey => "journey",
            Scene::Message => "message",
            Scene::HeartEquation => "heart-equation",
            Scene::Candles => "candles",
            Scene::Finale => "finale",
        };
        f.write_str(name)
    }
}

/// A completed forward move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: Scene,
    pub to: Scene,
    /// Increments with every transition; delayed fade callbacks compare it
    /// to tell whether they are stale.
    pub epoch: u64,
}

/// Two-phase cross-fade. The old scene keeps receiving input while it fades
/// out; the new scene is shown at once and fades in after a short delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crossfade {
    pub fade_in_delay_ms: u32,
    pub fade_out_ms: u32,
}

impl Default for Crossfade {
    fn default() -> Self {
        Self {
            fade_in_delay_ms: 50,
            fade_out_ms: 800,
        }
    }
}

/// Visibility a scene should end up in once its fade settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

#[derive(Debug)]
pub struct SceneController {
    current: Scene,
    ready: bool,
    epoch: u64,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneController {
    pub fn new() -> Self {
        Self {
            current: Scene::Boot,
            ready: false,
            epoch: 0,
        }
    }

    pub fn current(&self) -> Scene {
        self.current
    }

    pub fn is_active(&self, scene: Scene) -> bool {
        self.current == scene
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Unlocks the way out of `scene`. Ignored unless `scene` is active.
    pub fn mark_ready(&mut self, scene: Scene) -> bool {
        if self.current != scene {
            log::debug!("ignoring ready for inactive scene {scene}");
            return false;
        }
        self.ready = true;
        true
    }

    /// Moves from `from` to the scene after it.
    ///
    /// Returns `None` when `from` is not the active scene, its affordance is
    /// still locked, or it is the last scene.
    pub fn advance(&mut self, from: Scene) -> Option<Transition> {
        if self.current != from {
            log::debug!("stale transition out of {from}, {} is active", self.current);
            return None;
        }
        if !self.ready {
            log::debug!("transition out of {from} before it was ready");
            return None;
        }
        let to = from.next()?;
        self.current = to;
        self.ready = false;
        self.epoch += 1;
        log::info!("scene {from} -> {to}");
        Some(Transition {
            from,
            to,
            epoch: self.epoch,
        })
    }

    /// Where `scene` should settle right now.
    pub fn visibility(&self, scene: Scene) -> Visibility {
        if self.is_active(scene) {
            Visibility::Shown
        } else {
            Visibility::Hidden
        }
    }
}
