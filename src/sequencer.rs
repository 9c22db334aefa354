//! Timed text reveal for the boot log and the message scene.
//!
//! A script is an ordered list of [`Step`]s. The runner applies a step's
//! cue, then waits `wait_ms` before the next one, so every line or
//! character is fully on screen before the following delay starts. Scripts
//! always run to completion; the last cue is [`Cue::Finish`], which is the
//! only thing that unlocks the scene's continue affordance.

use crate::config::{GreetingConfig, LogTag};

#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    /// Append one styled line to the log view.
    Line { text: String, tag: LogTag },
    /// Append the (empty) body block the typewriter writes into.
    OpenBody,
    /// Replace the body text with this prefix of the message.
    Type(String),
    /// Mark the body as complete (glow).
    SealBody,
    /// Reveal the scene's affordance.
    Finish,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub cue: Cue,
    pub wait_ms: u32,
}

impl Step {
    fn new(cue: Cue, wait_ms: u32) -> Self {
        Self { cue, wait_ms }
    }
}

/// Successive prefixes of `text`, one per character, ending with the whole
/// text.
pub fn typewriter(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.char_indices()
        .map(move |(at, ch)| &text[..at + ch.len_utf8()])
}

/// Boot log, then the pause before the authentication panel appears.
pub fn boot_script(config: &GreetingConfig) -> Vec<Step> {
    let mut steps: Vec<Step> = config
        .boot_lines
        .iter()
        .map(|line| {
            Step::new(
                Cue::Line {
                    text: line.text.clone(),
                    tag: line.tag,
                },
                line.delay_ms,
            )
        })
        .collect();
    if let Some(last) = steps.last_mut() {
        last.wait_ms += config.timings.boot_settle_ms;
    }
    steps.push(Step::new(Cue::Finish, 0));
    steps
}

/// Header lines, the body typed one character at a time, then the continue
/// button.
pub fn message_script(config: &GreetingConfig) -> Vec<Step> {
    let char_ms = config.timings.char_ms;
    let mut steps: Vec<Step> = config
        .header_lines
        .iter()
        .map(|line| {
            Step::new(
                Cue::Line {
                    text: line.text.clone(),
                    tag: line.tag,
                },
                line.delay_ms,
            )
        })
        .collect();
    steps.push(Step::new(Cue::OpenBody, 0));
    steps.extend(
        typewriter(&config.message).map(|prefix| Step::new(Cue::Type(prefix.to_owned()), char_ms)),
    );
    steps.push(Step::new(Cue::SealBody, config.timings.message_seal_ms));
    steps.push(Step::new(Cue::Finish, 0));
    steps
}

/// Total time a script takes to run.
pub fn duration_ms(steps: &[Step]) -> u64 {
    steps.iter().map(|s| u64::from(s.wait_ms)).sum()
}

/// Something revealed at a fixed offset after a scene starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    ExplanationLine(usize),
    Overlay,
}

/// Explanation lines one per `step_ms`, then the overlay `extra_ms` after
/// the last slot.
pub fn explanation_timeline(lines: usize, step_ms: u32, extra_ms: u32) -> Vec<(u32, Reveal)> {
    let mut timeline: Vec<(u32, Reveal)> = (0..lines)
        .map(|i| (step_ms.saturating_mul(i as u32), Reveal::ExplanationLine(i)))
        .collect();
    let overlay_at = step_ms
        .saturating_mul(lines as u32)
        .saturating_add(extra_ms);
    timeline.push((overlay_at, Reveal::Overlay));
    timeline
}

/// Offsets for putting out `count` flames one after another.
pub fn stagger(count: usize, step_ms: u32) -> impl Iterator<Item = (usize, u32)> {
    (0..count).map(move |i| (i, step_ms.saturating_mul(i as u32)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typewriter_emits_one_prefix_per_char() {
        let text = "Hi 🤍!";
        let states: Vec<&str> = typewriter(text).collect();
        assert_eq!(states.len(), text.chars().count());
        for pair in states.windows(2) {
            assert!(pair[1].starts_with(pair[0]));
            assert_eq!(pair[1].chars().count(), pair[0].chars().count() + 1);
        }
        assert_eq!(states.last().copied(), Some(text));
    }

    #[test]
    fn empty_text_types_nothing() {
        assert_eq!(typewriter("").count(), 0);
    }

    #[test]
    fn boot_script_settles_before_finishing() {
        let config = GreetingConfig::default();
        let steps = boot_script(&config);
        assert_eq!(steps.len(), config.boot_lines.len() + 1);
        assert_eq!(steps[7].wait_ms, 1000 + 500);
        assert_eq!(steps.last().unwrap().cue, Cue::Finish);
        assert_eq!(duration_ms(&steps), 5500 + 500);
    }

    #[test]
    fn message_script_finishes_last() {
        let config = GreetingConfig::default();
        let steps = message_script(&config);
        let finishes: Vec<usize> = steps
            .iter()
            .enumerate()
            .filter(|(_, s)| s.cue == Cue::Finish)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(finishes, vec![steps.len() - 1]);

        let typed: Vec<&Step> = steps.iter().filter(|s| matches!(s.cue, Cue::Type(_))).collect();
        assert_eq!(typed.len(), config.message.chars().count());
        assert!(typed.iter().all(|s| s.wait_ms == 40));
        assert_eq!(typed.last().unwrap().cue, Cue::Type(config.message.clone()));

        let open = steps.iter().position(|s| s.cue == Cue::OpenBody).unwrap();
        assert_eq!(open, config.header_lines.len());
    }

    #[test]
    fn overlay_follows_the_last_line() {
        let timeline = explanation_timeline(4, 800, 1000);
        assert_eq!(timeline[0], (0, Reveal::ExplanationLine(0)));
        assert_eq!(timeline[3], (2400, Reveal::ExplanationLine(3)));
        assert_eq!(timeline[4], (4200, Reveal::Overlay));
    }

    #[test]
    fn flames_go_out_in_order() {
        let offsets: Vec<(usize, u32)> = stagger(3, 200).collect();
        assert_eq!(offsets, vec![(0, 0), (1, 200), (2, 400)]);
    }
}
