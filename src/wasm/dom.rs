use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlAudioElement, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
    HtmlImageElement, HtmlInputElement, HtmlVideoElement, Window,
};

use crate::error::{GreetingError, GreetingResult};
use crate::media::SoundCue;
use crate::scene::Scene;

pub const FADE_IN_UP: &str = "fadeInUp 0.5s ease-out forwards";

impl From<GreetingError> for JsValue {
    fn from(err: GreetingError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort text for a thrown JS value.
pub fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(exception) = value.dyn_ref::<web_sys::DomException>() {
        return format!("{}: {}", exception.name(), exception.message());
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

pub fn js(value: JsValue) -> GreetingError {
    GreetingError::dom(describe(&value))
}

pub fn window() -> GreetingResult<Window> {
    web_sys::window().ok_or_else(|| GreetingError::dom("no window"))
}

pub fn document() -> GreetingResult<Document> {
    window()?
        .document()
        .ok_or_else(|| GreetingError::dom("no document"))
}

pub fn by_id<T: JsCast>(document: &Document, id: &str) -> GreetingResult<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| GreetingError::missing(id))?
        .dyn_into::<T>()
        .map_err(|_| GreetingError::dom(format!("#{id} is not the expected element type")))
}

pub fn all(document: &Document, selector: &str) -> GreetingResult<Vec<Element>> {
    let list = document.query_selector_all(selector).map_err(js)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn add_class(el: &Element, class: &str) -> GreetingResult<()> {
    el.class_list().add_1(class).map_err(js)
}

pub fn remove_class(el: &Element, class: &str) -> GreetingResult<()> {
    el.class_list().remove_1(class).map_err(js)
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) -> GreetingResult<()> {
    el.style().set_property(property, value).map_err(js)
}

/// Un-hides an element with the fade-in-up entrance.
pub fn reveal(el: &HtmlElement) -> GreetingResult<()> {
    remove_class(el, "hidden")?;
    set_style(el, "animation", FADE_IN_UP)
}

/// Appends a `<div>` with `class` and `text`, keeping the log scrolled to
/// the bottom.
pub fn append_line(
    document: &Document,
    container: &HtmlElement,
    class: &str,
    text: &str,
) -> GreetingResult<HtmlElement> {
    let line: HtmlElement = document
        .create_element("div")
        .map_err(js)?
        .dyn_into()
        .map_err(|_| GreetingError::dom("div is not an HtmlElement"))?;
    line.set_class_name(class);
    line.set_text_content(Some(text));
    container.append_child(&line).map_err(js)?;
    container.set_scroll_top(container.scroll_height());
    Ok(line)
}

/// Looks up an element the page may leave out. Absence (or the wrong
/// element type) only costs that element's effect.
pub fn optional<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    match by_id(document, id) {
        Ok(el) => Some(el),
        Err(err) => {
            log::warn!("{err}, its effect is skipped");
            None
        }
    }
}

/// Every element the experience drives, looked up once at start.
///
/// Scene sections, logs and the buttons that move the story are required;
/// canvases, audio tracks and the sound toggle are optional.
pub struct Elements {
    pub document: Document,
    pub scenes: Vec<HtmlElement>,
    pub particles: Option<HtmlCanvasElement>,
    pub boot_log: HtmlElement,
    pub auth_section: HtmlElement,
    pub camera: HtmlVideoElement,
    pub uploaded_photo: HtmlImageElement,
    pub camera_btn: HtmlButtonElement,
    pub upload_btn: HtmlButtonElement,
    pub file_input: HtmlInputElement,
    pub auth_result: HtmlElement,
    pub scan_line: Option<Element>,
    pub continue_journey: HtmlButtonElement,
    pub message_log: HtmlElement,
    pub continue_to_heart: HtmlButtonElement,
    pub heart_canvas: Option<HtmlCanvasElement>,
    pub h_display: Option<HtmlElement>,
    pub explanation_lines: Vec<Element>,
    pub emotional_overlay: Option<Element>,
    pub continue_to_wish: HtmlButtonElement,
    pub blow_btn: HtmlButtonElement,
    pub flames: Vec<Element>,
    pub blow_particles: Option<HtmlCanvasElement>,
    pub queen_photo: HtmlImageElement,
    pub confetti: Option<HtmlCanvasElement>,
    pub bg_music: Option<HtmlAudioElement>,
    pub blow_sound: Option<HtmlAudioElement>,
    pub celebration_sound: Option<HtmlAudioElement>,
    pub sound_toggle: Option<HtmlButtonElement>,
    pub photo_canvas: Option<HtmlCanvasElement>,
}

impl Elements {
    pub fn collect(document: Document) -> GreetingResult<Self> {
        let d = &document;
        let scenes = Scene::ALL
            .iter()
            .map(|scene| by_id::<HtmlElement>(d, &scene.element_id()))
            .collect::<GreetingResult<Vec<_>>>()?;
        Ok(Self {
            scenes,
            particles: optional(d, "particles"),
            boot_log: by_id(d, "boot-log")?,
            auth_section: by_id(d, "auth-section")?,
            camera: by_id(d, "camera")?,
            uploaded_photo: by_id(d, "uploaded-photo")?,
            camera_btn: by_id(d, "camera-btn")?,
            upload_btn: by_id(d, "upload-btn")?,
            file_input: by_id(d, "file-input")?,
            auth_result: by_id(d, "auth-result")?,
            scan_line: d.query_selector(".scan-line").map_err(js)?,
            continue_journey: by_id(d, "continue-journey")?,
            message_log: by_id(d, "message-log")?,
            continue_to_heart: by_id(d, "continue-to-heart")?,
            heart_canvas: optional(d, "heart-canvas"),
            h_display: optional(d, "h-display"),
            explanation_lines: all(d, ".explanation-line")?,
            emotional_overlay: d.get_element_by_id("emotional-overlay"),
            continue_to_wish: by_id(d, "continue-to-wish")?,
            blow_btn: by_id(d, "blow-btn")?,
            flames: all(d, ".flame")?,
            blow_particles: optional(d, "blow-particles"),
            queen_photo: by_id(d, "queen-photo")?,
            confetti: optional(d, "confetti"),
            bg_music: optional(d, "bg-music"),
            blow_sound: optional(d, SoundCue::Blow.element_id()),
            celebration_sound: optional(d, SoundCue::Celebration.element_id()),
            sound_toggle: optional(d, "sound-toggle"),
            photo_canvas: optional(d, "photo-canvas"),
            document,
        })
    }

    pub fn scene(&self, scene: Scene) -> &HtmlElement {
        &self.scenes[scene.index()]
    }

    pub fn sound(&self, cue: SoundCue) -> Option<&HtmlAudioElement> {
        match cue {
            SoundCue::Blow => self.blow_sound.as_ref(),
            SoundCue::AuthSuccess | SoundCue::Celebration => self.celebration_sound.as_ref(),
        }
    }
}
