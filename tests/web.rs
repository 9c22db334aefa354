#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use greeting_wasm::animation::HeartAnimation;
use greeting_wasm::curve::HeartVariant;
use greeting_wasm::media::SoundCue;
use greeting_wasm::scene::Scene;
use greeting_wasm::wasm::dom;
use greeting_wasm::wasm::frames::FrameLoop;
use greeting_wasm::wasm::render::{self, Surface};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(width: u32, height: u32) -> web_sys::HtmlCanvasElement {
    let document = dom::document().unwrap();
    let canvas: web_sys::HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    dom::set_style(&canvas, "width", &format!("{width}px")).unwrap();
    dom::set_style(&canvas, "height", &format!("{height}px")).unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn layout_fit_scales_the_backing_store() {
    let canvas = canvas(200, 100);
    let surface = Surface::fit_layout(&canvas, 2.0).unwrap();
    assert_eq!(surface.view.width, 200.0);
    assert_eq!((canvas.width(), canvas.height()), (400, 200));
}

#[wasm_bindgen_test]
fn heart_frames_draw_for_both_variants() {
    let canvas = canvas(320, 240);
    let surface = Surface::fit_layout(&canvas, 1.0).unwrap();
    for variant in [HeartVariant::Implicit, HeartVariant::Parametric] {
        let mut heart = HeartAnimation::new(variant, 11);
        for _ in 0..3 {
            let frame = heart.frame(&surface.view).unwrap();
            render::draw_heart(&surface.ctx, &surface.view, &frame).unwrap();
        }
    }
}

#[wasm_bindgen_test]
fn missing_element_is_reported_by_id() {
    let document = dom::document().unwrap();
    let err = dom::by_id::<web_sys::HtmlElement>(&document, "no-such-scene").unwrap_err();
    assert_eq!(err.to_string(), "missing element #no-such-scene");
}

/// The story's scenes and buttons, without audio, canvases or the toggle.
const BARE_PAGE: &str = r#"
    <section id="scene-0"><div id="boot-log"></div>
        <div id="auth-section"><video id="camera"></video><img id="uploaded-photo" />
            <button id="camera-btn"></button><button id="upload-btn"></button>
            <input type="file" id="file-input" /><div id="auth-result"></div></div></section>
    <section id="scene-1"><button id="continue-journey"></button></section>
    <section id="scene-2"><div id="message-log"></div><button id="continue-to-heart"></button></section>
    <section id="scene-3"><button id="continue-to-wish"></button></section>
    <section id="scene-4"><button id="blow-btn"></button></section>
    <section id="scene-5"><img id="queen-photo" /></section>
"#;

#[wasm_bindgen_test]
fn page_without_audio_still_collects() {
    let document = dom::document().unwrap();
    let page = document.create_element("div").unwrap();
    page.set_inner_html(BARE_PAGE);
    document.body().unwrap().append_child(&page).unwrap();

    let elements = dom::Elements::collect(document).unwrap();
    assert_eq!(elements.scenes.len(), Scene::ALL.len());
    assert!(elements.bg_music.is_none());
    assert!(elements.sound(SoundCue::Blow).is_none());
    assert!(elements.sound(SoundCue::Celebration).is_none());
    assert!(elements.sound_toggle.is_none());
    assert!(elements.heart_canvas.is_none());
    assert!(elements.photo_canvas.is_none());
    assert!(elements.flames.is_empty());

    page.remove();
}

#[wasm_bindgen_test(async)]
async fn dropping_a_frame_loop_stops_ticks() {
    let ticks = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&ticks);
    let frames = FrameLoop::start(move |_| counter.set(counter.get() + 1));
    TimeoutFuture::new(100).await;
    assert!(frames.is_running());
    assert!(ticks.get() > 0);

    drop(frames);
    let stopped_at = ticks.get();
    TimeoutFuture::new(100).await;
    assert_eq!(ticks.get(), stopped_at);
}
