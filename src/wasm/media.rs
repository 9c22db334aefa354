use js_sys::{Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    HtmlAudioElement, HtmlCanvasElement, HtmlMediaElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

use super::dom::{describe, js, window};
use super::render::context_2d;
use crate::error::{GreetingError, GreetingResult};
use crate::media::SNAPSHOT_FALLBACK_SIDE;

/// Asks for the front camera. Any refusal or missing device comes back as
/// [`GreetingError::CameraDenied`].
pub async fn open_camera() -> GreetingResult<MediaStream> {
    let devices = window()?
        .navigator()
        .media_devices()
        .map_err(|e| GreetingError::camera(describe(&e)))?;

    let video = Object::new();
    Reflect::set(&video, &"facingMode".into(), &"user".into()).map_err(js)?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| GreetingError::camera(describe(&e)))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| GreetingError::camera(describe(&e)))?
        .dyn_into::<MediaStream>()
        .map_err(|_| GreetingError::camera("getUserMedia did not return a stream"))
}

/// Draws the current video frame and encodes it as a JPEG data URL.
pub fn snapshot(video: &HtmlVideoElement, canvas: &HtmlCanvasElement) -> GreetingResult<String> {
    let side = |reported: u32| {
        if reported == 0 {
            SNAPSHOT_FALLBACK_SIDE
        } else {
            reported
        }
    };
    let (width, height) = (side(video.video_width()), side(video.video_height()));
    canvas.set_width(width);
    canvas.set_height(height);
    context_2d(canvas)?
        .draw_image_with_html_video_element_and_dw_and_dh(
            video,
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        )
        .map_err(js)?;
    canvas.to_data_url_with_type("image/jpeg").map_err(js)
}

/// Stops every track so the camera light goes off.
pub fn release(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
    log::debug!("camera stream released");
}

pub async fn read_upload(file: web_sys::File) -> GreetingResult<String> {
    let file = gloo::file::File::from(file);
    log::info!("reading upload {} ({} bytes)", file.name(), file.size());
    gloo::file::futures::read_as_data_url(&file)
        .await
        .map_err(|e| GreetingError::dom(e.to_string()))
}

fn start_playback(media: &HtmlMediaElement, what: &'static str) {
    let promise = match media.play() {
        Ok(promise) => promise,
        Err(err) => {
            log::debug!("{what} playback refused: {}", describe(&err));
            return;
        }
    };
    spawn_local(async move {
        // autoplay policy rejections are expected until the first gesture
        if let Err(err) = JsFuture::from(promise).await {
            log::debug!("{what} playback blocked: {}", describe(&err));
        }
    });
}

/// Rewinds and plays a one-shot effect.
pub fn play(audio: &HtmlAudioElement, volume: f64) {
    audio.set_current_time(0.0);
    audio.set_volume(volume);
    start_playback(audio, "effect");
}

pub fn resume_music(music: &HtmlAudioElement, volume: f64) {
    music.set_volume(volume);
    start_playback(music, "music");
}

pub fn pause_music(music: &HtmlAudioElement) {
    if let Err(err) = music.pause() {
        log::debug!("music pause failed: {}", describe(&err));
    }
}

/// Clears an element's `srcObject`.
pub fn detach(video: &HtmlVideoElement) {
    video.set_src_object(None);
}

pub fn attach(video: &HtmlVideoElement, stream: &MediaStream) {
    video.set_src_object(Some(stream));
}
