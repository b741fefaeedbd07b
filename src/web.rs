//! Browser bindings
//!
//! The page owns the canvas and forwards input and frame times. Camera
//! acquisition happens here: `getUserMedia` is awaited on the JS event loop
//! and its answer is fed back through `Game::camera_resolved`, and frames are
//! read by drawing the hidden `<video>` into a `CAM_W x CAM_H` canvas.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, DomException, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

use crate::camera::{CameraError, CameraRequest, FrameSource};
use crate::consts::{CAM_H, CAM_W};
use crate::game::Game;
use crate::input::InputEvent;
use crate::settings::Settings;

/// `HTMLMediaElement.HAVE_CURRENT_DATA`
const HAVE_CURRENT_DATA: u16 = 2;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Fraction Line starting...");
}

/// Camera frames read from a live `MediaStream`
struct VideoFrames {
    stream: MediaStream,
    video: HtmlVideoElement,
    ctx: CanvasRenderingContext2d,
    pixels: Vec<u8>,
}

impl FrameSource for VideoFrames {
    fn frame_rgba(&mut self) -> Option<&[u8]> {
        if self.video.ready_state() < HAVE_CURRENT_DATA {
            return None;
        }
        let (w, h) = (CAM_W as f64, CAM_H as f64);
        self.ctx
            .draw_image_with_html_video_element_and_dw_and_dh(&self.video, 0.0, 0.0, w, h)
            .ok()?;
        let image = self.ctx.get_image_data(0.0, 0.0, w, h).ok()?;
        self.pixels = image.data().0;
        Some(&self.pixels)
    }

    fn stop(&mut self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
    }
}

/// DOMException name ("NotAllowedError", ...) or whatever text the error carries
fn js_error(err: JsValue) -> CameraError {
    let reason = err
        .dyn_ref::<DomException>()
        .map(|e| e.name())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "unknown error".to_string());
    CameraError::PermissionDenied(reason)
}

/// Ask for the user-facing camera and wire it to an offscreen canvas
async fn open_camera() -> Result<Box<dyn FrameSource>, CameraError> {
    let window = web_sys::window().ok_or(CameraError::Unsupported)?;
    let document = window.document().ok_or(CameraError::Unsupported)?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| CameraError::Unsupported)?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    constraints.set_audio(&JsValue::FALSE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(js_error)?;
    let stream: MediaStream = JsFuture::from(promise)
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    let video: HtmlVideoElement = document
        .create_element("video")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|el| js_error(el.into()))?;
    video.set_muted(true);
    let _ = video.set_attribute("playsinline", "");
    video.set_src_object(Some(&stream));
    JsFuture::from(video.play().map_err(js_error)?)
        .await
        .map_err(js_error)?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|el| js_error(el.into()))?;
    canvas.set_width(CAM_W as u32);
    canvas.set_height(CAM_H as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(js_error)?
        .ok_or(CameraError::Unsupported)?
        .dyn_into()
        .map_err(|ctx| js_error(ctx.into()))?;

    Ok(Box::new(VideoFrames {
        stream,
        video,
        ctx,
        pixels: Vec::new(),
    }))
}

#[wasm_bindgen]
pub struct WebGame {
    game: Rc<RefCell<Game>>,
}

impl WebGame {
    /// Open the camera in the background and answer `request` when done
    fn spawn_camera(&self, request: Option<CameraRequest>) {
        let Some(request) = request else {
            return;
        };
        let game = self.game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = open_camera().await;
            game.borrow_mut().camera_resolved(request, result);
        });
    }
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game from optional settings JSON
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<WebGame, JsValue> {
        let settings = match settings_json {
            Some(json) => {
                Settings::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => Settings::default(),
        };
        let seed = js_sys::Date::now() as u64;
        Ok(WebGame {
            game: Rc::new(RefCell::new(Game::new(settings, seed))),
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.game.borrow_mut().resize(width, height);
    }

    /// Frame callback; `dt` in seconds
    pub fn update(&mut self, dt: f64) {
        self.game.borrow_mut().update(dt);
    }

    pub fn advance_time(&mut self, ms: f64) {
        self.game.borrow_mut().advance_time(ms);
    }

    /// Keyboard key (`KeyboardEvent.key`)
    pub fn key(&mut self, key: &str) {
        let request = self.game.borrow_mut().handle_key(key);
        self.spawn_camera(request);
    }

    /// Pointer pressed or dragged at canvas x
    pub fn pointer(&mut self, x: f64) {
        self.game.borrow_mut().handle(InputEvent::PointerX(x));
    }

    pub fn submit(&mut self) {
        self.game.borrow_mut().handle(InputEvent::Submit);
    }

    pub fn start_campaign(&mut self) {
        self.game.borrow_mut().handle(InputEvent::StartCampaign);
    }

    /// Start from a level (0-based)
    pub fn start_from_level(&mut self, index: usize) {
        self.game
            .borrow_mut()
            .handle(InputEvent::StartFromLevel(index));
    }

    pub fn next_level(&mut self) {
        self.game.borrow_mut().handle(InputEvent::Continue);
    }

    pub fn return_to_menu(&mut self) {
        self.game.borrow_mut().handle(InputEvent::ReturnToMenu);
    }

    pub fn toggle_camera(&mut self) {
        let request = self.game.borrow_mut().toggle_camera();
        self.spawn_camera(request);
    }

    /// Release the camera (page hidden or unloading)
    pub fn stop_camera(&mut self) {
        self.game.borrow_mut().stop_camera();
    }

    /// Snapshot as a JSON string
    pub fn render_game_to_text(&self) -> String {
        self.game.borrow().snapshot_json()
    }

    /// Snapshot as a JS object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        js_sys::JSON::parse(&self.game.borrow().snapshot_json())
    }
}
