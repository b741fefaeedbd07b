//! Game driver
//!
//! Owns the session, the motion tracker, the camera link and the line
//! geometry. Hosts feed it input events, frame deltas and camera answers;
//! everything else happens inside the fixed-step loop.

use crate::camera::{CameraError, CameraLink, CameraRequest, FrameSource};
use crate::consts::*;
use crate::input::{InputEvent, key_to_event};
use crate::motion::{MotionTracker, Sample};
use crate::settings::Settings;
use crate::sim::{FeedbackKind, GameState, InputMode, LineGeometry, SubmitOutcome, tick};
use crate::snapshot::Snapshot;

/// One running game session
pub struct Game {
    state: GameState,
    tracker: MotionTracker,
    camera: CameraLink,
    line: LineGeometry,
    settings: Settings,
    accumulator: f64,
    /// Last camera ticket handed out
    last_ticket: u64,
}

impl Game {
    /// Create a game on the menu. A seed in the settings overrides `seed`.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(seed);
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state: GameState::new(seed),
            tracker: MotionTracker::new(settings.motion),
            camera: CameraLink::Off,
            line: LineGeometry::from_canvas(settings.canvas_width, settings.canvas_height),
            settings,
            accumulator: 0.0,
            last_ticket: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tracker(&self) -> &MotionTracker {
        &self.tracker
    }

    pub fn camera(&self) -> &CameraLink {
        &self.camera
    }

    pub fn line(&self) -> &LineGeometry {
        &self.line
    }

    /// Canvas resized by the host
    pub fn resize(&mut self, width: f64, height: f64) {
        self.line = LineGeometry::from_canvas(width, height);
    }

    /// Apply one input event. Returns a camera request when the host has to
    /// open a camera and answer through [`Game::camera_resolved`].
    pub fn handle(&mut self, event: InputEvent) -> Option<CameraRequest> {
        let camera_drives_marker = self.state.input_mode == InputMode::Camera;
        match event {
            InputEvent::PointerX(x) => {
                if !camera_drives_marker {
                    self.state.set_marker_from_x(x, &self.line);
                }
            }
            InputEvent::Nudge(steps) => {
                if !camera_drives_marker {
                    self.state
                        .nudge_marker(steps, self.settings.keyboard_steps_per_span);
                }
            }
            InputEvent::Submit => {
                self.state.submit();
            }
            InputEvent::StartCampaign => self.state.start_campaign(),
            InputEvent::StartFromLevel(index) => self.state.start_campaign_from(index),
            InputEvent::Continue => self.state.continue_campaign(),
            InputEvent::ReturnToMenu => self.state.return_to_menu(),
            InputEvent::ToggleCamera => return self.toggle_camera(),
        }
        None
    }

    /// Map a keyboard key through the current mode and apply it
    pub fn handle_key(&mut self, key: &str) -> Option<CameraRequest> {
        let event = key_to_event(key, self.state.mode)?;
        self.handle(event)
    }

    /// Run simulation ticks for a frame of `dt` seconds
    pub fn update(&mut self, dt: f64) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Deterministic time advance for automated hosts: whole 1/60 s steps,
    /// at least one
    pub fn advance_time(&mut self, ms: f64) {
        let frame_ms = 1000.0 / 60.0;
        let steps = (ms / frame_ms).round().max(1.0) as u64;
        for _ in 0..steps {
            self.step(SIM_DT);
        }
    }

    fn step(&mut self, dt: f64) {
        self.process_camera(dt);
        let report = tick(&mut self.state, dt);
        if report.timed_out {
            log::debug!("Question timed out, {} lives left", self.state.lives);
        }
    }

    /// Sample the camera on its own cadence and let it steer the marker
    fn process_camera(&mut self, dt: f64) {
        if !self.tracker.sample_due(dt) {
            return;
        }
        let CameraLink::Active(source) = &mut self.camera else {
            return;
        };
        let Some(frame) = source.frame_rgba() else {
            return;
        };

        match self.tracker.sample(frame) {
            Ok(Sample::Motion { .. }) => self.follow_camera_pointer(),
            Ok(Sample::Baseline | Sample::Idle { .. }) => {}
            Err(err) => log::warn!("Dropping camera frame: {}", err),
        }
    }

    fn follow_camera_pointer(&mut self) {
        if !self.state.is_playing() || self.state.input_mode != InputMode::Camera {
            return;
        }
        let x = self.line.ratio_to_x(self.tracker.mirrored_x());
        self.state.set_marker_from_x(x, &self.line);

        if self.tracker.update_dwell() {
            log::debug!("Camera dwell confirmed at {:.4}", self.state.marker_value);
            if let SubmitOutcome::Incorrect { lives_left: 0, .. } = self.state.submit() {
                log::info!("Run ended by camera submission");
            }
        }
    }

    /// Switch between pointer and camera input
    ///
    /// Turning camera input off leaves the stream running so it can come back
    /// without another permission prompt. A second toggle while a request is
    /// in flight cancels it.
    pub fn toggle_camera(&mut self) -> Option<CameraRequest> {
        if self.state.input_mode == InputMode::Camera {
            self.state.input_mode = InputMode::Pointer;
            self.state
                .set_feedback("Camera pointer off.", FeedbackKind::Info, 1.2);
            log::info!("Input mode: pointer");
            return None;
        }

        match self.camera {
            CameraLink::Active(_) => {
                self.enter_camera_mode();
                None
            }
            CameraLink::Pending(request) => {
                log::info!("Camera request {} cancelled", request.0);
                self.camera = CameraLink::Off;
                None
            }
            CameraLink::Off => {
                self.last_ticket += 1;
                let request = CameraRequest(self.last_ticket);
                self.camera = CameraLink::Pending(request);
                log::info!("Camera requested (ticket {})", request.0);
                Some(request)
            }
        }
    }

    /// Host answer to a camera request
    pub fn camera_resolved(
        &mut self,
        request: CameraRequest,
        result: Result<Box<dyn FrameSource>, CameraError>,
    ) {
        let expected = match self.camera {
            CameraLink::Pending(pending) => pending == request,
            _ => false,
        };
        if !expected {
            log::warn!("Ignoring stale camera answer (ticket {})", request.0);
            if let Ok(mut source) = result {
                source.stop();
            }
            return;
        }

        match result {
            Ok(source) => {
                self.camera = CameraLink::Active(source);
                self.tracker.activate();
                log::info!("Camera stream active");
                self.enter_camera_mode();
            }
            Err(err) => {
                self.camera = CameraLink::Off;
                log::warn!("Camera unavailable: {}", err);
                let (text, ttl) = match err {
                    CameraError::Unsupported => ("This browser has no camera API.", 2.2),
                    _ => ("Camera could not be opened. Allow access and try again.", 2.6),
                };
                self.state.set_feedback(text, FeedbackKind::Warning, ttl);
            }
        }
    }

    /// Stop the stream, cancel pending requests and fall back to pointer input
    pub fn stop_camera(&mut self) {
        self.camera.shutdown();
        self.tracker.deactivate();
        if self.state.input_mode == InputMode::Camera {
            self.state.input_mode = InputMode::Pointer;
        }
        log::info!("Camera stopped");
    }

    fn enter_camera_mode(&mut self) {
        self.state.input_mode = InputMode::Camera;
        self.state.set_feedback(
            "Camera pointer on. Move your hand, hold still to lock in.",
            FeedbackKind::Info,
            2.4,
        );
        log::info!("Input mode: camera");
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, &self.line, &self.tracker, &self.camera)
    }

    pub fn snapshot_json(&self) -> String {
        self.snapshot().to_json()
    }
}
