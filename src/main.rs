//! Fraction Line entry point
//!
//! Native builds play a scripted campaign headlessly and print one snapshot
//! JSON line per step. The browser build starts from `web::start`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use fraction_line::camera::ScriptedFrames;
    use fraction_line::consts::{CAM_H, CAM_W};
    use fraction_line::sim::GameMode;
    use fraction_line::{Game, InputEvent, Settings};

    /// Levels answered with the pointer; the rest use the synthetic camera
    const POINTER_LEVELS: usize = 5;
    /// Think time before each pointer answer
    const THINK_MS: f64 = 400.0;
    /// Time the camera (or a wait for a scrolling target) gets per question
    const CAMERA_BUDGET_MS: f64 = 4000.0;
    const CAMERA_STEP_MS: f64 = 100.0;
    /// Half size of the synthetic hand blob (camera pixels)
    const BLOB: usize = 10;
    /// Upper bound on script steps
    const MAX_STEPS: usize = 200;

    pub fn run() {
        env_logger::init();
        log::info!("Fraction Line (native) starting...");

        let settings = load_settings();
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let mut game = Game::new(settings, seed);

        game.handle(InputEvent::StartCampaign);
        print_snapshot(&game);

        for _ in 0..MAX_STEPS {
            match game.state().mode {
                GameMode::Playing => {
                    let level = game.state().level_index.unwrap_or_default();
                    if level < POINTER_LEVELS {
                        answer_with_pointer(&mut game);
                    } else {
                        answer_with_camera(&mut game);
                    }
                }
                GameMode::LevelClear => {
                    game.handle(InputEvent::Continue);
                }
                GameMode::Menu | GameMode::GameComplete => break,
            }
            print_snapshot(&game);
        }

        game.stop_camera();
        log::info!(
            "Demo finished: {} with score {}",
            game.state().mode.as_str(),
            game.state().score
        );
    }

    fn load_settings() -> Settings {
        let Some(path) = std::env::args().nth(1) else {
            return Settings::default();
        };
        match Settings::load_from(Path::new(&path)) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Settings::default()
            }
        }
    }

    fn print_snapshot(game: &Game) {
        println!("{}", game.snapshot_json());
    }

    /// Point straight at the target on the drawn line and submit
    fn answer_with_pointer(game: &mut Game) {
        game.advance_time(THINK_MS);
        let Some(target) = game.state().current_question().map(|q| q.value) else {
            return;
        };
        // A sliding line can carry the target off screen for a while
        let mut waited = 0.0;
        while !game.state().visible_range().contains(target) && waited < CAMERA_BUDGET_MS {
            game.advance_time(CAMERA_STEP_MS);
            waited += CAMERA_STEP_MS;
        }
        let x = game.line().value_to_x(target, game.state().visible_range());
        game.handle(InputEvent::PointerX(x));
        game.handle(InputEvent::Submit);
    }

    /// Hold a synthetic hand over the target and let dwell confirm it
    fn answer_with_camera(game: &mut Game) {
        let Some(target) = game.state().current_question().map(|q| q.value) else {
            return;
        };
        let visible = game.state().visible_range();
        let ratio = ((target - visible.min) / visible.span()).clamp(0.0, 1.0);

        game.stop_camera();
        if let Some(request) = game.toggle_camera() {
            let frames = ScriptedFrames::new(synthetic_frames(ratio));
            game.camera_resolved(request, Ok(Box::new(frames)));
        }

        let question = game.state().question_index;
        let mut waited = 0.0;
        while waited < CAMERA_BUDGET_MS
            && game.state().mode == GameMode::Playing
            && game.state().question_index == question
        {
            game.advance_time(CAMERA_STEP_MS);
            waited += CAMERA_STEP_MS;
        }
    }

    /// Blank frame and a frame with a bright blob at line position `ratio`
    fn synthetic_frames(ratio: f64) -> Vec<Vec<u8>> {
        let blank = vec![40u8; CAM_W * CAM_H * 4];
        // The tracker mirrors x, so the blob goes on the opposite side
        let cx = ((1.0 - ratio) * CAM_W as f64).round() as usize;
        let cx = cx.clamp(BLOB, CAM_W - BLOB);
        let cy = CAM_H / 2;

        let mut blob = blank.clone();
        for y in cy - BLOB..cy + BLOB {
            for x in cx - BLOB..cx + BLOB {
                let p = (y * CAM_W + x) * 4;
                blob[p..p + 3].fill(230);
            }
        }
        vec![blank, blob]
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
