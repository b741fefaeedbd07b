//! Frame-differencing camera pointer
//!
//! Each sample converts an RGBA frame to luma, diffs it against the previous
//! sample and takes the intensity-weighted centroid of the changed pixels.
//! The centroid is smoothed into a normalized pointer; holding the pointer
//! still for long enough confirms a submission. No trained model is
//! involved, only whole-frame differencing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::CameraError;
use crate::consts::{CAM_H, CAM_W};

/// Tracker thresholds and timings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Seconds between camera samples
    pub sample_interval: f64,
    /// Per-pixel luma difference below which a change counts as noise
    pub noise_floor: u8,
    /// Summed difference needed to treat a sample as motion
    pub activity_threshold: u64,
    /// Rows below this fraction of the frame height are ignored
    pub bottom_margin: f32,
    /// Exponential smoothing factor toward the observed centroid
    pub smoothing: f32,
    /// Pointer x drift still considered "holding still"
    pub dwell_epsilon: f32,
    /// Seconds of holding still that confirm a submission
    pub dwell_confirm: f64,
    /// Seconds after a confirmed submission before another may fire
    pub submit_cooldown: f64,
    /// Motion magnitude decay per idle sample
    pub motion_decay: f32,
    /// Dwell decay per idle sample (seconds)
    pub dwell_decay: f64,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            sample_interval: 0.07,
            noise_floor: 25,
            activity_threshold: 17_000,
            bottom_margin: 0.92,
            smoothing: 0.35,
            dwell_epsilon: 0.012,
            dwell_confirm: 1.1,
            submit_cooldown: 1.4,
            motion_decay: 0.85,
            dwell_decay: 0.05,
        }
    }
}

/// Outcome of one camera sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// First frame after activation, stored as the diff baseline
    Baseline,
    /// Enough motion: pointer moved toward `centroid`
    Motion { centroid: Vec2, energy: u64 },
    /// Not enough motion: counters decayed
    Idle { energy: u64 },
}

/// Camera motion tracker state
#[derive(Debug, Clone)]
pub struct MotionTracker {
    tuning: MotionTuning,
    /// Grayscale frames; `prev` indexes the previous one, the other is scratch
    buffers: [Box<[u8]>; 2],
    prev: usize,
    baseline_ready: bool,
    active: bool,
    /// Smoothed pointer in normalized image space
    pub pointer: Vec2,
    /// Pointer x the dwell timer is measured against
    pub last_stable_x: f32,
    /// Seconds the pointer has held still
    pub dwell: f64,
    /// Seconds until another dwell submission is allowed
    pub cooldown: f64,
    /// Raw motion energy of the last active sample (decays when idle)
    pub last_motion: f32,
    /// Time banked toward the next sample
    sample_accumulator: f64,
}

impl MotionTracker {
    pub fn new(tuning: MotionTuning) -> Self {
        Self {
            tuning,
            buffers: [
                vec![0u8; CAM_W * CAM_H].into_boxed_slice(),
                vec![0u8; CAM_W * CAM_H].into_boxed_slice(),
            ],
            prev: 0,
            baseline_ready: false,
            active: false,
            pointer: Vec2::splat(0.5),
            last_stable_x: 0.5,
            dwell: 0.0,
            cooldown: 0.0,
            last_motion: 0.0,
            sample_accumulator: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start tracking from scratch (camera (re)activated)
    pub fn activate(&mut self) {
        self.active = true;
        self.baseline_ready = false;
        self.pointer = Vec2::splat(0.5);
        self.last_stable_x = 0.5;
        self.dwell = 0.0;
        self.cooldown = 0.0;
        self.last_motion = 0.0;
        self.sample_accumulator = 0.0;
    }

    /// Stop tracking; buffers are kept for the next activation
    pub fn deactivate(&mut self) {
        self.active = false;
        self.baseline_ready = false;
        self.last_motion = 0.0;
        self.dwell = 0.0;
    }

    /// Bank `dt` seconds and report whether a sample is due
    pub fn sample_due(&mut self, dt: f64) -> bool {
        if !self.active {
            return false;
        }
        self.sample_accumulator += dt;
        if self.sample_accumulator < self.tuning.sample_interval {
            return false;
        }
        self.sample_accumulator = 0.0;
        true
    }

    /// Process one RGBA frame of `CAM_W x CAM_H` pixels
    pub fn sample(&mut self, rgba: &[u8]) -> Result<Sample, CameraError> {
        let expected = CAM_W * CAM_H * 4;
        if rgba.len() != expected {
            return Err(CameraError::FrameSize {
                expected,
                actual: rgba.len(),
            });
        }

        if !self.baseline_ready {
            write_luma(rgba, &mut self.buffers[self.prev]);
            self.baseline_ready = true;
            return Ok(Sample::Baseline);
        }

        let noise_floor = self.tuning.noise_floor as i16;
        let max_row = CAM_H as f32 * self.tuning.bottom_margin;
        let mut energy: u64 = 0;
        let mut x_sum: f64 = 0.0;
        let mut y_sum: f64 = 0.0;

        let [first, second] = &mut self.buffers;
        let (prev, curr) = if self.prev == 0 {
            (&**first, &mut **second)
        } else {
            (&**second, &mut **first)
        };
        write_luma(rgba, curr);

        for (i, (&now, &before)) in curr.iter().zip(prev.iter()).enumerate() {
            let diff = (now as i16 - before as i16).abs();
            if diff < noise_floor {
                continue;
            }
            let x = i % CAM_W;
            let y = i / CAM_W;
            if y as f32 > max_row {
                continue;
            }
            let diff = diff as u64;
            energy += diff;
            x_sum += (x as u64 * diff) as f64;
            y_sum += (y as u64 * diff) as f64;
        }

        // The frame just written becomes the previous one
        self.prev = 1 - self.prev;

        if energy > self.tuning.activity_threshold {
            let centroid = Vec2::new(
                (x_sum / energy as f64 / CAM_W as f64) as f32,
                (y_sum / energy as f64 / CAM_H as f64) as f32,
            );
            self.pointer = self.pointer.lerp(centroid, self.tuning.smoothing);
            self.last_motion = energy as f32;
            Ok(Sample::Motion { centroid, energy })
        } else {
            self.last_motion = (self.last_motion * self.tuning.motion_decay).max(0.0);
            self.dwell = (self.dwell - self.tuning.dwell_decay).max(0.0);
            self.cooldown = (self.cooldown - self.tuning.sample_interval).max(0.0);
            Ok(Sample::Idle { energy })
        }
    }

    /// Pointer x mirrored so moving right in front of the camera moves right on screen
    pub fn mirrored_x(&self) -> f64 {
        (1.0 - self.pointer.x).clamp(0.0, 1.0) as f64
    }

    /// Advance dwell detection after a motion sample while the camera drives
    /// the marker. Returns true when a submission should fire.
    pub fn update_dwell(&mut self) -> bool {
        let step = self.tuning.sample_interval;
        if (self.pointer.x - self.last_stable_x).abs() < self.tuning.dwell_epsilon {
            self.dwell += step;
        } else {
            self.dwell = 0.0;
            self.last_stable_x = self.pointer.x;
        }

        self.cooldown = (self.cooldown - step).max(0.0);
        if self.dwell > self.tuning.dwell_confirm && self.cooldown <= 0.0 {
            self.dwell = 0.0;
            self.cooldown = self.tuning.submit_cooldown;
            return true;
        }
        false
    }
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self::new(MotionTuning::default())
    }
}

/// RGBA to rounded Rec. 601 luma
fn write_luma(rgba: &[u8], out: &mut [u8]) {
    for (px, gray) in rgba.chunks_exact(4).zip(out.iter_mut()) {
        let luma = px[0] as f32 * 0.299 + px[1] as f32 * 0.587 + px[2] as f32 * 0.114;
        *gray = luma.round().clamp(0.0, 255.0) as u8;
    }
}
