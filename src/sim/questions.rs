//! Procedural question generation
//!
//! Each [`LevelKind`] has a generator producing one candidate question for a
//! range. [`build_questions`] collects unique in-range candidates with a
//! bounded retry budget and falls back to uniform random targets so a level
//! build never stalls.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::level::{Level, LevelKind, NumberRange};
use crate::fraction::{simplify_fraction, to_fraction_label, to_mixed_label};

/// Generator attempts before falling back to random targets
pub const MAX_GENERATOR_ATTEMPTS: u32 = 240;

/// Largest denominator used when labeling arbitrary values
const LABEL_MAX_DEN: i64 = 12;
/// Largest denominator used when labeling fallback targets
const FALLBACK_LABEL_MAX_DEN: i64 = 10;

/// Chance a mixed-number question shows mixed text instead of improper text
const MIXED_TEXT_CHANCE: f64 = 0.55;
/// Chance a camera boss question shows a mixed label
const BOSS_MIXED_TEXT_CHANCE: f64 = 0.45;

/// A target to place on the line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Exact target value (authoritative for scoring)
    pub value: f64,
    /// Display text
    pub label: String,
    /// Hint text
    pub tip: String,
}

impl Question {
    fn new(value: f64, label: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            tip: tip.into(),
        }
    }
}

/// Uniqueness key at 4-decimal resolution
fn value_key(value: f64) -> i64 {
    (value * 10_000.0).round() as i64
}

/// Inclusive random integer; collapses to `min` on an empty interval
fn rand_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
        min
    } else {
        rng.random_range(min..=max)
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, list: &[i64]) -> i64 {
    list[rng.random_range(0..list.len())]
}

/// Numerator bounds such that `num / den` stays inside `range`
fn numerator_bounds(range: NumberRange, den: i64) -> (i64, i64) {
    let min_num = (range.min * den as f64).ceil() as i64;
    let max_num = (range.max * den as f64).floor() as i64;
    (min_num, max_num)
}

/// Fixed warm-up facts
fn warmup_pool() -> Vec<Question> {
    vec![
        Question::new(1.0 / 2.0, "1/2", "Find the midpoint"),
        Question::new(1.0 / 4.0, "1/4", "First quarter"),
        Question::new(3.0 / 4.0, "3/4", "Third quarter"),
        Question::new(1.0 / 8.0, "1/8", "One eighth"),
        Question::new(7.0 / 8.0, "7/8", "Close to the end"),
        Question::new(3.0 / 8.0, "3/8", "Three eighths"),
    ]
}

fn basic_question<R: Rng + ?Sized>(rng: &mut R) -> Question {
    let den = pick(rng, &[2, 4, 8]);
    let num = rand_int(rng, 1, den - 1);
    Question::new(
        num as f64 / den as f64,
        format!("{num}/{den}"),
        "Basic fraction hunter",
    )
}

fn equivalent_question<R: Rng + ?Sized>(rng: &mut R) -> Question {
    let den = pick(rng, &[2, 3, 4, 5, 6]);
    let num = rand_int(rng, 1, den - 1);
    let mul = pick(rng, &[2, 3, 4]);
    Question::new(
        num as f64 / den as f64,
        format!("{}/{}", num * mul, den * mul),
        format!("Equivalent to {num}/{den}"),
    )
}

fn negative_question<R: Rng + ?Sized>(rng: &mut R, range: NumberRange) -> Question {
    let den = pick(rng, &[2, 3, 4, 5, 6]);
    let (min_num, max_num) = numerator_bounds(range, den);
    let mut num = rand_int(rng, min_num, max_num);
    if num == 0 {
        num = if rng.random_bool(0.5) { -1 } else { 1 };
    }
    let simplified = simplify_fraction(num, den);
    Question::new(
        simplified.value(),
        simplified.to_string(),
        "Negative territory needs care",
    )
}

fn mixed_question<R: Rng + ?Sized>(rng: &mut R) -> Question {
    let den = pick(rng, &[2, 3, 4, 5, 6, 8]);
    let whole = rand_int(rng, 1, 2);
    let num = rand_int(rng, 1, den - 1);
    let improper = whole * den + num;
    let value = improper as f64 / den as f64;
    if rng.random_bool(MIXED_TEXT_CHANCE) {
        Question::new(value, format!("{whole} {num}/{den}"), "Whole plus fraction")
    } else {
        Question::new(value, format!("{improper}/{den}"), "Improper fraction")
    }
}

/// Interior sample: both extreme numerators are excluded so the target is
/// never pinned to an end of a moving line
fn interior_value<R: Rng + ?Sized>(rng: &mut R, range: NumberRange, dens: &[i64]) -> f64 {
    let den = pick(rng, dens);
    let (min_num, max_num) = numerator_bounds(range, den);
    let lo = min_num + 1;
    let hi = lo.max(max_num - 1);
    simplify_fraction(rand_int(rng, lo, hi), den).value()
}

fn sliding_question<R: Rng + ?Sized>(rng: &mut R, range: NumberRange) -> Question {
    let value = interior_value(rng, range, &[3, 4, 5, 6, 7, 8, 9]);
    Question::new(value, to_fraction_label(value, LABEL_MAX_DEN), "Sliding line mode")
}

fn camera_boss_question<R: Rng + ?Sized>(rng: &mut R, range: NumberRange) -> Question {
    let value = interior_value(rng, range, &[3, 4, 5, 6, 7, 8, 9, 10]);
    let label = if rng.random_bool(BOSS_MIXED_TEXT_CHANCE) {
        to_mixed_label(value, LABEL_MAX_DEN)
    } else {
        to_fraction_label(value, LABEL_MAX_DEN)
    };
    Question::new(value, label, "Camera boss battle")
}

/// Produce one candidate question for a level kind
pub fn generate_question<R: Rng + ?Sized>(kind: LevelKind, range: NumberRange, rng: &mut R) -> Question {
    match kind {
        LevelKind::Warmup => basic_question(rng),
        LevelKind::Equivalent => equivalent_question(rng),
        LevelKind::Negative => negative_question(rng, range),
        LevelKind::Mixed => mixed_question(rng),
        LevelKind::Sliding => sliding_question(rng, range),
        LevelKind::CameraBoss => camera_boss_question(rng, range),
    }
}

/// Build the full question list for a level.
///
/// Always returns exactly `level.questions` entries inside `level.range`.
/// Entries are distinct at 4-decimal resolution unless the fallback fill
/// was needed.
pub fn build_questions<R: Rng + ?Sized>(level: &Level, rng: &mut R) -> Vec<Question> {
    let target = level.questions;
    let mut picked = Vec::with_capacity(target);
    let mut seen = HashSet::with_capacity(target);

    if level.kind.uses_curated_pool() {
        let mut pool = warmup_pool();
        pool.shuffle(rng);
        for question in pool.into_iter().take(target) {
            seen.insert(value_key(question.value));
            picked.push(question);
        }
    }

    let mut attempts = 0;
    while picked.len() < target && attempts < MAX_GENERATOR_ATTEMPTS {
        attempts += 1;
        let question = generate_question(level.kind, level.range, rng);
        let key = value_key(question.value);
        let key_value = key as f64 / 10_000.0;
        if !level.range.contains(key_value) || !level.range.contains(question.value) {
            continue;
        }
        if !seen.insert(key) {
            continue;
        }
        picked.push(question);
    }

    if picked.len() < target {
        log::warn!(
            "Level {}: {} unique questions after {} attempts, filling {} at random",
            level.id,
            picked.len(),
            attempts,
            target - picked.len()
        );
    }

    while picked.len() < target {
        let value = level.range.min + rng.random::<f64>() * level.range.span();
        picked.push(Question::new(
            value,
            to_fraction_label(value, FALLBACK_LABEL_MAX_DEN),
            "Free throw",
        ));
    }

    picked
}
