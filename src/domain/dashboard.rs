use crate::domain::models::UserProfile;
use crate::domain::plan;
use rand::seq::SliceRandom;
use serde::Serialize;

const REFERENCE_WEIGHT_KG: f64 = 65.0;
const EXERCISE_GOAL_MINUTES: u32 = 60;

pub const QUOTES: [&str; 4] = [
    "Push yourself because no one else is going to do it for you!",
    "Success starts with self-discipline!",
    "Don't stop until you're proud!",
    "Consistency is the key to transformation!",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub delta: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub display_name: String,
    pub headline: String,
    pub metrics: Vec<Metric>,
    pub quote: &'static str,
}

/// Local part of the email with each word capitalised, e.g. "jane.doe@x" -> "Jane.Doe".
pub fn display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut out = String::with_capacity(local.len());
    let mut at_word_start = true;
    for ch in local.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

pub fn metrics(profile: &UserProfile) -> Vec<Metric> {
    let calories = plan::calories(profile.goal);
    vec![
        Metric {
            label: "Weight (kg)",
            value: format_number(profile.weight),
            delta: format!("{} kg change", format_number(profile.weight - REFERENCE_WEIGHT_KG)),
        },
        Metric {
            label: "Daily Calories",
            value: format!("{calories} kcal"),
            delta: "+200 kcal".to_string(),
        },
        Metric {
            label: "Exercise Time",
            value: format!("{} min", profile.exercise_minutes),
            delta: format!("Goal {EXERCISE_GOAL_MINUTES} min"),
        },
    ]
}

pub fn pick_quote<R: rand::Rng + ?Sized>(rng: &mut R) -> &'static str {
    QUOTES.choose(rng).copied().unwrap_or(QUOTES[0])
}

pub fn build(email: &str, profile: &UserProfile) -> Dashboard {
    let display_name = display_name(email);
    Dashboard {
        headline: format!("Welcome, {display_name}!"),
        display_name,
        metrics: metrics(profile),
        quote: pick_quote(&mut rand::thread_rng()),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
