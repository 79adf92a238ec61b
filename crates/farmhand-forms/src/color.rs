use rand::Rng;
use serde::{Deserialize, Serialize};

/// The color codes shared by sequences and regimens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
    Pink,
    Gray,
    Red,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Purple,
        Color::Pink,
        Color::Gray,
        Color::Red,
    ];
}

/// Picks a color that is compliant with sequence / regimen color codes.
pub fn random_color() -> Color {
    Color::ALL[rand::thread_rng().gen_range(0..Color::ALL.len())]
}
