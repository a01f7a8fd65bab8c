use std::f32::consts::{PI, TAU};

use eframe::egui::{Vec2, vec2};

const INITIAL_RADIUS: f32 = 10.0;

pub fn phyllotaxis(index: usize) -> Vec2 {
    let angle = index as f32 * PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    vec2(angle.cos(), angle.sin()) * radius
}

pub fn separation_direction(a: usize, b: usize) -> Vec2 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if a <= b { direction } else { -direction }
}

pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut short = text.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phyllotaxis_never_stacks_nodes() {
        let points = (0..64).map(phyllotaxis).collect::<Vec<_>>();
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!((*a - *b).length() > 1.0);
            }
        }
    }

    #[test]
    fn separation_direction_is_antisymmetric() {
        let forward = separation_direction(3, 11);
        let backward = separation_direction(11, 3);
        assert!((forward + backward).length() < 1e-6);
        assert!((forward.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn truncate_label_keeps_short_names() {
        assert_eq!(truncate_label("Pilot", 12), "Pilot");
        assert_eq!(truncate_label("Rick Potion #9", 6), "Rick …");
    }
}
