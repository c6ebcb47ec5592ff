//! Locally generated monogram avatars for testimonials. No network call.

use crate::content::encode_data_url;
use rand::Rng;

const AVATAR_COLORS: [&str; 4] = ["#0f172a", "#334155", "#475569", "#1e293b"];

/// Renders a 100x100 vector monogram for a reviewer name: one of four dark
/// background colors (chosen pseudo-randomly) behind the uppercased first
/// character of the name, or `?` when the name is empty.
pub fn monogram_avatar(name: &str) -> String {
    let color = AVATAR_COLORS[rand::thread_rng().gen_range(0..AVATAR_COLORS.len())];
    monogram_avatar_colored(name, color)
}

fn monogram_avatar_colored(name: &str, color: &str) -> String {
    let initial: String = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string());

    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><rect width="100" height="100" fill="{color}"/><text x="50" y="65" font-family="Cairo, Arial, sans-serif" font-size="40" font-weight="700" fill="white" text-anchor="middle">{initial}</text></svg>"#
    );
    encode_data_url("image/svg+xml", svg.as_bytes())
}
