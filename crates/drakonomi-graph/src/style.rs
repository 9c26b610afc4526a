//! Style rules for the bubble canvas.
//!
//! Maps dragon tags to the fixed color palette and computes the visual
//! parameters (opacity, border widths, edge styling, flow particles) the
//! shell's painter applies verbatim.

/// RGBA color, GUI-toolkit agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// The fixed accent gold, also the fallback node color.
pub const ACCENT: Color = Color::rgb(255, 215, 0);

/// Canvas background.
pub const BACKGROUND: Color = Color::rgb(10, 10, 10);

/// Tags whose color wins over the first-tag fallback, in priority order.
const COLOR_PRIORITY: &[&str] = &[
    "fire",
    "water",
    "ice",
    "nature",
    "light",
    "dark",
    "time",
    "space",
    "legendary",
    "primordial",
];

/// Fixed color for a tag; unknown tags fall back to the accent gold.
pub fn tag_color(tag: &str) -> Color {
    match tag.to_lowercase().as_str() {
        // Fire/Power (red-orange spectrum)
        "fire" => Color::rgb(255, 69, 0),
        "power" => Color::rgb(220, 20, 60),
        "volcanic" => Color::rgb(178, 34, 34),
        "destruction" => Color::rgb(139, 0, 0),
        "strength" => Color::rgb(255, 99, 71),

        // Water/Ice (blue-cyan spectrum)
        "water" => Color::rgb(30, 144, 255),
        "ice" => Color::rgb(0, 206, 209),
        "ocean" => Color::rgb(70, 130, 180),
        "frost" => Color::rgb(176, 224, 230),
        "storm" => Color::rgb(65, 105, 225),

        // Nature/Earth (green-brown spectrum)
        "nature" => Color::rgb(34, 139, 34),
        "earth" => Color::rgb(139, 69, 19),
        "forest" => Color::rgb(46, 139, 87),
        "plant" => Color::rgb(50, 205, 50),
        "mountain" => Color::rgb(160, 82, 45),

        // Light/Holy (white-gold spectrum)
        "light" => Color::rgb(255, 250, 205),
        "holy" => Color::rgb(255, 215, 0),
        "divine" => Color::rgb(255, 248, 220),
        "celestial" => Color::rgb(240, 230, 140),
        "wisdom" => Color::rgb(250, 250, 210),

        // Dark/Shadow (purple-black spectrum)
        "dark" => Color::rgb(139, 0, 139),
        "shadow" => Color::rgb(72, 61, 139),
        "void" => Color::rgb(47, 79, 79),
        "death" => Color::rgb(25, 25, 112),
        "nightmare" => Color::rgb(75, 0, 130),

        // Time/Space (cosmic colors)
        "time" => Color::rgb(147, 112, 219),
        "space" => Color::rgb(102, 51, 153),
        "cosmic" => Color::rgb(106, 90, 205),
        "quantum" => Color::rgb(123, 104, 238),
        "eternity" => Color::rgb(153, 50, 204),

        // Elemental attributes
        "lightning" => Color::rgb(255, 215, 0),
        "wind" => Color::rgb(135, 206, 235),
        "thunder" => Color::rgb(70, 130, 180),
        "poison" => Color::rgb(154, 205, 50),
        "venom" => Color::rgb(173, 255, 47),

        // Characteristics
        "ancient" => Color::rgb(222, 184, 135),
        "primordial" => Color::rgb(139, 115, 85),
        "legendary" => Color::rgb(255, 215, 0),
        "mythical" => Color::rgb(218, 112, 214),
        "immortal" => Color::rgb(221, 160, 221),

        // Behavioral traits
        "guardian" => Color::rgb(70, 130, 180),
        "protector" => Color::rgb(100, 149, 237),
        "destroyer" => Color::rgb(220, 20, 60),
        "trickster" => Color::rgb(255, 105, 180),
        "wise" => Color::rgb(255, 215, 0),
        "fierce" => Color::rgb(255, 69, 0),
        "noble" => Color::rgb(65, 105, 225),
        "savage" => Color::rgb(139, 0, 0),
        "cunning" => Color::rgb(255, 140, 0),
        "benevolent" => Color::rgb(135, 206, 235),
        "malevolent" => Color::rgb(139, 0, 139),

        // Special attributes
        "shapeshifter" => Color::rgb(255, 20, 147),
        "immortality" => Color::rgb(186, 85, 211),
        "regeneration" => Color::rgb(50, 205, 50),
        "treasure" => Color::rgb(255, 215, 0),
        "greed" => Color::rgb(184, 134, 11),
        "chaos" => Color::rgb(220, 20, 60),

        // Cultural
        "european" => Color::rgb(65, 105, 225),
        "asian" => Color::rgb(220, 20, 60),
        "chinese" => Color::rgb(255, 0, 0),
        "japanese" => Color::rgb(255, 69, 0),
        "nordic" => Color::rgb(135, 206, 235),
        "greek" => Color::rgb(255, 215, 0),
        "egyptian" => Color::rgb(218, 165, 32),
        "aztec" => Color::rgb(50, 205, 50),
        "indian" => Color::rgb(255, 99, 71),
        "welsh" => Color::rgb(220, 20, 60),

        // Types
        "wyrm" => Color::rgb(139, 69, 19),
        "drake" => Color::rgb(255, 99, 71),
        "wyvern" => Color::rgb(70, 130, 180),
        "hydra" => Color::rgb(50, 205, 50),
        "serpent" => Color::rgb(147, 112, 219),

        _ => ACCENT,
    }
}

/// Primary color for a node: first hit in the priority list wins, then
/// the first tag, then the accent gold.
pub fn primary_color(tags: &[String]) -> Color {
    if tags.is_empty() {
        return ACCENT;
    }

    for priority in COLOR_PRIORITY {
        if tags.iter().any(|t| t.eq_ignore_ascii_case(priority)) {
            return tag_color(priority);
        }
    }

    tag_color(&tags[0])
}

// ---------------------------------------------------------------------------
// Node rendering parameters
// ---------------------------------------------------------------------------

/// Opacity applied to a node: full when it is selected or nothing is
/// selected, dimmed otherwise so the active selection stands out.
pub fn node_opacity(selection_active: bool, is_selected: bool) -> f32 {
    if !selection_active || is_selected {
        1.0
    } else {
        0.3
    }
}

/// Border width in screen pixels; highlighted nodes get the thicker ring.
pub fn node_border_width(is_highlighted: bool) -> f32 {
    if is_highlighted {
        6.0
    } else {
        4.0
    }
}

/// Offset of the outer glow ring beyond the node radius (graph units).
pub const GLOW_RING_OFFSET: f32 = 8.0;
/// Glow ring stroke width in screen pixels.
pub const GLOW_RING_WIDTH: f32 = 10.0;
/// Glow ring alpha (the node color at roughly 53%).
pub const GLOW_RING_ALPHA: u8 = 0x88;

/// Labels are suppressed below this camera zoom to avoid unreadable
/// clutter when zoomed out.
pub const LABEL_MIN_ZOOM: f32 = 0.8;
/// Label font size in screen pixels.
pub const LABEL_FONT_SIZE: f32 = 12.0;
/// Gap between the circle and its label (graph units).
pub const LABEL_GAP: f32 = 5.0;

pub fn label_visible(zoom: f32) -> bool {
    zoom >= LABEL_MIN_ZOOM
}

// ---------------------------------------------------------------------------
// Edge rendering parameters
// ---------------------------------------------------------------------------

/// Edge color: gold whose opacity steps up with weight. Even the
/// strongest link stays translucent so edges never dominate the nodes.
pub fn edge_color(weight: f32) -> Color {
    if weight >= 3.0 {
        ACCENT.with_alpha(38)
    } else if weight >= 2.0 {
        ACCENT.with_alpha(26)
    } else {
        ACCENT.with_alpha(13)
    }
}

/// Edge width in graph units. Logarithmic so a many-shared-tags pair does
/// not produce a visually dominant bar: 1 tag = 1.15, 3 tags = 1.49.
pub fn edge_width(weight: f32) -> f32 {
    0.8 + (weight + 1.0).ln() * 0.5
}

/// Number of directional flow particles conveying connection strength.
pub fn edge_particles(weight: f32) -> usize {
    (weight * 2.0).ceil().max(0.0) as usize
}

/// Particle diameter in screen pixels.
pub const PARTICLE_WIDTH: f32 = 3.0;
/// Particle travel speed, in edge-lengths per frame.
pub const PARTICLE_SPEED: f32 = 0.003;

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_priority_order_decides_primary_color() {
        // "fire" outranks "legendary" regardless of tag order.
        assert_eq!(
            primary_color(&tags(&["legendary", "fire"])),
            tag_color("fire")
        );
        // No priority tag: first tag wins.
        assert_eq!(
            primary_color(&tags(&["serpent", "crowned"])),
            tag_color("serpent")
        );
        // Unknown tags and empty sets fall back to gold.
        assert_eq!(primary_color(&tags(&["crowned"])), ACCENT);
        assert_eq!(primary_color(&[]), ACCENT);
    }

    #[test]
    fn test_tag_color_ignores_case() {
        assert_eq!(tag_color("FIRE"), tag_color("fire"));
    }

    #[test]
    fn test_node_opacity_dims_only_against_active_selection() {
        assert_eq!(node_opacity(false, false), 1.0);
        assert_eq!(node_opacity(true, true), 1.0);
        assert_eq!(node_opacity(true, false), 0.3);
    }

    #[test]
    fn test_edge_style_scales_with_weight() {
        assert!(edge_color(3.0).a > edge_color(2.0).a);
        assert!(edge_color(2.0).a > edge_color(1.0).a);
        assert_eq!(edge_color(0.5), edge_color(1.0));

        // Width grows but compresses.
        let w1 = edge_width(1.0);
        let w2 = edge_width(2.0);
        let w4 = edge_width(4.0);
        assert!(w2 > w1 && w4 > w2);
        assert!(w2 - w1 > w4 - w2);

        assert_eq!(edge_particles(0.5), 1);
        assert_eq!(edge_particles(1.0), 2);
        assert_eq!(edge_particles(3.0), 6);
    }
}
