//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:   green   (written exports)
//!   - Warning:   yellow  (load warnings, search matches)
//!   - Error:     red
//!   - Info:      cyan    (node IDs, tree root)
//!   - Muted:     dimmed  (field labels, connectors, hidden nodes)
//!   - Emphasis:  bold    (section headers, group rows)
//!
//! Group tags take their color from the legend palette. Palette entries are
//! hex codes (`#f5ab70`) or color names; names the terminal palette lacks
//! fall back to a close RGB value.

use colored::{Color, Colorize};
use depview_graph::{Node, NodeGroup};

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Colorize a node ID (cyan).
pub(crate) fn colorize_id(id: impl std::fmt::Display, config: &OutputConfig) -> String {
    info(&id.to_string(), config)
}

/// Parse a palette entry into a terminal color.
pub(crate) fn parse_color(spec: &str) -> Option<Color> {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color::TrueColor {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }

    match spec.to_lowercase().as_str() {
        "grey" | "gray" => Some(Color::BrightBlack),
        "coral" => Some(Color::TrueColor { r: 255, g: 127, b: 80 }),
        "darkslateblue" => Some(Color::TrueColor { r: 72, g: 61, b: 139 }),
        other => other.parse().ok(),
    }
}

/// Render a group tag in its palette color.
pub(crate) fn colorize_group(group: NodeGroup, palette_color: &str, config: &OutputConfig) -> String {
    let tag = group.as_str();
    if !config.use_colors {
        return tag.to_string();
    }
    match parse_color(palette_color) {
        Some(color) => tag.color(color).bold().to_string(),
        None => tag.bold().to_string(),
    }
}

/// Marker distinguishing custom objects from system objects, with ASCII
/// fallback.
pub(crate) fn node_marker(node: &Node, config: &OutputConfig) -> String {
    let icon = match (node.is_custom, config.use_ascii) {
        (true, false) => "●",
        (false, false) => "○",
        (true, true) => "*",
        (false, true) => "o",
    };
    if node.hidden {
        dimmed(icon, config)
    } else {
        icon.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn plain() -> OutputConfig {
        OutputConfig::new(80, true, false)
    }

    #[rstest]
    #[case("#f5ab70", Some(Color::TrueColor { r: 0xf5, g: 0xab, b: 0x70 }))]
    #[case("red", Some(Color::Red))]
    #[case("Yellow", Some(Color::Yellow))]
    #[case("grey", Some(Color::BrightBlack))]
    #[case("coral", Some(Color::TrueColor { r: 255, g: 127, b: 80 }))]
    #[case("#12", None)]
    #[case("#zzzzzz", None)]
    #[case("chartreuse", None)]
    fn test_parse_color(#[case] spec: &str, #[case] expected: Option<Color>) {
        assert_eq!(parse_color(spec), expected);
    }

    #[test]
    fn test_no_colors_leaves_text_plain() {
        let config = plain();
        assert_eq!(success("ok", &config), "ok");
        assert_eq!(warning("careful", &config), "careful");
        assert_eq!(colorize_group(NodeGroup::Tabl, "white", &config), "TABL");
        assert_eq!(colorize_id(7u64, &config), "7");
    }

    #[test]
    fn test_node_marker_ascii() {
        let config = plain();
        let node = Node::new(1, NodeGroup::Prog, "p", "P");
        assert_eq!(node_marker(&node, &config), "o");
        assert_eq!(node_marker(&node.custom(), &config), "*");
    }
}
