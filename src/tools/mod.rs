use serde::{Deserialize, Serialize};

use crate::canvas::Color;

/// Enum representing all available tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Line,
    Rect,
    Circle,
    Text,
    Fill,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Rect,
        ToolKind::Circle,
        ToolKind::Text,
        ToolKind::Fill,
    ];

    /// Return the name of the tool
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Brush => "Brush",
            ToolKind::Eraser => "Eraser",
            ToolKind::Line => "Line",
            ToolKind::Rect => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Text => "Text",
            ToolKind::Fill => "Fill",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ToolKind::Brush => "🖌",
            ToolKind::Eraser => "⌫",
            ToolKind::Line => "╱",
            ToolKind::Rect => "▭",
            ToolKind::Circle => "◯",
            ToolKind::Text => "T",
            ToolKind::Fill => "🪣",
        }
    }

    /// Freehand tools paint while the pointer moves
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Brush | ToolKind::Eraser)
    }
}

/// Color and size shared by every tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub color: Color,
    /// Stroke width in pixels. Text is drawn at twice this size.
    pub size: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 10.0,
        }
    }
}

impl BrushSettings {
    /// The eraser paints opaque white
    pub const ERASER_COLOR: Color = Color::WHITE;

    pub fn color_for(&self, tool: ToolKind) -> Color {
        if tool == ToolKind::Eraser {
            Self::ERASER_COLOR
        } else {
            self.color
        }
    }

    pub fn text_size(&self) -> f32 {
        self.size * 2.0
    }
}
