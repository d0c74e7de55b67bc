//! Greedy word wrap for node labels

/// Measures rendered text width
pub trait TextMeasure {
    fn width(&self, text: &str) -> f32;
}

/// Fixed per-character advance, for use without a font system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxTextMeasure {
    pub char_width: f32,
}

impl ApproxTextMeasure {
    /// Average proportional-font advance at `font_size`
    pub fn for_font_size(font_size: f32) -> Self {
        Self {
            char_width: font_size * 0.55,
        }
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

/// Measures through egui's font cache
pub struct PainterTextMeasure<'a> {
    pub painter: &'a egui::Painter,
    pub font: egui::FontId,
}

impl TextMeasure for PainterTextMeasure<'_> {
    fn width(&self, text: &str) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), self.font.clone(), egui::Color32::BLACK)
            .size()
            .x
    }
}

/// Split `text` into lines no wider than `max_width`.
///
/// Words are appended to the current line until it overflows; the
/// overflowing word then starts a new line. A single word wider than the
/// budget stays on its own line unbroken.
pub fn wrap_label(text: &str, max_width: f32, measure: &dyn TextMeasure) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        line.push(word);
        if line.len() > 1 && measure.width(&line.join(" ")) > max_width {
            line.pop();
            lines.push(line.join(" "));
            line.clear();
            line.push(word);
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line.join(" "));
    }
    lines
}
