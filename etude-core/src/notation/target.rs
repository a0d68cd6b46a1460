use super::layout::NotationError;

/// Id of the element the GUI mounts the notation markup into.
pub const NOTATION_TARGET_ID: &str = "notation-container";

/// One entry in a target's display list.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawing {
    Stave { markup: String },
    Voice { notes: usize, markup: String },
}

impl Drawing {
    fn markup(&self) -> &str {
        match self {
            Drawing::Stave { markup } | Drawing::Voice { markup, .. } => markup,
        }
    }
}

/// A reusable drawing surface. Cleared before every render so repeated
/// renders never stack.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    id: &'static str,
    size: Option<(u32, u32)>,
    drawings: Vec<Drawing>,
}

impl RenderTarget {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            size: None,
            drawings: Vec::new(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Pixel size of the open context, if any.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn clear(&mut self) {
        self.size = None;
        self.drawings.clear();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    pub fn push(&mut self, drawing: Drawing) -> Result<(), NotationError> {
        if self.size.is_none() {
            return Err(NotationError::NoContext);
        }
        self.drawings.push(drawing);
        Ok(())
    }

    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }

    pub fn stave_count(&self) -> usize {
        self.drawings
            .iter()
            .filter(|d| matches!(d, Drawing::Stave { .. }))
            .count()
    }

    /// Note count of each drawn voice, in drawing order.
    pub fn voice_note_counts(&self) -> Vec<usize> {
        self.drawings
            .iter()
            .filter_map(|d| match d {
                Drawing::Voice { notes, .. } => Some(*notes),
                _ => None,
            })
            .collect()
    }

    /// Standalone SVG document, or an empty string when nothing is open.
    pub fn to_svg(&self) -> String {
        let Some((width, height)) = self.size else {
            return String::new();
        };
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );
        for drawing in &self.drawings {
            out.push_str(drawing.markup());
        }
        out.push_str("</svg>");
        out
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::new(NOTATION_TARGET_ID)
    }
}
