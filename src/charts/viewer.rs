use crate::charts::figure::Figure;

/// Steps through a list of figures, wrapping around at both ends.
#[derive(Debug, Clone, Default)]
pub struct FigureViewer {
    figures: Vec<Figure>,
    index: usize,
}

impl FigureViewer {
    pub fn new(figures: Vec<Figure>) -> Self {
        Self { figures, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn current(&self) -> Option<&Figure> {
        self.figures.get(self.index)
    }

    /// Advances to the next figure; after the last one comes the first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Figure> {
        if self.figures.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.figures.len();
        self.current()
    }

    /// Goes back one figure; before the first one comes the last.
    pub fn prev(&mut self) -> Option<&Figure> {
        if self.figures.is_empty() {
            return None;
        }
        self.index = (self.index + self.figures.len() - 1) % self.figures.len();
        self.current()
    }

    /// `"current/total"`, 1-based.
    pub fn position(&self) -> String {
        if self.figures.is_empty() {
            return "0/0".to_string();
        }
        format!("{}/{}", self.index + 1, self.figures.len())
    }
}
