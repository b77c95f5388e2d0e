use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// A rendered chart: its title and the HTML file it was written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Figure {
    pub title: String,
    pub path: PathBuf,
}

impl Figure {
    pub fn new(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Display for Figure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.path.display())
    }
}
