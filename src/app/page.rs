use std::fmt::{Display, Formatter};

/// Screens of the interactive shell.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Start,
    Analysis,
    GraphOptions,
}

/// Requested moves between pages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Start -> Analysis, once a period is selected.
    Analyze,
    /// Analysis -> GraphOptions.
    Graphs,
    /// One step back towards Start.
    Back,
    /// Straight back to Start from anywhere.
    Restart,
}

impl Page {
    /// The page reached from `self` by `nav`, or `None` if the move is not allowed.
    ///
    /// Analysis and graph pages are only reachable with a selected period.
    pub fn transition(self, nav: Navigation, period_selected: bool) -> Option<Page> {
        let next = match (self, nav) {
            (_, Navigation::Restart) => Page::Start,
            (Page::Start, Navigation::Analyze) => Page::Analysis,
            (Page::Analysis, Navigation::Graphs) => Page::GraphOptions,
            (Page::Analysis, Navigation::Back) => Page::Start,
            (Page::GraphOptions, Navigation::Back) => Page::Analysis,
            _ => return None,
        };
        if next != Page::Start && !period_selected {
            return None;
        }
        Some(next)
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Start => "Start",
            Page::Analysis => "Analysis",
            Page::GraphOptions => "Graph options",
        }
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_requires_period() {
        assert_eq!(Page::Start.transition(Navigation::Analyze, false), None);
        assert_eq!(
            Page::Start.transition(Navigation::Analyze, true),
            Some(Page::Analysis)
        );
        assert_eq!(Page::Analysis.transition(Navigation::Graphs, false), None);
    }

    #[test]
    fn test_back_and_restart() {
        assert_eq!(
            Page::GraphOptions.transition(Navigation::Back, true),
            Some(Page::Analysis)
        );
        assert_eq!(
            Page::Analysis.transition(Navigation::Back, true),
            Some(Page::Start)
        );
        assert_eq!(
            Page::GraphOptions.transition(Navigation::Restart, false),
            Some(Page::Start)
        );
        assert_eq!(Page::Start.transition(Navigation::Back, true), None);
    }

    #[test]
    fn test_graphs_only_from_analysis() {
        assert_eq!(
            Page::Analysis.transition(Navigation::Graphs, true),
            Some(Page::GraphOptions)
        );
        assert_eq!(Page::Start.transition(Navigation::Graphs, true), None);
        assert_eq!(Page::GraphOptions.transition(Navigation::Analyze, true), None);
    }
}
