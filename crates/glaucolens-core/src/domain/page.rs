//! Navigation menu entries.

/// A top-level view selectable from the sidebar.
///
/// Adding a variant forces every `match` on `Page` to handle it, so a menu
/// entry can never exist without a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    /// Landing page.
    #[default]
    Home,
    /// Severity slider with stage images.
    VisionSimulator,
    /// Fundus upload and classification.
    Detection,
    /// Educational content and risk questionnaire.
    Learn,
}

impl Page {
    /// Menu entries in sidebar order.
    pub const ALL: [Self; 4] = [
        Self::Home,
        Self::VisionSimulator,
        Self::Detection,
        Self::Learn,
    ];

    /// URL identifier used in `?page=`.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::VisionSimulator => "simulator",
            Self::Detection => "detection",
            Self::Learn => "learn",
        }
    }

    /// Sidebar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::VisionSimulator => "Vision Simulator",
            Self::Detection => "Detection",
            Self::Learn => "Learn About Glaucoma",
        }
    }

    /// Resolves a selection, falling back to [`Page::Home`] for anything unknown.
    #[must_use]
    pub fn from_slug(slug: Option<&str>) -> Self {
        slug.and_then(|s| Self::ALL.into_iter().find(|p| p.slug() == s))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trips_for_every_page() {
        for page in Page::ALL {
            assert_eq!(Page::from_slug(Some(page.slug())), page);
        }
    }

    #[test]
    fn test_unknown_selection_falls_back_to_home() {
        assert_eq!(Page::from_slug(None), Page::Home);
        assert_eq!(Page::from_slug(Some("admin")), Page::Home);
        assert_eq!(Page::from_slug(Some("")), Page::Home);
    }

    #[test]
    fn test_sidebar_order() {
        let labels: Vec<_> = Page::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            ["Home", "Vision Simulator", "Detection", "Learn About Glaucoma"]
        );
    }
}
