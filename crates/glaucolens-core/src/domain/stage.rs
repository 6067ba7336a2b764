//! Severity stages shown by the vision simulator.

use serde::{Deserialize, Serialize};

/// Visual severity stage of glaucoma-related vision loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityStage {
    /// No visible field loss.
    Normal,
    /// Early peripheral loss.
    Mild,
    /// Advanced tunnel vision.
    Medium,
    /// Near-complete loss.
    Severe,
}

impl SeverityStage {
    /// All stages, least to most severe.
    pub const ALL: [Self; 4] = [Self::Normal, Self::Mild, Self::Medium, Self::Severe];

    /// File name of the stage image in the asset directory.
    #[must_use]
    pub const fn asset_name(self) -> &'static str {
        match self {
            Self::Normal => "Normal.jpeg",
            Self::Mild => "Mild.jpeg",
            Self::Medium => "Medium.jpeg",
            Self::Severe => "Severe.jpeg",
        }
    }

    /// Caption displayed under the stage image.
    #[must_use]
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Normal => "Normal Vision",
            Self::Mild => "Early Glaucoma",
            Self::Medium => "Advanced Glaucoma",
            Self::Severe => "Severe Glaucoma",
        }
    }
}
