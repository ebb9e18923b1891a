use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Orbiting,
    Slowing,
    Expanded,
    Labeled,
    Interactive,
    /// Reduced-motion presentation. Nothing moves and nothing leaves this phase.
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
pub enum PhaseEvent {
    BeginSlow,
    BeginExpand,
    ShowLabels,
    LabelsSettled,
    Restart,
    ReduceMotion,
}

impl Phase {
    /// The choreography table. Pairs that are not listed leave the phase unchanged.
    pub fn next(self, event: PhaseEvent) -> Option<Phase> {
        use Phase::*;
        use PhaseEvent::*;

        match (self, event) {
            (Static, _) => None,
            (_, ReduceMotion) => Some(Static),
            (Orbiting, BeginSlow) => Some(Slowing),
            (Slowing, BeginExpand) => Some(Expanded),
            (Expanded, ShowLabels) => Some(Labeled),
            (Labeled, LabelsSettled) => Some(Interactive),
            (Orbiting | Labeled | Interactive, Restart) => Some(Orbiting),
            _ => None,
        }
    }

    pub fn is_decelerating(self) -> bool {
        !matches!(self, Phase::Orbiting | Phase::Static)
    }

    pub fn is_expanding(self) -> bool {
        matches!(self, Phase::Expanded | Phase::Labeled | Phase::Interactive)
    }

    pub fn labels_visible(self) -> bool {
        matches!(self, Phase::Labeled | Phase::Interactive | Phase::Static)
    }
}
