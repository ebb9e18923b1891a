use orrery_core::Direction;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Show,
    Hide,
    Cycle(Direction),
    Select(usize),
    ConfigReload,
}
