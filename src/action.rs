/// What a key press asks the app to do. Input mapping and state mutation
/// stay separate so both halves test in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    CycleSort,
    ToggleTheme,
    ToggleHelp,
    /// Move the process-table selection by a signed number of rows.
    Scroll(i32),
    SelectFirst,
    SelectLast,
    None,
}
