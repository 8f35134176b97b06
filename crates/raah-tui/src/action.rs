/// Everything a key press (or the tick timer) can ask the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    FocusNext,
    FocusPrev,
    /// Toggle the edition or open the book under the cursor.
    Select,
    NextChapter,
    PrevChapter,
    StartChapterInput,
    ChapterInput(char),
    ChapterBackspace,
    ChapterConfirm,
    ChapterCancel,
    Retry,
    /// Remember the current versions and book in the config file.
    SaveSelection,
    ToggleHelp,
    Tick,
    Resize(u16, u16),
    None,
}
