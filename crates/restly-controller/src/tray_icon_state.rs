/// Tray icon states reflecting the outcome of the last command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Last command was recorded (or none issued yet).
    Ready,
    /// Last command could not be written to the queue.
    Failed,
}

impl TrayIconState {
    /// Tooltip shown for this state.
    pub fn tooltip(self) -> &'static str {
        match self {
            TrayIconState::Ready => "Restly - Ready",
            TrayIconState::Failed => "Restly - Last command failed",
        }
    }

    /// Fill colour of the procedurally drawn icon.
    pub(crate) fn rgba(self) -> [u8; 4] {
        match self {
            TrayIconState::Ready => [0x3a, 0xa6, 0x8c, 0xff],
            TrayIconState::Failed => [0xd9, 0x48, 0x3b, 0xff],
        }
    }
}
