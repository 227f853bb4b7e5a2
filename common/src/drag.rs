//! ドロップ領域の「ドラッグ中」フラグ
//!
//! 表示専用。アップロードの状態遷移とは独立して持つ。

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    over: bool,
}

impl DragState {
    /// dragenter / dragover
    pub fn over(&mut self) {
        self.over = true;
    }

    /// dragleave
    pub fn leave(&mut self) {
        self.over = false;
    }

    /// drop
    pub fn dropped(&mut self) {
        self.over = false;
    }

    pub fn is_over(&self) -> bool {
        self.over
    }
}
