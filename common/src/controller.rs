//! アップロードコントローラ
//!
//! 画面状態（[`UploadState`]）を一つだけ持ち、ユーザー操作と非同期処理の完了で更新する。
//! 非同期処理（プレビュー生成・アップロード）には世代番号を付け、
//! 完了時点で世代が進んでいれば結果を捨てる。

use crate::error::{TransportError, ValidationError};
use crate::state::{Phase, StateSnapshot, UploadState};
use crate::validate::{validate_file, FileMeta};

/// 操作の世代番号（単調増加）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// バリデーション通過後、プレビュー生成を待っている選択
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SelectTicket {
    generation: Generation,
}

impl SelectTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// 送信中のアップロード
#[derive(Debug, Clone)]
#[must_use]
pub struct UploadTicket<F> {
    pub generation: Generation,
    pub file: F,
}

/// 送信中のアップロードと、送信元になった選択
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    upload: Generation,
    selection: Generation,
}

#[derive(Debug, Clone)]
pub struct UploadController<F> {
    state: UploadState<F>,
    generation: Generation,
    /// プレビュー生成待ちの最新の選択
    pending_select: Option<Generation>,
    /// 表示中のファイルを確定させた選択
    selection: Generation,
    in_flight: Option<InFlight>,
    released: Vec<String>,
}

impl<F> Default for UploadController<F> {
    fn default() -> Self {
        Self {
            state: UploadState::default(),
            generation: Generation::default(),
            pending_select: None,
            selection: Generation::default(),
            in_flight: None,
            released: Vec::new(),
        }
    }
}

impl<F: Clone> UploadController<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState<F> {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// アップロードボタンを有効にできるか
    pub fn can_upload(&self) -> bool {
        self.state.selected_file.is_some() && !self.state.is_uploading
    }

    /// 選択の開始（同期バリデーション）
    ///
    /// 不正なファイルはエラーメッセージだけを設定し、他のフィールドには触れない。
    pub fn begin_select(&mut self, meta: &FileMeta) -> Result<SelectTicket, ValidationError> {
        if let Err(e) = validate_file(meta) {
            self.state.error_message = Some(e.to_string());
            return Err(e);
        }
        self.generation = self.generation.next();
        self.pending_select = Some(self.generation);
        Ok(SelectTicket {
            generation: self.generation,
        })
    }

    /// プレビュー生成完了
    ///
    /// 以前のファイル・プレビュー・結果・エラーを置き換える。
    /// 間にresetか別の選択があった場合は何もせずfalse。アップロード開始では無効にならない。
    pub fn finish_select(&mut self, ticket: SelectTicket, file: F, preview_data_uri: String) -> bool {
        if self.pending_select != Some(ticket.generation) {
            return false;
        }
        self.pending_select = None;
        self.selection = ticket.generation;
        self.state.selected_file = Some(file);
        self.state.preview_data_uri = Some(preview_data_uri);
        self.state.error_message = None;
        self.release_result();
        true
    }

    /// プレビュー生成の失敗
    ///
    /// 選択がまだ有効な場合だけエラーを表示する。
    pub fn fail_select(&mut self, ticket: SelectTicket, message: impl Into<String>) -> bool {
        if self.pending_select != Some(ticket.generation) {
            return false;
        }
        self.pending_select = None;
        self.report_error(message);
        true
    }

    /// アップロード開始
    ///
    /// ファイル未選択、または送信中ならNone（通信しない）。
    pub fn begin_upload(&mut self) -> Option<UploadTicket<F>> {
        if !self.can_upload() {
            return None;
        }
        let file = self.state.selected_file.clone()?;
        self.generation = self.generation.next();
        self.in_flight = Some(InFlight {
            upload: self.generation,
            selection: self.selection,
        });
        self.state.is_uploading = true;
        self.state.error_message = None;
        Some(UploadTicket {
            generation: self.generation,
            file,
        })
    }

    /// アップロード完了
    ///
    /// `Ok` は結果画像の参照（ブラウザではObject URL）。
    /// 結果を反映した場合のみtrue。捨てた参照は [`drain_released`](Self::drain_released) で回収する。
    pub fn finish_upload(
        &mut self,
        generation: Generation,
        outcome: Result<String, TransportError>,
    ) -> bool {
        let flight = match self.in_flight {
            Some(flight) if flight.upload == generation => flight,
            _ => {
                // reset済み
                if let Ok(uri) = outcome {
                    self.released.push(uri);
                }
                return false;
            }
        };
        self.in_flight = None;
        self.state.is_uploading = false;

        if flight.selection != self.selection {
            // 送信中に新しいファイルが選択された
            if let Ok(uri) = outcome {
                self.released.push(uri);
            }
            return false;
        }

        match outcome {
            Ok(uri) => {
                self.release_result();
                self.state.result_uri = Some(uri);
                self.state.error_message = None;
            }
            Err(e) => {
                self.state.error_message = Some(e.user_message().to_string());
            }
        }
        true
    }

    /// 全フィールドを初期状態へ
    pub fn reset(&mut self) {
        self.release_result();
        self.state = UploadState::default();
        self.in_flight = None;
        self.pending_select = None;
        self.generation = self.generation.next();
        self.selection = self.generation;
    }

    /// バリデーション・通信以外のエラー（ローカルファイルの読み込み失敗など）
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.state.error_message = Some(message.into());
    }

    /// もう表示されていない結果参照を取り出す
    pub fn drain_released(&mut self) -> Vec<String> {
        std::mem::take(&mut self.released)
    }

    pub fn snapshot(&self, file_name: impl Fn(&F) -> String) -> StateSnapshot {
        StateSnapshot {
            phase: self.phase(),
            selected_file: self.state.selected_file.as_ref().map(file_name),
            has_preview: self.state.preview_data_uri.is_some(),
            is_uploading: self.state.is_uploading,
            result_uri: self.state.result_uri.clone(),
            error_message: self.state.error_message.clone(),
        }
    }

    fn release_result(&mut self) {
        if let Some(uri) = self.state.result_uri.take() {
            self.released.push(uri);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MAX_FILE_SIZE;

    type Controller = UploadController<String>;

    fn png(name: &str, size: u64) -> FileMeta {
        FileMeta::new(name, "image/png", size)
    }

    fn select(c: &mut Controller, name: &str) {
        let ticket = c.begin_select(&png(name, 2 * 1024 * 1024)).unwrap();
        assert!(c.finish_select(ticket, name.to_string(), format!("data:image/png;base64,{}", name)));
    }

    #[test]
    fn test_new_is_idle() {
        let c = Controller::new();
        assert!(c.state().is_empty());
        assert_eq!(c.phase(), Phase::Idle);
        assert!(!c.can_upload());
    }

    #[test]
    fn test_unsupported_type_sets_error_only() {
        let mut c = Controller::new();
        let err = c.begin_select(&FileMeta::new("doc.pdf", "application/pdf", 100)).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType { .. }));
        assert_eq!(
            c.state().error_message.as_deref(),
            Some("Please upload JPG, PNG, or WEBP file.")
        );
        assert!(c.state().selected_file.is_none());
        assert!(c.state().preview_data_uri.is_none());
        assert!(!c.state().is_uploading);
    }

    #[test]
    fn test_oversize_sets_error_only() {
        let mut c = Controller::new();
        let err = c.begin_select(&png("big.png", MAX_FILE_SIZE + 1)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
        assert_eq!(c.state().error_message.as_deref(), Some("File size must be under 10MB."));
        assert!(c.state().selected_file.is_none());
    }

    #[test]
    fn test_invalid_selection_keeps_previous_file() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        assert!(c.begin_select(&FileMeta::new("a.gif", "image/gif", 1)).is_err());
        assert_eq!(c.state().selected_file.as_deref(), Some("photo.png"));
        assert!(c.state().error_message.is_some());
    }

    #[test]
    fn test_valid_selection_clears_error_and_result() {
        let mut c = Controller::new();
        select(&mut c, "first.png");
        let t = c.begin_upload().unwrap();
        assert!(c.finish_upload(t.generation, Ok("blob:first".to_string())));
        c.report_error("stale error");

        select(&mut c, "second.png");
        let s = c.state();
        assert_eq!(s.selected_file.as_deref(), Some("second.png"));
        assert!(s.preview_data_uri.as_deref().is_some_and(|p| !p.is_empty()));
        assert!(s.error_message.is_none());
        assert!(s.result_uri.is_none());
        assert_eq!(c.drain_released(), vec!["blob:first".to_string()]);
    }

    #[test]
    fn test_preview_pending_is_not_ready() {
        let mut c = Controller::new();
        let _ticket = c.begin_select(&png("photo.png", 10)).unwrap();
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.begin_upload().is_none());
    }

    #[test]
    fn test_upload_without_file_is_noop() {
        let mut c = Controller::new();
        let before = c.generation();
        assert!(c.begin_upload().is_none());
        assert_eq!(c.generation(), before);
        assert!(!c.state().is_uploading);
    }

    #[test]
    fn test_upload_success() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        c.report_error("old");

        let ticket = c.begin_upload().unwrap();
        assert_eq!(ticket.file, "photo.png");
        assert!(c.state().is_uploading);
        assert!(c.state().error_message.is_none());
        assert_eq!(c.phase(), Phase::Uploading);

        assert!(c.finish_upload(ticket.generation, Ok("blob:masked".to_string())));
        let s = c.state();
        assert!(!s.is_uploading);
        assert_eq!(s.result_uri.as_deref(), Some("blob:masked"));
        assert!(s.error_message.is_none());
        assert_eq!(c.phase(), Phase::Done);
    }

    #[test]
    fn test_upload_failure_keeps_file() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        let ticket = c.begin_upload().unwrap();

        assert!(c.finish_upload(ticket.generation, Err(TransportError::Status(500))));
        let s = c.state();
        assert!(!s.is_uploading);
        assert_eq!(s.error_message.as_deref(), Some("Failed to upload. Please try again."));
        assert!(s.result_uri.is_none());
        assert_eq!(s.selected_file.as_deref(), Some("photo.png"));
        assert_eq!(c.phase(), Phase::Ready);

        // 再選択なしでリトライできる
        assert!(c.begin_upload().is_some());
    }

    #[test]
    fn test_no_concurrent_uploads() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        let _first = c.begin_upload().unwrap();
        assert!(!c.can_upload());
        assert!(c.begin_upload().is_none());
    }

    #[test]
    fn test_reset_returns_to_initial() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        let t = c.begin_upload().unwrap();
        assert!(c.finish_upload(t.generation, Ok("blob:masked".to_string())));
        c.report_error("something");

        c.reset();
        assert!(c.state().is_empty());
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.drain_released(), vec!["blob:masked".to_string()]);
        assert!(c.drain_released().is_empty());
    }

    #[test]
    fn test_reset_during_upload_discards_response() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        let ticket = c.begin_upload().unwrap();
        c.reset();

        assert!(!c.finish_upload(ticket.generation, Ok("blob:late".to_string())));
        assert!(c.state().is_empty());
        assert_eq!(c.drain_released(), vec!["blob:late".to_string()]);
    }

    #[test]
    fn test_reset_during_upload_discards_failure() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        let ticket = c.begin_upload().unwrap();
        c.reset();

        assert!(!c.finish_upload(ticket.generation, Err(TransportError::Status(500))));
        assert!(c.state().error_message.is_none());
    }

    #[test]
    fn test_new_selection_during_upload_supersedes_response() {
        let mut c = Controller::new();
        select(&mut c, "first.png");
        let ticket = c.begin_upload().unwrap();

        select(&mut c, "second.png");
        // 旧アップロードが終わるまで次の送信は不可
        assert!(c.state().is_uploading);
        assert!(c.begin_upload().is_none());

        assert!(!c.finish_upload(ticket.generation, Ok("blob:first".to_string())));
        let s = c.state();
        assert!(!s.is_uploading);
        assert!(s.result_uri.is_none());
        assert_eq!(s.selected_file.as_deref(), Some("second.png"));
        assert_eq!(c.drain_released(), vec!["blob:first".to_string()]);
        assert!(c.can_upload());
    }

    #[test]
    fn test_stale_preview_is_ignored() {
        let mut c = Controller::new();
        let first = c.begin_select(&png("first.png", 10)).unwrap();
        let second = c.begin_select(&png("second.png", 10)).unwrap();

        assert!(c.finish_select(second, "second.png".to_string(), "data:b".to_string()));
        assert!(!c.finish_select(first, "first.png".to_string(), "data:a".to_string()));
        assert_eq!(c.state().selected_file.as_deref(), Some("second.png"));
    }

    #[test]
    fn test_preview_after_reset_is_ignored() {
        let mut c = Controller::new();
        let ticket = c.begin_select(&png("photo.png", 10)).unwrap();
        c.reset();
        assert!(!c.finish_select(ticket, "photo.png".to_string(), "data:x".to_string()));
        assert!(c.state().is_empty());
    }

    #[test]
    fn test_pending_preview_survives_upload_start() {
        let mut c = Controller::new();
        select(&mut c, "a.png");
        let pending = c.begin_select(&png("b.png", 10)).unwrap();

        // bのプレビュー読み込み中にaを送信
        let upload = c.begin_upload().unwrap();
        assert_eq!(upload.file, "a.png");

        assert!(c.finish_select(pending, "b.png".to_string(), "data:b".to_string()));
        assert_eq!(c.state().selected_file.as_deref(), Some("b.png"));
        assert!(c.state().is_uploading);

        // aの結果はもう表示中のファイルのものではない
        assert!(!c.finish_upload(upload.generation, Ok("blob:a".to_string())));
        assert!(!c.state().is_uploading);
        assert!(c.state().result_uri.is_none());
        assert_eq!(c.drain_released(), vec!["blob:a".to_string()]);
        assert!(c.can_upload());
    }

    #[test]
    fn test_upload_result_before_pending_preview_is_replaced() {
        let mut c = Controller::new();
        select(&mut c, "a.png");
        let pending = c.begin_select(&png("b.png", 10)).unwrap();
        let upload = c.begin_upload().unwrap();

        assert!(c.finish_upload(upload.generation, Ok("blob:a".to_string())));
        assert_eq!(c.state().result_uri.as_deref(), Some("blob:a"));

        assert!(c.finish_select(pending, "b.png".to_string(), "data:b".to_string()));
        assert!(c.state().result_uri.is_none());
        assert_eq!(c.drain_released(), vec!["blob:a".to_string()]);
    }

    #[test]
    fn test_read_failure_reported_while_current() {
        let mut c = Controller::new();
        let ticket = c.begin_select(&png("photo.png", 10)).unwrap();
        assert!(c.fail_select(ticket, "Could not read the selected file."));
        assert_eq!(
            c.state().error_message.as_deref(),
            Some("Could not read the selected file.")
        );
        // 同じ選択の完了はもう反映しない
        assert!(!c.finish_select(ticket, "photo.png".to_string(), "data:x".to_string()));
    }

    #[test]
    fn test_read_failure_after_reset_is_ignored() {
        let mut c = Controller::new();
        let ticket = c.begin_select(&png("photo.png", 10)).unwrap();
        c.reset();
        assert!(!c.fail_select(ticket, "Could not read the selected file."));
        assert!(c.state().is_empty());
    }

    #[test]
    fn test_read_failure_of_superseded_selection_is_ignored() {
        let mut c = Controller::new();
        let first = c.begin_select(&png("first.png", 10)).unwrap();
        let second = c.begin_select(&png("second.png", 10)).unwrap();
        assert!(!c.fail_select(first, "Could not read the selected file."));
        assert!(c.state().error_message.is_none());
        assert!(c.finish_select(second, "second.png".to_string(), "data:b".to_string()));
    }

    #[test]
    fn test_pending_preview_survives_invalid_selection() {
        let mut c = Controller::new();
        let ticket = c.begin_select(&png("photo.png", 10)).unwrap();
        assert!(c.begin_select(&FileMeta::new("x.gif", "image/gif", 1)).is_err());
        assert!(c.finish_select(ticket, "photo.png".to_string(), "data:x".to_string()));
        assert!(c.state().error_message.is_none());
    }

    #[test]
    fn test_failed_upload_keeps_previous_result() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        let t = c.begin_upload().unwrap();
        assert!(c.finish_upload(t.generation, Ok("blob:one".to_string())));

        let t = c.begin_upload().unwrap();
        assert!(c.finish_upload(t.generation, Err(TransportError::Network("refused".to_string()))));
        assert_eq!(c.state().result_uri.as_deref(), Some("blob:one"));
        assert!(c.drain_released().is_empty());
    }

    #[test]
    fn test_second_success_releases_first_result() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        let t = c.begin_upload().unwrap();
        assert!(c.finish_upload(t.generation, Ok("blob:one".to_string())));
        let t = c.begin_upload().unwrap();
        assert!(c.finish_upload(t.generation, Ok("blob:two".to_string())));

        assert_eq!(c.state().result_uri.as_deref(), Some("blob:two"));
        assert_eq!(c.drain_released(), vec!["blob:one".to_string()]);
    }

    #[test]
    fn test_snapshot() {
        let mut c = Controller::new();
        select(&mut c, "photo.png");
        let snap = c.snapshot(|f| f.clone());
        assert_eq!(snap.phase, Phase::Ready);
        assert_eq!(snap.selected_file.as_deref(), Some("photo.png"));
        assert!(snap.has_preview);
        assert!(!snap.is_uploading);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["phase"], "ready");
        assert_eq!(json["selectedFile"], "photo.png");
    }
}
