//! ビューコントローラ
//!
//! アップロード → プレビュー → 解析中 → 結果/エラー の状態遷移を持つ。
//! 非同期処理（デコード・送信）はホストが実行し、発行された `Ticket` と一緒に
//! 結果を戻す。リセットや新しい選択で世代が進むため、古い結果は捨てられる。

use crate::error::Result;
use crate::format::RenderedResult;
use crate::parser::{parse_upload_response, UploadOutcome};
use crate::section::Section;
use crate::transport::{Decoder, Transport};
use crate::types::{AnalysisResult, ImageFile, SelectedImage};
use crate::view::View;
use tracing::{debug, error, info, warn};

pub const INVALID_FILE_MESSAGE: &str = "Please select a valid image file.";
pub const PROCESSING_FAILED_MESSAGE: &str =
    "An error occurred while processing the image. Please try again.";
pub const DECODE_FAILED_MESSAGE: &str =
    "The selected image could not be read. Please try another file.";

/// 解析サービスのリクエスト上限に合わせる
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TicketKind {
    Decode,
    Upload,
}

/// 非同期処理1回分の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    kind: TicketKind,
}

/// ホストが実行すべき非同期処理
#[derive(Debug, Clone)]
pub struct Job<F> {
    pub ticket: Ticket,
    pub file: F,
}

pub struct ViewController<V: View, F: ImageFile> {
    view: V,
    section: Section,
    selected: Option<SelectedImage<F>>,
    pending: Option<Ticket>,
    generation: u64,
    result: Option<AnalysisResult>,
    error_message: Option<String>,
    max_upload_bytes: u64,
}

impl<V: View, F: ImageFile> ViewController<V, F> {
    pub fn new(view: V) -> Self {
        let mut controller = Self {
            view,
            section: Section::Upload,
            selected: None,
            pending: None,
            generation: 0,
            result: None,
            error_message: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        };
        controller.show(Section::Upload);
        controller
    }

    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn selected(&self) -> Option<&SelectedImage<F>> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// デコードまたは送信の完了待ちか
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// ファイル選択（クリック・ドロップ共通）
    ///
    /// 画像なら選択を置き換えてデコード処理を返す。アップロード画面以外では無視する。
    pub fn select_file(&mut self, input: Option<F>) -> Option<Job<F>> {
        let file = input?;

        if self.section != Section::Upload {
            debug!(section = %self.section, "file selection ignored");
            return None;
        }

        if !file.is_image() {
            info!(file = %file.file_name(), mime = %file.mime_type(), "rejected non-image file");
            self.selected = None;
            self.pending = None;
            self.generation += 1;
            self.fail(INVALID_FILE_MESSAGE.to_string());
            return None;
        }

        if file.size() > self.max_upload_bytes {
            info!(file = %file.file_name(), size = file.size(), "rejected oversized file");
            self.selected = None;
            self.pending = None;
            self.generation += 1;
            self.fail(too_large_message(self.max_upload_bytes));
            return None;
        }

        let ticket = self.issue(TicketKind::Decode);
        self.selected = Some(SelectedImage::new(file.clone()));
        debug!(file = %file.file_name(), generation = ticket.generation, "decoding selected file");
        Some(Job { ticket, file })
    }

    /// デコード完了
    ///
    /// 現在のチケットでなければ何もしない。戻り値は反映したかどうか。
    pub fn complete_decode(&mut self, ticket: Ticket, outcome: Result<String>) -> bool {
        if !self.accepts(ticket, TicketKind::Decode, Section::Upload) {
            return false;
        }
        self.pending = None;

        match outcome {
            Ok(data_url) => {
                if let Some(selected) = self.selected.as_mut() {
                    selected.preview = Some(data_url.clone());
                }
                self.view.set_preview(&data_url);
                self.show(Section::Preview);
            }
            Err(err) => {
                error!(error = %err, "failed to decode selected image");
                self.selected = None;
                self.fail(DECODE_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// 解析開始
    ///
    /// プレビュー表示中で画像が選択されているときだけ送信処理を返す。
    pub fn submit(&mut self) -> Option<Job<F>> {
        if self.section != Section::Preview {
            debug!(section = %self.section, "submit ignored");
            return None;
        }
        let file = self
            .selected
            .as_ref()
            .filter(|s| s.is_decoded())
            .map(|s| s.file.clone())?;

        let ticket = self.issue(TicketKind::Upload);
        self.show(Section::Loading);
        info!(file = %file.file_name(), generation = ticket.generation, "submitting image");
        Some(Job { ticket, file })
    }

    /// 送信完了
    ///
    /// `outcome` はレスポンスボディ、または通信エラー。
    pub fn complete_upload(&mut self, ticket: Ticket, outcome: Result<String>) -> bool {
        if !self.accepts(ticket, TicketKind::Upload, Section::Loading) {
            return false;
        }
        self.pending = None;

        let parsed = outcome.and_then(|body| parse_upload_response(&body));
        match parsed {
            Ok(UploadOutcome::Analysis(result)) => {
                info!(objects = result.object_count, "analysis complete");
                self.render(result);
            }
            Ok(UploadOutcome::Rejected(message)) => {
                warn!(message = %message, "analysis rejected by server");
                self.fail(message);
            }
            Err(err) => {
                error!(error = %err, "upload failed");
                self.fail(PROCESSING_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// アップロード画面に戻る
    ///
    /// 処理中のデコード・送信は無効になる。
    pub fn reset(&mut self) {
        if self.pending.take().is_some() {
            debug!(generation = self.generation, "discarding in-flight work");
        }
        self.generation += 1;
        self.selected = None;
        self.result = None;
        self.error_message = None;
        self.view.set_preview("");
        self.view.clear_result();
        self.view.set_error_text("");
        self.view.clear_file_input();
        self.show(Section::Upload);
    }

    /// 選択からデコード完了までを実行
    pub async fn select_and_decode<D: Decoder<F>>(
        &mut self,
        input: Option<F>,
        decoder: &D,
    ) -> Section {
        if let Some(job) = self.select_file(input) {
            let outcome = decoder.decode(&job.file).await;
            self.complete_decode(job.ticket, outcome);
        }
        self.section
    }

    /// 送信からレスポンス反映までを実行
    pub async fn submit_with<T: Transport<F>>(&mut self, transport: &T) -> Section {
        if let Some(job) = self.submit() {
            let outcome = transport.upload(&job.file).await;
            self.complete_upload(job.ticket, outcome);
        }
        self.section
    }

    fn issue(&mut self, kind: TicketKind) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
            kind,
        };
        self.pending = Some(ticket);
        ticket
    }

    fn accepts(&self, ticket: Ticket, kind: TicketKind, section: Section) -> bool {
        let current = self.pending == Some(ticket)
            && ticket.kind == kind
            && ticket.generation == self.generation
            && self.section == section;
        if !current {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                section = %self.section,
                "stale completion discarded"
            );
        }
        current
    }

    fn render(&mut self, result: AnalysisResult) {
        let rendered = RenderedResult::from_result(&result);
        self.view.render_result(&rendered);
        self.result = Some(result);
        self.error_message = None;
        self.show(Section::Result);
    }

    fn fail(&mut self, message: String) {
        self.view.set_error_text(&message);
        self.error_message = Some(message);
        self.show(Section::Error);
    }

    fn show(&mut self, section: Section) {
        self.section = section;
        for (s, visible) in Section::visibility(section) {
            self.view.set_section_visible(s, visible);
        }
    }
}

fn too_large_message(limit: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    let limit = if limit >= MIB {
        format!("{} MB", format_size(limit, MIB))
    } else if limit >= KIB {
        format!("{} KB", format_size(limit, KIB))
    } else {
        format!("{} bytes", limit)
    };
    format!("The selected image is too large. The limit is {}.", limit)
}

/// 小数1桁まで（上限を超える値に丸めない）
fn format_size(limit: u64, unit: u64) -> String {
    let tenths = limit * 10 / unit;
    if tenths % 10 == 0 {
        (tenths / 10).to_string()
    } else {
        format!("{}.{}", tenths / 10, tenths % 10)
    }
}
