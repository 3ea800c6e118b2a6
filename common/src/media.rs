//! 受付可能なドキュメント形式
//!
//! 判定は申告されたMIMEタイプ（または拡張子）のみで行い、中身は見ない。
//! 解析サービス側で再検証されることが前提。

use serde::{Deserialize, Serialize};

/// 対応ドキュメント形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Pdf,
    Jpeg,
    Png,
}

/// 拡張子 → 形式
const EXTENSIONS: &[(&str, MediaType)] = &[
    ("pdf", MediaType::Pdf),
    ("jpg", MediaType::Jpeg),
    ("jpeg", MediaType::Jpeg),
    ("png", MediaType::Png),
];

impl MediaType {
    /// 申告MIMEタイプから判定
    ///
    /// `image/jpg` は旧アップロードフォームが送っていた別名として受け付ける。
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(MediaType::Pdf),
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            _ => None,
        }
    }

    /// 拡張子から判定（大文字小文字は区別しない）
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, media)| *media)
    }

    /// 送信時に使う正規MIMEタイプ
    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_mime())
    }
}
