//! 表示セクション

use serde::{Deserialize, Serialize};

/// 画面に表示されるセクション（常にひとつだけ表示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Upload,
    Preview,
    Loading,
    Result,
    Error,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Upload,
        Section::Preview,
        Section::Loading,
        Section::Result,
        Section::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Upload => "upload",
            Section::Preview => "preview",
            Section::Loading => "loading",
            Section::Result => "result",
            Section::Error => "error",
        }
    }

    /// `active` が表示中のとき、このセクションを表示するか
    pub fn is_visible_when(self, active: Section) -> bool {
        self == active
    }

    /// 全セクションの表示状態
    pub fn visibility(active: Section) -> [(Section, bool); 5] {
        Self::ALL.map(|section| (section, section.is_visible_when(active)))
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
