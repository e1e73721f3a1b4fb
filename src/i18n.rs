//! User-facing strings for the CLI host.
//!
//! Each [`Language`] resolves to one fixed [`Messages`] record through an
//! exhaustive `match`, so adding a language or a message is a compile error
//! until every table is filled in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

/// Every string the CLI shows, for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub title: &'static str,
    pub processing: &'static str,
    pub zipping: &'static str,
    pub done: &'static str,
    pub saved_to: &'static str,
    pub error: &'static str,
    /// Contains `{cols}` and `{rows}` placeholders; use [`Messages::preview_info`].
    preview_info: &'static str,
    pub privacy: &'static str,
}

impl Messages {
    /// Grid summary line, e.g. "Preview showing 4 columns x 6 rows".
    pub fn preview_info(&self, cols: u32, rows: u32) -> String {
        self.preview_info
            .replace("{cols}", &cols.to_string())
            .replace("{rows}", &rows.to_string())
    }
}

const EN: Messages = Messages {
    title: "Sticker Grid Slicer",
    processing: "Processing...",
    zipping: "Packing archive...",
    done: "Done",
    saved_to: "Saved to",
    error: "An error occurred while processing the image.",
    preview_info: "Preview showing {cols} columns x {rows} rows",
    privacy: "All processing happens locally. Your images never leave this machine.",
};

const ZH: Messages = Messages {
    title: "表情包切图工具",
    processing: "处理中...",
    zipping: "打包中...",
    done: "完成",
    saved_to: "已保存到",
    error: "处理图片时发生错误。",
    preview_info: "预览显示 {cols} 列 x {rows} 行",
    privacy: "所有处理均在本地完成。您的图片不会离开这台设备。",
};

impl Language {
    pub fn messages(self) -> &'static Messages {
        match self {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_info_fills_placeholders() {
        assert_eq!(
            Language::En.messages().preview_info(4, 6),
            "Preview showing 4 columns x 6 rows"
        );
        assert_eq!(Language::Zh.messages().preview_info(3, 3), "预览显示 3 列 x 3 行");
    }

    #[test]
    fn languages_have_distinct_tables() {
        assert_ne!(Language::En.messages(), Language::Zh.messages());
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn language_parses_from_config_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            language: Language,
        }
        let w: Wrapper = toml::from_str(r#"language = "zh""#).unwrap();
        assert_eq!(w.language, Language::Zh);
    }
}
