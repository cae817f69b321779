//! Target mini-app platforms and their artifact extensions.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Ali,
    Wechat,
    Bytedance,
    Baidu,
}

impl Platform {
    /// Type tag, also used as the infix of platform-specific sources (`index.wechat.js`).
    pub fn type_tag(&self) -> &'static str {
        match self {
            Platform::Ali => "ali",
            Platform::Wechat => "wechat",
            Platform::Bytedance => "bytedance",
            Platform::Baidu => "baidu",
        }
    }

    /// Human readable name used to tag log output.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Ali => "Alibaba MiniApp",
            Platform::Wechat => "WeChat MiniProgram",
            Platform::Bytedance => "ByteDance MicroApp",
            Platform::Baidu => "Baidu SmartProgram",
        }
    }

    pub fn css_extension(&self) -> &'static str {
        match self {
            Platform::Ali => ".acss",
            Platform::Wechat => ".wxss",
            Platform::Bytedance => ".ttss",
            Platform::Baidu => ".css",
        }
    }

    pub fn template_extension(&self) -> &'static str {
        match self {
            Platform::Ali => ".axml",
            Platform::Wechat => ".wxml",
            Platform::Bytedance => ".ttml",
            Platform::Baidu => ".swan",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}
