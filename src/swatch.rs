//! # 色板集合
//!
//! 有序、去重的已记录颜色。去重基于序列化后的字符串：同一像素在不同模式下
//! 记录会得到不同字符串，因此可以共存。重新加载图片时色板保持不变。

use serde::Serialize;

use crate::color::{ColorValue, Mode};

/// 一条色板记录：记录时的字符串 + 对应的颜色值。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swatch {
    pub text: String,
    #[serde(skip)]
    pub color: ColorValue,
}

#[derive(Debug, Clone, Default)]
pub struct SwatchSet {
    items: Vec<Swatch>,
}

impl SwatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条记录；已存在时不做任何改变并返回 `false`。
    pub fn add(&mut self, text: impl Into<String>, color: ColorValue) -> bool {
        let text = text.into();
        if self.contains(&text) {
            log::debug!("🎨 色板已包含 {}，忽略", text);
            return false;
        }
        log::debug!("🎨 新增色板: {}", text);
        self.items.push(Swatch { text, color });
        true
    }

    /// 删除记录；不存在时返回 `false`。
    pub fn remove(&mut self, text: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|swatch| swatch.text != text);
        let removed = self.items.len() != before;
        if removed {
            log::debug!("🗑️ 移除色板: {}", text);
        }
        removed
    }

    pub fn contains(&self, text: &str) -> bool {
        self.items.iter().any(|swatch| swatch.text == text)
    }

    /// 按插入顺序列出。
    pub fn list(&self) -> &[Swatch] {
        &self.items
    }

    pub fn texts(&self) -> Vec<&str> {
        self.items.iter().map(|swatch| swatch.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 以当前模式重新序列化全部记录，输出 JSON 字符串数组。
    ///
    /// 记录字符串无法解析时退回到记录时保存的颜色值。
    pub fn export_json(&self, mode: Mode, precision: usize) -> serde_json::Result<String> {
        let rendered: Vec<String> = self
            .items
            .iter()
            .map(|swatch| {
                let color = swatch.text.parse::<ColorValue>().unwrap_or_else(|err| {
                    log::warn!("⚠️ 色板 {} 无法重新解析：{}", swatch.text, err);
                    swatch.color
                });
                color.serialize(mode, precision)
            })
            .collect();
        serde_json::to_string(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> ColorValue {
        ColorValue::srgb(1.0, 0.0, 0.0)
    }

    #[test]
    fn duplicate_add_is_noop() {
        let mut set = SwatchSet::new();
        assert!(set.add("#ff0000", red()));
        assert!(!set.add("#ff0000", red()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn same_color_in_different_modes_coexists() {
        let mut set = SwatchSet::new();
        set.add(red().serialize(Mode::Hex, 4), red());
        set.add(red().serialize(Mode::Srgb, 4), red());
        assert_eq!(set.texts(), vec!["#ff0000", "rgb(100% 0% 0%)"]);
    }

    #[test]
    fn removing_non_member_changes_nothing() {
        let mut set = SwatchSet::new();
        set.add("#ff0000", red());
        assert!(!set.remove("#00ff00"));
        assert_eq!(set.texts(), vec!["#ff0000"]);
    }

    #[test]
    fn remove_keeps_insertion_order_of_rest() {
        let mut set = SwatchSet::new();
        set.add("#ff0000", red());
        set.add("#00ff00", ColorValue::srgb(0.0, 1.0, 0.0));
        set.add("#0000ff", ColorValue::srgb(0.0, 0.0, 1.0));

        assert!(set.remove("#00ff00"));
        assert_eq!(set.texts(), vec!["#ff0000", "#0000ff"]);
        assert!(!set.contains("#00ff00"));
    }

    #[test]
    fn export_reserializes_in_current_mode() {
        let mut set = SwatchSet::new();
        set.add("#ff0000", red());
        set.add("rgb(0% 100% 0%)", ColorValue::srgb(0.0, 1.0, 0.0));

        let json = set.export_json(Mode::Hex, 4).expect("export should succeed");
        assert_eq!(json, r##"["#ff0000","#00ff00"]"##);
    }

    #[test]
    fn export_of_empty_set_is_empty_array() {
        assert_eq!(SwatchSet::new().export_json(Mode::Lab, 4).expect("export"), "[]");
    }
}
