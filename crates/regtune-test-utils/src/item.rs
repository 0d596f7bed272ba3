//! Terse item fixtures

use regtune_catalog::{CheckRule, Command, Item, ItemClass};

/// Builder for [`Item`] fixtures. Defaults to a normal item in "System".
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    item: Item,
}

impl ItemBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            item: Item::new(title, ItemClass::Normal, "System"),
        }
    }

    /// Start over with a different class. Resets everything but the title.
    pub fn class(self, class: ItemClass) -> Self {
        let category = self.item.category().to_string();
        Self {
            item: Item::new(self.item.title(), class, category),
        }
    }

    /// Start over with a different category. Resets everything but the
    /// title and class.
    pub fn category(self, category: &str) -> Self {
        Self {
            item: Item::new(self.item.title(), self.item.class(), category),
        }
    }

    pub fn check(mut self, raw_path: &str, name: &str, data: &str) -> Self {
        self.item = self.item.with_check(CheckRule::new(raw_path, name, data));
        self
    }

    pub fn apply_dword(mut self, raw_path: &str, name: &str, data: &str) -> Self {
        self.item = self
            .item
            .with_apply(Command::write(raw_path, name, "REG_DWORD", data));
        self
    }

    pub fn apply_shell(mut self, line: &str) -> Self {
        self.item = self.item.with_apply(Command::shell(line));
        self
    }

    pub fn apply_delete(mut self, raw_path: &str, name: &str) -> Self {
        self.item = self.item.with_apply(Command::delete(raw_path, name));
        self
    }

    pub fn restore_dword(mut self, raw_path: &str, name: &str, data: &str) -> Self {
        self.item = self
            .item
            .with_restore(Command::write(raw_path, name, "REG_DWORD", data));
        self
    }

    pub fn restore_delete(mut self, raw_path: &str, name: &str) -> Self {
        self.item = self.item.with_restore(Command::delete(raw_path, name));
        self
    }

    pub fn restore_shell(mut self, line: &str) -> Self {
        self.item = self.item.with_restore(Command::shell(line));
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.item.set_selected(selected);
        self
    }

    pub fn build(self) -> Item {
        self.item
    }
}
