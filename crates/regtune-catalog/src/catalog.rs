//! Ordered in-memory collection of items

use crate::model::{Item, ItemClass};
use crate::{Error, Result};

/// All loaded items, in load order.
///
/// Titles are not required to be unique. Lookups by title return the
/// first match, which is also how profiles resolve them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.iter_mut()
    }

    pub fn get(&self, title: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.title() == title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.title() == title)
    }

    pub fn by_class(&self, class: ItemClass) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |item| item.class() == class)
    }

    /// Items matching every keyword in `query`, in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Item> {
        self.items.iter().filter(|item| item.matches(query)).collect()
    }

    pub fn count_selected(&self) -> usize {
        self.items.iter().filter(|item| item.is_selected()).count()
    }

    /// Toggle an item on behalf of the user. Locked items refuse.
    pub fn set_selected(&mut self, title: &str, selected: bool) -> Result<()> {
        let item = self.get_mut(title).ok_or_else(|| Error::ItemNotFound {
            title: title.to_string(),
        })?;
        if item.is_locked() {
            return Err(Error::ItemLocked {
                title: title.to_string(),
            });
        }
        item.set_selected(selected);
        Ok(())
    }
}

impl FromIterator<Item> for Catalog {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Catalog {
        Catalog::from_items(vec![
            Item::new("Show file extensions", ItemClass::Normal, "Explorer")
                .with_tags("extension"),
            Item::new("Disable SysMain", ItemClass::Normal, "Services"),
            Item::new("Classic context menu", ItemClass::Legacy, "Explorer"),
        ])
    }

    #[test]
    fn test_get_returns_first_match() {
        let mut catalog = sample();
        catalog.push(Item::new("Disable SysMain", ItemClass::Script, "Duplicate"));
        assert_eq!(catalog.get("Disable SysMain").unwrap().category(), "Services");
        assert!(catalog.get("disable sysmain").is_none());
    }

    #[test]
    fn test_by_class() {
        let catalog = sample();
        assert_eq!(catalog.by_class(ItemClass::Normal).count(), 2);
        assert_eq!(catalog.by_class(ItemClass::Legacy).count(), 1);
        assert_eq!(catalog.by_class(ItemClass::Script).count(), 0);
    }

    #[test]
    fn test_search() {
        let catalog = sample();
        let titles: Vec<_> = catalog.search("explorer").iter().map(|i| i.title()).collect();
        assert_eq!(titles, vec!["Show file extensions", "Classic context menu"]);
        assert_eq!(catalog.search("").len(), 3);
        assert!(catalog.search("nothing-here").is_empty());
    }

    #[test]
    fn test_set_selected() {
        let mut catalog = sample();
        catalog.set_selected("Disable SysMain", true).unwrap();
        assert_eq!(catalog.count_selected(), 1);
        assert!(catalog.get("Disable SysMain").unwrap().is_selected());
    }

    #[test]
    fn test_set_selected_rejects_locked_and_missing() {
        let mut catalog = sample();
        assert!(matches!(
            catalog.set_selected("Classic context menu", true),
            Err(Error::ItemLocked { .. })
        ));
        assert!(matches!(
            catalog.set_selected("Nope", true),
            Err(Error::ItemNotFound { .. })
        ));
        assert_eq!(catalog.count_selected(), 0);
    }
}
