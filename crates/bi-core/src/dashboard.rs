//! Ordered dashboard of pinned items

/// Items that can be pinned to a dashboard
pub trait DashboardItem {
    fn item_id(&self) -> &str;
}

/// Pinned items in display order
#[derive(Debug, Clone)]
pub struct DashboardLayout<T> {
    items: Vec<T>,
}

impl<T> Default for DashboardLayout<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: DashboardItem> DashboardLayout<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin an item at the end. An item with the same id is replaced in place.
    pub fn pin(&mut self, item: T) {
        match self.position(item.item_id()) {
            Some(idx) => self.items[idx] = item,
            None => self.items.push(item),
        }
    }

    pub fn unpin(&mut self, id: &str) -> Option<T> {
        let idx = self.position(id)?;
        Some(self.items.remove(idx))
    }

    /// Drag-and-drop reorder: remove at `from`, insert at `to`
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() {
            tracing::debug!("Ignoring reorder {} -> {} ({} items)", from, to, self.items.len());
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    /// Move an item by `delta` slots, clamped to the ends
    pub fn move_by(&mut self, id: &str, delta: isize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let last = self.items.len() as isize - 1;
        let to = (from as isize + delta).clamp(0, last) as usize;
        if to == from {
            return false;
        }
        self.reorder(from, to)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.item_id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.item_id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.item_id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Ids in display order
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(DashboardItem::item_id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
