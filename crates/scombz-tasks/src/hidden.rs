use std::collections::HashSet;

/// Ordered, duplicate-free list of task ids the user chose to hide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenTasks {
    ids: Vec<String>,
}

impl HiddenTasks {
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        let mut hidden = Self::default();
        for id in ids {
            hidden.hide(id);
        }
        hidden
    }

    /// Add `id`. Returns false when it was already hidden.
    pub fn hide(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|h| h == id)
    }

    /// Drop ids that no longer name a live task, so the persisted list does
    /// not grow with expired tasks. Returns how many were dropped.
    pub fn reconcile<'a>(&mut self, live_ids: impl IntoIterator<Item = &'a str>) -> usize {
        let live: HashSet<&str> = live_ids.into_iter().collect();
        let before = self.ids.len();
        self.ids.retain(|id| live.contains(id.as_str()));
        before - self.ids.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiding_twice_keeps_one_entry() {
        let mut hidden = HiddenTasks::default();
        assert!(hidden.hide("a"));
        assert!(!hidden.hide("a"));
        assert_eq!(hidden.as_slice(), ["a".to_string()]);
    }

    #[test]
    fn new_dedupes_stored_list() {
        let hidden = HiddenTasks::new(["a", "b", "a"].map(String::from));
        assert_eq!(hidden.len(), 2);
    }

    #[test]
    fn reconcile_drops_stale_ids_only() {
        let mut hidden = HiddenTasks::new(["a", "gone", "b"].map(String::from));
        let dropped = hidden.reconcile(["a", "b", "c"]);
        assert_eq!(dropped, 1);
        assert_eq!(hidden.as_slice(), ["a".to_string(), "b".to_string()]);
    }
}
