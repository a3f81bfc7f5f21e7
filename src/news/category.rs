//! Category table and the selection rules layered over it.
//!
//! The selection is a flat set of ids, but the settings view renders it as
//! tri-state checkboxes: `"general"` stands for "every category", and the
//! rules below keep the two representations from drifting apart.

use std::collections::BTreeSet;

/// Id of the meta-category meaning "all concrete categories".
pub const GENERAL: &str = "general";

/// A news topic with a stable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub display_name: &'static str,
}

/// Every category the news source publishes, meta-category first.
pub const CATEGORIES: &[Category] = &[
    Category {
        id: GENERAL,
        display_name: "All Categories",
    },
    Category {
        id: "technology",
        display_name: "Technology",
    },
    Category {
        id: "business",
        display_name: "Business",
    },
    Category {
        id: "entertainment",
        display_name: "Entertainment",
    },
    Category {
        id: "health",
        display_name: "Health",
    },
    Category {
        id: "science",
        display_name: "Science",
    },
    Category {
        id: "sports",
        display_name: "Sports",
    },
];

/// Look up a category by id.
pub fn find_category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Concrete (non-general) categories in table order.
pub fn concrete_categories() -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(|c| c.id != GENERAL)
}

// ============================================================================
// CategorySelection
// ============================================================================

/// The set of selected category ids.
///
/// Construct through [`CategorySelection::from_stored`] so the "never empty"
/// rule holds. Stored values are tolerated as-is: unknown ids and `"general"`
/// mixed with concrete ids survive normalization and are only dropped by
/// [`CategorySelection::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    ids: BTreeSet<String>,
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::general()
    }
}

impl CategorySelection {
    /// The default selection, `{"general"}`.
    pub fn general() -> Self {
        Self {
            ids: BTreeSet::from([GENERAL.to_string()]),
        }
    }

    /// Build a selection from a stored string list, normalizing empty to `{"general"}`.
    pub fn from_stored<I, S>(stored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: normalize(stored.into_iter().map(Into::into).collect()),
        }
    }

    /// Select every concrete category.
    pub fn all_concrete() -> Self {
        Self {
            ids: concrete_categories().map(|c| c.id.to_string()).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// True when the selection is exactly `{"general"}`.
    pub fn is_default(&self) -> bool {
        self.ids.len() == 1 && self.ids.contains(GENERAL)
    }

    /// True iff every concrete category id is present.
    pub fn is_all_selected(&self) -> bool {
        concrete_categories().all(|c| self.ids.contains(c.id))
    }

    /// Apply a click on `clicked` and return the resulting selection.
    ///
    /// Clicking `"general"` flips between select-all and the default. Clicking
    /// a concrete id while in the default starts a fresh selection with only
    /// that id. The result never stores `"general"` next to concrete ids and
    /// is never empty.
    pub fn toggle(&self, clicked: &str) -> Self {
        if clicked == GENERAL {
            return if self.is_all_selected() {
                Self::general()
            } else {
                Self::all_concrete()
            };
        }

        if find_category(clicked).is_none() {
            tracing::debug!(category = %clicked, "Ignoring toggle of unknown category");
            return self.clone();
        }

        let mut working = if self.is_default() {
            BTreeSet::new()
        } else {
            self.ids.clone()
        };

        if !working.remove(clicked) {
            working.insert(clicked.to_string());
        }
        working.remove(GENERAL);

        Self {
            ids: normalize(working),
        }
    }

    /// Checkbox state of `category` in the settings view.
    pub fn checkbox_state(&self, category: &str) -> bool {
        if category == GENERAL {
            return self.is_all_selected();
        }
        if self.ids.is_empty() || self.is_default() {
            return false;
        }
        self.ids.contains(category)
    }

    /// Known categories present in the selection, in table order.
    ///
    /// Unknown ids are dropped, so a stale stored selection can resolve to
    /// nothing even though the selection itself is non-empty.
    pub fn resolve(&self) -> Vec<&'static Category> {
        CATEGORIES
            .iter()
            .filter(|c| self.ids.contains(c.id))
            .collect()
    }

    /// Human-readable summary. The default and the full concrete set both
    /// read as "All categories".
    pub fn describe(&self) -> String {
        if self.is_default() || (self.is_all_selected() && !self.ids.contains(GENERAL)) {
            return "All categories".to_string();
        }
        let names: Vec<&str> = self.resolve().iter().map(|c| c.display_name).collect();
        if names.is_empty() {
            "No known categories".to_string()
        } else {
            names.join(", ")
        }
    }

    /// String list for the settings store.
    pub fn to_stored(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

/// `{"general"}` for an empty set, the input unchanged otherwise.
pub fn normalize(stored: BTreeSet<String>) -> BTreeSet<String> {
    if stored.is_empty() {
        BTreeSet::from([GENERAL.to_string()])
    } else {
        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sel(ids: &[&str]) -> CategorySelection {
        CategorySelection::from_stored(ids.iter().copied())
    }

    #[test]
    fn test_normalize_empty_is_general() {
        assert_eq!(
            normalize(BTreeSet::new()),
            BTreeSet::from([GENERAL.to_string()])
        );
        assert_eq!(sel(&[]), CategorySelection::general());
    }

    #[test]
    fn test_normalize_keeps_unknown_ids() {
        let selection = sel(&["weather"]);
        assert!(selection.contains("weather"));
        assert!(selection.resolve().is_empty());
    }

    #[test]
    fn test_toggle_general_selects_all_then_clears() {
        let all = CategorySelection::general().toggle(GENERAL);
        assert_eq!(all, CategorySelection::all_concrete());
        assert!(all.is_all_selected());
        assert!(!all.contains(GENERAL));

        let back = all.toggle(GENERAL);
        assert_eq!(back, CategorySelection::general());
    }

    #[test]
    fn test_toggle_concrete_from_default_starts_fresh() {
        let selection = CategorySelection::general().toggle("technology");
        assert_eq!(selection, sel(&["technology"]));
    }

    #[test]
    fn test_toggle_last_concrete_falls_back_to_general() {
        let selection = sel(&["technology"]).toggle("technology");
        assert_eq!(selection, CategorySelection::general());
    }

    #[test]
    fn test_toggle_strips_general_from_mixed_input() {
        let selection = sel(&["general", "technology"]).toggle("business");
        assert_eq!(selection, sel(&["business", "technology"]));
    }

    #[test]
    fn test_toggle_unknown_is_noop() {
        let selection = sel(&["business"]);
        assert_eq!(selection.toggle("weather"), selection);
    }

    #[test]
    fn test_checkbox_state_default() {
        let selection = CategorySelection::general();
        for category in CATEGORIES {
            assert!(
                !selection.checkbox_state(category.id),
                "{} should be unchecked in the default selection",
                category.id
            );
        }
    }

    #[test]
    fn test_checkbox_state_all_selected() {
        let selection = CategorySelection::all_concrete();
        for category in CATEGORIES {
            assert!(selection.checkbox_state(category.id));
        }
    }

    #[test]
    fn test_checkbox_state_mixed_stored_value() {
        let selection = sel(&["general", "technology"]);
        assert!(!selection.is_all_selected());
        assert!(!selection.checkbox_state(GENERAL));
        assert!(selection.checkbox_state("technology"));
        assert!(!selection.checkbox_state("business"));
    }

    #[test]
    fn test_resolve_table_order() {
        let selection = sel(&["sports", "business", "general"]);
        let ids: Vec<&str> = selection.resolve().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["general", "business", "sports"]);
    }

    #[test]
    fn test_describe() {
        assert_eq!(CategorySelection::general().describe(), "All categories");
        assert_eq!(CategorySelection::all_concrete().describe(), "All categories");
        assert_eq!(
            sel(&["science", "health"]).describe(),
            "Health, Science"
        );
        assert_eq!(sel(&["weather"]).describe(), "No known categories");
    }

    #[test]
    fn test_to_stored_roundtrips() {
        let selection = sel(&["technology", "business"]);
        assert_eq!(
            CategorySelection::from_stored(selection.to_stored()),
            selection
        );
    }
}
