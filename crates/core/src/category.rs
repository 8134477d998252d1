use std::collections::HashMap;
use std::sync::OnceLock;

use crate::CategoryId;

/// Restaurant categories in id order; the first entry has id 1.
pub const STORE_CATEGORIES: [&str; 74] = [
    "afghan", "african", "alcohol", "alcohol-plus-food", "american", "argentine", "asian",
    "barbecue", "belgian", "brazilian", "breakfast", "british", "bubble-tea", "burger",
    "burmese", "cafe", "cajun", "caribbean", "catering", "cheese", "chinese", "chocolate",
    "comfort-food", "convenience-store", "dessert", "dim-sum", "ethiopian", "european", "fast",
    "filipino", "french", "gastropub", "german", "gluten-free", "greek", "hawaiian", "indian",
    "indonesian", "irish", "italian", "japanese", "korean", "kosher", "latin-american",
    "lebanese", "malaysian", "mediterranean", "mexican", "middle-eastern", "moroccan",
    "nepalese", "other", "pakistani", "pasta", "persian", "peruvian", "pizza", "russian",
    "salad", "sandwich", "seafood", "singaporean", "smoothie", "soup", "southern", "spanish",
    "steak", "sushi", "tapas", "thai", "turkish", "vegan", "vegetarian", "vietnamese",
];

/// Read-only label → id lookup, built on first use.
pub struct CategoryIndex {
    ids: HashMap<&'static str, CategoryId>,
}

impl CategoryIndex {
    pub fn global() -> &'static CategoryIndex {
        static INDEX: OnceLock<CategoryIndex> = OnceLock::new();
        INDEX.get_or_init(|| CategoryIndex {
            ids: STORE_CATEGORIES
                .iter()
                .enumerate()
                .map(|(i, label)| (*label, i as CategoryId + 1))
                .collect(),
        })
    }

    /// Unknown labels map to 0.
    pub fn id(&self, label: &str) -> CategoryId {
        self.ids.get(label).copied().unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.ids.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

pub fn category_id(label: &str) -> CategoryId {
    CategoryIndex::global().id(label)
}
