use serde::{Deserialize, Serialize};

/// Longest category code or name accepted, in characters.
pub const MAX_CATEGORY_FIELD_CHARS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub code: String,
    pub name: String,
}

/// Category data accepted by the administrative create operation. The store
/// assigns the identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCategory {
    pub code: String,
    pub name: String,
}
