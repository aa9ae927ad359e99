use serde::{Deserialize, Serialize};
use std::fmt;

/// The three kinds of usage record a scenario is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hardware,
    Software,
    Journey,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Hardware, Category::Software, Category::Journey];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Hardware => f.write_str("hardware"),
            Category::Software => f.write_str("software"),
            Category::Journey => f.write_str("journey"),
        }
    }
}
