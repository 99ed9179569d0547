//! # Categorize Module
//!
//! Maps document extensions to the category folder they are batched under.

use serde::{Deserialize, Serialize};

/// Coarse document classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Document,
    Spreadsheet,
    Presentation,
    Text,
    Web,
    Code,
    Archive,
    Other,
}

/// Extension table: every extension the documents mode picks up.
const CATEGORY_TABLE: &[(&str, Category)] = &[
    ("doc", Category::Document),
    ("docx", Category::Document),
    ("odt", Category::Document),
    ("pages", Category::Document),
    ("pdf", Category::Document),
    ("xls", Category::Spreadsheet),
    ("xlsx", Category::Spreadsheet),
    ("xlsm", Category::Spreadsheet),
    ("ods", Category::Spreadsheet),
    ("numbers", Category::Spreadsheet),
    ("csv", Category::Spreadsheet),
    ("ppt", Category::Presentation),
    ("pptx", Category::Presentation),
    ("key", Category::Presentation),
    ("keynote", Category::Presentation),
    ("odp", Category::Presentation),
    ("txt", Category::Text),
    ("md", Category::Text),
    ("rtf", Category::Text),
    ("html", Category::Web),
    ("htm", Category::Web),
    ("mht", Category::Web),
    ("url", Category::Web),
    ("webloc", Category::Web),
    ("py", Category::Code),
    ("js", Category::Code),
    ("java", Category::Code),
    ("cpp", Category::Code),
    ("c", Category::Code),
    ("h", Category::Code),
    ("css", Category::Code),
    ("php", Category::Code),
    ("rb", Category::Code),
    ("swift", Category::Code),
    ("go", Category::Code),
    ("rs", Category::Code),
    ("json", Category::Code),
    ("xml", Category::Code),
    ("yaml", Category::Code),
    ("yml", Category::Code),
    ("ini", Category::Code),
    ("conf", Category::Code),
    ("env", Category::Code),
    ("sql", Category::Code),
    ("zip", Category::Archive),
    ("rar", Category::Archive),
    ("7z", Category::Archive),
    ("tar", Category::Archive),
    ("gz", Category::Archive),
    ("bz2", Category::Archive),
];

impl Category {
    /// Folder name used under the destination root
    pub fn label(&self) -> &'static str {
        match self {
            Category::Document => "document",
            Category::Spreadsheet => "spreadsheet",
            Category::Presentation => "presentation",
            Category::Text => "text",
            Category::Web => "web",
            Category::Code => "code",
            Category::Archive => "archive",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category for an extension. Case and a leading dot are ignored;
/// anything not in the table is `Other`.
pub fn category(extension: &str) -> Category {
    let ext = extension.trim_start_matches('.').to_lowercase();
    CATEGORY_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}

/// Whether the documents mode handles this extension at all
pub fn is_document_extension(extension: &str) -> bool {
    let ext = extension.trim_start_matches('.').to_lowercase();
    CATEGORY_TABLE.iter().any(|(known, _)| *known == ext)
}
