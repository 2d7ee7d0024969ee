//! Shared crew memory
//!
//! An append-only log of named sections. Section order is first-use order,
//! entry order within a section is append order.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

/// A single immutable text entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    text: String,
}

impl MemoryEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A named group of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySection {
    name: String,
    entries: Vec<MemoryEntry>,
}

impl MemorySection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }
}

/// Ordered collection of uniquely named sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    sections: Vec<MemorySection>,
}

/// Handle through which agents and pipelines share one store
pub type SharedMemory = Arc<RwLock<MemoryStore>>;

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh store in a shared handle
    pub fn shared() -> SharedMemory {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Append `text` to `section_name`, creating the section on first use
    pub fn append(&mut self, section_name: &str, text: impl Into<String>) {
        let entry = MemoryEntry::new(text);
        match self.sections.iter_mut().find(|s| s.name == section_name) {
            Some(section) => section.entries.push(entry),
            None => self.sections.push(MemorySection {
                name: section_name.to_string(),
                entries: vec![entry],
            }),
        }
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Option<&MemorySection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Entry texts of a section, empty when the section does not exist
    pub fn entries(&self, name: &str) -> Vec<&str> {
        self.section(name)
            .map(|s| s.entries.iter().map(MemoryEntry::text).collect())
            .unwrap_or_default()
    }

    /// Sections in store order
    pub fn sections(&self) -> &[MemorySection] {
        &self.sections
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render as text: each section is its name, a blank line, then its
    /// entries one per line; sections are separated by a blank line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}\n\n", section.name)?;
            for (j, entry) in section.entries.iter().enumerate() {
                if j > 0 {
                    f.write_str("\n")?;
                }
                f.write_str(&entry.text)?;
            }
        }
        Ok(())
    }
}
