//! The catalog: the fixed, statically declared set of named properties and
//! methods a server exposes.
//!
//! Entries live in an ordered slice owned by the host; the server borrows
//! it for its lifetime. Nothing is added, removed or reordered at runtime.
//! Lookup is a linear scan with exact, case-sensitive name matching,
//! filtered by entry kind.

mod entry;
mod storage;
mod types;

pub use entry::{Entry, Method, MethodThunk, Property, PropertyBinding};
pub use storage::{SharedCell, TextValue};
pub use types::ValueType;

pub struct Catalog<'a> {
    entries: &'a [Entry<'a>],
}

impl<'a> Catalog<'a> {
    pub const fn new(entries: &'a [Entry<'a>]) -> Self {
        Self { entries }
    }

    /// Entries in declaration order, for the meta manifest.
    pub fn entries(&self) -> &'a [Entry<'a>] {
        self.entries
    }

    pub fn find_property(&self, name: &str) -> Option<&'a Property<'a>> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Property(p) if p.name == name => Some(p),
            _ => None,
        })
    }

    pub fn find_method(&self, name: &str) -> Option<&'a Method<'a>> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Method(m) if m.name == name => Some(m),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ALTITUDE: SharedCell<i32> = SharedCell::new(430);
    static CITY: SharedCell<TextValue> = SharedCell::new(TextValue::new(20));

    fn weather() -> String {
        "sunny".to_string()
    }

    static ENTRIES: [Entry<'static>; 3] = [
        Entry::property("Altitude", PropertyBinding::Integer(&ALTITUDE)),
        Entry::property("City", PropertyBinding::Text(&CITY)),
        Entry::method("GetWeather", ValueType::Text, MethodThunk::Text(&weather)),
    ];

    #[test]
    fn lookup_filters_by_kind() {
        let catalog = Catalog::new(&ENTRIES);
        assert!(catalog.find_property("Altitude").is_some());
        assert!(catalog.find_method("Altitude").is_none());
        assert!(catalog.find_method("GetWeather").is_some());
        assert!(catalog.find_property("GetWeather").is_none());
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let catalog = Catalog::new(&ENTRIES);
        assert!(catalog.find_property("altitude").is_none());
        assert!(catalog.find_property("Alt").is_none());
    }

    #[test]
    fn entries_keep_declaration_order() {
        let catalog = Catalog::new(&ENTRIES);
        let names: Vec<&str> = catalog.entries().iter().map(Entry::name).collect();
        assert_eq!(names, ["Altitude", "City", "GetWeather"]);
    }
}
