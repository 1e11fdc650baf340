use std::collections::BTreeMap;

/// Numeric wwise id -> sound name, as listed in the `In Memory Audio` section of a soundbank table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    pub names: BTreeMap<String, String>,
}

impl TranslationTable {
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn extend(&mut self, other: TranslationTable) {
        self.names.extend(other.names);
    }
}

pub fn is_wwise_id(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
