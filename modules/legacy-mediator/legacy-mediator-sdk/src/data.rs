//! Hierarchical record model.
//!
//! A record is an ordered tree of named nodes. Leaves are [`DataAtomic`]
//! values, inner nodes are [`DataGroup`]s. Siblings may share a name; when
//! they repeat, each carries a zero-based repeat id that preserves insertion
//! order among the same-named siblings. Consumers must not assume that a
//! name alone identifies a child.

/// Name of the atomic holding the type of a linked record.
pub const LINKED_RECORD_TYPE: &str = "linkedRecordType";
/// Name of the atomic holding the id of a linked record.
pub const LINKED_RECORD_ID: &str = "linkedRecordId";

/// A named leaf value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAtomic {
    name_in_data: String,
    value: String,
    repeat_id: Option<String>,
}

impl DataAtomic {
    #[must_use]
    pub fn new(name_in_data: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name_in_data: name_in_data.into(),
            value: value.into(),
            repeat_id: None,
        }
    }

    #[must_use]
    pub fn with_repeat_id(mut self, repeat_id: impl Into<String>) -> Self {
        self.repeat_id = Some(repeat_id.into());
        self
    }

    #[must_use]
    pub fn name_in_data(&self) -> &str {
        &self.name_in_data
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn repeat_id(&self) -> Option<&str> {
        self.repeat_id.as_deref()
    }
}

/// A named group of ordered child nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataGroup {
    name_in_data: String,
    repeat_id: Option<String>,
    children: Vec<DataElement>,
}

/// Any node of a hierarchical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataElement {
    Atomic(DataAtomic),
    Group(DataGroup),
}

impl DataElement {
    #[must_use]
    pub fn name_in_data(&self) -> &str {
        match self {
            Self::Atomic(atomic) => atomic.name_in_data(),
            Self::Group(group) => group.name_in_data(),
        }
    }

    #[must_use]
    pub fn repeat_id(&self) -> Option<&str> {
        match self {
            Self::Atomic(atomic) => atomic.repeat_id(),
            Self::Group(group) => group.repeat_id(),
        }
    }
}

impl From<DataAtomic> for DataElement {
    fn from(atomic: DataAtomic) -> Self {
        Self::Atomic(atomic)
    }
}

impl From<DataGroup> for DataElement {
    fn from(group: DataGroup) -> Self {
        Self::Group(group)
    }
}

impl DataGroup {
    #[must_use]
    pub fn new(name_in_data: impl Into<String>) -> Self {
        Self {
            name_in_data: name_in_data.into(),
            repeat_id: None,
            children: Vec::new(),
        }
    }

    /// Build a link group: `<name>` holding `linkedRecordType` and `linkedRecordId`.
    #[must_use]
    pub fn link(
        name_in_data: impl Into<String>,
        linked_record_type: impl Into<String>,
        linked_record_id: impl Into<String>,
    ) -> Self {
        Self::new(name_in_data)
            .with_atomic(LINKED_RECORD_TYPE, linked_record_type)
            .with_atomic(LINKED_RECORD_ID, linked_record_id)
    }

    #[must_use]
    pub fn with_atomic(mut self, name_in_data: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_atomic(name_in_data, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<DataElement>) -> Self {
        self.add_child(child);
        self
    }

    #[must_use]
    pub fn with_repeat_id(mut self, repeat_id: impl Into<String>) -> Self {
        self.set_repeat_id(repeat_id);
        self
    }

    #[must_use]
    pub fn name_in_data(&self) -> &str {
        &self.name_in_data
    }

    #[must_use]
    pub fn repeat_id(&self) -> Option<&str> {
        self.repeat_id.as_deref()
    }

    pub fn set_repeat_id(&mut self, repeat_id: impl Into<String>) {
        self.repeat_id = Some(repeat_id.into());
    }

    pub fn add_atomic(&mut self, name_in_data: impl Into<String>, value: impl Into<String>) {
        self.children
            .push(DataElement::Atomic(DataAtomic::new(name_in_data, value)));
    }

    /// Append an atomic only when a value is present.
    pub fn add_atomic_if_present(&mut self, name_in_data: &str, value: Option<String>) {
        if let Some(value) = value {
            self.add_atomic(name_in_data, value);
        }
    }

    pub fn add_child(&mut self, child: impl Into<DataElement>) {
        self.children.push(child.into());
    }

    /// Append groups as repeating siblings.
    ///
    /// Repeat ids continue from the number of same-named groups already
    /// present, so several calls keep a single zero-based sequence.
    pub fn add_repeating_groups(&mut self, groups: impl IntoIterator<Item = DataGroup>) {
        for mut group in groups {
            let next = self.groups_named(group.name_in_data()).count();
            group.set_repeat_id(next.to_string());
            self.children.push(DataElement::Group(group));
        }
    }

    #[must_use]
    pub fn children(&self) -> &[DataElement] {
        &self.children
    }

    #[must_use]
    pub fn contains_child(&self, name_in_data: &str) -> bool {
        self.children
            .iter()
            .any(|child| child.name_in_data() == name_in_data)
    }

    #[must_use]
    pub fn first_atomic_value(&self, name_in_data: &str) -> Option<&str> {
        self.atomics_named(name_in_data)
            .next()
            .map(DataAtomic::value)
    }

    #[must_use]
    pub fn first_group(&self, name_in_data: &str) -> Option<&DataGroup> {
        self.groups_named(name_in_data).next()
    }

    pub fn atomics_named<'a>(
        &'a self,
        name_in_data: &str,
    ) -> impl Iterator<Item = &'a DataAtomic> {
        self.children.iter().filter_map(move |child| match child {
            DataElement::Atomic(atomic) if atomic.name_in_data() == name_in_data => Some(atomic),
            _ => None,
        })
    }

    pub fn groups_named<'a>(
        &'a self,
        name_in_data: &str,
    ) -> impl Iterator<Item = &'a DataGroup> {
        self.children.iter().filter_map(move |child| match child {
            DataElement::Group(group) if group.name_in_data() == name_in_data => Some(group),
            _ => None,
        })
    }

    /// Remove every child with the given name, returning how many were removed.
    pub fn remove_children(&mut self, name_in_data: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|child| child.name_in_data() != name_in_data);
        before - self.children.len()
    }

    /// The `linkedRecordId` of a link group, if this group is one.
    #[must_use]
    pub fn linked_record_id(&self) -> Option<&str> {
        self.first_atomic_value(LINKED_RECORD_ID)
    }

    #[must_use]
    pub fn linked_record_type(&self) -> Option<&str> {
        self.first_atomic_value(LINKED_RECORD_TYPE)
    }
}
