//! Arena of fields with parent indexes.
//!
//! Fields refer to their parent by [`FieldId`], never by reference, so nesting
//! stays acyclic and the whole set can be cloned or serialized freely.

use serde::Serialize;

use crate::errors::{FormError, Result};
use crate::field::Field;

/// Index of a field inside a [`FieldSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Removed fields leave an empty slot behind so every other [`FieldId`]
/// keeps pointing at the same field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<Option<Field>>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field and returns its index. Any parent the field carried from
    /// another set is dropped.
    pub fn insert(&mut self, mut field: Field) -> FieldId {
        field.set_parent(None);
        let id = FieldId(self.fields.len());
        self.fields.push(Some(field));
        id
    }

    /// Puts `field` in the slot at `id`, keeping the slot's place in the
    /// tree. The old field's descendants are removed with it.
    pub fn replace(&mut self, id: FieldId, mut field: Field) -> Result<Field> {
        let parent = self.checked(id)?.parent();
        for descendant in self.descendants(id) {
            self.fields[descendant.0] = None;
        }
        field.set_parent(parent);
        let slot = self.fields.get_mut(id.0).and_then(Option::as_mut);
        let Some(slot) = slot else {
            return Err(FormError::UnknownField {
                name: format!("#{}", id.0),
            });
        };
        Ok(std::mem::replace(slot, field))
    }

    /// Number of live fields.
    pub fn len(&self) -> usize {
        self.fields.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.get_mut(id.0)?.as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(index, field)| Some((FieldId(index), field.as_ref()?)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FieldId, &mut Field)> {
        self.fields
            .iter_mut()
            .enumerate()
            .filter_map(|(index, field)| Some((FieldId(index), field.as_mut()?)))
    }

    /// Every field nested under `ancestor`, at any depth.
    pub fn descendants(&self, ancestor: FieldId) -> Vec<FieldId> {
        self.iter()
            .map(|(id, _)| id)
            .filter(|&id| {
                let mut cursor = self.parent(id);
                while let Some(parent) = cursor {
                    if parent == ancestor {
                        return true;
                    }
                    cursor = self.parent(parent);
                }
                false
            })
            .collect()
    }

    /// Direct children of `parent`, in insertion order.
    pub fn children(&self, parent: FieldId) -> impl Iterator<Item = FieldId> + '_ {
        self.iter()
            .filter(move |(_, field)| field.parent() == Some(parent))
            .map(|(id, _)| id)
    }

    pub fn parent(&self, id: FieldId) -> Option<FieldId> {
        self.get(id)?.parent()
    }

    /// Nests `child` under `parent`, or detaches it with `None`.
    ///
    /// Nothing is recomputed: an element id memoized before the move is kept.
    pub fn set_parent(&mut self, child: FieldId, parent: Option<FieldId>) -> Result<()> {
        let child_name = self.checked(child)?.name().to_string();
        if let Some(parent) = parent {
            self.checked(parent)?;
            let mut cursor = Some(parent);
            while let Some(ancestor) = cursor {
                if ancestor == child {
                    return Err(FormError::ParentCycle { field: child_name });
                }
                cursor = self.parent(ancestor);
            }
        }
        if let Some(field) = self.get_mut(child) {
            field.set_parent(parent);
        }
        Ok(())
    }

    /// Bracket-nested name: `name`, or `parent_fullname[name]`.
    ///
    /// A parent whose fullname is empty counts as no parent. Pure; never
    /// cached.
    pub fn fullname(&self, id: FieldId) -> Option<String> {
        let field = self.get(id)?;
        let parent_fullname = field.parent().and_then(|parent| self.fullname(parent));
        Some(match parent_fullname {
            Some(parent) if !parent.is_empty() => format!("{parent}[{}]", field.name()),
            _ => field.name().to_string(),
        })
    }

    /// The field's `id` option, synthesizing and storing it on first use.
    ///
    /// The synthesized id is `name`, or `parent_id_name` when the parent's
    /// id resolves (which memoizes the parent's id as well).
    pub fn element_id(&mut self, id: FieldId) -> Option<String> {
        let field = self.get(id)?;
        if let Some(existing) = field.id_option() {
            return Some(existing.to_string());
        }
        let name = field.name().to_string();
        let parent = field.parent();

        let parent_id = parent.and_then(|parent| self.element_id(parent));
        let element_id = match parent_id {
            Some(parent_id) if !parent_id.is_empty() => format!("{parent_id}_{name}"),
            _ => name,
        };

        if let Some(field) = self.get_mut(id) {
            field.set_option("id", element_id.clone());
        }
        Some(element_id)
    }

    /// Index of the first field whose fullname equals `fullname`.
    pub fn find_by_fullname(&self, fullname: &str) -> Option<FieldId> {
        self.iter()
            .map(|(id, _)| id)
            .find(|id| self.fullname(*id).as_deref() == Some(fullname))
    }

    fn checked(&self, id: FieldId) -> Result<&Field> {
        self.get(id).ok_or_else(|| FormError::UnknownField {
            name: format!("#{}", id.0),
        })
    }
}
