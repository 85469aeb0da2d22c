//! The custom layout editor: an ordered, bounded list of layout objects with
//! add / remove / move / update operations for a host form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::layout::{LayoutKind, LayoutObject, MAX_LAYOUT_OBJECTS};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward index 0.
    Up,
    /// Toward the end of the list.
    Down,
}

#[derive(Debug, Clone)]
pub struct LayoutEditor {
    objects: Vec<LayoutObject>,
    /// Collapsed/expanded row state. UI-only, never persisted.
    expanded: Vec<bool>,
    capacity: usize,
}

impl Default for LayoutEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEditor {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LAYOUT_OBJECTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::new(),
            expanded: Vec::new(),
            capacity,
        }
    }

    /// Load a persisted layout. Anything past the capacity is dropped.
    pub fn from_objects(mut objects: Vec<LayoutObject>) -> Self {
        if objects.len() > MAX_LAYOUT_OBJECTS {
            warn!(
                len = objects.len(),
                max = MAX_LAYOUT_OBJECTS,
                "layout exceeds object limit, truncating"
            );
            objects.truncate(MAX_LAYOUT_OBJECTS);
        }
        let expanded = vec![false; objects.len()];
        Self {
            objects,
            expanded,
            capacity: MAX_LAYOUT_OBJECTS,
        }
    }

    pub fn objects(&self) -> &[LayoutObject] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<LayoutObject> {
        self.objects
    }

    pub fn get(&self, index: usize) -> Option<&LayoutObject> {
        self.objects.get(index)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.objects.len() >= self.capacity
    }

    /// Append a default object of `kind`. Returns its index, or `None` when
    /// the layout is already full.
    pub fn add(&mut self, kind: LayoutKind) -> Option<usize> {
        let z_index = self.objects.len() as i32;
        self.push(LayoutObject::new(kind, z_index))
    }

    /// Append a prepared object, subject to the same ceiling as [`add`](Self::add).
    pub fn push(&mut self, object: LayoutObject) -> Option<usize> {
        if self.is_full() {
            debug!(kind = %object.kind(), capacity = self.capacity, "add ignored, layout full");
            return None;
        }
        debug!(kind = %object.kind(), index = self.objects.len(), "add");
        self.objects.push(object);
        self.expanded.push(false);
        Some(self.objects.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> Option<LayoutObject> {
        if index >= self.objects.len() {
            return None;
        }
        debug!(index, "remove");
        self.expanded.remove(index);
        Some(self.objects.remove(index))
    }

    /// Swap the object with its neighbor. Returns false, leaving the list
    /// untouched, at either end of the list or for an unknown index.
    pub fn move_object(&mut self, index: usize, direction: Direction) -> bool {
        let len = self.objects.len();
        if index >= len {
            return false;
        }
        let other = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < len => index + 1,
            _ => return false,
        };
        debug!(index, ?direction, "move");
        self.objects.swap(index, other);
        self.expanded.swap(index, other);
        true
    }

    /// Shallow-merge `patch` into the object at `index`.
    ///
    /// Keys outside the variant's declared fields are ignored, `type`
    /// included. Style objects merge key by key, so a partial style keeps
    /// the rest of the current one. A value of the wrong shape rejects the
    /// whole patch.
    pub fn update(&mut self, index: usize, patch: &Map<String, Value>) -> Result<()> {
        let len = self.objects.len();
        let current = self
            .objects
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        let kind = current.kind();

        let mut value = serde_json::to_value(current)?;
        if let Value::Object(map) = &mut value {
            for (key, v) in patch {
                if !kind.accepts_field(key) {
                    debug!(index, %kind, field = %key, "ignoring field outside variant schema");
                    continue;
                }
                let nested = kind.merges_field(key)
                    && v.is_object()
                    && map.get(key).is_some_and(Value::is_object);
                if !nested {
                    map.insert(key.clone(), v.clone());
                } else if let (Some(Value::Object(style)), Value::Object(fields)) =
                    (map.get_mut(key), v)
                {
                    style.extend(fields.clone());
                }
            }
        }

        let updated: LayoutObject =
            serde_json::from_value(value).map_err(|e| Error::InvalidPatch(e.to_string()))?;
        debug!(index, %kind, fields = patch.len(), "update");
        self.objects[index] = updated;
        Ok(())
    }

    /// Set one entry of a custom block's property bag.
    pub fn set_prop(&mut self, index: usize, key: &str, value: Value) -> Result<()> {
        let len = self.objects.len();
        match self.objects.get_mut(index) {
            Some(LayoutObject::CustomBlock(block)) => {
                block.props.insert(key.to_string(), value);
                Ok(())
            }
            Some(other) => Err(Error::InvalidPatch(format!(
                "object {} is a {}, not a custom block",
                index,
                other.kind()
            ))),
            None => Err(Error::IndexOutOfRange { index, len }),
        }
    }

    pub fn toggle_expanded(&mut self, index: usize) -> bool {
        match self.expanded.get_mut(index) {
            Some(flag) => {
                *flag = !*flag;
                *flag
            }
            None => false,
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Indices in paint order: lowest z-index first, list order breaking ties.
    pub fn render_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.objects.len()).collect();
        order.sort_by_key(|&i| (self.objects[i].frame().z_index, i));
        order
    }
}
