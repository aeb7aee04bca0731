//! Button that cycles through a fixed list of values.

use std::fmt::Display;

use crate::scene::{LayerContent, LayerId, LayerTree};
use crate::text::ButtonSkin;

/// Cycles through `values` each time its layer is activated, showing
/// `"<name>: <value>"` as its label.
pub struct NToggle<T> {
    layer: LayerId,
    prefix: String,
    values: Vec<T>,
    value_idx: usize,
    format: fn(&T) -> String,
}

/// Two-state toggle over `[false, true]`.
pub type Toggle = NToggle<bool>;

impl<T: Display> NToggle<T> {
    pub fn new<A: Clone>(
        name: &str,
        values: Vec<T>,
        tree: &mut LayerTree<A>,
        parent: LayerId,
        action: A,
        skin: &dyn ButtonSkin,
    ) -> Self {
        Self::with_format(name, values, |v| v.to_string(), tree, parent, action, skin)
    }
}

impl<T> NToggle<T> {
    /// # Panics
    /// If `values` is empty.
    pub fn with_format<A: Clone>(
        name: &str,
        values: Vec<T>,
        format: fn(&T) -> String,
        tree: &mut LayerTree<A>,
        parent: LayerId,
        action: A,
        skin: &dyn ButtonSkin,
    ) -> Self {
        assert!(!values.is_empty(), "toggle '{name}' needs at least one value");
        let layer = tree.add(parent, LayerContent::Group);
        if let Some(l) = tree.layer_mut(layer) {
            l.set_action(Some(action));
        }
        let mut toggle = Self {
            layer,
            prefix: format!("{name}: "),
            values,
            value_idx: 0,
            format,
        };
        toggle.set(0, tree, skin);
        toggle
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.prefix, (self.format)(self.value()))
    }

    /// Selects `idx` (wrapped into range) and re-renders the label.
    pub fn set<A: Clone>(&mut self, idx: usize, tree: &mut LayerTree<A>, skin: &dyn ButtonSkin) {
        self.value_idx = idx % self.values.len();
        let tile = skin.button(&self.label());
        if let Some(layer) = tree.layer_mut(self.layer) {
            layer.set_content(LayerContent::Label(tile));
        }
    }

    /// Moves to the next value, wrapping around. Called on pointer start.
    pub fn advance<A: Clone>(&mut self, tree: &mut LayerTree<A>, skin: &dyn ButtonSkin) {
        self.set(self.value_idx + 1, tree, skin);
    }

    pub fn value(&self) -> &T {
        &self.values[self.value_idx]
    }

    pub fn value_idx(&self) -> usize {
        self.value_idx
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl NToggle<bool> {
    pub fn toggle<A: Clone>(
        name: &str,
        tree: &mut LayerTree<A>,
        parent: LayerId,
        action: A,
        skin: &dyn ButtonSkin,
    ) -> Self {
        Self::new(name, vec![false, true], tree, parent, action, skin)
    }
}
