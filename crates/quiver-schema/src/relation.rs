use serde::{Deserialize, Serialize};

///
/// OnDelete
///
/// Per-relation-side delete policy. `Cascade` declares that deleting the
/// near node implies deleting the far node; `SetNull` only clears the link.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum OnDelete {
    #[default]
    SetNull,
    Cascade,
}

///
/// Relation
///
/// One named relation between two models. The two sides are ordered (a, b)
/// purely for addressing; traversal direction is decided by the relation
/// field that points across it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Relation {
    pub name: String,
    pub model_a: String,
    pub model_b: String,
    pub on_delete_a: OnDelete,
    pub on_delete_b: OnDelete,
}

impl Relation {
    #[must_use]
    pub fn new(name: impl Into<String>, model_a: impl Into<String>, model_b: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_a: model_a.into(),
            model_b: model_b.into(),
            on_delete_a: OnDelete::SetNull,
            on_delete_b: OnDelete::SetNull,
        }
    }

    /// Declare that deleting a `model_a` node cascades across this relation.
    #[must_use]
    pub const fn cascade_from_a(mut self) -> Self {
        self.on_delete_a = OnDelete::Cascade;
        self
    }

    /// Declare that deleting a `model_b` node cascades across this relation.
    #[must_use]
    pub const fn cascade_from_b(mut self) -> Self {
        self.on_delete_b = OnDelete::Cascade;
        self
    }

    #[must_use]
    pub fn is_side(&self, model: &str) -> bool {
        self.model_a == model || self.model_b == model
    }

    /// Does deleting a node of `model` cascade across this relation?
    #[must_use]
    pub fn cascades_from(&self, model: &str) -> bool {
        if self.model_a == model {
            self.on_delete_a == OnDelete::Cascade
        } else if self.model_b == model {
            self.on_delete_b == OnDelete::Cascade
        } else {
            false
        }
    }

    /// The model on the far side, seen from `model`.
    ///
    /// Self-relations report the same model for both sides.
    #[must_use]
    pub fn opposite_model(&self, model: &str) -> Option<&str> {
        if self.model_a == model {
            Some(&self.model_b)
        } else if self.model_b == model {
            Some(&self.model_a)
        } else {
            None
        }
    }
}

///
/// TESTS
///
