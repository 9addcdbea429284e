//! Events emitted by the reducer.
//!
//! Every state transition produces an [`EventBatch`]: an ordered list of
//! typed events carrying read-model projections, so the rendering surface
//! can patch its view without touching the tree.

use serde::Serialize;

use crate::element::Element;
use crate::model::NodeId;

/// One change to report to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum StateEvent {
    DocumentLoaded {
        elements: Vec<Element>,
    },
    ElementModified {
        elements: Vec<Element>,
    },
    /// New elements, in reading order, placed after `reference` (the
    /// preceding projected element) at `position` in the projected order.
    ElementInserted {
        elements: Vec<Element>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reference: Option<NodeId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
    ElementRemoved {
        elements: Vec<Element>,
    },
    ElementRenumbered {
        elements: Vec<Element>,
    },
    ElementValidated {
        elements: Vec<Element>,
    },
    ElementSelected {
        elements: Vec<Element>,
    },
}

impl StateEvent {
    pub fn elements(&self) -> &[Element] {
        match self {
            Self::DocumentLoaded { elements }
            | Self::ElementModified { elements }
            | Self::ElementInserted { elements, .. }
            | Self::ElementRemoved { elements }
            | Self::ElementRenumbered { elements }
            | Self::ElementValidated { elements }
            | Self::ElementSelected { elements } => elements,
        }
    }

    /// Event type name, as serialized.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DocumentLoaded { .. } => "DocumentLoaded",
            Self::ElementModified { .. } => "ElementModified",
            Self::ElementInserted { .. } => "ElementInserted",
            Self::ElementRemoved { .. } => "ElementRemoved",
            Self::ElementRenumbered { .. } => "ElementRenumbered",
            Self::ElementValidated { .. } => "ElementValidated",
            Self::ElementSelected { .. } => "ElementSelected",
        }
    }
}

/// Ordered events of one transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventBatch {
    events: Vec<StateEvent>,
}

impl EventBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event; events without elements are dropped.
    pub fn push(&mut self, event: StateEvent) {
        if !event.elements().is_empty() {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[StateEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StateEvent> {
        self.events.iter()
    }

    /// First event with the given type name.
    pub fn find(&self, name: &str) -> Option<&StateEvent> {
        self.events.iter().find(|event| event.name() == name)
    }

    /// Event type names, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(StateEvent::name).collect()
    }
}

impl<'a> IntoIterator for &'a EventBatch {
    type Item = &'a StateEvent;
    type IntoIter = std::slice::Iter<'a, StateEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl IntoIterator for EventBatch {
    type Item = StateEvent;
    type IntoIter = std::vec::IntoIter<StateEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
