use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::autograd::GradNode;
use crate::error::GradNetError;
use crate::ops::TensorOperation;
use crate::value::Value;

mod autograd_methods;
pub mod create;

pub use create::{filled, ones, zeros};

/// A rectangular nested numeric array together with its gradient node.
///
/// `Tensor` wraps `Arc<RwLock<TensorData>>`:
/// 1. **Shared identity:** cloning a `Tensor` clones the handle, so a
///    layer's parameter and the optimizer's reference to it are the same
///    tensor, so in-place updates are visible to the next forward pass.
/// 2. **Interior mutability:** the resolved gradient and the recorded
///    graph can be updated through a shared reference during backward.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

#[derive(Debug)]
pub(crate) struct TensorData {
    pub(crate) value: Value,
    pub(crate) node: GradNode,
}

impl Tensor {
    /// Creates a tensor from a nested value, rejecting ragged input.
    pub fn new(value: Value) -> Result<Self, GradNetError> {
        value.check_rectangular()?;
        Ok(Tensor::from_value(value))
    }

    /// Wraps a value known to be rectangular (fills, op outputs).
    pub(crate) fn from_value(value: Value) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(TensorData {
                value,
                node: GradNode::default(),
            })),
        }
    }

    /// Returns a deep copy of the value, so callers cannot mutate graph
    /// history through aliasing.
    pub fn value(&self) -> Value {
        self.read_data().value.clone()
    }

    /// Replaces the value. The new value's recomputed shape must equal
    /// the current shape; a mismatch is a fatal configuration error.
    pub fn set_value(&self, value: Value) -> Result<(), GradNetError> {
        value.check_rectangular()?;
        let mut guard = self.write_data();
        let current = guard.value.shape();
        let incoming = value.shape();
        if incoming != current {
            return Err(GradNetError::ShapeMismatch {
                expected: current,
                actual: incoming,
                operation: "set_value".to_string(),
            });
        }
        guard.value = value;
        Ok(())
    }

    /// The shape, derived from the value on every call.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().value.shape()
    }

    /// Number of elements.
    pub fn numel(&self) -> usize {
        self.read_data().value.numel()
    }

    /// A new tensor wrapping a copy of the value, with a fresh, empty
    /// gradient node. (Contrast with `Clone`, which shares identity.)
    pub fn deep_clone(&self) -> Tensor {
        Tensor::from_value(self.value())
    }

    /// Registers `children` as this tensor's graph inputs and moves the
    /// producing operation instance into its node.
    pub(crate) fn attach(&self, producer: Box<dyn TensorOperation>, children: &[Tensor]) {
        let mut guard = self.write_data();
        guard.node.children.extend(children.iter().cloned());
        guard.node.producer = Some(producer);
    }

    /// The input tensors recorded by the producing operation, in order.
    pub fn children(&self) -> Vec<Tensor> {
        self.read_data().node.children.clone()
    }

    /// True when no producing operation is recorded (a parameter or an
    /// externally supplied input).
    pub fn is_leaf(&self) -> bool {
        self.read_data().node.producer.is_none()
    }

    pub(crate) fn read_data(&self) -> RwLockReadGuard<'_, TensorData> {
        self.data.read().expect("RwLock poisoned")
    }

    pub(crate) fn write_data(&self) -> RwLockWriteGuard<'_, TensorData> {
        self.data.write().expect("RwLock poisoned")
    }
}

impl Clone for Tensor {
    /// Clones the handle; both tensors share the same value and node.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl PartialEq for Tensor {
    /// Value (and therefore shape) equality.
    fn eq(&self, other: &Self) -> bool {
        self.read_data().value == other.read_data().value
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        f.debug_struct("Tensor")
            .field("value", &guard.value)
            .field("shape", &guard.value.shape())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_getter_returns_a_defensive_copy() {
        let t = Tensor::new(Value::from(vec![1.0, 2.0])).unwrap();
        let mut copy = t.value();
        if let Value::List(items) = &mut copy {
            items[0] = Value::Number(99.0);
        }
        assert_eq!(t.value(), Value::from(vec![1.0, 2.0]));
    }

    #[test]
    fn set_value_rejects_shape_changes() {
        let t = Tensor::new(Value::from(vec![vec![1.0, 2.0]])).unwrap();
        let err = t.set_value(Value::from(vec![1.0, 2.0])).unwrap_err();
        assert_eq!(
            err,
            GradNetError::ShapeMismatch {
                expected: vec![1, 2],
                actual: vec![2],
                operation: "set_value".to_string(),
            }
        );
        t.set_value(Value::from(vec![vec![3.0, 4.0]])).unwrap();
        assert_eq!(t.value(), Value::from(vec![vec![3.0, 4.0]]));
    }

    #[test]
    fn new_rejects_ragged_values() {
        let ragged = Value::List(vec![
            Value::List(vec![Value::Number(1.0)]),
            Value::Number(2.0),
        ]);
        assert!(matches!(
            Tensor::new(ragged),
            Err(GradNetError::Ragged { .. })
        ));
    }

    #[test]
    fn clone_shares_identity_but_deep_clone_does_not() {
        let t = Tensor::new(Value::from(vec![1.0])).unwrap();
        let shared = t.clone();
        let independent = t.deep_clone();
        t.set_value(Value::from(vec![5.0])).unwrap();
        assert_eq!(shared.value(), Value::from(vec![5.0]));
        assert_eq!(independent.value(), Value::from(vec![1.0]));
    }
}
