use gradnet_core::{GradNetError, Value};

/// A source of (input, label) training pairs.
pub trait Dataset {
    /// Returns the pair at `index`, cloned for the caller.
    fn get(&self, index: usize) -> Result<(Value, Value), GradNetError>;

    /// Total number of pairs.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory dataset over parallel input/label vectors.
#[derive(Debug, Clone)]
pub struct VecDataset {
    inputs: Vec<Value>,
    labels: Vec<Value>,
}

impl VecDataset {
    /// Builds a dataset from parallel vectors; their lengths must match.
    pub fn new(inputs: Vec<Value>, labels: Vec<Value>) -> Result<Self, GradNetError> {
        if inputs.len() != labels.len() {
            return Err(GradNetError::ModelDataMismatch(format!(
                "{} inputs but {} labels",
                inputs.len(),
                labels.len()
            )));
        }
        Ok(VecDataset { inputs, labels })
    }

    /// The input values in order, for handing a whole epoch to the
    /// trainer at once.
    pub fn inputs(&self) -> &[Value] {
        &self.inputs
    }

    pub fn labels(&self) -> &[Value] {
        &self.labels
    }
}

impl Dataset for VecDataset {
    fn get(&self, index: usize) -> Result<(Value, Value), GradNetError> {
        match (self.inputs.get(index), self.labels.get(index)) {
            (Some(input), Some(label)) => Ok((input.clone(), label.clone())),
            _ => Err(GradNetError::IndexOutOfBounds {
                index,
                len: self.len(),
            }),
        }
    }

    fn len(&self) -> usize {
        self.inputs.len()
    }
}
