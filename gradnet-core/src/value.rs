use crate::error::GradNetError;

/// A possibly-nested, rectangular array of `f64` elements.
///
/// `Value` is the raw payload every operation's `forward`/`backward`
/// computes on, and the storage behind [`crate::tensor::Tensor`]. The
/// shape is never stored alongside the data: it is derived by measuring
/// the length along the first axis at each nesting level.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    List(Vec<Value>),
}

impl Value {
    /// Derives the shape by repeatedly taking the length of the first
    /// element until a numeric leaf is reached.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = Vec::new();
        let mut current = self;
        while let Value::List(items) = current {
            shape.push(items.len());
            match items.first() {
                Some(first) => current = first,
                None => break,
            }
        }
        shape
    }

    /// Verifies the value is rectangular: all sibling subtrees at every
    /// depth agree on shape. Ragged values cannot back a tensor.
    pub fn check_rectangular(&self) -> Result<(), GradNetError> {
        fn walk(value: &Value, depth: usize) -> Result<Vec<usize>, GradNetError> {
            match value {
                Value::Number(_) => Ok(Vec::new()),
                Value::List(items) => {
                    let mut expected: Option<Vec<usize>> = None;
                    for item in items {
                        let sub = walk(item, depth + 1)?;
                        match &expected {
                            None => expected = Some(sub),
                            Some(seen) if *seen == sub => {}
                            Some(_) => return Err(GradNetError::Ragged { depth }),
                        }
                    }
                    let mut shape = vec![items.len()];
                    shape.extend(expected.unwrap_or_default());
                    Ok(shape)
                }
            }
        }
        walk(self, 0).map(|_| ())
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.shape().iter().product()
    }

    /// Row-major vector of all elements.
    pub fn flatten(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.numel());
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        match self {
            Value::Number(x) => out.push(*x),
            Value::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    /// Rebuilds a nested value of `shape` from row-major elements.
    ///
    /// `data` must hold exactly `shape.iter().product()` elements.
    pub fn from_flat(shape: &[usize], data: &[f64]) -> Value {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        fn build(shape: &[usize], data: &[f64], cursor: &mut usize) -> Value {
            match shape.split_first() {
                None => {
                    let x = data[*cursor];
                    *cursor += 1;
                    Value::Number(x)
                }
                Some((&dim, rest)) => {
                    Value::List((0..dim).map(|_| build(rest, data, cursor)).collect())
                }
            }
        }
        let mut cursor = 0;
        build(shape, data, &mut cursor)
    }

    /// A value of `shape` with every element set to `fill`.
    pub fn filled(shape: &[usize], fill: f64) -> Value {
        match shape.split_first() {
            None => Value::Number(fill),
            Some((&dim, rest)) => Value::List((0..dim).map(|_| Value::filled(rest, fill)).collect()),
        }
    }

    /// Applies `f` to every element, preserving the shape.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Value {
        let shape = self.shape();
        let data: Vec<f64> = self.flatten().into_iter().map(f).collect();
        Value::from_flat(&shape, &data)
    }

    /// Elementwise combination of two equally shaped values.
    pub fn zip_map<F: Fn(f64, f64) -> f64>(
        &self,
        other: &Value,
        operation: &str,
        f: F,
    ) -> Result<Value, GradNetError> {
        let shape = self.shape();
        let other_shape = other.shape();
        if shape != other_shape {
            return Err(GradNetError::ShapeMismatch {
                expected: shape,
                actual: other_shape,
                operation: operation.to_string(),
            });
        }
        let data: Vec<f64> = self
            .flatten()
            .into_iter()
            .zip(other.flatten())
            .map(|(a, b)| f(a, b))
            .collect();
        Ok(Value::from_flat(&shape, &data))
    }

    /// Views a 2-D value as a vector of rows.
    pub fn rows(&self) -> Result<Vec<Vec<f64>>, GradNetError> {
        let shape = self.shape();
        if shape.len() != 2 {
            return Err(GradNetError::DimensionMismatch {
                operation: "matrix view".to_string(),
                expected: 2,
                actual: shape.len(),
            });
        }
        if shape[1] == 0 {
            return Ok(vec![Vec::new(); shape[0]]);
        }
        let flat = self.flatten();
        Ok(flat.chunks(shape[1]).map(|row| row.to_vec()).collect())
    }

    /// Builds a 2-D value from a vector of rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Value {
        Value::List(
            rows.into_iter()
                .map(|row| Value::List(row.into_iter().map(Value::Number).collect()))
                .collect(),
        )
    }

    /// Index of the largest element in row-major order (first wins on
    /// ties). Used by the accuracy metric.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (index, x) in self.flatten().into_iter().enumerate() {
            if x > best_value {
                best = index;
                best_value = x;
            }
        }
        best
    }
}

impl From<Vec<f64>> for Value {
    fn from(data: Vec<f64>) -> Self {
        Value::List(data.into_iter().map(Value::Number).collect())
    }
}

impl From<Vec<Vec<f64>>> for Value {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Value::from_rows(rows)
    }
}
