use super::{shape::Shape, value::RawValue};

/// Guided forms larger than this fall back to free text.
const MAX_GUIDED_ELEMENTS: usize = 1000;

impl RawValue {
    /// Builds the initial guided-form value for an input.
    ///
    /// Rank-1 and rank-2 shapes of a reasonable size get one empty cell per
    /// element (a dynamic dimension starts with one). Everything else falls
    /// back to an empty free-text value.
    pub fn guided(shape: &Shape) -> Self {
        let dimensions = shape.dimensions();
        let estimate = dimensions.guided_estimate();
        if dimensions.rank() == 0 || !(1..MAX_GUIDED_ELEMENTS).contains(&estimate) {
            return Self::Text(String::new());
        }

        let len = |index| match dimensions.get(index).flatten() {
            Some(len) => len,
            None => 1,
        };
        match dimensions.rank() {
            1 => Self::Vector(vec![String::new(); len(0)]),
            2 => Self::Matrix(vec![vec![String::new(); len(1)]; len(0)]),
            _ => Self::Text(String::new()),
        }
    }

    /// Appends an empty element to a dynamic 1-D form.
    pub fn push_element(&mut self, shape: &Shape) -> bool {
        match self {
            Self::Vector(elements) if is_dynamic_outer(shape) => {
                elements.push(String::new());
                true
            }
            _ => false,
        }
    }

    /// Removes the last element of a 1-D form, keeping at least one.
    pub fn pop_element(&mut self) -> bool {
        match self {
            Self::Vector(elements) if elements.len() > 1 => elements.pop().is_some(),
            _ => false,
        }
    }

    /// Appends an empty row to a 2-D form with dynamic rows.
    pub fn push_row(&mut self, shape: &Shape) -> bool {
        match self {
            Self::Matrix(rows) if is_dynamic_outer(shape) => {
                let width = match shape.dimensions().get(1).flatten() {
                    Some(width) => width,
                    None => rows.first().map(Vec::len).filter(|&w| w > 0).unwrap_or(1),
                };
                rows.push(vec![String::new(); width]);
                true
            }
            _ => false,
        }
    }

    /// Removes a row of a 2-D form with dynamic rows, keeping at least one.
    pub fn remove_row(&mut self, shape: &Shape, index: usize) -> bool {
        match self {
            Self::Matrix(rows) if is_dynamic_outer(shape) && rows.len() > 1 && index < rows.len() => {
                rows.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Sets one cell of a guided form.
    pub fn set_cell(&mut self, path: &[usize], value: impl ToString) -> bool {
        let cell = match (self, path) {
            (Self::Vector(elements), [index]) => elements.get_mut(*index),
            (Self::Matrix(rows), [row, col]) => rows.get_mut(*row).and_then(|row| row.get_mut(*col)),
            _ => None,
        };
        match cell {
            Some(cell) => {
                *cell = value.to_string();
                true
            }
            None => false,
        }
    }
}

fn is_dynamic_outer(shape: &Shape) -> bool {
    let dimensions = shape.dimensions();
    dimensions.rank() == 0 || dimensions.get(0) == Some(None)
}
