use serde::{Deserialize, Serialize};
use tracing::warn;

/// A declared shape template. `None` is a dynamic dimension to be resolved
/// from the data length; on the wire it is written as `-1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub struct Dimensions(pub Vec<Option<usize>>);

impl From<Vec<i64>> for Dimensions {
    fn from(value: Vec<i64>) -> Self {
        Self(value.into_iter().map(|d| usize::try_from(d).ok()).collect())
    }
}

impl From<Dimensions> for Vec<i64> {
    fn from(value: Dimensions) -> Self {
        value
            .0
            .into_iter()
            .map(|d| d.map(|d| d as i64).unwrap_or(-1))
            .collect()
    }
}

impl From<Vec<Option<usize>>> for Dimensions {
    fn from(value: Vec<Option<usize>>) -> Self {
        Self(value)
    }
}

impl Dimensions {
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn is_dynamic(&self) -> bool {
        self.0.iter().any(Option::is_none)
    }

    pub fn get(&self, index: usize) -> Option<Option<usize>> {
        self.0.get(index).copied()
    }

    pub fn to_vec(&self) -> Vec<Option<usize>> {
        self.0.clone()
    }

    /// Computes a concrete shape holding `len` elements.
    ///
    /// This never fails. A fixed template is returned as-is even if it does
    /// not hold `len` elements, and a dynamic one that cannot be divided
    /// evenly is degraded to a best-effort shape.
    pub fn resolve(&self, len: usize) -> Vec<usize> {
        let template = &self.0;
        if template.is_empty() {
            return vec![len];
        }
        if !self.is_dynamic() {
            return template.iter().map(|d| d.unwrap_or_default()).collect();
        }

        let known: Vec<usize> = template.iter().flatten().copied().filter(|&d| d > 0).collect();
        if known.is_empty() {
            // every dimension is dynamic or zero
            return template
                .iter()
                .enumerate()
                .map(|(index, d)| match d {
                    Some(d) => *d,
                    None if index == 0 => len,
                    None => 1,
                })
                .collect();
        }

        // an overflowing product can never divide the data length
        let known_product = known.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d));
        match known_product {
            Some(known_product) if len % known_product == 0 => {
                let dynamic = len / known_product;
                template.iter().map(|d| d.unwrap_or(dynamic)).collect()
            }
            _ => {
                warn!(
                    template = ?template,
                    len,
                    known_product = ?known_product,
                    "data length is not divisible by the known dimensions; degrading shape"
                );
                template
                    .iter()
                    .enumerate()
                    .map(|(index, d)| match d {
                        _ if index == 0 => len,
                        Some(d) => *d,
                        None => 1,
                    })
                    .collect()
            }
        }
    }

    /// Estimates how many elements a guided form should offer.
    ///
    /// A dynamic dimension collapses the running product to one, and an
    /// overflowing product saturates.
    pub(crate) fn guided_estimate(&self) -> usize {
        self.0.iter().fold(1, |acc, d| match d {
            Some(d) => acc.saturating_mul(*d),
            None => 1,
        })
    }
}
