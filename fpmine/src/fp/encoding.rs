//! Conversion of one-hot encoded data into transactions.

use crate::config::OneHotConfig;
use crate::error::{MiningError, Result};
use crate::fp::collections::AssociativeMap;
use ndarray::ArrayView2;

/// Converts a binary transaction matrix into item lists.
///
/// Row `i` becomes the transaction holding `labels[j]` for every non-zero
/// `matrix[[i, j]]`. Rows without items are kept as empty transactions.
pub fn transactions_from_matrix<L: Clone>(
    matrix: ArrayView2<'_, i32>,
    labels: &[L],
) -> Result<Vec<Vec<L>>> {
    let num_items = matrix.ncols();
    if labels.len() != num_items {
        return Err(MiningError::ShapeMismatch {
            expected: num_items,
            actual: labels.len(),
        });
    }

    Ok(matrix
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .zip(labels)
                .filter(|(cell, _)| **cell != 0)
                .map(|(_, label)| label.clone())
                .collect()
        })
        .collect())
}

/// Decodes textual one-hot rows against a set of truthy markers.
#[derive(Debug, Clone)]
pub struct OneHotDecoder {
    true_values: AssociativeMap<String, ()>,
    drop_empty: bool,
}

impl Default for OneHotDecoder {
    fn default() -> Self {
        Self::new(&OneHotConfig::default())
    }
}

impl OneHotDecoder {
    pub fn new(config: &OneHotConfig) -> Self {
        let true_values = config
            .true_values
            .iter()
            .map(|value| (value.trim().to_lowercase(), ()))
            .collect();
        Self {
            true_values,
            drop_empty: config.drop_empty,
        }
    }

    /// A cell is truthy when, trimmed, it matches a marker ignoring case or
    /// parses as a non-zero number. Blank cells are never truthy.
    pub fn is_truthy(&self, cell: &str) -> bool {
        let cell = cell.trim();
        if cell.is_empty() {
            return false;
        }
        if self.true_values.contains_key(&cell.to_lowercase()) {
            return true;
        }
        cell.parse::<f64>().is_ok_and(|value| value != 0.0)
    }

    /// Turns each row into the header labels of its truthy cells.
    ///
    /// Missing trailing cells count as false; cells past the header are ignored.
    pub fn decode<H, Rows, R, C>(&self, header: &[H], rows: Rows) -> Vec<Vec<H>>
    where
        H: Clone,
        Rows: IntoIterator<Item = R>,
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        rows.into_iter()
            .filter_map(|row| {
                let transaction: Vec<H> = header
                    .iter()
                    .zip(row.as_ref())
                    .filter(|(_, cell)| self.is_truthy(C::as_ref(cell)))
                    .map(|(label, _)| label.clone())
                    .collect();

                if transaction.is_empty() && self.drop_empty {
                    None
                } else {
                    Some(transaction)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_transactions_from_matrix() {
        let matrix = Array2::from_shape_vec(
            (3, 3),
            vec![
                1, 1, 0, // bread, milk
                0, 0, 0, // empty
                1, 0, 2, // bread, beer
            ],
        )
        .unwrap();

        let transactions =
            transactions_from_matrix(matrix.view(), &["bread", "milk", "beer"]).unwrap();
        assert_eq!(
            transactions,
            vec![vec!["bread", "milk"], vec![], vec!["bread", "beer"]]
        );
    }

    #[test]
    fn test_matrix_label_mismatch() {
        let matrix = Array2::<i32>::zeros((2, 3));
        assert_eq!(
            transactions_from_matrix(matrix.view(), &["a", "b"]),
            Err(MiningError::ShapeMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_truthy_cells() {
        let decoder = OneHotDecoder::default();

        for cell in ["1", "TRUE", " yes ", "Y", "t", "2.5", "-1", "0x"] {
            let expected = cell != "0x";
            assert_eq!(decoder.is_truthy(cell), expected, "cell {cell:?}");
        }
        for cell in ["", "  ", "0", "0.0", "false", "no", "n"] {
            assert!(!decoder.is_truthy(cell), "cell {cell:?}");
        }
    }

    #[test]
    fn test_decode_rows() {
        let header = ["bread", "milk", "beer"];
        let rows = vec![
            vec!["1", "0", "yes"],
            vec!["0", "", "no"],
            vec!["true"],
            vec!["0", "1", "0", "1"],
        ];

        let decoder = OneHotDecoder::default();
        assert_eq!(
            decoder.decode(&header, &rows),
            vec![vec!["bread", "beer"], vec!["bread"], vec!["milk"]]
        );

        let keep_empty = OneHotDecoder::new(&OneHotConfig {
            drop_empty: false,
            ..OneHotConfig::default()
        });
        assert_eq!(keep_empty.decode(&header, &rows).len(), 4);
    }

    #[test]
    fn test_custom_markers() {
        let decoder = OneHotDecoder::new(&OneHotConfig {
            true_values: vec!["X".to_string()],
            drop_empty: true,
        });

        assert!(decoder.is_truthy("x"));
        assert!(!decoder.is_truthy("yes"));
        assert!(decoder.is_truthy("3"));
    }
}
