use float_cmp::{approx_eq, F64Margin};

use crate::core::Candidate;

/// Create candidates from a set of objective vectors. This is only used in tests.
///
/// # Arguments
///
/// * `objective_values`: The objective values to set on each candidate.
///
/// returns: `Vec<Candidate>`
pub(crate) fn candidates_from_objectives(objective_values: &[Vec<f64>]) -> Vec<Candidate> {
    objective_values
        .iter()
        .map(|values| Candidate::new(values.clone()).unwrap())
        .collect()
}

/// Compare two arrays of f64
pub(crate) fn assert_approx_array_eq(calculated_values: &[f64], expected_values: &[f64]) {
    let margins = F64Margin {
        epsilon: 0.001,
        ulps: 2,
    };
    assert_eq!(calculated_values.len(), expected_values.len());
    for (i, (calculated, expected)) in calculated_values.iter().zip(expected_values).enumerate() {
        if calculated.is_infinite() && expected.is_infinite() {
            continue;
        }
        if !approx_eq!(f64, *calculated, *expected, margins) {
            panic!(
                r#"assertion failed on item #{i:?}
                    actual: `{calculated:?}`,
                    expected: `{expected:?}`"#,
            )
        }
    }
}
