// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions to handle NaN-masked fields.
//!
//! Upstream producers mark an entry as missing with a NaN value,
//! infinite entries are treated the same way.

use nalgebra::DMatrix;

use crate::misc::type_aliases::Field;

/// An entry is valid if it is finite.
///
/// Besides the NaN "no value" marker, infinite values are discarded too:
/// stereo matching yields an infinite depth for a zero disparity.
#[inline]
pub fn is_valid<T: num_traits::Float>(x: T) -> bool {
    x.is_finite()
}

/// Mask of valid entries of a field.
pub fn valid_mask(field: &Field) -> DMatrix<bool> {
    field.map(is_valid)
}

/// Mask of cells where both channels of a two channels field are valid.
///
/// Both fields must have the same shape.
pub fn valid_mask_2(a: &Field, b: &Field) -> DMatrix<bool> {
    a.zip_map(b, |x, y| is_valid(x) && is_valid(y))
}

/// Fraction of `true` entries in a mask.
/// Returns `None` for an empty mask.
#[allow(clippy::cast_precision_loss)]
pub fn coverage(mask: &DMatrix<bool>) -> Option<f64> {
    if mask.is_empty() {
        None
    } else {
        let nb_valid = mask.iter().filter(|&&valid| valid).count();
        Some(nb_valid as f64 / mask.len() as f64)
    }
}

/// Iterate over the valid entries of a field, converted to f64.
pub fn valid_values(field: &Field) -> impl Iterator<Item = f64> + '_ {
    field
        .iter()
        .filter(|&&x| is_valid(x))
        .map(|&x| f64::from(x))
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;
    use crate::misc::type_aliases::Float;
    use quickcheck_macros;

    const NAN: Float = Float::NAN;

    #[test]
    fn only_finite_is_valid() {
        assert!(is_valid(-3.5 as Float));
        assert!(!is_valid(Float::INFINITY));
        assert!(!is_valid(Float::NEG_INFINITY));
        assert!(!is_valid(NAN));
    }

    #[test]
    fn mask_two_channels() {
        let dx = Field::from_row_slice(2, 2, &[1.0, NAN, 2.0, 3.0]);
        let dy = Field::from_row_slice(2, 2, &[1.0, 1.0, NAN, 3.0]);
        let mask = valid_mask_2(&dx, &dy);
        assert_eq!(mask, DMatrix::from_row_slice(2, 2, &[true, false, false, true]));
        assert_eq!(coverage(&mask), Some(0.5));
    }

    #[test]
    fn empty_mask_has_no_coverage() {
        assert_eq!(coverage(&DMatrix::<bool>::from_element(0, 3, true)), None);
    }

    #[test]
    fn valid_values_skip_nan() {
        let field = Field::from_row_slice(1, 4, &[NAN, 1.5, NAN, -2.0]);
        assert_eq!(valid_values(&field).collect::<Vec<_>>(), vec![1.5, -2.0]);
    }

    // PROPERTY TESTS ################################################

    #[quickcheck_macros::quickcheck]
    fn coverage_in_unit_interval(flags: Vec<bool>) -> bool {
        let mask = DMatrix::from_row_slice(1, flags.len(), &flags);
        match coverage(&mask) {
            None => flags.is_empty(),
            Some(c) => c >= 0.0 && c <= 1.0,
        }
    }

    #[quickcheck_macros::quickcheck]
    fn full_mask_has_full_coverage(nb_rows: u8, nb_cols: u8) -> bool {
        let (nb_rows, nb_cols) = (nb_rows as usize % 16 + 1, nb_cols as usize % 16 + 1);
        let field = Field::from_element(nb_rows, nb_cols, 1.0);
        coverage(&valid_mask(&field)) == Some(1.0)
    }
}
