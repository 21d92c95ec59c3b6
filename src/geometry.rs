use crate::enums::Plane;

/// Default tolerance when matching direction cosines against the canonical
/// axis-aligned patterns. Adjust via [`ResolveOptions`] if real acquisitions
/// classify as `Unknown` too often.
///
/// [`ResolveOptions`]: crate::stack_resolver::ResolveOptions
pub const DEFAULT_PLANE_TOLERANCE: f64 = 1e-3;

/// Classify the anatomical plane of an image from its row/column direction
/// cosines.
///
/// Matching is sign-insensitive so mirrored acquisitions still classify.
/// Missing vectors classify as [`Plane::Unknown`]; this never fails.
pub fn classify_plane(
    row: Option<[f64; 3]>,
    col: Option<[f64; 3]>,
    tolerance: f64,
) -> Plane {
    let (Some(row), Some(col)) = (row, col) else {
        return Plane::Unknown;
    };

    let near = |value: f64, target: f64| (value.abs() - target).abs() < tolerance;
    let row_along_x = near(row[0], 1.0) && near(row[1], 0.0) && near(row[2], 0.0);

    if row_along_x && near(col[0], 0.0) && near(col[1], 1.0) && near(col[2], 0.0) {
        Plane::Axial
    } else if row_along_x && near(col[2], 1.0) {
        Plane::Coronal
    } else if near(row[1], 1.0) && near(col[2], 1.0) {
        Plane::Sagittal
    } else {
        Plane::Unknown
    }
}

/// Scalar ordering key for a slice: the image origin projected onto the
/// slice normal (row × col). `None` whenever any input is missing.
pub fn slice_normal_position(
    position: Option<[f64; 3]>,
    row: Option<[f64; 3]>,
    col: Option<[f64; 3]>,
) -> Option<f64> {
    let (position, row, col) = (position?, row?, col?);
    let normal = cross(row, col);
    Some(dot(position, normal))
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW_X: [f64; 3] = [1.0, 0.0, 0.0];
    const COL_Y: [f64; 3] = [0.0, 1.0, 0.0];
    const COL_Z: [f64; 3] = [0.0, 0.0, 1.0];
    const ROW_Y: [f64; 3] = [0.0, 1.0, 0.0];

    fn negate(v: [f64; 3]) -> [f64; 3] {
        [-v[0], -v[1], -v[2]]
    }

    #[test]
    fn classifies_canonical_planes() {
        let t = DEFAULT_PLANE_TOLERANCE;
        assert_eq!(classify_plane(Some(ROW_X), Some(COL_Y), t), Plane::Axial);
        assert_eq!(classify_plane(Some(ROW_X), Some(COL_Z), t), Plane::Coronal);
        assert_eq!(classify_plane(Some(ROW_Y), Some(COL_Z), t), Plane::Sagittal);
    }

    #[test]
    fn classification_is_sign_insensitive() {
        let t = DEFAULT_PLANE_TOLERANCE;
        assert_eq!(
            classify_plane(Some(negate(ROW_X)), Some(COL_Y), t),
            Plane::Axial
        );
        assert_eq!(
            classify_plane(Some(ROW_X), Some(negate(COL_Y)), t),
            Plane::Axial
        );
        assert_eq!(
            classify_plane(Some(negate(ROW_Y)), Some(negate(COL_Z)), t),
            Plane::Sagittal
        );
    }

    #[test]
    fn oblique_or_missing_is_unknown() {
        let t = DEFAULT_PLANE_TOLERANCE;
        let oblique = [0.7071, 0.7071, 0.0];
        assert_eq!(classify_plane(Some(oblique), Some(COL_Z), t), Plane::Unknown);
        assert_eq!(classify_plane(None, Some(COL_Y), t), Plane::Unknown);
        assert_eq!(classify_plane(Some(ROW_X), None, t), Plane::Unknown);
    }

    #[test]
    fn tolerance_admits_near_axis_cosines() {
        let near_row = [0.9995, 0.0005, 0.0];
        assert_eq!(
            classify_plane(Some(near_row), Some(COL_Y), DEFAULT_PLANE_TOLERANCE),
            Plane::Axial
        );
    }

    #[test]
    fn projection_is_normal_component_of_position() {
        // Axial orientation: normal is +Z, so the key is the z coordinate.
        let key = slice_normal_position(Some([10.0, -4.0, 7.5]), Some(ROW_X), Some(COL_Y));
        assert_eq!(key, Some(7.5));
    }

    #[test]
    fn projection_absent_when_any_input_missing() {
        assert_eq!(slice_normal_position(None, Some(ROW_X), Some(COL_Y)), None);
        assert_eq!(
            slice_normal_position(Some([0.0, 0.0, 1.0]), None, Some(COL_Y)),
            None
        );
        assert_eq!(
            slice_normal_position(Some([0.0, 0.0, 1.0]), Some(ROW_X), None),
            None
        );
    }
}
