use crate::enums::Plane;
use crate::geometry;

use dicom_core::Tag;
use dicom_dictionary_std::tags;
use serde_json::Value;

/// One discovered image instance, mapped from its DICOM JSON metadata
/// document into a typed record at the ingestion boundary. Missing or
/// malformed attributes become `None` rather than propagating loose JSON.
#[derive(Debug, Clone)]
pub struct InstanceRecord {
    pub id: String,
    pub has_pixel_data: bool,
    pub rows: Option<u32>,
    pub columns: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub bits_allocated: Option<u32>,
    pub instance_number: Option<i64>,
    pub position: Option<[f64; 3]>,
    pub row_direction: Option<[f64; 3]>,
    pub col_direction: Option<[f64; 3]>,
    /// Derived: position projected onto the slice normal.
    pub projected_position: Option<f64>,
    /// Derived: anatomical plane from the direction cosines.
    pub plane: Plane,
}

impl InstanceRecord {
    /// Build a record from a DICOM JSON metadata document.
    ///
    /// The derived fields (`projected_position`, `plane`) are always
    /// recomputed here from the raw attributes, never taken from the
    /// document itself.
    pub fn from_document(id: impl Into<String>, document: &Value, plane_tolerance: f64) -> Self {
        let (row_direction, col_direction) = orientation_vectors(document);
        let position = vec3_value(document, tags::IMAGE_POSITION_PATIENT);

        Self {
            id: id.into(),
            has_pixel_data: has_pixel_data_reference(document),
            rows: uint_value(document, tags::ROWS),
            columns: uint_value(document, tags::COLUMNS),
            samples_per_pixel: uint_value(document, tags::SAMPLES_PER_PIXEL),
            bits_allocated: uint_value(document, tags::BITS_ALLOCATED),
            instance_number: int_value(document, tags::INSTANCE_NUMBER),
            position,
            row_direction,
            col_direction,
            projected_position: geometry::slice_normal_position(
                position,
                row_direction,
                col_direction,
            ),
            plane: geometry::classify_plane(row_direction, col_direction, plane_tolerance),
        }
    }

    /// Filter policy: an instance enters the candidate stack only when it
    /// advertises pixel dimensions, sample depth fields and a pixel-data
    /// reference. Anything less is excluded silently.
    pub fn is_renderable(&self) -> bool {
        self.has_pixel_data
            && self.rows.is_some_and(|r| r > 0)
            && self.columns.is_some_and(|c| c > 0)
            && self.samples_per_pixel.is_some()
            && self.bits_allocated.is_some()
    }
}

/// DICOM JSON attribute key for a tag ("GGGGEEEE", uppercase hex).
pub(crate) fn tag_key(tag: Tag) -> String {
    format!("{:04X}{:04X}", tag.group(), tag.element())
}

fn attribute<'a>(document: &'a Value, tag: Tag) -> Option<&'a Value> {
    document.get(tag_key(tag))
}

fn values<'a>(document: &'a Value, tag: Tag) -> Option<&'a Vec<Value>> {
    attribute(document, tag)?.get("Value")?.as_array()
}

/// Numeric attribute value. DS/IS attributes arrive as JSON numbers from
/// conforming servers but as strings from several common ones; accept both.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn int_value(document: &Value, tag: Tag) -> Option<i64> {
    Some(number(values(document, tag)?.first()?)? as i64)
}

fn uint_value(document: &Value, tag: Tag) -> Option<u32> {
    u32::try_from(int_value(document, tag)?).ok()
}

fn vec3_value(document: &Value, tag: Tag) -> Option<[f64; 3]> {
    let values = values(document, tag)?;
    if values.len() != 3 {
        return None;
    }
    Some([
        number(&values[0])?,
        number(&values[1])?,
        number(&values[2])?,
    ])
}

/// Image Orientation (Patient) holds six cosines: row vector then column
/// vector. Anything but exactly six numeric components yields neither.
fn orientation_vectors(document: &Value) -> (Option<[f64; 3]>, Option<[f64; 3]>) {
    let Some(values) = values(document, tags::IMAGE_ORIENTATION_PATIENT) else {
        return (None, None);
    };
    if values.len() != 6 {
        return (None, None);
    }
    let mut cosines = [0.0; 6];
    for (slot, value) in cosines.iter_mut().zip(values) {
        match number(value) {
            Some(n) => *slot = n,
            None => return (None, None),
        }
    }
    (
        Some([cosines[0], cosines[1], cosines[2]]),
        Some([cosines[3], cosines[4], cosines[5]]),
    )
}

/// A pixel-data reference is either an inline payload or a bulk data
/// pointer on the PixelData attribute.
fn has_pixel_data_reference(document: &Value) -> bool {
    attribute(document, tags::PIXEL_DATA)
        .is_some_and(|v| v.get("InlineBinary").is_some() || v.get("BulkDataURI").is_some())
}
