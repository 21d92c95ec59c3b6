#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plane {
    Axial,
    Coronal,
    Sagittal,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}
