use std::fmt;

/// The parameter categories a [`FitterState`](crate::FitterState) exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Per-body scale factors, one column per body.
    BodyScales,

    /// Per-marker offsets, one 3-row column per marker.
    MarkerOffsets,

    /// Per-timestep marker residuals, 3 rows per timestep, one column per marker.
    MarkerResiduals,

    /// Per-timestep joint residuals, 3 rows per timestep, one column per joint.
    JointResiduals,

    /// Generalized coordinates, one column per timestep.
    Poses,
}

impl ParameterKind {
    /// Every kind, in the order the fitter lays out its gradient fields.
    pub const ALL: [Self; 5] = [
        Self::BodyScales,
        Self::MarkerOffsets,
        Self::MarkerResiduals,
        Self::JointResiduals,
        Self::Poses,
    ];
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BodyScales => "body scales",
            Self::MarkerOffsets => "marker offsets",
            Self::MarkerResiduals => "marker residuals",
            Self::JointResiduals => "joint residuals",
            Self::Poses => "poses",
        };
        f.write_str(name)
    }
}
