use pv_prob::{DistributionData, DistributionHandle, RangePolicy, SampleBatch, data};
use serde::{Deserialize, Serialize};

/// Abscissae: integers for discrete families, reals otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValues {
    /// Integer-valued x (discrete families).
    Integer(Vec<i64>),
    /// Real-valued x (continuous families).
    Float(Vec<f64>),
}

impl AxisValues {
    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Integer(v) => v.len(),
            AxisValues::Float(v) => v.len(),
        }
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values as `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            AxisValues::Integer(v) => v.iter().map(|&k| k as f64).collect(),
            AxisValues::Float(v) => v.clone(),
        }
    }
}

/// The served distribution curve: `{x, y, title}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveArtifact {
    /// Abscissae.
    pub x: AxisValues,
    /// Density or mass, clipped to `[0, 100]`.
    pub y: Vec<f64>,
    /// Plot title.
    pub title: String,
}

impl CurveArtifact {
    /// Wrap computed data under `title`.
    pub fn from_data(data: &DistributionData, title: impl Into<String>) -> Self {
        let x = if data.is_continuous {
            AxisValues::Float(data.x.clone())
        } else {
            AxisValues::Integer(data.x_integers())
        };
        Self { x, y: data.y_prop.clone(), title: title.into() }
    }

    /// Evaluate `handle` on its fixed window and title it with the handle label.
    pub fn from_handle(handle: &DistributionHandle) -> Self {
        let data = data::calculate(handle, RangePolicy::Fixed);
        Self::from_data(&data, handle.label())
    }
}

/// A served sample batch: `{samples}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplesArtifact {
    /// Non-negative integer draws.
    pub samples: Vec<u64>,
}

impl From<SampleBatch> for SamplesArtifact {
    fn from(batch: SampleBatch) -> Self {
        Self { samples: batch.samples }
    }
}
