use approx::assert_abs_diff_eq;
use pv_prob::catalog::{DistributionSpec, RawParams};
use pv_prob::family::Family;
use pv_prob::{Dirichlet, MultivariateNormal, RangePolicy, pit, sampling};
use pv_viz::{
    AxisValues, CurveArtifact, Density2dArtifact, DistributionPlotArtifact, PitArtifact,
    SamplesArtifact, SimplexDensityArtifact,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn curve_artifact_contract_smoke() {
    for family in Family::ALL {
        let handle = DistributionSpec::defaults(family).handle().expect("handle");
        let artifact = CurveArtifact::from_handle(&handle);
        assert_eq!(artifact.x.len(), artifact.y.len(), "{family}");

        let json = serde_json::to_value(&artifact).expect("serialize");
        let obj = json.as_object().expect("object");
        assert_eq!(obj.len(), 3);
        assert!(obj["title"].as_str().expect("title").contains("Distribution"));
        let xs = obj["x"].as_array().expect("x array");
        if family.is_discrete() {
            assert!(xs.iter().all(|v| v.is_i64()), "{family}: x must be integers");
            assert!(matches!(artifact.x, AxisValues::Integer(_)));
        } else {
            assert!(xs.iter().all(|v| v.is_f64()), "{family}");
            assert_eq!(xs.len(), 200);
        }
    }
}

#[test]
fn curve_artifact_roundtrips_integer_axis() {
    let spec = DistributionSpec::from_raw(Family::Binomial, &RawParams::new());
    let artifact = CurveArtifact::from_handle(&spec.handle().unwrap());
    let json = serde_json::to_string(&artifact).unwrap();
    let back: CurveArtifact = serde_json::from_str(&json).unwrap();
    assert_eq!(back.x, AxisValues::Integer((0..=10).collect()));
    assert_eq!(back.title, "Binomial Distribution (n=10, p=0.5)");
}

#[test]
fn distribution_plot_artifact_null_moments() {
    let handle = DistributionSpec::StudentT { df: 1.0 }.handle().unwrap();
    let artifact = DistributionPlotArtifact::from_handle(&handle, RangePolicy::Fixed, "Cauchy");
    assert!(artifact.mean.is_none());
    assert!(artifact.std_band().is_none());
    let json = serde_json::to_value(&artifact).unwrap();
    assert!(json["mean"].is_null());
    assert!(json["std"].is_null());

    let normal = DistributionSpec::defaults(Family::Normal).handle().unwrap();
    let artifact = DistributionPlotArtifact::from_handle(&normal, RangePolicy::Quantile, "N");
    let (lo, hi) = artifact.std_band().unwrap();
    assert_abs_diff_eq!(lo, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(hi, 1.0, epsilon = 1e-12);
    assert_eq!(artifact.x.len(), 1000);
}

#[test]
fn samples_artifact_shape() {
    let batch = sampling::geometric_sum_with_rng(0.5, 10, 1000, &mut StdRng::seed_from_u64(4)).unwrap();
    let artifact = SamplesArtifact::from(batch);
    let json = serde_json::to_value(&artifact).unwrap();
    let samples = json["samples"].as_array().unwrap();
    assert_eq!(samples.len(), 1000);
    assert!(samples.iter().all(|v| v.is_u64()));
}

#[test]
fn pit_artifact_arrays_align() {
    let handle = DistributionSpec::defaults(Family::Normal).handle().unwrap();
    let data = pit::pit_with_rng(&handle, 2000, &mut StdRng::seed_from_u64(12)).unwrap();
    let artifact = PitArtifact::from(data);
    assert_eq!(artifact.n_samples, 2000);
    assert_eq!(artifact.samples.len(), artifact.u.len());
    assert_eq!(artifact.curve_x.len(), artifact.density_y.len());
    assert_eq!(artifact.curve_x.len(), artifact.cdf_y.len());
    assert_eq!(artifact.sample_hist_edges.len(), artifact.sample_hist_density.len() + 1);
    assert_eq!(artifact.u_hist_edges.len(), artifact.u_hist_density.len() + 1);
    assert_eq!(artifact.traces.len(), 3);
    assert_eq!(artifact.reference_y, vec![1.0, 1.0]);
    assert!(artifact.title.starts_with("Probability Integral Transform"));
}

#[test]
fn density2d_artifact_shape() {
    let mvn = MultivariateNormal::from_rows(&[0.0, 0.0], &[vec![1.0, 0.6], vec![0.6, 2.0]]).unwrap();
    let artifact = Density2dArtifact::compute(&mvn, "Bivariate normal").unwrap();
    assert_eq!(artifact.x.len(), 100);
    assert_eq!(artifact.y.len(), 100);
    assert_eq!(artifact.z.len(), 100);
    assert!(artifact.z.iter().all(|row| row.len() == 100));
    assert_eq!(artifact.covariance[0][1], 0.6);
    assert!(artifact.z_max() > 0.0);
}

#[test]
fn simplex_artifact_masks_outside_cells() {
    let artifact = SimplexDensityArtifact::compute(&Dirichlet::new([2.0, 3.0, 4.0]).unwrap(), 400, "Dirichlet");
    assert_eq!(artifact.resolution, 20);
    assert_eq!(artifact.valid_cells, 210);
    let json = serde_json::to_value(&artifact).unwrap();
    let last_row = json["z"][19].as_array().unwrap();
    assert!(last_row[19].is_null());
    assert!(artifact.z_max() > 0.0);
}
