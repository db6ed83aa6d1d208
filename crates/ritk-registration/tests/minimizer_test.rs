use ritk_core::image::{Extent, ScalarImage};
use ritk_registration::metric::{Metric, MetricInputs, MutualInformation, MutualInformationConfig};
use ritk_registration::optimizer::{Minimizer, Minimum, Objective};
use ritk_registration::{RegistrationError, Result};

/// Evaluates every integer offset within `radius` of the start point.
struct GridSearch {
    radius: i32,
}

impl Minimizer for GridSearch {
    fn minimize(&mut self, objective: &mut dyn Objective, initial: &[f64]) -> Result<Minimum> {
        let [x0, y0] = initial else {
            return Err(RegistrationError::optimizer("grid search expects two parameters"));
        };

        let mut best: Option<Minimum> = None;
        let mut evaluations = 0;
        for dx in -self.radius..=self.radius {
            for dy in -self.radius..=self.radius {
                let parameters = vec![x0 + dx as f64, y0 + dy as f64];
                let value = objective.evaluate(&parameters)?;
                evaluations += 1;
                if best.as_ref().map_or(true, |b| value < b.value) {
                    best = Some(Minimum { parameters, value, evaluations: 0 });
                }
            }
        }
        let mut best = best.ok_or_else(|| RegistrationError::optimizer("empty search grid"))?;
        best.evaluations = evaluations;
        Ok(best)
    }
}

fn translated(extent: Extent, dx: i32, dy: i32) -> Extent {
    let [x0, x1, y0, y1, z0, z1] = extent.bounds();
    Extent::new(x0 + dx, x1 + dx, y0 + dy, y1 + dy, z0, z1)
}

fn noise(len: usize) -> Vec<u8> {
    let mut state = 12345u32;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1103515245).wrapping_add(12345);
            (state >> 16) as u8
        })
        .collect()
}

#[test]
fn test_grid_search_recovers_translation() -> anyhow::Result<()> {
    let data = noise(24 * 24);
    let fixed = ScalarImage::from_vec([24, 24, 1], data.clone())?;
    let moving_extent = translated(fixed.extent(), 2, -1);

    let metric = MutualInformation::new(
        MutualInformationConfig::new()
            .with_bins(16, 16)
            .with_bin_spacing(16.0, 16.0)
            .with_workers(2),
    )?;

    let mut objective = |p: &[f64]| -> Result<f64> {
        let shifted = ScalarImage::new(
            translated(moving_extent, -(p[0] as i32), -(p[1] as i32)),
            1,
            data.clone(),
        )?;
        Ok(metric.evaluate(&MetricInputs::new(&fixed, &shifted))?.loss())
    };

    let minimum = GridSearch { radius: 3 }.minimize(&mut objective, &[0.0, 0.0])?;
    assert_eq!(minimum.parameters, vec![2.0, -1.0]);
    assert_eq!(minimum.evaluations, 49);
    assert!((minimum.value + 2.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_objective_error_stops_search() {
    let mut calls = 0;
    let mut objective = |_: &[f64]| -> Result<f64> {
        calls += 1;
        Err(RegistrationError::optimizer("metric unavailable"))
    };
    let err = GridSearch { radius: 1 }.minimize(&mut objective, &[0.0, 0.0]).unwrap_err();
    assert!(matches!(err, RegistrationError::OptimizerError(_)));
    assert_eq!(calls, 1);
}
