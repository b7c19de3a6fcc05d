//! End-to-end fits through the file-based constructors and the sampler factory.

use mini_fit::core::{Sampler, SamplerConfig};
use mini_fit::error::SamplerError;
use mini_fit::factory::AnySampler;
use mini_fit::grid::GridSampler;
use mini_fit::metropolis_hastings::MetropolisHastingsSampler;
use mini_fit::models::power_law;
use mini_fit::observations::Rigidity;
use mini_fit::params::ParamInfo;

fn data_path(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_constructor_keeps_configuration() {
        let params = ParamInfo::from_arrays(["a", "b"], [0.4, 1.9], [3.0, 9.0]).unwrap();
        let grid = GridSampler::from_file(
            data_path("power_law.txt"),
            Rigidity::Lenient,
            power_law,
            params.clone(),
            100,
        )
        .unwrap();
        assert_eq!(grid.num_bins(), 100);
        for (info, (name, (min, max))) in grid
            .params_info()
            .iter()
            .zip(["a", "b"].iter().zip([0.4, 1.9].iter().zip([3.0, 9.0])))
        {
            assert_eq!(info.name, *name);
            assert_eq!(info.min, *min);
            assert_eq!(info.max, max);
            assert!(info.summary.is_none());
        }

        let result = GridSampler::from_file(
            data_path("power_law.txt"),
            Rigidity::Lenient,
            power_law,
            params,
            0,
        );
        assert!(matches!(result, Err(SamplerError::Configuration(_))));
    }

    #[test]
    fn test_data_errors_abort_construction() {
        let params = ParamInfo::from_arrays(["a", "b"], [0.0, 0.0], [1.0, 1.0]).unwrap();
        let result = GridSampler::from_file(
            data_path("testing_data_negative_sigma.txt"),
            Rigidity::Strict,
            power_law,
            params.clone(),
            10,
        );
        assert!(matches!(result, Err(SamplerError::Data(_))));

        let result = MetropolisHastingsSampler::from_file(
            data_path("missing.txt"),
            Rigidity::Lenient,
            power_law,
            params,
            10,
            100,
            0.01,
        );
        assert!(matches!(result, Err(SamplerError::Data(_))));
    }

    #[test]
    fn test_grid_power_law_regression() {
        let params = ParamInfo::from_arrays(["a", "b"], [0.0, 0.0], [1.0, 1.0]).unwrap();
        let mut grid = GridSampler::from_file(
            data_path("testing_data_2D.txt"),
            Rigidity::Lenient,
            power_law,
            params,
            2,
        )
        .unwrap();
        grid.sample().unwrap();

        let golden = [
            ([0.25, 0.25], -0.6843875585491002),
            ([0.25, 0.75], -0.7261391288804344),
            ([0.75, 0.25], -0.06433718084267828),
            ([0.75, 0.75], -0.11032140725971126),
        ];
        let map = grid.param_likelihood();
        assert_eq!(map.len(), 4);
        for ((point, ll), (expected_point, expected_ll)) in map.iter().zip(golden) {
            assert_eq!(point.0, expected_point);
            assert_abs_diff_eq!(*ll, expected_ll, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_grid_statistics_recover_power_law() {
        let params = ParamInfo::from_arrays(["a", "b"], [0.0, 0.0], [5.0, 5.0]).unwrap();
        let mut grid = GridSampler::from_file(
            data_path("power_law.txt"),
            Rigidity::Lenient,
            power_law,
            params,
            100,
        )
        .unwrap();
        grid.sample().unwrap();
        grid.summarise(true).unwrap();

        let expected_mean = [2.4961549063547226, 4.104093278132646];
        let expected_peak = [2.475, 4.125];
        let expected_std = [0.02470286031036865, 0.02516966717853569];
        for (k, info) in grid.params_info().iter().enumerate() {
            let summary = info.summary.expect("Expected summary after summarise");
            assert_abs_diff_eq!(summary.mean, expected_mean[k], epsilon = 1e-6);
            assert_abs_diff_eq!(summary.peak, expected_peak[k], epsilon = 1e-9);
            assert_abs_diff_eq!(summary.std_dev, expected_std[k], epsilon = 1e-6);
            assert_abs_diff_eq!(
                grid.marginal_distribution().row(k).sum(),
                1.0,
                epsilon = 1e-9
            );
        }
        let fitted = grid.fitted_params().unwrap();
        assert_abs_diff_eq!(fitted[0], 2.5, epsilon = 0.05);
        assert_abs_diff_eq!(fitted[1], 4.1, epsilon = 0.05);
    }

    #[test]
    fn test_metropolis_hastings_recovers_power_law() {
        let params = ParamInfo::from_arrays(["a", "b"], [0.0, 0.0], [5.0, 5.0]).unwrap();
        let mut mh = MetropolisHastingsSampler::from_file(
            data_path("power_law.txt"),
            Rigidity::Lenient,
            power_law,
            params,
            100,
            50_000,
            0.005,
        )
        .unwrap();
        mh.sample().unwrap();
        let summaries = mh.summarise(false).unwrap();
        assert_abs_diff_eq!(summaries[0].mean, 2.5, epsilon = 0.1);
        assert_abs_diff_eq!(summaries[1].mean, 4.1, epsilon = 0.1);
    }

    #[test]
    fn test_factory_runs_are_reproducible() {
        let config = SamplerConfig::default()
            .set_num_bins(100)
            .set_sample_points(5_000)
            .set_step_size(0.01)
            .set_rigidity(Rigidity::Strict);
        let build = || {
            let params = ParamInfo::from_arrays(["a", "b"], [0.0, 0.0], [5.0, 5.0]).unwrap();
            AnySampler::from_file(data_path("power_law.txt"), power_law, params, &config).unwrap()
        };
        let mut first = build();
        let mut second = build();
        assert!(!first.is_grid());
        first.sample().unwrap();
        second.sample().unwrap();
        assert_eq!(first.param_likelihood(), second.param_likelihood());
        assert_eq!(first.marginal_distribution(), second.marginal_distribution());
        assert!(matches!(first.sample(), Err(SamplerError::State(_))));
    }
}
