use crate::aggregate::Series;
use crate::report::MeasurementKind;

/// Error range around a mean at one axis value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub axis_value: u64,
    pub low: f64,
    pub high: f64,
}

/// Chart-ready values of one series for one measurement kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// `(axis_value, mean)` in ascending axis order
    pub primary: Vec<(u64, f64)>,
    /// Only axis values with both a mean and a stddev
    pub band: Vec<BandPoint>,
}

impl Projection {
    pub fn primary_values(&self) -> Vec<f64> {
        self.primary.iter().map(|&(_, v)| v).collect()
    }

    pub fn band_ranges(&self) -> Vec<[f64; 2]> {
        self.band.iter().map(|p| [p.low, p.high]).collect()
    }
}

/// Project a series onto one measurement kind.
///
/// A stddev without a mean at the same axis value has nothing to center on
/// and is dropped.
pub fn project(series: &Series, kind: MeasurementKind) -> Projection {
    let primary = series
        .mean_by_axis
        .iter()
        .map(|(&axis, record)| (axis, record.get(kind)))
        .collect();

    let band = series
        .stddev_by_axis
        .iter()
        .filter_map(|(&axis, stddev)| {
            let mean = series.mean_by_axis.get(&axis)?.get(kind);
            let spread = stddev.get(kind);
            Some(BandPoint {
                axis_value: axis,
                low: mean - spread,
                high: mean + spread,
            })
        })
        .collect();

    Projection { primary, band }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Statistic;
    use crate::report::MeasurementRecord;
    use proptest::collection::btree_map;
    use proptest::prelude::*;

    #[test]
    fn test_mean_and_stddev() {
        let mut series = Series::default();
        series.insert(Statistic::Mean, 10, MeasurementRecord::new(5.0, 3.0));
        series.insert(Statistic::Stddev, 10, MeasurementRecord::new(1.0, 0.0));

        let real = project(&series, MeasurementKind::Real);
        assert_eq!(real.primary_values(), vec![5.0]);
        assert_eq!(real.band_ranges(), vec![[4.0, 6.0]]);

        let cpu = project(&series, MeasurementKind::Cpu);
        assert_eq!(cpu.primary_values(), vec![3.0]);
        assert_eq!(cpu.band_ranges(), vec![[3.0, 3.0]]);
    }

    #[test]
    fn test_mean_only_has_no_band_point() {
        let mut series = Series::default();
        series.insert(Statistic::Mean, 1, MeasurementRecord::new(2.0, 2.0));
        series.insert(Statistic::Mean, 2, MeasurementRecord::new(4.0, 4.0));
        series.insert(Statistic::Stddev, 2, MeasurementRecord::new(0.5, 0.5));

        let projection = project(&series, MeasurementKind::Real);
        assert_eq!(projection.primary, vec![(1, 2.0), (2, 4.0)]);
        assert_eq!(
            projection.band,
            vec![BandPoint {
                axis_value: 2,
                low: 3.5,
                high: 4.5
            }]
        );
    }

    #[test]
    fn test_orphan_stddev_is_dropped() {
        let mut series = Series::default();
        series.insert(Statistic::Stddev, 8, MeasurementRecord::new(1.0, 1.0));

        let projection = project(&series, MeasurementKind::Real);
        assert!(projection.primary.is_empty());
        assert!(projection.band.is_empty());
    }

    proptest! {
        #[test]
        fn prop_band_brackets_mean(
            means in btree_map(0u64..64, (0.0f64..1e6, 0.0f64..1e6), 0..16),
            stddevs in btree_map(0u64..64, (0.0f64..1e3, 0.0f64..1e3), 0..16),
        ) {
            let mut series = Series::default();
            for (&axis, &(real, cpu)) in &means {
                series.insert(Statistic::Mean, axis, MeasurementRecord::new(real, cpu));
            }
            for (&axis, &(real, cpu)) in &stddevs {
                series.insert(Statistic::Stddev, axis, MeasurementRecord::new(real, cpu));
            }

            let projection = project(&series, MeasurementKind::Real);
            prop_assert_eq!(projection.primary.len(), means.len());
            prop_assert!(projection.primary.windows(2).all(|w| w[0].0 < w[1].0));

            let paired = stddevs.keys().filter(|axis| means.contains_key(axis)).count();
            prop_assert_eq!(projection.band.len(), paired);
            for point in &projection.band {
                let mean = means[&point.axis_value].0;
                let spread = stddevs[&point.axis_value].0;
                prop_assert_eq!(point.low, mean - spread);
                prop_assert_eq!(point.high, mean + spread);
            }
        }
    }
}
