use crate::classify::{Category, ClassifiedName, Statistic};
use crate::report::MeasurementRecord;
use std::collections::BTreeMap;

/// Runs of one function with one template type, keyed by axis value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub mean_by_axis: BTreeMap<u64, MeasurementRecord>,
    pub stddev_by_axis: BTreeMap<u64, MeasurementRecord>,
}

impl Series {
    /// Store a record, replacing any earlier one at the same axis value.
    /// Returns true if a record was replaced.
    pub fn insert(
        &mut self,
        statistic: Statistic,
        axis_value: u64,
        record: MeasurementRecord,
    ) -> bool {
        let table = match statistic {
            Statistic::Mean => &mut self.mean_by_axis,
            Statistic::Stddev => &mut self.stddev_by_axis,
        };
        table.insert(axis_value, record).is_some()
    }
}

/// All series of one benchmarked function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionGroup {
    pub category: Category,
    /// Series in order of first appearance. Threaded functions have a
    /// single series with no variant.
    pub variants: Vec<(Option<String>, Series)>,
    /// First time unit seen for this function
    pub time_unit: Option<String>,
}

impl FunctionGroup {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            variants: Vec::new(),
            time_unit: None,
        }
    }

    pub fn series(&self, variant: Option<&str>) -> Option<&Series> {
        self.variants
            .iter()
            .find(|(v, _)| v.as_deref() == variant)
            .map(|(_, series)| series)
    }

    fn series_mut(&mut self, variant: Option<&str>) -> &mut Series {
        let idx = match self.variants.iter().position(|(v, _)| v.as_deref() == variant) {
            Some(idx) => idx,
            None => {
                self.variants
                    .push((variant.map(str::to_string), Series::default()));
                self.variants.len() - 1
            }
        };
        &mut self.variants[idx].1
    }
}

/// Identifies the document a function's data ends up in
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId {
    pub category: Category,
    pub function: String,
}

/// Grouping of classified records by function, variant and axis value
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    functions: BTreeMap<FunctionId, FunctionGroup>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one classified record. Returns true if it overwrote an earlier
    /// record with the same key.
    pub fn insert(
        &mut self,
        classified: &ClassifiedName,
        record: MeasurementRecord,
        time_unit: Option<&str>,
    ) -> bool {
        let key = classified.key();
        let category = classified.category();
        let group = self
            .functions
            .entry(FunctionId {
                category,
                function: key.function,
            })
            .or_insert_with(|| FunctionGroup::new(category));

        if group.time_unit.is_none() {
            group.time_unit = time_unit.map(str::to_string);
        }

        group
            .series_mut(key.variant.as_deref())
            .insert(classified.statistic(), key.axis_value, record)
    }

    pub fn get(&self, category: Category, function: &str) -> Option<&FunctionGroup> {
        self.functions.get(&FunctionId {
            category,
            function: function.to_string(),
        })
    }

    /// Functions in ascending (category, name) order
    pub fn functions(&self) -> impl Iterator<Item = (&FunctionId, &FunctionGroup)> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    fn insert(agg: &mut Aggregator, name: &str, real: f64, cpu: f64) -> bool {
        let classified = classify(name).unwrap();
        agg.insert(&classified, MeasurementRecord::new(real, cpu), None)
    }

    #[test]
    fn test_groups_by_function_and_variant() {
        let mut agg = Aggregator::new();
        insert(&mut agg, "Foo<int>/10_mean", 5.0, 3.0);
        insert(&mut agg, "Foo<int>/10_stddev", 1.0, 0.0);
        insert(&mut agg, "Foo<float>/10_mean", 7.0, 6.0);
        insert(&mut agg, "Foo<int>/2_mean", 1.0, 1.0);
        insert(&mut agg, "Other<int>/2_mean", 9.0, 9.0);

        assert_eq!(agg.len(), 2);
        let foo = agg.get(Category::Vectorization, "Foo").unwrap();
        let variants: Vec<_> = foo.variants.iter().map(|(v, _)| v.as_deref()).collect();
        assert_eq!(variants, vec![Some("int"), Some("float")]);

        let int = foo.series(Some("int")).unwrap();
        assert_eq!(int.mean_by_axis.keys().copied().collect::<Vec<_>>(), vec![2, 10]);
        assert_eq!(
            int.stddev_by_axis.get(&10),
            Some(&MeasurementRecord::new(1.0, 0.0))
        );
        assert!(foo.series(Some("float")).unwrap().stddev_by_axis.is_empty());
    }

    #[test]
    fn test_threaded_uses_implicit_series() {
        let mut agg = Aggregator::new();
        insert(&mut agg, "Bar/threads:4", 20.0, 18.0);
        insert(&mut agg, "Bar/threads:1", 60.0, 59.0);

        let bar = agg.get(Category::Threading, "Bar").unwrap();
        assert_eq!(bar.variants.len(), 1);
        let series = bar.series(None).unwrap();
        assert_eq!(series.mean_by_axis.keys().copied().collect::<Vec<_>>(), vec![1, 4]);
        assert!(series.stddev_by_axis.is_empty());
    }

    #[test]
    fn test_same_name_in_both_grammars_stays_separate() {
        let mut agg = Aggregator::new();
        insert(&mut agg, "Foo<int>/10_mean", 5.0, 3.0);
        insert(&mut agg, "Foo/threads:2", 8.0, 7.0);

        assert_eq!(agg.len(), 2);
        assert!(agg.get(Category::Vectorization, "Foo").is_some());
        assert!(agg.get(Category::Threading, "Foo").is_some());
    }

    #[test]
    fn test_last_write_wins() {
        let mut agg = Aggregator::new();
        assert!(!insert(&mut agg, "Foo<int>/10_mean", 5.0, 3.0));
        assert!(insert(&mut agg, "Foo<int>/10_mean", 6.0, 4.0));

        let series = agg
            .get(Category::Vectorization, "Foo")
            .unwrap()
            .series(Some("int"))
            .unwrap();
        assert_eq!(series.mean_by_axis.len(), 1);
        assert_eq!(series.mean_by_axis[&10], MeasurementRecord::new(6.0, 4.0));
    }

    #[test]
    fn test_keeps_first_time_unit() {
        let mut agg = Aggregator::new();
        let classified = classify("Foo<int>/1_mean").unwrap();
        agg.insert(&classified, MeasurementRecord::default(), Some("us"));
        agg.insert(&classified, MeasurementRecord::default(), Some("ns"));

        let foo = agg.get(Category::Vectorization, "Foo").unwrap();
        assert_eq!(foo.time_unit.as_deref(), Some("us"));
    }

    #[test]
    fn test_functions_are_ordered() {
        let mut agg = Aggregator::new();
        insert(&mut agg, "Zeta/threads:1", 1.0, 1.0);
        insert(&mut agg, "Beta<int>/1_mean", 1.0, 1.0);
        insert(&mut agg, "Alpha<int>/1_mean", 1.0, 1.0);

        let names: Vec<_> = agg.functions().map(|(id, _)| id.function.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Zeta"]);
    }
}
