use log::{debug, warn};

use crate::config::*;

/// The adherence of one axis, as percentages.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct AdherenceSummary {
    /// Mean population support, in percent, rounded to one decimal.
    pub population_pct: f64,
    /// Mean diagnosis support, in percent, rounded to one decimal.
    pub diagnosis_pct: f64,
    /// Mean of the two percentages above, rounded to an integer.
    pub average: i64,
}

impl AdherenceSummary {
    /// The government axis is always fully aligned.
    pub const GOVERNMENT_PCT: f64 = 100.0;

    pub fn categories(&self) -> [Category; 3] {
        Category::RADAR_ORDER
    }

    /// The percentages, in the order of [AdherenceSummary::categories].
    pub fn percentages(&self) -> [f64; 3] {
        [
            AdherenceSummary::GOVERNMENT_PCT,
            self.population_pct,
            self.diagnosis_pct,
        ]
    }

    /// The radar series with its first point repeated at the end, so that the
    /// polygon closes.
    pub fn closed_series(&self) -> Vec<(Category, f64)> {
        let mut series: Vec<(Category, f64)> = self
            .categories()
            .iter()
            .cloned()
            .zip(self.percentages())
            .collect();
        series.push(series[0]);
        series
    }

    pub fn sentence(&self, axis: &str) -> String {
        format!(
            "O eixo {} tem {:.1}% de aderência com a população e {:.1}% com o diagnóstico técnico.",
            axis, self.population_pct, self.diagnosis_pct
        )
    }

    pub fn title(&self, axis: &str) -> String {
        format!("Aderência Média: {}% - {}", self.average, axis)
    }
}

/// Computes the adherence summary of an axis.
///
/// Missing and non-numeric cells are left out of the means.
pub fn summarize(table: &Table) -> Result<AdherenceSummary, MissingColumnsError> {
    table.require_columns(&[POPULATION, DIAGNOSIS])?;

    let population = column_mean(table, POPULATION);
    let diagnosis = column_mean(table, DIAGNOSIS);
    debug!(
        "summarize: population mean: {:?} diagnosis mean: {:?}",
        population, diagnosis
    );

    let population_pct = round_one_decimal(population * 100.0);
    let diagnosis_pct = round_one_decimal(diagnosis * 100.0);
    let average = ((population_pct + diagnosis_pct) / 2.0).round_ties_even() as i64;

    Ok(AdherenceSummary {
        population_pct,
        diagnosis_pct,
        average,
    })
}

/// Rounds to one decimal place, ties to even.
pub fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

fn column_mean(table: &Table, name: &str) -> f64 {
    let values: Vec<f64> = table
        .column(name)
        .unwrap_or_default()
        .iter()
        .filter_map(|c| c.as_number())
        .collect();
    if values.is_empty() {
        warn!("column_mean: no numeric value in column {}", name);
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn two_goals() -> Table {
        let mut builder = TableBuilder::new(&["population", "diagnosis"]);
        builder.add_row(vec![Cell::from(0.5), Cell::from(0.8)]);
        builder.add_row(vec![Cell::from(0.3), Cell::from(0.6)]);
        builder.build()
    }

    #[test]
    fn means_as_percentages() {
        init();
        let s = summarize(&two_goals()).unwrap();
        assert_eq!(s.population_pct, 40.0);
        assert_eq!(s.diagnosis_pct, 70.0);
        assert_eq!(s.average, 55);
    }

    #[test]
    fn government_is_always_full() {
        init();
        let mut builder = TableBuilder::new(&["population", "diagnosis"]);
        builder.add_row(vec![Cell::from(0.0), Cell::from(0.0)]);
        let s = summarize(&builder.build()).unwrap();
        assert_eq!(s.percentages()[0], 100.0);
        assert_eq!(s.categories()[0], Category::Government);
        assert_eq!(summarize(&two_goals()).unwrap().percentages()[0], 100.0);
    }

    #[test]
    fn missing_cells_are_skipped() {
        init();
        let mut builder = TableBuilder::new(&["População", "Diagnóstico"]);
        builder.add_row(vec![Cell::from(1.0), Cell::Empty]);
        builder.add_row(vec![Cell::Empty, Cell::from(0.5)]);
        builder.add_row(vec![Cell::from("n/a"), Cell::from("0.25")]);
        let s = summarize(&builder.build()).unwrap();
        assert_eq!(s.population_pct, 100.0);
        assert_eq!(s.diagnosis_pct, 37.5);
        assert_eq!(s.average, 69);
    }

    #[test]
    fn average_rounds_half_to_even() {
        init();
        // (40.0 + 45.0) / 2 = 42.5
        let mut builder = TableBuilder::new(&["population", "diagnosis"]);
        builder.add_row(vec![Cell::from(0.4), Cell::from(0.45)]);
        assert_eq!(summarize(&builder.build()).unwrap().average, 42);

        // (40.0 + 47.0) / 2 = 43.5
        let mut builder = TableBuilder::new(&["population", "diagnosis"]);
        builder.add_row(vec![Cell::from(0.4), Cell::from(0.47)]);
        assert_eq!(summarize(&builder.build()).unwrap().average, 44);
    }

    #[test]
    fn closed_series_repeats_first_point() {
        init();
        let series = summarize(&two_goals()).unwrap().closed_series();
        assert_eq!(series.len(), 4);
        assert_eq!(series[0], series[3]);
        assert_eq!(series[0], (Category::Government, 100.0));
    }

    #[test]
    fn missing_columns() {
        init();
        let mut builder = TableBuilder::new(&["population", "adherence"]);
        builder.add_row(vec![Cell::from(1.0), Cell::from(1.0)]);
        let err = summarize(&builder.build()).unwrap_err();
        assert_eq!(err.missing, vec!["diagnosis".to_string()]);
    }

    #[test]
    fn sentence_and_title() {
        init();
        let s = summarize(&two_goals()).unwrap();
        assert_eq!(
            s.sentence("Saúde"),
            "O eixo Saúde tem 40.0% de aderência com a população e 70.0% com o diagnóstico técnico."
        );
        assert_eq!(s.title("Saúde"), "Aderência Média: 55% - Saúde");
    }
}
