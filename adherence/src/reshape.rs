use std::cmp::Ordering;

use log::debug;

use crate::config::*;

/// Minimum height of the correspondence chart, in pixels.
pub const MIN_CHART_HEIGHT: u32 = 400;
/// Height given to each goal of the correspondence chart, in pixels.
pub const ROW_HEIGHT: u32 = 30;

/// A goal after sorting by adherence.
#[derive(PartialEq, Debug, Clone)]
pub struct ReshapedGoal {
    /// Positional key (`id_1` is the goal with the highest adherence).
    pub goal_id: String,
    pub label: String,
    pub adherence: Option<f64>,
    pub level: AdherenceLevel,
    pub population: Option<f64>,
    pub diagnosis: Option<f64>,
}

impl ReshapedGoal {
    /// Whether the goal has a point in the given category.
    pub fn is_present(&self, category: Category) -> bool {
        match category {
            Category::Government => true,
            Category::Population => self.population == Some(1.0),
            Category::Diagnosis => self.diagnosis == Some(1.0),
        }
    }
}

/// One point of the correspondence chart.
#[derive(PartialEq, Debug, Clone)]
pub struct LongFormRow {
    pub goal_id: String,
    pub level: AdherenceLevel,
    pub category: Category,
    pub label: String,
}

/// The goals of an axis, reshaped for the correspondence chart.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct AxisReshape {
    /// Goals by decreasing adherence.
    pub goals: Vec<ReshapedGoal>,
    /// The points, category by category.
    pub long_rows: Vec<LongFormRow>,
}

impl AxisReshape {
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// The goal ids from the bottom to the top of the chart.
    ///
    /// The goal with the highest adherence comes last, so that it is drawn at the top.
    pub fn display_order(&self) -> Vec<&str> {
        self.goals.iter().rev().map(|g| g.goal_id.as_str()).collect()
    }

    pub fn label_of(&self, goal_id: &str) -> Option<&str> {
        self.goals
            .iter()
            .find(|g| g.goal_id == goal_id)
            .map(|g| g.label.as_str())
    }

    /// The labels of the goals with the given level, by decreasing adherence.
    pub fn labels_for(&self, level: AdherenceLevel) -> Vec<String> {
        self.goals
            .iter()
            .filter(|g| g.level == level)
            .map(|g| g.label.clone())
            .collect()
    }

    /// The list of goals of a level, as text.
    pub fn group_text(&self, level: AdherenceLevel) -> String {
        format_list(&self.labels_for(level))
    }

    /// One sentence per reported level that has at least one goal.
    pub fn group_sentences(&self) -> Vec<(AdherenceLevel, String)> {
        let mut res: Vec<(AdherenceLevel, String)> = Vec::new();
        for level in AdherenceLevel::REPORTED {
            let text = self.group_text(level);
            if text.is_empty() {
                continue;
            }
            let adjective = level.label().unwrap_or_default().to_lowercase();
            res.push((
                level,
                format!("As metas com {} aderência são: {}.", adjective, text),
            ));
        }
        res
    }

    pub fn chart_height(&self) -> u32 {
        MIN_CHART_HEIGHT.max(self.goals.len() as u32 * ROW_HEIGHT)
    }
}

/// Sorts the goals of an axis by adherence and lays them out as chart points.
pub fn reshape(table: &Table) -> Result<AxisReshape, MissingColumnsError> {
    table.require_columns(&[POPULATION, DIAGNOSIS, ADHERENCE])?;
    // Checked above.
    let pop_idx = table.column_index(POPULATION).unwrap_or_default();
    let diag_idx = table.column_index(DIAGNOSIS).unwrap_or_default();
    let adh_idx = table.column_index(ADHERENCE).unwrap_or_default();
    let label_idx = table.column_index(GOVERNMENT);

    let mut wide: Vec<(String, Option<f64>, Option<f64>, Option<f64>)> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let label = label_idx
                .and_then(|li| row[li].as_label())
                .unwrap_or_else(|| format!("Goal_{}", idx + 1));
            (
                label,
                row[pop_idx].as_number(),
                row[diag_idx].as_number(),
                row[adh_idx].as_number(),
            )
        })
        .collect();

    // Stable: equal adherences keep the sheet order.
    wide.sort_by(|a, b| descending(a.3, b.3));

    let goals: Vec<ReshapedGoal> = wide
        .into_iter()
        .enumerate()
        .map(|(idx, (label, population, diagnosis, adherence))| ReshapedGoal {
            goal_id: format!("id_{}", idx + 1),
            label,
            adherence,
            level: AdherenceLevel::from_value(adherence),
            population,
            diagnosis,
        })
        .collect();
    debug!("reshape: goals: {:?}", goals);

    let mut long_rows: Vec<LongFormRow> = Vec::new();
    for category in Category::CORRESPONDENCE_ORDER {
        for g in goals.iter().filter(|g| g.is_present(category)) {
            long_rows.push(LongFormRow {
                goal_id: g.goal_id.clone(),
                level: g.level,
                category,
                label: g.label.clone(),
            });
        }
    }

    Ok(AxisReshape { goals, long_rows })
}

// Missing adherences go last.
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Joins items as a sentence: `"X, Y e Z"`.
pub fn format_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [single] => single.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{} e {}", head.join(", "), last.as_ref())
        }
    }
}
