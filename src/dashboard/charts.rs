use adherence::{AdherenceLevel, AdherenceSummary, AxisReshape, Category, LongFormRow};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::HashSet;
use std::f64::consts::PI;
use std::fmt::Display;
use std::path::Path;

use crate::dashboard::*;

const RADIAL_TICKS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];
const FONT: &str = "sans-serif";
const TITLE_SIZE: i32 = 24;
const LABEL_SIZE: i32 = 15;
const LEGEND_TITLE: &str = "Aderência";

const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);
const RADAR_COLOR: RGBColor = RGBColor(99, 110, 250);
const FOREST_GREEN: RGBColor = RGBColor(34, 139, 34);
const NO_LEVEL_COLOR: RGBColor = RGBColor(128, 128, 128);

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ChartSettings {
    pub width: u32,
    pub radar_height: u32,
}

fn chart_error<E: Display>(path: &Path) -> impl Fn(E) -> DashError + '_ {
    move |e| DashError::Chart {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

pub fn level_color(level: AdherenceLevel) -> RGBColor {
    match level {
        AdherenceLevel::Low => RED,
        AdherenceLevel::Medium => BLUE,
        AdherenceLevel::High => FOREST_GREEN,
        AdherenceLevel::Unclassified => NO_LEVEL_COLOR,
    }
}

/// Position on the radar: spokes start at 12 o'clock and go clockwise.
fn polar_point(center: (i32, i32), radius: f64, idx: usize, num_spokes: usize) -> (i32, i32) {
    let angle = 2.0 * PI * idx as f64 / num_spokes as f64;
    (
        center.0 + (radius * angle.sin()).round() as i32,
        center.1 - (radius * angle.cos()).round() as i32,
    )
}

/// Draws the radar chart of an axis as a PNG file.
pub fn draw_radar(
    path: &Path,
    axis: &str,
    summary: &AdherenceSummary,
    settings: &ChartSettings,
) -> DashResult<()> {
    debug!("draw_radar: {} -> {}", axis, path.display());
    let root = BitMapBackend::new(path, (settings.width, settings.radar_height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error(path))?;
    let area = root
        .titled(&summary.title(axis), (FONT, TITLE_SIZE))
        .map_err(chart_error(path))?;

    let (w, h) = area.dim_in_pixel();
    let center = ((w / 2) as i32, (h / 2) as i32);
    let radius = (w.min(h) as f64 / 2.0 - 60.0).max(10.0);
    let categories = summary.categories();
    let num_spokes = categories.len();
    let centered = TextStyle::from((FONT, LABEL_SIZE).into_font()).pos(Pos::new(HPos::Center, VPos::Center));

    // Grid
    for tick in RADIAL_TICKS.iter().skip(1) {
        let r = radius * tick / 100.0;
        area.draw(&Circle::new(center, r.round() as i32, GRID_COLOR.stroke_width(1)))
            .map_err(chart_error(path))?;
    }
    for tick in RADIAL_TICKS {
        let r = radius * tick / 100.0;
        area.draw(&Text::new(
            format!("{}", tick as i64),
            (center.0 + 4, center.1 - r.round() as i32 - 8),
            (FONT, 12),
        ))
        .map_err(chart_error(path))?;
    }
    for (idx, category) in categories.iter().enumerate() {
        let end = polar_point(center, radius, idx, num_spokes);
        area.draw(&PathElement::new(vec![center, end], GRID_COLOR.stroke_width(1)))
            .map_err(chart_error(path))?;
        let label_pos = polar_point(center, radius + 30.0, idx, num_spokes);
        area.draw(&Text::new(category.label(), label_pos, centered.clone()))
            .map_err(chart_error(path))?;
    }

    // Closed polygon
    let series = summary.closed_series();
    let points: Vec<(i32, i32)> = series
        .iter()
        .enumerate()
        .map(|(idx, (_, pct))| polar_point(center, radius * pct / 100.0, idx % num_spokes, num_spokes))
        .collect();
    area.draw(&Polygon::new(points.clone(), RADAR_COLOR.mix(0.3).filled()))
        .map_err(chart_error(path))?;
    area.draw(&PathElement::new(points.clone(), RADAR_COLOR.stroke_width(2)))
        .map_err(chart_error(path))?;
    for ((_, pct), p) in series.iter().zip(points.iter()).take(num_spokes) {
        area.draw(&Circle::new(*p, 4, RADAR_COLOR.filled()))
            .map_err(chart_error(path))?;
        area.draw(&Text::new(
            format!("{}%", pct.round_ties_even() as i64),
            (p.0 + 8, p.1 - 18),
            (FONT, LABEL_SIZE),
        ))
        .map_err(chart_error(path))?;
    }

    root.present().map_err(chart_error(path))?;
    Ok(())
}

/// Width of the goal label area. Never less than 60 pixels, even on narrow charts.
fn label_area_size(longest_label: u32, chart_width: u32) -> u32 {
    (longest_label * 8 + 20).min(chart_width / 2).max(60)
}

/// Unclassified goals have no legend entry, so a chart with only those has no legend.
fn needs_legend(res: &AxisReshape) -> bool {
    res.goals.iter().any(|g| g.level.label().is_some())
}

fn category_x(category: Category) -> i32 {
    Category::CORRESPONDENCE_ORDER
        .iter()
        .position(|c| *c == category)
        .unwrap_or_default() as i32
}

/// Draws the correspondence chart of an axis as a PNG file.
///
/// The goal with the highest adherence is at the top.
pub fn draw_correspondence(
    path: &Path,
    axis: &str,
    res: &AxisReshape,
    settings: &ChartSettings,
) -> DashResult<()> {
    debug!("draw_correspondence: {} -> {}", axis, path.display());
    let order = res.display_order();
    let num_goals = order.len() as i32;
    let y_labels: Vec<String> = order
        .iter()
        .map(|id| res.label_of(id).unwrap_or(*id).to_string())
        .collect();
    let longest = y_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;

    let root = BitMapBackend::new(path, (settings.width, res.chart_height())).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error(path))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(format!("Correspondência - {}", axis), (FONT, TITLE_SIZE))
        .x_label_area_size(40)
        .y_label_area_size(label_area_size(longest, settings.width))
        .build_cartesian_2d(-1i32..3i32, -1i32..num_goals.max(1))
        .map_err(chart_error(path))?;

    let x_formatter = |x: &i32| -> String {
        Category::CORRESPONDENCE_ORDER
            .get(*x as usize)
            .filter(|_| *x >= 0)
            .map(|c| c.label().to_string())
            .unwrap_or_default()
    };
    let y_formatter = |y: &i32| -> String {
        if *y >= 0 {
            y_labels.get(*y as usize).cloned().unwrap_or_default()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(5)
        .y_labels((num_goals + 2) as usize)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .y_desc("Metas")
        .label_style((FONT, 13))
        .draw()
        .map_err(chart_error(path))?;

    // The legend title is an entry without a marker, above the levels.
    let has_legend = needs_legend(res);
    if has_legend {
        chart
            .draw_series(LineSeries::new(Vec::<(i32, i32)>::new(), WHITE))
            .map_err(chart_error(path))?
            .label(LEGEND_TITLE)
            .legend(|(x, y)| EmptyElement::at((x, y)));
    }

    let mut in_legend: HashSet<AdherenceLevel> = HashSet::new();
    for (y, goal_id) in order.iter().enumerate() {
        let rows: Vec<&LongFormRow> = res
            .long_rows
            .iter()
            .filter(|r| r.goal_id == *goal_id)
            .collect();
        let level = match rows.first() {
            Some(r) => r.level,
            None => continue,
        };
        let color = level_color(level);
        let points: Vec<(i32, i32)> = rows
            .iter()
            .map(|r| (category_x(r.category), y as i32))
            .collect();

        let anno = chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(chart_error(path))?;
        if let Some(name) = level.label() {
            if in_legend.insert(level) {
                anno.label(name).legend(move |(x, y)| {
                    PathElement::new(vec![(x - 10, y), (x + 10, y)], color.stroke_width(2))
                });
            }
        }
        chart
            .draw_series(points.iter().map(|p| Circle::new(*p, 5, color.filled())))
            .map_err(chart_error(path))?;
    }

    if has_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, 13))
            .draw()
            .map_err(chart_error(path))?;
    }

    root.present().map_err(chart_error(path))?;
    Ok(())
}
