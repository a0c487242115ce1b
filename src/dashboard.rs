use log::{debug, info, warn};

use adherence::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::BufRead;
use std::path::PathBuf;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dashboard::charts::*;
use crate::dashboard::config_reader::*;
use crate::dashboard::io_common::*;
use crate::dashboard::io_excel::SheetCache;

mod charts;
mod config_reader;
mod gate;
mod io_common;
mod io_excel;
mod pdf;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Arquivo {path} não encontrado."))]
    WorkbookNotFound { path: String },
    #[snafu(display("Error reading the metadata of {path}"))]
    ReadingWorkbook {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("A aba {sheet} não existe em {path}."))]
    SheetNotFound { sheet: String, path: String },
    #[snafu(display("Senha incorreta."))]
    WrongPassword {},
    #[snafu(display("Senha não informada."))]
    MissingPassword {},
    #[snafu(display("Error reading from the terminal"))]
    ReadingInput { source: std::io::Error },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error drawing chart {path}: {message}"))]
    Chart { path: String, message: String },
    #[snafu(display("Error reading chart image {path}"))]
    ReadingImage {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error building PDF report: {message}"))]
    Pdf { message: String },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the computed summary and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

/// What was computed for one axis.
#[derive(Debug, Clone)]
pub struct AxisAnalysis {
    pub axis: String,
    pub summary: Result<AdherenceSummary, MissingColumnsError>,
    pub correspondence: Result<AxisReshape, MissingColumnsError>,
}

impl AxisAnalysis {
    pub fn warnings(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        for err in [self.summary.as_ref().err(), self.correspondence.as_ref().err()]
            .into_iter()
            .flatten()
        {
            debug!("AxisAnalysis::warnings: {}: {}", self.axis, err);
            res.push(format!(
                "A aba {} não tem as colunas necessárias.",
                self.axis
            ));
        }
        res
    }
}

/// Runs both computations on the table of an axis.
///
/// Missing columns are kept in the result: they only disable one chart.
pub fn analyze_axis(axis: &str, table: &Table) -> AxisAnalysis {
    let summary = summarize(table);
    if let Err(e) = &summary {
        warn!("analyze_axis: radar chart for {}: {}", axis, e);
    }
    let correspondence = reshape(table);
    if let Err(e) = &correspondence {
        warn!("analyze_axis: correspondence chart for {}: {}", axis, e);
    }
    AxisAnalysis {
        axis: axis.to_string(),
        summary,
        correspondence,
    }
}

fn print_axis(analysis: &AxisAnalysis) {
    let axis = analysis.axis.as_str();
    println!("## Eixo: {}", axis);

    println!("### Radar Chart - {}", axis);
    match &analysis.summary {
        Ok(s) => {
            println!("{}", s.title(axis));
            println!("{}", s.sentence(axis));
        }
        Err(_) => println!("Aviso: A aba {} não tem as colunas necessárias.", axis),
    }

    println!("### Correspondência - {}", axis);
    match &analysis.correspondence {
        Ok(res) => {
            for (level, sentence) in res.group_sentences() {
                let marker = match level {
                    AdherenceLevel::High => "[+]",
                    AdherenceLevel::Medium => "[~]",
                    _ => "[-]",
                };
                println!("{} {}", marker, sentence);
            }
        }
        Err(_) => println!("Aviso: A aba {} não tem as colunas necessárias.", axis),
    }
    println!();
}

/// Writes the images and the report of an axis. Returns the files written.
fn export_axis(analysis: &AxisAnalysis, settings: &Settings) -> DashResult<Vec<PathBuf>> {
    let axis = analysis.axis.as_str();
    let chart_settings = ChartSettings {
        width: settings.chart_width,
        radar_height: settings.radar_height,
    };
    let mut images: Vec<PathBuf> = Vec::new();
    if settings.export_png {
        fs::create_dir_all(&settings.output_dir).context(WritingFileSnafu {
            path: settings.output_dir.display().to_string(),
        })?;
        if let Ok(s) = &analysis.summary {
            let p = output_path(&settings.output_dir, "radar", axis, "png");
            draw_radar(&p, axis, s, &chart_settings)?;
            images.push(p);
        }
        if let Ok(res) = &analysis.correspondence {
            let p = output_path(&settings.output_dir, "correspondencia", axis, "png");
            draw_correspondence(&p, axis, res, &chart_settings)?;
            images.push(p);
        }
    }

    let mut files = images.clone();
    if settings.export_pdf {
        // The report needs both charts to be computable.
        if let (Ok(s), Ok(_)) = (&analysis.summary, &analysis.correspondence) {
            fs::create_dir_all(&settings.output_dir).context(WritingFileSnafu {
                path: settings.output_dir.display().to_string(),
            })?;
            let bytes = pdf::build_report(axis, s, &images)?;
            let p = output_path(&settings.output_dir, "relatorio", axis, "pdf");
            fs::write(&p, bytes).context(WritingFileSnafu {
                path: p.display().to_string(),
            })?;
            files.push(p);
        }
    }
    for f in files.iter() {
        info!("export_axis: wrote {}", f.display());
    }
    Ok(files)
}

fn analysis_to_json(analysis: &AxisAnalysis) -> JSValue {
    let summary = match &analysis.summary {
        Ok(s) => json!({
            "government": AdherenceSummary::GOVERNMENT_PCT,
            "population": s.population_pct,
            "diagnosis": s.diagnosis_pct,
            "average": s.average,
        }),
        Err(_) => JSValue::Null,
    };
    let correspondence = match &analysis.correspondence {
        Ok(res) => {
            let goals: Vec<JSValue> = res
                .goals
                .iter()
                .map(|g| {
                    json!({
                        "id": g.goal_id,
                        "label": g.label,
                        "adherence": g.adherence,
                        "level": g.level.label(),
                    })
                })
                .collect();
            let long: Vec<JSValue> = res
                .long_rows
                .iter()
                .map(|r| {
                    json!({
                        "id": r.goal_id,
                        "category": r.category.label(),
                        "level": r.level.label(),
                        "label": r.label,
                    })
                })
                .collect();
            json!({
                "goals": goals,
                "long": long,
                "high": res.group_text(AdherenceLevel::High),
                "medium": res.group_text(AdherenceLevel::Medium),
                "low": res.group_text(AdherenceLevel::Low),
            })
        }
        Err(_) => JSValue::Null,
    };
    json!({
        "axis": analysis.axis,
        "summary": summary,
        "correspondence": correspondence,
        "warnings": analysis.warnings(),
    })
}

pub fn build_summary_js(analyses: &[AxisAnalysis]) -> JSValue {
    let axes: Vec<JSValue> = analyses.iter().map(analysis_to_json).collect();
    json!({ "axes": axes })
}

/// Picks the axes to show, either from the settings or from the terminal.
fn select_axes<R: BufRead>(
    requested: &[String],
    available: &[String],
    workbook: &str,
    input: R,
) -> DashResult<Vec<String>> {
    let tokens: Vec<String> = if requested.is_empty() {
        println!("Escolha 1 ou mais eixos:");
        for (idx, name) in available.iter().enumerate() {
            println!("  {}. {}", idx + 1, name);
        }
        read_selection(input)?
    } else {
        requested.to_vec()
    };
    resolve_selection(&tokens, available, workbook)
}

fn resolve_selection(
    tokens: &[String],
    available: &[String],
    workbook: &str,
) -> DashResult<Vec<String>> {
    let mut res: Vec<String> = Vec::new();
    for token in tokens {
        let chosen: Vec<String> = match token.as_str() {
            "all" | "todos" => available.to_vec(),
            t if available.iter().any(|a| a == t) => vec![t.to_string()],
            t => match t.parse::<usize>() {
                Ok(idx) if idx >= 1 && idx <= available.len() => {
                    vec![available[idx - 1].clone()]
                }
                _ => {
                    return SheetNotFoundSnafu {
                        sheet: t.to_string(),
                        path: workbook,
                    }
                    .fail()
                }
            },
        };
        for c in chosen {
            if !res.contains(&c) {
                res.push(c);
            }
        }
    }
    Ok(res)
}

pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let config = match &args.config {
        Some(p) => Some((p.clone(), read_config(p)?)),
        None => None,
    };
    let settings = Settings::resolve(args, config.as_ref().map(|(p, c)| (p.as_str(), c)));
    info!("run_dashboard: settings: {:?}", settings);

    let stdin = std::io::stdin();
    let password = match &settings.password {
        Some(p) => p.clone(),
        None => gate::prompt_password(stdin.lock())?,
    };
    gate::check_access(&settings.secret, &password)?;

    let mut cache = SheetCache::open(&settings.workbook)?;
    let available = cache.sheet_names()?;
    debug!("run_dashboard: available sheets: {:?}", available);

    if settings.list_only {
        for name in available.iter() {
            println!("{}", name);
        }
        return Ok(());
    }

    let workbook_s = settings.workbook.display().to_string();
    let selected = select_axes(&settings.axes, &available, &workbook_s, stdin.lock())?;
    if selected.is_empty() {
        info!("run_dashboard: no axis selected");
    }

    let mut analyses: Vec<AxisAnalysis> = Vec::new();
    for axis in selected.iter() {
        let analysis = analyze_axis(axis, cache.load(axis)?);
        print_axis(&analysis);
        export_axis(&analysis, &settings)?;
        analyses.push(analysis);
    }
    debug!("run_dashboard: {} sheets in cache", cache.len());

    let summary_js = build_summary_js(&analyses);
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    match settings.json_out.as_deref() {
        Some("stdout") => println!("{}", pretty_js),
        Some(p) => fs::write(p, &pretty_js).context(WritingFileSnafu { path: p })?,
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(reference_p) = &settings.reference {
        let reference = read_reference(reference_p)?;
        let pretty_js_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        if pretty_js_ref != pretty_js {
            warn!("Found differences with the reference summary");
            print_diff(pretty_js_ref.as_str(), pretty_js.as_str(), "\n");
            return ReferenceMismatchSnafu {
                path: reference_p.clone(),
            }
            .fail();
        }
        info!("run_dashboard: summary matches {}", reference_p);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adherence::builder::TableBuilder;

    fn sample_table() -> Table {
        let mut builder = TableBuilder::new(&["Governo", "Populacao", "Diagnostico", "Aderencia"]);
        builder.add_goal("Creches", 1.0, 1.0, 1.0);
        builder.add_goal("Praças", 1.0, 0.0, 0.5);
        builder.add_goal("Estradas", 0.0, 1.0, 0.0);
        builder.build()
    }

    fn available() -> Vec<String> {
        vec!["Saúde".to_string(), "Educação".to_string(), "Obras".to_string()]
    }

    #[test]
    fn analyze_complete_axis() {
        let analysis = analyze_axis("Saúde", &sample_table());
        let s = analysis.summary.as_ref().unwrap();
        assert_eq!(s.population_pct, 66.7);
        assert_eq!(s.diagnosis_pct, 66.7);
        assert_eq!(s.average, 67);
        let res = analysis.correspondence.as_ref().unwrap();
        assert_eq!(res.group_text(AdherenceLevel::High), "Creches");
        assert!(analysis.warnings().is_empty());
    }

    #[test]
    fn analyze_axis_without_adherence() {
        let mut builder = TableBuilder::new(&["population", "diagnosis"]);
        builder.add_row(vec![Cell::from(1.0), Cell::from(0.5)]);
        let analysis = analyze_axis("Obras", &builder.build());
        assert!(analysis.summary.is_ok());
        assert_eq!(
            analysis.correspondence.as_ref().unwrap_err().missing,
            vec!["adherence".to_string()]
        );
        assert_eq!(
            analysis.warnings(),
            vec!["A aba Obras não tem as colunas necessárias.".to_string()]
        );
    }

    #[test]
    fn summary_json() {
        let analyses = vec![analyze_axis("Saúde", &sample_table())];
        let js = build_summary_js(&analyses);
        let axis = &js["axes"][0];
        assert_eq!(axis["axis"], "Saúde");
        assert_eq!(axis["summary"]["government"], 100.0);
        assert_eq!(axis["summary"]["average"], 67);
        assert_eq!(axis["correspondence"]["goals"][0]["label"], "Creches");
        assert_eq!(axis["correspondence"]["goals"][0]["level"], "Alta");
        assert_eq!(axis["correspondence"]["medium"], "Praças");
        assert_eq!(axis["correspondence"]["low"], "Estradas");
        // Creches: 3 points, Praças: 2, Estradas: 2
        assert_eq!(axis["correspondence"]["long"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn missing_chart_is_null_in_json() {
        let mut builder = TableBuilder::new(&["governo"]);
        builder.add_row(vec![Cell::from("A")]);
        let js = build_summary_js(&[analyze_axis("Vazio", &builder.build())]);
        assert_eq!(js["axes"][0]["summary"], JSValue::Null);
        assert_eq!(js["axes"][0]["correspondence"], JSValue::Null);
        assert_eq!(js["axes"][0]["warnings"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn selection_from_arguments() {
        let sel =
            select_axes(&["Obras".to_string()], &available(), "dados.xlsx", "".as_bytes()).unwrap();
        assert_eq!(sel, vec!["Obras".to_string()]);
        let sel =
            select_axes(&["all".to_string()], &available(), "dados.xlsx", "".as_bytes()).unwrap();
        assert_eq!(sel, available());
    }

    #[test]
    fn selection_from_terminal() {
        let sel =
            select_axes(&[], &available(), "dados.xlsx", "3, Saúde, 3\n".as_bytes()).unwrap();
        assert_eq!(sel, vec!["Obras".to_string(), "Saúde".to_string()]);
        let sel = select_axes(&[], &available(), "dados.xlsx", "\n".as_bytes()).unwrap();
        assert!(sel.is_empty());
    }

    fn write_workbook(path: &std::path::Path) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Saúde").unwrap();
        for (col, h) in ["Governo", "Populacao", "Diagnostico", "Aderencia"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *h).unwrap();
        }
        sheet.write_string(1, 0, "Creches").unwrap();
        sheet.write_number(1, 1, 1.0).unwrap();
        sheet.write_number(1, 2, 1.0).unwrap();
        sheet.write_number(1, 3, 1.0).unwrap();
        sheet.write_string(2, 0, "Praças").unwrap();
        sheet.write_number(2, 1, 0.5).unwrap();
        sheet.write_number(2, 2, 0.0).unwrap();
        sheet.write_number(2, 3, 0.5).unwrap();
        let other = workbook.add_worksheet();
        other.set_name("Obras").unwrap();
        other.write_string(0, 0, "Populacao").unwrap();
        other.write_string(0, 1, "Diagnostico").unwrap();
        other.write_number(1, 0, 0.2).unwrap();
        other.write_number(1, 1, 0.4).unwrap();
        workbook.save(path).unwrap();
    }

    fn run_args(dir: &std::path::Path, extra: &[&str]) -> Args {
        use clap::Parser;
        let input = dir.join("dados.xlsx").display().to_string();
        let out_dir = dir.join("out").display().to_string();
        let mut all = vec![
            "eixos",
            "--password",
            "seplan123",
            "--input",
            input.as_str(),
            "--out-dir",
            out_dir.as_str(),
            "--axis",
            "all",
            "--no-png",
        ];
        all.extend_from_slice(extra);
        Args::parse_from(all)
    }

    #[test]
    fn end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_workbook(&dir.path().join("dados.xlsx"));
        let summary_p = dir.path().join("summary.json").display().to_string();

        run_dashboard(&run_args(dir.path(), &["--out", summary_p.as_str()])).unwrap();

        // Only Saúde has the columns of both charts.
        assert!(dir.path().join("out/relatorio_Saúde.pdf").exists());
        assert!(!dir.path().join("out/relatorio_Obras.pdf").exists());

        let js = read_reference(&summary_p).unwrap();
        assert_eq!(js["axes"][0]["summary"]["population"], 75.0);
        assert_eq!(js["axes"][0]["summary"]["diagnosis"], 50.0);
        assert_eq!(js["axes"][0]["summary"]["average"], 62);
        assert_eq!(js["axes"][1]["axis"], "Obras");
        assert_eq!(js["axes"][1]["summary"]["average"], 30);
        assert_eq!(js["axes"][1]["correspondence"], JSValue::Null);

        // The same run matches its own summary.
        run_dashboard(&run_args(dir.path(), &["--no-pdf", "--reference", summary_p.as_str()]))
            .unwrap();
    }

    #[test]
    fn reference_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_workbook(&dir.path().join("dados.xlsx"));
        let reference_p = dir.path().join("reference.json");
        fs::write(&reference_p, r#"{"axes": []}"#).unwrap();
        let reference_s = reference_p.display().to_string();
        let err = run_dashboard(&run_args(
            dir.path(),
            &["--no-pdf", "--reference", reference_s.as_str()],
        ))
        .unwrap_err();
        assert!(matches!(err, DashError::ReferenceMismatch { .. }));
    }

    #[test]
    fn fatal_setup_errors() {
        let dir = tempfile::tempdir().unwrap();
        // No workbook.
        let err = run_dashboard(&run_args(dir.path(), &[])).unwrap_err();
        assert!(matches!(err, DashError::WorkbookNotFound { .. }));

        write_workbook(&dir.path().join("dados.xlsx"));
        let mut args = run_args(dir.path(), &[]);
        args.password = Some("errada".to_string());
        let err = run_dashboard(&args).unwrap_err();
        assert!(matches!(err, DashError::WrongPassword {}));
    }

    #[test]
    fn unknown_axis() {
        let err = select_axes(&["Cultura".to_string()], &available(), "dados.xlsx", "".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DashError::SheetNotFound { .. }));
        assert_eq!(err.to_string(), "A aba Cultura não existe em dados.xlsx.");
        let err =
            select_axes(&["7".to_string()], &available(), "dados.xlsx", "".as_bytes()).unwrap_err();
        assert!(matches!(err, DashError::SheetNotFound { .. }));
    }
}
