use crate::dashboard::*;

use std::path::Path;

/// A name usable in a file name: path separators and other reserved characters become `_`.
pub fn simplify_file_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// `{dir}/{prefix}_{axis}.{extension}`
pub fn output_path(dir: &Path, prefix: &str, axis: &str, extension: &str) -> PathBuf {
    dir.join(format!(
        "{}_{}.{}",
        prefix,
        simplify_file_name(axis),
        extension
    ))
}

/// Reads one line of comma-separated choices.
pub fn read_selection<R: BufRead>(mut input: R) -> DashResult<Vec<String>> {
    let mut line = String::new();
    input.read_line(&mut line).context(ReadingInputSnafu {})?;
    Ok(line
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("Saúde"), "Saúde");
        assert_eq!(simplify_file_name(" Obras/Vias: 2024 "), "Obras_Vias_ 2024");
        assert_eq!(
            output_path(Path::new("out"), "radar", "A/B", "png"),
            PathBuf::from("out/radar_A_B.png")
        );
    }

    #[test]
    fn selection_line() {
        let sel = read_selection(" 1, Saúde ,,\n".as_bytes()).unwrap();
        assert_eq!(sel, vec!["1".to_string(), "Saúde".to_string()]);
        assert!(read_selection("".as_bytes()).unwrap().is_empty());
    }
}
