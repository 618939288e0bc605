use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::AppError;

pub const INPUT_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];
pub const OUTPUT_EXTENSION: &str = "json";

#[derive(Debug, Parser)]
#[command(name = "sheet2json")]
#[command(about = "Convert a spreadsheet workbook into a JSON document", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Spreadsheet to convert (.xlsx, .xlsm, .xlsb, .xls or .ods)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// JSON file to write
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Write compact JSON instead of indented output
    #[arg(long)]
    pub compact: bool,

    /// Only print errors; skip the paths banner and the summary report
    #[arg(short, long)]
    pub quiet: bool,
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

pub fn validate_input(path: &Path) -> Result<(), AppError> {
    if !path.exists() {
        return Err(AppError::InvalidInput(format!(
            "input file does not exist: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(AppError::InvalidInput(format!(
            "input path is not a file: {}",
            path.display()
        )));
    }
    if !has_extension(path, INPUT_EXTENSIONS) {
        return Err(AppError::InvalidInput(format!(
            "input file must have one of the extensions: {}",
            INPUT_EXTENSIONS.join(", ")
        )));
    }
    if let Err(e) = fs::File::open(path) {
        return Err(AppError::InvalidInput(format!(
            "input file is not readable: {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

/// Checks the output extension and creates the parent directory if needed.
pub fn prepare_output(path: &Path) -> Result<(), AppError> {
    if !has_extension(path, &[OUTPUT_EXTENSION]) {
        return Err(AppError::InvalidInput(format!(
            "output file must have the .{} extension",
            OUTPUT_EXTENSION
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_paths_and_flags() {
        let cli = Cli::parse_from(["sheet2json", "in.xlsx", "out/result.json", "--compact"]);
        assert_eq!(cli.input, PathBuf::from("in.xlsx"));
        assert_eq!(cli.output, PathBuf::from("out/result.json"));
        assert!(cli.compact);
        assert!(!cli.quiet);
    }

    #[test]
    fn quiet_flag_has_long_and_short_forms() {
        let cli = Cli::parse_from(["sheet2json", "in.xlsx", "out.json", "--quiet"]);
        assert!(cli.quiet);
        assert!(!cli.compact);

        let cli = Cli::parse_from(["sheet2json", "-q", "in.xlsx", "out.json"]);
        assert!(cli.quiet);
    }

    #[test]
    fn missing_output_argument_is_rejected() {
        assert!(Cli::try_parse_from(["sheet2json", "in.xlsx"]).is_err());
    }

    #[test]
    fn input_must_exist_and_be_a_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.xlsx");
        assert!(validate_input(&missing).is_err());

        assert!(validate_input(dir.path()).is_err());

        let wrong_ext = dir.path().join("notes.txt");
        fs::write(&wrong_ext, b"x").unwrap();
        assert!(validate_input(&wrong_ext).is_err());

        let upper = dir.path().join("BOOK.XLSX");
        fs::write(&upper, b"x").unwrap();
        assert!(validate_input(&upper).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_input_is_invalid() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked.xlsx");
        fs::write(&locked, b"x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits don't apply to privileged users.
        if fs::File::open(&locked).is_ok() {
            return;
        }

        let err = validate_input(&locked).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("not readable"));
    }

    #[test]
    fn output_parent_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("out.json");

        prepare_output(&nested).unwrap();

        assert!(nested.parent().unwrap().is_dir());
        assert!(prepare_output(&dir.path().join("out.csv")).is_err());
    }
}
