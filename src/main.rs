use staffline_detector::config::runtime::load_config;
use staffline_detector::image::io::{load_grayscale_image, save_binary_image, write_json_file};
use staffline_detector::{StaffLineDetector, StaffSystem};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let detector = StaffLineDetector::new(config.params.clone()).map_err(|e| e.to_string())?;

    let mut pages: Vec<Vec<StaffSystem>> = Vec::with_capacity(config.inputs.len());
    for input in &config.inputs {
        let gray = load_grayscale_image(input)?;
        let data = detector.prepare(gray.as_view());
        let report = detector.detect_staff_lines_with_diagnostics(&data);
        let lines: usize = report.systems.iter().map(StaffSystem::len).sum();
        println!(
            "{}: {} systems, {} lines ({})",
            input.display(),
            report.systems.len(),
            lines,
            report.trace.summary()
        );
        if let Some(dir) = &config.output.debug_dir {
            save_binary_image(&data.horizontal_runs_img, &debug_path(dir, input))?;
        }
        pages.push(report.systems);
    }

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &pages)?;
        println!("Staff systems written to {}", path.display());
    }
    if let Some(dir) = &config.output.debug_dir {
        println!("Run-length images written to {}", dir.display());
    }
    Ok(())
}

fn debug_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    dir.join(format!("{stem}_runs.png"))
}

fn usage() -> String {
    "Usage: staffline-detector <config.json>".to_string()
}
