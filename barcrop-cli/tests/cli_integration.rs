use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::path::PathBuf;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn barcrop_cmd() -> Command {
    let mut cmd = Command::cargo_bin("barcrop").expect("Failed to find barcrop binary");
    cmd.env("NO_COLOR", "1")
        .env_remove("BARCROP_INPUT_DIR")
        .env_remove("BARCROP_OUTPUT_DIR");
    cmd
}

#[test]
fn test_help_lists_commands() -> Result<(), Box<dyn Error>> {
    barcrop_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("crop"))
        .stdout(contains("detect"));
    Ok(())
}

#[test]
fn test_crop_requires_directories() -> Result<(), Box<dyn Error>> {
    barcrop_cmd()
        .arg("crop")
        .assert()
        .failure()
        .stderr(contains("--input"));
    Ok(())
}

#[test]
fn test_crop_non_existent_input() -> Result<(), Box<dyn Error>> {
    let output_dir = tempdir()?;
    let non_existent_input = PathBuf::from("surely/this/does/not/exist");

    barcrop_cmd()
        .arg("crop")
        .arg("--input")
        .arg(&non_existent_input)
        .arg("--output")
        .arg(output_dir.path())
        .assert()
        .failure()
        .stderr(contains("Invalid input directory"));
    Ok(())
}

#[test]
fn test_crop_input_is_a_file() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;
    let file = input_dir.path().join("clip.mp4");
    std::fs::write(&file, "dummy content")?;

    barcrop_cmd()
        .args(["crop", "-i"])
        .arg(&file)
        .arg("-o")
        .arg(output_dir.path())
        .assert()
        .failure()
        .stderr(contains("not a directory"));
    Ok(())
}

#[test]
fn test_crop_empty_directory_reports_zero() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let scratch = tempdir()?;
    let output_dir = scratch.path().join("cropped");
    std::fs::write(input_dir.path().join("notes.txt"), "not a video")?;

    barcrop_cmd()
        .args(["crop", "-i"])
        .arg(input_dir.path())
        .arg("-o")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(contains("0/0"));

    assert!(output_dir.is_dir(), "output directory should be created");
    Ok(())
}

#[test]
fn test_crop_directories_from_environment() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    barcrop_cmd()
        .arg("crop")
        .env("BARCROP_INPUT_DIR", input_dir.path())
        .env("BARCROP_OUTPUT_DIR", output_dir.path())
        .assert()
        .success()
        .stdout(contains("Completed"));
    Ok(())
}

#[test]
fn test_crop_writes_report_and_log() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;
    let log_dir = tempdir()?;
    let report = output_dir.path().join("report.json");

    barcrop_cmd()
        .args(["crop", "-i"])
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .arg("--log-dir")
        .arg(log_dir.path())
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let json: String = std::fs::read_to_string(&report)?;
    assert!(json.contains("\"total\": 0"));

    let logs: Vec<_> = std::fs::read_dir(log_dir.path())?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("barcrop_run_"))
        .collect();
    assert_eq!(logs.len(), 1);
    Ok(())
}

#[test]
fn test_crop_rejects_invalid_threshold() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    barcrop_cmd()
        .args(["crop", "-i"])
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .args(["--threshold", "300"])
        .assert()
        .failure()
        .stderr(contains("threshold"));
    Ok(())
}

#[test]
fn test_detect_empty_directory() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;

    barcrop_cmd()
        .args(["detect", "-i"])
        .arg(input_dir.path())
        .assert()
        .success()
        .stdout(contains("No .mp4 files found"));
    Ok(())
}

#[test]
fn test_crop_refuses_output_aliasing_input() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let video = input_dir.path().join("clip.mp4");
    std::fs::write(&video, "original bytes")?;
    let alias = input_dir
        .path()
        .join("..")
        .join(input_dir.path().file_name().unwrap());

    barcrop_cmd()
        .args(["crop", "-i"])
        .arg(input_dir.path())
        .arg("-o")
        .arg(&alias)
        .assert()
        .failure()
        .stderr(contains("must differ from the input directory"));

    assert_eq!(std::fs::read_to_string(&video)?, "original bytes");
    Ok(())
}
