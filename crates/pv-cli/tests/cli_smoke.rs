use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_probviz"))
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("probviz_cli_{}_{}_{}", std::process::id(), nanos, name));
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn assert_ok(out: &Output) {
    assert!(
        out.status.success(),
        "command failed\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
}

#[test]
fn version_prints_crate_version() {
    let out = run(&["version"]);
    assert_ok(&out);
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn plot_writes_svg() {
    let dir = tmp_dir("plot");
    let path = dir.join("gamma.svg");
    let out = run(&["plot", "gamma", "-P", "alpha=2", "-P", "beta=1.5", "-o", path.to_str().unwrap()]);
    assert_ok(&out);
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Mean=3.00"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn pit_rejects_discrete_family() {
    let dir = tmp_dir("pit_discrete");
    let path = dir.join("pit.svg");
    let out = run(&["pit", "poisson", "-o", path.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(!path.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn pit_and_density_figures() {
    let dir = tmp_dir("figures");
    let pit = dir.join("pit.svg");
    assert_ok(&run(&["pit", "normal", "-n", "500", "-o", pit.to_str().unwrap()]));
    assert!(std::fs::read_to_string(&pit).unwrap().contains("Sampled Data (n=500)"));

    let d2 = dir.join("mvn.svg");
    assert_ok(&run(&["density2d", "--mean", "-1,2", "--cov", "1,0.4,0.4,2", "-o", d2.to_str().unwrap()]));
    assert!(std::fs::read_to_string(&d2).unwrap().contains("Probability Density"));

    let simplex = dir.join("simplex.svg");
    assert_ok(&run(&["simplex", "--alpha", "2,3,4", "--points", "60", "-o", simplex.to_str().unwrap()]));
    assert!(std::fs::read_to_string(&simplex).unwrap().contains("valid cells"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bad_covariance_fails() {
    let dir = tmp_dir("bad_cov");
    let path = dir.join("mvn.svg");
    let out = run(&["density2d", "--cov", "1,0,0", "-o", path.to_str().unwrap()]);
    assert!(!out.status.success());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn sample_prints_json() {
    let out = run(&["sample", "negative-binomial", "-r", "3", "-p", "0.4", "--size", "250"]);
    assert_ok(&out);
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let samples = v["samples"].as_array().unwrap();
    assert_eq!(samples.len(), 250);
    assert!(samples.iter().all(|s| s.is_u64()));
}

#[test]
fn config_file_is_applied() {
    let dir = tmp_dir("config");
    let cfg = dir.join("viz.yaml");
    std::fs::write(&cfg, "theme: minimal\ncolors:\n  density: \"#123456\"\n").unwrap();
    let path = dir.join("normal.svg");
    let out = run(&["--config", cfg.to_str().unwrap(), "plot", "normal", "-o", path.to_str().unwrap()]);
    assert_ok(&out);
    assert!(std::fs::read_to_string(&path).unwrap().contains("#123456"));
    let _ = std::fs::remove_dir_all(&dir);
}
