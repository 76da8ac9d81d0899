// tests/golden_smoke.rs
use std::process::Command;

const TEN_ROWS: &str = "\
Tauranga;38.2
Adelaide;15.0
Xi'an;24.2
Dodoma;22.2
Karachi;15.4
Zagreb;12.2
Pittsburgh;9.7
Ségou;25.7
Halifax;12.9
Cabo San Lucas;14.9
";

const TEN_ROWS_OUT: &str = "{Adelaide=15.0/15.0/15.0, Cabo San Lucas=14.9/14.9/14.9, \
Dodoma=22.2/22.2/22.2, Halifax=12.9/12.9/12.9, Karachi=15.4/15.4/15.4, \
Pittsburgh=9.7/9.7/9.7, Ségou=25.7/25.7/25.7, Tauranga=38.2/38.2/38.2, \
Xi'an=24.2/24.2/24.2, Zagreb=12.2/12.2/12.2}";

fn run_stdout(args: &[&str]) -> String {
    let exe = env!("CARGO_BIN_EXE_tempscan");
    let output = Command::new(exe).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "tempscan {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn golden_smoke_ten_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let in_path = tmp.path().join("ten.txt");
    std::fs::write(&in_path, TEN_ROWS).unwrap();

    let concurrent = run_stdout(&["run", in_path.to_str().unwrap()]);
    assert_eq!(concurrent.trim_end(), TEN_ROWS_OUT);

    let sequential = run_stdout(&["run", in_path.to_str().unwrap(), "--sequential"]);
    assert_eq!(sequential.trim_end(), TEN_ROWS_OUT);
}

#[test]
fn golden_smoke_generate_then_run() {
    let tmp = tempfile::tempdir().unwrap();
    let in_path = tmp.path().join("gen.txt");

    run_stdout(&[
        "generate",
        in_path.to_str().unwrap(),
        "--rows",
        "20000",
        "--keys",
        "120",
        "--seed",
        "7",
    ]);

    let concurrent = run_stdout(&[
        "run",
        in_path.to_str().unwrap(),
        "--chunk-size",
        "4096",
    ]);
    let sequential = run_stdout(&["run", in_path.to_str().unwrap(), "--sequential"]);

    assert_eq!(concurrent, sequential);
    assert!(concurrent.starts_with('{') && concurrent.trim_end().ends_with('}'));
}
