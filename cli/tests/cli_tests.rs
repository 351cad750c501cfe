fn cases(cmd: &str) -> trycmd::TestCases {
    let cases = trycmd::TestCases::new();

    cases
        .case(format!("tests/{cmd}/*.toml"))
        .env("SATZ_ALLOW_STDIN", "true")
        .default_bin_name("satz");

    cases
}

#[test]
fn annotate() {
    cases("annotate");
}

#[test]
fn diff() {
    cases("diff");
}

#[test]
fn region() {
    cases("region");
}

#[test]
fn summary() {
    cases("summary");
}

#[test]
fn topology() {
    cases("topology");
}

#[test]
fn variance() {
    cases("variance");
}

#[test]
fn window() {
    cases("window");
}
