use std::process::{Command, Output};

#[test]
fn queries() {
    testcase("words", "words", ["-q", "ca", "-q", "d", "-q", "x", "--percent"]);
    testcase("counted-input", "counted-input", ["-c", "-w", "--weights=average", "-q", "how", "-q", "how to"]);
    testcase("sanitized", "sanitized", ["--sanitize", "-q", "HEL", "-q", "!!", "--min=30%", "-p"]);
}

#[test]
fn show_tree() {
    testcase("tree-compressed", "words", ["--show-tree"]);
    testcase("tree-simple", "words", ["--tree=simple", "--show-tree", "-r", "dog", "-i", ". "]);
}

#[test]
fn invalid_input_line() {
    let output = run("invalid-weight", ["--counted-input"]);
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(!output.status.success());
    assert!(stderr.contains("input line 2"), "stderr:\n{stderr}");
}

fn run<const N: usize>(input: &str, options: [&str; N]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ac"))
        .args(options)
        .arg(format!("tests/inputs/{input}.txt"))
        .output()
        .unwrap()
}

fn testcase<const N: usize>(name: &str, input: &str, options: [&str; N]) {
    let output = run(input, options);
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        output.status.success(),
        "\nstdout:\n{stdout}stderr:\n{stderr}"
    );

    let expected = std::fs::read_to_string(format!("tests/expected_outputs/{name}.txt")).unwrap();

    // Ignore line ending differences, i.e., LF vs CRLF.
    let mut output_lines = stdout.lines();
    let mut expected_lines = expected.lines();
    loop {
        let output_line = output_lines.next();
        let expected_line = expected_lines.next();
        match (output_line, expected_line) {
            (None, None) => break,
            (output_line, expected_line) => assert_eq!(
                output_line, expected_line,
                "\noutput:\n{stdout}\nexpected:\n{expected}"
            ),
        }
    }
}
