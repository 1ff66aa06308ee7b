#[cfg(test)]
mod examples {
    use std::fs;
    use std::path::{Path, PathBuf};

    use tmsh::formatting::*;
    use tmsh::parsing;

    /// Golden test for the format command
    ///
    /// Every .conf file under tests/golden/ is in canonical form, so parsing
    /// it and encoding the result must give back exactly the same text. A
    /// file which does not parse is reported with its line and column; a
    /// file which encodes differently is reported with a line diff. In
    /// either case the encoder and parser are suspect first, and the file
    /// second (it may have drifted out of canonical form).
    enum Failure {
        Unparsable(PathBuf, String),
        Changed(PathBuf, String, String),
    }

    fn golden_files(dir: &Path) -> Vec<PathBuf> {
        assert!(dir.exists(), "golden directory missing");

        let entries = fs::read_dir(dir).expect("Failed to read golden directory");

        let mut files: Vec<PathBuf> = entries
            .map(|entry| {
                entry
                    .expect("Failed to read directory entry")
                    .path()
            })
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    == Some("conf")
            })
            .collect();
        files.sort();

        assert!(!files.is_empty(), "No .conf files found in golden directory");
        files
    }

    fn check(file: &Path) -> Option<Failure> {
        let original = parsing::load(file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        let document = match parsing::parse(&original) {
            Ok(document) => document,
            Err(error) => {
                return Some(Failure::Unparsable(file.to_path_buf(), error.to_string()));
            }
        };

        // plain text, no markup
        let result = encode_with_renderer(&document, &Identity);

        if result == original {
            None
        } else {
            Some(Failure::Changed(file.to_path_buf(), original, result))
        }
    }

    /// Line-by-line differences between the file and what the encoder made
    /// of it.
    fn show_diff(original: &str, formatted: &str, file_path: &Path) {
        let original_lines: Vec<&str> = original
            .lines()
            .collect();
        let formatted_lines: Vec<&str> = formatted
            .lines()
            .collect();

        let max_lines = original_lines
            .len()
            .max(formatted_lines.len());

        println!("\nDifferences found in file: {:?}", file_path);
        println!("--- Original");
        println!("+++ Encoded");

        for i in 0..max_lines {
            let before = original_lines
                .get(i)
                .unwrap_or(&"");
            let after = formatted_lines
                .get(i)
                .unwrap_or(&"");

            if before != after {
                println!("@@ Line {} @@", i + 1);
                println!("- {}", before);
                println!("+ {}", after);
            }
        }
    }

    #[test]
    fn ensure_identical_output() {
        let files = golden_files(Path::new("tests/golden"));

        let failures: Vec<Failure> = files
            .iter()
            .filter_map(|file| check(file))
            .collect();

        if failures.is_empty() {
            return;
        }

        for failure in &failures {
            match failure {
                Failure::Unparsable(file_path, message) => {
                    println!("\nFailed to parse {:?}: {}", file_path, message);
                }
                Failure::Changed(file_path, original, encoded) => {
                    show_diff(original, encoded, file_path);
                }
            }
        }

        panic!(
            "{} of {} golden files did not encode unchanged",
            failures.len(),
            files.len()
        );
    }
}
