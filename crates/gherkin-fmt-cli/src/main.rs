use std::process;

fn main() {
    match gherkin_fmt_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("gherkin-fmt error: {err}");
            process::exit(1);
        }
    }
}
