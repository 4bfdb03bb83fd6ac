use std::process;

fn main() {
    match mdpage_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("mdpage error: {err}");
            process::exit(1);
        }
    }
}
