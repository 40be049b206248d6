fn main() {
    if let Err(err) = import_analyzer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
