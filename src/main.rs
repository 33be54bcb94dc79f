fn main() {
    if let Err(e) = certsync::cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
