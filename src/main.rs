fn main() {
    if let Err(err) = starling_engine::run() {
        eprintln!("Application error: {err:?}");
        std::process::exit(1);
    }
}
