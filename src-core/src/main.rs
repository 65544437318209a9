fn main() {
    if let Err(e) = punto_inicio_core::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
