fn main() {
    if let Err(e) = awarecare_lib::run() {
        eprintln!("awarecare: {e}");
        std::process::exit(1);
    }
}
