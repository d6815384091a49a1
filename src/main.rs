fn main() {
    if let Err(err) = chatreveal::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
