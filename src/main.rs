fn main() {
    if let Err(err) = sas_export::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
