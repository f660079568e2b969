fn main() {
    let input = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("src/counter.xml");
    trellis_cli::build_script(&input, "Counter", &trellis_cli::CompileOptions::default())
        .expect("compile counter.xml");
}
