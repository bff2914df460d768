fn main() {
    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::default());

    dashboard_ui::start();
}
