use statsbridge::core::CoreApp;

#[tokio::main]
async fn main() {
    if let Err(e) = CoreApp::run().await {
        eprintln!("\nError: {}\n", e);
        std::process::exit(1);
    }
    // A pending stdin read would otherwise hold the runtime open after shutdown.
    std::process::exit(0);
}
