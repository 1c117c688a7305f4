#[tokio::main]
async fn main() {
    if let Err(err) = luximo_lib::run().await {
        eprintln!("luximo: {err}");
        std::process::exit(1);
    }
}
