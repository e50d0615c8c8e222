use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    marketbook::cli::run().await
}
